//! 工具模块

pub mod anon_var_generator;
pub mod logging;

pub use anon_var_generator::{AnonColGenerator, AnonVarGenerator};
