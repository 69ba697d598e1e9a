//! 计划模块

pub mod core;
pub mod execution_plan;

pub use self::core::*;
pub use execution_plan::{ExecutionPlan, SubPlan};
