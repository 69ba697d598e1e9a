//! 符号表模块

pub mod symbol_table;

pub use symbol_table::{Symbol, SymbolTable};
