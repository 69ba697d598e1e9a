//! 查询上下文模块
//!
//! - `ast/` 校验后的语句上下文
//! - `symbol/` 执行期变量表
//! - `managers/` Schema、索引与元数据访问接口

pub mod ast;
pub mod managers;
pub mod symbol;

pub use ast::*;
pub use symbol::{Symbol, SymbolTable};
