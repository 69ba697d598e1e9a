//! 核心类型模块
//!
//! 提供规划器与存储客户端共享的基础类型：标识符、值、表达式、Schema 与错误。

pub mod error;
pub mod expression;
pub mod expression_utils;
pub mod murmur;
pub mod types;
pub mod value;

pub use error::{DBError, DBResult, ErrorCode, RpcError, StorageError, StorageResult};
pub use expression::{
    ArithmeticOperator, Expression, LogicalOperator, RelationalOperator, UnaryOperator,
    YieldColumn, YieldColumns,
};
pub use expression_utils::ExpressionUtils;
pub use types::*;
pub use value::Value;
