//! 统一错误处理
//!
//! 各子系统定义自己的错误枚举，`DBError` 通过 `#[from]` 汇总，
//! `DBResult<T>` 作为对外的统一返回类型。

use thiserror::Error;

pub mod codes;
pub mod storage;

pub use codes::ErrorCode;
pub use storage::{RpcError, StorageError, StorageResult};

use crate::query::planner::PlannerError;

/// 统一的数据库错误类型
#[derive(Error, Debug, Clone)]
pub enum DBError {
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),

    #[error("规划错误: {0}")]
    Planner(#[from] PlannerError),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO错误: {0}")]
    Io(String),

    #[error("序列化错误: {0}")]
    Serialization(String),
}

pub type DBResult<T> = Result<T, DBError>;

impl From<std::io::Error> for DBError {
    fn from(e: std::io::Error) -> Self {
        DBError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for DBError {
    fn from(e: serde_json::Error) -> Self {
        DBError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for DBError {
    fn from(e: toml::de::Error) -> Self {
        DBError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_conversion() {
        let err: DBError = StorageError::SpaceNotFound(3).into();
        assert_eq!(err.to_string(), "存储错误: Space not found, spaceid: 3");
    }

    #[test]
    fn test_rpc_error_mapping() {
        let timeout: StorageError = RpcError::Timeout("10ms".into()).into();
        assert!(matches!(timeout, StorageError::RpcTimeout(_)));
        let other: StorageError = RpcError::Transport("reset".into()).into();
        assert!(matches!(other, StorageError::RpcFailure(_)));
    }
}
