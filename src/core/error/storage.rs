//! 存储客户端错误类型

use thiserror::Error;

use crate::core::types::{GraphSpaceID, PartitionID};

pub type StorageResult<T> = Result<T, StorageError>;

/// 存储客户端错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("Space not found, spaceid: {0}")]
    SpaceNotFound(GraphSpaceID),
    #[error("Leader of part {part} in space {space} not found")]
    LeaderNotFound {
        space: GraphSpaceID,
        part: PartitionID,
    },
    #[error("Failed to compute part id: {0}")]
    PartIdFailed(String),
    #[error("RPC failure in StorageClient: {0}")]
    RpcFailure(String),
    #[error("RPC failure in StorageClient with timeout: {0}")]
    RpcTimeout(String),
}

/// 单次 RPC 调用的传输层错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("{0}")]
    Other(String),
}

impl RpcError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RpcError::Timeout(_))
    }
}

impl From<RpcError> for StorageError {
    fn from(e: RpcError) -> Self {
        match e {
            RpcError::Timeout(msg) => StorageError::RpcTimeout(msg),
            other => StorageError::RpcFailure(other.to_string()),
        }
    }
}
