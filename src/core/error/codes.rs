//! 存储端返回的分区级错误码

use serde::{Deserialize, Serialize};
use std::fmt;

/// 分区级错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    Succeeded,
    /// 分区 leader 已变更，可能附带新 leader 提示
    LeaderChanged,
    PartNotFound,
    SpaceNotFound,
    /// 整个 RPC 失败时标记到请求涉及的每个分区上
    RpcFailure,
    KeyNotFound,
    Unknown,
}

impl ErrorCode {
    /// 需要让本地 leader 缓存失效或刷新的错误码
    pub fn affects_leader_cache(&self) -> bool {
        matches!(
            self,
            ErrorCode::LeaderChanged | ErrorCode::PartNotFound | ErrorCode::SpaceNotFound
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Succeeded => "E_SUCCEEDED",
            ErrorCode::LeaderChanged => "E_LEADER_CHANGED",
            ErrorCode::PartNotFound => "E_PART_NOT_FOUND",
            ErrorCode::SpaceNotFound => "E_SPACE_NOT_FOUND",
            ErrorCode::RpcFailure => "E_RPC_FAILURE",
            ErrorCode::KeyNotFound => "E_KEY_NOT_FOUND",
            ErrorCode::Unknown => "E_UNKNOWN",
        };
        f.write_str(s)
    }
}
