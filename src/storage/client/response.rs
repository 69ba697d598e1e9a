//! 存储 RPC 的请求/响应抽象与多主机聚合响应

use crate::core::error::ErrorCode;
use crate::core::types::{GraphSpaceID, HostAddr, PartitionID};
use std::collections::HashMap;

/// 单个分区的失败信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionResult {
    pub part_id: PartitionID,
    pub code: ErrorCode,
    /// `LeaderChanged` 时存储端给出的新 leader
    pub leader: Option<HostAddr>,
}

impl PartitionResult {
    pub fn new(part_id: PartitionID, code: ErrorCode) -> Self {
        Self {
            part_id,
            code,
            leader: None,
        }
    }

    pub fn leader_changed(part_id: PartitionID, leader: Option<HostAddr>) -> Self {
        Self {
            part_id,
            code: ErrorCode::LeaderChanged,
            leader,
        }
    }
}

/// 每个存储响应都携带的公共部分
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseCommon {
    pub failed_parts: Vec<PartitionResult>,
    pub latency_in_us: i64,
}

impl ResponseCommon {
    pub fn succeeded(latency_in_us: i64) -> Self {
        Self {
            failed_parts: Vec::new(),
            latency_in_us,
        }
    }
}

/// 发往单个主机、已经按分区切好的请求
pub trait StorageRequest: Clone + Send + Sync + 'static {
    fn space_id(&self) -> GraphSpaceID;

    fn part_ids(&self) -> Vec<PartitionID>;
}

pub trait StorageResponse: Send + 'static {
    fn result(&self) -> &ResponseCommon;
}

/// 聚合结果的整体状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Succeeded,
    PartialSucceeded,
    Failed,
}

/// 多主机请求合并后的响应
#[derive(Debug)]
pub struct StorageRpcResponse<R> {
    total_reqs_sent: usize,
    failed_reqs: usize,
    total_parts: usize,
    failed_parts: HashMap<PartitionID, ErrorCode>,
    /// 主机 -> (存储端耗时, 端到端耗时)，单位微秒
    host_latency: Vec<(HostAddr, i64, i64)>,
    responses: Vec<R>,
}

impl<R> StorageRpcResponse<R> {
    pub fn new(total_reqs_sent: usize, total_parts: usize) -> Self {
        Self {
            total_reqs_sent,
            failed_reqs: 0,
            total_parts,
            failed_parts: HashMap::new(),
            host_latency: Vec::new(),
            responses: Vec::new(),
        }
    }

    /// 记一次请求级失败
    pub fn mark_failure(&mut self) {
        self.failed_reqs += 1;
    }

    pub fn emplace_failed_part(&mut self, part_id: PartitionID, code: ErrorCode) {
        self.failed_parts.insert(part_id, code);
    }

    pub fn append_failed_parts(&mut self, parts: &[PartitionID], code: ErrorCode) {
        for part in parts {
            self.emplace_failed_part(*part, code);
        }
    }

    pub fn set_latency(&mut self, host: HostAddr, latency: i64, e2e_latency: i64) {
        self.host_latency.push((host, latency, e2e_latency));
    }

    pub fn add_response(&mut self, resp: R) {
        self.responses.push(resp);
    }

    pub fn succeeded(&self) -> bool {
        self.failed_reqs == 0 && self.failed_parts.is_empty()
    }

    /// 成功请求所占的百分比，没有请求时为 0
    pub fn completeness(&self) -> usize {
        if self.total_reqs_sent == 0 {
            return 0;
        }
        self.total_reqs_sent.saturating_sub(self.failed_reqs) * 100 / self.total_reqs_sent
    }

    pub fn result_code(&self) -> ResultCode {
        if self.succeeded() {
            ResultCode::Succeeded
        } else if self.responses.is_empty() {
            ResultCode::Failed
        } else {
            ResultCode::PartialSucceeded
        }
    }

    pub fn max_latency(&self) -> i64 {
        self.host_latency
            .iter()
            .map(|(_, latency, _)| *latency)
            .max()
            .unwrap_or(0)
    }

    pub fn total_reqs_sent(&self) -> usize {
        self.total_reqs_sent
    }

    pub fn total_parts(&self) -> usize {
        self.total_parts
    }

    pub fn succeeded_parts(&self) -> usize {
        self.total_parts.saturating_sub(self.failed_parts.len())
    }

    pub fn failed_parts(&self) -> &HashMap<PartitionID, ErrorCode> {
        &self.failed_parts
    }

    pub fn host_latency(&self) -> &[(HostAddr, i64, i64)] {
        &self.host_latency
    }

    pub fn responses(&self) -> &[R] {
        &self.responses
    }

    pub fn into_responses(self) -> Vec<R> {
        self.responses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_response() {
        let resp: StorageRpcResponse<()> = StorageRpcResponse::new(0, 0);
        assert!(resp.succeeded());
        assert_eq!(resp.completeness(), 0);
        assert_eq!(resp.max_latency(), 0);
        assert_eq!(resp.result_code(), ResultCode::Succeeded);
    }

    #[test]
    fn test_partial_success() {
        let mut resp = StorageRpcResponse::new(2, 4);
        resp.add_response(1);
        resp.set_latency(HostAddr::new("a", 1), 30, 45);
        resp.mark_failure();
        resp.append_failed_parts(&[3, 4], ErrorCode::RpcFailure);
        assert!(!resp.succeeded());
        assert_eq!(resp.completeness(), 50);
        assert_eq!(resp.succeeded_parts(), 2);
        assert_eq!(resp.max_latency(), 30);
        assert_eq!(resp.result_code(), ResultCode::PartialSucceeded);
    }

    #[test]
    fn test_all_failed() {
        let mut resp: StorageRpcResponse<()> = StorageRpcResponse::new(1, 1);
        resp.mark_failure();
        resp.emplace_failed_part(1, ErrorCode::RpcFailure);
        assert_eq!(resp.completeness(), 0);
        assert_eq!(resp.result_code(), ResultCode::Failed);
    }
}
