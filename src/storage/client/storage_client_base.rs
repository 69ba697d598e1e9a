//! 存储 RPC 扇出
//!
//! 请求已经按 leader 主机分好组，每个主机一个请求。请求在 I/O 运行时上并发发出，
//! 各主机的结果合并进同一个 `StorageRpcResponse`，全部返回（成功或失败）后交付一次。
//! 这里只修正 leader 缓存，不做重试。

use crate::config::StorageClientConfig;
use crate::core::error::{ErrorCode, RpcError, StorageError, StorageResult};
use crate::core::types::{GraphSpaceID, HostAddr, PartitionID};
use crate::core::Value;
use crate::query::context::managers::MetaClient;
use crate::storage::client::client_manager::ClientManager;
use crate::storage::client::request_clusterer::{self, ClusteredIds, HostParts, HostPartsWithCursor};
use crate::storage::client::response::{
    PartitionResult, StorageRequest, StorageResponse, StorageRpcResponse,
};
use crate::storage::client::response_context::ResponseContext;
use crate::storage::client::PartitionLocator;
use futures::FutureExt;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;

pub const NUM_RPC_SENT_TO_STORAGED: &str = "num_rpc_sent_to_storaged";
pub const NUM_RPC_SENT_TO_STORAGED_FAILED: &str = "num_rpc_sent_to_storaged_failed";

pub struct StorageClientBase<C> {
    locator: PartitionLocator,
    clients: Arc<dyn ClientManager<C>>,
    io_runtime: Handle,
    use_ssl: bool,
    timeout: Duration,
}

impl<C> std::fmt::Debug for StorageClientBase<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageClientBase")
            .field("locator", &self.locator)
            .field("use_ssl", &self.use_ssl)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl<C: Send + Sync + 'static> StorageClientBase<C> {
    pub fn new(
        io_runtime: Handle,
        meta_client: Arc<dyn MetaClient>,
        clients: Arc<dyn ClientManager<C>>,
        config: &StorageClientConfig,
    ) -> Self {
        Self {
            locator: PartitionLocator::new(meta_client),
            clients,
            io_runtime,
            use_ssl: config.enable_ssl,
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    pub fn locator(&self) -> &PartitionLocator {
        &self.locator
    }

    pub fn get_leader(&self, space_id: GraphSpaceID, part_id: PartitionID) -> StorageResult<HostAddr> {
        self.locator.get_leader(space_id, part_id)
    }

    pub fn update_leader(&self, space_id: GraphSpaceID, part_id: PartitionID, leader: &HostAddr) {
        self.locator.update_leader(space_id, part_id, leader);
    }

    pub fn invalid_leader(&self, space_id: GraphSpaceID, part_id: PartitionID) {
        self.locator.invalid_leader(space_id, part_id);
    }

    pub fn invalid_leaders(&self, space_id: GraphSpaceID, part_ids: &[PartitionID]) {
        self.locator.invalid_leaders(space_id, part_ids);
    }

    pub fn cluster_ids_to_hosts<T, F>(
        &self,
        space_id: GraphSpaceID,
        ids: impl IntoIterator<Item = T>,
        get_key: F,
    ) -> StorageResult<ClusteredIds<T>>
    where
        F: Fn(&T) -> &Value,
    {
        request_clusterer::cluster_ids_to_hosts(&self.locator, space_id, ids, get_key)
    }

    pub fn get_host_parts(&self, space_id: GraphSpaceID) -> StorageResult<HostParts> {
        request_clusterer::get_host_parts(&self.locator, space_id)
    }

    pub fn get_host_parts_with_cursor(&self, space_id: GraphSpaceID) -> StorageResult<HostPartsWithCursor> {
        request_clusterer::get_host_parts_with_cursor(&self.locator, space_id)
    }

    /// 向多个主机发出请求并合并结果
    ///
    /// 返回的 future 总会完成：空请求表立即完成，否则在最后一个主机返回后完成。
    /// 失败的主机把它负责的分区标记为 `RpcFailure`。
    pub fn collect_response<Req, Resp, F, Fut>(
        &self,
        requests: HashMap<HostAddr, Req>,
        remote_func: F,
    ) -> impl Future<Output = StorageRpcResponse<Resp>> + Send + 'static
    where
        Req: StorageRequest,
        Resp: StorageResponse,
        F: Fn(Arc<C>, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp, RpcError>> + Send + 'static,
    {
        let total_parts = requests.values().map(|r| r.part_ids().len()).sum();
        let (ctx, rx) = ResponseContext::new(StorageRpcResponse::new(requests.len(), total_parts));
        let ctx = Arc::new(ctx);
        let remote_func = Arc::new(remote_func);

        for (host, req) in requests {
            if !ctx.insert_request(host.clone(), req.clone()) {
                continue;
            }
            let call = self.dispatch(host.clone(), req, remote_func.clone());
            let ctx = ctx.clone();
            self.io_runtime.spawn(async move {
                let start = Instant::now();
                let outcome = call.await;
                let e2e = start.elapsed().as_micros() as i64;
                ctx.complete_request(&host, |req, agg| match outcome {
                    Ok(resp) => {
                        let result = resp.result();
                        if !result.failed_parts.is_empty() {
                            agg.mark_failure();
                            for part in &result.failed_parts {
                                agg.emplace_failed_part(part.part_id, part.code);
                            }
                        }
                        agg.set_latency(host.clone(), result.latency_in_us, e2e);
                        agg.add_response(resp);
                    }
                    Err(e) => {
                        log::error!("There some RPC errors: {}", e);
                        agg.mark_failure();
                        if let Some(req) = req {
                            agg.append_failed_parts(&req.part_ids(), ErrorCode::RpcFailure);
                        }
                    }
                });
            });
        }
        ctx.finish_sending();

        rx.map(|delivered| {
            delivered.unwrap_or_else(|_| {
                log::error!("Storage response context dropped before completion");
                let mut resp = StorageRpcResponse::new(0, 0);
                resp.mark_failure();
                resp
            })
        })
    }

    /// 单个主机的请求，错误以值的形式返回
    pub fn get_response<Req, Resp, F, Fut>(
        &self,
        host: HostAddr,
        request: Req,
        remote_func: F,
    ) -> impl Future<Output = StorageResult<Resp>> + Send + 'static
    where
        Req: StorageRequest,
        Resp: StorageResponse,
        F: Fn(Arc<C>, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp, RpcError>> + Send + 'static,
    {
        let call = self.dispatch(host, request, Arc::new(remote_func));
        self.io_runtime.spawn(call).map(|joined| match joined {
            Ok(result) => result.map_err(StorageError::from),
            Err(e) => Err(StorageError::RpcFailure(e.to_string())),
        })
    }

    /// 发出一次调用，并根据结果修正 leader 缓存
    fn dispatch<Req, Resp, F, Fut>(
        &self,
        host: HostAddr,
        request: Req,
        remote_func: Arc<F>,
    ) -> impl Future<Output = Result<Resp, RpcError>> + Send + 'static
    where
        Req: StorageRequest,
        Resp: StorageResponse,
        F: Fn(Arc<C>, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp, RpcError>> + Send + 'static,
    {
        metrics::counter!(NUM_RPC_SENT_TO_STORAGED).increment(1);
        let locator = self.locator.clone();
        let clients = self.clients.clone();
        let use_ssl = self.use_ssl;
        let timeout = self.timeout;

        async move {
            let space_id = request.space_id();
            let part_ids = request.part_ids();
            let client = clients.client(&host, use_ssl, timeout.as_millis() as u64);
            // 闭包 panic 视为普通 RPC 错误
            let call = AssertUnwindSafe(async move { remote_func(client, request).await });
            let outcome = match tokio::time::timeout(timeout, call.catch_unwind()).await {
                Ok(Ok(result)) => result,
                Ok(Err(_)) => Err(RpcError::Other("remote call panicked".to_string())),
                Err(_) => Err(RpcError::Timeout(format!("{}ms", timeout.as_millis()))),
            };
            match outcome {
                Ok(resp) => {
                    handle_failed_parts(&locator, space_id, &resp.result().failed_parts);
                    Ok(resp)
                }
                Err(e) => {
                    metrics::counter!(NUM_RPC_SENT_TO_STORAGED_FAILED).increment(1);
                    if e.is_timeout() {
                        log::error!("Request to {} time out: {}", host, e);
                    } else {
                        log::error!("Request to {} failed: {}", host, e);
                        locator.invalid_leaders(space_id, &part_ids);
                    }
                    Err(e)
                }
            }
        }
    }
}

/// 按分区错误码更新或失效 leader 缓存
pub(crate) fn handle_failed_parts(
    locator: &PartitionLocator,
    space_id: GraphSpaceID,
    failed_parts: &[PartitionResult],
) {
    for part in failed_parts {
        log::debug!("Failure! Failed part {}, failed code {}", part.part_id, part.code);
        match part.code {
            ErrorCode::LeaderChanged => match part.leader.as_ref().filter(|l| l.is_valid()) {
                Some(leader) => locator.update_leader(space_id, part.part_id, leader),
                None => locator.invalid_leader(space_id, part.part_id),
            },
            // 空间不存在时同样只是让 leader 失效
            ErrorCode::PartNotFound | ErrorCode::SpaceNotFound => {
                locator.invalid_leader(space_id, part.part_id)
            }
            _ => {}
        }
    }
}
