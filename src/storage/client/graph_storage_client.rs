//! 图存储客户端
//!
//! 每个操作先按 leader 把点 ID（或分区）分组，再通过 `collect_response` 扇出。

use crate::config::StorageClientConfig;
use crate::core::error::{RpcError, StorageResult};
use crate::core::types::{EdgeProp, GraphSpaceID, HostAddr, IndexQueryContext, VertexProp};
use crate::core::{Expression, Value};
use crate::query::context::managers::MetaClient;
use crate::storage::client::client_manager::ClientManager;
use crate::storage::client::requests::{
    GetNeighborsRequest, GetNeighborsResponse, GetPropRequest, GetPropResponse,
    LookupIndexRequest, LookupIndexResponse, ScanEdgeRequest, ScanResponse, ScanVertexRequest,
    TraverseSpec,
};
use crate::storage::client::response::StorageRpcResponse;
use crate::storage::client::StorageClientBase;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::runtime::Handle;

static EMPTY_KEY: Value = Value::Empty;

/// 单个存储节点上的远程服务
#[async_trait]
pub trait GraphStorageService: Send + Sync {
    async fn get_neighbors(&self, req: GetNeighborsRequest) -> Result<GetNeighborsResponse, RpcError>;

    async fn get_props(&self, req: GetPropRequest) -> Result<GetPropResponse, RpcError>;

    async fn lookup_index(&self, req: LookupIndexRequest) -> Result<LookupIndexResponse, RpcError>;

    async fn scan_vertex(&self, req: ScanVertexRequest) -> Result<ScanResponse, RpcError>;

    async fn scan_edge(&self, req: ScanEdgeRequest) -> Result<ScanResponse, RpcError>;
}

#[derive(Debug)]
pub struct GraphStorageClient<C> {
    base: StorageClientBase<C>,
}

impl<C: GraphStorageService + 'static> GraphStorageClient<C> {
    pub fn new(
        io_runtime: Handle,
        meta_client: Arc<dyn MetaClient>,
        clients: Arc<dyn ClientManager<C>>,
        config: &StorageClientConfig,
    ) -> Self {
        Self {
            base: StorageClientBase::new(io_runtime, meta_client, clients, config),
        }
    }

    pub fn base(&self) -> &StorageClientBase<C> {
        &self.base
    }

    pub async fn get_neighbors(
        &self,
        space_id: GraphSpaceID,
        column_names: Vec<String>,
        vids: Vec<Value>,
        traverse_spec: TraverseSpec,
    ) -> StorageResult<StorageRpcResponse<GetNeighborsResponse>> {
        let clusters = self.base.cluster_ids_to_hosts(space_id, vids, |v| v)?;
        let requests: HashMap<HostAddr, GetNeighborsRequest> = clusters
            .into_iter()
            .map(|(host, parts)| {
                let req = GetNeighborsRequest {
                    space_id,
                    column_names: column_names.clone(),
                    parts,
                    traverse_spec: traverse_spec.clone(),
                };
                (host, req)
            })
            .collect();
        Ok(self
            .base
            .collect_response(requests, |client: Arc<C>, req| async move {
                client.get_neighbors(req).await
            })
            .await)
    }

    /// 取点属性，按点 ID 分区
    pub async fn get_vertex_props(
        &self,
        space_id: GraphSpaceID,
        vids: Vec<Value>,
        props: Vec<VertexProp>,
        dedup: bool,
        filter: Option<Expression>,
    ) -> StorageResult<StorageRpcResponse<GetPropResponse>> {
        let rows = vids.into_iter().map(|vid| vec![vid]).collect::<Vec<_>>();
        self.get_props(space_id, rows, Some(props), None, dedup, filter)
            .await
    }

    /// 取边属性，每个键为 `[src, type, rank, dst]`，按起点分区
    pub async fn get_edge_props(
        &self,
        space_id: GraphSpaceID,
        edge_keys: Vec<Vec<Value>>,
        props: Vec<EdgeProp>,
        dedup: bool,
        filter: Option<Expression>,
    ) -> StorageResult<StorageRpcResponse<GetPropResponse>> {
        self.get_props(space_id, edge_keys, None, Some(props), dedup, filter)
            .await
    }

    async fn get_props(
        &self,
        space_id: GraphSpaceID,
        rows: Vec<Vec<Value>>,
        vertex_props: Option<Vec<VertexProp>>,
        edge_props: Option<Vec<EdgeProp>>,
        dedup: bool,
        filter: Option<Expression>,
    ) -> StorageResult<StorageRpcResponse<GetPropResponse>> {
        let clusters = self
            .base
            .cluster_ids_to_hosts(space_id, rows, |row| row.first().unwrap_or(&EMPTY_KEY))?;
        let requests: HashMap<HostAddr, GetPropRequest> = clusters
            .into_iter()
            .map(|(host, parts)| {
                let req = GetPropRequest {
                    space_id,
                    parts,
                    vertex_props: vertex_props.clone(),
                    edge_props: edge_props.clone(),
                    dedup,
                    limit: None,
                    filter: filter.clone(),
                };
                (host, req)
            })
            .collect();
        Ok(self
            .base
            .collect_response(requests, |client: Arc<C>, req| async move {
                client.get_props(req).await
            })
            .await)
    }

    /// 索引查询发往空间内所有分区的 leader
    pub async fn lookup_index(
        &self,
        space_id: GraphSpaceID,
        is_edge: bool,
        schema_id: i32,
        contexts: Vec<IndexQueryContext>,
        return_columns: Vec<String>,
        limit: Option<i64>,
    ) -> StorageResult<StorageRpcResponse<LookupIndexResponse>> {
        let host_parts = self.base.get_host_parts(space_id)?;
        let requests: HashMap<HostAddr, LookupIndexRequest> = host_parts
            .into_iter()
            .map(|(host, parts)| {
                let req = LookupIndexRequest {
                    space_id,
                    parts,
                    is_edge,
                    schema_id,
                    contexts: contexts.clone(),
                    return_columns: return_columns.clone(),
                    limit,
                };
                (host, req)
            })
            .collect();
        Ok(self
            .base
            .collect_response(requests, |client: Arc<C>, req| async move {
                client.lookup_index(req).await
            })
            .await)
    }

    pub async fn scan_vertex(
        &self,
        space_id: GraphSpaceID,
        return_columns: Vec<VertexProp>,
        limit: i64,
        filter: Option<Expression>,
    ) -> StorageResult<StorageRpcResponse<ScanResponse>> {
        let host_parts = self.base.get_host_parts_with_cursor(space_id)?;
        let requests: HashMap<HostAddr, ScanVertexRequest> = host_parts
            .into_iter()
            .map(|(host, parts)| {
                let req = ScanVertexRequest {
                    space_id,
                    parts,
                    return_columns: return_columns.clone(),
                    limit,
                    filter: filter.clone(),
                };
                (host, req)
            })
            .collect();
        Ok(self
            .base
            .collect_response(requests, |client: Arc<C>, req| async move {
                client.scan_vertex(req).await
            })
            .await)
    }

    pub async fn scan_edge(
        &self,
        space_id: GraphSpaceID,
        return_columns: Vec<EdgeProp>,
        limit: i64,
        filter: Option<Expression>,
    ) -> StorageResult<StorageRpcResponse<ScanResponse>> {
        let host_parts = self.base.get_host_parts_with_cursor(space_id)?;
        let requests: HashMap<HostAddr, ScanEdgeRequest> = host_parts
            .into_iter()
            .map(|(host, parts)| {
                let req = ScanEdgeRequest {
                    space_id,
                    parts,
                    return_columns: return_columns.clone(),
                    limit,
                    filter: filter.clone(),
                };
                (host, req)
            })
            .collect();
        Ok(self
            .base
            .collect_response(requests, |client: Arc<C>, req| async move {
                client.scan_edge(req).await
            })
            .await)
    }
}
