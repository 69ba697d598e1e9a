//! 集成测试共享工具模块
//!
//! 规划测试使用内存 Schema，存储客户端测试使用按主机编排结果的存储桩。

#![allow(dead_code)]

use async_trait::async_trait;
use graphdb_planner::config::StorageClientConfig;
use graphdb_planner::core::types::{HostAddr, PartitionID};
use graphdb_planner::core::{RpcError, Value};
use graphdb_planner::query::context::managers::{MemorySchemaManager, MetaCache, SchemaId};
use graphdb_planner::query::planner::plan::describe_plan;
use graphdb_planner::query::planner::SubPlan;
use graphdb_planner::query::QueryContext;
use graphdb_planner::storage::client::{
    DataSet, GetNeighborsRequest, GetNeighborsResponse, GetPropRequest, GetPropResponse,
    GraphStorageClient, GraphStorageService, LookupIndexRequest, LookupIndexResponse,
    PartitionResult, PooledClientManager, ResponseCommon, ScanEdgeRequest, ScanResponse,
    ScanVertexRequest,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;

pub const SPACE: i32 = 1;
pub const PERSON: i32 = 2;
pub const TEAM: i32 = 3;
pub const LIKE: i32 = 5;
pub const SERVE: i32 = 6;

pub fn test_schema() -> MemorySchemaManager {
    MemorySchemaManager::new()
        .with_tag(SPACE, PERSON, "person", &["name", "age"])
        .with_tag(SPACE, TEAM, "team", &["name"])
        .with_edge(SPACE, LIKE, "like", &["likeness"])
        .with_edge(SPACE, SERVE, "serve", &["start_year"])
        .with_index(SPACE, 10, "person_name", SchemaId::Tag(PERSON), &["name"])
        .with_index(SPACE, 11, "person_age", SchemaId::Tag(PERSON), &["age"])
        .with_index(SPACE, 20, "like_likeness", SchemaId::Edge(LIKE), &["likeness"])
}

pub fn create_test_query_context() -> QueryContext {
    let schema = Arc::new(test_schema());
    QueryContext::new(1, schema.clone(), schema)
}

/// 从根开始按深度优先列出节点名
pub fn plan_node_names(qctx: &QueryContext, plan: &SubPlan) -> Vec<String> {
    let root = plan.root.expect("Expected plan root to exist");
    describe_plan(qctx.pool(), root)
        .into_iter()
        .map(|d| d.name)
        .collect()
}

/// 节点池中所有节点的名字，包括循环体
pub fn pool_node_names(qctx: &QueryContext) -> Vec<String> {
    qctx.pool().iter().map(|n| n.name().to_string()).collect()
}

pub fn host(n: u16) -> HostAddr {
    HostAddr::new(format!("storaged{}", n), 9779)
}

/// 空间 `SPACE` 的分区依次分配给各主机
pub fn meta_cache(parts: i32, hosts: &[HostAddr]) -> Arc<MetaCache> {
    let cache = Arc::new(MetaCache::new());
    cache.add_space(SPACE, parts);
    cache.assign_leaders_round_robin(SPACE, hosts);
    cache
}

/// 某个主机收到请求后的行为
#[derive(Debug, Clone)]
pub enum Script {
    Succeed,
    FailParts(Vec<PartitionResult>),
    Timeout,
    Transport,
}

#[derive(Debug)]
pub struct ScriptedStorage {
    host: HostAddr,
    script: Script,
    calls: Arc<AtomicUsize>,
}

impl ScriptedStorage {
    fn outcome(&self) -> Result<ResponseCommon, RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Succeed => Ok(ResponseCommon::succeeded(100)),
            Script::FailParts(parts) => Ok(ResponseCommon {
                failed_parts: parts.clone(),
                latency_in_us: 100,
            }),
            Script::Timeout => Err(RpcError::Timeout(format!("{} timed out", self.host))),
            Script::Transport => Err(RpcError::Transport(format!("{} reset", self.host))),
        }
    }

    fn part_rows(&self, parts: impl IntoIterator<Item = PartitionID>) -> DataSet {
        let mut parts: Vec<PartitionID> = parts.into_iter().collect();
        parts.sort_unstable();
        DataSet {
            col_names: vec!["host".to_string(), "part".to_string()],
            rows: parts
                .into_iter()
                .map(|p| vec![Value::String(self.host.to_string()), Value::Int(p as i64)])
                .collect(),
        }
    }
}

#[async_trait]
impl GraphStorageService for ScriptedStorage {
    async fn get_neighbors(&self, req: GetNeighborsRequest) -> Result<GetNeighborsResponse, RpcError> {
        let result = self.outcome()?;
        let rows = req.parts.values().flatten().map(|vid| vec![vid.clone()]).collect();
        Ok(GetNeighborsResponse {
            result,
            vertices: DataSet {
                col_names: req.column_names.clone(),
                rows,
            },
        })
    }

    async fn get_props(&self, req: GetPropRequest) -> Result<GetPropResponse, RpcError> {
        let result = self.outcome()?;
        Ok(GetPropResponse {
            result,
            props: DataSet {
                col_names: Vec::new(),
                rows: req.parts.values().flatten().cloned().collect(),
            },
        })
    }

    async fn lookup_index(&self, req: LookupIndexRequest) -> Result<LookupIndexResponse, RpcError> {
        let result = self.outcome()?;
        Ok(LookupIndexResponse {
            result,
            data: self.part_rows(req.parts),
        })
    }

    async fn scan_vertex(&self, req: ScanVertexRequest) -> Result<ScanResponse, RpcError> {
        let result = self.outcome()?;
        Ok(ScanResponse {
            result,
            props: self.part_rows(req.parts.keys().copied()),
            cursors: req.parts,
        })
    }

    async fn scan_edge(&self, req: ScanEdgeRequest) -> Result<ScanResponse, RpcError> {
        let result = self.outcome()?;
        Ok(ScanResponse {
            result,
            props: self.part_rows(req.parts.keys().copied()),
            cursors: req.parts,
        })
    }
}

pub struct StorageFixture {
    pub meta: Arc<MetaCache>,
    pub calls: Arc<AtomicUsize>,
    pub client: GraphStorageClient<ScriptedStorage>,
}

impl StorageFixture {
    /// 需要在 tokio 运行时内创建
    pub fn new(parts: i32, hosts: &[HostAddr], scripts: HashMap<HostAddr, Script>) -> Self {
        let meta = meta_cache(parts, hosts);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let clients = Arc::new(PooledClientManager::new(move |host: &HostAddr, _, _| {
            ScriptedStorage {
                host: host.clone(),
                script: scripts.get(host).cloned().unwrap_or(Script::Succeed),
                calls: counter.clone(),
            }
        }));
        let client = GraphStorageClient::new(
            Handle::current(),
            meta.clone(),
            clients,
            &StorageClientConfig::default(),
        );
        Self {
            meta,
            calls,
            client,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}
