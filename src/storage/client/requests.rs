//! 图存储服务的请求与响应

use crate::core::types::{
    EdgeDirection, EdgeProp, EdgeType, GraphSpaceID, IndexQueryContext, PartitionID, ScanCursor,
    VertexProp,
};
use crate::core::{Expression, Value};
use crate::storage::client::response::{ResponseCommon, StorageRequest, StorageResponse};
use std::collections::HashMap;

/// 存储端返回的行集合
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    pub col_names: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// 邻居查询的公共参数，分区信息由客户端按 leader 填充
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraverseSpec {
    pub edge_types: Vec<EdgeType>,
    pub edge_direction: EdgeDirection,
    pub vertex_props: Vec<VertexProp>,
    pub edge_props: Vec<EdgeProp>,
    pub dedup: bool,
    pub random: bool,
    pub limit: Option<i64>,
    pub filter: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetNeighborsRequest {
    pub space_id: GraphSpaceID,
    pub column_names: Vec<String>,
    pub parts: HashMap<PartitionID, Vec<Value>>,
    pub traverse_spec: TraverseSpec,
}

impl StorageRequest for GetNeighborsRequest {
    fn space_id(&self) -> GraphSpaceID {
        self.space_id
    }

    fn part_ids(&self) -> Vec<PartitionID> {
        self.parts.keys().copied().collect()
    }
}

/// 取点属性时每行为 `[vid]`，取边属性时每行为 `[src, type, rank, dst]`
#[derive(Debug, Clone, PartialEq)]
pub struct GetPropRequest {
    pub space_id: GraphSpaceID,
    pub parts: HashMap<PartitionID, Vec<Vec<Value>>>,
    pub vertex_props: Option<Vec<VertexProp>>,
    pub edge_props: Option<Vec<EdgeProp>>,
    pub dedup: bool,
    pub limit: Option<i64>,
    pub filter: Option<Expression>,
}

impl StorageRequest for GetPropRequest {
    fn space_id(&self) -> GraphSpaceID {
        self.space_id
    }

    fn part_ids(&self) -> Vec<PartitionID> {
        self.parts.keys().copied().collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LookupIndexRequest {
    pub space_id: GraphSpaceID,
    pub parts: Vec<PartitionID>,
    pub is_edge: bool,
    pub schema_id: i32,
    pub contexts: Vec<IndexQueryContext>,
    pub return_columns: Vec<String>,
    pub limit: Option<i64>,
}

impl StorageRequest for LookupIndexRequest {
    fn space_id(&self) -> GraphSpaceID {
        self.space_id
    }

    fn part_ids(&self) -> Vec<PartitionID> {
        self.parts.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanVertexRequest {
    pub space_id: GraphSpaceID,
    pub parts: HashMap<PartitionID, ScanCursor>,
    pub return_columns: Vec<VertexProp>,
    pub limit: i64,
    pub filter: Option<Expression>,
}

impl StorageRequest for ScanVertexRequest {
    fn space_id(&self) -> GraphSpaceID {
        self.space_id
    }

    fn part_ids(&self) -> Vec<PartitionID> {
        self.parts.keys().copied().collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanEdgeRequest {
    pub space_id: GraphSpaceID,
    pub parts: HashMap<PartitionID, ScanCursor>,
    pub return_columns: Vec<EdgeProp>,
    pub limit: i64,
    pub filter: Option<Expression>,
}

impl StorageRequest for ScanEdgeRequest {
    fn space_id(&self) -> GraphSpaceID {
        self.space_id
    }

    fn part_ids(&self) -> Vec<PartitionID> {
        self.parts.keys().copied().collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetNeighborsResponse {
    pub result: ResponseCommon,
    pub vertices: DataSet,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetPropResponse {
    pub result: ResponseCommon,
    pub props: DataSet,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupIndexResponse {
    pub result: ResponseCommon,
    pub data: DataSet,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanResponse {
    pub result: ResponseCommon,
    pub props: DataSet,
    pub cursors: HashMap<PartitionID, ScanCursor>,
}

impl StorageResponse for GetNeighborsResponse {
    fn result(&self) -> &ResponseCommon {
        &self.result
    }
}

impl StorageResponse for GetPropResponse {
    fn result(&self) -> &ResponseCommon {
        &self.result
    }
}

impl StorageResponse for LookupIndexResponse {
    fn result(&self) -> &ResponseCommon {
        &self.result
    }
}

impl StorageResponse for ScanResponse {
    fn result(&self) -> &ResponseCommon {
        &self.result
    }
}
