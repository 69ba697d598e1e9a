//! 多跳遍历与路径算法节点

use crate::core::types::{EdgeDirection, EdgeProp, EdgeType, GraphSpaceID, VertexProp};
use crate::core::{Expression, YieldColumns};
use crate::query::context::ast::MatchStepRange;

/// GO 多步遍历的前 n-1 步，只保留终点
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandNode {
    pub space_id: GraphSpaceID,
    pub src: Expression,
    pub edge_props: Vec<EdgeProp>,
    pub step_limit: u32,
    pub sample: bool,
    pub limits: Vec<i64>,
    pub join_input: bool,
}

/// GO 多步遍历的最后若干步，带出属性
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandAllNode {
    pub space_id: GraphSpaceID,
    pub min_steps: u32,
    pub max_steps: u32,
    pub edge_props: Vec<EdgeProp>,
    pub vertex_props: Vec<VertexProp>,
    pub edge_columns: YieldColumns,
    pub vertex_columns: YieldColumns,
    pub sample: bool,
    pub limits: Vec<i64>,
    pub join_input: bool,
}

/// MATCH 中沿一条模式边展开
#[derive(Debug, Clone, PartialEq)]
pub struct TraverseNode {
    pub space_id: GraphSpaceID,
    pub src: Expression,
    pub vertex_props: Vec<VertexProp>,
    pub edge_props: Vec<EdgeProp>,
    pub vertex_filter: Option<Expression>,
    pub edge_filter: Option<Expression>,
    pub step_range: MatchStepRange,
    pub direction: EdgeDirection,
    pub dedup: bool,
    pub track_prev_path: bool,
}

/// 为遍历结果补齐终点
#[derive(Debug, Clone, PartialEq)]
pub struct AppendVerticesNode {
    pub space_id: GraphSpaceID,
    pub src: Expression,
    pub props: Vec<VertexProp>,
    pub vertex_filter: Option<Expression>,
    pub dedup: bool,
    pub track_prev_path: bool,
}

/// 双向 BFS 最短路径
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathNode {
    pub steps: u32,
    pub left_vid_var: String,
    pub right_vid_var: String,
    /// 多源多汇时记录已完成的起终点对
    pub termination_var: Option<String>,
    pub single_shortest: bool,
    pub limit: Option<i64>,
}

/// 全路径
#[derive(Debug, Clone, PartialEq)]
pub struct AllPathsNode {
    pub steps: u32,
    pub no_loop: bool,
    pub left_vid_var: String,
    pub right_vid_var: String,
    pub limit: Option<i64>,
}

/// 子图
#[derive(Debug, Clone, PartialEq)]
pub struct SubgraphNode {
    pub space_id: GraphSpaceID,
    pub src: Expression,
    pub steps: u32,
    pub vertex_props: Vec<VertexProp>,
    pub edge_props: Vec<EdgeProp>,
    pub bi_direct_edge_types: Vec<EdgeType>,
    pub filter: Option<Expression>,
    pub tag_filter: Option<Expression>,
    pub edge_filter: Option<Expression>,
}
