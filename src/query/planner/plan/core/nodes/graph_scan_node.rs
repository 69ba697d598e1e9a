//! 读取存储的图扫描节点

use crate::core::types::{EdgeDirection, EdgeProp, EdgeType, GraphSpaceID, VertexProp};
use crate::core::Expression;

/// 从起点出发获取一跳邻居
#[derive(Debug, Clone, PartialEq)]
pub struct GetNeighborsNode {
    pub space_id: GraphSpaceID,
    pub src: Expression,
    pub edge_types: Vec<EdgeType>,
    pub direction: EdgeDirection,
    pub vertex_props: Vec<VertexProp>,
    pub edge_props: Vec<EdgeProp>,
    pub dedup: bool,
    pub random: bool,
    pub limit: Option<i64>,
    pub filter: Option<Expression>,
}

impl GetNeighborsNode {
    pub fn new(space_id: GraphSpaceID, src: Expression) -> Self {
        Self {
            space_id,
            src,
            edge_types: Vec::new(),
            direction: EdgeDirection::Out,
            vertex_props: Vec::new(),
            edge_props: Vec::new(),
            dedup: false,
            random: false,
            limit: None,
            filter: None,
        }
    }
}

/// 按 ID 获取点属性
#[derive(Debug, Clone, PartialEq)]
pub struct GetVerticesNode {
    pub space_id: GraphSpaceID,
    pub src: Expression,
    pub props: Vec<VertexProp>,
    pub dedup: bool,
}

/// 按边键获取边属性
#[derive(Debug, Clone, PartialEq)]
pub struct GetEdgesNode {
    pub space_id: GraphSpaceID,
    pub src: Expression,
    pub edge_type: Expression,
    pub ranking: Expression,
    pub dst: Expression,
    pub props: Vec<EdgeProp>,
    pub dedup: bool,
}

/// 只取终点 ID 的轻量遍历
#[derive(Debug, Clone, PartialEq)]
pub struct GetDstBySrcNode {
    pub space_id: GraphSpaceID,
    pub src: Expression,
    pub edge_types: Vec<EdgeType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanVerticesNode {
    pub space_id: GraphSpaceID,
    pub props: Vec<VertexProp>,
    pub filter: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanEdgesNode {
    pub space_id: GraphSpaceID,
    pub props: Vec<EdgeProp>,
    pub filter: Option<Expression>,
}
