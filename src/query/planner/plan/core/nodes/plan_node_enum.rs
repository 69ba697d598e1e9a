//! 计划节点种类
//!
//! 每个变体携带该算子的参数，依赖关系与变量由 `PlanNode` 统一保存。

use super::control_flow_node::DataCollectKind;
use super::graph_scan_node::{
    GetDstBySrcNode, GetEdgesNode, GetNeighborsNode, GetVerticesNode, ScanEdgesNode,
    ScanVerticesNode,
};
use super::index_nodes::IndexScanNode;
use super::join_node::JoinKeys;
use super::management_node::{AlterSchemaNode, CreateSchemaNode};
use super::plan_node::PlanNodeId;
use super::traversal_node::{
    AllPathsNode, AppendVerticesNode, ExpandAllNode, ExpandNode, ShortestPathNode, SubgraphNode,
    TraverseNode,
};
use crate::core::types::{EdgeProp, VertexProp};
use crate::core::{Expression, YieldColumns};
use crate::query::context::ast::StepClause;
use crate::query::planner::plan::core::explain::Pair;

#[derive(Debug, Clone, PartialEq)]
pub enum PlanNodeKind {
    /// 执行起点，没有依赖
    Start,
    /// 从外层输入读取别名列
    Argument { alias: String },
    PassThrough,

    GetNeighbors(GetNeighborsNode),
    GetVertices(GetVerticesNode),
    GetEdges(GetEdgesNode),
    GetDstBySrc(GetDstBySrcNode),
    IndexScan(IndexScanNode),
    ScanVertices(ScanVerticesNode),
    ScanEdges(ScanEdgesNode),

    Expand(ExpandNode),
    ExpandAll(ExpandAllNode),
    Traverse(TraverseNode),
    AppendVertices(AppendVerticesNode),

    Filter {
        condition: Expression,
        need_stable_filter: bool,
    },
    Project { columns: YieldColumns },
    Dedup,
    Limit { offset: i64, count: Expression },
    Sample { count: Expression },
    Unwind { expr: Expression, alias: String },

    /// `body` 是循环体子图的根，条件为真时重复执行
    Loop { body: PlanNodeId, condition: Expression },
    DataCollect {
        kind: DataCollectKind,
        m_to_n: Option<StepClause>,
        distinct: bool,
    },

    HashInnerJoin(JoinKeys),
    HashLeftJoin(JoinKeys),
    CrossJoin,

    BfsShortestPath(ShortestPathNode),
    MultiShortestPath(ShortestPathNode),
    ProduceAllPaths(AllPathsNode),
    Subgraph(SubgraphNode),

    CreateTag(CreateSchemaNode),
    CreateEdge(CreateSchemaNode),
    AlterTag(AlterSchemaNode),
    AlterEdge(AlterSchemaNode),
}

fn join_exprs(exprs: &[Expression]) -> String {
    exprs
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn vertex_props_str(props: &[VertexProp]) -> String {
    props
        .iter()
        .map(|p| format!("{}:[{}]", p.tag, p.props.join(",")))
        .collect::<Vec<_>>()
        .join(";")
}

fn edge_props_str(props: &[EdgeProp]) -> String {
    props
        .iter()
        .map(|p| format!("{}:[{}]", p.edge_type, p.props.join(",")))
        .collect::<Vec<_>>()
        .join(";")
}

impl PlanNodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            PlanNodeKind::Start => "Start",
            PlanNodeKind::Argument { .. } => "Argument",
            PlanNodeKind::PassThrough => "PassThrough",
            PlanNodeKind::GetNeighbors(_) => "GetNeighbors",
            PlanNodeKind::GetVertices(_) => "GetVertices",
            PlanNodeKind::GetEdges(_) => "GetEdges",
            PlanNodeKind::GetDstBySrc(_) => "GetDstBySrc",
            PlanNodeKind::IndexScan(_) => "IndexScan",
            PlanNodeKind::ScanVertices(_) => "ScanVertices",
            PlanNodeKind::ScanEdges(_) => "ScanEdges",
            PlanNodeKind::Expand(_) => "Expand",
            PlanNodeKind::ExpandAll(_) => "ExpandAll",
            PlanNodeKind::Traverse(_) => "Traverse",
            PlanNodeKind::AppendVertices(_) => "AppendVertices",
            PlanNodeKind::Filter { .. } => "Filter",
            PlanNodeKind::Project { .. } => "Project",
            PlanNodeKind::Dedup => "Dedup",
            PlanNodeKind::Limit { .. } => "Limit",
            PlanNodeKind::Sample { .. } => "Sample",
            PlanNodeKind::Unwind { .. } => "Unwind",
            PlanNodeKind::Loop { .. } => "Loop",
            PlanNodeKind::DataCollect { .. } => "DataCollect",
            PlanNodeKind::HashInnerJoin(_) => "HashInnerJoin",
            PlanNodeKind::HashLeftJoin(_) => "HashLeftJoin",
            PlanNodeKind::CrossJoin => "CrossJoin",
            PlanNodeKind::BfsShortestPath(_) => "BFSShortest",
            PlanNodeKind::MultiShortestPath(_) => "MultiShortestPath",
            PlanNodeKind::ProduceAllPaths(_) => "ProduceAllPaths",
            PlanNodeKind::Subgraph(_) => "Subgraph",
            PlanNodeKind::CreateTag(_) => "CreateTag",
            PlanNodeKind::CreateEdge(_) => "CreateEdge",
            PlanNodeKind::AlterTag(_) => "AlterTag",
            PlanNodeKind::AlterEdge(_) => "AlterEdge",
        }
    }

    /// 创建时沿用第一个依赖的列名
    pub fn inherits_input_col_names(&self) -> bool {
        matches!(
            self,
            PlanNodeKind::Filter { .. }
                | PlanNodeKind::Dedup
                | PlanNodeKind::Limit { .. }
                | PlanNodeKind::Sample { .. }
                | PlanNodeKind::PassThrough
        )
    }

    /// 没有上游依赖也能执行的节点
    pub fn is_leaf(&self) -> bool {
        matches!(self, PlanNodeKind::Start | PlanNodeKind::Argument { .. })
    }

    pub fn is_join(&self) -> bool {
        matches!(
            self,
            PlanNodeKind::HashInnerJoin(_) | PlanNodeKind::HashLeftJoin(_) | PlanNodeKind::CrossJoin
        )
    }

    /// explain 输出中的参数描述
    pub fn describe(&self) -> Vec<Pair> {
        let mut desc = Vec::new();
        match self {
            PlanNodeKind::Start | PlanNodeKind::PassThrough | PlanNodeKind::Dedup => {}
            PlanNodeKind::CrossJoin => {}
            PlanNodeKind::Argument { alias } => desc.push(Pair::new("inputVar", alias.as_str())),
            PlanNodeKind::GetNeighbors(gn) => {
                desc.push(Pair::new("space", gn.space_id.to_string()));
                desc.push(Pair::new("src", gn.src.to_string()));
                desc.push(Pair::new("direction", gn.direction.to_string()));
                desc.push(Pair::new("vertexProps", vertex_props_str(&gn.vertex_props)));
                desc.push(Pair::new("edgeProps", edge_props_str(&gn.edge_props)));
                desc.push(Pair::new("dedup", gn.dedup.to_string()));
                if let Some(limit) = gn.limit {
                    desc.push(Pair::new("limit", limit.to_string()));
                }
                if let Some(filter) = &gn.filter {
                    desc.push(Pair::new("filter", filter.to_string()));
                }
            }
            PlanNodeKind::GetVertices(gv) => {
                desc.push(Pair::new("space", gv.space_id.to_string()));
                desc.push(Pair::new("src", gv.src.to_string()));
                desc.push(Pair::new("props", vertex_props_str(&gv.props)));
                desc.push(Pair::new("dedup", gv.dedup.to_string()));
            }
            PlanNodeKind::GetEdges(ge) => {
                desc.push(Pair::new("space", ge.space_id.to_string()));
                desc.push(Pair::new("src", ge.src.to_string()));
                desc.push(Pair::new("type", ge.edge_type.to_string()));
                desc.push(Pair::new("ranking", ge.ranking.to_string()));
                desc.push(Pair::new("dst", ge.dst.to_string()));
                desc.push(Pair::new("props", edge_props_str(&ge.props)));
            }
            PlanNodeKind::GetDstBySrc(gd) => {
                desc.push(Pair::new("space", gd.space_id.to_string()));
                desc.push(Pair::new("src", gd.src.to_string()));
                desc.push(Pair::new("edgeTypes", format!("{:?}", gd.edge_types)));
            }
            PlanNodeKind::IndexScan(scan) => {
                desc.push(Pair::new("space", scan.space_id.to_string()));
                desc.push(Pair::new("schemaId", scan.schema_id.to_string()));
                desc.push(Pair::new("isEdge", scan.is_edge.to_string()));
                let filters = scan
                    .contexts
                    .iter()
                    .map(|c| match &c.filter {
                        Some(f) => format!("{}:{}", c.index_id, f),
                        None => c.index_id.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(";");
                desc.push(Pair::new("indexCtx", filters));
                desc.push(Pair::new("returnCols", scan.return_cols.join(",")));
            }
            PlanNodeKind::ScanVertices(scan) => {
                desc.push(Pair::new("space", scan.space_id.to_string()));
                desc.push(Pair::new("props", vertex_props_str(&scan.props)));
            }
            PlanNodeKind::ScanEdges(scan) => {
                desc.push(Pair::new("space", scan.space_id.to_string()));
                desc.push(Pair::new("props", edge_props_str(&scan.props)));
            }
            PlanNodeKind::Expand(expand) => {
                desc.push(Pair::new("space", expand.space_id.to_string()));
                desc.push(Pair::new("src", expand.src.to_string()));
                desc.push(Pair::new("stepLimit", expand.step_limit.to_string()));
                desc.push(Pair::new("edgeProps", edge_props_str(&expand.edge_props)));
            }
            PlanNodeKind::ExpandAll(expand) => {
                desc.push(Pair::new("space", expand.space_id.to_string()));
                desc.push(Pair::new(
                    "steps",
                    format!("{}..{}", expand.min_steps, expand.max_steps),
                ));
                desc.push(Pair::new("edgeProps", edge_props_str(&expand.edge_props)));
                desc.push(Pair::new("vertexProps", vertex_props_str(&expand.vertex_props)));
            }
            PlanNodeKind::Traverse(traverse) => {
                desc.push(Pair::new("src", traverse.src.to_string()));
                desc.push(Pair::new(
                    "steps",
                    format!("{}..{}", traverse.step_range.min, traverse.step_range.max),
                ));
                desc.push(Pair::new("direction", traverse.direction.to_string()));
                desc.push(Pair::new("edgeProps", edge_props_str(&traverse.edge_props)));
                if let Some(filter) = &traverse.edge_filter {
                    desc.push(Pair::new("edgeFilter", filter.to_string()));
                }
            }
            PlanNodeKind::AppendVertices(av) => {
                desc.push(Pair::new("src", av.src.to_string()));
                desc.push(Pair::new("props", vertex_props_str(&av.props)));
                if let Some(filter) = &av.vertex_filter {
                    desc.push(Pair::new("vertexFilter", filter.to_string()));
                }
            }
            PlanNodeKind::Filter { condition, .. } => {
                desc.push(Pair::new("condition", condition.to_string()))
            }
            PlanNodeKind::Project { columns } => {
                desc.push(Pair::new("columns", columns.to_string()))
            }
            PlanNodeKind::Limit { offset, count } => {
                desc.push(Pair::new("offset", offset.to_string()));
                desc.push(Pair::new("count", count.to_string()));
            }
            PlanNodeKind::Sample { count } => desc.push(Pair::new("count", count.to_string())),
            PlanNodeKind::Unwind { expr, alias } => {
                desc.push(Pair::new("unwind", expr.to_string()));
                desc.push(Pair::new("alias", alias.as_str()));
            }
            PlanNodeKind::Loop { body, condition } => {
                desc.push(Pair::new("loopBody", body.to_string()));
                desc.push(Pair::new("condition", condition.to_string()));
            }
            PlanNodeKind::DataCollect { kind, m_to_n, distinct } => {
                desc.push(Pair::new("kind", kind.to_string()));
                if let Some(steps) = m_to_n {
                    desc.push(Pair::new("steps", steps.to_string()));
                }
                desc.push(Pair::new("distinct", distinct.to_string()));
            }
            PlanNodeKind::HashInnerJoin(keys) | PlanNodeKind::HashLeftJoin(keys) => {
                desc.push(Pair::new("hashKeys", join_exprs(&keys.hash_keys)));
                desc.push(Pair::new("probeKeys", join_exprs(&keys.probe_keys)));
            }
            PlanNodeKind::BfsShortestPath(sp) | PlanNodeKind::MultiShortestPath(sp) => {
                desc.push(Pair::new("steps", sp.steps.to_string()));
                desc.push(Pair::new("leftVidVar", sp.left_vid_var.as_str()));
                desc.push(Pair::new("rightVidVar", sp.right_vid_var.as_str()));
                if let Some(var) = &sp.termination_var {
                    desc.push(Pair::new("terminationVar", var.as_str()));
                }
            }
            PlanNodeKind::ProduceAllPaths(ap) => {
                desc.push(Pair::new("steps", ap.steps.to_string()));
                desc.push(Pair::new("noLoop", ap.no_loop.to_string()));
                desc.push(Pair::new("leftVidVar", ap.left_vid_var.as_str()));
                desc.push(Pair::new("rightVidVar", ap.right_vid_var.as_str()));
            }
            PlanNodeKind::Subgraph(sg) => {
                desc.push(Pair::new("src", sg.src.to_string()));
                desc.push(Pair::new("steps", sg.steps.to_string()));
                desc.push(Pair::new("edgeProps", edge_props_str(&sg.edge_props)));
            }
            PlanNodeKind::CreateTag(node) | PlanNodeKind::CreateEdge(node) => {
                desc.push(Pair::new("name", node.name.as_str()));
                desc.push(Pair::new("ifNotExist", node.if_not_exist.to_string()));
            }
            PlanNodeKind::AlterTag(node) | PlanNodeKind::AlterEdge(node) => {
                desc.push(Pair::new("name", node.name.as_str()));
                desc.push(Pair::new("items", node.items.len().to_string()));
            }
        }
        desc
    }
}
