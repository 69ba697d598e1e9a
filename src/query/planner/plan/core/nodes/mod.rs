//! 计划节点定义

pub mod control_flow_node;
pub mod factory;
pub mod graph_scan_node;
pub mod index_nodes;
pub mod join_node;
pub mod management_node;
pub mod plan_node;
pub mod plan_node_enum;
pub mod traversal_node;

pub use control_flow_node::DataCollectKind;
pub use factory::PlanNodeFactory;
pub use graph_scan_node::{
    GetDstBySrcNode, GetEdgesNode, GetNeighborsNode, GetVerticesNode, ScanEdgesNode,
    ScanVerticesNode,
};
pub use index_nodes::IndexScanNode;
pub use join_node::JoinKeys;
pub use management_node::{AlterSchemaNode, CreateSchemaNode};
pub use plan_node::{PlanNode, PlanNodeId};
pub use plan_node_enum::PlanNodeKind;
pub use traversal_node::{
    AllPathsNode, AppendVerticesNode, ExpandAllNode, ExpandNode, ShortestPathNode, SubgraphNode,
    TraverseNode,
};
