//! 起点查找策略实现

pub mod argument_finder;
pub mod label_index_seek;
pub mod prop_index_seek;
pub mod scan_seek;
pub mod variable_prop_index_seek;
pub mod variable_vertex_id_seek;
pub mod vertex_id_seek;

pub use argument_finder::ArgumentFinder;
pub use label_index_seek::LabelIndexSeek;
pub use prop_index_seek::PropIndexSeek;
pub use scan_seek::ScanSeek;
pub use variable_prop_index_seek::VariablePropIndexSeek;
pub use variable_vertex_id_seek::VariableVertexIdSeek;
pub use vertex_id_seek::VertexIdSeek;

use crate::core::types::{GraphSpaceID, IndexID, IndexQueryContext};
use crate::core::Expression;
use crate::query::planner::plan::{IndexScanNode, PlanNodeFactory, PlanNodeId, PlanNodeKind};
use crate::query::QueryContext;

/// 单索引、无依赖的索引扫描
pub(crate) fn index_scan(
    qctx: &mut QueryContext,
    space_id: GraphSpaceID,
    schema_id: i32,
    is_edge: bool,
    index_id: IndexID,
    filter: Option<Expression>,
    return_cols: Vec<String>,
) -> PlanNodeId {
    let mut scan = IndexScanNode::new(space_id, schema_id, is_edge);
    scan.contexts.push(IndexQueryContext { index_id, filter });
    scan.return_cols = return_cols.clone();
    scan.dedup = true;
    PlanNodeFactory::make(qctx, PlanNodeKind::IndexScan(scan), Vec::new(), return_cols)
}
