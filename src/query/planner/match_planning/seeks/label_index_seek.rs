//! 标签索引起点：只有标签没有可下推条件时，用标签上的索引扫描全部点

use crate::core::types::{K_DST, K_RANK, K_SRC, K_TYPE, K_VID};
use crate::core::Expression;
use crate::query::context::ast::{EdgeContext, NodeContext, ScanInfo};
use crate::query::planner::match_planning::match_solver::MatchSolver;
use crate::query::planner::match_planning::seeks::index_scan;
use crate::query::planner::match_planning::start_vid_finder::StartVidFinder;
use crate::query::planner::plan::SubPlan;
use crate::query::planner::planner::PlannerError;
use crate::query::QueryContext;

#[derive(Debug, Default)]
pub struct LabelIndexSeek;

fn unmatched() -> PlannerError {
    PlannerError::PlanGenerationFailed("label index seek without matched schema".to_string())
}

impl StartVidFinder for LabelIndexSeek {
    fn name(&self) -> &'static str {
        "LabelIndexSeek"
    }

    /// 取第一个建有索引的标签
    fn match_node(&self, qctx: &QueryContext, node_ctx: &mut NodeContext<'_>) -> bool {
        let info = node_ctx.info;
        let space_id = node_ctx.space.id;
        let hit = info
            .labels
            .iter()
            .zip(info.tids.iter())
            .find(|(_, tid)| MatchSolver::pick_index(qctx, space_id, **tid, false, None).is_some());
        let Some((label, tid)) = hit else {
            return false;
        };
        node_ctx.scan_info = ScanInfo {
            schema_ids: vec![*tid],
            schema_names: vec![label.clone()],
            ..ScanInfo::default()
        };
        true
    }

    fn transform_node(
        &self,
        qctx: &mut QueryContext,
        node_ctx: &mut NodeContext<'_>,
    ) -> Result<SubPlan, PlannerError> {
        let tid = *node_ctx.scan_info.schema_ids.first().ok_or_else(unmatched)?;
        let space_id = node_ctx.space.id;
        let index = MatchSolver::pick_index(qctx, space_id, tid, false, None).ok_or_else(unmatched)?;
        let scan = index_scan(qctx, space_id, tid, false, index.id, None, vec![K_VID.to_string()]);
        node_ctx.initial_expr = Some(Expression::input_prop(K_VID));
        Ok(SubPlan::single(scan))
    }

    fn match_edge(&self, qctx: &QueryContext, edge_ctx: &mut EdgeContext<'_>) -> bool {
        let info = edge_ctx.info;
        let (label, edge_type) = match (info.types.as_slice(), info.edge_types.as_slice()) {
            ([label], [edge_type]) => (label, *edge_type),
            _ => return false,
        };
        if info.range.is_some_and(|r| r.min == 0) {
            return false;
        }
        if MatchSolver::pick_index(qctx, edge_ctx.space.id, edge_type, true, None).is_none() {
            return false;
        }
        edge_ctx.scan_info = ScanInfo {
            filter: None,
            schema_ids: vec![edge_type],
            schema_names: vec![label.clone()],
            direction: info.direction,
        };
        true
    }

    fn transform_edge(
        &self,
        qctx: &mut QueryContext,
        edge_ctx: &mut EdgeContext<'_>,
    ) -> Result<SubPlan, PlannerError> {
        let edge_type = *edge_ctx.scan_info.schema_ids.first().ok_or_else(unmatched)?;
        let direction = edge_ctx.scan_info.direction;
        let space_id = edge_ctx.space.id;
        let index =
            MatchSolver::pick_index(qctx, space_id, edge_type, true, None).ok_or_else(unmatched)?;
        let return_cols = [K_SRC, K_TYPE, K_RANK, K_DST]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let scan = index_scan(qctx, space_id, edge_type, true, index.id, None, return_cols);
        let root = MatchSolver::edge_start(qctx, scan, direction);
        edge_ctx.initial_expr = Some(Expression::input_prop(K_VID));
        Ok(SubPlan::new(root, scan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EdgeDirection;
    use crate::query::context::ast::{EdgeInfo, NodeInfo};
    use crate::query::planner::match_planning::seeks::test_support::{
        create_test_query_context, node_ctx_parts, LIKE, PERSON,
    };
    use crate::query::planner::plan::PlanNodeKind;

    #[test]
    fn test_first_indexed_label() {
        let mut qctx = create_test_query_context();
        let node = NodeInfo::named("n")
            .with_label("team", 3)
            .with_label("person", PERSON);
        let (space, where_clause, aliases) = node_ctx_parts(None);
        let mut ctx = NodeContext::new(&space, where_clause.as_ref(), &aliases, &node);

        assert!(LabelIndexSeek.match_node(&qctx, &mut ctx));
        assert_eq!(ctx.scan_info.schema_names, vec!["person"]);
        let plan = LabelIndexSeek
            .transform_node(&mut qctx, &mut ctx)
            .expect("Expected planner result to exist");
        let PlanNodeKind::IndexScan(scan) = qctx.node(plan.root_id().expect("root")).kind() else {
            panic!("root should be IndexScan");
        };
        assert_eq!(scan.schema_id, PERSON);
        assert!(scan.contexts[0].filter.is_none());
    }

    #[test]
    fn test_unlabelled_node() {
        let qctx = create_test_query_context();
        let node = NodeInfo::named("n");
        let (space, where_clause, aliases) = node_ctx_parts(None);
        let mut ctx = NodeContext::new(&space, where_clause.as_ref(), &aliases, &node);
        assert!(!LabelIndexSeek.match_node(&qctx, &mut ctx));
    }

    #[test]
    fn test_edge_both_directions() {
        let mut qctx = create_test_query_context();
        let edge = EdgeInfo::named("e", EdgeDirection::Both).with_type("like", LIKE);
        let (space, where_clause, aliases) = node_ctx_parts(None);
        let mut ctx = EdgeContext::new(&space, where_clause.as_ref(), &aliases, &edge);

        assert!(LabelIndexSeek.match_edge(&qctx, &mut ctx));
        let plan = LabelIndexSeek
            .transform_edge(&mut qctx, &mut ctx)
            .expect("Expected planner result to exist");
        let unwind = qctx.node(plan.root_id().expect("root")).deps()[0];
        assert_eq!(qctx.node(unwind).name(), "Unwind");
        assert_eq!(qctx.node(unwind).col_names(), &["_vid".to_string()]);
    }
}
