//! 属性索引起点
//!
//! 带单个标签的节点（或单一类型的边），其内联属性或 WHERE 条件能下推为索引过滤时，
//! 用索引扫描产出起点。

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
pub struct PropIndexSeek;

fn no_index(name: &str) -> PlannerError {
    PlannerError::SemanticError(format!("No valid index found for `{}'", name))
}

impl StartVidFinder for PropIndexSeek {
    fn name(&self) -> &'static str {
        "PropIndexSeek"
    }

    fn match_node(&self, qctx: &QueryContext, node_ctx: &mut NodeContext<'_>) -> bool {
        let info = node_ctx.info;
        let (label, tid) = match (info.labels.as_slice(), info.tids.as_slice()) {
            ([label], [tid]) => (label, *tid),
            _ => return false,
        };
        let filter = if info.props.is_empty() {
            node_ctx
                .where_filter()
                .and_then(|f| MatchSolver::make_index_filter(label, &info.alias, f, false))
        } else {
            MatchSolver::make_index_filter_from_props(label, &info.props, false)
        };
        let Some(filter) = filter else {
            return false;
        };
        if MatchSolver::pick_index(qctx, node_ctx.space.id, tid, false, Some(&filter)).is_none() {
            return false;
        }
        node_ctx.scan_info = ScanInfo {
            filter: Some(filter),
            schema_ids: vec![tid],
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
        let scan_info = &node_ctx.scan_info;
        let (Some(&tid), Some(label)) = (scan_info.schema_ids.first(), scan_info.schema_names.first())
        else {
            return Err(PlannerError::PlanGenerationFailed(
                "prop index seek without matched tag".to_string(),
            ));
        };
        let space_id = node_ctx.space.id;
        let filter = scan_info.filter.clone();
        let index = MatchSolver::pick_index(qctx, space_id, tid, false, filter.as_ref())
            .ok_or_else(|| no_index(label))?;
        log::debug!("Seek `{}' by index `{}'", node_ctx.info.alias, index.name);

        let scan = index_scan(
            qctx,
            space_id,
            tid,
            false,
            index.id,
            filter,
            vec![K_VID.to_string()],
        );
        node_ctx.initial_expr = Some(Expression::input_prop(K_VID));
        Ok(SubPlan::single(scan))
    }

    /// 只接受单一边类型且最少一跳的边
    fn match_edge(&self, qctx: &QueryContext, edge_ctx: &mut EdgeContext<'_>) -> bool {
        let info = edge_ctx.info;
        let (label, edge_type) = match (info.types.as_slice(), info.edge_types.as_slice()) {
            ([label], [edge_type]) => (label, *edge_type),
            _ => return false,
        };
        if info.range.is_some_and(|r| r.min == 0) {
            return false;
        }
        let filter = if info.props.is_empty() {
            edge_ctx
                .where_filter()
                .and_then(|f| MatchSolver::make_index_filter(label, &info.alias, f, true))
        } else {
            MatchSolver::make_index_filter_from_props(label, &info.props, true)
        };
        let Some(filter) = filter else {
            return false;
        };
        if MatchSolver::pick_index(qctx, edge_ctx.space.id, edge_type, true, Some(&filter))
            .is_none()
        {
            return false;
        }
        edge_ctx.scan_info = ScanInfo {
            filter: Some(filter),
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
        let scan_info = &edge_ctx.scan_info;
        let (Some(&edge_type), Some(label)) =
            (scan_info.schema_ids.first(), scan_info.schema_names.first())
        else {
            return Err(PlannerError::PlanGenerationFailed(
                "prop index seek without matched edge type".to_string(),
            ));
        };
        let space_id = edge_ctx.space.id;
        let filter = scan_info.filter.clone();
        let direction = scan_info.direction;
        let index = MatchSolver::pick_index(qctx, space_id, edge_type, true, filter.as_ref())
            .ok_or_else(|| no_index(label))?;

        let return_cols = [K_SRC, K_TYPE, K_RANK, K_DST]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let scan = index_scan(qctx, space_id, edge_type, true, index.id, filter, return_cols);
        let root = MatchSolver::edge_start(qctx, scan, direction);
        edge_ctx.initial_expr = Some(Expression::input_prop(K_VID));
        Ok(SubPlan::new(root, scan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EdgeDirection;
    use crate::core::{RelationalOperator, Value};
    use crate::query::context::ast::{EdgeInfo, NodeInfo};
    use crate::query::planner::match_planning::seeks::test_support::{
        create_test_query_context, node_ctx_parts, LIKE, PERSON,
    };
    use crate::query::planner::plan::PlanNodeKind;

    #[test]
    fn test_node_props_filter_wins_over_where() {
        let mut qctx = create_test_query_context();
        let node = NodeInfo::named("n")
            .with_label("person", PERSON)
            .with_props(vec![("name".to_string(), Expression::constant("Tim"))]);
        let filter = Expression::relational(
            RelationalOperator::Gt,
            Expression::label_attr("n", "age"),
            Expression::constant(3),
        );
        let (space, where_clause, aliases) = node_ctx_parts(Some(filter));
        let mut ctx = NodeContext::new(&space, where_clause.as_ref(), &aliases, &node);

        assert!(PropIndexSeek.match_node(&qctx, &mut ctx));
        let plan = PropIndexSeek
            .transform_node(&mut qctx, &mut ctx)
            .expect("Expected planner result to exist");
        let PlanNodeKind::IndexScan(scan) = qctx.node(plan.root_id().expect("root")).kind() else {
            panic!("root should be IndexScan");
        };
        assert_eq!(scan.contexts[0].index_id, 10);
        assert_eq!(
            scan.contexts[0].filter,
            Some(Expression::eq(
                Expression::tag_prop("person", "name"),
                Expression::Constant(Value::from("Tim"))
            ))
        );
        assert_eq!(scan.return_cols, vec!["_vid"]);
    }

    #[test]
    fn test_node_without_index_filter() {
        let qctx = create_test_query_context();
        let node = NodeInfo::named("n").with_label("person", PERSON);
        let (space, where_clause, aliases) = node_ctx_parts(None);
        let mut ctx = NodeContext::new(&space, where_clause.as_ref(), &aliases, &node);
        assert!(!PropIndexSeek.match_node(&qctx, &mut ctx));
    }

    fn like_edge() -> EdgeInfo {
        EdgeInfo::named("e", EdgeDirection::In)
            .with_type("like", LIKE)
            .with_props(vec![("likeness".to_string(), Expression::constant(90))])
    }

    #[test]
    fn test_edge_seek() {
        let mut qctx = create_test_query_context();
        let edge = like_edge();
        let (space, where_clause, aliases) = node_ctx_parts(None);
        let mut ctx = EdgeContext::new(&space, where_clause.as_ref(), &aliases, &edge);

        assert!(PropIndexSeek.match_edge(&qctx, &mut ctx));
        let plan = PropIndexSeek
            .transform_edge(&mut qctx, &mut ctx)
            .expect("Expected planner result to exist");
        let root = plan.root_id().expect("root");
        assert_eq!(qctx.node(root).name(), "Dedup");
        let project = qctx.node(root).deps()[0];
        let PlanNodeKind::Project { columns } = qctx.node(project).kind() else {
            panic!("expected Project");
        };
        assert_eq!(columns.to_string(), "$-._dst AS _vid");
        assert_eq!(qctx.node(plan.tail_id().expect("tail")).name(), "IndexScan");
    }

    #[test]
    fn test_edge_refusals() {
        let qctx = create_test_query_context();
        let (space, where_clause, aliases) = node_ctx_parts(None);

        let zero_hop = like_edge().with_range(0, 2);
        let mut ctx = EdgeContext::new(&space, where_clause.as_ref(), &aliases, &zero_hop);
        assert!(!PropIndexSeek.match_edge(&qctx, &mut ctx));

        let two_types = like_edge().with_type("serve", 6);
        let mut ctx = EdgeContext::new(&space, where_clause.as_ref(), &aliases, &two_types);
        assert!(!PropIndexSeek.match_edge(&qctx, &mut ctx));
    }
}
