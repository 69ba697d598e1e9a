//! 全表扫描起点，没有更好的策略时使用

use crate::core::types::K_VID;
use crate::core::Expression;
use crate::query::context::ast::{EdgeContext, NodeContext, ScanInfo};
use crate::query::planner::match_planning::match_solver::{MatchSolver, EDGE_RESERVED_PROPS};
use crate::query::planner::match_planning::start_vid_finder::StartVidFinder;
use crate::query::planner::plan::{
    PlanNodeFactory, PlanNodeKind, ScanEdgesNode, ScanVerticesNode, SubPlan,
};
use crate::query::planner::planner::PlannerError;
use crate::query::planner::utils::PlannerUtil;
use crate::query::QueryContext;
use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub struct ScanSeek;

impl StartVidFinder for ScanSeek {
    fn name(&self) -> &'static str {
        "ScanSeek"
    }

    fn match_node(&self, _qctx: &QueryContext, node_ctx: &mut NodeContext<'_>) -> bool {
        node_ctx.scan_info = ScanInfo {
            schema_ids: node_ctx.info.tids.clone(),
            schema_names: node_ctx.info.labels.clone(),
            ..ScanInfo::default()
        };
        true
    }

    /// 无标签时读取所有 tag
    fn transform_node(
        &self,
        qctx: &mut QueryContext,
        node_ctx: &mut NodeContext<'_>,
    ) -> Result<SubPlan, PlannerError> {
        let space_id = node_ctx.space.id;
        let props = if node_ctx.scan_info.schema_ids.is_empty() {
            MatchSolver::all_vertex_props(qctx, space_id)
        } else {
            MatchSolver::vertex_props_of(qctx, space_id, &node_ctx.scan_info.schema_ids)
        };
        let scan = PlanNodeFactory::make(
            qctx,
            PlanNodeKind::ScanVertices(ScanVerticesNode {
                space_id,
                props,
                filter: None,
            }),
            Vec::new(),
            vec![K_VID.to_string()],
        );
        node_ctx.initial_expr = Some(Expression::input_prop(K_VID));
        Ok(SubPlan::single(scan))
    }

    fn match_edge(&self, _qctx: &QueryContext, edge_ctx: &mut EdgeContext<'_>) -> bool {
        let info = edge_ctx.info;
        if info.range.is_some_and(|r| r.min == 0) {
            return false;
        }
        edge_ctx.scan_info = ScanInfo {
            filter: None,
            schema_ids: info.edge_types.clone(),
            schema_names: info.types.clone(),
            direction: info.direction,
        };
        true
    }

    fn transform_edge(
        &self,
        qctx: &mut QueryContext,
        edge_ctx: &mut EdgeContext<'_>,
    ) -> Result<SubPlan, PlannerError> {
        let space_id = edge_ctx.space.id;
        let direction = edge_ctx.scan_info.direction;
        let mut types = edge_ctx.scan_info.schema_ids.clone();
        if types.is_empty() {
            types = qctx
                .schema_manager()
                .list_edge_types(space_id)
                .iter()
                .map(|e| e.edge_type)
                .collect();
            types.sort_unstable();
        }
        let props = types
            .iter()
            .map(|t| {
                let fields: BTreeSet<String> = qctx
                    .schema_manager()
                    .get_edge_type(space_id, *t)
                    .map(|e| e.field_names().into_iter().collect())
                    .unwrap_or_default();
                PlannerUtil::edge_prop(*t, Some(&fields), &EDGE_RESERVED_PROPS)
            })
            .collect();
        let col_names = EDGE_RESERVED_PROPS.iter().map(|c| c.to_string()).collect();
        let scan = PlanNodeFactory::make(
            qctx,
            PlanNodeKind::ScanEdges(ScanEdgesNode {
                space_id,
                props,
                filter: None,
            }),
            Vec::new(),
            col_names,
        );
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

    #[test]
    fn test_scan_all_tags() {
        let mut qctx = create_test_query_context();
        let node = NodeInfo::named("n");
        let (space, where_clause, aliases) = node_ctx_parts(None);
        let mut ctx = NodeContext::new(&space, where_clause.as_ref(), &aliases, &node);

        assert!(ScanSeek.match_node(&qctx, &mut ctx));
        let plan = ScanSeek
            .transform_node(&mut qctx, &mut ctx)
            .expect("Expected planner result to exist");
        let PlanNodeKind::ScanVertices(scan) = qctx.node(plan.root_id().expect("root")).kind()
        else {
            panic!("root should be ScanVertices");
        };
        let tags: Vec<i32> = scan.props.iter().map(|p| p.tag).collect();
        assert_eq!(tags, vec![PERSON, 3]);
    }

    #[test]
    fn test_scan_edges() {
        let mut qctx = create_test_query_context();
        let edge = EdgeInfo::named("e", EdgeDirection::Out).with_type("like", LIKE);
        let (space, where_clause, aliases) = node_ctx_parts(None);
        let mut ctx = EdgeContext::new(&space, where_clause.as_ref(), &aliases, &edge);

        assert!(ScanSeek.match_edge(&qctx, &mut ctx));
        let plan = ScanSeek
            .transform_edge(&mut qctx, &mut ctx)
            .expect("Expected planner result to exist");
        assert_eq!(qctx.node(plan.tail_id().expect("tail")).name(), "ScanEdges");
        assert_eq!(
            qctx.node(plan.root_id().expect("root")).col_names(),
            &["_vid".to_string()]
        );
    }
}
