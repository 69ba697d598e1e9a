//! 以之前子句绑定的值作为索引条件
//!
//! `MATCH (m) ... MATCH (n:person) WHERE n.name == m.name`：每行 `m` 驱动一次索引扫描。

use crate::core::types::{IndexQueryContext, K_VID};
use crate::core::{Expression, ExpressionUtils};
use crate::query::context::ast::{NodeContext, ScanInfo};
use crate::query::planner::match_planning::match_solver::MatchSolver;
use crate::query::planner::match_planning::start_vid_finder::StartVidFinder;
use crate::query::planner::plan::{IndexScanNode, PlanNodeFactory, PlanNodeKind, SubPlan};
use crate::query::planner::planner::PlannerError;
use crate::query::QueryContext;

#[derive(Debug, Default)]
pub struct VariablePropIndexSeek;

impl StartVidFinder for VariablePropIndexSeek {
    fn name(&self) -> &'static str {
        "VariablePropIndexSeek"
    }

    fn match_node(&self, qctx: &QueryContext, node_ctx: &mut NodeContext<'_>) -> bool {
        let info = node_ctx.info;
        let (label, tid) = match (info.labels.as_slice(), info.tids.as_slice()) {
            ([label], [tid]) => (label, *tid),
            _ => return false,
        };
        let Some(filter) = node_ctx.where_filter() else {
            return false;
        };
        let Some((prop, value)) =
            MatchSolver::extract_variable_prop(&info.alias, filter, node_ctx.aliases_available)
        else {
            return false;
        };
        let indexes = qctx.index_manager().tag_indexes_of(node_ctx.space.id, tid);
        if !indexes
            .iter()
            .any(|i| i.fields.first().is_some_and(|f| *f == prop))
        {
            return false;
        }
        let Some(argument) = ExpressionUtils::referenced_labels(&value).into_iter().next() else {
            return false;
        };
        node_ctx.argument_alias = Some(argument);
        node_ctx.scan_info = ScanInfo {
            filter: Some(Expression::eq(
                Expression::tag_prop(label.as_str(), prop.as_str()),
                ExpressionUtils::labels_to_input_props(&value),
            )),
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
        let (Some(argument_alias), Some(&tid), Some(filter)) = (
            node_ctx.argument_alias.as_deref(),
            node_ctx.scan_info.schema_ids.first(),
            node_ctx.scan_info.filter.as_ref(),
        ) else {
            return Err(PlannerError::PlanGenerationFailed(
                "variable prop index seek without matched argument".to_string(),
            ));
        };
        let mut props = std::collections::BTreeSet::new();
        if let Expression::Relational { left, .. } = filter {
            if let Expression::TagProperty { prop, .. } = left.as_ref() {
                props.insert(prop.clone());
            }
        }
        let space_id = node_ctx.space.id;
        let index = qctx
            .index_manager()
            .tag_indexes_of(space_id, tid)
            .into_iter()
            .find(|i| i.fields.first().is_some_and(|f| props.contains(f)))
            .ok_or_else(|| {
                PlannerError::SemanticError("There is no index to use at runtime".to_string())
            })?;

        let argument = PlanNodeFactory::argument(qctx, argument_alias);
        let mut scan = IndexScanNode::new(space_id, tid, false);
        scan.contexts.push(IndexQueryContext {
            index_id: index.id,
            filter: Some(filter.clone()),
        });
        scan.return_cols = vec![K_VID.to_string()];
        scan.dedup = true;
        scan.dynamic = true;
        let scan = PlanNodeFactory::make(
            qctx,
            PlanNodeKind::IndexScan(scan),
            vec![argument],
            vec![K_VID.to_string()],
        );
        node_ctx.initial_expr = Some(Expression::input_prop(K_VID));
        Ok(SubPlan::new(scan, argument))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::context::ast::{AliasType, NodeInfo};
    use crate::query::planner::match_planning::seeks::test_support::{
        create_test_query_context, node_ctx_parts, PERSON,
    };

    #[test]
    fn test_seek_by_bound_value() {
        let mut qctx = create_test_query_context();
        let node = NodeInfo::named("n").with_label("person", PERSON);
        let filter = Expression::eq(
            Expression::label_attr("n", "name"),
            Expression::label_attr("m", "name"),
        );
        let (space, where_clause, mut aliases) = node_ctx_parts(Some(filter));
        aliases.insert("m".to_string(), AliasType::Node);
        let mut ctx = NodeContext::new(&space, where_clause.as_ref(), &aliases, &node);

        assert!(VariablePropIndexSeek.match_node(&qctx, &mut ctx));
        let plan = VariablePropIndexSeek
            .transform_node(&mut qctx, &mut ctx)
            .expect("Expected planner result to exist");
        let tail = plan.tail_id().expect("tail");
        assert_eq!(qctx.node(tail).name(), "Argument");
        let PlanNodeKind::IndexScan(scan) = qctx.node(plan.root_id().expect("root")).kind() else {
            panic!("root should be IndexScan");
        };
        assert!(scan.dynamic);
        assert_eq!(
            scan.contexts[0].filter.as_ref().map(|f| f.to_string()),
            Some("(person.name==$-.m.name)".to_string())
        );
    }

    #[test]
    fn test_unbound_value() {
        let qctx = create_test_query_context();
        let node = NodeInfo::named("n").with_label("person", PERSON);
        let filter = Expression::eq(
            Expression::label_attr("n", "name"),
            Expression::label_attr("m", "name"),
        );
        let (space, where_clause, aliases) = node_ctx_parts(Some(filter));
        let mut ctx = NodeContext::new(&space, where_clause.as_ref(), &aliases, &node);
        assert!(!VariablePropIndexSeek.match_node(&qctx, &mut ctx));
    }
}
