//! 之前的子句已经绑定的节点直接作为起点

use crate::core::Expression;
use crate::query::context::ast::NodeContext;
use crate::query::planner::match_planning::start_vid_finder::StartVidFinder;
use crate::query::planner::plan::{PlanNodeFactory, SubPlan};
use crate::query::planner::planner::PlannerError;
use crate::query::QueryContext;

#[derive(Debug, Default)]
pub struct ArgumentFinder;

impl StartVidFinder for ArgumentFinder {
    fn name(&self) -> &'static str {
        "ArgumentFinder"
    }

    fn match_node(&self, _qctx: &QueryContext, node_ctx: &mut NodeContext<'_>) -> bool {
        let info = node_ctx.info;
        !info.anonymous && node_ctx.aliases_available.contains_key(&info.alias)
    }

    fn transform_node(
        &self,
        qctx: &mut QueryContext,
        node_ctx: &mut NodeContext<'_>,
    ) -> Result<SubPlan, PlannerError> {
        let alias = node_ctx.info.alias.as_str();
        let argument = PlanNodeFactory::argument(qctx, alias);
        node_ctx.argument_alias = Some(alias.to_string());
        node_ctx.initial_expr = Some(Expression::input_prop(alias));
        Ok(SubPlan::single(argument))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::context::ast::{AliasType, NodeInfo};
    use crate::query::planner::match_planning::seeks::test_support::{
        create_test_query_context, node_ctx_parts,
    };

    #[test]
    fn test_bound_alias() {
        let mut qctx = create_test_query_context();
        let node = NodeInfo::named("v");
        let (space, where_clause, mut aliases) = node_ctx_parts(None);
        aliases.insert("v".to_string(), AliasType::Node);
        let mut ctx = NodeContext::new(&space, where_clause.as_ref(), &aliases, &node);

        assert!(ArgumentFinder.match_node(&qctx, &mut ctx));
        let plan = ArgumentFinder
            .transform_node(&mut qctx, &mut ctx)
            .expect("Expected planner result to exist");
        let root = plan.root_id().expect("root");
        assert_eq!(qctx.node(root).name(), "Argument");
        assert_eq!(qctx.node(root).col_names(), &["v".to_string()]);
        assert_eq!(ctx.initial_expr.expect("initial").to_string(), "$-.v");
    }

    #[test]
    fn test_anonymous_node_never_bound() {
        let qctx = create_test_query_context();
        let node = NodeInfo::anonymous("__anon_0");
        let (space, where_clause, mut aliases) = node_ctx_parts(None);
        aliases.insert("__anon_0".to_string(), AliasType::Node);
        let mut ctx = NodeContext::new(&space, where_clause.as_ref(), &aliases, &node);
        assert!(!ArgumentFinder.match_node(&qctx, &mut ctx));
    }
}
