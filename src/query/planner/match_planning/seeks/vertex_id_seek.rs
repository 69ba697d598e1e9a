//! 常量点 ID 起点
//!
//! WHERE 中出现 `id(n) == "a"` 或 `id(n) IN [...]` 时，点 ID 在规划期就已确定。

use crate::core::types::K_VID;
use crate::core::{Expression, Value};
use crate::query::context::ast::NodeContext;
use crate::query::planner::match_planning::match_solver::MatchSolver;
use crate::query::planner::match_planning::start_vid_finder::StartVidFinder;
use crate::query::planner::plan::{PlanNodeFactory, SubPlan};
use crate::query::planner::planner::PlannerError;
use crate::query::QueryContext;

#[derive(Debug, Default)]
pub struct VertexIdSeek;

impl StartVidFinder for VertexIdSeek {
    fn name(&self) -> &'static str {
        "VertexIdSeek"
    }

    fn match_node(&self, _qctx: &QueryContext, node_ctx: &mut NodeContext<'_>) -> bool {
        let Some(filter) = node_ctx.where_filter() else {
            return false;
        };
        if node_ctx.info.alias.is_empty() {
            return false;
        }
        match MatchSolver::extract_vids(&node_ctx.info.alias, filter) {
            Some(ids) if !ids.is_empty() => {
                node_ctx.ids = ids;
                true
            }
            _ => false,
        }
    }

    /// 点 ID 写入匿名变量，由 PassThrough 输出
    fn transform_node(
        &self,
        qctx: &mut QueryContext,
        node_ctx: &mut NodeContext<'_>,
    ) -> Result<SubPlan, PlannerError> {
        let vids_var = qctx.anon_var();
        qctx.set_value(&vids_var, Value::List(node_ctx.ids.clone()));

        let pass_through = PlanNodeFactory::pass_through(qctx, None);
        qctx.set_output_var(pass_through, &vids_var);
        qctx.set_col_names(pass_through, vec![K_VID.to_string()]);

        node_ctx.initial_expr = Some(Expression::input_prop(K_VID));
        Ok(SubPlan::single(pass_through))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::planner::match_planning::seeks::test_support::{
        create_test_query_context, node_ctx_parts,
    };
    use crate::query::context::ast::NodeInfo;

    #[test]
    fn test_seek_by_constant_ids() {
        let mut qctx = create_test_query_context();
        let node = NodeInfo::named("n");
        let filter = Expression::eq(Expression::id_of("n"), Expression::constant("Tim"));
        let (space, where_clause, aliases) = node_ctx_parts(Some(filter));
        let mut ctx = NodeContext::new(&space, where_clause.as_ref(), &aliases, &node);

        assert!(VertexIdSeek.match_node(&qctx, &mut ctx));
        let plan = VertexIdSeek
            .transform_node(&mut qctx, &mut ctx)
            .expect("Expected planner result to exist");
        let root = plan.root_id().expect("root");
        let var = qctx.node(root).output_var().to_string();
        assert_eq!(qctx.node(root).name(), "PassThrough");
        assert_eq!(qctx.get_value(&var), Some(&Value::List(vec![Value::from("Tim")])));
        assert_eq!(qctx.sym_table().get_var(&var).expect("var").col_names, vec!["_vid"]);
        assert_eq!(ctx.initial_expr.expect("initial").to_string(), "$-._vid");
    }

    #[test]
    fn test_no_where() {
        let qctx = create_test_query_context();
        let node = NodeInfo::named("n");
        let (space, where_clause, aliases) = node_ctx_parts(None);
        let mut ctx = NodeContext::new(&space, where_clause.as_ref(), &aliases, &node);
        assert!(!VertexIdSeek.match_node(&qctx, &mut ctx));
    }
}
