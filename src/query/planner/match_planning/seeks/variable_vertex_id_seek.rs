//! 运行时点 ID 起点：`id(n) == $var.col` 或 `id(n) == id(m)`

use crate::core::types::K_VID;
use crate::core::{Expression, ExpressionUtils, YieldColumn, YieldColumns};
use crate::query::context::ast::NodeContext;
use crate::query::planner::match_planning::match_solver::MatchSolver;
use crate::query::planner::match_planning::start_vid_finder::StartVidFinder;
use crate::query::planner::plan::{PlanNodeFactory, PlanNodeKind, SubPlan};
use crate::query::planner::planner::PlannerError;
use crate::query::QueryContext;

#[derive(Debug, Default)]
pub struct VariableVertexIdSeek;

impl StartVidFinder for VariableVertexIdSeek {
    fn name(&self) -> &'static str {
        "VariableVertexIdSeek"
    }

    fn match_node(&self, _qctx: &QueryContext, node_ctx: &mut NodeContext<'_>) -> bool {
        let Some(filter) = node_ctx.where_filter() else {
            return false;
        };
        let Some(vid_expr) = MatchSolver::extract_variable_vid(
            &node_ctx.info.alias,
            filter,
            node_ctx.aliases_available,
        ) else {
            return false;
        };
        node_ctx.argument_alias = ExpressionUtils::referenced_labels(&vid_expr)
            .into_iter()
            .next();
        node_ctx.vid_expr = Some(vid_expr);
        true
    }

    fn transform_node(
        &self,
        qctx: &mut QueryContext,
        node_ctx: &mut NodeContext<'_>,
    ) -> Result<SubPlan, PlannerError> {
        let vid_expr = node_ctx.vid_expr.clone().ok_or_else(|| {
            PlannerError::PlanGenerationFailed("variable vertex id seek without vid".to_string())
        })?;

        let (project, tail) = match (&node_ctx.argument_alias, &vid_expr) {
            (Some(alias), _) => {
                let argument = PlanNodeFactory::argument(qctx, alias);
                let mut columns = YieldColumns::new();
                columns.add_column(YieldColumn::new(
                    ExpressionUtils::labels_to_input_props(&vid_expr),
                    K_VID,
                ));
                (PlanNodeFactory::project(qctx, argument, columns), argument)
            }
            (None, Expression::VariableProperty { var, prop }) => {
                let mut columns = YieldColumns::new();
                columns.add_column(YieldColumn::new(Expression::input_prop(prop.as_str()), K_VID));
                let project = qctx.make_node(PlanNodeKind::Project { columns }, Vec::new());
                qctx.set_col_names(project, vec![K_VID.to_string()]);
                qctx.set_input_var(project, var);
                (project, project)
            }
            (None, other) => {
                return Err(PlannerError::UnsupportedOperation(format!(
                    "vertex id from `{}'",
                    other
                )))
            }
        };
        let dedup = PlanNodeFactory::dedup(qctx, project);
        node_ctx.initial_expr = Some(Expression::input_prop(K_VID));
        Ok(SubPlan::new(dedup, tail))
    }
}
