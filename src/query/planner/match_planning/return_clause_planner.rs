//! RETURN 子句规划器：投影、去重与分页

use crate::core::{ExpressionUtils, YieldColumn, YieldColumns};
use crate::query::context::ast::ReturnClauseContext;
use crate::query::planner::plan::{PlanNodeFactory, SubPlan};
use crate::query::planner::planner::PlannerError;
use crate::query::QueryContext;

#[derive(Debug, Default)]
pub struct ReturnClausePlanner;

impl ReturnClausePlanner {
    pub fn new() -> Self {
        Self
    }

    /// 接在 `input` 之上，结果的 tail 不变
    pub fn transform(
        &self,
        qctx: &mut QueryContext,
        return_ctx: &ReturnClauseContext,
        input: SubPlan,
    ) -> Result<SubPlan, PlannerError> {
        let columns: YieldColumns = return_ctx
            .yield_columns
            .iter()
            .map(|c| YieldColumn::new(ExpressionUtils::labels_to_input_props(&c.expr), c.name()))
            .collect();
        let mut root = PlanNodeFactory::project(qctx, input.root_id()?, columns);
        if return_ctx.distinct {
            root = PlanNodeFactory::dedup(qctx, root);
        }
        if return_ctx.skip.is_some() || return_ctx.limit.is_some() {
            let offset = return_ctx.skip.unwrap_or(0);
            let count = return_ctx.limit.unwrap_or(i64::MAX);
            root = PlanNodeFactory::limit(qctx, root, offset, count);
        }
        Ok(SubPlan {
            root: Some(root),
            tail: input.tail,
        })
    }
}
