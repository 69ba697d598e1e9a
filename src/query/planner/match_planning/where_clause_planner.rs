//! WHERE 子句规划器

use crate::core::ExpressionUtils;
use crate::query::context::ast::WhereClauseContext;
use crate::query::planner::plan::{PlanNodeKind, SubPlan};
use crate::query::planner::planner::PlannerError;
use crate::query::QueryContext;

/// 把 WHERE 条件变成一个尚未连接输入的 Filter
///
/// ```cypher
/// MATCH (n:person)-[e:like]->(m)
/// WHERE n.age > 25 AND e.likeness >= 90
/// RETURN m
/// ```
///
/// 条件中的别名改写为对输入列的引用，例如 `n.age` 变为 `$-.n.age`。
/// 输入由调用方通过 `SegmentsConnector::add_input` 接上。
#[derive(Debug)]
pub struct WhereClausePlanner {
    need_stable_filter: bool,
}

impl WhereClausePlanner {
    pub fn new(need_stable_filter: bool) -> Self {
        Self { need_stable_filter }
    }

    pub fn transform(
        &self,
        qctx: &mut QueryContext,
        where_ctx: &WhereClauseContext,
    ) -> Result<SubPlan, PlannerError> {
        let Some(filter) = &where_ctx.filter else {
            return Ok(SubPlan::default());
        };
        let filter = qctx.make_node(
            PlanNodeKind::Filter {
                condition: ExpressionUtils::labels_to_input_props(filter),
                need_stable_filter: self.need_stable_filter,
            },
            Vec::new(),
        );
        Ok(SubPlan::single(filter))
    }
}
