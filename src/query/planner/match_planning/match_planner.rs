//! MATCH 语句规划器
//!
//! 各子句依次规划后按共享别名连接：普通子句内连接，OPTIONAL MATCH 左连接，
//! 没有共享别名时做笛卡尔积。最后处理 RETURN。

use crate::query::context::ast::{AstContext, MatchClauseContext};
use crate::query::planner::connector::SegmentsConnector;
use crate::query::planner::match_planning::match_clause_planner::MatchClausePlanner;
use crate::query::planner::match_planning::match_solver::MatchSolver;
use crate::query::planner::match_planning::return_clause_planner::ReturnClausePlanner;
use crate::query::planner::plan::SubPlan;
use crate::query::planner::planner::{Planner, PlannerError};
use crate::query::QueryContext;
use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub struct MatchPlanner;

impl MatchPlanner {
    pub fn new() -> Self {
        Self
    }

    pub fn make() -> Box<dyn Planner> {
        Box::new(Self::new())
    }

    pub fn match_ast_ctx(ast_ctx: &AstContext) -> bool {
        matches!(ast_ctx, AstContext::Match(_))
    }

    /// 子句中出现且已被之前子句绑定的别名
    fn inter_aliases(clause: &MatchClauseContext) -> BTreeSet<String> {
        let mut aliases = BTreeSet::new();
        for path in &clause.paths {
            let named = path
                .node_infos
                .iter()
                .filter(|n| !n.anonymous)
                .map(|n| &n.alias)
                .chain(path.edge_infos.iter().filter(|e| !e.anonymous).map(|e| &e.alias))
                .chain((!path.anonymous).then_some(&path.alias));
            for alias in named {
                if clause.aliases_available.contains_key(alias) {
                    aliases.insert(alias.clone());
                }
            }
        }
        aliases
    }

    fn connect_match_plan(
        qctx: &mut QueryContext,
        query_plan: SubPlan,
        match_plan: SubPlan,
        clause: &MatchClauseContext,
    ) -> Result<SubPlan, PlannerError> {
        if query_plan.is_empty() {
            return Ok(match_plan);
        }
        let inter_aliases = Self::inter_aliases(clause);
        log::debug!(
            "Connect match clause on {:?}, optional: {}",
            inter_aliases,
            clause.is_optional
        );
        MatchSolver::bind_argument(qctx, &query_plan, &match_plan)?;
        SegmentsConnector::connect_segments(
            qctx,
            query_plan,
            match_plan,
            &inter_aliases,
            clause.is_optional,
        )
    }
}

impl Planner for MatchPlanner {
    fn transform(
        &mut self,
        qctx: &mut QueryContext,
        ast_ctx: &AstContext,
    ) -> Result<SubPlan, PlannerError> {
        let AstContext::Match(ctx) = ast_ctx else {
            return Err(PlannerError::unexpected_context("MATCH", ast_ctx));
        };
        if ctx.clauses.is_empty() {
            return Err(PlannerError::InvalidAstContext(
                "MATCH sentence without clause".to_string(),
            ));
        }

        let clause_planner = MatchClausePlanner::new(&ctx.base.space, &ctx.base.sentence);
        let mut query_plan = SubPlan::default();
        for clause in &ctx.clauses {
            let match_plan = clause_planner.transform(qctx, clause)?;
            query_plan = Self::connect_match_plan(qctx, query_plan, match_plan, clause)?;
        }

        if let Some(return_ctx) = &ctx.return_clause {
            query_plan = ReturnClausePlanner::new().transform(qctx, return_ctx, query_plan)?;
        }
        Ok(query_plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{EdgeDirection, SpaceInfo};
    use crate::core::{Expression, YieldColumn, YieldColumns};
    use crate::query::context::ast::{
        AliasType, AstContextBase, EdgeInfo, MatchAstContext, NodeInfo, Path,
        ReturnClauseContext,
    };
    use crate::query::planner::match_planning::seeks::test_support::{
        create_test_query_context, LIKE,
    };
    use crate::query::planner::plan::PlanNodeKind;
    use std::collections::BTreeMap;

    fn first_clause() -> MatchClauseContext {
        MatchClauseContext::new(vec![Path::new(vec![NodeInfo::named("v")], Vec::new())])
            .with_where(Expression::eq(Expression::id_of("v"), Expression::constant("Tim")))
    }

    fn second_clause() -> MatchClauseContext {
        let mut available = BTreeMap::new();
        available.insert("v".to_string(), AliasType::Node);
        MatchClauseContext::new(vec![Path::new(
            vec![NodeInfo::named("v"), NodeInfo::named("n")],
            vec![EdgeInfo::named("e", EdgeDirection::Out).with_type("like", LIKE)],
        )])
        .with_available(available)
    }

    fn match_ctx(clauses: Vec<MatchClauseContext>) -> AstContext {
        let mut yield_columns = YieldColumns::new();
        yield_columns.add_column(YieldColumn::new(Expression::label("n"), "n"));
        AstContext::Match(MatchAstContext {
            base: AstContextBase::new("MATCH ...", SpaceInfo::new(1, "nba")),
            clauses,
            return_clause: Some(ReturnClauseContext {
                yield_columns,
                distinct: false,
                skip: None,
                limit: Some(10),
            }),
        })
    }

    #[test]
    fn test_clauses_inner_join() {
        let mut qctx = create_test_query_context();
        let plan = MatchPlanner::new()
            .transform(&mut qctx, &match_ctx(vec![first_clause(), second_clause()]))
            .expect("Expected planner result to exist");

        let root = plan.root_id().expect("root");
        assert_eq!(qctx.node(root).name(), "Limit");
        let project = qctx.node(root).deps()[0];
        let join = qctx.node(project).deps()[0];
        assert!(matches!(qctx.node(join).kind(), PlanNodeKind::HashInnerJoin(_)));
        assert_eq!(qctx.node(plan.tail_id().expect("tail")).name(), "Start");
    }

    #[test]
    fn test_optional_clause_left_join() {
        let mut qctx = create_test_query_context();
        let plan = MatchPlanner::new()
            .transform(
                &mut qctx,
                &match_ctx(vec![first_clause(), second_clause().optional()]),
            )
            .expect("Expected planner result to exist");
        let project = qctx.node(plan.root_id().expect("root")).deps()[0];
        let join = qctx.node(project).deps()[0];
        assert!(matches!(qctx.node(join).kind(), PlanNodeKind::HashLeftJoin(_)));
    }

    #[test]
    fn test_no_clause() {
        let mut qctx = create_test_query_context();
        assert!(MatchPlanner::new()
            .transform(&mut qctx, &match_ctx(Vec::new()))
            .is_err());
    }
}
