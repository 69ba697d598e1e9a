//! MATCH 子句规划器
//!
//! 子句内每条路径单独规划，共享节点别名的路径做内连接，否则做笛卡尔积；
//! 最后接上 WHERE 过滤。

use crate::core::types::SpaceInfo;
use crate::query::context::ast::{MatchClauseContext, NodeInfo};
use crate::query::planner::connector::SegmentsConnector;
use crate::query::planner::match_planning::match_path_planner::MatchPathPlanner;
use crate::query::planner::match_planning::match_solver::MatchSolver;
use crate::query::planner::match_planning::where_clause_planner::WhereClausePlanner;
use crate::query::planner::plan::SubPlan;
use crate::query::planner::planner::PlannerError;
use crate::query::QueryContext;
use std::collections::BTreeSet;

pub struct MatchClausePlanner<'a> {
    space: &'a SpaceInfo,
    sentence: &'a str,
}

impl<'a> MatchClausePlanner<'a> {
    pub fn new(space: &'a SpaceInfo, sentence: &'a str) -> Self {
        Self { space, sentence }
    }

    pub fn transform(
        &self,
        qctx: &mut QueryContext,
        clause: &MatchClauseContext,
    ) -> Result<SubPlan, PlannerError> {
        if clause.paths.is_empty() {
            return Err(PlannerError::InvalidAstContext(
                "MATCH clause without path pattern".to_string(),
            ));
        }

        let mut clause_plan = SubPlan::default();
        let mut node_aliases_seen = BTreeSet::new();
        for path in &clause.paths {
            let path_plan =
                MatchPathPlanner::new(self.space, self.sentence, &clause.aliases_available, path)
                    .transform(qctx, clause.where_clause.as_ref(), &node_aliases_seen)?;
            clause_plan = Self::connect_path_plan(
                qctx,
                &path.node_infos,
                path_plan,
                &mut node_aliases_seen,
                clause_plan,
            )?;
        }

        if let Some(where_ctx) = &clause.where_clause {
            let where_plan = WhereClausePlanner::new(false).transform(qctx, where_ctx)?;
            clause_plan = SegmentsConnector::add_input(qctx, where_plan, clause_plan, true)?;
        }
        Ok(clause_plan)
    }

    fn connect_path_plan(
        qctx: &mut QueryContext,
        node_infos: &[NodeInfo],
        path_plan: SubPlan,
        node_aliases_seen: &mut BTreeSet<String>,
        clause_plan: SubPlan,
    ) -> Result<SubPlan, PlannerError> {
        let intersected: BTreeSet<String> = node_infos
            .iter()
            .filter(|n| node_aliases_seen.contains(&n.alias))
            .map(|n| n.alias.clone())
            .collect();
        node_aliases_seen.extend(
            node_infos
                .iter()
                .filter(|n| !n.anonymous)
                .map(|n| n.alias.clone()),
        );
        if clause_plan.is_empty() {
            return Ok(path_plan);
        }
        MatchSolver::bind_argument(qctx, &clause_plan, &path_plan)?;
        SegmentsConnector::connect_segments(qctx, clause_plan, path_plan, &intersected, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EdgeDirection;
    use crate::core::Expression;
    use crate::query::context::ast::{EdgeInfo, Path};
    use crate::query::planner::match_planning::seeks::test_support::{
        create_test_query_context, LIKE,
    };
    use crate::query::planner::plan::PlanNodeKind;

    #[test]
    fn test_paths_joined_on_shared_alias() {
        let mut qctx = create_test_query_context();
        let first = Path::new(
            vec![NodeInfo::named("v"), NodeInfo::named("n")],
            vec![EdgeInfo::named("e1", EdgeDirection::Out).with_type("like", LIKE)],
        );
        let second = Path::new(
            vec![NodeInfo::named("n"), NodeInfo::named("m")],
            vec![EdgeInfo::named("e2", EdgeDirection::Out).with_type("like", LIKE)],
        );
        let clause = MatchClauseContext::new(vec![first, second])
            .with_where(Expression::eq(Expression::id_of("v"), Expression::constant("Tim")));
        let space = SpaceInfo::new(1, "nba");
        let plan = MatchClausePlanner::new(&space, "MATCH ...")
            .transform(&mut qctx, &clause)
            .expect("Expected planner result to exist");

        let root = plan.root_id().expect("root");
        assert_eq!(qctx.node(root).name(), "Filter");
        let join = qctx.node(root).deps()[0];
        let PlanNodeKind::HashInnerJoin(keys) = qctx.node(join).kind() else {
            panic!("expected HashInnerJoin");
        };
        let rendered: Vec<String> = keys.hash_keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(rendered, vec!["_joinkey($-.n)"]);

        // 第二条路径从已出现的 n 开始
        let right = qctx.node(join).deps()[1];
        let mut cur = right;
        while let Some(dep) = qctx.node(cur).deps().first().copied() {
            cur = dep;
        }
        assert_eq!(qctx.node(cur).name(), "Argument");
        assert_eq!(qctx.node(cur).input_var(), Some(qctx.node(qctx.node(join).deps()[0]).output_var()));
        assert_eq!(
            qctx.node(root).col_names(),
            &["v", "e1", "n", "n", "e2", "m"].map(String::from)
        );
    }

    #[test]
    fn test_disjoint_paths_cartesian() {
        let mut qctx = create_test_query_context();
        let first = Path::new(vec![NodeInfo::named("a")], Vec::new());
        let second = Path::new(vec![NodeInfo::named("b")], Vec::new());
        let clause = MatchClauseContext::new(vec![first, second]);
        let space = SpaceInfo::new(1, "nba");
        let plan = MatchClausePlanner::new(&space, "MATCH (a), (b)")
            .transform(&mut qctx, &clause)
            .expect("Expected planner result to exist");
        assert_eq!(qctx.node(plan.root_id().expect("root")).name(), "CrossJoin");
    }
}
