//! 单条路径模式的规划
//!
//! 先用起点策略找到一个可以确定点 ID 的节点（或边），再从它向右、向左依次
//! 生成 Traverse，最后用 AppendVertices 补齐末端节点。

use crate::core::types::{SpaceInfo, K_VID};
use crate::core::Expression;
use crate::query::context::ast::{
    AliasType, EdgeContext, EdgeInfo, MatchStepRange, NodeContext, NodeInfo, Path,
    WhereClauseContext,
};
use crate::query::planner::match_planning::match_solver::MatchSolver;
use crate::query::planner::match_planning::start_vid_finder::finders;
use crate::query::planner::plan::{
    AppendVerticesNode, PlanNodeFactory, PlanNodeId, PlanNodeKind, SubPlan, TraverseNode,
};
use crate::query::planner::planner::PlannerError;
use crate::query::QueryContext;
use std::collections::{BTreeMap, BTreeSet};

pub struct MatchPathPlanner<'a> {
    space: &'a SpaceInfo,
    sentence: &'a str,
    aliases_available: &'a BTreeMap<String, AliasType>,
    path: &'a Path,
    initial_expr: Option<Expression>,
    node_aliases_seen_in_pattern: BTreeSet<String>,
}

/// `$-.alias._vid`
fn node_id(node: &NodeInfo) -> Expression {
    Expression::Attribute {
        object: Box::new(Expression::input_prop(node.alias.as_str())),
        attr: Box::new(Expression::constant(K_VID)),
    }
}

fn next_traverse_start(edge: &EdgeInfo, node: &NodeInfo) -> Expression {
    Expression::function(
        "none_direct_dst",
        vec![
            Expression::input_prop(edge.alias.as_str()),
            Expression::input_prop(node.alias.as_str()),
        ],
    )
}

impl<'a> MatchPathPlanner<'a> {
    pub fn new(
        space: &'a SpaceInfo,
        sentence: &'a str,
        aliases_available: &'a BTreeMap<String, AliasType>,
        path: &'a Path,
    ) -> Self {
        Self {
            space,
            sentence,
            aliases_available,
            path,
            initial_expr: None,
            node_aliases_seen_in_pattern: BTreeSet::new(),
        }
    }

    /// `node_aliases_seen` 是同一子句中前面路径已经出现过的节点别名
    pub fn transform(
        &mut self,
        qctx: &mut QueryContext,
        bind_where: Option<&WhereClauseContext>,
        node_aliases_seen: &BTreeSet<String>,
    ) -> Result<SubPlan, PlannerError> {
        let nodes = self.path.node_infos.len();
        let edges = self.path.edge_infos.len();
        if nodes == 0 || edges + 1 != nodes {
            return Err(PlannerError::InvalidAstContext(format!(
                "path pattern has {} nodes but {} edges",
                nodes, edges
            )));
        }
        let (start_index, mut subplan) = self.find_starts(qctx, bind_where, node_aliases_seen)?;
        self.expand_from_node(qctx, start_index, &mut subplan)?;
        if !self.path.is_pred {
            MatchSolver::build_project_columns(qctx, self.path, &mut subplan)?;
        }
        Ok(subplan)
    }

    /// 依次尝试每个策略，同一策略内从左到右先试节点再试它右侧的边
    fn find_starts(
        &mut self,
        qctx: &mut QueryContext,
        bind_where: Option<&WhereClauseContext>,
        node_aliases_seen: &BTreeSet<String>,
    ) -> Result<(usize, SubPlan), PlannerError> {
        let mut aliases = self.aliases_available.clone();
        for alias in node_aliases_seen {
            aliases.entry(alias.clone()).or_insert(AliasType::Node);
        }

        let path = self.path;
        let node_infos = &path.node_infos;
        let finders = finders(qctx.planner_config());
        for finder in &finders {
            for (i, node) in node_infos.iter().enumerate() {
                let mut node_ctx = NodeContext::new(self.space, bind_where, &aliases, node);
                if finder.match_node(qctx, &mut node_ctx) {
                    let mut plan = finder.transform_node(qctx, &mut node_ctx)?;
                    plan.append_start_node(qctx)?;
                    log::debug!(
                        "Find starts: {} by {}, pattern has {} edges",
                        i,
                        finder.name(),
                        path.edge_infos.len()
                    );
                    self.initial_expr = node_ctx.initial_expr;
                    return Ok((i, plan));
                }

                if i + 1 == node_infos.len() {
                    continue;
                }
                let edge = &path.edge_infos[i];
                let mut edge_ctx = EdgeContext::new(self.space, bind_where, &aliases, edge);
                if finder.match_edge(qctx, &mut edge_ctx) {
                    let mut plan = finder.transform_edge(qctx, &mut edge_ctx)?;
                    plan.append_start_node(qctx)?;
                    log::debug!("Find starts from edge {} by {}", i, finder.name());
                    self.initial_expr = edge_ctx.initial_expr;
                    return Ok((i, plan));
                }
            }
        }
        Err(PlannerError::SemanticError(format!(
            "Can't solve the start vids from the sentence: {}",
            self.sentence
        )))
    }

    fn add_node_alias(&mut self, node: &NodeInfo) {
        if !node.anonymous {
            self.node_aliases_seen_in_pattern.insert(node.alias.clone());
        }
    }

    fn is_expand_into(&self, alias: &str) -> bool {
        self.node_aliases_seen_in_pattern.contains(alias)
    }

    fn initial_expr(&self) -> Result<Expression, PlannerError> {
        self.initial_expr.clone().ok_or_else(|| {
            PlannerError::PlanGenerationFailed("start vid expression is not set".to_string())
        })
    }

    /// 起点是边时同样从边左侧的节点展开
    fn expand_from_node(
        &mut self,
        qctx: &mut QueryContext,
        start_index: usize,
        subplan: &mut SubPlan,
    ) -> Result<(), PlannerError> {
        let node_count = self.path.node_infos.len();
        self.node_aliases_seen_in_pattern
            .insert(self.path.node_infos[start_index].alias.clone());
        if start_index == 0 {
            return self.right_expand_from_node(qctx, start_index, subplan);
        }
        if start_index + 1 == node_count {
            return self.left_expand_from_node(qctx, start_index, subplan);
        }
        self.right_expand_from_node(qctx, start_index, subplan)?;
        self.left_expand_from_node(qctx, start_index, subplan)
    }

    #[allow(clippy::too_many_arguments)]
    fn traverse(
        &self,
        qctx: &mut QueryContext,
        dep: PlanNodeId,
        src: Expression,
        node: &NodeInfo,
        edge: &EdgeInfo,
        reversely: bool,
        track_prev_path: bool,
    ) -> PlanNodeId {
        let space_id = self.space.id;
        let mut col_names = if track_prev_path {
            qctx.node(dep).col_names().to_vec()
        } else {
            Vec::new()
        };
        col_names.push(node.alias.clone());
        col_names.push(edge.alias.clone());

        let traverse = TraverseNode {
            space_id,
            src,
            vertex_props: MatchSolver::all_vertex_props(qctx, space_id),
            edge_props: MatchSolver::edge_props(qctx, space_id, edge, reversely),
            vertex_filter: MatchSolver::vertex_filter(node),
            edge_filter: MatchSolver::edge_filter(edge),
            step_range: edge.range.unwrap_or(MatchStepRange::new(1, 1)),
            direction: edge.direction,
            dedup: true,
            track_prev_path,
        };
        PlanNodeFactory::make(qctx, PlanNodeKind::Traverse(traverse), vec![dep], col_names)
    }

    fn append_vertices(
        &self,
        qctx: &mut QueryContext,
        subplan: &mut SubPlan,
        src: Expression,
        node: &NodeInfo,
    ) -> Result<(), PlannerError> {
        let space_id = self.space.id;
        let dep = subplan.root_id()?;
        let track_prev_path = !self.path.edge_infos.is_empty();
        let mut col_names = if track_prev_path {
            qctx.node(dep).col_names().to_vec()
        } else {
            Vec::new()
        };
        col_names.push(node.alias.clone());

        let append = AppendVerticesNode {
            space_id,
            src,
            props: MatchSolver::all_vertex_props(qctx, space_id),
            vertex_filter: MatchSolver::vertex_filter(node),
            dedup: true,
            track_prev_path,
        };
        let append = PlanNodeFactory::make(
            qctx,
            PlanNodeKind::AppendVertices(append),
            vec![dep],
            col_names,
        );
        subplan.root = Some(append);
        Ok(())
    }

    fn right_expand_from_node(
        &mut self,
        qctx: &mut QueryContext,
        start_index: usize,
        subplan: &mut SubPlan,
    ) -> Result<(), PlannerError> {
        let path = self.path;
        let node_infos = &path.node_infos;
        let mut next_start = self.initial_expr()?;
        for i in start_index..path.edge_infos.len() {
            let node = &node_infos[i];
            let dst = &node_infos[i + 1];
            self.add_node_alias(node);
            let expand_into = self.is_expand_into(&dst.alias);

            let edge = &path.edge_infos[i];
            let dep = subplan.root_id()?;
            let traverse = self.traverse(qctx, dep, next_start, node, edge, false, i != start_index);
            subplan.root = Some(traverse);
            next_start = next_traverse_start(edge, node);
            if expand_into {
                let cond = Expression::eq(node_id(dst), next_start.clone());
                subplan.root = Some(PlanNodeFactory::filter(qctx, traverse, cond));
            }
        }

        let Some(last) = node_infos.last() else {
            return Ok(());
        };
        let dupped_last_alias =
            self.is_expand_into(&last.alias) && self.node_aliases_seen_in_pattern.len() > 1;
        self.add_node_alias(last);
        // 同一别名总是同一个点，末端已出现过就不用再取一次
        if dupped_last_alias {
            return Ok(());
        }
        self.append_vertices(qctx, subplan, next_start, last)
    }

    fn left_expand_from_node(
        &mut self,
        qctx: &mut QueryContext,
        start_index: usize,
        subplan: &mut SubPlan,
    ) -> Result<(), PlannerError> {
        let path = self.path;
        let node_infos = &path.node_infos;
        let start_is_last = start_index + 1 == node_infos.len();
        let mut next_start = if start_is_last {
            self.initial_expr()?
        } else {
            Expression::function(
                "_joinkey",
                vec![Expression::input_prop(node_infos[start_index].alias.as_str())],
            )
        };

        for i in (1..=start_index).rev() {
            let node = &node_infos[i];
            let dst = &node_infos[i - 1];
            self.add_node_alias(node);
            let expand_into = self.is_expand_into(&dst.alias);

            let edge = &path.edge_infos[i - 1];
            // 从路径末端开始时第一次展开不跟踪之前的路径
            let track_prev_path = if start_is_last { i != start_index } else { true };
            let dep = subplan.root_id()?;
            let traverse = self.traverse(qctx, dep, next_start, node, edge, true, track_prev_path);
            subplan.root = Some(traverse);
            next_start = next_traverse_start(edge, node);
            if expand_into {
                let cond = Expression::eq(node_id(dst), next_start.clone());
                subplan.root = Some(PlanNodeFactory::filter(qctx, traverse, cond));
            }
        }

        let Some(last) = node_infos.first() else {
            return Ok(());
        };
        let dupped_last_alias =
            self.is_expand_into(&last.alias) && self.node_aliases_seen_in_pattern.len() > 1;
        if dupped_last_alias {
            return Ok(());
        }
        self.append_vertices(qctx, subplan, next_start, last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EdgeDirection;
    use crate::core::Value;
    use crate::query::planner::match_planning::seeks::test_support::{
        create_test_query_context, LIKE, PERSON,
    };

    fn chain(qctx: &QueryContext, root: PlanNodeId) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut cur = Some(root);
        while let Some(id) = cur {
            names.push(qctx.node(id).name());
            cur = qctx.node(id).deps().first().copied();
        }
        names
    }

    fn plan(
        qctx: &mut QueryContext,
        path: &Path,
        filter: Option<Expression>,
    ) -> Result<SubPlan, PlannerError> {
        let space = SpaceInfo::new(1, "nba");
        let aliases = BTreeMap::new();
        let where_clause = filter.map(|f| WhereClauseContext { filter: Some(f) });
        MatchPathPlanner::new(&space, "MATCH ...", &aliases, path).transform(
            qctx,
            where_clause.as_ref(),
            &BTreeSet::new(),
        )
    }

    #[test]
    fn test_right_expand_from_vertex_id() {
        let mut qctx = create_test_query_context();
        let path = Path::new(
            vec![NodeInfo::named("v"), NodeInfo::named("n")],
            vec![EdgeInfo::named("e", EdgeDirection::Out).with_type("like", LIKE)],
        );
        let filter = Expression::eq(Expression::id_of("v"), Expression::constant("Tim"));
        let subplan = plan(&mut qctx, &path, Some(filter)).expect("Expected planner result to exist");

        let root = subplan.root_id().expect("root");
        assert_eq!(
            chain(&qctx, root),
            vec!["Project", "AppendVertices", "Traverse", "PassThrough", "Start"]
        );
        assert_eq!(
            qctx.node(root).col_names(),
            &["v".to_string(), "e".to_string(), "n".to_string()]
        );

        let append = qctx.node(root).deps()[0];
        let PlanNodeKind::AppendVertices(append_node) = qctx.node(append).kind() else {
            panic!("expected AppendVertices");
        };
        assert_eq!(append_node.src.to_string(), "none_direct_dst($-.e,$-.v)");
        assert!(append_node.track_prev_path);

        let traverse = qctx.node(append).deps()[0];
        let PlanNodeKind::Traverse(t) = qctx.node(traverse).kind() else {
            panic!("expected Traverse");
        };
        assert_eq!(t.src.to_string(), "$-._vid");
        assert!(!t.track_prev_path);
        assert_eq!(t.edge_props[0].edge_type, LIKE);
        assert_eq!(t.step_range, MatchStepRange::new(1, 1));
        assert_eq!(qctx.get_value("__VAR_0"), Some(&Value::List(vec![Value::from("Tim")])));
    }

    #[test]
    fn test_left_expand_from_last_node() {
        let mut qctx = create_test_query_context();
        let path = Path::new(
            vec![
                NodeInfo::named("a"),
                NodeInfo::named("b")
                    .with_label("person", PERSON)
                    .with_props(vec![("name".to_string(), Expression::constant("Tim"))]),
            ],
            vec![EdgeInfo::named("e", EdgeDirection::Out)
                .with_type("like", LIKE)
                .with_range(1, 3)],
        );
        let subplan = plan(&mut qctx, &path, None).expect("Expected planner result to exist");

        let root = subplan.root_id().expect("root");
        assert_eq!(
            chain(&qctx, root),
            vec!["Project", "AppendVertices", "Traverse", "IndexScan", "Start"]
        );
        let traverse = qctx.node(qctx.node(root).deps()[0]).deps()[0];
        let PlanNodeKind::Traverse(t) = qctx.node(traverse).kind() else {
            panic!("expected Traverse");
        };
        assert_eq!(t.edge_props[0].edge_type, -LIKE);
        assert_eq!(t.step_range, MatchStepRange::new(1, 3));
        assert_eq!(qctx.node(traverse).col_names(), &["b".to_string(), "e".to_string()]);

        let PlanNodeKind::Project { columns } = qctx.node(root).kind() else {
            panic!("expected Project");
        };
        assert_eq!(columns.to_string(), "$-.a AS a,$-.e AS e,$-.b AS b");
    }

    #[test]
    fn test_expand_into_cycle() {
        let mut qctx = create_test_query_context();
        let path = Path::new(
            vec![NodeInfo::named("v"), NodeInfo::named("n"), NodeInfo::named("v")],
            vec![
                EdgeInfo::named("e1", EdgeDirection::Out).with_type("like", LIKE),
                EdgeInfo::named("e2", EdgeDirection::Out).with_type("like", LIKE),
            ],
        );
        let filter = Expression::eq(Expression::id_of("v"), Expression::constant("Tim"));
        let subplan = plan(&mut qctx, &path, Some(filter)).expect("Expected planner result to exist");

        let root = subplan.root_id().expect("root");
        assert_eq!(
            chain(&qctx, root),
            vec!["Project", "Filter", "Traverse", "Traverse", "PassThrough", "Start"]
        );
        let PlanNodeKind::Filter { condition, .. } = qctx.node(qctx.node(root).deps()[0]).kind()
        else {
            panic!("expected Filter");
        };
        assert_eq!(condition.to_string(), "($-.v._vid==none_direct_dst($-.e2,$-.n))");
    }

    #[test]
    fn test_no_start() {
        let mut qctx = create_test_query_context().with_planner_config(crate::config::PlannerConfig {
            enable_label_index_seek: false,
            enable_scan_seek: false,
        });
        let path = Path::new(vec![NodeInfo::named("v")], Vec::new());
        let err = plan(&mut qctx, &path, None).expect_err("no start");
        assert_eq!(
            err,
            PlannerError::SemanticError(
                "Can't solve the start vids from the sentence: MATCH ...".to_string()
            )
        );
    }

    #[test]
    fn test_nodes_without_connecting_edge() {
        let mut qctx = create_test_query_context();
        let path = Path::new(vec![NodeInfo::named("a"), NodeInfo::named("b")], Vec::new());
        let err = plan(&mut qctx, &path, None).expect_err("mismatched path");
        assert_eq!(
            err,
            PlannerError::InvalidAstContext("path pattern has 2 nodes but 0 edges".to_string())
        );

        let empty = Path::new(Vec::new(), Vec::new());
        let err = plan(&mut qctx, &empty, None).expect_err("empty path");
        assert!(matches!(err, PlannerError::InvalidAstContext(_)));
    }
}
