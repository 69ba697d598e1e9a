//! 规划器集成测试：通过注册表为各类语句生成计划

mod common;

use common::*;
use graphdb_planner::config::PlannerConfig;
use graphdb_planner::core::types::{EdgeDirection, EdgeType, SpaceInfo, K_DST};
use graphdb_planner::core::{Expression, RelationalOperator, Value, YieldColumn, YieldColumns};
use graphdb_planner::query::context::ast::{
    AliasType, AstContext, AstContextBase, CreateSchemaContext, EdgeInfo, FetchVerticesContext,
    GoContext, LookupContext, MatchAstContext, MatchClauseContext, NodeInfo, Over, Path,
    PathContext, ReturnClauseContext, Starts, StepClause, SubgraphContext,
};
use graphdb_planner::query::planner::plan::{describe_plan, PlanNodeKind};
use graphdb_planner::query::planner::{PlannerError, PlannerRegistry, PlannersRegister, SubPlan};
use graphdb_planner::query::QueryContext;
use std::collections::BTreeMap;

fn base(sentence: &str) -> AstContextBase {
    AstContextBase::new(sentence, SpaceInfo::new(SPACE, "nba"))
}

fn plan(registry: &PlannerRegistry, ast: &AstContext) -> (QueryContext, SubPlan) {
    let mut qctx = create_test_query_context();
    let plan = registry
        .to_plan(&mut qctx, ast)
        .expect("Expected planner result to exist");
    (qctx, plan)
}

fn go_ctx(direction: EdgeDirection, steps: StepClause) -> AstContext {
    let mut ctx = GoContext::new(
        base("GO FROM \"Tim\" OVER like"),
        Starts::constant(vec![Value::from("Tim")]),
        Over::new(vec![LIKE], direction),
        steps,
    );
    let mut yields = YieldColumns::new();
    yields.add_column(YieldColumn::new(Expression::edge_prop("like", K_DST), "dst"));
    ctx.yield_expr = yields;
    ctx.col_names = vec!["dst".to_string()];
    AstContext::Go(ctx)
}

fn return_n() -> Option<ReturnClauseContext> {
    let mut yield_columns = YieldColumns::new();
    yield_columns.add_column(YieldColumn::new(Expression::label("n"), "n"));
    Some(ReturnClauseContext {
        yield_columns,
        distinct: false,
        skip: None,
        limit: None,
    })
}

fn match_ctx(clauses: Vec<MatchClauseContext>) -> AstContext {
    AstContext::Match(MatchAstContext {
        base: base("MATCH"),
        clauses,
        return_clause: return_n(),
    })
}

#[test]
fn test_zero_step_go_fetches_seeds() {
    let registry = PlannersRegister::registry();
    let (qctx, plan) = plan(&registry, &go_ctx(EdgeDirection::Out, StepClause::fixed(0)));

    assert_eq!(plan_node_names(&qctx, &plan), vec!["GetVertices", "Start"]);
    for name in pool_node_names(&qctx) {
        assert!(
            !matches!(name.as_str(), "Expand" | "ExpandAll" | "Traverse" | "Loop" | "GetNeighbors"),
            "unexpected {}",
            name
        );
    }
}

#[test]
fn test_go_both_direction_requests_both_edge_types() {
    let registry = PlannersRegister::registry();
    let (qctx, _) = plan(&registry, &go_ctx(EdgeDirection::Both, StepClause::fixed(2)));

    let mut types: Vec<EdgeType> = Vec::new();
    for node in qctx.pool().iter() {
        match node.kind() {
            PlanNodeKind::GetNeighbors(gn) => types.extend(gn.edge_props.iter().map(|p| p.edge_type)),
            PlanNodeKind::Expand(e) => types.extend(e.edge_props.iter().map(|p| p.edge_type)),
            PlanNodeKind::ExpandAll(e) => types.extend(e.edge_props.iter().map(|p| p.edge_type)),
            PlanNodeKind::GetDstBySrc(g) => types.extend(g.edge_types.iter().copied()),
            _ => {}
        }
    }
    assert!(types.contains(&LIKE), "{:?}", types);
    assert!(types.contains(&-LIKE), "{:?}", types);
}

#[test]
fn test_vertex_id_seek_beats_label_index() {
    let registry = PlannersRegister::registry();
    let clause = MatchClauseContext::new(vec![Path::new(
        vec![NodeInfo::named("n").with_label("person", PERSON)],
        Vec::new(),
    )])
    .with_where(Expression::eq(Expression::id_of("n"), Expression::constant("Tim")));
    let (qctx, _) = plan(&registry, &match_ctx(vec![clause]));

    let names = pool_node_names(&qctx);
    assert!(names.contains(&"PassThrough".to_string()), "{:?}", names);
    assert!(!names.contains(&"IndexScan".to_string()), "{:?}", names);
    assert!(!names.contains(&"ScanVertices".to_string()), "{:?}", names);
}

#[test]
fn test_prop_index_seek_beats_label_and_scan() {
    let registry = PlannersRegister::registry();
    let node = NodeInfo::named("n")
        .with_label("person", PERSON)
        .with_props(vec![("name".to_string(), Expression::constant("Tim"))]);
    let clause = MatchClauseContext::new(vec![Path::new(vec![node], Vec::new())]).with_where(
        Expression::relational(
            RelationalOperator::Gt,
            Expression::label_attr("n", "age"),
            Expression::constant(Value::Int(30)),
        ),
    );
    let (qctx, _) = plan(&registry, &match_ctx(vec![clause]));

    let scan = qctx
        .pool()
        .iter()
        .find_map(|n| match n.kind() {
            PlanNodeKind::IndexScan(scan) => Some(scan.clone()),
            _ => None,
        })
        .expect("Expected an index scan");
    assert_eq!(scan.contexts[0].index_id, 10);
    assert!(!pool_node_names(&qctx).contains(&"ScanVertices".to_string()));
}

#[test]
fn test_no_start_without_fallbacks() {
    let registry = PlannersRegister::registry();
    let config = PlannerConfig {
        enable_label_index_seek: false,
        enable_scan_seek: false,
    };
    let mut qctx = create_test_query_context().with_planner_config(config);
    let clause = MatchClauseContext::new(vec![Path::new(
        vec![NodeInfo::named("n").with_label("team", TEAM)],
        Vec::new(),
    )]);
    let err = registry
        .to_plan(&mut qctx, &match_ctx(vec![clause]))
        .expect_err("no start vid finder applies");
    assert!(matches!(err, PlannerError::SemanticError(msg) if msg.starts_with("Can't solve the start vids")));
}

#[test]
fn test_path_with_missing_edge_is_rejected() {
    let registry = PlannersRegister::registry();
    let mut qctx = create_test_query_context();
    let clause = MatchClauseContext::new(vec![Path::new(
        vec![NodeInfo::named("a"), NodeInfo::named("b")],
        Vec::new(),
    )]);
    let err = registry
        .to_plan(&mut qctx, &match_ctx(vec![clause]))
        .expect_err("path without connecting edge");
    assert!(matches!(err, PlannerError::InvalidAstContext(_)));
}

fn two_clause_match() -> AstContext {
    let first = MatchClauseContext::new(vec![Path::new(vec![NodeInfo::named("v")], Vec::new())])
        .with_where(Expression::eq(Expression::id_of("v"), Expression::constant("Tim")));
    let mut available = BTreeMap::new();
    available.insert("v".to_string(), AliasType::Node);
    let second = MatchClauseContext::new(vec![Path::new(
        vec![NodeInfo::named("v"), NodeInfo::named("n")],
        vec![EdgeInfo::named("e", EdgeDirection::Out).with_type("like", LIKE)],
    )])
    .with_available(available);
    match_ctx(vec![first, second])
}

#[test]
fn test_planning_is_deterministic() {
    let registry = PlannersRegister::registry();
    let ast = two_clause_match();
    let (qctx1, plan1) = plan(&registry, &ast);
    let (qctx2, plan2) = plan(&registry, &ast);

    let d1 = describe_plan(qctx1.pool(), plan1.root.expect("root"));
    let d2 = describe_plan(qctx2.pool(), plan2.root.expect("root"));
    assert_eq!(d1, d2);
    assert!(d1.iter().any(|d| d.name == "HashInnerJoin"));
}

#[test]
fn test_fetch_lookup_subgraph_path_and_ddl() {
    let registry = PlannersRegister::registry();

    let mut yields = YieldColumns::new();
    yields.add_column(YieldColumn::new(Expression::tag_prop("person", "name"), "name"));
    let fetch = AstContext::FetchVertices(FetchVerticesContext {
        base: base("FETCH PROP ON person \"Tim\""),
        from: Starts::constant(vec![Value::from("Tim")]),
        yield_expr: yields.clone(),
        col_names: vec!["name".to_string()],
        ..FetchVerticesContext::default()
    });
    let (qctx, p) = plan(&registry, &fetch);
    assert_eq!(plan_node_names(&qctx, &p), vec!["Project", "GetVertices"]);

    let lookup = AstContext::Lookup(LookupContext {
        base: base("LOOKUP ON person"),
        schema_id: PERSON,
        schema_name: "person".to_string(),
        filter: Some(Expression::eq(
            Expression::tag_prop("person", "name"),
            Expression::constant("Tim"),
        )),
        yield_expr: yields,
        col_names: vec!["name".to_string()],
        ..LookupContext::default()
    });
    let (qctx, p) = plan(&registry, &lookup);
    assert_eq!(qctx.node(p.tail.expect("tail")).name(), "IndexScan");

    let subgraph = AstContext::Subgraph(SubgraphContext::new(
        base("GET SUBGRAPH 2 STEPS FROM \"Tim\""),
        Starts::constant(vec![Value::from("Tim")]),
        StepClause::fixed(2),
        vec![LIKE],
    ));
    let (qctx, _) = plan(&registry, &subgraph);
    let names = pool_node_names(&qctx);
    assert!(names.contains(&"Subgraph".to_string()));
    assert!(names.contains(&"Loop".to_string()));

    let mut path = PathContext::new(
        base("FIND SHORTEST PATH FROM \"Tim\" TO \"Tony\" OVER like"),
        Starts::constant(vec![Value::from("Tim")]),
        Starts::constant(vec![Value::from("Tony")]),
        Over::new(vec![LIKE], EdgeDirection::Out),
        StepClause::fixed(5),
    );
    path.is_shortest = true;
    let (qctx, p) = plan(&registry, &AstContext::Path(path));
    assert_eq!(qctx.node(p.root.expect("root")).name(), "DataCollect");
    assert!(pool_node_names(&qctx).contains(&"BFSShortest".to_string()));

    let create = AstContext::CreateSchema(CreateSchemaContext {
        base: base("CREATE TAG player()"),
        is_edge: false,
        name: "player".to_string(),
        columns: Vec::new(),
        if_not_exist: true,
    });
    let (qctx, p) = plan(&registry, &create);
    assert_eq!(p.root, p.tail);
    assert_eq!(qctx.node(p.root.expect("root")).name(), "CreateTag");
}

#[test]
fn test_ast_context_from_json() {
    let json = r#"{"Go": {"base": {"sentence": "GO FROM 1 OVER like", "space": {"id": 1, "name": "nba"}},
                   "from": {"vids": [{"Int": 1}]},
                   "over": {"edge_types": [5], "direction": "Out"},
                   "steps": {"m_steps": 0, "n_steps": 1, "is_m_to_n": false}}}"#;
    let ast: AstContext = serde_json::from_str(json).expect("Expected AST context to parse");
    let registry = PlannersRegister::registry();
    let (qctx, p) = plan(&registry, &ast);
    assert!(plan_node_names(&qctx, &p).contains(&"GetNeighbors".to_string()));
}
