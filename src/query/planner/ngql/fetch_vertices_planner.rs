//! FETCH PROP ON <tag> 规划器
//!
//! 起点 -> GetVertices -> Project [-> Dedup]

use crate::query::context::ast::AstContext;
use crate::query::planner::plan::{GetVerticesNode, PlanNodeFactory, PlanNodeKind, SubPlan};
use crate::query::planner::planner::{Planner, PlannerError};
use crate::query::planner::utils::PlannerUtil;
use crate::query::QueryContext;

#[derive(Debug, Default)]
pub struct FetchVerticesPlanner;

impl FetchVerticesPlanner {
    pub fn new() -> Self {
        Self
    }

    pub fn make() -> Box<dyn Planner> {
        Box::new(Self::new())
    }

    pub fn match_ast_ctx(ast_ctx: &AstContext) -> bool {
        matches!(ast_ctx, AstContext::FetchVertices(_))
    }
}

impl Planner for FetchVerticesPlanner {
    fn transform(
        &mut self,
        qctx: &mut QueryContext,
        ast_ctx: &AstContext,
    ) -> Result<SubPlan, PlannerError> {
        let AstContext::FetchVertices(ctx) = ast_ctx else {
            return Err(PlannerError::unexpected_context("FETCH PROP ON <tag>", ast_ctx));
        };
        let mut from = ctx.from.clone();
        let (starts, vids_var) = PlannerUtil::build_start(qctx, &mut from, &ctx.input_var_name)?;

        let get_vertices = PlanNodeFactory::make(
            qctx,
            PlanNodeKind::GetVertices(GetVerticesNode {
                space_id: ctx.base.space.id,
                src: from.src_expr(),
                props: PlannerUtil::vertex_props(&ctx.expr_props.tag_props),
                dedup: true,
            }),
            starts.root.into_iter().collect(),
            Vec::new(),
        );
        qctx.set_input_var(get_vertices, &vids_var);

        let mut root = PlanNodeFactory::project(qctx, get_vertices, ctx.yield_expr.clone());
        qctx.set_col_names(root, ctx.col_names.clone());
        if ctx.distinct {
            root = PlanNodeFactory::dedup(qctx, root);
        }
        let tail = starts.tail.unwrap_or(get_vertices);
        log::debug!("FETCH vertices from `{}'", vids_var);
        Ok(SubPlan::new(root, tail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SpaceInfo;
    use crate::core::{Expression, Value, YieldColumn, YieldColumns};
    use crate::query::context::ast::{AstContextBase, FetchVerticesContext, Starts};
    use crate::query::context::managers::MemorySchemaManager;
    use std::sync::Arc;

    fn create_test_query_context() -> QueryContext {
        let schema = Arc::new(MemorySchemaManager::new());
        QueryContext::new(1, schema.clone(), schema)
    }

    fn fetch_ctx(from: Starts) -> FetchVerticesContext {
        let mut yields = YieldColumns::new();
        yields.add_column(YieldColumn::new(Expression::tag_prop("person", "name"), "name"));
        let mut ctx = FetchVerticesContext {
            base: AstContextBase::new("FETCH PROP ON person", SpaceInfo::new(1, "s")),
            from,
            yield_expr: yields,
            col_names: vec!["name".to_string()],
            ..FetchVerticesContext::default()
        };
        ctx.expr_props.insert_tag_prop(3, "name");
        ctx
    }

    #[test]
    fn test_constant_vids() {
        let mut qctx = create_test_query_context();
        let ast = AstContext::FetchVertices(fetch_ctx(Starts::constant(vec![
            Value::from("a"),
            Value::from("b"),
        ])));
        let plan = FetchVerticesPlanner::new()
            .transform(&mut qctx, &ast)
            .expect("fetch plan");
        let root = plan.root.expect("root");
        let tail = plan.tail.expect("tail");
        assert_eq!(qctx.node(root).name(), "Project");
        assert_eq!(qctx.node(tail).name(), "GetVertices");
        let var = qctx.node(tail).input_var().expect("vids var").to_string();
        assert_eq!(
            qctx.get_value(&var),
            Some(&Value::List(vec![Value::from("a"), Value::from("b")]))
        );
    }

    #[test]
    fn test_pipe_input_is_deduped_first() {
        let mut qctx = create_test_query_context();
        let mut ctx = fetch_ctx(Starts::pipe("id"));
        ctx.input_var_name = "__prev".to_string();
        ctx.distinct = true;
        let plan = FetchVerticesPlanner::new()
            .transform(&mut qctx, &AstContext::FetchVertices(ctx))
            .expect("fetch plan");
        let names: Vec<String> = crate::query::planner::plan::describe_plan(
            qctx.pool(),
            plan.root.expect("root"),
        )
        .into_iter()
        .map(|d| d.name)
        .collect();
        assert_eq!(names, vec!["Dedup", "Project", "GetVertices", "Dedup", "Project"]);
        let tail = plan.tail.expect("tail");
        assert_eq!(qctx.node(tail).input_var(), Some("__prev"));
    }
}
