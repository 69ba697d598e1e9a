//! FETCH PROP ON <edge> 规划器
//!
//! 边键 -> GetEdges -> Filter(去掉不存在的边) -> Project [-> Dedup]

use crate::core::types::{K_DST, K_RANK, K_SRC, K_TYPE};
use crate::core::{Expression, UnaryOperator, Value};
use crate::query::context::ast::{AstContext, FetchEdgesContext};
use crate::query::planner::plan::{GetEdgesNode, PlanNodeFactory, PlanNodeKind, SubPlan};
use crate::query::planner::planner::{Planner, PlannerError};
use crate::query::planner::utils::PlannerUtil;
use crate::query::QueryContext;

#[derive(Debug, Default)]
pub struct FetchEdgesPlanner;

impl FetchEdgesPlanner {
    pub fn new() -> Self {
        Self
    }

    pub fn make() -> Box<dyn Planner> {
        Box::new(Self::new())
    }

    pub fn match_ast_ctx(ast_ctx: &AstContext) -> bool {
        matches!(ast_ctx, AstContext::FetchEdges(_))
    }

    /// 常量边键写入匿名变量，每行 `[src, type, rank, dst]`
    fn build_constant_keys(qctx: &mut QueryContext, ctx: &FetchEdgesContext) -> String {
        let var = qctx.anon_var();
        let rows = ctx
            .keys
            .iter()
            .map(|k| {
                Value::List(vec![
                    k.src.clone(),
                    Value::Int(i64::from(ctx.edge_type)),
                    Value::Int(k.rank),
                    k.dst.clone(),
                ])
            })
            .collect();
        qctx.set_value(&var, Value::List(rows));
        qctx.sym_table_mut().set_col_names(
            &var,
            [K_SRC, K_TYPE, K_RANK, K_DST].iter().map(|c| c.to_string()).collect(),
        );
        var
    }
}

impl Planner for FetchEdgesPlanner {
    fn transform(
        &mut self,
        qctx: &mut QueryContext,
        ast_ctx: &AstContext,
    ) -> Result<SubPlan, PlannerError> {
        let AstContext::FetchEdges(ctx) = ast_ctx else {
            return Err(PlannerError::unexpected_context("FETCH PROP ON <edge>", ast_ctx));
        };

        let (src, ranking, dst, input_var) = if ctx.keys.is_empty() {
            let src = ctx.src.clone().ok_or_else(|| {
                PlannerError::InvalidAstContext("FETCH edges without keys or source".into())
            })?;
            let dst = ctx.dst.clone().ok_or_else(|| {
                PlannerError::InvalidAstContext("FETCH edges without destination".into())
            })?;
            let ranking = ctx.rank.clone().unwrap_or_else(|| Expression::constant(0));
            (src, ranking, dst, ctx.input_var_name.clone())
        } else {
            let var = Self::build_constant_keys(qctx, ctx);
            (
                Expression::input_prop(K_SRC),
                Expression::input_prop(K_RANK),
                Expression::input_prop(K_DST),
                var,
            )
        };

        let edge_props = PlannerUtil::edge_prop(
            ctx.edge_type,
            ctx.expr_props.edge_props.get(&ctx.edge_type),
            &[K_SRC, K_DST, K_RANK, K_TYPE],
        );
        let get_edges = PlanNodeFactory::make(
            qctx,
            PlanNodeKind::GetEdges(GetEdgesNode {
                space_id: ctx.base.space.id,
                src,
                edge_type: Expression::constant(i64::from(ctx.edge_type)),
                ranking,
                dst,
                props: vec![edge_props],
                dedup: true,
            }),
            Vec::new(),
            Vec::new(),
        );
        if !input_var.is_empty() {
            qctx.set_input_var(get_edges, &input_var);
        }

        // 不存在的边返回空行
        let not_empty = Expression::unary(
            UnaryOperator::IsNotEmpty,
            Expression::edge_prop(ctx.edge_name.as_str(), K_SRC),
        );
        let filter = PlanNodeFactory::filter(qctx, get_edges, not_empty);
        let mut root = PlanNodeFactory::project(qctx, filter, ctx.yield_expr.clone());
        qctx.set_col_names(root, ctx.col_names.clone());
        if ctx.distinct {
            root = PlanNodeFactory::dedup(qctx, root);
        }
        Ok(SubPlan::new(root, get_edges))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SpaceInfo;
    use crate::core::{YieldColumn, YieldColumns};
    use crate::query::context::ast::{AstContextBase, EdgeKeyRef};
    use crate::query::context::managers::MemorySchemaManager;
    use std::sync::Arc;

    fn create_test_query_context() -> QueryContext {
        let schema = Arc::new(MemorySchemaManager::new());
        QueryContext::new(1, schema.clone(), schema)
    }

    fn fetch_ctx() -> FetchEdgesContext {
        let mut yields = YieldColumns::new();
        yields.add_column(YieldColumn::new(Expression::edge_prop("like", "likeness"), "likeness"));
        FetchEdgesContext {
            base: AstContextBase::new("FETCH PROP ON like \"a\"->\"b\"", SpaceInfo::new(1, "s")),
            edge_type: 5,
            edge_name: "like".to_string(),
            yield_expr: yields,
            col_names: vec!["likeness".to_string()],
            ..FetchEdgesContext::default()
        }
    }

    #[test]
    fn test_constant_keys() {
        let mut qctx = create_test_query_context();
        let mut ctx = fetch_ctx();
        ctx.keys.push(EdgeKeyRef {
            src: Value::from("a"),
            dst: Value::from("b"),
            rank: 0,
        });
        let plan = FetchEdgesPlanner::new()
            .transform(&mut qctx, &AstContext::FetchEdges(ctx))
            .expect("fetch plan");
        let tail = plan.tail.expect("tail");
        assert_eq!(qctx.node(tail).name(), "GetEdges");
        let var = qctx.node(tail).input_var().expect("keys var").to_string();
        let cols = &qctx.sym_table().get_var(&var).expect("keys symbol").col_names;
        assert_eq!(cols, &vec!["_src", "_type", "_rank", "_dst"]);

        let root = plan.root.expect("root");
        let filter = qctx.node(root).dep(0).expect("filter");
        assert_eq!(qctx.node(filter).name(), "Filter");
    }

    #[test]
    fn test_pipe_keys_require_src_and_dst() {
        let mut qctx = create_test_query_context();
        let mut ctx = fetch_ctx();
        ctx.src = Some(Expression::input_prop("s"));
        let err = FetchEdgesPlanner::new()
            .transform(&mut qctx, &AstContext::FetchEdges(ctx))
            .expect_err("missing dst");
        assert!(matches!(err, PlannerError::InvalidAstContext(_)));
    }
}
