//! GET SUBGRAPH 规划器
//!
//! 起点 -> Subgraph(循环体) -> Loop -> DataCollect(SUBGRAPH)；0 步时只取起点。

use crate::core::types::{EdgeProp, K_DST, K_RANK, K_TYPE};
use crate::core::{Expression, ExpressionUtils, Value};
use crate::query::context::ast::{AstContext, SubgraphContext};
use crate::query::planner::plan::{
    DataCollectKind, GetVerticesNode, PlanNodeFactory, PlanNodeId, PlanNodeKind, SubPlan,
    SubgraphNode,
};
use crate::query::planner::planner::{Planner, PlannerError};
use crate::query::planner::utils::PlannerUtil;
use crate::query::QueryContext;
use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub struct SubgraphPlanner;

impl SubgraphPlanner {
    pub fn new() -> Self {
        Self
    }

    pub fn make() -> Box<dyn Planner> {
        Box::new(Self::new())
    }

    pub fn match_ast_ctx(ast_ctx: &AstContext) -> bool {
        matches!(ast_ctx, AstContext::Subgraph(_))
    }

    /// 不取属性时只保留保留列
    fn edge_props(ctx: &SubgraphContext) -> Vec<EdgeProp> {
        let empty = BTreeSet::new();
        ctx.edge_types
            .iter()
            .map(|edge_type| {
                let wanted = if ctx.with_prop || ctx.get_edge_prop {
                    ctx.expr_props.edge_props.get(&edge_type.abs())
                } else {
                    Some(&empty)
                };
                PlannerUtil::edge_prop(*edge_type, wanted, &[K_DST, K_TYPE, K_RANK])
            })
            .collect()
    }

    fn zero_step(
        qctx: &mut QueryContext,
        ctx: &SubgraphContext,
        dep: Option<PlanNodeId>,
        src: Expression,
        vids_var: &str,
    ) -> PlanNodeId {
        let gv = PlanNodeFactory::make(
            qctx,
            PlanNodeKind::GetVertices(GetVerticesNode {
                space_id: ctx.base.space.id,
                src,
                props: PlannerUtil::vertex_props(&ctx.expr_props.tag_props),
                dedup: true,
            }),
            dep.into_iter().collect(),
            vec![ctx.col_names.first().cloned().unwrap_or_default()],
        );
        qctx.set_input_var(gv, vids_var);
        gv
    }
}

impl Planner for SubgraphPlanner {
    fn transform(
        &mut self,
        qctx: &mut QueryContext,
        ast_ctx: &AstContext,
    ) -> Result<SubPlan, PlannerError> {
        let AstContext::Subgraph(ctx) = ast_ctx else {
            return Err(PlannerError::unexpected_context("GET SUBGRAPH", ast_ctx));
        };
        let mut from = ctx.from.clone();
        let (starts, vids_var) = PlannerUtil::build_start(qctx, &mut from, &ctx.input_var_name)?;
        let src = from.src_expr();
        let steps = ctx.steps.steps();

        if steps == 0 {
            let gv = Self::zero_step(qctx, ctx, starts.root, src, &vids_var);
            let dc = PlanNodeFactory::data_collect(
                qctx,
                vec![gv],
                DataCollectKind::Subgraph,
                ctx.col_names.clone(),
            );
            return Ok(SubPlan::new(dc, starts.tail.unwrap_or(gv)));
        }

        let subgraph = PlanNodeFactory::make(
            qctx,
            PlanNodeKind::Subgraph(SubgraphNode {
                space_id: ctx.base.space.id,
                src,
                steps,
                vertex_props: PlannerUtil::vertex_props(&ctx.expr_props.tag_props),
                edge_props: Self::edge_props(ctx),
                bi_direct_edge_types: ctx.bi_direct_edge_types.clone(),
                filter: ctx.filter.clone(),
                tag_filter: ctx.tag_filter.clone(),
                edge_filter: ctx.edge_filter.clone(),
            }),
            Vec::new(),
            ctx.col_names.clone(),
        );
        // Subgraph 的输出作为下一轮的起点
        qctx.set_input_var(subgraph, &vids_var);
        qctx.set_output_var(subgraph, &vids_var);

        let loop_steps = qctx.anon_var();
        qctx.set_value(&loop_steps, Value::Int(0));
        let condition = ExpressionUtils::step_condition(&loop_steps, steps);
        let loop_node = PlanNodeFactory::loop_node(qctx, starts.root, subgraph, condition);

        let dc = PlanNodeFactory::data_collect(
            qctx,
            vec![loop_node],
            DataCollectKind::Subgraph,
            ctx.col_names.clone(),
        );
        qctx.set_input_var(dc, &vids_var);
        log::debug!("GET SUBGRAPH {} from `{}'", ctx.steps, vids_var);
        Ok(SubPlan::new(dc, starts.tail.unwrap_or(loop_node)))
    }
}
