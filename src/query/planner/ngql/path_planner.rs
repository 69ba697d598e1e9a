//! FIND PATH 规划器
//!
//! 两端各一个 GetNeighbors，在循环里交替扩展：
//! - 单起点单终点的最短路径：BFSShortest
//! - 多起点或多终点的最短路径：MultiShortestPath，由终止变量结束循环
//! - ALL/NOLOOP：ProduceAllPaths
//! WITH PROP 时再为路径上的点和边补齐属性。

use crate::core::types::{EdgeDirection, EdgeProp, EdgeType, VertexProp, K_DST, K_RANK, K_TYPE, K_VID};
use crate::core::{Expression, ExpressionUtils, Value, YieldColumn, YieldColumns};
use crate::query::context::ast::{AstContext, FromType, PathContext, Starts};
use crate::query::planner::plan::{
    AllPathsNode, DataCollectKind, GetEdgesNode, GetNeighborsNode, GetVerticesNode,
    PlanNodeFactory, PlanNodeId, PlanNodeKind, ShortestPathNode, SubPlan,
};
use crate::query::planner::planner::{Planner, PlannerError};
use crate::query::planner::utils::PlannerUtil;
use crate::query::QueryContext;
use std::collections::BTreeSet;

const PATH_COL: &str = "path";

#[derive(Debug, Default)]
pub struct PathPlanner {
    path_ctx: PathContext,
    runtime_from: Option<SubPlan>,
    runtime_to: Option<SubPlan>,
}

fn is_constant_starts(starts: &Starts) -> bool {
    !starts.vids.is_empty() && starts.original_src.is_none()
}

fn unary_call(name: &str, col: i32) -> Expression {
    Expression::function(name, vec![Expression::Column(col)])
}

impl PathPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn make() -> Box<dyn Planner> {
        Box::new(Self::new())
    }

    pub fn match_ast_ctx(ast_ctx: &AstContext) -> bool {
        matches!(ast_ctx, AstContext::Path(_))
    }

    /// `reverse` 为真时是终点一侧的扩展，边方向取反
    fn build_edge_props(&self, reverse: bool) -> Vec<EdgeProp> {
        let mut props = Vec::new();
        match self.path_ctx.over.direction {
            EdgeDirection::In => self.do_build_edge_props(&mut props, reverse, true),
            EdgeDirection::Out => self.do_build_edge_props(&mut props, reverse, false),
            EdgeDirection::Both => {
                self.do_build_edge_props(&mut props, reverse, true);
                self.do_build_edge_props(&mut props, reverse, false);
            }
        }
        props
    }

    fn do_build_edge_props(&self, props: &mut Vec<EdgeProp>, reverse: bool, is_in_edge: bool) {
        for e in &self.path_ctx.over.edge_types {
            let edge_type: EdgeType = if reverse == is_in_edge { *e } else { -e };
            props.push(PlannerUtil::edge_prop(
                edge_type,
                self.path_ctx.expr_props.edge_props.get(e),
                &[K_DST, K_TYPE, K_RANK],
            ));
        }
    }

    fn build_start(&mut self, qctx: &mut QueryContext, reverse: bool) -> Result<String, PlannerError> {
        let input_var = self.path_ctx.input_var_name.clone();
        let starts = if reverse {
            &mut self.path_ctx.to
        } else {
            &mut self.path_ctx.from
        };
        if is_constant_starts(starts) {
            return Ok(PlannerUtil::build_constant_input(qctx, starts));
        }
        let plan = PlannerUtil::build_runtime_input(qctx, starts, &input_var)?;
        let vids_var = qctx.node(plan.root_id()?).output_var().to_string();
        if reverse {
            self.runtime_to = Some(plan);
        } else {
            self.runtime_from = Some(plan);
        }
        Ok(vids_var)
    }

    /// 两端起点都来自运行时输入时，终点一侧接在起点一侧之后
    fn build_runtime_vid_plan(&self, qctx: &mut QueryContext) -> Result<SubPlan, PlannerError> {
        match (&self.runtime_from, &self.runtime_to) {
            (None, None) => Ok(SubPlan::default()),
            (None, Some(to)) => Ok(to.clone()),
            (Some(from), None) => Ok(from.clone()),
            (Some(from), Some(to)) => {
                let to_project = to.tail_id()?;
                qctx.set_dep(to_project, 0, from.root_id()?);
                let to_starts = &self.path_ctx.to;
                let input = match to_starts.from_type {
                    FromType::Variable => to_starts.user_defined_var_name.as_str(),
                    _ => self.path_ctx.input_var_name.as_str(),
                };
                qctx.set_input_var(to_project, input);
                Ok(SubPlan {
                    root: to.root,
                    tail: from.tail,
                })
            }
        }
    }

    /// 循环开始前把两端起点整理成单列 `_vid`
    fn loop_dep_plan(&self, qctx: &mut QueryContext) -> Result<SubPlan, PlannerError> {
        let mut plan = self.build_runtime_vid_plan(qctx)?;
        for var in [&self.path_ctx.from_vids_var, &self.path_ctx.to_vids_var] {
            let mut columns = YieldColumns::new();
            columns.add_column(YieldColumn::new(Expression::Column(0), K_VID));
            let project = PlanNodeFactory::make(
                qctx,
                PlanNodeKind::Project { columns },
                plan.root.into_iter().collect(),
                vec![K_VID.to_string()],
            );
            qctx.set_input_var(project, var);
            qctx.set_output_var(project, var);
            plan.root = Some(project);
            if plan.tail.is_none() {
                plan.tail = Some(project);
            }
        }
        Ok(plan)
    }

    fn loop_step_condition(&self, qctx: &mut QueryContext) -> Expression {
        let loop_steps = qctx.anon_var();
        qctx.set_value(&loop_steps, Value::Int(0));
        ExpressionUtils::step_condition(&loop_steps, (self.path_ctx.steps.steps() + 1) / 2)
    }

    fn get_neighbors(&self, qctx: &mut QueryContext, dep: PlanNodeId, reverse: bool) -> PlanNodeId {
        let mut gn = GetNeighborsNode::new(self.path_ctx.base.space.id, Expression::Column(0));
        gn.edge_props = self.build_edge_props(reverse);
        gn.edge_types = gn.edge_props.iter().map(|p| p.edge_type).collect();
        gn.direction = if reverse {
            self.path_ctx.over.direction.reverse()
        } else {
            self.path_ctx.over.direction
        };
        gn.dedup = true;
        let id = qctx.make_node(PlanNodeKind::GetNeighbors(gn), vec![dep]);
        let input = if reverse {
            &self.path_ctx.to_vids_var
        } else {
            &self.path_ctx.from_vids_var
        };
        qctx.set_input_var(id, input);
        match &self.path_ctx.filter {
            Some(filter) => PlanNodeFactory::filter(qctx, id, filter.clone()),
            None => id,
        }
    }

    fn shortest_node(&self, termination_var: Option<String>) -> ShortestPathNode {
        ShortestPathNode {
            steps: self.path_ctx.steps.steps(),
            left_vid_var: self.path_ctx.from_vids_var.clone(),
            right_vid_var: self.path_ctx.to_vids_var.clone(),
            termination_var,
            single_shortest: self.path_ctx.single_shortest,
            limit: self.path_ctx.limit,
        }
    }

    fn collect(
        &self,
        qctx: &mut QueryContext,
        loop_node: PlanNodeId,
        path: PlanNodeId,
        kind: DataCollectKind,
    ) -> PlanNodeId {
        let dc = PlanNodeFactory::data_collect(
            qctx,
            vec![loop_node],
            kind,
            self.path_ctx.col_names.clone(),
        );
        let path_var = qctx.node(path).output_var().to_string();
        qctx.set_input_var(dc, &path_var);
        dc
    }

    fn single_pair_plan(
        &self,
        qctx: &mut QueryContext,
        left: PlanNodeId,
        right: PlanNodeId,
    ) -> SubPlan {
        let path = PlanNodeFactory::make(
            qctx,
            PlanNodeKind::BfsShortestPath(self.shortest_node(None)),
            vec![left, right],
            vec![PATH_COL.to_string()],
        );
        // 步数未到且尚未找到路径时继续
        let path_var = qctx.node(path).output_var().to_string();
        let step = self.loop_step_condition(qctx);
        let not_found = Expression::or(
            ExpressionUtils::equal_condition(&path_var, Value::Empty),
            ExpressionUtils::zero_condition(&path_var),
        );
        let loop_node =
            PlanNodeFactory::loop_node(qctx, None, path, Expression::and(step, not_found));
        let dc = self.collect(qctx, loop_node, path, DataCollectKind::BfsShortest);
        SubPlan::new(dc, loop_node)
    }

    fn multi_pair_plan(
        &self,
        qctx: &mut QueryContext,
        left: PlanNodeId,
        right: PlanNodeId,
    ) -> Result<SubPlan, PlannerError> {
        let termination_var = qctx.anon_var();
        let path = PlanNodeFactory::make(
            qctx,
            PlanNodeKind::MultiShortestPath(self.shortest_node(Some(termination_var.clone()))),
            vec![left, right],
            vec![PATH_COL.to_string()],
        );
        let loop_dep = self.loop_dep_plan(qctx)?;
        let step = self.loop_step_condition(qctx);
        let terminate = ExpressionUtils::equal_condition(&termination_var, Value::Bool(false));
        let loop_node =
            PlanNodeFactory::loop_node(qctx, loop_dep.root, path, Expression::and(step, terminate));
        let dc = self.collect(qctx, loop_node, path, DataCollectKind::MultiplePairShortest);
        Ok(SubPlan::new(dc, loop_dep.tail_id()?))
    }

    fn all_pair_plan(
        &self,
        qctx: &mut QueryContext,
        left: PlanNodeId,
        right: PlanNodeId,
    ) -> Result<SubPlan, PlannerError> {
        let path = PlanNodeFactory::make(
            qctx,
            PlanNodeKind::ProduceAllPaths(AllPathsNode {
                steps: self.path_ctx.steps.steps(),
                no_loop: self.path_ctx.no_loop,
                left_vid_var: self.path_ctx.from_vids_var.clone(),
                right_vid_var: self.path_ctx.to_vids_var.clone(),
                limit: self.path_ctx.limit,
            }),
            vec![left, right],
            vec![PATH_COL.to_string()],
        );
        let loop_dep = self.loop_dep_plan(qctx)?;
        let condition = self.loop_step_condition(qctx);
        let loop_node = PlanNodeFactory::loop_node(qctx, loop_dep.root, path, condition);
        let dc = self.collect(qctx, loop_node, path, DataCollectKind::AllPaths);
        Ok(SubPlan::new(dc, loop_dep.tail_id()?))
    }

    /// 所有 tag 的全部属性
    fn all_vertex_props(&self, qctx: &QueryContext) -> Vec<VertexProp> {
        qctx.schema_manager()
            .list_tags(self.path_ctx.base.space.id)
            .into_iter()
            .map(|tag| VertexProp {
                tag: tag.tag_id,
                props: tag.fields.into_iter().map(|f| f.name).collect(),
            })
            .collect()
    }

    fn all_edge_props(&self, qctx: &QueryContext) -> Vec<EdgeProp> {
        let space_id = self.path_ctx.base.space.id;
        self.path_ctx
            .over
            .edge_type_ids()
            .into_iter()
            .map(|edge_type| {
                let fields: BTreeSet<String> = qctx
                    .schema_manager()
                    .get_edge_type(space_id, edge_type)
                    .map(|e| e.fields.into_iter().map(|f| f.name).collect())
                    .unwrap_or_default();
                PlannerUtil::edge_prop(edge_type, Some(&fields), &[K_DST, K_TYPE, K_RANK])
            })
            .collect()
    }

    /// 第 0 列为路径，展开后取点或边
    fn unwind_path(
        &self,
        qctx: &mut QueryContext,
        dep: PlanNodeId,
        input: &str,
        func: &str,
        alias: &str,
    ) -> PlanNodeId {
        let mut columns = YieldColumns::new();
        columns.add_column(YieldColumn::new(unary_call(func, 0), alias));
        let project = PlanNodeFactory::project(qctx, dep, columns);
        qctx.set_input_var(project, input);
        PlanNodeFactory::unwind(qctx, project, Expression::Column(0), alias)
    }

    fn build_vertex_plan(&self, qctx: &mut QueryContext, dep: PlanNodeId, input: &str) -> PlanNodeId {
        let unwind = self.unwind_path(qctx, dep, input, "nodes", "nodes");
        let props = self.all_vertex_props(qctx);
        PlanNodeFactory::make(
            qctx,
            PlanNodeKind::GetVertices(GetVerticesNode {
                space_id: self.path_ctx.base.space.id,
                src: unary_call("id", 1),
                props,
                dedup: true,
            }),
            vec![unwind],
            Vec::new(),
        )
    }

    fn build_edge_plan(&self, qctx: &mut QueryContext, dep: PlanNodeId, input: &str) -> PlanNodeId {
        let unwind = self.unwind_path(qctx, dep, input, "relationships", "edges");
        let props = self.all_edge_props(qctx);
        PlanNodeFactory::make(
            qctx,
            PlanNodeKind::GetEdges(GetEdgesNode {
                space_id: self.path_ctx.base.space.id,
                src: unary_call("src", 1),
                edge_type: unary_call("typeid", 1),
                ranking: unary_call("rank", 1),
                dst: unary_call("dst", 1),
                props,
                dedup: true,
            }),
            vec![unwind],
            Vec::new(),
        )
    }

    /// PassThrough 分出点、边两支，DataCollect 汇总为带属性的路径
    fn build_path_prop(&self, qctx: &mut QueryContext, dep: PlanNodeId) -> PlanNodeId {
        let dep_var = qctx.node(dep).output_var().to_string();
        let pt = PlanNodeFactory::pass_through(qctx, Some(dep));
        let vertex_plan = self.build_vertex_plan(qctx, pt, &dep_var);
        let edge_plan = self.build_edge_plan(qctx, pt, &dep_var);
        let dc = PlanNodeFactory::data_collect(
            qctx,
            vec![vertex_plan, edge_plan],
            DataCollectKind::PathProp,
            self.path_ctx.col_names.clone(),
        );
        qctx.set_input_var_at(dc, 2, &dep_var);
        dc
    }
}

impl Planner for PathPlanner {
    fn transform(
        &mut self,
        qctx: &mut QueryContext,
        ast_ctx: &AstContext,
    ) -> Result<SubPlan, PlannerError> {
        let AstContext::Path(path_ctx) = ast_ctx else {
            return Err(PlannerError::unexpected_context("FIND PATH", ast_ctx));
        };
        self.path_ctx = path_ctx.clone();
        self.path_ctx.from_vids_var = self.build_start(qctx, false)?;
        self.path_ctx.to_vids_var = self.build_start(qctx, true)?;

        let start = PlanNodeFactory::start(qctx);
        let pt = PlanNodeFactory::pass_through(qctx, Some(start));
        let left = self.get_neighbors(qctx, pt, false);
        let right = self.get_neighbors(qctx, pt, true);

        let ctx = &self.path_ctx;
        let mut plan = if !ctx.is_shortest || ctx.no_loop {
            self.all_pair_plan(qctx, left, right)?
        } else if ctx.from.vids.len() == 1 && ctx.to.vids.len() == 1 {
            self.single_pair_plan(qctx, left, right)
        } else {
            self.multi_pair_plan(qctx, left, right)?
        };
        if self.path_ctx.with_prop {
            let root = plan.root_id()?;
            plan.root = Some(self.build_path_prop(qctx, root));
        }
        log::debug!(
            "FIND PATH {} from `{}' to `{}'",
            self.path_ctx.steps,
            self.path_ctx.from_vids_var,
            self.path_ctx.to_vids_var
        );
        Ok(plan)
    }
}
