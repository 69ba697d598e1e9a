//! GO语句规划器
//!
//! 根据步数生成不同形态的计划：
//! - 0 步：直接读取起点
//! - 1 步：GetNeighbors 后过滤、投影
//! - N 步：前 N-1 步用 Expand，最后一步用 ExpandAll；简单查询用 GetDstBySrc 循环
//! - M..N 步：循环体内逐步展开，结果由 DataCollect 收集

use crate::core::types::{EdgeDirection, EdgeProp, EdgeType, K_DST, K_EXPAND_DST, K_VID};
use crate::core::{ArithmeticOperator, Expression, ExpressionUtils, Value, YieldColumn, YieldColumns};
use crate::query::context::ast::{AstContext, FromType, GoContext, StepClause};
use crate::query::planner::plan::{
    ExpandAllNode, ExpandNode, GetDstBySrcNode, GetNeighborsNode, GetVerticesNode, JoinKeys,
    PlanNodeFactory, PlanNodeId, PlanNodeKind, SubPlan,
};
use crate::query::planner::planner::{Planner, PlannerError};
use crate::query::planner::utils::PlannerUtil;
use crate::query::QueryContext;

const EXPAND_VID: &str = "_expand_vid";
const EXPANDALL_VID: &str = "_expandall_vid";
const EXPANDALL_DST: &str = "_expandall_dst";
const JOIN_DST_VID: &str = "JOIN_DST_VID";
const TRACK_DST_VID: &str = "TRACK_DST_VID";
const GET_VERTEX_VID: &str = "_getVertex_vid";

/// GO语句规划器
#[derive(Debug, Default)]
pub struct GoPlanner {
    go_ctx: GoContext,
    start_node: Option<PlanNodeId>,
    pre_root: Option<PlanNodeId>,
    loop_step_var: String,
    src_vid_col_name: String,
    dst_vid_col_name: String,
}

impl GoPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn make() -> Box<dyn Planner> {
        Box::new(Self::new())
    }

    pub fn match_ast_ctx(ast_ctx: &AstContext) -> bool {
        matches!(ast_ctx, AstContext::Go(_))
    }

    fn start_node(&self) -> Result<PlanNodeId, PlannerError> {
        self.start_node
            .ok_or_else(|| PlannerError::PlanGenerationFailed("GO start node not built".into()))
    }

    fn space_id(&self) -> i32 {
        self.go_ctx.base.space.id
    }

    fn src(&self) -> Expression {
        self.go_ctx.from.src_expr()
    }

    /// 入边取负的边类型；BOTH 方向先入边后出边
    fn build_edge_props(&self, only_dst: bool) -> Vec<EdgeProp> {
        let mut props = Vec::new();
        match self.go_ctx.over.direction {
            EdgeDirection::In => self.do_build_edge_props(&mut props, only_dst, true),
            EdgeDirection::Out => self.do_build_edge_props(&mut props, only_dst, false),
            EdgeDirection::Both => {
                self.do_build_edge_props(&mut props, only_dst, true);
                self.do_build_edge_props(&mut props, only_dst, false);
            }
        }
        props
    }

    fn do_build_edge_props(&self, props: &mut Vec<EdgeProp>, only_dst: bool, is_in_edge: bool) {
        for e in &self.go_ctx.over.edge_types {
            let edge_type: EdgeType = if is_in_edge { -e } else { *e };
            let wanted = if only_dst {
                None
            } else {
                self.go_ctx.expr_props.edge_props.get(e)
            };
            props.push(PlannerUtil::edge_prop(edge_type, wanted, &[K_DST]));
        }
    }

    /// `++$step <= steps AND ($var == __EMPTY__ OR size($var) != 0)`
    fn loop_condition(&self, qctx: &mut QueryContext, steps: u32, var: &str) -> Expression {
        qctx.set_value(&self.loop_step_var, Value::Int(0));
        let step = ExpressionUtils::step_condition(&self.loop_step_var, steps);
        let empty = ExpressionUtils::equal_condition(var, Value::Empty);
        let ne_zero = ExpressionUtils::ne_zero_condition(var);
        Expression::and(step, Expression::or(empty, ne_zero))
    }

    fn build_sample_limit_impl(
        &self,
        qctx: &mut QueryContext,
        input: PlanNodeId,
        count: Expression,
    ) -> PlanNodeId {
        let node = if self.go_ctx.random {
            PlanNodeFactory::sample(qctx, input, count)
        } else {
            qctx.make_node(PlanNodeKind::Limit { offset: 0, count }, vec![input])
        };
        let col_names = qctx.node(input).col_names().to_vec();
        qctx.set_col_names(node, col_names);
        node
    }

    /// 第 `step` 步的采样或截断，未指定 limits 时原样返回
    fn build_sample_limit(&self, qctx: &mut QueryContext, input: PlanNodeId, step: u32) -> PlanNodeId {
        let Some(limit) = step
            .checked_sub(1)
            .and_then(|i| self.go_ctx.limits.get(i as usize))
            .copied()
        else {
            return input;
        };
        self.build_sample_limit_impl(qctx, input, Expression::constant(limit))
    }

    /// 循环内按当前步数取 `$limits[$step-1]`
    fn build_step_sample_limit(&self, qctx: &mut QueryContext, input: PlanNodeId) -> PlanNodeId {
        if self.go_ctx.limits.is_empty() {
            return input;
        }
        let limits_var = qctx.anon_var();
        let limits = self.go_ctx.limits.iter().map(|l| Value::Int(*l)).collect();
        qctx.set_value(&limits_var, Value::List(limits));
        let step_dec = Expression::arithmetic(
            ArithmeticOperator::Sub,
            Expression::variable(self.loop_step_var.as_str()),
            Expression::constant(1),
        );
        let count = Expression::subscript(Expression::variable(limits_var), step_dec);
        self.build_sample_limit_impl(qctx, input, count)
    }

    fn get_neighbors(&self, qctx: &mut QueryContext, dep: PlanNodeId) -> PlanNodeId {
        let mut gn = GetNeighborsNode::new(self.space_id(), self.src());
        gn.edge_types = self.go_ctx.over.edge_type_ids();
        gn.direction = self.go_ctx.over.direction;
        gn.vertex_props = PlannerUtil::vertex_props(&self.go_ctx.expr_props.src_tag_props);
        gn.edge_props = self.build_edge_props(false);
        gn.random = self.go_ctx.random;
        let id = qctx.make_node(PlanNodeKind::GetNeighbors(gn), vec![dep]);
        qctx.set_input_var(id, &self.go_ctx.vids_var);
        id
    }

    fn get_dst_by_src(&self, qctx: &mut QueryContext, dep: PlanNodeId) -> (PlanNodeId, PlanNodeId) {
        let gd = PlanNodeFactory::make(
            qctx,
            PlanNodeKind::GetDstBySrc(GetDstBySrcNode {
                space_id: self.space_id(),
                src: self.src(),
                edge_types: self.go_ctx.over.edge_type_ids(),
            }),
            vec![dep],
            // 与起点同名，循环中下一轮仍按 `$-._vid` 读取
            vec![K_VID.to_string()],
        );
        qctx.set_input_var(gd, &self.go_ctx.vids_var);
        let dedup = PlanNodeFactory::dedup(qctx, gd);
        (gd, dedup)
    }

    /// 从 GetNeighbors 结果中取出源点属性、边属性以及连接需要的列
    fn extract_src_edge_props_from_gn(
        &self,
        qctx: &mut QueryContext,
        dep: PlanNodeId,
        input: &str,
    ) -> PlanNodeId {
        let mut columns = self.go_ctx.edge_props_expr.clone();
        if self.go_ctx.join_input {
            columns.add_column(YieldColumn::new(Expression::Column(0), K_VID));
        }
        if self.go_ctx.join_dst {
            columns.add_column(YieldColumn::new(
                Expression::edge_prop("*", K_DST),
                JOIN_DST_VID,
            ));
        }
        let project = PlanNodeFactory::project(qctx, dep, columns);
        qctx.set_input_var(project, input);
        project
    }

    /// 记录每个源点和终点的对应关系，输出列 {srcVidColName, TRACK_DST_VID}
    fn extract_src_dst_from_gn(
        &mut self,
        qctx: &mut QueryContext,
        dep: PlanNodeId,
        input: &str,
    ) -> PlanNodeId {
        self.src_vid_col_name = qctx.anon_col();
        let mut columns = YieldColumns::new();
        columns.add_column(YieldColumn::new(
            Expression::Column(0),
            self.src_vid_col_name.as_str(),
        ));
        columns.add_column(YieldColumn::new(
            Expression::edge_prop("*", K_DST),
            TRACK_DST_VID,
        ));
        let project = PlanNodeFactory::project(qctx, dep, columns);
        qctx.set_input_var(project, input);
        PlanNodeFactory::dedup(qctx, project)
    }

    /// 从上一条语句的结果中取出起点，输出列 {runtimeVidName, dstVidColName}
    fn extract_vid_from_runtime_input(
        &mut self,
        qctx: &mut QueryContext,
        dep: PlanNodeId,
    ) -> Result<PlanNodeId, PlannerError> {
        let from = &self.go_ctx.from;
        let original_src = from
            .original_src
            .clone()
            .ok_or_else(|| PlannerError::InvalidAstContext("GO input without source".into()))?;
        self.dst_vid_col_name = qctx.anon_col();
        let mut columns = YieldColumns::new();
        columns.add_column(YieldColumn::new(
            original_src.clone(),
            self.go_ctx.from.runtime_vid_name.as_str(),
        ));
        columns.add_column(YieldColumn::new(original_src, self.dst_vid_col_name.as_str()));
        let project = PlanNodeFactory::project(qctx, dep, columns);
        let input = self.input_var_name().to_string();
        qctx.set_input_var(project, &input);
        Ok(PlanNodeFactory::dedup(qctx, project))
    }

    /// 每一步把起点映射到新的终点，结果写回 `left` 的输出变量
    fn track_start_vid(
        &self,
        qctx: &mut QueryContext,
        left: PlanNodeId,
        right: PlanNodeId,
    ) -> PlanNodeId {
        let hash_key =
            Expression::var_prop(qctx.node(left).output_var(), self.dst_vid_col_name.as_str());
        let probe_key =
            Expression::var_prop(qctx.node(right).output_var(), self.src_vid_col_name.as_str());
        let join = PlanNodeFactory::hash_inner_join(
            qctx,
            left,
            right,
            JoinKeys::new(vec![hash_key], vec![probe_key]),
        );

        let vid_name = self.go_ctx.from.runtime_vid_name.as_str();
        let mut columns = YieldColumns::new();
        columns.add_column(YieldColumn::new(Expression::input_prop(vid_name), vid_name));
        columns.add_column(YieldColumn::new(
            Expression::input_prop(TRACK_DST_VID),
            self.dst_vid_col_name.as_str(),
        ));
        let project = PlanNodeFactory::project(qctx, join, columns);
        let dedup = PlanNodeFactory::dedup(qctx, project);
        let left_var = qctx.node(left).output_var().to_string();
        qctx.set_output_var(dedup, &left_var);
        dedup
    }

    /// 左连接终点属性，输出列追加 dstPropsExpr 的各列
    fn build_join_dst_plan(&self, qctx: &mut QueryContext, dep: PlanNodeId) -> PlanNodeId {
        let col_name = qctx
            .node(dep)
            .col_names()
            .last()
            .cloned()
            .unwrap_or_else(|| JOIN_DST_VID.to_string());
        let arg = PlanNodeFactory::argument(qctx, &col_name);

        let get_vertices = PlanNodeFactory::make(
            qctx,
            PlanNodeKind::GetVertices(GetVerticesNode {
                space_id: self.space_id(),
                src: Expression::Column(-1),
                props: PlannerUtil::vertex_props(&self.go_ctx.expr_props.dst_tag_props),
                dedup: true,
            }),
            vec![arg],
            vec![K_VID.to_string()],
        );

        let mut dst_columns = self.go_ctx.dst_props_expr.clone();
        dst_columns.add_column(YieldColumn::new(Expression::Column(0), GET_VERTEX_VID));
        let project = PlanNodeFactory::project(qctx, get_vertices, dst_columns);

        PlanNodeFactory::hash_left_join(
            qctx,
            dep,
            project,
            JoinKeys::new(vec![Expression::Column(-1)], vec![Expression::Column(-1)]),
        )
    }

    fn input_var_name(&self) -> &str {
        match self.go_ctx.from.from_type {
            FromType::Variable => &self.go_ctx.from.user_defined_var_name,
            _ => &self.go_ctx.input_var_name,
        }
    }

    /// 与上一条语句的结果做内连接
    fn build_join_input_plan(
        &self,
        qctx: &mut QueryContext,
        dep: PlanNodeId,
    ) -> Result<PlanNodeId, PlannerError> {
        let from = &self.go_ctx.from;
        let steps = &self.go_ctx.steps;
        let vid_name = if !steps.is_m_to_n && steps.steps() == 1 {
            K_VID
        } else {
            from.runtime_vid_name.as_str()
        };
        let hash_key = from
            .original_src
            .clone()
            .ok_or_else(|| PlannerError::InvalidAstContext("GO input without source".into()))?;
        let probe_key = Expression::var_prop(qctx.node(dep).output_var(), vid_name);
        self.join_with_input(qctx, dep, hash_key, probe_key)
    }

    fn join_with_input(
        &self,
        qctx: &mut QueryContext,
        dep: PlanNodeId,
        hash_key: Expression,
        probe_key: Expression,
    ) -> Result<PlanNodeId, PlannerError> {
        let pre_root = self.pre_root.ok_or_else(|| {
            PlannerError::MissingVariable(self.input_var_name().to_string())
        })?;
        let mut col_names = qctx
            .sym_table()
            .get_var(self.input_var_name())
            .map(|v| v.col_names.clone())
            .unwrap_or_default();
        col_names.extend(qctx.node(dep).col_names().iter().cloned());
        let join = PlanNodeFactory::hash_inner_join(
            qctx,
            pre_root,
            dep,
            JoinKeys::new(vec![hash_key], vec![probe_key]),
        );
        qctx.set_col_names(join, col_names);
        Ok(join)
    }

    /// 第 n-1 步的 dstVidColName 与最后一步的 `_vid` 内连接
    fn last_step_join_input(
        &self,
        qctx: &mut QueryContext,
        left: PlanNodeId,
        right: PlanNodeId,
    ) -> PlanNodeId {
        let hash_key =
            Expression::var_prop(qctx.node(left).output_var(), self.dst_vid_col_name.as_str());
        let probe_key = Expression::var_prop(qctx.node(right).output_var(), K_VID);
        PlanNodeFactory::hash_inner_join(
            qctx,
            left,
            right,
            JoinKeys::new(vec![hash_key], vec![probe_key]),
        )
    }

    fn build_one_step_join_plan(
        &self,
        qctx: &mut QueryContext,
        gn: PlanNodeId,
    ) -> Result<PlanNodeId, PlannerError> {
        if !self.go_ctx.join_input && !self.go_ctx.join_dst {
            return Ok(gn);
        }
        let input = qctx.node(gn).output_var().to_string();
        let mut dep = self.extract_src_edge_props_from_gn(qctx, gn, &input);
        if self.go_ctx.join_dst {
            dep = self.build_join_dst_plan(qctx, dep);
        }
        if self.go_ctx.join_input {
            dep = self.build_join_input_plan(qctx, dep)?;
        }
        Ok(dep)
    }

    /// 过滤、投影与去重
    fn finish(&self, qctx: &mut QueryContext, mut cur: PlanNodeId) -> PlanNodeId {
        if let Some(filter) = &self.go_ctx.filter {
            cur = PlanNodeFactory::filter(qctx, cur, filter.clone());
        }
        cur = PlanNodeFactory::project(qctx, cur, self.go_ctx.yield_expr.clone());
        qctx.set_col_names(cur, self.go_ctx.col_names.clone());
        if self.go_ctx.distinct {
            cur = PlanNodeFactory::dedup(qctx, cur);
        }
        cur
    }

    /// 简单查询只需要终点 ID
    fn simple_step(&self, qctx: &mut QueryContext, dep: PlanNodeId) -> PlanNodeId {
        let (gd, dedup) = self.get_dst_by_src(qctx, dep);
        let mut cur = dedup;
        if self.go_ctx.join_dst {
            cur = self.build_join_dst_plan(qctx, cur);
        }
        if let Some(filter) = &self.go_ctx.filter {
            cur = PlanNodeFactory::filter(qctx, cur, filter.clone());
        }
        if self.go_ctx.join_dst || self.go_ctx.yield_expr.len() != 1 {
            cur = PlanNodeFactory::project(qctx, cur, self.go_ctx.yield_expr.clone());
        } else {
            qctx.set_col_names(gd, self.go_ctx.col_names.clone());
        }
        qctx.set_col_names(cur, self.go_ctx.col_names.clone());
        cur
    }

    fn zero_step_plan(&self, qctx: &mut QueryContext) -> Result<SubPlan, PlannerError> {
        let start = self.start_node()?;
        let gv = PlanNodeFactory::make(
            qctx,
            PlanNodeKind::GetVertices(GetVerticesNode {
                space_id: self.space_id(),
                src: self.src(),
                props: PlannerUtil::vertex_props(&self.go_ctx.expr_props.src_tag_props),
                dedup: true,
            }),
            vec![start],
            self.go_ctx.col_names.clone(),
        );
        qctx.set_input_var(gv, &self.go_ctx.vids_var);
        Ok(SubPlan::new(gv, start))
    }

    fn one_step_plan(&self, qctx: &mut QueryContext) -> Result<SubPlan, PlannerError> {
        let start = self.start_node()?;
        let root = if self.go_ctx.is_simple {
            self.simple_step(qctx, start)
        } else {
            let gn = self.get_neighbors(qctx, start);
            let sampled = self.build_sample_limit(qctx, gn, 1);
            let cur = self.build_one_step_join_plan(qctx, sampled)?;
            self.finish(qctx, cur)
        };
        Ok(SubPlan::new(root, start))
    }

    fn last_step(&self, qctx: &mut QueryContext, dep: PlanNodeId) -> PlanNodeId {
        if self.go_ctx.is_simple {
            return self.simple_step(qctx, dep);
        }
        let gn = self.get_neighbors(qctx, dep);
        let sampled = self.build_sample_limit(qctx, gn, self.go_ctx.steps.steps());
        let mut root = sampled;
        if self.go_ctx.join_dst {
            let input = qctx.node(sampled).output_var().to_string();
            root = self.extract_src_edge_props_from_gn(qctx, sampled, &input);
            root = self.build_join_dst_plan(qctx, root);
        }
        self.finish(qctx, root)
    }

    fn n_steps_plan(&mut self, qctx: &mut QueryContext) -> Result<SubPlan, PlannerError> {
        self.loop_step_var = qctx.anon_var();
        let start = self.start_node()?;
        let steps = self.go_ctx.steps.steps();

        if !self.go_ctx.join_input && self.go_ctx.limits.is_empty() {
            let (_, dedup) = self.get_dst_by_src(qctx, start);
            let vids_var = self.go_ctx.vids_var.clone();
            qctx.set_output_var(dedup, &vids_var);
            let condition = self.loop_condition(qctx, steps - 1, &vids_var);
            let loop_node = PlanNodeFactory::loop_node(qctx, None, dedup, condition);
            let root = self.last_step(qctx, loop_node);
            return Ok(SubPlan::new(root, loop_node));
        }

        // 前 n-1 步
        let expand = PlanNodeFactory::make(
            qctx,
            PlanNodeKind::Expand(ExpandNode {
                space_id: self.space_id(),
                src: self.src(),
                edge_props: self.build_edge_props(true),
                step_limit: steps - 1,
                sample: self.go_ctx.random,
                limits: self.go_ctx.limits.clone(),
                join_input: self.go_ctx.join_input,
            }),
            vec![start],
            vec![EXPAND_VID.to_string(), K_EXPAND_DST.to_string()],
        );
        qctx.set_input_var(expand, &self.go_ctx.vids_var);

        // 最后一步
        let arg = PlanNodeFactory::argument(qctx, K_EXPAND_DST);
        let mut vertex_columns = self.go_ctx.src_props_expr.clone();
        vertex_columns.add_column(YieldColumn::new(Expression::Column(0), EXPANDALL_VID));
        let mut edge_columns = self.go_ctx.edge_props_expr.clone();
        if self.go_ctx.join_dst {
            edge_columns.add_column(YieldColumn::new(
                Expression::edge_prop("*", K_DST),
                EXPANDALL_DST,
            ));
        }
        let mut col_names = vertex_columns.names();
        col_names.extend(edge_columns.names());
        let expand_all = PlanNodeFactory::make(
            qctx,
            PlanNodeKind::ExpandAll(ExpandAllNode {
                space_id: self.space_id(),
                min_steps: steps - 1,
                max_steps: steps,
                edge_props: self.build_edge_props(false),
                vertex_props: PlannerUtil::vertex_props(&self.go_ctx.expr_props.src_tag_props),
                edge_columns,
                vertex_columns,
                sample: self.go_ctx.random,
                limits: self.go_ctx.limits.clone(),
                join_input: self.go_ctx.join_input,
            }),
            vec![arg],
            col_names,
        );

        let mut dep = expand_all;
        if self.go_ctx.join_dst {
            dep = self.build_join_dst_plan(qctx, expand_all);
        }

        let hash_key = Expression::var_prop(qctx.node(expand).output_var(), K_EXPAND_DST);
        let probe_key = Expression::var_prop(qctx.node(dep).output_var(), EXPANDALL_VID);
        dep = PlanNodeFactory::hash_inner_join(
            qctx,
            expand,
            dep,
            JoinKeys::new(vec![hash_key], vec![probe_key]),
        );

        if self.go_ctx.join_input {
            let hash_key = self
                .go_ctx
                .from
                .original_src
                .clone()
                .ok_or_else(|| PlannerError::InvalidAstContext("GO input without source".into()))?;
            let probe_key = Expression::var_prop(qctx.node(dep).output_var(), EXPAND_VID);
            dep = self.join_with_input(qctx, dep, hash_key, probe_key)?;
        }

        let root = self.finish(qctx, dep);
        Ok(SubPlan::new(root, start))
    }

    fn m_to_n_steps_plan(&mut self, qctx: &mut QueryContext) -> Result<SubPlan, PlannerError> {
        self.loop_step_var = qctx.anon_var();
        let start = self.start_node()?;
        let n_steps = self.go_ctx.steps.n_steps;
        let vids_var = self.go_ctx.vids_var.clone();

        if self.go_ctx.is_simple {
            let body_start = PlanNodeFactory::start(qctx);
            let (gd, get_dst) = self.get_dst_by_src(qctx, body_start);
            qctx.set_output_var(get_dst, &vids_var);
            let mut body = get_dst;
            if self.go_ctx.join_dst {
                let mut columns = YieldColumns::new();
                columns.add_column(YieldColumn::new(Expression::Column(0), K_DST));
                body = PlanNodeFactory::project(qctx, body, columns);
                body = self.build_join_dst_plan(qctx, body);
            }
            if let Some(filter) = &self.go_ctx.filter {
                body = PlanNodeFactory::filter(qctx, body, filter.clone());
            }
            if self.go_ctx.join_dst || self.go_ctx.yield_expr.len() != 1 {
                body = PlanNodeFactory::project(qctx, body, self.go_ctx.yield_expr.clone());
            } else {
                qctx.set_col_names(gd, self.go_ctx.col_names.clone());
            }
            qctx.set_col_names(body, self.go_ctx.col_names.clone());

            let condition = self.loop_condition(qctx, n_steps, &vids_var);
            let loop_node = PlanNodeFactory::loop_node(qctx, Some(start), body, condition);
            // 循环体只有 GetDstBySrc 时，第 k 次迭代的结果是第 k+1 步
            let steps = if body == get_dst {
                StepClause::range(self.go_ctx.steps.m_steps + 1, n_steps + 1)
            } else {
                self.go_ctx.steps
            };
            let body_var = qctx.node(body).output_var().to_string();
            let dc = PlanNodeFactory::m_to_n_collect(
                qctx,
                loop_node,
                steps,
                self.go_ctx.distinct,
                self.go_ctx.col_names.clone(),
            );
            qctx.set_input_var(dc, &body_var);
            return Ok(SubPlan::new(dc, start));
        }

        let body_start = PlanNodeFactory::start(qctx);
        let gn = self.get_neighbors(qctx, body_start);
        let sampled = self.build_step_sample_limit(qctx, gn);
        let gn_var = qctx.node(sampled).output_var().to_string();
        let get_dst = self.extract_dst_from_gn(qctx, sampled, &gn_var, &vids_var);

        let mut body = get_dst;
        let mut loop_dep = start;
        let mut track_vid = None;
        if self.go_ctx.join_input {
            let join_left = self.extract_vid_from_runtime_input(qctx, start)?;
            let join_right = self.extract_src_dst_from_gn(qctx, get_dst, &gn_var);
            let tracked = self.track_start_vid(qctx, join_left, join_right);
            track_vid = Some(tracked);
            body = tracked;
            loop_dep = join_left;
        }

        let joined = self.go_ctx.join_input || self.go_ctx.join_dst;
        if joined {
            body = self.extract_src_edge_props_from_gn(qctx, body, &gn_var);
            if self.go_ctx.join_dst {
                body = self.build_join_dst_plan(qctx, body);
            }
            if let Some(tracked) = track_vid {
                body = self.last_step_join_input(qctx, tracked, body);
                body = self.build_join_input_plan(qctx, body)?;
            }
        }

        if let Some(filter) = &self.go_ctx.filter {
            let input = if joined {
                qctx.node(body).output_var().to_string()
            } else {
                gn_var.clone()
            };
            body = PlanNodeFactory::filter(qctx, body, filter.clone());
            qctx.set_input_var(body, &input);
        }

        let project_input = if joined || self.go_ctx.filter.is_some() {
            qctx.node(body).output_var().to_string()
        } else {
            gn_var.clone()
        };
        body = PlanNodeFactory::project(qctx, body, self.go_ctx.yield_expr.clone());
        qctx.set_input_var(body, &project_input);
        qctx.set_col_names(body, self.go_ctx.col_names.clone());
        if self.go_ctx.distinct {
            body = PlanNodeFactory::dedup(qctx, body);
        }

        let condition = self.loop_condition(qctx, n_steps, &gn_var);
        let loop_node = PlanNodeFactory::loop_node(qctx, Some(loop_dep), body, condition);
        let body_var = qctx.node(body).output_var().to_string();
        let col_names = qctx.node(body).col_names().to_vec();
        let dc = PlanNodeFactory::m_to_n_collect(
            qctx,
            loop_node,
            self.go_ctx.steps,
            self.go_ctx.distinct,
            col_names,
        );
        qctx.set_input_var(dc, &body_var);
        Ok(SubPlan::new(dc, start))
    }

    /// 下一轮的起点：`*._dst AS _vid` 去重后写入起点变量
    fn extract_dst_from_gn(
        &self,
        qctx: &mut QueryContext,
        dep: PlanNodeId,
        input: &str,
        output: &str,
    ) -> PlanNodeId {
        let mut columns = YieldColumns::new();
        columns.add_column(YieldColumn::new(Expression::edge_prop("*", K_DST), K_VID));
        let project = PlanNodeFactory::project(qctx, dep, columns);
        qctx.set_input_var(project, input);
        let dedup = PlanNodeFactory::dedup(qctx, project);
        qctx.set_output_var(dedup, output);
        dedup
    }
}

impl Planner for GoPlanner {
    fn transform(
        &mut self,
        qctx: &mut QueryContext,
        ast_ctx: &AstContext,
    ) -> Result<SubPlan, PlannerError> {
        let AstContext::Go(go_ctx) = ast_ctx else {
            return Err(PlannerError::unexpected_context("GO", ast_ctx));
        };
        self.go_ctx = go_ctx.clone();
        self.go_ctx.join_input =
            self.go_ctx.from.from_type != FromType::InstantExpression && !self.go_ctx.is_simple;
        self.go_ctx.join_dst = !self.go_ctx.expr_props.dst_tag_props.is_empty();

        if self.go_ctx.from.is_constant() {
            self.start_node = Some(PlanNodeFactory::start(qctx));
            self.go_ctx.vids_var = PlannerUtil::build_constant_input(qctx, &mut self.go_ctx.from);
        } else {
            let var_name = self.input_var_name().to_string();
            self.pre_root = qctx.sym_table().first_writer(&var_name);
            if self.pre_root.is_none() && self.go_ctx.join_input {
                return Err(PlannerError::MissingVariable(var_name));
            }
            let col_name = match self.go_ctx.from.from_type {
                FromType::Variable => self.go_ctx.from.user_defined_var_name.clone(),
                _ => self.go_ctx.from.runtime_vid_name.clone(),
            };
            let arg = PlanNodeFactory::argument(qctx, &col_name);
            self.go_ctx.vids_var = qctx.node(arg).output_var().to_string();
            self.start_node = Some(arg);
        }

        let steps = self.go_ctx.steps;
        log::debug!("GO {} over {:?}", steps, self.go_ctx.over.edge_types);
        if steps.is_m_to_n {
            return self.m_to_n_steps_plan(qctx);
        }
        match steps.steps() {
            0 => self.zero_step_plan(qctx),
            1 => self.one_step_plan(qctx),
            _ => self.n_steps_plan(qctx),
        }
    }
}
