//! 计划节点工厂
//!
//! 常用节点的构造入口，负责推导列名并把节点登记到查询上下文。

use super::control_flow_node::DataCollectKind;
use super::join_node::JoinKeys;
use super::plan_node::PlanNodeId;
use super::plan_node_enum::PlanNodeKind;
use crate::core::{Expression, YieldColumns};
use crate::query::context::ast::StepClause;
use crate::query::QueryContext;

pub struct PlanNodeFactory;

impl PlanNodeFactory {
    pub fn start(qctx: &mut QueryContext) -> PlanNodeId {
        qctx.make_node(PlanNodeKind::Start, Vec::new())
    }

    /// 读取外层输入中 `alias` 列的节点
    pub fn argument(qctx: &mut QueryContext, alias: &str) -> PlanNodeId {
        let id = qctx.make_node(
            PlanNodeKind::Argument {
                alias: alias.to_string(),
            },
            Vec::new(),
        );
        qctx.set_col_names(id, vec![alias.to_string()]);
        id
    }

    pub fn pass_through(qctx: &mut QueryContext, dep: Option<PlanNodeId>) -> PlanNodeId {
        qctx.make_node(PlanNodeKind::PassThrough, dep.into_iter().collect())
    }

    pub fn project(qctx: &mut QueryContext, dep: PlanNodeId, columns: YieldColumns) -> PlanNodeId {
        let col_names = columns.names();
        let id = qctx.make_node(PlanNodeKind::Project { columns }, vec![dep]);
        qctx.set_col_names(id, col_names);
        id
    }

    pub fn filter(qctx: &mut QueryContext, dep: PlanNodeId, condition: Expression) -> PlanNodeId {
        qctx.make_node(
            PlanNodeKind::Filter {
                condition,
                need_stable_filter: false,
            },
            vec![dep],
        )
    }

    pub fn dedup(qctx: &mut QueryContext, dep: PlanNodeId) -> PlanNodeId {
        qctx.make_node(PlanNodeKind::Dedup, vec![dep])
    }

    pub fn limit(qctx: &mut QueryContext, dep: PlanNodeId, offset: i64, count: i64) -> PlanNodeId {
        qctx.make_node(
            PlanNodeKind::Limit {
                offset,
                count: Expression::constant(count),
            },
            vec![dep],
        )
    }

    pub fn sample(qctx: &mut QueryContext, dep: PlanNodeId, count: Expression) -> PlanNodeId {
        qctx.make_node(PlanNodeKind::Sample { count }, vec![dep])
    }

    /// 把 `expr` 展开为多行，输出单列 `alias`
    pub fn unwind(
        qctx: &mut QueryContext,
        dep: PlanNodeId,
        expr: Expression,
        alias: &str,
    ) -> PlanNodeId {
        let id = qctx.make_node(
            PlanNodeKind::Unwind {
                expr,
                alias: alias.to_string(),
            },
            vec![dep],
        );
        qctx.set_col_names(id, vec![alias.to_string()]);
        id
    }

    pub fn loop_node(
        qctx: &mut QueryContext,
        dep: Option<PlanNodeId>,
        body: PlanNodeId,
        condition: Expression,
    ) -> PlanNodeId {
        qctx.make_node(
            PlanNodeKind::Loop { body, condition },
            dep.into_iter().collect(),
        )
    }

    /// 收集若干依赖的结果，输入变量与依赖一一对应
    pub fn data_collect(
        qctx: &mut QueryContext,
        deps: Vec<PlanNodeId>,
        kind: DataCollectKind,
        col_names: Vec<String>,
    ) -> PlanNodeId {
        let id = qctx.make_node(
            PlanNodeKind::DataCollect {
                kind,
                m_to_n: None,
                distinct: false,
            },
            deps,
        );
        qctx.set_col_names(id, col_names);
        id
    }

    pub fn m_to_n_collect(
        qctx: &mut QueryContext,
        dep: PlanNodeId,
        steps: StepClause,
        distinct: bool,
        col_names: Vec<String>,
    ) -> PlanNodeId {
        let id = qctx.make_node(
            PlanNodeKind::DataCollect {
                kind: DataCollectKind::MToN,
                m_to_n: Some(steps),
                distinct,
            },
            vec![dep],
        );
        qctx.set_col_names(id, col_names);
        id
    }

    pub fn hash_inner_join(
        qctx: &mut QueryContext,
        left: PlanNodeId,
        right: PlanNodeId,
        keys: JoinKeys,
    ) -> PlanNodeId {
        Self::join(qctx, PlanNodeKind::HashInnerJoin(keys), left, right)
    }

    pub fn hash_left_join(
        qctx: &mut QueryContext,
        left: PlanNodeId,
        right: PlanNodeId,
        keys: JoinKeys,
    ) -> PlanNodeId {
        Self::join(qctx, PlanNodeKind::HashLeftJoin(keys), left, right)
    }

    pub fn cross_join(qctx: &mut QueryContext, left: PlanNodeId, right: PlanNodeId) -> PlanNodeId {
        Self::join(qctx, PlanNodeKind::CrossJoin, left, right)
    }

    /// 连接节点的列名为左右两侧列名依次拼接
    fn join(
        qctx: &mut QueryContext,
        kind: PlanNodeKind,
        left: PlanNodeId,
        right: PlanNodeId,
    ) -> PlanNodeId {
        let mut col_names = qctx.node(left).col_names().to_vec();
        col_names.extend(qctx.node(right).col_names().iter().cloned());
        let id = qctx.make_node(kind, vec![left, right]);
        qctx.set_col_names(id, col_names);
        id
    }

    /// 任意节点，显式给出列名
    pub fn make(
        qctx: &mut QueryContext,
        kind: PlanNodeKind,
        deps: Vec<PlanNodeId>,
        col_names: Vec<String>,
    ) -> PlanNodeId {
        let id = qctx.make_node(kind, deps);
        qctx.set_col_names(id, col_names);
        id
    }
}
