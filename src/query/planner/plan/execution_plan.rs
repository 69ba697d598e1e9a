//! 执行计划结构定义
//! 包含 ExecutionPlan 和 SubPlan

use crate::query::planner::plan::core::{describe_plan, PlanNodeDescription, PlanNodeFactory, PlanNodeId};
use crate::query::planner::planner::PlannerError;
use crate::query::QueryContext;

/// 完整的可执行计划
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    /// 与查询 ID 相同
    pub id: i64,
    pub root: Option<PlanNodeId>,
}

impl ExecutionPlan {
    pub fn new(id: i64) -> Self {
        Self { id, root: None }
    }

    pub fn set_root(&mut self, root: PlanNodeId) {
        self.root = Some(root);
    }

    pub fn from_sub_plan(qctx: &QueryContext, sub_plan: &SubPlan) -> Self {
        Self {
            id: qctx.query_id(),
            root: sub_plan.root,
        }
    }

    pub fn describe(&self, qctx: &QueryContext) -> Vec<PlanNodeDescription> {
        self.root
            .map(|root| describe_plan(qctx.pool(), root))
            .unwrap_or_default()
    }

    /// 从根可达的节点数量
    pub fn node_count(&self, qctx: &QueryContext) -> usize {
        self.describe(qctx).len()
    }
}

/// 执行计划片段
///
/// `root` 是产出结果的节点，`tail` 是最底层的入口节点。
/// 组合片段时把一个片段的 `tail` 接到另一个片段的 `root` 上。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubPlan {
    pub root: Option<PlanNodeId>,
    pub tail: Option<PlanNodeId>,
}

impl SubPlan {
    pub fn new(root: PlanNodeId, tail: PlanNodeId) -> Self {
        Self {
            root: Some(root),
            tail: Some(tail),
        }
    }

    pub fn single(node: PlanNodeId) -> Self {
        Self::new(node, node)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root_id(&self) -> Result<PlanNodeId, PlannerError> {
        self.root
            .ok_or_else(|| PlannerError::PlanGenerationFailed("sub plan has no root".into()))
    }

    pub fn tail_id(&self) -> Result<PlanNodeId, PlannerError> {
        self.tail
            .ok_or_else(|| PlannerError::PlanGenerationFailed("sub plan has no tail".into()))
    }

    /// tail 不是叶子节点时在其下方补一个 Start
    pub fn append_start_node(&mut self, qctx: &mut QueryContext) -> Result<(), PlannerError> {
        let tail = self.tail_id()?;
        let node = qctx.node(tail);
        if node.kind().is_leaf() || !node.deps().is_empty() {
            return Ok(());
        }
        let start = PlanNodeFactory::start(qctx);
        qctx.set_dep(tail, 0, start);
        self.tail = Some(start);
        Ok(())
    }
}
