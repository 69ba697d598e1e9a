//! 计划节点
//!
//! 节点存放在查询级对象池中，相互之间用 `PlanNodeId` 引用。

use super::plan_node_enum::PlanNodeKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 对象池中的节点句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlanNodeId(usize);

impl PlanNodeId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PlanNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanNode {
    pub(crate) id: PlanNodeId,
    pub(crate) kind: PlanNodeKind,
    pub(crate) deps: Vec<PlanNodeId>,
    /// 读取的变量，下标与 `deps` 对应；可以在没有依赖时单独指定
    pub(crate) input_vars: Vec<String>,
    pub(crate) output_var: String,
    pub(crate) col_names: Vec<String>,
}

impl PlanNode {
    pub(crate) fn new(
        id: PlanNodeId,
        kind: PlanNodeKind,
        deps: Vec<PlanNodeId>,
        input_vars: Vec<String>,
        output_var: String,
        col_names: Vec<String>,
    ) -> Self {
        Self {
            id,
            kind,
            deps,
            input_vars,
            output_var,
            col_names,
        }
    }

    pub fn id(&self) -> PlanNodeId {
        self.id
    }

    pub fn kind(&self) -> &PlanNodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut PlanNodeKind {
        &mut self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn deps(&self) -> &[PlanNodeId] {
        &self.deps
    }

    pub fn dep(&self, idx: usize) -> Option<PlanNodeId> {
        self.deps.get(idx).copied()
    }

    pub fn input_var(&self) -> Option<&str> {
        self.input_vars.first().map(String::as_str)
    }

    pub fn input_vars(&self) -> &[String] {
        &self.input_vars
    }

    pub fn output_var(&self) -> &str {
        &self.output_var
    }

    pub fn col_names(&self) -> &[String] {
        &self.col_names
    }
}
