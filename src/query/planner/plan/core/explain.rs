//! 计划描述
//!
//! 把对象池中的计划转换为可序列化的节点列表，供 EXPLAIN 与命令行输出使用。

use super::nodes::{PlanNodeId, PlanNodeKind};
use super::object_pool::ObjectPool;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 节点描述键值对
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub key: String,
    pub value: String,
}

impl Pair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 计划节点描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanNodeDescription {
    pub name: String,
    pub id: usize,
    pub output_var: String,
    pub input_vars: Vec<String>,
    pub col_names: Vec<String>,
    pub description: Vec<Pair>,
    pub dependencies: Vec<usize>,
}

impl PlanNodeDescription {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.description
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }
}

/// 从根出发深度优先列出可达节点，循环体也会被展开
pub fn describe_plan(pool: &ObjectPool, root: PlanNodeId) -> Vec<PlanNodeDescription> {
    let mut visited = HashSet::new();
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let Some(node) = pool.get(id) else {
            continue;
        };
        out.push(PlanNodeDescription {
            name: node.name().to_string(),
            id: id.index(),
            output_var: node.output_var().to_string(),
            input_vars: node.input_vars().to_vec(),
            col_names: node.col_names().to_vec(),
            description: node.kind().describe(),
            dependencies: node.deps().iter().map(|d| d.index()).collect(),
        });
        if let PlanNodeKind::Loop { body, .. } = node.kind() {
            stack.push(*body);
        }
        for dep in node.deps().iter().rev() {
            stack.push(*dep);
        }
    }
    out
}
