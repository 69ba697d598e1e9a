//! 计划节点对象池
//!
//! 一个查询的全部计划节点归同一个对象池所有，随查询上下文一起释放。

use super::nodes::{PlanNode, PlanNodeId};
use std::ops::{Index, IndexMut};

#[derive(Debug, Default)]
pub struct ObjectPool {
    nodes: Vec<PlanNode>,
}

impl ObjectPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// 下一个放入的节点将获得的句柄
    pub fn next_id(&self) -> PlanNodeId {
        PlanNodeId::new(self.nodes.len())
    }

    pub(crate) fn push(&mut self, node: PlanNode) -> PlanNodeId {
        let id = node.id();
        debug_assert_eq!(id, self.next_id());
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: PlanNodeId) -> Option<&PlanNode> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: PlanNodeId) -> Option<&mut PlanNode> {
        self.nodes.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlanNode> {
        self.nodes.iter()
    }
}

impl Index<PlanNodeId> for ObjectPool {
    type Output = PlanNode;

    fn index(&self, id: PlanNodeId) -> &PlanNode {
        &self.nodes[id.index()]
    }
}

impl IndexMut<PlanNodeId> for ObjectPool {
    fn index_mut(&mut self, id: PlanNodeId) -> &mut PlanNode {
        &mut self.nodes[id.index()]
    }
}
