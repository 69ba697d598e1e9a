//! 连接节点的键

use crate::core::Expression;

/// 左侧建哈希表，右侧探测
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinKeys {
    pub hash_keys: Vec<Expression>,
    pub probe_keys: Vec<Expression>,
}

impl JoinKeys {
    pub fn new(hash_keys: Vec<Expression>, probe_keys: Vec<Expression>) -> Self {
        Self {
            hash_keys,
            probe_keys,
        }
    }
}
