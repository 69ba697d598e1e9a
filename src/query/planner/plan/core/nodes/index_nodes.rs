//! 索引扫描节点

use crate::core::types::{GraphSpaceID, IndexQueryContext};

#[derive(Debug, Clone, PartialEq)]
pub struct IndexScanNode {
    pub space_id: GraphSpaceID,
    /// tag ID 或边类型
    pub schema_id: i32,
    pub is_edge: bool,
    pub contexts: Vec<IndexQueryContext>,
    pub return_cols: Vec<String>,
    pub dedup: bool,
    pub limit: Option<i64>,
    /// 过滤条件引用上游输入，每行输入执行一次扫描
    pub dynamic: bool,
}

impl IndexScanNode {
    pub fn new(space_id: GraphSpaceID, schema_id: i32, is_edge: bool) -> Self {
        Self {
            space_id,
            schema_id,
            is_edge,
            contexts: Vec::new(),
            return_cols: Vec::new(),
            dedup: false,
            limit: None,
            dynamic: false,
        }
    }
}
