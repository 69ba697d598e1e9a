//! 索引管理器接口

use crate::core::types::{EdgeType, GraphSpaceID, IndexID, TagID};
use serde::{Deserialize, Serialize};

/// 索引建立在哪个 tag 或边类型上
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaId {
    Tag(TagID),
    Edge(EdgeType),
}

/// 索引信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub id: IndexID,
    pub name: String,
    pub schema_id: SchemaId,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl Index {
    pub fn is_edge_index(&self) -> bool {
        matches!(self.schema_id, SchemaId::Edge(_))
    }
}

/// 索引管理器接口
pub trait IndexManager: Send + Sync + std::fmt::Debug {
    fn list_tag_indexes(&self, space_id: GraphSpaceID) -> Vec<Index>;
    fn list_edge_indexes(&self, space_id: GraphSpaceID) -> Vec<Index>;

    /// 指定 tag 上的索引，按索引 ID 升序
    fn tag_indexes_of(&self, space_id: GraphSpaceID, tag_id: TagID) -> Vec<Index> {
        let mut indexes: Vec<Index> = self
            .list_tag_indexes(space_id)
            .into_iter()
            .filter(|i| i.schema_id == SchemaId::Tag(tag_id))
            .collect();
        indexes.sort_by_key(|i| i.id);
        indexes
    }

    fn edge_indexes_of(&self, space_id: GraphSpaceID, edge_type: EdgeType) -> Vec<Index> {
        let mut indexes: Vec<Index> = self
            .list_edge_indexes(space_id)
            .into_iter()
            .filter(|i| i.schema_id == SchemaId::Edge(edge_type.abs()))
            .collect();
        indexes.sort_by_key(|i| i.id);
        indexes
    }
}
