//! 内存 Schema 管理器
//!
//! 同时实现 `SchemaManager` 与 `IndexManager`，可以从 JSON 描述加载。

use crate::core::types::{EdgeType, GraphSpaceID, IndexID, TagID};
use crate::query::context::managers::{
    EdgeTypeDef, FieldDef, Index, IndexManager, SchemaId, SchemaManager, TagDef,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 单个空间内的 Schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpaceSchema {
    #[serde(default)]
    pub tags: Vec<TagDef>,
    #[serde(default)]
    pub edges: Vec<EdgeTypeDef>,
    #[serde(default)]
    pub indexes: Vec<Index>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorySchemaManager {
    spaces: BTreeMap<GraphSpaceID, SpaceSchema>,
}

fn fields_of(names: &[&str]) -> Vec<FieldDef> {
    names.iter().map(|n| FieldDef::new(*n, "string")).collect()
}

impl MemorySchemaManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, space_id: GraphSpaceID, tag_id: TagID, name: &str, fields: &[&str]) -> Self {
        self.spaces.entry(space_id).or_default().tags.push(TagDef {
            tag_id,
            tag_name: name.to_string(),
            fields: fields_of(fields),
        });
        self
    }

    pub fn with_edge(
        mut self,
        space_id: GraphSpaceID,
        edge_type: EdgeType,
        name: &str,
        fields: &[&str],
    ) -> Self {
        self.spaces.entry(space_id).or_default().edges.push(EdgeTypeDef {
            edge_type,
            edge_name: name.to_string(),
            fields: fields_of(fields),
        });
        self
    }

    pub fn with_index(
        mut self,
        space_id: GraphSpaceID,
        index_id: IndexID,
        name: &str,
        schema_id: SchemaId,
        fields: &[&str],
    ) -> Self {
        self.spaces.entry(space_id).or_default().indexes.push(Index {
            id: index_id,
            name: name.to_string(),
            schema_id,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        });
        self
    }

    fn space(&self, space_id: GraphSpaceID) -> Option<&SpaceSchema> {
        self.spaces.get(&space_id)
    }
}

impl SchemaManager for MemorySchemaManager {
    fn to_tag_id(&self, space_id: GraphSpaceID, tag_name: &str) -> Option<TagID> {
        self.space(space_id)?
            .tags
            .iter()
            .find(|t| t.tag_name == tag_name)
            .map(|t| t.tag_id)
    }

    fn to_tag_name(&self, space_id: GraphSpaceID, tag_id: TagID) -> Option<String> {
        self.get_tag(space_id, tag_id).map(|t| t.tag_name)
    }

    fn to_edge_type(&self, space_id: GraphSpaceID, edge_name: &str) -> Option<EdgeType> {
        self.space(space_id)?
            .edges
            .iter()
            .find(|e| e.edge_name == edge_name)
            .map(|e| e.edge_type)
    }

    fn to_edge_name(&self, space_id: GraphSpaceID, edge_type: EdgeType) -> Option<String> {
        self.get_edge_type(space_id, edge_type).map(|e| e.edge_name)
    }

    fn get_tag(&self, space_id: GraphSpaceID, tag_id: TagID) -> Option<TagDef> {
        self.space(space_id)?
            .tags
            .iter()
            .find(|t| t.tag_id == tag_id)
            .cloned()
    }

    fn get_edge_type(&self, space_id: GraphSpaceID, edge_type: EdgeType) -> Option<EdgeTypeDef> {
        self.space(space_id)?
            .edges
            .iter()
            .find(|e| e.edge_type == edge_type.abs())
            .cloned()
    }

    fn list_tags(&self, space_id: GraphSpaceID) -> Vec<TagDef> {
        let mut tags = self.space(space_id).map(|s| s.tags.clone()).unwrap_or_default();
        tags.sort_by_key(|t| t.tag_id);
        tags
    }

    fn list_edge_types(&self, space_id: GraphSpaceID) -> Vec<EdgeTypeDef> {
        let mut edges = self.space(space_id).map(|s| s.edges.clone()).unwrap_or_default();
        edges.sort_by_key(|e| e.edge_type);
        edges
    }
}

impl IndexManager for MemorySchemaManager {
    fn list_tag_indexes(&self, space_id: GraphSpaceID) -> Vec<Index> {
        self.space(space_id)
            .map(|s| s.indexes.iter().filter(|i| !i.is_edge_index()).cloned().collect())
            .unwrap_or_default()
    }

    fn list_edge_indexes(&self, space_id: GraphSpaceID) -> Vec<Index> {
        self.space(space_id)
            .map(|s| s.indexes.iter().filter(|i| i.is_edge_index()).cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> MemorySchemaManager {
        MemorySchemaManager::new()
            .with_tag(1, 10, "Person", &["name", "age"])
            .with_edge(1, 20, "like", &["likeness"])
            .with_index(1, 100, "person_name", SchemaId::Tag(10), &["name"])
            .with_index(1, 101, "like_idx", SchemaId::Edge(20), &["likeness"])
    }

    #[test]
    fn test_name_resolution() {
        let sm = schema();
        assert_eq!(sm.to_tag_id(1, "Person"), Some(10));
        assert_eq!(sm.to_edge_type(1, "like"), Some(20));
        assert_eq!(sm.to_edge_name(1, -20), Some("like".to_string()));
        assert_eq!(sm.to_tag_id(2, "Person"), None);
    }

    #[test]
    fn test_indexes() {
        let sm = schema();
        assert_eq!(sm.tag_indexes_of(1, 10).len(), 1);
        assert_eq!(sm.edge_indexes_of(1, -20).len(), 1);
        assert!(sm.tag_indexes_of(1, 11).is_empty());
    }

    #[test]
    fn test_json_round_trip_shape() {
        let json = serde_json::to_string(&schema()).expect("serialize schema");
        let parsed: MemorySchemaManager = serde_json::from_str(&json).expect("parse schema");
        assert_eq!(parsed.list_tags(1).len(), 1);
    }
}
