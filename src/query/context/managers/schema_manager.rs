//! Schema管理器接口

use crate::core::types::{EdgeType, GraphSpaceID, TagID};
use serde::{Deserialize, Serialize};

/// 字段定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub data_type: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub default_value: Option<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            default_value: None,
        }
    }
}

/// Tag定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDef {
    pub tag_id: TagID,
    pub tag_name: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// EdgeType定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeTypeDef {
    pub edge_type: EdgeType,
    pub edge_name: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl TagDef {
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }
}

impl EdgeTypeDef {
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }
}

/// Schema管理器接口，规划期间只读
pub trait SchemaManager: Send + Sync + std::fmt::Debug {
    fn to_tag_id(&self, space_id: GraphSpaceID, tag_name: &str) -> Option<TagID>;
    fn to_tag_name(&self, space_id: GraphSpaceID, tag_id: TagID) -> Option<String>;
    /// 边类型按绝对值查找
    fn to_edge_type(&self, space_id: GraphSpaceID, edge_name: &str) -> Option<EdgeType>;
    fn to_edge_name(&self, space_id: GraphSpaceID, edge_type: EdgeType) -> Option<String>;
    fn get_tag(&self, space_id: GraphSpaceID, tag_id: TagID) -> Option<TagDef>;
    fn get_edge_type(&self, space_id: GraphSpaceID, edge_type: EdgeType) -> Option<EdgeTypeDef>;
    fn list_tags(&self, space_id: GraphSpaceID) -> Vec<TagDef>;
    fn list_edge_types(&self, space_id: GraphSpaceID) -> Vec<EdgeTypeDef>;
}
