//! Schema 维护节点

use crate::core::types::GraphSpaceID;
use crate::query::context::ast::AlterSchemaItem;
use crate::query::context::managers::FieldDef;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateSchemaNode {
    pub space_id: GraphSpaceID,
    pub name: String,
    pub columns: Vec<FieldDef>,
    pub if_not_exist: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlterSchemaNode {
    pub space_id: GraphSpaceID,
    pub name: String,
    pub items: Vec<AlterSchemaItem>,
}
