//! Schema 维护语句上下文

use crate::query::context::ast::AstContextBase;
use crate::query::context::managers::FieldDef;
use serde::{Deserialize, Serialize};

/// CREATE TAG / CREATE EDGE
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateSchemaContext {
    pub base: AstContextBase,
    pub is_edge: bool,
    pub name: String,
    pub columns: Vec<FieldDef>,
    pub if_not_exist: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlterSchemaOp {
    Add,
    Change,
    Drop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterSchemaItem {
    pub op: AlterSchemaOp,
    pub columns: Vec<FieldDef>,
}

/// ALTER TAG / ALTER EDGE
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlterSchemaContext {
    pub base: AstContextBase,
    pub is_edge: bool,
    pub name: String,
    pub items: Vec<AlterSchemaItem>,
}
