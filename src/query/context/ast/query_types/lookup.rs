//! LOOKUP 查询上下文

use crate::core::{Expression, YieldColumns};
use crate::query::context::ast::AstContextBase;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupContext {
    pub base: AstContextBase,
    pub is_edge: bool,
    /// tag ID 或边类型
    pub schema_id: i32,
    pub schema_name: String,
    pub filter: Option<Expression>,
    pub yield_expr: YieldColumns,
    pub col_names: Vec<String>,
    pub dedup: bool,
    pub limit: Option<i64>,
}
