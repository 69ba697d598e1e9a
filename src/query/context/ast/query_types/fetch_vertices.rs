//! FETCH PROP ON <tag> 查询上下文

use crate::core::YieldColumns;
use crate::query::context::ast::{AstContextBase, ExpressionProps, Starts};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchVerticesContext {
    pub base: AstContextBase,
    pub from: Starts,
    pub distinct: bool,
    pub yield_expr: YieldColumns,
    pub col_names: Vec<String>,
    pub expr_props: ExpressionProps,
    pub input_var_name: String,
}
