//! FETCH PROP ON <edge> 查询上下文

use crate::core::types::{EdgeRanking, EdgeType};
use crate::core::{Expression, Value, YieldColumns};
use crate::query::context::ast::{AstContextBase, ExpressionProps};
use serde::{Deserialize, Serialize};

/// 常量边键 `src -> dst @rank`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeKeyRef {
    pub src: Value,
    pub dst: Value,
    #[serde(default)]
    pub rank: EdgeRanking,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchEdgesContext {
    pub base: AstContextBase,
    pub edge_type: EdgeType,
    pub edge_name: String,
    /// 常量边键，非空时优先于管道输入
    pub keys: Vec<EdgeKeyRef>,
    pub src: Option<Expression>,
    pub dst: Option<Expression>,
    pub rank: Option<Expression>,
    pub distinct: bool,
    pub yield_expr: YieldColumns,
    pub col_names: Vec<String>,
    pub expr_props: ExpressionProps,
    pub input_var_name: String,
}
