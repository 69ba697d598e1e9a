//! FIND PATH 查询上下文

use crate::core::Expression;
use crate::query::context::ast::{AstContextBase, ExpressionProps, Over, Starts, StepClause};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathContext {
    pub base: AstContextBase,
    pub from: Starts,
    pub to: Starts,
    pub steps: StepClause,
    pub over: Over,
    pub filter: Option<Expression>,
    pub col_names: Vec<String>,
    pub is_shortest: bool,
    pub single_shortest: bool,
    pub no_loop: bool,
    pub with_prop: bool,
    pub input_var_name: String,
    pub expr_props: ExpressionProps,
    pub limit: Option<i64>,

    // 规划期间填写
    pub from_vids_var: String,
    pub to_vids_var: String,
}

impl PathContext {
    pub fn new(base: AstContextBase, from: Starts, to: Starts, over: Over, steps: StepClause) -> Self {
        Self {
            base,
            from,
            to,
            over,
            steps,
            col_names: vec!["path".to_string()],
            ..Self::default()
        }
    }
}
