//! GO查询上下文

use crate::core::{Expression, YieldColumns};
use crate::query::context::ast::{AstContextBase, ExpressionProps, Over, Starts, StepClause};
use serde::{Deserialize, Serialize};

/// GO遍历查询的上下文
///
/// `src_props_expr`/`edge_props_expr`/`dst_props_expr` 是校验阶段从 YIELD 与 WHERE
/// 中抽出的属性列，规划时按需要分别投影后再连接。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoContext {
    pub base: AstContextBase,
    pub from: Starts,
    pub steps: StepClause,
    pub over: Over,
    pub filter: Option<Expression>,
    pub yield_expr: YieldColumns,
    pub col_names: Vec<String>,
    pub distinct: bool,
    pub random: bool,
    /// 每一步的 LIMIT/SAMPLE 数量
    pub limits: Vec<i64>,
    pub expr_props: ExpressionProps,
    /// 管道输入变量
    pub input_var_name: String,
    /// 只需要终点 ID 的简单遍历
    pub is_simple: bool,
    pub src_props_expr: YieldColumns,
    pub edge_props_expr: YieldColumns,
    pub dst_props_expr: YieldColumns,

    // 规划期间填写
    pub vids_var: String,
    pub join_input: bool,
    pub join_dst: bool,
}

impl GoContext {
    pub fn new(base: AstContextBase, from: Starts, over: Over, steps: StepClause) -> Self {
        Self {
            base,
            from,
            over,
            steps,
            ..Self::default()
        }
    }
}
