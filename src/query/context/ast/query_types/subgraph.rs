//! GET SUBGRAPH 查询上下文

use crate::core::types::EdgeType;
use crate::core::Expression;
use crate::query::context::ast::{AstContextBase, ExpressionProps, Starts, StepClause};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubgraphContext {
    pub base: AstContextBase,
    pub from: Starts,
    pub steps: StepClause,
    /// 带方向符号的边类型
    pub edge_types: Vec<EdgeType>,
    /// BOTH 方向展开的边类型
    pub bi_direct_edge_types: Vec<EdgeType>,
    pub col_names: Vec<String>,
    pub filter: Option<Expression>,
    pub tag_filter: Option<Expression>,
    pub edge_filter: Option<Expression>,
    pub with_prop: bool,
    pub get_vertex_prop: bool,
    pub get_edge_prop: bool,
    pub expr_props: ExpressionProps,
    pub input_var_name: String,
}

impl SubgraphContext {
    pub fn new(base: AstContextBase, from: Starts, steps: StepClause, edge_types: Vec<EdgeType>) -> Self {
        Self {
            base,
            from,
            steps,
            edge_types,
            col_names: vec!["_vertices".to_string(), "_edges".to_string()],
            ..Self::default()
        }
    }
}
