//! AST上下文中的共享结构定义

use crate::core::types::{EdgeDirection, EdgeType, TagID, K_VID};
use crate::core::{Expression, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// 起始顶点来源
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FromType {
    /// 常量列表
    #[default]
    InstantExpression,
    /// `$var.col`
    Variable,
    /// `$-.col`
    Pipe,
}

/// 起始顶点信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Starts {
    pub from_type: FromType,
    /// 规划后读取起点的表达式
    pub src: Option<Expression>,
    /// 用户写下的起点表达式，例如 `$-.id`
    pub original_src: Option<Expression>,
    pub user_defined_var_name: String,
    pub runtime_vid_name: String,
    pub vids: Vec<Value>,
}

impl Starts {
    /// 常量起点
    pub fn constant(vids: Vec<Value>) -> Self {
        Self {
            from_type: FromType::InstantExpression,
            vids,
            ..Self::default()
        }
    }

    /// 来自管道输入列的起点
    pub fn pipe(col: &str) -> Self {
        Self {
            from_type: FromType::Pipe,
            original_src: Some(Expression::input_prop(col)),
            src: Some(Expression::input_prop(col)),
            runtime_vid_name: format!("__{}", col),
            ..Self::default()
        }
    }

    /// 来自用户变量列的起点
    pub fn variable(var: &str, col: &str) -> Self {
        Self {
            from_type: FromType::Variable,
            original_src: Some(Expression::var_prop(var, col)),
            src: Some(Expression::var_prop(var, col)),
            user_defined_var_name: var.to_string(),
            runtime_vid_name: format!("__{}", col),
            ..Self::default()
        }
    }

    pub fn is_constant(&self) -> bool {
        self.from_type == FromType::InstantExpression
    }

    /// 起点读取表达式，缺省为 `$-._vid`
    pub fn src_expr(&self) -> Expression {
        self.src
            .clone()
            .unwrap_or_else(|| Expression::input_prop(K_VID))
    }
}

/// OVER 子句
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Over {
    pub is_over_all: bool,
    /// 正的边类型 ID
    pub edge_types: Vec<EdgeType>,
    pub direction: EdgeDirection,
    pub all_edges: Vec<String>,
}

impl Over {
    pub fn new(edge_types: Vec<EdgeType>, direction: EdgeDirection) -> Self {
        Self {
            edge_types,
            direction,
            ..Self::default()
        }
    }

    /// 带方向符号的边类型，BOTH 时每种边依次给出出边和入边
    pub fn edge_type_ids(&self) -> Vec<EdgeType> {
        match self.direction {
            EdgeDirection::Out => self.edge_types.clone(),
            EdgeDirection::In => self.edge_types.iter().map(|e| -e).collect(),
            EdgeDirection::Both => self.edge_types.iter().flat_map(|e| [*e, -e]).collect(),
        }
    }
}

/// 步数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepClause {
    pub m_steps: u32,
    pub n_steps: u32,
    pub is_m_to_n: bool,
}

impl Default for StepClause {
    fn default() -> Self {
        Self::fixed(1)
    }
}

impl StepClause {
    pub fn fixed(steps: u32) -> Self {
        Self {
            m_steps: 0,
            n_steps: steps,
            is_m_to_n: false,
        }
    }

    pub fn range(m: u32, n: u32) -> Self {
        Self {
            m_steps: m,
            n_steps: n,
            is_m_to_n: true,
        }
    }

    pub fn steps(&self) -> u32 {
        self.n_steps
    }
}

impl std::fmt::Display for StepClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_m_to_n {
            write!(f, "{} TO {} STEPS", self.m_steps, self.n_steps)
        } else {
            write!(f, "{} STEPS", self.n_steps)
        }
    }
}

/// 表达式中引用到的属性，按 schema ID 有序
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionProps {
    pub tag_props: BTreeMap<TagID, BTreeSet<String>>,
    pub src_tag_props: BTreeMap<TagID, BTreeSet<String>>,
    pub dst_tag_props: BTreeMap<TagID, BTreeSet<String>>,
    pub edge_props: BTreeMap<EdgeType, BTreeSet<String>>,
    pub input_props: BTreeSet<String>,
    pub var_props: BTreeMap<String, BTreeSet<String>>,
}

impl ExpressionProps {
    pub fn insert_src_tag_prop(&mut self, tag: TagID, prop: &str) {
        self.src_tag_props.entry(tag).or_default().insert(prop.to_string());
    }

    pub fn insert_dst_tag_prop(&mut self, tag: TagID, prop: &str) {
        self.dst_tag_props.entry(tag).or_default().insert(prop.to_string());
    }

    pub fn insert_tag_prop(&mut self, tag: TagID, prop: &str) {
        self.tag_props.entry(tag).or_default().insert(prop.to_string());
    }

    pub fn insert_edge_prop(&mut self, edge_type: EdgeType, prop: &str) {
        self.edge_props.entry(edge_type).or_default().insert(prop.to_string());
    }
}

/// 别名类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AliasType {
    #[default]
    Node,
    Edge,
    Path,
    NodeList,
    EdgeList,
    Runtime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_type_ids() {
        let out = Over::new(vec![1, 2], EdgeDirection::Out);
        assert_eq!(out.edge_type_ids(), vec![1, 2]);
        let inward = Over::new(vec![1, 2], EdgeDirection::In);
        assert_eq!(inward.edge_type_ids(), vec![-1, -2]);
        let both = Over::new(vec![1, 2], EdgeDirection::Both);
        assert_eq!(both.edge_type_ids(), vec![1, -1, 2, -2]);
    }

    #[test]
    fn test_starts() {
        let starts = Starts::pipe("id");
        assert!(!starts.is_constant());
        assert_eq!(starts.src_expr().to_string(), "$-.id");
        assert!(Starts::constant(vec![Value::from("a")]).is_constant());
    }
}
