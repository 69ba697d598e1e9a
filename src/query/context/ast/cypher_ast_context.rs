//! Cypher AST上下文
//!
//! MATCH 语句按子句拆分，每个子句包含若干路径模式、可选的 WHERE 以及别名信息。
//! `NodeContext`/`EdgeContext` 是寻找起点时的工作上下文。

use crate::core::types::{EdgeDirection, EdgeType, SpaceInfo, TagID};
use crate::core::{Expression, Value, YieldColumns};
use crate::query::context::ast::{AliasType, AstContextBase};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 变长边的步数范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStepRange {
    pub min: u32,
    pub max: u32,
}

impl MatchStepRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

impl Default for MatchStepRange {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// 模式中的节点
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeInfo {
    pub alias: String,
    pub anonymous: bool,
    pub labels: Vec<String>,
    pub tids: Vec<TagID>,
    /// 模式中内联的属性 `{k: v}`
    pub props: Vec<(String, Expression)>,
    /// 由内联属性生成的过滤条件
    pub filter: Option<Expression>,
}

impl NodeInfo {
    pub fn named(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            ..Self::default()
        }
    }

    pub fn anonymous(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            anonymous: true,
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>, tid: TagID) -> Self {
        self.labels.push(label.into());
        self.tids.push(tid);
        self
    }

    pub fn with_props(mut self, props: Vec<(String, Expression)>) -> Self {
        self.props = props;
        self
    }
}

/// 模式中的边
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeInfo {
    pub alias: String,
    pub inner_alias: String,
    pub anonymous: bool,
    pub types: Vec<String>,
    pub edge_types: Vec<EdgeType>,
    pub direction: EdgeDirection,
    /// 为空表示单跳
    pub range: Option<MatchStepRange>,
    pub props: Vec<(String, Expression)>,
    pub filter: Option<Expression>,
}

impl EdgeInfo {
    pub fn named(alias: impl Into<String>, direction: EdgeDirection) -> Self {
        Self {
            alias: alias.into(),
            direction,
            ..Self::default()
        }
    }

    pub fn anonymous(alias: impl Into<String>, direction: EdgeDirection) -> Self {
        Self {
            alias: alias.into(),
            anonymous: true,
            direction,
            ..Self::default()
        }
    }

    pub fn with_type(mut self, name: impl Into<String>, edge_type: EdgeType) -> Self {
        self.types.push(name.into());
        self.edge_types.push(edge_type);
        self
    }

    pub fn with_range(mut self, min: u32, max: u32) -> Self {
        self.range = Some(MatchStepRange::new(min, max));
        self
    }

    pub fn with_props(mut self, props: Vec<(String, Expression)>) -> Self {
        self.props = props;
        self
    }

    pub fn step_range(&self) -> MatchStepRange {
        self.range.unwrap_or_default()
    }
}

/// 一条路径模式
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Path {
    pub alias: String,
    pub anonymous: bool,
    pub node_infos: Vec<NodeInfo>,
    pub edge_infos: Vec<EdgeInfo>,
    /// 作为谓词使用的模式只做存在性判断
    pub is_pred: bool,
}

impl Path {
    pub fn new(node_infos: Vec<NodeInfo>, edge_infos: Vec<EdgeInfo>) -> Self {
        Self {
            anonymous: true,
            node_infos,
            edge_infos,
            ..Self::default()
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self.anonymous = false;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhereClauseContext {
    pub filter: Option<Expression>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchClauseContext {
    pub is_optional: bool,
    pub paths: Vec<Path>,
    pub where_clause: Option<WhereClauseContext>,
    /// 之前子句已经绑定的别名
    pub aliases_available: BTreeMap<String, AliasType>,
    /// 本子句新产生的别名
    pub aliases_generated: BTreeMap<String, AliasType>,
}

impl MatchClauseContext {
    pub fn new(paths: Vec<Path>) -> Self {
        let mut ctx = Self {
            paths,
            ..Self::default()
        };
        ctx.collect_generated_aliases();
        ctx
    }

    pub fn with_where(mut self, filter: Expression) -> Self {
        self.where_clause = Some(WhereClauseContext {
            filter: Some(filter),
        });
        self
    }

    pub fn with_available(mut self, aliases: BTreeMap<String, AliasType>) -> Self {
        self.aliases_available = aliases;
        self.collect_generated_aliases();
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    fn collect_generated_aliases(&mut self) {
        let mut generated = BTreeMap::new();
        for path in &self.paths {
            for node in path.node_infos.iter().filter(|n| !n.anonymous) {
                generated.insert(node.alias.clone(), AliasType::Node);
            }
            for edge in path.edge_infos.iter().filter(|e| !e.anonymous) {
                let ty = if edge.range.is_some() {
                    AliasType::EdgeList
                } else {
                    AliasType::Edge
                };
                generated.insert(edge.alias.clone(), ty);
            }
            if !path.anonymous {
                generated.insert(path.alias.clone(), AliasType::Path);
            }
        }
        generated.retain(|k, _| !self.aliases_available.contains_key(k));
        self.aliases_generated = generated;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReturnClauseContext {
    pub yield_columns: YieldColumns,
    pub distinct: bool,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// 完整的 MATCH 语句
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchAstContext {
    pub base: AstContextBase,
    pub clauses: Vec<MatchClauseContext>,
    pub return_clause: Option<ReturnClauseContext>,
}

/// 寻找起点时的扫描信息
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanInfo {
    pub filter: Option<Expression>,
    pub schema_ids: Vec<i32>,
    pub schema_names: Vec<String>,
    pub direction: EdgeDirection,
}

/// 以节点为起点时的工作上下文
#[derive(Debug)]
pub struct NodeContext<'a> {
    pub space: &'a SpaceInfo,
    pub bind_where: Option<&'a WhereClauseContext>,
    pub aliases_available: &'a BTreeMap<String, AliasType>,
    pub info: &'a NodeInfo,
    pub scan_info: ScanInfo,
    /// 常量点 ID
    pub ids: Vec<Value>,
    /// 运行时取 ID 的表达式
    pub vid_expr: Option<Expression>,
    /// 需要从上游读取的别名
    pub argument_alias: Option<String>,
    /// 起点计划输出中起点 ID 的读取方式
    pub initial_expr: Option<Expression>,
}

impl<'a> NodeContext<'a> {
    pub fn new(
        space: &'a SpaceInfo,
        bind_where: Option<&'a WhereClauseContext>,
        aliases_available: &'a BTreeMap<String, AliasType>,
        info: &'a NodeInfo,
    ) -> Self {
        Self {
            space,
            bind_where,
            aliases_available,
            info,
            scan_info: ScanInfo::default(),
            ids: Vec::new(),
            vid_expr: None,
            argument_alias: None,
            initial_expr: None,
        }
    }

    pub fn where_filter(&self) -> Option<&'a Expression> {
        self.bind_where.and_then(|w| w.filter.as_ref())
    }
}

/// 以边为起点时的工作上下文
#[derive(Debug)]
pub struct EdgeContext<'a> {
    pub space: &'a SpaceInfo,
    pub bind_where: Option<&'a WhereClauseContext>,
    pub aliases_available: &'a BTreeMap<String, AliasType>,
    pub info: &'a EdgeInfo,
    pub scan_info: ScanInfo,
    pub initial_expr: Option<Expression>,
}

impl<'a> EdgeContext<'a> {
    pub fn new(
        space: &'a SpaceInfo,
        bind_where: Option<&'a WhereClauseContext>,
        aliases_available: &'a BTreeMap<String, AliasType>,
        info: &'a EdgeInfo,
    ) -> Self {
        Self {
            space,
            bind_where,
            aliases_available,
            info,
            scan_info: ScanInfo::default(),
            initial_expr: None,
        }
    }

    pub fn where_filter(&self) -> Option<&'a Expression> {
        self.bind_where.and_then(|w| w.filter.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_aliases() {
        let path = Path::new(
            vec![NodeInfo::named("a"), NodeInfo::anonymous("__anon_1")],
            vec![EdgeInfo::named("e", EdgeDirection::Out).with_range(1, 3)],
        )
        .with_alias("p");
        let mut available = BTreeMap::new();
        available.insert("a".to_string(), AliasType::Node);
        let clause = MatchClauseContext::new(vec![path]).with_available(available);
        let generated: Vec<_> = clause.aliases_generated.into_iter().collect();
        assert_eq!(
            generated,
            vec![
                ("e".to_string(), AliasType::EdgeList),
                ("p".to_string(), AliasType::Path)
            ]
        );
    }
}
