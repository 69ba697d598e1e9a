//! MATCH 规划的公共逻辑
//!
//! 从 WHERE 中提取点 ID 与索引条件、生成点边属性请求、路径列投影等。

use crate::core::types::{
    EdgeDirection, EdgeProp, GraphSpaceID, TagID, VertexProp, K_DST, K_RANK, K_SRC, K_TYPE,
    K_VID,
};
use crate::core::{
    Expression, ExpressionUtils, RelationalOperator, Value, YieldColumn, YieldColumns,
};
use crate::query::context::ast::{AliasType, EdgeInfo, NodeInfo, Path};
use crate::query::context::managers::Index;
use crate::query::planner::plan::{PlanNodeFactory, PlanNodeId, PlanNodeKind, SubPlan};
use crate::query::planner::planner::PlannerError;
use crate::query::planner::utils::PlannerUtil;
use crate::query::QueryContext;
use std::collections::{BTreeMap, BTreeSet};

pub const EDGE_RESERVED_PROPS: [&str; 4] = [K_SRC, K_TYPE, K_RANK, K_DST];

pub struct MatchSolver;

fn is_id_of(expr: &Expression, alias: &str) -> bool {
    match expr {
        Expression::FunctionCall { name, args } if name.eq_ignore_ascii_case("id") => {
            matches!(args.as_slice(), [Expression::Label(label)] if label == alias)
        }
        _ => false,
    }
}

fn label_attr_of<'e>(expr: &'e Expression, alias: &str) -> Option<&'e str> {
    match expr {
        Expression::LabelAttribute { label, attr } if label == alias => Some(attr.as_str()),
        _ => None,
    }
}

/// 只引用之前绑定过的别名，且不引用自身
fn bound_elsewhere(
    expr: &Expression,
    alias: &str,
    aliases_available: &BTreeMap<String, AliasType>,
) -> bool {
    let labels = ExpressionUtils::referenced_labels(expr);
    !labels.is_empty()
        && !labels.contains(alias)
        && labels.iter().all(|l| aliases_available.contains_key(l))
}

fn collect_schema_props(expr: &Expression, props: &mut BTreeSet<String>) {
    match expr {
        Expression::TagProperty { prop, .. } | Expression::EdgeProperty { prop, .. } => {
            props.insert(prop.clone());
        }
        other => {
            for child in other.children() {
                collect_schema_props(child, props);
            }
        }
    }
}

impl MatchSolver {
    /// `id(alias) == c` 或 `id(alias) IN [c1, c2]` 中的常量点 ID
    pub fn extract_vids(alias: &str, filter: &Expression) -> Option<Vec<Value>> {
        for cond in ExpressionUtils::split_conjunction(filter) {
            let Expression::Relational { op, left, right } = &cond else {
                continue;
            };
            match op {
                RelationalOperator::Eq => {
                    let value = if is_id_of(left, alias) {
                        right.eval_constant()
                    } else if is_id_of(right, alias) {
                        left.eval_constant()
                    } else {
                        None
                    };
                    if let Some(v) = value {
                        return Some(vec![v]);
                    }
                }
                RelationalOperator::In if is_id_of(left, alias) => {
                    if let Some(Value::List(vids)) = right.eval_constant() {
                        return Some(vids);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// `id(alias) == $var.col` 或 `id(alias) == id(m)`，`m` 由之前的子句绑定
    pub fn extract_variable_vid(
        alias: &str,
        filter: &Expression,
        aliases_available: &BTreeMap<String, AliasType>,
    ) -> Option<Expression> {
        for cond in ExpressionUtils::split_conjunction(filter) {
            let Expression::Relational {
                op: RelationalOperator::Eq,
                left,
                right,
            } = &cond
            else {
                continue;
            };
            let other = if is_id_of(left, alias) {
                right.as_ref()
            } else if is_id_of(right, alias) {
                left.as_ref()
            } else {
                continue;
            };
            let runtime = matches!(other, Expression::VariableProperty { .. })
                || bound_elsewhere(other, alias, aliases_available);
            if runtime {
                return Some(other.clone());
            }
        }
        None
    }

    /// `alias.prop == m.prop`，`m` 由之前的子句绑定
    pub fn extract_variable_prop(
        alias: &str,
        filter: &Expression,
        aliases_available: &BTreeMap<String, AliasType>,
    ) -> Option<(String, Expression)> {
        for cond in ExpressionUtils::split_conjunction(filter) {
            let Expression::Relational {
                op: RelationalOperator::Eq,
                left,
                right,
            } = &cond
            else {
                continue;
            };
            let hit = match (label_attr_of(left, alias), label_attr_of(right, alias)) {
                (Some(prop), None) => Some((prop, right.as_ref())),
                (None, Some(prop)) => Some((prop, left.as_ref())),
                _ => None,
            };
            if let Some((prop, value)) = hit {
                if bound_elsewhere(value, alias, aliases_available) {
                    return Some((prop.to_string(), value.clone()));
                }
            }
        }
        None
    }

    fn schema_prop(label: &str, prop: &str, is_edge: bool) -> Expression {
        if is_edge {
            Expression::edge_prop(label, prop)
        } else {
            Expression::tag_prop(label, prop)
        }
    }

    /// 模式内联属性 `{k: v}` 转换为 `label.k == v`，只保留常量
    pub fn make_index_filter_from_props(
        label: &str,
        props: &[(String, Expression)],
        is_edge: bool,
    ) -> Option<Expression> {
        let conds = props
            .iter()
            .filter(|(_, v)| v.is_constant())
            .map(|(k, v)| Expression::eq(Self::schema_prop(label, k, is_edge), v.clone()))
            .collect();
        ExpressionUtils::and_all(conds)
    }

    fn index_relational(
        label: &str,
        alias: &str,
        expr: &Expression,
        is_edge: bool,
    ) -> Option<Expression> {
        let Expression::Relational { op, left, right } = expr else {
            return None;
        };
        if !matches!(
            op,
            RelationalOperator::Eq
                | RelationalOperator::Lt
                | RelationalOperator::Le
                | RelationalOperator::Gt
                | RelationalOperator::Ge
        ) {
            return None;
        }
        if let Some(prop) = label_attr_of(left, alias) {
            if right.is_constant() {
                let prop = Self::schema_prop(label, prop, is_edge);
                return Some(Expression::relational(*op, prop, right.as_ref().clone()));
            }
        }
        if let Some(prop) = label_attr_of(right, alias) {
            if left.is_constant() {
                let prop = Self::schema_prop(label, prop, is_edge);
                return Some(Expression::relational(*op, left.as_ref().clone(), prop));
            }
        }
        None
    }

    /// WHERE 中可以下推到索引的部分
    ///
    /// AND 只保留能转换的子条件，OR 要求每个分支都能转换。
    pub fn make_index_filter(
        label: &str,
        alias: &str,
        filter: &Expression,
        is_edge: bool,
    ) -> Option<Expression> {
        match filter {
            Expression::Logical {
                op: crate::core::LogicalOperator::Or,
                operands,
            } => operands
                .iter()
                .map(|o| Self::index_relational(label, alias, o, is_edge))
                .collect::<Option<Vec<_>>>()
                .and_then(|rels| rels.into_iter().reduce(Expression::or)),
            _ => {
                let rels = ExpressionUtils::split_conjunction(filter)
                    .iter()
                    .filter_map(|c| Self::index_relational(label, alias, c, is_edge))
                    .collect();
                ExpressionUtils::and_all(rels)
            }
        }
    }

    /// 优先选用首个字段出现在过滤条件中的索引，否则取 ID 最小的
    pub fn pick_index(
        qctx: &QueryContext,
        space_id: GraphSpaceID,
        schema_id: i32,
        is_edge: bool,
        filter: Option<&Expression>,
    ) -> Option<Index> {
        let indexes = if is_edge {
            qctx.index_manager().edge_indexes_of(space_id, schema_id)
        } else {
            qctx.index_manager().tag_indexes_of(space_id, schema_id)
        };
        let mut props = BTreeSet::new();
        if let Some(filter) = filter {
            collect_schema_props(filter, &mut props);
        }
        let hit = indexes
            .iter()
            .find(|i| i.fields.first().is_some_and(|f| props.contains(f)))
            .cloned();
        hit.or_else(|| indexes.into_iter().next())
    }

    /// 空间内所有 tag 的全部属性
    pub fn all_vertex_props(qctx: &QueryContext, space_id: GraphSpaceID) -> Vec<VertexProp> {
        let mut tags = qctx.schema_manager().list_tags(space_id);
        tags.sort_by_key(|t| t.tag_id);
        tags.into_iter()
            .map(|t| VertexProp {
                tag: t.tag_id,
                props: t.field_names(),
            })
            .collect()
    }

    pub fn vertex_props_of(
        qctx: &QueryContext,
        space_id: GraphSpaceID,
        tids: &[TagID],
    ) -> Vec<VertexProp> {
        tids.iter()
            .map(|tid| VertexProp {
                tag: *tid,
                props: qctx
                    .schema_manager()
                    .get_tag(space_id, *tid)
                    .map(|t| t.field_names())
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// 模式边的属性请求；未指定类型时取空间内所有边类型
    pub fn edge_props(
        qctx: &QueryContext,
        space_id: GraphSpaceID,
        edge: &EdgeInfo,
        reversely: bool,
    ) -> Vec<EdgeProp> {
        let schema = qctx.schema_manager();
        let types: Vec<i32> = if edge.edge_types.is_empty() {
            let mut all: Vec<i32> = schema
                .list_edge_types(space_id)
                .iter()
                .map(|e| e.edge_type)
                .collect();
            all.sort_unstable();
            all
        } else {
            edge.edge_types.clone()
        };

        let mut props = Vec::new();
        for edge_type in types {
            let fields: BTreeSet<String> = schema
                .get_edge_type(space_id, edge_type)
                .map(|e| e.field_names().into_iter().collect())
                .unwrap_or_default();
            let signed = match (edge.direction, reversely) {
                (EdgeDirection::Out, false) | (EdgeDirection::In, true) => vec![edge_type],
                (EdgeDirection::Out, true) | (EdgeDirection::In, false) => vec![-edge_type],
                (EdgeDirection::Both, _) => vec![edge_type, -edge_type],
            };
            for t in signed {
                props.push(PlannerUtil::edge_prop(t, Some(&fields), &EDGE_RESERVED_PROPS));
            }
        }
        props
    }

    pub fn vertex_filter(node: &NodeInfo) -> Option<Expression> {
        node.filter
            .clone()
            .or_else(|| ExpressionUtils::props_to_filter(&node.alias, &node.props))
    }

    pub fn edge_filter(edge: &EdgeInfo) -> Option<Expression> {
        edge.filter
            .clone()
            .or_else(|| ExpressionUtils::props_to_filter(&edge.alias, &edge.props))
    }

    /// 从边扫描结果中取出模式左侧节点的 ID，输出单列 `_vid` 并去重
    pub fn edge_start(
        qctx: &mut QueryContext,
        scan: PlanNodeId,
        direction: EdgeDirection,
    ) -> PlanNodeId {
        let vid_of = |col: &str| {
            let mut columns = YieldColumns::new();
            columns.add_column(YieldColumn::new(Expression::input_prop(col), K_VID));
            columns
        };
        let start = match direction {
            EdgeDirection::Out => PlanNodeFactory::project(qctx, scan, vid_of(K_SRC)),
            EdgeDirection::In => PlanNodeFactory::project(qctx, scan, vid_of(K_DST)),
            EdgeDirection::Both => {
                let both = Expression::List(vec![
                    Expression::input_prop(K_SRC),
                    Expression::input_prop(K_DST),
                ]);
                PlanNodeFactory::unwind(qctx, scan, both, K_VID)
            }
        };
        PlanNodeFactory::dedup(qctx, start)
    }

    /// 右侧计划以 Argument 为叶子时，从左侧结果读取绑定值
    pub fn bind_argument(
        qctx: &mut QueryContext,
        left: &SubPlan,
        right: &SubPlan,
    ) -> Result<(), PlannerError> {
        if left.is_empty() || right.is_empty() {
            return Ok(());
        }
        let tail = right.tail_id()?;
        if matches!(qctx.node(tail).kind(), PlanNodeKind::Argument { .. }) {
            let var = qctx.node(left.root_id()?).output_var().to_string();
            qctx.set_input_var(tail, &var);
        }
        Ok(())
    }

    /// 按模式顺序投影命名的点边列，命名路径额外构造路径列
    pub fn build_project_columns(
        qctx: &mut QueryContext,
        path: &Path,
        plan: &mut SubPlan,
    ) -> Result<(), PlannerError> {
        let mut columns = YieldColumns::new();
        let add_node = |columns: &mut YieldColumns, node: &NodeInfo| {
            if !node.alias.is_empty() && !node.anonymous {
                columns.add_column(YieldColumn::new(
                    Expression::input_prop(node.alias.as_str()),
                    node.alias.as_str(),
                ));
            }
        };
        for (node, edge) in path.node_infos.iter().zip(path.edge_infos.iter()) {
            add_node(&mut columns, node);
            if !edge.alias.is_empty() && !edge.anonymous {
                let expr = match edge.range {
                    None => Expression::subscript(
                        Expression::input_prop(edge.alias.as_str()),
                        Expression::constant(0),
                    ),
                    Some(_) => Expression::input_prop(edge.alias.as_str()),
                };
                columns.add_column(YieldColumn::new(expr, edge.alias.as_str()));
            }
        }
        let last = path.node_infos.last().ok_or_else(|| {
            PlannerError::InvalidAstContext("path pattern without nodes".to_string())
        })?;
        add_node(&mut columns, last);

        if !path.anonymous && !path.alias.is_empty() {
            let mut items = Vec::with_capacity(path.node_infos.len() + path.edge_infos.len());
            for (i, node) in path.node_infos.iter().enumerate() {
                items.push(Expression::input_prop(node.alias.as_str()));
                if let Some(edge) = path.edge_infos.get(i) {
                    items.push(Expression::input_prop(edge.alias.as_str()));
                }
            }
            columns.add_column(YieldColumn::new(
                Expression::PathBuild(items),
                path.alias.as_str(),
            ));
        }

        let project = PlanNodeFactory::project(qctx, plan.root_id()?, columns);
        plan.root = Some(project);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn available(names: &[&str]) -> BTreeMap<String, AliasType> {
        names
            .iter()
            .map(|n| (n.to_string(), AliasType::Node))
            .collect()
    }

    #[test]
    fn test_extract_vids() {
        let filter = Expression::and(
            Expression::eq(Expression::label_attr("n", "age"), Expression::constant(3)),
            Expression::eq(Expression::id_of("n"), Expression::constant("a")),
        );
        assert_eq!(
            MatchSolver::extract_vids("n", &filter),
            Some(vec![Value::from("a")])
        );
        assert_eq!(MatchSolver::extract_vids("m", &filter), None);

        let in_list = Expression::relational(
            RelationalOperator::In,
            Expression::id_of("n"),
            Expression::List(vec![Expression::constant("a"), Expression::constant("b")]),
        );
        assert_eq!(
            MatchSolver::extract_vids("n", &in_list),
            Some(vec![Value::from("a"), Value::from("b")])
        );
    }

    #[test]
    fn test_make_index_filter() {
        let filter = Expression::and(
            Expression::relational(
                RelationalOperator::Gt,
                Expression::constant(10),
                Expression::label_attr("n", "age"),
            ),
            Expression::eq(Expression::label_attr("m", "age"), Expression::constant(1)),
        );
        let index_filter =
            MatchSolver::make_index_filter("person", "n", &filter, false).expect("filter");
        assert_eq!(index_filter.to_string(), "(10>person.age)");

        let or = Expression::or(
            Expression::eq(Expression::label_attr("n", "a"), Expression::constant(1)),
            Expression::eq(Expression::label_attr("m", "a"), Expression::constant(2)),
        );
        assert!(MatchSolver::make_index_filter("person", "n", &or, false).is_none());
    }

    #[test]
    fn test_extract_variable_prop() {
        let filter = Expression::eq(
            Expression::label_attr("n", "name"),
            Expression::label_attr("m", "name"),
        );
        let (prop, value) =
            MatchSolver::extract_variable_prop("n", &filter, &available(&["m"])).expect("prop");
        assert_eq!(prop, "name");
        assert_eq!(value.to_string(), "m.name");
        assert!(MatchSolver::extract_variable_prop("n", &filter, &available(&[])).is_none());
    }

    #[test]
    fn test_extract_variable_vid() {
        let filter = Expression::eq(
            Expression::id_of("n"),
            Expression::var_prop("starts", "id"),
        );
        let vid = MatchSolver::extract_variable_vid("n", &filter, &available(&[])).expect("vid");
        assert_eq!(vid.to_string(), "$starts.id");
    }
}
