//! 表达式工具函数
//!
//! 构造循环条件、拆分合取式、收集别名引用等规划期需要的辅助操作。

use crate::core::expression::{
    Expression, LogicalOperator, RelationalOperator, UnaryOperator,
};
use crate::core::Value;
use std::collections::BTreeSet;

pub struct ExpressionUtils;

impl ExpressionUtils {
    /// `++$var <= steps`
    pub fn step_condition(var: &str, steps: u32) -> Expression {
        Expression::relational(
            RelationalOperator::Le,
            Expression::unary(UnaryOperator::Increment, Expression::variable(var)),
            Expression::constant(steps as i64),
        )
    }

    /// `$var == value`
    pub fn equal_condition(var: &str, value: Value) -> Expression {
        Expression::eq(Expression::variable(var), Expression::Constant(value))
    }

    /// `size($var) != 0`
    pub fn ne_zero_condition(var: &str) -> Expression {
        Expression::relational(
            RelationalOperator::Ne,
            Expression::function("size", vec![Expression::variable(var)]),
            Expression::constant(0),
        )
    }

    /// `size($var) == 0`
    pub fn zero_condition(var: &str) -> Expression {
        Expression::eq(
            Expression::function("size", vec![Expression::variable(var)]),
            Expression::constant(0),
        )
    }

    /// 展开顶层 AND
    pub fn split_conjunction(expr: &Expression) -> Vec<Expression> {
        match expr {
            Expression::Logical {
                op: LogicalOperator::And,
                operands,
            } => operands.iter().flat_map(Self::split_conjunction).collect(),
            other => vec![other.clone()],
        }
    }

    pub fn and_all(exprs: Vec<Expression>) -> Option<Expression> {
        exprs.into_iter().reduce(Expression::and)
    }

    /// 表达式中引用的 MATCH 别名
    pub fn referenced_labels(expr: &Expression) -> BTreeSet<String> {
        fn collect(expr: &Expression, out: &mut BTreeSet<String>) {
            match expr {
                Expression::Label(name) => {
                    out.insert(name.clone());
                }
                Expression::LabelAttribute { label, .. } => {
                    out.insert(label.clone());
                }
                _ => {}
            }
            for child in expr.children() {
                collect(child, out);
            }
        }
        let mut out = BTreeSet::new();
        collect(expr, &mut out);
        out
    }

    pub fn references_runtime_input(expr: &Expression) -> bool {
        expr.any(&|e| {
            matches!(
                e,
                Expression::InputProperty(_)
                    | Expression::VariableProperty { .. }
                    | Expression::Variable(_)
            )
        })
    }

    /// `{k: v}` 形式的模式属性转换为 `alias.k == v AND ...`
    pub fn props_to_filter(alias: &str, props: &[(String, Expression)]) -> Option<Expression> {
        let conds = props
            .iter()
            .map(|(k, v)| Expression::eq(Expression::label_attr(alias, k.as_str()), v.clone()))
            .collect();
        Self::and_all(conds)
    }

    /// 把别名引用改写为对输入列的引用，供投影与过滤在运行时读取
    pub fn labels_to_input_props(expr: &Expression) -> Expression {
        expr.rewrite(&|e| match e {
            Expression::Label(name) => Some(Expression::input_prop(name.clone())),
            Expression::LabelAttribute { label, attr } => Some(Expression::Attribute {
                object: Box::new(Expression::input_prop(label.clone())),
                attr: Box::new(Expression::constant(attr.as_str())),
            }),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_conjunction() {
        let a = Expression::eq(Expression::label_attr("n", "a"), Expression::constant(1));
        let b = Expression::eq(Expression::label_attr("m", "b"), Expression::constant(2));
        let or = Expression::or(a.clone(), b.clone());
        let expr = Expression::and(Expression::and(a.clone(), b.clone()), or.clone());
        let parts = ExpressionUtils::split_conjunction(&expr);
        assert_eq!(parts, vec![a, b, or]);
    }

    #[test]
    fn test_referenced_labels() {
        let expr = Expression::and(
            Expression::eq(Expression::id_of("v"), Expression::constant("a")),
            Expression::eq(Expression::label_attr("e", "w"), Expression::constant(1)),
        );
        let labels = ExpressionUtils::referenced_labels(&expr);
        assert_eq!(labels.into_iter().collect::<Vec<_>>(), vec!["e", "v"]);
    }

    #[test]
    fn test_props_to_filter() {
        assert!(ExpressionUtils::props_to_filter("n", &[]).is_none());
        let filter = ExpressionUtils::props_to_filter(
            "n",
            &[("id".to_string(), Expression::constant(7))],
        );
        assert_eq!(filter.map(|f| f.to_string()), Some("(n.id==7)".to_string()));
    }

    #[test]
    fn test_step_condition() {
        let cond = ExpressionUtils::step_condition("__VAR_1", 2);
        assert_eq!(cond.to_string(), "(++($__VAR_1)<=2)");
    }
}
