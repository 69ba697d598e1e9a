//! 表达式类型定义
//!
//! 规划器只构造和改写表达式，不对其求值。表达式按值存放在计划节点中，
//! 计划节点本身由查询级对象池持有。

use crate::core::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 关系运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationalOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
    StartsWith,
    Contains,
}

impl RelationalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationalOperator::Eq => "==",
            RelationalOperator::Ne => "!=",
            RelationalOperator::Lt => "<",
            RelationalOperator::Le => "<=",
            RelationalOperator::Gt => ">",
            RelationalOperator::Ge => ">=",
            RelationalOperator::In => " IN ",
            RelationalOperator::NotIn => " NOT IN ",
            RelationalOperator::StartsWith => " STARTS WITH ",
            RelationalOperator::Contains => " CONTAINS ",
        }
    }

    /// 交换左右操作数后的等价运算符
    pub fn flip(&self) -> Option<Self> {
        match self {
            RelationalOperator::Eq => Some(RelationalOperator::Eq),
            RelationalOperator::Ne => Some(RelationalOperator::Ne),
            RelationalOperator::Lt => Some(RelationalOperator::Gt),
            RelationalOperator::Le => Some(RelationalOperator::Ge),
            RelationalOperator::Gt => Some(RelationalOperator::Lt),
            RelationalOperator::Ge => Some(RelationalOperator::Le),
            _ => None,
        }
    }

    /// 能否下推为索引扫描条件
    pub fn is_index_compatible(&self) -> bool {
        matches!(
            self,
            RelationalOperator::Eq
                | RelationalOperator::Lt
                | RelationalOperator::Le
                | RelationalOperator::Gt
                | RelationalOperator::Ge
                | RelationalOperator::In
        )
    }
}

/// 逻辑运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
    And,
    Or,
    Xor,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => " AND ",
            LogicalOperator::Or => " OR ",
            LogicalOperator::Xor => " XOR ",
        }
    }
}

/// 算术运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithmeticOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithmeticOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Sub => "-",
            ArithmeticOperator::Mul => "*",
            ArithmeticOperator::Div => "/",
            ArithmeticOperator::Mod => "%",
        }
    }
}

/// 一元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not,
    Negate,
    Increment,
    IsNull,
    IsNotNull,
    IsEmpty,
    IsNotEmpty,
}

/// 统一表达式类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// 常量
    Constant(Value),
    /// 用户变量或内部匿名变量 `$var`
    Variable(String),
    /// 管道输入列 `$-.col`
    InputProperty(String),
    /// 变量列 `$var.col`
    VariableProperty { var: String, prop: String },
    /// 按位置引用输入列，负数从末尾开始计数
    Column(i32),
    /// MATCH 中的别名
    Label(String),
    /// `alias.prop`
    LabelAttribute { label: String, attr: String },
    /// 索引过滤使用的 `tag.prop`
    TagProperty { tag: String, prop: String },
    /// `$^.tag.prop`
    SourceProperty { tag: String, prop: String },
    /// `$$.tag.prop`
    DestProperty { tag: String, prop: String },
    /// `edge.prop`，`edge` 为 `*` 时表示任意边
    EdgeProperty { edge: String, prop: String },
    Attribute {
        object: Box<Expression>,
        attr: Box<Expression>,
    },
    Subscript {
        collection: Box<Expression>,
        index: Box<Expression>,
    },
    FunctionCall { name: String, args: Vec<Expression> },
    Relational {
        op: RelationalOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Logical {
        op: LogicalOperator,
        operands: Vec<Expression>,
    },
    Arithmetic {
        op: ArithmeticOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
    List(Vec<Expression>),
    Map(Vec<(String, Expression)>),
    /// 由点边序列构造路径
    PathBuild(Vec<Expression>),
}

impl Expression {
    pub fn constant(v: impl Into<Value>) -> Self {
        Expression::Constant(v.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    pub fn input_prop(prop: impl Into<String>) -> Self {
        Expression::InputProperty(prop.into())
    }

    pub fn var_prop(var: impl Into<String>, prop: impl Into<String>) -> Self {
        Expression::VariableProperty {
            var: var.into(),
            prop: prop.into(),
        }
    }

    pub fn label(name: impl Into<String>) -> Self {
        Expression::Label(name.into())
    }

    pub fn label_attr(label: impl Into<String>, attr: impl Into<String>) -> Self {
        Expression::LabelAttribute {
            label: label.into(),
            attr: attr.into(),
        }
    }

    pub fn tag_prop(tag: impl Into<String>, prop: impl Into<String>) -> Self {
        Expression::TagProperty {
            tag: tag.into(),
            prop: prop.into(),
        }
    }

    pub fn edge_prop(edge: impl Into<String>, prop: impl Into<String>) -> Self {
        Expression::EdgeProperty {
            edge: edge.into(),
            prop: prop.into(),
        }
    }

    pub fn function(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::FunctionCall {
            name: name.into(),
            args,
        }
    }

    pub fn relational(op: RelationalOperator, left: Expression, right: Expression) -> Self {
        Expression::Relational {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn eq(left: Expression, right: Expression) -> Self {
        Self::relational(RelationalOperator::Eq, left, right)
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        let mut operands = Vec::new();
        for side in [left, right] {
            match side {
                Expression::Logical {
                    op: LogicalOperator::And,
                    operands: inner,
                } => operands.extend(inner),
                other => operands.push(other),
            }
        }
        Expression::Logical {
            op: LogicalOperator::And,
            operands,
        }
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::Logical {
            op: LogicalOperator::Or,
            operands: vec![left, right],
        }
    }

    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn arithmetic(op: ArithmeticOperator, left: Expression, right: Expression) -> Self {
        Expression::Arithmetic {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn subscript(collection: Expression, index: Expression) -> Self {
        Expression::Subscript {
            collection: Box::new(collection),
            index: Box::new(index),
        }
    }

    /// `id(alias)`
    pub fn id_of(alias: impl Into<String>) -> Self {
        Self::function("id", vec![Expression::label(alias)])
    }

    /// 不依赖任何运行时输入的表达式
    pub fn is_constant(&self) -> bool {
        match self {
            Expression::Constant(_) => true,
            Expression::List(items) => items.iter().all(Expression::is_constant),
            _ => false,
        }
    }

    /// 常量折叠，只处理常量与常量列表
    pub fn eval_constant(&self) -> Option<Value> {
        match self {
            Expression::Constant(v) => Some(v.clone()),
            Expression::List(items) => items
                .iter()
                .map(Expression::eval_constant)
                .collect::<Option<Vec<_>>>()
                .map(Value::List),
            _ => None,
        }
    }

    /// 直接子表达式
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Attribute { object, attr } => vec![object.as_ref(), attr.as_ref()],
            Expression::Subscript { collection, index } => {
                vec![collection.as_ref(), index.as_ref()]
            }
            Expression::FunctionCall { args, .. } => args.iter().collect(),
            Expression::Relational { left, right, .. }
            | Expression::Arithmetic { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Expression::Logical { operands, .. } => operands.iter().collect(),
            Expression::Unary { operand, .. } => vec![operand.as_ref()],
            Expression::List(items) | Expression::PathBuild(items) => items.iter().collect(),
            Expression::Map(items) => items.iter().map(|(_, e)| e).collect(),
            _ => Vec::new(),
        }
    }

    /// 自身或任意后代满足谓词
    pub fn any(&self, pred: &dyn Fn(&Expression) -> bool) -> bool {
        pred(self) || self.children().into_iter().any(|c| c.any(pred))
    }

    /// 自底向上改写：`f` 返回 `Some` 时替换该节点，否则继续改写子节点
    pub fn rewrite(&self, f: &dyn Fn(&Expression) -> Option<Expression>) -> Expression {
        if let Some(replaced) = f(self) {
            return replaced;
        }
        let boxed = |e: &Expression| Box::new(e.rewrite(f));
        match self {
            Expression::Attribute { object, attr } => Expression::Attribute {
                object: boxed(object),
                attr: boxed(attr),
            },
            Expression::Subscript { collection, index } => Expression::Subscript {
                collection: boxed(collection),
                index: boxed(index),
            },
            Expression::FunctionCall { name, args } => Expression::FunctionCall {
                name: name.clone(),
                args: args.iter().map(|a| a.rewrite(f)).collect(),
            },
            Expression::Relational { op, left, right } => Expression::Relational {
                op: *op,
                left: boxed(left),
                right: boxed(right),
            },
            Expression::Arithmetic { op, left, right } => Expression::Arithmetic {
                op: *op,
                left: boxed(left),
                right: boxed(right),
            },
            Expression::Logical { op, operands } => Expression::Logical {
                op: *op,
                operands: operands.iter().map(|o| o.rewrite(f)).collect(),
            },
            Expression::Unary { op, operand } => Expression::Unary {
                op: *op,
                operand: boxed(operand),
            },
            Expression::List(items) => {
                Expression::List(items.iter().map(|i| i.rewrite(f)).collect())
            }
            Expression::PathBuild(items) => {
                Expression::PathBuild(items.iter().map(|i| i.rewrite(f)).collect())
            }
            Expression::Map(items) => Expression::Map(
                items
                    .iter()
                    .map(|(k, v)| (k.clone(), v.rewrite(f)))
                    .collect(),
            ),
            leaf => leaf.clone(),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expression], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(v) => write!(f, "{}", v),
            Expression::Variable(name) => write!(f, "${}", name),
            Expression::InputProperty(prop) => write!(f, "$-.{}", prop),
            Expression::VariableProperty { var, prop } => write!(f, "${}.{}", var, prop),
            Expression::Column(idx) => write!(f, "COLUMN[{}]", idx),
            Expression::Label(name) => f.write_str(name),
            Expression::LabelAttribute { label, attr } => write!(f, "{}.{}", label, attr),
            Expression::TagProperty { tag, prop } => write!(f, "{}.{}", tag, prop),
            Expression::SourceProperty { tag, prop } => write!(f, "$^.{}.{}", tag, prop),
            Expression::DestProperty { tag, prop } => write!(f, "$$.{}.{}", tag, prop),
            Expression::EdgeProperty { edge, prop } => write!(f, "{}.{}", edge, prop),
            Expression::Attribute { object, attr } => match attr.as_ref() {
                Expression::Constant(Value::String(name)) => write!(f, "{}.{}", object, name),
                other => write!(f, "{}.{}", object, other),
            },
            Expression::Subscript { collection, index } => write!(f, "{}[{}]", collection, index),
            Expression::FunctionCall { name, args } => {
                write!(f, "{}(", name)?;
                write_list(f, args, ",")?;
                f.write_str(")")
            }
            Expression::Relational { op, left, right } => {
                write!(f, "({}{}{})", left, op.as_str(), right)
            }
            Expression::Logical { op, operands } => {
                f.write_str("(")?;
                write_list(f, operands, op.as_str())?;
                f.write_str(")")
            }
            Expression::Arithmetic { op, left, right } => {
                write!(f, "({}{}{})", left, op.as_str(), right)
            }
            Expression::Unary { op, operand } => match op {
                UnaryOperator::Not => write!(f, "!({})", operand),
                UnaryOperator::Negate => write!(f, "-({})", operand),
                UnaryOperator::Increment => write!(f, "++({})", operand),
                UnaryOperator::IsNull => write!(f, "{} IS NULL", operand),
                UnaryOperator::IsNotNull => write!(f, "{} IS NOT NULL", operand),
                UnaryOperator::IsEmpty => write!(f, "{} IS EMPTY", operand),
                UnaryOperator::IsNotEmpty => write!(f, "{} IS NOT EMPTY", operand),
            },
            Expression::List(items) => {
                f.write_str("[")?;
                write_list(f, items, ",")?;
                f.write_str("]")
            }
            Expression::Map(items) => {
                f.write_str("{")?;
                for (i, (k, v)) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}:{}", k, v)?;
                }
                f.write_str("}")
            }
            Expression::PathBuild(items) => {
                f.write_str("PathBuild[")?;
                write_list(f, items, ",")?;
                f.write_str("]")
            }
        }
    }
}

/// 输出列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldColumn {
    pub expr: Expression,
    pub alias: String,
}

impl YieldColumn {
    pub fn new(expr: Expression, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: alias.into(),
        }
    }

    /// 没有别名时使用表达式文本作为列名
    pub fn name(&self) -> String {
        if self.alias.is_empty() {
            self.expr.to_string()
        } else {
            self.alias.clone()
        }
    }
}

/// 输出列集合
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YieldColumns {
    pub columns: Vec<YieldColumn>,
}

impl YieldColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_column(&mut self, column: YieldColumn) {
        self.columns.push(column);
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(YieldColumn::name).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, YieldColumn> {
        self.columns.iter()
    }
}

impl FromIterator<YieldColumn> for YieldColumns {
    fn from_iter<I: IntoIterator<Item = YieldColumn>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for YieldColumns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if col.alias.is_empty() {
                write!(f, "{}", col.expr)?;
            } else {
                write!(f, "{} AS {}", col.expr, col.alias)?;
            }
        }
        Ok(())
    }
}
