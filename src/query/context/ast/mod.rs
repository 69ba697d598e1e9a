//! AST上下文模块

pub mod base;
pub mod common;
pub mod cypher_ast_context;
pub mod query_types;

pub use base::{AstContext, AstContextBase};
pub use common::{AliasType, ExpressionProps, FromType, Over, Starts, StepClause};
pub use cypher_ast_context::{
    EdgeContext, EdgeInfo, MatchAstContext, MatchClauseContext, MatchStepRange, NodeContext,
    NodeInfo, Path, ReturnClauseContext, ScanInfo, WhereClauseContext,
};
pub use query_types::*;
