//! 基础AST上下文定义
//!
//! `AstContext` 是经过校验的语句的封闭集合，规划器按变体匹配。

use crate::core::types::SpaceInfo;
use crate::query::context::ast::cypher_ast_context::MatchAstContext;
use crate::query::context::ast::query_types::{
    AlterSchemaContext, CreateSchemaContext, FetchEdgesContext, FetchVerticesContext, GoContext,
    LookupContext, PathContext, SubgraphContext,
};
use crate::query::planner::planner::SentenceKind;
use serde::{Deserialize, Serialize};

/// 所有语句上下文共享的信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AstContextBase {
    /// 原始语句文本，仅用于日志
    pub sentence: String,
    pub space: SpaceInfo,
}

impl AstContextBase {
    pub fn new(sentence: impl Into<String>, space: SpaceInfo) -> Self {
        Self {
            sentence: sentence.into(),
            space,
        }
    }
}

/// 校验后的语句上下文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AstContext {
    Go(GoContext),
    Path(PathContext),
    Subgraph(SubgraphContext),
    Lookup(LookupContext),
    FetchVertices(FetchVerticesContext),
    FetchEdges(FetchEdgesContext),
    Match(MatchAstContext),
    CreateSchema(CreateSchemaContext),
    AlterSchema(AlterSchemaContext),
}

impl AstContext {
    pub fn base(&self) -> &AstContextBase {
        match self {
            AstContext::Go(ctx) => &ctx.base,
            AstContext::Path(ctx) => &ctx.base,
            AstContext::Subgraph(ctx) => &ctx.base,
            AstContext::Lookup(ctx) => &ctx.base,
            AstContext::FetchVertices(ctx) => &ctx.base,
            AstContext::FetchEdges(ctx) => &ctx.base,
            AstContext::Match(ctx) => &ctx.base,
            AstContext::CreateSchema(ctx) => &ctx.base,
            AstContext::AlterSchema(ctx) => &ctx.base,
        }
    }

    pub fn space(&self) -> &SpaceInfo {
        &self.base().space
    }

    pub fn sentence(&self) -> &str {
        &self.base().sentence
    }

    pub fn sentence_kind(&self) -> SentenceKind {
        match self {
            AstContext::Go(_) => SentenceKind::Go,
            AstContext::Path(_) => SentenceKind::Path,
            AstContext::Subgraph(_) => SentenceKind::Subgraph,
            AstContext::Lookup(_) => SentenceKind::Lookup,
            AstContext::FetchVertices(_) => SentenceKind::FetchVertices,
            AstContext::FetchEdges(_) => SentenceKind::FetchEdges,
            AstContext::Match(_) => SentenceKind::Match,
            AstContext::CreateSchema(_) | AstContext::AlterSchema(_) => SentenceKind::Maintain,
        }
    }
}
