//! 规划器注册机制
//!
//! 注册表按语句类型保存有序的 (匹配函数, 实例化函数) 列表，
//! 由调用方显式构造并在规划时传入。

use crate::query::context::ast::AstContext;
use crate::query::planner::plan::SubPlan;
use crate::query::QueryContext;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// 语句类型枚举
#[derive(Debug, Clone, PartialEq, Hash, Eq, Copy)]
pub enum SentenceKind {
    Match,
    Go,
    Lookup,
    Path,
    Subgraph,
    FetchVertices,
    FetchEdges,
    Maintain,
}

impl FromStr for SentenceKind {
    type Err = PlannerError;

    /// 从字符串解析语句类型，不区分大小写
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MATCH" => Ok(SentenceKind::Match),
            "GO" => Ok(SentenceKind::Go),
            "LOOKUP" => Ok(SentenceKind::Lookup),
            "PATH" => Ok(SentenceKind::Path),
            "SUBGRAPH" => Ok(SentenceKind::Subgraph),
            "FETCH VERTICES" => Ok(SentenceKind::FetchVertices),
            "FETCH EDGES" => Ok(SentenceKind::FetchEdges),
            "MAINTAIN" => Ok(SentenceKind::Maintain),
            _ => Err(PlannerError::UnsupportedOperation(format!(
                "Unsupported statement type: {}",
                s
            ))),
        }
    }
}

impl SentenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentenceKind::Match => "MATCH",
            SentenceKind::Go => "GO",
            SentenceKind::Lookup => "LOOKUP",
            SentenceKind::Path => "PATH",
            SentenceKind::Subgraph => "SUBGRAPH",
            SentenceKind::FetchVertices => "FETCH VERTICES",
            SentenceKind::FetchEdges => "FETCH EDGES",
            SentenceKind::Maintain => "MAINTAIN",
        }
    }
}

impl fmt::Display for SentenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 匹配函数类型
pub type MatchFunc = fn(&AstContext) -> bool;

/// 规划器实例化函数类型
pub type PlannerInstantiateFunc = fn() -> Box<dyn Planner>;

/// 匹配和实例化结构
#[derive(Debug, Clone, Copy)]
pub struct MatchAndInstantiate {
    pub match_func: MatchFunc,
    pub instantiate_func: PlannerInstantiateFunc,
}

impl MatchAndInstantiate {
    pub fn new(match_func: MatchFunc, instantiate_func: PlannerInstantiateFunc) -> Self {
        Self {
            match_func,
            instantiate_func,
        }
    }
}

/// 规划器注册表
///
/// 同一语句类型下按注册顺序尝试，第一个匹配的规划器负责生成计划。
#[derive(Debug, Default)]
pub struct PlannerRegistry {
    planners: HashMap<SentenceKind, Vec<MatchAndInstantiate>>,
}

impl PlannerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册规划器，追加在已有规划器之后
    pub fn register(
        &mut self,
        sentence_kind: SentenceKind,
        match_func: MatchFunc,
        instantiate_func: PlannerInstantiateFunc,
    ) {
        self.planners
            .entry(sentence_kind)
            .or_default()
            .push(MatchAndInstantiate::new(match_func, instantiate_func));
    }

    /// 为语句生成计划
    pub fn to_plan(
        &self,
        qctx: &mut QueryContext,
        ast_ctx: &AstContext,
    ) -> Result<SubPlan, PlannerError> {
        let sentence_kind = ast_ctx.sentence_kind();
        let planners = self
            .planners
            .get(&sentence_kind)
            .filter(|p| !p.is_empty())
            .ok_or(PlannerError::NoPlannerFound(sentence_kind))?;

        for planner_info in planners {
            if (planner_info.match_func)(ast_ctx) {
                let mut planner = (planner_info.instantiate_func)();
                log::debug!("Planning {} with {:?}", sentence_kind, planner);
                let plan = planner.transform(qctx, ast_ctx)?;
                log::debug!("Plan of {}: root {:?}, tail {:?}", sentence_kind, plan.root, plan.tail);
                return Ok(plan);
            }
        }

        Err(PlannerError::NoPlannerMatched(ast_ctx.sentence().to_string()))
    }

    /// 获取已注册的规划器数量
    pub fn planner_count(&self) -> usize {
        self.planners.values().map(|v| v.len()).sum()
    }

    pub fn has_planners_for(&self, sentence_kind: &SentenceKind) -> bool {
        self.planners.contains_key(sentence_kind)
    }

    pub fn planner_count_for(&self, sentence_kind: &SentenceKind) -> usize {
        self.planners
            .get(sentence_kind)
            .map(|v| v.len())
            .unwrap_or(0)
    }
}

/// 规划器特征
pub trait Planner: fmt::Debug {
    fn transform(
        &mut self,
        qctx: &mut QueryContext,
        ast_ctx: &AstContext,
    ) -> Result<SubPlan, PlannerError>;
}

/// 规划器错误类型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlannerError {
    #[error("No planners for sentence kind: {0}")]
    NoPlannerFound(SentenceKind),

    #[error("No planner matches sentence: {0}")]
    NoPlannerMatched(String),

    #[error("SemanticError: {0}")]
    SemanticError(String),

    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid AST context: {0}")]
    InvalidAstContext(String),

    #[error("Missing variable: {0}")]
    MissingVariable(String),

    #[error("Plan generation failed: {0}")]
    PlanGenerationFailed(String),
}

impl PlannerError {
    pub(crate) fn unexpected_context(expected: &str, ast_ctx: &AstContext) -> Self {
        PlannerError::InvalidAstContext(format!(
            "expected {} context, got {}",
            expected,
            ast_ctx.sentence_kind()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SpaceInfo;
    use crate::query::context::ast::{AstContextBase, LookupContext};
    use crate::query::context::managers::MemorySchemaManager;
    use crate::query::planner::plan::PlanNodeFactory;
    use std::sync::Arc;

    #[derive(Debug)]
    struct StartOnly;

    impl Planner for StartOnly {
        fn transform(
            &mut self,
            qctx: &mut QueryContext,
            _ast_ctx: &AstContext,
        ) -> Result<SubPlan, PlannerError> {
            Ok(SubPlan::single(PlanNodeFactory::start(qctx)))
        }
    }

    fn qctx() -> QueryContext {
        let schema = Arc::new(MemorySchemaManager::new());
        QueryContext::new(1, schema.clone(), schema)
    }

    fn lookup_ctx() -> AstContext {
        AstContext::Lookup(LookupContext {
            base: AstContextBase::new("LOOKUP ON t", SpaceInfo::new(1, "s")),
            ..LookupContext::default()
        })
    }

    #[test]
    fn test_sentence_kind_from_str() {
        assert_eq!(
            "match".parse::<SentenceKind>().expect("Expected successful parsing of 'match'"),
            SentenceKind::Match
        );
        assert_eq!(
            "FETCH VERTICES"
                .parse::<SentenceKind>()
                .expect("Expected successful parsing of 'FETCH VERTICES'"),
            SentenceKind::FetchVertices
        );
        for kind in [SentenceKind::FetchEdges, SentenceKind::Maintain] {
            assert_eq!(kind.to_string().parse::<SentenceKind>(), Ok(kind));
        }
        assert_eq!(
            "INVALID".parse::<SentenceKind>(),
            Err(PlannerError::UnsupportedOperation(
                "Unsupported statement type: INVALID".to_string()
            ))
        );
    }

    #[test]
    fn test_no_planner_found() {
        let registry = PlannerRegistry::new();
        let err = registry
            .to_plan(&mut qctx(), &lookup_ctx())
            .expect_err("empty registry");
        assert_eq!(err, PlannerError::NoPlannerFound(SentenceKind::Lookup));
    }

    #[test]
    fn test_no_planner_matched() {
        let mut registry = PlannerRegistry::new();
        registry.register(SentenceKind::Lookup, |_| false, || Box::new(StartOnly) as Box<dyn Planner>);
        let err = registry
            .to_plan(&mut qctx(), &lookup_ctx())
            .expect_err("nothing matches");
        assert!(matches!(err, PlannerError::NoPlannerMatched(s) if s == "LOOKUP ON t"));
    }

    #[test]
    fn test_first_match_in_registration_order() {
        #[derive(Debug)]
        struct ArgumentOnly;
        impl Planner for ArgumentOnly {
            fn transform(
                &mut self,
                qctx: &mut QueryContext,
                _ast_ctx: &AstContext,
            ) -> Result<SubPlan, PlannerError> {
                Ok(SubPlan::single(PlanNodeFactory::argument(qctx, "x")))
            }
        }

        let mut registry = PlannerRegistry::new();
        registry.register(SentenceKind::Lookup, |_| true, || Box::new(ArgumentOnly) as Box<dyn Planner>);
        registry.register(SentenceKind::Lookup, |_| true, || Box::new(StartOnly) as Box<dyn Planner>);
        assert_eq!(registry.planner_count_for(&SentenceKind::Lookup), 2);

        let mut qctx = qctx();
        let plan = registry.to_plan(&mut qctx, &lookup_ctx()).expect("plan");
        let root = plan.root_id().expect("root");
        assert_eq!(qctx.node(root).name(), "Argument");
    }
}
