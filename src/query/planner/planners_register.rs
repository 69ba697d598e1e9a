//! 内置规划器注册
//!
//! 每种语句目前只有一个规划器，注册顺序即匹配顺序。

use crate::query::planner::match_planning::MatchPlanner;
use crate::query::planner::ngql::{
    AlterSchemaPlanner, CreateSchemaPlanner, FetchEdgesPlanner, FetchVerticesPlanner, GoPlanner,
    LookupPlanner, PathPlanner, SubgraphPlanner,
};
use crate::query::planner::planner::{PlannerRegistry, SentenceKind};

pub struct PlannersRegister;

impl PlannersRegister {
    pub fn register_all(registry: &mut PlannerRegistry) {
        Self::register_ddl(registry);
        Self::register_sequential(registry);
        Self::register_match(registry);
    }

    /// 创建注册了全部内置规划器的注册表
    pub fn registry() -> PlannerRegistry {
        let mut registry = PlannerRegistry::new();
        Self::register_all(&mut registry);
        registry
    }

    fn register_ddl(registry: &mut PlannerRegistry) {
        registry.register(
            SentenceKind::Maintain,
            CreateSchemaPlanner::match_ast_ctx,
            CreateSchemaPlanner::make,
        );
        registry.register(
            SentenceKind::Maintain,
            AlterSchemaPlanner::match_ast_ctx,
            AlterSchemaPlanner::make,
        );
    }

    fn register_sequential(registry: &mut PlannerRegistry) {
        registry.register(SentenceKind::Go, GoPlanner::match_ast_ctx, GoPlanner::make);
        registry.register(SentenceKind::Path, PathPlanner::match_ast_ctx, PathPlanner::make);
        registry.register(
            SentenceKind::Subgraph,
            SubgraphPlanner::match_ast_ctx,
            SubgraphPlanner::make,
        );
        registry.register(
            SentenceKind::Lookup,
            LookupPlanner::match_ast_ctx,
            LookupPlanner::make,
        );
        registry.register(
            SentenceKind::FetchVertices,
            FetchVerticesPlanner::match_ast_ctx,
            FetchVerticesPlanner::make,
        );
        registry.register(
            SentenceKind::FetchEdges,
            FetchEdgesPlanner::match_ast_ctx,
            FetchEdgesPlanner::make,
        );
    }

    fn register_match(registry: &mut PlannerRegistry) {
        registry.register(SentenceKind::Match, MatchPlanner::match_ast_ctx, MatchPlanner::make);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all() {
        let registry = PlannersRegister::registry();
        assert_eq!(registry.planner_count(), 9);
        assert_eq!(registry.planner_count_for(&SentenceKind::Maintain), 2);
        for kind in [
            SentenceKind::Match,
            SentenceKind::Go,
            SentenceKind::Lookup,
            SentenceKind::Path,
            SentenceKind::Subgraph,
            SentenceKind::FetchVertices,
            SentenceKind::FetchEdges,
        ] {
            assert_eq!(registry.planner_count_for(&kind), 1, "{}", kind);
        }
    }
}
