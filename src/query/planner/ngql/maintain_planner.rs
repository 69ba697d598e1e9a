//! Schema 维护语句规划器
//!
//! CREATE/ALTER TAG 与 CREATE/ALTER EDGE 都只生成单个节点，根与尾相同。

use crate::query::context::ast::AstContext;
use crate::query::planner::plan::{
    AlterSchemaNode, CreateSchemaNode, PlanNodeFactory, PlanNodeKind, SubPlan,
};
use crate::query::planner::planner::{Planner, PlannerError};
use crate::query::QueryContext;

/// CREATE TAG / CREATE EDGE 规划器
#[derive(Debug, Default)]
pub struct CreateSchemaPlanner;

impl CreateSchemaPlanner {
    pub fn new() -> Self {
        Self
    }

    pub fn make() -> Box<dyn Planner> {
        Box::new(Self::new())
    }

    pub fn match_ast_ctx(ast_ctx: &AstContext) -> bool {
        matches!(ast_ctx, AstContext::CreateSchema(_))
    }
}

impl Planner for CreateSchemaPlanner {
    fn transform(
        &mut self,
        qctx: &mut QueryContext,
        ast_ctx: &AstContext,
    ) -> Result<SubPlan, PlannerError> {
        let AstContext::CreateSchema(ctx) = ast_ctx else {
            return Err(PlannerError::unexpected_context("CREATE TAG/EDGE", ast_ctx));
        };
        let node = CreateSchemaNode {
            space_id: ctx.base.space.id,
            name: ctx.name.clone(),
            columns: ctx.columns.clone(),
            if_not_exist: ctx.if_not_exist,
        };
        let kind = if ctx.is_edge {
            PlanNodeKind::CreateEdge(node)
        } else {
            PlanNodeKind::CreateTag(node)
        };
        let id = PlanNodeFactory::make(qctx, kind, Vec::new(), Vec::new());
        Ok(SubPlan::single(id))
    }
}

/// ALTER TAG / ALTER EDGE 规划器
#[derive(Debug, Default)]
pub struct AlterSchemaPlanner;

impl AlterSchemaPlanner {
    pub fn new() -> Self {
        Self
    }

    pub fn make() -> Box<dyn Planner> {
        Box::new(Self::new())
    }

    pub fn match_ast_ctx(ast_ctx: &AstContext) -> bool {
        matches!(ast_ctx, AstContext::AlterSchema(_))
    }
}

impl Planner for AlterSchemaPlanner {
    fn transform(
        &mut self,
        qctx: &mut QueryContext,
        ast_ctx: &AstContext,
    ) -> Result<SubPlan, PlannerError> {
        let AstContext::AlterSchema(ctx) = ast_ctx else {
            return Err(PlannerError::unexpected_context("ALTER TAG/EDGE", ast_ctx));
        };
        if ctx.items.is_empty() {
            return Err(PlannerError::SemanticError(format!(
                "Nothing to alter on `{}'",
                ctx.name
            )));
        }
        let node = AlterSchemaNode {
            space_id: ctx.base.space.id,
            name: ctx.name.clone(),
            items: ctx.items.clone(),
        };
        let kind = if ctx.is_edge {
            PlanNodeKind::AlterEdge(node)
        } else {
            PlanNodeKind::AlterTag(node)
        };
        let id = PlanNodeFactory::make(qctx, kind, Vec::new(), Vec::new());
        Ok(SubPlan::single(id))
    }
}
