//! LOOKUP 规划器
//!
//! IndexScan [-> Filter] -> Project [-> Dedup] [-> Limit]

use crate::core::types::{IndexQueryContext, K_DST, K_RANK, K_SRC, K_VID};
use crate::core::Expression;
use crate::query::context::ast::{AstContext, LookupContext};
use crate::query::context::managers::Index;
use crate::query::planner::plan::{IndexScanNode, PlanNodeFactory, PlanNodeKind, SubPlan};
use crate::query::planner::planner::{Planner, PlannerError};
use crate::query::QueryContext;
use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub struct LookupPlanner;

fn collect_props(expr: &Expression, schema: &str, props: &mut BTreeSet<String>) {
    match expr {
        Expression::TagProperty { tag, prop } | Expression::EdgeProperty { edge: tag, prop }
            if tag == schema =>
        {
            props.insert(prop.clone());
        }
        Expression::LabelAttribute { label, attr } if label == schema => {
            props.insert(attr.clone());
        }
        other => {
            for child in other.children() {
                collect_props(child, schema, props);
            }
        }
    }
}

impl LookupPlanner {
    pub fn new() -> Self {
        Self
    }

    pub fn make() -> Box<dyn Planner> {
        Box::new(Self::new())
    }

    pub fn match_ast_ctx(ast_ctx: &AstContext) -> bool {
        matches!(ast_ctx, AstContext::Lookup(_))
    }

    /// 优先选用首个字段出现在过滤条件里的索引，否则取 ID 最小的
    fn pick_index(qctx: &QueryContext, ctx: &LookupContext) -> Result<Index, PlannerError> {
        let space_id = ctx.base.space.id;
        let schema = qctx.schema_manager();
        let known = if ctx.is_edge {
            schema.get_edge_type(space_id, ctx.schema_id).is_some()
        } else {
            schema.get_tag(space_id, ctx.schema_id).is_some()
        };
        if !known {
            return Err(PlannerError::SchemaNotFound(ctx.schema_name.clone()));
        }
        let indexes = if ctx.is_edge {
            qctx.index_manager().edge_indexes_of(space_id, ctx.schema_id)
        } else {
            qctx.index_manager().tag_indexes_of(space_id, ctx.schema_id)
        };
        let mut filter_props = BTreeSet::new();
        if let Some(filter) = &ctx.filter {
            collect_props(filter, &ctx.schema_name, &mut filter_props);
        }
        let hit = indexes
            .iter()
            .find(|i| i.fields.first().is_some_and(|f| filter_props.contains(f)))
            .cloned();
        hit.or_else(|| indexes.into_iter().next()).ok_or_else(|| {
            PlannerError::SemanticError("There is no index to use at runtime".to_string())
        })
    }

    fn return_cols(ctx: &LookupContext) -> Vec<String> {
        let mut cols: Vec<String> = if ctx.is_edge {
            vec![K_SRC.to_string(), K_DST.to_string(), K_RANK.to_string()]
        } else {
            vec![K_VID.to_string()]
        };
        let mut props = BTreeSet::new();
        for col in ctx.yield_expr.iter() {
            collect_props(&col.expr, &ctx.schema_name, &mut props);
        }
        if let Some(filter) = &ctx.filter {
            collect_props(filter, &ctx.schema_name, &mut props);
        }
        for prop in props {
            if !cols.contains(&prop) {
                cols.push(prop);
            }
        }
        cols
    }
}

impl Planner for LookupPlanner {
    fn transform(
        &mut self,
        qctx: &mut QueryContext,
        ast_ctx: &AstContext,
    ) -> Result<SubPlan, PlannerError> {
        let AstContext::Lookup(ctx) = ast_ctx else {
            return Err(PlannerError::unexpected_context("LOOKUP", ast_ctx));
        };
        let index = Self::pick_index(qctx, ctx)?;
        log::debug!("LOOKUP on `{}' uses index `{}'", ctx.schema_name, index.name);

        let mut scan = IndexScanNode::new(ctx.base.space.id, ctx.schema_id, ctx.is_edge);
        scan.contexts.push(IndexQueryContext {
            index_id: index.id,
            filter: None,
        });
        scan.return_cols = Self::return_cols(ctx);
        let return_cols = scan.return_cols.clone();
        let tail = PlanNodeFactory::make(qctx, PlanNodeKind::IndexScan(scan), Vec::new(), return_cols);

        let mut root = tail;
        if let Some(filter) = &ctx.filter {
            root = PlanNodeFactory::filter(qctx, root, filter.clone());
        }
        root = PlanNodeFactory::project(qctx, root, ctx.yield_expr.clone());
        qctx.set_col_names(root, ctx.col_names.clone());
        if ctx.dedup {
            root = PlanNodeFactory::dedup(qctx, root);
        }
        if let Some(limit) = ctx.limit {
            root = PlanNodeFactory::limit(qctx, root, 0, limit);
        }
        Ok(SubPlan::new(root, tail))
    }
}
