//! 起点查找策略
//!
//! MATCH 模式需要先确定一批起点再展开。每种策略判断自己能否处理某个节点或边，
//! 能处理时生成产出起点的子计划，并在上下文中写入后续展开读取起点的表达式。

use crate::config::PlannerConfig;
use crate::query::context::ast::{EdgeContext, NodeContext};
use crate::query::planner::match_planning::seeks::{
    ArgumentFinder, LabelIndexSeek, PropIndexSeek, ScanSeek, VariablePropIndexSeek,
    VariableVertexIdSeek, VertexIdSeek,
};
use crate::query::planner::plan::SubPlan;
use crate::query::planner::planner::PlannerError;
use crate::query::QueryContext;

pub trait StartVidFinder: std::fmt::Debug {
    fn name(&self) -> &'static str;

    fn match_node(&self, qctx: &QueryContext, node_ctx: &mut NodeContext<'_>) -> bool;

    fn transform_node(
        &self,
        qctx: &mut QueryContext,
        node_ctx: &mut NodeContext<'_>,
    ) -> Result<SubPlan, PlannerError>;

    fn match_edge(&self, _qctx: &QueryContext, _edge_ctx: &mut EdgeContext<'_>) -> bool {
        false
    }

    fn transform_edge(
        &self,
        _qctx: &mut QueryContext,
        _edge_ctx: &mut EdgeContext<'_>,
    ) -> Result<SubPlan, PlannerError> {
        Err(PlannerError::UnsupportedOperation(format!(
            "{} can not start from an edge",
            self.name()
        )))
    }
}

/// 按固定顺序返回可用的策略，越靠前越精确
pub fn finders(config: &PlannerConfig) -> Vec<Box<dyn StartVidFinder>> {
    let mut finders: Vec<Box<dyn StartVidFinder>> = vec![
        Box::new(VertexIdSeek),
        Box::new(ArgumentFinder),
        Box::new(PropIndexSeek),
        Box::new(VariablePropIndexSeek),
    ];
    if config.enable_label_index_seek {
        finders.push(Box::new(LabelIndexSeek));
    }
    finders.push(Box::new(VariableVertexIdSeek));
    if config.enable_scan_seek {
        finders.push(Box::new(ScanSeek));
    }
    finders
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(config: &PlannerConfig) -> Vec<&'static str> {
        finders(config).iter().map(|f| f.name()).collect()
    }

    #[test]
    fn test_default_order() {
        assert_eq!(
            names(&PlannerConfig::default()),
            vec![
                "VertexIdSeek",
                "ArgumentFinder",
                "PropIndexSeek",
                "VariablePropIndexSeek",
                "LabelIndexSeek",
                "VariableVertexIdSeek",
                "ScanSeek"
            ]
        );
    }

    #[test]
    fn test_disabled_fallbacks() {
        let config = PlannerConfig {
            enable_label_index_seek: false,
            enable_scan_seek: false,
        };
        assert_eq!(
            names(&config),
            vec![
                "VertexIdSeek",
                "ArgumentFinder",
                "PropIndexSeek",
                "VariablePropIndexSeek",
                "VariableVertexIdSeek"
            ]
        );
    }
}
