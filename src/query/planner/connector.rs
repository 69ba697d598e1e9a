//! 连接器模块
//!
//! 提供子计划之间的连接功能，包括内连接、左连接、笛卡尔积和输入添加

use crate::core::Expression;
use crate::query::planner::plan::{JoinKeys, PlanNodeFactory, SubPlan};
use crate::query::planner::planner::PlannerError;
use crate::query::QueryContext;
use std::collections::BTreeSet;

/// 计划连接器
pub struct SegmentsConnector;

impl SegmentsConnector {
    /// 每个共享别名生成一个 `_joinkey($-.alias)`，按别名排序
    fn join_keys(inter_aliases: &BTreeSet<String>) -> JoinKeys {
        let keys: Vec<Expression> = inter_aliases
            .iter()
            .map(|alias| Expression::function("_joinkey", vec![Expression::input_prop(alias.as_str())]))
            .collect();
        JoinKeys::new(keys.clone(), keys)
    }

    /// 内连接，保留左侧 tail
    pub fn inner_join(
        qctx: &mut QueryContext,
        left: SubPlan,
        right: SubPlan,
        inter_aliases: &BTreeSet<String>,
    ) -> Result<SubPlan, PlannerError> {
        let join = PlanNodeFactory::hash_inner_join(
            qctx,
            left.root_id()?,
            right.root_id()?,
            Self::join_keys(inter_aliases),
        );
        Ok(SubPlan {
            root: Some(join),
            tail: left.tail,
        })
    }

    /// 左连接，用于 OPTIONAL MATCH
    pub fn left_join(
        qctx: &mut QueryContext,
        left: SubPlan,
        right: SubPlan,
        inter_aliases: &BTreeSet<String>,
    ) -> Result<SubPlan, PlannerError> {
        let join = PlanNodeFactory::hash_left_join(
            qctx,
            left.root_id()?,
            right.root_id()?,
            Self::join_keys(inter_aliases),
        );
        Ok(SubPlan {
            root: Some(join),
            tail: left.tail,
        })
    }

    /// 笛卡尔积
    pub fn cartesian_product(
        qctx: &mut QueryContext,
        left: SubPlan,
        right: SubPlan,
    ) -> Result<SubPlan, PlannerError> {
        let join = PlanNodeFactory::cross_join(qctx, left.root_id()?, right.root_id()?);
        Ok(SubPlan {
            root: Some(join),
            tail: left.tail,
        })
    }

    /// 根据共享别名与是否可选选择连接方式
    pub fn connect_segments(
        qctx: &mut QueryContext,
        left: SubPlan,
        right: SubPlan,
        inter_aliases: &BTreeSet<String>,
        optional: bool,
    ) -> Result<SubPlan, PlannerError> {
        if left.is_empty() {
            return Ok(right);
        }
        if right.is_empty() {
            return Ok(left);
        }
        match (inter_aliases.is_empty(), optional) {
            (true, _) => Self::cartesian_product(qctx, left, right),
            (false, true) => Self::left_join(qctx, left, right, inter_aliases),
            (false, false) => Self::inner_join(qctx, left, right, inter_aliases),
        }
    }

    /// 添加输入
    ///
    /// `left` 的 tail 依赖 `right` 的 root，结果的 tail 为 `right` 的 tail。
    pub fn add_input(
        qctx: &mut QueryContext,
        left: SubPlan,
        right: SubPlan,
        copy_col_names: bool,
    ) -> Result<SubPlan, PlannerError> {
        if left.is_empty() {
            return Ok(right);
        }
        let tail = left.tail_id()?;
        let right_root = right.root_id()?;
        qctx.set_dep(tail, 0, right_root);
        let input_var = qctx.node(right_root).output_var().to_string();
        qctx.set_input_var(tail, &input_var);
        if copy_col_names {
            let col_names = qctx.node(right_root).col_names().to_vec();
            qctx.set_col_names(tail, col_names);
        }
        Ok(SubPlan {
            root: left.root,
            tail: right.tail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::context::managers::MemorySchemaManager;
    use crate::query::planner::plan::PlanNodeKind;
    use std::sync::Arc;

    fn create_test_query_context() -> QueryContext {
        let schema = Arc::new(MemorySchemaManager::new());
        QueryContext::new(1, schema.clone(), schema)
    }

    fn aliases(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_inner_join_keys_sorted() {
        let mut qctx = create_test_query_context();
        let left = SubPlan::single(PlanNodeFactory::argument(&mut qctx, "b"));
        let right = SubPlan::single(PlanNodeFactory::argument(&mut qctx, "a"));
        let plan = SegmentsConnector::inner_join(&mut qctx, left, right, &aliases(&["b", "a"]))
            .expect("Expected planner result to exist");
        let root = plan.root_id().expect("root");
        match qctx.node(root).kind() {
            PlanNodeKind::HashInnerJoin(keys) => {
                let rendered: Vec<String> = keys.hash_keys.iter().map(|k| k.to_string()).collect();
                assert_eq!(rendered, vec!["_joinkey($-.a)", "_joinkey($-.b)"]);
                assert_eq!(keys.hash_keys, keys.probe_keys);
            }
            other => panic!("unexpected node {:?}", other),
        }
        assert_eq!(plan.tail, left.tail);
    }

    #[test]
    fn test_connect_segments_picks_join() {
        let mut qctx = create_test_query_context();
        let a = SubPlan::single(PlanNodeFactory::argument(&mut qctx, "a"));
        let b = SubPlan::single(PlanNodeFactory::argument(&mut qctx, "b"));

        let cross = SegmentsConnector::connect_segments(&mut qctx, a, b, &aliases(&[]), false)
            .expect("cross join");
        let left = SegmentsConnector::connect_segments(&mut qctx, a, b, &aliases(&["a"]), true)
            .expect("left join");
        let inner = SegmentsConnector::connect_segments(&mut qctx, a, b, &aliases(&["a"]), false)
            .expect("inner join");

        let name = |qctx: &QueryContext, p: SubPlan| qctx.node(p.root.expect("root")).name();
        assert_eq!(name(&qctx, cross), "CrossJoin");
        assert_eq!(name(&qctx, left), "HashLeftJoin");
        assert_eq!(name(&qctx, inner), "HashInnerJoin");
    }

    #[test]
    fn test_add_input() {
        let mut qctx = create_test_query_context();
        let input = SubPlan::single(PlanNodeFactory::argument(&mut qctx, "n"));
        let filter = PlanNodeFactory::filter(
            &mut qctx,
            input.root.expect("root"),
            Expression::constant(true),
        );
        let start = PlanNodeFactory::start(&mut qctx);
        let dependent = SubPlan::single(filter);
        let upstream = SubPlan::single(start);

        let plan = SegmentsConnector::add_input(&mut qctx, dependent, upstream, true)
            .expect("add input");
        assert_eq!(plan.root, Some(filter));
        assert_eq!(plan.tail, Some(start));
        assert_eq!(qctx.node(filter).deps(), [start]);
        assert_eq!(qctx.node(filter).input_var(), Some("__Start_2"));
        assert!(qctx.node(filter).col_names().is_empty());
    }

    #[test]
    fn test_add_input_with_empty_left() {
        let mut qctx = create_test_query_context();
        let right = SubPlan::single(PlanNodeFactory::start(&mut qctx));
        let plan = SegmentsConnector::add_input(&mut qctx, SubPlan::default(), right, false)
            .expect("add input");
        assert_eq!(plan, right);
    }
}
