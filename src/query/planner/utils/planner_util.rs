//! 起点构建与属性请求的公共逻辑

use crate::core::types::{EdgeProp, EdgeType, TagID, VertexProp, K_VID};
use crate::core::{Expression, Value, YieldColumn, YieldColumns};
use crate::query::context::ast::{FromType, Starts};
use crate::query::planner::plan::{PlanNodeFactory, PlanNodeKind, SubPlan};
use crate::query::planner::planner::PlannerError;
use crate::query::QueryContext;
use std::collections::{BTreeMap, BTreeSet};

pub struct PlannerUtil;

impl PlannerUtil {
    /// 常量起点写入新的匿名变量（单列 `_vid`），起点表达式改为 `$-._vid`
    pub fn build_constant_input(qctx: &mut QueryContext, starts: &mut Starts) -> String {
        let vids_var = qctx.anon_var();
        qctx.set_value(&vids_var, Value::List(starts.vids.clone()));
        qctx.sym_table_mut()
            .set_col_names(&vids_var, vec![K_VID.to_string()]);
        starts.src = Some(Expression::input_prop(K_VID));
        vids_var
    }

    /// 从管道或变量中取出起点列并去重
    pub fn build_runtime_input(
        qctx: &mut QueryContext,
        starts: &Starts,
        input_var: &str,
    ) -> Result<SubPlan, PlannerError> {
        let original_src = starts.original_src.clone().ok_or_else(|| {
            PlannerError::InvalidAstContext("runtime starts without source expression".into())
        })?;
        let mut columns = YieldColumns::new();
        columns.add_column(YieldColumn::new(original_src, K_VID));
        let project = PlanNodeFactory::make(
            qctx,
            PlanNodeKind::Project { columns },
            Vec::new(),
            vec![K_VID.to_string()],
        );
        let var = match starts.from_type {
            FromType::Variable => starts.user_defined_var_name.as_str(),
            _ => input_var,
        };
        if !var.is_empty() {
            qctx.set_input_var(project, var);
        }
        let dedup = PlanNodeFactory::dedup(qctx, project);
        Ok(SubPlan::new(dedup, project))
    }

    /// 返回起点子计划与存放起点的变量；常量起点不产生节点
    pub fn build_start(
        qctx: &mut QueryContext,
        starts: &mut Starts,
        input_var: &str,
    ) -> Result<(SubPlan, String), PlannerError> {
        if !starts.vids.is_empty() && starts.original_src.is_none() {
            let vids_var = Self::build_constant_input(qctx, starts);
            return Ok((SubPlan::default(), vids_var));
        }
        let plan = Self::build_runtime_input(qctx, starts, input_var)?;
        let vids_var = qctx.node(plan.root_id()?).output_var().to_string();
        Ok((plan, vids_var))
    }

    pub fn vertex_props(props: &BTreeMap<TagID, BTreeSet<String>>) -> Vec<VertexProp> {
        props
            .iter()
            .map(|(tag, names)| VertexProp {
                tag: *tag,
                props: names.iter().cloned().collect(),
            })
            .collect()
    }

    /// 指定边类型的属性请求，总是带上保留列
    pub fn edge_prop(
        edge_type: EdgeType,
        props: Option<&BTreeSet<String>>,
        reserved: &[&str],
    ) -> EdgeProp {
        let mut names: BTreeSet<String> = reserved.iter().map(|r| r.to_string()).collect();
        if let Some(props) = props {
            names.extend(props.iter().cloned());
        }
        EdgeProp {
            edge_type,
            props: names.into_iter().collect(),
        }
    }
}
