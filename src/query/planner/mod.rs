//! 执行计划生成
//!
//! `PlannerRegistry` 根据 AST 上下文选择规划器，规划器在 `QueryContext` 的节点池中
//! 构建计划节点，并用 `SegmentsConnector` 拼接各段子计划。

pub mod connector;
pub mod match_planning;
pub mod ngql;
pub mod plan;
pub mod planner;
pub mod planners_register;
pub mod utils;

pub use connector::SegmentsConnector;
pub use match_planning::MatchPlanner;
pub use ngql::{
    AlterSchemaPlanner, CreateSchemaPlanner, FetchEdgesPlanner, FetchVerticesPlanner, GoPlanner,
    LookupPlanner, PathPlanner, SubgraphPlanner,
};
pub use plan::execution_plan::{ExecutionPlan, SubPlan};
pub use planner::{Planner, PlannerError, PlannerRegistry, SentenceKind};
pub use planners_register::PlannersRegister;
