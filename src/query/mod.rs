// 查询规划模块
//
// - context: 校验后的语句上下文、符号表与 Schema/元数据接口
// - planner: 规划器注册表、各语句规划器与计划节点
// - query_context: 单个查询的规划状态

pub mod context;
pub mod planner;
pub mod query_context;

pub use crate::core::{DBError, DBResult};
pub use query_context::QueryContext;
