//! 计划核心模块

pub mod explain;
pub mod nodes;
pub mod object_pool;

pub use explain::{describe_plan, Pair, PlanNodeDescription};
pub use nodes::*;
pub use object_pool::ObjectPool;
