//! 规划器公共工具

pub mod planner_util;

pub use planner_util::PlannerUtil;
