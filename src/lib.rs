//! GraphDB Planner - 分布式图数据库的查询规划核心
//!
//! 包含两部分：把校验后的语句上下文转换为执行计划的规划器，
//! 以及把计划中的读请求按分区 leader 扇出到各存储节点的客户端。

pub mod config;
pub mod core;
pub mod query;
pub mod storage;
pub mod utils;
