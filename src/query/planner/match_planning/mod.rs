//! MATCH 语句规划
//!
//! `MatchPlanner` 逐个子句规划，`MatchClausePlanner` 逐条路径规划，
//! `MatchPathPlanner` 借助起点查找策略确定起点后展开整条路径。

pub mod match_clause_planner;
pub mod match_path_planner;
pub mod match_planner;
pub mod match_solver;
pub mod return_clause_planner;
pub mod seeks;
pub mod start_vid_finder;
pub mod where_clause_planner;

pub use match_clause_planner::MatchClausePlanner;
pub use match_path_planner::MatchPathPlanner;
pub use match_planner::MatchPlanner;
pub use match_solver::MatchSolver;
pub use return_clause_planner::ReturnClausePlanner;
pub use start_vid_finder::{finders, StartVidFinder};
pub use where_clause_planner::WhereClausePlanner;
