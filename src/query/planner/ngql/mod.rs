//! nGQL 语句规划器
//! 处理 GO、FETCH、LOOKUP、FIND PATH、GET SUBGRAPH 以及 Schema 维护语句

pub mod fetch_edges_planner;
pub mod fetch_vertices_planner;
pub mod go_planner;
pub mod lookup_planner;
pub mod maintain_planner;
pub mod path_planner;
pub mod subgraph_planner;

pub use fetch_edges_planner::FetchEdgesPlanner;
pub use fetch_vertices_planner::FetchVerticesPlanner;
pub use go_planner::GoPlanner;
pub use lookup_planner::LookupPlanner;
pub use maintain_planner::{AlterSchemaPlanner, CreateSchemaPlanner};
pub use path_planner::PathPlanner;
pub use subgraph_planner::SubgraphPlanner;
