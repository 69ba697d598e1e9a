//! 各类 nGQL 语句的上下文

pub mod fetch_edges;
pub mod fetch_vertices;
pub mod go;
pub mod lookup;
pub mod maintain;
pub mod path;
pub mod subgraph;

pub use fetch_edges::{EdgeKeyRef, FetchEdgesContext};
pub use fetch_vertices::FetchVerticesContext;
pub use go::GoContext;
pub use lookup::LookupContext;
pub use maintain::{AlterSchemaContext, AlterSchemaItem, AlterSchemaOp, CreateSchemaContext};
pub use path::PathContext;
pub use subgraph::SubgraphContext;
