//! 管理器接口模块
//!
//! 规划器通过 Schema/索引管理器解析名字与可用索引，存储客户端通过元数据客户端定位分区。

pub mod r#impl;
pub mod index_manager;
pub mod meta_client;
pub mod schema_manager;

pub use index_manager::{Index, IndexManager, SchemaId};
pub use meta_client::MetaClient;
pub use r#impl::*;
pub use schema_manager::{EdgeTypeDef, FieldDef, SchemaManager, TagDef};
