//! 管理器实现模块

pub mod meta_client_impl;
pub mod schema_manager_impl;

pub use meta_client_impl::MetaCache;
pub use schema_manager_impl::MemorySchemaManager;
