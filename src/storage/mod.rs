//! 存储访问层
//!
//! 本 crate 不包含存储引擎，只提供把计划中的读请求分发到各存储节点的客户端。

pub mod client;

pub use crate::core::StorageError;
pub use client::{GraphStorageClient, GraphStorageService, StorageClientBase, StorageRpcResponse};
