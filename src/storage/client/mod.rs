//! 存储客户端
//!
//! 分区定位、请求分组、RPC 扇出以及在其之上的图存储操作。

pub mod client_manager;
pub mod graph_storage_client;
pub mod partition_locator;
pub mod request_clusterer;
pub mod requests;
pub mod response;
pub mod response_context;
pub mod storage_client_base;

pub use client_manager::{ClientManager, PooledClientManager};
pub use graph_storage_client::{GraphStorageClient, GraphStorageService};
pub use partition_locator::PartitionLocator;
pub use request_clusterer::{cluster_ids_to_hosts, get_host_parts, get_host_parts_with_cursor};
pub use requests::*;
pub use response::{
    PartitionResult, ResponseCommon, ResultCode, StorageRequest, StorageResponse,
    StorageRpcResponse,
};
pub use response_context::{ResponseContext, ResponseState};
pub use storage_client_base::StorageClientBase;
