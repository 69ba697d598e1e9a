//! 元数据客户端接口
//!
//! 存储客户端只依赖元数据中的分区数、分区哈希与 leader 缓存。

use crate::core::error::StorageResult;
use crate::core::types::{GraphSpaceID, HostAddr, PartitionID};
use crate::core::Value;

/// 元数据客户端接口
pub trait MetaClient: Send + Sync + std::fmt::Debug {
    /// 空间的分区数，空间不存在时返回 `SpaceNotFound`
    fn parts_num(&self, space_id: GraphSpaceID) -> StorageResult<i32>;

    /// 点 ID 所在分区，分区号从 1 开始
    fn part_id(&self, num_parts: i32, vid: &Value) -> StorageResult<PartitionID>;

    fn get_storage_leader_from_cache(
        &self,
        space_id: GraphSpaceID,
        part_id: PartitionID,
    ) -> StorageResult<HostAddr>;

    fn update_storage_leader(&self, space_id: GraphSpaceID, part_id: PartitionID, leader: &HostAddr);

    fn invalid_storage_leader(&self, space_id: GraphSpaceID, part_id: PartitionID);
}
