//! 分区 leader 定位
//!
//! leader 缓存只在这里被修改：收到重定向时更新，遇到分区/空间不存在或传输错误时失效。

use crate::core::error::StorageResult;
use crate::core::types::{GraphSpaceID, HostAddr, PartitionID};
use crate::core::Value;
use crate::query::context::managers::MetaClient;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct PartitionLocator {
    meta_client: Arc<dyn MetaClient>,
}

impl PartitionLocator {
    pub fn new(meta_client: Arc<dyn MetaClient>) -> Self {
        Self { meta_client }
    }

    pub fn get_leader(&self, space_id: GraphSpaceID, part_id: PartitionID) -> StorageResult<HostAddr> {
        self.meta_client.get_storage_leader_from_cache(space_id, part_id)
    }

    pub fn update_leader(&self, space_id: GraphSpaceID, part_id: PartitionID, leader: &HostAddr) {
        self.meta_client.update_storage_leader(space_id, part_id, leader);
    }

    pub fn invalid_leader(&self, space_id: GraphSpaceID, part_id: PartitionID) {
        self.meta_client.invalid_storage_leader(space_id, part_id);
    }

    pub fn invalid_leaders(&self, space_id: GraphSpaceID, part_ids: &[PartitionID]) {
        for part_id in part_ids {
            self.invalid_leader(space_id, *part_id);
        }
    }

    pub fn parts_num(&self, space_id: GraphSpaceID) -> StorageResult<i32> {
        self.meta_client.parts_num(space_id)
    }

    pub fn part_id(&self, num_parts: i32, vid: &Value) -> StorageResult<PartitionID> {
        self.meta_client.part_id(num_parts, vid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StorageError;
    use crate::query::context::managers::MetaCache;

    #[test]
    fn test_invalid_leaders() {
        let cache = Arc::new(MetaCache::new());
        cache.add_space(1, 3);
        cache.assign_leaders_round_robin(1, &[HostAddr::new("s1", 9779)]);
        let locator = PartitionLocator::new(cache);

        locator.invalid_leaders(1, &[1, 3]);
        assert_eq!(
            locator.get_leader(1, 1),
            Err(StorageError::LeaderNotFound { space: 1, part: 1 })
        );
        assert_eq!(locator.get_leader(1, 2), Ok(HostAddr::new("s1", 9779)));
        assert!(locator.get_leader(1, 3).is_err());
    }
}
