//! 内存元数据缓存
//!
//! leader 表是并发映射，多个 RPC 回调可能同时写入同一分区，以最后一次写入为准。

use crate::core::error::{StorageError, StorageResult};
use crate::core::murmur::murmurhash2;
use crate::core::types::{GraphSpaceID, HostAddr, PartitionID};
use crate::core::Value;
use crate::query::context::managers::MetaClient;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct MetaCache {
    parts_num: DashMap<GraphSpaceID, i32>,
    leaders: DashMap<(GraphSpaceID, PartitionID), HostAddr>,
}

impl MetaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_space(&self, space_id: GraphSpaceID, parts_num: i32) {
        self.parts_num.insert(space_id, parts_num);
    }

    pub fn set_leader(&self, space_id: GraphSpaceID, part_id: PartitionID, leader: HostAddr) {
        self.leaders.insert((space_id, part_id), leader);
    }

    /// 把空间内所有分区的 leader 依次分配给给定主机
    pub fn assign_leaders_round_robin(&self, space_id: GraphSpaceID, hosts: &[HostAddr]) {
        let Some(n) = self.parts_num.get(&space_id).map(|n| *n) else {
            return;
        };
        if hosts.is_empty() {
            return;
        }
        for part in 1..=n {
            let host = &hosts[(part as usize - 1) % hosts.len()];
            self.set_leader(space_id, part, host.clone());
        }
    }

    pub fn cached_leader(&self, space_id: GraphSpaceID, part_id: PartitionID) -> Option<HostAddr> {
        self.leaders.get(&(space_id, part_id)).map(|h| h.clone())
    }
}

impl MetaClient for MetaCache {
    fn parts_num(&self, space_id: GraphSpaceID) -> StorageResult<i32> {
        self.parts_num
            .get(&space_id)
            .map(|n| *n)
            .ok_or(StorageError::SpaceNotFound(space_id))
    }

    fn part_id(&self, num_parts: i32, vid: &Value) -> StorageResult<PartitionID> {
        if num_parts <= 0 {
            return Err(StorageError::PartIdFailed(format!(
                "invalid parts number {}",
                num_parts
            )));
        }
        let hash = match vid {
            Value::Int(id) => *id as u64,
            Value::String(s) => murmurhash2(s.as_bytes(), 0) as u64,
            other => {
                return Err(StorageError::PartIdFailed(format!(
                    "unsupported vertex id {}",
                    other
                )))
            }
        };
        Ok((hash % num_parts as u64) as PartitionID + 1)
    }

    fn get_storage_leader_from_cache(
        &self,
        space_id: GraphSpaceID,
        part_id: PartitionID,
    ) -> StorageResult<HostAddr> {
        self.cached_leader(space_id, part_id)
            .ok_or(StorageError::LeaderNotFound {
                space: space_id,
                part: part_id,
            })
    }

    fn update_storage_leader(&self, space_id: GraphSpaceID, part_id: PartitionID, leader: &HostAddr) {
        log::debug!(
            "Update the leader for [{}, {}] to {}",
            space_id,
            part_id,
            leader
        );
        self.leaders.insert((space_id, part_id), leader.clone());
    }

    fn invalid_storage_leader(&self, space_id: GraphSpaceID, part_id: PartitionID) {
        log::debug!("Invalidate the leader for [{}, {}]", space_id, part_id);
        self.leaders.remove(&(space_id, part_id));
    }
}
