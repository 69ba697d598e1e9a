//! 按分区 leader 对请求分组
//!
//! 结果形如 `host -> part -> [ids]`，分组之前先解析空间内每个分区的 leader，
//! 任一分区 leader 未知时整体失败。

use crate::core::error::{StorageError, StorageResult};
use crate::core::types::{GraphSpaceID, HostAddr, PartitionID, ScanCursor};
use crate::core::Value;
use crate::storage::client::PartitionLocator;
use std::collections::HashMap;

pub type HostParts = HashMap<HostAddr, Vec<PartitionID>>;
pub type HostPartsWithCursor = HashMap<HostAddr, HashMap<PartitionID, ScanCursor>>;
pub type ClusteredIds<T> = HashMap<HostAddr, HashMap<PartitionID, Vec<T>>>;

fn resolve_leaders(
    locator: &PartitionLocator,
    space_id: GraphSpaceID,
) -> StorageResult<(i32, HashMap<PartitionID, HostAddr>)> {
    let num_parts = locator
        .parts_num(space_id)
        .map_err(|_| StorageError::SpaceNotFound(space_id))?;
    let mut leaders = HashMap::with_capacity(num_parts.max(0) as usize);
    for part_id in 1..=num_parts {
        leaders.insert(part_id, locator.get_leader(space_id, part_id)?);
    }
    Ok((num_parts, leaders))
}

/// `get_key` 取出 id 中用于计算分区的点 ID
pub fn cluster_ids_to_hosts<T, F>(
    locator: &PartitionLocator,
    space_id: GraphSpaceID,
    ids: impl IntoIterator<Item = T>,
    get_key: F,
) -> StorageResult<ClusteredIds<T>>
where
    F: Fn(&T) -> &Value,
{
    let (num_parts, leaders) = resolve_leaders(locator, space_id)?;
    let mut clusters: ClusteredIds<T> = HashMap::new();
    for id in ids {
        let part_id = locator.part_id(num_parts, get_key(&id))?;
        let leader = leaders.get(&part_id).cloned().ok_or(StorageError::LeaderNotFound {
            space: space_id,
            part: part_id,
        })?;
        clusters
            .entry(leader)
            .or_default()
            .entry(part_id)
            .or_default()
            .push(id);
    }
    Ok(clusters)
}

pub fn get_host_parts(locator: &PartitionLocator, space_id: GraphSpaceID) -> StorageResult<HostParts> {
    let (num_parts, leaders) = resolve_leaders(locator, space_id)?;
    let mut host_parts: HostParts = HashMap::new();
    for part_id in 1..=num_parts {
        if let Some(leader) = leaders.get(&part_id) {
            host_parts.entry(leader.clone()).or_default().push(part_id);
        }
    }
    Ok(host_parts)
}

/// 每个分区从头开始扫描
pub fn get_host_parts_with_cursor(
    locator: &PartitionLocator,
    space_id: GraphSpaceID,
) -> StorageResult<HostPartsWithCursor> {
    let host_parts = get_host_parts(locator, space_id)?;
    Ok(host_parts
        .into_iter()
        .map(|(host, parts)| {
            let cursors = parts
                .into_iter()
                .map(|part_id| (part_id, ScanCursor::default()))
                .collect();
            (host, cursors)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::context::managers::MetaCache;
    use std::sync::Arc;

    fn locator(parts: i32, hosts: &[HostAddr]) -> PartitionLocator {
        let cache = Arc::new(MetaCache::new());
        cache.add_space(1, parts);
        cache.assign_leaders_round_robin(1, hosts);
        PartitionLocator::new(cache)
    }

    #[test]
    fn test_cluster_int_ids() {
        let h1 = HostAddr::new("s1", 9779);
        let h2 = HostAddr::new("s2", 9779);
        let locator = locator(4, &[h1.clone(), h2.clone()]);
        let ids: Vec<Value> = (0..8).map(Value::Int).collect();
        let clusters = cluster_ids_to_hosts(&locator, 1, ids, |v| v).expect("clustered");

        // part = id % 4 + 1，奇数分区在 s1，偶数分区在 s2
        assert_eq!(clusters[&h1][&1], vec![Value::Int(0), Value::Int(4)]);
        assert_eq!(clusters[&h1][&3], vec![Value::Int(2), Value::Int(6)]);
        assert_eq!(clusters[&h2][&2], vec![Value::Int(1), Value::Int(5)]);
        assert_eq!(clusters[&h2].len(), 2);
    }

    #[test]
    fn test_cluster_edge_keys_by_src() {
        let h1 = HostAddr::new("s1", 9779);
        let locator = locator(2, &[h1.clone()]);
        let keys = vec![(Value::Int(1), Value::Int(10)), (Value::Int(2), Value::Int(10))];
        let clusters = cluster_ids_to_hosts(&locator, 1, keys, |(src, _)| src).expect("clustered");
        assert_eq!(clusters[&h1][&2], vec![(Value::Int(1), Value::Int(10))]);
        assert_eq!(clusters[&h1][&1], vec![(Value::Int(2), Value::Int(10))]);
    }

    #[test]
    fn test_unknown_space() {
        let locator = locator(2, &[HostAddr::new("s1", 9779)]);
        let err = get_host_parts(&locator, 7).expect_err("space 7 is unknown");
        assert_eq!(err, StorageError::SpaceNotFound(7));
        assert_eq!(err.to_string(), "Space not found, spaceid: 7");
    }

    #[test]
    fn test_unknown_leader() {
        let locator = locator(3, &[HostAddr::new("s1", 9779)]);
        locator.invalid_leader(1, 2);
        let err = cluster_ids_to_hosts(&locator, 1, vec![Value::Int(0)], |v| v)
            .expect_err("leader of part 2 is unknown");
        assert_eq!(err, StorageError::LeaderNotFound { space: 1, part: 2 });
    }

    #[test]
    fn test_host_parts_with_cursor() {
        let h1 = HostAddr::new("s1", 9779);
        let h2 = HostAddr::new("s2", 9779);
        let locator = locator(3, &[h1.clone(), h2.clone()]);
        let parts = get_host_parts(&locator, 1).expect("host parts");
        assert_eq!(parts[&h1], vec![1, 3]);
        assert_eq!(parts[&h2], vec![2]);

        let with_cursor = get_host_parts_with_cursor(&locator, 1).expect("host parts");
        assert_eq!(with_cursor[&h1].len(), 2);
        assert!(!with_cursor[&h2][&2].has_next());
    }
}
