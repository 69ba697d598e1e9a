//! RPC 客户端池

use crate::core::types::HostAddr;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

/// 为目标主机提供可复用的 RPC 客户端
pub trait ClientManager<C>: Send + Sync {
    fn client(&self, host: &HostAddr, use_ssl: bool, timeout_ms: u64) -> Arc<C>;
}

pub type ClientFactory<C> = dyn Fn(&HostAddr, bool, u64) -> C + Send + Sync;

/// 按 (主机, 是否 SSL) 缓存客户端，首次访问时创建
pub struct PooledClientManager<C> {
    clients: DashMap<(HostAddr, bool), Arc<C>>,
    factory: Box<ClientFactory<C>>,
}

impl<C> PooledClientManager<C> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&HostAddr, bool, u64) -> C + Send + Sync + 'static,
    {
        Self {
            clients: DashMap::new(),
            factory: Box::new(factory),
        }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// 丢弃某个主机的连接，下次访问时重建
    pub fn evict(&self, host: &HostAddr) {
        self.clients.retain(|(h, _), _| h != host);
    }
}

impl<C: Send + Sync> ClientManager<C> for PooledClientManager<C> {
    fn client(&self, host: &HostAddr, use_ssl: bool, timeout_ms: u64) -> Arc<C> {
        self.clients
            .entry((host.clone(), use_ssl))
            .or_insert_with(|| {
                log::debug!("Create storage client to {}", host);
                Arc::new((self.factory)(host, use_ssl, timeout_ms))
            })
            .clone()
    }
}

impl<C> fmt::Debug for PooledClientManager<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledClientManager")
            .field("clients", &self.clients.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_clients_are_reused() {
        let created = Arc::new(AtomicUsize::new(0));
        let counter = created.clone();
        let manager = PooledClientManager::new(move |host: &HostAddr, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            host.to_string()
        });
        let h1 = HostAddr::new("s1", 9779);
        let a = manager.client(&h1, false, 100);
        let b = manager.client(&h1, false, 100);
        assert!(Arc::ptr_eq(&a, &b));
        manager.client(&HostAddr::new("s2", 9779), false, 100);
        assert_eq!(created.load(Ordering::SeqCst), 2);

        manager.evict(&h1);
        manager.client(&h1, false, 100);
        assert_eq!(created.load(Ordering::SeqCst), 3);
        assert_eq!(manager.len(), 2);
    }
}
