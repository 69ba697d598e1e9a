//! 一次多主机调用的聚合状态
//!
//! 状态只沿 `Sending -> SentWaiting -> Fulfilled` 前进，所有转换都在同一把锁内完成，
//! 进入 `Fulfilled` 的那次转换负责兑现 promise，因此结果恰好交付一次。

use crate::core::types::HostAddr;
use crate::storage::client::response::StorageRpcResponse;
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseState {
    /// 仍在发送，记录在途请求数
    Sending(usize),
    /// 发送完毕，等待剩余请求返回
    SentWaiting(usize),
    Fulfilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Insert,
    Remove,
    FinishSending,
}

impl ResponseState {
    /// 返回新状态以及本次转换是否刚好完成
    fn transition(self, event: Event) -> (ResponseState, bool) {
        use ResponseState::*;
        match (self, event) {
            (Sending(n), Event::Insert) => (Sending(n + 1), false),
            (Sending(n), Event::Remove) => (Sending(n.saturating_sub(1)), false),
            (Sending(0), Event::FinishSending) => (Fulfilled, true),
            (Sending(n), Event::FinishSending) => (SentWaiting(n), false),
            (SentWaiting(n), Event::Remove) if n <= 1 => (Fulfilled, true),
            (SentWaiting(n), Event::Remove) => (SentWaiting(n - 1), false),
            (state, _) => (state, false),
        }
    }
}

struct Inner<Req, Resp> {
    state: ResponseState,
    ongoing: HashMap<HostAddr, Req>,
    resp: Option<StorageRpcResponse<Resp>>,
    promise: Option<oneshot::Sender<StorageRpcResponse<Resp>>>,
}

pub struct ResponseContext<Req, Resp> {
    inner: Mutex<Inner<Req, Resp>>,
}

impl<Req, Resp> ResponseContext<Req, Resp> {
    pub fn new(
        resp: StorageRpcResponse<Resp>,
    ) -> (Self, oneshot::Receiver<StorageRpcResponse<Resp>>) {
        let (tx, rx) = oneshot::channel();
        let ctx = Self {
            inner: Mutex::new(Inner {
                state: ResponseState::Sending(0),
                ongoing: HashMap::new(),
                resp: Some(resp),
                promise: Some(tx),
            }),
        };
        (ctx, rx)
    }

    pub fn state(&self) -> ResponseState {
        self.inner.lock().state
    }

    /// 同一主机重复插入返回 false
    pub fn insert_request(&self, host: HostAddr, req: Req) -> bool {
        let mut inner = self.inner.lock();
        if inner.ongoing.contains_key(&host) {
            return false;
        }
        inner.ongoing.insert(host, req);
        let (state, _) = inner.state.transition(Event::Insert);
        inner.state = state;
        true
    }

    /// 在锁内把该主机的结果合并进聚合响应并移除在途请求
    pub fn complete_request<F>(&self, host: &HostAddr, merge: F)
    where
        F: FnOnce(Option<&Req>, &mut StorageRpcResponse<Resp>),
    {
        let delivery = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            let req = inner.ongoing.remove(host);
            if req.is_none() {
                log::warn!("Response from {} has no matching request", host);
                return;
            }
            if let Some(resp) = inner.resp.as_mut() {
                merge(req.as_ref(), resp);
            }
            let (state, done) = inner.state.transition(Event::Remove);
            inner.state = state;
            if done {
                Self::take_delivery(inner)
            } else {
                None
            }
        };
        Self::deliver(delivery);
    }

    /// 所有请求都已发出；没有在途请求时立即完成
    pub fn finish_sending(&self) {
        let delivery = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            let (state, done) = inner.state.transition(Event::FinishSending);
            inner.state = state;
            if done {
                Self::take_delivery(inner)
            } else {
                None
            }
        };
        Self::deliver(delivery);
    }

    fn take_delivery(
        inner: &mut Inner<Req, Resp>,
    ) -> Option<(oneshot::Sender<StorageRpcResponse<Resp>>, StorageRpcResponse<Resp>)> {
        match (inner.promise.take(), inner.resp.take()) {
            (Some(promise), Some(resp)) => Some((promise, resp)),
            _ => None,
        }
    }

    fn deliver(
        delivery: Option<(oneshot::Sender<StorageRpcResponse<Resp>>, StorageRpcResponse<Resp>)>,
    ) {
        if let Some((promise, resp)) = delivery {
            if promise.send(resp).is_err() {
                log::debug!("Caller dropped before the storage response was ready");
            }
        }
    }
}
