//! 可细化锁策略
//!
//! 锁数组可整体替换，另有一个通过 CAS 仲裁的所有权令牌。
//! 扩容者标记令牌后只等待第0行的锁全部空闲（静默），期间其他线程
//! 仅在令牌上自旋，不会被长期阻塞。

use std::{
    sync::{
        atomic::{fence, Ordering},
        Arc,
    },
    thread,
};

use crossbeam::utils::Backoff;
use parking_lot::RwLock;

use crate::{
    error::CuckooError,
    lock::{
        lock_array::{LockArray, LockScope},
        owner::{HolderId, OwnerToken},
        strategy::LockStrategy,
    },
    set::table::TableHandle,
    types::{Element, ResizeCause},
};

pub struct Refinable {
    locks: RwLock<Arc<LockArray>>,
    owner: OwnerToken,
}

impl Refinable {
    fn current(&self) -> Arc<LockArray> {
        self.locks.read().clone()
    }

    fn is_live(&self, locks: &Arc<LockArray>) -> bool {
        Arc::ptr_eq(locks, &self.locks.read())
    }

    /// 当前锁数组容量
    pub fn lock_capacity(&self) -> usize {
        self.locks.read().capacity()
    }

    /// 所有权令牌状态
    pub fn owner(&self) -> &OwnerToken {
        &self.owner
    }

    /// 等待第0行的锁逐个变为空闲；只观察，不加锁
    fn quiesce(&self) {
        let locks = self.current();
        for lock in locks.row(0) {
            let backoff = Backoff::new();
            while lock.is_locked() {
                backoff.snooze();
            }
        }
    }
}

impl LockStrategy for Refinable {
    type Scope = LockScope;

    fn with_capacity(capacity: usize) -> Self {
        Self {
            locks: RwLock::new(Arc::new(LockArray::new(capacity))),
            owner: OwnerToken::new(),
        }
    }

    fn acquire<T: Element>(&self, x: &T) -> LockScope {
        let me = HolderId::current();
        loop {
            let backoff = Backoff::new();
            while !self.owner.admits(me) {
                backoff.snooze();
            }

            let locks = self.current();
            let scope = locks.lock_element(x);
            // 与扩容者的 CAS + 静默检查配对
            fence(Ordering::SeqCst);
            if self.owner.admits(me) && self.is_live(&locks) {
                return scope;
            }
        }
    }

    fn resize<T: Element>(
        &self,
        handle: &TableHandle<T>,
        observed: usize,
        cause: ResizeCause,
    ) -> Result<(), CuckooError> {
        let thread_id = thread::current().id();
        let _owner = self
            .owner
            .try_claim(HolderId::current())
            .ok_or(CuckooError::ResizeContended)?;
        fence(Ordering::SeqCst);

        let current = handle.capacity();
        if current != observed {
            return Err(CuckooError::StaleResize {
                expected: observed,
                current,
            });
        }

        log_info!("worker {:?} refinable resize from {} ({:?})", thread_id, observed, cause);
        self.quiesce();
        let capacity = handle.grow(observed)?;
        *self.locks.write() = Arc::new(LockArray::new(capacity));
        log_info!("worker {:?} refinable resize done, capacity {}", thread_id, capacity);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "refinable"
    }
}
