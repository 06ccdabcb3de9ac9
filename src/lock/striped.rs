//! 锁分段策略
//!
//! 锁数组与表同形。`acquire` 总是先锁第0行再锁第1行，因此持有
//! 第0行全部锁即可挡住所有新的获取，扩容以此作为全局屏障。
//! 扩容会重建锁数组，等待旧锁的线程醒来后发现锁数组已更换，
//! 释放旧锁并重试。

use std::{sync::Arc, thread};

use parking_lot::RwLock;

use crate::{
    error::CuckooError,
    lock::{
        lock_array::{LockArray, LockScope},
        strategy::LockStrategy,
    },
    set::table::TableHandle,
    types::{Element, ResizeCause},
};

pub struct Striped {
    locks: RwLock<Arc<LockArray>>,
}

impl Striped {
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
}

impl LockStrategy for Striped {
    type Scope = LockScope;

    fn with_capacity(capacity: usize) -> Self {
        Self {
            locks: RwLock::new(Arc::new(LockArray::new(capacity))),
        }
    }

    fn acquire<T: Element>(&self, x: &T) -> LockScope {
        loop {
            let locks = self.current();
            let scope = locks.lock_element(x);
            if self.is_live(&locks) {
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
        let locks = self.current();

        // 按升序持有第0行全部锁
        let _barrier: Vec<_> = locks.row(0).iter().map(|lock| lock.lock()).collect();

        if !self.is_live(&locks) {
            return Err(CuckooError::StaleResize {
                expected: observed,
                current: handle.capacity(),
            });
        }

        log_info!("worker {:?} striped resize from {} ({:?})", thread_id, observed, cause);
        let capacity = handle.grow(observed)?;
        *self.locks.write() = Arc::new(LockArray::new(capacity));
        log_info!("worker {:?} striped resize done, capacity {}", thread_id, capacity);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "striped"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set::config::CuckooSetConfig;
    use std::{
        sync::atomic::{AtomicBool, Ordering},
        time::Duration,
    };

    #[test]
    fn test_resize_rebuilds_locks() {
        let striped = Striped::with_capacity(4);
        let handle: TableHandle<u64> = TableHandle::new(CuckooSetConfig::with_capacity(4));
        striped.resize(&handle, 4, ResizeCause::CellsFull).expect("resize");
        assert_eq!(handle.capacity(), 8);
        assert_eq!(striped.lock_capacity(), 8);
    }

    #[test]
    fn test_latecomer_resize_is_stale() {
        let striped = Striped::with_capacity(4);
        let handle: TableHandle<u64> = TableHandle::new(CuckooSetConfig::with_capacity(4));
        striped.resize(&handle, 4, ResizeCause::CellsFull).expect("resize");
        let late = striped.resize(&handle, 4, ResizeCause::CellsFull);
        assert!(matches!(late, Err(CuckooError::StaleResize { expected: 4, .. })));
        assert_eq!(handle.capacity(), 8);
    }

    #[test]
    fn test_resize_waits_for_held_scope() {
        let striped = Striped::with_capacity(4);
        let handle: TableHandle<u64> = TableHandle::new(CuckooSetConfig::with_capacity(4));
        let resized = AtomicBool::new(false);

        thread::scope(|s| {
            let scope = striped.acquire(&1u64);
            s.spawn(|| {
                striped.resize(&handle, 4, ResizeCause::CellsFull).expect("resize");
                resized.store(true, Ordering::SeqCst);
            });
            thread::sleep(Duration::from_millis(50));
            assert!(!resized.load(Ordering::SeqCst));
            drop(scope);
        });

        assert!(resized.load(Ordering::SeqCst));
        assert_eq!(handle.capacity(), 8);
    }
}
