//! 锁数组 - 与表同形的两行锁

use std::sync::Arc;

use parking_lot::{lock_api::ArcMutexGuard, Mutex, RawMutex};

use crate::types::{slot_of, Element, NUM_ARRAYS};

/// 单个槽位锁
pub type SlotLock = Arc<Mutex<()>>;

pub struct LockArray {
    capacity: usize,
    rows: [Box<[SlotLock]>; NUM_ARRAYS],
}

/// 元素的锁作用域，析构时解锁两把锁
#[must_use = "锁作用域被丢弃时立即释放"]
pub struct LockScope {
    _guards: [ArcMutexGuard<RawMutex, ()>; NUM_ARRAYS],
}

impl LockArray {
    pub fn new(capacity: usize) -> Self {
        let row = || {
            (0..capacity)
                .map(|_| Arc::new(Mutex::new(())))
                .collect::<Vec<_>>()
                .into_boxed_slice()
        };
        Self {
            capacity,
            rows: [row(), row()],
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn row(&self, array: usize) -> &[SlotLock] {
        &self.rows[array]
    }

    /// 先锁第0行再锁第1行，全局一致的顺序避免循环等待
    pub fn lock_element<T: Element>(&self, x: &T) -> LockScope {
        let first = self.rows[0][slot_of(0, x, self.capacity)].lock_arc();
        let second = self.rows[1][slot_of(1, x, self.capacity)].lock_arc();
        LockScope {
            _guards: [first, second],
        }
    }

    /// 某一行此刻是否没有任何锁被持有
    pub fn is_row_unlocked(&self, array: usize) -> bool {
        self.rows[array].iter().all(|lock| !lock.is_locked())
    }
}
