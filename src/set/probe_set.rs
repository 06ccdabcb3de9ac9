// src/set/probe_set.rs
//! 探测单元 - 同一槽位上的有界元素集合
//!
//! 单元内部的互斥锁只负责内存安全；操作的原子性由锁策略的
//! 锁作用域保证，因此在正常路径上这把锁不会发生争用。

use std::fmt;

use parking_lot::Mutex;

use crate::types::Element;

#[repr(align(64))]
pub struct ProbeSet<T> {
    items: Mutex<Vec<T>>,
}

impl<T: Element> fmt::Debug for ProbeSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProbeSet(len: {})", self.len())
    }
}

impl<T: Element> ProbeSet<T> {
    pub fn with_capacity(probe_size: usize) -> Self {
        Self {
            items: Mutex::new(Vec::with_capacity(probe_size)),
        }
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn contains(&self, x: &T) -> bool {
        self.items.lock().iter().any(|y| y == x)
    }

    /// 追加元素，调用方负责容量检查
    pub fn push(&self, x: T) {
        self.items.lock().push(x);
    }

    /// 移除元素，返回是否存在
    pub fn remove(&self, x: &T) -> bool {
        let mut items = self.items.lock();
        match items.iter().position(|y| y == x) {
            Some(index) => {
                items.remove(index);
                true
            }
            None => false,
        }
    }

    /// 单元中的第一个元素（重定位的候选）
    pub fn first(&self) -> Option<T> {
        self.items.lock().first().cloned()
    }

    /// 复制单元内全部元素
    pub fn snapshot(&self) -> Vec<T> {
        self.items.lock().clone()
    }
}
