//! 双表存储与可整体替换的表句柄

use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    error::CuckooError,
    set::{config::CuckooSetConfig, cuckoo_set::rehash, probe_set::ProbeSet},
    types::{slot_of, Element, NUM_ARRAYS},
};

/// 两张等长数组组成的表，本身不做任何同步
pub struct Table<T> {
    capacity: usize,
    arrays: [Box<[ProbeSet<T>]>; NUM_ARRAYS],
}

impl<T: Element> Table<T> {
    pub fn new(capacity: usize, probe_size: usize) -> Self {
        let row = || {
            (0..capacity)
                .map(|_| ProbeSet::with_capacity(probe_size))
                .collect::<Vec<_>>()
                .into_boxed_slice()
        };
        Self {
            capacity,
            arrays: [row(), row()],
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn cell(&self, array: usize, slot: usize) -> &ProbeSet<T> {
        &self.arrays[array][slot]
    }

    /// 元素在指定数组中的候选单元
    pub fn candidate(&self, array: usize, x: &T) -> (usize, &ProbeSet<T>) {
        let slot = slot_of(array, x, self.capacity);
        (slot, &self.arrays[array][slot])
    }

    pub fn contains(&self, x: &T) -> bool {
        (0..NUM_ARRAYS).any(|array| self.candidate(array, x).1.contains(x))
    }

    /// 元素总数（非原子快照）
    pub fn len(&self) -> usize {
        self.cells().map(ProbeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells().all(ProbeSet::is_empty)
    }

    pub fn cells(&self) -> impl Iterator<Item = &ProbeSet<T>> {
        self.arrays.iter().flat_map(|row| row.iter())
    }

    /// 按数组、槽位顺序复制全部元素
    pub fn elements(&self) -> Vec<T> {
        self.cells().flat_map(ProbeSet::snapshot).collect()
    }
}

/// 当前表的句柄；扩容时整体替换
pub struct TableHandle<T> {
    current: RwLock<Arc<Table<T>>>,
    config: CuckooSetConfig,
}

impl<T: Element> TableHandle<T> {
    pub fn new(config: CuckooSetConfig) -> Self {
        let table = Table::new(config.initial_capacity, config.probe_size);
        Self {
            current: RwLock::new(Arc::new(table)),
            config,
        }
    }

    pub fn config(&self) -> &CuckooSetConfig {
        &self.config
    }

    /// 当前表的快照
    pub fn load(&self) -> Arc<Table<T>> {
        self.current.read().clone()
    }

    pub fn capacity(&self) -> usize {
        self.current.read().capacity()
    }

    /// 将容量从 `observed` 翻倍并重新插入全部元素
    ///
    /// 调用方必须已经排除了其他修改者（屏障或静默）。返回新容量。
    pub fn grow(&self, observed: usize) -> Result<usize, CuckooError> {
        let old = self.load();
        if old.capacity() != observed {
            return Err(CuckooError::StaleResize {
                expected: observed,
                current: old.capacity(),
            });
        }

        let target = observed.saturating_mul(2);
        if target > self.config.max_capacity {
            return Err(CuckooError::TableFull {
                capacity: observed,
                max_capacity: self.config.max_capacity,
            });
        }

        let next = rehash(&old, target, &self.config)?;
        let capacity = next.capacity();
        *self.current.write() = next;
        Ok(capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        let table: Table<u64> = Table::new(8, 4);
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.cells().count(), 16);
        assert!(table.is_empty());
    }

    #[test]
    fn test_candidate_cells() {
        let table: Table<u64> = Table::new(8, 4);
        // hash0(21) = 3, hash1(21) = 10 % 8 = 2
        let (slot0, cell0) = table.candidate(0, &21);
        let (slot1, _) = table.candidate(1, &21);
        assert_eq!((slot0, slot1), (3, 2));
        cell0.push(21);
        assert!(table.contains(&21));
        assert_eq!(table.len(), 1);
        assert_eq!(table.elements(), vec![21]);
    }

    #[test]
    fn test_grow_doubles_and_keeps_elements() {
        let handle: TableHandle<u64> = TableHandle::new(CuckooSetConfig::with_capacity(4));
        {
            let table = handle.load();
            for x in [1u64, 2, 3] {
                table.candidate(0, &x).1.push(x);
            }
        }
        assert_eq!(handle.grow(4), Ok(8));
        let table = handle.load();
        assert_eq!(table.capacity(), 8);
        for x in [1u64, 2, 3] {
            assert!(table.contains(&x));
        }
    }

    #[test]
    fn test_grow_rejects_stale_capacity() {
        let handle: TableHandle<u64> = TableHandle::new(CuckooSetConfig::with_capacity(4));
        assert_eq!(
            handle.grow(2),
            Err(CuckooError::StaleResize { expected: 2, current: 4 })
        );
        assert_eq!(handle.capacity(), 4);
    }

    #[test]
    fn test_grow_respects_max_capacity() {
        let config = CuckooSetConfig::with_capacity(4).max_capacity(4);
        let handle: TableHandle<u64> = TableHandle::new(config);
        assert_eq!(
            handle.grow(4),
            Err(CuckooError::TableFull { capacity: 4, max_capacity: 4 })
        );
    }
}
