//! Cuckoo哈希集合核心实现
//!
//! 核心算法对锁策略泛型：`acquire` 提供覆盖元素两个候选单元的锁作用域，
//! `resize` 负责在安全点替换整张表。算法本身只读写 [`Table`]。

use std::{
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
};

use crate::{
    error::CuckooError,
    lock::{Exclusive, LockStrategy, Striped},
    set::{
        config::CuckooSetConfig,
        table::{Table, TableHandle},
        DEFAULT_CONFIG,
    },
    stats::{default_recorder, disabled_recorder, OperationRecorder, OperationStatsSnapshot},
    types::{other_array, Element, OperationType, ResizeCause, NUM_ARRAYS},
};

/// 插入一次尝试的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// 元素已存在
    Duplicate,
    /// 放入低于阈值的单元
    Settled,
    /// 放入阈值以上的单元，需要重定位
    Provisional { array: usize, slot: usize },
    /// 两个候选单元均已满
    Full,
}

/// 并发Cuckoo哈希集合
pub struct CuckooSet<T: Element, S: LockStrategy = Striped> {
    handle: TableHandle<T>,
    strategy: S,
    len: AtomicUsize,
    recorder: Arc<dyn OperationRecorder>,
}

impl<T: Element, S: LockStrategy> CuckooSet<T, S> {
    /// 创建每张表 `initial_capacity` 个槽位的空集合（0 视为 1）
    pub fn new(initial_capacity: usize) -> Self {
        let config = DEFAULT_CONFIG.clone().initial_capacity(initial_capacity.max(1));
        Self::build(config, default_recorder())
    }

    /// 按配置创建集合
    pub fn with_config(config: CuckooSetConfig) -> Result<Self, CuckooError> {
        Self::with_recorder(config, default_recorder())
    }

    /// 按配置创建集合，并指定统计记录器
    pub fn with_recorder(
        config: CuckooSetConfig,
        recorder: Arc<dyn OperationRecorder>,
    ) -> Result<Self, CuckooError> {
        config.validate()?;
        Ok(Self::build(config, recorder))
    }

    fn build(config: CuckooSetConfig, recorder: Arc<dyn OperationRecorder>) -> Self {
        Self {
            strategy: S::with_capacity(config.initial_capacity),
            handle: TableHandle::new(config),
            len: AtomicUsize::new(0),
            recorder,
        }
    }

    pub fn config(&self) -> &CuckooSetConfig {
        self.handle.config()
    }

    /// 当前每张表的槽位数
    pub fn capacity(&self) -> usize {
        self.handle.capacity()
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 元素数 / 全部单元的最大容纳量
    pub fn load_factor(&self) -> f32 {
        let slots = self.capacity() * NUM_ARRAYS * self.config().probe_size;
        self.len() as f32 / slots as f32
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn stats(&self) -> OperationStatsSnapshot {
        self.recorder.snapshot()
    }

    pub fn export_prometheus(&self) -> String {
        self.recorder.export_prometheus()
    }

    /// 当前表中全部元素的快照；仅在没有并发修改时精确
    pub fn elements(&self) -> Vec<T> {
        self.handle.load().elements()
    }

    /// 成员查询
    pub fn contains(&self, x: &T) -> bool {
        let found = {
            let _scope = self.strategy.acquire(x);
            self.handle.load().contains(x)
        };
        self.recorder.record(OperationType::Contains, found);
        found
    }

    /// `contains` 的别名
    pub fn present(&self, x: &T) -> bool {
        self.contains(x)
    }

    /// 插入元素；已存在返回 false
    ///
    /// 只有表需要增长到 `max_capacity` 之外时才会因 `TableFull`
    /// 返回 false，需要区分时使用 [`CuckooSet::try_add`]。
    pub fn add(&self, x: T) -> bool {
        match self.try_add(x) {
            Ok(added) => added,
            Err(err) => {
                log_error!(
                    "worker {:?} add failed: {} ({:?})",
                    thread::current().id(),
                    err,
                    err.recovery_suggestion()
                );
                false
            }
        }
    }

    /// 插入元素，报告无法恢复的错误
    pub fn try_add(&self, x: T) -> Result<bool, CuckooError> {
        loop {
            let (placement, observed) = {
                let _scope = self.strategy.acquire(&x);
                let table = self.handle.load();
                (self.place(&table, &x), table.capacity())
            };

            match placement {
                Placement::Duplicate => {
                    self.recorder.record(OperationType::Add, false);
                    return Ok(false);
                }
                Placement::Settled => {
                    self.len.fetch_add(1, Ordering::AcqRel);
                    self.recorder.record(OperationType::Add, true);
                    return Ok(true);
                }
                Placement::Provisional { array, slot } => {
                    self.len.fetch_add(1, Ordering::AcqRel);
                    self.recorder.record(OperationType::Add, true);
                    // 锁作用域已释放后才重定位
                    match self.relocate(array, slot, observed) {
                        Err(err) if err.should_resize() => {
                            log_debug!(
                                "worker {:?} relocation from ({}, {}) failed: {}",
                                thread::current().id(),
                                array,
                                slot,
                                err
                            );
                            if let Err(err) = self.resize(observed, ResizeCause::RelocationFailed) {
                                // 元素已经放入单元，只是没有腾出空间
                                log_warn!(
                                    "worker {:?} resize after relocation failure: {}",
                                    thread::current().id(),
                                    err
                                );
                            }
                        }
                        _ => {}
                    }
                    return Ok(true);
                }
                Placement::Full => match self.resize(observed, ResizeCause::CellsFull) {
                    Err(err) if !err.is_recoverable() => return Err(err),
                    _ => {}
                },
            }
        }
    }

    /// 删除元素，返回是否存在
    pub fn remove(&self, x: &T) -> bool {
        let removed = {
            let _scope = self.strategy.acquire(x);
            let table = self.handle.load();
            (0..NUM_ARRAYS).any(|array| table.candidate(array, x).1.remove(x))
        };
        if removed {
            self.len.fetch_sub(1, Ordering::AcqRel);
        }
        self.recorder.record(OperationType::Remove, removed);
        removed
    }

    /// 在已持有的锁作用域内决定元素的落点
    fn place(&self, table: &Table<T>, x: &T) -> Placement {
        if table.contains(x) {
            return Placement::Duplicate;
        }

        let config = self.config();
        let (slot0, cell0) = table.candidate(0, x);
        let (slot1, cell1) = table.candidate(1, x);
        let (size0, size1) = (cell0.len(), cell1.len());

        if size0 < config.threshold {
            cell0.push(x.clone());
            Placement::Settled
        } else if size1 < config.threshold {
            cell1.push(x.clone());
            Placement::Settled
        } else if size0 < config.probe_size {
            cell0.push(x.clone());
            Placement::Provisional { array: 0, slot: slot0 }
        } else if size1 < config.probe_size {
            cell1.push(x.clone());
            Placement::Provisional { array: 1, slot: slot1 }
        } else {
            Placement::Full
        }
    }

    /// 把 `table[array][slot]` 中的元素逐个移到另一张表，直到源单元低于阈值
    ///
    /// 每轮只持有一个元素的锁作用域；轮次耗尽或目标单元已满时返回错误，
    /// 由调用方扩容。期间若表已被替换，视为完成。
    fn relocate(&self, array: usize, slot: usize, observed: usize) -> Result<(), CuckooError> {
        let config = self.config();
        let (mut i, mut hi) = (array, slot);

        for _ in 0..config.relocate_limit {
            let y = match self.handle.load().cell(i, hi).first() {
                Some(y) => y,
                None => return self.relocated(Ok(())),
            };
            let j = other_array(i);

            let _scope = self.strategy.acquire(&y);
            let table = self.handle.load();
            if table.capacity() != observed {
                return self.relocated(Ok(()));
            }

            let source = table.cell(i, hi);
            if !source.remove(&y) {
                // y 已被并发删除
                if source.len() < config.threshold {
                    return self.relocated(Ok(()));
                }
                continue;
            }

            let (hj, destination) = table.candidate(j, &y);
            let size = destination.len();
            if size < config.threshold {
                destination.push(y);
                return self.relocated(Ok(()));
            } else if size < config.probe_size {
                destination.push(y);
                i = j;
                hi = hj;
            } else {
                source.push(y);
                return self.relocated(Err(CuckooError::RelocationBlocked { array: j, slot: hj }));
            }
        }

        self.relocated(Err(CuckooError::RelocationExhausted {
            rounds: config.relocate_limit,
        }))
    }

    fn relocated(&self, result: Result<(), CuckooError>) -> Result<(), CuckooError> {
        self.recorder.record(OperationType::Relocate, result.is_ok());
        result
    }

    /// 请求扩容；竞争失败视为成功
    fn resize(&self, observed: usize, cause: ResizeCause) -> Result<(), CuckooError> {
        match self.strategy.resize(&self.handle, observed, cause) {
            Ok(()) => {
                self.recorder.record(OperationType::Resize, true);
                Ok(())
            }
            Err(err) if err.is_lost_race() => {
                log_debug!(
                    "worker {:?} {} resize skipped: {}",
                    thread::current().id(),
                    self.strategy.name(),
                    err
                );
                self.recorder.record(OperationType::Resize, false);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

impl<T: Element, S: LockStrategy> fmt::Debug for CuckooSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CuckooSet")
            .field("strategy", &self.strategy.name())
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("load_factor", &self.load_factor())
            .finish()
    }
}

/// 把旧表的全部元素通过正常插入路径放入容量为 `capacity` 的新表
///
/// 调用方已独占旧表；新表只被当前线程访问，因此使用独占策略。
pub(crate) fn rehash<T: Element>(
    old: &Table<T>,
    capacity: usize,
    config: &CuckooSetConfig,
) -> Result<Arc<Table<T>>, CuckooError> {
    let fresh: CuckooSet<T, Exclusive> =
        CuckooSet::build(config.clone().initial_capacity(capacity), disabled_recorder());
    for x in old.elements() {
        fresh.try_add(x)?;
    }
    Ok(fresh.handle.load())
}
