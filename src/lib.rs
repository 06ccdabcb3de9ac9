//! Rust并发Cuckoo哈希集合库
//!
//! 基于两张表的Cuckoo哈希，每个槽位是一个有界的探测单元。提供两种细粒度锁策略：
//!
//! - **锁分段** ([`Striped`])：扩容时持有第0行全部锁作为全局屏障
//! - **可细化锁** ([`Refinable`])：CAS 所有权令牌 + 静默等待，扩容期间其他线程只自旋
//!
//! ## 快速开始
//!
//! ```rust
//! use cuckoo_hashset::*;
//!
//! let set: StripedCuckooSet<u64> = CuckooSet::new(8);
//! assert!(set.add(42));
//! assert!(!set.add(42));
//! assert!(set.contains(&42));
//! assert!(set.remove(&42));
//! assert!(!set.contains(&42));
//! ```

#![warn(clippy::all)]

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

// 关闭日志时参数只做类型检查，不求值
#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if false {
            ::std::mem::drop(format_args!($($arg)*));
        }
    };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if false {
            ::std::mem::drop(format_args!($($arg)*));
        }
    };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if false {
            ::std::mem::drop(format_args!($($arg)*));
        }
    };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if false {
            ::std::mem::drop(format_args!($($arg)*));
        }
    };
}

// 核心模块导出
pub mod error;
pub mod lock;
pub mod set;
pub mod stats;
pub mod types;

// 公共接口导出
pub use crate::{
    error::CuckooError,
    lock::{LockStrategy, Refinable, Striped},
    set::{CuckooSet, CuckooSetConfig, DEFAULT_CONFIG},
    stats::{AtomicOperationStats, OperationRecorder, OperationStatsSnapshot},
    types::{hash0, hash1, ByteKey, Element, OperationType, PROBE_SIZE, RELOCATE_LIMIT, THRESHOLD},
};

/// 锁分段策略的集合
pub type StripedCuckooSet<T> = CuckooSet<T, Striped>;

/// 可细化锁策略的集合
pub type RefinableCuckooSet<T> = CuckooSet<T, Refinable>;

/// 批量插入，返回新插入的元素数
pub fn batch_add<T: Element, S: LockStrategy>(
    set: &CuckooSet<T, S>,
    items: impl IntoIterator<Item = T>,
) -> usize {
    items.into_iter().map(|x| set.add(x)).filter(|&added| added).count()
}

/// 批量查询
pub fn batch_contains<'a, T: Element, S: LockStrategy>(
    set: &CuckooSet<T, S>,
    items: impl IntoIterator<Item = &'a T>,
) -> Vec<bool> {
    items.into_iter().map(|x| set.contains(x)).collect()
}

#[cfg(test)]
mod tests {
    use std::thread;

    #[test]
    fn test_log_macros_consume_arguments() {
        let worker = thread::current().id();
        let capacity = 16usize;
        let err = crate::CuckooError::ResizeContended;
        log_debug!("worker {:?} capacity {}", worker, capacity);
        log_info!("worker {:?} resize done", worker);
        log_warn!("resize failed: {}", err);
        log_error!("add failed: {} ({:?})", err, err.recovery_suggestion());
    }
}
