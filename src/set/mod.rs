//! 集合核心模块 - 单元、双表以及对锁策略泛型的Cuckoo算法

pub mod config;
pub mod cuckoo_set;
pub mod probe_set;
pub mod table;

pub use config::CuckooSetConfig;
pub use cuckoo_set::CuckooSet;
pub use probe_set::ProbeSet;
pub use table::{Table, TableHandle};

use once_cell::sync::Lazy;

/// 全局默认配置
pub static DEFAULT_CONFIG: Lazy<CuckooSetConfig> = Lazy::new(CuckooSetConfig::default);
