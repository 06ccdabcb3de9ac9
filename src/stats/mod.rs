//! 统计模块 - 集合操作指标

pub mod operation;

use std::sync::Arc;

pub use operation::{
    AtomicOperationStats, DisabledOperationRecorder, OperationRecorder, OperationStatsSnapshot,
};

/// 默认记录器
pub fn default_recorder() -> Arc<dyn OperationRecorder> {
    Arc::new(AtomicOperationStats::new())
}

/// 不记录任何指标的记录器
pub fn disabled_recorder() -> Arc<dyn OperationRecorder> {
    Arc::new(DisabledOperationRecorder)
}
