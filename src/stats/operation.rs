// src/stats/operation.rs
//! 操作统计 - 跟踪集合操作次数与失败次数

use std::{
    fmt::Write,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::types::OperationType;

const OP_COUNT: usize = OperationType::ALL.len();

/// 操作统计接口
pub trait OperationRecorder: Send + Sync {
    /// 记录一次操作；`success == false` 表示重复、未找到、重定位失败或扩容竞争失败
    fn record(&self, op_type: OperationType, success: bool);

    /// 获取操作统计快照
    fn snapshot(&self) -> OperationStatsSnapshot;

    /// 重置统计
    fn reset(&self);

    /// 导出Prometheus格式指标
    fn export_prometheus(&self) -> String;
}

/// 操作统计快照
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationStatsSnapshot {
    totals: [u64; OP_COUNT],
    failures: [u64; OP_COUNT],
}

impl OperationStatsSnapshot {
    /// 操作总次数
    pub fn total(&self, op: OperationType) -> u64 {
        self.totals[op as usize]
    }

    /// 失败次数
    pub fn failed(&self, op: OperationType) -> u64 {
        self.failures[op as usize]
    }

    /// 成功次数
    pub fn succeeded(&self, op: OperationType) -> u64 {
        self.total(op) - self.failed(op)
    }
}

/// 原子操作统计
#[derive(Debug, Default)]
pub struct AtomicOperationStats {
    totals: [AtomicU64; OP_COUNT],
    failures: [AtomicU64; OP_COUNT],
}

impl AtomicOperationStats {
    /// 创建新统计
    pub fn new() -> Self {
        Self::default()
    }
}

impl OperationRecorder for AtomicOperationStats {
    fn record(&self, op_type: OperationType, success: bool) {
        let index = op_type as usize;
        self.totals[index].fetch_add(1, Ordering::Relaxed);
        if !success {
            self.failures[index].fetch_add(1, Ordering::Relaxed);
        }
    }

    fn snapshot(&self) -> OperationStatsSnapshot {
        OperationStatsSnapshot {
            totals: std::array::from_fn(|i| self.totals[i].load(Ordering::Relaxed)),
            failures: std::array::from_fn(|i| self.failures[i].load(Ordering::Relaxed)),
        }
    }

    fn reset(&self) {
        for counter in self.totals.iter().chain(self.failures.iter()) {
            counter.store(0, Ordering::Relaxed);
        }
    }

    fn export_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        let mut output = String::new();

        for op in OperationType::ALL {
            let name = op.as_str();
            let _ = writeln!(output, "# HELP cuckoo_operation_{}_count Total {} operations", name, name);
            let _ = writeln!(output, "# TYPE cuckoo_operation_{}_count counter", name);
            let _ = writeln!(output, "cuckoo_operation_{}_count {}", name, snapshot.total(op));
            let _ = writeln!(output, "# HELP cuckoo_operation_{}_failed Unsuccessful {} operations", name, name);
            let _ = writeln!(output, "# TYPE cuckoo_operation_{}_failed counter", name);
            let _ = writeln!(output, "cuckoo_operation_{}_failed {}", name, snapshot.failed(op));
        }

        output
    }
}

/// 禁用操作统计实现
#[derive(Debug, Default)]
pub struct DisabledOperationRecorder;

impl OperationRecorder for DisabledOperationRecorder {
    fn record(&self, _op_type: OperationType, _success: bool) {}
    fn snapshot(&self) -> OperationStatsSnapshot {
        OperationStatsSnapshot::default()
    }
    fn reset(&self) {}
    fn export_prometheus(&self) -> String {
        String::new()
    }
}
