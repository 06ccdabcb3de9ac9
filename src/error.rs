//! 统一错误处理 - 内部失败类型和恢复逻辑
//!
//! 调用方只看到布尔返回值；这里的错误在集合内部被消化
//! （触发扩容、静默放弃等），唯一会透出的是 `TableFull`。

/// Cuckoo哈希集合内部可能发生的错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CuckooError {
    #[error("重定位超过最大轮次 (轮次: {rounds})")]
    RelocationExhausted { rounds: usize },

    #[error("重定位目标单元已满 (数组: {array}, 槽位: {slot})")]
    RelocationBlocked { array: usize, slot: usize },

    #[error("扩容已过期 (预期容量: {expected}, 当前容量: {current})")]
    StaleResize { expected: usize, current: usize },

    #[error("扩容所有权已被其他线程持有")]
    ResizeContended,

    #[error("表已达到容量上限 (容量: {capacity}, 上限: {max_capacity})")]
    TableFull {
        capacity: usize,
        max_capacity: usize,
    },

    #[error("无效配置: {reason}")]
    InvalidConfig { reason: String },
}

impl CuckooError {
    /// 获取错误恢复建议
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::RelocationExhausted { .. } => Some("扩容后重试"),
            Self::RelocationBlocked { .. } => Some("扩容后重试"),
            Self::StaleResize { .. } => Some("其他线程已完成扩容，直接重试操作"),
            Self::ResizeContended => Some("等待当前扩容完成后重试"),
            Self::TableFull { .. } => Some("增大 max_capacity 或分散元素哈希"),
            Self::InvalidConfig { .. } => Some("检查配置参数"),
        }
    }

    /// 判断错误是否可在内部恢复
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::TableFull { .. } | Self::InvalidConfig { .. })
    }

    /// 是否应当触发扩容
    pub fn should_resize(&self) -> bool {
        matches!(
            self,
            Self::RelocationExhausted { .. } | Self::RelocationBlocked { .. }
        )
    }

    /// 是否为扩容竞争失败（静默忽略）
    pub fn is_lost_race(&self) -> bool {
        matches!(self, Self::StaleResize { .. } | Self::ResizeContended)
    }
}
