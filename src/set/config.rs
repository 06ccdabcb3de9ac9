//! 集合配置

use crate::{
    error::CuckooError,
    types::{PROBE_SIZE, RELOCATE_LIMIT, THRESHOLD},
};

/// 哈希集合配置
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CuckooSetConfig {
    // 每张表的初始槽位数
    pub initial_capacity: usize,
    // 单元最大元素数
    pub probe_size: usize,
    // 低于该值的单元无需重定位
    pub threshold: usize,
    pub relocate_limit: usize,
    // 扩容上限，超过后插入报 TableFull
    pub max_capacity: usize,
}

impl Default for CuckooSetConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 8,
            probe_size: PROBE_SIZE,
            threshold: THRESHOLD,
            relocate_limit: RELOCATE_LIMIT,
            max_capacity: 1 << 16,
        }
    }
}

impl CuckooSetConfig {
    /// 指定初始容量，其余取默认值
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..Self::default()
        }
    }

    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn max_capacity(mut self, capacity: usize) -> Self {
        self.max_capacity = capacity;
        self
    }

    pub fn relocate_limit(mut self, limit: usize) -> Self {
        self.relocate_limit = limit;
        self
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), CuckooError> {
        let reason = if self.initial_capacity == 0 {
            "initial_capacity 必须大于 0".to_string()
        } else if self.probe_size == 0 {
            "probe_size 必须大于 0".to_string()
        } else if self.threshold == 0 || self.threshold > self.probe_size {
            format!(
                "threshold 必须位于 [1, probe_size] 之间 (threshold: {}, probe_size: {})",
                self.threshold, self.probe_size
            )
        } else if self.relocate_limit == 0 {
            "relocate_limit 必须大于 0".to_string()
        } else if self.max_capacity < self.initial_capacity {
            format!(
                "max_capacity 小于 initial_capacity ({} < {})",
                self.max_capacity, self.initial_capacity
            )
        } else {
            return Ok(());
        };
        Err(CuckooError::InvalidConfig { reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CuckooSetConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.probe_size, 4);
        assert_eq!(config.threshold, 2);
        assert_eq!(config.relocate_limit, 100);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let zero = CuckooSetConfig::with_capacity(0);
        assert!(matches!(zero.validate(), Err(CuckooError::InvalidConfig { .. })));

        let threshold = CuckooSetConfig {
            threshold: 5,
            ..CuckooSetConfig::default()
        };
        assert!(threshold.validate().is_err());

        let max = CuckooSetConfig::with_capacity(64).max_capacity(32);
        assert!(max.validate().is_err());

        let limit = CuckooSetConfig::default().relocate_limit(0);
        assert!(limit.validate().is_err());
    }
}
