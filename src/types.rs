//! 核心类型定义 - 元素特征、哈希投影与共享常量

use std::{
    fmt::{self, Debug, Display},
    hash::Hash,
};

use once_cell::sync::Lazy;

/// 哈希表数组数量（经典Cuckoo哈希使用两张表）
pub const NUM_ARRAYS: usize = 2;

/// 单元最大元素数，超过则必须扩容
pub const PROBE_SIZE: usize = 4;

/// 软阈值：低于阈值的单元无条件接受插入
pub const THRESHOLD: usize = 2;

/// 单次重定位最大轮次
pub const RELOCATE_LIMIT: usize = 100;

/// 哈希投影的取值范围，与容量无关
pub const HASH_RANGE: u64 = 8;

const HASH0_MODULUS: u64 = 9;
const HASH1_MODULUS: u64 = 11;

/// 字符串/字节元素使用固定种子，保证跨线程、跨进程一致
static KEY_HASHER: Lazy<ahash::RandomState> = Lazy::new(|| {
    ahash::RandomState::with_seeds(
        0x243f_6a88_85a3_08d3,
        0x1319_8a2e_0370_7344,
        0xa409_3822_299f_31d0,
        0x082e_fa98_ec4e_6c89,
    )
});

/// 集合元素特征
///
/// 元素只通过 `hash_key` 派生出的两个投影以及相等比较被使用。
/// 同一元素在其生命周期内必须返回相同的 `hash_key`。
pub trait Element: Clone + Eq + Debug + Send + Sync + 'static {
    /// 计算元素的稳定哈希值
    fn hash_key(&self) -> u64;
}

macro_rules! impl_unsigned_element {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                fn hash_key(&self) -> u64 {
                    *self as u64
                }
            }
        )*
    };
}

macro_rules! impl_signed_element {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                fn hash_key(&self) -> u64 {
                    (*self as i64).unsigned_abs()
                }
            }
        )*
    };
}

impl_unsigned_element!(u8, u16, u32, u64, usize);
impl_signed_element!(i8, i16, i32, i64, isize);

impl Element for String {
    fn hash_key(&self) -> u64 {
        hash_bytes(self.as_bytes())
    }
}

impl Element for &'static str {
    fn hash_key(&self) -> u64 {
        hash_bytes(self.as_bytes())
    }
}

/// 字节键 - 用于测试与基准的通用元素类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteKey(pub Vec<u8>);

impl Element for ByteKey {
    fn hash_key(&self) -> u64 {
        hash_bytes(&self.0)
    }
}

impl Display for ByteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) => write!(f, "ByteKey({})", s),
            Err(_) => write!(f, "ByteKey({:?})", self.0),
        }
    }
}

/// 对任意可哈希值计算固定种子哈希
pub fn hash_bytes<B: Hash + ?Sized>(bytes: &B) -> u64 {
    KEY_HASHER.hash_one(bytes)
}

/// 第0张表的哈希投影，取值范围 [0, 7]
#[inline]
pub fn hash0<T: Element>(x: &T) -> usize {
    ((x.hash_key() % HASH0_MODULUS) % HASH_RANGE) as usize
}

/// 第1张表的哈希投影，取值范围 [0, 7]
#[inline]
pub fn hash1<T: Element>(x: &T) -> usize {
    ((x.hash_key() % HASH1_MODULUS) % HASH_RANGE) as usize
}

/// 元素在指定数组中的哈希投影
#[inline]
pub fn hash_in<T: Element>(array: usize, x: &T) -> usize {
    match array {
        0 => hash0(x),
        _ => hash1(x),
    }
}

/// 元素在指定数组、指定容量下的槽位
#[inline]
pub fn slot_of<T: Element>(array: usize, x: &T, capacity: usize) -> usize {
    hash_in(array, x) % capacity
}

/// 另一张表的下标
#[inline]
pub const fn other_array(array: usize) -> usize {
    1 - array
}

/// 操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    /// 插入操作
    Add,
    /// 删除操作
    Remove,
    /// 成员查询
    Contains,
    /// 重定位
    Relocate,
    /// 扩容
    Resize,
}

impl OperationType {
    pub const ALL: [OperationType; 5] = [
        OperationType::Add,
        OperationType::Remove,
        OperationType::Contains,
        OperationType::Relocate,
        OperationType::Resize,
    ];

    /// 判断是否为读操作
    pub fn is_read(&self) -> bool {
        matches!(self, OperationType::Contains)
    }

    /// 判断是否为写操作
    pub fn is_write(&self) -> bool {
        !self.is_read()
    }

    /// 转换为字符串表示
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Add => "add",
            OperationType::Remove => "remove",
            OperationType::Contains => "contains",
            OperationType::Relocate => "relocate",
            OperationType::Resize => "resize",
        }
    }
}

/// 触发扩容的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeCause {
    /// 重定位失败，元素已临时放入单元
    RelocationFailed,
    /// 两个候选单元均已满，元素尚未插入
    CellsFull,
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_projections_stay_in_range() {
        for x in 0u64..10_000 {
            assert!(hash0(&x) < HASH_RANGE as usize);
            assert!(hash1(&x) < HASH_RANGE as usize);
        }
    }

    #[test]
    fn test_hash_projection_values() {
        // (x % 9) % 8 与 (x % 11) % 8
        assert_eq!(hash0(&3u64), 3);
        assert_eq!(hash1(&3u64), 3);
        assert_eq!(hash0(&8u64), 0);
        assert_eq!(hash1(&8u64), 0);
        assert_eq!(hash0(&104u64), 5);
        assert_eq!(hash1(&104u64), 5);
        assert_eq!(hash1(&10u64), 2);
    }

    #[test]
    fn test_slot_of_reduces_by_capacity() {
        // hash0(7) = 7
        assert_eq!(slot_of(0, &7u64, 8), 7);
        assert_eq!(slot_of(0, &7u64, 4), 3);
        assert_eq!(slot_of(0, &7u64, 32), 7);
        assert_eq!(other_array(0), 1);
        assert_eq!(other_array(1), 0);
    }

    #[test]
    fn test_signed_elements_hash_by_magnitude() {
        assert_eq!((-5i32).hash_key(), 5);
        assert_eq!(i64::MIN.hash_key(), 1u64 << 63);
    }

    #[test]
    fn test_byte_hash_is_deterministic() {
        let a = ByteKey(b"feature:42".to_vec());
        let b = ByteKey(b"feature:42".to_vec());
        assert_eq!(a.hash_key(), b.hash_key());
        assert_eq!(String::from("abc").hash_key(), "abc".hash_key());
        assert_eq!(format!("{}", a), "ByteKey(feature:42)");
    }

    #[test]
    fn test_operation_type_names() {
        let names: Vec<_> = OperationType::ALL.iter().map(|op| op.as_str()).collect();
        assert_eq!(names, vec!["add", "remove", "contains", "relocate", "resize"]);
        assert!(OperationType::Contains.is_read());
        assert!(OperationType::Resize.is_write());
    }
}
