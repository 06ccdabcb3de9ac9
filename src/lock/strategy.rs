//! 锁策略接口 - 核心算法通过它获取锁作用域并触发扩容

use crate::{
    error::CuckooError,
    set::table::TableHandle,
    types::{Element, ResizeCause},
};

/// 锁策略特征
///
/// `acquire` 返回的作用域在析构时释放锁，因此任何退出路径
/// （包括提前返回和 panic）都会释放锁。
pub trait LockStrategy: Send + Sync + Sized {
    /// 覆盖一个元素两个候选单元的锁作用域
    type Scope;

    /// 按表的初始容量创建策略
    fn with_capacity(capacity: usize) -> Self;

    /// 锁住元素在两张表中的候选单元
    fn acquire<T: Element>(&self, x: &T) -> Self::Scope;

    /// 将表从 `observed` 容量扩容
    ///
    /// 竞争失败时返回 `StaleResize` 或 `ResizeContended`，由调用方静默忽略。
    fn resize<T: Element>(
        &self,
        handle: &TableHandle<T>,
        observed: usize,
        cause: ResizeCause,
    ) -> Result<(), CuckooError>;

    /// 策略名称
    fn name(&self) -> &'static str;
}
