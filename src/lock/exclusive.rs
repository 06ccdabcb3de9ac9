//! 独占策略 - 用于扩容时的重新插入
//!
//! 扩容者在屏障或静默之后独占新表，无需任何锁。重定位失败时
//! 元素已临时放入单元，保持原状；只有两个候选单元都满时才继续扩容。

use crate::{
    error::CuckooError,
    lock::strategy::LockStrategy,
    set::table::TableHandle,
    types::{Element, ResizeCause},
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Exclusive;

impl LockStrategy for Exclusive {
    type Scope = ();

    fn with_capacity(_capacity: usize) -> Self {
        Exclusive
    }

    fn acquire<T: Element>(&self, _x: &T) -> Self::Scope {}

    fn resize<T: Element>(
        &self,
        handle: &TableHandle<T>,
        observed: usize,
        cause: ResizeCause,
    ) -> Result<(), CuckooError> {
        match cause {
            ResizeCause::RelocationFailed => Ok(()),
            ResizeCause::CellsFull => handle.grow(observed).map(|_| ()),
        }
    }

    fn name(&self) -> &'static str {
        "exclusive"
    }
}
