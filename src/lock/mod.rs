//! 锁策略模块 - 锁分段、可细化锁以及扩容内部使用的独占策略

pub mod exclusive;
pub mod lock_array;
pub mod owner;
pub mod refinable;
pub mod strategy;
pub mod striped;

pub use exclusive::Exclusive;
pub use lock_array::{LockArray, LockScope};
pub use owner::{HolderId, OwnerToken};
pub use refinable::Refinable;
pub use strategy::LockStrategy;
pub use striped::Striped;
