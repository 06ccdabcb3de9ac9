//! 扩容所有权令牌 - 持有者标识与标记位打包在一个原子字中
//!
//! 布局: `(holder_id << 1) | mark`，`0` 表示 (无持有者, 未标记)。

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

const MARK: u64 = 1;

static NEXT_HOLDER: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static HOLDER_ID: u64 = NEXT_HOLDER.fetch_add(1, Ordering::Relaxed);
}

/// 线程持有者标识，进程内唯一且非零
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HolderId(u64);

impl HolderId {
    /// 当前线程的标识
    pub fn current() -> Self {
        HOLDER_ID.with(|id| HolderId(*id))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HolderId({})", self.0)
    }
}

/// 单一所有权令牌，只通过 CAS 更新
pub struct OwnerToken {
    state: AtomicU64,
}

impl Default for OwnerToken {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnerToken {
    pub const fn new() -> Self {
        Self {
            state: AtomicU64::new(0),
        }
    }

    /// 读取 (持有者, 标记)
    pub fn load(&self) -> (Option<HolderId>, bool) {
        decode(self.state.load(Ordering::SeqCst))
    }

    /// 令牌未被标记，或标记者正是 `me`
    pub fn admits(&self, me: HolderId) -> bool {
        match self.load() {
            (_, false) => true,
            (holder, true) => holder == Some(me),
        }
    }

    /// 尝试 (无, false) -> (me, true)；成功返回守卫，析构时清空令牌
    pub fn try_claim(&self, me: HolderId) -> Option<OwnerGuard<'_>> {
        self.state
            .compare_exchange(0, (me.0 << 1) | MARK, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| OwnerGuard { token: self })
    }
}

impl fmt::Debug for OwnerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (holder, marked) = self.load();
        f.debug_struct("OwnerToken")
            .field("holder", &holder)
            .field("marked", &marked)
            .finish()
    }
}

fn decode(state: u64) -> (Option<HolderId>, bool) {
    let holder = match state >> 1 {
        0 => None,
        id => Some(HolderId(id)),
    };
    (holder, state & MARK == MARK)
}

/// 扩容所有权守卫；析构是扩容的最后一个动作
pub struct OwnerGuard<'a> {
    token: &'a OwnerToken,
}

impl Drop for OwnerGuard<'_> {
    fn drop(&mut self) {
        self.token.state.store(0, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_claim_and_release() {
        let token = OwnerToken::new();
        let me = HolderId::current();
        assert_eq!(token.load(), (None, false));
        assert!(token.admits(me));

        let guard = token.try_claim(me).expect("first claim wins");
        assert_eq!(token.load(), (Some(me), true));
        assert!(token.admits(me));
        assert!(token.try_claim(me).is_none());

        drop(guard);
        assert_eq!(token.load(), (None, false));
    }

    #[test]
    fn test_other_threads_are_not_admitted() {
        let token = OwnerToken::new();
        let me = HolderId::current();
        let _guard = token.try_claim(me).expect("claim");
        thread::scope(|s| {
            s.spawn(|| {
                let other = HolderId::current();
                assert_ne!(other, me);
                assert!(!token.admits(other));
                assert!(token.try_claim(other).is_none());
            });
        });
    }

    #[test]
    fn test_holder_ids_are_distinct_per_thread() {
        let main = HolderId::current();
        let spawned = thread::spawn(HolderId::current).join().expect("join");
        assert_ne!(main, spawned);
        assert_eq!(main, HolderId::current());
        assert_ne!(main.as_u64(), 0);
    }
}
