//! 不关中断的自旋锁
//!
//! 与 [`crate::RawSpinLock`] 相同的原子标志位，但不保存/恢复中断状态，
//! 因此持锁期间可以执行阻塞的总线传输。

use core::{
    hint,
    sync::atomic::{AtomicBool, Ordering},
};

/// 不关中断的原始自旋锁
#[derive(Debug)]
pub struct RawSpinLockWithoutGuard {
    lock: AtomicBool,
}

impl RawSpinLockWithoutGuard {
    /// 创建一个新的实例。
    pub const fn new() -> Self {
        Self {
            lock: AtomicBool::new(false),
        }
    }
}

impl Default for RawSpinLockWithoutGuard {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl lock_api::RawMutex for RawSpinLockWithoutGuard {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = RawSpinLockWithoutGuard::new();

    type GuardMarker = lock_api::GuardSend;

    fn lock(&self) {
        while self
            .lock
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            while self.lock.load(Ordering::Relaxed) {
                hint::spin_loop();
            }
        }
    }

    fn try_lock(&self) -> bool {
        self.lock
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    unsafe fn unlock(&self) {
        self.lock.store(false, Ordering::Release);
    }

    fn is_locked(&self) -> bool {
        self.lock.load(Ordering::Relaxed)
    }
}

/// 互斥锁，临界区内允许执行总线 I/O 等较长的操作。
///
/// 不是可重入的；持锁期间再次 `lock()` 会死锁。
pub type Mutex<T> = lock_api::Mutex<RawSpinLockWithoutGuard, T>;

/// [`Mutex`] 的 RAII 保护器
pub type MutexGuard<'a, T> = lock_api::MutexGuard<'a, RawSpinLockWithoutGuard, T>;

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::vec::Vec;

    #[test]
    fn test_try_lock_fails_while_held() {
        let lock = Mutex::new(());
        let guard = lock.lock();
        assert!(lock.is_locked());
        assert!(lock.try_lock().is_none());
        drop(guard);
        assert!(lock.try_lock().is_some());
    }

    #[test]
    fn test_concurrent_increments_are_serialized() {
        let counter = Arc::new(Mutex::new(0usize));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = counter.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        *counter.lock() += 1;
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*counter.lock(), 4000);
    }
}
