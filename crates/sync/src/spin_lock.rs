//! 自旋锁封装
//!
//! 提供对数据的互斥访问的自旋锁类型。

use crate::raw_spin_lock::RawSpinLock;

/// 提供对数据的互斥访问的关中断自旋锁。
///
/// # 示例
/// ```ignore
/// let lock = SpinLock::new(0);
/// {
///     let mut guard = lock.lock(); // 获取锁，禁用中断
///     *guard += 1; // 访问和修改数据
/// } // 离开作用域，自动释放锁并恢复中断状态
/// ```
///
/// # 注意
/// SpinLock 不是可重入的。当持有锁时，尝试再次获取锁将导致死锁。
/// 此外，SpinLock 通过禁用中断来保护临界区，因此在持有锁时应避免总线传输等长时间操作，
/// 这类临界区请使用 [`crate::Mutex`]。
pub type SpinLock<T> = lock_api::Mutex<RawSpinLock, T>;

/// SpinLock 的 RAII 保护器，离开作用域时自动释放锁。
pub type SpinLockGuard<'a, T> = lock_api::MutexGuard<'a, RawSpinLock, T>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArchOps;
    use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct FlagArchOps {
        enabled: AtomicBool,
    }

    impl ArchOps for FlagArchOps {
        unsafe fn read_and_disable_interrupts(&self) -> usize {
            self.enabled.swap(false, Ordering::SeqCst) as usize
        }

        unsafe fn restore_interrupts(&self, flags: usize) {
            self.enabled.store(flags != 0, Ordering::SeqCst);
        }
    }

    static FLAG_ARCH_OPS: FlagArchOps = FlagArchOps {
        enabled: AtomicBool::new(true),
    };
    // 0 = uninit, 1 = initializing, 2 = ready
    static SYNC_INIT: AtomicUsize = AtomicUsize::new(0);

    fn init_arch_ops() {
        match SYNC_INIT.compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire) {
            Ok(_) => {
                unsafe { crate::register_arch_ops(&FLAG_ARCH_OPS) };
                SYNC_INIT.store(2, Ordering::Release);
            }
            Err(_) => {
                while SYNC_INIT.load(Ordering::Acquire) != 2 {
                    core::hint::spin_loop();
                }
            }
        }
    }

    #[test]
    fn test_lock_disables_and_restores_interrupts() {
        init_arch_ops();
        let lock = SpinLock::new(0u32);
        {
            let mut guard = lock.lock();
            *guard += 1;
            assert!(!FLAG_ARCH_OPS.enabled.load(Ordering::SeqCst));
            assert!(lock.is_locked());
        }
        assert!(FLAG_ARCH_OPS.enabled.load(Ordering::SeqCst));
        assert!(!lock.is_locked());

        // try_lock 失败时也要恢复中断状态
        let guard = lock.lock();
        assert!(lock.try_lock().is_none());
        drop(guard);
        assert!(FLAG_ARCH_OPS.enabled.load(Ordering::SeqCst));
        assert_eq!(*lock.lock(), 1);
        assert!(FLAG_ARCH_OPS.enabled.load(Ordering::SeqCst));
    }
}
