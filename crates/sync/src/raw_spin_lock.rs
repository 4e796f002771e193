//! 关中断自旋锁
//!
//! 基于原子操作实现自旋锁机制，加锁时禁用本地中断，解锁时恢复。

use core::{
    hint,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use crate::arch_ops;

/// 关中断的原始自旋锁，作为 [`lock_api::RawMutex`] 供 [`crate::SpinLock`] 使用。
///
/// 加锁前先禁用本地中断并记下之前的中断状态；
/// 持锁者在解锁时恢复该状态。
/// 不可重入 (即不能嵌套调用 `lock()`)。
///
/// 注意：禁用中断只能阻止**本地 CPU** 的“任务 vs 本地中断”并发，
/// 其他 CPU 的并行访问由原子标志位保证互斥。
#[derive(Debug)]
pub struct RawSpinLock {
    lock: AtomicBool,
    /// 持锁者进入临界区前的中断状态
    saved_flags: AtomicUsize,
}

impl RawSpinLock {
    /// 创建一个新的 RawSpinLock 实例。
    pub const fn new() -> Self {
        RawSpinLock {
            lock: AtomicBool::new(false),
            saved_flags: AtomicUsize::new(0),
        }
    }
}

impl Default for RawSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl lock_api::RawMutex for RawSpinLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = RawSpinLock::new();

    // 中断状态属于本地 CPU，guard 不能跨线程移动
    type GuardMarker = lock_api::GuardNoSend;

    fn lock(&self) {
        // SAFETY: 保存的状态只会在 unlock 中恢复
        let flags = unsafe { arch_ops().read_and_disable_interrupts() };

        while self
            .lock
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            hint::spin_loop();
        }

        self.saved_flags.store(flags, Ordering::Relaxed);
    }

    fn try_lock(&self) -> bool {
        // SAFETY: 获取失败时立即恢复中断状态
        let flags = unsafe { arch_ops().read_and_disable_interrupts() };

        if self
            .lock
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            self.saved_flags.store(flags, Ordering::Relaxed);
            true
        } else {
            unsafe { arch_ops().restore_interrupts(flags) };
            false
        }
    }

    unsafe fn unlock(&self) {
        let flags = self.saved_flags.load(Ordering::Relaxed);
        self.lock.store(false, Ordering::Release);
        // SAFETY: flags 是持锁者在 lock/try_lock 中保存的
        unsafe { arch_ops().restore_interrupts(flags) };
    }

    fn is_locked(&self) -> bool {
        self.lock.load(Ordering::Relaxed)
    }
}
