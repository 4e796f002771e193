//! 设备生命周期状态机
//!
//! ```text
//!            attach                 全部成功
//! Unbound ──────────▶ Acquiring ──────────────▶ Ready
//!    ▲                    │                       │ detach
//!    │      任一步失败，逆序回滚                    ▼
//!    └────────────────────┴──────────────────── Detaching
//! ```
//!
//! 获取顺序固定为：设备号区间 → 设备类 → cdev 绑定 → 设备节点。
//! 每获取一项就压入释放栈，失败或 detach 时从栈顶依次释放，
//! 保证释放顺序与获取顺序严格相反且每项恰好释放一次。

use alloc::sync::Arc;
use alloc::vec::Vec;
use vfs::{CharDriver, ChrdevOps, ClassId, FsError, major, minor};

use crate::config::TMP100_MINOR_COUNT;
use crate::{ConfigStep, Tmp100Config, Tmp100Error};

/// 生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// 未绑定（初始和终止状态）
    Unbound,
    /// 正在获取资源
    Acquiring,
    /// 设备节点已发布，可以读
    Ready,
    /// 正在释放资源
    Detaching,
}

/// 已获取、尚未释放的资源
#[derive(Debug)]
enum Held {
    Region { first: u64, count: u32 },
    Class(ClassId),
    Cdev(u64),
    Node { class: ClassId, dev: u64 },
}

impl Held {
    fn step(&self) -> ConfigStep {
        match self {
            Held::Region { .. } => ConfigStep::Region,
            Held::Class(_) => ConfigStep::Class,
            Held::Cdev(_) => ConfigStep::Cdev,
            Held::Node { .. } => ConfigStep::Node,
        }
    }

    fn release(self, ops: &dyn ChrdevOps) {
        match self {
            Held::Region { first, count } => ops.unregister_chrdev_region(first, count),
            Held::Class(class) => ops.class_destroy(class),
            Held::Cdev(dev) => ops.cdev_del(dev),
            Held::Node { class, dev } => ops.device_destroy(class, dev),
        }
    }
}

/// 生命周期：当前状态 + 释放栈
#[derive(Debug)]
pub(crate) struct Lifecycle {
    state: LifecycleState,
    held: Vec<Held>,
    dev: Option<u64>,
}

impl Lifecycle {
    pub(crate) const fn new() -> Self {
        Self {
            state: LifecycleState::Unbound,
            held: Vec::new(),
            dev: None,
        }
    }

    pub(crate) fn state(&self) -> LifecycleState {
        self.state
    }

    /// Ready 时的设备号
    pub(crate) fn dev(&self) -> Option<u64> {
        self.dev
    }

    /// Unbound → Acquiring → Ready；失败时回滚到 Unbound
    ///
    /// 成功返回设备号。
    pub(crate) fn acquire(
        &mut self,
        ops: &dyn ChrdevOps,
        config: &Tmp100Config,
        driver: Arc<dyn CharDriver>,
    ) -> Result<u64, Tmp100Error> {
        if self.state != LifecycleState::Unbound {
            return Err(Tmp100Error::Configuration {
                step: ConfigStep::Bind,
                source: FsError::Busy,
            });
        }

        self.state = LifecycleState::Acquiring;
        match self.acquire_all(ops, config, driver) {
            Ok(dev) => {
                self.dev = Some(dev);
                self.state = LifecycleState::Ready;
                Ok(dev)
            }
            Err(e) => {
                log::warn!("tmp100: attach failed: {}", e);
                self.unwind(ops);
                self.state = LifecycleState::Unbound;
                Err(e)
            }
        }
    }

    fn acquire_all(
        &mut self,
        ops: &dyn ChrdevOps,
        config: &Tmp100Config,
        driver: Arc<dyn CharDriver>,
    ) -> Result<u64, Tmp100Error> {
        let dev = ops
            .alloc_chrdev_region(config.first_minor, TMP100_MINOR_COUNT, &config.node_name)
            .map_err(|e| failed(ConfigStep::Region, e))?;
        self.held.push(Held::Region {
            first: dev,
            count: TMP100_MINOR_COUNT,
        });

        let class = ops
            .class_create(&config.class_name)
            .map_err(|e| failed(ConfigStep::Class, e))?;
        self.held.push(Held::Class(class));

        ops.cdev_add(dev, TMP100_MINOR_COUNT, driver)
            .map_err(|e| failed(ConfigStep::Cdev, e))?;
        self.held.push(Held::Cdev(dev));

        ops.device_create(class, dev, &config.node_name)
            .map_err(|e| failed(ConfigStep::Node, e))?;
        self.held.push(Held::Node { class, dev });

        Ok(dev)
    }

    /// Ready → Detaching → Unbound
    ///
    /// 不在 Ready 状态时什么也不做，返回 false。
    pub(crate) fn release(&mut self, ops: &dyn ChrdevOps) -> bool {
        if self.state != LifecycleState::Ready {
            return false;
        }
        self.state = LifecycleState::Detaching;
        if let Some(dev) = self.dev.take() {
            log::debug!("tmp100: releasing {}:{}", major(dev), minor(dev));
        }
        while let Some(held) = self.held.pop() {
            held.release(ops);
        }
        self.state = LifecycleState::Unbound;
        true
    }

    fn unwind(&mut self, ops: &dyn ChrdevOps) {
        while let Some(held) = self.held.pop() {
            log::warn!("tmp100: rolling back {}", held.step().as_str());
            held.release(ops);
        }
    }
}

fn failed(step: ConfigStep, source: FsError) -> Tmp100Error {
    Tmp100Error::Configuration { step, source }
}
