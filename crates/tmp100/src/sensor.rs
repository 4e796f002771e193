//! TMP100 设备上下文
//!
//! 模块加载期间只有一个设备上下文。总线句柄、生命周期状态和格式化暂存区
//! 都放在同一把锁里：读操作从检查状态到复制给调用者全程持锁，
//! 因此并发读互相串行，detach 会等待正在进行的读完成。

use alloc::sync::Arc;
use device::{I2cClient, I2cFunc};
use sync::Mutex;
use vfs::{CharDriver, ChrdevOps, UserBuffer, major, minor};

use crate::lifecycle::Lifecycle;
use crate::{
    LifecycleState, READING_LEN, Reading, ReadingBuf, RegisterId, Tmp100Chardev, Tmp100Config,
    Tmp100Error, Tmp100Regs, format_reading,
};

struct DeviceInner {
    lifecycle: Lifecycle,
    /// Ready 时绑定的寄存器访问器
    regs: Option<Tmp100Regs>,
    scratch: ReadingBuf,
}

impl DeviceInner {
    fn regs(&self) -> Result<&Tmp100Regs, Tmp100Error> {
        match (&self.regs, self.lifecycle.state()) {
            (Some(regs), LifecycleState::Ready) => Ok(regs),
            _ => Err(Tmp100Error::NotReady),
        }
    }
}

/// TMP100 设备上下文
pub struct Tmp100Device {
    config: Tmp100Config,
    ops: Arc<dyn ChrdevOps>,
    inner: Mutex<DeviceInner>,
}

impl Tmp100Device {
    /// 创建处于 Unbound 状态的设备上下文
    pub fn new(config: Tmp100Config, ops: Arc<dyn ChrdevOps>) -> Arc<Self> {
        Arc::new(Self {
            config,
            ops,
            inner: Mutex::new(DeviceInner {
                lifecycle: Lifecycle::new(),
                regs: None,
                scratch: [0; READING_LEN],
            }),
        })
    }

    /// 配置
    pub fn config(&self) -> &Tmp100Config {
        &self.config
    }

    /// 当前生命周期状态
    pub fn state(&self) -> LifecycleState {
        self.inner.lock().lifecycle.state()
    }

    /// Ready 时的设备号
    pub fn devt(&self) -> Option<u64> {
        self.inner.lock().lifecycle.dev()
    }

    /// 绑定的从设备地址
    pub fn bound_addr(&self) -> Option<u16> {
        self.inner.lock().regs.as_ref().map(|r| r.client().addr())
    }

    /// attach：检查适配器能力，然后获取全部资源并发布设备节点
    ///
    /// 失败时状态保持（或回到）Unbound，已获取的资源全部释放。
    pub fn attach(self: &Arc<Self>, client: I2cClient) -> Result<(), Tmp100Error> {
        if !client.check_functionality(I2cFunc::SMBUS_READ_WORD_DATA) {
            log::warn!(
                "tmp100 {:#04x}: adapter {} lacks SMBus word reads",
                client.addr(),
                client.adapter().name()
            );
            return Err(Tmp100Error::MissingFunctionality);
        }

        let mut inner = self.inner.lock();
        let endpoint: Arc<dyn CharDriver> = Arc::new(Tmp100Chardev::new(Arc::downgrade(self)));
        let dev = inner
            .lifecycle
            .acquire(self.ops.as_ref(), &self.config, endpoint)?;

        log::info!(
            "tmp100 {:#04x}: /dev/{} ready as {}:{}",
            client.addr(),
            self.config.node_name,
            major(dev),
            minor(dev)
        );
        inner.regs = Some(Tmp100Regs::new(client, self.config.max_register));
        Ok(())
    }

    /// detach：撤销设备节点并逆序释放全部资源
    ///
    /// 等待正在进行的读完成。未 attach 时什么也不做，返回 false。
    pub fn detach(&self) -> bool {
        let mut inner = self.inner.lock();
        if !inner.lifecycle.release(self.ops.as_ref()) {
            return false;
        }
        if let Some(regs) = inner.regs.take() {
            log::info!(
                "tmp100 {:#04x}: /dev/{} removed",
                regs.client().addr(),
                self.config.node_name
            );
        }
        true
    }

    /// 设备是否可以打开
    pub(crate) fn ensure_ready(&self) -> Result<(), Tmp100Error> {
        self.inner.lock().regs().map(|_| ())
    }

    /// 读取一次温度
    pub fn read_temperature(&self) -> Result<Reading, Tmp100Error> {
        let inner = self.inner.lock();
        let raw = inner.regs()?.read(RegisterId::Temperature)?;
        Ok(Reading::from_raw(raw, self.config.resolution))
    }

    /// 读取一次温度，格式化后复制到调用者缓冲区
    ///
    /// 成功时返回交付的字节数（总是 [`READING_LEN`]）。
    pub(crate) fn read_into(&self, buf: &mut dyn UserBuffer) -> Result<usize, Tmp100Error> {
        let mut inner = self.inner.lock();
        let raw = inner.regs()?.read(RegisterId::Temperature)?;
        let reading = Reading::from_raw(raw, self.config.resolution);
        inner.scratch = format_reading(reading.milli_degrees)?;
        buf.copy_to_user(&inner.scratch)
            .map_err(|_| Tmp100Error::Fault)?;
        log::debug!("tmp100: read {} m°C", reading.milli_degrees);
        Ok(READING_LEN)
    }
}

impl Drop for Tmp100Device {
    fn drop(&mut self) {
        if self.detach() {
            log::warn!("tmp100: device context dropped while attached");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::{MockI2cAdapter, init_sync_arch_ops};
    use vfs::CharDevRegistry;

    fn setup() -> (Arc<CharDevRegistry>, Arc<Tmp100Device>, Arc<MockI2cAdapter>) {
        init_sync_arch_ops();
        let registry = Arc::new(CharDevRegistry::new());
        let device = Tmp100Device::new(Tmp100Config::default(), registry.clone());
        (registry, device, MockI2cAdapter::new())
    }

    #[test]
    fn test_attach_publishes_node() {
        let (registry, device, adapter) = setup();
        assert_eq!(device.state(), LifecycleState::Unbound);
        assert_eq!(registry.lookup_node("tmp100"), None);

        device.attach(I2cClient::new(adapter, 0x18, "tmp100")).unwrap();
        assert_eq!(device.state(), LifecycleState::Ready);
        assert_eq!(device.bound_addr(), Some(0x18));
        assert_eq!(registry.lookup_node("tmp100"), device.devt());

        assert!(device.detach());
        assert_eq!(device.state(), LifecycleState::Unbound);
        assert_eq!(registry.lookup_node("tmp100"), None);
        assert_eq!(registry.region_count(), 0);
        assert!(!device.detach());
    }

    #[test]
    fn test_attach_requires_word_reads() {
        let (registry, device, _) = setup();
        let adapter = MockI2cAdapter::with_functionality(I2cFunc::I2C | I2cFunc::SMBUS_BYTE_DATA);
        assert_eq!(
            device.attach(I2cClient::new(adapter, 0x18, "tmp100")),
            Err(Tmp100Error::MissingFunctionality)
        );
        assert_eq!(device.state(), LifecycleState::Unbound);
        assert_eq!(registry.region_count(), 0);
    }

    #[test]
    fn test_read_temperature() {
        let (_registry, device, adapter) = setup();
        adapter.set_register(RegisterId::Temperature.addr(), 0xE700);
        assert_eq!(device.read_temperature(), Err(Tmp100Error::NotReady));

        device.attach(I2cClient::new(adapter, 0x18, "tmp100")).unwrap();
        let reading = device.read_temperature().unwrap();
        assert_eq!(reading.milli_degrees, -25_000);
    }

    #[test]
    fn test_drop_releases_resources() {
        let (registry, device, adapter) = setup();
        device.attach(I2cClient::new(adapter, 0x18, "tmp100")).unwrap();
        drop(device);
        assert_eq!(registry.cdev_count(), 0);
        assert_eq!(registry.region_count(), 0);
        assert!(!registry.class_exists("tmp100"));
    }
}
