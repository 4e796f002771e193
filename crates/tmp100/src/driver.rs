//! I2C 驱动与模块加载/卸载

use alloc::sync::Arc;
use device::{I2cBusCore, I2cClient, I2cDeviceId, I2cDriver, OfDeviceId};
use vfs::{ChrdevOps, FsError};

use crate::config::{TMP100_NAME, TMP100_OF_COMPATIBLE};
use crate::{ConfigStep, Tmp100Config, Tmp100Device, Tmp100Error};

/// 按设备名匹配
pub static TMP100_ID_TABLE: [I2cDeviceId; 1] = [I2cDeviceId {
    name: TMP100_NAME,
    driver_data: 0,
}];

/// 按设备树 compatible 匹配
pub static TMP100_OF_MATCH: [OfDeviceId; 1] = [OfDeviceId {
    compatible: TMP100_OF_COMPATIBLE,
}];

/// TMP100 的 I2C 驱动：probe → attach，remove → detach
pub struct Tmp100Driver {
    device: Arc<Tmp100Device>,
}

impl Tmp100Driver {
    /// 创建驱动
    pub fn new(device: Arc<Tmp100Device>) -> Self {
        Self { device }
    }
}

impl I2cDriver for Tmp100Driver {
    fn name(&self) -> &'static str {
        TMP100_NAME
    }

    fn id_table(&self) -> &'static [I2cDeviceId] {
        &TMP100_ID_TABLE
    }

    fn of_match_table(&self) -> &'static [OfDeviceId] {
        &TMP100_OF_MATCH
    }

    fn probe(&self, client: &I2cClient) -> Result<(), i32> {
        self.device.attach(client.clone()).map_err(|e| -e.to_errno())
    }

    fn remove(&self, client: &I2cClient) {
        if self.device.bound_addr() != Some(client.addr()) {
            log::warn!("tmp100: remove of unbound client {:#04x}", client.addr());
            return;
        }
        self.device.detach();
    }
}

/// 已加载的 TMP100 模块
///
/// 持有唯一的设备上下文；丢弃（或调用 [`Tmp100Module::exit`]）时从总线注销驱动，
/// 已绑定的设备随之 detach。
pub struct Tmp100Module {
    device: Arc<Tmp100Device>,
    bus: Arc<I2cBusCore>,
}

impl Tmp100Module {
    /// 模块加载：创建设备上下文并向总线注册驱动
    ///
    /// 总线上已有匹配的设备时，注册过程中即完成 attach。
    pub fn init(
        config: Tmp100Config,
        ops: Arc<dyn ChrdevOps>,
        bus: Arc<I2cBusCore>,
    ) -> Result<Self, Tmp100Error> {
        let device = Tmp100Device::new(config, ops);
        bus.register_driver(Arc::new(Tmp100Driver::new(device.clone())))
            .map_err(|errno| {
                log::warn!("tmp100: driver registration failed: -{}", errno);
                Tmp100Error::Configuration {
                    step: ConfigStep::Driver,
                    source: FsError::AlreadyExists,
                }
            })?;
        log::info!("tmp100: driver registered");
        Ok(Self { device, bus })
    }

    /// 设备上下文
    pub fn device(&self) -> &Arc<Tmp100Device> {
        &self.device
    }

    /// 模块卸载
    pub fn exit(self) {
        drop(self);
    }
}

impl Drop for Tmp100Module {
    fn drop(&mut self) {
        self.bus.unregister_driver(TMP100_NAME);
        log::info!("tmp100: driver unregistered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use device::{I2cClient, i2c_match_device};
    use test_support::{MockI2cAdapter, init_sync_arch_ops};
    use vfs::CharDevRegistry;

    fn driver() -> Tmp100Driver {
        init_sync_arch_ops();
        let registry = Arc::new(CharDevRegistry::new());
        Tmp100Driver::new(Tmp100Device::new(Tmp100Config::default(), registry))
    }

    #[test]
    fn test_match_by_name_or_compatible() {
        let drv = driver();
        let adapter = MockI2cAdapter::new();
        let by_name = I2cClient::new(adapter.clone(), 0x18, "tmp100");
        let by_of = I2cClient::new(adapter.clone(), 0x18, "sensor").with_compatible("ti,tmp100");
        let other = I2cClient::new(adapter, 0x48, "lm75").with_compatible("national,lm75");
        assert!(i2c_match_device(&drv, &by_name));
        assert!(i2c_match_device(&drv, &by_of));
        assert!(!i2c_match_device(&drv, &other));
    }

    #[test]
    fn test_probe_failure_returns_positive_errno() {
        let drv = driver();
        let adapter = MockI2cAdapter::with_functionality(device::I2cFunc::I2C);
        let client = I2cClient::new(adapter, 0x18, "tmp100");
        assert_eq!(drv.probe(&client), Err(uapi::errno::ENODEV));
    }

    #[test]
    fn test_second_client_is_busy() {
        let drv = driver();
        let adapter = MockI2cAdapter::new();
        let first = I2cClient::new(adapter.clone(), 0x18, "tmp100");
        let second = I2cClient::new(adapter, 0x49, "tmp100");
        assert_eq!(drv.probe(&first), Ok(()));
        assert_eq!(drv.probe(&second), Err(uapi::errno::EBUSY));

        // 未绑定的设备不影响已绑定的设备
        drv.remove(&second);
        assert_eq!(drv.device.bound_addr(), Some(0x18));
        drv.remove(&first);
        assert_eq!(drv.device.bound_addr(), None);
    }
}
