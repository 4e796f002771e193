//! I2C 总线核心
//!
//! 维护已注册的驱动和总线上的设备，按匹配表把设备绑定到驱动：
//!
//! - 设备加入总线时，依次尝试已注册的驱动，第一个匹配的驱动负责 probe；
//! - 驱动注册时，尝试绑定所有尚未绑定的设备；
//! - probe 失败的设备保持未绑定，错误码返回给调用者，不自动重试。

use alloc::sync::Arc;
use alloc::vec::Vec;
use sync::Mutex;
use uapi::errno::{EBUSY, EEXIST};

use super::{I2cClient, I2cDriver, i2c_match_device};

struct Binding {
    client: I2cClient,
    driver: Arc<dyn I2cDriver>,
}

#[derive(Default)]
struct BusState {
    drivers: Vec<Arc<dyn I2cDriver>>,
    unbound: Vec<I2cClient>,
    bound: Vec<Binding>,
}

impl BusState {
    fn addr_in_use(&self, addr: u16) -> bool {
        self.unbound.iter().any(|c| c.addr() == addr)
            || self.bound.iter().any(|b| b.client.addr() == addr)
    }
}

/// I2C 总线核心
///
/// probe/remove 在总线锁内调用，同一总线上的绑定/解绑相互串行。
pub struct I2cBusCore {
    state: Mutex<BusState>,
}

impl I2cBusCore {
    /// 创建空的总线
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BusState::default()),
        }
    }

    /// 注册驱动，并尝试绑定所有尚未绑定的设备
    ///
    /// 同名驱动已注册时返回 `EEXIST`。
    pub fn register_driver(&self, driver: Arc<dyn I2cDriver>) -> Result<(), i32> {
        let mut state = self.state.lock();
        if state.drivers.iter().any(|d| d.name() == driver.name()) {
            return Err(EEXIST);
        }
        state.drivers.push(driver.clone());

        let pending = core::mem::take(&mut state.unbound);
        for client in pending {
            if !i2c_match_device(driver.as_ref(), &client) {
                state.unbound.push(client);
                continue;
            }
            match driver.probe(&client) {
                Ok(()) => {
                    log::info!("i2c: {} bound to {:#04x}", driver.name(), client.addr());
                    state.bound.push(Binding {
                        client,
                        driver: driver.clone(),
                    });
                }
                Err(errno) => {
                    log::warn!(
                        "i2c: {} probe of {:#04x} failed: -{}",
                        driver.name(),
                        client.addr(),
                        errno
                    );
                    state.unbound.push(client);
                }
            }
        }
        Ok(())
    }

    /// 注销驱动，先解绑它驱动的所有设备
    ///
    /// 返回驱动是否曾经注册。
    pub fn unregister_driver(&self, name: &str) -> bool {
        let mut state = self.state.lock();
        let Some(pos) = state.drivers.iter().position(|d| d.name() == name) else {
            return false;
        };

        let mut i = 0;
        while i < state.bound.len() {
            if state.bound[i].driver.name() == name {
                let binding = state.bound.remove(i);
                binding.driver.remove(&binding.client);
                log::info!("i2c: {} unbound from {:#04x}", name, binding.client.addr());
                state.unbound.push(binding.client);
            } else {
                i += 1;
            }
        }

        state.drivers.remove(pos);
        true
    }

    /// 设备加入总线
    ///
    /// 返回 `Ok(true)` 表示已绑定，`Ok(false)` 表示没有匹配的驱动；
    /// probe 失败时返回其错误码，设备保持未绑定。
    /// 地址已被占用时返回 `EBUSY`。
    pub fn add_device(&self, client: I2cClient) -> Result<bool, i32> {
        let mut state = self.state.lock();
        if state.addr_in_use(client.addr()) {
            return Err(EBUSY);
        }

        let driver = state
            .drivers
            .iter()
            .find(|d| i2c_match_device(d.as_ref(), &client))
            .cloned();

        let Some(driver) = driver else {
            log::debug!("i2c: no driver for {} at {:#04x}", client.name(), client.addr());
            state.unbound.push(client);
            return Ok(false);
        };

        match driver.probe(&client) {
            Ok(()) => {
                log::info!("i2c: {} bound to {:#04x}", driver.name(), client.addr());
                state.bound.push(Binding { client, driver });
                Ok(true)
            }
            Err(errno) => {
                log::warn!(
                    "i2c: {} probe of {:#04x} failed: -{}",
                    driver.name(),
                    client.addr(),
                    errno
                );
                state.unbound.push(client);
                Err(errno)
            }
        }
    }

    /// 设备离开总线，已绑定时先调用驱动的 remove
    ///
    /// 返回设备是否在总线上。
    pub fn remove_device(&self, addr: u16) -> bool {
        let mut state = self.state.lock();
        if let Some(pos) = state.bound.iter().position(|b| b.client.addr() == addr) {
            let binding = state.bound.remove(pos);
            binding.driver.remove(&binding.client);
            log::info!("i2c: {} unbound from {:#04x}", binding.driver.name(), addr);
            return true;
        }
        if let Some(pos) = state.unbound.iter().position(|c| c.addr() == addr) {
            state.unbound.remove(pos);
            return true;
        }
        false
    }

    /// 已绑定的设备数
    pub fn bound_count(&self) -> usize {
        self.state.lock().bound.len()
    }

    /// 未绑定的设备数
    pub fn unbound_count(&self) -> usize {
        self.state.lock().unbound.len()
    }
}

impl Default for I2cBusCore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i2c::{I2cAdapter, I2cDeviceId, I2cError, I2cFunc, OfDeviceId};
    use core::sync::atomic::{AtomicUsize, Ordering};

    struct NullAdapter;

    impl I2cAdapter for NullAdapter {
        fn name(&self) -> &str {
            "i2c-test"
        }

        fn functionality(&self) -> I2cFunc {
            I2cFunc::I2C | I2cFunc::SMBUS_WORD_DATA
        }

        fn smbus_read_word_data(&self, _addr: u16, _command: u8) -> Result<u16, I2cError> {
            Err(I2cError::Nack)
        }
    }

    struct CountingDriver {
        probes: AtomicUsize,
        removes: AtomicUsize,
        fail_with: Option<i32>,
    }

    impl CountingDriver {
        fn new(fail_with: Option<i32>) -> Arc<Self> {
            Arc::new(Self {
                probes: AtomicUsize::new(0),
                removes: AtomicUsize::new(0),
                fail_with,
            })
        }
    }

    static IDS: [I2cDeviceId; 1] = [I2cDeviceId {
        name: "sensor",
        driver_data: 0,
    }];
    static OF_IDS: [OfDeviceId; 1] = [OfDeviceId {
        compatible: "acme,sensor",
    }];

    impl I2cDriver for CountingDriver {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn id_table(&self) -> &'static [I2cDeviceId] {
            &IDS
        }

        fn of_match_table(&self) -> &'static [OfDeviceId] {
            &OF_IDS
        }

        fn probe(&self, _client: &I2cClient) -> Result<(), i32> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            match self.fail_with {
                Some(errno) => Err(errno),
                None => Ok(()),
            }
        }

        fn remove(&self, _client: &I2cClient) {
            self.removes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn client(addr: u16, name: &str) -> I2cClient {
        I2cClient::new(Arc::new(NullAdapter), addr, name)
    }

    #[test]
    fn test_match_by_name_and_compatible() {
        let driver = CountingDriver::new(None);
        assert!(i2c_match_device(driver.as_ref(), &client(0x48, "sensor")));
        assert!(i2c_match_device(
            driver.as_ref(),
            &client(0x48, "other").with_compatible("acme,sensor")
        ));
        assert!(!i2c_match_device(driver.as_ref(), &client(0x48, "other")));
    }

    #[test]
    fn test_add_device_binds_matching_driver() {
        let bus = I2cBusCore::new();
        let driver = CountingDriver::new(None);
        bus.register_driver(driver.clone()).unwrap();

        assert_eq!(bus.add_device(client(0x48, "sensor")), Ok(true));
        assert_eq!(bus.add_device(client(0x49, "unknown")), Ok(false));
        assert_eq!(bus.bound_count(), 1);
        assert_eq!(bus.unbound_count(), 1);
        assert_eq!(driver.probes.load(Ordering::SeqCst), 1);

        assert!(bus.remove_device(0x48));
        assert_eq!(driver.removes.load(Ordering::SeqCst), 1);
        assert!(!bus.remove_device(0x50));
    }

    #[test]
    fn test_probe_failure_leaves_device_unbound() {
        let bus = I2cBusCore::new();
        let driver = CountingDriver::new(Some(19));
        bus.register_driver(driver.clone()).unwrap();

        assert_eq!(bus.add_device(client(0x48, "sensor")), Err(19));
        assert_eq!(bus.bound_count(), 0);
        assert_eq!(bus.unbound_count(), 1);

        // 解绑未绑定的设备不会调用 remove
        assert!(bus.remove_device(0x48));
        assert_eq!(driver.removes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_register_driver_probes_pending_devices() {
        let bus = I2cBusCore::new();
        assert_eq!(bus.add_device(client(0x48, "sensor")), Ok(false));

        let driver = CountingDriver::new(None);
        bus.register_driver(driver.clone()).unwrap();
        assert_eq!(bus.bound_count(), 1);

        assert!(bus.unregister_driver("counting"));
        assert_eq!(driver.removes.load(Ordering::SeqCst), 1);
        assert_eq!(bus.bound_count(), 0);
        assert_eq!(bus.unbound_count(), 1);
        assert!(!bus.unregister_driver("counting"));
    }

    #[test]
    fn test_duplicate_driver_and_address_rejected() {
        let bus = I2cBusCore::new();
        bus.register_driver(CountingDriver::new(None)).unwrap();
        assert_eq!(bus.register_driver(CountingDriver::new(None)), Err(EEXIST));

        bus.add_device(client(0x48, "sensor")).unwrap();
        assert_eq!(bus.add_device(client(0x48, "sensor")), Err(EBUSY));
    }
}
