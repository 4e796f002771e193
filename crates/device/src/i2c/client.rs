//! I2C 从设备句柄

use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use super::{I2cAdapter, I2cError, I2cFunc};

/// 总线上的一个从设备：适配器 + 7 位从地址 + 设备名
///
/// 设备名与驱动的 id 表匹配，`compatible` 与驱动的 OF 匹配表匹配。
#[derive(Clone)]
pub struct I2cClient {
    adapter: Arc<dyn I2cAdapter>,
    addr: u16,
    name: String,
    compatible: Option<String>,
}

impl I2cClient {
    /// 创建从设备句柄
    pub fn new(adapter: Arc<dyn I2cAdapter>, addr: u16, name: &str) -> Self {
        Self {
            adapter,
            addr,
            name: String::from(name),
            compatible: None,
        }
    }

    /// 附加设备树 compatible 字符串
    pub fn with_compatible(mut self, compatible: &str) -> Self {
        self.compatible = Some(String::from(compatible));
        self
    }

    /// 从地址
    pub fn addr(&self) -> u16 {
        self.addr
    }

    /// 设备名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 设备树 compatible 字符串
    pub fn compatible(&self) -> Option<&str> {
        self.compatible.as_deref()
    }

    /// 所在的适配器
    pub fn adapter(&self) -> &Arc<dyn I2cAdapter> {
        &self.adapter
    }

    /// 检查适配器是否具备全部所需能力
    pub fn check_functionality(&self, func: I2cFunc) -> bool {
        self.adapter.functionality().contains(func)
    }

    /// SMBus 读字数据（低字节在前）
    pub fn read_word_data(&self, command: u8) -> Result<u16, I2cError> {
        self.adapter.smbus_read_word_data(self.addr, command)
    }

    /// SMBus 读字数据，按高字节在前返回
    ///
    /// 用于先发送 MSB 的设备（大多数温度传感器）。
    pub fn read_word_swapped(&self, command: u8) -> Result<u16, I2cError> {
        self.read_word_data(command).map(u16::swap_bytes)
    }
}

impl fmt::Debug for I2cClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("I2cClient")
            .field("adapter", &self.adapter.name())
            .field("addr", &format_args!("{:#04x}", self.addr))
            .field("name", &self.name)
            .field("compatible", &self.compatible)
            .finish()
    }
}
