//! I2C 总线抽象
//!
//! 驱动只通过 SMBus 风格的同步寄存器访问与设备交互：
//! 一次调用对应一次总线传输，可能阻塞调用者，失败时返回 [`I2cError`]，本层不做重试。

mod bus_core;
mod client;
mod driver;
mod error;

use bitflags::bitflags;

pub use self::bus_core::I2cBusCore;
pub use self::client::I2cClient;
pub use self::driver::{
    I2cDeviceId, I2cDriver, OfDeviceId, i2c_match_device, i2c_match_id, of_match_device,
};
pub use self::error::I2cError;

bitflags! {
    /// 适配器支持的传输能力（取值与 Linux `I2C_FUNC_*` 一致）
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct I2cFunc: u32 {
        /// 原始 I2C 传输
        const I2C = 0x0000_0001;
        /// SMBus quick 命令
        const SMBUS_QUICK = 0x0001_0000;
        /// SMBus 读字节数据
        const SMBUS_READ_BYTE_DATA = 0x0008_0000;
        /// SMBus 写字节数据
        const SMBUS_WRITE_BYTE_DATA = 0x0010_0000;
        /// SMBus 读字数据
        const SMBUS_READ_WORD_DATA = 0x0020_0000;
        /// SMBus 写字数据
        const SMBUS_WRITE_WORD_DATA = 0x0040_0000;
        /// SMBus 字节数据读写
        const SMBUS_BYTE_DATA =
            Self::SMBUS_READ_BYTE_DATA.bits() | Self::SMBUS_WRITE_BYTE_DATA.bits();
        /// SMBus 字数据读写
        const SMBUS_WORD_DATA =
            Self::SMBUS_READ_WORD_DATA.bits() | Self::SMBUS_WRITE_WORD_DATA.bits();
    }
}

/// I2C/SMBus 控制器接口
///
/// 由平台的总线控制器驱动实现。
pub trait I2cAdapter: Send + Sync {
    /// 适配器名称（例如 `i2c-0`）
    fn name(&self) -> &str;

    /// 适配器支持的传输能力
    fn functionality(&self) -> I2cFunc;

    /// SMBus 读字数据：先写命令字节（寄存器地址），再读回两个字节
    ///
    /// 返回值按 SMBus 约定为低字节在前（第一个收到的字节在低 8 位）。
    fn smbus_read_word_data(&self, addr: u16, command: u8) -> Result<u16, I2cError>;
}
