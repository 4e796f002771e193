//! 内核设备驱动框架
//!
//! 此 crate 提供 I2C 设备驱动的抽象接口和通用实现，包括：
//!
//! - [`I2cAdapter`] trait - I2C/SMBus 控制器接口（一次同步的寄存器传输）
//! - [`I2cClient`] - 总线上的一个从设备（适配器 + 从地址）
//! - [`I2cDriver`] trait - I2C 设备驱动接口（probe/remove + 匹配表）
//! - [`I2cBusCore`] - 按匹配表把设备绑定到驱动，触发 probe/remove
//! - [`CMDLINE`] - 内核命令行参数
//!
//! 具体的总线控制器（传输层）不在此 crate 中实现，由平台代码实现 [`I2cAdapter`]。

#![no_std]

extern crate alloc;

pub mod cmdline;
pub mod i2c;

// Re-export i2c
pub use i2c::{
    I2cAdapter, I2cBusCore, I2cClient, I2cDeviceId, I2cDriver, I2cError, I2cFunc, OfDeviceId,
    i2c_match_device, i2c_match_id, of_match_device,
};

// Re-export cmdline
pub use cmdline::{CMDLINE, cmdline_params, set_cmdline};
