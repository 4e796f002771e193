//! 测试支持 crate
//!
//! 提供 Mock 实现和测试工具：
//!
//! - [`mock::arch`]：为 `sync` 注册的 Mock 架构操作
//! - [`mock::i2c`]：可编程寄存器、可注入故障的 Mock I2C 适配器

#![no_std]

extern crate alloc;

pub mod mock;

pub use mock::arch::init_sync_arch_ops;
pub use mock::i2c::MockI2cAdapter;
