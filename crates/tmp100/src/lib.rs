//! TI TMP100 温度传感器驱动
//!
//! 传感器挂在 I2C 总线上，驱动把温度寄存器读出的原始值换算成
//! 毫摄氏度，再格式化为定长文本，通过唯一的只读字符设备节点交给用户空间：
//!
//! ```text
//! $ cat /dev/tmp100
//! +25.0000
//! ```
//!
//! 组成（自底向上）：
//!
//! - [`Tmp100Regs`] - 寄存器访问，一次调用对应一次总线传输
//! - [`decode()`] - 原始寄存器值 → 毫摄氏度的定点换算
//! - [`format_reading`] - 毫摄氏度 → 定长文本缓冲区
//! - [`LifecycleState`] - attach/detach 状态机，按序获取、逆序释放设备号、设备类、cdev 绑定和设备节点
//! - [`Tmp100Chardev`] - 设备节点的 open/read/release 实现
//! - [`Tmp100Driver`] / [`Tmp100Module`] - I2C 驱动与模块的加载/卸载

#![no_std]

extern crate alloc;

pub mod config;
pub mod error;

mod chardev;
mod decode;
mod driver;
mod format;
mod lifecycle;
mod regs;
mod sensor;

pub use chardev::Tmp100Chardev;
pub use config::Tmp100Config;
pub use decode::{Reading, Resolution, decode};
pub use driver::{TMP100_ID_TABLE, TMP100_OF_MATCH, Tmp100Driver, Tmp100Module};
pub use error::{ConfigStep, Tmp100Error};
pub use format::{READING_LEN, ReadingBuf, format_reading};
pub use lifecycle::LifecycleState;
pub use regs::{RegisterId, Tmp100Regs};
pub use sensor::Tmp100Device;
