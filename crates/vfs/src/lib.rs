//! 字符设备层
//!
//! 此 crate 提供驱动发布字符设备所需的内核侧抽象，包括：
//!
//! - 设备号编码（[`makedev`] / [`major`] / [`minor`]）
//! - [`ChrdevOps`] trait - 成对的资源获取/释放操作：设备号区间、设备类、cdev 绑定、设备节点
//! - [`CharDevRegistry`] - [`ChrdevOps`] 的内存实现，提供节点查找与打开
//! - [`CharDriver`] trait - 驱动暴露给用户空间的 open/read/write/release 接口
//! - [`CharDeviceFile`] - 打开的字符设备文件，维护调用者的偏移量
//! - [`FsError`] - 与 POSIX 兼容的错误码

#![no_std]

extern crate alloc;

pub mod dev;
pub mod error;
pub mod ops;

mod chrdev;
mod devno;
pub mod impls;

// Re-export ops
pub use ops::{CharDriver, ChrdevOps, ClassId, UserBuffer};

// Re-export error
pub use error::FsError;

// Re-export dev
pub use dev::{major, makedev, minor};

// Re-export chrdev
pub use chrdev::CharDevRegistry;

// Re-export devno
pub use devno::{CHRDEV_MAJOR_DYN_END, CHRDEV_MAJOR_DYN_START, MINORBITS, MINORMASK};

// Re-export impls
pub use impls::CharDeviceFile;

// Re-export uapi types for convenience
pub use uapi::fcntl::{OpenFlags, SeekWhence};
