//! 字符设备操作 trait 定义
//!
//! - [`CharDriver`]：驱动实现，描述用户空间对设备节点的 open/read/write/release；
//! - [`ChrdevOps`]：内核实现，提供驱动发布设备节点所需的成对资源操作；
//! - [`UserBuffer`]：调用者提供的用户空间缓冲区。

use alloc::sync::Arc;

use crate::FsError;

/// 设备类句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(pub u32);

/// 用户空间缓冲区
///
/// 复制可能因地址无效而失败；失败时不认为有任何数据已交付。
pub trait UserBuffer {
    /// 缓冲区长度
    fn len(&self) -> usize;

    /// 缓冲区是否为空
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 把 `src` 复制到缓冲区开头
    fn copy_to_user(&mut self, src: &[u8]) -> Result<(), FsError>;
}

impl UserBuffer for &mut [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn copy_to_user(&mut self, src: &[u8]) -> Result<(), FsError> {
        let dst = self.get_mut(..src.len()).ok_or(FsError::BadAddress)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

/// 字符设备驱动接口
///
/// 由 cdev 绑定到设备号上，[`crate::CharDeviceFile`] 通过它访问设备。
pub trait CharDriver: Send + Sync {
    /// 打开设备
    fn open(&self) -> Result<(), FsError>;

    /// 从 `offset` 处读取到 `buf`，成功时推进 `offset` 并返回交付的字节数
    fn read(&self, buf: &mut dyn UserBuffer, offset: &mut usize) -> Result<usize, FsError>;

    /// 设备是否支持写，默认不支持
    ///
    /// 不支持写的设备上，任何写都返回 [`FsError::NotSupported`]，与打开方式无关。
    fn writable(&self) -> bool {
        false
    }

    /// 写入数据，默认不支持
    fn write(&self, _buf: &[u8], _offset: &mut usize) -> Result<usize, FsError> {
        Err(FsError::NotSupported)
    }

    /// 关闭设备，默认什么也不做
    fn release(&self) -> Result<(), FsError> {
        Ok(())
    }
}

/// 字符设备资源操作
///
/// 每个获取操作都有对应的释放操作；释放操作不会失败。
pub trait ChrdevOps: Send + Sync {
    /// 动态分配一个主设备号，保留其下 `[first_minor, first_minor + count)` 的次设备号
    ///
    /// 返回区间第一个设备号。
    fn alloc_chrdev_region(&self, first_minor: u32, count: u32, name: &str)
    -> Result<u64, FsError>;

    /// 释放 [`ChrdevOps::alloc_chrdev_region`] 保留的区间
    fn unregister_chrdev_region(&self, first: u64, count: u32);

    /// 创建设备类
    fn class_create(&self, name: &str) -> Result<ClassId, FsError>;

    /// 销毁设备类
    fn class_destroy(&self, class: ClassId);

    /// 把驱动绑定到 `[dev, dev + count)`
    fn cdev_add(&self, dev: u64, count: u32, driver: Arc<dyn CharDriver>) -> Result<(), FsError>;

    /// 解除 `dev` 上的绑定
    fn cdev_del(&self, dev: u64);

    /// 在设备类下发布设备节点 `/dev/<name>`
    fn device_create(&self, class: ClassId, dev: u64, name: &str) -> Result<(), FsError>;

    /// 撤销设备节点
    fn device_destroy(&self, class: ClassId, dev: u64);
}
