//! 打开的字符设备文件

use alloc::sync::Arc;
use sync::Mutex;

use crate::dev::{major, minor};
use crate::{CharDriver, FsError, OpenFlags, SeekWhence, UserBuffer};

/// 字符设备文件
///
/// 由 [`crate::CharDevRegistry::open`] 创建。持有绑定的驱动和调用者自己的偏移量；
/// 文件被丢弃时调用一次驱动的 release。
pub struct CharDeviceFile {
    /// 设备号
    dev: u64,

    /// 设备驱动
    driver: Arc<dyn CharDriver>,

    /// 打开标志位
    flags: OpenFlags,

    /// 偏移量，读期间持有以串行化同一文件上的并发读
    offset: Mutex<usize>,
}

impl CharDeviceFile {
    /// 创建新的字符设备文件（驱动的 open 已成功）
    pub(crate) fn new(dev: u64, driver: Arc<dyn CharDriver>, flags: OpenFlags) -> Self {
        Self {
            dev,
            driver,
            flags,
            offset: Mutex::new(0),
        }
    }

    /// 设备号
    pub fn dev(&self) -> u64 {
        self.dev
    }

    /// 打开标志
    pub fn flags(&self) -> OpenFlags {
        self.flags
    }

    /// 当前偏移量
    pub fn offset(&self) -> usize {
        *self.offset.lock()
    }

    /// 读到内核缓冲区
    pub fn read(&self, mut buf: &mut [u8]) -> Result<usize, FsError> {
        self.read_user(&mut buf)
    }

    /// 读到用户空间缓冲区
    pub fn read_user(&self, buf: &mut dyn UserBuffer) -> Result<usize, FsError> {
        if !self.flags.readable() {
            return Err(FsError::PermissionDenied);
        }
        let mut offset = self.offset.lock();
        self.driver.read(buf, &mut offset)
    }

    /// 写入
    ///
    /// 设备不支持写时返回 [`FsError::NotSupported`]，先于访问模式检查。
    pub fn write(&self, buf: &[u8]) -> Result<usize, FsError> {
        if !self.driver.writable() {
            return Err(FsError::NotSupported);
        }
        if !self.flags.writable() {
            return Err(FsError::PermissionDenied);
        }
        let mut offset = self.offset.lock();
        self.driver.write(buf, &mut offset)
    }

    /// 设置偏移量
    ///
    /// 字符设备只支持绝对定位和相对当前位置定位；结果不能为负。
    pub fn lseek(&self, offset: isize, whence: SeekWhence) -> Result<usize, FsError> {
        let mut cur = self.offset.lock();
        let new = match whence {
            SeekWhence::Set => offset,
            SeekWhence::Cur => (*cur as isize)
                .checked_add(offset)
                .ok_or(FsError::InvalidArgument)?,
            SeekWhence::End => return Err(FsError::InvalidArgument),
        };
        if new < 0 {
            return Err(FsError::InvalidArgument);
        }
        *cur = new as usize;
        Ok(*cur)
    }
}

impl Drop for CharDeviceFile {
    fn drop(&mut self) {
        if let Err(e) = self.driver.release() {
            log::warn!(
                "chrdev {}:{}: release failed: {:?}",
                major(self.dev),
                minor(self.dev),
                e
            );
        }
    }
}
