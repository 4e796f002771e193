//! `/dev/tmp100` 的文件操作
//!
//! 设备节点是只读的一次性快照：在偏移 0 处用不小于 [`READING_LEN`] 的缓冲区读，
//! 得到一条完整读数，偏移推进到 [`READING_LEN`]；要再读一次，需重新打开或把偏移置 0。

use alloc::sync::{Arc, Weak};
use vfs::{CharDriver, FsError, UserBuffer};

use crate::{READING_LEN, Tmp100Device, Tmp100Error};

/// 绑定到设备号上的字符设备驱动
///
/// 只持有设备上下文的弱引用：上下文释放后，残留的打开文件读到 `NotReady`。
pub struct Tmp100Chardev {
    device: Weak<Tmp100Device>,
}

impl Tmp100Chardev {
    pub(crate) fn new(device: Weak<Tmp100Device>) -> Self {
        Self { device }
    }

    fn device(&self) -> Result<Arc<Tmp100Device>, Tmp100Error> {
        self.device.upgrade().ok_or(Tmp100Error::NotReady)
    }
}

impl CharDriver for Tmp100Chardev {
    fn open(&self) -> Result<(), FsError> {
        self.device()?.ensure_ready()?;
        Ok(())
    }

    fn read(&self, buf: &mut dyn UserBuffer, offset: &mut usize) -> Result<usize, FsError> {
        if buf.len() < READING_LEN || *offset != 0 {
            return Err(Tmp100Error::InvalidArgument.into());
        }
        let n = self.device()?.read_into(buf)?;
        *offset = n;
        Ok(n)
    }

    fn write(&self, _buf: &[u8], _offset: &mut usize) -> Result<usize, FsError> {
        Err(Tmp100Error::Unsupported.into())
    }
}
