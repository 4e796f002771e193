//! 文件打开标志与定位方式

use bitflags::bitflags;

bitflags! {
    /// open(2) 标志位
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        const O_RDONLY = 0o0;
        const O_WRONLY = 0o1;
        const O_RDWR = 0o2;
        const O_NONBLOCK = 0o4000;
        const O_CLOEXEC = 0o2000000;
    }
}

impl OpenFlags {
    /// 访问模式掩码
    const ACCMODE: u32 = 0o3;

    /// 是否可读
    pub fn readable(&self) -> bool {
        let mode = self.bits() & Self::ACCMODE;
        mode == Self::O_RDONLY.bits() || mode == Self::O_RDWR.bits()
    }

    /// 是否可写
    pub fn writable(&self) -> bool {
        let mode = self.bits() & Self::ACCMODE;
        mode == Self::O_WRONLY.bits() || mode == Self::O_RDWR.bits()
    }
}

/// lseek(2) 的定位方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SeekWhence {
    /// 绝对位置
    Set = 0,
    /// 相对当前位置
    Cur = 1,
    /// 相对文件末尾
    End = 2,
}
