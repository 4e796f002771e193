//! VFS 错误类型
//!
//! 定义了与 POSIX 兼容的错误码，可通过 [`FsError::to_errno()`] 转换为系统调用错误码。

use uapi::errno::{
    EACCES, EBUSY, EEXIST, EFAULT, EINVAL, EIO, ENODEV, ENOENT, EOPNOTSUPP, EOVERFLOW,
};

/// VFS 错误类型
///
/// 各错误码对应标准 POSIX errno 值。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    /// 文件不存在 (-ENOENT)
    NotFound,
    /// 文件已存在 (-EEXIST)
    AlreadyExists,
    /// 权限被拒绝 (-EACCES)
    PermissionDenied,
    /// 无效参数 (-EINVAL)
    InvalidArgument,
    /// 用户缓冲区地址无效 (-EFAULT)
    BadAddress,
    /// 数值超出表示范围 (-EOVERFLOW)
    Overflow,
    /// 设备或资源忙 (-EBUSY)
    Busy,
    /// I/O 错误 (-EIO)
    IoError,
    /// 设备不存在 (-ENODEV)
    NoDevice,
    /// 操作不支持 (-ENOTSUP)
    NotSupported,
}

impl FsError {
    /// 转换为系统调用错误码（负数）
    pub fn to_errno(&self) -> isize {
        let errno = match self {
            FsError::NotFound => ENOENT,
            FsError::AlreadyExists => EEXIST,
            FsError::PermissionDenied => EACCES,
            FsError::InvalidArgument => EINVAL,
            FsError::BadAddress => EFAULT,
            FsError::Overflow => EOVERFLOW,
            FsError::Busy => EBUSY,
            FsError::IoError => EIO,
            FsError::NoDevice => ENODEV,
            FsError::NotSupported => EOPNOTSUPP,
        };
        -(errno as isize)
    }
}
