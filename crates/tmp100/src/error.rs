//! TMP100 驱动错误类型

use core::fmt;

use device::I2cError;
use uapi::errno::{EFAULT, EINVAL, EIO, ENODEV, EOPNOTSUPP, EOVERFLOW};
use vfs::FsError;

/// attach 过程中出错的步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigStep {
    /// 向总线注册驱动
    Driver,
    /// 占用设备（设备已处于非 Unbound 状态）
    Bind,
    /// 分配设备号区间
    Region,
    /// 创建设备类
    Class,
    /// 绑定 cdev
    Cdev,
    /// 发布设备节点
    Node,
}

impl ConfigStep {
    /// 步骤名
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigStep::Driver => "driver registration",
            ConfigStep::Bind => "device binding",
            ConfigStep::Region => "device number region",
            ConfigStep::Class => "device class",
            ConfigStep::Cdev => "cdev binding",
            ConfigStep::Node => "device node",
        }
    }
}

/// TMP100 驱动错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tmp100Error {
    /// attach 时获取资源失败，已获取的资源全部回滚
    Configuration {
        /// 失败的步骤
        step: ConfigStep,
        /// 注册表返回的错误
        source: FsError,
    },
    /// 总线传输失败
    Bus(I2cError),
    /// 偏移量非零或缓冲区过短
    InvalidArgument,
    /// 复制到调用者内存失败
    Fault,
    /// 读数超出定长缓冲区能表示的范围
    Overflow,
    /// 设备未处于 Ready 状态
    NotReady,
    /// 不支持的操作（写）
    Unsupported,
    /// 寄存器地址超过配置的最大寄存器
    InvalidRegister(u8),
    /// 分辨率不在 9..=12 位之间
    InvalidResolution(u8),
    /// 适配器不支持 SMBus 读字数据
    MissingFunctionality,
}

impl Tmp100Error {
    /// 错误描述
    pub fn as_str(&self) -> &'static str {
        match self {
            Tmp100Error::Configuration { .. } => "resource acquisition failed",
            Tmp100Error::Bus(_) => "register transfer failed",
            Tmp100Error::InvalidArgument => "invalid argument",
            Tmp100Error::Fault => "bad user buffer",
            Tmp100Error::Overflow => "reading does not fit the output buffer",
            Tmp100Error::NotReady => "device not ready",
            Tmp100Error::Unsupported => "operation not supported",
            Tmp100Error::InvalidRegister(_) => "invalid register",
            Tmp100Error::InvalidResolution(_) => "invalid resolution",
            Tmp100Error::MissingFunctionality => "adapter lacks SMBus word reads",
        }
    }

    /// 转换为错误码（负数）
    pub fn to_errno(&self) -> i32 {
        match self {
            Tmp100Error::Configuration { source, .. } => source.to_errno() as i32,
            Tmp100Error::Bus(_) => -EIO,
            Tmp100Error::InvalidArgument
            | Tmp100Error::InvalidRegister(_)
            | Tmp100Error::InvalidResolution(_) => -EINVAL,
            Tmp100Error::Fault => -EFAULT,
            Tmp100Error::Overflow => -EOVERFLOW,
            Tmp100Error::NotReady | Tmp100Error::MissingFunctionality => -ENODEV,
            Tmp100Error::Unsupported => -EOPNOTSUPP,
        }
    }
}

impl fmt::Display for Tmp100Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tmp100Error::Configuration { step, source } => {
                write!(f, "{}: {} ({:?})", self.as_str(), step.as_str(), source)
            }
            Tmp100Error::Bus(e) => write!(f, "{}: {}", self.as_str(), e),
            Tmp100Error::InvalidRegister(reg) => write!(f, "{} {:#04x}", self.as_str(), reg),
            Tmp100Error::InvalidResolution(bits) => write!(f, "{} {} bits", self.as_str(), bits),
            _ => f.write_str(self.as_str()),
        }
    }
}

impl From<I2cError> for Tmp100Error {
    fn from(e: I2cError) -> Self {
        Tmp100Error::Bus(e)
    }
}

impl From<Tmp100Error> for FsError {
    fn from(e: Tmp100Error) -> Self {
        match e {
            Tmp100Error::Configuration { source, .. } => source,
            Tmp100Error::Bus(_) => FsError::IoError,
            Tmp100Error::InvalidArgument
            | Tmp100Error::InvalidRegister(_)
            | Tmp100Error::InvalidResolution(_) => FsError::InvalidArgument,
            Tmp100Error::Fault => FsError::BadAddress,
            Tmp100Error::Overflow => FsError::Overflow,
            Tmp100Error::NotReady | Tmp100Error::MissingFunctionality => FsError::NoDevice,
            Tmp100Error::Unsupported => FsError::NotSupported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_fs_error_mapping() {
        assert_eq!(FsError::from(Tmp100Error::Bus(I2cError::Nack)), FsError::IoError);
        assert_eq!(FsError::from(Tmp100Error::Fault), FsError::BadAddress);
        assert_eq!(FsError::from(Tmp100Error::NotReady), FsError::NoDevice);
        assert_eq!(FsError::from(Tmp100Error::Unsupported), FsError::NotSupported);
        let e = Tmp100Error::Configuration {
            step: ConfigStep::Class,
            source: FsError::AlreadyExists,
        };
        assert_eq!(FsError::from(e), FsError::AlreadyExists);
    }

    #[test]
    fn test_errno_matches_fs_error() {
        let all = [
            Tmp100Error::Bus(I2cError::Timeout),
            Tmp100Error::InvalidArgument,
            Tmp100Error::Fault,
            Tmp100Error::Overflow,
            Tmp100Error::NotReady,
            Tmp100Error::Unsupported,
            Tmp100Error::InvalidRegister(4),
            Tmp100Error::InvalidResolution(8),
            Tmp100Error::MissingFunctionality,
        ];
        for e in all {
            assert_eq!(e.to_errno() as isize, FsError::from(e).to_errno(), "{:?}", e);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Tmp100Error::NotReady.to_string(), "device not ready");
        assert_eq!(
            Tmp100Error::Bus(I2cError::Nack).to_string(),
            "register transfer failed: no acknowledge"
        );
        assert_eq!(
            Tmp100Error::InvalidRegister(7).to_string(),
            "invalid register 0x07"
        );
    }
}
