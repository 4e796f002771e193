//! I2C 传输错误

use uapi::errno::{EAGAIN, EIO, ENXIO, EOPNOTSUPP, ETIMEDOUT};

/// I2C 传输错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I2cError {
    /// 从设备没有应答地址或数据
    Nack,
    /// 传输超时
    Timeout,
    /// 多主机仲裁失败
    ArbitrationLost,
    /// 适配器不支持该类型的传输
    Unsupported,
    /// 其他总线错误
    Io,
}

impl I2cError {
    /// 错误描述
    pub fn as_str(&self) -> &'static str {
        match self {
            I2cError::Nack => "no acknowledge",
            I2cError::Timeout => "bus timeout",
            I2cError::ArbitrationLost => "arbitration lost",
            I2cError::Unsupported => "transfer not supported",
            I2cError::Io => "bus error",
        }
    }

    /// 转换为错误码（负数），取值与 Linux I2C 核心一致
    pub fn to_errno(&self) -> i32 {
        match self {
            I2cError::Nack => -ENXIO,
            I2cError::Timeout => -ETIMEDOUT,
            I2cError::ArbitrationLost => -EAGAIN,
            I2cError::Unsupported => -EOPNOTSUPP,
            I2cError::Io => -EIO,
        }
    }
}

impl core::fmt::Display for I2cError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
