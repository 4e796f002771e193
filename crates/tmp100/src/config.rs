//! 驱动配置
//!
//! 编译期常量给出默认值；加载时可以用内核命令行覆盖：
//!
//! ```text
//! tmp100.resolution=11 tmp100.max_register=0x03 tmp100.name=temp0 tmp100.class=thermal tmp100.minor=0
//! ```

use alloc::string::String;

use crate::{Resolution, Tmp100Error};

/// 驱动名，同时是 id 表中的设备名
pub const TMP100_NAME: &str = "tmp100";

/// 设备树 compatible
pub const TMP100_OF_COMPATIBLE: &str = "ti,tmp100";

/// 默认 I2C 从地址
pub const TMP100_I2C_ADDR: u16 = 0x18;

/// 默认分辨率
pub const TMP100_DEFAULT_RESOLUTION: Resolution = Resolution::Bits12;

/// 最大寄存器地址
pub const TMP100_MAX_REGISTER: u8 = 0x03;

/// 第一个次设备号
pub const TMP100_FIRST_MINOR: u32 = 0;

/// 次设备号个数
pub const TMP100_MINOR_COUNT: u32 = 1;

/// 驱动配置，创建设备后不再改变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tmp100Config {
    /// 温度数据分辨率
    pub resolution: Resolution,
    /// 允许访问的最大寄存器地址
    pub max_register: u8,
    /// 设备节点名（`/dev/<node_name>`）
    pub node_name: String,
    /// 设备类名（`/sys/class/<class_name>`）
    pub class_name: String,
    /// 第一个次设备号
    pub first_minor: u32,
}

impl Default for Tmp100Config {
    fn default() -> Self {
        Self {
            resolution: TMP100_DEFAULT_RESOLUTION,
            max_register: TMP100_MAX_REGISTER,
            node_name: String::from(TMP100_NAME),
            class_name: String::from(TMP100_NAME),
            first_minor: TMP100_FIRST_MINOR,
        }
    }
}

impl Tmp100Config {
    /// 在默认配置上应用命令行中的 `tmp100.*` 参数
    pub fn from_cmdline(cmdline: &str) -> Result<Self, Tmp100Error> {
        let mut config = Self::default();
        for (key, value) in device::cmdline_params(cmdline, TMP100_NAME) {
            match key {
                "resolution" => {
                    let bits = value.parse::<u8>().map_err(|_| Tmp100Error::InvalidArgument)?;
                    config.resolution = Resolution::try_from(bits)?;
                }
                "max_register" => config.max_register = parse_u8(value)?,
                "name" => config.node_name = parse_name(value)?,
                "class" => config.class_name = parse_name(value)?,
                "minor" => {
                    config.first_minor =
                        value.parse().map_err(|_| Tmp100Error::InvalidArgument)?;
                }
                _ => log::warn!("tmp100: ignoring unknown parameter {}", key),
            }
        }
        Ok(config)
    }

    /// 读取全局内核命令行
    pub fn from_kernel_cmdline() -> Result<Self, Tmp100Error> {
        let cmdline = device::CMDLINE.read();
        Self::from_cmdline(&cmdline)
    }
}

fn parse_u8(value: &str) -> Result<u8, Tmp100Error> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|_| Tmp100Error::InvalidArgument)
}

fn parse_name(value: &str) -> Result<String, Tmp100Error> {
    if value.is_empty() || value.contains('/') {
        return Err(Tmp100Error::InvalidArgument);
    }
    Ok(String::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = Tmp100Config::default();
        assert_eq!(c.resolution, Resolution::Bits12);
        assert_eq!(c.max_register, 0x03);
        assert_eq!(c.node_name, "tmp100");
        assert_eq!(c.class_name, "tmp100");
        assert_eq!(c.first_minor, 0);
    }

    #[test]
    fn test_from_cmdline() {
        let c = Tmp100Config::from_cmdline(
            "console=ttyS0 tmp100.resolution=9 tmp100.max_register=0x01 tmp100.name=temp0 \
             tmp100.class=thermal tmp100.minor=3",
        )
        .unwrap();
        assert_eq!(c.resolution, Resolution::Bits9);
        assert_eq!(c.max_register, 0x01);
        assert_eq!(c.node_name, "temp0");
        assert_eq!(c.class_name, "thermal");
        assert_eq!(c.first_minor, 3);
    }

    #[test]
    fn test_from_cmdline_ignores_other_modules_and_unknown_keys() {
        let c = Tmp100Config::from_cmdline("lm75.resolution=9 tmp100.alert=1").unwrap();
        assert_eq!(c, Tmp100Config::default());
    }

    #[test]
    fn test_from_cmdline_rejects_malformed_values() {
        assert_eq!(
            Tmp100Config::from_cmdline("tmp100.resolution=13"),
            Err(Tmp100Error::InvalidResolution(13))
        );
        assert_eq!(
            Tmp100Config::from_cmdline("tmp100.resolution=high"),
            Err(Tmp100Error::InvalidArgument)
        );
        assert_eq!(
            Tmp100Config::from_cmdline("tmp100.max_register=0x100"),
            Err(Tmp100Error::InvalidArgument)
        );
        assert_eq!(
            Tmp100Config::from_cmdline("tmp100.name="),
            Err(Tmp100Error::InvalidArgument)
        );
        assert_eq!(
            Tmp100Config::from_cmdline("tmp100.minor=-1"),
            Err(Tmp100Error::InvalidArgument)
        );
    }

    #[test]
    fn test_from_kernel_cmdline() {
        device::set_cmdline("console=ttyS0 tmp100.resolution=9 tmp100.name=t9");
        let c = Tmp100Config::from_kernel_cmdline().unwrap();
        assert_eq!(c.resolution, Resolution::Bits9);
        assert_eq!(c.node_name, "t9");
        assert_eq!(c.class_name, "tmp100");
        assert_eq!(c.max_register, TMP100_MAX_REGISTER);
    }

    #[test]
    fn test_max_register_decimal() {
        let c = Tmp100Config::from_cmdline("tmp100.max_register=2").unwrap();
        assert_eq!(c.max_register, 2);
    }
}
