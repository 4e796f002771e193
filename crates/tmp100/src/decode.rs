//! 温度寄存器值的定点换算
//!
//! 温度寄存器是 16 位的左对齐二进制补码，有效位数由分辨率决定：
//!
//! ```text
//!  15                      4  3       0
//! +-------------------------+---------+
//! |  数据域 (12 位分辨率)     |  0 0 0 0 |
//! +-------------------------+---------+
//! ```
//!
//! 数据域的最低位代表 `1 / 2^(分辨率 - 8)` 摄氏度，12 位时为 0.0625 ℃。

use crate::Tmp100Error;

/// 温度数据的有效位数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Resolution {
    /// 0.5 ℃
    Bits9 = 9,
    /// 0.25 ℃
    Bits10 = 10,
    /// 0.125 ℃
    Bits11 = 11,
    /// 0.0625 ℃
    Bits12 = 12,
}

impl Resolution {
    /// 全部分辨率，从低到高
    pub const ALL: [Resolution; 4] = [
        Resolution::Bits9,
        Resolution::Bits10,
        Resolution::Bits11,
        Resolution::Bits12,
    ];

    /// 有效位数
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// 数据域在寄存器中的右移量
    const fn shift(self) -> u32 {
        16 - self.bits()
    }
}

impl TryFrom<u8> for Resolution {
    type Error = Tmp100Error;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            9 => Ok(Resolution::Bits9),
            10 => Ok(Resolution::Bits10),
            11 => Ok(Resolution::Bits11),
            12 => Ok(Resolution::Bits12),
            _ => Err(Tmp100Error::InvalidResolution(bits)),
        }
    }
}

/// 把温度寄存器的原始值换算成毫摄氏度
///
/// 符号位取自对齐后数据域的最高位。缩放使用算术右移，
/// 负数向负无穷取整（12 位时 -1 个单位为 -62.5，得 -63）。
pub fn decode(raw: u16, resolution: Resolution) -> i32 {
    let bits = resolution.bits();
    let field = (raw >> resolution.shift()) as i32;
    let value = if field & (1 << (bits - 1)) != 0 {
        field - (1 << bits)
    } else {
        field
    };
    // i32 的 >> 是算术右移
    (value * 1000) >> (bits - 8)
}

/// 一次温度读数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    /// 毫摄氏度
    pub milli_degrees: i32,
    /// 换算时使用的分辨率
    pub resolution: Resolution,
}

impl Reading {
    /// 从原始寄存器值换算
    pub fn from_raw(raw: u16, resolution: Resolution) -> Self {
        Self {
            milli_degrees: decode(raw, resolution),
            resolution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_positive() {
        assert_eq!(decode(0x1900, Resolution::Bits12), 25_000);
        assert_eq!(decode(0x7FF0, Resolution::Bits12), 127_937);
        assert_eq!(decode(0x0010, Resolution::Bits12), 62);
    }

    #[test]
    fn test_decode_negative() {
        assert_eq!(decode(0xE700, Resolution::Bits12), -25_000);
        assert_eq!(decode(0x8000, Resolution::Bits12), -128_000);
        assert_eq!(decode(0xFF00, Resolution::Bits9), -1_000);
    }

    #[test]
    fn test_decode_negative_floors() {
        // -1 LSB = -62.5 m℃，向负无穷取整
        assert_eq!(decode(0xFFF0, Resolution::Bits12), -63);
        // -1 LSB = -125 m℃，可整除
        assert_eq!(decode(0xFFE0, Resolution::Bits11), -125);
    }

    #[test]
    fn test_decode_ignores_bits_below_resolution() {
        assert_eq!(decode(0x190F, Resolution::Bits12), 25_000);
        assert_eq!(decode(0x197F, Resolution::Bits9), decode(0x1900, Resolution::Bits9));
    }

    #[test]
    fn test_decode_half_degree_steps_at_9_bits() {
        assert_eq!(decode(0x1980, Resolution::Bits9), 25_500);
        assert_eq!(decode(0xE680, Resolution::Bits9), -25_500);
    }

    #[test]
    fn test_resolution_try_from() {
        assert_eq!(Resolution::try_from(12u8), Ok(Resolution::Bits12));
        assert_eq!(Resolution::try_from(9u8), Ok(Resolution::Bits9));
        assert_eq!(Resolution::try_from(8u8), Err(Tmp100Error::InvalidResolution(8)));
        assert_eq!(Resolution::try_from(13u8), Err(Tmp100Error::InvalidResolution(13)));
    }

    #[test]
    fn test_reading_keeps_resolution() {
        let r = Reading::from_raw(0x1900, Resolution::Bits10);
        assert_eq!(r.milli_degrees, 25_000);
        assert_eq!(r.resolution, Resolution::Bits10);
    }
}
