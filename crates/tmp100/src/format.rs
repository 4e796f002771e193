//! 读数的定长文本格式
//!
//! 形如 `+25.0000\n`：符号、1 到 3 位整数、小数点、4 位小数、换行，
//! 剩余部分以 NUL 填充。缓冲区总长 [`READING_LEN`]，至少留一个 NUL 结尾。

use core::fmt::{self, Write};

use crate::Tmp100Error;

/// 格式化后缓冲区的固定长度
pub const READING_LEN: usize = 11;

/// 格式化后的读数
pub type ReadingBuf = [u8; READING_LEN];

/// 能表示的最大整数度数（不含）
const MAX_DEGREES: u32 = 1000;

/// 向定长缓冲区写入，写满（含结尾 NUL）即报错，不截断
struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.pos + s.len();
        // 保留最后一个字节给 NUL
        if end >= self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.pos..end].copy_from_slice(s.as_bytes());
        self.pos = end;
        Ok(())
    }
}

/// 把毫摄氏度格式化为定长缓冲区
///
/// 小数部分是千分位余数乘 10 后补零到 4 位，所以 `25500` 输出 `+25.5000`。
/// 0 总是带 `+` 号。整数部分超过 3 位时返回 [`Tmp100Error::Overflow`]。
pub fn format_reading(milli_degrees: i32) -> Result<ReadingBuf, Tmp100Error> {
    let sign = if milli_degrees < 0 { '-' } else { '+' };
    let magnitude = milli_degrees.unsigned_abs();
    let degrees = magnitude / 1000;
    let fraction = (magnitude % 1000) * 10;
    if degrees >= MAX_DEGREES {
        return Err(Tmp100Error::Overflow);
    }

    let mut buf = [0u8; READING_LEN];
    let mut w = SliceWriter {
        buf: &mut buf,
        pos: 0,
    };
    writeln!(w, "{}{}.{:04}", sign, degrees, fraction).map_err(|_| Tmp100Error::Overflow)?;
    Ok(buf)
}
