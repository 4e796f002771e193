//! TMP100 寄存器映射与访问

use device::I2cClient;

use crate::Tmp100Error;

/// 寄存器（8 位地址，16 位值）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RegisterId {
    /// 温度，只读
    Temperature = 0x00,
    /// 配置
    Config = 0x01,
    /// 下限温度
    LowThreshold = 0x02,
    /// 上限温度
    HighThreshold = 0x03,
}

impl RegisterId {
    /// 寄存器地址
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// 绑定到一个从设备的寄存器访问器
#[derive(Debug)]
pub struct Tmp100Regs {
    client: I2cClient,
    max_register: u8,
}

impl Tmp100Regs {
    /// 创建访问器，地址超过 `max_register` 的寄存器不可访问
    pub fn new(client: I2cClient, max_register: u8) -> Self {
        Self {
            client,
            max_register,
        }
    }

    /// 从设备句柄
    pub fn client(&self) -> &I2cClient {
        &self.client
    }

    /// 读寄存器，返回高字节在前的原始值
    ///
    /// 一次调用恰好一次总线传输，可能阻塞；失败不重试。
    pub fn read(&self, reg: RegisterId) -> Result<u16, Tmp100Error> {
        if reg.addr() > self.max_register {
            return Err(Tmp100Error::InvalidRegister(reg.addr()));
        }
        let raw = self.client.read_word_swapped(reg.addr())?;
        log::debug!(
            "tmp100 {:#04x}: reg {:#04x} = {:#06x}",
            self.client.addr(),
            reg.addr(),
            raw
        );
        Ok(raw)
    }
}
