//! I2C 适配器的 Mock 实现

use alloc::sync::Arc;
use core::sync::atomic::{AtomicUsize, Ordering};
use device::{I2cAdapter, I2cError, I2cFunc};
use sync::Mutex;

/// 传输前回调，参数为寄存器地址
pub type TransferHook = Arc<dyn Fn(u8) + Send + Sync>;

const REG_COUNT: usize = 4;

struct MockState {
    /// 按设备字节序（高字节在前）保存的寄存器值
    regs: [u16; REG_COUNT],
    /// 持续返回的错误
    error: Option<I2cError>,
    /// 接下来若干次传输失败
    fail_next: usize,
    hook: Option<TransferHook>,
}

/// Mock I2C 适配器
///
/// 寄存器值按传感器的字节序设置，读出时按 SMBus 约定交换字节，
/// 与真实的大端传感器在线上看到的一致。
pub struct MockI2cAdapter {
    functionality: I2cFunc,
    state: Mutex<MockState>,
    transfers: AtomicUsize,
}

impl MockI2cAdapter {
    /// 支持 SMBus 字读写的适配器
    pub fn new() -> Arc<Self> {
        Self::with_functionality(
            I2cFunc::I2C | I2cFunc::SMBUS_BYTE_DATA | I2cFunc::SMBUS_WORD_DATA,
        )
    }

    /// 指定传输能力的适配器
    pub fn with_functionality(functionality: I2cFunc) -> Arc<Self> {
        Arc::new(Self {
            functionality,
            state: Mutex::new(MockState {
                regs: [0; REG_COUNT],
                error: None,
                fail_next: 0,
                hook: None,
            }),
            transfers: AtomicUsize::new(0),
        })
    }

    /// 设置寄存器值（高字节在前）
    pub fn set_register(&self, reg: u8, value: u16) {
        self.state.lock().regs[reg as usize] = value;
    }

    /// 之后的每次传输都返回 `error`，`None` 恢复正常
    pub fn set_error(&self, error: Option<I2cError>) {
        self.state.lock().error = error;
    }

    /// 接下来 `count` 次传输返回 [`I2cError::Timeout`]
    pub fn fail_next(&self, count: usize) {
        self.state.lock().fail_next = count;
    }

    /// 每次传输前调用 `hook`，可用于在传输中途阻塞调用者
    pub fn set_hook(&self, hook: Option<TransferHook>) {
        self.state.lock().hook = hook;
    }

    /// 已发起的传输次数（包括失败的）
    pub fn transfers(&self) -> usize {
        self.transfers.load(Ordering::SeqCst)
    }
}

impl I2cAdapter for MockI2cAdapter {
    fn name(&self) -> &str {
        "i2c-mock"
    }

    fn functionality(&self) -> I2cFunc {
        self.functionality
    }

    fn smbus_read_word_data(&self, _addr: u16, command: u8) -> Result<u16, I2cError> {
        self.transfers.fetch_add(1, Ordering::SeqCst);

        let hook = self.state.lock().hook.clone();
        if let Some(hook) = hook {
            hook(command);
        }

        let mut state = self.state.lock();
        if let Some(error) = state.error {
            return Err(error);
        }
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(I2cError::Timeout);
        }
        let value = state
            .regs
            .get(command as usize)
            .copied()
            .ok_or(I2cError::Nack)?;
        Ok(value.swap_bytes())
    }
}
