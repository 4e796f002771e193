//! I2C 设备驱动接口与匹配表

use super::I2cClient;

/// id 表项：按设备名匹配
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I2cDeviceId {
    /// 设备名（例如 `tmp100`）
    pub name: &'static str,
    /// 驱动私有数据
    pub driver_data: usize,
}

/// OF 匹配表项：按设备树 compatible 匹配
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfDeviceId {
    /// compatible 字符串（例如 `ti,tmp100`）
    pub compatible: &'static str,
}

/// I2C 设备驱动程序特征
pub trait I2cDriver: Send + Sync {
    /// 驱动名，在总线上唯一
    fn name(&self) -> &'static str;

    /// 按设备名匹配的 id 表
    fn id_table(&self) -> &'static [I2cDeviceId];

    /// 按 compatible 匹配的 OF 表
    fn of_match_table(&self) -> &'static [OfDeviceId] {
        &[]
    }

    /// 绑定设备
    ///
    /// 失败时返回正的错误码，设备保持未绑定。
    fn probe(&self, client: &I2cClient) -> Result<(), i32>;

    /// 解除绑定，必须释放 probe 获取的全部资源
    fn remove(&self, client: &I2cClient);
}

/// 在 id 表中查找与设备名相同的表项
pub fn i2c_match_id(
    table: &'static [I2cDeviceId],
    client: &I2cClient,
) -> Option<&'static I2cDeviceId> {
    table.iter().find(|id| id.name == client.name())
}

/// 在 OF 表中查找与设备 compatible 相同的表项
pub fn of_match_device(
    table: &'static [OfDeviceId],
    client: &I2cClient,
) -> Option<&'static OfDeviceId> {
    let compatible = client.compatible()?;
    table.iter().find(|id| id.compatible == compatible)
}

/// 判断驱动是否能驱动该设备：先查 OF 表，再查 id 表
pub fn i2c_match_device(driver: &dyn I2cDriver, client: &I2cClient) -> bool {
    of_match_device(driver.of_match_table(), client).is_some()
        || i2c_match_id(driver.id_table(), client).is_some()
}
