//! 内核命令行参数
//!
//! 存储从设备树中提取的 bootargs，供驱动按 `<模块名>.<键>=<值>` 的形式读取模块参数。

use alloc::string::String;
use lazy_static::lazy_static;
use sync::RwLock;

lazy_static! {
    // NOTE: RwLock 只在启动阶段有写操作，运行时均为读操作
    /// 内核命令行参数
    pub static ref CMDLINE: RwLock<String> = RwLock::new(String::new());
}

/// 设置内核命令行
pub fn set_cmdline(cmdline: &str) {
    *CMDLINE.write() = String::from(cmdline);
}

/// 遍历命令行中属于 `module` 的参数
///
/// 只返回形如 `module.key=value` 的项，产出 `(key, value)`；
/// 不带 `=` 的开关项产出空值。
pub fn cmdline_params<'a>(
    cmdline: &'a str,
    module: &'a str,
) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    cmdline.split_whitespace().filter_map(move |token| {
        let rest = token.strip_prefix(module)?.strip_prefix('.')?;
        match rest.split_once('=') {
            Some((key, value)) => Some((key, value)),
            None => Some((rest, "")),
        }
    })
}
