//! 字符设备号分配规则

/// 次设备号位宽
pub const MINORBITS: u32 = 20;

/// 次设备号掩码
pub const MINORMASK: u32 = (1 << MINORBITS) - 1;

/// 动态分配主设备号的起点（从高往低分配）
pub const CHRDEV_MAJOR_DYN_START: u32 = 254;

/// 动态分配主设备号的终点（含）
pub const CHRDEV_MAJOR_DYN_END: u32 = 234;

