//! 每周期原始信号快照
//!
//! 外部 CAN 解析器每个控制周期产出一份 `(消息, 信号) -> 数值` 的
//! 快照，周期内不可变，下一周期整体替换。解析器保证信号表里
//! 声明的每个信号都有值（解码值或默认值），所以读取永不失败。

use crate::signals::{SignalDef, find_signal};
use std::collections::HashMap;

/// 一条总线在当前周期的原始信号快照
///
/// `valid` 是解析器的聚合活性位：任一期望消息超期未到即为 false。
/// 本层信任该位，不重复推导。
#[derive(Debug, Clone)]
pub struct RawSignalSnapshot {
    table: &'static [SignalDef],
    values: HashMap<(&'static str, &'static str), f64>,
    valid: bool,
}

impl RawSignalSnapshot {
    /// 创建动力总线快照（所有信号取声明默认值）
    pub fn powertrain() -> Self {
        Self::with_table(crate::signals::POWERTRAIN_SIGNALS)
    }

    /// 创建摄像头总线快照
    pub fn camera() -> Self {
        Self::with_table(crate::signals::CAMERA_SIGNALS)
    }

    /// 基于任意信号表创建快照
    pub fn with_table(table: &'static [SignalDef]) -> Self {
        Self {
            table,
            values: HashMap::with_capacity(table.len()),
            valid: true,
        }
    }

    /// 写入一个解码值
    ///
    /// 键必须匹配信号表中的声明，未声明的键被忽略并返回 false
    /// （解析器不应该产出表外信号）。
    pub fn set(&mut self, message: &str, signal: &str, value: f64) -> bool {
        match find_signal(self.table, message, signal) {
            Some(def) => {
                self.values.insert((def.message, def.signal), value);
                true
            }
            None => false,
        }
    }

    /// 读取信号值
    ///
    /// 未被 `set` 覆盖的信号返回声明默认值。读取表外信号是
    /// 编程错误（debug 构建断言），release 下返回 0.0 而不是中断
    /// 控制周期。
    pub fn value(&self, message: &str, signal: &str) -> f64 {
        match find_signal(self.table, message, signal) {
            Some(def) => *self
                .values
                .get(&(def.message, def.signal))
                .unwrap_or(&def.default),
            None => {
                debug_assert!(false, "undeclared signal read: {message}/{signal}");
                0.0
            }
        }
    }

    /// 读取信号并按"非零即真"转布尔
    pub fn bool_value(&self, message: &str, signal: &str) -> bool {
        self.value(message, signal) != 0.0
    }

    /// 解析器的聚合活性位
    pub fn valid(&self) -> bool {
        self.valid
    }

    /// 设置聚合活性位（由解析器写入）
    pub fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }
}
