//! 协议常量定义
//!
//! 集中定义巡航速度边界、单位换算和转向判定阈值，
//! 避免在代码中散落"魔法数"。

/// 巡航设定速度上限（km/h）
pub const V_CRUISE_MAX: f64 = 135.0;

/// 巡航设定速度下限（km/h）
pub const V_CRUISE_MIN: f64 = 8.0;

/// 巡航短按步进（km/h），短按后对齐到此步进的整数倍
pub const V_CRUISE_DELTA: f64 = 8.0;

/// 巡航使能最低速度（km/h），FCA 车型最低可降到 32
pub const V_CRUISE_ENABLE_MIN: f64 = 32.0;

/// "从未设置过巡航速度"哨兵阈值（km/h）
///
/// 上次指令速度 >= 250 视为从未设置，重新从当前车速推导。
pub const V_CRUISE_UNSET: f64 = 250.0;

/// 英里每小时 → 公里每小时
///
/// 长按巡航按键时按此常量做非步进对齐的精细调整。
pub const MPH_TO_KPH: f64 = 1.609344;

/// 米每秒 → 公里每小时
pub const MS_TO_KPH: f64 = 3.6;

/// 公里每小时 → 米每秒
pub const KPH_TO_MS: f64 = 1.0 / 3.6;

/// 驾驶员转向力矩判定阈值（原始单位）
///
/// |TORQUE_DRIVER| 超过该值视为驾驶员握持方向盘。
pub const STEER_TORQUE_THRESHOLD: f64 = 120.0;

/// 静止判定速度阈值（m/s）
pub const STANDSTILL_EPS: f64 = 0.001;

/// 总线滚动计数器模数（4-bit COUNTER）
pub const COUNTER_MODULUS: u32 = 16;

/// HUD 告警闪烁周期数
///
/// HUD 帧按 4Hz 发送，告警开始后的 1 秒（4 个周期）内
/// 告警码置为 "on"。
pub const HUD_ALERT_CYCLES: u32 = 4;
