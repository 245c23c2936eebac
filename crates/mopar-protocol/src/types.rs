//! 总线枚举值的类型化定义
//!
//! 原始整数信号一律通过显式映射转换为带标签的枚举，
//! 未定义的输入值落到显式的 "unknown"/"other" 标签上，
//! 绝不在运行时抛错（失败会中断控制周期）。

use num_enum::FromPrimitive;

/// canonical 档位
///
/// 原始 PRNDL 编码经车型专属查找表（适配器构造时建立）映射而来，
/// 未映射的编码降级为 `Unknown` 而不是报错。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GearShifter {
    Park,
    Reverse,
    Neutral,
    Drive,
    Low,
    /// 未映射的原始编码
    #[default]
    Unknown,
}

impl GearShifter {
    /// 档位是否允许车道保持显示为"激活"
    ///
    /// HUD 编码只在 Drive/Reverse/Low 下区分激活/待命配色，
    /// 其余档位一律中性显示。
    pub fn allows_lkas_display(self) -> bool {
        matches!(self, GearShifter::Drive | GearShifter::Reverse | GearShifter::Low)
    }
}

/// ACC 状态码（ACC_2 消息 ACC_STATUS_2 信号）
///
/// 已知语义的只有 `Engaged = 7`（仪表上 ACC 绿色）。该信号是
/// 多位字段，其余取值未逐一分类，统一落到 `Other` 并视为未接通。
/// 如果厂商消息存在多个"疑似接通"编码，本层只认文档化的 7。
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccStatus {
    /// ACC 已接通（仪表绿色）
    Engaged = 7,
    /// 其余所有状态码，一律视为未接通
    #[num_enum(catch_all)]
    Other(u8),
}

impl AccStatus {
    /// 是否接通（严格等于状态码 7）
    pub fn is_engaged(self) -> bool {
        self == AccStatus::Engaged
    }
}

impl Default for AccStatus {
    fn default() -> Self {
        AccStatus::Other(0)
    }
}

/// 转向灯状态（STEERING_LEVERS 消息 TURN_SIGNALS 信号）
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnSignal {
    Off = 0,
    Left = 1,
    Right = 2,
    /// 其余取值视为未打灯
    #[num_enum(catch_all)]
    Other(u8),
}

impl Default for TurnSignal {
    fn default() -> Self {
        TurnSignal::Off
    }
}

impl TurnSignal {
    pub fn left(self) -> bool {
        self == TurnSignal::Left
    }

    pub fn right(self) -> bool {
        self == TurnSignal::Right
    }
}

/// 方向盘巡航按键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WheelButton {
    Resume,
    Accel,
    Decel,
    Cancel,
    FollowInc,
    FollowDec,
}

impl WheelButton {
    /// 对应的 DBC 信号名（WHEEL_BUTTONS 消息内）
    pub fn signal_name(self) -> &'static str {
        match self {
            WheelButton::Resume => "ACC_RESUME",
            WheelButton::Accel => "ACC_SPEED_INC",
            WheelButton::Decel => "ACC_SPEED_DEC",
            WheelButton::Cancel => "ACC_CANCEL",
            WheelButton::FollowInc => "ACC_FOLLOW_INC",
            WheelButton::FollowDec => "ACC_FOLLOW_DEC",
        }
    }
}

/// HUD 视觉告警
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VisualAlert {
    #[default]
    None,
    /// 需要驾驶员立即接管转向（HUD 走固定字面覆盖负载）
    SteerRequired,
}
