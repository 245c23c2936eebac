//! 下行控制帧构建
//!
//! 包含所有下行指令帧的结构体：车道保持转向指令、HUD 显示状态、
//! 方向盘按键模拟。全部是无隐藏状态的纯变换，构建过程不抛错——
//! 越界输入（如超限力矩）由上游安全层负责预先裁剪。

use crate::types::{GearShifter, VisualAlert, WheelButton};
use crate::{
    CanFrame, ProtocolError,
    constants::{COUNTER_MODULUS, HUD_ALERT_CYCLES},
    ids::{BUS_POWERTRAIN, ID_LKAS_COMMAND, ID_LKAS_HUD, ID_WHEEL_BUTTONS},
};
use bilge::prelude::*;

// ============================================================================
// 车道保持转向指令
// ============================================================================

/// 车道保持转向指令 (LKAS_COMMAND 0x292)
///
/// 字节布局：
/// - Byte 0-1: 转向力矩，11-bit，偏移 +1024（0 力矩 = 1024），
///   高位在前（Byte 0 低 3 位为高位）
/// - Byte 2: Bit 0 高力矩模式（车速足够高时需要更大增益，
///   阈值由调用方持有）
/// - Byte 3: 低 4 位滚动计数器（当前控制周期帧号 mod 16）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LkasCommand {
    /// 带符号转向力矩指令（调用方已裁剪到 [-1024, 1023]）
    pub apply_torque: i16,
    /// 高力矩模式
    pub high_torque: bool,
    /// 控制周期帧号（打包时取 mod 16）
    pub frame: u32,
}

impl LkasCommand {
    pub fn new(apply_torque: i16, high_torque: bool, frame: u32) -> Self {
        Self { apply_torque, high_torque, frame }
    }

    /// 转换为 CAN 帧
    pub fn to_frame(self) -> CanFrame {
        // 11-bit 偏移编码；越界力矩由安全层负责，这里只按位截断
        let magnitude = ((self.apply_torque as i32 + 1024) as u16) & 0x7FF;
        let mut data = [0u8; 8];
        data[0] = (magnitude >> 8) as u8;
        data[1] = (magnitude & 0xFF) as u8;
        data[2] = self.high_torque as u8;
        data[3] = (self.frame % COUNTER_MODULUS) as u8;
        CanFrame::new(ID_LKAS_COMMAND, &data, BUS_POWERTRAIN)
    }

    /// 从 CAN 帧解析（用于回环校验和录制分析）
    pub fn from_frame(frame: CanFrame) -> Result<Self, ProtocolError> {
        if frame.id != ID_LKAS_COMMAND {
            return Err(ProtocolError::InvalidCanId { id: frame.id });
        }
        if frame.len < 4 {
            return Err(ProtocolError::InvalidLength {
                expected: 4,
                actual: frame.len as usize,
            });
        }
        let magnitude = (((frame.data[0] as u16) << 8) | frame.data[1] as u16) & 0x7FF;
        Ok(Self {
            apply_torque: magnitude as i16 - 1024,
            high_torque: frame.data[2] & 0x01 != 0,
            frame: (frame.data[3] & 0x0F) as u32,
        })
    }
}

// ============================================================================
// HUD 显示状态
// ============================================================================

/// 需要立即接管时的固定字面覆盖负载
///
/// 绕过常规编码，直接显示紧急告警图标状态。
const STEER_REQUIRED_PAYLOAD: [u8; 8] = [0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, 0x00];

/// HUD 显示状态指令 (LKAS_HUD 0x2A6)
///
/// 控制仪表上车道保持图标的显示。字节布局：
/// - Byte 0: 低 2 位图标颜色（1 白色 / 2 绿色 / 3 激活）
/// - Byte 1: 车型码（摄像头总线旁路捕获，原样回填）
/// - Byte 2: 低 4 位车道线样式（1 无 / 6 双白线 / 7+ 激活样式）
/// - Byte 3: 低 4 位告警闪烁码
#[derive(Debug, Clone, Copy, Default)]
pub struct LkasHudCommand {
    pub gear: GearShifter,
    pub lkas_active: bool,
    pub hud_alert: VisualAlert,
    /// 当前告警已显示的 HUD 周期数（4Hz）
    pub hud_count: u32,
    pub car_model: u8,
}

impl LkasHudCommand {
    /// 转换为 CAN 帧
    pub fn to_frame(self) -> CanFrame {
        if self.hud_alert == VisualAlert::SteerRequired {
            return CanFrame::new(ID_LKAS_HUD, &STEER_REQUIRED_PAYLOAD, BUS_POWERTRAIN);
        }

        // Park/Neutral 的默认显示；2019 款实测 1/1 比 0/0 稳定
        let mut color: u8 = 1;
        let mut lines: u8 = 1;
        let mut alerts: u8 = 0;

        if self.hud_count < HUD_ALERT_CYCLES {
            // 告警开始后的第一秒（4Hz x 1s）内闪烁
            alerts = 1;
        }
        if self.gear.allows_lkas_display() {
            if self.lkas_active {
                color = 3; // 1 白色，2 绿色，3 激活
                lines = 6; // 6 双白线，7+ 为单侧激活样式
            } else {
                color = 1;
                lines = 1;
            }
        }

        let data = [color & 0x03, self.car_model, lines & 0x0F, alerts & 0x0F, 0, 0, 0, 0];
        CanFrame::new(ID_LKAS_HUD, &data, BUS_POWERTRAIN)
    }
}

// ============================================================================
// 方向盘按键模拟
// ============================================================================

/// 方向盘按键位域（WHEEL_BUTTONS Byte 0）
///
/// Bit 0 对应 ACC_CANCEL，LSB first 位序与 DBC 定义一致。
#[bitsize(8)]
#[derive(FromBits, DebugBits, Clone, Copy, Default)]
pub struct WheelButtonFlags {
    pub acc_cancel: bool,     // Bit 0
    pub acc_resume: bool,     // Bit 1
    pub acc_speed_inc: bool,  // Bit 2
    pub acc_speed_dec: bool,  // Bit 3
    pub acc_follow_inc: bool, // Bit 4
    pub acc_follow_dec: bool, // Bit 5
    pub reserved: u2,         // Bit 6-7
}

/// 方向盘按键模拟指令 (WHEEL_BUTTONS 0x23B)
///
/// 把指定按键信号置为给定按压值并附带滚动计数器，
/// 用于以编程方式模拟物理按键。
#[derive(Debug, Clone, Copy)]
pub struct WheelButtonCommand {
    pub button: WheelButton,
    pub pressed: bool,
    /// 控制周期帧号（打包时取 mod 16）
    pub frame: u32,
}

impl WheelButtonCommand {
    pub fn new(button: WheelButton, pressed: bool, frame: u32) -> Self {
        Self { button, pressed, frame }
    }

    /// 转换为 CAN 帧
    pub fn to_frame(self) -> CanFrame {
        let mut flags = WheelButtonFlags::default();
        match self.button {
            WheelButton::Cancel => flags.set_acc_cancel(self.pressed),
            WheelButton::Resume => flags.set_acc_resume(self.pressed),
            WheelButton::Accel => flags.set_acc_speed_inc(self.pressed),
            WheelButton::Decel => flags.set_acc_speed_dec(self.pressed),
            WheelButton::FollowInc => flags.set_acc_follow_inc(self.pressed),
            WheelButton::FollowDec => flags.set_acc_follow_dec(self.pressed),
        }

        let mut data = [0u8; 8];
        data[0] = u8::from(flags);
        data[1] = (self.frame % COUNTER_MODULUS) as u8;
        CanFrame::new(ID_WHEEL_BUTTONS, &data, BUS_POWERTRAIN)
    }
}
