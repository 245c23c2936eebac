//! canonical 车辆状态记录
//!
//! 每个控制周期由归一化层从原始信号快照产出一份。单写者：
//! 状态归适配器实例独占，只在周期调用链内被改写一次。

use mopar_protocol::{GearShifter, TurnSignal, WheelButton};
use serde::Serialize;

/// 四轮轮速（原始传感单位）
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct WheelSpeeds {
    pub fl: f64,
    pub fr: f64,
    pub rl: f64,
    pub rr: f64,
}

/// 巡航状态
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CruiseState {
    /// 是否接通（严格等于 ACC 状态码 7）
    pub enabled: bool,
    /// 巡航主开关是否打开（仪表 CRUISE_STATE 非零）
    pub available: bool,
    /// 仪表设定速度（m/s，总线上的 km/h 已换算）
    pub speed: f64,
    /// 跟车距离系数（仪表 2-bit 档位查表所得）
    pub lead_distance_ratio: f64,
}

/// canonical 车辆状态
///
/// 不变式：
/// - `standstill` 当且仅当 `v_ego_raw <= 0.001`
/// - `steering_pressed` 当且仅当 `|steering_torque|` 超过车型阈值
#[derive(Debug, Clone, Serialize)]
pub struct VehicleState {
    // === 运动 ===
    pub wheel_speeds: WheelSpeeds,
    /// 原始融合纵向速度（左右轮速对的平均，m/s）
    pub v_ego_raw: f64,
    /// 滤波后纵向速度（m/s，速度估计协作者输出）
    pub v_ego: f64,
    /// 纵向加速度（m/s²，速度估计协作者输出）
    pub a_ego: f64,
    pub standstill: bool,

    // === 踏板 ===
    pub brake_pressed: bool,
    pub gas: f64,
    pub gas_pressed: bool,

    // === 转向 ===
    /// 转向角（度），粗信号 + 高精度残差信号相加
    pub steering_angle_deg: f64,
    pub steering_rate_deg: f64,
    /// 驾驶员力矩（原始单位）
    pub steering_torque: f64,
    /// EPS 电机力矩（原始单位）
    pub steering_torque_eps: f64,
    pub steering_pressed: bool,
    /// 车速低于车型最低转向速度，EPS 会拒绝力矩指令
    pub below_steer_speed: bool,
    /// EPS 暂时性故障（LKAS_STATE 报 4，或可转向车速下报 0）
    pub steer_fault_temporary: bool,

    // === 巡航 ===
    pub cruise: CruiseState,

    // === 车身/安全 ===
    /// 四门任一开启
    pub door_open: bool,
    /// 驾驶员安全带未扣（原始编码 1 或 2 均表示未扣）
    pub seatbelt_unlatched: bool,
    /// 牵引力控制被关闭
    pub esp_disabled: bool,
    pub turn_signal: TurnSignal,
    /// 远光一闪（通用拨杆开关）
    pub generic_toggle: bool,

    // === 标识 ===
    /// 周期帧计数器（EPS_STATUS COUNTER，-1 表示尚未见到）
    pub frame: i64,
    pub gear_shifter: GearShifter,
    /// 两条总线的解析器活性位与
    pub can_valid: bool,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            wheel_speeds: WheelSpeeds::default(),
            v_ego_raw: 0.0,
            v_ego: 0.0,
            a_ego: 0.0,
            standstill: false,
            brake_pressed: false,
            gas: 0.0,
            gas_pressed: false,
            steering_angle_deg: 0.0,
            steering_rate_deg: 0.0,
            steering_torque: 0.0,
            steering_torque_eps: 0.0,
            steering_pressed: false,
            below_steer_speed: false,
            steer_fault_temporary: false,
            cruise: CruiseState::default(),
            door_open: false,
            seatbelt_unlatched: false,
            esp_disabled: false,
            turn_signal: TurnSignal::Off,
            generic_toggle: false,
            // -1：尚未见到 EPS 帧，下发闸门保持关闭
            frame: -1,
            gear_shifter: GearShifter::Unknown,
            can_valid: false,
        }
    }
}

/// 按键离散事件（暴露给安全/仲裁协作者）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ButtonEvent {
    pub button: WheelButton,
    pub pressed: bool,
}
