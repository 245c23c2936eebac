//! 每车一例的适配器实例
//!
//! 持有全部跨周期可变状态（上一帧按键、巡航指令速度、HUD 告警
//! 计数、摄像头总线旁路字段），以独占所有权进入每个控制周期的
//! 调用链：归一化 → 按键/巡航更新 → 命令编码，严格顺序执行，
//! 无内部并行。多车仿真时每车独立实例，实例间零共享。

use crate::buttons::ButtonEdgeTracker;
use crate::config::CarParams;
use crate::cruise::{CruiseButtonEvent, CruiseCommandState};
use crate::speed_filter::{LowPassSpeedEstimator, SpeedEstimator};
use crate::state::{ButtonEvent, VehicleState, WheelSpeeds};
use mopar_protocol::{
    AccStatus, CanFrame, GearShifter, KPH_TO_MS, LkasCommand, LkasHudCommand, RawSignalSnapshot,
    STANDSTILL_EPS, TurnSignal, VisualAlert, WheelButton, WheelButtonCommand,
};
use smallvec::SmallVec;
use std::collections::HashMap;
use tracing::debug;

/// HUD 帧的发送周期（100Hz 控制周期 → 4Hz HUD）
const HUD_PERIOD_CYCLES: u32 = 25;

/// 指令执行状态（上游控制器给出，力矩已经过安全层裁剪）
#[derive(Debug, Clone, Copy, Default)]
pub struct CarControl {
    pub enabled: bool,
    /// 带符号转向力矩指令
    pub apply_torque: i16,
    /// 车道保持是否接管（HUD 显示用）
    pub lkas_active: bool,
    pub hud_alert: VisualAlert,
    /// 离散按键模拟（按键, 按压值）
    pub button_press: Option<(WheelButton, bool)>,
}

/// 车辆适配器
///
/// 单线程、同步、周期驱动（宿主约 100Hz 调用）。周期内任何
/// 操作都不挂起、不阻塞、不失败。
pub struct CarAdapter {
    params: CarParams,
    /// 原始 PRNDL 编码 → canonical 档位（构造时建立一次）
    shifter_values: HashMap<u8, GearShifter>,
    edge_tracker: ButtonEdgeTracker,
    speed_estimator: Box<dyn SpeedEstimator>,
    cruise: CruiseCommandState,
    state: VehicleState,
    button_events: SmallVec<[ButtonEvent; 3]>,

    // === 摄像头总线旁路字段（下一周期命令编码使用） ===
    lkas_counter: i64,
    lkas_car_model: i64,
    lkas_status_ok: bool,

    // === 非边沿按键原始读数 ===
    button_counter: i64,
    acc_cancel: bool,
    acc_follow_inc: bool,
    acc_follow_dec: bool,

    // === 命令编码状态 ===
    apply_frame: u32,
    hud_count: u32,
    prev_hud_alert: VisualAlert,
}

impl CarAdapter {
    /// 用默认速度估计器创建适配器
    pub fn new(params: CarParams) -> Self {
        Self::with_speed_estimator(params, Box::new(LowPassSpeedEstimator::default()))
    }

    /// 注入宿主自己的速度估计器
    pub fn with_speed_estimator(params: CarParams, speed_estimator: Box<dyn SpeedEstimator>) -> Self {
        Self {
            params,
            shifter_values: prndl_table(),
            edge_tracker: ButtonEdgeTracker::new(),
            speed_estimator,
            cruise: CruiseCommandState::new(),
            state: VehicleState::default(),
            button_events: SmallVec::new(),
            lkas_counter: -1,
            lkas_car_model: -1,
            lkas_status_ok: false,
            button_counter: -1,
            acc_cancel: false,
            acc_follow_inc: false,
            acc_follow_dec: false,
            apply_frame: 0,
            hud_count: 0,
            prev_hud_alert: VisualAlert::None,
        }
    }

    /// 归一化：由两条总线的原始信号快照产出本周期的车辆状态
    ///
    /// 每周期恰好调用一次，在 `apply` 之前。
    pub fn update(
        &mut self,
        cp: &RawSignalSnapshot,
        cp_cam: &RawSignalSnapshot,
    ) -> &VehicleState {
        let mut ret = VehicleState::default();

        ret.frame = cp.value("EPS_STATUS", "COUNTER") as i64;

        ret.door_open = cp.bool_value("DOORS", "DOOR_OPEN_FL")
            || cp.bool_value("DOORS", "DOOR_OPEN_FR")
            || cp.bool_value("DOORS", "DOOR_OPEN_RL")
            || cp.bool_value("DOORS", "DOOR_OPEN_RR");
        // 1 或 2 都表示未扣
        let seatbelt = cp.value("SEATBELT_STATUS", "SEATBELT_DRIVER");
        ret.seatbelt_unlatched = seatbelt == 1.0 || seatbelt == 2.0;

        ret.brake_pressed = cp.value("BRAKE_2", "BRAKE_PRESSED_2") == 5.0; // 仅人踩
        ret.gas = cp.value("ACCEL_GAS_134", "ACCEL_134");
        ret.gas_pressed = ret.gas > 1e-5;
        ret.esp_disabled = cp.value("TRACTION_BUTTON", "TRACTION_OFF") == 1.0;

        ret.wheel_speeds = WheelSpeeds {
            fl: cp.value("WHEEL_SPEEDS", "WHEEL_SPEED_FL"),
            fr: cp.value("WHEEL_SPEEDS", "WHEEL_SPEED_FR"),
            rl: cp.value("WHEEL_SPEEDS", "WHEEL_SPEED_RL"),
            rr: cp.value("WHEEL_SPEEDS", "WHEEL_SPEED_RR"),
        };
        // 两路独立测量的轮速对取平均作为原始融合速度
        ret.v_ego_raw =
            (cp.value("SPEED_1", "SPEED_LEFT") + cp.value("SPEED_1", "SPEED_RIGHT")) / 2.0;
        (ret.v_ego, ret.a_ego) = self.speed_estimator.update(ret.v_ego_raw);
        ret.standstill = !(ret.v_ego_raw > STANDSTILL_EPS);

        ret.turn_signal = TurnSignal::from(cp.value("STEERING_LEVERS", "TURN_SIGNALS") as u8);
        // 厂商把转向角拆成粗信号 + 高精度残差两个字段
        ret.steering_angle_deg = cp.value("STEERING", "STEER_ANGLE")
            + cp.value("STEERING", "STEER_ANGLE_HIGH_PRECISION");
        ret.steering_rate_deg = cp.value("STEERING", "STEERING_RATE");
        ret.gear_shifter = self
            .shifter_values
            .get(&(cp.value("GEAR", "PRNDL") as u8))
            .copied()
            .unwrap_or_default();

        let acc_status = AccStatus::from(cp.value("ACC_2", "ACC_STATUS_2") as u8);
        ret.cruise.enabled = acc_status.is_engaged();
        ret.cruise.available = cp.bool_value("DASHBOARD", "CRUISE_STATE");
        ret.cruise.speed = cp.value("DASHBOARD", "ACC_SPEED_CONFIG_KPH") * KPH_TO_MS;
        ret.cruise.lead_distance_ratio = self
            .params
            .lead_distance_ratio(cp.value("DASHBOARD", "ACC_DISTANCE_CONFIG_2") as u8);

        ret.steering_torque = cp.value("EPS_STATUS", "TORQUE_DRIVER");
        ret.steering_torque_eps = cp.value("EPS_STATUS", "TORQUE_MOTOR");
        ret.steering_pressed = ret.steering_torque.abs() > self.params.steer_torque_threshold;
        ret.below_steer_speed = ret.v_ego < self.params.min_steer_speed;
        // 4 = 明确故障；0 在可转向车速下说明 EPS 掉线
        let steer_state = cp.value("EPS_STATUS", "LKAS_STATE");
        ret.steer_fault_temporary =
            steer_state == 4.0 || (steer_state == 0.0 && ret.v_ego > self.params.min_steer_speed);

        ret.generic_toggle = cp.bool_value("STEERING_LEVERS", "HIGH_BEAM_FLASH");

        // 摄像头总线旁路捕获（不进入 VehicleState 本体）
        self.lkas_counter = cp_cam.value("LKAS_COMMAND", "COUNTER") as i64;
        self.lkas_car_model = cp_cam.value("LKAS_HUD", "CAR_MODEL") as i64;
        self.lkas_status_ok = cp_cam.value("LKAS_HEARTBIT", "LKAS_STATUS_OK") == 1.0;

        // 按键：先比较后提交
        self.button_counter = cp.value("WHEEL_BUTTONS", "COUNTER") as i64;
        let edges = self.edge_tracker.update(
            cp.bool_value("WHEEL_BUTTONS", "ACC_RESUME"),
            cp.bool_value("WHEEL_BUTTONS", "ACC_SPEED_INC"),
            cp.bool_value("WHEEL_BUTTONS", "ACC_SPEED_DEC"),
        );
        self.button_events = edges.events();
        self.acc_cancel = cp.bool_value("WHEEL_BUTTONS", "ACC_CANCEL");
        self.acc_follow_inc = cp.bool_value("WHEEL_BUTTONS", "ACC_FOLLOW_INC");
        self.acc_follow_dec = cp.bool_value("WHEEL_BUTTONS", "ACC_FOLLOW_DEC");

        ret.can_valid = cp.valid() && cp_cam.valid();

        self.state = ret;
        &self.state
    }

    /// 命令编码：由指令执行状态产出本周期的下行帧
    ///
    /// 在 `update` 之后调用。收到第一个 EPS 周期帧之前不下发
    /// 任何帧（总线计数器相位未知）。
    pub fn apply(&mut self, control: &CarControl) -> SmallVec<[CanFrame; 4]> {
        let mut frames = SmallVec::new();
        if self.state.frame < 0 {
            debug!("no EPS frame seen yet, holding off commands");
            return frames;
        }

        // 车速高到需要更大转向增益时置高力矩模式
        let moving_fast = self.state.v_ego > self.params.min_steer_speed;
        frames.push(
            LkasCommand::new(control.apply_torque, moving_fast, self.apply_frame).to_frame(),
        );

        if control.hud_alert != self.prev_hud_alert {
            self.hud_count = 0;
            self.prev_hud_alert = control.hud_alert;
        }
        if self.apply_frame % HUD_PERIOD_CYCLES == 0 {
            frames.push(
                LkasHudCommand {
                    gear: self.state.gear_shifter,
                    lkas_active: control.lkas_active,
                    hud_alert: control.hud_alert,
                    hud_count: self.hud_count,
                    car_model: self.lkas_car_model.clamp(0, 255) as u8,
                }
                .to_frame(),
            );
            self.hud_count += 1;
        }

        if let Some((button, pressed)) = control.button_press {
            frames.push(WheelButtonCommand::new(button, pressed, self.apply_frame).to_frame());
        }

        self.apply_frame = self.apply_frame.wrapping_add(1);
        frames
    }

    /// 由按键释放事件推进巡航指令速度
    pub fn update_cruise(&mut self, events: &[CruiseButtonEvent]) {
        let enabled = self.state.cruise.enabled;
        self.cruise.update(events, enabled, self.params.long_press());
    }

    /// 巡航接通时初始化指令速度
    pub fn initialize_cruise(&mut self, events: &[CruiseButtonEvent]) {
        self.cruise.initialize(self.state.v_ego, events);
    }

    /// 当前巡航指令速度（km/h）
    pub fn v_cruise_kph(&self) -> f64 {
        self.cruise.kph()
    }

    /// 本周期的车辆状态（只读视图）
    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    /// 本周期的按键离散事件
    pub fn button_events(&self) -> &[ButtonEvent] {
        &self.button_events
    }

    pub fn params(&self) -> &CarParams {
        &self.params
    }

    /// LKAS 心跳是否正常（摄像头总线旁路捕获）
    pub fn lkas_status_ok(&self) -> bool {
        self.lkas_status_ok
    }

    /// 摄像头 LKAS_COMMAND 滚动计数器
    pub fn lkas_counter(&self) -> i64 {
        self.lkas_counter
    }

    /// WHEEL_BUTTONS 滚动计数器
    pub fn button_counter(&self) -> i64 {
        self.button_counter
    }

    /// ACC 取消键原始读数（无边沿检测）
    pub fn acc_cancel(&self) -> bool {
        self.acc_cancel
    }

    /// 跟车距离加/减键原始读数（无边沿检测）
    pub fn follow_buttons(&self) -> (bool, bool) {
        (self.acc_follow_inc, self.acc_follow_dec)
    }
}

/// FCA 车系的 PRNDL 编码表
///
/// 家族内各变体共用一张表；未映射的编码由调用方降级为 Unknown。
fn prndl_table() -> HashMap<u8, GearShifter> {
    HashMap::from([
        (1, GearShifter::Park),
        (2, GearShifter::Reverse),
        (3, GearShifter::Neutral),
        (4, GearShifter::Drive),
        (5, GearShifter::Low),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CarParams, CarVariant};
    use crate::speed_filter::PassthroughSpeedEstimator;

    fn adapter() -> CarAdapter {
        CarAdapter::with_speed_estimator(
            CarParams::for_variant(CarVariant::PacificaHybrid2017),
            Box::new(PassthroughSpeedEstimator),
        )
    }

    #[test]
    fn test_prndl_table_maps_family_codes() {
        let table = prndl_table();
        assert_eq!(table[&1], GearShifter::Park);
        assert_eq!(table[&4], GearShifter::Drive);
        assert_eq!(table[&5], GearShifter::Low);
        assert!(!table.contains_key(&0));
    }

    #[test]
    fn test_apply_before_first_update_emits_nothing() {
        // 刚构造的适配器还没有任何总线输入，闸门必须关闭
        let mut adapter = adapter();
        assert!(adapter.apply(&CarControl::default()).is_empty());
    }

    #[test]
    fn test_apply_holds_off_before_first_eps_frame() {
        let mut adapter = adapter();
        // COUNTER 默认 -1：尚未见到 EPS 帧
        let cp = RawSignalSnapshot::powertrain();
        let cp_cam = RawSignalSnapshot::camera();
        adapter.update(&cp, &cp_cam);
        let frames = adapter.apply(&CarControl::default());
        assert!(frames.is_empty());
    }

    #[test]
    fn test_apply_emits_lkas_after_eps_frame() {
        let mut adapter = adapter();
        let mut cp = RawSignalSnapshot::powertrain();
        cp.set("EPS_STATUS", "COUNTER", 3.0);
        let cp_cam = RawSignalSnapshot::camera();
        adapter.update(&cp, &cp_cam);
        let frames = adapter.apply(&CarControl::default());
        assert!(frames.iter().any(|f| f.id == mopar_protocol::ID_LKAS_COMMAND));
    }

    #[test]
    fn test_hud_sent_every_25_cycles() {
        let mut adapter = adapter();
        let mut cp = RawSignalSnapshot::powertrain();
        cp.set("EPS_STATUS", "COUNTER", 0.0);
        let cp_cam = RawSignalSnapshot::camera();
        adapter.update(&cp, &cp_cam);

        let mut hud_frames = 0;
        for _ in 0..100 {
            let frames = adapter.apply(&CarControl::default());
            hud_frames += frames
                .iter()
                .filter(|f| f.id == mopar_protocol::ID_LKAS_HUD)
                .count();
        }
        assert_eq!(hud_frames, 4);
    }

    #[test]
    fn test_button_press_emulation_frame() {
        let mut adapter = adapter();
        let mut cp = RawSignalSnapshot::powertrain();
        cp.set("EPS_STATUS", "COUNTER", 0.0);
        let cp_cam = RawSignalSnapshot::camera();
        adapter.update(&cp, &cp_cam);

        let control = CarControl {
            button_press: Some((WheelButton::Resume, true)),
            ..Default::default()
        };
        let frames = adapter.apply(&control);
        assert!(frames.iter().any(|f| f.id == mopar_protocol::ID_WHEEL_BUTTONS));
    }
}
