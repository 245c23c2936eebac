//! 信号表声明
//!
//! 静态声明本层从哪些消息读取哪些信号、默认值和期望更新频率。
//! 外部 CAN 解析器按此表解码，并保证每个声明的信号每周期都有值
//! （解码值或默认值），本层永远观察不到"缺失"。
//!
//! 解析器同时按 `MessageRate` 做活性校验（消息超期未到则拉低
//! 聚合有效位），本层只消费该布尔，不重复推导。

/// 单个信号的声明：从哪条消息读哪个信号，缺省值是多少
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalDef {
    pub message: &'static str,
    pub signal: &'static str,
    pub default: f64,
}

/// 消息的期望更新频率（Hz），供解析器做活性校验
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRate {
    pub message: &'static str,
    pub hz: u16,
}

const fn sig(message: &'static str, signal: &'static str, default: f64) -> SignalDef {
    SignalDef { message, signal, default }
}

/// 动力总线（bus 0）信号表
pub const POWERTRAIN_SIGNALS: &[SignalDef] = &[
    sig("GEAR", "PRNDL", 0.0),
    sig("DOORS", "DOOR_OPEN_FL", 0.0),
    sig("DOORS", "DOOR_OPEN_FR", 0.0),
    sig("DOORS", "DOOR_OPEN_RL", 0.0),
    sig("DOORS", "DOOR_OPEN_RR", 0.0),
    sig("BRAKE_2", "BRAKE_PRESSED_2", 0.0),
    sig("ACCEL_GAS_134", "ACCEL_134", 0.0),
    sig("SPEED_1", "SPEED_LEFT", 0.0),
    sig("SPEED_1", "SPEED_RIGHT", 0.0),
    sig("WHEEL_SPEEDS", "WHEEL_SPEED_FL", 0.0),
    sig("WHEEL_SPEEDS", "WHEEL_SPEED_RR", 0.0),
    sig("WHEEL_SPEEDS", "WHEEL_SPEED_RL", 0.0),
    sig("WHEEL_SPEEDS", "WHEEL_SPEED_FR", 0.0),
    sig("STEERING", "STEER_ANGLE", 0.0),
    sig("STEERING", "STEER_ANGLE_HIGH_PRECISION", 0.0),
    sig("STEERING", "STEERING_RATE", 0.0),
    sig("STEERING_LEVERS", "TURN_SIGNALS", 0.0),
    sig("STEERING_LEVERS", "HIGH_BEAM_FLASH", 0.0),
    sig("ACC_2", "ACC_STATUS_2", 0.0),
    sig("DASHBOARD", "ACC_SPEED_CONFIG_KPH", 0.0),
    sig("DASHBOARD", "CRUISE_STATE", 0.0),
    sig("DASHBOARD", "ACC_DISTANCE_CONFIG_2", 0.0),
    sig("EPS_STATUS", "TORQUE_DRIVER", 0.0),
    sig("EPS_STATUS", "TORQUE_MOTOR", 0.0),
    sig("EPS_STATUS", "LKAS_STATE", 1.0),
    sig("EPS_STATUS", "COUNTER", -1.0),
    sig("TRACTION_BUTTON", "TRACTION_OFF", 0.0),
    sig("SEATBELT_STATUS", "SEATBELT_DRIVER", 0.0),
    sig("WHEEL_BUTTONS", "COUNTER", -1.0),
    sig("WHEEL_BUTTONS", "ACC_RESUME", 0.0),
    sig("WHEEL_BUTTONS", "ACC_CANCEL", 0.0),
    sig("WHEEL_BUTTONS", "ACC_SPEED_INC", 0.0),
    sig("WHEEL_BUTTONS", "ACC_SPEED_DEC", 0.0),
    sig("WHEEL_BUTTONS", "ACC_FOLLOW_INC", 0.0),
    sig("WHEEL_BUTTONS", "ACC_FOLLOW_DEC", 0.0),
];

/// 动力总线消息频率表
pub const POWERTRAIN_RATES: &[MessageRate] = &[
    MessageRate { message: "BRAKE_2", hz: 50 },
    MessageRate { message: "EPS_STATUS", hz: 100 },
    MessageRate { message: "SPEED_1", hz: 100 },
    MessageRate { message: "WHEEL_SPEEDS", hz: 50 },
    MessageRate { message: "STEERING", hz: 100 },
    MessageRate { message: "ACC_2", hz: 50 },
    MessageRate { message: "GEAR", hz: 50 },
    MessageRate { message: "WHEEL_BUTTONS", hz: 50 },
    MessageRate { message: "ACCEL_GAS_134", hz: 50 },
    MessageRate { message: "DASHBOARD", hz: 15 },
    MessageRate { message: "STEERING_LEVERS", hz: 10 },
    MessageRate { message: "SEATBELT_STATUS", hz: 2 },
    MessageRate { message: "DOORS", hz: 1 },
    MessageRate { message: "TRACTION_BUTTON", hz: 1 },
];

/// 摄像头/LKAS 总线（bus 2）信号表
///
/// 这些是旁路字段：作为适配器内部状态保留到下一周期的命令编码，
/// 不进入 VehicleState 本体。
pub const CAMERA_SIGNALS: &[SignalDef] = &[
    sig("LKAS_COMMAND", "COUNTER", -1.0),
    sig("LKAS_HUD", "CAR_MODEL", -1.0),
    sig("LKAS_HEARTBIT", "LKAS_STATUS_OK", -1.0),
];

/// 摄像头总线消息频率表
pub const CAMERA_RATES: &[MessageRate] = &[
    MessageRate { message: "LKAS_COMMAND", hz: 100 },
    MessageRate { message: "LKAS_HEARTBIT", hz: 10 },
    MessageRate { message: "LKAS_HUD", hz: 4 },
];

/// 在信号表中查找声明（用于把动态键匹配到静态声明）
pub fn find_signal(
    table: &'static [SignalDef],
    message: &str,
    signal: &str,
) -> Option<&'static SignalDef> {
    table.iter().find(|def| def.message == message && def.signal == signal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_powertrain_signal_message_has_a_rate() {
        for def in POWERTRAIN_SIGNALS {
            assert!(
                POWERTRAIN_RATES.iter().any(|r| r.message == def.message),
                "message {} missing from rate table",
                def.message
            );
        }
    }

    #[test]
    fn test_every_camera_signal_message_has_a_rate() {
        for def in CAMERA_SIGNALS {
            assert!(
                CAMERA_RATES.iter().any(|r| r.message == def.message),
                "message {} missing from rate table",
                def.message
            );
        }
    }

    #[test]
    fn test_counter_defaults_are_sentinel() {
        // COUNTER 默认 -1：在收到第一帧之前可以区分"从未见过"
        let eps = find_signal(POWERTRAIN_SIGNALS, "EPS_STATUS", "COUNTER").unwrap();
        assert_eq!(eps.default, -1.0);
        let lkas = find_signal(CAMERA_SIGNALS, "LKAS_COMMAND", "COUNTER").unwrap();
        assert_eq!(lkas.default, -1.0);
    }

    #[test]
    fn test_find_signal_unknown_is_none() {
        assert!(find_signal(POWERTRAIN_SIGNALS, "GEAR", "NO_SUCH_SIGNAL").is_none());
        assert!(find_signal(POWERTRAIN_SIGNALS, "NO_SUCH_MESSAGE", "PRNDL").is_none());
    }

    #[test]
    fn test_no_duplicate_declarations() {
        for (i, a) in POWERTRAIN_SIGNALS.iter().enumerate() {
            for b in &POWERTRAIN_SIGNALS[i + 1..] {
                assert!(
                    !(a.message == b.message && a.signal == b.signal),
                    "duplicate declaration {}/{}",
                    a.message,
                    a.signal
                );
            }
        }
    }
}
