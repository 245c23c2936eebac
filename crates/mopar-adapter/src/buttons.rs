//! 巡航按键边沿检测
//!
//! 跨周期保留上一帧的按键布尔值，检测按下/释放跳变。
//! 顺序敏感：必须先比较再提交本帧值。

use crate::state::ButtonEvent;
use mopar_protocol::WheelButton;
use smallvec::SmallVec;

/// 单个按键在当前周期的读数和跳变标志
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonReading {
    pub pressed: bool,
    /// 与上一周期不同（按下沿或释放沿）
    pub changed: bool,
}

/// 三个巡航按键的当前周期边沿快照
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonEdges {
    pub resume: ButtonReading,
    pub accel: ButtonReading,
    pub decel: ButtonReading,
}

impl ButtonEdges {
    /// 构建离散按键事件
    ///
    /// 与上游接口约定一致：按住期间每周期都产生事件
    /// （pressed = true），释放沿产生一个 pressed = false 事件。
    pub fn events(&self) -> SmallVec<[ButtonEvent; 3]> {
        let mut events = SmallVec::new();
        let pairs = [
            (WheelButton::Accel, self.accel),
            (WheelButton::Decel, self.decel),
            (WheelButton::Resume, self.resume),
        ];
        for (button, reading) in pairs {
            if reading.pressed || reading.changed {
                events.push(ButtonEvent { button, pressed: reading.pressed });
            }
        }
        events
    }
}

/// 按键边沿跟踪器
///
/// 初始状态视为全部未按下，因此首个周期的 `changed` 只在
/// 按键确实按下时为真。
#[derive(Debug, Default)]
pub struct ButtonEdgeTracker {
    prev_resume: bool,
    prev_accel: bool,
    prev_decel: bool,
}

impl ButtonEdgeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 输入当前周期读数，返回边沿快照
    ///
    /// 比较在提交之前完成；提交后上一帧值即被覆盖。
    pub fn update(&mut self, resume: bool, accel: bool, decel: bool) -> ButtonEdges {
        let edges = ButtonEdges {
            resume: ButtonReading { pressed: resume, changed: resume != self.prev_resume },
            accel: ButtonReading { pressed: accel, changed: accel != self.prev_accel },
            decel: ButtonReading { pressed: decel, changed: decel != self.prev_decel },
        };

        self.prev_resume = resume;
        self.prev_accel = accel;
        self.prev_decel = decel;

        edges
    }
}
