//! 巡航设定速度仲裁
//!
//! 由按键释放事件、按住时长和当前接通状态推进指令速度。
//! 只有**释放**触发调整：按住时长在释放时才可知。
//!
//! 短按（< 长按阈值）：向按键方向对齐到下一个步进倍数，
//! 然后裁剪到 [V_CRUISE_MIN, V_CRUISE_MAX]。
//!
//! 长按（>= 长按阈值）：加/减一个英制换算增量（非步进对齐），
//! 该路径**不做** [MIN, MAX] 裁剪——沿用上游参考实现的不对称行为
//! （疑似遗漏，未经宿主系统确认前不擅自修正，越界时记录告警）。

use mopar_protocol::{
    MPH_TO_KPH, MS_TO_KPH, V_CRUISE_DELTA, V_CRUISE_ENABLE_MIN, V_CRUISE_MAX, V_CRUISE_MIN,
    V_CRUISE_UNSET, WheelButton,
};
use std::time::Duration;

/// 巡航按键事件（带释放前按住时长）
#[derive(Debug, Clone, Copy)]
pub struct CruiseButtonEvent {
    pub button: WheelButton,
    pub pressed: bool,
    /// 释放前按住的时长（按下事件中无意义）
    pub press_duration: Duration,
}

impl CruiseButtonEvent {
    pub fn released(button: WheelButton, press_duration: Duration) -> Self {
        Self { button, pressed: false, press_duration }
    }

    pub fn pressed(button: WheelButton) -> Self {
        Self { button, pressed: true, press_duration: Duration::ZERO }
    }
}

/// 巡航指令速度状态
///
/// 初始值为"从未设置"哨兵之上，首次接通时经 `initialize`
/// 从当前车速推导。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CruiseCommandState {
    v_cruise_kph: f64,
}

impl Default for CruiseCommandState {
    fn default() -> Self {
        // 255 >= 哨兵 250，表示从未设置过
        Self { v_cruise_kph: 255.0 }
    }
}

impl CruiseCommandState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前指令速度（km/h）
    pub fn kph(&self) -> f64 {
        self.v_cruise_kph
    }

    /// 由按键释放事件推进指令速度
    ///
    /// 事件按时间顺序处理，同周期多个事件顺序生效，后一个
    /// 看到前一个的结果。最终结果无论走哪条路径都按
    /// `V_CRUISE_ENABLE_MIN` 托底。
    pub fn update(&mut self, events: &[CruiseButtonEvent], enabled: bool, long_press: Duration) {
        let mut v = self.v_cruise_kph;

        for event in events {
            if !enabled || event.pressed {
                continue;
            }
            let direction = match event.button {
                WheelButton::Accel => 1.0,
                WheelButton::Decel => -1.0,
                _ => continue,
            };

            if event.press_duration < long_press {
                // 短按：对齐到按键方向的下一个步进边界
                if direction > 0.0 {
                    v += V_CRUISE_DELTA - v.rem_euclid(V_CRUISE_DELTA);
                } else {
                    v -= V_CRUISE_DELTA - (V_CRUISE_DELTA - v).rem_euclid(V_CRUISE_DELTA);
                }
                v = v.clamp(V_CRUISE_MIN, V_CRUISE_MAX);
            } else {
                // 长按：英制精细调整，不做步进对齐，也不裁剪（见模块注释）
                v += direction * MPH_TO_KPH;
                if !(V_CRUISE_MIN..=V_CRUISE_MAX).contains(&v) {
                    tracing::warn!(
                        v_cruise_kph = v,
                        "long-press cruise adjustment left [{V_CRUISE_MIN}, {V_CRUISE_MAX}]"
                    );
                }
            }
        }

        self.v_cruise_kph = v.max(V_CRUISE_ENABLE_MIN);
    }

    /// 接通时初始化指令速度
    ///
    /// 上次指令速度低于哨兵（250）说明之前设置过：若本周期事件
    /// 里有 resume 按键则沿用上次值；否则由当前滤波车速推导，
    /// 裁剪到 [使能下限, 上限] 后取整。
    pub fn initialize(&mut self, v_ego: f64, events: &[CruiseButtonEvent]) {
        if self.v_cruise_kph < V_CRUISE_UNSET
            && events.iter().any(|e| e.button == WheelButton::Resume)
        {
            return;
        }
        self.v_cruise_kph = (v_ego * MS_TO_KPH)
            .clamp(V_CRUISE_ENABLE_MIN, V_CRUISE_MAX)
            .round();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_PRESS: Duration = Duration::from_secs(1);

    fn state_at(kph: f64) -> CruiseCommandState {
        CruiseCommandState { v_cruise_kph: kph }
    }

    fn accel_release(secs: f64) -> CruiseButtonEvent {
        CruiseButtonEvent::released(WheelButton::Accel, Duration::from_secs_f64(secs))
    }

    fn decel_release(secs: f64) -> CruiseButtonEvent {
        CruiseButtonEvent::released(WheelButton::Decel, Duration::from_secs_f64(secs))
    }

    #[test]
    fn test_short_press_accel_snaps_to_next_step() {
        let mut cruise = state_at(40.0);
        cruise.update(&[accel_release(0.5)], true, LONG_PRESS);
        assert_eq!(cruise.kph(), 48.0);
    }

    #[test]
    fn test_short_press_accel_from_unaligned_rounds_up() {
        let mut cruise = state_at(41.0);
        cruise.update(&[accel_release(0.5)], true, LONG_PRESS);
        assert_eq!(cruise.kph(), 48.0);
    }

    #[test]
    fn test_short_press_decel_rounds_down() {
        let mut cruise = state_at(47.0);
        cruise.update(&[decel_release(0.5)], true, LONG_PRESS);
        assert_eq!(cruise.kph(), 40.0);
    }

    #[test]
    fn test_repeated_accel_never_exceeds_max() {
        let mut cruise = state_at(40.0);
        for _ in 0..30 {
            cruise.update(&[accel_release(0.5)], true, LONG_PRESS);
            assert!(cruise.kph() <= V_CRUISE_MAX);
        }
        assert_eq!(cruise.kph(), V_CRUISE_MAX);
    }

    #[test]
    fn test_repeated_decel_floors_at_enable_min() {
        let mut cruise = state_at(135.0);
        for _ in 0..30 {
            cruise.update(&[decel_release(0.5)], true, LONG_PRESS);
            assert!(cruise.kph() >= V_CRUISE_ENABLE_MIN);
        }
        assert_eq!(cruise.kph(), V_CRUISE_ENABLE_MIN);
    }

    #[test]
    fn test_long_press_adds_mph_increment_unclipped() {
        let mut cruise = state_at(40.0);
        cruise.update(&[accel_release(2.0)], true, LONG_PRESS);
        // 非步进对齐的英制增量
        assert_eq!(cruise.kph(), 40.0 + MPH_TO_KPH);
    }

    #[test]
    fn test_long_press_skips_max_clip() {
        // 上游参考行为：长按路径不裁剪上限
        let mut cruise = state_at(135.0);
        cruise.update(&[accel_release(2.0)], true, LONG_PRESS);
        assert_eq!(cruise.kph(), 135.0 + MPH_TO_KPH);
        assert!(cruise.kph() > V_CRUISE_MAX);
    }

    #[test]
    fn test_long_press_decel_still_floored_at_enable_min() {
        let mut cruise = state_at(33.0);
        cruise.update(&[decel_release(2.0)], true, LONG_PRESS);
        // 33 - 1.609 = 31.39... 被使能下限托底
        assert_eq!(cruise.kph(), V_CRUISE_ENABLE_MIN);
    }

    #[test]
    fn test_press_events_do_not_change_speed() {
        let mut cruise = state_at(40.0);
        cruise.update(&[CruiseButtonEvent::pressed(WheelButton::Accel)], true, LONG_PRESS);
        assert_eq!(cruise.kph(), 40.0);
    }

    #[test]
    fn test_disabled_ignores_events() {
        let mut cruise = state_at(40.0);
        cruise.update(&[accel_release(0.5)], false, LONG_PRESS);
        assert_eq!(cruise.kph(), 40.0);
    }

    #[test]
    fn test_events_apply_sequentially() {
        let mut cruise = state_at(40.0);
        // 48 -> 56：第二个事件看到第一个的结果
        cruise.update(&[accel_release(0.5), accel_release(0.5)], true, LONG_PRESS);
        assert_eq!(cruise.kph(), 56.0);
    }

    #[test]
    fn test_resume_release_does_not_adjust() {
        let mut cruise = state_at(40.0);
        cruise.update(
            &[CruiseButtonEvent::released(WheelButton::Resume, Duration::from_secs(2))],
            true,
            LONG_PRESS,
        );
        assert_eq!(cruise.kph(), 40.0);
    }

    #[test]
    fn test_initialize_reuses_last_on_resume() {
        let mut cruise = state_at(72.0);
        cruise.initialize(25.0, &[CruiseButtonEvent::pressed(WheelButton::Resume)]);
        assert_eq!(cruise.kph(), 72.0);
    }

    #[test]
    fn test_initialize_derives_fresh_when_unset() {
        // 300 >= 哨兵 250：从未设置过，即使有 resume 也重新推导
        let mut cruise = state_at(300.0);
        cruise.initialize(25.0, &[CruiseButtonEvent::pressed(WheelButton::Resume)]);
        assert_eq!(cruise.kph(), (25.0 * MS_TO_KPH).round());
    }

    #[test]
    fn test_initialize_derives_fresh_without_resume() {
        let mut cruise = state_at(72.0);
        cruise.initialize(25.0, &[]);
        assert_eq!(cruise.kph(), 90.0);
    }

    #[test]
    fn test_initialize_clips_to_enable_min() {
        let mut cruise = state_at(300.0);
        cruise.initialize(2.0, &[]);
        // 2 m/s = 7.2 km/h，被使能下限托底
        assert_eq!(cruise.kph(), V_CRUISE_ENABLE_MIN);
    }

    #[test]
    fn test_initialize_clips_to_max() {
        let mut cruise = state_at(300.0);
        cruise.initialize(50.0, &[]);
        assert_eq!(cruise.kph(), V_CRUISE_MAX);
    }

    proptest::proptest! {
        #[test]
        fn prop_update_result_never_below_enable_min(
            start in 32.0f64..250.0,
            secs in 0.0f64..3.0,
            accel in proptest::bool::ANY,
        ) {
            let mut cruise = state_at(start);
            let event = if accel { accel_release(secs) } else { decel_release(secs) };
            cruise.update(&[event], true, LONG_PRESS);
            proptest::prop_assert!(cruise.kph() >= V_CRUISE_ENABLE_MIN);
        }

        #[test]
        fn prop_short_press_stays_within_bounds(
            start in 32.0f64..=135.0,
            accel in proptest::bool::ANY,
        ) {
            let mut cruise = state_at(start);
            let event = if accel { accel_release(0.3) } else { decel_release(0.3) };
            cruise.update(&[event], true, LONG_PRESS);
            proptest::prop_assert!(cruise.kph() >= V_CRUISE_ENABLE_MIN);
            proptest::prop_assert!(cruise.kph() <= V_CRUISE_MAX);
        }

        #[test]
        fn prop_short_press_result_is_step_aligned_or_clamped(
            start in 32.0f64..=135.0,
        ) {
            let mut cruise = state_at(start.floor());
            cruise.update(&[accel_release(0.3)], true, LONG_PRESS);
            let v = cruise.kph();
            let aligned = v.rem_euclid(V_CRUISE_DELTA) == 0.0;
            proptest::prop_assert!(aligned || v == V_CRUISE_MAX);
        }
    }
}
