//! 信号日志离线回放
//!
//! 日志是 JSONL：每行一个控制周期，包含两条总线的解码信号和
//! 上游控制器的指令。回放以 100Hz 的逻辑时基推进适配器，把
//! 归一化状态、巡航指令速度和下行帧以 JSON 打到 stdout。
//!
//! 行格式（所有字段可缺省）：
//!
//! ```json
//! {"pt": {"GEAR": {"PRNDL": 4}}, "cam": {}, "torque": 120, "lkas_active": true}
//! ```

use anyhow::{Context, Result};
use mopar_adapter::{CarAdapter, CarControl, CarParams, CruiseButtonEvent};
use mopar_protocol::{CanFrame, RawSignalSnapshot, VisualAlert, WheelButton};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// 逻辑控制周期（100Hz）
const CYCLE_DT: Duration = Duration::from_millis(10);

/// 日志里的单个控制周期
#[derive(Debug, Default, Deserialize)]
struct LogRecord {
    /// 动力总线信号：消息名 -> 信号名 -> 数值
    #[serde(default)]
    pt: HashMap<String, HashMap<String, f64>>,
    /// 摄像头总线信号
    #[serde(default)]
    cam: HashMap<String, HashMap<String, f64>>,
    /// 上游转向力矩指令
    #[serde(default)]
    torque: i16,
    #[serde(default)]
    lkas_active: bool,
    /// 置位时显示立即接管告警
    #[serde(default)]
    steer_required: bool,
}

/// 每周期的回放输出
#[derive(Debug, Serialize)]
struct CycleReport<'a> {
    cycle: u64,
    state: &'a mopar_adapter::VehicleState,
    v_cruise_kph: f64,
    frames: &'a [CanFrame],
}

/// 由边沿事件合成带按住时长的巡航按键事件
///
/// 释放沿才知道按住了多久：按下沿记起点周期，释放沿用周期差
/// 乘以逻辑时基。
#[derive(Debug, Default)]
struct PressDurationTracker {
    press_start: HashMap<WheelButton, u64>,
}

impl PressDurationTracker {
    fn synthesize(
        &mut self,
        cycle: u64,
        events: &[mopar_adapter::ButtonEvent],
    ) -> Vec<CruiseButtonEvent> {
        let mut out = Vec::new();
        for event in events {
            if event.pressed {
                self.press_start.entry(event.button).or_insert(cycle);
                out.push(CruiseButtonEvent::pressed(event.button));
            } else {
                let held_cycles = self
                    .press_start
                    .remove(&event.button)
                    .map_or(0, |start| cycle.saturating_sub(start));
                out.push(CruiseButtonEvent::released(
                    event.button,
                    CYCLE_DT * held_cycles as u32,
                ));
            }
        }
        out
    }
}

pub fn run(log_path: &Path, params: CarParams) -> Result<()> {
    let file = std::fs::File::open(log_path)
        .with_context(|| format!("failed to open log: {}", log_path.display()))?;
    let reader = BufReader::new(file);

    info!(variant = params.variant.fingerprint(), "starting replay");

    let mut adapter = CarAdapter::new(params);
    let mut durations = PressDurationTracker::default();
    let mut prev_enabled = false;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for (cycle, line) in reader.lines().enumerate() {
        let cycle = cycle as u64;
        let line = line.with_context(|| format!("failed to read log line {cycle}"))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: LogRecord = serde_json::from_str(&line)
            .with_context(|| format!("malformed log line {cycle}"))?;

        let cp = build_snapshot(RawSignalSnapshot::powertrain(), &record.pt);
        let cp_cam = build_snapshot(RawSignalSnapshot::camera(), &record.cam);

        adapter.update(&cp, &cp_cam);
        let events = durations.synthesize(cycle, adapter.button_events());

        let enabled = adapter.state().cruise.enabled;
        if enabled && !prev_enabled {
            adapter.initialize_cruise(&events);
        } else if enabled {
            adapter.update_cruise(&events);
        }
        prev_enabled = enabled;

        let control = CarControl {
            enabled,
            apply_torque: record.torque,
            lkas_active: record.lkas_active,
            hud_alert: if record.steer_required {
                VisualAlert::SteerRequired
            } else {
                VisualAlert::None
            },
            button_press: None,
        };
        let frames = adapter.apply(&control);

        let report = CycleReport {
            cycle,
            state: adapter.state(),
            v_cruise_kph: adapter.v_cruise_kph(),
            frames: &frames,
        };
        serde_json::to_writer(&mut out, &report)?;
        writeln!(out)?;
    }

    Ok(())
}

fn build_snapshot(
    mut snapshot: RawSignalSnapshot,
    signals: &HashMap<String, HashMap<String, f64>>,
) -> RawSignalSnapshot {
    for (message, fields) in signals {
        for (signal, value) in fields {
            if !snapshot.set(message, signal, *value) {
                warn!(message, signal, "ignoring undeclared signal");
            }
        }
    }
    snapshot
}
