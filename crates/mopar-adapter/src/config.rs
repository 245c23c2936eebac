//! 车型参数配置
//!
//! 每个车型变体一组可调标量（轴距、转向比、质量、执行器延迟、
//! 最低转向速度、四档跟车距离系数等）。变体在启动时由车辆指纹
//! 一次性选定，不走运行时继承链。
//!
//! 本层把参数当作注入的不透明配置消费，不做任何推导计算。

use crate::error::AdapterError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// 标准载荷（乘员 + 行李，kg），计入整备质量
pub const STD_CARGO_KG: f64 = 136.0;

/// 车型变体
///
/// 由指纹字符串一次性选定（指纹探测本身是外部协作者的职责）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarVariant {
    PacificaHybrid2017,
    PacificaHybrid2019,
    Pacifica2020,
    JeepCherokee,
    JeepCherokee2019,
    Chrysler300_2018,
}

impl CarVariant {
    /// 指纹字符串（与上游车型库一致）
    pub fn fingerprint(self) -> &'static str {
        match self {
            CarVariant::PacificaHybrid2017 => "CHRYSLER PACIFICA HYBRID 2017",
            CarVariant::PacificaHybrid2019 => "CHRYSLER PACIFICA HYBRID 2019",
            CarVariant::Pacifica2020 => "CHRYSLER PACIFICA 2020",
            CarVariant::JeepCherokee => "JEEP GRAND CHEROKEE V6 2018",
            CarVariant::JeepCherokee2019 => "JEEP GRAND CHEROKEE 2019",
            CarVariant::Chrysler300_2018 => "CHRYSLER 300 2018",
        }
    }

    /// 全部支持的变体
    pub fn all() -> &'static [CarVariant] {
        &[
            CarVariant::PacificaHybrid2017,
            CarVariant::PacificaHybrid2019,
            CarVariant::Pacifica2020,
            CarVariant::JeepCherokee,
            CarVariant::JeepCherokee2019,
            CarVariant::Chrysler300_2018,
        ]
    }
}

impl FromStr for CarVariant {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CarVariant::all()
            .iter()
            .copied()
            .find(|v| v.fingerprint() == s)
            .ok_or_else(|| AdapterError::UnknownVariant(s.to_string()))
    }
}

/// 车型参数
///
/// 数值来自对应车型的实车标定。`lead_distance_ratios` 按仪表
/// 2-bit 跟车距离档位（1~4 格）索引，每项独立可调。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarParams {
    pub variant: CarVariant,
    /// 轴距（m）
    pub wheelbase: f64,
    /// 转向比
    pub steer_ratio: f64,
    /// 整备质量 + 标准载荷（kg）
    pub mass: f64,
    /// 转向执行器延迟（s）
    pub steer_actuator_delay: f64,
    /// 最低转向速度（m/s），低于此速度 EPS 拒绝力矩指令
    pub min_steer_speed: f64,
    /// 驾驶员握持判定力矩阈值（原始单位）
    pub steer_torque_threshold: f64,
    /// 巡航按键长按判定时长（s）
    pub acc_button_long_press_s: f64,
    /// 跟车距离系数，按仪表档位 0-3 索引
    pub lead_distance_ratios: [f64; 4],
}

impl CarParams {
    /// 按变体取标定参数
    pub fn for_variant(variant: CarVariant) -> Self {
        // Pacifica Hybrid 2017 作为基准
        let mut params = Self {
            variant,
            wheelbase: 3.089,
            steer_ratio: 16.2,
            mass: 1964.0 + STD_CARGO_KG,
            steer_actuator_delay: 0.15,
            min_steer_speed: 3.8,
            steer_torque_threshold: mopar_protocol::STEER_TORQUE_THRESHOLD,
            acc_button_long_press_s: 1.0,
            lead_distance_ratios: [1.0, 1.0, 1.0, 1.0],
        };

        match variant {
            CarVariant::PacificaHybrid2017 => {}
            CarVariant::JeepCherokee | CarVariant::JeepCherokee2019 => {
                params.wheelbase = 2.91;
                params.steer_ratio = 12.7;
                params.steer_actuator_delay = 0.2;
            }
            CarVariant::Chrysler300_2018 => {
                params.wheelbase = 3.05308;
                params.steer_ratio = 15.5;
                params.mass = 1828.0 + STD_CARGO_KG;
                params.steer_actuator_delay = 0.38;
            }
            CarVariant::PacificaHybrid2019 | CarVariant::Pacifica2020 => {}
        }

        // 2019 款 EPS 固件抬高了最低转向速度
        if matches!(
            variant,
            CarVariant::PacificaHybrid2019 | CarVariant::Pacifica2020 | CarVariant::JeepCherokee2019
        ) {
            params.min_steer_speed = 17.5;
        }

        params
    }

    /// 由指纹字符串选定变体并取参数
    pub fn from_fingerprint(fingerprint: &str) -> Result<Self, AdapterError> {
        Ok(Self::for_variant(CarVariant::from_str(fingerprint)?))
    }

    /// 应用 TOML 调参覆盖
    pub fn apply_tuning(&mut self, toml_str: &str) -> Result<(), AdapterError> {
        let tuning: CarTuning = toml::from_str(toml_str)?;
        tuning.apply(self);
        Ok(())
    }

    /// 按仪表 2-bit 跟车档位取跟车距离系数
    ///
    /// 信号本身只有 2 bit，不该出现 3 以上的值；越界输入统一
    /// 落到第 4 档（与上游参考实现的 else 分支一致）。
    pub fn lead_distance_ratio(&self, config: u8) -> f64 {
        let index = if config <= 2 { config as usize } else { 3 };
        self.lead_distance_ratios[index]
    }

    /// 长按判定时长
    pub fn long_press(&self) -> Duration {
        Duration::from_secs_f64(self.acc_button_long_press_s)
    }
}

/// 运行时调参覆盖（所有字段可选，缺省保留标定值）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarTuning {
    pub lead_distance_ratios: Option<[f64; 4]>,
    pub acc_button_long_press_s: Option<f64>,
    pub steer_torque_threshold: Option<f64>,
    pub min_steer_speed: Option<f64>,
}

impl CarTuning {
    fn apply(&self, params: &mut CarParams) {
        if let Some(ratios) = self.lead_distance_ratios {
            params.lead_distance_ratios = ratios;
        }
        if let Some(s) = self.acc_button_long_press_s {
            params.acc_button_long_press_s = s;
        }
        if let Some(t) = self.steer_torque_threshold {
            params.steer_torque_threshold = t;
        }
        if let Some(v) = self.min_steer_speed {
            params.min_steer_speed = v;
        }
    }
}
