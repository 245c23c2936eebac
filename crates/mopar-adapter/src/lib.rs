//! # Mopar Adapter
//!
//! FCA（Chrysler/Jeep）车辆适配层：原始 CAN 信号快照 → canonical
//! 车辆状态 → 下行控制帧
//!
//! ## 模块
//!
//! - `config`: 车型变体与标定参数
//! - `state`: canonical 车辆状态记录与按键事件
//! - `speed_filter`: 速度估计协作者接缝
//! - `buttons`: 巡航按键边沿检测
//! - `cruise`: 巡航设定速度仲裁
//! - `adapter`: 每车一例的适配器实例（周期调用链入口）
//! - `error`: 适配层错误类型
//!
//! ## 周期模型
//!
//! 宿主以约 100Hz 驱动：每周期先 `CarAdapter::update` 归一化，
//! 再按需推进巡航速度，最后 `CarAdapter::apply` 编码下行帧。
//! 全程单线程同步，周期内不挂起、不阻塞、不失败。

pub mod adapter;
pub mod buttons;
pub mod config;
pub mod cruise;
pub mod error;
pub mod speed_filter;
pub mod state;

pub use adapter::{CarAdapter, CarControl};
pub use buttons::{ButtonEdgeTracker, ButtonEdges, ButtonReading};
pub use config::{CarParams, CarTuning, CarVariant, STD_CARGO_KG};
pub use cruise::{CruiseButtonEvent, CruiseCommandState};
pub use error::AdapterError;
pub use speed_filter::{LowPassSpeedEstimator, PassthroughSpeedEstimator, SpeedEstimator};
pub use state::{ButtonEvent, CruiseState, VehicleState, WheelSpeeds};
