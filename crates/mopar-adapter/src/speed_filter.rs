//! 速度估计协作者接缝
//!
//! 归一化层不实现速度滤波，只调用注入的估计器。宿主系统注入
//! 自己的 Kalman 滤波实现；这里附带一个一阶低通实现供测试和
//! 离线回放使用。

/// 速度估计器
///
/// 每周期输入原始融合速度，返回（滤波速度, 纵向加速度）。
pub trait SpeedEstimator: Send {
    fn update(&mut self, v_raw: f64) -> (f64, f64);
}

/// 一阶低通速度估计
///
/// 100Hz 周期下的指数平滑 + 差分加速度。首个样本直接透传，
/// 加速度为 0。
#[derive(Debug, Clone)]
pub struct LowPassSpeedEstimator {
    /// 周期（s）
    dt: f64,
    /// 平滑系数 dt / (rc + dt)
    alpha: f64,
    last_v: Option<f64>,
}

impl LowPassSpeedEstimator {
    pub fn new(dt: f64, rc: f64) -> Self {
        Self {
            dt,
            alpha: dt / (rc + dt),
            last_v: None,
        }
    }
}

impl Default for LowPassSpeedEstimator {
    fn default() -> Self {
        // 100Hz 控制周期，0.1s 时间常数
        Self::new(0.01, 0.1)
    }
}

impl SpeedEstimator for LowPassSpeedEstimator {
    fn update(&mut self, v_raw: f64) -> (f64, f64) {
        let (v, a) = match self.last_v {
            None => (v_raw, 0.0),
            Some(prev) => {
                let v = prev + self.alpha * (v_raw - prev);
                (v, (v - prev) / self.dt)
            }
        };
        self.last_v = Some(v);
        (v, a)
    }
}

/// 透传估计器（测试用：滤波速度 = 原始速度，加速度 = 0）
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughSpeedEstimator;

impl SpeedEstimator for PassthroughSpeedEstimator {
    fn update(&mut self, v_raw: f64) -> (f64, f64) {
        (v_raw, 0.0)
    }
}
