//! CAN 消息地址常量定义
//!
//! 只定义本层实际构建或引用的消息地址。上行信号按消息**名**
//! 声明（见 `signals`），位解包由外部解析器按 DBC 完成。

/// 动力总线索引
pub const BUS_POWERTRAIN: u8 = 0;

/// 摄像头/LKAS 总线索引
pub const BUS_CAMERA: u8 = 2;

// ============================================================================
// 下行帧地址
// ============================================================================

/// 车道保持转向指令 (658)
pub const ID_LKAS_COMMAND: u32 = 0x292;

/// 车道保持 HUD 显示状态 (678)
pub const ID_LKAS_HUD: u32 = 0x2A6;

/// 方向盘按键（上行读取 + 下行按键模拟共用，571）
pub const ID_WHEEL_BUTTONS: u32 = 0x23B;

// ============================================================================
// 上行帧地址（仅文档引用）
// ============================================================================

/// EPS 状态（周期帧计数器的来源，544）
pub const ID_EPS_STATUS: u32 = 0x220;
