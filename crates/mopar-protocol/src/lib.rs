//! # Mopar Protocol
//!
//! FCA（Chrysler/Jeep）车辆 CAN 总线协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `ids`: CAN 消息地址常量定义
//! - `constants`: 巡航/转向相关协议常量
//! - `signals`: 信号表声明（供外部 CAN 解析器使用）
//! - `snapshot`: 每周期原始信号快照
//! - `types`: 总线枚举值的类型化定义
//! - `command`: 下行控制帧构建（LKAS 指令 / HUD 显示 / 按键模拟）
//!
//! ## 职责边界
//!
//! 本层不做 CAN 帧的位解包、校验和/计数器校验——这些由外部解析器
//! 完成。本层只声明需要哪些信号（`signals`），消费解析结果
//! （`snapshot`），并构建下行帧（`command`）。

pub mod command;
pub mod constants;
pub mod ids;
pub mod signals;
pub mod snapshot;
pub mod types;

// 重新导出常用类型
pub use command::*;
pub use constants::*;
pub use ids::*;
pub use signals::*;
pub use snapshot::*;
pub use types::*;

/// CAN 2.0 标准帧的统一抽象
///
/// # 设计目的
///
/// `CanFrame` 是本层和总线传输层之间的中间抽象：
/// - **层次解耦**：命令编码不依赖底层 CAN 实现
/// - **统一接口**：下行帧对传输层不透明（id + payload + bus），
///   同一周期内的帧可以被传输层重排（各帧 id 互斥，无语义影响）
///
/// # 设计特性
///
/// - **Copy trait**：零成本复制，适合 100Hz 控制周期
/// - **固定 8 字节**：避免堆分配
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CanFrame {
    /// CAN 消息地址（11-bit 标准帧）
    pub id: u32,

    /// 帧数据（固定 8 字节，未使用部分为 0）
    pub data: [u8; 8],

    /// 有效数据长度 (0-8)
    pub len: u8,

    /// 总线索引（0 = 动力总线，2 = 摄像头/LKAS 总线）
    pub bus: u8,
}

impl CanFrame {
    /// 创建标准帧
    pub fn new(id: u32, data: &[u8], bus: u8) -> Self {
        let mut fixed_data = [0u8; 8];
        let len = data.len().min(8);
        fixed_data[..len].copy_from_slice(&data[..len]);

        Self {
            id,
            data: fixed_data,
            len: len as u8,
            bus,
        }
    }

    /// 获取数据切片（只包含有效数据）
    pub fn data_slice(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// 获取 CAN 消息地址
    pub fn id(&self) -> u32 {
        self.id
    }
}

use thiserror::Error;

/// 协议层错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid frame length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid CAN ID: 0x{id:X}")]
    InvalidCanId { id: u32 },

    #[error("Invalid value for field {field}: {value}")]
    InvalidValue { field: String, value: u8 },
}
