//! 适配器层错误类型定义
//!
//! 错误只出现在构造/配置阶段。周期内路径（归一化、按键边沿、
//! 巡航仲裁、命令编码）按设计不可失败——中断控制周期会丢掉
//! 活动控制回路的车辆状态更新。

use mopar_protocol::ProtocolError;
use thiserror::Error;

/// 适配器层错误类型
#[derive(Error, Debug)]
pub enum AdapterError {
    /// 未知车型指纹
    #[error("Unknown car variant: {0}")]
    UnknownVariant(String),

    /// 调参文件解析失败
    #[error("Tuning config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// 协议层错误
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}
