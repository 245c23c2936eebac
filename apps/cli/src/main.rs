//! # Mopar CLI
//!
//! FCA 车辆适配层的离线工具。
//!
//! ## 用法
//!
//! ```bash
//! # 列出支持的车型指纹
//! mopar-cli variants
//!
//! # 查看某车型的标定参数（JSON）
//! mopar-cli params --variant "CHRYSLER PACIFICA HYBRID 2017"
//!
//! # 回放信号日志（JSONL，每行一个控制周期），输出归一化状态和下行帧
//! mopar-cli replay --log drive.jsonl --variant "JEEP GRAND CHEROKEE V6 2018"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod replay;

/// Mopar CLI - FCA 车辆适配层离线工具
#[derive(Parser, Debug)]
#[command(name = "mopar-cli")]
#[command(about = "Offline tools for the FCA vehicle adapter", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 列出支持的车型指纹
    Variants,

    /// 输出车型标定参数（JSON）
    Params {
        /// 车型指纹字符串
        #[arg(short, long)]
        variant: String,

        /// TOML 调参覆盖文件
        #[arg(short, long)]
        tuning: Option<PathBuf>,
    },

    /// 回放信号日志，输出每周期的归一化状态和下行帧
    Replay {
        /// JSONL 日志文件（每行一个控制周期）
        #[arg(short, long)]
        log: PathBuf,

        /// 车型指纹字符串
        #[arg(short, long)]
        variant: String,

        /// TOML 调参覆盖文件
        #[arg(short, long)]
        tuning: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Variants => {
            for variant in mopar_adapter::CarVariant::all() {
                println!("{}", variant.fingerprint());
            }
            Ok(())
        }
        Commands::Params { variant, tuning } => {
            let params = load_params(&variant, tuning.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&params)?);
            Ok(())
        }
        Commands::Replay { log, variant, tuning } => {
            let params = load_params(&variant, tuning.as_deref())?;
            replay::run(&log, params)
        }
    }
}

fn load_params(
    fingerprint: &str,
    tuning: Option<&std::path::Path>,
) -> Result<mopar_adapter::CarParams> {
    let mut params = mopar_adapter::CarParams::from_fingerprint(fingerprint)
        .with_context(|| format!("unsupported variant: {fingerprint}"))?;
    if let Some(path) = tuning {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read tuning file: {}", path.display()))?;
        params
            .apply_tuning(&toml_str)
            .with_context(|| format!("invalid tuning file: {}", path.display()))?;
    }
    Ok(params)
}
