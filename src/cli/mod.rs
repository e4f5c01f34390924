//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `apply`: 为图库中的所有图片添加水印
//! - `scan`: 列出图库中会被处理的图片
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: apply, scan

pub mod apply;
pub mod scan;

use clap::{Parser, Subcommand};

/// watermarker - 批量图片水印工具
#[derive(Parser)]
#[command(name = "watermarker")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Batch-apply a watermark to a folder of photos with ImageMagick's composite", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print diagnostic logs (overridden by RUST_LOG)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Watermark every image of a gallery folder into an output folder
    Apply(apply::ApplyArgs),

    /// List the images of a gallery folder that would be processed
    Scan(scan::ScanArgs),
}
