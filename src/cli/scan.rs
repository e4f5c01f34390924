//! # scan 子命令 CLI 定义
//!
//! 列出图库中可识别的图片
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/scan.rs`

use clap::Args;
use std::path::PathBuf;

/// scan 子命令参数
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Folder containing the photos
    pub gallery: PathBuf,

    /// Also list images in sub-folders
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Only list file names matching this glob pattern
    #[arg(long)]
    pub pattern: Option<String>,
}
