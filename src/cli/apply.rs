//! # apply 子命令 CLI 定义
//!
//! 批量为图库中的图片添加水印
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/apply.rs`

use crate::models::{Gravity, Offset, ResizeTo, WatermarkConfig};

use clap::Args;
use std::path::PathBuf;

/// apply 子命令参数
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Folder containing the photos to watermark
    pub gallery: PathBuf,

    /// Watermark image file
    #[arg(short, long)]
    pub watermark: PathBuf,

    /// Output folder (created if missing, must differ from the gallery)
    #[arg(short, long)]
    pub output: PathBuf,

    // ─────────────────────────────────────────────────────────────
    // Watermark options
    // ─────────────────────────────────────────────────────────────
    /// Output quality (1-100); PNG/TIFF use a tenth of it as compression level
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Watermark opacity in percent (1-100)
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub opacity: u8,

    /// Anchor of the watermark on the photo
    #[arg(long, value_enum, default_value_t = Gravity::Center)]
    pub gravity: Gravity,

    /// Pixel offset from the anchor (e.g., '+10-5' or '10,-5')
    #[arg(long, default_value = "+0+0", allow_hyphen_values = true)]
    pub offset: Offset,

    /// Resize the watermark to WIDTHxHEIGHT before compositing
    #[arg(long)]
    pub resize: Option<ResizeTo>,

    // ─────────────────────────────────────────────────────────────
    // Input selection
    // ─────────────────────────────────────────────────────────────
    /// Also process images in sub-folders (same-named files overwrite each other)
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Only process file names matching this glob pattern (e.g., 'IMG_*')
    #[arg(long)]
    pub pattern: Option<String>,

    // ─────────────────────────────────────────────────────────────
    // Execution control
    // ─────────────────────────────────────────────────────────────
    /// Path to ImageMagick's composite binary
    #[arg(long, env = "WATERMARKER_COMPOSITE")]
    pub composite: Option<PathBuf>,

    /// Cancel the remaining files once this many files have failed (>= 1)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_errors: Option<u64>,

    /// Only print the commands, do not run them
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Write a per-file CSV report (status,file)
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl ApplyArgs {
    /// 整批共用的水印参数
    pub fn watermark_config(&self) -> WatermarkConfig {
        WatermarkConfig::new(
            self.quality,
            self.opacity,
            self.gravity,
            self.offset,
            self.resize,
        )
    }
}
