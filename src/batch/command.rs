//! # composite 命令构造
//!
//! 根据共用参数为每个输入文件生成一条 composite 命令：
//!
//! ```text
//! composite -watermark <o%> -gravity <G> -geometry <geom> -quality <q>
//!           [( <watermark> -resize <W>x<H>! ) | <watermark>] <source> <destination>
//! ```
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `models/config.rs`

use crate::error::{Result, WatermarkError};
use crate::models::WatermarkConfig;

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// quality 参数表示压缩级别 (1-10) 而非 1-100 的格式
pub const QUALITY_DIVIDING_EXTENSIONS: &[&str] = &["png", "tiff"];

/// 单个文件的有效 quality
///
/// PNG/TIFF 使用 `round(q / 10)`（四舍六入五成双），其它格式直接使用配置值；
/// 结果 ≤0 或 >100 时替换为 100。
pub fn effective_quality(source: &Path, configured: u8) -> u8 {
    let divides = source
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| QUALITY_DIVIDING_EXTENSIONS.contains(&e.as_str()));

    let q = if divides {
        (f64::from(configured) / 10.0).round_ties_even() as i32
    } else {
        i32::from(configured)
    };

    if q <= 0 || q > 100 {
        100
    } else {
        q as u8
    }
}

/// 输出路径 = 输出目录 + 源文件名
///
/// 不同目录下的同名文件会互相覆盖。
pub fn destination_for(source: &Path, output_directory: &Path) -> Result<PathBuf> {
    let name = source.file_name().ok_or_else(|| {
        WatermarkError::InvalidArgument(format!("no file name in '{}'", source.display()))
    })?;
    Ok(output_directory.join(name))
}

/// 一条待执行的外部命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl CompositeCommand {
    /// 为单个源文件构造命令
    pub fn build(
        program: &Path,
        config: &WatermarkConfig,
        watermark: &Path,
        source: &Path,
        output_directory: &Path,
    ) -> Result<Self> {
        let destination = destination_for(source, output_directory)?;
        let quality = effective_quality(source, config.quality());

        let mut args: Vec<OsString> = Vec::with_capacity(16);
        let mut push = |a: &OsStr| args.push(a.to_os_string());

        push("-watermark".as_ref());
        push(format!("{}%", config.opacity()).as_ref());
        push("-gravity".as_ref());
        push(config.gravity.keyword().as_ref());
        push("-geometry".as_ref());
        push(config.geometry().as_ref());
        push("-quality".as_ref());
        push(quality.to_string().as_ref());

        // 缩放只作用于水印子表达式
        match config.resize_to {
            Some(size) => {
                push("(".as_ref());
                push(watermark.as_os_str());
                push("-resize".as_ref());
                push(format!("{}!", size).as_ref());
                push(")".as_ref());
            }
            None => push(watermark.as_os_str()),
        }

        push(source.as_os_str());
        push(destination.as_os_str());

        Ok(CompositeCommand {
            program: program.to_path_buf(),
            args,
        })
    }
}

fn quote(arg: &OsStr) -> String {
    let text = arg.to_string_lossy();
    if text.is_empty() || text.chars().any(char::is_whitespace) {
        format!("\"{}\"", text)
    } else {
        text.into_owned()
    }
}

/// 类 shell 的命令行文本，用于进度报告和 dry-run
impl fmt::Display for CompositeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(self.program.as_os_str()))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}
