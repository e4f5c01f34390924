//! # scan 命令实现
//!
//! 列出图库中会被 apply 处理的图片及其大小。
//!
//! ## 依赖关系
//! - 使用 `cli/scan.rs` 定义的参数
//! - 使用 `batch/collector.rs`, `utils/filesize.rs`

use crate::batch::FileCollector;
use crate::cli::scan::ScanArgs;
use crate::error::{Result, WatermarkError};
use crate::utils::{filesize, output};

use std::path::PathBuf;
use tabled::{Table, Tabled};

/// 图片列表行
#[derive(Debug, Clone, Tabled)]
struct ImageRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Size")]
    size: String,
}

/// 执行 scan 命令
pub fn execute(args: ScanArgs) -> Result<bool> {
    output::print_header("Scanning Gallery");

    let files = FileCollector::new(&args.gallery)
        .with_pattern(args.pattern.as_deref())?
        .recursive(args.recursive)
        .collect()?;

    if files.is_empty() {
        return Err(WatermarkError::NoFilesFound {
            path: args.gallery.display().to_string(),
        });
    }

    println!("{}", Table::new(rows(&args.gallery, &files)));
    output::print_done(&format!("{} images found", files.len()));
    Ok(true)
}

/// 文件名相对图库显示
fn rows(gallery: &std::path::Path, files: &[PathBuf]) -> Vec<ImageRow> {
    files
        .iter()
        .enumerate()
        .map(|(i, path)| ImageRow {
            index: i + 1,
            file: path
                .strip_prefix(gallery)
                .unwrap_or(path)
                .display()
                .to_string(),
            size: filesize::file_size(path).unwrap_or_else(|| "?".to_string()),
        })
        .collect()
}
