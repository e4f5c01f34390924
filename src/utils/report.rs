//! # 批处理结果报告
//!
//! - 终端汇总表（`tabled`）
//! - 可选的 CSV 明细（`csv` + `serde`）
//!
//! ## 依赖关系
//! - 被 `commands/apply.rs` 使用
//! - 使用 `models/job.rs` 的 `RunOutcome`

use crate::error::{Result, WatermarkError};
use crate::models::{FileStatus, RunOutcome};

use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

/// 汇总表的一行
#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Files")]
    count: usize,
}

/// CSV 明细的一行
#[derive(Debug, Serialize)]
struct ReportRecord {
    status: FileStatus,
    file: String,
}

/// 生成汇总表文本
pub fn summary_table(outcome: &RunOutcome) -> String {
    let rows = vec![
        SummaryRow {
            status: FileStatus::Succeeded.to_string(),
            count: outcome.succeeded.len(),
        },
        SummaryRow {
            status: FileStatus::Failed.to_string(),
            count: outcome.failed.len(),
        },
        SummaryRow {
            status: FileStatus::Skipped.to_string(),
            count: outcome.skipped.len(),
        },
        SummaryRow {
            status: "total".to_string(),
            count: outcome.total(),
        },
    ];
    Table::new(rows).to_string()
}

/// 逗号分隔的文件名列表
pub fn file_names(files: &[PathBuf]) -> String {
    files
        .iter()
        .map(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// 保存结果明细到 CSV
pub fn save_report_csv(outcome: &RunOutcome, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for (status, file) in outcome.entries() {
        // 非 UTF-8 路径按 display 形式写出
        wtr.serialize(ReportRecord {
            status,
            file: file.display().to_string(),
        })?;
    }

    wtr.flush().map_err(|e| WatermarkError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
