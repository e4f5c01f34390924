//! # 统一错误处理模块
//!
//! 定义 watermarker 的所有错误类型，使用 `thiserror` 派生。
//!
//! 单个文件的合成失败不属于这里的错误：它们记录在 `RunOutcome.failed` 中，
//! 批处理继续执行。这里只包含会中止整个任务的情况。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use std::path::PathBuf;
use thiserror::Error;

/// watermarker 统一错误类型
#[derive(Error, Debug)]
pub enum WatermarkError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 外部工具（安装错误，在处理任何文件之前触发）
    // ─────────────────────────────────────────────────────────────
    #[error("External tool '{tool}' not found (searched: {searched})")]
    ToolNotFound { tool: String, searched: String },

    #[error("External tool is not executable: {}", .path.display())]
    ToolNotExecutable { path: PathBuf },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Output directory must differ from the gallery: {path}")]
    SameDirectory { path: String },

    #[error("No image files found in {path}")]
    NoFilesFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to start batch worker")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("Batch worker terminated unexpectedly")]
    WorkerPanicked,
}

impl WatermarkError {
    /// 是否为外部工具的安装错误
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            WatermarkError::ToolNotFound { .. } | WatermarkError::ToolNotExecutable { .. }
        )
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, WatermarkError>;
