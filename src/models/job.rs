//! # 批处理任务与结果数据模型
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs`, `batch/worker.rs` 使用
//! - 被 `commands/apply.rs` 使用

use super::config::WatermarkConfig;
use serde::Serialize;
use std::path::PathBuf;

/// 一次批处理任务，开始运行后不可变
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// 按处理顺序排列的输入文件快照
    pub input_files: Vec<PathBuf>,
    /// 水印图片
    pub watermark_file: PathBuf,
    /// 输出目录（假定已存在且可写）
    pub output_directory: PathBuf,
    /// 合成参数
    pub config: WatermarkConfig,
}

impl BatchJob {
    pub fn new(
        input_files: Vec<PathBuf>,
        watermark_file: impl Into<PathBuf>,
        output_directory: impl Into<PathBuf>,
        config: WatermarkConfig,
    ) -> Self {
        BatchJob {
            input_files,
            watermark_file: watermark_file.into(),
            output_directory: output_directory.into(),
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.input_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_files.is_empty()
    }
}

/// 单个文件的最终状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Succeeded,
    Failed,
    Skipped,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::Succeeded => write!(f, "succeeded"),
            FileStatus::Failed => write!(f, "failed"),
            FileStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// 批处理结果，三个列表均保持输入顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
    /// 因取消而未处理的文件
    pub skipped: Vec<PathBuf>,
    pub was_cancelled: bool,
}

impl RunOutcome {
    /// 记录一个文件的结果
    pub fn record(&mut self, file: PathBuf, status: FileStatus) {
        match status {
            FileStatus::Succeeded => self.succeeded.push(file),
            FileStatus::Failed => self.failed.push(file),
            FileStatus::Skipped => self.skipped.push(file),
        }
    }

    /// 总文件数
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len() + self.skipped.len()
    }

    /// 没有失败也没有跳过
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    /// 按状态展开为 (状态, 路径) 序列
    pub fn entries(&self) -> impl Iterator<Item = (FileStatus, &PathBuf)> {
        self.succeeded
            .iter()
            .map(|p| (FileStatus::Succeeded, p))
            .chain(self.failed.iter().map(|p| (FileStatus::Failed, p)))
            .chain(self.skipped.iter().map(|p| (FileStatus::Skipped, p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_total() {
        let mut outcome = RunOutcome::default();
        outcome.record("a.jpg".into(), FileStatus::Succeeded);
        outcome.record("b.jpg".into(), FileStatus::Failed);
        outcome.record("c.jpg".into(), FileStatus::Skipped);

        assert_eq!(outcome.total(), 3);
        assert!(!outcome.is_clean());
        assert_eq!(outcome.failed, vec![PathBuf::from("b.jpg")]);

        let statuses: Vec<_> = outcome.entries().map(|(s, _)| s).collect();
        assert_eq!(
            statuses,
            vec![FileStatus::Succeeded, FileStatus::Failed, FileStatus::Skipped]
        );
    }
}
