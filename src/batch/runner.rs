//! # 批量水印执行器
//!
//! 按输入顺序逐个文件调用 composite，收集成功/失败/跳过结果。
//!
//! ## 功能
//! - 严格串行：同一时间只有一个外部进程
//! - 单个文件失败不会中止批处理
//! - 两个文件之间检查取消标记，取消后立即返回
//! - 通过 `BatchObserver` 报告进度与完成
//!
//! ## 依赖关系
//! - 被 `batch/worker.rs`, `commands/apply.rs` 调用
//! - 使用 `batch/command.rs` 构造命令，`batch/executor.rs` 执行命令

use super::cancel::CancellationToken;
use super::command::CompositeCommand;
use super::executor::{ProcessExecutor, ToolExecutor};
use crate::error::Result;
use crate::models::{BatchJob, FileStatus, RunOutcome};

use std::path::{Path, PathBuf};

/// 进度事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// 批处理开始
    RunStarted { total: usize },
    /// 某个文件开始处理
    FileStarted {
        index: usize,
        total: usize,
        file: PathBuf,
    },
    /// 某个文件处理结束
    FileFinished {
        index: usize,
        total: usize,
        file: PathBuf,
        /// 执行的命令行（命令无法构造时为空）
        command: String,
        error: bool,
        /// 外部工具的合并输出，或启动失败的原因
        output: String,
    },
}

/// 批处理观察者
pub trait BatchObserver {
    /// 每个进度事件调用一次
    fn on_progress(&mut self, event: &ProgressEvent);

    /// 取消生效时调用一次
    fn on_cancelled(&mut self) {}

    /// 每次运行恰好调用一次
    fn on_complete(&mut self, outcome: &RunOutcome);
}

/// 单个文件的处理结果
struct FileReport {
    status: FileStatus,
    command: String,
    output: String,
}

/// 批量水印执行器
pub struct BatchWatermarker<E = ProcessExecutor> {
    /// composite 可执行文件
    program: PathBuf,
    executor: E,
}

impl BatchWatermarker<ProcessExecutor> {
    /// 使用真实进程执行
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self::with_executor(program, ProcessExecutor)
    }
}

impl<E: ToolExecutor> BatchWatermarker<E> {
    /// 使用自定义执行器
    pub fn with_executor(program: impl Into<PathBuf>, executor: E) -> Self {
        Self {
            program: program.into(),
            executor,
        }
    }

    /// 只构造命令，不执行
    pub fn plan(&self, job: &BatchJob) -> Vec<Result<CompositeCommand>> {
        job.input_files
            .iter()
            .map(|file| self.command_for(job, file))
            .collect()
    }

    fn command_for(&self, job: &BatchJob, file: &Path) -> Result<CompositeCommand> {
        CompositeCommand::build(
            &self.program,
            &job.config,
            &job.watermark_file,
            file,
            &job.output_directory,
        )
    }

    /// 运行整个批处理
    ///
    /// 工具不可用时在任何通知之前返回错误；其余情况下单个文件的失败
    /// 只记录在结果中。
    pub fn run(
        &self,
        job: &BatchJob,
        token: &CancellationToken,
        observer: &mut dyn BatchObserver,
    ) -> Result<RunOutcome> {
        self.executor.check_available(&self.program)?;

        let total = job.len();
        let mut outcome = RunOutcome::default();

        tracing::info!(total, program = %self.program.display(), "batch started");
        observer.on_progress(&ProgressEvent::RunStarted { total });

        for (index, file) in job.input_files.iter().enumerate() {
            if token.is_cancelled() {
                outcome.was_cancelled = true;
                outcome
                    .skipped
                    .extend(job.input_files[index..].iter().cloned());
                tracing::info!(remaining = total - index, "batch cancelled");
                observer.on_cancelled();
                break;
            }

            observer.on_progress(&ProgressEvent::FileStarted {
                index,
                total,
                file: file.clone(),
            });

            let report = self.process_file(job, file);
            outcome.record(file.clone(), report.status);

            observer.on_progress(&ProgressEvent::FileFinished {
                index,
                total,
                file: file.clone(),
                command: report.command,
                error: report.status == FileStatus::Failed,
                output: report.output,
            });
        }

        tracing::info!(
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            skipped = outcome.skipped.len(),
            "batch finished"
        );
        observer.on_complete(&outcome);

        Ok(outcome)
    }

    /// 处理单个文件，不会返回错误
    fn process_file(&self, job: &BatchJob, file: &Path) -> FileReport {
        let command = match self.command_for(job, file) {
            Ok(cmd) => cmd,
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "cannot build command");
                return FileReport {
                    status: FileStatus::Failed,
                    command: String::new(),
                    output: e.to_string(),
                };
            }
        };

        let text = command.to_string();
        tracing::debug!(command = %text, "running composite");

        match self.executor.execute(&command) {
            Ok(out) if out.success => FileReport {
                status: FileStatus::Succeeded,
                command: text,
                output: out.output,
            },
            Ok(out) => {
                tracing::warn!(file = %file.display(), code = ?out.code, "composite failed");
                FileReport {
                    status: FileStatus::Failed,
                    command: text,
                    output: out.output,
                }
            }
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "composite could not be launched");
                FileReport {
                    status: FileStatus::Failed,
                    command: text,
                    output: format!("Failed to launch {}: {}", self.program.display(), e),
                }
            }
        }
    }
}
