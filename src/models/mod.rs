//! # 数据模型模块
//!
//! 定义水印参数、批处理任务和运行结果。
//!
//! ## 依赖关系
//! - 被 `batch/`, `commands/`, `cli/` 使用
//! - 子模块: config, job

pub mod config;
pub mod job;

pub use config::{Gravity, Offset, ResizeTo, WatermarkConfig};
pub use job::{BatchJob, FileStatus, RunOutcome};
