//! # 批量水印模块
//!
//! 对图库中的每张图片调用一次 composite，串行执行。
//!
//! ## 功能
//! - 收集图库文件列表
//! - 定位 composite 可执行文件
//! - 为每个文件构造命令并执行
//! - 成功/失败/跳过统计与协作式取消
//! - 后台线程 + 通道的进度报告
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 中的任务与参数定义

pub mod cancel;
pub mod collector;
pub mod command;
pub mod executor;
pub mod locator;
pub mod runner;
pub mod worker;

pub use cancel::CancellationToken;
pub use collector::FileCollector;
pub use command::CompositeCommand;
pub use locator::ToolLocator;
pub use runner::{BatchObserver, BatchWatermarker, ProgressEvent};
pub use worker::{BatchEvent, WorkerHandle};
