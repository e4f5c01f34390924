//! # 后台批处理线程
//!
//! 在单独线程上运行 `BatchWatermarker`，进度通过 `mpsc` 通道发送给所有者，
//! 所有者线程可以同时渲染进度并请求取消。
//!
//! ## 依赖关系
//! - 被 `commands/apply.rs` 调用
//! - 使用 `batch/runner.rs`, `batch/cancel.rs`

use super::cancel::CancellationToken;
use super::executor::ToolExecutor;
use super::runner::{BatchObserver, BatchWatermarker, ProgressEvent};
use crate::error::{Result, WatermarkError};
use crate::models::{BatchJob, RunOutcome};

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// 从后台线程发往所有者的消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Progress(ProgressEvent),
    Cancelled,
    Completed(RunOutcome),
}

/// 把观察者回调转发到通道
struct ChannelObserver {
    tx: Sender<BatchEvent>,
}

impl ChannelObserver {
    fn send(&self, event: BatchEvent) {
        // 接收端已丢弃时继续处理，结果仍可通过 join 取得
        let _ = self.tx.send(event);
    }
}

impl BatchObserver for ChannelObserver {
    fn on_progress(&mut self, event: &ProgressEvent) {
        self.send(BatchEvent::Progress(event.clone()));
    }

    fn on_cancelled(&mut self) {
        self.send(BatchEvent::Cancelled);
    }

    fn on_complete(&mut self, outcome: &RunOutcome) {
        self.send(BatchEvent::Completed(outcome.clone()));
    }
}

/// 运行中的批处理
pub struct WorkerHandle {
    events: Receiver<BatchEvent>,
    token: CancellationToken,
    handle: JoinHandle<Result<RunOutcome>>,
}

impl WorkerHandle {
    /// 事件接收端；线程退出后迭代结束
    pub fn events(&self) -> &Receiver<BatchEvent> {
        &self.events
    }

    /// 请求在下一个文件之前停止
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// 等待线程完全退出
    pub fn join(self) -> Result<RunOutcome> {
        self.handle
            .join()
            .map_err(|_| WatermarkError::WorkerPanicked)?
    }
}

/// 在后台线程上启动批处理
pub fn spawn<E>(watermarker: BatchWatermarker<E>, job: BatchJob) -> Result<WorkerHandle>
where
    E: ToolExecutor + 'static,
{
    spawn_with_token(watermarker, job, CancellationToken::new())
}

/// 使用已有的取消标记启动
pub fn spawn_with_token<E>(
    watermarker: BatchWatermarker<E>,
    job: BatchJob,
    token: CancellationToken,
) -> Result<WorkerHandle>
where
    E: ToolExecutor + 'static,
{
    let (tx, rx) = mpsc::channel();
    let worker_token = token.clone();

    let handle = thread::Builder::new()
        .name("watermark-batch".to_string())
        .spawn(move || {
            let mut observer = ChannelObserver { tx };
            watermarker.run(&job, &worker_token, &mut observer)
        })
        .map_err(WatermarkError::WorkerSpawn)?;

    Ok(WorkerHandle {
        events: rx,
        token,
        handle,
    })
}
