//! # 取消标记
//!
//! 批处理所有者与后台线程之间唯一共享的可变状态。
//! 只在两个文件之间检查，不会打断正在运行的外部进程。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs`, `batch/worker.rs` 使用

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 可跨线程克隆的取消标记
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求取消，可从任意线程调用，重复调用无副作用
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_cancel_visible_across_clones() {
        let token = CancellationToken::new();
        let other = token.clone();
        assert!(!token.is_cancelled());

        thread::spawn(move || other.cancel()).join().unwrap();

        assert!(token.is_cancelled());
    }
}
