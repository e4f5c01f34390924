//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `models/`, `utils/`
//! - 子模块: apply, scan

pub mod apply;
pub mod scan;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令，返回是否所有文件都处理成功
pub fn run(cmd: Commands) -> Result<bool> {
    match cmd {
        Commands::Apply(args) => apply::execute(args),
        Commands::Scan(args) => scan::execute(args),
    }
}
