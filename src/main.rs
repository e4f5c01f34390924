//! # watermarker - 批量图片水印工具
//!
//! 对图库目录中的每张图片调用一次 ImageMagick `composite`，
//! 把水印合成到输出目录中的同名文件。
//!
//! ## 子命令
//! - `apply` - 批量添加水印
//! - `scan`  - 列出会被处理的图片
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/    (收集、定位、命令构造、串行执行)
//!   │     └── models/   (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod utils;

use clap::Parser;
use cli::Cli;

/// 有文件处理失败或被跳过时的退出码
const EXIT_PARTIAL: i32 = 2;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    utils::logging::init(cli.verbose);

    match commands::run(cli.command) {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_PARTIAL),
        Err(e) => {
            utils::output::print_error(&format!("{}", e));
            if e.is_setup_error() {
                utils::output::print_warning(
                    "Install ImageMagick or point --composite / WATERMARKER_COMPOSITE at its composite binary",
                );
            }
            std::process::exit(1);
        }
    }
}
