//! # 终端输出
//!
//! 所有状态行都是 `<标签> <消息>` 的形式，标签的颜色由 [`Tag`] 决定。
//! 错误写入 stderr，其余写入 stdout。
//!
//! ## 依赖关系
//! - 被 `main.rs` 和所有 `commands/` 模块使用
//! - 使用 `colored` crate

use colored::{ColoredString, Colorize};

/// 标题栏与分隔线的宽度
const RULE_WIDTH: usize = 60;

/// 状态行的前缀标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Ok,
    Err,
    Warn,
    Info,
    Skip,
    Done,
    Dry,
}

impl Tag {
    fn label(self) -> &'static str {
        match self {
            Tag::Ok => "[OK]",
            Tag::Err => "[ERR]",
            Tag::Warn => "[WARN]",
            Tag::Info => "[*]",
            Tag::Skip => "[SKIP]",
            Tag::Done => "[DONE]",
            Tag::Dry => "[DRY]",
        }
    }

    fn styled(self) -> ColoredString {
        let label = self.label();
        match self {
            Tag::Ok | Tag::Done => label.green().bold(),
            Tag::Err => label.red().bold(),
            Tag::Warn => label.yellow().bold(),
            Tag::Info => label.blue().bold(),
            Tag::Skip => label.dimmed(),
            Tag::Dry => label.cyan().bold(),
        }
    }
}

fn tagged(tag: Tag, msg: &str) -> String {
    format!("{} {}", tag.styled(), msg)
}

fn rule() -> ColoredString {
    "─".repeat(RULE_WIDTH).dimmed()
}

pub fn print_success(msg: &str) {
    println!("{}", tagged(Tag::Ok, msg));
}

pub fn print_error(msg: &str) {
    eprintln!("{}", tagged(Tag::Err, msg));
}

pub fn print_warning(msg: &str) {
    println!("{}", tagged(Tag::Warn, msg));
}

pub fn print_info(msg: &str) {
    println!("{}", tagged(Tag::Info, msg));
}

/// 跳过或取消相关的提示
pub fn print_skip(msg: &str) {
    println!("{}", tagged(Tag::Skip, msg));
}

pub fn print_done(msg: &str) {
    println!("{}", tagged(Tag::Done, msg));
}

/// dry-run 时打印一条计划执行的命令，命令本身变暗
pub fn print_command(cmd: &str) {
    println!("{}", tagged(Tag::Dry, &cmd.dimmed().to_string()));
}

/// 打印标题栏
pub fn print_header(title: &str) {
    println!("\n{}", rule());
    println!("  {}", title.bold());
    println!("{}\n", rule());
}

pub fn print_separator() {
    println!("{}", rule());
}
