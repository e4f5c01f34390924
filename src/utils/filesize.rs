//! # 文件大小格式化
//!
//! 十进制单位，保留一位截断小数，例如 `1234` -> `1.2 KB`。
//!
//! ## 依赖关系
//! - 被 `commands/scan.rs`, `commands/apply.rs` 使用

use std::path::Path;

const SUFFIXES: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// 格式化字节数
pub fn format_size(bytes: u64) -> String {
    let mut unit = 0;
    let mut scale = 1u64;
    while unit + 1 < SUFFIXES.len() && bytes >= scale * 1000 {
        unit += 1;
        scale *= 1000;
    }

    if unit == 0 {
        return format!("{} {}", bytes, SUFFIXES[0]);
    }

    let whole = bytes / scale;
    let tenth = (bytes / (scale / 10)) % 10;
    format!("{}.{} {}", whole, tenth, SUFFIXES[unit])
}

/// 读取并格式化文件大小，读取失败时返回 None
pub fn file_size(path: &Path) -> Option<String> {
    std::fs::metadata(path).ok().map(|m| format_size(m.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(999), "999 B");
        assert_eq!(format_size(1000), "1.0 KB");
        assert_eq!(format_size(1299), "1.2 KB");
        assert_eq!(format_size(4_560_000), "4.5 MB");
        assert_eq!(format_size(7_000_000_000), "7.0 GB");
        assert_eq!(format_size(12_345_000_000_000), "12.3 TB");
        assert_eq!(format_size(5_000_000_000_000_000), "5000.0 TB");
    }
}
