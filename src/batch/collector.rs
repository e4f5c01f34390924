//! # 图库文件收集器
//!
//! 从图库目录中收集待加水印的图片列表。
//!
//! ## 功能
//! - 按扩展名过滤（png, jpeg, jpg, tiff, webp，不区分大小写）
//! - 可选 glob 文件名模式
//! - 可选递归目录搜索
//! - 结果按路径排序
//!
//! ## 依赖关系
//! - 被 `commands/apply.rs`, `commands/scan.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use crate::error::{Result, WatermarkError};

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 可识别的图片扩展名
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpeg", "jpg", "tiff", "webp"];

/// 图库收集器
pub struct FileCollector {
    /// 图库目录
    gallery: PathBuf,
    /// 文件名模式
    pattern: Option<Pattern>,
    /// 是否递归
    recursive: bool,
}

impl FileCollector {
    /// 创建新的收集器
    pub fn new(gallery: impl Into<PathBuf>) -> Self {
        Self {
            gallery: gallery.into(),
            pattern: None,
            recursive: false,
        }
    }

    /// 设置文件名 glob 模式（空字符串表示不过滤）
    pub fn with_pattern(mut self, pattern: Option<&str>) -> Result<Self> {
        self.pattern = match pattern.map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) => Some(Pattern::new(p).map_err(|e| {
                WatermarkError::InvalidArgument(format!("Invalid pattern '{}': {}", p, e))
            })?),
            None => None,
        };
        Ok(self)
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有匹配的图片，按路径排序
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if !self.gallery.is_dir() {
            return Err(WatermarkError::DirectoryNotFound {
                path: self.gallery.display().to_string(),
            });
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files: Vec<PathBuf> = WalkDir::new(&self.gallery)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| self.matches(e.path()))
            .map(|e| e.into_path())
            .collect();

        files.sort();
        Ok(files)
    }

    /// 扩展名与模式同时满足
    fn matches(&self, path: &Path) -> bool {
        if !is_image(path) {
            return false;
        }

        match (&self.pattern, path.file_name().and_then(|n| n.to_str())) {
            (Some(pattern), Some(name)) => pattern.matches(name),
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

/// 是否为可识别的图片扩展名
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}
