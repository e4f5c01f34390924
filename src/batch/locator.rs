//! # composite 可执行文件定位
//!
//! 查找顺序：
//! 1. 显式指定的路径（`--composite` / `WATERMARKER_COMPOSITE`）
//! 2. 随程序分发的 `<程序目录>/resources/bin/<os>/composite[.exe]`
//! 3. `PATH` 中的每个目录
//!
//! ## 依赖关系
//! - 被 `commands/apply.rs` 调用
//! - 使用 `batch/executor.rs` 的可执行检查

use super::executor::ensure_executable;
use crate::error::{Result, WatermarkError};

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// 工具名（不含平台后缀）
pub const COMPOSITE: &str = "composite";

/// composite 定位器
#[derive(Debug, Clone)]
pub struct ToolLocator {
    explicit: Option<PathBuf>,
    bundle_dir: Option<PathBuf>,
    search_path: Option<OsString>,
}

impl ToolLocator {
    /// 使用当前进程环境创建定位器
    pub fn from_env(explicit: Option<PathBuf>) -> Self {
        let bundle_dir = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));

        Self {
            explicit,
            bundle_dir,
            search_path: env::var_os("PATH"),
        }
    }

    /// 替换分发目录
    pub fn with_bundle_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.bundle_dir = dir;
        self
    }

    /// 替换搜索路径
    pub fn with_search_path(mut self, path: Option<OsString>) -> Self {
        self.search_path = path;
        self
    }

    /// 带平台后缀的文件名
    pub fn binary_name() -> String {
        format!("{}{}", COMPOSITE, env::consts::EXE_SUFFIX)
    }

    /// 候选路径，按优先级排列
    pub fn candidates(&self) -> Vec<PathBuf> {
        if let Some(ref path) = self.explicit {
            return vec![path.clone()];
        }

        let name = Self::binary_name();
        let mut candidates = Vec::new();

        if let Some(ref dir) = self.bundle_dir {
            candidates.push(
                dir.join("resources")
                    .join("bin")
                    .join(env::consts::OS)
                    .join(&name),
            );
        }

        if let Some(ref path) = self.search_path {
            candidates.extend(env::split_paths(path).map(|dir| dir.join(&name)));
        }

        candidates
    }

    /// 返回第一个可执行的候选
    pub fn locate(&self) -> Result<PathBuf> {
        // 显式路径的错误原样上报
        if let Some(ref path) = self.explicit {
            ensure_executable(path)?;
            return Ok(path.clone());
        }

        let candidates = self.candidates();
        if let Some(found) = candidates.iter().find(|p| ensure_executable(p).is_ok()) {
            tracing::debug!(path = %found.display(), "located composite binary");
            return Ok(found.clone());
        }

        let searched = candidates
            .iter()
            .filter_map(|p| p.parent())
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");

        Err(WatermarkError::ToolNotFound {
            tool: Self::binary_name(),
            searched: if searched.is_empty() {
                "nothing".to_string()
            } else {
                searched
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_tool(dir: &Path) -> PathBuf {
        let tool = dir.join(ToolLocator::binary_name());
        fs::write(&tool, "#!/bin/sh\nexit 0\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        }
        tool
    }

    #[test]
    fn test_explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let tool = make_tool(dir.path());

        let locator = ToolLocator::from_env(Some(tool.clone()))
            .with_bundle_dir(None)
            .with_search_path(None);
        assert_eq!(locator.candidates(), vec![tool.clone()]);
        assert_eq!(locator.locate().unwrap(), tool);
    }

    #[test]
    fn test_explicit_missing_path_is_setup_error() {
        let dir = tempfile::tempdir().unwrap();
        let locator = ToolLocator::from_env(Some(dir.path().join("nope")));
        let err = locator.locate().unwrap_err();
        assert!(err.is_setup_error());
    }

    #[test]
    fn test_search_path_lookup() {
        let empty = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let tool = make_tool(bin.path());

        let path = env::join_paths([empty.path(), bin.path()]).unwrap();
        let locator = ToolLocator::from_env(None)
            .with_bundle_dir(None)
            .with_search_path(Some(path));

        assert_eq!(locator.locate().unwrap(), tool);
    }

    #[test]
    fn test_bundle_dir_precedes_search_path() {
        let bundle = tempfile::tempdir().unwrap();
        let nested = bundle
            .path()
            .join("resources")
            .join("bin")
            .join(env::consts::OS);
        fs::create_dir_all(&nested).unwrap();
        let bundled = make_tool(&nested);

        let bin = tempfile::tempdir().unwrap();
        make_tool(bin.path());

        let locator = ToolLocator::from_env(None)
            .with_bundle_dir(Some(bundle.path().to_path_buf()))
            .with_search_path(Some(bin.path().as_os_str().to_os_string()));

        assert_eq!(locator.locate().unwrap(), bundled);
    }

    #[test]
    fn test_not_found_lists_searched_dirs() {
        let empty = tempfile::tempdir().unwrap();
        let locator = ToolLocator::from_env(None)
            .with_bundle_dir(None)
            .with_search_path(Some(empty.path().as_os_str().to_os_string()));

        match locator.locate().unwrap_err() {
            WatermarkError::ToolNotFound { searched, .. } => {
                assert!(searched.contains(&empty.path().display().to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
