//! # 外部进程执行器
//!
//! `ToolExecutor` 是批处理循环与操作系统进程之间的接缝：
//! 生产环境使用 `ProcessExecutor`，测试中替换为脚本化的实现。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `batch/command.rs` 的 `CompositeCommand`

use super::command::CompositeCommand;
use crate::error::{Result, WatermarkError};

use std::path::Path;
use std::process::Command;

/// 一次外部调用的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// 退出码为 0
    pub success: bool,
    /// 退出码（被信号终止时为 None）
    pub code: Option<i32>,
    /// 合并后的 stdout + stderr
    pub output: String,
}

/// 外部工具执行接口
pub trait ToolExecutor: Send + Sync {
    /// 检查工具是否可用；失败属于安装错误
    fn check_available(&self, program: &Path) -> Result<()> {
        ensure_executable(program)
    }

    /// 同步执行一条命令
    fn execute(&self, command: &CompositeCommand) -> std::io::Result<ToolOutput>;
}

/// 检查路径存在、是普通文件且（Unix 下）带可执行位
pub fn ensure_executable(program: &Path) -> Result<()> {
    let metadata = std::fs::metadata(program).map_err(|_| WatermarkError::ToolNotFound {
        tool: program.display().to_string(),
        searched: program.display().to_string(),
    })?;

    if !metadata.is_file() {
        return Err(WatermarkError::ToolNotExecutable {
            path: program.to_path_buf(),
        });
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(WatermarkError::ToolNotExecutable {
                path: program.to_path_buf(),
            });
        }
    }

    Ok(())
}

/// 通过 `std::process::Command` 启动真实进程
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

impl ToolExecutor for ProcessExecutor {
    fn execute(&self, command: &CompositeCommand) -> std::io::Result<ToolOutput> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);

        // 不弹出控制台窗口
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }

        let out = cmd.output()?;

        let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&out.stderr));

        Ok(ToolOutput {
            success: out.status.success(),
            code: out.status.code(),
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_tool_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ensure_executable(&dir.path().join("composite")).unwrap_err();
        assert!(matches!(err, WatermarkError::ToolNotFound { .. }));
    }

    #[test]
    fn test_directory_is_not_executable() {
        let dir = tempfile::tempdir().unwrap();
        let err = ensure_executable(dir.path()).unwrap_err();
        assert!(matches!(err, WatermarkError::ToolNotExecutable { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_bit_required() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("composite");
        fs::write(&tool, "#!/bin/sh\n").unwrap();

        fs::set_permissions(&tool, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(ensure_executable(&tool).is_err());

        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(ensure_executable(&tool).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_process_executor_captures_output_and_status() {
        let ok = CompositeCommand {
            program: "/bin/sh".into(),
            args: vec!["-c".into(), "echo out; echo err >&2".into()],
        };
        let result = ProcessExecutor.execute(&ok).unwrap();
        assert!(result.success);
        assert_eq!(result.code, Some(0));
        assert!(result.output.contains("out"));
        assert!(result.output.contains("err"));

        let failing = CompositeCommand {
            program: "/bin/sh".into(),
            args: vec!["-c".into(), "exit 3".into()],
        };
        let result = ProcessExecutor.execute(&failing).unwrap();
        assert!(!result.success);
        assert_eq!(result.code, Some(3));
    }
}
