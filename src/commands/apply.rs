//! # apply 命令实现
//!
//! 为图库中的每张图片调用 composite 添加水印。
//!
//! ## 功能
//! - 校验水印文件、图库与输出目录
//! - 收集图片列表并定位 composite
//! - 后台线程执行，当前线程渲染进度并在失败过多时取消
//! - 汇总报告与可选 CSV 明细
//!
//! ## 依赖关系
//! - 使用 `cli/apply.rs` 定义的参数
//! - 使用 `batch/`, `models/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`, `utils/report.rs`

use crate::batch::locator::COMPOSITE;
use crate::batch::{
    worker, BatchEvent, BatchWatermarker, FileCollector, ProgressEvent, ToolLocator, WorkerHandle,
};
use crate::cli::apply::ApplyArgs;
use crate::error::{Result, WatermarkError};
use crate::models::{BatchJob, RunOutcome};
use crate::utils::{filesize, output, progress, report};

use indicatif::ProgressBar;
use std::fs;
use std::path::{Path, PathBuf};

/// 执行 apply 命令，返回是否所有文件都成功
pub fn execute(args: ApplyArgs) -> Result<bool> {
    output::print_header("Batch Watermarking");

    // 验证水印文件
    if !args.watermark.is_file() {
        return Err(WatermarkError::FileNotFound {
            path: args.watermark.display().to_string(),
        });
    }

    // 收集图片
    let files = FileCollector::new(&args.gallery)
        .with_pattern(args.pattern.as_deref())?
        .recursive(args.recursive)
        .collect()?;

    if files.is_empty() {
        return Err(WatermarkError::NoFilesFound {
            path: args.gallery.display().to_string(),
        });
    }
    output::print_info(&format!(
        "Found {} images in '{}'",
        files.len(),
        args.gallery.display()
    ));

    prepare_output_dir(&args.gallery, &args.output)?;

    let config = args.watermark_config();
    output::print_info(&format!(
        "Gravity {}, geometry {}, quality {}, opacity {}%",
        config.gravity,
        config.geometry(),
        config.quality(),
        config.opacity()
    ));

    let job = BatchJob::new(files, &args.watermark, &args.output, config);

    if args.dry_run {
        return dry_run(&args, &job);
    }

    // 定位失败属于安装错误，在处理任何文件之前返回
    let program = ToolLocator::from_env(args.composite.clone()).locate()?;
    output::print_info(&format!("Using {}", program.display()));

    let handle = worker::spawn(BatchWatermarker::new(program), job)?;
    let outcome = drive(handle, args.max_errors)?;

    print_summary(&outcome);

    if let Some(ref path) = args.report {
        report::save_report_csv(&outcome, path)?;
        output::print_success(&format!("Report saved to '{}'", path.display()));
    }

    Ok(outcome.is_clean())
}

/// 创建输出目录，拒绝与图库相同的目录
fn prepare_output_dir(gallery: &Path, output_dir: &Path) -> Result<()> {
    if output_dir.exists() {
        let same = match (fs::canonicalize(gallery), fs::canonicalize(output_dir)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
        if same {
            return Err(WatermarkError::SameDirectory {
                path: output_dir.display().to_string(),
            });
        }
        if !output_dir.is_dir() {
            return Err(WatermarkError::InvalidArgument(format!(
                "Output path is not a directory: {}",
                output_dir.display()
            )));
        }
        return Ok(());
    }

    fs::create_dir_all(output_dir).map_err(|e| WatermarkError::FileWriteError {
        path: output_dir.display().to_string(),
        source: e,
    })
}

/// 只打印命令
fn dry_run(args: &ApplyArgs, job: &BatchJob) -> Result<bool> {
    let program = match ToolLocator::from_env(args.composite.clone()).locate() {
        Ok(path) => path,
        Err(e) => {
            output::print_warning(&format!("{}", e));
            PathBuf::from(COMPOSITE)
        }
    };

    let watermarker = BatchWatermarker::new(program);
    let mut planned = 0;
    for (file, command) in job.input_files.iter().zip(watermarker.plan(job)) {
        match command {
            Ok(cmd) => {
                output::print_command(&cmd.to_string());
                planned += 1;
            }
            Err(e) => output::print_warning(&format!("{}: {}", file.display(), e)),
        }
    }

    output::print_separator();
    output::print_done(&format!(
        "[DRY] Planned {} of {} commands",
        planned,
        job.len()
    ));
    Ok(planned == job.len())
}

/// 在当前线程消费进度事件，直到后台线程退出
fn drive(handle: WorkerHandle, max_errors: Option<u64>) -> Result<RunOutcome> {
    let pb = progress::create_progress_bar(0, "Starting");
    let mut errors = 0u64;
    let mut cancel_requested = false;

    for event in handle.events().iter() {
        match event {
            BatchEvent::Progress(ProgressEvent::RunStarted { total }) => {
                pb.set_length(total as u64);
            }
            BatchEvent::Progress(ProgressEvent::FileStarted { file, .. }) => {
                pb.set_message(describe(&file));
            }
            BatchEvent::Progress(ProgressEvent::FileFinished {
                file,
                command,
                error,
                output: tool_output,
                ..
            }) => {
                pb.inc(1);
                if !error {
                    continue;
                }

                errors += 1;
                pb.set_prefix(format!("{} errors", errors));
                report_failure(&pb, &file, &command, &tool_output);

                if max_errors.is_some_and(|max| errors >= max) && !cancel_requested {
                    cancel_requested = true;
                    pb.suspend(|| {
                        output::print_warning(&format!(
                            "{} files failed, cancelling the remaining files",
                            errors
                        ))
                    });
                    handle.cancel();
                }
            }
            BatchEvent::Cancelled => {
                pb.suspend(|| output::print_skip("Cancellation took effect"));
            }
            BatchEvent::Completed(_) => {}
        }
    }

    pb.finish_and_clear();
    handle.join()
}

fn describe(file: &Path) -> String {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    match filesize::file_size(file) {
        Some(size) => format!("{} ({})", name, size),
        None => name,
    }
}

fn report_failure(pb: &ProgressBar, file: &Path, command: &str, tool_output: &str) {
    tracing::debug!(command, "failed command");
    pb.suspend(|| {
        output::print_error(&format!("{}: {}", file.display(), tool_output.trim()));
    });
}

/// 打印最终汇总
fn print_summary(outcome: &RunOutcome) {
    output::print_separator();
    println!("{}", report::summary_table(outcome));

    if !outcome.skipped.is_empty() {
        output::print_skip(&format!(
            "Ignored files: {}",
            report::file_names(&outcome.skipped)
        ));
    }

    if !outcome.failed.is_empty() {
        output::print_warning(&format!(
            "Errors encountered: {}",
            report::file_names(&outcome.failed)
        ));
    }

    if outcome.is_clean() {
        output::print_done("Everything went smoothly!");
    } else {
        output::print_done(&format!(
            "Processed {} of {} files",
            outcome.succeeded.len() + outcome.failed.len(),
            outcome.total()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_output_dir_creates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let gallery = dir.path().join("gallery");
        fs::create_dir(&gallery).unwrap();
        let out = dir.path().join("out").join("nested");

        prepare_output_dir(&gallery, &out).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn test_prepare_output_dir_rejects_gallery() {
        let dir = tempfile::tempdir().unwrap();
        let gallery = dir.path().join("gallery");
        fs::create_dir(&gallery).unwrap();

        let err = prepare_output_dir(&gallery, &gallery.join(".")).unwrap_err();
        assert!(matches!(err, WatermarkError::SameDirectory { .. }));
    }

    #[test]
    fn test_prepare_output_dir_rejects_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out");
        fs::write(&file, b"x").unwrap();

        assert!(prepare_output_dir(dir.path(), &file).is_err());
    }

    #[test]
    fn test_describe_includes_size() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.jpg");
        fs::write(&file, vec![0u8; 1500]).unwrap();

        assert_eq!(describe(&file), "a.jpg (1.5 KB)");
        assert_eq!(describe(&dir.path().join("missing.jpg")), "missing.jpg");
    }

    /// 写入一个可执行的 sh 脚本代替 composite
    #[cfg(unix)]
    fn fake_composite(dir: &Path, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let tool = dir.join("composite");
        fs::write(&tool, script).unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        tool
    }

    /// 在 dir 下建立图库和水印文件
    #[cfg(unix)]
    fn gallery_with(dir: &Path, names: &[&str]) -> (PathBuf, PathBuf) {
        let gallery = dir.join("gallery");
        fs::create_dir(&gallery).unwrap();
        for name in names {
            fs::write(gallery.join(name), b"x").unwrap();
        }
        let watermark = dir.join("logo.png");
        fs::write(&watermark, b"x").unwrap();
        (gallery, watermark)
    }

    #[cfg(unix)]
    fn apply_args(
        gallery: PathBuf,
        watermark: PathBuf,
        output: PathBuf,
        tool: PathBuf,
    ) -> ApplyArgs {
        use crate::models::{Gravity, Offset};

        ApplyArgs {
            gallery,
            watermark,
            output,
            quality: 90,
            opacity: 50,
            gravity: Gravity::Southeast,
            offset: Offset::new(10, 10),
            resize: None,
            recursive: false,
            pattern: None,
            composite: Some(tool),
            max_errors: None,
            dry_run: false,
            report: None,
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_with_fake_composite() {
        let dir = tempfile::tempdir().unwrap();
        let (gallery, watermark) =
            gallery_with(dir.path(), &["a.jpg", "bad.jpg", "notes.txt"]);

        // 最后一个参数是目标文件；源文件名含 bad 时失败
        let tool = fake_composite(
            dir.path(),
            "#!/bin/sh\nfor last; do :; done\ncase \"$*\" in *bad.jpg*) echo broken >&2; exit 1;; esac\ntouch \"$last\"\n",
        );

        let output_dir = dir.path().join("out");
        let report_path = dir.path().join("report.csv");
        let mut args = apply_args(gallery, watermark, output_dir.clone(), tool);
        args.report = Some(report_path.clone());

        let clean = execute(args).unwrap();

        assert!(!clean);
        assert!(output_dir.join("a.jpg").exists());
        assert!(!output_dir.join("bad.jpg").exists());
        let report = fs::read_to_string(report_path).unwrap();
        assert!(report.contains("succeeded"));
        assert!(report.contains("failed"));
    }

    #[cfg(unix)]
    #[test]
    fn test_max_errors_cancels_remaining_files() {
        let dir = tempfile::tempdir().unwrap();
        let names = ["1.jpg", "2.jpg", "3.jpg", "4.jpg", "5.jpg"];
        let (gallery, watermark) = gallery_with(dir.path(), &names);

        // 每个文件都失败；sleep 让所有者在下一个文件结束前完成取消
        let tool = fake_composite(dir.path(), "#!/bin/sh\nsleep 1\necho broken >&2\nexit 1\n");

        let report_path = dir.path().join("report.csv");
        let mut args = apply_args(gallery, watermark, dir.path().join("out"), tool);
        args.max_errors = Some(1);
        args.report = Some(report_path.clone());

        let clean = execute(args).unwrap();

        assert!(!clean);
        let report = fs::read_to_string(report_path).unwrap();
        let lines: Vec<&str> = report.lines().skip(1).collect();
        assert_eq!(lines.len(), names.len());
        assert!(lines.iter().any(|l| l.starts_with("skipped,")));
        let failed = lines.iter().filter(|l| l.starts_with("failed,")).count();
        assert!((1..names.len()).contains(&failed));
    }

    #[cfg(unix)]
    #[test]
    fn test_dry_run_launches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (gallery, watermark) = gallery_with(dir.path(), &["a.jpg", "b.png"]);

        let marker = dir.path().join("launched");
        let tool = fake_composite(
            dir.path(),
            &format!(
                "#!/bin/sh\ntouch \"{}\"\nfor last; do :; done\ntouch \"$last\"\n",
                marker.display()
            ),
        );

        let output_dir = dir.path().join("out");
        let mut args = apply_args(gallery, watermark, output_dir.clone(), tool);
        args.dry_run = true;
        args.report = Some(dir.path().join("report.csv"));

        let planned_all = execute(args).unwrap();

        assert!(planned_all);
        assert!(!marker.exists());
        assert!(!output_dir.join("a.jpg").exists());
        assert!(!output_dir.join("b.png").exists());
        assert!(!dir.path().join("report.csv").exists());
    }
}
