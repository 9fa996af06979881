//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 transition-runtime 覆盖率
//! - `cov-workspace`: 运行 workspace 覆盖率
//! - `world-check`: 检查世界数据中保存的过渡（配置、未知字段、资源引用）

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use serde_json::Value;
use transition_runtime::{StoredTransition, TRANSITION_FLAG, TransitionConfig};
use walkdir::WalkDir;

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    let status = cmd.status();
    match status {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            let mut test = Command::new("cargo");
            test.args(["test", "--workspace"]);
            run("cargo test --workspace", &mut test)?;
        }
        "cov-runtime" => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "transition-runtime", "--html"]);
            run("cargo llvm-cov -p transition-runtime --html", &mut cov)?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "cov-workspace" => {
            ensure_cargo_llvm_cov_available()?;

            // 排除 xtask，避免稀释信号
            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "--workspace", "--exclude", "xtask", "--html"]);
            run(
                "cargo llvm-cov --workspace --exclude xtask --html",
                &mut cov,
            )?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "world-check" => {
            let path = args.next();
            let assets = args.next();
            world_check(path.as_deref(), assets.as_deref())?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-runtime     运行 transition-runtime 覆盖率报告
  cov-workspace   运行 workspace 覆盖率报告
  world-check     检查世界数据中保存的过渡

WORLD-CHECK:
  cargo xtask world-check [path] [assets_root]

  不带参数：检查当前目录下的 world.json
  路径为目录时：检查目录下所有 .json 文件
  assets_root 默认为 assets

  检查内容：
    - 过渡数据能否解析
    - 配置取值范围（透明度、音量）
    - 未知配置字段
    - 资源文件是否存在（背景图片、音频）

ALIASES (in .cargo/config.toml):
  cargo check-all     -> cargo xtask check-all
  cargo cov-runtime   -> cargo xtask cov-runtime
  cargo cov-workspace -> cargo xtask cov-workspace
  cargo world-check   -> cargo xtask world-check
"#
    );
}

//=============================================================================
// world-check 命令实现
//=============================================================================

/// 检查结果
#[derive(Default)]
struct WorldCheckResult {
    files_checked: usize,
    transitions_checked: usize,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// 执行世界数据检查
fn world_check(path: Option<&str>, assets: Option<&str>) -> anyhow::Result<()> {
    let path = PathBuf::from(path.unwrap_or("world.json"));
    let assets_root = PathBuf::from(assets.unwrap_or("assets"));

    let files = if path.is_file() {
        vec![path]
    } else if path.is_dir() {
        collect_json_files(&path)
    } else {
        anyhow::bail!("路径不存在: {}", path.display());
    };

    if files.is_empty() {
        eprintln!("未找到世界数据文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个世界数据文件...\n", files.len());

    let mut result = WorldCheckResult::default();
    for file in &files {
        check_world_file(file, &assets_root, &mut result);
    }

    print_check_result(&result);

    if !result.errors.is_empty() {
        anyhow::bail!("世界数据检查发现错误");
    }
    Ok(())
}

/// 收集目录下的所有 .json 文件
fn collect_json_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// 检查单个世界数据文件
fn check_world_file(file: &Path, assets_root: &Path, result: &mut WorldCheckResult) {
    let file_id = file.display().to_string();
    result.files_checked += 1;

    let world: Value = match std::fs::read_to_string(file)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
    {
        Ok(v) => v,
        Err(e) => {
            result.errors.push(format!("{file_id}: 无法读取 - {e}"));
            return;
        }
    };

    let scenes = world
        .get("scenes")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for scene in scenes {
        let scene_id = scene.get("id").and_then(Value::as_str).unwrap_or("?");
        let Some(flag) = scene
            .get("flags")
            .and_then(|flags| flags.get(TRANSITION_FLAG))
        else {
            continue;
        };
        result.transitions_checked += 1;
        let location = format!("{file_id} [{scene_id}]");

        let stored: StoredTransition = match serde_json::from_value(flag.clone()) {
            Ok(stored) => stored,
            Err(e) => {
                result.errors.push(format!("{location}: 过渡数据无效 - {e}"));
                continue;
            }
        };

        for key in stored.options.unknown_keys() {
            result.warnings.push(format!("{location}: 未知配置项 {key}"));
        }

        let config = TransitionConfig::from_patch(&stored.options);
        if let Err(e) = config.validate() {
            result.errors.push(format!("{location}: {e}"));
        }

        check_resource(&location, "背景", &config.bg_img, assets_root, result);
        if let Some(src) = config.audio_src() {
            check_resource(&location, "音频", src, assets_root, result);
        }
    }
}

/// 检查本地资源是否存在，远程 URI 跳过
fn check_resource(
    location: &str,
    kind: &str,
    src: &str,
    assets_root: &Path,
    result: &mut WorldCheckResult,
) {
    if src.is_empty() || src.contains("://") || src.starts_with("data:") {
        return;
    }
    let path = if src.starts_with('/') {
        PathBuf::from(src)
    } else {
        assets_root.join(src)
    };
    if !path.exists() {
        result
            .warnings
            .push(format!("{location}: {kind}资源不存在 {}", path.display()));
    }
}

/// 输出检查结果
fn print_check_result(result: &WorldCheckResult) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!(
        "检查完成: {} 个文件, {} 个过渡",
        result.files_checked, result.transitions_checked
    );
    eprintln!();

    for error in &result.errors {
        eprintln!("[ERROR] {error}");
    }
    for warning in &result.warnings {
        eprintln!("[WARN] {warning}");
    }

    eprintln!();
    if !result.errors.is_empty() {
        eprintln!(
            "❌ {} 个错误, {} 个警告",
            result.errors.len(),
            result.warnings.len()
        );
    } else if !result.warnings.is_empty() {
        eprintln!("⚠️  0 个错误, {} 个警告", result.warnings.len());
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
}
