//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-tables`: 运行 charm-tables 覆盖率
//! - `data-check`: 检查效果配置文件（字段、标识符、重复）

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use charm_tables::{DiagnosticResult, EmitOptions, analyze_source};
use walkdir::WalkDir;
use xshell::{Shell, cmd};

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
            let sh = Shell::new()?;

            eprintln!("\n==> cargo fmt --all -- --check");
            cmd!(sh, "cargo fmt --all -- --check").run()?;

            eprintln!("\n==> cargo clippy --workspace --all-targets");
            cmd!(sh, "cargo clippy --workspace --all-targets").run()?;

            eprintln!("\n==> cargo test --workspace");
            cmd!(sh, "cargo test --workspace").run()?;
        }
        "cov-tables" => {
            let sh = Shell::new()?;
            if cmd!(sh, "cargo llvm-cov --version").quiet().run().is_err() {
                anyhow::bail!(
                    "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
                );
            }

            eprintln!("\n==> cargo llvm-cov -p charm-tables --all-features --html");
            cmd!(sh, "cargo llvm-cov -p charm-tables --all-features --html").run()?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "data-check" => {
            let path = args.next();
            data_check(path.as_deref())?;
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
  cov-tables      运行 charm-tables 覆盖率报告
  data-check      检查效果配置文件

DATA-CHECK:
  cargo xtask data-check [path]

  不带参数：检查 data/ 下所有 .json 文件
  带路径参数：检查指定文件或目录

  检查内容：
    - 字段缺失、类型不匹配、空的 rarityValues
    - 无法作为枚举成员的效果名
    - 规范化后重复的标识符
    - 与计数哨兵或生成代码冲突的枚举成员（按默认生成选项）
"#
    );
}

//=============================================================================
// data-check 命令实现
//=============================================================================

/// 默认数据目录（相对于 workspace root）
const DATA_DIR: &str = "data";

/// 执行配置检查
fn data_check(path: Option<&str>) -> anyhow::Result<()> {
    let files = match path {
        Some(p) => {
            let path = PathBuf::from(p);
            if path.is_file() {
                vec![path]
            } else if path.is_dir() {
                collect_data_files(&path)
            } else {
                anyhow::bail!("路径不存在: {p}");
            }
        }
        None => {
            let dir = Path::new(DATA_DIR);
            if !dir.exists() {
                anyhow::bail!(
                    "默认数据目录不存在: {}\n请在 workspace 根目录运行，或指定配置路径",
                    dir.display()
                );
            }
            collect_data_files(dir)
        }
    };

    if files.is_empty() {
        eprintln!("未找到配置文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个配置文件...\n", files.len());

    let options = EmitOptions::default();
    let mut result = DiagnosticResult::new();
    for file in &files {
        let source_id = file.display().to_string();
        let content = std::fs::read_to_string(file)
            .map_err(|e| anyhow::anyhow!("无法读取文件 {source_id}: {e}"))?;
        result.merge(analyze_source(&source_id, &content, &options));
    }

    print_check_result(files.len(), &result);

    if result.has_errors() {
        anyhow::bail!("配置检查发现错误");
    }
    Ok(())
}

/// 收集目录下的所有配置文件
fn collect_data_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// 输出检查结果
fn print_check_result(checked: usize, result: &DiagnosticResult) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {checked} 个配置文件");
    eprintln!();

    for diag in &result.diagnostics {
        eprintln!("{diag}");
    }

    let error_count = result.error_count();
    let warn_count = result.warn_count();

    eprintln!();
    if error_count > 0 {
        eprintln!("❌ {error_count} 个错误, {warn_count} 个警告");
    } else if warn_count > 0 {
        eprintln!("⚠️  0 个错误, {warn_count} 个警告");
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
}
