//! # Charm Gen
//!
//! 护符效果表生成工具 - 从效果配置 JSON 生成常量表源码。
//!
//! ## 用法
//!
//! ```bash
//! # 在项目根目录使用 cargo 运行
//! cargo run -p charm-gen -- data/zenith_charm_config.json
//! cargo run -p charm-gen -- data/zenith_charm_config.json -o src/gen/charm_data.rs
//! cargo run -p charm-gen -- data/zenith_charm_config.json --target cpp -o include/gen/charm_data.h
//! cargo run -p charm-gen -- check data/zenith_charm_config.json
//! cargo run -p charm-gen -- verify data/zenith_charm_config.json src/gen/charm_data.rs
//!
//! # 或安装后直接使用
//! cargo install --path tools/charm-gen
//! charm-gen data/zenith_charm_config.json -o charm_data.rs
//! ```
//!
//! 出错时退出码为 1，且不会写入任何产物。

mod config;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use charm_tables::{
    EmitOptions, Target, WriteOutcome, analyze_source, compile_file,
    compile_path, is_up_to_date,
};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::{Level, debug, info};

use config::{GenConfig, Overrides};

#[derive(Parser, Debug)]
#[command(name = "charm-gen")]
#[command(about = "护符效果表生成工具 - 从效果配置 JSON 生成常量表源码")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// 输入文件（效果配置 JSON，未指定时使用配置文件中的 input）
    input: Option<PathBuf>,

    /// 输出文件（未指定时写到 stdout）
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 目标语言
    #[arg(short, long, value_enum, global = true)]
    target: Option<TargetArg>,

    /// 枚举类型名
    #[arg(long, global = true)]
    enum_name: Option<String>,

    /// 计数常量/哨兵名（默认：ABILITY_COUNT）
    #[arg(long, global = true)]
    count_name: Option<String>,

    /// 命名空间（空字符串表示不包裹）
    #[arg(long, global = true)]
    namespace: Option<String>,

    /// 不生成按标识符查找的辅助代码
    #[arg(long, global = true)]
    no_lookup: bool,

    /// 配置文件（默认：charm-gen.json，不存在则忽略）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 日志详细程度（-v: info，-vv: debug）
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 检查效果配置，列出全部问题
    Check {
        /// 效果配置 JSON
        input: PathBuf,
    },

    /// 验证已生成的产物与输入一致
    Verify {
        /// 效果配置 JSON
        input: PathBuf,

        /// 已生成的产物
        generated: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TargetArg {
    Rust,
    Cpp,
}

impl From<TargetArg> for Target {
    fn from(t: TargetArg) -> Self {
        match t {
            TargetArg::Rust => Target::Rust,
            TargetArg::Cpp => Target::Cpp,
        }
    }
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            target: self.target.map(Target::from),
            enum_name: self.enum_name.clone(),
            count_name: self.count_name.clone(),
            namespace: self.namespace.clone(),
            no_lookup: self.no_lookup,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = real_main(cli) {
        eprintln!("charm-gen error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn real_main(cli: Cli) -> anyhow::Result<()> {
    let config = GenConfig::load(cli.config.as_deref())?;
    let options = config.emit_options(&cli.overrides());
    debug!(?options, "生成选项");

    match &cli.command {
        None => {
            let input = cli
                .input
                .as_ref()
                .or(config.input.as_ref())
                .context("未指定输入文件（命令行参数或配置文件 input）")?;
            let output = cli.output.as_ref().or(config.output.as_ref());
            generate(input, output.map(PathBuf::as_path), &options)
        }
        Some(Commands::Check { input }) => check(input, &options),
        Some(Commands::Verify { input, generated }) => verify(input, generated, &options),
    }
}

/// 生成产物
fn generate(input: &Path, output: Option<&Path>, options: &EmitOptions) -> anyhow::Result<()> {
    match output {
        Some(output) => {
            let outcome = compile_file(input, output, options)
                .with_context(|| format!("生成失败: {}", input.display()))?;
            match outcome {
                WriteOutcome::Written => info!(path = %output.display(), "已生成"),
                WriteOutcome::Unchanged => info!(path = %output.display(), "内容未变化"),
            }
        }
        None => {
            let source = compile_path(input, options)
                .with_context(|| format!("生成失败: {}", input.display()))?;
            print!("{source}");
        }
    }
    Ok(())
}

/// 检查效果配置
///
/// 保留名与数量上限按生成时的选项判定。
fn check(input: &Path, options: &EmitOptions) -> anyhow::Result<()> {
    let source_id = input.display().to_string();
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("无法读取文件: {source_id}"))?;

    let result = analyze_source(&source_id, &content, options);
    for diag in &result.diagnostics {
        eprintln!("{diag}");
    }

    if result.has_errors() {
        anyhow::bail!(
            "{} 个错误, {} 个警告",
            result.error_count(),
            result.warn_count()
        );
    }
    if result.warn_count() > 0 {
        eprintln!("⚠️  0 个错误, {} 个警告", result.warn_count());
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
    Ok(())
}

/// 验证产物是否最新
fn verify(input: &Path, generated: &Path, options: &EmitOptions) -> anyhow::Result<()> {
    let fresh = is_up_to_date(input, generated, options)
        .with_context(|| format!("验证失败: {}", input.display()))?;
    if !fresh {
        anyhow::bail!(
            "{} 已过期或不存在，请重新运行 charm-gen {}",
            generated.display(),
            input.display()
        );
    }
    eprintln!("✅ {} 与 {} 一致", generated.display(), input.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO: &str = r#"[
        {"effectName":"Crit Chance","effectCap":50,"isPercent":true,"rarityValues":[3]},
        {"effectName":"Armor","effectCap":200,"isPercent":false,"rarityValues":[7]}
    ]"#;

    #[test]
    fn test_parse_default_action() {
        let cli = Cli::try_parse_from(["charm-gen", "charms.json", "-o", "out.rs"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.input, Some(PathBuf::from("charms.json")));
        assert_eq!(cli.output, Some(PathBuf::from("out.rs")));
        assert_eq!(cli.target, None);
    }

    #[test]
    fn test_parse_options() {
        let cli = Cli::try_parse_from([
            "charm-gen",
            "charms.json",
            "--target",
            "cpp",
            "--namespace",
            "",
            "--no-lookup",
            "-vv",
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.target, Some(Target::Cpp));
        assert_eq!(overrides.namespace.as_deref(), Some(""));
        assert!(overrides.no_lookup);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["charm-gen", "check", "charms.json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Check { .. })));

        let cli = Cli::try_parse_from([
            "charm-gen",
            "verify",
            "charms.json",
            "gen.h",
            "--target",
            "cpp",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Verify { .. })));
        assert_eq!(cli.target, Some(TargetArg::Cpp));
    }

    #[test]
    fn test_unknown_target_rejected() {
        assert!(Cli::try_parse_from(["charm-gen", "charms.json", "--target", "java"]).is_err());
    }

    #[test]
    fn test_generate_then_verify() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("charms.json");
        let output = dir.path().join("charm_data.h");
        std::fs::write(&input, TWO).unwrap();

        let options = EmitOptions::for_target(Target::Cpp);
        generate(&input, Some(output.as_path()), &options).unwrap();
        assert!(std::fs::read_to_string(&output)
            .unwrap()
            .contains("enum class charm_effects : std::uint16_t"));
        verify(&input, &output, &options).unwrap();

        // 换一组选项后产物视为过期
        assert!(verify(&input, &output, &EmitOptions::default()).is_err());
    }

    #[test]
    fn test_generate_error_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("charms.json");
        let output = dir.path().join("charm_data.rs");
        std::fs::write(
            &input,
            r#"[{"effectName":"Armor","effectCap":"lots","isPercent":false,"rarityValues":[1]}]"#,
        )
        .unwrap();

        let err = generate(&input, Some(output.as_path()), &EmitOptions::default()).unwrap_err();
        assert!(format!("{err:#}").contains("effectCap"));
        assert!(!output.exists());
    }

    #[test]
    fn test_check_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("charms.json");
        std::fs::write(&input, TWO).unwrap();
        check(&input, &EmitOptions::default()).unwrap();

        std::fs::write(
            &input,
            r#"[{"effectName":"A","effectCap":1,"isPercent":true,"rarityValues":[]}]"#,
        )
        .unwrap();
        assert!(check(&input, &EmitOptions::default()).is_err());
    }

    #[test]
    fn test_check_matches_generate() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("charms.json");
        std::fs::write(
            &input,
            r#"[{"effectName":"Ability Count","effectCap":1,"isPercent":false,"rarityValues":[1]}]"#,
        )
        .unwrap();

        let options = EmitOptions::default();
        assert!(check(&input, &options).is_err());
        assert!(generate(&input, Some(dir.path().join("a.rs").as_path()), &options).is_err());

        let overrides = Overrides {
            count_name: Some("EFFECT_COUNT".to_string()),
            ..Overrides::default()
        };
        let options = GenConfig::default().emit_options(&overrides);
        check(&input, &options).unwrap();
        generate(&input, Some(dir.path().join("b.rs").as_path()), &options).unwrap();
    }
}
