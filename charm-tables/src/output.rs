//! # Output 模块
//!
//! 一次性编译入口与产物写入。
//!
//! 产物先在内存中完整渲染，再写入同目录下的临时文件并重命名覆盖目标，
//! 失败时不会留下半截文件。内容未变化时不触碰目标文件，
//! 避免 `build.rs` 因时间戳变化反复触发重编译。

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::emit::{EmitOptions, emit};
use crate::error::{CharmError, CharmResult};
use crate::record::parse_records;
use crate::table::EffectTable;

/// 写入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// 已写入新内容
    Written,
    /// 内容相同，未写入
    Unchanged,
}

/// 编译 JSON 文本为目标源码
pub fn compile_str(source: &str, options: &EmitOptions) -> CharmResult<String> {
    let records = parse_records(source)?;
    let table = EffectTable::compile(&records)?;
    debug!(effects = table.len(), target = %options.target, "效果表编译完成");
    emit(&table, options)
}

/// 读取输入文件并编译
///
/// `options.source_label` 为空时使用输入文件名。
pub fn compile_path(input: &Path, options: &EmitOptions) -> CharmResult<String> {
    let source = fs::read_to_string(input).map_err(|e| CharmError::io(input, e))?;
    let options = with_source_label(input, options);
    compile_str(&source, &options)
}

/// 编译输入文件并写入产物
pub fn compile_file(
    input: &Path,
    output: &Path,
    options: &EmitOptions,
) -> CharmResult<WriteOutcome> {
    let rendered = compile_path(input, options)?;

    if read_existing(output)?.as_deref() == Some(rendered.as_str()) {
        debug!(path = %output.display(), "产物未变化，跳过写入");
        return Ok(WriteOutcome::Unchanged);
    }

    write_atomic(output, &rendered)?;
    info!(path = %output.display(), bytes = rendered.len(), "产物已写入");
    Ok(WriteOutcome::Written)
}

/// 已生成的产物是否与当前输入一致
pub fn is_up_to_date(input: &Path, output: &Path, options: &EmitOptions) -> CharmResult<bool> {
    let rendered = compile_path(input, options)?;
    Ok(read_existing(output)?.as_deref() == Some(rendered.as_str()))
}

fn with_source_label(input: &Path, options: &EmitOptions) -> EmitOptions {
    let mut options = options.clone();
    if options.source_label.is_none() {
        options.source_label = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
    }
    options
}

fn read_existing(path: &Path) -> CharmResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CharmError::io(path, e)),
    }
}

fn write_atomic(path: &Path, content: &str) -> CharmResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CharmError::io(parent, e))?;
    }

    let tmp = temp_path(path);
    if let Err(e) = fs::write(&tmp, content) {
        let _ = fs::remove_file(&tmp);
        return Err(CharmError::io(&tmp, e));
    }
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        CharmError::io(path, e)
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".tmp{}", std::process::id()));
    path.with_file_name(name)
}
