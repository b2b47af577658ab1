//! # Charm Tables
//!
//! 护符效果表编译器：把效果定义 JSON 编译为按位置对齐的常量表源码。
//!
//! ## 架构概述
//!
//! 整个过程是一次纯转换，没有运行时状态：
//!
//! ```text
//! JSON ──parse_records──► Vec<EffectRecord>
//!                               │ EffectTable::compile
//!                               ▼
//!                          EffectTable ──emit──► 源码文本（Rust / C++）
//! ```
//!
//! 生成的枚举按输入顺序列出大写标识符，最后是计数哨兵；
//! 每个常量数组的第 `i` 个元素都对应第 `i` 个枚举成员。
//!
//! ## 使用示例
//!
//! ```ignore
//! // build.rs
//! use charm_tables::{EmitOptions, compile_file};
//!
//! let out = std::path::Path::new(&std::env::var("OUT_DIR")?).join("charm_data.rs");
//! compile_file("data/charms.json".as_ref(), &out, &EmitOptions::default())?;
//! println!("cargo:rerun-if-changed=data/charms.json");
//!
//! // lib.rs
//! include!(concat!(env!("OUT_DIR"), "/charm_data.rs"));
//! ```
//!
//! ## 模块结构
//!
//! - [`record`]：输入记录解码
//! - [`ident`]：标识符派生
//! - [`table`]：效果表编译
//! - [`emit`]：目标语言渲染
//! - [`output`]：一次性编译与产物写入
//! - [`diagnostic`]：整份配置检查
//! - [`error`]：错误类型定义

pub mod diagnostic;
pub mod emit;
pub mod error;
pub mod ident;
pub mod output;
pub mod record;
pub mod table;

// 重导出核心类型
pub use diagnostic::{Diagnostic, DiagnosticLevel, DiagnosticResult, analyze_source};
pub use emit::{EmitOptions, Target, emit};
pub use error::{CharmError, CharmResult, RecordError};
pub use ident::EffectId;
pub use output::{WriteOutcome, compile_file, compile_path, compile_str, is_up_to_date};
pub use record::{EffectRecord, parse_records};
pub use table::{EffectTable, ROUND_TO_INTEGER_THRESHOLD};
