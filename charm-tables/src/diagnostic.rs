//! # 诊断模块
//!
//! 对效果配置做整份检查，收集全部问题而不是遇到第一个就停止。
//!
//! ## 设计原则
//!
//! - 纯函数 API，可在无 IO 环境下运行
//! - 诊断分级：Error（编译会失败）、Warn（建议确认）、Info（信息提示）
//! - 复用 record/ident/emit 的解码、派生与保留名逻辑，不重复实现
//!
//! 编译路径本身仍然是遇错即停，见 [`crate::table::EffectTable::compile`]。

use std::collections::HashMap;

use serde_json::Value;

use crate::emit::{EmitOptions, MAX_EFFECTS};
use crate::error::{CharmError, RecordError};
use crate::ident::EffectId;
use crate::record::{EffectRecord, json_type_name};
use crate::table::ROUND_TO_INTEGER_THRESHOLD;

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// 信息提示
    Info,
    /// 警告（建议确认）
    Warn,
    /// 错误（编译会失败）
    Error,
}

impl std::fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// 诊断条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 诊断级别
    pub level: DiagnosticLevel,
    /// 输入来源（通常为文件路径）
    pub source_id: String,
    /// 诊断消息
    pub message: String,
}

impl Diagnostic {
    /// 创建错误诊断
    pub fn error(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, source_id, message)
    }

    /// 创建警告诊断
    pub fn warn(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warn, source_id, message)
    }

    /// 创建信息诊断
    pub fn info(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, source_id, message)
    }

    fn new(
        level: DiagnosticLevel,
        source_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            source_id: source_id.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.level, self.source_id, self.message)
    }
}

/// 诊断结果
#[derive(Debug, Clone, Default)]
pub struct DiagnosticResult {
    /// 诊断条目列表
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticResult {
    /// 创建空结果
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加诊断
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// 合并另一个结果
    pub fn merge(&mut self, other: DiagnosticResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// 获取错误数量
    pub fn error_count(&self) -> usize {
        self.count(DiagnosticLevel::Error)
    }

    /// 获取警告数量
    pub fn warn_count(&self) -> usize {
        self.count(DiagnosticLevel::Warn)
    }

    fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// 按级别过滤
    pub fn filter_by_level(&self, min_level: DiagnosticLevel) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level >= min_level)
            .collect()
    }
}

//=============================================================================
// 配置分析 API
//=============================================================================

/// 分析一份效果配置
///
/// 执行以下检查：
/// - 每条记录的字段缺失/类型/空序列（Error）
/// - 非法标识符与全部重复标识符（Error）
/// - 生成选项无效、枚举成员为保留名、效果数量超限（Error，与 `emit` 的判定一致）
/// - 后续稀有度档位会改变取整判定（Warn，只有第一个档位参与派生）
/// - 上限不为正数（Warn）
pub fn analyze_source(source_id: &str, source: &str, options: &EmitOptions) -> DiagnosticResult {
    let mut result = DiagnosticResult::new();

    if let Err(e) = options.validate() {
        result.push(Diagnostic::error(source_id, e.to_string()));
    }

    let root: Value = match serde_json::from_str(source) {
        Ok(v) => v,
        Err(e) => {
            result.push(Diagnostic::error(source_id, CharmError::from(e).to_string()));
            return result;
        }
    };
    let Value::Array(items) = root else {
        result.push(Diagnostic::error(
            source_id,
            CharmError::RootNotArray {
                found: json_type_name(&root),
            }
            .to_string(),
        ));
        return result;
    };

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut valid = 0usize;

    for (index, item) in items.iter().enumerate() {
        let record = match EffectRecord::from_value(index, item) {
            Ok(r) => r,
            Err(e) => {
                result.push(record_error(source_id, e));
                continue;
            }
        };

        let id = EffectId::derive(&record.effect_name);
        if let Err(e) = id.validate(index, &record.effect_name) {
            result.push(record_error(source_id, e));
            continue;
        }
        if let Some(&first_index) = seen.get(id.as_str()) {
            result.push(record_error(
                source_id,
                RecordError::DuplicateIdentifier {
                    index,
                    first_index,
                    identifier: id.to_string(),
                },
            ));
            continue;
        }
        seen.insert(id.to_string(), index);

        let token = id.enum_token();
        if options.is_reserved_token(&token) {
            result.push(Diagnostic::error(
                source_id,
                CharmError::ReservedIdentifier { index, token }.to_string(),
            ));
            continue;
        }
        valid += 1;

        check_rarity_tiers(source_id, index, &record, &mut result);

        if record.effect_cap <= 0.0 {
            result.push(Diagnostic::warn(
                source_id,
                format!(
                    "records[{index}]：'{id}' 的上限为 {}，不是正数",
                    record.effect_cap
                ),
            ));
        }
    }

    if items.len() > MAX_EFFECTS {
        result.push(Diagnostic::error(
            source_id,
            CharmError::TooManyEffects {
                count: items.len(),
                max: MAX_EFFECTS,
            }
            .to_string(),
        ));
    }

    result.push(Diagnostic::info(
        source_id,
        format!("共 {} 条记录，{valid} 条可编译", items.len()),
    ));
    result
}

fn record_error(source_id: &str, e: RecordError) -> Diagnostic {
    Diagnostic::error(source_id, e.to_string())
}

fn check_rarity_tiers(
    source_id: &str,
    index: usize,
    record: &EffectRecord,
    result: &mut DiagnosticResult,
) {
    let Some((&base, rest)) = record.rarity_values.split_first() else {
        return;
    };
    let rounds = base >= ROUND_TO_INTEGER_THRESHOLD;
    if rest.iter().any(|&v| (v >= ROUND_TO_INTEGER_THRESHOLD) != rounds) {
        result.push(Diagnostic::warn(
            source_id,
            format!(
                "records[{index}]：'{}' 的取整判定只看第一个稀有度 {base}，后续档位 {rest:?} 会得出不同结果",
                record.effect_name,
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::Target;

    fn analyze(source: &str) -> DiagnosticResult {
        analyze_source("charms.json", source, &EmitOptions::default())
    }

    #[test]
    fn test_clean_source() {
        let result = analyze(
            r#"[
                {"effectName":"Crit Chance","effectCap":50,"isPercent":true,"rarityValues":[3, 4]},
                {"effectName":"Armor","effectCap":200,"isPercent":false,"rarityValues":[7]}
            ]"#,
        );
        assert!(!result.has_errors());
        assert_eq!(result.warn_count(), 0);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].level, DiagnosticLevel::Info);
    }

    #[test]
    fn test_collects_every_problem() {
        let result = analyze(
            r#"[
                {"effectName":"Fire Resist","effectCap":10,"isPercent":true,"rarityValues":[1]},
                {"effectName":"Armor","isPercent":false,"rarityValues":[7]},
                {"effectName":"fire resist","effectCap":10,"isPercent":true,"rarityValues":[1]},
                {"effectName":"Speed","effectCap":10,"isPercent":true,"rarityValues":[]},
                {"effectName":"FIRE RESIST","effectCap":10,"isPercent":true,"rarityValues":[1]}
            ]"#,
        );
        assert_eq!(result.error_count(), 4);

        let errors = result.filter_by_level(DiagnosticLevel::Error);
        for (diag, index) in errors.iter().zip([1, 2, 3, 4]) {
            assert!(
                diag.message.starts_with(&format!("records[{index}]")),
                "{}",
                diag.message
            );
        }
        assert!(errors[1].message.contains("records[0]"));
    }

    #[test]
    fn test_reserved_tokens_follow_options() {
        let source = r#"[
            {"effectName":"Armor","effectCap":1,"isPercent":false,"rarityValues":[1]},
            {"effectName":"Ability Count","effectCap":1,"isPercent":false,"rarityValues":[1]},
            {"effectName":"All","effectCap":1,"isPercent":false,"rarityValues":[1]}
        ]"#;

        let result = analyze(source);
        assert_eq!(result.error_count(), 2);
        let errors = result.filter_by_level(DiagnosticLevel::Error);
        assert!(errors[0].message.contains("ABILITY_COUNT"));
        assert!(errors[1].message.starts_with("records[2]"));

        // 换哨兵名并关闭查找代码后全部可编译
        let mut options = EmitOptions::default();
        options.count_name = "EFFECT_COUNT".to_string();
        options.lookup = false;
        assert!(!analyze_source("charms.json", source, &options).has_errors());

        let cpp = EmitOptions::for_target(Target::Cpp);
        let result = analyze_source(
            "charms.json",
            r#"[{"effectName":"Size Max","effectCap":1,"isPercent":false,"rarityValues":[1]}]"#,
            &cpp,
        );
        assert_eq!(result.error_count(), 1);
    }

    #[test]
    fn test_invalid_options_reported() {
        let mut options = EmitOptions::default();
        options.enum_name = "Charm Effect".to_string();
        let result = analyze_source("charms.json", "[]", &options);
        assert_eq!(result.error_count(), 1);
        assert!(result.diagnostics[0].message.contains("enum_name"));
    }

    #[test]
    fn test_too_many_effects() {
        let records: Vec<String> = (0..=MAX_EFFECTS)
            .map(|i| {
                format!(
                    r#"{{"effectName":"Effect {i}","effectCap":1,"isPercent":false,"rarityValues":[1]}}"#
                )
            })
            .collect();
        let result = analyze(&format!("[{}]", records.join(",")));
        assert_eq!(result.error_count(), 1);
        assert!(
            result.filter_by_level(DiagnosticLevel::Error)[0]
                .message
                .contains(&MAX_EFFECTS.to_string())
        );
    }

    #[test]
    fn test_rarity_flip_and_cap_warnings() {
        let result = analyze(
            r#"[
                {"effectName":"Luck","effectCap":0,"isPercent":false,"rarityValues":[4, 9]}
            ]"#,
        );
        assert!(!result.has_errors());
        assert_eq!(result.warn_count(), 2);
        assert!(result.filter_by_level(DiagnosticLevel::Warn)[0]
            .message
            .contains("[9.0]"));
    }

    #[test]
    fn test_bad_json_is_single_error() {
        let result = analyze_source("broken.json", "[{", &EmitOptions::default());
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].to_string().starts_with("[ERROR] broken.json: "));
    }

    #[test]
    fn test_root_not_array() {
        let result = analyze_source("x.json", "{}", &EmitOptions::default());
        assert!(result.has_errors());
        assert!(result.diagnostics[0].message.contains("object"));
    }
}
