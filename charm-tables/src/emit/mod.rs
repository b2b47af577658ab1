//! # Emit 模块
//!
//! 把 [`EffectTable`] 渲染为目标语言的常量表源码。
//!
//! ## 输出顺序
//!
//! 每个目标都按以下顺序输出，中间只有格式内容：
//!
//! 1. 枚举（大写标识符 + 计数哨兵）
//! 2. 计数常量
//! 3. `EFFECT_CAPS`
//! 4. `EFFECT_NAMES`
//! 5. `EFFECT_DISPLAY_NAMES`
//! 6. `EFFECT_IS_PERCENT`
//! 7. `EFFECT_ROUND_TO_INTEGER`
//!
//! 开启 `lookup` 时，在上述内容之后追加按标识符查找枚举值的辅助代码。

mod cpp;
mod rust;

use serde::{Deserialize, Serialize};

use crate::error::{CharmError, CharmResult};
use crate::ident::is_code_identifier;
use crate::table::EffectTable;

/// 上限数组名
pub const CAPS_NAME: &str = "EFFECT_CAPS";
/// 标识符数组名
pub const NAMES_NAME: &str = "EFFECT_NAMES";
/// 显示名数组名
pub const DISPLAY_NAMES_NAME: &str = "EFFECT_DISPLAY_NAMES";
/// 百分比标记数组名
pub const IS_PERCENT_NAME: &str = "EFFECT_IS_PERCENT";
/// 取整标记数组名
pub const ROUND_TO_INTEGER_NAME: &str = "EFFECT_ROUND_TO_INTEGER";

const TABLE_NAMES: [&str; 5] = [
    CAPS_NAME,
    NAMES_NAME,
    DISPLAY_NAMES_NAME,
    IS_PERCENT_NAME,
    ROUND_TO_INTEGER_NAME,
];

/// 枚举底层类型为 u16，哨兵也占一个值
pub const MAX_EFFECTS: usize = u16::MAX as usize;

/// 默认计数常量/哨兵名
pub const DEFAULT_COUNT_NAME: &str = "ABILITY_COUNT";

/// 输出目标语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Rust 模块（配合 `include!` 使用）
    #[default]
    Rust,
    /// C++ 头文件
    Cpp,
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rust => write!(f, "rust"),
            Self::Cpp => write!(f, "cpp"),
        }
    }
}

/// 生成选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// 目标语言
    pub target: Target,
    /// 枚举类型名
    pub enum_name: String,
    /// 计数常量名（同时作为枚举哨兵成员名）
    pub count_name: String,
    /// 外层命名空间（Rust 为 `mod`，C++ 为 `namespace`）
    pub namespace: Option<String>,
    /// 是否生成按标识符查找的辅助代码
    pub lookup: bool,
    /// 文件头注释中记录的输入来源
    pub source_label: Option<String>,
}

impl EmitOptions {
    /// 目标语言的默认选项
    ///
    /// - Rust：枚举 `CharmEffect`，无命名空间
    /// - C++：枚举 `charm_effects`，命名空间 `mtce`
    pub fn for_target(target: Target) -> Self {
        let (enum_name, namespace) = match target {
            Target::Rust => ("CharmEffect", None),
            Target::Cpp => ("charm_effects", Some("mtce".to_string())),
        };
        Self {
            target,
            enum_name: enum_name.to_string(),
            count_name: DEFAULT_COUNT_NAME.to_string(),
            namespace,
            lookup: true,
            source_label: None,
        }
    }

    /// 校验生成代码中使用的名字
    pub fn validate(&self) -> CharmResult<()> {
        check_option("enum_name", &self.enum_name)?;
        check_option("count_name", &self.count_name)?;
        if let Some(ns) = &self.namespace {
            check_option("namespace", ns)?;
        }

        if self.enum_name == self.count_name || TABLE_NAMES.contains(&self.enum_name.as_str()) {
            return Err(CharmError::InvalidOption {
                option: "enum_name",
                value: self.enum_name.clone(),
            });
        }
        let sentinel_clash = match self.target {
            Target::Rust => self.lookup && self.count_name == rust::ALL_CONST,
            Target::Cpp => cpp::is_reserved_token(&self.count_name),
        };
        if sentinel_clash || TABLE_NAMES.contains(&self.count_name.as_str()) {
            return Err(CharmError::InvalidOption {
                option: "count_name",
                value: self.count_name.clone(),
            });
        }
        Ok(())
    }

    /// 枚举成员名是否与生成代码中的其他名字冲突
    ///
    /// - 与计数哨兵同名
    /// - Rust 开启查找代码时，与关联常量 `ALL` 同名
    /// - C++ 中的保留名或标准宏
    pub fn is_reserved_token(&self, token: &str) -> bool {
        token == self.count_name
            || match self.target {
                Target::Rust => self.lookup && token == rust::ALL_CONST,
                Target::Cpp => cpp::is_reserved_token(token),
            }
    }
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self::for_target(Target::default())
    }
}

fn check_option(option: &'static str, value: &str) -> CharmResult<()> {
    // `Self` 在 Rust 中不能作为类型名，统一拒绝
    if is_code_identifier(value) && value != "Self" {
        Ok(())
    } else {
        Err(CharmError::InvalidOption {
            option,
            value: value.to_string(),
        })
    }
}

/// 渲染效果表
pub fn emit(table: &EffectTable, options: &EmitOptions) -> CharmResult<String> {
    options.validate()?;

    if table.len() > MAX_EFFECTS {
        return Err(CharmError::TooManyEffects {
            count: table.len(),
            max: MAX_EFFECTS,
        });
    }

    for (index, id) in table.ids().iter().enumerate() {
        let token = id.enum_token();
        if options.is_reserved_token(&token) {
            return Err(CharmError::ReservedIdentifier { index, token });
        }
    }

    let source = match options.target {
        Target::Rust => rust::RustSource::new(table, options).to_string(),
        Target::Cpp => cpp::CppHeader::new(table, options).to_string(),
    };
    Ok(source)
}

/// 文件头注释文本
fn header_line(options: &EmitOptions) -> String {
    match &options.source_label {
        Some(label) => format!("@generated by charm-tables from {label}. DO NOT EDIT."),
        None => "@generated by charm-tables. DO NOT EDIT.".to_string(),
    }
}

/// 浮点字面量
///
/// 始终带小数点或指数，两种目标语言都按浮点解析。
fn float_literal(value: f64) -> String {
    format!("{value:?}")
}

fn bool_literal(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::parse_records;

    fn table(json: &str) -> EffectTable {
        EffectTable::compile(&parse_records(json).unwrap()).unwrap()
    }

    #[test]
    fn test_float_literal() {
        assert_eq!(float_literal(50.0), "50.0");
        assert_eq!(float_literal(0.25), "0.25");
        assert_eq!(float_literal(-3.0), "-3.0");
        assert_eq!(float_literal(1e21), "1e21");
    }

    #[test]
    fn test_defaults_per_target() {
        let rust = EmitOptions::for_target(Target::Rust);
        assert_eq!(rust.enum_name, "CharmEffect");
        assert_eq!(rust.namespace, None);
        assert_eq!(rust.count_name, "ABILITY_COUNT");
        assert!(rust.lookup);

        let cpp = EmitOptions::for_target(Target::Cpp);
        assert_eq!(cpp.enum_name, "charm_effects");
        assert_eq!(cpp.namespace.as_deref(), Some("mtce"));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let t = table("[]");

        let mut opts = EmitOptions::default();
        opts.enum_name = "Charm Effect".to_string();
        assert!(matches!(
            emit(&t, &opts),
            Err(CharmError::InvalidOption {
                option: "enum_name",
                ..
            })
        ));

        let mut opts = EmitOptions::default();
        opts.namespace = Some("a::b".to_string());
        assert!(matches!(
            emit(&t, &opts),
            Err(CharmError::InvalidOption {
                option: "namespace",
                ..
            })
        ));

        let mut opts = EmitOptions::default();
        opts.count_name = "EFFECT_CAPS".to_string();
        assert!(matches!(
            emit(&t, &opts),
            Err(CharmError::InvalidOption {
                option: "count_name",
                ..
            })
        ));

        let mut opts = EmitOptions::default();
        opts.enum_name = opts.count_name.clone();
        assert!(emit(&t, &opts).is_err());
    }

    #[test]
    fn test_effect_named_like_sentinel_rejected() {
        let t = table(
            r#"[
                {"effectName":"Armor","effectCap":1,"isPercent":false,"rarityValues":[1]},
                {"effectName":"Ability Count","effectCap":1,"isPercent":false,"rarityValues":[1]}
            ]"#,
        );
        assert_eq!(
            emit(&t, &EmitOptions::default()).unwrap_err(),
            CharmError::ReservedIdentifier {
                index: 1,
                token: "ABILITY_COUNT".to_string()
            }
        );

        // 换一个哨兵名即可通过
        let mut opts = EmitOptions::default();
        opts.count_name = "EFFECT_COUNT".to_string();
        assert!(emit(&t, &opts).is_ok());
    }

    #[test]
    fn test_effect_named_all_rejected_with_lookup() {
        let t = table(
            r#"[{"effectName":"All","effectCap":1,"isPercent":false,"rarityValues":[1]}]"#,
        );
        assert_eq!(
            emit(&t, &EmitOptions::default()).unwrap_err(),
            CharmError::ReservedIdentifier {
                index: 0,
                token: "ALL".to_string()
            }
        );

        // 不生成查找代码时没有 `ALL` 常量
        let mut opts = EmitOptions::default();
        opts.lookup = false;
        assert!(emit(&t, &opts).is_ok());

        // C++ 的查找函数不占用大写名字
        assert!(emit(&t, &EmitOptions::for_target(Target::Cpp)).is_ok());

        let mut opts = EmitOptions::default();
        opts.count_name = "ALL".to_string();
        assert!(matches!(
            emit(&table("[]"), &opts),
            Err(CharmError::InvalidOption {
                option: "count_name",
                ..
            })
        ));
    }

    #[test]
    fn test_cpp_reserved_tokens_rejected() {
        let t = table(
            r#"[
                {"effectName":"Armor","effectCap":1,"isPercent":false,"rarityValues":[1]},
                {"effectName":"Size Max","effectCap":1,"isPercent":false,"rarityValues":[1]}
            ]"#,
        );
        let cpp = EmitOptions::for_target(Target::Cpp);
        assert_eq!(
            emit(&t, &cpp).unwrap_err(),
            CharmError::ReservedIdentifier {
                index: 1,
                token: "SIZE_MAX".to_string()
            }
        );
        assert!(emit(&t, &EmitOptions::default()).is_ok());

        let t = table(
            r#"[{"effectName":"_Hidden","effectCap":1,"isPercent":false,"rarityValues":[1]}]"#,
        );
        assert!(matches!(
            emit(&t, &cpp),
            Err(CharmError::ReservedIdentifier { index: 0, .. })
        ));

        let mut opts = cpp.clone();
        opts.count_name = "INT8_MAX".to_string();
        assert!(matches!(
            emit(&table("[]"), &opts),
            Err(CharmError::InvalidOption {
                option: "count_name",
                ..
            })
        ));
    }

    #[test]
    fn test_target_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Target::Cpp).unwrap(), "\"cpp\"");
        let t: Target = serde_json::from_str("\"rust\"").unwrap();
        assert_eq!(t, Target::Rust);
    }
}
