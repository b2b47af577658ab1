//! # Ident 模块
//!
//! 从显示名派生效果标识符。
//!
//! - 标识符：显示名转小写，空格替换为下划线，其余字符不变
//! - 枚举成员：标识符转大写（由标识符派生，而不是由显示名独立派生）
//!
//! 例如 `"Fire Resist"` → `fire_resist` / `FIRE_RESIST`。

use std::fmt;

use crate::error::RecordError;

/// 规范化后的效果标识符
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(String);

impl EffectId {
    /// 从显示名派生标识符
    pub fn derive(display_name: &str) -> Self {
        Self(display_name.to_lowercase().replace(' ', "_"))
    }

    /// 标识符字符串
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 枚举成员名
    pub fn enum_token(&self) -> String {
        self.0.to_uppercase()
    }

    /// 是否可以同时作为字符串键和枚举成员名
    ///
    /// 只允许 `[a-z0-9_]`，不能以数字开头，不能全是下划线。
    pub fn is_valid(&self) -> bool {
        let s = self.as_str();
        let Some(first) = s.chars().next() else {
            return false;
        };
        !first.is_ascii_digit()
            && s.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
            && s.chars().any(|c| c != '_')
    }

    /// 校验标识符，不合法时返回 [`RecordError::InvalidIdentifier`]
    pub fn validate(&self, index: usize, display_name: &str) -> Result<(), RecordError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(RecordError::InvalidIdentifier {
                index,
                name: display_name.to_string(),
                identifier: self.0.clone(),
            })
        }
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EffectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 生成代码中使用的类型/常量/命名空间名是否合法
pub(crate) fn is_code_identifier(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && s.chars().any(|c| c != '_')
}
