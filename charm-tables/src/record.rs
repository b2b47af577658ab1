//! # Record 模块
//!
//! 效果记录的解码。输入为 JSON 数组，每个元素是一个效果定义对象：
//!
//! ```json
//! {"effectName": "Crit Chance", "effectCap": 50, "isPercent": true, "rarityValues": [3]}
//! ```
//!
//! 字段名与类型固定，不接受其他 schema；未知的额外字段会被忽略。

use serde_json::{Map, Value};

use crate::error::{CharmError, CharmResult, RecordError};

/// 显示名字段
pub const FIELD_NAME: &str = "effectName";
/// 上限字段
pub const FIELD_CAP: &str = "effectCap";
/// 百分比标记字段
pub const FIELD_IS_PERCENT: &str = "isPercent";
/// 稀有度字段
pub const FIELD_RARITY: &str = "rarityValues";

/// 单条效果定义
#[derive(Debug, Clone, PartialEq)]
pub struct EffectRecord {
    /// 显示名
    pub effect_name: String,
    /// 数值上限
    pub effect_cap: f64,
    /// 上限是否为百分比
    pub is_percent: bool,
    /// 稀有度档位（非空）
    pub rarity_values: Vec<f64>,
}

impl EffectRecord {
    /// 从 JSON 值解码一条记录
    ///
    /// 按 `effectName`、`effectCap`、`isPercent`、`rarityValues` 的顺序检查，
    /// 返回遇到的第一个问题。
    pub fn from_value(index: usize, value: &Value) -> Result<Self, RecordError> {
        let Value::Object(obj) = value else {
            return Err(RecordError::NotAnObject {
                index,
                found: json_type_name(value),
            });
        };

        let effect_name = require(index, obj, FIELD_NAME)?
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| mismatch(index, obj, FIELD_NAME, "string"))?;

        let effect_cap = require(index, obj, FIELD_CAP)?
            .as_f64()
            .ok_or_else(|| mismatch(index, obj, FIELD_CAP, "number"))?;

        let is_percent = require(index, obj, FIELD_IS_PERCENT)?
            .as_bool()
            .ok_or_else(|| mismatch(index, obj, FIELD_IS_PERCENT, "boolean"))?;

        let rarity = require(index, obj, FIELD_RARITY)?
            .as_array()
            .ok_or_else(|| mismatch(index, obj, FIELD_RARITY, "array"))?;
        if rarity.is_empty() {
            return Err(RecordError::EmptySequence {
                index,
                field: FIELD_RARITY,
            });
        }
        let rarity_values = rarity
            .iter()
            .map(|v| {
                v.as_f64().ok_or_else(|| RecordError::TypeMismatch {
                    index,
                    field: FIELD_RARITY,
                    expected: "array of numbers",
                    found: json_type_name(v),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            effect_name,
            effect_cap,
            is_percent,
            rarity_values,
        })
    }

    /// 基础稀有度（第一个档位）
    ///
    /// 只有第一个档位参与派生，其余档位被忽略。
    /// 直接构造的记录可能没有任何档位，此时返回 `None`。
    pub fn base_rarity(&self) -> Option<f64> {
        self.rarity_values.first().copied()
    }
}

/// 解析整份输入文本
pub fn parse_records(source: &str) -> CharmResult<Vec<EffectRecord>> {
    let root: Value = serde_json::from_str(source)?;
    let Value::Array(items) = root else {
        return Err(CharmError::RootNotArray {
            found: json_type_name(&root),
        });
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| EffectRecord::from_value(index, item).map_err(CharmError::from))
        .collect()
}

/// JSON 值的类型名（用于错误消息）
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn require<'a>(
    index: usize,
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, RecordError> {
    obj.get(field)
        .ok_or(RecordError::MissingField { index, field })
}

fn mismatch(
    index: usize,
    obj: &Map<String, Value>,
    field: &'static str,
    expected: &'static str,
) -> RecordError {
    RecordError::TypeMismatch {
        index,
        field,
        expected,
        found: obj.get(field).map_or("nothing", json_type_name),
    }
}
