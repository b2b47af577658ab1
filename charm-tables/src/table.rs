//! # Table 模块
//!
//! 效果表编译核心：把效果记录列表一次性转换为按位置对齐的多列数据。
//!
//! ## 不变量
//!
//! - 所有列长度相同，等于输入记录数
//! - 第 `i` 个元素在每一列中都描述第 `i` 条输入记录
//! - 输出顺序严格等于输入顺序，不排序、不合并

use std::collections::HashMap;

use crate::error::RecordError;
use crate::ident::EffectId;
use crate::record::{EffectRecord, FIELD_CAP, FIELD_RARITY};

/// 基础稀有度达到该值时，效果数值取整显示
pub const ROUND_TO_INTEGER_THRESHOLD: f64 = 5.0;

/// 编译后的效果表
///
/// 列式存储，只提供只读访问。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectTable {
    ids: Vec<EffectId>,
    caps: Vec<f64>,
    display_names: Vec<String>,
    percent_flags: Vec<bool>,
    round_flags: Vec<bool>,
}

impl EffectTable {
    /// 编译记录列表
    ///
    /// 记录可以不经 [`EffectRecord::from_value`] 直接构造，这里重新检查
    /// 上限是否有限、稀有度是否为空；之后遇到第一个非法标识符或重复标识符即返回错误。
    pub fn compile(records: &[EffectRecord]) -> Result<Self, RecordError> {
        let mut table = Self::with_capacity(records.len());
        let mut seen: HashMap<String, usize> = HashMap::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            if !record.effect_cap.is_finite() {
                return Err(RecordError::TypeMismatch {
                    index,
                    field: FIELD_CAP,
                    expected: "finite number",
                    found: "non-finite number",
                });
            }
            let Some(base_rarity) = record.base_rarity() else {
                return Err(RecordError::EmptySequence {
                    index,
                    field: FIELD_RARITY,
                });
            };

            let id = EffectId::derive(&record.effect_name);
            id.validate(index, &record.effect_name)?;
            if let Some(&first_index) = seen.get(id.as_str()) {
                return Err(RecordError::DuplicateIdentifier {
                    index,
                    first_index,
                    identifier: id.to_string(),
                });
            }
            seen.insert(id.to_string(), index);

            table.push(id, record, base_rarity >= ROUND_TO_INTEGER_THRESHOLD);
        }

        Ok(table)
    }

    fn with_capacity(n: usize) -> Self {
        Self {
            ids: Vec::with_capacity(n),
            caps: Vec::with_capacity(n),
            display_names: Vec::with_capacity(n),
            percent_flags: Vec::with_capacity(n),
            round_flags: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, id: EffectId, record: &EffectRecord, round: bool) {
        self.ids.push(id);
        self.caps.push(record.effect_cap);
        self.display_names.push(record.effect_name.clone());
        self.percent_flags.push(record.is_percent);
        self.round_flags.push(round);
    }

    /// 效果数量
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// 标识符列（枚举顺序）
    pub fn ids(&self) -> &[EffectId] {
        &self.ids
    }

    /// 上限列
    pub fn caps(&self) -> &[f64] {
        &self.caps
    }

    /// 显示名列
    pub fn display_names(&self) -> &[String] {
        &self.display_names
    }

    /// 百分比标记列
    pub fn percent_flags(&self) -> &[bool] {
        &self.percent_flags
    }

    /// 取整标记列
    pub fn round_flags(&self) -> &[bool] {
        &self.round_flags
    }

    /// 按标识符查找位置
    pub fn index_of(&self, identifier: &str) -> Option<usize> {
        self.ids.iter().position(|id| id.as_str() == identifier)
    }
}
