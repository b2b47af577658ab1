//! # Error 模块
//!
//! 定义 charm-tables 中使用的错误类型。
//!
//! 所有错误都是输入校验错误，在单次编译过程中发现；
//! 第一个错误即终止整个编译，不产生任何部分输出。

use thiserror::Error;

/// 单条效果记录的错误
///
/// `index` 为记录在输入数组中的位置（从 0 开始）。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// 缺少必需字段
    #[error("records[{index}]：缺少字段 `{field}`")]
    MissingField { index: usize, field: &'static str },

    /// 字段类型不匹配
    #[error("records[{index}]：字段 `{field}` 应为 {expected}，实际为 {found}")]
    TypeMismatch {
        index: usize,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// 序列为空
    #[error("records[{index}]：字段 `{field}` 至少需要一个元素")]
    EmptySequence { index: usize, field: &'static str },

    /// 记录本身不是对象
    #[error("records[{index}]：记录应为对象，实际为 {found}")]
    NotAnObject { index: usize, found: &'static str },

    /// 规范化后的标识符无法作为枚举成员
    #[error("records[{index}]：显示名 \"{name}\" 规范化为 '{identifier}'，不是合法的标识符")]
    InvalidIdentifier {
        index: usize,
        name: String,
        identifier: String,
    },

    /// 两条记录规范化为同一标识符
    #[error("records[{index}]：标识符 '{identifier}' 与 records[{first_index}] 重复")]
    DuplicateIdentifier {
        index: usize,
        first_index: usize,
        identifier: String,
    },
}

/// charm-tables 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CharmError {
    /// 输入不是合法 JSON
    #[error("JSON 解析失败（第 {line} 行，第 {column} 列）: {message}")]
    Json {
        line: usize,
        column: usize,
        message: String,
    },

    /// 顶层不是数组
    #[error("输入顶层应为数组，实际为 {found}")]
    RootNotArray { found: &'static str },

    /// 记录错误
    #[error("记录错误: {0}")]
    Record(#[from] RecordError),

    /// 枚举成员与哨兵、生成的常量或目标语言保留名冲突
    #[error("records[{index}]：枚举成员 '{token}' 在生成代码中是保留名")]
    ReservedIdentifier { index: usize, token: String },

    /// 效果数量超出枚举底层类型范围
    #[error("效果数量 {count} 超出上限 {max}")]
    TooManyEffects { count: usize, max: usize },

    /// 生成选项无效
    #[error("生成选项 `{option}` 的值 '{value}' 不是合法的标识符")]
    InvalidOption { option: &'static str, value: String },

    /// 文件读写失败
    #[error("文件操作失败 {path}: {message}")]
    Io { path: String, message: String },
}

impl From<serde_json::Error> for CharmError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        }
    }
}

impl CharmError {
    /// 从 IO 错误构造，附带路径
    pub fn io(path: impl AsRef<std::path::Path>, e: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            message: e.to_string(),
        }
    }
}

/// Result 类型别名
pub type CharmResult<T> = Result<T, CharmError>;
