//! # Config 模块
//!
//! 生成配置管理。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (charm-gen.json)
//! 3. 默认值（最低）

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use charm_tables::{EmitOptions, Target};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 默认配置文件名（相对于当前目录）
pub const DEFAULT_CONFIG_FILE: &str = "charm-gen.json";

/// 配置文件内容
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct GenConfig {
    /// 输入文件（效果配置 JSON）
    #[serde(default)]
    pub input: Option<PathBuf>,

    /// 输出文件，未配置时写到 stdout
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// 目标语言（rust/cpp）
    #[serde(default)]
    pub target: Target,

    /// 枚举类型名，未配置时使用目标语言的默认值
    #[serde(default)]
    pub enum_name: Option<String>,

    /// 计数常量/哨兵名
    #[serde(default = "default_count_name")]
    pub count_name: String,

    /// 命名空间
    ///
    /// 未配置时使用目标语言的默认值；配置为空字符串表示不包裹命名空间。
    #[serde(default)]
    pub namespace: Option<String>,

    /// 是否生成按标识符查找的辅助代码
    #[serde(default = "default_lookup")]
    pub lookup: bool,
}

fn default_count_name() -> String {
    charm_tables::emit::DEFAULT_COUNT_NAME.to_string()
}

fn default_lookup() -> bool {
    true
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            target: Target::default(),
            enum_name: None,
            count_name: default_count_name(),
            namespace: None,
            lookup: default_lookup(),
        }
    }
}

impl GenConfig {
    /// 加载配置文件
    ///
    /// - 显式指定的文件必须存在且可解析
    /// - 未指定时尝试默认文件，不存在则使用默认配置
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !p.exists() {
                    debug!("未找到默认配置文件，使用默认配置");
                    return Ok(Self::default());
                }
                p
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("配置文件解析失败: {}", path.display()))?;
        info!(path = %path.display(), "配置文件加载成功");
        Ok(config)
    }
}

/// 命令行覆盖项
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub target: Option<Target>,
    pub enum_name: Option<String>,
    pub count_name: Option<String>,
    pub namespace: Option<String>,
    pub no_lookup: bool,
}

impl GenConfig {
    /// 合并命令行覆盖项，得到最终的生成选项
    pub fn emit_options(&self, overrides: &Overrides) -> EmitOptions {
        let target = overrides.target.unwrap_or(self.target);
        let mut options = EmitOptions::for_target(target);

        if let Some(name) = overrides.enum_name.as_ref().or(self.enum_name.as_ref()) {
            options.enum_name = name.clone();
        }
        options.count_name = overrides
            .count_name
            .clone()
            .unwrap_or_else(|| self.count_name.clone());
        if let Some(ns) = overrides.namespace.as_ref().or(self.namespace.as_ref()) {
            options.namespace = (!ns.is_empty()).then(|| ns.clone());
        }
        options.lookup = self.lookup && !overrides.no_lookup;

        options
    }
}
