//! Rust 目标：生成可直接 `include!` 的模块源码。

use std::fmt::{self, Display, Formatter};

use super::{
    CAPS_NAME, DISPLAY_NAMES_NAME, EmitOptions, IS_PERCENT_NAME, NAMES_NAME,
    ROUND_TO_INTEGER_NAME, bool_literal, float_literal, header_line,
};
use crate::table::EffectTable;

/// 查找辅助代码中列出全部成员的关联常量，与大写的枚举成员共用命名空间
pub(super) const ALL_CONST: &str = "ALL";

pub(super) struct RustSource<'a> {
    table: &'a EffectTable,
    options: &'a EmitOptions,
}

impl<'a> RustSource<'a> {
    pub(super) fn new(table: &'a EffectTable, options: &'a EmitOptions) -> Self {
        Self { table, options }
    }

    fn write_body(&self, f: &mut Formatter<'_>, pad: &str) -> fmt::Result {
        let enum_name = &self.options.enum_name;
        let count = &self.options.count_name;
        let tokens: Vec<String> = self.table.ids().iter().map(|id| id.enum_token()).collect();

        writeln!(f, "{pad}#[allow(non_camel_case_types)]")?;
        writeln!(
            f,
            "{pad}#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]"
        )?;
        writeln!(f, "{pad}#[repr(u16)]")?;
        writeln!(f, "{pad}pub enum {enum_name} {{")?;
        for token in tokens.iter().chain(std::iter::once(count)) {
            writeln!(f, "{pad}    {token},")?;
        }
        writeln!(f, "{pad}}}")?;
        writeln!(f)?;

        writeln!(
            f,
            "{pad}pub const {count}: usize = {enum_name}::{count} as usize;"
        )?;
        writeln!(f)?;

        let caps: Vec<String> = self.table.caps().iter().map(|&c| float_literal(c)).collect();
        write_array(f, pad, CAPS_NAME, "f64", count, &caps)?;
        writeln!(f)?;

        let names: Vec<String> = self
            .table
            .ids()
            .iter()
            .map(|id| format!("{:?}", id.as_str()))
            .collect();
        write_array(f, pad, NAMES_NAME, "&str", count, &names)?;
        writeln!(f)?;

        let display: Vec<String> = self
            .table
            .display_names()
            .iter()
            .map(|name| format!("{name:?}"))
            .collect();
        write_array(f, pad, DISPLAY_NAMES_NAME, "&str", count, &display)?;
        writeln!(f)?;

        let percent: Vec<&str> = self
            .table
            .percent_flags()
            .iter()
            .map(|&b| bool_literal(b))
            .collect();
        write_array(f, pad, IS_PERCENT_NAME, "bool", count, &percent)?;
        writeln!(f)?;

        let round: Vec<&str> = self
            .table
            .round_flags()
            .iter()
            .map(|&b| bool_literal(b))
            .collect();
        write_array(f, pad, ROUND_TO_INTEGER_NAME, "bool", count, &round)?;

        if self.options.lookup {
            self.write_lookup(f, pad, &tokens)?;
        }
        Ok(())
    }

    fn write_lookup(&self, f: &mut Formatter<'_>, pad: &str, tokens: &[String]) -> fmt::Result {
        let enum_name = &self.options.enum_name;
        let count = &self.options.count_name;
        let all: Vec<String> = tokens.iter().map(|t| format!("Self::{t}")).collect();

        writeln!(f)?;
        writeln!(f, "{pad}impl {enum_name} {{")?;
        writeln!(f, "{pad}    /// 全部效果（不含哨兵），按表顺序排列")?;
        if all.is_empty() {
            writeln!(f, "{pad}    pub const {ALL_CONST}: [Self; {count}] = [];")?;
        } else {
            writeln!(f, "{pad}    pub const {ALL_CONST}: [Self; {count}] = [")?;
            for item in &all {
                writeln!(f, "{pad}        {item},")?;
            }
            writeln!(f, "{pad}    ];")?;
        }
        writeln!(f)?;
        writeln!(f, "{pad}    /// 在各常量表中的下标")?;
        writeln!(f, "{pad}    pub const fn index(self) -> usize {{")?;
        writeln!(f, "{pad}        self as usize")?;
        writeln!(f, "{pad}    }}")?;
        writeln!(f)?;
        writeln!(f, "{pad}    /// 按标识符查找效果")?;
        writeln!(f, "{pad}    pub fn from_name(name: &str) -> Option<Self> {{")?;
        writeln!(f, "{pad}        match name {{")?;
        for (id, token) in self.table.ids().iter().zip(tokens) {
            writeln!(
                f,
                "{pad}            {:?} => Some(Self::{token}),",
                id.as_str()
            )?;
        }
        writeln!(f, "{pad}            _ => None,")?;
        writeln!(f, "{pad}        }}")?;
        writeln!(f, "{pad}    }}")?;
        writeln!(f, "{pad}}}")?;
        Ok(())
    }
}

impl Display for RustSource<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "// {}", header_line(self.options))?;
        writeln!(f)?;

        match &self.options.namespace {
            Some(ns) => {
                writeln!(f, "pub mod {ns} {{")?;
                self.write_body(f, "    ")?;
                writeln!(f, "}}")
            }
            None => self.write_body(f, ""),
        }
    }
}

fn write_array<S: AsRef<str>>(
    f: &mut Formatter<'_>,
    pad: &str,
    name: &str,
    ty: &str,
    count: &str,
    items: &[S],
) -> fmt::Result {
    if items.is_empty() {
        writeln!(f, "{pad}pub const {name}: [{ty}; {count}] = [];")?;
    } else {
        writeln!(f, "{pad}pub const {name}: [{ty}; {count}] = [")?;
        for item in items {
            writeln!(f, "{pad}    {},", item.as_ref())?;
        }
        writeln!(f, "{pad}];")?;
    }
    Ok(())
}
