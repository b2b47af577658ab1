//! C++ 目标：生成 `#pragma once` 头文件，表以 `constexpr std::array` 形式给出。

use std::fmt::{self, Display, Formatter, Write as _};

use super::{
    CAPS_NAME, DISPLAY_NAMES_NAME, EmitOptions, IS_PERCENT_NAME, NAMES_NAME,
    ROUND_TO_INTEGER_NAME, bool_literal, float_literal, header_line,
};
use crate::table::EffectTable;

/// `<cstdint>`/`<climits>`/`<cstddef>` 等标准头中的宏，会替换掉同名的枚举成员
const STD_MACROS: &[&str] = &[
    "NULL", "EOF", "SIZE_MAX", "PTRDIFF_MIN", "PTRDIFF_MAX", "SIG_ATOMIC_MIN", "SIG_ATOMIC_MAX",
    "WCHAR_MIN", "WCHAR_MAX", "WINT_MIN", "WINT_MAX", "CHAR_BIT", "CHAR_MIN", "CHAR_MAX",
    "SCHAR_MIN", "SCHAR_MAX", "UCHAR_MAX", "SHRT_MIN", "SHRT_MAX", "USHRT_MAX", "INT_MIN",
    "INT_MAX", "UINT_MAX", "LONG_MIN", "LONG_MAX", "ULONG_MAX", "LLONG_MIN", "LLONG_MAX",
    "ULLONG_MAX",
];

/// 大写名字在 C++ 中是否不可用
///
/// - 以下划线开头或含双下划线的名字保留给实现
/// - 与标准头中的宏同名
pub(super) fn is_reserved_token(token: &str) -> bool {
    token.starts_with('_')
        || token.contains("__")
        || STD_MACROS.contains(&token)
        || is_int_macro(token)
}

/// `INT8_MAX`、`UINT_LEAST16_MIN`、`INTMAX_C` 一类的整数宏
fn is_int_macro(token: &str) -> bool {
    let body = token.strip_prefix('U').unwrap_or(token);
    let Some(body) = body.strip_prefix("INT") else {
        return false;
    };
    if let Some(width) = body.strip_suffix("_C") {
        return width == "MAX" || is_int_width(width);
    }
    let Some(width) = body
        .strip_suffix("_MAX")
        .or_else(|| body.strip_suffix("_MIN"))
    else {
        return false;
    };
    matches!(width, "MAX" | "PTR")
        || is_int_width(width)
        || ["_FAST", "_LEAST"]
            .iter()
            .any(|&prefix| width.strip_prefix(prefix).is_some_and(is_int_width))
}

fn is_int_width(s: &str) -> bool {
    matches!(s, "8" | "16" | "32" | "64")
}

pub(super) struct CppHeader<'a> {
    table: &'a EffectTable,
    options: &'a EmitOptions,
}

impl<'a> CppHeader<'a> {
    pub(super) fn new(table: &'a EffectTable, options: &'a EmitOptions) -> Self {
        Self { table, options }
    }

    fn write_body(&self, f: &mut Formatter<'_>, pad: &str) -> fmt::Result {
        let enum_name = &self.options.enum_name;
        let count = &self.options.count_name;

        writeln!(f, "{pad}enum class {enum_name} : std::uint16_t")?;
        writeln!(f, "{pad}{{")?;
        for id in self.table.ids() {
            writeln!(f, "{pad}    {},", id.enum_token())?;
        }
        writeln!(f, "{pad}    {count}")?;
        writeln!(f, "{pad}}};")?;
        writeln!(f)?;

        writeln!(
            f,
            "{pad}inline static constexpr std::size_t {count} = static_cast<std::size_t>({enum_name}::{count});"
        )?;
        writeln!(f)?;

        let caps: Vec<String> = self.table.caps().iter().map(|&c| float_literal(c)).collect();
        write_array(f, pad, CAPS_NAME, "double", count, &caps)?;
        writeln!(f)?;

        let names: Vec<String> = self
            .table
            .ids()
            .iter()
            .map(|id| string_literal(id.as_str()))
            .collect();
        write_array(f, pad, NAMES_NAME, "std::string_view", count, &names)?;
        writeln!(f)?;

        let display: Vec<String> = self
            .table
            .display_names()
            .iter()
            .map(|name| string_literal(name))
            .collect();
        write_array(f, pad, DISPLAY_NAMES_NAME, "std::string_view", count, &display)?;
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
            writeln!(f)?;
            writeln!(
                f,
                "{pad}inline constexpr std::optional<{enum_name}> name_to_id(std::string_view name)"
            )?;
            writeln!(f, "{pad}{{")?;
            writeln!(f, "{pad}    for (std::size_t i = 0; i < {count}; i++)")?;
            writeln!(f, "{pad}    {{")?;
            writeln!(f, "{pad}        if ({NAMES_NAME}[i] == name)")?;
            writeln!(f, "{pad}        {{")?;
            writeln!(f, "{pad}            return static_cast<{enum_name}>(i);")?;
            writeln!(f, "{pad}        }}")?;
            writeln!(f, "{pad}    }}")?;
            writeln!(f, "{pad}    return std::nullopt;")?;
            writeln!(f, "{pad}}}")?;
        }
        Ok(())
    }
}

impl Display for CppHeader<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "// {}", header_line(self.options))?;
        writeln!(f, "#pragma once")?;
        writeln!(f)?;
        writeln!(f, "#include <array>")?;
        writeln!(f, "#include <cstddef>")?;
        writeln!(f, "#include <cstdint>")?;
        if self.options.lookup {
            writeln!(f, "#include <optional>")?;
        }
        writeln!(f, "#include <string_view>")?;
        writeln!(f)?;

        match &self.options.namespace {
            Some(ns) => {
                writeln!(f, "namespace {ns}")?;
                writeln!(f, "{{")?;
                self.write_body(f, "    ")?;
                writeln!(f, "}} // namespace {ns}")
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
    let decl = format!("{pad}inline static constexpr std::array<{ty}, {count}> {name}");
    if items.is_empty() {
        return writeln!(f, "{decl} = {{}};");
    }
    writeln!(f, "{decl} = {{")?;
    for item in items {
        writeln!(f, "{pad}    {},", item.as_ref())?;
    }
    writeln!(f, "{pad}}};")
}

/// C++ 字符串字面量
///
/// 控制字符用三位八进制转义，避免 `\x` 吞掉后续十六进制字符。
fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
