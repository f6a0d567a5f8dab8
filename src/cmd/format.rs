/*!
format.rs

Human output for `pcaad` (JSON output paths do not use this module).

Rendering rules for a selected response value:
  - string / number / bool  -> one line
  - object                  -> NAME / VALUE table, nested values as compact JSON
  - array of objects        -> one row per element, columns in first-seen order
  - array of scalars        -> one line per element
  - null                    -> nothing

Color is on unless NO_COLOR is set or stdout is not a terminal. Width comes
from COLUMNS (clamped 40..=220), default 100.

Functions return strings and never print.
*/

use std::borrow::Cow;
use std::io::IsTerminal;

use serde_json::Value;

/* ---- Style Options ---- */

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    pub term_width: usize,
}

impl StyleOptions {
    pub fn detect() -> Self {
        let use_color = std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal();
        let term_width = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.clamp(40, 220))
            .unwrap_or(100);
        StyleOptions {
            use_color,
            term_width,
        }
    }

    /// No color, fixed width.
    #[cfg(test)]
    pub fn plain(term_width: usize) -> Self {
        StyleOptions {
            use_color: false,
            term_width,
        }
    }
}

/* ---- Color ---- */

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Accent,
    Warning,
    Error,
    Dim,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Accent => "38;5;213",
        Role::Warning => "38;5;214",
        Role::Error => "38;5;196",
        Role::Dim => "2",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

/* ---- Value Rendering ---- */

pub fn render(value: &Value, style: &StyleOptions) -> String {
    match value {
        Value::Null => String::new(),
        Value::Object(map) => {
            let rows: Vec<Vec<String>> = map
                .iter()
                .map(|(k, v)| vec![k.clone(), cell(v)])
                .collect();
            table(&["NAME", "VALUE"], &rows, TableOpts::default(), style)
        }
        Value::Array(items) if items.iter().any(Value::is_object) => {
            let mut columns: Vec<&str> = Vec::new();
            for item in items {
                if let Value::Object(map) = item {
                    for k in map.keys() {
                        if !columns.contains(&k.as_str()) {
                            columns.push(k);
                        }
                    }
                }
            }
            let rows: Vec<Vec<String>> = items
                .iter()
                .map(|item| {
                    columns
                        .iter()
                        .map(|c| item.get(*c).map(cell).unwrap_or_default())
                        .collect()
                })
                .collect();
            table(&columns, &rows, TableOpts::default(), style)
        }
        Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join("\n"),
        scalar => cell(scalar),
    }
}

/// Single-cell text for a value.
pub fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/* ---- Table Rendering ---- */

#[derive(Debug, Clone)]
pub struct TableOpts {
    pub max_width: usize,
    pub truncate: bool,
    pub header_sep: bool,
    pub min_col_width: usize,
}

impl Default for TableOpts {
    fn default() -> Self {
        Self {
            max_width: 0, // 0 -> style.term_width
            truncate: true,
            header_sep: true,
            min_col_width: 4,
        }
    }
}

pub fn table(headers: &[&str], rows: &[Vec<String>], opts: TableOpts, style: &StyleOptions) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let col_count = headers.len();
    let width_limit = if opts.max_width == 0 {
        style.term_width
    } else {
        opts.max_width.min(style.term_width)
    };

    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, c) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(display_width(c));
        }
    }

    // shrink the widest columns first
    let total_raw: usize = widths.iter().sum::<usize>() + (col_count - 1) * 2;
    if total_raw > width_limit {
        let mut overflow = total_raw - width_limit;
        let mut ordered: Vec<(usize, usize)> = widths.iter().copied().enumerate().collect();
        ordered.sort_by(|a, b| b.1.cmp(&a.1));
        for (idx, _) in ordered {
            if overflow == 0 {
                break;
            }
            if widths[idx] > opts.min_col_width {
                let shrink = (widths[idx] - opts.min_col_width).min(overflow);
                widths[idx] -= shrink;
                overflow -= shrink;
            }
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    let header = headers
        .iter()
        .enumerate()
        .map(|(i, h)| color(Role::Accent, pad_or_truncate(h, widths[i], opts.truncate), style))
        .collect::<Vec<_>>()
        .join("  ");
    lines.push(header.trim_end().to_string());

    if opts.header_sep {
        let sep = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ");
        lines.push(color(Role::Dim, sep, style));
    }

    for row in rows {
        let line = (0..col_count)
            .map(|c| pad_or_truncate(row.get(c).map(String::as_str).unwrap_or(""), widths[c], opts.truncate))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

fn pad_or_truncate(s: &str, width: usize, truncate: bool) -> String {
    let len = display_width(s);
    if len <= width {
        return format!("{s}{}", " ".repeat(width - len));
    }
    if !truncate {
        return s.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }
    let mut out: String = strip_ansi(s).chars().take(width - 1).collect();
    out.push('…');
    out
}

/* ---- ANSI / Width Utilities ---- */

fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    let mut buf = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // skip to the final byte of the CSI sequence
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        buf.push(ch);
    }
    Cow::Owned(buf)
}

fn display_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plain() -> StyleOptions {
        StyleOptions::plain(100)
    }

    #[test]
    fn scalar_is_a_line() {
        assert_eq!(render(&json!("arn:aws:x"), &plain()), "arn:aws:x");
        assert_eq!(render(&json!(true), &plain()), "true");
        assert_eq!(render(&Value::Null, &plain()), "");
    }

    #[test]
    fn object_renders_name_value() {
        let out = render(
            &json!({ "Arn": "a1", "VpcInformation": { "SecurityGroupIds": ["sg-1"] } }),
            &plain(),
        );
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("NAME"));
        assert!(lines[2].starts_with("Arn"));
        assert!(lines[3].contains(r#"{"SecurityGroupIds":["sg-1"]}"#));
    }

    #[test]
    fn array_of_objects_uses_union_of_keys() {
        let out = render(
            &json!([{ "Arn": "a1", "Status": "ACTIVE" }, { "Arn": "a2", "StatusReason": "x" }]),
            &plain(),
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Arn  Status  StatusReason");
        assert_eq!(lines[2], "a1   ACTIVE");
        assert_eq!(lines[3], "a2           x");
    }

    #[test]
    fn array_of_strings_one_per_line() {
        assert_eq!(render(&json!(["a", "b"]), &plain()), "a\nb");
    }

    #[test]
    fn narrow_table_truncates() {
        let t = table(
            &["NAME", "VALUE"],
            &[vec!["k".into(), "x".repeat(80)]],
            TableOpts::default(),
            &StyleOptions::plain(40),
        );
        let last = t.lines().last().unwrap();
        assert!(last.ends_with('…'));
        assert!(display_width(last) <= 40);
    }

    #[test]
    fn color_respected() {
        let on = StyleOptions {
            use_color: true,
            term_width: 80,
        };
        let s = color(Role::Error, "RED", &on);
        assert_ne!(s, "RED");
        assert_eq!(strip_ansi(&s), "RED");
        assert_eq!(color(Role::Error, "RED", &plain()), "RED");
    }
}
