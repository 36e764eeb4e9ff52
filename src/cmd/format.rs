/*!
format.rs

Column formatting for human output (help text, members, stats).

Goals:
  - Pad every column to its widest cell, two-space gutter.
  - Optional ANSI color, disabled by NO_COLOR or `StyleOptions::plain()`.
  - Width math ignores ANSI escapes so colored cells still line up.

Public API Summary:
  - StyleOptions::detect() / StyleOptions::plain()
  - color(role, text, &StyleOptions) -> String
  - columns(rows) -> Vec<String>
  - table(headers, rows, &StyleOptions) -> String

NOTE:
  - Nothing here prints; callers decide where the text goes.
  - JSON output paths do not use these helpers.
*/

use std::borrow::Cow;

/* -------------------------------------------------------------------------- */
/* Style Options                                                              */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleOptions {
    pub use_color: bool,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self::detect()
    }
}

impl StyleOptions {
    pub fn detect() -> Self {
        StyleOptions {
            use_color: std::env::var_os("NO_COLOR").is_none(),
        }
    }

    pub fn plain() -> Self {
        StyleOptions { use_color: false }
    }
}

/* -------------------------------------------------------------------------- */
/* Color                                                                      */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Accent,
    Success,
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
        Role::Success => "38;5;82",
        Role::Warning => "38;5;214",
        Role::Error => "38;5;196",
        Role::Dim => "2",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

/// Color a serf member status the way operators expect to scan it.
pub fn status(text: &str, style: &StyleOptions) -> String {
    let role = match text {
        "alive" => Role::Success,
        "leaving" => Role::Warning,
        "failed" => Role::Error,
        _ => Role::Dim,
    };
    color(role, text, style)
}

/* -------------------------------------------------------------------------- */
/* Columns                                                                    */
/* -------------------------------------------------------------------------- */

const GUTTER: &str = "  ";

/// Align `rows` into lines. Short rows are padded with empty cells; the
/// last column is never padded so lines carry no trailing spaces.
pub fn columns(rows: &[Vec<String>]) -> Vec<String> {
    let widths = column_widths(rows.iter().map(|r| r.as_slice()));
    rows.iter().map(|row| render_row(row, &widths)).collect()
}

/// Header row + dim separator + aligned body.
pub fn table(headers: &[&str], rows: &[Vec<String>], style: &StyleOptions) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let header_row: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let widths = column_widths(std::iter::once(header_row.as_slice()).chain(rows.iter().map(|r| r.as_slice())));

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(color(Role::Accent, render_row(&header_row, &widths), style));
    let sep = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join(GUTTER);
    out.push(color(Role::Dim, sep, style));
    for row in rows {
        out.push(render_row(row, &widths));
    }
    out.join("\n")
}

fn column_widths<'a>(rows: impl Iterator<Item = &'a [String]>) -> Vec<usize> {
    let mut widths: Vec<usize> = Vec::new();
    for row in rows {
        if row.len() > widths.len() {
            widths.resize(row.len(), 0);
        }
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(display_width(cell));
        }
    }
    widths
}

fn render_row(row: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            line.push_str(GUTTER);
        }
        let cell = row.get(i).map(String::as_str).unwrap_or("");
        if i + 1 == widths.len() {
            line.push_str(cell);
        } else {
            line.push_str(&pad(cell, *width));
        }
    }
    line.trim_end().to_string()
}

fn pad(s: &str, width: usize) -> String {
    let len = display_width(s);
    if len >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - len))
}

/* -------------------------------------------------------------------------- */
/* ANSI / Width Utilities                                                     */
/* -------------------------------------------------------------------------- */

fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    let mut buf = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // skip parameters up to and including the final letter
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        buf.push(c);
    }
    Cow::Owned(buf)
}

fn display_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                      */
/* -------------------------------------------------------------------------- */
