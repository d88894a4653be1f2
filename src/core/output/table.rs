//! Console table renderer.
//!
//! Renders a [`Report`] as a boxed text table:
//!
//! ```text
//! +-----------------+------------+------------+
//! |  Name           | 03-18(Mon) | 03-19(Tue) |
//! +-----------------+------------+------------+
//! | Alice(10001)    |     OK     |            |
//! +-----------------+------------+------------+
//! ```
//!
//! Column widths use display width, so CJK nicknames line up. Control
//! characters (line breaks inside nicknames) are shown as spaces.

use unicode_width::UnicodeWidthStr;

use crate::core::report::Report;

/// Rendering options for the console table.
///
/// The console encoding is passed here explicitly instead of being read from
/// the environment by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Name column is cut to this many characters.
    pub name_limit: usize,
    /// Replace every non-ASCII character with `?` (for legacy consoles).
    pub ascii_only: bool,
    /// Text shown in a day cell with a check-in.
    pub present_mark: String,
    /// Text shown in a day cell without a check-in.
    pub absent_mark: String,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            name_limit: 15,
            ascii_only: false,
            present_mark: "OK".to_string(),
            absent_mark: String::new(),
        }
    }
}

impl TableOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables ASCII-only output.
    #[must_use]
    pub fn with_ascii_only(mut self, ascii_only: bool) -> Self {
        self.ascii_only = ascii_only;
        self
    }

    /// Sets the name column limit.
    #[must_use]
    pub fn with_name_limit(mut self, limit: usize) -> Self {
        self.name_limit = limit;
        self
    }
}

/// Header of the name column.
pub const NAME_HEADER: &str = " Name";

/// Renders the report as a table string (ends with a newline).
pub fn render_table(report: &Report, options: &TableOptions) -> String {
    let header: Vec<String> = std::iter::once(NAME_HEADER.to_string())
        .chain(report.days.iter().map(|d| d.format("%m-%d(%a)").to_string()))
        .collect();

    let rows: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|row| {
            let name: String = row.display_name.chars().take(options.name_limit).collect();
            std::iter::once(name)
                .chain(row.cells.iter().map(|cell| {
                    if cell.is_present() {
                        options.present_mark.clone()
                    } else {
                        options.absent_mark.clone()
                    }
                }))
                .collect()
        })
        .collect();

    let sanitize = |s: &str| -> String {
        s.chars()
            .map(|c| match c {
                c if c.is_control() => ' ',
                c if options.ascii_only && !c.is_ascii() => '?',
                c => c,
            })
            .collect()
    };
    let header: Vec<String> = header.iter().map(|s| sanitize(s)).collect();
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|r| r.iter().map(|s| sanitize(s)).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.width()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let rule = {
        let mut line = String::from("+");
        for w in &widths {
            line.push_str(&"-".repeat(w + 2));
            line.push('+');
        }
        line.push('\n');
        line
    };

    let mut out = String::new();
    out.push_str(&rule);
    out.push_str(&render_line(&header, &widths));
    out.push_str(&rule);
    for row in &rows {
        out.push_str(&render_line(row, &widths));
    }
    if !rows.is_empty() {
        out.push_str(&rule);
    }
    out
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (i, (cell, &width)) in cells.iter().zip(widths).enumerate() {
        line.push(' ');
        if i == 0 {
            line.push_str(&align_left(cell, width));
        } else {
            line.push_str(&align_center(cell, width));
        }
        line.push_str(" |");
    }
    line.push('\n');
    line
}

fn align_left(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(pad))
}

fn align_center(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(s.width());
    let left = pad / 2;
    format!("{}{s}{}", " ".repeat(left), " ".repeat(pad - left))
}
