//! Dashboard utilities: status bar and result summary formatting.

use crate::shell::Tab;

/// Key hints for the status bar, per tab.
pub fn key_hints(tab: Tab) -> &'static str {
    match tab {
        Tab::Database => "F5 run query",
        Tab::Scripts => "Enter edit  Esc/S-Tab list  \u{2191}\u{2193} select  ^S save  ^L reload",
        Tab::Prompt => "F5 test prompt",
        Tab::Python => "F5 run code",
    }
}

/// Format a row count for the results title.
pub fn format_row_count(rows: usize) -> String {
    if rows == 1 {
        "1 row".into()
    } else {
        format!("{rows} rows")
    }
}

/// Format the acknowledgment for a non-SELECT statement.
pub fn format_executed(message: &str, rows_affected: Option<i64>) -> String {
    match rows_affected {
        Some(n) => format!("{message} ({n} rows affected)"),
        None => message.to_string(),
    }
}
