//! Output formatting utilities for CLI commands

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};

/// Print a table with headers and rows
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for row in rows {
        table.add_row(row);
    }

    println!("{}", table);
}

/// Shorten long text (formulas) for table cells, on a char boundary.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Describe a column's formula for display.
///
/// Examples:
/// - data column, no formula -> ""
/// - data column with default -> "default: 100"
/// - formula column -> "= $a + $b"
pub fn describe_formula(is_formula: bool, formula: &str) -> String {
    match (is_formula, formula.is_empty()) {
        (_, true) => String::new(),
        (true, false) => format!("= {}", truncate(formula, 48)),
        (false, false) => format!("default: {}", truncate(formula, 40)),
    }
}
