//! Output formatting for CLI

use crate::{
    tictactoe::{Cell, GameState},
    types::{Action, BOARD_WIDTH},
};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a ratio as a percentage with one decimal
pub fn format_percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Render the board as a grid, with the value of every scored empty cell
/// in place of the blank.
pub fn render_value_grid(state: &GameState, values: &[(Action, f64)]) -> String {
    let rendered: Vec<String> = state
        .cells()
        .iter()
        .enumerate()
        .map(|(index, cell)| match cell {
            Cell::Empty => values
                .iter()
                .find(|(action, _)| action.index() == index)
                .map(|(_, value)| format!("{value:>+7.3}"))
                .unwrap_or_else(|| format!("{:>7}", ".")),
            _ => format!("{:>7}", cell.to_char()),
        })
        .collect();

    rendered
        .chunks(BOARD_WIDTH)
        .map(|row| row.join(" |"))
        .collect::<Vec<_>>()
        .join(&format!("\n{}\n", "-".repeat(26)))
}
