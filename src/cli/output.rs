//! Output formatting utilities for the CLI.

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use serde::Serialize;

/// Result of a command, printable for humans or as JSON
pub trait CommandOutput: Serialize {
    /// Human-readable rendering
    fn to_human(&self) -> String;
    /// JSON rendering for `--json`
    fn to_json(&self) -> serde_json::Value;
}

/// Print a command result to stdout
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Two-column key/value table without borders.
pub fn key_value_table<'a>(rows: impl IntoIterator<Item = (&'a str, String)>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(["SETTING", "VALUE"].map(|h| Cell::new(h).set_alignment(CellAlignment::Left)));
    for (key, value) in rows {
        table.add_row([Cell::new(key), Cell::new(value)]);
    }
    table
}

/// Placeholder shown for unset values.
pub fn or_unset(value: Option<impl ToString>) -> String {
    value.map_or_else(|| "(unset)".to_string(), |v| v.to_string())
}
