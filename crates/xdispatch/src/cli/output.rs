//! CLI output formatting utilities.

use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::Record;

#[derive(Tabled)]
struct DispatchRow {
    #[tabled(rename = "#")]
    seq: usize,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Window")]
    window: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Position")]
    position: String,
}

impl DispatchRow {
    fn new(seq: usize, record: &Record) -> Self {
        match record {
            Record::Callback { kind, window, time, position } => Self {
                seq,
                kind: kind.to_string(),
                window: window.to_string(),
                time: time.map_or_else(|| "-".to_string(), |t| t.to_string()),
                position: position.map_or_else(|| "-".to_string(), |(x, y)| format!("{x}, {y}")),
            },
            Record::Error { message, .. } => Self {
                seq,
                kind: "Error".red().to_string(),
                window: "-".to_string(),
                time: "-".to_string(),
                position: message.clone(),
            },
        }
    }
}

/// Prints the dispatch log as a table.
pub fn print_records_table(records: &[Record]) {
    if records.is_empty() {
        println!("{}", "Nothing was dispatched.".dimmed());
        return;
    }

    let rows = records.iter().enumerate().map(|(index, record)| DispatchRow::new(index + 1, record));
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::right()))
        .with(Modify::new(Columns::new(2..4)).with(Alignment::right()))
        .to_string();

    let errors = records.iter().filter(|record| matches!(record, Record::Error { .. })).count();
    let callbacks = records.len() - errors;
    println!("{}", format!("Dispatched ({callbacks} callbacks, {errors} errors)").bold());
    println!("{table}");
}

/// Prints the dispatch log as pretty JSON.
pub fn print_records_json(records: &[Record]) {
    let json = serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string());
    println!("{json}");
}
