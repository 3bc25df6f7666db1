use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Print one dashboard panel as a markdown table, headed by its panel
/// number and title (mirroring the numbered chart sections of the
/// dashboard it replaces).
pub fn print_panel<T>(panel_no: usize, title: &str, rows: &[T])
where
    T: Tabled + Clone,
{
    println!("[{}] {}", panel_no, title);
    if rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(rows.to_vec()).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

/// Print a value as pretty JSON to stdout. Nothing is written to disk;
/// the dashboard produces no persisted output.
pub fn print_json<T: Serialize>(label: &str, value: &T) -> Result<(), serde_json::Error> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{}:\n{}\n", label, s);
    Ok(())
}
