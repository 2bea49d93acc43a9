//! Panel layout used when printing a command
//!
//! The panel is drawn as 5 rows by 8 columns, numbered down each column:
//! switch = 5 * col + 1 + row.

use super::mapping::Switch;
use super::set::SwitchSet;

pub const ROWS: u8 = 5;
pub const COLUMNS: u8 = 8;

/// Switch number shown at a grid position
pub fn switch_at(row: u8, col: u8) -> u8 {
    5 * col + 1 + row
}

/// Label for a single grid cell
pub fn cell_label(number: u8, switches: &SwitchSet) -> String {
    if number == Switch::EXECUTE.number() {
        "[EXEC]".to_string()
    } else if number == Switch::CLEAR.number() {
        "[CLR ]".to_string()
    } else if switches.is_active(number) {
        format!("[S{:02}]", number)
    } else {
        "[---]".to_string()
    }
}

/// Render the whole panel, one line per row
pub fn render_grid(switches: &SwitchSet) -> String {
    let mut out = String::new();
    for row in 0..ROWS {
        let cells: Vec<String> = (0..COLUMNS)
            .map(|col| cell_label(switch_at(row, col), switches))
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}
