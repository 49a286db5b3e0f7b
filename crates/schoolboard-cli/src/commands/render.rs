//! Terminal tables.

use comfy_table::{Cell, Table};
use serde_json::Value;

use schoolboard_core::form::FormSpec;
use schoolboard_core::model::{Assessment, ResourceKind};
use schoolboard_core::timetable::TimetableGrid;
use schoolboard_report::Labels;

const MAX_CELL: usize = 40;

/// Plain-text rendering of a JSON field value.
pub fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_CELL {
        return s.to_string();
    }
    let mut out: String = s.chars().take(MAX_CELL - 3).collect();
    out.push_str("...");
    out
}

fn record_id(record: &Value) -> String {
    value_text(record.get("_id").or_else(|| record.get("id")))
}

/// One row per record, one column per form field.
pub fn records_table(kind: ResourceKind, records: &[Value]) -> Table {
    let spec = FormSpec::for_kind(kind);
    let mut table = Table::new();

    let mut header = vec!["ID"];
    header.extend(spec.fields.iter().map(|f| f.label));
    table.set_header(header);

    for record in records {
        let mut row = vec![Cell::new(record_id(record))];
        row.extend(
            spec.fields
                .iter()
                .map(|f| Cell::new(truncate(&value_text(record.get(f.name))))),
        );
        table.add_row(row);
    }
    table
}

/// Every field of one record, as a two-column table.
pub fn record_table(record: &Value) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    if let Value::Object(map) = record {
        for (key, value) in map {
            table.add_row(vec![Cell::new(key), Cell::new(value_text(Some(value)))]);
        }
    }
    table
}

pub fn grid_table(grid: &TimetableGrid, labels: &Labels) -> Table {
    let mut table = Table::new();
    let mut header = vec!["Time".to_string()];
    header.extend(grid.days.iter().map(|d| d.to_string()));
    table.set_header(header);

    for (slot, row) in grid.slots.iter().zip(&grid.rows) {
        let mut cells = vec![Cell::new(slot)];
        cells.extend(row.iter().map(|entry| match entry {
            Some(entry) => Cell::new(labels.cell_text(entry)),
            None => Cell::new(""),
        }));
        table.add_row(cells);
    }
    table
}

pub fn assessments_table(assessments: &[Assessment]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Term", "Start", "End", "Status", "Can move to"]);
    for a in assessments {
        let next: Vec<&str> = a.status.next_statuses().iter().map(|s| s.as_str()).collect();
        table.add_row(vec![
            Cell::new(&a.id),
            Cell::new(truncate(&a.name)),
            Cell::new(&a.term_id),
            Cell::new(a.start_date.format("%Y-%m-%d")),
            Cell::new(a.end_date.format("%Y-%m-%d")),
            Cell::new(a.status),
            Cell::new(next.join(", ")),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_text_flattens_scalars() {
        assert_eq!(value_text(Some(&json!("x"))), "x");
        assert_eq!(value_text(Some(&json!(7))), "7");
        assert_eq!(value_text(Some(&json!(null))), "");
        assert_eq!(value_text(None), "");
    }

    #[test]
    fn long_cells_are_shortened() {
        let long = "a".repeat(100);
        let short = truncate(&long);
        assert_eq!(short.chars().count(), MAX_CELL);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn table_uses_form_columns() {
        let table = records_table(
            ResourceKind::Class,
            &[json!({"_id": "k1", "name": "Grade 7A", "gradeLevel": "7"})],
        );
        let text = table.to_string();
        assert!(text.contains("Grade level"));
        assert!(text.contains("Grade 7A"));
        assert!(text.contains("k1"));
    }
}
