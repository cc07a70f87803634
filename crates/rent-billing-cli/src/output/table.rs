use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::scalar_text;

/// Format output as tables using the tabled crate.
///
/// Scalar result fields go into a Field/Value table; nested lists such as
/// charge breakdowns, fees and unpaid bills each get a table of their own.
pub fn print_table(value: &Value) {
    let Value::Object(envelope) = value else {
        println!("{value}");
        return;
    };

    match envelope.get("result") {
        Some(Value::Object(result)) => print_record(result),
        Some(Value::Array(rows)) => print_rows(rows),
        Some(other) => println!("{}", scalar_text(other, "null")),
        None => print_record(envelope),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}

fn print_record(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut nested: Vec<(&str, &Vec<Value>)> = Vec::new();

    for (key, val) in map {
        match val {
            Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
                nested.push((key.as_str(), items));
            }
            _ => builder.push_record([key.as_str(), &cell(val)]),
        }
    }
    println!("{}", Table::from(builder));

    for (title, rows) in nested {
        println!("\n{title}:");
        print_rows(rows);
    }
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        if rows.is_empty() {
            println!("(none)");
        }
        for row in rows {
            println!("{}", cell(row));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for row in rows.iter().filter_map(Value::as_object) {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| row.get(h).map(cell).unwrap_or_default())
            .collect();
        builder.push_record(cells);
    }
    println!("{}", Table::from(builder));
}

fn cell(value: &Value) -> String {
    match value {
        // Nested lists inside a row (e.g. a room's unpaid bills) are counted.
        Value::Array(items) if items.iter().any(Value::is_object) => {
            format!("{} item(s)", items.len())
        }
        Value::Array(items) => items
            .iter()
            .map(|v| scalar_text(v, "null"))
            .collect::<Vec<_>>()
            .join(", "),
        other => scalar_text(other, "null"),
    }
}
