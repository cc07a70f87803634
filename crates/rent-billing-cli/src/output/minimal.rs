use serde_json::Value;

use super::scalar_text;

/// Fields that answer each command, in priority order.
const PRIORITY_KEYS: [&str; 8] = [
    "total_cost_text",
    "words",
    "total_debt",
    "cost",
    "usage",
    "paid_amount",
    "consecutive_months",
    "total_cost",
];

/// Print just the key answer value from the output.
///
/// Fleet warnings print one `room_id: consecutive_months` line per room.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            for key in PRIORITY_KEYS {
                if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                    println!("{}", scalar_text(val, "null"));
                    return;
                }
            }
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, scalar_text(val, "null"));
            }
        }
        Value::Array(rooms) => {
            for room in rooms {
                let id = room.get("room_id").map(|v| scalar_text(v, "?"));
                let months = room.get("consecutive_months").map(|v| scalar_text(v, "0"));
                match (id, months) {
                    (Some(id), Some(months)) => println!("{id}: {months}"),
                    _ => println!("{}", scalar_text(room, "null")),
                }
            }
        }
        other => println!("{}", scalar_text(other, "null")),
    }
}
