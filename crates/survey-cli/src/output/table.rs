use serde_json::{Map, Value};

const MAX_CELL: usize = 48;

/// Rows of objects become columns in first-seen key order.
pub fn render_rows(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    let mut headers: Vec<String> = Vec::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }
    if headers.is_empty() {
        let rows = items.iter().map(|item| vec![cell(item)]).collect::<Vec<_>>();
        return layout(&["value".to_string()], &rows);
    }

    let rows = items
        .iter()
        .map(|item| {
            headers
                .iter()
                .map(|header| item.get(header).map_or_else(|| String::from("-"), cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    layout(&headers, &rows)
}

/// One `key  value` row per field.
pub fn render_pairs(map: &Map<String, Value>) -> String {
    let rows = map
        .iter()
        .map(|(key, value)| vec![key.clone(), cell(value)])
        .collect::<Vec<_>>();
    layout(&["key".to_string(), "value".to_string()], &rows)
}

/// Flatten a JSON value into a single truncated cell.
pub fn cell(value: &Value) -> String {
    let text = match value {
        Value::Null => String::from("-"),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    };
    truncate(&text)
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL {
        return text.to_string();
    }
    let mut out: String = text.chars().take(MAX_CELL - 1).collect();
    out.push('…');
    out
}

fn layout(headers: &[String], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|value| value.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header_line = line(headers);
    let divider = "-".repeat(header_line.chars().count());
    let mut lines = vec![header_line, divider];
    lines.extend(rows.iter().map(|row| line(row)));
    lines.join("\n")
}
