use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Objects with an array field named `items` or `questions` render that
/// array as the table body; other objects render as key/value rows.
fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let value = serde_json::to_value(value)?;
    Ok(match value {
        Value::Array(items) => table::render_rows(&items),
        Value::Object(map) => {
            let body = ["items", "questions"]
                .into_iter()
                .find_map(|key| map.get(key).and_then(Value::as_array));
            match body {
                Some(items) => table::render_rows(items),
                None => table::render_pairs(&map),
            }
        }
        scalar => table::cell(&scalar),
    })
}
