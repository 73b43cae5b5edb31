use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

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

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let prefs = ui::prefs();
    let options = table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.color,
    };

    let rows = match serde_json::to_value(value)? {
        Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| (key, value_to_cell(&value)))
            .collect::<Vec<_>>(),
        scalar => vec![(String::from("value"), value_to_cell(&scalar))],
    };
    Ok(table::render_key_values(&rows, options))
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use renta_core::responses::EndpointResponse;

    use super::render;
    use crate::cli::OutputFormat;

    fn endpoint() -> EndpointResponse {
        EndpointResponse {
            url: "ws://rentagpt.com/chat".into(),
            host: Some("rentagpt.com".into()),
            matched_route: None,
        }
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&endpoint(), OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["url"], "ws://rentagpt.com/chat");
        assert!(parsed["matched_route"].is_null());
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&endpoint(), OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
        assert!(out.contains("\"host\":\"rentagpt.com\""));
    }

    #[test]
    fn table_render_lists_every_field() {
        let out = render(&endpoint(), OutputFormat::Table).expect("table render should work");
        let keys: Vec<&str> = out
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains(&"url"));
        assert!(out.contains("matched_route  -"));
    }
}
