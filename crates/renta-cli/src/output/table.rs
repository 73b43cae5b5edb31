#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Render `key  value` rows with the keys padded to one column.
#[must_use]
pub fn render_key_values(rows: &[(String, String)], options: TableOptions) -> String {
    let key_width = rows
        .iter()
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);
    let value_width = options
        .max_width
        .map(|max| max.saturating_sub(key_width + 2).max(8));

    rows.iter()
        .map(|(key, value)| {
            let value = match value_width {
                Some(width) => truncate_text(value, width),
                None => value.clone(),
            };
            let value = if options.color {
                colorize_value(&value)
            } else {
                value
            };
            let pad = key_width - key.chars().count();
            format!("{key}{}  {value}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate_text(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn colorize_value(value: &str) -> String {
    let code = match value {
        "true" | "complete" | "keyring" | "env" | "file" => Some("32"),
        "false" | "error" | "null" => Some("31"),
        _ => None,
    };

    match code {
        Some(code) => format!("\u{1b}[{code}m{value}\u{1b}[0m"),
        None => value.to_string(),
    }
}
