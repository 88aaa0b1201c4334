//! CLI output formatting module

use crate::config::{CliConfig, OutputFormat};
use cinelog_core::Result;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};

/// Widest a table cell may get before it is truncated
const MAX_CELL_WIDTH: usize = 40;

/// Output formatter for CLI results
pub struct OutputFormatter<'a> {
    format: OutputFormat,
    use_colors: bool,
    writer: Box<dyn Write + 'a>,
}

impl std::fmt::Debug for OutputFormatter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputFormatter")
            .field("format", &self.format)
            .field("use_colors", &self.use_colors)
            .finish_non_exhaustive()
    }
}

impl OutputFormatter<'static> {
    /// Create a new output formatter writing to stdout
    pub fn new(config: &CliConfig) -> Self {
        Self::with_format(config.default_output_format, config.use_colors)
    }

    /// Create a stdout formatter with specific format
    pub fn with_format(format: OutputFormat, use_colors: bool) -> Self {
        Self {
            format,
            use_colors: use_colors && crate::config::supports_color(),
            writer: Box::new(io::stdout()),
        }
    }
}

impl<'a> OutputFormatter<'a> {
    /// Create a formatter with custom writer
    ///
    /// Colors are taken as given; a custom writer is never a terminal check.
    pub fn with_writer<W: Write + 'a>(format: OutputFormat, use_colors: bool, writer: W) -> Self {
        Self {
            format,
            use_colors,
            writer: Box::new(writer),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format and output a serializable value
    pub fn output<T: Serialize>(&mut self, value: &T) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(value)?;
                writeln!(self.writer, "{}", json)?;
            }
            OutputFormat::Yaml => {
                let yaml = serde_yaml::to_string(value)?;
                write!(self.writer, "{}", yaml)?;
            }
            OutputFormat::Compact => {
                let json = serde_json::to_string(value)?;
                writeln!(self.writer, "{}", json)?;
            }
            OutputFormat::Pretty => {
                let json_value = serde_json::to_value(value)?;
                self.format_json_pretty(&json_value, 0)?;
            }
            OutputFormat::Table => {
                let json_value = serde_json::to_value(value)?;
                self.format_as_table(&json_value)?;
            }
        }
        Ok(())
    }

    /// Format JSON value in a pretty, human-readable way
    fn format_json_pretty(&mut self, value: &Value, indent: usize) -> Result<()> {
        let indent_str = "  ".repeat(indent);

        match value {
            Value::Object(map) => {
                for (key, val) in map {
                    match val {
                        Value::Object(_) | Value::Array(_) => {
                            writeln!(self.writer, "{}{}:", indent_str, self.colorize_key(key))?;
                            self.format_json_pretty(val, indent + 1)?;
                        }
                        _ => {
                            writeln!(
                                self.writer,
                                "{}{}: {}",
                                indent_str,
                                self.colorize_key(key),
                                self.format_value(val)
                            )?;
                        }
                    }
                }
            }
            Value::Array(arr) => {
                for (i, item) in arr.iter().enumerate() {
                    writeln!(self.writer, "{}[{}]:", indent_str, i + 1)?;
                    self.format_json_pretty(item, indent + 1)?;
                }
            }
            _ => {
                writeln!(self.writer, "{}{}", indent_str, self.format_value(value))?;
            }
        }
        Ok(())
    }

    /// Render rows as a boxed table
    ///
    /// An array of objects gets one column per key of its first element;
    /// a single object becomes a key/value table.
    fn format_as_table(&mut self, value: &Value) -> Result<()> {
        let (headers, rows): (Vec<String>, Vec<Vec<String>>) = match value {
            Value::Array(arr) => match arr.first() {
                Some(Value::Object(first)) => {
                    let headers: Vec<String> = first.keys().cloned().collect();
                    let rows = arr
                        .iter()
                        .map(|item| {
                            headers
                                .iter()
                                .map(|h| item.get(h).map(value_to_string).unwrap_or_default())
                                .collect()
                        })
                        .collect();
                    (headers, rows)
                }
                _ => (
                    vec!["#".to_string(), "Value".to_string()],
                    arr.iter()
                        .enumerate()
                        .map(|(i, item)| vec![(i + 1).to_string(), value_to_string(item)])
                        .collect(),
                ),
            },
            Value::Object(map) => (
                vec!["Key".to_string(), "Value".to_string()],
                map.iter()
                    .map(|(k, v)| vec![k.clone(), value_to_string(v)])
                    .collect(),
            ),
            other => {
                writeln!(self.writer, "{}", value_to_string(other))?;
                return Ok(());
            }
        };

        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(|cell| truncate(&cell)).collect())
            .collect();
        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                rows.iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let rule = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{}{}{}", left, segments.join(mid), right)
        };

        writeln!(self.writer, "{}", rule("┌", "┬", "┐"))?;
        self.write_row(&headers, &widths)?;
        writeln!(self.writer, "{}", rule("├", "┼", "┤"))?;
        for row in &rows {
            self.write_row(row, &widths)?;
        }
        writeln!(self.writer, "{}", rule("└", "┴", "┘"))?;
        Ok(())
    }

    fn write_row(&mut self, cells: &[String], widths: &[usize]) -> Result<()> {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!(" {}{} ", cell, " ".repeat(pad))
            })
            .collect();
        writeln!(self.writer, "│{}│", padded.join("│"))?;
        Ok(())
    }

    /// Format a single value with appropriate styling
    fn format_value(&self, value: &Value) -> String {
        if !self.use_colors {
            return value_to_string(value);
        }
        match value {
            Value::String(s) => format!("\x1b[32m{}\x1b[0m", s),
            Value::Number(n) => format!("\x1b[36m{}\x1b[0m", n),
            Value::Bool(b) => format!("\x1b[35m{}\x1b[0m", b),
            Value::Null => "\x1b[90mnull\x1b[0m".to_string(),
            other => value_to_string(other),
        }
    }

    /// Colorize a key name
    fn colorize_key(&self, key: &str) -> String {
        if self.use_colors {
            format!("\x1b[34m{}\x1b[0m", key)
        } else {
            key.to_string()
        }
    }

    /// Output a simple message
    pub fn message(&mut self, msg: &str) -> Result<()> {
        writeln!(self.writer, "{}", msg)?;
        Ok(())
    }

    /// Output a heading, underlined in pretty output
    pub fn heading(&mut self, title: &str) -> Result<()> {
        if self.use_colors {
            writeln!(self.writer, "\x1b[1m{}\x1b[0m", title)?;
        } else {
            writeln!(self.writer, "{}", title)?;
        }
        writeln!(self.writer, "{}", "=".repeat(title.chars().count()))?;
        Ok(())
    }

    /// Output a success message
    pub fn success(&mut self, msg: &str) -> Result<()> {
        if self.use_colors {
            writeln!(self.writer, "\x1b[32m✓\x1b[0m {}", msg)?;
        } else {
            writeln!(self.writer, "✓ {}", msg)?;
        }
        Ok(())
    }

    /// Output an error message
    pub fn error(&mut self, msg: &str) -> Result<()> {
        if self.use_colors {
            writeln!(self.writer, "\x1b[31m✗\x1b[0m {}", msg)?;
        } else {
            writeln!(self.writer, "✗ {}", msg)?;
        }
        Ok(())
    }

    /// Output an info message
    pub fn info(&mut self, msg: &str) -> Result<()> {
        if self.use_colors {
            writeln!(self.writer, "\x1b[34mℹ\x1b[0m {}", msg)?;
        } else {
            writeln!(self.writer, "ℹ {}", msg)?;
        }
        Ok(())
    }
}

/// Convert a JSON value to a plain string
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} keys}}", obj.len()),
    }
}

fn truncate(cell: &str) -> String {
    if cell.chars().count() <= MAX_CELL_WIDTH {
        return cell.to_string();
    }
    let kept: String = cell.chars().take(MAX_CELL_WIDTH - 3).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(format: OutputFormat, value: &Value) -> String {
        let mut output = Vec::new();
        {
            let mut formatter = OutputFormatter::with_writer(format, false, &mut output);
            formatter.output(value).unwrap();
        }
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_json_output() {
        let output = render(OutputFormat::Json, &json!({"title": "alien", "count": 2}));
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["count"], 2);
    }

    #[test]
    fn test_compact_output_is_one_line() {
        let output = render(OutputFormat::Compact, &json!([{"a": 1}, {"a": 2}]));
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_yaml_output() {
        let output = render(OutputFormat::Yaml, &json!({"title": "alien"}));
        assert!(output.contains("title: alien"));
    }

    #[test]
    fn test_table_output_for_rows() {
        let rows = json!([
            {"actor_name": "tom hanks", "count": 2},
            {"actor_name": "meg ryan", "count": 1}
        ]);
        let output = render(OutputFormat::Table, &rows);

        assert!(output.starts_with('┌'));
        assert!(output.contains("actor_name"));
        assert!(output.contains("│ tom hanks  │ 2     │"));
        assert_eq!(output.lines().count(), 6);
    }

    #[test]
    fn test_table_truncates_long_cells() {
        let long = "x".repeat(100);
        let output = render(OutputFormat::Table, &json!({ "title": long }));
        assert!(output.contains("..."));
        assert!(!output.contains(&"x".repeat(MAX_CELL_WIDTH)));
    }

    #[test]
    fn test_pretty_output_numbers_array_items() {
        let output = render(OutputFormat::Pretty, &json!([{"title": "alien"}]));
        assert!(output.contains("[1]:"));
        assert!(output.contains("title: alien"));
    }

    #[test]
    fn test_message_output() {
        let mut output = Vec::new();
        {
            let mut formatter =
                OutputFormatter::with_writer(OutputFormat::Pretty, false, &mut output);
            formatter.success("Operation completed").unwrap();
            formatter.error("Something went wrong").unwrap();
            formatter.info("For your information").unwrap();
            formatter.heading("Top actors").unwrap();
        }

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("✓ Operation completed"));
        assert!(output_str.contains("✗ Something went wrong"));
        assert!(output_str.contains("ℹ For your information"));
        assert!(output_str.contains("Top actors\n=========="));
        assert!(!output_str.contains("\x1b["));
    }
}
