//! Output formatting for CLI commands.

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;

const CLI_SCHEMA_VERSION: &str = "arkr.cli.v1";

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text.
    #[default]
    Text,
    /// JSON format.
    Json,
}

/// Print a single value. Text output is the bare value, so it can be piped.
pub fn print_value<T: Serialize>(value: &str, data: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{value}"),
        OutputFormat::Json => println!("{}", format_json(data)),
    }
}

/// Print data as schema-wrapped JSON.
pub fn print_json<T: Serialize>(data: &T) {
    println!("{}", format_json(data));
}

/// Print labelled fields, one per line; absent fields are shown dimmed.
pub fn print_fields<T: Serialize>(fields: &[(&str, Option<&str>)], data: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for (name, value) in fields {
                match value {
                    Some(value) => println!("{} {value}", format!("{name}:").bold()),
                    None => println!("{} {}", format!("{name}:").bold(), "-".dimmed()),
                }
            }
        }
        OutputFormat::Json => println!("{}", format_json(data)),
    }
}

fn format_json<T: Serialize + ?Sized>(data: &T) -> String {
    let value = serde_json::to_value(data).unwrap_or_else(|_| serde_json::json!({}));
    let wrapped = serde_json::json!({
        "schemaVersion": CLI_SCHEMA_VERSION,
        "data": value
    });
    serde_json::to_string_pretty(&wrapped).unwrap_or_else(|_| "{}".to_string())
}
