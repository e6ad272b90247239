//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use clap::ValueEnum;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, Store};

/// Open the component database selected by `--db` or the config
pub fn open_store(global: &GlobalOpts, config: &Config) -> Result<Store> {
    let path = global
        .db
        .clone()
        .unwrap_or_else(|| config.database_path());
    Store::open(&path).map_err(|e| miette::miette!("{}", e))
}

/// Effective output format: `--format` wins, then the configured default
pub fn resolve_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    config
        .default_format
        .as_deref()
        .and_then(|name| OutputFormat::from_str(name, true).ok())
        .unwrap_or(OutputFormat::Auto)
}

/// Write content to a file, or to stdout when no path is given
pub fn write_output(content: &str, output_path: Option<&Path>) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            println!("Written to: {}", path.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

/// Render rows as a table in the requested format
///
/// TSV and CSV emit a header line followed by one line per row; `Md` uses a
/// markdown table and everything else a rounded terminal table.
pub fn render_table(headers: &[&str], rows: &[Vec<String>], format: OutputFormat) -> String {
    match format {
        OutputFormat::Tsv => std::iter::once(headers.join("\t"))
            .chain(rows.iter().map(|r| r.join("\t")))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Csv => std::iter::once(headers.join(","))
            .chain(
                rows.iter()
                    .map(|r| r.iter().map(|c| escape_csv(c)).collect::<Vec<_>>().join(",")),
            )
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Id => rows
            .iter()
            .filter_map(|r| r.first().cloned())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => {
            let mut builder = Builder::default();
            builder.push_record(headers.iter().map(|h| h.to_string()));
            for row in rows {
                builder.push_record(row.clone());
            }
            let mut table = builder.build();
            if format == OutputFormat::Md {
                table.with(Style::markdown());
            } else {
                table.with(Style::rounded());
            }
            table.to_string()
        }
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Format an optional value, showing "-" when absent
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(format: OutputFormat) -> GlobalOpts {
        GlobalOpts {
            format,
            quiet: false,
            verbose: false,
            db: None,
        }
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("Камера/Полезная нагрузка", 9), "Камера...");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("with\nnewline"), "\"with\nnewline\"");
    }

    #[test]
    fn test_resolve_format() {
        let config = Config {
            default_format: Some("json".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_format(&opts(OutputFormat::Auto), &config), OutputFormat::Json);
        assert_eq!(resolve_format(&opts(OutputFormat::Yaml), &config), OutputFormat::Yaml);

        let bogus = Config {
            default_format: Some("xml".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_format(&opts(OutputFormat::Auto), &bogus), OutputFormat::Auto);
    }

    #[test]
    fn test_render_table_tsv_and_id() {
        let rows = vec![
            vec!["1".to_string(), "DJI F450".to_string()],
            vec!["2".to_string(), "S500".to_string()],
        ];
        assert_eq!(
            render_table(&["ID", "Name"], &rows, OutputFormat::Tsv),
            "ID\tName\n1\tDJI F450\n2\tS500"
        );
        assert_eq!(render_table(&["ID", "Name"], &rows, OutputFormat::Id), "1\n2");
    }

    #[test]
    fn test_render_table_md() {
        let rows = vec![vec!["1".to_string(), "x".to_string()]];
        let md = render_table(&["ID", "Name"], &rows, OutputFormat::Md);
        assert!(md.contains("| ID | Name |"));
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(Some(5)), "5");
        assert_eq!(or_dash(None::<i32>), "-");
    }
}
