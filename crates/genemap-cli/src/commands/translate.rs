//! `genemap translate` command implementation

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::OutputFormat;
use colored::Colorize;
use genemap_core::{GeneValue, KeyType, QueryValue, Snapshot, Strategy, Translation, Translator};
use std::io::BufRead;

/// One output line
#[derive(Debug, Clone, PartialEq)]
struct Row {
    query: QueryValue,
    value: Option<GeneValue>,
    strategy: Option<Strategy>,
}

/// Translate queries and print the results with a summary of failures
pub async fn run(
    config: &Config,
    queries: Vec<String>,
    from: KeyType,
    to: KeyType,
    format: OutputFormat,
    explain: bool,
) -> Result<()> {
    let queries = expand_stdin(queries, std::io::stdin().lock())?;
    if queries.is_empty() {
        return Err(CliError::NoQueries);
    }

    let snapshot_path = config.snapshot_path();
    if !snapshot_path.exists() {
        return Err(CliError::not_built(snapshot_path.display().to_string()));
    }
    let translator = Snapshot::load(&snapshot_path)?
        .into_translator()
        .with_verbosity(false);

    let translation = translator.translate(queries, from, to)?;
    let rows = collect_rows(&translator, &translation, from, to, explain)?;

    let output = match format {
        OutputFormat::Table => format_as_table(&rows, from, to, explain),
        OutputFormat::Json => format_as_json(&rows, from, to, explain)?,
        OutputFormat::Tsv => format_as_tsv(&rows, from, to, explain),
    };
    print!("{output}");

    print_report(&translation);
    Ok(())
}

/// Replace each `-` argument with the non-empty lines of `stdin`
fn expand_stdin(args: Vec<String>, stdin: impl BufRead) -> Result<Vec<String>> {
    if !args.iter().any(|arg| arg == "-") {
        return Ok(args);
    }

    let mut piped = Vec::new();
    for line in stdin.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            piped.push(line.to_string());
        }
    }

    let mut queries = Vec::new();
    for arg in args {
        if arg == "-" {
            queries.append(&mut piped);
        } else {
            queries.push(arg);
        }
    }
    Ok(queries)
}

fn collect_rows(
    translator: &Translator,
    translation: &Translation,
    from: KeyType,
    to: KeyType,
    explain: bool,
) -> Result<Vec<Row>> {
    translation
        .results
        .iter()
        .map(|(query, value)| {
            let strategy = if explain {
                translator.resolve(query, from, to)?.strategy()
            } else {
                None
            };
            Ok(Row {
                query: query.clone(),
                value: value.clone(),
                strategy,
            })
        })
        .collect()
}

fn headers(from: KeyType, to: KeyType, explain: bool) -> Vec<String> {
    let mut headers = vec![from.to_string(), to.to_string()];
    if explain {
        headers.push("resolved_by".to_string());
    }
    headers
}

fn cells(row: &Row, explain: bool) -> Vec<String> {
    let mut cells = vec![
        row.query.to_string(),
        row.value.as_ref().map(ToString::to_string).unwrap_or_default(),
    ];
    if explain {
        cells.push(row.strategy.map(Strategy::as_str).unwrap_or("-").to_string());
    }
    cells
}

fn format_as_table(rows: &[Row], from: KeyType, to: KeyType, explain: bool) -> String {
    use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(headers(from, to, explain));

    for row in rows {
        table.add_row(cells(row, explain));
    }

    format!("{table}\n")
}

fn format_as_tsv(rows: &[Row], from: KeyType, to: KeyType, explain: bool) -> String {
    let mut output = headers(from, to, explain).join("\t");
    output.push('\n');
    for row in rows {
        output.push_str(&cells(row, explain).join("\t"));
        output.push('\n');
    }
    output
}

fn format_as_json(rows: &[Row], from: KeyType, to: KeyType, explain: bool) -> Result<String> {
    let entries: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            let mut entry = serde_json::Map::new();
            entry.insert(from.to_string(), serde_json::to_value(&row.query)?);
            entry.insert(to.to_string(), serde_json::to_value(&row.value)?);
            if explain {
                entry.insert(
                    "resolved_by".to_string(),
                    serde_json::to_value(row.strategy.map(Strategy::as_str))?,
                );
            }
            Ok(serde_json::Value::Object(entry))
        })
        .collect::<std::result::Result<_, serde_json::Error>>()?;

    Ok(format!("{}\n", serde_json::to_string_pretty(&entries)?))
}

/// Diagnostic summary on stderr, so piped output stays machine-readable
fn print_report(translation: &Translation) {
    let report = &translation.report;
    if !report.not_found.is_empty() {
        eprintln!(
            "{} {} genes were not found: {}",
            "⚠".yellow(),
            report.not_found.len(),
            join(&report.not_found)
        );
    }
    if !report.missing_translation.is_empty() {
        eprintln!(
            "{} {} translations are missing: {}",
            "⚠".yellow(),
            report.missing_translation.len(),
            join(&report.missing_translation)
        );
    }
}

fn join(values: &[QueryValue]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
