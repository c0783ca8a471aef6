//! Headless commands
//!
//! `index` prints the user-message index of a transcript; `config` shows or
//! initializes the configuration file.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::config::Config;
use crate::core::{excerpt, HostDocument, IndexedMessage, MessageIndex};
use crate::transcript::{Transcript, TranscriptWatcher};

/// Output format of `index`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Everything `index` reports about a transcript
#[derive(Debug, Serialize)]
pub struct IndexReport {
    pub file: String,
    pub messages: usize,
    pub user_messages: usize,
    /// Lines that could not be parsed
    pub skipped_lines: usize,
    pub index: Vec<IndexedMessage>,
}

/// Read a whole transcript file once
pub fn load_transcript(path: &Path) -> Result<(Transcript, usize)> {
    if !path.is_file() {
        bail!("Transcript not found: {}", path.display());
    }
    let mut transcript = Transcript::new(path.display().to_string());
    let mut watcher = TranscriptWatcher::new(path, std::time::Duration::ZERO);
    watcher.read_new(&mut transcript)?;
    Ok((transcript, watcher.skipped()))
}

pub fn build_report(path: &Path) -> Result<IndexReport> {
    let (transcript, skipped_lines) = load_transcript(path)?;
    let nodes = transcript.message_nodes();
    let index = MessageIndex::build(&nodes);
    Ok(IndexReport {
        file: path.display().to_string(),
        messages: nodes.len(),
        user_messages: index.len(),
        skipped_lines,
        index: index.iter().cloned().collect(),
    })
}

/// Print the user-message index of a transcript
pub fn run_index(path: &Path, format: OutputFormat, preview_chars: usize) -> Result<()> {
    let report = build_report(path)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            println!(
                "\n{} {}",
                "===".bold().cyan(),
                report.file.as_str().bold().cyan()
            );
            println!(
                "{} messages, {} from the user",
                report.messages, report.user_messages
            );
            if report.skipped_lines > 0 {
                println!(
                    "{}",
                    format!("{} unreadable lines skipped", report.skipped_lines).yellow()
                );
            }
            println!();

            if report.index.is_empty() {
                println!("No user messages.");
                return Ok(());
            }

            #[derive(Tabled)]
            struct IndexRow {
                #[tabled(rename = "#")]
                position: usize,
                #[tabled(rename = "Message")]
                order: usize,
                #[tabled(rename = "Preview")]
                preview: String,
            }

            let rows: Vec<IndexRow> = report
                .index
                .iter()
                .enumerate()
                .map(|(position, entry)| IndexRow {
                    position: position + 1,
                    order: entry.order + 1,
                    preview: excerpt(&entry.text.replace('\n', " "), preview_chars),
                })
                .collect();

            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{}", table);
        }
    }
    Ok(())
}

/// Show the effective configuration, optionally writing the defaults first
pub fn run_config(path: &Path, init: bool) -> Result<()> {
    if init {
        if path.exists() {
            bail!("{} already exists", path.display());
        }
        Config::default()
            .save_to(path)
            .with_context(|| format!("Failed to initialize {}", path.display()))?;
        println!("{} {}", "Wrote".green(), path.display());
    }

    let config = Config::load_from(path)?;
    println!("{} {}", "# config file:".dimmed(), path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts_user_messages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.jsonl");
        std::fs::write(
            &path,
            concat!(
                r#"{"role":"user","content":"first"}"#,
                "\n",
                "garbage\n",
                r#"{"role":"assistant","content":"reply"}"#,
                "\n",
                r#"{"role":"user","content":"second"}"#,
                "\n",
            ),
        )
        .unwrap();

        let report = build_report(&path).unwrap();
        assert_eq!(report.messages, 3);
        assert_eq!(report.user_messages, 2);
        assert_eq!(report.skipped_lines, 1);
        assert_eq!(report.index[1].order, 2);
        assert_eq!(report.index[1].text, "second");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(build_report(&dir.path().join("absent.jsonl")).is_err());
    }
}
