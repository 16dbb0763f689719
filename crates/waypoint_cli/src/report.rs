//! Output formatting for recorded callbacks

use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;

use crate::runner::{CallbackKind, Record};

/// How `waypoint run` prints callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Aligned human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Write every record in the chosen format
pub fn write_records(out: &mut impl Write, records: &[Record], format: Format) -> Result<()> {
    for record in records {
        match format {
            Format::Text => writeln!(out, "{}", text_line(record))?,
            Format::Json => writeln!(out, "{}", serde_json::to_string(record)?)?,
        }
    }
    Ok(())
}

fn text_line(record: &Record) -> String {
    let velocity = match record.velocity {
        Some(v) => format!("{:.3}", v),
        None => "-".to_string(),
    };
    format!(
        "[step {:>3} @ {:>8.1}ms] {:<8} progress={:.3} velocity={}",
        record.step,
        record.at_ms,
        record.callback.as_str(),
        record.progress,
        velocity
    )
}

/// Counts per callback kind
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub enters: usize,
    pub progresses: usize,
    pub exits: usize,
}

impl Summary {
    pub fn from_records(records: &[Record]) -> Self {
        records
            .iter()
            .fold(Self::default(), |mut summary, record| {
                match record.callback {
                    CallbackKind::Enter => summary.enters += 1,
                    CallbackKind::Progress => summary.progresses += 1,
                    CallbackKind::Exit => summary.exits += 1,
                }
                summary
            })
    }
}
