// 📣 Reporter - Show a freshly drawn year
// Pure output; nothing the engine does depends on it

use crate::error::{SantaError, SantaResult};
use crate::model::HistoryEntry;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON, same shape as the data file
    #[default]
    Json,
    /// One `giver -> recipient` line per pair
    Text,
}

pub trait Reporter {
    fn report(&mut self, entry: &HistoryEntry) -> SantaResult<()>;
}

fn report_error(err: impl std::fmt::Display) -> SantaError {
    SantaError::Report(err.to_string())
}

// ============================================================================
// JSON
// ============================================================================

pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        JsonReporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, entry: &HistoryEntry) -> SantaResult<()> {
        serde_json::to_writer_pretty(&mut self.out, entry).map_err(report_error)?;
        writeln!(self.out).map_err(report_error)
    }
}

// ============================================================================
// TEXT
// ============================================================================

pub struct TextReporter<W: Write> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        TextReporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn report(&mut self, entry: &HistoryEntry) -> SantaResult<()> {
        writeln!(self.out, "Year {}", entry.year).map_err(report_error)?;

        let width = entry
            .assignments
            .iter()
            .map(|a| a.from.chars().count())
            .max()
            .unwrap_or(0);

        for a in &entry.assignments {
            writeln!(self.out, "  {:<width$} -> {}", a.from, a.to).map_err(report_error)?;
        }
        Ok(())
    }
}

/// Reporter for `format` writing to `out`
pub fn reporter_for<'w, W: Write + 'w>(format: OutputFormat, out: W) -> Box<dyn Reporter + 'w> {
    match format {
        OutputFormat::Json => Box::new(JsonReporter::new(out)),
        OutputFormat::Text => Box::new(TextReporter::new(out)),
    }
}
