//! Writing timings to the console.

use std::io::{self, Write};

use crate::timing::TimingResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
}

/// Line-oriented writer for run banners and phase averages.
pub struct Reporter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn banner(&mut self, record_count: usize) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "recordCount = {}", record_count),
            OutputFormat::Csv => writeln!(
                self.out,
                "\"strategy\",\"operation\",\"trials\",\"total_ms\",\"avg_ms\""
            ),
        }
    }

    pub fn timing(&mut self, r: &TimingResult) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", r),
            OutputFormat::Csv => writeln!(
                self.out,
                "\"{}\",\"{}\",{},{},{}",
                r.strategy,
                r.operation,
                r.trial_count,
                r.total_elapsed_millis,
                r.average_millis()
            ),
        }?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
