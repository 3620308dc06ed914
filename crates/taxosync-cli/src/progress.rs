//! Console progress reporting for import runs
//!
//! Drives an indicatif bar over the row count and prints one colored
//! line per completed row via the engine's progress sink.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use taxosync_core::progress::{ProgressSink, RowEvent, RowStatus};

/// Progress sink printing per-row results above a progress bar.
pub struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    pub fn new(total_rows: usize) -> Self {
        let bar = ProgressBar::new(total_rows as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} rows")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for ConsoleProgress {
    fn row_completed(&self, event: RowEvent) {
        match event.status {
            RowStatus::Resolved {
                chain,
                species,
                accepted,
            } => {
                let line = match accepted {
                    Some(accepted) => format!(
                        "{} row {}: {} (synonym of taxon {})",
                        "✓".green(),
                        event.index,
                        chain,
                        accepted
                    ),
                    None => format!("{} row {}: {} ({})", "✓".green(), event.index, chain, species),
                };
                self.bar.println(line);
            }
            RowStatus::Failed { kind, message } => {
                self.bar.println(format!(
                    "{} row {}: {} ({})",
                    "✗".red(),
                    event.index,
                    message,
                    kind
                ));
            }
        }
        self.bar.inc(1);
    }
}
