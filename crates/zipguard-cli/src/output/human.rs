//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::cli::Operation;
use anyhow::Result;
use console::Term;
use console::style;
use std::path::Path;
use zipguard_core::ExtractionReport;
use zipguard_core::HashOutcome;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    out: Term,
    err: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            out: Term::stdout(),
            err: Term::stderr(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn heading(&self, term: &Term, text: &str) {
        if self.use_colors {
            let _ = term.write_line(&format!("{} {text}", style("✓").green().bold()));
        } else {
            let _ = term.write_line(text);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_hash_result(&self, archive: &Path, outcome: &HashOutcome) -> Result<()> {
        // Printed even when quiet.
        self.out.write_line(outcome.fingerprint.as_str())?;

        if self.verbose && !self.quiet {
            self.heading(&self.err, &format!("Archive valid: {}", archive.display()));
            let _ = self.err.write_line(&format!(
                "  Files:    {}",
                Self::format_number(outcome.report.valid.len())
            ));
            if !outcome.report.omitted.is_empty() {
                let _ = self.err.write_line(&format!(
                    "  Omitted:  {}",
                    Self::format_number(outcome.report.omitted.len())
                ));
            }
        }

        Ok(())
    }

    fn format_extraction_result(&self, target: &Path, report: &ExtractionReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.heading(
            &self.out,
            &format!("Extraction complete: {}", target.display()),
        );

        let _ = self.out.write_line(&format!(
            "  Files extracted: {}",
            Self::format_number(report.files_extracted)
        ));
        let _ = self.out.write_line(&format!(
            "  Directories: {}",
            Self::format_number(report.directories_created)
        ));
        let _ = self.out.write_line(&format!(
            "  Total size: {}",
            Self::format_size(report.bytes_written)
        ));

        if self.verbose {
            if report.files_skipped > 0 {
                let _ = self.out.write_line(&format!(
                    "  Files skipped: {}",
                    Self::format_number(report.files_skipped)
                ));
            }
            let _ = self
                .out
                .write_line(&format!("  Duration: {:?}", report.duration));
        }

        Ok(())
    }

    fn format_error(&self, _operation: Operation, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err.write_line(&format!("ERROR: {error:?}"));
        }
    }
}
