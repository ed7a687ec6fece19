//! `cachebro init`: register the MCP server with every detected host

use std::io::Write;

use crate::config::Result;
use crate::merge::{merge_registration, render_document, MergeStatus};
use crate::targets::{manual_snippet, ConfigTarget};

/// Summary of one `init` run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstallReport {
    /// Hosts that are configured after this run (newly or already)
    pub configured_count: usize,
    /// Per-host outcome, in registry order
    pub results: Vec<(String, MergeStatus)>,
    /// Hosts whose config could not be written, with the error message
    pub failures: Vec<(String, String)>,
}

/// Merge the registration into each target in order and print the outcome
///
/// A failure on one host is reported and does not stop the others. Only
/// errors writing to `out` are returned.
pub fn install_all<W: Write>(targets: &[ConfigTarget], out: &mut W) -> Result<InstallReport> {
    let mut report = InstallReport::default();

    for target in targets {
        let status = match merge_registration(target) {
            Ok(status) => status,
            Err(e) => {
                tracing::error!("Failed to configure {}: {:#}", target.name, e);
                writeln!(out, "  {}: failed ({:#})", target.name, e)?;
                report.failures.push((target.name.to_string(), format!("{:#}", e)));
                continue;
            }
        };

        match status {
            MergeStatus::Configured => {
                writeln!(out, "  {}: configured ({})", target.name, target.path.display())?;
                report.configured_count += 1;
            }
            MergeStatus::AlreadyConfigured => {
                writeln!(out, "  {}: already configured", target.name)?;
                report.configured_count += 1;
            }
            MergeStatus::Skipped => {
                writeln!(out, "  {}: not detected, skipped", target.name)?;
            }
        }
        report.results.push((target.name.to_string(), status));
    }

    if report.configured_count == 0 {
        let lead = if report.failures.is_empty() {
            "No supported tools detected."
        } else {
            "Could not configure any detected tool."
        };
        writeln!(out, "{} You can manually add cachebro to your MCP config:", lead)?;
        write!(out, "{}", render_document(&manual_snippet())?)?;
    } else {
        writeln!(out, "\nDone! Restart your editor to pick up cachebro.")?;
    }

    Ok(report)
}
