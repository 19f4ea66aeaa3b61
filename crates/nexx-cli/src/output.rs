//! Terminal output

use colored::Colorize;
use nexx_notify::{NoticeSink, NotificationResult};

/// Prints dispatcher notices to stderr
pub struct StderrNotices;

impl NoticeSink for StderrNotices {
    fn notice(&self, message: &str) {
        eprintln!("{} {}", "notice:".yellow().bold(), message);
    }
}

pub fn print_result(result: &NotificationResult) -> anyhow::Result<()> {
    if let Some(payload) = result.payload() {
        println!("{}", serde_json::to_string_pretty(payload)?);
        return Ok(());
    }

    let reason = result
        .error
        .as_ref()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "unknown failure".to_string());
    eprintln!("{} {}", "error:".red().bold(), reason);

    if !result.raw.is_empty() {
        eprintln!("{}", serde_json::to_string_pretty(&result.raw)?);
    }

    Ok(())
}
