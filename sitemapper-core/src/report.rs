// Report rendering for extraction results

use crate::extract::ExtractResponse;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use sitemapper_scanner::INDEX_MARKER_PREFIX;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportSummary {
    pub total_entries: usize,
    pub sitemaps: usize,
    pub pages: usize,
}

pub fn summarize(response: &ExtractResponse) -> ReportSummary {
    let sitemaps = response
        .urls
        .iter()
        .filter(|entry| entry.starts_with(INDEX_MARKER_PREFIX))
        .count();

    ReportSummary {
        total_entries: response.urls.len(),
        sitemaps,
        pages: response.urls.len() - sitemaps,
    }
}

pub fn render_report(response: &ExtractResponse, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(response)),
        ReportFormat::Json => generate_json_report(response),
    }
}

pub fn generate_text_report(response: &ExtractResponse) -> String {
    let summary = summarize(response);
    let mut report = String::new();

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Request type: {}\n", response.kind));
    report.push_str(&format!("  Entries: {}\n", summary.total_entries));
    report.push_str(&format!("  Child sitemaps: {}\n", summary.sitemaps));
    report.push_str(&format!("  Page URLs: {}\n", summary.pages));
    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    if response.urls.is_empty() {
        report.push_str("  No URLs found.\n");
        return report;
    }

    for entry in &response.urls {
        if let Some(child) = entry.strip_prefix(INDEX_MARKER_PREFIX) {
            report.push_str(&format!("\n## {}\n", child.bright_blue().bold()));
        } else {
            report.push_str(&format!("  {}\n", entry));
        }
    }

    report
}

pub fn generate_json_report(response: &ExtractResponse) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(response)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
