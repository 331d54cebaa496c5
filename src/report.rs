use std::path::PathBuf;

use crate::{
    download::DownloadReport,
    models::{DownloadFailure, DownloadedFile, UsageReport},
};

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    pub received: usize,
    pub files: Vec<DownloadedFile>,
    pub failures: Vec<DownloadFailure>,
    pub usage: Option<UsageReport>,
}

impl RunSummary {
    pub fn new(
        output_dir: PathBuf,
        received: usize,
        downloads: DownloadReport,
        usage: Option<UsageReport>,
    ) -> Self {
        Self {
            output_dir,
            received,
            files: downloads.files,
            failures: downloads.failures,
            usage,
        }
    }

    pub fn failed_indices(&self) -> Vec<usize> {
        self.failures.iter().map(|f| f.index).collect()
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Saved {}/{} image(s) to {}",
            self.files.len(),
            self.received,
            self.output_dir.display()
        )];
        for file in &self.files {
            lines.push(format!("  {}", file.path.display()));
        }
        if !self.failures.is_empty() {
            let indices: Vec<String> = self
                .failed_indices()
                .iter()
                .map(|i| i.to_string())
                .collect();
            lines.push(format!("Failed image(s): {}", indices.join(", ")));
        }
        lines
    }

    pub fn print(&self) {
        for line in self.lines() {
            println!("{}", line);
        }
    }
}

pub fn report_usage(usage: Option<&UsageReport>) {
    match usage {
        Some(report @ UsageReport::Stats(_)) => log::info!("Usage: {}", report),
        Some(report @ UsageReport::Raw(_)) => log::info!("Usage (raw): {}", report),
        None => log::debug!("Response carried no usage information"),
    }
}
