pub mod ark;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod logger;
pub mod models;
pub mod pipeline;
pub mod project;
pub mod report;

pub use ark::{ArkClient, ImageClient};
pub use cli::Cli;
pub use config::{ArkConfig, Config};
pub use download::{DownloadReport, Downloader};
pub use error::{Result, SeedreamError};
pub use models::*;
pub use pipeline::{run, run_cli, run_cli_in};
pub use report::RunSummary;
