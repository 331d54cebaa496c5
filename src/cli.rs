use clap::Parser;
use std::path::PathBuf;

use crate::config::{
    API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_SIZE, MODEL_ENV,
};
use crate::logger::{LogLevel, LoggerConfig};

/// Generate images with Seedream and save them under the project's pic/ directory.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Text prompt describing the image.
    pub prompt: String,

    /// Ark API key.
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output size, e.g. "2K" or "2048x2048".
    #[arg(long, default_value = DEFAULT_SIZE)]
    pub size: String,

    /// Disable the AI-generated watermark.
    #[arg(long)]
    pub no_watermark: bool,

    /// Maximum number of images to generate (1-4). Range-checked during
    /// configuration so bad values exit with status 1.
    #[arg(long, default_value = "1", allow_negative_numbers = true)]
    pub max_images: String,

    /// Directory to save images into. Defaults to <project root>/pic.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Ark API base URL.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Model identifier.
    #[arg(long, env = MODEL_ENV, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit log lines as JSON.
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    pub fn logger_config(&self) -> LoggerConfig {
        match (self.json_logs, self.verbose) {
            (true, true) => LoggerConfig::production().with_level(LogLevel::Debug),
            (true, false) => LoggerConfig::production(),
            (false, true) => LoggerConfig::development(),
            (false, false) => LoggerConfig::default(),
        }
    }
}
