use std::path::{Path, PathBuf};

use crate::{
    cli::Cli,
    error::{Result, SeedreamError},
    models::{GenerationRequest, MAX_IMAGES, MIN_IMAGES},
    project,
};

pub const API_KEY_ENV: &str = "ARK_API_KEY";
pub const BASE_URL_ENV: &str = "ARK_BASE_URL";
pub const MODEL_ENV: &str = "SEEDREAM_MODEL";

pub const DEFAULT_BASE_URL: &str = "https://ark.cn-beijing.volces.com/api/v3";
pub const DEFAULT_MODEL: &str = "doubao-seedream-4-0-250828";
pub const DEFAULT_SIZE: &str = "2K";

#[derive(Debug, Clone, Default)]
pub struct ArkConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

impl ArkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// The key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DEFAULT_MODEL)
    }
}

/// Everything one invocation needs, resolved from arguments and environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub prompt: String,
    pub size: String,
    pub watermark: bool,
    pub max_images: u8,
    pub output_dir: PathBuf,
    pub ark: ArkConfig,
}

impl Config {
    pub fn new(prompt: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Config {
            prompt: prompt.into(),
            size: DEFAULT_SIZE.to_string(),
            watermark: true,
            max_images: MIN_IMAGES,
            output_dir: output_dir.into(),
            ark: ArkConfig::new(),
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    pub fn with_watermark(mut self, watermark: bool) -> Self {
        self.watermark = watermark;
        self
    }

    pub fn with_max_images(mut self, max_images: u8) -> Self {
        self.max_images = max_images;
        self
    }

    pub fn with_ark(mut self, ark: ArkConfig) -> Self {
        self.ark = ark;
        self
    }

    /// Resolves the command line against `cwd` and validates the result.
    /// Touches neither the network nor the filesystem beyond marker lookups.
    pub fn from_cli(cli: &Cli, cwd: &Path) -> Result<Self> {
        let mut ark = ArkConfig::new()
            .with_base_url(cli.base_url.clone())
            .with_model(cli.model.clone());
        ark.api_key = cli.api_key.clone();

        if ark.api_key().is_none() {
            return Err(missing_api_key());
        }

        let max_images = cli
            .max_images
            .trim()
            .parse::<u8>()
            .map_err(|_| max_images_out_of_range(&cli.max_images))?;

        let output_dir = match &cli.output_dir {
            Some(dir) => dir.clone(),
            None => project::default_output_dir(cwd),
        };

        let config = Config::new(cli.prompt.clone(), output_dir)
            .with_size(cli.size.clone())
            .with_watermark(!cli.no_watermark)
            .with_max_images(max_images)
            .with_ark(ark);
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ark.api_key().is_none() {
            return Err(missing_api_key());
        }
        if !(MIN_IMAGES..=MAX_IMAGES).contains(&self.max_images) {
            return Err(max_images_out_of_range(self.max_images));
        }
        Ok(())
    }

    pub fn generation_request(&self) -> GenerationRequest {
        GenerationRequest {
            prompt: self.prompt.clone(),
            size: self.size.clone(),
            watermark: self.watermark,
            max_images: self.max_images,
        }
    }

    pub fn ensure_output_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }
}

fn missing_api_key() -> SeedreamError {
    SeedreamError::ConfigError(format!(
        "API key is required (pass --api-key or set {})",
        API_KEY_ENV
    ))
}

fn max_images_out_of_range(value: impl std::fmt::Display) -> SeedreamError {
    SeedreamError::ConfigError(format!(
        "--max-images must be an integer between {} and {}, got {}",
        MIN_IMAGES, MAX_IMAGES, value
    ))
}
