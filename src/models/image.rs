use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use super::usage::UsageReport;

pub const MIN_IMAGES: u8 = 1;
pub const MAX_IMAGES: u8 = 4;

/// One invocation's worth of generation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub size: String,
    pub watermark: bool,
    pub max_images: u8,
}

impl GenerationRequest {
    pub fn is_sequential(&self) -> bool {
        self.max_images > 1
    }
}

/// Error object Ark attaches to a failed item or to a failed call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl std::fmt::Display for ApiErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "{}: {}", code, message),
            (None, Some(message)) => write!(f, "{}", message),
            (Some(code), None) => write!(f, "{}", code),
            (None, None) => write!(f, "unknown error"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub error: Option<ApiErrorDetail>,
}

impl ImageEntry {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Reported size, falling back to what was asked for.
    pub fn size_or<'a>(&'a self, requested: &'a str) -> &'a str {
        self.size
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(requested)
    }

    pub fn download_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationResult {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(rename = "data")]
    pub images: Vec<ImageEntry>,
    #[serde(default)]
    pub usage: Option<Value>,
}

impl GenerationResult {
    pub fn usage_report(&self) -> Option<UsageReport> {
        self.usage.as_ref().map(UsageReport::from_value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub path: PathBuf,
    pub source_url: String,
    /// 1-based position in the response.
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFailure {
    pub index: usize,
    pub reason: String,
}
