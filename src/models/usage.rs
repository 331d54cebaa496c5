use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    pub generated_images: u64,
    pub total_tokens: u64,
}

/// Usage block as returned by the server, typed when it has the expected shape.
#[derive(Debug, Clone, PartialEq)]
pub enum UsageReport {
    Stats(UsageStats),
    Raw(Value),
}

impl UsageReport {
    pub fn from_value(value: &Value) -> Self {
        match UsageStats::deserialize(value) {
            Ok(stats) => UsageReport::Stats(stats),
            Err(e) => {
                log::debug!("Usage payload did not match the expected shape: {}", e);
                UsageReport::Raw(value.clone())
            }
        }
    }
}

impl fmt::Display for UsageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageReport::Stats(stats) => write!(
                f,
                "generated images: {}, total tokens: {}",
                stats.generated_images, stats.total_tokens
            ),
            UsageReport::Raw(value) => write!(f, "{}", value),
        }
    }
}
