pub mod image_client;

use crate::{
    config::ArkConfig,
    download::Downloader,
    error::{Result, SeedreamError},
};
use reqwest::Client;

pub use image_client::ImageClient;

/// Entry point to the Ark service: one HTTP client shared between the
/// generation call and the image downloads.
#[derive(Clone)]
pub struct ArkClient {
    image_client: ImageClient,
    downloader: Downloader,
}

impl ArkClient {
    pub fn new(ark_config: &ArkConfig) -> Result<Self> {
        let api_key = ark_config
            .api_key()
            .ok_or_else(|| SeedreamError::ConfigError("Ark API key is required".into()))?;

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SeedreamError::RequestError(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            image_client: ImageClient::new(
                client.clone(),
                ark_config.base_url(),
                api_key,
                ark_config.model(),
            ),
            downloader: Downloader::new(client),
        })
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn downloader(&self) -> &Downloader {
        &self.downloader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MODEL;

    #[test]
    fn test_requires_api_key() {
        assert!(ArkClient::new(&ArkConfig::new()).is_err());
    }

    #[test]
    fn test_uses_configured_model() {
        let client = ArkClient::new(&ArkConfig::new().with_credentials("k")).unwrap();
        assert_eq!(client.image().model(), DEFAULT_MODEL);

        let client = ArkClient::new(
            &ArkConfig::new()
                .with_credentials("k")
                .with_model("doubao-seedream-4-5"),
        )
        .unwrap();
        assert_eq!(client.image().model(), "doubao-seedream-4-5");
    }
}
