use crate::{
    error::{Result, SeedreamError},
    models::{ApiErrorEnvelope, GenerationRequest, GenerationResult},
};
use reqwest::Client;
use serde_json::{json, Value};

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ImageClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn images_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/images/generations") {
            base.to_string()
        } else {
            format!("{}/images/generations", base)
        }
    }

    pub fn build_payload(&self, request: &GenerationRequest) -> Value {
        let mut payload = json!({
            "model": self.model,
            "prompt": request.prompt,
            "size": request.size,
            "response_format": "url",
            "watermark": request.watermark,
        });

        if request.is_sequential() {
            if let Some(obj) = payload.as_object_mut() {
                obj.insert("sequential_image_generation".to_string(), json!("auto"));
                obj.insert(
                    "sequential_image_generation_options".to_string(),
                    json!({ "max_images": request.max_images }),
                );
            }
        }

        payload
    }

    /// Issues a single generation call. Any failure is returned to the caller;
    /// there is no retry.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let payload = self.build_payload(request);

        log::info!("Generating image with model: {}", self.model);
        log::debug!("Image generation request payload: {}", payload);

        let response = self
            .client
            .post(self.images_url())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SeedreamError::RequestError(format!("Ark request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SeedreamError::ResponseError(e.to_string()))?;

        // Ark can send its error envelope with a 2xx status too.
        if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(&body) {
            return Err(SeedreamError::ApiError {
                status: status.as_u16(),
                message: envelope.error.to_string(),
            });
        }
        if !status.is_success() {
            return Err(SeedreamError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let result: GenerationResult = serde_json::from_str(&body)
            .map_err(|e| SeedreamError::ResponseError(e.to_string()))?;

        log::debug!(
            "Ark returned {} image entries (model: {})",
            result.images.len(),
            result.model.as_deref().unwrap_or("unknown")
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    fn request(max_images: u8) -> GenerationRequest {
        GenerationRequest {
            prompt: "a koi pond".to_string(),
            size: "2K".to_string(),
            watermark: false,
            max_images,
        }
    }

    fn client(base_url: String) -> ImageClient {
        ImageClient::new(Client::new(), base_url, "test-key", "doubao-seedream-4-0-250828")
    }

    #[test]
    fn test_single_image_payload() {
        let payload = client("http://localhost/api/v3".into()).build_payload(&request(1));
        assert_eq!(
            payload,
            json!({
                "model": "doubao-seedream-4-0-250828",
                "prompt": "a koi pond",
                "size": "2K",
                "response_format": "url",
                "watermark": false,
            })
        );
    }

    #[test]
    fn test_sequential_payload() {
        let payload = client("http://localhost/api/v3".into()).build_payload(&request(4));
        assert_eq!(payload["sequential_image_generation"], "auto");
        assert_eq!(
            payload["sequential_image_generation_options"],
            json!({ "max_images": 4 })
        );
    }

    #[test]
    fn test_images_url() {
        assert_eq!(
            client("http://h/api/v3/".into()).images_url(),
            "http://h/api/v3/images/generations"
        );
        assert_eq!(
            client("http://h/api/v3/images/generations".into()).images_url(),
            "http://h/api/v3/images/generations"
        );
    }

    #[tokio::test]
    async fn test_generate_parses_response() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v3/images/generations")
                    .header("authorization", "Bearer test-key")
                    .body_includes("\"sequential_image_generation\":\"auto\"");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(
                        json!({
                            "model": "doubao-seedream-4-0-250828",
                            "created": 1757321139,
                            "data": [
                                { "url": "https://cdn.example.com/1.png", "size": "2048x2048" },
                                { "url": "https://cdn.example.com/2.png", "size": "2048x2048" }
                            ],
                            "usage": { "generated_images": 2, "total_tokens": 32768 }
                        })
                        .to_string(),
                    );
            })
            .await;

        let result = client(server.url("/api/v3")).generate(&request(2)).await?;

        mock.assert_async().await;
        assert_eq!(result.images.len(), 2);
        assert_eq!(
            result.images[0].download_url(),
            Some("https://cdn.example.com/1.png")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_reports_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v3/images/generations");
                then.status(401).body(
                    json!({
                        "error": {
                            "code": "AuthenticationError",
                            "message": "The API key in the request is missing or invalid.",
                            "type": "Unauthorized"
                        }
                    })
                    .to_string(),
                );
            })
            .await;

        let err = client(server.url("/api/v3"))
            .generate(&request(1))
            .await
            .unwrap_err();

        match err {
            SeedreamError::ApiError { status, message } => {
                assert_eq!(status, 401);
                assert!(message.starts_with("AuthenticationError: "));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_rejects_malformed_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v3/images/generations");
                then.status(200).body("<html>gateway</html>");
            })
            .await;

        let err = client(server.url("/api/v3"))
            .generate(&request(1))
            .await
            .unwrap_err();
        assert!(matches!(err, SeedreamError::ResponseError(_)));
    }

    #[tokio::test]
    async fn test_generate_rejects_ok_status_without_images() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v3/images/generations");
                then.status(200).body("{}");
            })
            .await;

        let err = client(server.url("/api/v3"))
            .generate(&request(1))
            .await
            .unwrap_err();
        assert!(matches!(err, SeedreamError::ResponseError(_)));
    }

    #[tokio::test]
    async fn test_generate_maps_error_envelope_on_ok_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v3/images/generations");
                then.status(200).body(
                    json!({ "error": { "code": "InternalServiceError", "message": "boom" } })
                        .to_string(),
                );
            })
            .await;

        let err = client(server.url("/api/v3"))
            .generate(&request(1))
            .await
            .unwrap_err();

        match err {
            SeedreamError::ApiError { status, message } => {
                assert_eq!(status, 200);
                assert_eq!(message, "InternalServiceError: boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
