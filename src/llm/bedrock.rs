use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::llm::client::{http_client, send, setting_or, GenAiProvider, ProviderError};

const PROVIDER: &str = "Bedrock";
pub const DEFAULT_BEDROCK_MODEL: &str = "meta.llama3-8b-instruct-v1:0";

/// Bedrock runtime client authenticated with a Bedrock API key (bearer token).
pub struct BedrockClient {
    http: Client,
    token: String,
    model: String,
    endpoint: String,
}

impl BedrockClient {
    pub fn from_settings(settings: &Settings) -> Result<Self, ProviderError> {
        let token = settings.llm.api_key.trim().to_string();
        if token.is_empty() {
            return Err(ProviderError::MissingCredentials {
                provider: PROVIDER,
                hint: "Set llm.api_key in config or AWS_BEARER_TOKEN_BEDROCK.",
            });
        }

        let default_endpoint = format!(
            "https://bedrock-runtime.{}.amazonaws.com",
            settings.llm.region.trim()
        );

        Ok(Self {
            http: http_client(settings)?,
            token,
            model: setting_or(&settings.llm.model, DEFAULT_BEDROCK_MODEL),
            endpoint: setting_or(&settings.llm.endpoint, &default_endpoint),
        })
    }

    fn request_url(&self) -> String {
        format!("{}/model/{}/invoke", self.endpoint, self.model)
    }
}

#[async_trait]
impl GenAiProvider for BedrockClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = self
            .http
            .post(self.request_url())
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&InvokeRequest { prompt });

        let payload = send(PROVIDER, request).await?;
        extract_generation(&payload)
    }
}

/// Read the `generation` field, dropping the leading `?` the Llama models
/// tend to echo back.
fn extract_generation(payload: &str) -> Result<String, ProviderError> {
    let response: InvokeResponse =
        serde_json::from_str(payload).map_err(|e| ProviderError::Decode {
            provider: PROVIDER,
            reason: e.to_string(),
        })?;

    let text = response
        .generation
        .unwrap_or_default()
        .trim_start_matches('?')
        .trim()
        .to_string();

    if text.is_empty() {
        return Err(ProviderError::EmptyResponse { provider: PROVIDER });
    }
    Ok(text)
}

#[derive(Debug, Serialize)]
struct InvokeRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct InvokeResponse {
    generation: Option<String>,
}
