use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::Settings;
use crate::llm::bedrock::BedrockClient;
use crate::llm::gemini::GeminiClient;

/// Which cloud provider answers prompts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    Bedrock,
}

/// Failure to build a provider or to generate text
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Please enter a prompt.")]
    EmptyPrompt,

    #[error("{provider} API key is missing. {hint}")]
    MissingCredentials {
        provider: &'static str,
        hint: &'static str,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{provider} request failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned {status}: {body}")]
    Status {
        provider: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse {provider} response: {reason}")]
    Decode {
        provider: &'static str,
        reason: String,
    },

    #[error("{provider} response did not contain generated text")]
    EmptyResponse { provider: &'static str },
}

/// Text generation from a prompt string.
#[async_trait]
pub trait GenAiProvider: Send + Sync {
    /// Human-readable provider name used in messages.
    fn name(&self) -> &'static str;

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Build the configured provider.
pub fn build_provider(settings: &Settings) -> Result<Box<dyn GenAiProvider>, ProviderError> {
    match settings.llm.provider {
        ProviderKind::Gemini => Ok(Box::new(GeminiClient::from_settings(settings)?)),
        ProviderKind::Bedrock => Ok(Box::new(BedrockClient::from_settings(settings)?)),
    }
}

/// Send one prompt, rejecting blank input before any network call.
pub async fn ask(provider: &dyn GenAiProvider, prompt: &str) -> Result<String, ProviderError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(ProviderError::EmptyPrompt);
    }

    tracing::debug!("Sending {} character prompt to {}", prompt.len(), provider.name());
    provider.generate(prompt).await
}

pub(crate) fn http_client(settings: &Settings) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(Duration::from_secs(settings.llm.timeout_secs.max(1)))
        .build()
        .map_err(ProviderError::Client)
}

/// Send a request and return the body of a successful response.
pub(crate) async fn send(
    provider: &'static str,
    request: RequestBuilder,
) -> Result<String, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|source| ProviderError::Request { provider, source })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| ProviderError::Request { provider, source })?;

    if !status.is_success() {
        return Err(ProviderError::Status {
            provider,
            status,
            body: body.trim().to_string(),
        });
    }

    Ok(body)
}

/// Trim a configured value, falling back when it is blank.
pub(crate) fn setting_or(value: &str, fallback: &str) -> String {
    let value = value.trim().trim_end_matches('/');
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve exactly one HTTP response on a local port.
    ///
    /// Returns the base URL and a handle resolving to the raw request text.
    pub async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{addr}"), handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }
}
