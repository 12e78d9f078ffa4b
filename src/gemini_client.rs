use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};
use url::Url;

use crate::config::{GenerationConfig, Settings};
use crate::conversation_state::ErrorKind;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("{0}")]
    Http(reqwest::Error),
    #[error("API request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("could not decode response: {0}")]
    Malformed(String),
    #[error("response blocked: {0}")]
    Blocked(String),
}

/// Transport errors never carry the request URL into messages.
impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e.without_url())
    }
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Http(_) => ErrorKind::Network,
            ClientError::Status { status: 429, .. } => ErrorKind::Quota,
            ClientError::Status { .. } | ClientError::InvalidEndpoint(_) => ErrorKind::Api,
            ClientError::Malformed(_) => ErrorKind::Malformed,
            ClientError::Blocked(_) => ErrorKind::Blocked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

/// One message in the remote context. The API names the assistant side "model".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role("user", text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::with_role("model", text)
    }

    fn with_role(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    pub system_instruction: &'a str,
    pub contents: &'a [Content],
    pub generation_config: &'a GenerationConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SystemInstruction<'a> {
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestBody<'a> {
    system_instruction: SystemInstruction<'a>,
    contents: &'a [Content],
    generation_config: &'a GenerationConfig,
}

impl<'a> From<GenerateRequest<'a>> for RequestBody<'a> {
    fn from(request: GenerateRequest<'a>) -> Self {
        Self {
            system_instruction: SystemInstruction {
                parts: [TextPart {
                    text: request.system_instruction,
                }],
            },
            contents: request.contents,
            generation_config: request.generation_config,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Anything that can turn a conversation into the model's next reply.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate_content(&self, request: GenerateRequest<'_>) -> Result<String, ClientError>;
}

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClient {
    endpoint: Url,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(settings: &Settings) -> Result<Self, ClientError> {
        let endpoint = settings
            .api_base
            .join(&format!("v1beta/models/{}:generateContent", settings.model))?;

        let client = reqwest::Client::new();

        info!(model = %settings.model, host = ?endpoint.host_str(), "Gemini client ready");

        Ok(Self {
            endpoint,
            api_key: settings.api_key.clone(),
            client,
        })
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate_content(&self, request: GenerateRequest<'_>) -> Result<String, ClientError> {
        let request_body = RequestBody::from(request);

        if tracing::enabled!(tracing::Level::DEBUG) {
            if let Ok(pretty) = serde_json::to_string_pretty(&request_body) {
                debug!("Sending request to Gemini API: {}", pretty);
            }
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("API request failed with response: {}", body);
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        debug!("Received response from Gemini API: {}", body);

        extract_text(&body)
    }
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body.trim().to_string(),
    }
}

/// Concatenates the text parts of the first candidate.
fn extract_text(body: &str) -> Result<String, ClientError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| ClientError::Malformed(e.to_string()))?;

    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(ClientError::Blocked(format!("prompt blocked ({reason})")));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::Malformed("no candidates in response".to_string()))?;

    let text: String = candidate
        .content
        .map(|content| content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if !text.is_empty() {
        return Ok(text);
    }

    match candidate.finish_reason.as_deref() {
        Some(reason @ ("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT")) => {
            Err(ClientError::Blocked(format!("reply withheld ({reason})")))
        }
        Some(reason) => Err(ClientError::Malformed(format!(
            "candidate has no text (finish reason {reason})"
        ))),
        None => Err(ClientError::Malformed("candidate has no text".to_string())),
    }
}
