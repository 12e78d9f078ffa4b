use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::gemini_client::{ClientError, Content, GenerateRequest, ModelClient};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub system_instruction: String,
    pub contents: Vec<Content>,
}

/// Plays back scripted replies, then echoes the latest user text.
#[derive(Default)]
pub struct StubClient {
    replies: Mutex<VecDeque<Result<String, ClientError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    delay: Option<Duration>,
}

impl StubClient {
    pub fn echo() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn scripted(replies: Vec<Result<String, ClientError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        })
    }

    /// Echoes, but only after `delay` has passed.
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for StubClient {
    async fn generate_content(&self, request: GenerateRequest<'_>) -> Result<String, ClientError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            system_instruction: request.system_instruction.to_string(),
            contents: request.contents.to_vec(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(reply) = self.replies.lock().unwrap().pop_front() {
            return reply;
        }

        let last = request
            .contents
            .last()
            .and_then(|c| c.parts.first())
            .map(|p| p.text.clone())
            .unwrap_or_default();
        Ok(last)
    }
}
