use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{ConfigError, GenerationConfig, Settings};
use crate::gemini_client::{ClientError, Content, GenerateRequest, ModelClient};
use crate::persona::CAREER_GUIDE_PERSONA;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Error initializing model: {0}")]
    Client(#[from] ClientError),
    #[error("Error initializing model: invalid generation config: {0}")]
    InvalidGeneration(String),
}

/// Identifies one chat session. A reset always yields a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Loads settings and connects a client. `connect` is only invoked once the
/// settings are known to be complete.
pub fn initialize<L, C>(lookup: L, connect: C) -> Result<CareerModel, ModelError>
where
    L: Fn(&str) -> Option<String>,
    C: FnOnce(&Settings) -> Result<Arc<dyn ModelClient>, ClientError>,
{
    let settings = Settings::from_lookup(lookup)?;
    let client = connect(&settings)?;
    CareerModel::new(client, settings.generation)
}

/// A model client bound to the persona and fixed generation parameters.
#[derive(Clone)]
pub struct CareerModel {
    client: Arc<dyn ModelClient>,
    persona: Arc<str>,
    generation: Arc<GenerationConfig>,
}

impl CareerModel {
    pub fn new(client: Arc<dyn ModelClient>, generation: GenerationConfig) -> Result<Self, ModelError> {
        Self::with_persona(client, CAREER_GUIDE_PERSONA, generation)
    }

    pub fn with_persona(
        client: Arc<dyn ModelClient>,
        persona: &str,
        generation: GenerationConfig,
    ) -> Result<Self, ModelError> {
        validate(&generation)?;

        Ok(Self {
            client,
            persona: Arc::from(persona),
            generation: Arc::new(generation),
        })
    }

    #[cfg(test)]
    pub fn persona(&self) -> &str {
        &self.persona
    }

    #[cfg(test)]
    pub fn generation(&self) -> &GenerationConfig {
        &self.generation
    }

    pub fn start_chat(&self) -> ChatSession {
        let session = ChatSession {
            id: SessionId(Uuid::new_v4()),
            client: Arc::clone(&self.client),
            persona: Arc::clone(&self.persona),
            generation: Arc::clone(&self.generation),
            history: Vec::new(),
        };
        info!(session = %session.id, "Started chat session");
        session
    }
}

fn validate(generation: &GenerationConfig) -> Result<(), ModelError> {
    let invalid = |msg: String| Err(ModelError::InvalidGeneration(msg));

    if !(0.0..=2.0).contains(&generation.temperature) {
        return invalid(format!("temperature {} outside [0, 2]", generation.temperature));
    }
    if !(0.0..=1.0).contains(&generation.top_p) {
        return invalid(format!("top_p {} outside [0, 1]", generation.top_p));
    }
    if generation.top_k == 0 {
        return invalid("top_k must be at least 1".to_string());
    }
    if generation.max_output_tokens == 0 {
        return invalid("max_output_tokens must be at least 1".to_string());
    }
    Ok(())
}

/// A live conversation with the model. Only successful exchanges become part
/// of the context sent with later messages.
pub struct ChatSession {
    id: SessionId,
    client: Arc<dyn ModelClient>,
    persona: Arc<str>,
    generation: Arc<GenerationConfig>,
    history: Vec<Content>,
}

impl ChatSession {
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[cfg(test)]
    pub fn history(&self) -> &[Content] {
        &self.history
    }

    /// History is only extended once a reply has arrived, so a failed or
    /// abandoned call leaves the session as it was.
    pub async fn send_message(&mut self, text: &str) -> Result<String, ClientError> {
        let mut contents = Vec::with_capacity(self.history.len() + 1);
        contents.extend_from_slice(&self.history);
        contents.push(Content::user(text));
        debug!(session = %self.id, context = contents.len(), "Sending message");

        let reply = self
            .client
            .generate_content(GenerateRequest {
                system_instruction: &self.persona,
                contents: &contents,
                generation_config: &self.generation,
            })
            .await?;

        contents.push(Content::model(reply.as_str()));
        self.history = contents;
        Ok(reply)
    }
}
