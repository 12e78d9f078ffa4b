use thiserror::Error;
use tracing::info;

use crate::conversation_state::{ConversationState, Turn};
use crate::model::{CareerModel, ChatSession};
use crate::relay::relay;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("message is empty")]
    EmptyInput,
}

/// Everything one user's conversation needs: what has been shown so far and
/// the live chat session behind it.
pub struct SessionContext {
    model: CareerModel,
    conversation: ConversationState,
    chat: Option<ChatSession>,
}

impl SessionContext {
    pub fn new(model: CareerModel) -> Self {
        Self {
            model,
            conversation: ConversationState::new(),
            chat: None,
        }
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    /// The live chat session, started on first use.
    pub fn chat_session(&mut self) -> &mut ChatSession {
        self.chat.get_or_insert_with(|| self.model.start_chat())
    }

    /// Runs one exchange and returns the user and assistant turns it added.
    pub async fn submit(&mut self, text: &str) -> Result<&[Turn], SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }

        let user = Turn::user(text);
        let body = relay(self.chat_session(), text).await;
        self.conversation.push(user);
        self.conversation.push(Turn::assistant(body));

        let turns = self.conversation.turns();
        Ok(&turns[turns.len() - 2..])
    }

    /// Forgets the conversation and starts over with a fresh chat session.
    pub fn reset(&mut self) {
        self.conversation.clear();
        let chat = self.model.start_chat();
        info!(session = %chat.id(), "Conversation reset");
        self.chat = Some(chat);
    }
}
