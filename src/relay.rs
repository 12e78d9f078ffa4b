use tracing::warn;

use crate::conversation_state::TurnBody;
use crate::model::ChatSession;

/// Sends one utterance and turns the outcome into an assistant turn body.
/// Failures are reported in the turn rather than propagated.
pub async fn relay(chat: &mut ChatSession, text: &str) -> TurnBody {
    match chat.send_message(text).await {
        Ok(reply) => TurnBody::content(reply),
        Err(e) => {
            warn!(session = %chat.id(), kind = %e.kind(), "Exchange failed: {}", e);
            TurnBody::error(e.kind(), e.to_string())
        }
    }
}
