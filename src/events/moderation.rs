//! Forbidden-word moderation of group messages.

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::debug;

use crate::bot::dispatcher::AppState;
use crate::database::{GroupKey, UserKey};
use crate::moderation::{InboundMessage, Verdict};

/// Group and supergroup messages only.
pub fn handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(|msg: Message| msg.chat.is_group() || msg.chat.is_supergroup())
        .filter_map(inbound)
        .endpoint(moderate)
}

/// Build the engine input, skipping bots and messages without text.
///
/// Recognized commands are consumed by the command handler first, so any
/// `/`-prefixed text that reaches here is moderated like any other message.
fn inbound(msg: Message) -> Option<InboundMessage> {
    let sender = msg.from.as_ref().filter(|u| !u.is_bot)?;
    let body = moderated_body(msg.text().or_else(|| msg.caption()))?;

    Some(InboundMessage {
        group: GroupKey::from(msg.chat.id),
        sender: UserKey::from(sender.id),
        sender_name: sender.first_name.clone(),
        body: body.to_string(),
        message_id: Some(msg.id.0),
    })
}

fn moderated_body(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

async fn moderate(inbound: InboundMessage, state: AppState) -> anyhow::Result<()> {
    let verdict = state.engine.handle(&inbound).await;
    if !matches!(verdict, Verdict::Clean) {
        debug!("Moderation verdict for {}: {:?}", inbound.sender, verdict);
    }
    Ok(())
}
