//! Implements TgGateway using grammers Client.
//!
//! Keeps a peer cache keyed by bot-API chat id. Peers are remembered by the
//! update loop from incoming traffic, so any chat that issued a command this
//! session can be messaged; a chat silent since startup cannot be reached
//! until it speaks again.

use crate::domain::{ChatKey, DomainError};
use crate::ports::TgGateway;
use async_trait::async_trait;
use grammers_client::message::InputMessage;
use grammers_client::Client;
use grammers_session::types::PeerRef;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// Telegram gateway adapter. Wraps the grammers Client shared with the
/// update loop.
pub struct GrammersTgGateway {
    client: Client,
    /// PeerRef by chat_id, populated by the update loop.
    peer_cache: Mutex<HashMap<i64, PeerRef>>,
}

impl GrammersTgGateway {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            peer_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Cache the peer behind a chat id. Called for every incoming message.
    pub async fn remember_peer(&self, chat_id: i64, peer: PeerRef) {
        self.peer_cache.lock().await.insert(chat_id, peer);
    }

    async fn resolve_peer(&self, chat_id: i64) -> Result<PeerRef, DomainError> {
        self.peer_cache
            .lock()
            .await
            .get(&chat_id)
            .cloned()
            .ok_or_else(|| DomainError::TgGateway(format!("peer {} not seen this session", chat_id)))
    }
}

#[async_trait]
impl TgGateway for GrammersTgGateway {
    async fn send_message(&self, key: &ChatKey, text: &str) -> Result<(), DomainError> {
        let peer = self.resolve_peer(key.chat_id).await?;
        let mut message = InputMessage::text(text);
        if let Some(thread_id) = key.thread_id {
            // Replying to the topic's root message lands the reply in that topic
            message = message.reply_to(Some(thread_id));
        }
        self.client
            .send_message(peer, message)
            .await
            .map_err(|e| DomainError::TgGateway(e.to_string()))?;
        debug!(key = %key, "message sent");
        Ok(())
    }
}
