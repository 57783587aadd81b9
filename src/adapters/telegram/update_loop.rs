//! Implements InputPort. Consumes grammers updates, parses commands, and
//! feeds the single serialized event queue.

use crate::adapters::telegram::{mapper, GrammersTgGateway};
use crate::domain::{BotEvent, ChatKey, DomainError};
use crate::ports::InputPort;
use async_trait::async_trait;
use grammers_client::update::Update;
use grammers_client::Client;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Update-loop adapter. Maps incoming messages to command events.
pub struct TelegramUpdateLoop {
    client: Client,
    gateway: Arc<GrammersTgGateway>,
    bot_username: String,
    tx: mpsc::Sender<BotEvent>,
}

impl TelegramUpdateLoop {
    pub fn new(
        client: Client,
        gateway: Arc<GrammersTgGateway>,
        bot_username: String,
        tx: mpsc::Sender<BotEvent>,
    ) -> Self {
        Self {
            client,
            gateway,
            bot_username,
            tx,
        }
    }
}

#[async_trait]
impl InputPort for TelegramUpdateLoop {
    async fn run(&self) -> Result<(), DomainError> {
        info!(bot = %self.bot_username, "update loop started");
        loop {
            let update = self
                .client
                .next_update()
                .await
                .map_err(|e| DomainError::TgGateway(e.to_string()))?;
            let message = match update {
                Update::NewMessage(message) if !message.outgoing() => message,
                _ => continue,
            };

            let peer = message.peer();
            let chat_id = peer.id().bot_api_dialog_id();
            // Remember the peer so the gateway can send into this chat later
            // (command replies and the nightly sweep).
            if let Some(peer_ref) = peer.to_ref().await {
                self.gateway.remember_peer(chat_id, peer_ref).await;
            }

            let Some(command) = mapper::parse_command(&self.bot_username, message.text()) else {
                continue;
            };
            let key = ChatKey::new(chat_id, mapper::thread_id_of(&message.raw));
            debug!(key = %key, ?command, "command received");

            if self.tx.send(BotEvent::Command { key, command }).await.is_err() {
                info!("event queue closed; update loop stopping");
                return Ok(());
            }
        }
    }
}
