//! Single serialized event loop.
//!
//! Owns command handling and the daily sweep, so store reads and writes
//! never interleave: a report arriving mid-sweep is processed strictly
//! after the sweep. Consumes events until every sender is dropped.

use crate::domain::BotEvent;
use crate::ports::TgGateway;
use crate::shared::config::today_in_zone;
use crate::usecases::{CommandService, SweepService};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Event worker. The one consumer of the bot's event queue.
pub struct EventWorker {
    rx: mpsc::Receiver<BotEvent>,
    commands: CommandService,
    sweep: SweepService,
    tg: Arc<dyn TgGateway>,
}

impl EventWorker {
    pub fn new(
        rx: mpsc::Receiver<BotEvent>,
        commands: CommandService,
        sweep: SweepService,
        tg: Arc<dyn TgGateway>,
    ) -> Self {
        Self {
            rx,
            commands,
            sweep,
            tg,
        }
    }

    /// Run the worker. Processes until the channel is closed.
    pub async fn run(mut self) {
        while let Some(event) = self.rx.recv().await {
            match event {
                BotEvent::Command { key, command } => {
                    debug!(key = %key, ?command, "handling command");
                    let reply = self.commands.handle(&key, command, today_in_zone()).await;
                    if let Err(e) = self.tg.send_message(&key, &reply).await {
                        warn!(key = %key, error = %e, "reply send failed");
                    }
                }
                BotEvent::DailySweep { date } => self.sweep.run(date).await,
            }
        }
        info!("event worker finished (channel closed)");
    }
}
