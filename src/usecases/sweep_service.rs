//! Daily notification sweep.
//!
//! One pass per trigger: ledger suppression first, then the first due
//! reminder that wins the day's dedup slot gets one ping. At most one
//! notification per chat key per day; sends are fire-and-forget.

use crate::domain::{ChatKey, DomainError};
use crate::ports::{DedupTracker, ReminderRepo, ReportLedger, TgGateway};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Sweep service. Evaluates every known chat key against the date.
pub struct SweepService {
    reminders: Arc<dyn ReminderRepo>,
    reports: Arc<dyn ReportLedger>,
    dedup: Arc<dyn DedupTracker>,
    tg: Arc<dyn TgGateway>,
}

impl SweepService {
    pub fn new(
        reminders: Arc<dyn ReminderRepo>,
        reports: Arc<dyn ReportLedger>,
        dedup: Arc<dyn DedupTracker>,
        tg: Arc<dyn TgGateway>,
    ) -> Self {
        Self {
            reminders,
            reports,
            dedup,
            tg,
        }
    }

    /// Run the sweep for `date` over every chat key with a reminder list.
    pub async fn run(&self, date: NaiveDate) {
        let keys = match self.reminders.keys().await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "sweep aborted: reminder keys unavailable");
                return;
            }
        };
        info!(date = %date, chats = keys.len(), "daily sweep started");

        let mut pinged = 0usize;
        for key in keys {
            match self.sweep_key(&key, date).await {
                Ok(true) => pinged += 1,
                Ok(false) => {}
                Err(e) => warn!(key = %key, error = %e, "sweep failed for chat"),
            }
        }

        info!(date = %date, pinged, "daily sweep complete");
    }

    /// Returns true when a ping went out for the key.
    async fn sweep_key(&self, key: &ChatKey, date: NaiveDate) -> Result<bool, DomainError> {
        if self.reports.has_reported_on(key, date).await? {
            debug!(key = %key, "already reported today; skipping");
            return Ok(false);
        }

        for reminder in self.reminders.list(key).await? {
            if !reminder.schedule.is_due(date) {
                continue;
            }
            if !self.dedup.mark_if_unmarked(key, date).await? {
                debug!(key = %key, "already pinged today; skipping");
                return Ok(false);
            }

            // One ping per chat per day: the first due reminder wins.
            let text = format!("@{}, don't forget to send today's report", reminder.user_tag);
            if let Err(e) = self.tg.send_message(key, &text).await {
                // The dedup slot stays consumed; delivery is fire-and-forget.
                warn!(key = %key, user = %reminder.user_tag, error = %e, "reminder send failed");
            } else {
                info!(key = %key, user = %reminder.user_tag, "reminder sent");
            }
            return Ok(true);
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::{DedupJson, RemindersJson, ReportsJson};
    use crate::domain::{Command, Reminder, Schedule};
    use crate::usecases::CommandService;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    /// Gateway test double: records every send.
    struct MockGateway {
        sent: Mutex<Vec<(ChatKey, String)>>,
    }

    impl MockGateway {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
            })
        }

        async fn sent(&self) -> Vec<(ChatKey, String)> {
            self.sent.lock().await.clone()
        }
    }

    #[async_trait]
    impl TgGateway for MockGateway {
        async fn send_message(&self, key: &ChatKey, text: &str) -> Result<(), DomainError> {
            self.sent.lock().await.push((*key, text.to_string()));
            Ok(())
        }
    }

    struct Fixture {
        reminders: Arc<RemindersJson>,
        commands: CommandService,
        sweep: SweepService,
        gateway: Arc<MockGateway>,
    }

    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
    }

    async fn fixture(dir: &std::path::Path) -> Fixture {
        let reminders = Arc::new(RemindersJson::new(dir.join("reminders.json")));
        reminders.load().await.unwrap();
        let reports = Arc::new(ReportsJson::new(dir.join("reports.json")));
        reports.load().await.unwrap();
        let dedup = Arc::new(DedupJson::new(dir.join("notified.json")));
        dedup.load(wednesday()).await.unwrap();
        let gateway = MockGateway::new();

        let commands = CommandService::new(
            reminders.clone() as Arc<dyn ReminderRepo>,
            reports.clone() as Arc<dyn ReportLedger>,
            dedup.clone() as Arc<dyn DedupTracker>,
        );
        let sweep = SweepService::new(
            reminders.clone() as Arc<dyn ReminderRepo>,
            reports as Arc<dyn ReportLedger>,
            dedup as Arc<dyn DedupTracker>,
            gateway.clone() as Arc<dyn TgGateway>,
        );
        Fixture {
            reminders,
            commands,
            sweep,
            gateway,
        }
    }

    fn reminder(user: &str, raw: &str) -> Reminder {
        Reminder {
            user_tag: user.to_string(),
            schedule: Schedule::parse(raw),
        }
    }

    #[tokio::test]
    async fn due_reminder_pings_once_per_day() {
        let dir = tempfile::tempdir().unwrap();
        let fx = fixture(dir.path()).await;
        let key = ChatKey::chat(100);
        fx.reminders
            .add(&key, reminder("alice", "every weekday"))
            .await
            .unwrap();

        fx.sweep.run(wednesday()).await;
        fx.sweep.run(wednesday()).await;

        let sent = fx.gateway.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, key);
        assert!(sent[0].1.contains("@alice"));
    }

    #[tokio::test]
    async fn report_suppresses_the_same_day_sweep() {
        let dir = tempfile::tempdir().unwrap();
        let fx = fixture(dir.path()).await;
        let key = ChatKey::chat(100);
        fx.reminders
            .add(&key, reminder("alice", "every day"))
            .await
            .unwrap();

        fx.commands.handle(&key, Command::Report, wednesday()).await;
        fx.sweep.run(wednesday()).await;

        assert!(fx.gateway.sent().await.is_empty());
    }

    #[tokio::test]
    async fn only_the_first_due_reminder_is_sent() {
        let dir = tempfile::tempdir().unwrap();
        let fx = fixture(dir.path()).await;
        let key = ChatKey::chat(100);
        fx.reminders
            .add(&key, reminder("alice", "every weekday"))
            .await
            .unwrap();
        fx.reminders
            .add(&key, reminder("bob", "every day"))
            .await
            .unwrap();

        fx.sweep.run(wednesday()).await;

        let sent = fx.gateway.sent().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.contains("@alice"));
    }

    #[tokio::test]
    async fn not_due_reminders_never_ping() {
        let dir = tempfile::tempdir().unwrap();
        let fx = fixture(dir.path()).await;
        let key = ChatKey::chat(100);
        fx.reminders
            .add(&key, reminder("alice", "every Saturday"))
            .await
            .unwrap();

        fx.sweep.run(wednesday()).await;

        assert!(fx.gateway.sent().await.is_empty());
        // No dedup slot consumed: a later due reminder could still fire today
    }

    #[tokio::test]
    async fn distinct_threads_ping_independently() {
        let dir = tempfile::tempdir().unwrap();
        let fx = fixture(dir.path()).await;
        let plain = ChatKey::chat(100);
        let topic = ChatKey::new(100, Some(7));
        fx.reminders
            .add(&plain, reminder("alice", "every day"))
            .await
            .unwrap();
        fx.reminders
            .add(&topic, reminder("bob", "every day"))
            .await
            .unwrap();

        fx.sweep.run(wednesday()).await;

        let sent = fx.gateway.sent().await;
        assert_eq!(sent.len(), 2);
    }

    #[tokio::test]
    async fn dedup_survives_restart_between_sweeps() {
        let dir = tempfile::tempdir().unwrap();
        let key = ChatKey::chat(100);
        {
            let fx = fixture(dir.path()).await;
            fx.reminders
                .add(&key, reminder("alice", "every day"))
                .await
                .unwrap();
            fx.sweep.run(wednesday()).await;
            assert_eq!(fx.gateway.sent().await.len(), 1);
        }

        // Fresh stores over the same data dir: still no second ping today
        let fx = fixture(dir.path()).await;
        fx.sweep.run(wednesday()).await;
        assert!(fx.gateway.sent().await.is_empty());
    }
}
