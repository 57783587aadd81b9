//! Command handling: add / reset / list / report / help.
//!
//! Replies are returned as text; the event worker delivers them. Persist
//! failures downgrade to warnings: the in-memory mutation holds until the
//! next successful write.

use crate::domain::{ChatKey, Command, Reminder, Schedule};
use crate::ports::{DedupTracker, ReminderRepo, ReportLedger};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::warn;

const HELP_TEXT: &str = "Mention me with one of:\n\
    add <user> <schedule> — track a report reminder (e.g. add @alice every weekday)\n\
    report — check off today's report for this chat\n\
    list — show tracked reminders\n\
    reset — clear all tracked reminders\n\
    help — this message\n\
    Schedules: every day, every weekday, every <days...>, or a single day name.";

/// Command service. Mutates the stores and produces reply text.
pub struct CommandService {
    reminders: Arc<dyn ReminderRepo>,
    reports: Arc<dyn ReportLedger>,
    dedup: Arc<dyn DedupTracker>,
}

impl CommandService {
    pub fn new(
        reminders: Arc<dyn ReminderRepo>,
        reports: Arc<dyn ReportLedger>,
        dedup: Arc<dyn DedupTracker>,
    ) -> Self {
        Self {
            reminders,
            reports,
            dedup,
        }
    }

    /// Handle one parsed command against `today`'s date; returns the reply.
    pub async fn handle(&self, key: &ChatKey, command: Command, today: NaiveDate) -> String {
        match command {
            Command::Add {
                user_tag,
                raw_schedule,
            } => self.add(key, user_tag, &raw_schedule).await,
            Command::Reset => self.reset(key).await,
            Command::List => self.list(key).await,
            Command::Report => self.report(key, today).await,
            Command::Help => HELP_TEXT.to_string(),
        }
    }

    async fn add(&self, key: &ChatKey, user_tag: String, raw_schedule: &str) -> String {
        let schedule = Schedule::parse(raw_schedule);
        let reminder = Reminder {
            user_tag: user_tag.clone(),
            schedule: schedule.clone(),
        };
        if let Err(e) = self.reminders.add(key, reminder).await {
            warn!(key = %key, error = %e, "reminder persist failed; change is in-memory only");
        }
        // Echo the canonical form so the user sees what will be matched
        format!("Added: @{} — {}", user_tag, schedule)
    }

    async fn reset(&self, key: &ChatKey) -> String {
        if let Err(e) = self.reminders.reset(key).await {
            warn!(key = %key, error = %e, "reset persist failed; change is in-memory only");
        }
        "All tracked reminders for this chat were cleared.".to_string()
    }

    async fn list(&self, key: &ChatKey) -> String {
        let reminders = match self.reminders.list(key).await {
            Ok(reminders) => reminders,
            Err(e) => {
                warn!(key = %key, error = %e, "reminder list read failed");
                Vec::new()
            }
        };
        if reminders.is_empty() {
            return "No active reminders.".to_string();
        }
        reminders
            .iter()
            .map(|r| format!("@{} — {}", r.user_tag, r.schedule))
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn report(&self, key: &ChatKey, today: NaiveDate) -> String {
        if let Err(e) = self.reports.record_report(key, today).await {
            warn!(key = %key, error = %e, "report persist failed; change is in-memory only");
        }
        // A report also consumes today's dedup slot, so the nightly sweep
        // stays silent for this key even if the ledger write was lost.
        if let Err(e) = self.dedup.mark_if_unmarked(key, today).await {
            warn!(key = %key, error = %e, "dedup mark failed");
        }
        "Got it — today's report is checked off.".to_string()
    }
}
