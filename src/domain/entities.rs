//! Domain entities. Pure data structures for the core business.
//!
//! No Telegram/IO types here — these are mapped from adapters.

use crate::domain::schedule::Schedule;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifies the conversation a reminder list belongs to: a chat, optionally
/// scoped to a forum-topic thread inside it.
///
/// Canonical string form is `"{chat_id}"` or `"{chat_id}/{thread_id}"`, so a
/// thread-less key and a thread-zero key never collide (`"100"` vs `"100/0"`).
/// Serializes as that string, which lets it key JSON maps directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChatKey {
    pub chat_id: i64,
    pub thread_id: Option<i32>,
}

impl ChatKey {
    pub fn new(chat_id: i64, thread_id: Option<i32>) -> Self {
        Self { chat_id, thread_id }
    }

    /// Key for a plain chat without a topic thread.
    pub fn chat(chat_id: i64) -> Self {
        Self {
            chat_id,
            thread_id: None,
        }
    }
}

impl fmt::Display for ChatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.thread_id {
            Some(thread_id) => write!(f, "{}/{}", self.chat_id, thread_id),
            None => write!(f, "{}", self.chat_id),
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid chat key: {0:?}")]
pub struct ChatKeyParseError(String);

impl FromStr for ChatKey {
    type Err = ChatKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ChatKeyParseError(s.to_string());
        match s.split_once('/') {
            Some((chat, thread)) => Ok(Self {
                chat_id: chat.parse().map_err(|_| bad())?,
                thread_id: Some(thread.parse().map_err(|_| bad())?),
            }),
            None => Ok(Self {
                chat_id: s.parse().map_err(|_| bad())?,
                thread_id: None,
            }),
        }
    }
}

impl Serialize for ChatKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChatKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One tracked reminder: who to ping and on which days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub user_tag: String,
    pub schedule: Schedule,
}

/// Parsed inbound command, produced by the telegram mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Track a new reminder. `raw_schedule` is normalized at add time.
    Add { user_tag: String, raw_schedule: String },
    /// Clear every reminder for the key.
    Reset,
    /// Show the key's reminders.
    List,
    /// Acknowledge today's report; suppresses today's ping for the key.
    Report,
    Help,
}

/// One item on the single serialized event queue. Commands and the daily
/// sweep trigger flow through the same channel so they never interleave.
#[derive(Debug)]
pub enum BotEvent {
    Command { key: ChatKey, command: Command },
    DailySweep { date: NaiveDate },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn chat_key_display_round_trip() {
        let plain = ChatKey::chat(-1001234567890);
        assert_eq!(plain.to_string(), "-1001234567890");
        assert_eq!(plain.to_string().parse::<ChatKey>().unwrap(), plain);

        let threaded = ChatKey::new(100, Some(42));
        assert_eq!(threaded.to_string(), "100/42");
        assert_eq!(threaded.to_string().parse::<ChatKey>().unwrap(), threaded);
    }

    #[test]
    fn chat_key_thread_zero_is_not_thread_less() {
        let plain = ChatKey::chat(100);
        let zero = ChatKey::new(100, Some(0));
        assert_ne!(plain, zero);
        assert_ne!(plain.to_string(), zero.to_string());
    }

    #[test]
    fn chat_key_rejects_garbage() {
        assert!("".parse::<ChatKey>().is_err());
        assert!("abc".parse::<ChatKey>().is_err());
        assert!("100/".parse::<ChatKey>().is_err());
        assert!("100/5/7".parse::<ChatKey>().is_err());
    }

    #[test]
    fn chat_key_works_as_json_map_key() {
        let mut map: HashMap<ChatKey, u32> = HashMap::new();
        map.insert(ChatKey::chat(100), 1);
        map.insert(ChatKey::new(100, Some(0)), 2);

        let json = serde_json::to_string(&map).unwrap();
        let back: HashMap<ChatKey, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
        assert_eq!(back[&ChatKey::chat(100)], 1);
        assert_eq!(back[&ChatKey::new(100, Some(0))], 2);
    }
}
