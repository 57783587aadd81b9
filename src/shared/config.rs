//! Application configuration. Bot credentials, paths, notification constants.

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Deserialize;

/// Wall-clock hour (in [`NOTIFY_ZONE`]) at which the daily sweep fires.
pub const NOTIFY_HOUR: u32 = 21;

/// Wall-clock minute of the daily sweep.
pub const NOTIFY_MINUTE: u32 = 0;

/// The sweep is pinned to this zone regardless of where the host runs.
pub const NOTIFY_ZONE: Tz = chrono_tz::Europe::Moscow;

/// Today's calendar date in the pinned notification zone. All report and
/// dedup bookkeeping uses this date, never the host-local one.
pub fn today_in_zone() -> NaiveDate {
    chrono::Utc::now().with_timezone(&NOTIFY_ZONE).date_naive()
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Bot API token from @BotFather. Read from TG_REMINDER_BOT_TOKEN (or bare BOT_TOKEN).
    #[serde(default)]
    pub bot_token: Option<String>,

    /// MTProto application ID from https://my.telegram.org. Read from TG_REMINDER_API_ID.
    pub api_id: Option<i32>,

    /// MTProto application hash. Read from TG_REMINDER_API_HASH.
    pub api_hash: Option<String>,

    /// Directory for the JSON stores. Read from TG_REMINDER_DATA_DIR.
    pub data_dir: Option<String>,

    /// Persistent MTProto session file. Read from TG_REMINDER_SESSION_PATH.
    pub session_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("TG_REMINDER"));
        if let Ok(path) = std::env::var("TG_REMINDER_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // BOT_TOKEN is read directly (no TG_REMINDER_ prefix) so a plain .env
        // with BOT_TOKEN=... keeps working
        if cfg.bot_token.is_none() {
            if let Ok(token) = std::env::var("BOT_TOKEN") {
                cfg.bot_token = Some(token);
            }
        }
        Ok(cfg)
    }

    /// Returns the data directory for JSON stores. Defaults to ./data.
    pub fn data_dir_or_default(&self) -> String {
        self.data_dir
            .clone()
            .unwrap_or_else(|| "./data".to_string())
    }

    /// Returns the session file path. Defaults to ./session.db.
    pub fn session_path_or_default(&self) -> String {
        self.session_path
            .clone()
            .unwrap_or_else(|| "./session.db".to_string())
    }
}
