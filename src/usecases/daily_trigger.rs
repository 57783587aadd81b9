//! Timezone-pinned daily trigger.
//!
//! Sleeps until the next notification time in the pinned zone, then enqueues
//! a DailySweep carrying the zone-local date at fire time. Host-local time
//! never enters the math.

use crate::domain::BotEvent;
use crate::shared::config::{NOTIFY_HOUR, NOTIFY_MINUTE, NOTIFY_ZONE};
use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Daily trigger. Produces one DailySweep event per calendar day.
pub struct DailyTrigger {
    tx: mpsc::Sender<BotEvent>,
}

impl DailyTrigger {
    pub fn new(tx: mpsc::Sender<BotEvent>) -> Self {
        Self { tx }
    }

    /// Run forever: sleep to the next fire instant, enqueue the sweep,
    /// repeat. Returns when the event queue is gone.
    pub async fn run_loop(self) {
        loop {
            let now = Utc::now().with_timezone(&NOTIFY_ZONE);
            let Some(fire_at) = next_fire(now) else {
                warn!("could not resolve next fire time; retrying in 60s");
                tokio::time::sleep(Duration::from_secs(60)).await;
                continue;
            };

            let wait = (fire_at - now).to_std().unwrap_or_default();
            info!(fire_at = %fire_at, wait_secs = wait.as_secs(), "next daily sweep scheduled");
            tokio::time::sleep(wait).await;

            let date = Utc::now().with_timezone(&NOTIFY_ZONE).date_naive();
            if self.tx.send(BotEvent::DailySweep { date }).await.is_err() {
                info!("event queue closed; daily trigger stopping");
                return;
            }
        }
    }
}

/// Next NOTIFY_HOUR:NOTIFY_MINUTE in the pinned zone strictly after `now`.
fn next_fire(now: DateTime<Tz>) -> Option<DateTime<Tz>> {
    let fire_time = NaiveTime::from_hms_opt(NOTIFY_HOUR, NOTIFY_MINUTE, 0)?;
    let mut day = now.date_naive();
    // Today, else tomorrow; one extra day covers a fire time that falls into
    // a DST gap.
    for _ in 0..3 {
        if let Some(candidate) = NOTIFY_ZONE
            .from_local_datetime(&day.and_time(fire_time))
            .earliest()
        {
            if candidate > now {
                return Some(candidate);
            }
        }
        day = day.succ_opt()?;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Tz> {
        NOTIFY_ZONE
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .unwrap()
    }

    #[test]
    fn fires_today_before_the_notify_time() {
        let fire = next_fire(at(2024, 1, 3, 20, 59)).unwrap();
        assert_eq!(fire, at(2024, 1, 3, 21, 0));
    }

    #[test]
    fn fires_tomorrow_at_or_after_the_notify_time() {
        let fire = next_fire(at(2024, 1, 3, 21, 0)).unwrap();
        assert_eq!(fire, at(2024, 1, 4, 21, 0));

        let fire = next_fire(at(2024, 1, 3, 23, 30)).unwrap();
        assert_eq!(fire, at(2024, 1, 4, 21, 0));
    }

    #[test]
    fn crosses_month_boundaries() {
        let fire = next_fire(at(2024, 1, 31, 22, 0)).unwrap();
        assert_eq!(fire, at(2024, 2, 1, 21, 0));
    }
}
