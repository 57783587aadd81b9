//! Recurring schedule expressions: normalization and due-matching.
//!
//! Canonical form is lowercase with 3-letter day tokens, e.g. `every weekday`
//! or `every mon wed fri`. Matching for `every `-prefixed expressions is
//! substring containment, not token parsing: `every thu-ish` still fires on
//! Thursdays. Unrecognized expressions are inert, never an error.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 3-letter day tokens indexed by days-from-Sunday (0 = sun .. 6 = sat).
const DAY_TOKENS: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// Full English day names with their canonical tokens. The seven names do not
/// overlap as substrings, so replacement order does not matter.
const DAY_NAMES: [(&str, &str); 7] = [
    ("monday", "mon"),
    ("tuesday", "tue"),
    ("wednesday", "wed"),
    ("thursday", "thu"),
    ("friday", "fri"),
    ("saturday", "sat"),
    ("sunday", "sun"),
];

/// A normalized recurrence expression.
///
/// Only [`Schedule::parse`] constructs new values, so stored expressions are
/// always canonical; deserialization round-trips persisted data as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule(String);

impl Schedule {
    /// Normalize free text: lowercase, then replace every occurrence of each
    /// full English day name with its 3-letter token. Whitespace is kept as
    /// given; any input is accepted. Idempotent.
    pub fn parse(raw: &str) -> Self {
        let mut expr = raw.to_lowercase();
        for (name, token) in DAY_NAMES {
            expr = expr.replace(name, token);
        }
        Self(expr)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this schedule fires on `date`. First match wins:
    ///
    /// 1. `every day` — always due.
    /// 2. `every weekday` — due Monday through Friday.
    /// 3. `every ...` — due iff the date's day token appears anywhere in the
    ///    expression (substring, so `every mon wed fri` works unsplit).
    /// 4. a bare day token — due iff it equals the date's token.
    /// 5. anything else — never due.
    pub fn is_due(&self, date: NaiveDate) -> bool {
        let token = day_token(date);
        if self.0 == "every day" {
            return true;
        }
        if self.0 == "every weekday" {
            return !matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        }
        if self.0.starts_with("every ") {
            return self.0.contains(token);
        }
        if DAY_TOKENS.contains(&self.0.as_str()) {
            return self.0 == token;
        }
        false
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 3-letter token for the date's weekday.
fn day_token(date: NaiveDate) -> &'static str {
    DAY_TOKENS[date.weekday().num_days_from_sunday() as usize]
}
