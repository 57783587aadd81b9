//! Map Grammers types and raw message text to domain values.
//!
//! Extracts the forum-topic thread id from the reply header and parses
//! mention-addressed commands out of free text.

use crate::domain::Command;
use grammers_client::tl;

/// Thread (forum topic) id for a message posted inside a topic, if any.
///
/// Telegram marks topic messages with `forum_topic` on the reply header; the
/// topic's root id is `reply_to_top_id`, falling back to `reply_to_msg_id`
/// for direct children of the root.
pub fn thread_id_of(msg: &tl::types::Message) -> Option<i32> {
    match msg.reply_to.as_ref()? {
        tl::enums::MessageReplyHeader::Header(h) if h.forum_topic => {
            h.reply_to_top_id.or(h.reply_to_msg_id)
        }
        _ => None,
    }
}

/// Parse a mention-addressed command out of message text.
///
/// The bot reacts only when `@<username>` appears somewhere in the text; the
/// word after the mention selects the verb. Returns None for text that does
/// not address the bot; a mention with a missing, malformed, or unknown verb
/// yields `Help`, which doubles as the usage message.
pub fn parse_command(bot_username: &str, text: &str) -> Option<Command> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mention = words.iter().position(|w| {
        w.strip_prefix('@')
            .is_some_and(|u| u.eq_ignore_ascii_case(bot_username))
    })?;

    let verb = words.get(mention + 1).copied().unwrap_or("");
    match verb.to_ascii_lowercase().as_str() {
        "add" => {
            let user_tag = words
                .get(mention + 2)
                .map(|w| w.trim_start_matches('@'))
                .unwrap_or("");
            let raw_schedule = words
                .get(mention + 3..)
                .map(|rest| rest.join(" "))
                .unwrap_or_default();
            if user_tag.is_empty() || raw_schedule.is_empty() {
                return Some(Command::Help);
            }
            Some(Command::Add {
                user_tag: user_tag.to_string(),
                raw_schedule,
            })
        }
        "report" => Some(Command::Report),
        "reset" => Some(Command::Reset),
        "list" => Some(Command::List),
        // "help", a bare mention, and anything unrecognized
        _ => Some(Command::Help),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: &str = "report_reminder_bot";

    #[test]
    fn parses_add_with_user_and_schedule() {
        let cmd = parse_command(BOT, "@report_reminder_bot add @alice every Monday and Friday");
        assert_eq!(
            cmd,
            Some(Command::Add {
                user_tag: "alice".to_string(),
                raw_schedule: "every Monday and Friday".to_string(),
            })
        );
    }

    #[test]
    fn parses_simple_verbs() {
        assert_eq!(
            parse_command(BOT, "@report_reminder_bot report"),
            Some(Command::Report)
        );
        assert_eq!(
            parse_command(BOT, "@report_reminder_bot reset"),
            Some(Command::Reset)
        );
        assert_eq!(
            parse_command(BOT, "@report_reminder_bot list"),
            Some(Command::List)
        );
        assert_eq!(
            parse_command(BOT, "@report_reminder_bot help"),
            Some(Command::Help)
        );
    }

    #[test]
    fn mention_may_appear_mid_text() {
        assert_eq!(
            parse_command(BOT, "numbers are in, @report_reminder_bot report"),
            Some(Command::Report)
        );
    }

    #[test]
    fn mention_and_verb_are_case_insensitive() {
        assert_eq!(
            parse_command(BOT, "@Report_Reminder_Bot REPORT"),
            Some(Command::Report)
        );
    }

    #[test]
    fn malformed_add_falls_back_to_help() {
        assert_eq!(
            parse_command(BOT, "@report_reminder_bot add"),
            Some(Command::Help)
        );
        assert_eq!(
            parse_command(BOT, "@report_reminder_bot add @alice"),
            Some(Command::Help)
        );
    }

    #[test]
    fn bare_mention_and_unknown_verb_get_help() {
        assert_eq!(parse_command(BOT, "@report_reminder_bot"), Some(Command::Help));
        assert_eq!(
            parse_command(BOT, "@report_reminder_bot dance"),
            Some(Command::Help)
        );
    }

    #[test]
    fn ignores_text_without_the_bot_mention() {
        assert_eq!(parse_command(BOT, "just chatting about the report"), None);
        assert_eq!(parse_command(BOT, "@someone_else report"), None);
        assert_eq!(parse_command(BOT, ""), None);
    }
}
