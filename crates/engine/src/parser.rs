//! Notification parser — turns the raw text of a feed notification into a
//! structured event record.
//!
//! Only the first line carries provenance; the rest of the message is
//! presentation context and is ignored. Every extraction is independent and
//! best-effort: parsing never fails, a field that cannot be extracted is
//! simply left absent and disables the dispatch paths that need it.

use std::sync::LazyLock;

use regex::Regex;

use reactor_common::types::{ChannelRef, NotificationEvent};

/// Private-channel origin link: `https://t.me/c/<internal-id>/<message-id>`.
static PRIVATE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https://t\.me/c/(\d+)/(\d+)").unwrap());

/// Public-channel origin link: `https://t.me/<name>/<message-id>`.
static PUBLIC_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https://t\.me/([^/\s]+)/(\d+)").unwrap());

/// First double-quoted phrase on the line.
static QUOTED_PHRASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]+)""#).unwrap());

/// Sender descriptor: `FROM <display name>(<@handle or numeric id>)`.
static SENDER_DESCRIPTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"FROM\s+([^(]+)\((@?\w+)\)").unwrap());

/// Parse one notification message into a [`NotificationEvent`].
pub fn parse(raw_text: &str) -> NotificationEvent {
    let mut event = NotificationEvent::default();

    let Some(first) = raw_text.lines().next() else {
        return event;
    };

    // Origin link: the private pattern wins because the public one would
    // also match a `t.me/c/...` URL (capturing "c" as the channel name).
    if let Some(caps) = PRIVATE_LINK.captures(first) {
        event.source_channel = ChannelRef::from_private_internal_id(&caps[1]);
        event.source_message_id = caps[2].parse().ok();
    } else if let Some(caps) = PUBLIC_LINK.captures(first) {
        event.source_channel = Some(ChannelRef::Name(caps[1].to_string()));
        event.source_message_id = caps[2].parse().ok();
    }

    if let Some(caps) = QUOTED_PHRASE.captures(first) {
        event.keyword = Some(caps[1].to_string());
    }

    if let Some(caps) = SENDER_DESCRIPTOR.captures(first) {
        let identifier = &caps[2];
        if let Some(handle) = identifier.strip_prefix('@') {
            event.sender_username = Some(handle.to_string());
        } else {
            match identifier.parse::<i64>() {
                Ok(id) => event.sender_id = Some(id),
                Err(_) => {
                    tracing::debug!(identifier, "Sender identifier is not a valid integer");
                }
            }
        }
    }

    event
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_link_round_trip() {
        let event = parse(r#"KEYWORD "naive" https://t.me/c/1234567890/42 FROM x(@y)"#);
        assert_eq!(event.source_channel, Some(ChannelRef::Id(-1001234567890)));
        assert_eq!(event.source_message_id, Some(42));
    }

    #[test]
    fn test_public_link_round_trip() {
        let event = parse(r#"hit in https://t.me/some_channel/777"#);
        assert_eq!(
            event.source_channel,
            Some(ChannelRef::Name("some_channel".to_string()))
        );
        assert_eq!(event.source_message_id, Some(777));
    }

    #[test]
    fn test_quoted_keyword_extracted() {
        let event = parse(r#"detected "三色图" somewhere"#);
        assert_eq!(event.keyword, Some("三色图".to_string()));
    }

    #[test]
    fn test_sender_numeric_id() {
        let event = parse("FROM jacky jay(5979280761)");
        assert_eq!(event.sender_id, Some(5979280761));
        assert_eq!(event.sender_username, None);
    }

    #[test]
    fn test_sender_username() {
        let event = parse("FROM Yang Bo(@Zen_Neng_Bu_Bian_Tai)");
        assert_eq!(
            event.sender_username,
            Some("Zen_Neng_Bu_Bian_Tai".to_string())
        );
        assert_eq!(event.sender_id, None);
    }

    #[test]
    fn test_only_first_line_is_parsed() {
        let event = parse("no provenance here\nhttps://t.me/hidden/5 FROM a(@b)");
        assert_eq!(event, NotificationEvent::default());
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(parse(""), NotificationEvent::default());
    }

    #[test]
    fn test_all_fields_together() {
        let event = parse(
            r#"MATCH "naive" AT https://t.me/c/2000000001/15 FROM Yang Bo(@Zen_Neng_Bu_Bian_Tai)"#,
        );
        assert_eq!(event.source_channel, Some(ChannelRef::Id(-1002000000001)));
        assert_eq!(event.source_message_id, Some(15));
        assert_eq!(event.keyword, Some("naive".to_string()));
        assert_eq!(
            event.sender_username,
            Some("Zen_Neng_Bu_Bian_Tai".to_string())
        );
    }
}
