//! Message records as fetched from a channel history or loaded from a snapshot.

use serde::{Deserialize, Serialize};

/// A single channel message.
///
/// Field names follow Slack's snake_case JSON so that history responses and persisted
/// snapshots share one shape. Optional fields stay optional: an absent reply count and a
/// reply count of zero are different values even though both score the same.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Slack's message timestamp, which doubles as its identifier within a channel.
    #[serde(rename = "ts", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_intro: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactions: Option<Vec<Reaction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_users_count: Option<u64>,
}

/// An emoji reaction and how many users added it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub name: String,
    #[serde(default)]
    pub count: u64,
}

/// A workspace member as returned by a user lookup.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub real_name: Option<String>,
}

/// A public channel as returned by the channel listing.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Message {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn posted_by(user: &str, text: &str) -> Self {
        Self {
            user: Some(user.to_string()),
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    /// Message body, empty when absent.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// System-generated entries: joins, topic changes, bot notices, channel intros.
    pub fn is_system(&self) -> bool {
        let has_subtype = self.subtype.as_deref().is_some_and(|s| !s.is_empty());
        has_subtype || self.hidden || self.is_intro
    }
}

/// Drops system-generated messages, keeping the relative order of the rest.
pub fn retain_conversation(messages: Vec<Message>) -> Vec<Message> {
    messages.into_iter().filter(|m| !m.is_system()).collect()
}

/// Single-line rendering of a message body.
///
/// Each carriage return, newline and tab becomes one space.
pub fn normalize(text: Option<&str>) -> String {
    text.unwrap_or_default()
        .chars()
        .map(|c| match c {
            '\r' | '\n' | '\t' => ' ',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retain_conversation_drops_system_messages() {
        let kept_1 = Message::posted_by("U1", "hello");
        let joined = Message {
            subtype: Some("channel_join".to_string()),
            ..Message::posted_by("U2", "has joined the channel")
        };
        let hidden = Message {
            hidden: true,
            ..Message::with_text("hidden")
        };
        let intro = Message {
            is_intro: true,
            ..Message::with_text("This is the very beginning")
        };
        let kept_2 = Message {
            subtype: Some(String::new()),
            ..Message::posted_by("U3", "empty subtype is a regular message")
        };

        let result = retain_conversation(vec![
            kept_1.clone(),
            joined,
            hidden,
            intro,
            kept_2.clone(),
        ]);

        assert_eq!(result, vec![kept_1, kept_2]);
    }

    #[test]
    fn test_retain_conversation_empty() {
        assert!(retain_conversation(vec![]).is_empty());
    }

    #[test]
    fn test_normalize_replaces_control_characters() {
        assert_eq!(normalize(Some("a\r\nb\tc")), "a  b c");
    }

    #[test]
    fn test_normalize_absent_text() {
        assert_eq!(normalize(None), "");
    }

    #[test]
    fn test_deserialize_slack_message() {
        let json = r#"{
            "type": "message",
            "ts": "1609459200.000100",
            "user": "U000001",
            "text": "Hello <@U000002>",
            "reactions": [{"name": "tada", "count": 3, "users": ["U1", "U2", "U3"]}],
            "reply_count": 2,
            "reply_users_count": 1
        }"#;

        let message: Message = serde_json::from_str(json).unwrap();

        assert_eq!(message.id.as_deref(), Some("1609459200.000100"));
        assert_eq!(message.user.as_deref(), Some("U000001"));
        assert_eq!(message.reactions.as_ref().unwrap()[0].count, 3);
        assert_eq!(message.reply_count, Some(2));
        assert!(!message.hidden);
        assert!(!message.is_intro);
    }

    #[test]
    fn test_deserialize_minimal_message() {
        let message: Message = serde_json::from_str("{}").unwrap();
        assert_eq!(message, Message::default());
        assert_eq!(message.text(), "");
    }
}
