//! Token extraction from raw message text.
//!
//! The set extractors collapse repeated tokens within one message. The `_in_order` variants
//! keep the distinct tokens in the order they first appear in the text.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// User ids referenced with `<@U...>` markup, including the leading `U`.
pub fn extract_mentioned_users(text: &str) -> HashSet<String> {
    mentioned_users_in_order(text).into_iter().collect()
}

/// Distinct mentioned user ids in text order.
pub fn mentioned_users_in_order(text: &str) -> Vec<String> {
    static RE_MENTION: OnceLock<Regex> = OnceLock::new();
    let re = RE_MENTION.get_or_init(|| Regex::new(r"<@(U.+?)>").unwrap());
    extract_by_regex(re, text)
}

/// Hashtags such as `#release`, including the leading `#`.
///
/// Slack renders channel references as `#C...`, so a `#` followed by `C` never starts a tag.
/// A tag needs at least two word characters after the `#`.
pub fn extract_tags(text: &str) -> HashSet<String> {
    tags_in_order(text).into_iter().collect()
}

/// Distinct hashtags in text order.
pub fn tags_in_order(text: &str) -> Vec<String> {
    static RE_TAG: OnceLock<Regex> = OnceLock::new();
    let re = RE_TAG.get_or_init(|| Regex::new(r"(#[^C\W]\w+)").unwrap());
    extract_by_regex(re, text)
}

fn extract_by_regex(re: &Regex, text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|token| seen.insert(*token))
        .map(str::to_string)
        .collect()
}
