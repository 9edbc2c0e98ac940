//! Message analysis: grouping, popularity scoring and the analysis report.
//!
//! Every grouping is ordered by descending group size. Groups of equal size keep the order
//! in which their keys were first seen, so truncating to the first `limit` groups always
//! yields the same result for the same input.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use crate::extract::{mentioned_users_in_order, tags_in_order};
use crate::limit::Limit;
use crate::message::{normalize, Message};

/// Messages that share a group key.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a, K> {
    pub key: K,
    pub messages: Vec<&'a Message>,
}

impl<K> Group<'_, K> {
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Groups ordered by descending size, ties in first-insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Grouping<'a, K> {
    groups: Vec<Group<'a, K>>,
}

impl<'a, K: Eq + Hash + Clone> Grouping<'a, K> {
    /// Collects `(key, message)` pairs, preserving first-seen key order, then sorts by size.
    fn collect(pairs: impl IntoIterator<Item = (K, &'a Message)>) -> Self {
        let mut index: HashMap<K, usize> = HashMap::new();
        let mut groups: Vec<Group<'a, K>> = Vec::new();

        for (key, message) in pairs {
            match index.get(&key) {
                Some(&i) => groups[i].messages.push(message),
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push(Group {
                        key,
                        messages: vec![message],
                    });
                }
            }
        }

        // `sort_by` is stable: equal sizes keep insertion order.
        groups.sort_by(|a, b| b.len().cmp(&a.len()));

        Self { groups }
    }

    pub fn get(&self, key: &K) -> Option<&[&'a Message]> {
        self.groups
            .iter()
            .find(|g| &g.key == key)
            .map(|g| g.messages.as_slice())
    }
}

impl<'a, K> Grouping<'a, K> {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group<'a, K>> {
        self.groups.iter()
    }

    /// Group keys in ranking order.
    pub fn keys(&self) -> Vec<&K> {
        self.groups.iter().map(|g| &g.key).collect()
    }
}

impl<'a, 'g, K> IntoIterator for &'g Grouping<'a, K> {
    type Item = &'g Group<'a, K>;
    type IntoIter = std::slice::Iter<'g, Group<'a, K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Groups messages under every distinct user they mention.
///
/// A message mentioning N users appears in N groups; one without mentions in none.
pub fn group_by_mentioned_user(messages: &[Message]) -> Grouping<'_, String> {
    Grouping::collect(messages.iter().flat_map(|message| {
        mentioned_users_in_order(message.text())
            .into_iter()
            .map(move |user| (user, message))
    }))
}

/// Groups messages by poster. Messages without a poster form their own `None` group.
pub fn group_by_posting_user(messages: &[Message]) -> Grouping<'_, Option<String>> {
    Grouping::collect(
        messages
            .iter()
            .map(|message| (message.user.clone(), message)),
    )
}

/// Groups messages under every distinct tag they contain.
pub fn group_by_tags(messages: &[Message]) -> Grouping<'_, String> {
    Grouping::collect(messages.iter().flat_map(|message| {
        tags_in_order(message.text())
            .into_iter()
            .map(move |tag| (tag, message))
    }))
}

/// Popularity of a message: reaction counts plus replies plus distinct repliers.
pub fn reaction_score(message: &Message) -> u64 {
    message
        .reactions
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|r| r.count)
        .fold(0u64, u64::saturating_add)
        .saturating_add(message.reply_count.unwrap_or(0))
        .saturating_add(message.reply_users_count.unwrap_or(0))
}

/// All messages ordered by descending [`reaction_score`], ties in input order.
pub fn sort_by_reactions(messages: &[Message]) -> Vec<&Message> {
    let mut scored: Vec<(u64, &Message)> =
        messages.iter().map(|m| (reaction_score(m), m)).collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, m)| m).collect()
}

/// Summary of one group, as rendered.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupSummary<K> {
    pub key: K,
    /// Resolved display name for user keys, filled in by the caller when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    pub count: usize,
    /// Normalized message texts, only populated for verbose reports.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

/// One entry of the popularity ranking.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedMessage {
    pub score: u64,
    pub text: String,
}

/// Everything the analyzer renders, each section truncated to the limit.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalysisReport {
    pub total_messages: usize,
    pub limit: usize,
    pub mentioned_users: Vec<GroupSummary<String>>,
    pub posting_users: Vec<GroupSummary<Option<String>>>,
    pub popular_messages: Vec<RankedMessage>,
    pub tags: Vec<GroupSummary<String>>,
}

/// Runs all four analyses and keeps the first `limit` entries of each.
///
/// With `verbose` every group summary carries the normalized texts of its messages.
pub fn build_report(messages: &[Message], limit: Limit, verbose: bool) -> AnalysisReport {
    let limit = limit.get();

    AnalysisReport {
        total_messages: messages.len(),
        limit,
        mentioned_users: summarize(&group_by_mentioned_user(messages), limit, verbose),
        posting_users: summarize(&group_by_posting_user(messages), limit, verbose),
        popular_messages: sort_by_reactions(messages)
            .into_iter()
            .take(limit)
            .map(|m| RankedMessage {
                score: reaction_score(m),
                text: normalize(m.text.as_deref()),
            })
            .collect(),
        tags: summarize(&group_by_tags(messages), limit, verbose),
    }
}

fn summarize<K: Clone>(
    grouping: &Grouping<'_, K>,
    limit: usize,
    verbose: bool,
) -> Vec<GroupSummary<K>> {
    grouping
        .iter()
        .take(limit)
        .filter(|group| !group.is_empty())
        .map(|group| GroupSummary {
            key: group.key.clone(),
            display: None,
            count: group.len(),
            messages: if verbose {
                group
                    .messages
                    .iter()
                    .map(|m| normalize(m.text.as_deref()))
                    .collect()
            } else {
                Vec::new()
            },
        })
        .collect()
}
