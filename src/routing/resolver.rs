//! Action resolution
//!
//! Maps a free-text action phrase to the best-matching tool. Matching is
//! intentionally approximate: direct containment first, then token overlap.
//! The tie-break is explicit — tools in synthesis order, phrases in
//! declaration order, first hit wins — so resolution is deterministic.
//! A miss returns None and must never fall through to a default tool.

use crate::discovery::types::{Capabilities, Endpoint, Tool};
use tracing::debug;

/// Words carrying no routing signal, dropped before token overlap. Without
/// this filter one-letter tokens like "a" substring-match almost any
/// phrase token.
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "to", "of", "in", "on", "my", "me", "for", "this", "that", "please",
];

/// Minimum token length considered by the overlap pass
const MIN_TOKEN_LEN: usize = 3;

fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|t| t.len() >= MIN_TOKEN_LEN && !STOP_WORDS.contains(&t.as_str()))
        .collect()
}

/// Whether any action token and phrase token overlap as substrings, in
/// either direction ("post" ⊂ "posts", "channels" ⊃ "channel")
fn tokens_overlap(action_tokens: &[String], phrase_tokens: &[String]) -> bool {
    action_tokens.iter().any(|at| {
        phrase_tokens
            .iter()
            .any(|pt| at.contains(pt.as_str()) || pt.contains(at.as_str()))
    })
}

/// Resolve a free-text action against discovered capabilities
pub fn resolve_action<'a>(
    action: &str,
    capabilities: &'a Capabilities,
) -> Option<(&'a Tool, &'a Endpoint)> {
    let needle = action.to_lowercase();

    // Pass 1: direct containment of a phrase inside the action
    for tool in &capabilities.tools {
        for phrase in &tool.action_phrases {
            if needle.contains(&phrase.to_lowercase()) {
                debug!("Action '{}' matched tool {} by phrase '{}'", action, tool.name, phrase);
                return Some((tool, tool.primary_endpoint()));
            }
        }
    }

    // Pass 2: token overlap fallback
    let action_tokens = tokens(&needle);
    if action_tokens.is_empty() {
        return None;
    }

    for tool in &capabilities.tools {
        for phrase in &tool.action_phrases {
            let phrase_tokens = tokens(phrase);
            if tokens_overlap(&action_tokens, &phrase_tokens) {
                debug!(
                    "Action '{}' matched tool {} by token overlap with '{}'",
                    action, tool.name, phrase
                );
                return Some((tool, tool.primary_endpoint()));
            }
        }
    }

    debug!("Action '{}' resolved to no tool", action);
    None
}
