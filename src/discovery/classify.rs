//! Capability classifier
//!
//! Assigns a semantic category to endpoint text (path plus any summary and
//! description) using a prioritized table of regex patterns. The table is
//! flat and ordered so the tie-break is auditable: the first matching
//! pattern wins, and `General` is the fallback.

use crate::discovery::types::Category;
use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered (pattern, category) table. Each theme contributes a noun tier
/// and an action tier; action tiers come first within a theme so that
/// "send message" classifies as an action rather than a noun hit.
static PATTERN_TABLE: Lazy<Vec<(Regex, Category)>> = Lazy::new(|| {
    let table: &[(&str, Category)] = &[
        // Messaging
        (r"(?i)send|reply|forward", Category::MessagingAction),
        (r"(?i)message|chat|conversation|inbox|dm\b", Category::Messaging),
        // Social
        (r"(?i)share|publish|ugc", Category::SocialAction),
        (r"(?i)post|feed|timeline|status", Category::Social),
        // Contacts
        (r"(?i)contact|connection|friend|follower|member|channel", Category::Contacts),
        // Search
        (r"(?i)\bquery\b|\bfilter\b", Category::SearchParam),
        (r"(?i)search|find|lookup", Category::Search),
        // Calendar
        (r"(?i)schedule|invite|rsvp", Category::CalendarAction),
        (r"(?i)calendar|event|meeting|appointment", Category::Calendar),
        // Files
        (r"(?i)upload|folder|\bmove\b|\bcopy\b", Category::FileOrganization),
        (r"(?i)file|document|drive|attachment", Category::Files),
        // Profile
        (r"(?i)\bme\b|profile|user(info)?|account|whoami", Category::Profile),
    ];

    table
        .iter()
        .map(|(pattern, category)| {
            // Table patterns are static and known-good
            (Regex::new(pattern).expect("invalid classifier pattern"), *category)
        })
        .collect()
});

/// Classify endpoint text into a category. Deterministic and
/// side-effect-free: identical text always yields the identical category.
pub fn classify(text: &str) -> Category {
    for (pattern, category) in PATTERN_TABLE.iter() {
        if pattern.is_match(text) {
            return *category;
        }
    }
    Category::General
}
