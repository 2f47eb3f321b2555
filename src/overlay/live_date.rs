//! Live wall-clock tokens embedded in message text.
//!
//! A token is `%{<strftime pattern>}%`; it is replaced with the current UTC time every
//! time the message is drawn, so a message can carry a ticking clock.

use std::{borrow::Cow, fmt::Write as _, sync::LazyLock};

use chrono::{
    DateTime, Utc,
    format::{Item, StrftimeItems},
};
use regex::{Captures, Regex};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%\{(.*?)\}%").expect("live-date token regex is valid")
});

/// Substitute every token in `text` with `now` formatted by the token's pattern.
///
/// Tokens whose pattern does not parse are left as-is.
pub fn resolve_live_dates(text: &str, now: DateTime<Utc>) -> Cow<'_, str> {
    TOKEN.replace_all(text, |caps: &Captures<'_>| {
        let pattern = caps[1].trim();
        format_pattern(pattern, now).unwrap_or_else(|| {
            tracing::debug!(pattern, "malformed live-date pattern left unresolved");
            caps[0].to_string()
        })
    })
}

fn format_pattern(pattern: &str, now: DateTime<Utc>) -> Option<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }

    let mut out = String::new();
    write!(out, "{}", now.format_with_items(items.iter())).ok()?;
    Some(out)
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/live_date.rs"]
mod tests;
