use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

static NICKNAME_MENTION_MATCHER: Lazy<Regex> = Lazy::new(|| Regex::new(r"<@!(\d+)>").unwrap());

/// Rewrite every nickname mention `<@!id>` into the canonical form `<@id>`
pub fn normalize_mentions(content: &str) -> Cow<'_, str> {
    NICKNAME_MENTION_MATCHER.replace_all(content, "<@$1>")
}
