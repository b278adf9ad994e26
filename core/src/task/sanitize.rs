//! Free-text sanitization
//!
//! All markup is removed from user input before it is validated or stored.
//! Surviving text is HTML-escaped, so a stored value never contains a live
//! `<`. The content of elements that never render as text (scripts, styles
//! and the like) is dropped with the tags.

use std::collections::HashSet;

use ammonia::Builder;

/// Elements whose inner content is removed along with the tags
const NON_TEXT_ELEMENTS: [&str; 5] = ["script", "style", "textarea", "noscript", "option"];

/// Strip markup, trim surrounding whitespace, then cap at `max_chars` characters.
///
/// The order matters: input that is only markup ends up empty and must be
/// rejected by the caller.
pub fn sanitize_text(input: &str, max_chars: usize) -> String {
    let stripped = strip_markup(input);
    stripped.trim().chars().take(max_chars).collect()
}

/// Remove every tag, attribute and comment from `input`, escaping the text
/// that remains.
pub fn strip_markup(input: &str) -> String {
    Builder::empty()
        .clean_content_tags(HashSet::from(NON_TEXT_ELEMENTS))
        .clean(input)
        .to_string()
}
