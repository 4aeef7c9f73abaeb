//! Email-validity predicate backed by a small link detector.
//!
//! # Responsibility
//! - Recognize link-shaped substrings (mail links, web links, bare addresses).
//! - Decide whether a text value is exactly one bare email address.
//!
//! # Invariants
//! - A valid email is exactly one detected link spanning the whole input.
//! - The detected link scheme must be `mailto`.
//! - Text already carrying the literal `mailto:` prefix is rejected.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

const MAILTO_SCHEME: &str = "mailto";
const MAILTO_PREFIX: &str = "mailto:";

const LOCAL_PART: &str = r"[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*";
const DOMAIN: &str = r"(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}";

static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    let address = format!("{LOCAL_PART}@{DOMAIN}");
    let pattern = format!(
        r#"(?P<mailto>(?i:mailto):{address})|(?P<web>(?i:[a-z][a-z0-9+.\-]*)://[^\s<>"]+|(?i:www)\.[^\s<>"]+)|(?P<email>{address})"#
    );
    Regex::new(&pattern).expect("valid link regex")
});

/// One link recognized inside a text value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    /// Byte range of the match inside the scanned text.
    pub range: Range<usize>,
    /// URL scheme. Mail links keep the case they were written in, web
    /// schemes are lowercased and bare addresses report `mailto`.
    pub scheme: String,
}

/// Returns every non-overlapping link found in `text`, left to right.
pub fn detect_links(text: &str) -> Vec<LinkMatch> {
    LINK_RE
        .captures_iter(text)
        .filter_map(|caps| {
            if let Some(found) = caps.name("mailto") {
                return Some(LinkMatch {
                    range: found.range(),
                    scheme: written_scheme(found.as_str()),
                });
            }
            if let Some(found) = caps.name("web") {
                return Some(LinkMatch {
                    range: found.range(),
                    scheme: web_scheme(found.as_str()),
                });
            }
            caps.name("email").map(|found| LinkMatch {
                range: found.range(),
                scheme: MAILTO_SCHEME.to_string(),
            })
        })
        .collect()
}

/// Returns whether `text` is a single bare email address.
///
/// `"user@example.com"` is valid; `"mailto:user@example.com"` is not, even
/// though it is a well-formed mail link.
pub fn is_valid_email(text: &str) -> bool {
    let links = detect_links(text);
    let [link] = links.as_slice() else {
        return false;
    };

    if link.scheme != MAILTO_SCHEME {
        return false;
    }
    if link.range != (0..text.len()) {
        return false;
    }

    !text.starts_with(MAILTO_PREFIX)
}

fn written_scheme(link: &str) -> String {
    link.split_once(':')
        .map(|(scheme, _)| scheme.to_string())
        .unwrap_or_default()
}

fn web_scheme(link: &str) -> String {
    match link.split_once("://") {
        Some((scheme, _)) => scheme.to_ascii_lowercase(),
        None => "http".to_string(),
    }
}
