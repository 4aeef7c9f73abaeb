//! Mail compose handoff.
//!
//! Builds the `mailto:` URI handed to an external mail client.

const MAILTO_PREFIX: &str = "mailto:";
const RECIPIENT_SEPARATOR: &str = ",";

/// Returns `mailto:` followed by the tokens joined with commas.
///
/// Returns `None` for an empty token list, or when any token contains
/// whitespace or control characters and cannot form a URI.
pub fn mailto_uri(tokens: &[String]) -> Option<String> {
    if tokens.is_empty() {
        return None;
    }

    let unusable = tokens.iter().any(|token| {
        token
            .chars()
            .any(|ch| ch.is_whitespace() || ch.is_control())
    });
    if unusable {
        return None;
    }

    Some(format!(
        "{MAILTO_PREFIX}{}",
        tokens.join(RECIPIENT_SEPARATOR)
    ))
}
