//! Editing policy for the recipient token field.
//!
//! # Responsibility
//! - Turn raw field events (typing, return, focus loss, clear, suggestion
//!   pick, range replacement) into token and text edits.
//! - Enforce the token capacity and removal-range rules.
//!
//! # Invariants
//! - Event handlers never mutate `tokens` or `text` directly; they queue
//!   edits that take effect only in [`TokenField::apply_pending`].
//! - No empty token is ever created; token text is trimmed.
//! - `tokens.len()` never exceeds `max_token_count` when one is set.
//! - Out-of-range removal requests change nothing.

use crate::compose::mailto_uri;
use log::{debug, warn};
use std::collections::VecDeque;
use std::ops::Range;

/// Characters that finish the token being typed.
pub const TOKEN_SEPARATORS: [char; 4] = [';', ',', ' ', ':'];

/// Token limit used by the recipient search screen.
pub const DEFAULT_MAX_TOKEN_COUNT: usize = 3;

/// A queued change to the field state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenFieldEdit {
    AppendToken(String),
    RemoveTokens(Range<usize>),
    ClearTokens,
    SetText(String),
}

/// Replacement target reported by the field.
///
/// A negative `location` addresses tokens counted back from the end of the
/// token list: `-1` is the last token. Non-negative locations address the
/// free text after the tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditRange {
    pub location: isize,
    pub length: usize,
}

impl EditRange {
    pub fn new(location: isize, length: usize) -> Self {
        Self { location, length }
    }

    fn targets_tokens(self) -> bool {
        self.location < 0 && self.length > 0
    }
}

/// Answer to a replacement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditDecision {
    /// The replacement text may be applied to the field.
    Allow,
    /// Token removal was queued; the field text must not change.
    RemovalScheduled,
    /// Request rejected; nothing was queued.
    NotPermitted,
}

/// Summary returned by [`TokenField::apply_pending`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppliedEdits {
    pub applied: usize,
    /// Edits dropped because they no longer fit the current state.
    pub dropped: usize,
    pub tokens_changed: bool,
    /// The search query changed; suggestions must be recomputed.
    pub text_changed: bool,
}

/// State of one recipient token field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenField {
    tokens: Vec<String>,
    text: String,
    max_token_count: Option<usize>,
    pending: VecDeque<TokenFieldEdit>,
}

impl Default for TokenField {
    fn default() -> Self {
        Self::new(Some(DEFAULT_MAX_TOKEN_COUNT))
    }
}

impl TokenField {
    /// Creates an empty field. `None` means no token limit.
    pub fn new(max_token_count: Option<usize>) -> Self {
        Self {
            tokens: Vec::new(),
            text: String::new(),
            max_token_count,
            pending: VecDeque::new(),
        }
    }

    /// Rebuilds a field from tokens and text held by the caller.
    ///
    /// Nothing is queued; tokens past the limit are kept as given.
    pub fn with_state(tokens: Vec<String>, text: String, max_token_count: Option<usize>) -> Self {
        Self {
            tokens,
            text,
            max_token_count,
            pending: VecDeque::new(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Uncommitted text, used as the live search query.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn max_token_count(&self) -> Option<usize> {
        self.max_token_count
    }

    pub fn set_max_token_count(&mut self, max_token_count: Option<usize>) {
        self.max_token_count = max_token_count;
    }

    pub fn pending_edits(&self) -> impl Iterator<Item = &TokenFieldEdit> {
        self.pending.iter()
    }

    pub fn has_pending_edits(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_at_capacity(&self) -> bool {
        self.max_token_count
            .is_some_and(|max| self.tokens.len() >= max)
    }

    /// `mailto:` URI for the confirmed tokens.
    pub fn mailto_uri(&self) -> Option<String> {
        mailto_uri(&self.tokens)
    }

    /// Handles a change of the live field text.
    ///
    /// A trailing separator confirms the text before it as a token.
    pub fn handle_text_change(&mut self, text: &str) {
        let Some(last) = text.chars().last() else {
            self.schedule(TokenFieldEdit::SetText(String::new()));
            return;
        };

        if !TOKEN_SEPARATORS.contains(&last) {
            self.schedule(TokenFieldEdit::SetText(text.to_string()));
            return;
        }

        let value = &text[..text.len() - last.len_utf8()];
        if !self.confirm(value) {
            self.schedule(TokenFieldEdit::SetText(String::new()));
        }
    }

    /// Handles the return key. Returns whether a token was queued.
    pub fn handle_return(&mut self, text: &str) -> bool {
        self.confirm(text)
    }

    /// Handles focus loss with unsubmitted text. Returns whether a token was queued.
    pub fn handle_end_editing(&mut self, text: &str) -> bool {
        self.confirm(text)
    }

    /// Handles the clear button: drops every token and the text.
    pub fn handle_clear(&mut self) {
        self.schedule(TokenFieldEdit::ClearTokens);
        self.schedule(TokenFieldEdit::SetText(String::new()));
    }

    /// Handles acceptance of a suggested candidate. Returns whether a token was queued.
    pub fn handle_suggestion_selected(&mut self, suggestion: &str) -> bool {
        self.confirm(suggestion)
    }

    /// Decides whether `replacement` may replace `range`.
    ///
    /// Ranges over tokens queue their removal. Free-text entry is rejected
    /// once the token limit is reached; deleting text is always allowed.
    pub fn handle_replace(&mut self, range: EditRange, replacement: &str) -> EditDecision {
        if !range.targets_tokens() {
            if !replacement.is_empty() && self.is_at_capacity() {
                debug!(
                    "event=token_entry module=search status=rejected reason=capacity tokens={}",
                    self.tokens.len()
                );
                return EditDecision::NotPermitted;
            }
            return EditDecision::Allow;
        }

        match self.token_range(range) {
            Some(indices) => {
                self.schedule(TokenFieldEdit::RemoveTokens(indices));
                EditDecision::RemovalScheduled
            }
            None => {
                debug!(
                    "event=token_remove module=search status=rejected reason=out_of_range location={} length={} tokens={}",
                    range.location,
                    range.length,
                    self.tokens.len()
                );
                EditDecision::NotPermitted
            }
        }
    }

    /// Applies every queued edit in order.
    ///
    /// Call after the handler that queued them has returned. Appends past
    /// the token limit and removals that no longer fit are dropped.
    pub fn apply_pending(&mut self) -> AppliedEdits {
        let mut summary = AppliedEdits::default();

        while let Some(edit) = self.pending.pop_front() {
            let applied = match edit {
                TokenFieldEdit::AppendToken(token) => {
                    if self.is_at_capacity() {
                        warn!(
                            "event=token_append module=search status=dropped reason=capacity tokens={}",
                            self.tokens.len()
                        );
                        false
                    } else {
                        self.tokens.push(token);
                        summary.tokens_changed = true;
                        true
                    }
                }
                TokenFieldEdit::RemoveTokens(indices) => {
                    if indices.end <= self.tokens.len() {
                        self.tokens.drain(indices);
                        summary.tokens_changed = true;
                        true
                    } else {
                        false
                    }
                }
                TokenFieldEdit::ClearTokens => {
                    summary.tokens_changed |= !self.tokens.is_empty();
                    self.tokens.clear();
                    true
                }
                TokenFieldEdit::SetText(text) => {
                    if self.text != text {
                        self.text = text;
                        summary.text_changed = true;
                    }
                    true
                }
            };

            if applied {
                summary.applied += 1;
            } else {
                summary.dropped += 1;
            }
        }

        summary
    }

    fn confirm(&mut self, raw: &str) -> bool {
        let value = raw.trim();
        if value.is_empty() {
            return false;
        }

        self.schedule(TokenFieldEdit::AppendToken(value.to_string()));
        self.schedule(TokenFieldEdit::SetText(String::new()));
        true
    }

    fn token_range(&self, range: EditRange) -> Option<Range<usize>> {
        let count = self.tokens.len();
        let back = range.location.unsigned_abs();
        let start = count.checked_sub(back)?;
        let end = start.checked_add(range.length)?;
        (end <= count).then_some(start..end)
    }

    fn schedule(&mut self, edit: TokenFieldEdit) {
        self.pending.push_back(edit);
    }
}
