//! Placeholder tokens and their substitution.
//!
//! Instruction text uses single-brace tokens such as `{query}`. Only the
//! tokens listed in [`Placeholder`] are substituted; any other braced text
//! is left untouched so that templates may contain literal braces.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Placeholder tokens understood by the consuming assistant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    /// Formatted web search results. Required.
    WebResults,
    /// The user's query. Required.
    Query,
    /// Today's date. Optional.
    CurrentDate,
}

impl Placeholder {
    /// Every known placeholder, in toolbar order.
    pub const ALL: [Self; 3] = [Self::WebResults, Self::Query, Self::CurrentDate];

    /// Returns the literal token inserted into instruction text.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::WebResults => "{web_results}",
            Self::Query => "{query}",
            Self::CurrentDate => "{current_date}",
        }
    }

    /// Returns `true` for tokens a valid instruction must contain.
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::WebResults | Self::Query)
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "web_results" => Some(Self::WebResults),
            "query" => Some(Self::Query),
            "current_date" => Some(Self::CurrentDate),
            _ => None,
        }
    }
}

/// Presence of each placeholder within a text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderStatus {
    /// `{web_results}` is present.
    pub has_web_results: bool,
    /// `{query}` is present.
    pub has_query: bool,
    /// `{current_date}` is present.
    pub has_current_date: bool,
}

impl PlaceholderStatus {
    /// Scans `text` for every known placeholder.
    #[must_use]
    pub fn scan(text: &str) -> Self {
        Self {
            has_web_results: text.contains(Placeholder::WebResults.token()),
            has_query: text.contains(Placeholder::Query.token()),
            has_current_date: text.contains(Placeholder::CurrentDate.token()),
        }
    }

    /// Returns whether the given placeholder is present.
    #[must_use]
    pub const fn contains(&self, placeholder: Placeholder) -> bool {
        match placeholder {
            Placeholder::WebResults => self.has_web_results,
            Placeholder::Query => self.has_query,
            Placeholder::CurrentDate => self.has_current_date,
        }
    }
}

/// Values substituted into an instruction at use time.
///
/// A missing current date renders as an empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaceholderValues {
    web_results: String,
    query: String,
    current_date: Option<String>,
}

impl PlaceholderValues {
    /// Creates values for the two required placeholders.
    #[must_use]
    pub fn new(web_results: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            web_results: web_results.into(),
            query: query.into(),
            current_date: None,
        }
    }

    /// Sets the value substituted for `{current_date}`.
    #[must_use]
    pub fn with_current_date(mut self, current_date: impl Into<String>) -> Self {
        self.current_date = Some(current_date.into());
        self
    }

    fn value(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::WebResults => &self.web_results,
            Placeholder::Query => &self.query,
            Placeholder::CurrentDate => self.current_date.as_deref().unwrap_or_default(),
        }
    }
}

/// Substitutes known placeholders in a single pass.
///
/// Substituted values are never rescanned, so a query containing
/// `{web_results}` is emitted verbatim.
pub(crate) fn render_placeholders(text: &str, values: &PlaceholderValues) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let candidate = &rest[open..];
        let known = candidate
            .find('}')
            .and_then(|close| Placeholder::from_name(&candidate[1..close]).map(|p| (p, close)));

        if let Some((placeholder, close)) = known {
            out.push_str(values.value(placeholder));
            rest = &candidate[close + 1..];
        } else {
            out.push('{');
            rest = &candidate[1..];
        }
    }

    out.push_str(rest);
    out
}

/// Inserts a placeholder token over the selected byte range of `text`.
///
/// The selection is clamped to the text and snapped back to character
/// boundaries; an inverted range is treated as a cursor at its start.
/// Returns the new text and the cursor position just after the token.
#[must_use]
pub fn insert_placeholder(
    text: &str,
    placeholder: Placeholder,
    selection: Range<usize>,
) -> (String, usize) {
    let start = snap_to_boundary(text, selection.start);
    let end = snap_to_boundary(text, selection.end).max(start);
    let token = placeholder.token();

    let mut updated = String::with_capacity(text.len() + token.len());
    updated.push_str(&text[..start]);
    updated.push_str(token);
    updated.push_str(&text[end..]);

    (updated, start + token.len())
}

fn snap_to_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
