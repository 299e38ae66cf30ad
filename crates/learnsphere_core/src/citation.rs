//! Citation decoration for search-grounded responses.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A web source the backend used to ground a response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Citation {
    /// Page title, when the backend supplied one
    pub title: Option<String>,
    /// Source address; identity for deduplication
    pub uri: String,
}

impl Citation {
    /// Build a citation.
    pub fn new(title: Option<String>, uri: impl Into<String>) -> Self {
        Self {
            title,
            uri: uri.into(),
        }
    }

    /// Link label: the title, or the URI when the title is absent or blank.
    pub fn label(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => &self.uri,
        }
    }
}

/// Drop repeated URIs, keeping the first occurrence and its title.
///
/// Citations with an empty URI are discarded.
pub fn dedup_citations<'a, I>(citations: I) -> Vec<Citation>
where
    I: IntoIterator<Item = &'a Citation>,
{
    let mut seen = HashSet::new();
    citations
        .into_iter()
        .filter(|c| !c.uri.is_empty() && seen.insert(c.uri.as_str()))
        .cloned()
        .collect()
}

/// The trailing source list, or an empty string if there are no sources.
///
/// # Examples
///
/// ```
/// use learnsphere_core::{Citation, citation_section};
///
/// let citations = vec![
///     Citation::new(Some("Penicillin".to_string()), "https://a.example"),
///     Citation::new(None, "https://b.example"),
/// ];
/// assert_eq!(
///     citation_section(&citations),
///     "\n\n**Sources:**\n* [Penicillin](https://a.example)\n* [https://b.example](https://b.example)"
/// );
/// assert_eq!(citation_section(&[]), "");
/// ```
pub fn citation_section(citations: &[Citation]) -> String {
    let unique = dedup_citations(citations);
    if unique.is_empty() {
        return String::new();
    }

    let lines: Vec<String> = unique
        .iter()
        .map(|c| format!("* [{}]({})", c.label(), c.uri))
        .collect();
    format!("\n\n**Sources:**\n{}", lines.join("\n"))
}

/// Append the deduplicated source list to `text`.
///
/// Text without citations is returned unchanged.
pub fn decorate_with_citations(text: &str, citations: &[Citation]) -> String {
    let mut decorated = text.to_string();
    decorated.push_str(&citation_section(citations));
    decorated
}
