//! Tag filter parsing for the notes list query.
//!
//! A filter is a comma-separated list of tokens. Tokens are trimmed of
//! surrounding whitespace and empty tokens are discarded. A note matches the
//! filter when *every* token appears as a substring of the note's
//! comma-joined tag list — deliberately loose matching rather than exact
//! set membership.

/// A parsed tag filter: the conjunctive token list of a notes list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    tokens: Vec<String>,
}

impl TagFilter {
    /// Parses a raw comma-separated filter string.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let tokens = raw
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();
        Self { tokens }
    }

    /// The empty filter: matches every note.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns `true` when the filter has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The parsed tokens, in input order.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether a comma-joined tag list satisfies every token (substring,
    /// AND-combined). The empty filter matches everything.
    #[must_use]
    pub fn matches(&self, joined_tags: &str) -> bool {
        self.tokens.iter().all(|t| joined_tags.contains(t.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_drops_empty_tokens() {
        let filter = TagFilter::parse(" work , ,urgent, ");
        assert_eq!(filter.tokens(), ["work", "urgent"]);
    }

    #[test]
    fn empty_string_parses_to_empty_filter() {
        assert!(TagFilter::parse("").is_empty());
        assert!(TagFilter::parse(" , ,").is_empty());
    }

    #[test]
    fn substring_match_is_accepted() {
        let joined = "work,urgent";
        assert!(TagFilter::parse("work").matches(joined));
        assert!(TagFilter::parse("wor").matches(joined));
        assert!(TagFilter::parse("urgent").matches(joined));
    }

    #[test]
    fn conjunction_requires_every_token() {
        let joined = "work,urgent";
        assert!(TagFilter::parse("work,urgent").matches(joined));
        assert!(!TagFilter::parse("work,personal").matches(joined));
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(TagFilter::none().matches(""));
        assert!(TagFilter::none().matches("anything"));
    }
}
