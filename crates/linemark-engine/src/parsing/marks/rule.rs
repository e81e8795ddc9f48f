use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// Horizontal rule marker with owned syntax knowledge.
pub struct Rule;

static RULE_REGEX: OnceLock<Regex> = OnceLock::new();

fn rule_regex() -> &'static Regex {
    RULE_REGEX.get_or_init(|| {
        Regex::new(r"^\s*(-{3,}|\*{3,}|_{3,})\s*$").expect("Invalid rule regex")
    })
}

impl Rule {
    /// Whether the line is a horizontal rule (`---`, `***` or `___`).
    pub fn is_rule(content: &str) -> bool {
        rule_regex().is_match(content)
    }

    /// The byte range of the marker run itself, whitespace excluded.
    pub fn marker_range(content: &str) -> Option<Range<usize>> {
        rule_regex()
            .captures(content)
            .and_then(|c| c.get(1))
            .map(|m| m.start()..m.end())
    }
}
