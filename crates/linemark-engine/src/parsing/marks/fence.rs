use regex::Regex;
use std::sync::OnceLock;

/// Fenced code block delimiter with owned syntax knowledge.
///
/// A delimiter is a run of three or more backticks, optionally followed by a
/// language tag, alone on its line. Tilde fences are outside the grammar.
pub struct Fence;

static FENCE_REGEX: OnceLock<Regex> = OnceLock::new();

fn fence_regex() -> &'static Regex {
    FENCE_REGEX
        .get_or_init(|| Regex::new(r"^\s*`{3,}\s*([^`\s]*)\s*$").expect("Invalid fence regex"))
}

impl Fence {
    /// The backtick delimiter unit.
    pub const TICKS: &'static str = "```";

    /// Returns the language tag if the line is a fence delimiter.
    ///
    /// `Some("")` means a bare delimiter (opener with no tag, or a closer).
    pub fn sig(content: &str) -> Option<&str> {
        fence_regex()
            .captures(content)
            .map(|c| c.get(1).map_or("", |m| m.as_str()))
    }

    /// Whether the line is a fence delimiter at all.
    pub fn is_delimiter(content: &str) -> bool {
        Self::sig(content).is_some()
    }
}
