use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// Bullet list marker with owned syntax knowledge.
pub struct Bullet;

/// Match details for a bullet line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletSig {
    /// Byte width of the leading-whitespace run.
    pub indent: usize,
    /// Byte range of the marker including its trailing space (`"- "`).
    pub marker: Range<usize>,
}

/// Ordered list marker with owned syntax knowledge.
pub struct Ordered;

/// Match details for an ordered-item line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedSig {
    /// Byte width of the leading-whitespace run.
    pub indent: usize,
    /// The numeral text exactly as written (`"1"`, `"007"`).
    pub number: String,
    /// Byte range of the marker including dot and trailing space (`"12. "`).
    pub marker: Range<usize>,
}

/// Checkbox list marker with owned syntax knowledge.
///
/// A checkbox line is a bullet line whose content starts with a bracket
/// token, so checkbox matching must run before bullet matching.
pub struct Checkbox;

/// Match details for a checkbox line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxSig {
    /// Byte width of the leading-whitespace run.
    pub indent: usize,
    /// Byte range of the bullet marker including its trailing space.
    pub marker: Range<usize>,
    /// Byte range of the bracket token (`"[ ]"` / `"[x]"`).
    pub bracket: Range<usize>,
    /// Whether the box is checked.
    pub checked: bool,
}

impl CheckboxSig {
    /// Byte offset of the state character between the brackets.
    ///
    /// This is the position a widget activation rewrites (space <-> `x`).
    pub fn inner(&self) -> usize {
        self.bracket.start + 1
    }
}

static BULLET_REGEX: OnceLock<Regex> = OnceLock::new();
static ORDERED_REGEX: OnceLock<Regex> = OnceLock::new();
static CHECKBOX_REGEX: OnceLock<Regex> = OnceLock::new();

fn bullet_regex() -> &'static Regex {
    BULLET_REGEX.get_or_init(|| Regex::new(r"^(\s*)([-*+]) ").expect("Invalid bullet regex"))
}

fn ordered_regex() -> &'static Regex {
    ORDERED_REGEX.get_or_init(|| Regex::new(r"^(\s*)(\d+)\. ").expect("Invalid ordered regex"))
}

fn checkbox_regex() -> &'static Regex {
    CHECKBOX_REGEX.get_or_init(|| {
        Regex::new(r"^(\s*)([-*+]) \[([ xX])\]( |$)").expect("Invalid checkbox regex")
    })
}

impl Bullet {
    /// The marker the toggle engine writes. `*` and `+` are read but never
    /// emitted.
    pub const MARKER: &'static str = "- ";

    pub fn sig(content: &str) -> Option<BulletSig> {
        bullet_regex().captures(content).map(|c| {
            let indent = c.get(1).map_or(0, |m| m.len());
            BulletSig {
                indent,
                marker: indent..indent + 2,
            }
        })
    }
}

impl Ordered {
    pub fn sig(content: &str) -> Option<OrderedSig> {
        ordered_regex().captures(content).map(|c| {
            let indent = c.get(1).map_or(0, |m| m.len());
            let number = c.get(2).map_or("", |m| m.as_str()).to_string();
            let marker_end = indent + number.len() + 2;
            OrderedSig {
                indent,
                number,
                marker: indent..marker_end,
            }
        })
    }
}

impl Checkbox {
    /// The full prefix the toggle engine writes onto an unmarked line.
    pub const UNCHECKED_PREFIX: &'static str = "- [ ] ";
    /// The token inserted after an existing bare bullet marker.
    pub const UNCHECKED_TOKEN: &'static str = "[ ] ";

    pub fn sig(content: &str) -> Option<CheckboxSig> {
        checkbox_regex().captures(content).map(|c| {
            let indent = c.get(1).map_or(0, |m| m.len());
            let state = c.get(3).map_or(" ", |m| m.as_str());
            let bracket_start = indent + 2;
            CheckboxSig {
                indent,
                marker: indent..indent + 2,
                bracket: bracket_start..bracket_start + 3,
                checked: state.eq_ignore_ascii_case("x"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("- item", 0)]
    #[case("* item", 0)]
    #[case("+ item", 0)]
    #[case("  - nested", 2)]
    #[case("\t- tabbed", 1)]
    fn bullet_markers(#[case] line: &str, #[case] indent: usize) {
        let sig = Bullet::sig(line).unwrap();
        assert_eq!(sig.indent, indent);
        assert_eq!(sig.marker, indent..indent + 2);
    }

    #[test]
    fn bullet_requires_trailing_space() {
        assert_eq!(Bullet::sig("-item"), None);
        assert_eq!(Bullet::sig("--- "), None);
    }

    #[test]
    fn ordered_marker_span_includes_dot_and_space() {
        let sig = Ordered::sig("12. twelve").unwrap();
        assert_eq!(sig.number, "12");
        assert_eq!(sig.marker, 0..4);
    }

    #[test]
    fn ordered_requires_dot_and_space() {
        assert_eq!(Ordered::sig("1) paren"), None);
        assert_eq!(Ordered::sig("1.dot"), None);
    }

    #[rstest]
    #[case("- [ ] todo", false)]
    #[case("- [x] done", true)]
    #[case("- [X] done", true)]
    fn checkbox_states(#[case] line: &str, #[case] checked: bool) {
        let sig = Checkbox::sig(line).unwrap();
        assert_eq!(sig.checked, checked);
        assert_eq!(sig.bracket, 2..5);
        assert_eq!(sig.inner(), 3);
    }

    #[test]
    fn checkbox_allows_empty_rest_of_line() {
        let sig = Checkbox::sig("- [ ]").unwrap();
        assert!(!sig.checked);
    }

    #[test]
    fn checkbox_respects_indent() {
        let sig = Checkbox::sig("    - [x] deep").unwrap();
        assert_eq!(sig.indent, 4);
        assert_eq!(sig.bracket, 6..9);
        assert_eq!(sig.inner(), 7);
    }

    #[test]
    fn bracket_without_bullet_is_not_a_checkbox() {
        assert_eq!(Checkbox::sig("[ ] bare"), None);
    }
}
