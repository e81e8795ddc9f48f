use xi_rope::Rope;

use super::lines::lines_with_spans;
use super::marks::{BlockQuote, Bullet, Checkbox, Fence, Heading, Ordered, Rule};

/// Classification of a single line.
///
/// Exactly one tag per line. Classification is a total function of the line
/// text plus the fence state carried from the previous line: no line is ever
/// unclassifiable, unmatched lines are `Plain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineTag {
    /// No marker matched.
    Plain,
    /// ATX heading, level 1..=6.
    Heading { level: u8 },
    /// Bullet list item. `indent` is the byte width of the leading
    /// whitespace run, not a depth level (see `IndentStyle`).
    BulletItem { indent: usize },
    /// Ordered list item with the numeral text exactly as written.
    OrderedItem { indent: usize, number: String },
    /// Checkbox list item.
    CheckboxItem { indent: usize, checked: bool },
    /// Blockquote with its `>` nesting depth.
    Blockquote { depth: u8 },
    /// Horizontal rule (`---`, `***`, `___`).
    HorizontalRule,
    /// A fence delimiter line (opening or closing).
    FenceDelimiter,
    /// A line inside a fenced code block.
    FenceInterior,
}

impl LineTag {
    /// Whether this line belongs to a fenced code block (delimiters
    /// included). No other decoration applies to such lines.
    pub fn in_code(&self) -> bool {
        matches!(self, LineTag::FenceDelimiter | LineTag::FenceInterior)
    }
}

/// Classifies individual lines given the carried fence state.
pub struct LineClassifier;

impl LineClassifier {
    /// Classifies one line. `content` must not include the trailing newline.
    ///
    /// Priority outside fences: heading, checkbox, bullet, ordered,
    /// blockquote, rule, plain. Checkbox is tested before bullet because a
    /// checkbox line also matches the bullet pattern as a prefix.
    pub fn classify_line(content: &str, in_fence: bool) -> LineTag {
        if Fence::is_delimiter(content) {
            return LineTag::FenceDelimiter;
        }
        if in_fence {
            return LineTag::FenceInterior;
        }
        if let Some(sig) = Heading::sig(content) {
            return LineTag::Heading { level: sig.level };
        }
        if let Some(sig) = Checkbox::sig(content) {
            return LineTag::CheckboxItem {
                indent: sig.indent,
                checked: sig.checked,
            };
        }
        if let Some(sig) = Bullet::sig(content) {
            return LineTag::BulletItem { indent: sig.indent };
        }
        if let Some(sig) = Ordered::sig(content) {
            return LineTag::OrderedItem {
                indent: sig.indent,
                number: sig.number,
            };
        }
        let (depth, _) = BlockQuote::strip_prefixes(content);
        if depth > 0 {
            return LineTag::Blockquote { depth };
        }
        if Rule::is_rule(content) {
            return LineTag::HorizontalRule;
        }
        LineTag::Plain
    }
}

/// Classifies every line of the rope in a single forward pass.
///
/// The only state carried across lines is the fence flag: a delimiter
/// toggles it, and an unterminated opener leaves the remainder of the
/// document classified `FenceInterior`. That is intentional, not an error.
pub fn classify_rope(rope: &Rope) -> Vec<LineTag> {
    let mut tags = Vec::new();
    let mut in_fence = false;

    for lr in lines_with_spans(rope) {
        let tag = LineClassifier::classify_line(lr.content(), in_fence);
        if tag == LineTag::FenceDelimiter {
            in_fence = !in_fence;
        }
        tags.push(tag);
    }

    tags
}
