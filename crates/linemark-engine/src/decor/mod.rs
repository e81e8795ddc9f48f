//! # Decoration computation
//!
//! Turns line classification plus the caret position into the visible
//! decoration set: marker characters fold to zero width on lines the caret
//! is not touching and render plain on caret lines, so the user edits raw
//! markdown but reads formatted text.
//!
//! Only lines intersecting the viewport are scanned; cost scales with the
//! viewport, not the document. The per-line fence state consulted here is
//! maintained incrementally by [`Document`], so no full-document pass
//! happens on the decoration path.

pub mod inline;

pub use inline::{InlineKind, InlineSpan, scan_inline};

use std::collections::HashSet;
use std::ops::Range;

use crate::editing::Document;
use crate::parsing::marks::{BlockQuote, Bullet, Checkbox, Heading, Ordered, Rule};
use crate::parsing::{LineClassifier, LineTag};

/// What a decoration paints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorationKind {
    /// Heading hashes plus their trailing space.
    HeadingMarker,
    /// Bullet or ordered-list marker, trailing space included.
    ListMarker,
    /// The full `>` prefix run of a blockquote line.
    QuoteMarker,
    /// Interactive replacement for a `[ ]`/`[x]` token. Activation issues
    /// a single-character edit at `toggle_at` (space <-> `x`), nothing
    /// else.
    CheckboxWidget { checked: bool, toggle_at: usize },
    /// The marker run of a horizontal rule, drawn as a line.
    RuleMarker,
    /// Inline `**bold**` content or delimiters.
    Bold,
    /// Inline `__underline__` content or delimiters.
    Underline,
    /// Inline backtick code content or delimiters.
    InlineCode,
    /// Whole-line wrapper for fence delimiter and interior lines.
    CodeBlock,
}

/// A visual annotation over a byte range; never alters document content.
///
/// `hidden` ranges are present in the model but render with zero visual
/// width. Ranges of the same kind never overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub range: Range<usize>,
    pub kind: DecorationKind,
    pub hidden: bool,
}

/// Computes the decoration set for the lines intersecting the viewport.
///
/// `caret_lines` holds the 0-indexed lines the caret or selection touches;
/// markers on those lines are emitted un-hidden so the raw markdown is
/// editable in place. Lines inside fenced code blocks get only the
/// [`DecorationKind::CodeBlock`] wrapper.
pub fn decorate(
    doc: &Document,
    viewport_lines: Range<usize>,
    caret_lines: &HashSet<usize>,
) -> Vec<Decoration> {
    let mut out = Vec::new();
    let end = viewport_lines.end.min(doc.line_count());
    let start = viewport_lines.start.min(end);

    for line in start..end {
        let content = doc.line_text(line);
        let tag = LineClassifier::classify_line(&content, doc.fences().in_fence_before(line));
        let line_start = doc.offset_of_line(line);
        let on_caret = caret_lines.contains(&line);

        if tag.in_code() {
            out.push(Decoration {
                range: doc.line_range(line),
                kind: DecorationKind::CodeBlock,
                hidden: false,
            });
            continue;
        }

        push_marker_decorations(&mut out, &tag, &content, line_start, on_caret);
        push_inline_decorations(&mut out, &content, line_start, on_caret);
    }

    out
}

fn push_marker_decorations(
    out: &mut Vec<Decoration>,
    tag: &LineTag,
    content: &str,
    line_start: usize,
    on_caret: bool,
) {
    let hidden = !on_caret;
    match tag {
        LineTag::Heading { .. } => {
            if let Some(sig) = Heading::sig(content) {
                out.push(Decoration {
                    range: line_start..line_start + sig.marker_len,
                    kind: DecorationKind::HeadingMarker,
                    hidden,
                });
            }
        }
        LineTag::BulletItem { .. } => {
            if let Some(sig) = Bullet::sig(content) {
                out.push(Decoration {
                    range: line_start + sig.marker.start..line_start + sig.marker.end,
                    kind: DecorationKind::ListMarker,
                    hidden,
                });
            }
        }
        LineTag::OrderedItem { .. } => {
            if let Some(sig) = Ordered::sig(content) {
                out.push(Decoration {
                    range: line_start + sig.marker.start..line_start + sig.marker.end,
                    kind: DecorationKind::ListMarker,
                    hidden,
                });
            }
        }
        LineTag::CheckboxItem { .. } => {
            if let Some(sig) = Checkbox::sig(content) {
                out.push(Decoration {
                    range: line_start + sig.marker.start..line_start + sig.marker.end,
                    kind: DecorationKind::ListMarker,
                    hidden,
                });
                if !on_caret {
                    out.push(Decoration {
                        range: line_start + sig.bracket.start..line_start + sig.bracket.end,
                        kind: DecorationKind::CheckboxWidget {
                            checked: sig.checked,
                            toggle_at: line_start + sig.inner(),
                        },
                        hidden: false,
                    });
                }
            }
        }
        LineTag::Blockquote { .. } => {
            if let Some(prefix) = BlockQuote::prefix_range(content) {
                out.push(Decoration {
                    range: line_start + prefix.start..line_start + prefix.end,
                    kind: DecorationKind::QuoteMarker,
                    hidden,
                });
            }
        }
        LineTag::HorizontalRule => {
            if let Some(marker) = Rule::marker_range(content) {
                out.push(Decoration {
                    range: line_start + marker.start..line_start + marker.end,
                    kind: DecorationKind::RuleMarker,
                    hidden,
                });
            }
        }
        LineTag::Plain | LineTag::FenceDelimiter | LineTag::FenceInterior => {}
    }
}

fn push_inline_decorations(
    out: &mut Vec<Decoration>,
    content: &str,
    line_start: usize,
    on_caret: bool,
) {
    for span in scan_inline(content) {
        let kind = match span.kind {
            InlineKind::Bold => DecorationKind::Bold,
            InlineKind::Underline => DecorationKind::Underline,
            InlineKind::Code => DecorationKind::InlineCode,
        };
        let d = span.delim_len();

        // Opening delimiter, styled content, closing delimiter. Delimiters
        // fold away off the caret line; content styling always shows.
        out.push(Decoration {
            range: line_start + span.full.start..line_start + span.full.start + d,
            kind: kind.clone(),
            hidden: !on_caret,
        });
        out.push(Decoration {
            range: line_start + span.inner.start..line_start + span.inner.end,
            kind: kind.clone(),
            hidden: false,
        });
        out.push(Decoration {
            range: line_start + span.full.end - d..line_start + span.full.end,
            kind,
            hidden: !on_caret,
        });
    }
}
