use std::ops::Range;

/// Blockquote marker with owned syntax knowledge.
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: char = '>';
    /// The marker the toggle engine writes.
    pub const MARKER: &'static str = "> ";

    /// Strips blockquote prefixes from a line, returning (depth, byte_offset).
    ///
    /// Handles `> text`, `>> nested` and `> > spaced nested`.
    /// `depth` is 0 and `byte_offset` is 0 when the line is not a quote.
    pub fn strip_prefixes(s: &str) -> (u8, usize) {
        let b = s.as_bytes();
        let mut i = 0usize;
        let mut depth = 0u8;

        loop {
            while i < b.len() && b[i] == b' ' {
                i += 1;
            }
            if i < b.len() && b[i] == (Self::PREFIX as u8) {
                depth = depth.saturating_add(1);
                i += 1;
                if i < b.len() && b[i] == b' ' {
                    i += 1;
                }
            } else {
                break;
            }
        }
        if depth == 0 { (0, 0) } else { (depth, i) }
    }

    /// The byte range of the full `>` prefix run, starting after the
    /// leading-whitespace run. `None` when the line is not a quote.
    pub fn prefix_range(s: &str) -> Option<Range<usize>> {
        let (depth, end) = Self::strip_prefixes(s);
        if depth == 0 {
            return None;
        }
        let indent = s.len() - s.trim_start_matches(' ').len();
        Some(indent..end)
    }

    /// The byte range of the first quote unit only (`">"` plus one optional
    /// space), which is what a single uniform-strip removes.
    pub fn first_unit_range(s: &str) -> Option<Range<usize>> {
        let (depth, _) = Self::strip_prefixes(s);
        if depth == 0 {
            return None;
        }
        let indent = s.len() - s.trim_start_matches(' ').len();
        let mut end = indent + 1;
        if s.as_bytes().get(end) == Some(&b' ') {
            end += 1;
        }
        Some(indent..end)
    }
}
