use xi_rope::{LinesMetric, Rope};

use super::marks::Fence;

/// Per-line fence state for the whole document.
///
/// Answers "is this line inside a fenced code block" without re-scanning the
/// document on every query. Two facts are stored per line:
///
/// - `entering`: whether a fence is open *before* this line is examined
/// - `delimiter`: whether this line is itself a fence delimiter
///
/// A delimiter line toggles the open state for the lines after it. Interior
/// lines are those entered with an open fence that are not delimiters. A
/// document with zero delimiters is outside everywhere; an unterminated
/// opener leaves every following line interior until document end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceMap {
    entering: Vec<bool>,
    delimiter: Vec<bool>,
}

impl FenceMap {
    /// Computes fence state for every line in a single forward pass.
    pub fn compute(rope: &Rope) -> Self {
        let mut map = Self {
            entering: Vec::new(),
            delimiter: Vec::new(),
        };
        map.scan_from(rope, 0, false);
        map
    }

    /// Recomputes fence state from `first_changed_line` onward.
    ///
    /// Lines before the first change keep their stored state: a line's
    /// entering state depends only on the lines above it. The result is
    /// identical to a full `compute` of the edited document.
    pub fn update(&mut self, rope: &Rope, first_changed_line: usize) {
        let keep = first_changed_line.min(self.entering.len());
        let carry = match keep.checked_sub(1) {
            Some(last) => self.entering[last] ^ self.delimiter[last],
            None => false,
        };
        self.entering.truncate(keep);
        self.delimiter.truncate(keep);
        self.scan_from(rope, keep, carry);
    }

    fn scan_from(&mut self, rope: &Rope, first_line: usize, mut open: bool) {
        let total = line_count(rope);
        if first_line >= total {
            return;
        }
        let start = rope.offset_of_line(first_line);

        for line in rope.lines_raw(start..) {
            let content = line.trim_end_matches(['\r', '\n']);
            let is_delim = Fence::is_delimiter(content);
            self.entering.push(open);
            self.delimiter.push(is_delim);
            if is_delim {
                open = !open;
            }
        }
        // lines_raw skips the empty line after a trailing newline; pad so
        // indices agree with line_of_offset.
        while self.entering.len() < total {
            self.entering.push(open);
            self.delimiter.push(false);
        }
    }

    /// Number of lines tracked.
    pub fn len(&self) -> usize {
        self.entering.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entering.is_empty()
    }

    /// Whether a fence is open before this line is examined.
    ///
    /// This is the carry state a viewport-bounded classification starts
    /// from.
    pub fn in_fence_before(&self, line: usize) -> bool {
        self.entering.get(line).copied().unwrap_or(false)
    }

    /// Whether this line is a fence delimiter.
    pub fn is_delimiter(&self, line: usize) -> bool {
        self.delimiter.get(line).copied().unwrap_or(false)
    }

    /// Whether this line is inside a fenced block (delimiters excluded).
    pub fn is_interior(&self, line: usize) -> bool {
        self.in_fence_before(line) && !self.is_delimiter(line)
    }

    /// Whether this line renders as code (interior or delimiter).
    pub fn in_code(&self, line: usize) -> bool {
        self.in_fence_before(line) || self.is_delimiter(line)
    }
}

/// Total number of lines in the rope, counting the empty line after a
/// trailing newline.
pub fn line_count(rope: &Rope) -> usize {
    rope.measure::<LinesMetric>() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn states(map: &FenceMap) -> Vec<(bool, bool)> {
        (0..map.len())
            .map(|i| (map.is_delimiter(i), map.is_interior(i)))
            .collect()
    }

    #[test]
    fn no_delimiters_no_fence() {
        let map = FenceMap::compute(&Rope::from("a\nb\nc"));
        assert_eq!(map.len(), 3);
        assert!((0..3).all(|i| !map.in_code(i)));
    }

    #[test]
    fn balanced_fence() {
        let map = FenceMap::compute(&Rope::from("a\n```\ncode\n```\nb"));
        assert_eq!(
            states(&map),
            vec![
                (false, false), // a
                (true, false),  // opener
                (false, true),  // code
                (true, false),  // closer
                (false, false), // b
            ]
        );
    }

    #[test]
    fn unterminated_fence_extends_to_end() {
        let map = FenceMap::compute(&Rope::from("```\nx\ny"));
        assert!(map.is_delimiter(0));
        assert!(map.is_interior(1));
        assert!(map.is_interior(2));
    }

    #[test]
    fn closing_delimiter_is_not_interior() {
        let map = FenceMap::compute(&Rope::from("```\nx\n```"));
        assert!(map.is_delimiter(2));
        assert!(!map.is_interior(2));
        // but it still renders as code
        assert!(map.in_code(2));
    }

    #[test]
    fn trailing_newline_line_is_tracked() {
        let map = FenceMap::compute(&Rope::from("```\ncode\n"));
        assert_eq!(map.len(), 3);
        assert!(map.is_interior(2));
    }

    #[test]
    fn update_matches_full_recompute() {
        let before = Rope::from("a\n```\ncode\n```\nb");
        let mut map = FenceMap::compute(&before);

        // Delete the closing delimiter (line 3): fence now runs to EOF.
        let after = Rope::from("a\n```\ncode\nb");
        map.update(&after, 3);
        assert_eq!(map, FenceMap::compute(&after));
        assert!(map.is_interior(3));

        // Reinsert it.
        let restored = Rope::from("a\n```\ncode\n```\nb");
        map.update(&restored, 3);
        assert_eq!(map, FenceMap::compute(&restored));
    }

    #[test]
    fn update_from_line_zero_is_full_recompute() {
        let rope = Rope::from("```\nx\n```");
        let mut map = FenceMap::compute(&Rope::from("unrelated"));
        map.update(&rope, 0);
        assert_eq!(map, FenceMap::compute(&rope));
    }

    #[test]
    fn update_past_end_truncates_nothing_extra() {
        let rope = Rope::from("a\nb");
        let mut map = FenceMap::compute(&rope);
        map.update(&rope, 10);
        assert_eq!(map, FenceMap::compute(&rope));
    }
}
