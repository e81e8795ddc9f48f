use xi_rope::Rope;

use super::span::Span;

/// A reference to a single line in the rope with its byte span.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// 0-indexed line number.
    pub index: usize,
    /// Byte span of this line in the rope (includes newline if present).
    pub span: Span,
    /// The line text, newline included when present.
    pub text: String,
}

impl LineRef {
    /// Line text with the trailing newline (and any `\r`) removed.
    pub fn content(&self) -> &str {
        self.text.trim_end_matches(['\r', '\n'])
    }
}

/// Returns an iterator over lines with their byte spans.
///
/// Uses `lines_raw` to preserve newline characters, which is what keeps
/// span arithmetic exact across the whole document. Unlike `lines_raw`, the
/// final empty line after a trailing newline IS yielded, so the iterator
/// always produces `newline_count + 1` items and line indices agree with
/// `Rope::line_of_offset`.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let len = rope.len();
    let ends_with_newline =
        len == 0 || rope.slice_to_cow(len - 1..len).as_bytes() == b"\n";
    let mut offset = 0usize;

    rope.lines_raw(..)
        .map(|line| line.into_owned())
        .chain(ends_with_newline.then(String::new))
        .enumerate()
        .map(move |(index, text)| {
            let start = offset;
            offset += text.len();
            LineRef {
                index,
                span: Span {
                    start,
                    end: offset,
                },
                text,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_cover_rope_exactly() {
        let rope = Rope::from("one\ntwo\nthree");
        let lines: Vec<_> = lines_with_spans(&rope).collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].span, Span { start: 0, end: 4 });
        assert_eq!(lines[1].span, Span { start: 4, end: 8 });
        assert_eq!(lines[2].span, Span { start: 8, end: 13 });
        assert_eq!(lines[2].index, 2);
    }

    #[test]
    fn trailing_newline_yields_final_empty_line() {
        let rope = Rope::from("a\nb\n");
        let lines: Vec<_> = lines_with_spans(&rope).collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].span, Span { start: 4, end: 4 });
        assert_eq!(lines[2].text, "");
    }

    #[test]
    fn empty_rope_is_one_empty_line() {
        let rope = Rope::from("");
        let lines: Vec<_> = lines_with_spans(&rope).collect();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].span, Span { start: 0, end: 0 });
    }

    #[test]
    fn content_strips_line_endings() {
        let rope = Rope::from("a\r\nb\n");
        let lines: Vec<_> = lines_with_spans(&rope).collect();
        assert_eq!(lines[0].content(), "a");
        assert_eq!(lines[1].content(), "b");
        assert_eq!(lines[2].content(), "");
    }
}
