use std::ops::Range;

/// Inline emphasis kinds recognized within a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineKind {
    /// `**bold**`
    Bold,
    /// `__underline__`
    Underline,
    /// `` `code` ``
    Code,
}

/// A matched inline span, with byte offsets relative to the line content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    pub kind: InlineKind,
    /// Full span including delimiters.
    pub full: Range<usize>,
    /// Inner span between the delimiters.
    pub inner: Range<usize>,
}

impl InlineSpan {
    /// Byte length of one delimiter for this kind.
    pub fn delim_len(&self) -> usize {
        match self.kind {
            InlineKind::Code => 1,
            InlineKind::Bold | InlineKind::Underline => 2,
        }
    }
}

/// Scans a line for inline spans, left to right.
///
/// Code spans are checked first and act as raw zones: a `**` inside
/// backticks is literal text. All delimiters match non-greedily, and an
/// unterminated opener yields no span for that run; the text degrades to
/// plain, never to an error.
pub fn scan_inline(content: &str) -> Vec<InlineSpan> {
    let bytes = content.as_bytes();
    let mut out = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i] == b'`' {
            if let Some(span) = try_code(content, i) {
                i = span.full.end;
                out.push(span);
                continue;
            }
        }
        if content[i..].starts_with("**") {
            if let Some(span) = try_paired(content, i, "**", InlineKind::Bold) {
                i = span.full.end;
                out.push(span);
                continue;
            }
        }
        if content[i..].starts_with("__")
            && let Some(span) = try_underline(content, i)
        {
            i = span.full.end;
            out.push(span);
            continue;
        }
        i += 1;
    }

    out
}

/// A backtick code span starting at `i`. Raw zone: first closing backtick
/// wins, nothing inside is scanned further.
fn try_code(content: &str, i: usize) -> Option<InlineSpan> {
    let rest = &content[i + 1..];
    let close = rest.find('`')?;
    if close == 0 {
        // Empty pair of backticks is literal text.
        return None;
    }
    let inner = i + 1..i + 1 + close;
    Some(InlineSpan {
        kind: InlineKind::Code,
        full: i..inner.end + 1,
        inner,
    })
}

/// A symmetric two-byte delimiter pair (`**`) starting at `i`, first
/// closer wins, empty content rejected.
fn try_paired(content: &str, i: usize, delim: &str, kind: InlineKind) -> Option<InlineSpan> {
    let inner_start = i + delim.len();
    let rest = &content[inner_start..];
    let close = rest.find(delim)?;
    if close == 0 {
        return None;
    }
    let inner = inner_start..inner_start + close;
    Some(InlineSpan {
        kind,
        full: i..inner.end + delim.len(),
        inner,
    })
}

/// An `__underline__` span starting at `i`.
///
/// `__` counts as a delimiter only at word boundaries relative to
/// identifier characters, so `snake__case__names` stays plain: the opener
/// must not follow an identifier character, and the closer must not be
/// followed by one. Closer candidates that fail the boundary test are
/// skipped rather than ending the span.
fn try_underline(content: &str, i: usize) -> Option<InlineSpan> {
    if i > 0 && is_ident(content.as_bytes()[i - 1]) {
        return None;
    }

    let inner_start = i + 2;
    let mut search_from = inner_start;
    while let Some(rel) = content[search_from..].find("__") {
        let close = search_from + rel;
        if close == inner_start {
            // Empty content.
            return None;
        }
        let after = close + 2;
        if content.as_bytes().get(after).copied().is_some_and(is_ident) {
            // Mid-identifier closer, keep looking.
            search_from = close + 1;
            continue;
        }
        return Some(InlineSpan {
            kind: InlineKind::Underline,
            full: i..after,
            inner: inner_start..close,
        });
    }
    None
}

fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn one(content: &str) -> InlineSpan {
        let spans = scan_inline(content);
        assert_eq!(spans.len(), 1, "expected one span in {content:?}");
        spans.into_iter().next().unwrap()
    }

    #[test]
    fn bold_span() {
        let span = one("a **bold** b");
        assert_eq!(span.kind, InlineKind::Bold);
        assert_eq!(span.full, 2..10);
        assert_eq!(span.inner, 4..8);
    }

    #[test]
    fn code_span() {
        let span = one("say `hi` now");
        assert_eq!(span.kind, InlineKind::Code);
        assert_eq!(span.full, 4..8);
        assert_eq!(span.inner, 5..7);
    }

    #[test]
    fn underline_span() {
        let span = one("__under__");
        assert_eq!(span.kind, InlineKind::Underline);
        assert_eq!(span.full, 0..9);
        assert_eq!(span.inner, 2..7);
    }

    #[test]
    fn bold_is_non_greedy() {
        let spans = scan_inline("**a** mid **b**");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].full, 0..5);
        assert_eq!(spans[1].full, 10..15);
    }

    #[test]
    fn unterminated_markers_yield_nothing() {
        assert_eq!(scan_inline("**unclosed"), vec![]);
        assert_eq!(scan_inline("`unclosed"), vec![]);
        assert_eq!(scan_inline("__unclosed"), vec![]);
    }

    #[test]
    fn code_is_a_raw_zone() {
        let spans = scan_inline("`**not bold**`");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, InlineKind::Code);
    }

    #[test]
    fn code_backtick_does_not_leak_across_bold() {
        // The stray backtick is literal; bold after it still matches.
        let spans = scan_inline("` then **bold**");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, InlineKind::Bold);
    }

    #[test]
    fn underscores_inside_identifiers_stay_plain() {
        assert_eq!(scan_inline("snake__case__names"), vec![]);
        assert_eq!(scan_inline("a field__name_ here"), vec![]);
    }

    #[test]
    fn underline_skips_mid_identifier_closer() {
        // "__case" is not a boundary; the span never closes.
        assert_eq!(scan_inline("__snake__case"), vec![]);
    }

    #[test]
    fn underline_at_word_boundaries_matches() {
        let span = one("see __this__ now");
        assert_eq!(span.inner, 6..10);
    }

    #[test]
    fn empty_delimiter_pairs_are_literal() {
        assert_eq!(scan_inline("````"), vec![]);
        assert_eq!(scan_inline("____"), vec![]);
    }

    #[test]
    fn mixed_kinds_on_one_line() {
        let spans = scan_inline("**b** `c` __u__");
        let kinds: Vec<_> = spans.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![InlineKind::Bold, InlineKind::Code, InlineKind::Underline]
        );
    }
}
