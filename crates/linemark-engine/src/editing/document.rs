use uuid::Uuid;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::{Cmd, Patch};
use crate::parsing::{FenceMap, LineClassifier, LineTag, line_count};

/// Identity of a document instance.
///
/// Assigned once at construction and never changed by edits, so it can key
/// caches that must die with the document: when the host replaces the
/// document object the id changes and stale entries stop matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Indentation style detected in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndentStyle {
    /// Number of spaces per indent level.
    Spaces(usize),
    /// Tab characters.
    Tabs,
}

impl IndentStyle {
    /// Convert a leading-whitespace run to a depth level.
    ///
    /// Indent width is not required to be a multiple of the unit: any
    /// deeper run counts as one level deeper.
    pub fn calculate_depth(&self, indent_str: &str) -> usize {
        match self {
            IndentStyle::Tabs => indent_str.chars().take_while(|&c| c == '\t').count(),
            IndentStyle::Spaces(spaces_per_level) => {
                let space_count = indent_str.chars().take_while(|&c| c == ' ').count();
                if space_count == 0 {
                    0
                } else {
                    space_count / spaces_per_level
                }
            }
        }
    }
}

/// The document this engine decorates and edits.
///
/// The entire text lives in one `xi_rope::Rope` buffer: lossless storage,
/// exact byte round-trip, O(log n) edits, invertible `Delta`s. All edits
/// flow through [`Cmd`] compilation and produce a [`Patch`]; the per-line
/// fence state is recomputed from the first changed line on every edit,
/// with results identical to a full recompute.
///
/// In production the buffer is backed by a CRDT text type; nothing here
/// needs CRDT-specific APIs. The engine only requires linear text plus line
/// addressing, and issues its edits through the same channel as manual
/// typing so they replicate like any other edit.
pub struct Document {
    /// Rope buffer containing the entire document as UTF-8 bytes.
    pub(crate) buffer: Rope,
    /// Current selection/cursor position as byte offsets in the buffer.
    pub(crate) selection: std::ops::Range<usize>,
    /// Version counter incremented on each edit (enables change detection).
    pub(crate) version: u64,
    /// Identity for cache keying; stable across edits.
    id: DocumentId,
    /// Per-line fence state, maintained incrementally across edits.
    fences: FenceMap,
    /// Document's indentation style (spaces vs tabs, detected on load).
    pub(crate) indent_style: IndentStyle,
}

impl Document {
    /// Create a new document from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        let buffer = Rope::from(text);
        let len = buffer.len();

        let indent_style = detect_indent_style(&buffer);
        let fences = FenceMap::compute(&buffer);

        Ok(Self {
            buffer,
            selection: len..len,
            version: 0,
            id: DocumentId::new(),
            fences,
            indent_style,
        })
    }

    /// Get the document's content as raw bytes (exact round-trip).
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    /// Apply a command to the document.
    ///
    /// The pipeline: compile the command to a delta, apply it to the
    /// buffer, recompute fence state from the first changed line, transform
    /// the selection, bump the version.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let delta = crate::editing::commands::compile_command(self, &cmd);

        // Track changed ranges (post-edit coordinates) and the first point
        // touched, walking Copy gaps (deletions) and Inserts.
        let mut changed = Vec::new();
        let mut first_touched: Option<usize> = None;
        let mut old_pos = 0usize;
        let mut new_pos = 0usize;
        for op in delta.els.iter() {
            match op {
                xi_rope::delta::DeltaElement::Copy(from, to) => {
                    if *from > old_pos {
                        // Gap before this copy: a deletion at new_pos.
                        first_touched.get_or_insert(new_pos);
                    }
                    new_pos += *to - *from;
                    old_pos = *to;
                }
                xi_rope::delta::DeltaElement::Insert(inserted) => {
                    let start = new_pos;
                    let end = new_pos + inserted.len();
                    changed.push(start..end);
                    first_touched.get_or_insert(start);
                    new_pos = end;
                }
            }
        }
        if old_pos < delta.base_len {
            // Trailing deletion.
            first_touched.get_or_insert(new_pos);
        }

        self.buffer = delta.apply(&self.buffer);

        if let Some(at) = first_touched {
            let line = self.buffer.line_of_offset(at.min(self.buffer.len()));
            self.fences.update(&self.buffer, line);
        }

        let new_selection =
            crate::editing::commands::transform_selection_for_command(self, &self.selection, &cmd);
        self.selection = new_selection.clone();

        self.version += 1;

        Patch {
            changed,
            new_selection,
            version: self.version,
        }
    }

    /// Get the current selection range.
    pub fn selection(&self) -> std::ops::Range<usize> {
        self.selection.clone()
    }

    /// Set the selection range.
    pub fn set_selection(&mut self, selection: std::ops::Range<usize>) {
        self.selection = selection;
    }

    /// The document's cache-keying identity.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Get the current version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get the current text content.
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Get the buffer length in bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// The detected indentation style.
    pub fn indent_style(&self) -> &IndentStyle {
        &self.indent_style
    }

    /// Per-line fence state.
    pub fn fences(&self) -> &FenceMap {
        &self.fences
    }

    /// Slice the buffer to a cow string, clamped to document bounds.
    pub fn slice_to_cow(&self, range: std::ops::Range<usize>) -> std::borrow::Cow<'_, str> {
        let doc_len = self.buffer.len();
        let start = range.start.min(doc_len);
        let end = range.end.min(doc_len).max(start);
        self.buffer.slice_to_cow(start..end)
    }

    // ---- Line addressing (0-indexed) ----

    /// Number of lines, counting the empty line after a trailing newline.
    pub fn line_count(&self) -> usize {
        line_count(&self.buffer)
    }

    /// 0-indexed line containing the byte offset.
    pub fn line_of_offset(&self, offset: usize) -> usize {
        self.buffer.line_of_offset(offset.min(self.buffer.len()))
    }

    /// Byte offset of the start of the line.
    pub fn offset_of_line(&self, line: usize) -> usize {
        self.buffer.offset_of_line(line.min(self.line_count().saturating_sub(1)))
    }

    /// Byte range of the line's content, excluding the trailing newline.
    pub fn line_range(&self, line: usize) -> std::ops::Range<usize> {
        let start = self.offset_of_line(line);
        let end = if line + 1 < self.line_count() {
            self.offset_of_line(line + 1) - 1
        } else {
            self.buffer.len()
        };
        start..end.max(start)
    }

    /// The line's text without its trailing newline (or `\r`).
    pub fn line_text(&self, line: usize) -> String {
        let raw = self.slice_to_cow(self.line_range(line));
        raw.trim_end_matches('\r').to_string()
    }

    // ---- Classification ----

    /// Classify every line in a single forward pass.
    pub fn classify(&self) -> Vec<LineTag> {
        crate::parsing::classify_rope(&self.buffer)
    }

    /// Classify only the given lines, carrying fence state from the
    /// maintained [`FenceMap`] so cost scales with the range, not the
    /// document.
    pub fn classify_range(&self, lines: std::ops::Range<usize>) -> Vec<LineTag> {
        let end = lines.end.min(self.line_count());
        let start = lines.start.min(end);
        (start..end)
            .map(|line| {
                LineClassifier::classify_line(&self.line_text(line), self.fences.in_fence_before(line))
            })
            .collect()
    }
}

/// Detect the indent style (tabs vs spaces and size) by finding the first
/// non-zero indentation.
fn detect_indent_style(buffer: &Rope) -> IndentStyle {
    let text = buffer.to_string();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with('\t') {
            return IndentStyle::Tabs;
        }
        if line.starts_with(' ') {
            let spaces = line.chars().take_while(|&c| c == ' ').count();
            if spaces > 0 {
                return IndentStyle::Spaces(spaces);
            }
        }
    }

    IndentStyle::Spaces(2)
}

impl Clone for Document {
    fn clone(&self) -> Self {
        // A clone is a new document instance: it gets a fresh identity so
        // caches keyed on the original never serve the copy.
        Self {
            buffer: self.buffer.clone(),
            selection: self.selection.clone(),
            version: self.version,
            id: DocumentId::new(),
            fences: self.fences.clone(),
            indent_style: self.indent_style.clone(),
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.buffer.to_string() == other.buffer.to_string()
            && self.selection == other.selection
            && self.version == other.version
            && self.indent_style == other.indent_style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Cmd;
    use pretty_assertions::assert_eq;

    // ============ Basic document tests ============

    #[test]
    fn from_bytes_valid_utf8() {
        let text = "# Hello World\n\nThis is a test document.";
        let doc = Document::from_bytes(text.as_bytes()).unwrap();

        assert_eq!(doc.to_bytes(), text.as_bytes());
        assert_eq!(doc.version(), 0);
        assert_eq!(doc.selection(), text.len()..text.len());
    }

    #[test]
    fn from_bytes_invalid_utf8() {
        let invalid_bytes = vec![0xFF, 0xFE, 0xFD];
        assert!(Document::from_bytes(&invalid_bytes).is_err());
    }

    #[test]
    fn to_bytes_preserves_content() {
        let original = "# Doc\n\n- Bullet 1\n- Bullet 2\n\n```rust\nfn main() {}\n```";
        let doc = Document::from_bytes(original.as_bytes()).unwrap();
        assert_eq!(doc.to_bytes(), original.as_bytes());
    }

    #[test]
    fn unicode_round_trip() {
        let text = "Hello 世界! 🦀\n\n- [ ] Rust is great! 🎉";
        let doc = Document::from_bytes(text.as_bytes()).unwrap();
        assert_eq!(doc.to_bytes(), text.as_bytes());
    }

    // ============ Identity tests ============

    #[test]
    fn id_is_stable_across_edits() {
        let mut doc = Document::from_bytes(b"hello").unwrap();
        let id = doc.id();
        doc.apply(Cmd::InsertText {
            at: 0,
            text: "# ".to_string(),
        });
        assert_eq!(doc.id(), id);
    }

    #[test]
    fn clone_gets_fresh_id() {
        let doc = Document::from_bytes(b"hello").unwrap();
        let copy = doc.clone();
        assert_ne!(doc.id(), copy.id());
    }

    // ============ Line addressing tests ============

    #[test]
    fn line_addressing_basics() {
        let doc = Document::from_bytes(b"one\ntwo\nthree").unwrap();

        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.line_range(0), 0..3);
        assert_eq!(doc.line_range(1), 4..7);
        assert_eq!(doc.line_range(2), 8..13);
        assert_eq!(doc.line_text(1), "two");
        assert_eq!(doc.line_of_offset(5), 1);
        assert_eq!(doc.offset_of_line(2), 8);
    }

    #[test]
    fn trailing_newline_counts_as_a_line() {
        let doc = Document::from_bytes(b"one\n").unwrap();
        assert_eq!(doc.line_count(), 2);
        assert_eq!(doc.line_range(1), 4..4);
        assert_eq!(doc.line_text(1), "");
    }

    #[test]
    fn empty_document_is_one_line() {
        let doc = Document::from_bytes(b"").unwrap();
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.line_range(0), 0..0);
    }

    // ============ Fence maintenance tests ============

    #[test]
    fn fence_state_tracks_edits() {
        let mut doc = Document::from_bytes(b"a\n```\ncode\n```\nb").unwrap();
        assert!(doc.fences().is_interior(2));
        assert!(!doc.fences().in_code(4));

        // Delete the closing delimiter; the fence now runs to EOF.
        doc.apply(Cmd::DeleteRange { range: 11..15 });
        assert_eq!(doc.text(), "a\n```\ncode\nb");
        assert!(doc.fences().is_interior(3));

        // Full recompute agrees.
        assert_eq!(
            *doc.fences(),
            crate::parsing::FenceMap::compute(&xi_rope::Rope::from(doc.text()))
        );
    }

    #[test]
    fn classify_range_uses_carried_fence_state() {
        let doc = Document::from_bytes(b"```\n# inside\n```\n# outside").unwrap();

        let tags = doc.classify_range(1..4);
        assert_eq!(
            tags,
            vec![
                LineTag::FenceInterior,
                LineTag::FenceDelimiter,
                LineTag::Heading { level: 1 },
            ]
        );
    }

    #[test]
    fn classify_range_clamps_to_document() {
        let doc = Document::from_bytes(b"a\nb").unwrap();
        assert_eq!(doc.classify_range(1..100).len(), 1);
    }

    #[test]
    fn classify_matches_classify_range_everywhere() {
        let text = "# h\n```\nx\n# no\n```\n- [ ] t\n> q\n---\nplain";
        let doc = Document::from_bytes(text.as_bytes()).unwrap();
        assert_eq!(doc.classify(), doc.classify_range(0..doc.line_count()));
    }

    // ============ IndentStyle tests ============

    #[test]
    fn indent_style_calculate_depth_spaces() {
        let style = IndentStyle::Spaces(2);
        assert_eq!(style.calculate_depth(""), 0);
        assert_eq!(style.calculate_depth("  "), 1);
        assert_eq!(style.calculate_depth("    "), 2);

        let style4 = IndentStyle::Spaces(4);
        assert_eq!(style4.calculate_depth("    "), 1);
        assert_eq!(style4.calculate_depth("        "), 2);
    }

    #[test]
    fn indent_style_calculate_depth_tabs() {
        let style = IndentStyle::Tabs;
        assert_eq!(style.calculate_depth("\t"), 1);
        assert_eq!(style.calculate_depth("\t\t\t"), 3);
    }

    #[test]
    fn detect_indent_style_first_wins() {
        let doc =
            Document::from_bytes(b"- item\n  - two spaces\n    - four spaces").unwrap();
        assert_eq!(doc.indent_style, IndentStyle::Spaces(2));

        let tab_doc = Document::from_bytes(b"- item\n\t- tab").unwrap();
        assert_eq!(tab_doc.indent_style, IndentStyle::Tabs);
    }

    #[test]
    fn detect_indent_style_defaults_to_two_spaces() {
        let doc = Document::from_bytes(b"- flat\n- list").unwrap();
        assert_eq!(doc.indent_style, IndentStyle::Spaces(2));
    }
}
