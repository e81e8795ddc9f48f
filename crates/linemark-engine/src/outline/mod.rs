//! # Sections and folding
//!
//! Derives foldable ranges from heading lines. A section spans from its
//! heading to the next heading of equal-or-higher rank, or end of document.
//! The full-document heading scan cannot be made viewport-local (a section
//! may end far outside the viewport), so instead of bounding the scan this
//! module memoizes it per document and refuses to compute it at all above a
//! configured line count: no folding on huge documents, bounded worst-case
//! cost everywhere.

pub mod persist;

pub use persist::{FoldStore, PersistError};

use std::ops::Range;

use crate::editing::{Document, DocumentId};
use crate::parsing::LineTag;

/// A foldable document section rooted at a heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// 0-indexed line of the heading.
    pub heading_line: usize,
    /// Heading rank, 1..=6.
    pub level: u8,
    /// Byte range from the heading line start to just before the next
    /// heading of level <= this one (its preceding newline), or document
    /// end. Sections are properly nested or disjoint, never partially
    /// overlapping.
    pub range: Range<usize>,
}

/// Scans the whole document and derives every section.
///
/// Headings inside fenced code blocks do not count; classification is
/// fence-aware.
pub fn sections(doc: &Document) -> Vec<Section> {
    let tags = doc.classify();

    let mut out: Vec<Section> = Vec::new();
    let mut open: Vec<(usize, u8, usize)> = Vec::new(); // (heading_line, level, start)

    for (line, tag) in tags.iter().enumerate() {
        let LineTag::Heading { level } = tag else {
            continue;
        };
        let start = doc.offset_of_line(line);
        // A new heading closes every open section of equal or deeper rank
        // at the byte before this heading line.
        let close_at = start.saturating_sub(1);
        while let Some(&(h, l, s)) = open.last() {
            if l < *level {
                break;
            }
            open.pop();
            out.push(Section {
                heading_line: h,
                level: l,
                range: s..close_at,
            });
        }
        open.push((line, *level, start));
    }

    let eof = doc.len();
    while let Some((h, l, s)) = open.pop() {
        out.push(Section {
            heading_line: h,
            level: l,
            range: s..eof,
        });
    }

    out.sort_by_key(|s| s.heading_line);
    out
}

/// Default line-count cutoff above which folding is disabled.
pub const DEFAULT_SCAN_LIMIT: usize = 10_000;

#[derive(Debug, Clone)]
struct CacheEntry {
    id: DocumentId,
    version: u64,
    sections: Vec<Section>,
}

/// Memoized section lookup with a cost-bound guard.
///
/// The single retained entry is keyed by document identity plus version:
/// replacing the document object invalidates it implicitly, any edit bumps
/// the version and invalidates it too. The cache never outlives its
/// document and never needs explicit teardown. Documents whose line count
/// exceeds the scan limit are never computed; every query answers `None`.
#[derive(Debug, Clone)]
pub struct FoldCache {
    scan_limit: usize,
    entry: Option<CacheEntry>,
}

impl FoldCache {
    pub fn new(scan_limit: usize) -> Self {
        Self {
            scan_limit,
            entry: None,
        }
    }

    /// The memoized section list, or `None` above the scan limit.
    pub fn sections(&mut self, doc: &Document) -> Option<&[Section]> {
        if doc.line_count() > self.scan_limit {
            self.entry = None;
            return None;
        }

        let stale = !matches!(
            &self.entry,
            Some(e) if e.id == doc.id() && e.version == doc.version()
        );
        if stale {
            self.entry = Some(CacheEntry {
                id: doc.id(),
                version: doc.version(),
                sections: sections(doc),
            });
        }

        self.entry.as_ref().map(|e| e.sections.as_slice())
    }

    /// The foldable range of the section whose heading sits on the line
    /// containing `offset`, if any.
    ///
    /// The returned range runs from the end of the heading line to the
    /// section end, so the heading itself stays visible when folded. A
    /// heading immediately followed by another heading, or by end of
    /// document, is not foldable.
    pub fn section_starting_at(&mut self, doc: &Document, offset: usize) -> Option<Range<usize>> {
        let line = doc.line_of_offset(offset);
        let heading_end = doc.line_range(line).end;

        let sections = self.sections(doc)?;
        sections
            .iter()
            .find(|s| s.heading_line == line)
            .and_then(|s| (s.range.end > heading_end).then(|| heading_end..s.range.end))
    }
}

impl Default for FoldCache {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_LIMIT)
    }
}
