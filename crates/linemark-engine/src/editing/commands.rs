use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::Document;
use crate::editing::toggle::{self, ToggleKind};

/// Commands that can be applied to the document.
///
/// Every mutation this engine performs compiles to a single delta, so the
/// host's history stack sees one undoable step per command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    InsertText {
        at: usize,
        text: String,
    },
    DeleteRange {
        range: std::ops::Range<usize>,
    },
    ReplaceRange {
        range: std::ops::Range<usize>,
        text: String,
    },
    /// Toggle a block-level marker over the lines touched by `range`.
    ToggleBlocks {
        range: std::ops::Range<usize>,
        kind: ToggleKind,
    },
    /// Flip the checkbox state character at the bracket's inner position.
    /// This is what a checkbox widget activation issues; it never rewrites
    /// surrounding text.
    ToggleCheckbox {
        at: usize,
    },
}

/// Compile a command into a delta.
pub(crate) fn compile_command(doc: &Document, cmd: &Cmd) -> Delta<RopeInfo> {
    match cmd {
        Cmd::InsertText { at, text } => {
            let mut builder = Builder::new(doc.len());
            builder.replace(*at..*at, Rope::from(text));
            builder.build()
        }
        Cmd::DeleteRange { range } => {
            let mut builder = Builder::new(doc.len());
            builder.delete(range.clone());
            builder.build()
        }
        Cmd::ReplaceRange { range, text } => {
            let mut builder = Builder::new(doc.len());
            builder.replace(range.clone(), Rope::from(text));
            builder.build()
        }
        Cmd::ToggleBlocks { range, kind } => {
            let edit = toggle::toggle(doc, range.clone(), *kind);
            let mut builder = Builder::new(doc.len());
            builder.replace(edit.range, Rope::from(edit.text));
            builder.build()
        }
        Cmd::ToggleCheckbox { at } => {
            let mut builder = Builder::new(doc.len());
            if *at < doc.len() {
                let current = doc.slice_to_cow(*at..*at + 1);
                let flipped = match current.as_ref() {
                    " " => Some("x"),
                    "x" | "X" => Some(" "),
                    _ => None,
                };
                if let Some(state) = flipped {
                    builder.replace(*at..*at + 1, Rope::from(state));
                }
            }
            builder.build()
        }
    }
}

/// Transform selection based on the command being applied.
pub(crate) fn transform_selection_for_command(
    doc: &Document,
    range: &std::ops::Range<usize>,
    cmd: &Cmd,
) -> std::ops::Range<usize> {
    match cmd {
        Cmd::InsertText { at, text } => {
            let text_len = text.len();
            if *at <= range.start {
                (range.start + text_len)..(range.end + text_len)
            } else if *at < range.end {
                // Insertion is within selection, grow the end.
                range.start..(range.end + text_len)
            } else {
                range.clone()
            }
        }
        Cmd::DeleteRange { range: del_range } => {
            let del_len = del_range.len();
            if del_range.end <= range.start {
                (range.start - del_len)..(range.end - del_len)
            } else if del_range.start >= range.end {
                range.clone()
            } else {
                // Deletion overlaps the selection, collapse to the point.
                del_range.start..del_range.start
            }
        }
        Cmd::ReplaceRange {
            range: replace_range,
            text,
        } => {
            let del_len = replace_range.len();
            let insert_len = text.len();

            if replace_range.end <= range.start {
                let net = insert_len as i64 - del_len as i64;
                let start = (range.start as i64 + net).max(0) as usize;
                let end = (range.end as i64 + net).max(0) as usize;
                start..end
            } else if replace_range.start >= range.end {
                range.clone()
            } else {
                range.clone()
            }
        }
        Cmd::ToggleBlocks { .. } | Cmd::ToggleCheckbox { .. } => {
            // Line-based rewrites keep the selection where it was, clamped
            // to the post-edit document.
            let len = doc.len();
            range.start.min(len)..range.end.min(len)
        }
    }
}
