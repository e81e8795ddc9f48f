use std::ops::Range;

use crate::editing::Document;
use crate::parsing::marks::{BlockQuote, Bullet, Checkbox, Ordered};

/// Which block-level marker a toggle command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleKind {
    Bullet,
    Ordered,
    Checkbox,
    Blockquote,
}

/// A single replace-or-insert covering whole lines.
///
/// The whole selection's transformation is computed first, then applied as
/// one edit; there is no partial-line-failure mode, and the host's history
/// sees exactly one undoable step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Byte range to replace, snapped to line boundaries.
    pub range: Range<usize>,
    /// Replacement text.
    pub text: String,
}

/// Computes the toggle edit for the lines touched by `selection`.
///
/// The selection is snapped to whole lines regardless of where its
/// endpoints fall mid-line; the line containing each endpoint counts, so a
/// caret-only selection toggles exactly its line.
///
/// Two policies coexist:
///
/// - **Uniform** (Bullet, Ordered, Blockquote): if every selected line
///   already matches the target pattern, the marker is stripped from every
///   line; otherwise it is added to every line unconditionally. Bullet and
///   blockquote adds prepend the marker verbatim even onto lines already
///   carrying one, so toggling `- Has bullet` yields `- - Has bullet`.
///   Ordered adds strip an existing numeral prefix first and number the
///   selection 1..N.
/// - **Per-line** (Checkbox): each line decides independently; existing
///   checkboxes flip state, bare bullets gain a bracket token, anything
///   else gains the full `- [ ] ` prefix.
pub fn toggle(doc: &Document, selection: Range<usize>, kind: ToggleKind) -> TextEdit {
    let len = doc.len();
    let start = selection.start.min(len);
    let end = selection.end.min(len).max(start);

    let first_line = doc.line_of_offset(start);
    let last_line = doc.line_of_offset(end);
    let range = doc.offset_of_line(first_line)..doc.line_range(last_line).end;

    let original = doc.slice_to_cow(range.clone()).into_owned();
    let lines: Vec<&str> = original.split('\n').collect();

    let rewritten: Vec<String> = match kind {
        ToggleKind::Bullet => uniform(&lines, bullet_strip, bullet_add),
        ToggleKind::Blockquote => uniform(&lines, quote_strip, quote_add),
        ToggleKind::Ordered => ordered_toggle(&lines),
        ToggleKind::Checkbox => lines.iter().map(|l| checkbox_line(l)).collect(),
    };

    TextEdit {
        range,
        text: rewritten.join("\n"),
    }
}

/// Uniform policy: strip everywhere if every line matches, else add
/// everywhere.
fn uniform(
    lines: &[&str],
    strip: impl Fn(&str) -> Option<String>,
    add: impl Fn(&str) -> String,
) -> Vec<String> {
    let stripped: Option<Vec<String>> = lines.iter().map(|l| strip(l)).collect();
    match stripped {
        Some(all) => all,
        None => lines.iter().map(|l| add(l)).collect(),
    }
}

fn bullet_strip(line: &str) -> Option<String> {
    Bullet::sig(line).map(|sig| remove_range(line, sig.marker))
}

fn bullet_add(line: &str) -> String {
    insert_at(line, leading_ws_end(line), Bullet::MARKER)
}

fn quote_strip(line: &str) -> Option<String> {
    BlockQuote::first_unit_range(line).map(|r| remove_range(line, r))
}

fn quote_add(line: &str) -> String {
    insert_at(line, leading_ws_end(line), BlockQuote::MARKER)
}

fn ordered_toggle(lines: &[&str]) -> Vec<String> {
    let sigs: Vec<_> = lines.iter().map(|l| Ordered::sig(l)).collect();
    if sigs.iter().all(Option::is_some) {
        return lines
            .iter()
            .zip(&sigs)
            .map(|(l, sig)| match sig {
                Some(sig) => remove_range(l, sig.marker.clone()),
                None => (*l).to_string(),
            })
            .collect();
    }

    // Renumber 1..N across the selection. Lines already carrying a numeral
    // lose it first so numbering never doubles; everything else keeps its
    // content and just gains the numeral in front.
    lines
        .iter()
        .enumerate()
        .map(|(i, l)| {
            let numeral = format!("{}. ", i + 1);
            match Ordered::sig(l) {
                Some(sig) => {
                    let bare = remove_range(l, sig.marker.clone());
                    insert_at(&bare, sig.indent, &numeral)
                }
                None => insert_at(l, leading_ws_end(l), &numeral),
            }
        })
        .collect()
}

/// Per-line checkbox policy: flip, upgrade a bare bullet, or prefix.
fn checkbox_line(line: &str) -> String {
    if let Some(sig) = Checkbox::sig(line) {
        let inner = sig.inner();
        let state = if sig.checked { " " } else { "x" };
        return format!("{}{}{}", &line[..inner], state, &line[inner + 1..]);
    }
    if let Some(sig) = Bullet::sig(line) {
        return insert_at(line, sig.marker.end, Checkbox::UNCHECKED_TOKEN);
    }
    insert_at(line, leading_ws_end(line), Checkbox::UNCHECKED_PREFIX)
}

/// Byte offset just past the leading space/tab run.
fn leading_ws_end(line: &str) -> usize {
    line.bytes()
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count()
}

fn insert_at(line: &str, at: usize, marker: &str) -> String {
    format!("{}{}{}", &line[..at], marker, &line[at..])
}

fn remove_range(line: &str, range: Range<usize>) -> String {
    format!("{}{}", &line[..range.start], &line[range.end..])
}
