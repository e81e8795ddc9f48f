//! Whole-document classification snapshots and the fold persistence flow a
//! page host runs on load.

use linemark_engine::{Document, FoldCache, FoldStore, LineTag};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn render_tags(doc: &Document) -> String {
    doc.classify()
        .iter()
        .map(|tag| match tag {
            LineTag::Plain => "plain".to_string(),
            LineTag::Heading { level } => format!("heading {level}"),
            LineTag::BulletItem { indent } => format!("bullet indent={indent}"),
            LineTag::OrderedItem { indent, number } => {
                format!("ordered {number} indent={indent}")
            }
            LineTag::CheckboxItem { indent, checked } => {
                let state = if *checked { "checked" } else { "unchecked" };
                format!("checkbox {state} indent={indent}")
            }
            LineTag::Blockquote { depth } => format!("quote depth={depth}"),
            LineTag::HorizontalRule => "rule".to_string(),
            LineTag::FenceDelimiter => "fence".to_string(),
            LineTag::FenceInterior => "code".to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn mixed_document_classification() {
    let text = "# Notes\n\
                - [ ] buy milk\n\
                - [x] call home\n\
                  - nested\n\
                1. first\n\
                > quoted\n\
                ---\n\
                ```rust\n\
                let x = 1;\n\
                ```\n\
                tail";
    let doc = Document::from_bytes(text.as_bytes()).unwrap();

    insta::assert_snapshot!(render_tags(&doc), @r"
    heading 1
    checkbox unchecked indent=0
    checkbox checked indent=0
    bullet indent=2
    ordered 1 indent=0
    quote depth=1
    rule
    fence
    code
    fence
    plain
    ");
}

#[test]
fn fold_persistence_round_trip_resolves_lines_again() {
    let text = "# A\nbody A\n# B\nbody B\n";
    let doc = Document::from_bytes(text.as_bytes()).unwrap();
    let mut cache = FoldCache::default();

    let dir = TempDir::new().unwrap();
    let store = FoldStore::new(dir.path(), FoldStore::DEFAULT_PREFIX);

    // The user folds the section under "# B" (0-indexed line 2).
    let folded = cache
        .section_starting_at(&doc, doc.offset_of_line(2))
        .unwrap();
    assert_eq!(folded, 14..22);

    // Fold state persists as 1-indexed line numbers.
    store.save("notes", &[3]).unwrap();

    // On page load, stored lines re-resolve through the fold engine; raw
    // offsets are never trusted across sessions.
    let restored: Vec<_> = store
        .load("notes")
        .into_iter()
        .filter_map(|line_1idx| {
            let offset = doc.offset_of_line(line_1idx - 1);
            cache.section_starting_at(&doc, offset)
        })
        .collect();
    assert_eq!(restored, vec![14..22]);
}

#[test]
fn stale_fold_lines_resolve_to_nothing_after_edits() {
    // The persisted line no longer names a foldable heading.
    let doc = Document::from_bytes(b"plain\ntext\nonly").unwrap();
    let mut cache = FoldCache::default();

    let dir = TempDir::new().unwrap();
    let store = FoldStore::new(dir.path(), FoldStore::DEFAULT_PREFIX);
    store.save("page", &[2]).unwrap();

    let restored: Vec<_> = store
        .load("page")
        .into_iter()
        .filter_map(|line_1idx| cache.section_starting_at(&doc, doc.offset_of_line(line_1idx - 1)))
        .collect();
    assert_eq!(restored, Vec::<std::ops::Range<usize>>::new());
}
