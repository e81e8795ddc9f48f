//! # linemark-engine
//!
//! The text-decoration and structural-editing engine behind a
//! markdown-capable rich text surface. It classifies every line of a
//! document into syntactic zones without building a parse tree, turns that
//! classification into non-overlapping decorations that hide markdown
//! punctuation away from the caret, derives foldable sections from
//! headings, and performs selection-scoped toggling of block-level markers.
//!
//! The engine is single-threaded and synchronous: classification,
//! decoration, and toggle computation all run to completion inside one
//! host-dispatched update and never block on I/O. Decoration cost is
//! bounded by the viewport; folding is bounded by a line-count guard plus
//! memoization instead.

pub mod decor;
pub mod editing;
pub mod outline;
pub mod parsing;

// Re-export key types for easier usage
pub use decor::{Decoration, DecorationKind, decorate};
pub use editing::{Cmd, Document, DocumentId, IndentStyle, Patch, TextEdit, ToggleKind, toggle};
pub use outline::{FoldCache, FoldStore, PersistError, Section, sections};
pub use parsing::{FenceMap, LineTag, classify_rope};
