//! # Line-oriented markdown parsing
//!
//! Classification is regex-per-line, never a grammar tree: each line gets
//! exactly one [`LineTag`] from its own text plus the fence state carried
//! from the line above. Bounded cost per line, no backtracking across lines.
//!
//! ## Modules
//!
//! - **`span`** / **`lines`**: byte spans and rope line iteration
//! - **`marks`**: per-kind marker syntax (heading, list, quote, rule, fence)
//! - **`classify`**: `LineTag` and the single-forward-pass classifier
//! - **`fence`**: incrementally-maintained per-line fence state

pub mod classify;
pub mod fence;
pub mod lines;
pub mod marks;
pub mod span;

pub use classify::{LineClassifier, LineTag, classify_rope};
pub use fence::{FenceMap, line_count};
pub use lines::{LineRef, lines_with_spans};
pub use span::Span;
