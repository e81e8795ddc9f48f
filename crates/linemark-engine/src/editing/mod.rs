//! # Editing core
//!
//! ## Architecture
//!
//! ### Single source of truth: the rope buffer
//! The entire document lives in one `xi_rope::Rope`. Saving writes rope
//! bytes verbatim; the engine never regenerates markdown from a model, so
//! round-trips are lossless.
//!
//! ### Command-based editing
//! All edits are [`Cmd`]s compiled to xi-rope `Delta`s and applied
//! atomically. Each command is one delta, so the host's undo history
//! restores the exact pre-command text in one step. This includes the four
//! block toggles: the whole selection's transformation is computed first,
//! then applied as a single replace.
//!
//! ### Derived state follows the edit
//! The per-line fence state is recomputed from the first changed line after
//! every delta, observationally identical to a full recompute. Nothing else
//! is cached inside the document.
//!
//! ## Module structure
//!
//! - **`document`**: the [`Document`] type, line addressing, classification
//! - **`commands`**: the [`Cmd`] enum and delta compilation
//! - **`toggle`**: block toggle policies (uniform and per-line)
//! - **`patch`**: edit result metadata

pub mod commands;
pub mod document;
pub mod patch;
pub mod toggle;

pub use commands::Cmd;
pub use document::{Document, DocumentId, IndentStyle};
pub use patch::Patch;
pub use toggle::{TextEdit, ToggleKind, toggle};
