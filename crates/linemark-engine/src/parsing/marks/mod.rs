//! Per-kind marker syntax knowledge.
//!
//! Each block marker kind owns its delimiter constants and match logic here,
//! so the classifier, the decorator, and the toggle engine all consult one
//! source of pattern truth instead of re-deriving substrings.

pub mod fence;
pub mod heading;
pub mod list;
pub mod quote;
pub mod rule;

pub use fence::Fence;
pub use heading::Heading;
pub use list::{Bullet, BulletSig, Checkbox, CheckboxSig, Ordered, OrderedSig};
pub use quote::BlockQuote;
pub use rule::Rule;
