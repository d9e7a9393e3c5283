//! Generic prefixing behaviour per node kind. Feature quirks live in
//! [`crate::hacks`] and plug into these handlers through the `*Hack` traits.

pub mod at_rule;
pub mod brackets;
pub mod declaration;
pub mod resolution;
pub mod selector;
pub mod supports;
pub mod transition;
pub mod value;

pub use at_rule::AtRuleHandler;
pub use declaration::{DeclarationHack, DeclarationHandler};
pub use resolution::Resolution;
pub use selector::{OldSelector, SelectorHack, SelectorHandler};
pub use value::{OldValue, ValueHack, ValueHandler};
