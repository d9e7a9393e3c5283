//! CSS Syntax Module Level 3: a lossless stylesheet tree.
//! Spec: <https://www.w3.org/TR/css-syntax-3/>
//!
//! Stylesheets are tokenized with `cssparser` and stored in an `indextree`
//! arena. Every node keeps the raw whitespace around it, so printing an
//! unmodified tree reproduces the input byte for byte. Declaration values
//! and rule preludes are kept as raw text; [`value`] and [`list`] split them
//! further when a caller needs component values.

pub mod list;
mod parser;
mod printer;
mod tree;
pub mod value;

pub use indextree::NodeId;
pub use parser::parse_stylesheet;
pub use tree::{
    AtRule, Comment, Declaration, Node, NodeKind, Raws, Rule, SourcePosition, Stylesheet,
};
