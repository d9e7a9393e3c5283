//! Vendor prefixes for CSS.
//!
//! A [`CapabilityTable`] says which browser versions need a prefix for which
//! feature. Compiling it against a browser selection gives a [`PrefixPlan`];
//! [`Prefixes`] turns the plan into handlers, and the processor runs them
//! over a [`css_syntax::Stylesheet`]: obsolete prefixes are removed first,
//! then missing ones are added. [`Engine`] ties this together and caches
//! plans.

mod compiler;
mod data;
mod diagnostics;
mod engine;
mod error;
mod hacks;
mod handlers;
mod info;
mod options;
mod pass;
mod prefixes;
mod processor;
mod vendor;

pub use compiler::{PrefixPlan, compile};
pub use data::{CapabilityTable, FeatureKind, FeatureRecord};
pub use diagnostics::{Diagnostic, DiagnosticRecord};
pub use engine::{Engine, Processed};
pub use error::PrefixerError;
pub use info::{BrowserGroup, Entry, InfoReport, info, report};
pub use options::{FlexboxMode, GridMode, Options};
pub use prefixes::Prefixes;
pub use processor::NOTHING_TO_DO;

use css_syntax::Stylesheet;

/// Run `prefixes` over `sheet` without going through an [`Engine`].
///
/// # Errors
/// Returns an error if an `@supports` condition cannot be rewritten.
pub fn process(sheet: &mut Stylesheet, prefixes: &Prefixes) -> Result<Vec<Diagnostic>, PrefixerError> {
    let mut run = pass::Pass::new(sheet, prefixes);
    processor::process(&mut run)?;
    Ok(run.diagnostics.into_vec())
}
