//! Runs a plan over a stylesheet: the remove pass first, then the add pass.

pub mod add;
pub mod control;
pub mod remove;
mod warnings;

use crate::error::PrefixerError;
use crate::pass::Pass;
use log::debug;

pub const NOTHING_TO_DO: &str = "Autoprefixer target browsers do not need any prefixes. \
You do not need Autoprefixer anymore. \
Check your browser queries to be sure that your targets are set up correctly.";

/// Process `pass.sheet` in place.
///
/// # Errors
/// Returns an error if an `@supports` condition cannot be rewritten.
pub fn process(pass: &mut Pass<'_>) -> Result<(), PrefixerError> {
    if pass.prefixes.needs_nothing() {
        let root = pass.sheet.root();
        pass.warn(root, NOTHING_TO_DO);
    }
    let options = pass.prefixes.options();
    if options.remove {
        remove::run(pass);
    }
    if options.add {
        add::run(pass)?;
    }
    debug!("processed stylesheet with {} warnings", pass.diagnostics.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{GridMode, Options};
    use crate::prefixes::{LEGACY_ONLY_TABLE, Prefixes};
    use css_syntax::Stylesheet;

    fn run(css: &str, prefixes: &Prefixes) -> (String, Vec<String>) {
        let mut sheet = Stylesheet::parse(css);
        let mut pass = Pass::new(&mut sheet, prefixes);
        process(&mut pass).unwrap();
        let messages = pass.diagnostics.into_vec().into_iter().map(|found| found.message).collect();
        (sheet.to_css(), messages)
    }

    #[test]
    fn old_prefixes_are_replaced() {
        let prefixes = Prefixes::for_tests(&["chrome 131"]);
        let (css, _) = run("a { -webkit-border-radius: 2px; border-radius: 2px }", &prefixes);
        assert_eq!(css, "a { border-radius: 2px }");
    }

    #[test]
    fn flexbox_specs_are_dispatched() {
        let prefixes = Prefixes::for_tests(&["chrome 20", "ie 10"]);
        let (css, _) = run("a { justify-content: space-around }", &prefixes);
        assert!(css.contains("-webkit-box-pack: justify"));
        assert!(css.contains("-ms-flex-pack: distribute"));
        assert!(css.ends_with("justify-content: space-around }"));
    }

    #[test]
    fn modern_targets_are_told_once() {
        let prefixes = Prefixes::for_tests_on(LEGACY_ONLY_TABLE, &["chrome 131"]);
        let (css, messages) = run(
            "a { color: red } b { -webkit-border-radius: 1px; border-radius: 1px }",
            &prefixes,
        );
        assert_eq!(messages.iter().filter(|message| *message == NOTHING_TO_DO).count(), 1);
        assert_eq!(css, "a { color: red } b { border-radius: 1px }");

        let needed = Prefixes::for_tests(&["chrome 131"]);
        let (_, messages) = run("a { color: red }", &needed);
        assert!(!messages.iter().any(|message| message == NOTHING_TO_DO));
    }

    #[test]
    fn disabled_blocks_are_left_alone() {
        let prefixes = Prefixes::for_tests(&["chrome 131"]);
        let (css, _) = run(
            "a { /* autoprefixer: off */ -webkit-border-radius: 2px; border-radius: 2px }",
            &prefixes,
        );
        assert!(css.contains("-webkit-border-radius"));
    }

    #[test]
    fn add_and_remove_can_be_switched_off() {
        let options = Options {
            add: false,
            grid: GridMode::Off,
            ..Options::for_browsers(["chrome 20"])
        };
        let prefixes = Prefixes::for_tests_with(options);
        let (css, _) = run("a { transform: none }", &prefixes);
        assert_eq!(css, "a { transform: none }");
    }
}
