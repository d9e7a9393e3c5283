#![cfg(test)]
#![allow(
    clippy::unwrap_used,
    reason = "Test setup failures should abort the test"
)]

use css_browsers::AgentDatabase;
use css_prefixer::{CapabilityTable, Engine, Options, Processed};

fn init_logging() {
    let _logger = env_logger::builder().is_test(true).try_init();
}

fn process(css: &str, browsers: &[&str]) -> Processed {
    init_logging();
    let mut engine = Engine::new().unwrap();
    engine
        .process_css(css, &Options::for_browsers(browsers.iter().copied()))
        .unwrap()
}

/// # Panics
/// Panics if a second run changes the output.
#[test]
fn adding_twice_changes_nothing() {
    let browsers = ["chrome 20", "firefox 21", "ie 10", "safari 5"];
    let css = "a {\n  display: flex;\n  transition: transform 1s;\n  user-select: none\n}\n";
    let once = process(css, &browsers).css;
    let twice = process(&once, &browsers).css;
    assert_eq!(once, twice);
}

#[test]
fn modern_targets_undo_old_output() {
    let css = "a { transform: none }";
    let prefixed = process(css, &["chrome 30"]).css;
    assert_ne!(prefixed, css);
    assert_eq!(process(&prefixed, &["chrome 131"]).css, css);
}

#[test]
fn longest_vendor_comes_first() {
    let css = process("a { user-select: none }", &["chrome 50", "firefox 60", "ie 11"]).css;
    let webkit = css.find("-webkit-user-select").unwrap();
    let moz = css.find("-moz-user-select").unwrap();
    let ms = css.find("-ms-user-select").unwrap();
    let plain = css.find(" user-select").unwrap();
    assert!(webkit < moz && moz < ms && ms < plain);
}

#[test]
fn vendors_are_never_doubled() {
    let css = process(
        "a { -webkit-user-select: none; user-select: none }",
        &["chrome 50", "firefox 60"],
    )
    .css;
    assert_eq!(css.matches("-webkit-user-select").count(), 1);
    assert_eq!(css.matches("-moz-user-select").count(), 1);
}

#[test]
fn keyframes_are_copied_for_old_engines() {
    let css = process("@keyframes spin { to { transform: rotate(1turn) } }", &["chrome 30"]).css;
    assert!(css.starts_with("@-webkit-keyframes spin"));
    assert!(css.contains("@keyframes spin"));
}

const LEGACY_TABLE: &str = r#"{
    "feature_queries": ["chrome 28..131"],
    "features": [
        {"feature": "border-radius", "names": ["border-radius"], "browsers": ["chrome 4..25"]}
    ]
}"#;

#[test]
fn modern_targets_are_told_once() {
    init_logging();
    let agents = AgentDatabase::builtin().unwrap();
    let table = CapabilityTable::from_json(LEGACY_TABLE, &agents).unwrap();
    let mut engine = Engine::with_data(agents, table, 2);
    let css = "a { color: red } b { -webkit-border-radius: 1px; border-radius: 1px }";

    let modern = engine.process_css(css, &Options::for_browsers(["chrome 131"])).unwrap();
    let notices = modern
        .diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.message == css_prefixer::NOTHING_TO_DO)
        .count();
    assert_eq!(notices, 1);
    assert_eq!(modern.css, "a { color: red } b { border-radius: 1px }");

    let old = engine.process_css(css, &Options::for_browsers(["chrome 20"])).unwrap();
    assert!(old.diagnostics.is_empty());
}

#[test]
fn foreign_vendor_values_are_not_prefixed_again() {
    let css = "a { mask: -moz-element(#a) }";
    let processed = process(css, &["chrome 50"]);
    assert_eq!(processed.css, css);
}

#[test]
fn control_comments_switch_blocks_off() {
    let css = process(
        "a { /* autoprefixer: off */ transform: none } b { transform: none }",
        &["chrome 30"],
    )
    .css;
    assert_eq!(css.matches("-webkit-transform").count(), 1);
}
