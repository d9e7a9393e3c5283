#![cfg(test)]
#![allow(
    clippy::unwrap_used,
    reason = "Test setup failures should abort the test"
)]

use css_browsers::AgentDatabase;
use css_prefixer::{CapabilityTable, Engine, GridMode, Options};

fn process_with(css: &str, options: &Options) -> String {
    let _logger = env_logger::builder().is_test(true).try_init();
    let mut engine = Engine::new().unwrap();
    engine.process_css(css, options).unwrap().css
}

fn process(css: &str, browsers: &[&str]) -> String {
    process_with(css, &Options::for_browsers(browsers.iter().copied()))
}

const FLEXBOX_TABLE: &str = r#"{
    "feature_queries": [],
    "features": [
        {
            "feature": "flexbox",
            "names": ["justify-content"],
            "browsers": ["chrome 20 2009", "ie 10 2012", "firefox 21 final"]
        }
    ]
}"#;

#[test]
fn flexbox_values_follow_each_spec() {
    let _logger = env_logger::builder().is_test(true).try_init();
    let agents = AgentDatabase::builtin().unwrap();
    let table = CapabilityTable::from_json(FLEXBOX_TABLE, &agents).unwrap();
    let mut engine = Engine::with_data(agents, table, 1);
    let options = Options::for_browsers(["chrome 20", "ie 10", "firefox 21"]);
    let css = engine
        .process_css("a { justify-content: space-around; }", &options)
        .unwrap()
        .css;
    assert_eq!(
        css,
        "a { -webkit-box-pack: justify; -moz-justify-content: space-around; \
         -ms-flex-pack: distribute; justify-content: space-around; }"
    );
}

#[test]
fn bundled_firefox_flexbox_is_the_2009_draft() {
    let css = process("a { justify-content: space-around; }", &["firefox 21"]);
    assert!(css.contains("-moz-box-pack: justify;"));
    assert!(!css.contains("-moz-justify-content"));
}

#[test]
fn no_2009_skips_the_oldest_spec() {
    let options = Options {
        flexbox: css_prefixer::FlexboxMode::No2009,
        ..Options::for_browsers(["chrome 20", "ie 10"])
    };
    let css = process_with("a { justify-content: space-around; }", &options);
    assert!(!css.contains("-webkit-box-pack"));
    assert!(css.contains("-ms-flex-pack: distribute;"));
}

#[test]
fn grid_areas_resolve_to_cells() {
    let options = Options {
        grid: GridMode::Autoplace,
        ..Options::for_browsers(["ie 11"])
    };
    let css = process_with(
        ".grid { grid-template-areas: \"a a\" \"b c\"; } .item { grid-area: c; }",
        &options,
    );
    assert!(css.contains("-ms-grid-row: 2;"));
    assert!(css.contains("-ms-grid-column: 2;"));
}

#[test]
fn grid_is_left_alone_unless_enabled() {
    let css = process(
        ".grid { grid-template-areas: \"a a\" \"b c\"; } .item { grid-area: c; }",
        &["ie 11"],
    );
    assert!(!css.contains("-ms-grid"));
}

#[test]
fn gradient_angles_become_directions() {
    let css = process(
        "a { background: linear-gradient(0deg, red, blue); }",
        &["chrome 9", "chrome 20"],
    );
    assert!(css.contains("-webkit-gradient(linear, left bottom, left top, from(red), to(blue))"));
    assert!(css.contains("-webkit-linear-gradient(bottom, red, blue)"));
    assert!(css.contains(" background: linear-gradient(0deg, red, blue);"));
}

#[test]
fn supports_conditions_gain_prefixed_alternatives() {
    let css = process("@supports (transform: none) { a { color: red } }", &["chrome 30"]);
    assert!(css.contains("(-webkit-transform: none)"));
}

#[test]
fn huge_order_skips_the_ordinal_group() {
    let css = process("a { order: 9223372036854775807 }", &["chrome 20"]);
    assert!(!css.contains("box-ordinal-group"));
    assert!(css.ends_with(" order: 9223372036854775807 }"));
}
