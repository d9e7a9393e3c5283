#![cfg(test)]
#![allow(
    clippy::unwrap_used,
    reason = "Test setup failures should abort the test"
)]

use css_browsers::{AgentDatabase, BrowserTarget, Browsers, BrowsersError};

fn select(queries: &[&str]) -> Result<Browsers, BrowsersError> {
    let agents = AgentDatabase::builtin()?;
    let queries: Vec<String> = queries.iter().map(|query| (*query).to_owned()).collect();
    Browsers::new(agents, &queries)
}

#[test]
fn comparison_queries_select_ranges() {
    let browsers = select(&["ie >= 10"]).unwrap();
    assert_eq!(browsers.selected_names(), vec!["ie 10", "ie 11"]);
    let browsers = select(&["ie>=10"]).unwrap();
    assert_eq!(browsers.selected().len(), 2);
}

#[test]
fn selection_is_sorted_by_name_then_version() {
    let browsers = select(&["safari 9, chrome 10, chrome 9, safari 10.1"]).unwrap();
    assert_eq!(
        browsers.selected_names(),
        vec!["chrome 9", "chrome 10", "safari 9", "safari 10.1"]
    );
}

#[test]
fn negation_removes_earlier_selection() {
    let browsers = select(&["ie 9-11", "not ie 10"]).unwrap();
    assert_eq!(browsers.selected_names(), vec!["ie 9", "ie 11"]);
}

#[test]
fn last_versions_cover_every_agent() {
    let browsers = select(&["last 1 chrome version", "last 2 ff versions"]).unwrap();
    assert_eq!(browsers.selected_names(), vec!["chrome 131", "firefox 132", "firefox 133"]);
    let defaults = select(&["defaults"]).unwrap();
    assert!(defaults.is_selected("op_mini all"));
    assert!(defaults.is_selected("chrome 131"));
}

#[test]
fn prefixes_follow_exceptions() {
    let browsers = select(&["edge 12"]).unwrap();
    assert_eq!(browsers.prefix("edge 12"), Some("-ms-"));
    assert_eq!(browsers.prefix("edge 120"), Some("-webkit-"));
    assert_eq!(browsers.prefix("opera 12.1"), Some("-o-"));
    assert_eq!(browsers.prefix("opera 15"), Some("-webkit-"));
    assert_eq!(
        browsers.all_prefixes(),
        ["-webkit-", "-moz-", "-ms-", "-o-"].map(String::from)
    );
    assert!(browsers.with_prefix("-moz-calc(1px)"));
    assert!(!browsers.with_prefix("calc(1px)"));
}

#[test]
fn unsupported_queries_fail_loudly() {
    assert!(matches!(select(&["> 1%"]), Err(BrowsersError::UsageQuery(_))));
    assert!(matches!(select(&["netscape 4"]), Err(BrowsersError::UnknownBrowser(_))));
    assert!(matches!(select(&["ie 4"]), Err(BrowsersError::UnknownVersion { .. })));
    assert!(matches!(select(&["maintained node versions"]), Err(_)));
}

#[test]
fn targets_order_numerically() {
    let mut targets = vec![
        BrowserTarget::new("ios_saf", "10.0-10.2"),
        BrowserTarget::new("ios_saf", "9.3"),
    ];
    targets.sort();
    assert_eq!(targets[0].version, "9.3");
}
