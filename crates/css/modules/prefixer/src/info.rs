//! A human-readable summary of what a plan prefixes.

use crate::prefixes::Prefixes;
use css_browsers::version_number;
use serde::Serialize;
use std::cmp::Ordering;

/// One browser family and its selected versions, newest first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BrowserGroup {
    pub name: String,
    pub versions: Vec<String>,
}

/// A feature and the vendors it is prefixed for.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Entry {
    pub name: String,
    pub prefixes: Vec<String>,
    /// Only prefixed when grid support is switched on.
    pub grid: bool,
}

impl Entry {
    fn new(name: &str, prefixes: &[String], grid: bool) -> Self {
        Self {
            name: name.to_owned(),
            prefixes: prefixes
                .iter()
                .map(|prefix| {
                    prefix
                        .strip_prefix('-')
                        .and_then(|inner| inner.strip_suffix('-'))
                        .unwrap_or(prefix)
                        .to_owned()
                })
                .collect(),
            grid,
        }
    }

    fn line(&self) -> String {
        let note = if self.grid { " *" } else { "" };
        format!("  {}{note}: {}\n", self.name, self.prefixes.join(", "))
    }
}

/// Everything [`info`] prints, in a serialisable form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InfoReport {
    pub browsers: Vec<BrowserGroup>,
    pub at_rules: Vec<Entry>,
    pub selectors: Vec<Entry>,
    pub properties: Vec<Entry>,
    pub values: Vec<Entry>,
}

impl InfoReport {
    fn has_grid(&self) -> bool {
        self.properties.iter().chain(&self.values).any(|entry| entry.grid)
    }

    fn is_empty(&self) -> bool {
        self.at_rules.is_empty() && self.selectors.is_empty() && self.properties.is_empty() && self.values.is_empty()
    }
}

fn newest_first(left: &str, right: &str) -> Ordering {
    let number = |version: &str| version_number(version).unwrap_or(0.0);
    number(right).total_cmp(&number(left))
}

fn browser_groups(prefixes: &Prefixes) -> Vec<BrowserGroup> {
    let browsers = prefixes.browsers();
    let mut groups: Vec<BrowserGroup> = Vec::new();
    for target in browsers.selected() {
        let name = browsers
            .agents()
            .get(&target.name)
            .map_or_else(|| target.name.clone(), |agent| agent.browser.clone());
        match groups.iter_mut().find(|group| group.name == name) {
            Some(group) => group.versions.push(target.version.clone()),
            None => groups.push(BrowserGroup {
                name,
                versions: vec![target.version.clone()],
            }),
        }
    }
    for group in &mut groups {
        group.versions.sort_by(|left, right| newest_first(left, right));
    }
    groups
}

/// Collect the report for `prefixes`.
pub fn report(prefixes: &Prefixes) -> InfoReport {
    let mut at_rules: Vec<Entry> = prefixes
        .at_rules()
        .map(|handler| Entry::new(&handler.name, &handler.prefixes, false))
        .chain(
            prefixes
                .resolution()
                .map(|handler| Entry::new("@resolution", &handler.prefixes, false)),
        )
        .collect();
    at_rules.sort();

    let mut selectors: Vec<Entry> = prefixes
        .selectors()
        .iter()
        .map(|handler| Entry::new(&handler.name, &handler.prefixes, false))
        .collect();
    selectors.sort();

    let mut properties: Vec<Entry> = prefixes
        .declarations()
        .map(|handler| Entry::new(&handler.name, &handler.prefixes, handler.name.starts_with("grid-")))
        .collect();
    properties.sort();

    let mut values: Vec<Entry> = Vec::new();
    for handler in prefixes.value_handlers() {
        let entry = Entry::new(&handler.name, &handler.prefixes, handler.name.contains("grid"));
        if !values.contains(&entry) {
            values.push(entry);
        }
    }
    values.sort();

    InfoReport {
        browsers: browser_groups(prefixes),
        at_rules,
        selectors,
        properties,
        values,
    }
}

fn section(out: &mut String, title: &str, entries: &[Entry]) {
    if entries.is_empty() {
        return;
    }
    out.push('\n');
    out.push_str(title);
    out.push_str(":\n");
    for entry in entries {
        out.push_str(&entry.line());
    }
}

/// Render the report as text.
pub fn info(prefixes: &Prefixes) -> String {
    if prefixes.browsers().selected().is_empty() {
        return "No browsers selected".to_owned();
    }
    let report = report(prefixes);
    let mut out = String::from("Browsers:\n");
    for group in &report.browsers {
        out.push_str(&format!("  {}: {}\n", group.name, group.versions.join(", ")));
    }
    section(&mut out, "At-Rules", &report.at_rules);
    section(&mut out, "Selectors", &report.selectors);
    section(&mut out, "Properties", &report.properties);
    section(&mut out, "Values", &report.values);
    if report.has_grid() {
        out.push_str("\n* - Prefixes will be added only on grid: true option.\n");
    }
    if report.is_empty() {
        out.push_str("\nAwesome! Your browsers don't require any vendor prefixes.");
        out.push_str("\nNow you can remove Autoprefixer from build steps.");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefixes::LEGACY_ONLY_TABLE;

    #[test]
    fn old_browsers_list_every_section() {
        let prefixes = Prefixes::for_tests(&["chrome 20", "chrome 25", "ie 10"]);
        let text = info(&prefixes);
        assert!(text.starts_with("Browsers:\n"));
        assert!(text.contains("  Chrome: 25, 20\n"));
        assert!(text.contains("\nAt-Rules:\n  @keyframes: webkit"));
        assert!(text.contains("\nProperties:\n"));
        assert!(text.contains("\nValues:\n"));
    }

    #[test]
    fn modern_browsers_need_nothing() {
        let prefixes = Prefixes::for_tests_on(LEGACY_ONLY_TABLE, &["chrome 131"]);
        let report = report(&prefixes);
        assert!(report.properties.is_empty());
        assert!(info(&prefixes).contains("don't require any vendor prefixes"));
    }

    #[test]
    fn report_serialises() {
        let prefixes = Prefixes::for_tests(&["ie 11"]);
        let json = serde_json::to_value(report(&prefixes)).unwrap();
        assert_eq!(json["browsers"][0]["name"], "IE");
        assert!(
            json["properties"]
                .as_array()
                .unwrap()
                .iter()
                .any(|entry| entry["grid"] == true)
        );
    }
}
