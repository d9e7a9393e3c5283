//! Authoring warnings raised by the add pass before a declaration is
//! prefixed.

use super::control;
use crate::pass::Pass;
use crate::vendor::is_match;
use css_syntax::value::{self, ValueNode};
use css_syntax::{NodeId, Stylesheet};
use once_cell::sync::Lazy;
use regex::Regex;

static OLD_LINEAR: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)(^|[^-])linear-gradient\(\s*(top|left|right|bottom)").ok());
static OLD_RADIAL: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)(^|[^-])radial-gradient\(\s*\d+(\w*|%)\s+\d+(\w*|%)\s*,").ok());
static BOX_ALIGNMENT: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^(align|justify|place)-(items|content)$").ok());
static ITEMS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^(align|justify|place)-items$").ok());
static CONTENT: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^(align|justify|place)-content$").ok());
static GRID_GAP: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^grid-([A-Za-z]+-)?gap").ok());

const SIZES: [&str; 12] = [
    "width",
    "height",
    "min-width",
    "max-width",
    "min-height",
    "max-height",
    "inline-size",
    "min-inline-size",
    "max-inline-size",
    "block-size",
    "min-block-size",
    "max-block-size",
];

const OUTDATED_GRADIENT: &str = "Gradient has outdated direction syntax. ";

fn siblings_have(sheet: &Stylesheet, decl: NodeId, test: impl Fn(&str, &str) -> bool) -> bool {
    sheet
        .parent(decl)
        .is_some_and(|parent| sheet.some_declaration(parent, |other| test(&other.prop, &other.value)))
}

fn inside_grid(sheet: &Stylesheet, decl: NodeId) -> bool {
    siblings_have(sheet, decl, |prop, value| {
        (prop == "display" && value.contains("grid")) || prop.starts_with("grid-template") || is_match(&GRID_GAP, prop)
    })
}

fn inside_flex(sheet: &Stylesheet, decl: NodeId) -> bool {
    siblings_have(sheet, decl, |prop, value| prop == "display" && value.contains("flex"))
}

fn has_grid_template(sheet: &Stylesheet, decl: NodeId) -> bool {
    siblings_have(sheet, decl, |prop, _| prop == "grid-template" || prop == "grid-template-areas")
}

fn has_rows_and_columns(sheet: &Stylesheet, decl: NodeId) -> bool {
    siblings_have(sheet, decl, |prop, _| prop == "grid-template-rows")
        && siblings_have(sheet, decl, |prop, _| prop == "grid-template-columns")
}

/// Run every warning for `decl`. Returns `true` when the declaration must
/// not be prefixed.
pub fn check(pass: &mut Pass<'_>, decl: NodeId, grid_prefixes: bool) -> bool {
    let Some((prop, value)) = pass
        .sheet
        .declaration(decl)
        .map(|found| (found.prop.clone(), found.value.clone()))
    else {
        return true;
    };
    let skip = match prop.as_str() {
        "color-adjust" => {
            if !siblings_have(pass.sheet, decl, |other, _| other == "print-color-adjust") {
                pass.warn(
                    decl,
                    "Replace color-adjust to print-color-adjust. The color-adjust shorthand is currently deprecated.",
                );
            }
            false
        }
        "grid-row-span" | "grid-column-span" => {
            let replacement = prop.trim_end_matches("-span");
            pass.warn(
                decl,
                format!("{prop} is not part of final Grid Layout. Use {replacement}."),
            );
            true
        }
        "display" if value == "box" => {
            pass.warn(decl, "You should write display: flex by final spec instead of display: box");
            true
        }
        "text-emphasis-position" => {
            if value == "under" || value == "over" {
                pass.warn(
                    decl,
                    "You should use 2 values for text-emphasis-position For example, `under left` instead of just `under`.",
                );
            }
            false
        }
        _ if is_match(&BOX_ALIGNMENT, &prop) && inside_flex(pass.sheet, decl) => {
            if value == "start" || value == "end" {
                pass.warn(
                    decl,
                    format!("{value} value has mixed support, consider using flex-{value} instead"),
                );
            }
            false
        }
        "text-decoration-skip" if value == "ink" => {
            pass.warn(
                decl,
                "Replace text-decoration-skip: ink to text-decoration-skip-ink: auto, because spec had been changed",
            );
            false
        }
        _ => {
            if grid_prefixes && control::grid_status(pass, decl).is_enabled() && grid(pass, decl, &prop, &value) {
                return true;
            }
            gradients(pass, decl, &value);
            false
        }
    };
    sizes(pass, decl, &prop, &value);
    skip
}

/// IE grid limitations. Returns `true` when the declaration is skipped.
fn grid(pass: &mut Pass<'_>, decl: NodeId, prop: &str, value: &str) -> bool {
    if value == "subgrid" {
        pass.warn(decl, "IE does not support subgrid");
    }
    if is_match(&ITEMS, prop) && inside_grid(pass.sheet, decl) {
        let fixed = prop.replacen("-items", "-self", 1);
        let selector = pass
            .sheet
            .parent(decl)
            .and_then(|parent| pass.sheet.rule(parent))
            .map(|rule| rule.selector.clone())
            .unwrap_or_default();
        pass.warn(
            decl,
            format!(
                "IE does not support {prop} on grid containers. Try using {fixed} on child elements instead: {selector} > * {{ {fixed}: {value} }}"
            ),
        );
    } else if is_match(&CONTENT, prop) && inside_grid(pass.sheet, decl) {
        pass.warn(decl, format!("IE does not support {prop} on grid containers"));
    } else if prop == "display" && value == "contents" {
        pass.warn(decl, "Please do not use display: contents; if you have grid setting enabled");
        return true;
    } else if prop == "grid-gap" {
        grid_gap(pass, decl);
    } else if prop == "grid-auto-columns" || prop == "grid-auto-rows" {
        pass.warn(decl, format!("{prop} is not supported by IE"));
        return true;
    } else if prop == "grid-auto-flow" {
        grid_auto_flow(pass, decl, value);
        return true;
    } else if value.contains("auto-fit") || value.contains("auto-fill") {
        let word = if value.contains("auto-fit") { "auto-fit" } else { "auto-fill" };
        pass.warn_word(decl, format!("{word} value is not supported by IE"), word);
        return true;
    } else if prop.starts_with("grid-template") && value.contains('[') {
        pass.warn_word(
            decl,
            "Autoprefixer currently does not support line names. Try using grid-template-areas instead.",
            "[",
        );
    }
    false
}

fn grid_gap(pass: &mut Pass<'_>, decl: NodeId) {
    let status = control::grid_status(pass, decl);
    let template = has_grid_template(pass.sheet, decl);
    if status == crate::options::GridMode::Autoplace && !has_rows_and_columns(pass.sheet, decl) && !template {
        pass.warn(
            decl,
            "grid-gap only works if grid-template(-areas) is being used or both rows and columns have been declared and cells have not been manually placed inside the explicit grid",
        );
    } else if status == crate::options::GridMode::NoAutoplace && !template {
        pass.warn(decl, "grid-gap only works if grid-template(-areas) is being used");
    }
}

fn grid_auto_flow(pass: &mut Pass<'_>, decl: NodeId, value: &str) {
    let has_rows = siblings_have(pass.sheet, decl, |prop, _| prop == "grid-template-rows");
    let has_columns = siblings_have(pass.sheet, decl, |prop, _| prop == "grid-template-columns");
    if has_grid_template(pass.sheet, decl) {
        pass.warn(decl, "grid-auto-flow is not supported by IE");
    } else if value.contains("dense") {
        pass.warn(decl, "grid-auto-flow: dense is not supported by IE");
    } else if !has_rows && !has_columns {
        pass.warn(
            decl,
            "grid-auto-flow works only if grid-template-rows and grid-template-columns are present in the same rule",
        );
    }
}

fn gradients(pass: &mut Pass<'_>, decl: NodeId, text: &str) {
    if text.contains("radial-gradient") {
        if is_match(&OLD_RADIAL, text) {
            pass.warn(
                decl,
                format!("{OUTDATED_GRADIENT}New syntax is like `closest-side at 0 0` instead of `0 0, closest-side`."),
            );
        } else {
            for node in value::parse(text) {
                let ValueNode::Function { name, nodes, .. } = node else {
                    continue;
                };
                if name != "radial-gradient" {
                    continue;
                }
                for word in nodes {
                    match word {
                        ValueNode::Word(word) if word == "cover" => pass.warn(
                            decl,
                            format!("{OUTDATED_GRADIENT}Replace `cover` to `farthest-corner`."),
                        ),
                        ValueNode::Word(word) if word == "contain" => pass.warn(
                            decl,
                            format!("{OUTDATED_GRADIENT}Replace `contain` to `closest-side`."),
                        ),
                        _ => {}
                    }
                }
            }
        }
    }
    if text.contains("linear-gradient") && is_match(&OLD_LINEAR, text) {
        pass.warn(
            decl,
            format!("{OUTDATED_GRADIENT}New syntax is like `to left` instead of `right`."),
        );
    }
}

fn sizes(pass: &mut Pass<'_>, decl: NodeId, prop: &str, text: &str) {
    if !SIZES.contains(&prop) || text.contains("-fill-available") {
        return;
    }
    if text.contains("fill-available") {
        pass.warn(decl, "Replace fill-available to stretch, because spec had been changed");
    } else if text.contains("fill")
        && value::parse(text)
            .iter()
            .any(|node| matches!(node, ValueNode::Word(word) if word == "fill"))
    {
        pass.warn(decl, "Replace fill to stretch, because spec had been changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefixes::Prefixes;

    #[test]
    fn patterns_compile() {
        for pattern in [&OLD_LINEAR, &OLD_RADIAL, &BOX_ALIGNMENT, &ITEMS, &CONTENT, &GRID_GAP] {
            assert!(pattern.is_some());
        }
    }

    fn messages(css: &str, queries: &[&str]) -> (Vec<String>, Vec<bool>) {
        let prefixes = Prefixes::for_tests(queries);
        let mut sheet = Stylesheet::parse(css);
        let decls = sheet.walk_declarations(sheet.root());
        let mut pass = Pass::new(&mut sheet, &prefixes);
        let skipped = decls.into_iter().map(|decl| check(&mut pass, decl, true)).collect();
        let messages = pass.diagnostics.into_vec().into_iter().map(|found| found.message).collect();
        (messages, skipped)
    }

    #[test]
    fn outdated_syntax_is_reported() {
        let (messages, skipped) = messages(
            "a { display: box; background: linear-gradient(top, red, blue); width: fill }",
            &["chrome 20"],
        );
        assert_eq!(skipped, [true, false, false]);
        assert!(messages[0].contains("display: flex"));
        assert!(messages[1].contains("`to left`"));
        assert!(messages[2].contains("Replace fill to stretch"));
    }

    #[test]
    fn ie_grid_limits_are_reported() {
        let (messages, skipped) = messages(
            "a { display: grid; grid-auto-rows: 10px; justify-items: center; grid-template-columns: repeat(auto-fill, 10px) }",
            &["ie 11"],
        );
        assert_eq!(skipped, [false, true, false, true]);
        assert_eq!(messages[0], "grid-auto-rows is not supported by IE");
        assert!(messages[1].contains("justify-self"));
        assert_eq!(messages[2], "auto-fill value is not supported by IE");
    }
}
