//! Control comments: `/* autoprefixer: off */`, `/* autoprefixer: ignore
//! next */` and `/* autoprefixer grid: autoplace */`.
//!
//! A control comment applies to the whole block it sits in and to every
//! block nested inside it. Only the first one per block counts.

use crate::options::{FlexboxMode, GridMode};
use crate::pass::Pass;
use crate::vendor::is_match;
use css_syntax::{NodeId, NodeKind, Stylesheet};
use once_cell::sync::Lazy;
use regex::Regex;

static IGNORE_NEXT: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)(!\s*)?autoprefixer:\s*ignore\s+next").ok());
static SWITCH: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?i)(!\s*)?autoprefixer:\s*(off|on)").ok());
static GRID_SWITCH: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)(!\s*)?autoprefixer\s*grid:\s*(on|off|(no-)?autoplace)").ok());
static AUTOPLACE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?i):\s*autoplace").ok());
static NO_AUTOPLACE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?i)no-autoplace").ok());
static ON: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?i)on").ok());

const FLEX_LIKE: [&str; 4] = ["order", "justify-content", "align-items", "align-content"];

/// The first comment in `node`'s block matching `pattern`, and any later
/// ones that will be ignored.
fn block_switch(sheet: &Stylesheet, node: NodeId, pattern: &Lazy<Option<Regex>>) -> (Option<String>, Vec<NodeId>) {
    let mut first = None;
    let mut ignored = Vec::new();
    for child in sheet.children(node) {
        let Some(comment) = sheet.comment(child) else {
            continue;
        };
        if !is_match(pattern, &comment.text) {
            continue;
        }
        if first.is_none() {
            first = Some(comment.text.clone());
        } else {
            ignored.push(child);
        }
    }
    (first, ignored)
}

fn ignored_by_previous(sheet: &Stylesheet, node: NodeId) -> bool {
    sheet
        .prev_sibling(node)
        .and_then(|previous| sheet.comment(previous))
        .is_some_and(|comment| is_match(&IGNORE_NEXT, &comment.text))
}

/// Whether prefixing is switched off for `node`.
pub fn disabled(pass: &mut Pass<'_>, node: NodeId) -> bool {
    if let Some(known) = pass.memo.disabled.get(&node) {
        return *known;
    }
    if pass.sheet.parent(node).is_some() && ignored_by_previous(pass.sheet, node) {
        pass.memo.disabled.insert(node, true);
        pass.memo.self_disabled.insert(node);
        return true;
    }
    let (switch, ignored) = block_switch(pass.sheet, node, &SWITCH);
    for comment in ignored {
        pass.warn(
            comment,
            "Second Autoprefixer control comment was ignored. Autoprefixer applies control comment to whole block, not to next rules.",
        );
    }
    let value = match switch {
        Some(text) => !is_match(&ON, &text),
        None => match pass.sheet.parent(node) {
            Some(parent) => {
                let parent_disabled = disabled(pass, parent);
                !pass.memo.self_disabled.contains(&parent) && parent_disabled
            }
            None => false,
        },
    };
    pass.memo.disabled.insert(node, value);
    value
}

/// The grid mode in effect for `node`.
pub fn grid_status(pass: &mut Pass<'_>, node: NodeId) -> GridMode {
    if let Some(known) = pass.memo.grid_status.get(&node) {
        return *known;
    }
    let (switch, ignored) = block_switch(pass.sheet, node, &GRID_SWITCH);
    for comment in ignored {
        pass.warn(
            comment,
            "Second Autoprefixer grid control comment was ignored. Autoprefixer applies control comments to the whole block, not to the next rules.",
        );
    }
    let mut value = switch.map(|text| {
        if is_match(&AUTOPLACE, &text) {
            GridMode::Autoplace
        } else if is_match(&NO_AUTOPLACE, &text) || is_match(&ON, &text) {
            GridMode::NoAutoplace
        } else {
            GridMode::Off
        }
    });
    let supports_auto = pass
        .sheet
        .at_rule(node)
        .is_some_and(|rule| rule.name == "supports" && rule.params.contains("grid") && rule.params.contains("auto"));
    if supports_auto {
        value = Some(GridMode::Off);
    }
    let value = match value {
        Some(value) => value,
        None => match pass.sheet.parent(node) {
            Some(parent) => {
                let inherited = grid_status(pass, parent);
                if pass.memo.self_disabled.contains(&parent) {
                    GridMode::Off
                } else {
                    inherited
                }
            }
            None => pass.prefixes.options().grid,
        },
    };
    pass.memo.grid_status.insert(node, value);
    value
}

fn is_declaration(sheet: &Stylesheet, node: NodeId) -> bool {
    sheet
        .get(node)
        .is_some_and(|found| matches!(found.kind, NodeKind::Declaration(_)))
}

/// Declarations skipped by the add pass: grid or flexbox properties when
/// those are switched off, plus everything [`disabled`].
pub fn disabled_declaration(pass: &mut Pass<'_>, decl: NodeId) -> bool {
    if is_declaration(pass.sheet, decl) {
        let grid_off = !grid_status(pass, decl).is_enabled();
        let flex_off = pass.prefixes.options().flexbox == FlexboxMode::Off;
        if let Some(found) = pass.sheet.declaration(decl) {
            if grid_off && (found.prop.contains("grid") || found.prop == "justify-items") {
                return true;
            }
            if flex_off && (found.prop.contains("flex") || FLEX_LIKE.contains(&found.prop.as_str())) {
                return true;
            }
        }
    }
    disabled(pass, decl)
}

/// Declarations whose values the add pass leaves alone.
pub fn disabled_value(pass: &mut Pass<'_>, decl: NodeId) -> bool {
    if is_declaration(pass.sheet, decl) {
        let grid_off = !grid_status(pass, decl).is_enabled();
        let flex_off = pass.prefixes.options().flexbox == FlexboxMode::Off;
        if let Some(found) = pass.sheet.declaration(decl) {
            let display = found.prop == "display";
            if (grid_off && display && found.value.contains("grid"))
                || (flex_off && display && found.value.contains("flex"))
                || found.prop == "content"
            {
                return true;
            }
        }
    }
    disabled(pass, decl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefixes::Prefixes;

    #[test]
    fn patterns_compile() {
        for pattern in [&IGNORE_NEXT, &SWITCH, &GRID_SWITCH, &AUTOPLACE, &NO_AUTOPLACE, &ON] {
            assert!(pattern.is_some());
        }
    }

    fn declarations(sheet: &Stylesheet) -> Vec<NodeId> {
        sheet.walk_declarations(sheet.root())
    }

    #[test]
    fn off_applies_to_the_whole_block() {
        let prefixes = Prefixes::for_tests(&["chrome 20"]);
        let mut sheet = Stylesheet::parse("a { color: red; /* autoprefixer: off */ } b { color: blue }");
        let decls = declarations(&sheet);
        let mut pass = Pass::new(&mut sheet, &prefixes);
        assert!(disabled(&mut pass, decls[0]));
        assert!(!disabled(&mut pass, decls[1]));
    }

    #[test]
    fn ignore_next_only_skips_one_node() {
        let prefixes = Prefixes::for_tests(&["chrome 20"]);
        let mut sheet = Stylesheet::parse("a { /* autoprefixer: ignore next */ color: red; color: blue }");
        let decls = declarations(&sheet);
        let mut pass = Pass::new(&mut sheet, &prefixes);
        assert!(disabled(&mut pass, decls[0]));
        assert!(!disabled(&mut pass, decls[1]));
    }

    #[test]
    fn second_switch_is_reported() {
        let prefixes = Prefixes::for_tests(&["chrome 20"]);
        let mut sheet = Stylesheet::parse("a { /* autoprefixer: off */ /* autoprefixer: on */ color: red }");
        let decls = declarations(&sheet);
        let mut pass = Pass::new(&mut sheet, &prefixes);
        assert!(disabled(&mut pass, decls[0]));
        assert!(!pass.diagnostics.is_empty());
    }

    #[test]
    fn grid_comments_and_supports_blocks() {
        let prefixes = Prefixes::for_tests(&["ie 11"]);
        let mut sheet = Stylesheet::parse(concat!(
            "a { /* autoprefixer grid: autoplace */ grid-gap: 1px } ",
            "@supports (grid-auto-flow: row) { b { grid-gap: 1px } } ",
            "c { grid-gap: 1px }"
        ));
        let decls = declarations(&sheet);
        let mut pass = Pass::new(&mut sheet, &prefixes);
        assert_eq!(grid_status(&mut pass, decls[0]), GridMode::Autoplace);
        assert_eq!(grid_status(&mut pass, decls[1]), GridMode::Off);
        assert_eq!(grid_status(&mut pass, decls[2]), GridMode::NoAutoplace);
    }
}
