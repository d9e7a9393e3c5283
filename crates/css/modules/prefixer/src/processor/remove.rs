//! The remove pass: prefixed copies no selected browser needs any more.

use super::control;
use crate::handlers::transition;
use crate::pass::Pass;
use css_syntax::NodeId;
use log::trace;

fn at_rules(pass: &mut Pass<'_>) {
    let prefixes = pass.prefixes;
    for rule in pass.sheet.walk_at_rules(pass.sheet.root()) {
        let Some((name, params)) = pass
            .sheet
            .at_rule(rule)
            .map(|found| (found.name.clone(), found.params.clone()))
        else {
            continue;
        };
        if prefixes.removes_at_rule(&name) {
            if !control::disabled(pass, rule) {
                pass.sheet.remove(rule);
            }
        } else if name == "media"
            && params.contains("-resolution")
            && let Some(resolution) = prefixes.resolution_cleaner()
        {
            resolution.clean(pass, rule);
        }
    }
}

fn rules(pass: &mut Pass<'_>) {
    let prefixes = pass.prefixes;
    for checker in prefixes.old_selectors() {
        for rule in pass.sheet.walk_rules(pass.sheet.root()) {
            if checker.check(pass.sheet, rule) && !control::disabled(pass, rule) {
                pass.sheet.remove(rule);
            }
        }
    }
}

/// `-webkit-background-clip: text` has no unprefixed equivalent in the
/// browsers that read it.
fn with_hack_value(prop: &str, value: &str) -> bool {
    prop == "-webkit-background-clip" && value == "text"
}

/// Pull the indentation of the following group members back to where the
/// removed declaration started.
fn reduce_spaces(pass: &mut Pass<'_>, decl: NodeId) {
    if !pass.group(decl, true).is_empty() {
        return;
    }
    let Some(before) = pass.sheet.raws(decl).map(|raws| raws.before.clone()) else {
        return;
    };
    let width = |line: &str| line.chars().count();
    let prev_min = before.rsplit('\n').next().map_or(0, width);
    let mut diff = None;
    for other in pass.group(decl, false) {
        let Some(raws) = pass.sheet.raws_mut(other) else {
            continue;
        };
        let mut parts: Vec<String> = raws.before.split('\n').map(str::to_owned).collect();
        let Some(last) = parts.last_mut() else {
            continue;
        };
        let current = width(last);
        if current <= prev_min {
            continue;
        }
        let cut = *diff.get_or_insert(current - prev_min);
        *last = last.chars().take(current.saturating_sub(cut)).collect();
        raws.before = parts.join("\n");
    }
}

/// Remove `decl` if it is an obsolete prefixed property. Returns `true`
/// when the declaration is gone or must be kept as is.
fn property(pass: &mut Pass<'_>, decl: NodeId, prop: &str, value: &str, unprefixed: &str) -> bool {
    let prefixes = pass.prefixes;
    if !prefixes.removes(prop) {
        return false;
    }
    let not_hack = unprefixed == "flex-flow"
        || pass.group(decl, false).into_iter().any(|other| {
            pass.sheet
                .declaration(other)
                .is_some_and(|found| prefixes.normalize(&found.prop) == unprefixed)
        });
    if prop == "-webkit-box-orient" {
        let has_direction = pass.sheet.parent(decl).is_some_and(|parent| {
            pass.sheet.some_declaration(parent, |other| {
                other.prop == "flex-direction" || other.prop == "flex-flow"
            })
        });
        if !has_direction {
            return true;
        }
    }
    if not_hack && !with_hack_value(prop, value) {
        if pass.sheet.raws(decl).is_some_and(|raws| raws.before.contains('\n')) {
            reduce_spaces(pass, decl);
        }
        trace!("removing outdated {prop}");
        pass.sheet.remove(decl);
        return true;
    }
    false
}

fn declaration(pass: &mut Pass<'_>, decl: NodeId) {
    if control::disabled(pass, decl) {
        return;
    }
    let Some((prop, value)) = pass
        .sheet
        .declaration(decl)
        .map(|found| (found.prop.clone(), found.value.clone()))
    else {
        return;
    };
    let prefixes = pass.prefixes;
    let unprefixed = prefixes.unprefixed(&prop);
    if transition::PROPS.contains(&prop.as_str()) {
        transition::remove(pass, decl);
    }
    if property(pass, decl, &prop, &value, &unprefixed) {
        return;
    }
    for checker in prefixes.remove_values(&unprefixed) {
        if !checker.check(&value) {
            continue;
        }
        let standard = checker.unprefixed.as_str();
        let not_hack = pass.group(decl, false).into_iter().any(|other| {
            pass.sheet
                .declaration(other)
                .is_some_and(|found| found.value.contains(standard))
        });
        if not_hack {
            trace!("removing outdated {prop}: {value}");
            pass.sheet.remove(decl);
            return;
        }
    }
}

/// Remove prefixes the plan marks obsolete.
pub fn run(pass: &mut Pass<'_>) {
    at_rules(pass);
    rules(pass);
    for decl in pass.sheet.walk_declarations(pass.sheet.root()) {
        declaration(pass, decl);
    }
}
