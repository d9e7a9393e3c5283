//! The add pass: prefixed copies of at-rules, rules, declarations and
//! values the selected browsers still need.

use super::{control, warnings};
use crate::error::PrefixerError;
use crate::handlers::{supports, transition, value};
use crate::hacks::grid_areas;
use crate::options::FlexboxMode;
use crate::pass::Pass;
use css_syntax::{NodeId, Stylesheet};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Display {
    Flex,
    Grid,
    Other,
}

/// What the first `display` in the rule around `decl` lays out.
fn display_type(sheet: &Stylesheet, decl: NodeId) -> Display {
    let Some(parent) = sheet.parent(decl) else {
        return Display::Other;
    };
    sheet
        .child_declarations(parent)
        .into_iter()
        .filter_map(|child| sheet.declaration(child))
        .find(|found| found.prop == "display" && (found.value.contains("flex") || found.value.contains("grid")))
        .map_or(Display::Other, |found| {
            if found.value.contains("flex") {
                Display::Flex
            } else {
                Display::Grid
            }
        })
}

fn at_rules(pass: &mut Pass<'_>) -> Result<(), PrefixerError> {
    let prefixes = pass.prefixes;
    for rule in pass.sheet.walk_at_rules(pass.sheet.root()) {
        let Some((name, params)) = pass
            .sheet
            .at_rule(rule)
            .map(|found| (found.name.clone(), found.params.clone()))
        else {
            continue;
        };
        match name.as_str() {
            "keyframes" | "viewport" => {
                if !control::disabled(pass, rule)
                    && let Some(handler) = prefixes.at_rule(&name)
                {
                    handler.process(pass, rule);
                }
            }
            "supports" => {
                if prefixes.options().supports && !control::disabled(pass, rule) {
                    supports::process(pass, rule)?;
                }
            }
            "media" if params.contains("-resolution") => {
                if !control::disabled(pass, rule)
                    && let Some(resolution) = prefixes.resolution()
                {
                    resolution.process(pass, rule);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn rules(pass: &mut Pass<'_>) {
    let prefixes = pass.prefixes;
    for rule in pass.sheet.walk_rules(pass.sheet.root()) {
        if control::disabled(pass, rule) {
            continue;
        }
        for selector in prefixes.selectors() {
            selector.process(pass, rule);
        }
    }
}

/// Run the handler registered for `prop`, if the plan has one.
fn run_declaration(pass: &mut Pass<'_>, decl: NodeId, prop: &str) {
    let prefixes = pass.prefixes;
    if let Some(handler) = prefixes.declaration(prop) {
        handler.process(pass, decl);
    }
}

fn declaration(pass: &mut Pass<'_>, decl: NodeId, grid_prefixes: bool) {
    if control::disabled_declaration(pass, decl) || warnings::check(pass, decl, grid_prefixes) {
        return;
    }
    let Some(prop) = pass.sheet.declaration(decl).map(|found| found.prop.clone()) else {
        return;
    };
    if transition::PROPS.contains(&prop.as_str()) {
        transition::add(pass, decl);
    }
    match prop.as_str() {
        "align-self" => {
            let flexbox = pass.prefixes.options().flexbox;
            if display_type(pass.sheet, decl) != Display::Grid && flexbox != FlexboxMode::Off {
                run_declaration(pass, decl, "align-self");
            }
            if control::grid_status(pass, decl).is_enabled() {
                run_declaration(pass, decl, "grid-row-align");
            }
        }
        "justify-self" => {
            if control::grid_status(pass, decl).is_enabled() {
                run_declaration(pass, decl, "grid-column-align");
            }
        }
        "place-self" => {
            if control::grid_status(pass, decl).is_enabled() {
                run_declaration(pass, decl, "place-self");
            }
        }
        _ => run_declaration(pass, decl, &prop),
    }
}

fn values(pass: &mut Pass<'_>) {
    let prefixes = pass.prefixes;
    for decl in pass.sheet.walk_declarations(pass.sheet.root()) {
        if control::disabled_value(pass, decl) {
            continue;
        }
        let Some(prop) = pass.sheet.declaration(decl).map(|found| found.prop.clone()) else {
            continue;
        };
        for handler in prefixes.add_values(&prefixes.unprefixed(&prop)) {
            handler.process(pass, decl);
        }
        value::save(prefixes, pass, decl);
    }
}

/// Add every prefix the plan asks for.
///
/// # Errors
/// Returns an error if an `@supports` condition cannot be rewritten.
pub fn run(pass: &mut Pass<'_>) -> Result<(), PrefixerError> {
    at_rules(pass)?;
    rules(pass);

    let root = pass.sheet.root();
    let grid_enabled = control::grid_status(pass, root).is_enabled();
    let grid_prefixes = grid_enabled && pass.prefixes.declaration("grid-area").is_some();
    for decl in pass.sheet.walk_declarations(root) {
        declaration(pass, decl, grid_prefixes);
    }

    if grid_enabled {
        grid_areas::insert_areas(pass, control::disabled);
    }

    values(pass);
    Ok(())
}
