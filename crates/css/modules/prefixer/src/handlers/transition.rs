//! `transition` and `transition-property` list the properties they animate,
//! so their values need the prefixed property names too.

use crate::options::FlexboxMode;
use crate::pass::Pass;
use crate::prefixes::Prefixes;
use crate::vendor;
use css_syntax::value::{self, ValueNode};
use css_syntax::{NodeId, Stylesheet, list};
use std::mem;

pub const PROPS: [&str; 2] = ["transition", "transition-property"];

const FLEX_LIKE: [&str; 4] = ["order", "justify-content", "align-self", "align-content"];

/// One comma-separated entry, including its trailing comma if any.
type Param = Vec<ValueNode>;

fn parse(text: &str) -> Vec<Param> {
    let mut params = Vec::new();
    let mut param = Vec::new();
    for node in value::parse(text) {
        let is_comma = node.is_div(",");
        param.push(node);
        if is_comma {
            params.push(mem::take(&mut param));
        }
    }
    params.push(param);
    params.retain(|param| !param.is_empty());
    params
}

/// The animated property: the first token, or the first word after a
/// leading duration.
fn find_prop(param: &[ValueNode]) -> &str {
    let first = param.first().map_or("", ValueNode::value);
    if first.starts_with(|letter: char| letter.is_ascii_digit()) {
        if let Some(word) = param.iter().skip(1).find(|node| node.is_word()) {
            return word.value();
        }
    }
    first
}

fn divider(params: &[Param]) -> ValueNode {
    params
        .iter()
        .flatten()
        .find(|node| node.is_div(","))
        .cloned()
        .unwrap_or_else(|| ValueNode::Div {
            value: ",".to_owned(),
            before: String::new(),
            after: " ".to_owned(),
        })
}

fn stringify(params: &[Param]) -> String {
    let separator = divider(params);
    let mut nodes: Vec<ValueNode> = Vec::new();
    for param in params {
        nodes.extend(param.iter().cloned());
        if !param.last().is_some_and(|node| matches!(node, ValueNode::Div { .. })) {
            nodes.push(separator.clone());
        }
    }
    if nodes.first().is_some_and(|node| matches!(node, ValueNode::Div { .. })) {
        nodes.remove(0);
    }
    if nodes.last().is_some_and(|node| matches!(node, ValueNode::Div { .. })) {
        nodes.pop();
    }
    value::stringify(&nodes)
}

/// `param` with its first `origin` word renamed to `name`.
fn rename(origin: &str, name: &str, param: &[ValueNode]) -> Param {
    let mut changed = false;
    param
        .iter()
        .map(|node| {
            if !changed && node.is_word() && node.value() == origin {
                changed = true;
                ValueNode::word(name)
            } else {
                node.clone()
            }
        })
        .collect()
}

fn clean_other_prefixes(params: &[Param], prefix: &str) -> Vec<Param> {
    params
        .iter()
        .filter(|param| {
            let current = vendor::prefix(find_prop(param));
            current.is_empty() || current == prefix
        })
        .cloned()
        .collect()
}

/// Keep unprefixed and `prefix` entries, dropping unprefixed entries that
/// also appear with `prefix`.
fn clean_from_unprefixed(prefixes: &Prefixes, params: &[Param], prefix: &str) -> Vec<Param> {
    let shadowed: Vec<String> = params
        .iter()
        .map(|param| find_prop(param))
        .filter(|prop| prop.starts_with(prefix))
        .map(|prop| prefixes.unprefixed(prop))
        .collect();
    params
        .iter()
        .filter(|param| {
            let prop = find_prop(param);
            let current = vendor::prefix(prop);
            !shadowed.iter().any(|name| name == prop) && (current == prefix || current.is_empty())
        })
        .cloned()
        .collect()
}

fn disabled(prefixes: &Prefixes, prop: &str, prefix: &str) -> bool {
    if !(prop.contains("flex") || FLEX_LIKE.contains(&prop)) {
        return false;
    }
    match prefixes.options().flexbox {
        FlexboxMode::Off => true,
        FlexboxMode::No2009 => prefix.contains("2009"),
        FlexboxMode::All => false,
    }
}

/// Vendors named by the pseudo-classes of the enclosing rule.
fn rule_vendor_prefixes(pass: &Pass<'_>, decl: NodeId) -> Option<Vec<String>> {
    let parent = pass.sheet.parent(decl)?;
    let selector = &pass.sheet.rule(parent)?.selector;
    if !selector.contains(":-") {
        return None;
    }
    let found: Vec<String> = pass
        .prefixes
        .browsers()
        .all_prefixes()
        .iter()
        .filter(|prefix| selector.contains(format!(":{prefix}").as_str()))
        .cloned()
        .collect();
    (!found.is_empty()).then_some(found)
}

fn already(sheet: &Stylesheet, decl: NodeId, prop: &str, value: &str) -> bool {
    sheet
        .parent(decl)
        .is_some_and(|parent| sheet.some_declaration(parent, |other| other.prop == prop && other.value == value))
}

fn clone_before(sheet: &mut Stylesheet, decl: NodeId, prop: String, value: String) {
    if already(sheet, decl, &prop, &value) {
        return;
    }
    sheet.clone_before(decl, |node| {
        if let Some(copy) = node.as_declaration_mut() {
            copy.prop = prop;
            copy.value = value;
        }
    });
}

/// `transition-property` next to other comma-listed `transition-*`
/// properties cannot be kept in sync.
fn check_for_warning(pass: &mut Pass<'_>, decl: NodeId) {
    if pass.sheet.declaration(decl).is_none_or(|found| found.prop != "transition-property") {
        return;
    }
    let Some(parent) = pass.sheet.parent(decl) else {
        return;
    };
    let mut is_prefixed = false;
    let mut has_associated = false;
    for child in pass.sheet.children(parent) {
        let Some(other) = pass.sheet.declaration(child) else {
            continue;
        };
        if !other.prop.starts_with("transition-") {
            continue;
        }
        let values = list::comma(&other.value);
        if other.prop == "transition-property" {
            is_prefixed |= values.iter().any(|name| {
                pass.prefixes
                    .declaration_prefixes(name)
                    .is_some_and(|prefixes| !prefixes.is_empty())
            });
            continue;
        }
        has_associated |= values.len() > 1;
        break;
    }
    if is_prefixed && has_associated {
        pass.warn(
            decl,
            "Replace transition-property to transition, because Autoprefixer could not support any cases of transition-property and other transition-*",
        );
    }
}

/// Add prefixed property names to the list and prefixed copies of the
/// declaration itself.
pub fn add(pass: &mut Pass<'_>, decl: NodeId) {
    let prefixes = pass.prefixes;
    let Some((prop, original)) = pass
        .sheet
        .declaration(decl)
        .map(|found| (found.prop.clone(), found.value.clone()))
    else {
        return;
    };
    let vendor_prefixes = rule_vendor_prefixes(pass, decl);
    let decl_prefixes: Vec<String> = vendor_prefixes.clone().unwrap_or_else(|| {
        prefixes
            .declaration_prefixes(&prop)
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    });

    let mut params = parse(&original);
    let names: Vec<String> = params.iter().map(|param| find_prop(param).to_owned()).collect();
    if names.iter().any(|name| name.starts_with('-')) {
        return;
    }

    let mut added = Vec::new();
    for param in &params {
        let name = find_prop(param);
        let Some(planned) = prefixes.declaration_prefixes(name) else {
            continue;
        };
        for prefix in planned {
            if let Some(scoped) = &vendor_prefixes
                && !scoped.iter().any(|vendor| prefix.contains(vendor.as_str()))
            {
                continue;
            }
            let prefixed = prefixes.prefixed(name, prefix);
            if prefixed != "-ms-transform"
                && !names.contains(&prefixed)
                && !disabled(prefixes, name, prefix)
            {
                added.push(rename(name, &prefixed, param));
            }
        }
    }
    params.extend(added);
    let rewritten = stringify(&params);

    let webkit_clean = stringify(&clean_from_unprefixed(prefixes, &params, "-webkit-"));
    if decl_prefixes.iter().any(|prefix| prefix == "-webkit-") {
        clone_before(pass.sheet, decl, format!("-webkit-{prop}"), webkit_clean.clone());
    }
    clone_before(pass.sheet, decl, prop.clone(), webkit_clean);
    if decl_prefixes.iter().any(|prefix| prefix == "-o-") {
        let opera_clean = stringify(&clean_from_unprefixed(prefixes, &params, "-o-"));
        clone_before(pass.sheet, decl, format!("-o-{prop}"), opera_clean);
    }
    for prefix in &decl_prefixes {
        if prefix != "-webkit-" && prefix != "-o-" {
            let cleaned = stringify(&clean_other_prefixes(&params, prefix));
            clone_before(pass.sheet, decl, format!("{prefix}{prop}"), cleaned);
        }
    }

    if rewritten != original && !already(pass.sheet, decl, &prop, &rewritten) {
        check_for_warning(pass, decl);
        pass.sheet.clone_before(decl, |_| {});
        if let Some(found) = pass.sheet.declaration_mut(decl) {
            found.value = rewritten;
        }
    }
}

/// Drop list entries for prefixed properties no browser needs.
pub fn remove(pass: &mut Pass<'_>, decl: NodeId) {
    let prefixes = pass.prefixes;
    let Some((prop, original)) = pass
        .sheet
        .declaration(decl)
        .map(|found| (found.prop.clone(), found.value.clone()))
    else {
        return;
    };
    let mut params = parse(&original);
    params.retain(|param| !prefixes.removes(find_prop(param)));
    let cleaned = stringify(&params);
    if cleaned == original {
        return;
    }
    if params.is_empty() {
        pass.sheet.remove(decl);
        return;
    }
    let Some(parent) = pass.sheet.parent(decl) else {
        return;
    };
    let double = pass
        .sheet
        .some_declaration(parent, |other| other.prop == prop && other.value == cleaned);
    let smaller = pass.sheet.child_declarations(parent).into_iter().any(|other| {
        other != decl
            && pass
                .sheet
                .declaration(other)
                .is_some_and(|found| found.prop == prop && found.value.len() > cleaned.len())
    });
    if double || smaller {
        pass.sheet.remove(decl);
        return;
    }
    if let Some(found) = pass.sheet.declaration_mut(decl) {
        found.value = cleaned;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_before_the_property_are_skipped() {
        let params = parse("1s transform, opacity 2s");
        let names: Vec<&str> = params.iter().map(|param| find_prop(param)).collect();
        assert_eq!(names, ["transform", "opacity"]);
    }

    #[test]
    fn stringify_reuses_the_original_separator() {
        let mut params = parse("transform 1s,opacity 2s");
        params.push(rename("opacity", "-webkit-opacity", &parse("opacity 2s")[0]));
        assert_eq!(stringify(&params), "transform 1s,opacity 2s,-webkit-opacity 2s");
    }

    #[test]
    fn other_vendors_are_filtered_out() {
        let params = parse("-moz-transform 1s, -webkit-transform 1s, color 1s");
        let kept = clean_other_prefixes(&params, "-moz-");
        assert_eq!(stringify(&kept), "-moz-transform 1s, color 1s");
    }
}
