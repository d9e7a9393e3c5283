//! Explicit `-ms-grid-row`/`-ms-grid-column` cells for `grid-area` items,
//! looked up from every `grid-template(-areas)` in the sheet.

use super::grid_utils::{
    Area, Areas, get_grid_gap, get_parent_media, inherit_grid_gap, is_template_prop, parse_template,
};
use crate::pass::Pass;
use css_syntax::{Node, NodeId, Stylesheet, list};

/// One template rule that defines some of a group's areas.
struct TemplateRule {
    has_duplicates: bool,
    params: Option<String>,
    selectors: Vec<String>,
    node: NodeId,
    duplicate_area_names: Vec<String>,
    areas: Areas,
}

/// Templates sharing area names.
struct TemplateGroup {
    all_areas: Vec<String>,
    rules: Vec<TemplateRule>,
}

/// Where the cells for one group go: after `last_rule`, plus copies
/// waiting for a `@media` block with the given params.
#[derive(Default)]
struct Pending {
    last_rule: Option<NodeId>,
    media: Vec<(String, Vec<NodeId>)>,
}

fn selectors_equal(first: &[String], second: &[String]) -> bool {
    first.iter().any(|selector| second.contains(selector))
}

fn rule_selectors(sheet: &Stylesheet, rule: NodeId) -> Vec<String> {
    sheet
        .rule(rule)
        .map(|found| list::comma(&found.selector))
        .unwrap_or_default()
}

fn media_params(sheet: &Stylesheet, node: NodeId) -> Option<String> {
    get_parent_media(sheet, node)
        .and_then(|media| sheet.at_rule(media))
        .map(|media| media.params.clone())
}

fn parse_templates(sheet: &Stylesheet) -> Vec<TemplateGroup> {
    let mut parsed: Vec<TemplateGroup> = Vec::new();
    for decl in sheet.walk_declarations(sheet.root()) {
        let Some(found) = sheet.declaration(decl) else {
            continue;
        };
        if !is_template_prop(&found.prop) {
            continue;
        }
        let Some(rule) = sheet.parent(decl) else {
            continue;
        };
        let gap = get_grid_gap(sheet, decl);
        let inherited = inherit_grid_gap(sheet, decl, &gap);
        let areas = parse_template(&found.value, inherited.as_ref().unwrap_or(&gap)).areas;
        let names = areas.names();
        if names.is_empty() {
            continue;
        }
        let params = media_params(sheet, rule);
        let selectors = rule_selectors(sheet, rule);
        let index = parsed
            .iter()
            .rposition(|group| names.iter().any(|name| group.all_areas.contains(name)));
        let Some(group) = index.and_then(|index| parsed.get_mut(index)) else {
            parsed.push(TemplateGroup {
                all_areas: names,
                rules: vec![TemplateRule {
                    has_duplicates: false,
                    params,
                    selectors,
                    node: rule,
                    duplicate_area_names: Vec::new(),
                    areas,
                }],
            });
            continue;
        };
        let has_no_duplicates = group
            .rules
            .iter()
            .any(|known| !known.has_duplicates && selectors_equal(&known.selectors, &selectors));
        let mut duplicates_found = false;
        let mut duplicate_area_names: Vec<String> = Vec::new();
        for known in &group.rules {
            if known.params.is_none() && selectors_equal(&known.selectors, &selectors) {
                duplicates_found = true;
                duplicate_area_names.clone_from(&known.duplicate_area_names);
                continue;
            }
            if !duplicates_found {
                for name in &names {
                    if known.areas.get(name).is_some() && !duplicate_area_names.contains(name) {
                        duplicate_area_names.push(name.clone());
                    }
                }
            }
        }
        let mut areas = areas;
        for known in &group.rules {
            for name in &names {
                let (Some(previous), Some(current)) = (known.areas.get(name), areas.get_mut(name)) else {
                    continue;
                };
                if previous.row.span != current.row.span {
                    current.row.update_span = true;
                }
                if previous.column.span != current.column.span {
                    current.column.update_span = true;
                }
            }
        }
        for name in names {
            if !group.all_areas.contains(&name) {
                group.all_areas.push(name);
            }
        }
        group.rules.push(TemplateRule {
            has_duplicates: !has_no_duplicates,
            params,
            selectors,
            node: rule,
            duplicate_area_names,
            areas,
        });
    }
    parsed
}

/// `-ms-grid-row`, `-ms-grid-row-span`, `-ms-grid-column` and
/// `-ms-grid-column-span` for an area. Spans of one are left out unless
/// forced.
fn ms_declarations(area: &Area, add_row_span: bool, add_column_span: bool) -> Vec<(&'static str, String)> {
    let mut result = vec![("-ms-grid-row", area.row.start.to_string())];
    if area.row.span > 1 || add_row_span {
        result.push(("-ms-grid-row-span", area.row.span.to_string()));
    }
    result.push(("-ms-grid-column", area.column.start.to_string()));
    if area.column.span > 1 || add_column_span {
        result.push(("-ms-grid-column-span", area.column.span.to_string()));
    }
    result
}

/// Template-scoped selectors for an item whose area name is defined by
/// several templates: `.a > .item, .b > .item`.
fn change_duplicate_area_selectors(rule_selectors: &[String], template_selectors: &[String]) -> String {
    rule_selectors
        .iter()
        .map(|selector| {
            let by_space = list::space(selector);
            let item = if by_space.len() > list::comma(selector).len() {
                by_space.last().cloned().unwrap_or_default()
            } else {
                selector.clone()
            };
            template_selectors
                .iter()
                .enumerate()
                .map(|(index, template)| {
                    let space = if index == 0 { "" } else { " " };
                    format!("{space}{template} > {item}")
                })
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn prepend_cells(sheet: &mut Stylesheet, rule: NodeId, cells: Vec<(&'static str, String)>, sample: &Node) {
    for (prop, value) in cells.into_iter().rev() {
        let mut node = Node::declaration(prop, value).with_before(sample.raws.before.clone());
        node.raws.between.clone_from(&sample.raws.between);
        sheet.prepend(rule, node);
    }
}

/// A copy of `rule` holding only the given cells.
fn cell_rule(sheet: &mut Stylesheet, rule: NodeId, cells: Vec<(&'static str, String)>, sample: &Node) -> Option<NodeId> {
    let copy = sheet.clone_subtree(rule)?;
    sheet.remove_children(copy);
    prepend_cells(sheet, copy, cells, sample);
    Some(copy)
}

fn pending_for<'pending>(pending: &'pending mut Vec<(String, Pending)>, area: &str) -> Option<&'pending mut Pending> {
    if !pending.iter().any(|(known, _)| known == area) {
        pending.push((area.to_owned(), Pending::default()));
    }
    pending.iter_mut().find(|(known, _)| known == area).map(|(_, entry)| entry)
}

fn set_selector(sheet: &mut Stylesheet, rule: NodeId, selector: String) {
    if let Some(found) = sheet.rule_mut(rule) {
        found.selector = selector;
    }
}

/// Add IE cell placement for every `grid-area` whose name a template
/// defines. `is_disabled` reports items switched off by control comments.
pub fn insert_areas(pass: &mut Pass<'_>, mut is_disabled: impl FnMut(&mut Pass<'_>, NodeId) -> bool) {
    let groups = parse_templates(pass.sheet);
    if groups.is_empty() {
        return;
    }
    let mut pending: Vec<(String, Pending)> = Vec::new();
    let root = pass.sheet.root();
    for grid_area in pass.sheet.walk_declarations(root) {
        let Some(sample) = pass.sheet.get(grid_area).cloned() else {
            continue;
        };
        let Some(area_name) = sample.as_declaration().filter(|found| found.prop == "grid-area").map(|found| found.value.clone())
        else {
            continue;
        };
        let Some(rule) = pass.sheet.parent(grid_area) else {
            continue;
        };
        let Some(selector) = pass.sheet.rule(rule).map(|found| found.selector.clone()) else {
            continue;
        };
        let has_prefixed_row = pass
            .sheet
            .first_child(rule)
            .and_then(|first| pass.sheet.declaration(first))
            .is_some_and(|first| first.prop == "-ms-grid-row");
        let area_media = get_parent_media(pass.sheet, rule);
        if is_disabled(pass, grid_area) {
            continue;
        }
        let anchor = area_media.unwrap_or(rule);
        let rule_index = pass.sheet.index(anchor);
        let Some(group) = groups.iter().find(|group| group.all_areas.contains(&area_name)) else {
            continue;
        };
        let Some(last_area) = group.all_areas.last() else {
            continue;
        };
        let by_space = list::space(&selector);
        let selector_is_complex = by_space.len() > 1 && by_space.len() > list::comma(&selector).len();
        if has_prefixed_row {
            break;
        }
        let Some(entry) = pending_for(&mut pending, last_area) else {
            continue;
        };
        let mut last_rule_is_set = false;
        for template in &group.rules {
            let Some(area) = template.areas.get(&area_name) else {
                let last_index = entry.last_rule.map(|last| pass.sheet.index(last));
                if last_index.is_none_or(|last_index| rule_index > last_index) {
                    entry.last_rule = Some(anchor);
                }
                continue;
            };
            let has_duplicate_name = template.duplicate_area_names.contains(&area_name);
            if let Some(params) = &template.params
                && !entry.media.iter().any(|(known, _)| known == params)
            {
                entry.media.push((params.clone(), Vec::new()));
            }
            let forced = ms_declarations(area, area.row.update_span, area.column.update_span);
            if (!template.has_duplicates || !has_duplicate_name) && template.params.is_none() {
                prepend_cells(pass.sheet, rule, ms_declarations(area, false, false), &sample);
                entry.last_rule = Some(rule);
                last_rule_is_set = true;
            } else if template.has_duplicates && template.params.is_none() && !selector_is_complex {
                let Some(copy) = cell_rule(pass.sheet, rule, forced, &sample) else {
                    continue;
                };
                let scoped = change_duplicate_area_selectors(&rule_selectors(pass.sheet, rule), &template.selectors);
                set_selector(pass.sheet, copy, scoped);
                pass.sheet.attach_after(entry.last_rule.unwrap_or(anchor), copy);
                entry.last_rule = Some(copy);
                last_rule_is_set = true;
            } else if template.has_duplicates
                && template.params.is_none()
                && selector_is_complex
                && template.selectors.first().is_some_and(|first| selector.contains(first.as_str()))
            {
                for child in pass.sheet.walk_declarations(rule) {
                    let placed = pass.sheet.declaration(child).is_some_and(|found| {
                        found.prop.contains("-ms-grid-row") || found.prop.contains("-ms-grid-column")
                    });
                    if placed {
                        pass.sheet.remove(child);
                    }
                }
                prepend_cells(pass.sheet, rule, forced, &sample);
            } else if let Some(params) = &template.params {
                let Some(copy) = cell_rule(pass.sheet, rule, forced, &sample) else {
                    continue;
                };
                if template.has_duplicates && has_duplicate_name {
                    let scoped = change_duplicate_area_selectors(&rule_selectors(pass.sheet, rule), &template.selectors);
                    set_selector(pass.sheet, copy, scoped);
                }
                if let Some(raws) = pass.sheet.raws(template.node).cloned()
                    && let Some(copy_raws) = pass.sheet.raws_mut(copy)
                {
                    *copy_raws = raws;
                }
                let template_parent = pass.sheet.parent(template.node);
                match template_parent {
                    Some(parent) if pass.sheet.index(parent) > rule_index => pass.sheet.attach_append(parent, copy),
                    _ => {
                        if let Some((_, waiting)) = entry.media.iter_mut().find(|(known, _)| known == params) {
                            waiting.push(copy);
                        }
                    }
                }
                if !last_rule_is_set {
                    entry.last_rule = Some(anchor);
                }
            }
        }
    }
    for (_, entry) in pending {
        let Some(last_rule) = entry.last_rule else {
            continue;
        };
        let before = pass
            .sheet
            .raws(last_rule)
            .map(|raws| raws.before.chars().filter(|letter| letter.is_whitespace()).collect::<String>())
            .unwrap_or_default();
        for (params, rules) in entry.media.into_iter().rev() {
            if rules.is_empty() {
                continue;
            }
            let mut media = Node::at_rule("media", params).with_before(before.clone());
            if before.contains('\n') {
                media.raws.after = "\n".to_owned();
            }
            let block = pass.sheet.insert_after(last_rule, media);
            for copy in rules {
                pass.sheet.attach_append(block, copy);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefixes::Prefixes;

    fn run(css: &str) -> String {
        let prefixes = Prefixes::for_tests(&["ie 11"]);
        let mut sheet = Stylesheet::parse(css);
        let mut pass = Pass::new(&mut sheet, &prefixes);
        insert_areas(&mut pass, |_, _| false);
        sheet.to_css()
    }

    #[test]
    fn items_get_cells_from_the_template() {
        let out = run(".grid { grid-template-areas: \"head head\" \"nav main\" } .nav { grid-area: nav }");
        assert!(out.contains("-ms-grid-row: 2"));
        assert!(out.contains("-ms-grid-column: 1"));
        assert!(!out.contains("-ms-grid-row-span"));
        let head = run(".grid { grid-template-areas: \"head head\" } .head { grid-area: head }");
        assert!(head.contains("-ms-grid-column-span: 2"));
    }

    #[test]
    fn duplicate_names_are_scoped_by_template() {
        let out = run(concat!(
            ".a { grid-template-areas: \"x y\" } ",
            ".b { grid-template-areas: \"y x\" } ",
            ".item { grid-area: x }"
        ));
        assert!(out.contains(".b > .item"));
    }

    #[test]
    fn scoped_selectors_follow_every_template() {
        assert_eq!(
            change_duplicate_area_selectors(&[".main .item".to_owned()], &[".a".to_owned(), ".b".to_owned()]),
            ".a > .item, .b > .item"
        );
    }
}
