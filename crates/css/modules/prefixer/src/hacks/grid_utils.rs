//! Shared machinery for translating CSS Grid into the IE 10-11 `-ms-grid`
//! model: explicit line numbers, spans and gap tracks.

use crate::pass::Pass;
use css_syntax::value::{self, ValueNode};
use css_syntax::{Node, NodeId, Stylesheet, list};
use once_cell::sync::Lazy;
use regex::Regex;
use std::iter;

static LINE_NAMES: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\[.+]$").ok());
static GAP_PROP: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^(grid-)?((row|column)-)?gap$").ok());
static GAP_SHORTHAND: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^(grid-)?gap$").ok());
static ROW_GAP: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^(grid-)?row-gap$").ok());
static COLUMN_GAP: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^(grid-)?column-gap$").ok());

fn matches(pattern: &Lazy<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|regex| regex.is_match(text))
}

/// Leading integer of `text`, the way `parseInt` reads it.
pub fn parse_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let digits_from = usize::from(trimmed.starts_with(['-', '+']));
    let digits = trimmed
        .get(digits_from..)
        .unwrap_or_default()
        .chars()
        .take_while(char::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    trimmed.get(..digits_from + digits)?.parse().ok()
}

/// Row and column gaps in effect for a grid container.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Gap {
    pub row: Option<String>,
    pub column: Option<String>,
}

impl Gap {
    pub fn is_empty(&self) -> bool {
        self.row.is_none() && self.column.is_none()
    }
}

/// A line range. `update_span` forces an explicit span declaration when
/// another template gives the same area a different size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Track {
    pub start: i64,
    pub end: i64,
    pub span: i64,
    pub update_span: bool,
}

impl Track {
    const fn new(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            span: end - start,
            update_span: false,
        }
    }

    fn widen(&mut self, start: i64, end: i64) {
        self.start = self.start.min(start);
        self.end = self.end.max(end);
        self.span = self.end - self.start;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Area {
    pub row: Track,
    pub column: Track,
}

/// Named areas in the order they first appear.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Areas(Vec<(String, Area)>);

impl Areas {
    pub fn get(&self, name: &str) -> Option<&Area> {
        self.0.iter().find(|(known, _)| known == name).map(|(_, area)| area)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Area> {
        self.0.iter_mut().find(|(known, _)| known == name).map(|(_, area)| area)
    }

    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &(String, Area)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// `(start, span)` for the IE line model from two slash-separated groups:
/// `2 / 4`, `span 2 / 5` or `2 / span 3`.
pub fn translate(values: &[Vec<String>], start_index: usize, end_index: usize) -> (Option<i64>, Option<i64>) {
    fn convert(value: Option<&Vec<String>>) -> (Option<i64>, Option<i64>) {
        match value.map(Vec::as_slice) {
            Some([keyword, count]) if keyword == "span" => (None, parse_int(count).filter(|count| *count > 0)),
            Some([line]) => (parse_int(line).filter(|line| *line > 0), None),
            _ => (None, None),
        }
    }
    let start_value = values.get(start_index);
    let end_value = values.get(end_index);
    if start_value.is_none() {
        return (None, None);
    }
    let (start, span_start) = convert(start_value);
    let (end, span_end) = convert(end_value);
    match (start, span_start, end, span_end) {
        (Some(start), ..) if end_value.is_none() => (Some(start), None),
        (_, Some(span), Some(end), _) => (Some(end - span), Some(span)),
        (Some(start), _, _, Some(span)) => (Some(start), Some(span)),
        (Some(start), _, Some(end), _) => (Some(start), Some(end - start)),
        _ => (None, None),
    }
}

/// Words of a value grouped by the dividers between them.
pub fn parse(text: &str) -> Vec<Vec<String>> {
    let mut groups = vec![Vec::new()];
    for node in value::parse(text) {
        match node {
            ValueNode::Div { .. } => groups.push(Vec::new()),
            ValueNode::Word(word) => {
                if let Some(group) = groups.last_mut() {
                    group.push(word);
                }
            }
            _ => {}
        }
    }
    groups
}

/// Add `-ms-{prop}: {value}` before `decl` unless the rule already has it.
/// A zero or missing value adds nothing.
pub fn insert_decl(pass: &mut Pass<'_>, decl: NodeId, prop: &str, value: Option<i64>) {
    if let Some(value) = value.filter(|value| *value != 0) {
        insert_keyword(pass, decl, prop, &value.to_string());
    }
}

/// [`insert_decl`] for keyword values such as `center`.
pub fn insert_keyword(pass: &mut Pass<'_>, decl: NodeId, prop: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    let prefixed = format!("-ms-{prop}");
    let Some(parent) = pass.sheet.parent(decl) else {
        return;
    };
    if pass.sheet.some_declaration(parent, |other| other.prop == prefixed) {
        return;
    }
    pass.sheet.clone_before(decl, |node| {
        if let Some(copy) = node.as_declaration_mut() {
            copy.prop = prefixed;
            copy.value = value.to_owned();
        }
    });
}

/// `grid-template-rows` becomes `-ms-grid-rows`.
pub fn prefix_track_prop(prop: &str, prefix: &str) -> String {
    format!("{prefix}{}", prop.replacen("template-", "", 1))
}

/// `repeat(2, 1fr)` as `(1fr)[2]`, or spelled out with gap tracks.
fn transform_repeat(nodes: &[ValueNode], gap: Option<&str>) -> String {
    let mut count = String::new();
    let mut size: Vec<String> = Vec::new();
    let mut in_size = false;
    for node in nodes {
        if node.is_div(",") {
            in_size = true;
        } else if in_size {
            size.push(node.to_css());
        } else {
            count.push_str(&node.to_css());
        }
    }
    let Some(gap) = gap else {
        return format!("({})[{count}]", size.concat());
    };
    let size: Vec<String> = size.into_iter().filter(|item| !item.trim().is_empty()).collect();
    let times = count.trim().parse::<usize>().unwrap_or(0);
    let mut tracks: Vec<&str> = Vec::new();
    for round in 1..=times {
        for (index, item) in size.iter().enumerate() {
            if index > 0 || round > 1 {
                tracks.push(gap);
            }
            tracks.push(item);
        }
    }
    tracks.join(" ")
}

/// Track list in IE syntax, with a gap track between every two tracks.
pub fn prefix_track_value(text: &str, gap: Option<&str>) -> String {
    let mut result: Vec<ValueNode> = Vec::new();
    for node in value::parse(text) {
        if let ValueNode::Function { name, nodes, .. } = &node
            && name == "repeat"
        {
            result.push(ValueNode::word(transform_repeat(nodes, gap)));
            continue;
        }
        if let Some(gap) = gap
            && node.is_space()
        {
            result.push(ValueNode::space());
            result.push(ValueNode::word(gap));
        }
        result.push(node);
    }
    value::stringify(&result)
}

fn is_dots(area: &str) -> bool {
    !area.is_empty() && area.chars().all(|letter| letter == '.')
}

/// Line ranges of every named area in `grid-template-areas` rows. With
/// gaps, every other line is a gap track.
pub fn parse_grid_areas(rows: &[String], gap: &Gap) -> Areas {
    let mut areas = Areas::default();
    for (index, line) in rows.iter().enumerate() {
        let row_index = (if gap.row.is_some() { index * 2 } else { index }) as i64;
        if line.trim().is_empty() {
            continue;
        }
        for (position, area) in line.split_whitespace().enumerate() {
            if is_dots(area) {
                continue;
            }
            let column_index = (if gap.column.is_some() { position * 2 } else { position }) as i64;
            if let Some(known) = areas.get_mut(area) {
                known.column.widen(column_index + 1, column_index + 2);
                known.row.widen(row_index + 1, row_index + 2);
            } else {
                areas.0.push((
                    area.to_owned(),
                    Area {
                        column: Track::new(column_index + 1, column_index + 2),
                        row: Track::new(row_index + 1, row_index + 2),
                    },
                ));
            }
        }
    }
    areas
}

/// A `grid-template` or `grid-template-areas` value in IE terms.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Template {
    pub areas: Areas,
    pub rows: String,
    pub columns: String,
}

pub fn parse_template(text: &str, gap: &Gap) -> Template {
    fn verify_row_size(rows: &mut Vec<String>, areas: &[String]) {
        if areas.len() > rows.len() {
            rows.push("auto".to_owned());
        }
    }
    let mut rows: Vec<String> = Vec::new();
    let mut columns: Vec<String> = Vec::new();
    let mut area_rows: Vec<String> = Vec::new();
    let mut in_columns = false;
    for node in value::parse(text) {
        match &node {
            ValueNode::Space(_) => {}
            ValueNode::Word(word) if matches(&LINE_NAMES, word) => {}
            ValueNode::Str { value: area, .. } => {
                verify_row_size(&mut rows, &area_rows);
                area_rows.push(area.clone());
            }
            ValueNode::Word(_) | ValueNode::Function { .. } => {
                if in_columns {
                    columns.push(node.to_css());
                } else {
                    rows.push(node.to_css());
                }
            }
            ValueNode::Div { value: divider, .. } if divider == "/" => {
                in_columns = true;
                verify_row_size(&mut rows, &area_rows);
            }
            _ => {}
        }
    }
    Template {
        areas: parse_grid_areas(&area_rows, gap),
        columns: prefix_track_value(&columns.join(" "), gap.column.as_deref()),
        rows: prefix_track_value(&rows.join(" "), gap.row.as_deref()),
    }
}

/// The closest `@media` at-rule containing `node`, `node` included.
pub fn get_parent_media(sheet: &Stylesheet, node: NodeId) -> Option<NodeId> {
    iter::once(node)
        .chain(sheet.ancestors(node))
        .find(|id| sheet.at_rule(*id).is_some_and(|at_rule| at_rule.name == "media"))
}

/// Gaps declared in the rule holding `decl`.
pub fn get_grid_gap(sheet: &Stylesheet, decl: NodeId) -> Gap {
    let mut gap = Gap::default();
    let Some(parent) = sheet.parent(decl) else {
        return gap;
    };
    for id in sheet.walk_declarations(parent) {
        let Some(found) = sheet.declaration(id) else {
            continue;
        };
        if !matches(&GAP_PROP, &found.prop) {
            continue;
        }
        if matches(&GAP_SHORTHAND, &found.prop) {
            let nodes = value::parse(&found.value);
            gap.row = nodes.first().map(ValueNode::to_css);
            gap.column = nodes.get(2).map(ValueNode::to_css).or_else(|| gap.row.clone());
        }
        if matches(&ROW_GAP, &found.prop) {
            gap.row = Some(found.value.clone());
        }
        if matches(&COLUMN_GAP, &found.prop) {
            gap.column = Some(found.value.clone());
        }
    }
    gap
}

/// The `min-*`/`max-*` feature a media query tests.
fn parse_media_params(params: &str) -> Option<String> {
    fn visit(nodes: &[ValueNode], prop: &mut Option<String>) {
        for node in nodes {
            if let ValueNode::Word(word) = node
                && (word.contains("min") || word.contains("max"))
            {
                *prop = Some(word.clone());
            }
            visit(node.nodes(), prop);
        }
    }
    let mut prop = None;
    visit(&value::parse(params), &mut prop);
    prop
}

/// Comma parts, split by spaces, split before every `.` and `#`.
pub fn split_selector(selector: &str) -> Vec<Vec<Vec<String>>> {
    list::comma(selector)
        .iter()
        .map(|part| {
            list::space(part)
                .iter()
                .map(|compound| {
                    let mut pieces: Vec<String> = Vec::new();
                    let mut current = String::new();
                    for letter in compound.chars() {
                        if (letter == '.' || letter == '#') && !current.is_empty() {
                            pieces.push(current.clone());
                            current.clear();
                        }
                        current.push(letter);
                    }
                    pieces.push(current);
                    pieces
                })
                .collect()
        })
        .collect()
}

fn same_parts(shorter: &[Vec<String>], longer: &[Vec<String>]) -> bool {
    shorter.iter().enumerate().all(|(index, parts)| {
        parts
            .iter()
            .enumerate()
            .all(|(inner, part)| longer.get(index).and_then(|found| found.get(inner)) == Some(part))
    })
}

/// Whether a rule with `current` may take the gap of a rule with `other`.
fn should_inherit_gap(current: &str, other: &str) -> bool {
    let current = split_selector(current);
    let other = split_selector(other);
    let (Some(first), Some(other_first)) = (current.first(), other.first()) else {
        return false;
    };
    if first.len() < other_first.len() {
        return false;
    }
    if first.len() > other_first.len() {
        let head = other_first.first().and_then(|parts| parts.first());
        let last = first.len() - 1;
        let matches_head = first.last().and_then(|parts| parts.first()) == head;
        if !matches_head || last == 0 {
            return false;
        }
        return same_parts(other_first, first.get(last..).unwrap_or_default());
    }
    other.iter().any(|by_comma| same_parts(by_comma, first))
}

/// Gaps of the closest earlier rule the container extends, when it sets
/// none itself.
pub fn inherit_grid_gap(sheet: &Stylesheet, decl: NodeId, gap: &Gap) -> Option<Gap> {
    if !gap.is_empty() {
        return None;
    }
    let rule = sheet.parent(decl)?;
    let selector = sheet.rule(rule)?.selector.clone();
    let media_prop = get_parent_media(sheet, rule)
        .and_then(|media| sheet.at_rule(media))
        .and_then(|media| parse_media_params(&media.params));
    let split = split_selector(&selector);
    let last_compound = split.first()?.last()?.first()?;
    let escaped = regex::escape(last_compound);
    let pattern = Regex::new(&format!(r"({escaped}$)|({escaped}[,.])")).ok()?;
    let own_css = sheet.node_to_css(rule);
    let mut closest: Option<Gap> = None;
    for other in sheet.walk_rules(sheet.root()) {
        let Some(other_rule) = sheet.rule(other) else {
            continue;
        };
        if !pattern.is_match(&other_rule.selector) {
            continue;
        }
        if other == rule || sheet.node_to_css(other) == own_css {
            break;
        }
        let found = sheet
            .walk_declarations(other)
            .into_iter()
            .filter(|id| sheet.declaration(*id).is_some_and(|found| found.prop == "grid-gap"))
            .map(|id| get_grid_gap(sheet, id))
            .last();
        let Some(found) = found.filter(|found| !found.is_empty()) else {
            continue;
        };
        if !should_inherit_gap(&selector, &other_rule.selector) {
            continue;
        }
        match get_parent_media(sheet, other).and_then(|media| sheet.at_rule(media)) {
            Some(media) if parse_media_params(&media.params) != media_prop => {}
            _ => closest = Some(found),
        }
    }
    closest
}

/// Gaps need explicit columns to become tracks.
pub fn warn_grid_gap(pass: &mut Pass<'_>, decl: NodeId, gap: &mut Gap, has_columns: bool) {
    if !has_columns && gap.column.is_some() {
        gap.column = None;
        pass.warn(decl, "Can not implement grid-gap without grid-template-columns");
    }
}

/// Warn about template areas no `grid-area` in the sheet refers to.
pub fn warn_missed_areas(pass: &mut Pass<'_>, decl: NodeId, areas: &Areas) {
    let used: Vec<String> = pass
        .sheet
        .walk_declarations(pass.sheet.root())
        .into_iter()
        .filter_map(|id| pass.sheet.declaration(id))
        .filter(|found| found.prop == "grid-area")
        .map(|found| found.value.clone())
        .collect();
    let missed: Vec<String> = areas.names().into_iter().filter(|name| !used.contains(name)).collect();
    if !missed.is_empty() {
        pass.warn(decl, format!("Can not find grid areas: {}", missed.join(", ")));
    }
}

pub fn is_template_prop(prop: &str) -> bool {
    prop.ends_with("grid-template") || prop.ends_with("grid-template-areas")
}

/// Warn when a nested `grid-area` names an area defined by several
/// templates and none of them matches the selector's ancestors.
pub fn warn_template_selector_not_found(pass: &mut Pass<'_>, decl: NodeId) {
    let sheet = &*pass.sheet;
    let Some(area_name) = sheet.declaration(decl).map(|found| found.value.clone()) else {
        return;
    };
    let Some(selector) = sheet.parent(decl).and_then(|rule| sheet.rule(rule)).map(|rule| rule.selector.clone())
    else {
        return;
    };
    let mut ancestors: Vec<String> = list::space(&selector).into_iter().filter(|part| part != ">").collect();
    if ancestors.pop().is_none() || ancestors.is_empty() {
        return;
    }
    let mut template_found = false;
    let mut found_selector: Option<String> = None;
    let mut duplicates_found = false;
    for id in sheet.walk_declarations(sheet.root()) {
        let Some(found) = sheet.declaration(id).filter(|found| is_template_prop(&found.prop)) else {
            continue;
        };
        let Some(template_selector) = sheet.parent(id).and_then(|rule| sheet.rule(rule)).map(|rule| rule.selector.clone())
        else {
            continue;
        };
        let has_area = parse_template(&found.value, &get_grid_gap(sheet, id))
            .areas
            .get(&area_name)
            .is_some();
        for part in list::comma(&template_selector) {
            if template_found {
                break;
            }
            template_found = list::space(&part)
                .into_iter()
                .filter(|item| item != ">")
                .enumerate()
                .all(|(index, item)| ancestors.get(index) == Some(&item));
        }
        if template_found || !has_area {
            continue;
        }
        let first = found_selector.get_or_insert_with(|| template_selector.clone());
        if *first != template_selector {
            duplicates_found = true;
        }
    }
    if !template_found && duplicates_found {
        pass.warn(
            decl,
            format!(
                "Autoprefixer cannot find a grid-template containing the duplicate grid-area \"{area_name}\" with full selector matching: {}",
                ancestors.join(" ")
            ),
        );
    }
}

/// `grid-area` and explicit row or column placement fight each other.
pub fn warn_if_grid_row_column_exists(pass: &mut Pass<'_>, decl: NodeId) {
    let Some(rule) = pass.sheet.parent(decl) else {
        return;
    };
    let conflicting: Vec<(NodeId, String)> = pass
        .sheet
        .walk_declarations(rule)
        .into_iter()
        .filter_map(|id| pass.sheet.declaration(id).map(|found| (id, found)))
        .filter(|(_, found)| {
            (found.prop.starts_with("grid-row") || found.prop.starts_with("grid-column"))
                && !found.prop.ends_with("-end")
                && !found.value.starts_with("span")
                && !found.prop.ends_with("-gap")
        })
        .map(|(id, found)| (id, found.prop.clone()))
        .collect();
    for (id, prop) in conflicting {
        pass.warn(
            id,
            format!(
                "You already have a grid-area declaration present in the rule. You should use either grid-area or {prop}, not both"
            ),
        );
    }
}

/// `1fr repeat(2, 20px) 1fr` as `["1fr", "20px", "20px", "1fr"]`.
fn normalize_row_column(text: &str) -> Vec<String> {
    let mut result = Vec::new();
    for node in value::parse(text) {
        match &node {
            ValueNode::Function { name, nodes, .. } if name == "repeat" => {
                let mut count = 0;
                let mut track = String::new();
                let mut in_track = false;
                for inner in nodes {
                    if let ValueNode::Word(word) = inner
                        && !in_track
                    {
                        count = parse_int(word).map_or(0, i64::unsigned_abs);
                    } else if inner.is_div(",") {
                        in_track = true;
                    } else if in_track {
                        track.push_str(&inner.to_css());
                    }
                }
                for _ in 0..count {
                    result.push(track.clone());
                }
            }
            ValueNode::Space(_) => {}
            _ => result.push(node.to_css()),
        }
    }
    result
}

/// IE has no auto-placement: give each child an explicit cell with
/// `:nth-child` rules after the container.
pub fn autoplace_grid_items(pass: &mut Pass<'_>, decl: NodeId, gap: &Gap, autoflow: &str) {
    let Some(parent) = pass.sheet.parent(decl) else {
        return;
    };
    let Some(selector) = pass.sheet.rule(parent).map(|rule| rule.selector.clone()) else {
        return;
    };
    let Some(rows_decl) = pass
        .sheet
        .find_declaration(parent, "grid-template-rows")
        .and_then(|id| pass.sheet.declaration(id))
    else {
        return;
    };
    let rows = normalize_row_column(&rows_decl.value);
    let Some(columns) = pass
        .sheet
        .declaration(decl)
        .map(|found| normalize_row_column(&found.value))
    else {
        return;
    };
    let filled: Vec<String> = (0..rows.len())
        .map(|row| {
            (1..=columns.len())
                .map(|column| (column + row * columns.len()).to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    let areas = parse_grid_areas(&filled, gap);
    let mut items: Vec<Area> = areas.entries().map(|(_, area)| *area).collect();
    if autoflow.contains("column") {
        items.sort_by_key(|area| area.column.start);
    }
    let before = pass
        .sheet
        .child_declarations(parent)
        .first()
        .and_then(|id| pass.sheet.raws(*id))
        .map(|raws| raws.before.clone())
        .unwrap_or_default();
    let selectors = list::comma(&selector);
    let total = areas.len();
    for (index, item) in items.iter().enumerate().rev() {
        let Some(copy) = pass.sheet.clone_subtree(parent) else {
            return;
        };
        pass.sheet.remove_children(copy);
        let nth = total - (items.len() - 1 - index);
        let cell_selector = selectors
            .iter()
            .map(|part| format!("{part} > *:nth-child({nth})"))
            .collect::<Vec<_>>()
            .join(", ");
        if let Some(rule) = pass.sheet.rule_mut(copy) {
            rule.selector = cell_selector;
        }
        pass.sheet.append(
            copy,
            Node::declaration("-ms-grid-row", item.row.start.to_string()).with_before(before.clone()),
        );
        pass.sheet.append(
            copy,
            Node::declaration("-ms-grid-column", item.column.start.to_string()).with_before(before.clone()),
        );
        pass.sheet.attach_after(parent, copy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_compile() {
        for pattern in [&LINE_NAMES, &GAP_PROP, &GAP_SHORTHAND, &ROW_GAP, &COLUMN_GAP] {
            assert!(pattern.is_some());
        }
    }

    fn groups(text: &str) -> Vec<Vec<String>> {
        parse(text)
    }

    #[test]
    fn translate_lines_and_spans() {
        assert_eq!(translate(&groups("2 / 4"), 0, 1), (Some(2), Some(2)));
        assert_eq!(translate(&groups("span 2 / 5"), 0, 1), (Some(3), Some(2)));
        assert_eq!(translate(&groups("2 / span 3"), 0, 1), (Some(2), Some(3)));
        assert_eq!(translate(&groups("3"), 0, 1), (Some(3), None));
        assert_eq!(translate(&groups("auto"), 0, 1), (None, None));
    }

    #[test]
    fn track_values_with_gaps() {
        assert_eq!(prefix_track_value("1fr 1fr", Some("10px")), "1fr 10px 1fr");
        assert_eq!(prefix_track_value("repeat(2, 1fr)", None), "(1fr)[2]");
        assert_eq!(
            prefix_track_value("repeat(2, 1fr 2fr)", Some("5px")),
            "1fr 5px 2fr 5px 1fr 5px 2fr"
        );
        assert_eq!(prefix_track_prop("grid-template-columns", "-ms-"), "-ms-grid-columns");
    }

    #[test]
    fn areas_span_repeated_names() {
        let rows = vec!["head head".to_owned(), "nav main".to_owned(), ". main".to_owned()];
        let areas = parse_grid_areas(&rows, &Gap::default());
        assert_eq!(areas.names(), ["head", "nav", "main"]);
        let head = areas.get("head").unwrap();
        assert_eq!((head.column.start, head.column.span), (1, 2));
        let main = areas.get("main").unwrap();
        assert_eq!((main.row.start, main.row.span), (2, 2));
        assert_eq!(main.column.start, 2);
    }

    #[test]
    fn gaps_double_line_numbers() {
        let gap = Gap {
            row: Some("10px".to_owned()),
            column: Some("10px".to_owned()),
        };
        let areas = parse_grid_areas(&["a b".to_owned(), "c d".to_owned()], &gap);
        let last = areas.get("d").unwrap();
        assert_eq!((last.row.start, last.column.start), (3, 3));
    }

    #[test]
    fn template_shorthand_splits_rows_and_columns() {
        let template = parse_template(r#""a b" 100px "c d" 1fr / 1fr 2fr"#, &Gap::default());
        assert_eq!(template.rows, "100px 1fr");
        assert_eq!(template.columns, "1fr 2fr");
        assert_eq!(template.areas.len(), 4);
    }

    #[test]
    fn repeat_is_expanded_for_autoplacement() {
        assert_eq!(normalize_row_column("1fr repeat(2, 20px) 1fr"), ["1fr", "20px", "20px", "1fr"]);
    }

    #[test]
    fn selectors_split_three_ways() {
        assert_eq!(
            split_selector(".a .grid.foo, #b"),
            vec![
                vec![vec![".a".to_owned()], vec![".grid".to_owned(), ".foo".to_owned()]],
                vec![vec!["#b".to_owned()]],
            ]
        );
        assert!(should_inherit_gap(".grid.foo", ".grid"));
        assert!(!should_inherit_gap(".grid", ".a .grid"));
    }

    #[test]
    fn gap_shorthand_fills_both_directions() {
        let sheet = Stylesheet::parse("a { grid-gap: 10px 20px; grid-template-columns: 1fr }");
        let rule = sheet.first_child(sheet.root()).unwrap();
        let decl = sheet.find_declaration(rule, "grid-template-columns").unwrap();
        let gap = get_grid_gap(&sheet, decl);
        assert_eq!(gap.row.as_deref(), Some("10px"));
        assert_eq!(gap.column.as_deref(), Some("20px"));
    }
}
