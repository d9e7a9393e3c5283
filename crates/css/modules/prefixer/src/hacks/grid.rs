//! Grid properties for the IE 10/11 draft, where lines are numbered and
//! spans are separate properties.

use super::grid_utils::{
    self, Gap, autoplace_grid_items, get_grid_gap, inherit_grid_gap, insert_decl, insert_keyword,
    parse_grid_areas, parse_template, prefix_track_prop, prefix_track_value, translate, warn_grid_gap,
    warn_if_grid_row_column_exists, warn_missed_areas, warn_template_selector_not_found,
};
use crate::handlers::declaration::{DeclarationHandler, insert_clone};
use crate::handlers::value::{ValueHack, ValueHandler};
use crate::handlers::DeclarationHack;
use crate::options::GridMode;
use crate::pass::Pass;
use crate::processor::control;
use css_syntax::{NodeId, Stylesheet};
use once_cell::sync::Lazy;
use regex::Regex;

static SPAN_KEYWORD: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?i)span\s").ok());
static ROW_QUOTES: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r#"["']\s*["']?"#).ok());

fn own_gap(sheet: &Stylesheet, decl: NodeId) -> Gap {
    let gap = get_grid_gap(sheet, decl);
    inherit_grid_gap(sheet, decl, &gap).unwrap_or(gap)
}

fn has_sibling(sheet: &Stylesheet, decl: NodeId, prop: &str) -> bool {
    sheet
        .parent(decl)
        .is_some_and(|parent| sheet.some_declaration(parent, |other| other.prop == prop))
}

fn value_of(sheet: &Stylesheet, decl: NodeId) -> Option<(String, String)> {
    sheet
        .declaration(decl)
        .map(|found| (found.prop.clone(), found.value.clone()))
}

/// `grid-row-end` becomes a span relative to `grid-row-start`.
pub struct GridEnd;

impl GridEnd {
    pub const NAMES: &[&str] = &["grid-row-end", "grid-column-end"];
}

impl DeclarationHack for GridEnd {
    fn insert(
        &self,
        handler: &DeclarationHandler,
        pass: &mut Pass<'_>,
        decl: NodeId,
        prefix: &str,
        prefixes: &[String],
    ) -> Option<NodeId> {
        if prefix != "-ms-" {
            return insert_clone(handler, pass, decl, prefix, prefixes);
        }
        let (prop, value) = value_of(pass.sheet, decl)?;
        let base = prop.strip_suffix("end").unwrap_or(&prop);
        let start_prop = format!("{base}start");
        let span_prop = format!("{prefix}{base}span");
        if has_sibling(pass.sheet, decl, &span_prop) {
            return None;
        }
        let span = if value.contains("span") {
            SPAN_KEYWORD
                .as_ref()
                .map_or_else(|| value.clone(), |regex| regex.replace(&value, "").into_owned())
        } else {
            let parent = pass.sheet.parent(decl)?;
            let start = pass
                .sheet
                .walk_declarations(parent)
                .into_iter()
                .rev()
                .filter_map(|id| pass.sheet.declaration(id))
                .find(|found| found.prop == start_prop)
                .map(|found| found.value.clone());
            match start {
                Some(start) => match (value.trim().parse::<f64>(), start.trim().parse::<f64>()) {
                    (Ok(end), Ok(start)) => format!("{}", end - start),
                    _ => {
                        pass.warn(decl, format!("Can not prefix {prop} (non-numeric {start_prop} or {prop})"));
                        return None;
                    }
                },
                None => {
                    pass.warn(decl, format!("Can not prefix {prop} ({start_prop} is not found)"));
                    value
                }
            }
        };
        pass.sheet.clone_before(decl, |node| {
            if let Some(copy) = node.as_declaration_mut() {
                copy.prop = span_prop;
                copy.value = span;
            }
        });
        None
    }
}

/// `grid-row-start: 2` is plain `-ms-grid-row: 2`.
pub struct GridStart;

impl GridStart {
    pub const NAMES: &[&str] = &["grid-row-start", "grid-column-start"];
}

impl DeclarationHack for GridStart {
    /// Slash and span forms have no single-line equivalent.
    fn check(&self, sheet: &Stylesheet, decl: NodeId) -> bool {
        sheet
            .declaration(decl)
            .is_some_and(|found| !found.value.contains('/') && !found.value.contains("span"))
    }

    fn normalize(&self, prop: &str) -> String {
        prop.replacen("-start", "", 1)
    }

    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        let prefixed = format!("{prefix}{prop}");
        if prefix == "-ms-" {
            prefixed.replacen("-start", "", 1)
        } else {
            prefixed
        }
    }
}

fn is_item_alignment(sheet: &Stylesheet, decl: NodeId) -> bool {
    sheet
        .declaration(decl)
        .is_some_and(|found| !found.value.contains("flex-") && found.value != "baseline")
}

pub struct GridRowAlign;

impl GridRowAlign {
    pub const NAMES: &[&str] = &["grid-row-align"];
}

impl DeclarationHack for GridRowAlign {
    fn check(&self, sheet: &Stylesheet, decl: NodeId) -> bool {
        is_item_alignment(sheet, decl)
    }

    fn prefixed(&self, _prop: &str, prefix: &str) -> String {
        format!("{prefix}grid-row-align")
    }

    fn normalize(&self, _prop: &str) -> String {
        "align-self".to_owned()
    }
}

pub struct GridColumnAlign;

impl GridColumnAlign {
    pub const NAMES: &[&str] = &["grid-column-align"];
}

impl DeclarationHack for GridColumnAlign {
    fn check(&self, sheet: &Stylesheet, decl: NodeId) -> bool {
        is_item_alignment(sheet, decl)
    }

    fn prefixed(&self, _prop: &str, prefix: &str) -> String {
        format!("{prefix}grid-column-align")
    }

    fn normalize(&self, _prop: &str) -> String {
        "justify-self".to_owned()
    }
}

/// `grid-area: 1 / 2 / 3 / 4` as four explicit line properties.
pub struct GridArea;

impl GridArea {
    pub const NAMES: &[&str] = &["grid-area"];
}

impl DeclarationHack for GridArea {
    fn insert(
        &self,
        handler: &DeclarationHandler,
        pass: &mut Pass<'_>,
        decl: NodeId,
        prefix: &str,
        prefixes: &[String],
    ) -> Option<NodeId> {
        if prefix != "-ms-" {
            return insert_clone(handler, pass, decl, prefix, prefixes);
        }
        let (_, value) = value_of(pass.sheet, decl)?;
        let values = grid_utils::parse(&value);
        let (row_start, row_span) = translate(&values, 0, 2);
        let (column_start, column_span) = translate(&values, 1, 3);
        insert_decl(pass, decl, "grid-row", row_start);
        insert_decl(pass, decl, "grid-row-span", row_span);
        insert_decl(pass, decl, "grid-column", column_start);
        insert_decl(pass, decl, "grid-column-span", column_span);
        warn_template_selector_not_found(pass, decl);
        warn_if_grid_row_column_exists(pass, decl);
        None
    }
}

/// `grid-row: 2 / 4` as a line and a span.
pub struct GridRowColumn;

impl GridRowColumn {
    pub const NAMES: &[&str] = &["grid-row", "grid-column"];
}

impl DeclarationHack for GridRowColumn {
    fn insert(
        &self,
        handler: &DeclarationHandler,
        pass: &mut Pass<'_>,
        decl: NodeId,
        prefix: &str,
        prefixes: &[String],
    ) -> Option<NodeId> {
        if prefix != "-ms-" {
            return insert_clone(handler, pass, decl, prefix, prefixes);
        }
        let (prop, value) = value_of(pass.sheet, decl)?;
        let values = grid_utils::parse(&value);
        let (start, mut span) = translate(&values, 0, 1);
        if let Some(first) = values.first()
            && first.iter().any(|word| word.contains("span"))
        {
            let digits: String = first.concat().chars().filter(char::is_ascii_digit).collect();
            span = digits.parse().ok();
        }
        insert_decl(pass, decl, &prop, start);
        insert_decl(pass, decl, &format!("{prop}-span"), span);
        None
    }
}

/// `place-self` splits into the row and column alignment.
pub struct PlaceSelf;

impl PlaceSelf {
    pub const NAMES: &[&str] = &["place-self"];
}

impl DeclarationHack for PlaceSelf {
    fn insert(
        &self,
        handler: &DeclarationHandler,
        pass: &mut Pass<'_>,
        decl: NodeId,
        prefix: &str,
        prefixes: &[String],
    ) -> Option<NodeId> {
        if prefix != "-ms-" {
            return insert_clone(handler, pass, decl, prefix, prefixes);
        }
        if has_sibling(pass.sheet, decl, "-ms-grid-row-align") {
            return None;
        }
        let (_, value) = value_of(pass.sheet, decl)?;
        let values = grid_utils::parse(&value);
        let words = values.first().cloned().unwrap_or_default();
        let first = words.first().cloned().unwrap_or_default();
        let second = words.get(1).cloned().unwrap_or_else(|| first.clone());
        insert_keyword(pass, decl, "grid-row-align", &first);
        insert_keyword(pass, decl, "grid-column-align", &second);
        None
    }
}

/// `grid-template-rows` and `grid-template-columns` as `-ms-grid-rows`
/// and `-ms-grid-columns`, with gaps written as extra tracks.
pub struct GridRowsColumns;

impl GridRowsColumns {
    pub const NAMES: &[&str] = &["grid-template-rows", "grid-template-columns"];
}

impl GridRowsColumns {
    fn autoplace(pass: &mut Pass<'_>, decl: NodeId, prop: &str, has_template: bool, gap: &Gap, autoflow: &str) {
        let has_rows = has_sibling(pass.sheet, decl, "grid-template-rows");
        if !has_rows {
            if !has_template {
                pass.warn(decl, "Autoplacement does not work without grid-template-rows property");
            }
            return;
        }
        let has_columns = has_sibling(pass.sheet, decl, "grid-template-columns");
        if !has_columns && !has_template {
            pass.warn(decl, "Autoplacement does not work without grid-template-columns property");
        }
        if prop.contains("columns") && !has_template {
            autoplace_grid_items(pass, decl, gap, autoflow);
        }
    }
}

impl DeclarationHack for GridRowsColumns {
    fn insert(
        &self,
        handler: &DeclarationHandler,
        pass: &mut Pass<'_>,
        decl: NodeId,
        prefix: &str,
        prefixes: &[String],
    ) -> Option<NodeId> {
        if prefix != "-ms-" {
            return insert_clone(handler, pass, decl, prefix, prefixes);
        }
        let (prop, value) = value_of(pass.sheet, decl)?;
        let parent = pass.sheet.parent(decl)?;
        let is_rows = prop.contains("rows");
        let has_template = pass
            .sheet
            .some_declaration(parent, |other| other.prop == "grid-template" || other.prop == "grid-template-areas");
        if has_template && is_rows {
            return None;
        }
        let status = control::grid_status(pass, parent);
        let gap = own_gap(pass.sheet, decl);
        let gap_value = if status == GridMode::NoAutoplace && !has_template {
            None
        } else if is_rows {
            gap.row.clone()
        } else {
            gap.column.clone()
        };
        let tracks = prefix_track_value(&value, gap_value.as_deref());
        let track_prop = prefix_track_prop(&prop, prefix);
        pass.sheet.clone_before(decl, |node| {
            if let Some(copy) = node.as_declaration_mut() {
                copy.prop = track_prop;
                copy.value = tracks;
            }
        });
        let autoflow = pass.sheet.find_declaration(parent, "grid-auto-flow");
        let autoflow = match autoflow {
            Some(found) if !control::disabled(pass, found) => pass
                .sheet
                .declaration(found)
                .map_or_else(|| "row".to_owned(), |found| found.value.trim().to_owned()),
            _ => "row".to_owned(),
        };
        if status == GridMode::Autoplace {
            Self::autoplace(pass, decl, &prop, has_template, &gap, &autoflow);
        }
        None
    }
}

/// The `grid-template` shorthand as explicit rows and columns.
pub struct GridTemplate;

impl GridTemplate {
    pub const NAMES: &[&str] = &["grid-template"];
}

impl DeclarationHack for GridTemplate {
    fn insert(
        &self,
        handler: &DeclarationHandler,
        pass: &mut Pass<'_>,
        decl: NodeId,
        prefix: &str,
        prefixes: &[String],
    ) -> Option<NodeId> {
        if prefix != "-ms-" {
            return insert_clone(handler, pass, decl, prefix, prefixes);
        }
        if has_sibling(pass.sheet, decl, "-ms-grid-rows") {
            return None;
        }
        let (_, value) = value_of(pass.sheet, decl)?;
        let mut gap = get_grid_gap(pass.sheet, decl);
        let inherited = inherit_grid_gap(pass.sheet, decl, &gap);
        let template = parse_template(&value, inherited.as_ref().unwrap_or(&gap));
        let has_rows = !template.rows.is_empty();
        let has_columns = !template.columns.is_empty();
        warn_grid_gap(pass, decl, &mut gap, has_columns);
        warn_missed_areas(pass, decl, &template.areas);
        if (has_rows && has_columns) || !template.areas.is_empty() {
            let rows = template.rows;
            pass.sheet.clone_before(decl, |node| {
                if let Some(copy) = node.as_declaration_mut() {
                    "-ms-grid-rows".clone_into(&mut copy.prop);
                    copy.value = rows;
                }
            });
        }
        if has_columns {
            let columns = template.columns;
            pass.sheet.clone_before(decl, |node| {
                if let Some(copy) = node.as_declaration_mut() {
                    "-ms-grid-columns".clone_into(&mut copy.prop);
                    copy.value = columns;
                }
            });
        }
        Some(decl)
    }
}

/// Row strings of a `grid-template-areas` value.
fn template_rows(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    let mut letters = trimmed.chars();
    letters.next();
    letters.next_back();
    let inner = letters.as_str();
    ROW_QUOTES.as_ref().map_or_else(
        || vec![inner.to_owned()],
        |regex| regex.split(inner).map(ToOwned::to_owned).collect(),
    )
}

/// `grid-template-areas` needs the row tracks written out for IE.
pub struct GridTemplateAreas;

impl GridTemplateAreas {
    pub const NAMES: &[&str] = &["grid-template-areas"];
}

impl DeclarationHack for GridTemplateAreas {
    fn insert(
        &self,
        handler: &DeclarationHandler,
        pass: &mut Pass<'_>,
        decl: NodeId,
        prefix: &str,
        prefixes: &[String],
    ) -> Option<NodeId> {
        if prefix != "-ms-" {
            return insert_clone(handler, pass, decl, prefix, prefixes);
        }
        let (_, value) = value_of(pass.sheet, decl)?;
        let parent = pass.sheet.parent(decl)?;
        let mut gap = own_gap(pass.sheet, decl);
        for id in pass.sheet.walk_declarations(parent) {
            if pass.sheet.declaration(id).is_some_and(|found| found.prop.contains("-ms-grid-rows")) {
                pass.sheet.remove(id);
            }
        }
        let mut has_rows = false;
        let mut has_columns = false;
        for id in pass.sheet.walk_declarations(parent) {
            let Some((track, tracks)) = value_of(pass.sheet, id) else {
                continue;
            };
            if track == "grid-template-rows" {
                has_rows = true;
                let prefixed_prop = prefix_track_prop(&track, prefix);
                let prefixed_value = prefix_track_value(&tracks, gap.row.as_deref());
                pass.sheet.clone_before(id, |node| {
                    if let Some(copy) = node.as_declaration_mut() {
                        copy.prop = prefixed_prop;
                        copy.value = prefixed_value;
                    }
                });
            } else if track.contains("grid-template-columns") {
                has_columns = true;
            }
        }
        let rows = template_rows(&value);
        if has_columns && !has_rows && gap.row.is_some() && rows.len() > 1 {
            let tracks = prefix_track_value(&format!("repeat({}, auto)", rows.len()), gap.row.as_deref());
            pass.sheet.clone_before(decl, |node| {
                if let Some(copy) = node.as_declaration_mut() {
                    "-ms-grid-rows".clone_into(&mut copy.prop);
                    copy.value = tracks;
                }
            });
        }
        warn_grid_gap(pass, decl, &mut gap, has_columns);
        let areas = parse_grid_areas(&rows, &gap);
        warn_missed_areas(pass, decl, &areas);
        Some(decl)
    }
}

/// `display: grid` and `display: inline-grid`.
pub struct DisplayGrid;

impl DisplayGrid {
    pub const NAMES: &[&str] = &["display-grid", "inline-grid"];
}

impl ValueHack for DisplayGrid {
    fn value_name<'name>(&self, name: &'name str) -> &'name str {
        if name == "display-grid" { "grid" } else { name }
    }

    fn check(&self, handler: &ValueHandler, sheet: &Stylesheet, decl: NodeId) -> bool {
        sheet
            .declaration(decl)
            .is_some_and(|found| found.prop == "display" && found.value == handler.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_compile() {
        for pattern in [&SPAN_KEYWORD, &ROW_QUOTES] {
            assert!(pattern.is_some());
        }
    }

    #[test]
    fn start_lines_drop_the_suffix() {
        assert_eq!(GridStart.prefixed("grid-row-start", "-ms-"), "-ms-grid-row");
        assert_eq!(GridStart.normalize("grid-column-start"), "grid-column");
        assert_eq!(GridStart.prefixed("grid-row-start", "-webkit-"), "-webkit-grid-row-start");
    }

    #[test]
    fn alignment_maps_to_the_standard_names() {
        assert_eq!(GridRowAlign.prefixed("grid-row-align", "-ms-"), "-ms-grid-row-align");
        assert_eq!(GridRowAlign.normalize("grid-row-align"), "align-self");
        assert_eq!(GridColumnAlign.normalize("grid-column-align"), "justify-self");
        let sheet = Stylesheet::parse("a { grid-row-align: baseline; grid-column-align: center }");
        let rule = sheet.first_child(sheet.root()).unwrap();
        let children = sheet.child_declarations(rule);
        assert!(!GridRowAlign.check(&sheet, children[0]));
        assert!(GridColumnAlign.check(&sheet, children[1]));
    }

    #[test]
    fn area_rows_come_from_quoted_strings() {
        assert_eq!(template_rows(r#""a b" "c d""#), ["a b", "c d"]);
        assert_eq!(template_rows("'head' 'main'"), ["head", "main"]);
    }

    #[test]
    fn display_grid_looks_for_grid() {
        let handler = ValueHandler::new("display-grid", vec!["-ms-".to_owned()], &DisplayGrid).unwrap();
        assert_eq!(handler.name, "grid");
        let sheet = Stylesheet::parse("a { display: grid } b { display: inline-grid }");
        let first = sheet.first_child(sheet.root()).unwrap();
        let decl = sheet.child_declarations(first)[0];
        assert!(DisplayGrid.check(&handler, &sheet, decl));
        let second = sheet.next_sibling(first).unwrap();
        assert!(!DisplayGrid.check(&handler, &sheet, sheet.child_declarations(second)[0]));
    }
}
