#![cfg(test)]
#![allow(
    clippy::unwrap_used,
    reason = "Test setup failures should abort the test"
)]

use css_syntax::{Node, Stylesheet};

fn assert_round_trip(css: &str) {
    let sheet = Stylesheet::parse(css);
    assert_eq!(sheet.to_css(), css, "printing an untouched tree must be lossless");
}

#[test]
fn untouched_sheets_print_back_unchanged() {
    assert_round_trip("a { color: red; }");
    assert_round_trip("a{color:red}");
    assert_round_trip("a {\n  color: red;\n  margin : 0 auto !important\n}\n");
    assert_round_trip("/* head */\n@media (min-width: 100px) {\n  a { b: c }\n}\n");
    assert_round_trip("@import url(\"x.css\") screen;\n@charset \"utf-8\";");
    assert_round_trip("a { b: c;; }");
    assert_round_trip(":root { --x: { a: b }; }");
    assert_round_trip("a { background: url(data:image/png;base64,AAA) }");
}

#[test]
fn blocks_inside_statements_stay_whole() {
    assert_round_trip("a { transform: rotate(45deg); color: red }");
    assert_round_trip("a:not(.b){color:red}");
    assert_round_trip("@media (min-width:1px){a{b:c}}");
    assert_round_trip("a[href] { grid-template-columns: [full] 1fr; }");
    assert_round_trip("a { background: linear-gradient(to right, rgba(0, 0, 0, 0.5), red) }");

    let sheet = Stylesheet::parse("a:not(.b) { transform: rotate(45deg); }");
    let rules = sheet.walk_rules(sheet.root());
    assert_eq!(sheet.rule(rules[0]).unwrap().selector, "a:not(.b)");
    let decls = sheet.walk_declarations(sheet.root());
    assert_eq!(sheet.declaration(decls[0]).unwrap().value, "rotate(45deg)");
}

#[test]
fn declarations_expose_parsed_parts() {
    let sheet = Stylesheet::parse("a {\n  display : flex  !important;\n}");
    let decls = sheet.walk_declarations(sheet.root());
    assert_eq!(decls.len(), 1);
    let id = decls[0];
    let decl = sheet.declaration(id).unwrap();
    assert_eq!(decl.prop, "display");
    assert_eq!(decl.value, "flex");
    assert!(decl.important);
    let raws = sheet.raws(id).unwrap();
    assert_eq!(raws.before, "\n  ");
    assert_eq!(raws.between, " : ");
    assert_eq!(raws.important, "  !important");
    let source = sheet.get(id).unwrap().source.unwrap();
    assert_eq!((source.line, source.column), (2, 3));
}

#[test]
fn at_rules_keep_name_and_params() {
    let sheet = Stylesheet::parse("@supports (display: grid) { a { b: c } }");
    let at_rules = sheet.walk_at_rules(sheet.root());
    let at_rule = sheet.at_rule(at_rules[0]).unwrap();
    assert_eq!(at_rule.name, "supports");
    assert_eq!(at_rule.params, "(display: grid)");
    assert!(at_rule.has_block);
    assert_eq!(sheet.walk_rules(sheet.root()).len(), 1);
}

#[test]
fn inserted_nodes_copy_neighbour_layout() {
    let mut sheet = Stylesheet::parse("a {\n  display: flex;\n}");
    let decl = sheet.walk_declarations(sheet.root())[0];
    let before = sheet.raws(decl).unwrap().before.clone();
    sheet.insert_before(
        decl,
        Node::declaration("display", "-webkit-box").with_before(before),
    );
    assert_eq!(
        sheet.to_css(),
        "a {\n  display: -webkit-box;\n  display: flex;\n}"
    );
}

#[test]
fn last_declaration_without_semicolon_gains_one_when_followed() {
    let mut sheet = Stylesheet::parse("a { color: red }");
    let decl = sheet.walk_declarations(sheet.root())[0];
    sheet.insert_after(decl, Node::declaration("margin", "0").with_before(" "));
    assert_eq!(sheet.to_css(), "a { color: red; margin: 0 }");
}

#[test]
fn removed_nodes_are_skipped() {
    let mut sheet = Stylesheet::parse("a { b: c; d: e }");
    let decls = sheet.walk_declarations(sheet.root());
    sheet.remove(decls[0]);
    assert!(sheet.is_removed(decls[0]));
    assert!(sheet.get(decls[0]).is_none());
    assert_eq!(sheet.to_css(), "a { d: e }");
}

#[test]
fn cloned_rules_are_deep_copies() {
    let mut sheet = Stylesheet::parse("::placeholder { color: gray }");
    let rule = sheet.walk_rules(sheet.root())[0];
    let copy = sheet
        .clone_before(rule, |node| {
            if let Some(rule) = node.as_rule_mut() {
                rule.selector = "::-moz-placeholder".to_owned();
            }
        })
        .unwrap();
    sheet.raws_mut(rule).unwrap().before = "\n".to_owned();
    assert_eq!(sheet.walk_declarations(copy).len(), 1);
    assert_eq!(
        sheet.to_css(),
        "::-moz-placeholder { color: gray }\n::placeholder { color: gray }"
    );
}
