//! Serializes a [`Stylesheet`] back to text using each node's raws.

use crate::tree::{NodeKind, Stylesheet};
use indextree::NodeId;

pub fn write_node(sheet: &Stylesheet, id: NodeId, semicolon: bool, out: &mut String) {
    let Some(node) = sheet.get(id) else {
        return;
    };
    let raws = &node.raws;
    match &node.kind {
        NodeKind::Root => {
            write_body(sheet, id, out);
            out.push_str(&raws.after);
        }
        NodeKind::Declaration(decl) => {
            out.push_str(&raws.before);
            out.push_str(&decl.prop);
            out.push_str(&raws.between);
            out.push_str(&decl.value);
            if decl.important {
                if raws.important.is_empty() {
                    out.push_str(" !important");
                } else {
                    out.push_str(&raws.important);
                }
            }
            if semicolon {
                out.push(';');
            }
        }
        NodeKind::Rule(rule) => {
            out.push_str(&raws.before);
            out.push_str(&rule.selector);
            out.push_str(&raws.between);
            write_block(sheet, id, out);
        }
        NodeKind::AtRule(at_rule) => {
            out.push_str(&raws.before);
            out.push('@');
            out.push_str(&at_rule.name);
            out.push_str(&raws.after_name);
            out.push_str(&at_rule.params);
            out.push_str(&raws.between);
            if at_rule.has_block {
                write_block(sheet, id, out);
            } else if semicolon {
                out.push(';');
            }
        }
        NodeKind::Comment(comment) => {
            out.push_str(&raws.before);
            out.push_str("/*");
            out.push_str(&comment.text);
            out.push_str("*/");
        }
    }
}

fn write_block(sheet: &Stylesheet, id: NodeId, out: &mut String) {
    out.push('{');
    write_body(sheet, id, out);
    if let Some(raws) = sheet.raws(id) {
        out.push_str(&raws.after);
    }
    out.push('}');
}

fn write_body(sheet: &Stylesheet, id: NodeId, out: &mut String) {
    let children = sheet.children(id);
    let last = children
        .iter()
        .rposition(|child| sheet.comment(*child).is_none());
    let trailing = sheet.raws(id).is_some_and(|raws| raws.semicolon);
    for (index, child) in children.iter().enumerate() {
        let semicolon = last != Some(index) || trailing;
        write_node(sheet, *child, semicolon, out);
    }
}
