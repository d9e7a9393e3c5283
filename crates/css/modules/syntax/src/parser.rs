//! Tokenizer-driven stylesheet parser.
//!
//! Statements are delimited with `cssparser` tokens (so strings, comments and
//! nested blocks are never split in the middle) and stored as raw text. The
//! whitespace between statements is attached to the following node, or to the
//! enclosing block's `after` raw when nothing follows.

use core::mem;
use crate::tree::{AtRule, Node, NodeKind, Raws, Rule, SourcePosition, Stylesheet};
use cssparser::{ParseError, Parser, ParserInput, SourceLocation, Token};
use cssparser::SourcePosition as Offset;
use indextree::NodeId;

/// Raw state left over when a block (or the whole sheet) ends.
#[derive(Default)]
struct BodyEnd {
    after: String,
    semicolon: bool,
}

/// Start of the statement currently being read.
#[derive(Clone, Copy)]
struct StatementStart {
    offset: Offset,
    location: SourceLocation,
}

/// Parse a whole stylesheet. Malformed input produces a best-effort tree.
pub fn parse_stylesheet(css: &str) -> Stylesheet {
    let mut sheet = Stylesheet::new();
    let root = sheet.root();
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let end = parse_body(&mut parser, &mut sheet, root);
    if let Some(raws) = sheet.raws_mut(root) {
        raws.after = end.after;
        raws.semicolon = end.semicolon;
    }
    sheet
}

fn position_of(location: SourceLocation) -> SourcePosition {
    SourcePosition {
        line: location.line.saturating_add(1),
        column: location.column,
    }
}

fn parse_body(input: &mut Parser<'_, '_>, sheet: &mut Stylesheet, parent: NodeId) -> BodyEnd {
    let mut pending = String::new();
    let mut statement: Option<StatementStart> = None;
    let mut semicolon = false;

    loop {
        let offset = input.position();
        let location = input.current_source_location();
        let Ok(token) = input.next_including_whitespace_and_comments().cloned() else {
            break;
        };
        match token {
            Token::WhiteSpace(space) => {
                if statement.is_none() {
                    pending.push_str(&space);
                }
            }
            Token::Comment(text) if statement.is_none() => {
                let mut node = Node::comment(&*text).with_before(mem::take(&mut pending));
                node.source = Some(position_of(location));
                sheet.append(parent, node);
            }
            Token::Semicolon => {
                semicolon = true;
                match statement.take() {
                    None => pending.push(';'),
                    Some(start) => {
                        let text = input.slice(start.offset..offset);
                        let mut node = statement_node(text, false);
                        node.raws.before = mem::take(&mut pending);
                        node.source = Some(position_of(start.location));
                        sheet.append(parent, node);
                    }
                }
            }
            Token::CurlyBracketBlock => {
                let start = statement.unwrap_or(StatementStart { offset, location });
                let prelude = input.slice(start.offset..offset);
                if is_custom_property_value(prelude) {
                    statement = Some(start);
                    skip_block(input);
                    continue;
                }
                statement = None;
                semicolon = false;
                let mut node = block_node(prelude);
                node.raws.before = mem::take(&mut pending);
                node.source = Some(position_of(start.location));
                let id = sheet.append(parent, node);
                let end = input
                    .parse_nested_block(|nested| {
                        Ok::<_, ParseError<'_, ()>>(parse_body(nested, sheet, id))
                    })
                    .unwrap_or_default();
                if let Some(raws) = sheet.raws_mut(id) {
                    raws.after = end.after;
                    raws.semicolon = end.semicolon;
                }
            }
            other => {
                if statement.is_none() {
                    statement = Some(StatementStart { offset, location });
                    semicolon = false;
                }
                if matches!(
                    other,
                    Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock
                ) {
                    skip_block(input);
                }
            }
        }
    }

    if let Some(start) = statement {
        let text = input.slice_from(start.offset);
        let trimmed = text.trim_end();
        let mut node = statement_node(trimmed, true);
        node.raws.before = mem::take(&mut pending);
        node.source = Some(position_of(start.location));
        sheet.append(parent, node);
        pending = text.get(trimmed.len()..).unwrap_or_default().to_owned();
        semicolon = false;
    }

    BodyEnd {
        after: pending,
        semicolon,
    }
}

/// Consume the block just opened so the next position lies past its end.
fn skip_block(input: &mut Parser<'_, '_>) {
    let _skipped: Result<(), ParseError<'_, ()>> = input.parse_nested_block(|nested| {
        while nested.next_including_whitespace_and_comments().is_ok() {}
        Ok(())
    });
}

/// `--x: { ... }` is a custom property whose value happens to hold a block.
fn is_custom_property_value(prelude: &str) -> bool {
    prelude.trim_start().starts_with("--") && prelude.contains(':')
}

/// Split trailing whitespace from a prelude: `(text, whitespace)`.
fn split_trailing_space(text: &str) -> (&str, &str) {
    let trimmed = text.trim_end();
    (trimmed, text.get(trimmed.len()..).unwrap_or_default())
}

/// Build a rule or at-rule from the text before `{`.
fn block_node(prelude: &str) -> Node {
    let (text, between) = split_trailing_space(prelude);
    let mut node = if let Some(rest) = text.strip_prefix('@') {
        at_rule_node(rest, true)
    } else {
        Node {
            kind: NodeKind::Rule(Rule {
                selector: text.to_owned(),
            }),
            raws: Raws::default(),
            source: None,
        }
    };
    node.raws.between = between.to_owned();
    node
}

/// Build a declaration or block-less at-rule from a statement ended by `;`
/// or by the end of its block.
fn statement_node(text: &str, at_end: bool) -> Node {
    if let Some(rest) = text.strip_prefix('@') {
        let (body, between) = split_trailing_space(rest);
        let mut node = at_rule_node(body, false);
        if !at_end {
            node.raws.between = between.to_owned();
        }
        return node;
    }
    declaration_node(text.trim_end())
}

fn at_rule_node(text: &str, has_block: bool) -> Node {
    let name_end = text
        .find(|ch: char| {
            ch.is_whitespace() || matches!(ch, '(' | '{' | ';' | '"' | '\'')
        })
        .unwrap_or(text.len());
    let (name, rest) = text.split_at(name_end);
    let params = rest.trim_start();
    let after_name = rest
        .get(..rest.len().saturating_sub(params.len()))
        .unwrap_or_default();
    let mut node = Node {
        kind: NodeKind::AtRule(AtRule {
            name: name.to_owned(),
            params: params.trim_end().to_owned(),
            has_block,
        }),
        raws: Raws::default(),
        source: None,
    };
    node.raws.after_name = after_name.to_owned();
    node
}

fn declaration_node(text: &str) -> Node {
    let Some(colon) = text.find(':') else {
        // Not a declaration at all; keep the text so it prints back unchanged.
        let mut node = Node::declaration(text, "");
        node.raws.between = String::new();
        return node;
    };
    let (head, tail) = text.split_at(colon);
    let prop = head.trim_end();
    let value_part = tail.get(1..).unwrap_or_default();
    let value_start = value_part.trim_start();
    let between = format!(
        "{}:{}",
        head.get(prop.len()..).unwrap_or_default(),
        value_part
            .get(..value_part.len().saturating_sub(value_start.len()))
            .unwrap_or_default()
    );
    let (value, important) = split_important_tail(value_start);
    let mut node = Node::declaration(prop, value);
    if let Some(decl) = node.as_declaration_mut() {
        decl.important = !important.is_empty();
    }
    node.raws.between = between;
    node.raws.important = important;
    node
}

/// Split `value !important` into the value and the raw `!important` suffix.
fn split_important_tail(value: &str) -> (String, String) {
    let trimmed = value.trim_end();
    if let Some(pos) = trimmed.rfind('!')
        && let Some(flag) = trimmed.get(pos + 1..)
        && flag.trim_start().eq_ignore_ascii_case("important")
        && let Some(prefix) = trimmed.get(..pos)
    {
        let head = prefix.trim_end();
        let raw = trimmed.get(head.len()..).unwrap_or_default();
        return (head.to_owned(), raw.to_owned());
    }
    (trimmed.to_owned(), String::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn important_tail_keeps_raw_spacing() {
        assert_eq!(
            split_important_tail("red  !important"),
            ("red".to_owned(), "  !important".to_owned())
        );
        assert_eq!(
            split_important_tail("red!IMPORTANT"),
            ("red".to_owned(), "!IMPORTANT".to_owned())
        );
        assert_eq!(split_important_tail("red"), ("red".to_owned(), String::new()));
    }

    #[test]
    fn at_rule_name_stops_at_paren() {
        let node = at_rule_node("media(min-width: 1px)", true);
        let at_rule = node.as_at_rule().unwrap();
        assert_eq!(at_rule.name, "media");
        assert_eq!(at_rule.params, "(min-width: 1px)");
        assert_eq!(node.raws.after_name, "");
    }
}
