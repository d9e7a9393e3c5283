//! `@supports` conditions: prefixed alternatives are added with `or`, and
//! alternatives for prefixes nobody needs are dropped.

use super::brackets::{self, Piece};
use super::value as value_handler;
use crate::error::PrefixerError;
use crate::options::FlexboxMode;
use crate::pass::Pass;
use crate::prefixes::Prefixes;
use css_syntax::{Node, NodeId, Stylesheet};
use regex::Regex;
use std::mem;

const FLEX_LIKE: [&str; 4] = ["order", "justify-content", "align-items", "align-content"];

/// `prop: value` split at the first colon, both sides trimmed.
fn split_condition(condition: &str) -> (String, String) {
    let mut parts = condition.split(':');
    let prop = parts.next().unwrap_or_default().trim().to_owned();
    let value = parts.next().unwrap_or_default().trim().to_owned();
    (prop, value)
}

fn is_prop(piece: Option<&Piece>) -> Option<&str> {
    match piece {
        Some(Piece::Group(inner)) if inner.len() == 1 => inner.first().and_then(Piece::text),
        _ => None,
    }
}

fn text_contains(piece: Option<&Piece>, word: &str) -> bool {
    piece
        .and_then(Piece::text)
        .is_some_and(|text| text.to_ascii_lowercase().contains(word))
}

/// Collapse each declaration condition into a single text piece and drop
/// empty runs.
fn normalize(pieces: Vec<Piece>) -> Vec<Piece> {
    let pieces: Vec<Piece> = pieces
        .into_iter()
        .filter(|piece| piece.text() != Some(""))
        .collect();
    pieces
        .into_iter()
        .map(|piece| match piece {
            Piece::Group(inner) => Piece::Group(normalize_group(inner)),
            text @ Piece::Text(_) => text,
        })
        .collect()
}

fn normalize_group(inner: Vec<Piece>) -> Vec<Piece> {
    let inner: Vec<Piece> = inner
        .into_iter()
        .filter(|piece| piece.text() != Some(""))
        .collect();
    if let Some(first) = inner.first().and_then(Piece::text) {
        let first = first.trim();
        if first.contains(':') || first == "selector" || first == "not selector" {
            return vec![Piece::Text(brackets::stringify(&inner))];
        }
    }
    normalize(inner)
}

/// Remove `(x) or` pairs whose condition only matters for unneeded prefixes.
fn clean_up_conditions(pass: &Pass<'_>, pieces: Vec<Piece>, all: &str) -> Result<Vec<Piece>, PrefixerError> {
    let mut pieces = pieces;
    let mut index = 0;
    while index < pieces.len() {
        let negated = index > 0 && text_contains(pieces.get(index - 1), "not");
        if !negated
            && let Some(condition) = is_prop(pieces.get(index))
            && text_contains(pieces.get(index + 1), "or")
        {
            if to_remove(pass.prefixes, condition, all)? {
                pieces.remove(index);
                pieces.remove(index);
            } else {
                index += 2;
            }
            continue;
        }
        if let Some(Piece::Group(inner)) = pieces.get_mut(index) {
            let taken = mem::take(inner);
            *inner = clean_up_conditions(pass, taken, all)?;
        }
        index += 1;
    }
    Ok(pieces)
}

/// The condition is a prefixed declaration the browsers do not need, and
/// not a hack standing alone without its unprefixed partner.
fn to_remove(prefixes: &Prefixes, condition: &str, all: &str) -> Result<bool, PrefixerError> {
    let (prop, value) = split_condition(condition);
    let unprefixed = prefixes.unprefixed(&prop);
    let cleaner = prefixes.cleaner()?;
    if cleaner.removes(&prop) {
        let partner = Regex::new(&format!(r"(\(|\s){}:", regex::escape(&unprefixed)))?;
        if partner.is_match(all) {
            return Ok(true);
        }
    }
    Ok(cleaner
        .remove_values(&unprefixed)
        .iter()
        .any(|old| old.check(&value)))
}

fn disabled(prefixes: &Prefixes, prop: &str, value: &str) -> bool {
    let options = prefixes.options();
    if !options.grid.is_enabled()
        && ((prop == "display" && value.contains("grid")) || prop.contains("grid") || prop == "justify-items")
    {
        return true;
    }
    options.flexbox == FlexboxMode::Off
        && ((prop == "display" && value.contains("flex")) || prop.contains("flex") || FLEX_LIKE.contains(&prop))
}

/// Every declaration the prefixer would emit for `condition`, in order.
fn prefixed(prefixes: &Prefixes, condition: &str) -> Result<Vec<(String, String)>, PrefixerError> {
    let (prop, value) = split_condition(condition);
    if disabled(prefixes, &prop, &value) {
        return Ok(vec![(prop, value)]);
    }
    let mut sheet = Stylesheet::parse("a{}");
    let Some(rule) = sheet.first_child(sheet.root()) else {
        return Ok(vec![(prop, value)]);
    };
    let decl = sheet.append(rule, Node::declaration(prop.clone(), value).with_before(""));
    let scoped = prefixes.supports_prefixer()?;
    {
        let mut pass = Pass::new(&mut sheet, scoped);
        if let Some(handler) = scoped.declaration(&prop) {
            handler.process(&mut pass, decl);
        }
        for child in pass.sheet.child_declarations(rule) {
            for handler in scoped.add_values(&prop) {
                handler.process(&mut pass, child);
            }
            value_handler::save(prefixes, &mut pass, child);
        }
    }
    Ok(sheet
        .child_declarations(rule)
        .into_iter()
        .filter_map(|child| sheet.declaration(child))
        .map(|found| (found.prop.clone(), found.value.clone()))
        .collect())
}

/// `(a) or (b) or (c)` as pieces.
fn convert(alternatives: &[(String, String)]) -> Vec<Piece> {
    let mut pieces = vec![Piece::Text(String::new())];
    for (prop, value) in alternatives {
        pieces.push(Piece::Group(vec![Piece::Text(format!("{prop}: {value}"))]));
        pieces.push(Piece::Text(" or ".to_owned()));
    }
    if let Some(last) = pieces.last_mut() {
        *last = Piece::Text(String::new());
    }
    pieces
}

fn add_alternatives(prefixes: &Prefixes, pieces: Vec<Piece>) -> Result<Vec<Piece>, PrefixerError> {
    pieces
        .into_iter()
        .map(|piece| {
            if let Some(condition) = is_prop(Some(&piece)) {
                let alternatives = prefixed(prefixes, condition)?;
                if alternatives.len() > 1 {
                    return Ok(Piece::Group(convert(&alternatives)));
                }
                return Ok(piece);
            }
            match piece {
                Piece::Group(inner) => Ok(Piece::Group(add_alternatives(prefixes, inner)?)),
                text @ Piece::Text(_) => Ok(text),
            }
        })
        .collect()
}

/// `((a))` becomes `(a)`.
fn clean_brackets(pieces: Vec<Piece>) -> Vec<Piece> {
    pieces
        .into_iter()
        .map(|piece| match piece {
            Piece::Group(inner) => {
                let inner = match <[Piece; 1]>::try_from(inner) {
                    Ok([Piece::Group(nested)]) => nested,
                    Ok([single]) => vec![single],
                    Err(inner) => inner,
                };
                Piece::Group(clean_brackets(inner))
            }
            text @ Piece::Text(_) => text,
        })
        .collect()
}

/// Rewrite the params of an `@supports` rule.
///
/// # Errors
/// Returns an error if the derived prefixers cannot be built.
pub fn process(pass: &mut Pass<'_>, rule: NodeId) -> Result<(), PrefixerError> {
    let Some(params) = pass.sheet.at_rule(rule).map(|found| found.params.clone()) else {
        return Ok(());
    };
    let pieces = normalize(brackets::parse(&params));
    let pieces = clean_up_conditions(pass, pieces, &params)?;
    let pieces = add_alternatives(pass.prefixes, pieces)?;
    let rewritten = brackets::stringify(&clean_brackets(pieces));
    if let Some(at_rule) = pass.sheet.at_rule_mut(rule) {
        at_rule.params = rewritten;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conditions_collapse_to_single_text() {
        let pieces = normalize(brackets::parse("(display: flex) and (not (color: red))"));
        assert_eq!(
            pieces,
            vec![
                Piece::Group(vec![Piece::Text("display: flex".to_owned())]),
                Piece::Text(" and ".to_owned()),
                Piece::Group(vec![
                    Piece::Text("not ".to_owned()),
                    Piece::Group(vec![Piece::Text("color: red".to_owned())]),
                ]),
            ]
        );
    }

    #[test]
    fn alternatives_are_joined_with_or() {
        let pieces = convert(&[
            ("display".to_owned(), "-webkit-flex".to_owned()),
            ("display".to_owned(), "flex".to_owned()),
        ]);
        assert_eq!(brackets::stringify(&pieces), "(display: -webkit-flex) or (display: flex)");
    }

    #[test]
    fn double_brackets_collapse() {
        let pieces = clean_brackets(normalize(brackets::parse("((a: b))")));
        assert_eq!(brackets::stringify(&pieces), "(a: b)");
    }
}
