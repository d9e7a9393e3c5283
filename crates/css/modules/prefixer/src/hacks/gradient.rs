//! Gradients: prefixed gradients use the old direction syntax, and the
//! oldest WebKit needs `-webkit-gradient(linear, ...)`.

use crate::error::PrefixerError;
use crate::handlers::value::{OldValue, ValueHandler, rewrite_value};
use crate::handlers::ValueHack;
use crate::pass::Pass;
use crate::vendor;
use css_syntax::NodeId;
use css_syntax::value::{self, ValueNode};
use once_cell::sync::Lazy;
use regex::Regex;
use std::f64::consts::PI;
use std::mem;

static IS_DIRECTION: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?i)top|left|right|bottom").ok());
static GRAD: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"-?\d+(.\d+)?grad").ok());
static RAD: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"-?\d+(.\d+)?rad").ok());
static TURN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"-?\d+(.\d+)?turn").ok());
static LEADING_NUMBER: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^\s*[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").ok());

const DIRECTIONS: &[(&str, &str)] = &[
    ("top", "bottom"),
    ("left", "right"),
    ("bottom", "top"),
    ("right", "left"),
];

/// `to <side>` in the `-webkit-gradient` point pair syntax.
const OLD_DIRECTIONS: &[(&str, &str)] = &[
    ("top", "left bottom, left top"),
    ("left", "right top, left top"),
    ("bottom", "left top, left bottom"),
    ("right", "left top, right top"),
    ("top right", "left bottom, right top"),
    ("top left", "right bottom, left top"),
    ("right top", "left bottom, right top"),
    ("right bottom", "left top, right bottom"),
    ("bottom right", "left top, right bottom"),
    ("bottom left", "right top, left bottom"),
    ("left top", "right bottom, left top"),
    ("left bottom", "right top, left bottom"),
];

fn lookup(map: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    map.iter().find(|(from, _)| *from == key).map(|(_, to)| *to)
}

fn revert_direction(word: &str) -> String {
    lookup(DIRECTIONS, &word.to_lowercase()).map_or_else(|| word.to_owned(), ToOwned::to_owned)
}

fn parse_float(text: &str) -> Option<f64> {
    LEADING_NUMBER
        .as_ref()
        .and_then(|regex| regex.find(text))
        .and_then(|found| found.as_str().trim().parse().ok())
}

fn round_float(number: f64, digits: i32) -> f64 {
    let scale = 10_f64.powi(digits);
    (number * scale).round() / scale
}

fn set_word(node: &mut ValueNode, text: String) {
    if let ValueNode::Word(word) = node {
        *word = text;
    }
}

fn comma_div() -> ValueNode {
    ValueNode::Div {
        value: ",".to_owned(),
        before: String::new(),
        after: " ".to_owned(),
    }
}

/// The first comma in `nodes`, or a fresh `, `.
fn clone_div(nodes: &[ValueNode]) -> ValueNode {
    nodes
        .iter()
        .find(|node| node.is_div(","))
        .cloned()
        .unwrap_or_else(comma_div)
}

/// `top left` becomes `to bottom right`.
fn new_direction(params: Vec<ValueNode>) -> Vec<ValueNode> {
    let Some(first) = params.first() else {
        return params;
    };
    if first.value() == "to" || !vendor::is_match(&IS_DIRECTION, first.value()) {
        return params;
    }
    let mut params = [ValueNode::word("to"), ValueNode::space()]
        .into_iter()
        .chain(params)
        .collect::<Vec<_>>();
    for param in params.iter_mut().skip(2) {
        if matches!(param, ValueNode::Div { .. }) {
            break;
        }
        if let ValueNode::Word(word) = param {
            *word = revert_direction(word);
        }
    }
    params
}

fn to_degrees(text: &str, full: f64) -> Option<String> {
    parse_float(text).map(|number| format!("{}deg", number / full * 360.0))
}

/// Angles in `deg` within one turn; right angles of linear gradients as
/// `to <side>`.
fn normalize(mut nodes: Vec<ValueNode>, name: &str) -> Vec<ValueNode> {
    let Some(first) = nodes.first_mut() else {
        return nodes;
    };
    let text = first.value().to_owned();
    let converted = if vendor::is_match(&GRAD, &text) {
        to_degrees(&text, 400.0)
    } else if vendor::is_match(&RAD, &text) {
        to_degrees(&text, 2.0 * PI)
    } else if vendor::is_match(&TURN, &text) {
        to_degrees(&text, 1.0)
    } else if text.contains("deg") {
        parse_float(&text).map(|number| format!("{}deg", number.rem_euclid(360.0)))
    } else {
        None
    };
    if let Some(converted) = converted {
        set_word(first, converted);
    }
    if name != "linear-gradient" && name != "repeating-linear-gradient" {
        return nodes;
    }
    let side = match nodes.first().map(ValueNode::value) {
        Some("0deg" | "0") => "top",
        Some("90deg") => "right",
        Some("180deg") => "bottom",
        Some("270deg") => "left",
        _ => return nodes,
    };
    let mut replaced = vec![ValueNode::word("to"), ValueNode::space(), ValueNode::word(side)];
    replaced.extend(nodes.into_iter().skip(1));
    replaced
}

/// A space, `at` and a space before the first comma.
fn is_radial(params: &[ValueNode]) -> bool {
    #[derive(PartialEq, Eq)]
    enum State {
        Before,
        At,
        After,
    }
    let mut state = State::Before;
    for param in params {
        if state == State::Before && param.is_space() {
            state = State::At;
        } else if state == State::At && param.value() == "at" {
            state = State::After;
        } else if state == State::After && param.is_space() {
            return true;
        } else if matches!(param, ValueNode::Div { .. }) {
            break;
        } else {
            state = State::Before;
        }
    }
    false
}

/// `to top left` becomes `bottom right`.
fn fix_direction(params: &mut Vec<ValueNode>) {
    let rest = params.split_off(params.len().min(2));
    *params = rest;
    for param in params.iter_mut() {
        if matches!(param, ValueNode::Div { .. }) {
            break;
        }
        if let ValueNode::Word(word) = param {
            *word = revert_direction(word);
        }
    }
}

/// Prefixed gradients measure angles from the east, counter-clockwise.
fn fix_angle(params: &mut [ValueNode]) {
    let Some(first) = params.first_mut() else {
        return;
    };
    let Some(number) = parse_float(first.value()) else {
        return;
    };
    let angle = round_float((450.0 - number).abs() % 360.0, 3);
    set_word(first, format!("{angle}deg"));
}

/// `circle at center` becomes `center, circle`.
fn fix_radial(params: &mut Vec<ValueNode>) {
    let at = (0..params.len().saturating_sub(2)).find(|&index| {
        params.get(index).is_some_and(ValueNode::is_space)
            && params.get(index + 1).is_some_and(|node| node.value() == "at")
            && params.get(index + 2).is_some_and(ValueNode::is_space)
    });
    let Some(at) = at else {
        return;
    };
    let end = (at + 3..params.len())
        .find(|&index| params.get(index).is_some_and(|node| matches!(node, ValueNode::Div { .. })))
        .unwrap_or(params.len());
    let div = params
        .get(end)
        .filter(|node| matches!(node, ValueNode::Div { .. }))
        .cloned();
    let position: Vec<ValueNode> = params.get(at + 3..end).unwrap_or_default().to_vec();
    let shape: Vec<ValueNode> = params.get(..at).unwrap_or_default().to_vec();
    let mut reordered = position;
    reordered.push(div.unwrap_or_else(comma_div));
    reordered.extend(shape);
    reordered.extend(params.split_off(end));
    *params = reordered;
}

fn convert_direction(params: &mut Vec<ValueNode>) {
    let Some(first) = params.first() else {
        return;
    };
    if first.value() == "to" {
        fix_direction(params);
    } else if first.value().contains("deg") {
        fix_angle(params);
    } else if is_radial(params) {
        fix_radial(params);
    }
}

/// Arguments split after each comma, the comma kept at the end of its group.
fn comma_groups(nodes: Vec<ValueNode>) -> Vec<Vec<ValueNode>> {
    let mut groups = vec![Vec::new()];
    for node in nodes {
        let split = node.is_div(",");
        if let Some(group) = groups.last_mut() {
            group.push(node);
        }
        if split {
            groups.push(Vec::new());
        }
    }
    groups
}

fn old_direction(groups: &mut Vec<Vec<ValueNode>>) {
    let Some(first) = groups.first() else {
        return;
    };
    let div = clone_div(first);
    if first.first().map(ValueNode::value) == Some("to") {
        let words = first
            .iter()
            .skip(2)
            .filter(|node| node.is_word())
            .map(|node| node.value().to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        let old = lookup(OLD_DIRECTIONS, &words).map_or(words, ToOwned::to_owned);
        if let Some(first_group) = groups.first_mut() {
            *first_group = vec![ValueNode::word(old), div];
        }
    } else {
        let default = lookup(OLD_DIRECTIONS, "bottom").unwrap_or_default();
        groups.insert(0, vec![ValueNode::word(default), div]);
    }
}

/// Color stops as `from()`, `to()` and `color-stop()`.
fn color_stops(groups: &mut [Vec<ValueNode>]) {
    let last = groups.len().saturating_sub(1);
    for (index, group) in groups.iter_mut().enumerate().skip(1) {
        let color = group.first().map(ValueNode::to_css).unwrap_or_default();
        let position = [group.get(1), group.get(2)]
            .into_iter()
            .flatten()
            .find(|node| node.is_word())
            .map(|node| node.value().to_owned());
        let stop = match position.as_deref() {
            None | Some("0%") if index == 1 => format!("from({color})"),
            None | Some("100%") if index == last => format!("to({color})"),
            Some(position) => format!("color-stop({position}, {color})"),
            None => format!("color-stop({color})"),
        };
        let div = group.last().filter(|node| node.is_div(",")).cloned();
        *group = vec![ValueNode::word(stop)];
        group.extend(div);
    }
}

/// `-webkit-gradient(linear, ...)`, or `false` when the gradient cannot be
/// expressed that way.
fn old_webkit(name: &str, node: &mut ValueNode) -> bool {
    let ValueNode::Function {
        name: function,
        nodes,
        ..
    } = node
    else {
        return false;
    };
    if name != "linear-gradient" {
        return false;
    }
    if nodes.first().is_some_and(|first| first.value().contains("deg")) {
        return false;
    }
    let text = value::stringify(nodes);
    if text.contains("px") || text.contains("-corner") || text.contains("-side") {
        return false;
    }
    let mut groups = comma_groups(nodes.clone());
    old_direction(&mut groups);
    color_stops(&mut groups);
    let flat: Vec<ValueNode> = groups.into_iter().flatten().collect();
    let mut rebuilt = vec![ValueNode::word("linear"), clone_div(&flat)];
    rebuilt.extend(flat);
    *nodes = rebuilt;
    "-webkit-gradient".clone_into(function);
    true
}

pub struct Gradient;

impl Gradient {
    pub const NAMES: &[&str] = &[
        "linear-gradient",
        "repeating-linear-gradient",
        "radial-gradient",
        "repeating-radial-gradient",
    ];
}

impl ValueHack for Gradient {
    fn replace(&self, handler: &ValueHandler, value: &str, prefix: &str) -> Option<String> {
        let mut ast = value::parse(value);
        for node in &mut ast {
            let ValueNode::Function { name, nodes, .. } = &mut *node else {
                continue;
            };
            if *name != handler.name {
                continue;
            }
            let params = new_direction(mem::take(nodes));
            *nodes = normalize(params, &handler.name);
            if prefix == "-webkit- old" {
                if !old_webkit(&handler.name, node) {
                    return None;
                }
            } else {
                convert_direction(nodes);
                *name = format!("{prefix}{name}");
            }
        }
        Some(value::stringify(&ast))
    }

    /// Masks, list markers and generated content only exist prefixed in
    /// WebKit.
    fn add(&self, handler: &ValueHandler, pass: &mut Pass<'_>, decl: NodeId, prefix: &str) {
        let Some(prop) = pass.sheet.declaration(decl).map(|found| found.prop.clone()) else {
            return;
        };
        let webkit_only =
            prop.contains("mask") || prop == "list-style" || prop == "list-style-image" || prop == "content";
        if webkit_only && prefix != "-webkit-" && prefix != "-webkit- old" {
            return;
        }
        rewrite_value(handler, pass, decl, prefix);
    }

    fn old(&self, handler: &ValueHandler, prefix: &str) -> Result<Option<OldValue>, PrefixerError> {
        let prefixed = format!("{prefix}{}", handler.name);
        if prefix != "-webkit-" {
            return OldValue::new(&handler.name, &prefixed, None, None).map(Some);
        }
        let kind = match handler.name.as_str() {
            "linear-gradient" => "linear",
            "repeating-linear-gradient" => "repeating-linear",
            "repeating-radial-gradient" => "repeating-radial",
            _ => "radial",
        };
        let regexp = Regex::new(&format!(
            r"(?i)(^|[\s,(])(-webkit-({kind}-gradient|gradient\(\s*{kind})($|[\s(,]))"
        ))?;
        OldValue::new(&handler.name, &prefixed, Some("-gradient"), Some(regexp)).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_compile() {
        for pattern in [&IS_DIRECTION, &GRAD, &RAD, &TURN, &LEADING_NUMBER] {
            assert!(pattern.is_some());
        }
    }

    fn rewrite(name: &str, value: &str, prefix: &str) -> Option<String> {
        let handler = ValueHandler::new(name, vec![prefix.to_owned()], &Gradient).unwrap();
        Gradient.replace(&handler, value, prefix)
    }

    #[test]
    fn right_angles_become_sides() {
        assert_eq!(
            rewrite("linear-gradient", "linear-gradient(0deg, red, blue)", "-webkit-").as_deref(),
            Some("-webkit-linear-gradient(bottom, red, blue)")
        );
        assert_eq!(
            rewrite("linear-gradient", "linear-gradient(to right, red, blue)", "-moz-").as_deref(),
            Some("-moz-linear-gradient(left, red, blue)")
        );
    }

    #[test]
    fn angles_turn_counter_clockwise() {
        assert_eq!(
            rewrite("linear-gradient", "linear-gradient(45deg, red, blue)", "-webkit-").as_deref(),
            Some("-webkit-linear-gradient(45deg, red, blue)")
        );
        assert_eq!(
            rewrite("linear-gradient", "linear-gradient(30deg, red, blue)", "-o-").as_deref(),
            Some("-o-linear-gradient(60deg, red, blue)")
        );
    }

    #[test]
    fn radial_position_moves_first() {
        assert_eq!(
            rewrite(
                "radial-gradient",
                "radial-gradient(circle at center, red, blue)",
                "-webkit-"
            )
            .as_deref(),
            Some("-webkit-radial-gradient(center, circle, red, blue)")
        );
    }

    #[test]
    fn oldest_webkit_syntax() {
        assert_eq!(
            rewrite("linear-gradient", "linear-gradient(red, blue)", "-webkit- old").as_deref(),
            Some("-webkit-gradient(linear, left top, left bottom, from(red), to(blue))")
        );
        assert_eq!(
            rewrite("linear-gradient", "linear-gradient(45deg, red, blue)", "-webkit- old"),
            None
        );
    }

    #[test]
    fn old_matcher_finds_both_webkit_spellings() {
        let handler = ValueHandler::new("linear-gradient", Vec::new(), &Gradient).unwrap();
        let old = Gradient.old(&handler, "-webkit-").unwrap().unwrap();
        assert!(old.check("-webkit-linear-gradient(top, red, blue)"));
        assert!(old.check("-webkit-gradient(linear, left top, left bottom, from(red), to(blue))"));
        assert!(!old.check("linear-gradient(red, blue)"));
    }
}
