//! Component-value splitting for declaration values and at-rule params.
//!
//! The node shapes follow the usual CSS value-parser model: words, spaces,
//! dividers (`,` `/` `:`), strings, comments and functions. Printing a parsed
//! value with [`stringify`] gives back the original text.

use cssparser::{ParseError, Parser, ParserInput, Token};

/// One component of a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueNode {
    /// Anything that is not one of the other kinds: `red`, `10px`, `#fff`.
    Word(String),
    /// A whitespace run between words.
    Space(String),
    /// `,`, `/` or `:` with the whitespace around it.
    Div {
        value: String,
        before: String,
        after: String,
    },
    /// A quoted string; `value` excludes the quotes.
    Str { quote: char, value: String },
    /// `name(...)`; an unnamed function is a plain parenthesized group.
    Function {
        name: String,
        before: String,
        after: String,
        nodes: Vec<ValueNode>,
    },
    /// `/* ... */`
    Comment(String),
}

impl ValueNode {
    /// A new word node.
    pub fn word(value: impl Into<String>) -> Self {
        Self::Word(value.into())
    }

    /// A single-space node.
    pub fn space() -> Self {
        Self::Space(" ".to_owned())
    }

    /// A divider with no surrounding whitespace.
    pub fn div(value: impl Into<String>) -> Self {
        Self::Div {
            value: value.into(),
            before: String::new(),
            after: String::new(),
        }
    }

    /// A function node around already parsed arguments.
    pub fn function(name: impl Into<String>, nodes: Vec<Self>) -> Self {
        Self::Function {
            name: name.into(),
            before: String::new(),
            after: String::new(),
            nodes,
        }
    }

    /// The primary text of the node: the word, divider or function name.
    pub fn value(&self) -> &str {
        match self {
            Self::Word(value) | Self::Space(value) | Self::Comment(value) => value,
            Self::Div { value, .. } | Self::Str { value, .. } => value,
            Self::Function { name, .. } => name,
        }
    }

    pub const fn is_word(&self) -> bool {
        matches!(self, Self::Word(_))
    }

    pub const fn is_space(&self) -> bool {
        matches!(self, Self::Space(_))
    }

    pub fn is_div(&self, divider: &str) -> bool {
        matches!(self, Self::Div { value, .. } if value == divider)
    }

    pub const fn is_function(&self) -> bool {
        matches!(self, Self::Function { .. })
    }

    /// Arguments of a function node, empty for everything else.
    pub fn nodes(&self) -> &[Self] {
        match self {
            Self::Function { nodes, .. } => nodes,
            _ => &[],
        }
    }

    /// Print this node back to text.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        write_value_node(self, &mut out);
        out
    }
}

/// Parse a value into component nodes.
pub fn parse(value: &str) -> Vec<ValueNode> {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    parse_nodes(&mut parser)
}

fn push_word(nodes: &mut Vec<ValueNode>, text: &str) {
    if let Some(ValueNode::Word(previous)) = nodes.last_mut() {
        previous.push_str(text);
    } else {
        nodes.push(ValueNode::Word(text.to_owned()));
    }
}

fn push_div(nodes: &mut Vec<ValueNode>, divider: &str) {
    let before = match nodes.last() {
        Some(ValueNode::Space(space)) => {
            let space = space.clone();
            nodes.pop();
            space
        }
        _ => String::new(),
    };
    nodes.push(ValueNode::Div {
        value: divider.to_owned(),
        before,
        after: String::new(),
    });
}

fn push_space(nodes: &mut Vec<ValueNode>, space: &str) {
    match nodes.last_mut() {
        Some(ValueNode::Div { after, .. }) if after.is_empty() => after.push_str(space),
        Some(ValueNode::Space(previous)) => previous.push_str(space),
        _ => nodes.push(ValueNode::Space(space.to_owned())),
    }
}

fn drain_block(input: &mut Parser<'_, '_>) {
    let _drained = input.parse_nested_block(|nested| {
        while nested.next_including_whitespace_and_comments().is_ok() {}
        Ok::<_, ParseError<'_, ()>>(())
    });
}

fn function_node(name: &str, input: &mut Parser<'_, '_>) -> ValueNode {
    let mut nodes = input
        .parse_nested_block(|nested| Ok::<_, ParseError<'_, ()>>(parse_nodes(nested)))
        .unwrap_or_default();
    let before = match nodes.first() {
        Some(ValueNode::Space(space)) => {
            let space = space.clone();
            nodes.remove(0);
            space
        }
        _ => String::new(),
    };
    let after = match nodes.last() {
        Some(ValueNode::Space(space)) => {
            let space = space.clone();
            nodes.pop();
            space
        }
        _ => String::new(),
    };
    ValueNode::Function {
        name: name.to_owned(),
        before,
        after,
        nodes,
    }
}

fn parse_nodes(input: &mut Parser<'_, '_>) -> Vec<ValueNode> {
    let mut nodes = Vec::new();
    loop {
        let start = input.position();
        let Ok(token) = input.next_including_whitespace_and_comments().cloned() else {
            break;
        };
        match token {
            Token::WhiteSpace(space) => push_space(&mut nodes, &space),
            Token::Comma => push_div(&mut nodes, ","),
            Token::Colon => push_div(&mut nodes, ":"),
            Token::Delim('/') => push_div(&mut nodes, "/"),
            Token::Comment(text) => nodes.push(ValueNode::Comment((*text).to_owned())),
            Token::Function(name) => {
                let node = function_node(&name, input);
                nodes.push(node);
            }
            Token::ParenthesisBlock => {
                let node = function_node("", input);
                nodes.push(node);
            }
            Token::SquareBracketBlock | Token::CurlyBracketBlock => {
                drain_block(input);
                push_word(&mut nodes, input.slice_from(start));
            }
            Token::QuotedString(_) => {
                let raw = input.slice_from(start);
                let quote = raw.chars().next().unwrap_or('"');
                let inner = raw.get(quote.len_utf8()..).unwrap_or_default();
                let inner = inner.strip_suffix(quote).unwrap_or(inner);
                nodes.push(ValueNode::Str {
                    quote,
                    value: inner.to_owned(),
                });
            }
            _ => push_word(&mut nodes, input.slice_from(start)),
        }
    }
    nodes
}

fn write_value_node(node: &ValueNode, out: &mut String) {
    match node {
        ValueNode::Word(value) | ValueNode::Space(value) => out.push_str(value),
        ValueNode::Div {
            value,
            before,
            after,
        } => {
            out.push_str(before);
            out.push_str(value);
            out.push_str(after);
        }
        ValueNode::Str { quote, value } => {
            out.push(*quote);
            out.push_str(value);
            out.push(*quote);
        }
        ValueNode::Function {
            name,
            before,
            after,
            nodes,
        } => {
            out.push_str(name);
            out.push('(');
            out.push_str(before);
            for child in nodes {
                write_value_node(child, out);
            }
            out.push_str(after);
            out.push(')');
        }
        ValueNode::Comment(text) => {
            out.push_str("/*");
            out.push_str(text);
            out.push_str("*/");
        }
    }
}

/// Print nodes back to text.
pub fn stringify(nodes: &[ValueNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_value_node(node, &mut out);
    }
    out
}

/// Visit every node depth-first. Returning `false` from `visit` skips the
/// children of a function node.
pub fn walk(nodes: &mut [ValueNode], visit: &mut impl FnMut(&mut ValueNode) -> bool) {
    for node in nodes {
        let descend = visit(node);
        if descend && let ValueNode::Function { nodes: children, .. } = node {
            walk(children, visit);
        }
    }
}

/// Split nodes at top-level commas, dropping the dividers themselves.
pub fn split_by_comma(nodes: &[ValueNode]) -> Vec<Vec<ValueNode>> {
    let mut groups = vec![Vec::new()];
    for node in nodes {
        if node.is_div(",") {
            groups.push(Vec::new());
        } else if let Some(group) = groups.last_mut() {
            group.push(node.clone());
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divider_absorbs_surrounding_space() {
        let nodes = parse("a , b");
        assert_eq!(nodes.len(), 3);
        assert_eq!(
            nodes.get(1),
            Some(&ValueNode::Div {
                value: ",".to_owned(),
                before: " ".to_owned(),
                after: " ".to_owned(),
            })
        );
    }

    #[test]
    fn function_keeps_inner_padding() {
        let nodes = parse("calc( 1px + 2px )");
        let Some(ValueNode::Function { name, before, after, nodes: args }) = nodes.first() else {
            panic!("expected a function");
        };
        assert_eq!(name, "calc");
        assert_eq!(before, " ");
        assert_eq!(after, " ");
        assert_eq!(stringify(args), "1px + 2px");
    }
}
