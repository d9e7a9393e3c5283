#![cfg(test)]

use css_syntax::list;
use css_syntax::value::{self, ValueNode};

#[test]
fn values_print_back_unchanged() {
    for text in [
        "linear-gradient(to right, rgba(0, 0, 0, .5) 10%, #fff)",
        "1px solid  red",
        "\"a b\" 'c'",
        "[full-start] minmax(1em, 1fr) [main-start]",
        "a / b",
        "calc( 100% - 10px )",
    ] {
        assert_eq!(value::stringify(&value::parse(text)), text);
    }
}

#[test]
fn functions_nest() {
    let nodes = value::parse("image-set(url(a.png) 1x, url(b.png) 2x)");
    assert_eq!(nodes.len(), 1);
    let node = &nodes[0];
    assert!(node.is_function());
    assert_eq!(node.value(), "image-set");
    let groups = value::split_by_comma(node.nodes());
    assert_eq!(groups.len(), 2);
}

#[test]
fn walk_can_rewrite_words() {
    let mut nodes = value::parse("opacity 1s, transform 2s");
    value::walk(&mut nodes, &mut |node| {
        if let ValueNode::Word(word) = node
            && word == "transform"
        {
            *word = "-webkit-transform".to_owned();
        }
        true
    });
    assert_eq!(value::stringify(&nodes), "opacity 1s, -webkit-transform 2s");
}

#[test]
fn lists_keep_trailing_empty_comma_item() {
    assert_eq!(list::comma("a,"), vec!["a", ""]);
    assert_eq!(list::space("a (b c) d"), vec!["a", "(b c)", "d"]);
}
