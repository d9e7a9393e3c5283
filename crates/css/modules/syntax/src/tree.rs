//! Arena-backed stylesheet tree and its editing operations.

use core::fmt;
use indextree::{Arena, NodeId};

/// Where a node started in the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.line, self.column)
    }
}

/// Raw text surrounding a node, used to print it back unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Raws {
    /// Whitespace (and stray semicolons) before the node.
    pub before: String,
    /// Declarations: text between the property and the value (`": "`).
    /// Rules and at-rules: whitespace before `{` or `;`.
    pub between: String,
    /// Whitespace before the closing `}` of a block, or at the end of the sheet.
    pub after: String,
    /// At-rules: whitespace between the name and the params.
    pub after_name: String,
    /// Declarations: the raw `!important` suffix including leading whitespace.
    pub important: String,
    /// Blocks: whether the last declaration was terminated by `;`.
    pub semicolon: bool,
}

/// A `prop: value` declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Property name as written.
    pub prop: String,
    /// Raw value text without the `!important` suffix.
    pub value: String,
    /// Whether the declaration was marked `!important`.
    pub important: bool,
}

/// A qualified rule (`selector { ... }`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    /// Raw selector list.
    pub selector: String,
}

/// An at-rule, with or without a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtRule {
    /// Name without the leading `@`.
    pub name: String,
    /// Raw prelude text.
    pub params: String,
    /// `@media x { }` has a block, `@import x;` does not.
    pub has_block: bool,
}

/// A `/* ... */` comment between statements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    /// Text between `/*` and `*/`.
    pub text: String,
}

/// What a node is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// The stylesheet itself.
    Root,
    /// A qualified rule.
    Rule(Rule),
    /// An at-rule.
    AtRule(AtRule),
    /// A declaration.
    Declaration(Declaration),
    /// A comment.
    Comment(Comment),
}

/// One entry of the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    /// The node payload.
    pub kind: NodeKind,
    /// Surrounding raw text.
    pub raws: Raws,
    /// Start position in the parsed source, `None` for synthesized nodes.
    pub source: Option<SourcePosition>,
}

impl Node {
    fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            raws: Raws::default(),
            source: None,
        }
    }

    /// An empty root node.
    pub fn root() -> Self {
        Self::with_kind(NodeKind::Root)
    }

    /// A new `prop: value` declaration.
    pub fn declaration(prop: impl Into<String>, value: impl Into<String>) -> Self {
        let mut node = Self::with_kind(NodeKind::Declaration(Declaration {
            prop: prop.into(),
            value: value.into(),
            important: false,
        }));
        node.raws.between = ": ".to_owned();
        node
    }

    /// A new rule with an empty block.
    pub fn rule(selector: impl Into<String>) -> Self {
        let mut node = Self::with_kind(NodeKind::Rule(Rule {
            selector: selector.into(),
        }));
        node.raws.between = " ".to_owned();
        node
    }

    /// A new at-rule with an empty block.
    pub fn at_rule(name: impl Into<String>, params: impl Into<String>) -> Self {
        let params = params.into();
        let mut node = Self::with_kind(NodeKind::AtRule(AtRule {
            name: name.into(),
            has_block: true,
            params: params.clone(),
        }));
        if !params.is_empty() {
            node.raws.after_name = " ".to_owned();
        }
        node.raws.between = " ".to_owned();
        node
    }

    /// A new comment.
    pub fn comment(text: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Comment(Comment { text: text.into() }))
    }

    /// Copy the indentation of another node.
    #[must_use]
    pub fn with_before(mut self, before: impl Into<String>) -> Self {
        self.raws.before = before.into();
        self
    }

    pub const fn as_declaration(&self) -> Option<&Declaration> {
        match &self.kind {
            NodeKind::Declaration(decl) => Some(decl),
            _ => None,
        }
    }

    pub const fn as_declaration_mut(&mut self) -> Option<&mut Declaration> {
        match &mut self.kind {
            NodeKind::Declaration(decl) => Some(decl),
            _ => None,
        }
    }

    pub const fn as_rule(&self) -> Option<&Rule> {
        match &self.kind {
            NodeKind::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    pub const fn as_rule_mut(&mut self) -> Option<&mut Rule> {
        match &mut self.kind {
            NodeKind::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    pub const fn as_at_rule(&self) -> Option<&AtRule> {
        match &self.kind {
            NodeKind::AtRule(at_rule) => Some(at_rule),
            _ => None,
        }
    }

    pub const fn as_at_rule_mut(&mut self) -> Option<&mut AtRule> {
        match &mut self.kind {
            NodeKind::AtRule(at_rule) => Some(at_rule),
            _ => None,
        }
    }

    pub const fn as_comment(&self) -> Option<&Comment> {
        match &self.kind {
            NodeKind::Comment(comment) => Some(comment),
            _ => None,
        }
    }

    /// Whether this node may hold children.
    pub const fn is_container(&self) -> bool {
        match &self.kind {
            NodeKind::Root | NodeKind::Rule(_) => true,
            NodeKind::AtRule(at_rule) => at_rule.has_block,
            NodeKind::Declaration(_) | NodeKind::Comment(_) => false,
        }
    }
}

/// A parsed stylesheet.
///
/// Node ids stay valid until the node is removed; removed ids are reported by
/// [`Stylesheet::is_removed`] and ignored by every accessor.
#[derive(Clone, Debug)]
pub struct Stylesheet {
    arena: Arena<Node>,
    root: NodeId,
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Stylesheet {
    /// An empty stylesheet.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(Node::root());
        Self { arena, root }
    }

    /// Parse CSS text. Never fails; malformed input yields a best-effort tree.
    pub fn parse(css: &str) -> Self {
        crate::parse_stylesheet(css)
    }

    pub const fn root(&self) -> NodeId {
        self.root
    }

    pub fn is_removed(&self, id: NodeId) -> bool {
        id.is_removed(&self.arena)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if self.is_removed(id) {
            return None;
        }
        self.arena.get(id).map(indextree::Node::get)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if self.is_removed(id) {
            return None;
        }
        self.arena.get_mut(id).map(indextree::Node::get_mut)
    }

    /// The declaration stored at `id`, if it is one.
    pub fn declaration(&self, id: NodeId) -> Option<&Declaration> {
        self.get(id).and_then(Node::as_declaration)
    }

    pub fn declaration_mut(&mut self, id: NodeId) -> Option<&mut Declaration> {
        self.get_mut(id).and_then(Node::as_declaration_mut)
    }

    pub fn rule(&self, id: NodeId) -> Option<&Rule> {
        self.get(id).and_then(Node::as_rule)
    }

    pub fn rule_mut(&mut self, id: NodeId) -> Option<&mut Rule> {
        self.get_mut(id).and_then(Node::as_rule_mut)
    }

    pub fn at_rule(&self, id: NodeId) -> Option<&AtRule> {
        self.get(id).and_then(Node::as_at_rule)
    }

    pub fn at_rule_mut(&mut self, id: NodeId) -> Option<&mut AtRule> {
        self.get_mut(id).and_then(Node::as_at_rule_mut)
    }

    pub fn comment(&self, id: NodeId) -> Option<&Comment> {
        self.get(id).and_then(Node::as_comment)
    }

    pub fn raws(&self, id: NodeId) -> Option<&Raws> {
        self.get(id).map(|node| &node.raws)
    }

    pub fn raws_mut(&mut self, id: NodeId) -> Option<&mut Raws> {
        self.get_mut(id).map(|node| &mut node.raws)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        if self.is_removed(id) {
            return None;
        }
        self.arena.get(id).and_then(indextree::Node::parent)
    }

    /// Live children of `id`, in order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        if self.is_removed(id) {
            return Vec::new();
        }
        id.children(&self.arena).collect()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        if self.is_removed(id) {
            return None;
        }
        self.arena.get(id).and_then(indextree::Node::previous_sibling)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        if self.is_removed(id) {
            return None;
        }
        self.arena.get(id).and_then(indextree::Node::next_sibling)
    }

    /// Position of `id` among its siblings.
    pub fn index(&self, id: NodeId) -> usize {
        if self.is_removed(id) {
            return 0;
        }
        id.preceding_siblings(&self.arena).count().saturating_sub(1)
    }

    /// Ancestors of `id`, closest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        if self.is_removed(id) {
            return Vec::new();
        }
        id.ancestors(&self.arena).skip(1).collect()
    }

    /// All descendants of `id` in document order, excluding `id` itself.
    ///
    /// The result is a snapshot: editing the tree while iterating it is fine,
    /// callers skip ids that have been removed in the meantime.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        if self.is_removed(id) {
            return Vec::new();
        }
        id.descendants(&self.arena).skip(1).collect()
    }

    fn descendants_where(&self, scope: NodeId, keep: fn(&Node) -> bool) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(keep))
            .collect()
    }

    /// Every declaration under `scope`, in document order.
    pub fn walk_declarations(&self, scope: NodeId) -> Vec<NodeId> {
        self.descendants_where(scope, |node| node.as_declaration().is_some())
    }

    /// Every rule under `scope`, in document order.
    pub fn walk_rules(&self, scope: NodeId) -> Vec<NodeId> {
        self.descendants_where(scope, |node| node.as_rule().is_some())
    }

    /// Every at-rule under `scope`, in document order.
    pub fn walk_at_rules(&self, scope: NodeId) -> Vec<NodeId> {
        self.descendants_where(scope, |node| node.as_at_rule().is_some())
    }

    /// Every comment under `scope`, in document order.
    pub fn walk_comments(&self, scope: NodeId) -> Vec<NodeId> {
        self.descendants_where(scope, |node| node.as_comment().is_some())
    }

    /// Direct declaration children of `parent`.
    pub fn child_declarations(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent)
            .into_iter()
            .filter(|id| self.declaration(*id).is_some())
            .collect()
    }

    /// Whether any direct child declaration of `parent` satisfies `test`.
    pub fn some_declaration(
        &self,
        parent: NodeId,
        mut test: impl FnMut(&Declaration) -> bool,
    ) -> bool {
        self.children(parent)
            .into_iter()
            .filter_map(|id| self.declaration(id))
            .any(|decl| test(decl))
    }

    /// The first direct child declaration of `parent` with this property.
    pub fn find_declaration(&self, parent: NodeId, prop: &str) -> Option<NodeId> {
        self.children(parent)
            .into_iter()
            .find(|id| self.declaration(*id).is_some_and(|decl| decl.prop == prop))
    }

    /// Add a detached node to the arena without attaching it anywhere.
    pub fn create(&mut self, node: Node) -> NodeId {
        self.arena.new_node(node)
    }

    /// Insert `node` right before `anchor` and return its id.
    pub fn insert_before(&mut self, anchor: NodeId, node: Node) -> NodeId {
        let id = self.arena.new_node(node);
        anchor.insert_before(id, &mut self.arena);
        id
    }

    /// Insert `node` right after `anchor` and return its id.
    pub fn insert_after(&mut self, anchor: NodeId, node: Node) -> NodeId {
        let id = self.arena.new_node(node);
        anchor.insert_after(id, &mut self.arena);
        id
    }

    /// Append `node` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.arena.new_node(node);
        parent.append(id, &mut self.arena);
        id
    }

    /// Insert `node` as the first child of `parent`.
    pub fn prepend(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.arena.new_node(node);
        parent.prepend(id, &mut self.arena);
        id
    }

    /// Attach a detached subtree (see [`Stylesheet::clone_subtree`]) before `anchor`.
    pub fn attach_before(&mut self, anchor: NodeId, detached: NodeId) {
        anchor.insert_before(detached, &mut self.arena);
    }

    /// Attach a detached subtree after `anchor`.
    pub fn attach_after(&mut self, anchor: NodeId, detached: NodeId) {
        anchor.insert_after(detached, &mut self.arena);
    }

    /// Attach a detached subtree as the last child of `parent`.
    pub fn attach_append(&mut self, parent: NodeId, detached: NodeId) {
        parent.append(detached, &mut self.arena);
    }

    /// Deep-copy `id` and its descendants into a detached subtree.
    pub fn clone_subtree(&mut self, id: NodeId) -> Option<NodeId> {
        let node = self.get(id)?.clone();
        let copy = self.arena.new_node(node);
        for child in self.children(id) {
            if let Some(child_copy) = self.clone_subtree(child) {
                copy.append(child_copy, &mut self.arena);
            }
        }
        Some(copy)
    }

    /// Deep-copy `id`, let `edit` adjust the copy, and insert it before `id`.
    pub fn clone_before(&mut self, id: NodeId, edit: impl FnOnce(&mut Node)) -> Option<NodeId> {
        let copy = self.clone_subtree(id)?;
        if let Some(node) = self.arena.get_mut(copy) {
            edit(node.get_mut());
        }
        self.attach_before(id, copy);
        Some(copy)
    }

    /// Deep-copy `id`, let `edit` adjust the copy, and insert it after `id`.
    pub fn clone_after(&mut self, id: NodeId, edit: impl FnOnce(&mut Node)) -> Option<NodeId> {
        let copy = self.clone_subtree(id)?;
        if let Some(node) = self.arena.get_mut(copy) {
            edit(node.get_mut());
        }
        self.attach_after(id, copy);
        Some(copy)
    }

    /// Remove `id` together with its descendants.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_removed(id) && id != self.root {
            id.remove_subtree(&mut self.arena);
        }
    }

    /// Remove every child of `id`.
    pub fn remove_children(&mut self, id: NodeId) {
        for child in self.children(id) {
            self.remove(child);
        }
    }

    /// Print the tree back to CSS.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        crate::printer::write_node(self, self.root, false, &mut out);
        out
    }

    /// Print a single node (and its block) without the surrounding `before` raw.
    pub fn node_to_css(&self, id: NodeId) -> String {
        let mut out = String::new();
        crate::printer::write_node(self, id, false, &mut out);
        if let Some(raws) = self.raws(id) {
            if let Some(stripped) = out.strip_prefix(raws.before.as_str()) {
                return stripped.to_owned();
            }
        }
        out
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.to_css())
    }
}
