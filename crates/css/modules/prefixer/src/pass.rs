//! State shared by the handlers during one processing run.

use crate::diagnostics::Diagnostics;
use crate::options::GridMode;
use crate::prefixes::Prefixes;
use crate::vendor;
use css_syntax::{NodeId, NodeKind, Stylesheet};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

static RULE_PREFIX: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r":(-\w+-)").ok());

/// Per-node facts computed lazily during a run.
///
/// Clones get fresh ids, so nothing cached here leaks into copies.
#[derive(Debug, Default)]
pub struct NodeMemo {
    pub(crate) parent_prefix: HashMap<NodeId, Option<String>>,
    pub(crate) disabled: HashMap<NodeId, bool>,
    pub(crate) self_disabled: HashSet<NodeId>,
    pub(crate) grid_status: HashMap<NodeId, GridMode>,
    /// Rewritten values per prefix, in the order the prefixes were added.
    pub(crate) values: HashMap<NodeId, Vec<(String, String)>>,
    pub(crate) max_prefixed: HashMap<NodeId, usize>,
}

/// A stylesheet being processed with one plan.
pub struct Pass<'run> {
    pub sheet: &'run mut Stylesheet,
    pub prefixes: &'run Prefixes,
    pub memo: NodeMemo,
    pub diagnostics: Diagnostics,
}

impl<'run> Pass<'run> {
    pub fn new(sheet: &'run mut Stylesheet, prefixes: &'run Prefixes) -> Self {
        Self {
            sheet,
            prefixes,
            memo: NodeMemo::default(),
            diagnostics: Diagnostics::default(),
        }
    }

    /// Record a warning about `node`.
    pub fn warn(&mut self, node: NodeId, message: impl Into<String>) {
        self.diagnostics.warn(self.sheet, node, message);
    }

    /// Record a warning pointing at `word` inside `node`.
    pub fn warn_word(&mut self, node: NodeId, message: impl Into<String>, word: &str) {
        self.diagnostics.warn_word(self.sheet, node, message, word);
    }

    /// The vendor a node is already scoped to: a prefixed declaration,
    /// a rule with a prefixed pseudo-class, or a prefixed at-rule, looked up
    /// through the ancestors.
    pub fn parent_prefix(&mut self, node: NodeId) -> Option<String> {
        if let Some(cached) = self.memo.parent_prefix.get(&node) {
            return cached.clone();
        }
        let kind = self.sheet.get(node).map(|found| found.kind.clone());
        let found = match kind {
            None | Some(NodeKind::Root) => None,
            Some(NodeKind::Declaration(decl)) if decl.prop.starts_with('-') => {
                Some(vendor::prefix(&decl.prop).to_owned())
            }
            Some(NodeKind::Rule(rule)) if rule.selector.contains(":-") => RULE_PREFIX
                .as_ref()
                .and_then(|regex| regex.captures(&rule.selector))
                .and_then(|captures| captures.get(1))
                .map(|prefix| prefix.as_str().to_owned()),
            Some(NodeKind::AtRule(at_rule)) if at_rule.name.starts_with('-') => {
                Some(vendor::prefix(&at_rule.name).to_owned())
            }
            Some(_) => self.sheet.parent(node).and_then(|parent| self.parent_prefix(parent)),
        };
        let known = found.filter(|prefix| {
            self.prefixes
                .browsers()
                .all_prefixes()
                .iter()
                .any(|known| known == prefix)
        });
        self.memo.parent_prefix.insert(node, known.clone());
        known
    }

    /// Prefixed values recorded for `decl` so far.
    pub fn recorded_values(&self, decl: NodeId) -> &[(String, String)] {
        self.memo.values.get(&decl).map_or(&[], Vec::as_slice)
    }

    /// Record the fully rewritten value of `decl` for `prefix`.
    pub fn record_value(&mut self, decl: NodeId, prefix: &str, value: String) {
        let entries = self.memo.values.entry(decl).or_default();
        if let Some(entry) = entries.iter_mut().find(|(known, _)| known == prefix) {
            entry.1 = value;
        } else {
            entries.push((prefix.to_owned(), value));
        }
    }

    /// Direct declaration siblings around `decl` that belong to the same
    /// property, nearest first.
    ///
    /// Walking up stops before an unprefixed declaration of the property
    /// whose value has no vendor prefix; walking down stops right after one.
    pub fn group(&self, decl: NodeId, upward: bool) -> Vec<NodeId> {
        let Some(prop) = self.sheet.declaration(decl).map(|found| found.prop.clone()) else {
            return Vec::new();
        };
        let unprefixed = self.prefixes.unprefixed(&prop);
        let browsers = self.prefixes.browsers();
        let mut members = Vec::new();
        let mut cursor = decl;
        loop {
            let next = if upward {
                self.sheet.prev_sibling(cursor)
            } else {
                self.sheet.next_sibling(cursor)
            };
            let Some(other) = next else {
                break;
            };
            cursor = other;
            let Some(other_decl) = self.sheet.declaration(other) else {
                continue;
            };
            let plain = other_decl.prop == unprefixed && !browsers.with_prefix(&other_decl.value);
            if upward && plain {
                break;
            }
            if self.prefixes.unprefixed(&other_decl.prop) != unprefixed {
                break;
            }
            members.push(other);
            if !upward && plain {
                break;
            }
        }
        members
    }

    /// Whether any group member above or below `decl` has property `prop`.
    pub fn group_has_prop(&self, decl: NodeId, prop: &str) -> bool {
        [true, false].into_iter().any(|upward| {
            self.group(decl, upward)
                .into_iter()
                .any(|other| self.sheet.declaration(other).is_some_and(|found| found.prop == prop))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_compile() {
        assert!(RULE_PREFIX.is_some());
    }

    #[test]
    fn prefixed_selectors_mark_their_children() {
        let prefixes = Prefixes::for_tests(&["chrome 20"]);
        let mut sheet = Stylesheet::parse("a:-moz-placeholder { color: red } b { color: blue }");
        let decls = sheet.walk_declarations(sheet.root());
        let mut pass = Pass::new(&mut sheet, &prefixes);
        assert_eq!(pass.parent_prefix(decls[0]).as_deref(), Some("-moz-"));
        assert_eq!(pass.parent_prefix(decls[1]), None);
    }
}
