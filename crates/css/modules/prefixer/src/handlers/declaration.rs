//! Prefixed copies of declarations.

use crate::pass::Pass;
use crate::vendor::{other_prefixes, remove_note};
use css_syntax::{Declaration, NodeId, Stylesheet};

/// Property-specific behaviour. Every method has the generic behaviour as
/// its default, so a quirk only overrides what differs.
pub trait DeclarationHack: Sync {
    /// Prefixes to emit for the planned ones.
    fn adjust_prefixes(&self, prefixes: Vec<String>) -> Vec<String> {
        prefixes
    }

    /// Whether the declaration should be prefixed at all.
    fn check(&self, _sheet: &Stylesheet, _decl: NodeId) -> bool {
        true
    }

    /// The prefixed property name for an unprefixed `prop`.
    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        format!("{prefix}{prop}")
    }

    /// The standard property a prefixed name stands for.
    fn normalize(&self, prop: &str) -> String {
        prop.to_owned()
    }

    /// Every prefixed name the remove pass should delete for `prefix`.
    fn old(&self, prop: &str, prefix: &str) -> Vec<String> {
        vec![self.prefixed(prop, prefix)]
    }

    /// Rewrite a detached copy for `prefix`. Returning `false` drops the copy.
    fn set(&self, decl: &mut Declaration, prefix: &str) -> bool {
        decl.prop = self.prefixed(&decl.prop, prefix);
        true
    }

    /// Insert the prefixed copy. `prefixes` holds the prefixes added so far
    /// including this one.
    fn insert(
        &self,
        handler: &DeclarationHandler,
        pass: &mut Pass<'_>,
        decl: NodeId,
        prefix: &str,
        prefixes: &[String],
    ) -> Option<NodeId> {
        insert_clone(handler, pass, decl, prefix, prefixes)
    }

    fn add(
        &self,
        handler: &DeclarationHandler,
        pass: &mut Pass<'_>,
        decl: NodeId,
        prefix: &str,
        prefixes: &[String],
    ) -> Option<NodeId> {
        add_unless_present(handler, pass, decl, prefix, prefixes)
    }
}

/// A property without quirks.
pub struct Plain;

impl DeclarationHack for Plain {}

/// A declaration feature with the prefixes the plan wants for it.
pub struct DeclarationHandler {
    pub name: String,
    pub prefixes: Vec<String>,
    pub hack: &'static dyn DeclarationHack,
}

/// Skip prefixes that already have a declaration in the group, or values
/// tied to another vendor, then insert.
pub fn add_unless_present(
    handler: &DeclarationHandler,
    pass: &mut Pass<'_>,
    decl: NodeId,
    prefix: &str,
    prefixes: &[String],
) -> Option<NodeId> {
    let current = pass.sheet.declaration(decl)?;
    let prefixed = handler.hack.prefixed(&current.prop, prefix);
    if other_prefixes(&current.value, prefix) || pass.group_has_prop(decl, &prefixed) {
        return None;
    }
    handler.hack.insert(handler, pass, decl, prefix, prefixes)
}

/// Clone `decl`, let the hack rewrite the copy and insert it before the
/// original unless an identical declaration already exists.
pub fn insert_clone(
    handler: &DeclarationHandler,
    pass: &mut Pass<'_>,
    decl: NodeId,
    prefix: &str,
    prefixes: &[String],
) -> Option<NodeId> {
    let mut cloned = pass.sheet.get(decl)?.clone();
    let keep = cloned
        .as_declaration_mut()
        .is_some_and(|copy| handler.hack.set(copy, prefix));
    if !keep {
        return None;
    }
    let parent = pass.sheet.parent(decl)?;
    let copy = cloned.as_declaration()?;
    if pass
        .sheet
        .some_declaration(parent, |other| other.prop == copy.prop && other.value == copy.value)
    {
        return None;
    }
    if need_cascade(pass, decl) {
        cloned.raws.before = calc_before(pass, prefixes, decl, prefix);
    }
    Some(pass.sheet.insert_before(decl, cloned))
}

/// Insert a copy of `decl` with a different property and value, indented
/// like the other prefixed copies.
pub fn insert_variant(
    pass: &mut Pass<'_>,
    decl: NodeId,
    prop: String,
    value: String,
    prefixes: &[String],
    prefix: &str,
) -> Option<NodeId> {
    let before = need_cascade(pass, decl).then(|| calc_before(pass, prefixes, decl, prefix));
    pass.sheet.clone_before(decl, |node| {
        if let Some(before) = before {
            node.raws.before = before;
        }
        if let Some(copy) = node.as_declaration_mut() {
            copy.prop = prop;
            copy.value = value;
        }
    })
}

/// Whether prefixed copies should be indented so the values line up.
pub fn need_cascade(pass: &Pass<'_>, decl: NodeId) -> bool {
    pass.prefixes.options().cascade
        && pass
            .sheet
            .raws(decl)
            .is_some_and(|raws| raws.before.contains('\n'))
}

fn max_prefixed(pass: &mut Pass<'_>, prefixes: &[String], decl: NodeId) -> usize {
    *pass.memo.max_prefixed.entry(decl).or_insert_with(|| {
        prefixes
            .iter()
            .map(|prefix| remove_note(prefix).len())
            .max()
            .unwrap_or(0)
    })
}

/// Indentation of `decl` padded by the length difference between the
/// longest prefix and `prefix`.
pub fn calc_before(pass: &mut Pass<'_>, prefixes: &[String], decl: NodeId, prefix: &str) -> String {
    let max = max_prefixed(pass, prefixes, decl);
    let diff = max.saturating_sub(remove_note(prefix).len());
    let mut before = pass
        .sheet
        .raws(decl)
        .map(|raws| raws.before.clone())
        .unwrap_or_default();
    before.push_str(&" ".repeat(diff));
    before
}

/// Give `decl` back the smallest indentation found among its prefixed
/// neighbours above.
fn restore_before(pass: &mut Pass<'_>, decl: NodeId) {
    let Some(before) = pass.sheet.raws(decl).map(|raws| raws.before.clone()) else {
        return;
    };
    let mut lines: Vec<String> = before.split('\n').map(ToOwned::to_owned).collect();
    let mut min = lines.last().cloned().unwrap_or_default();
    for other in pass.group(decl, true) {
        let last = pass
            .sheet
            .raws(other)
            .and_then(|raws| raws.before.split('\n').next_back().map(ToOwned::to_owned))
            .unwrap_or_default();
        if last.len() < min.len() {
            min = last;
        }
    }
    if let Some(line) = lines.last_mut() {
        *line = min;
    }
    if let Some(raws) = pass.sheet.raws_mut(decl) {
        raws.before = lines.join("\n");
    }
}

impl DeclarationHandler {
    /// Add every planned prefix the declaration's scope allows and return
    /// the ones that were emitted.
    pub fn process(&self, pass: &mut Pass<'_>, decl: NodeId) -> Vec<String> {
        if !self.hack.check(pass.sheet, decl) {
            return Vec::new();
        }
        let parent = pass.parent_prefix(decl);
        let mut added: Vec<String> = Vec::new();
        for prefix in &self.prefixes {
            if parent.as_deref().is_some_and(|scope| scope != remove_note(prefix)) {
                continue;
            }
            let mut attempt = added.clone();
            attempt.push(prefix.clone());
            if self.hack.add(self, pass, decl, prefix, &attempt).is_some() {
                added.push(prefix.clone());
            }
        }
        if !added.is_empty() {
            log::trace!("{}: added {}", self.name, added.join(", "));
        }
        if !added.is_empty() && need_cascade(pass, decl) {
            restore_before(pass, decl);
            let before = calc_before(pass, &added, decl, "");
            if let Some(raws) = pass.sheet.raws_mut(decl) {
                raws.before = before;
            }
        }
        added
    }
}
