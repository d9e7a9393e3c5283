//! Prefixed values: `-webkit-linear-gradient(...)`, `-moz-max-content`.

use crate::error::PrefixerError;
use crate::pass::Pass;
use crate::prefixes::Prefixes;
use crate::vendor::{self, remove_note};
use css_syntax::{NodeId, Stylesheet};
use regex::Regex;

/// Value-specific behaviour; defaults are the generic algorithm.
pub trait ValueHack: Sync {
    /// The token the handler looks for, when it differs from the feature
    /// name (`display-flex` looks for `flex`).
    fn value_name<'name>(&self, name: &'name str) -> &'name str {
        name
    }

    /// Pattern locating the value; group 1 is the text before it.
    fn pattern(&self, name: &str) -> String {
        format!(r"(?i)(^|[\s,(])({}($|[\s(,]))", regex::escape(name))
    }

    fn check(&self, handler: &ValueHandler, sheet: &Stylesheet, decl: NodeId) -> bool {
        sheet.declaration(decl).is_some_and(|found| {
            found.value.contains(handler.name.as_str()) && handler.regexp.is_match(&found.value)
        })
    }

    /// One rewriting step; `None` abandons the prefix.
    fn replace(&self, handler: &ValueHandler, value: &str, prefix: &str) -> Option<String> {
        Some(
            handler
                .regexp
                .replace_all(value, format!("${{1}}{prefix}${{2}}").as_str())
                .into_owned(),
        )
    }

    fn add(&self, handler: &ValueHandler, pass: &mut Pass<'_>, decl: NodeId, prefix: &str) {
        rewrite_value(handler, pass, decl, prefix);
    }

    /// Matcher for values the remove pass deletes.
    ///
    /// # Errors
    /// Returns an error if the matcher pattern does not compile.
    fn old(&self, handler: &ValueHandler, prefix: &str) -> Result<Option<OldValue>, PrefixerError> {
        OldValue::new(&handler.name, &format!("{prefix}{}", handler.name), None, None).map(Some)
    }
}

/// A value without quirks.
pub struct Plain;

impl ValueHack for Plain {}

/// A value feature with its planned prefixes.
pub struct ValueHandler {
    /// The value token, e.g. `flex` for the `display-flex` feature.
    pub name: String,
    pub prefixes: Vec<String>,
    pub regexp: Regex,
    pub hack: &'static dyn ValueHack,
}

impl ValueHandler {
    /// Build a handler for feature `feature`.
    ///
    /// # Errors
    /// Returns an error if the hack's pattern does not compile.
    pub fn new(
        feature: &str,
        prefixes: Vec<String>,
        hack: &'static dyn ValueHack,
    ) -> Result<Self, PrefixerError> {
        let name = hack.value_name(feature).to_owned();
        let regexp = Regex::new(&hack.pattern(&name))?;
        Ok(Self {
            name,
            prefixes,
            regexp,
            hack,
        })
    }

    /// Record rewritten values for every prefix the declaration's scope
    /// allows. [`save`] turns them into declarations.
    pub fn process(&self, pass: &mut Pass<'_>, decl: NodeId) {
        if !self.hack.check(self, pass.sheet, decl) {
            return;
        }
        let parent = pass.parent_prefix(decl);
        for prefix in &self.prefixes {
            if parent.as_deref().is_some_and(|scope| scope != remove_note(prefix)) {
                continue;
            }
            self.hack.add(self, pass, decl, prefix);
        }
    }
}

/// Apply `replace` until the value stops changing and record the result.
pub fn rewrite_value(handler: &ValueHandler, pass: &mut Pass<'_>, decl: NodeId, prefix: &str) {
    let recorded = pass
        .recorded_values(decl)
        .iter()
        .find(|(known, _)| known == prefix)
        .map(|(_, value)| value.clone());
    let Some(mut value) = recorded.or_else(|| pass.sheet.declaration(decl).map(|found| found.value.clone()))
    else {
        return;
    };
    loop {
        let Some(next) = handler.hack.replace(handler, &value, prefix) else {
            return;
        };
        if next == value {
            break;
        }
        value = next;
    }
    pass.record_value(decl, prefix, value);
}

/// Insert one copy of `decl` per recorded prefixed value, or rewrite `decl`
/// itself when it already carries that prefix.
pub fn save(prefixes: &Prefixes, pass: &mut Pass<'_>, decl: NodeId) {
    let recorded = pass.memo.values.get(&decl).cloned().unwrap_or_default();
    for (prefix, value) in recorded {
        let Some(current) = pass.sheet.declaration(decl) else {
            return;
        };
        if value == current.value {
            continue;
        }
        let prop = current.prop.clone();
        let prop_prefix = vendor::prefix(&prop);
        if prop_prefix == "-pie-" {
            continue;
        }
        if prop_prefix == prefix {
            if let Some(found) = pass.sheet.declaration_mut(decl) {
                found.value = value;
            }
            continue;
        }
        let prefixed = prefixes.prefixed(&prop, remove_note(&prefix));
        let Some(parent) = pass.sheet.parent(decl) else {
            return;
        };
        if pass.sheet.some_declaration(parent, |other| other.prop == prefixed) {
            continue;
        }
        let trimmed = collapse_first_space(&value);
        if pass
            .sheet
            .some_declaration(parent, |other| other.prop == prop && collapse_first_space(&other.value) == trimmed)
        {
            continue;
        }
        pass.sheet.clone_before(decl, |node| {
            if let Some(copy) = node.as_declaration_mut() {
                copy.value = value;
            }
        });
    }
}

fn collapse_first_space(value: &str) -> String {
    let Some(start) = value.find(char::is_whitespace) else {
        return value.to_owned();
    };
    let rest = value.get(start..).unwrap_or_default();
    let end = rest
        .find(|letter: char| !letter.is_whitespace())
        .map_or(value.len(), |offset| start + offset);
    format!(
        "{} {}",
        value.get(..start).unwrap_or_default(),
        value.get(end..).unwrap_or_default()
    )
}

/// Finds a prefixed value the browsers no longer need.
#[derive(Debug)]
pub struct OldValue {
    pub unprefixed: String,
    pub prefixed: String,
    string: String,
    regexp: Regex,
}

impl OldValue {
    /// `string` is the substring that must be present before the pattern is
    /// tried; it defaults to `prefixed`, and the pattern to a word match of
    /// `prefixed`.
    ///
    /// # Errors
    /// Returns an error if the pattern does not compile.
    pub fn new(
        unprefixed: &str,
        prefixed: &str,
        string: Option<&str>,
        regexp: Option<Regex>,
    ) -> Result<Self, PrefixerError> {
        let regexp = match regexp {
            Some(regexp) => regexp,
            None => vendor::word_regexp(prefixed)?,
        };
        Ok(Self {
            unprefixed: unprefixed.to_owned(),
            prefixed: prefixed.to_owned(),
            string: string.unwrap_or(prefixed).to_owned(),
            regexp,
        })
    }

    pub fn check(&self, value: &str) -> bool {
        value.contains(self.string.as_str()) && self.regexp.is_match(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_first_space_run_collapses() {
        assert_eq!(collapse_first_space("a   b  c"), "a b  c");
        assert_eq!(collapse_first_space("abc"), "abc");
    }

    #[test]
    fn old_values_need_the_literal_and_the_pattern() {
        let old = OldValue::new("calc", "-webkit-calc", None, None).unwrap();
        assert!(old.check("-webkit-calc(1px + 2px)"));
        assert!(!old.check("calc(1px)"));
        assert!(!old.check("x-webkit-calcy"));
    }
}
