//! Prefixed copies of rules whose selector uses a prefixed pseudo-class or
//! pseudo-element.

use crate::error::PrefixerError;
use crate::pass::Pass;
use crate::vendor::remove_note;
use css_syntax::{NodeId, Stylesheet, list};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static LEADING_PUNCTUATION: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^(\W*)").ok());

/// Selector-specific spelling of prefixed variants.
pub trait SelectorHack: Sync {
    /// `::placeholder` with `-moz-` becomes `::-moz-placeholder`.
    fn prefixed(&self, name: &str, prefix: &str) -> String {
        LEADING_PUNCTUATION.as_ref().map_or_else(
            || format!("{prefix}{name}"),
            |regex| regex.replace(name, format!("${{1}}{prefix}").as_str()).into_owned(),
        )
    }

    /// Extra spellings beyond the plain vendors, e.g. `-moz- old`.
    fn extra_possible(&self) -> &'static [&'static str] {
        &[]
    }
}

pub struct Plain;

impl SelectorHack for Plain {}

fn pattern(name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r#"(?i)(^|[^:"'=]){}"#, regex::escape(name)))
}

/// A selector feature with its planned prefixes.
pub struct SelectorHandler {
    pub name: String,
    pub prefixes: Vec<String>,
    hack: &'static dyn SelectorHack,
    /// Every spelling a selector may use, planned or not.
    possible: Vec<String>,
    regexp: Regex,
    prefixed_regexps: HashMap<String, Regex>,
}

impl SelectorHandler {
    /// # Errors
    /// Returns an error if a selector pattern does not compile.
    pub fn new(
        name: &str,
        prefixes: Vec<String>,
        hack: &'static dyn SelectorHack,
        vendors: &[String],
    ) -> Result<Self, PrefixerError> {
        let mut possible: Vec<String> = vendors.to_vec();
        possible.extend(hack.extra_possible().iter().map(|extra| (*extra).to_owned()));
        let mut prefixed_regexps = HashMap::new();
        for prefix in possible.iter().chain(&prefixes) {
            let spelled = hack.prefixed(name, prefix);
            prefixed_regexps.insert(prefix.clone(), pattern(&spelled)?);
        }
        Ok(Self {
            name: name.to_owned(),
            prefixes,
            hack,
            possible,
            regexp: pattern(name)?,
            prefixed_regexps,
        })
    }

    pub fn prefixed(&self, prefix: &str) -> String {
        self.hack.prefixed(&self.name, prefix)
    }

    fn replace(&self, selector: &str, prefix: &str) -> String {
        let replacement = format!("${{1}}{}", self.prefixed(prefix));
        self.regexp.replace_all(selector, replacement.as_str()).into_owned()
    }

    pub fn check(&self, selector: &str) -> bool {
        selector.contains(self.name.as_str()) && self.regexp.is_match(selector)
    }

    /// The rule's selector rewritten for every possible prefix. Only comma
    /// parts that use the feature are kept.
    fn prefixeds(&self, selector: &str) -> Vec<(String, String)> {
        let parts: Vec<String> = if selector.contains(',') {
            list::comma(selector)
                .into_iter()
                .filter(|part| part.contains(self.name.as_str()))
                .collect()
        } else {
            vec![selector.to_owned()]
        };
        self.possible
            .iter()
            .chain(self.prefixes.iter())
            .map(|prefix| {
                let rewritten: Vec<String> = parts.iter().map(|part| self.replace(part, prefix)).collect();
                (prefix.clone(), rewritten.join(", "))
            })
            .collect()
    }

    /// Whether the rules right above already hold the variant for `prefix`.
    fn already(&self, sheet: &Stylesheet, rule: NodeId, prefixeds: &[(String, String)], prefix: &str) -> bool {
        let mut cursor = sheet.prev_sibling(rule);
        while let Some(before) = cursor {
            let Some(found) = sheet.rule(before) else {
                return false;
            };
            let Some((key, _)) = prefixeds.iter().find(|(_, variant)| *variant == found.selector) else {
                return false;
            };
            if key == prefix {
                return true;
            }
            cursor = sheet.prev_sibling(before);
        }
        false
    }

    fn add(&self, pass: &mut Pass<'_>, rule: NodeId, prefix: &str) {
        let Some(selector) = pass.sheet.rule(rule).map(|found| found.selector.clone()) else {
            return;
        };
        let prefixeds = self.prefixeds(&selector);
        if self.already(pass.sheet, rule, &prefixeds, prefix) {
            return;
        }
        let Some((_, variant)) = prefixeds.into_iter().find(|(key, _)| key == prefix) else {
            return;
        };
        pass.sheet.clone_before(rule, |node| {
            if let Some(copy) = node.as_rule_mut() {
                copy.selector = variant;
            }
        });
    }

    pub fn process(&self, pass: &mut Pass<'_>, rule: NodeId) {
        let matches = pass.sheet.rule(rule).is_some_and(|found| self.check(&found.selector));
        if !matches {
            return;
        }
        let parent = pass.parent_prefix(rule);
        for prefix in &self.prefixes {
            if parent.as_deref().is_some_and(|scope| scope != remove_note(prefix)) {
                continue;
            }
            self.add(pass, rule, prefix);
        }
    }

    /// The remove-pass matcher for `prefix`.
    ///
    /// # Errors
    /// Returns an error if a selector pattern does not compile.
    pub fn old(&self, prefix: &str) -> Result<OldSelector, PrefixerError> {
        let prefixed = self.prefixed(prefix);
        let regexp = match self.prefixed_regexps.get(prefix) {
            Some(regexp) => regexp.clone(),
            None => pattern(&prefixed)?,
        };
        let variants = self
            .possible
            .iter()
            .filter_map(|possible| {
                self.prefixed_regexps
                    .get(possible)
                    .map(|regexp| (self.prefixed(possible), regexp.clone()))
            })
            .collect();
        Ok(OldSelector {
            prefixed,
            regexp,
            variants,
            unprefixed: self.name.clone(),
            name_regexp: self.regexp.clone(),
        })
    }
}

/// Finds rules written for a prefix the browsers no longer need.
#[derive(Debug)]
pub struct OldSelector {
    prefixed: String,
    regexp: Regex,
    variants: Vec<(String, Regex)>,
    unprefixed: String,
    name_regexp: Regex,
}

impl OldSelector {
    pub fn check(&self, sheet: &Stylesheet, rule: NodeId) -> bool {
        let Some(found) = sheet.rule(rule) else {
            return false;
        };
        found.selector.contains(self.prefixed.as_str())
            && self.regexp.is_match(&found.selector)
            && !self.is_hack(sheet, rule)
    }

    /// A prefixed rule is a hack unless it is followed by more variants and
    /// finally the unprefixed rule.
    fn is_hack(&self, sheet: &Stylesheet, rule: NodeId) -> bool {
        let mut cursor = sheet.next_sibling(rule);
        while let Some(next) = cursor {
            let Some(found) = sheet.rule(next) else {
                return true;
            };
            let selector = &found.selector;
            if selector.contains(self.unprefixed.as_str()) && self.name_regexp.is_match(selector) {
                return false;
            }
            let variant = self
                .variants
                .iter()
                .any(|(string, regexp)| selector.contains(string.as_str()) && regexp.is_match(selector));
            if !variant {
                return true;
            }
            cursor = sheet.next_sibling(next);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_compile() {
        assert!(LEADING_PUNCTUATION.is_some());
    }

    #[test]
    fn vendors_follow_leading_colons() {
        assert_eq!(Plain.prefixed("::selection", "-moz-"), "::-moz-selection");
        assert_eq!(Plain.prefixed(":fullscreen", "-webkit-"), ":-webkit-fullscreen");
    }
}
