//! `min-resolution` media queries rewritten as device pixel ratios.

use crate::pass::Pass;
use crate::vendor::uniq;
use css_syntax::{NodeId, list};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static QUERY: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?i)(min|max)-resolution(\s*:\s*)(\d*\.?\d+)(dppx|dpcm|dpi|x)").ok()
});
static JOIN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r",\s*").ok());

/// Handles `@media` params mentioning a resolution feature.
pub struct Resolution {
    pub prefixes: Vec<String>,
}

fn gcd(left: u64, right: u64) -> u64 {
    if right == 0 { left } else { gcd(right, left % right) }
}

/// `value` as `n/d`, exact up to six decimals.
fn fraction(value: f64) -> String {
    const SCALE: u64 = 1_000_000;
    let numerator = (value * SCALE as f64).round() as u64;
    let divisor = gcd(numerator, SCALE).max(1);
    format!("{}/{}", numerator / divisor, SCALE / divisor)
}

fn decimal(value: f64) -> String {
    let rounded = (value * 1e10).round() / 1e10;
    format!("{rounded}")
}

/// Rewrite params list by list, keeping the original separator.
fn edit_list(params: &str, edit: impl FnOnce(Vec<String>) -> Vec<String>) -> String {
    let join = JOIN
        .as_ref()
        .and_then(|regex| regex.find(params))
        .map_or(", ", |found| found.as_str())
        .to_owned();
    edit(list::comma(params)).join(&join)
}

impl Resolution {
    fn prefix_name(prefix: &str, name: &str) -> String {
        if prefix == "-moz-" {
            format!("{name}--moz-device-pixel-ratio")
        } else {
            format!("{prefix}{name}-device-pixel-ratio")
        }
    }

    fn prefix_query(prefix: &str, captures: &Captures<'_>) -> String {
        let group = |index: usize| captures.get(index).map_or("", |found| found.as_str());
        let mut value: f64 = group(3).parse().unwrap_or(0.0);
        match group(4).to_ascii_lowercase().as_str() {
            "dpi" => value /= 96.0,
            "dpcm" => value = value * 2.54 / 96.0,
            _ => {}
        }
        let value = if prefix == "-o-" {
            fraction(value)
        } else {
            decimal(value)
        };
        format!("{}{}{value}", Self::prefix_name(prefix, group(1)), group(2))
    }

    /// Add prefixed alternatives in front of every resolution query.
    pub fn process(&self, pass: &mut Pass<'_>, rule: NodeId) {
        let Some(regex) = QUERY.as_ref() else {
            return;
        };
        let parent = pass.parent_prefix(rule);
        let prefixes = parent.map_or_else(|| self.prefixes.clone(), |prefix| vec![prefix]);
        let Some(at_rule) = pass.sheet.at_rule_mut(rule) else {
            return;
        };
        at_rule.params = edit_list(&at_rule.params, |origin| {
            let mut prefixed = Vec::new();
            for query in origin {
                if !query.contains("min-resolution") && !query.contains("max-resolution") {
                    prefixed.push(query);
                    continue;
                }
                for prefix in &prefixes {
                    let processed = regex.replace_all(&query, |captures: &Captures<'_>| {
                        Self::prefix_query(prefix, captures)
                    });
                    prefixed.push(processed.into_owned());
                }
                prefixed.push(query);
            }
            uniq(prefixed)
        });
    }

    /// Drop prefixed pixel-ratio queries for prefixes nobody needs.
    pub fn clean(&self, pass: &mut Pass<'_>, rule: NodeId) {
        let bad: Vec<String> = self
            .prefixes
            .iter()
            .flat_map(|prefix| [Self::prefix_name(prefix, "min"), Self::prefix_name(prefix, "max")])
            .collect();
        let Some(at_rule) = pass.sheet.at_rule_mut(rule) else {
            return;
        };
        at_rule.params = edit_list(&at_rule.params, |queries| {
            queries
                .into_iter()
                .filter(|query| bad.iter().all(|name| !query.contains(name.as_str())))
                .collect()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_compile() {
        for pattern in [&QUERY, &JOIN] {
            assert!(pattern.is_some());
        }
    }

    #[test]
    fn opera_gets_fractions() {
        assert_eq!(fraction(1.5), "3/2");
        assert_eq!(fraction(2.0), "2/1");
        assert_eq!(decimal(144.0 / 96.0), "1.5");
    }
}
