//! Vendor prefix helpers shared by every handler.

use once_cell::sync::Lazy;
use regex::Regex;

/// The vendor prefix of a name: `-webkit-` for `-webkit-box`, empty otherwise.
pub fn prefix(prop: &str) -> &str {
    let Some(rest) = prop.strip_prefix('-') else {
        return "";
    };
    let word_len = rest
        .find(|letter: char| !(letter.is_ascii_alphanumeric() || letter == '_'))
        .unwrap_or(rest.len());
    if word_len == 0 || rest.as_bytes().get(word_len) != Some(&b'-') {
        return "";
    }
    prop.get(..word_len + 2).unwrap_or_default()
}

/// A name without its vendor prefix.
pub fn unprefixed(prop: &str) -> &str {
    prop.get(prefix(prop).len()..).unwrap_or(prop)
}

/// The vendor part of a plan prefix: `-webkit-` for `-webkit- 2009` and
/// `-moz-` for `final -moz-`.
pub fn remove_note(prefix: &str) -> &str {
    prefix
        .split_whitespace()
        .find(|token| token.len() > 1 && token.starts_with('-') && token.ends_with('-'))
        .unwrap_or(prefix)
}

/// The note part of a plan prefix, if any.
pub fn note(prefix: &str) -> Option<&str> {
    prefix
        .split_whitespace()
        .find(|token| !(token.starts_with('-') && token.ends_with('-')))
}

/// Deduplicate while keeping the first occurrence.
pub fn uniq(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Matches `name` as a standalone value token.
///
/// # Errors
/// Returns an error if the resulting pattern does not compile.
pub fn word_regexp(name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)(^|[\s,(])({}($|[\s(,]))", regex::escape(name)))
}

const VENDORS: [&str; 4] = ["-webkit-", "-moz-", "-ms-", "-o-"];

static VAR_FUNCTION: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"var\([^)]+\)").ok());

/// Whether `value` mentions a vendor other than `prefix`, ignoring custom
/// property names inside `var(...)`.
pub fn other_prefixes(value: &str, prefix: &str) -> bool {
    let vendor = remove_note(prefix);
    VENDORS
        .iter()
        .filter(|other| **other != vendor)
        .find(|other| value.contains(**other))
        .is_some_and(|other| replace_all(&VAR_FUNCTION, value, "").contains(*other))
}

/// `is_match` on a lazily built pattern that failed to compile is `false`.
pub fn is_match(pattern: &Lazy<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|regex| regex.is_match(text))
}

/// `replace_all` on a lazily built pattern; a pattern that failed to
/// compile leaves the text alone.
pub fn replace_all(pattern: &Lazy<Option<Regex>>, text: &str, replacement: &str) -> String {
    pattern.as_ref().map_or_else(
        || text.to_owned(),
        |regex| regex.replace_all(text, replacement).into_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_compile() {
        for pattern in [&VAR_FUNCTION] {
            assert!(pattern.is_some());
        }
    }

    #[test]
    fn splits_vendor_from_name() {
        assert_eq!(prefix("-webkit-box-flex"), "-webkit-");
        assert_eq!(unprefixed("-webkit-box-flex"), "box-flex");
        assert_eq!(prefix("--custom"), "");
        assert_eq!(prefix("display"), "");
    }

    #[test]
    fn notes_can_lead_or_trail() {
        assert_eq!(remove_note("-webkit- 2009"), "-webkit-");
        assert_eq!(remove_note("final -moz-"), "-moz-");
        assert_eq!(note("final -moz-"), Some("final"));
        assert_eq!(note("-ms-"), None);
    }

    #[test]
    fn word_regexp_needs_token_boundaries() {
        let regex = word_regexp("flex").unwrap();
        assert!(regex.is_match("inline flex"));
        assert!(!regex.is_match("inline-flex"));
        assert!(!regex.is_match("flexbox"));
    }

    #[test]
    fn var_names_do_not_count_as_prefixes() {
        assert!(!other_prefixes("var(--x-moz-y)", "-webkit-"));
        assert!(other_prefixes("-moz-calc(1px)", "-webkit-"));
        assert!(!other_prefixes("-webkit-calc(1px)", "-webkit-"));
    }
}
