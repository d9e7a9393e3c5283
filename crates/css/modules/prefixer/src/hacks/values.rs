//! Value quirks: sizing keywords, image functions and `filter()`.

use crate::error::PrefixerError;
use crate::handlers::value::{OldValue, ValueHandler, rewrite_value};
use crate::handlers::ValueHack;
use crate::pass::Pass;
use crate::vendor;
use css_syntax::{NodeId, list};
use once_cell::sync::Lazy;
use regex::Regex;

/// `filter()` is listed as `filter-function`.
pub struct FilterValue;

impl FilterValue {
    pub const NAMES: &[&str] = &["filter-function"];
}

impl ValueHack for FilterValue {
    fn value_name<'name>(&self, _name: &'name str) -> &'name str {
        "filter"
    }
}

fn intrinsic_pattern(name: &str) -> String {
    format!(r"(?i)(^|[\s,(])({}($|[\s),]))", regex::escape(name))
}

/// `max-content`, `fit-content` and the `stretch` family.
pub struct Intrinsic;

impl Intrinsic {
    pub const NAMES: &[&str] = &[
        "max-content",
        "min-content",
        "fit-content",
        "fill",
        "fill-available",
        "stretch",
    ];

    fn is_stretch(name: &str) -> bool {
        matches!(name, "stretch" | "fill" | "fill-available")
    }

    fn stretch_spelling(prefix: &str) -> Option<&'static str> {
        match prefix {
            "-moz-" => Some("-moz-available"),
            "-webkit-" => Some("-webkit-fill-available"),
            _ => None,
        }
    }
}

impl ValueHack for Intrinsic {
    fn pattern(&self, name: &str) -> String {
        intrinsic_pattern(name)
    }

    /// Grid tracks only understand the WebKit spelling.
    fn add(&self, handler: &ValueHandler, pass: &mut Pass<'_>, decl: NodeId, prefix: &str) {
        let grid = pass
            .sheet
            .declaration(decl)
            .is_some_and(|found| found.prop.contains("grid"));
        if grid && prefix != "-webkit-" {
            return;
        }
        rewrite_value(handler, pass, decl, prefix);
    }

    fn replace(&self, handler: &ValueHandler, value: &str, prefix: &str) -> Option<String> {
        let replacement = match Self::stretch_spelling(prefix) {
            Some(spelling) if Self::is_stretch(&handler.name) => format!("${{1}}{spelling}${{3}}"),
            _ => format!("${{1}}{prefix}${{2}}"),
        };
        Some(handler.regexp.replace_all(value, replacement.as_str()).into_owned())
    }

    fn old(&self, handler: &ValueHandler, prefix: &str) -> Result<Option<OldValue>, PrefixerError> {
        let prefixed = match Self::stretch_spelling(prefix) {
            Some(spelling) if Self::is_stretch(&handler.name) => spelling.to_owned(),
            _ => format!("{prefix}{}", handler.name),
        };
        let regexp = Regex::new(&intrinsic_pattern(&prefixed))?;
        OldValue::new(&handler.name, &prefixed, Some(&prefixed), Some(regexp)).map(Some)
    }
}

/// `image-rendering: pixelated` under the engines' own keywords.
pub struct Pixelated;

impl Pixelated {
    pub const NAMES: &[&str] = &["pixelated"];

    fn spelling(prefix: &str) -> Option<&'static str> {
        match prefix {
            "-webkit-" => Some("-webkit-optimize-contrast"),
            "-moz-" => Some("-moz-crisp-edges"),
            _ => None,
        }
    }
}

impl ValueHack for Pixelated {
    fn replace(&self, handler: &ValueHandler, value: &str, prefix: &str) -> Option<String> {
        let replacement = Self::spelling(prefix).map_or_else(
            || format!("${{1}}{prefix}${{2}}"),
            |spelling| format!("${{1}}{spelling}${{3}}"),
        );
        Some(handler.regexp.replace_all(value, replacement.as_str()).into_owned())
    }

    fn old(&self, handler: &ValueHandler, prefix: &str) -> Result<Option<OldValue>, PrefixerError> {
        let prefixed = Self::spelling(prefix).map_or_else(|| format!("{prefix}{}", handler.name), ToOwned::to_owned);
        OldValue::new(&handler.name, &prefixed, None, None).map(Some)
    }
}

static BARE_IMAGE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r#"(?i)("[^"]*"|'[^']*')(\s+\d+\w)"#).ok());

/// WebKit's `image-set()` wants `url()` around bare strings.
pub struct ImageSet;

impl ImageSet {
    pub const NAMES: &[&str] = &["image-set"];
}

impl ValueHack for ImageSet {
    fn replace(&self, handler: &ValueHandler, value: &str, prefix: &str) -> Option<String> {
        let fixed = handler
            .regexp
            .replace_all(value, format!("${{1}}{prefix}${{2}}").as_str())
            .into_owned();
        if prefix == "-webkit-" {
            return Some(vendor::replace_all(&BARE_IMAGE, &fixed, "url($1)$2"));
        }
        Some(fixed)
    }
}

static CROSS_FADE_PERCENT: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\d*.?\d+%?").ok());

/// WebKit's `cross-fade()` takes the percentage last.
pub struct CrossFade;

impl CrossFade {
    pub const NAMES: &[&str] = &["cross-fade"];

    fn rewrite(name: &str, word: &str, prefix: &str) -> String {
        let opening = format!("{name}(");
        let Some(inner) = word.strip_prefix(opening.as_str()) else {
            return word.to_owned();
        };
        let close = inner.rfind(')').unwrap_or(inner.len());
        let after = inner.get(close + 1..).unwrap_or_default();
        let mut args = inner.get(..close).unwrap_or_default().to_owned();
        if prefix == "-webkit-" {
            let percent = CROSS_FADE_PERCENT
                .as_ref()
                .and_then(|regex| regex.find(&args))
                .map(|found| found.as_str().to_owned());
            if let Some(percent) = percent {
                args = format!("{}, {percent}", args.get(percent.len()..).unwrap_or_default().trim());
            } else {
                args.push_str(", 0.5");
            }
        }
        format!("{prefix}{name}({args}){after}")
    }
}

impl ValueHack for CrossFade {
    fn replace(&self, handler: &ValueHandler, value: &str, prefix: &str) -> Option<String> {
        Some(
            list::space(value)
                .iter()
                .map(|word| Self::rewrite(&handler.name, word, prefix))
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_compile() {
        for pattern in [&BARE_IMAGE, &CROSS_FADE_PERCENT] {
            assert!(pattern.is_some());
        }
    }

    fn handler(name: &str, hack: &'static dyn ValueHack) -> ValueHandler {
        ValueHandler::new(name, vec!["-webkit-".to_owned()], hack).unwrap()
    }

    #[test]
    fn stretch_uses_engine_spellings() {
        let stretch = handler("stretch", &Intrinsic);
        assert_eq!(
            Intrinsic.replace(&stretch, "stretch", "-moz-").as_deref(),
            Some("-moz-available")
        );
        assert_eq!(
            Intrinsic.replace(&stretch, "calc(stretch)", "-webkit-").as_deref(),
            Some("calc(-webkit-fill-available)")
        );
        let max = handler("max-content", &Intrinsic);
        assert_eq!(
            Intrinsic.replace(&max, "max-content", "-moz-").as_deref(),
            Some("-moz-max-content")
        );
    }

    #[test]
    fn pixelated_keeps_what_follows() {
        let pixelated = handler("pixelated", &Pixelated);
        assert_eq!(
            Pixelated.replace(&pixelated, "pixelated, auto", "-webkit-").as_deref(),
            Some("-webkit-optimize-contrast, auto")
        );
        let old = Pixelated.old(&pixelated, "-moz-").unwrap().unwrap();
        assert!(old.check("-moz-crisp-edges"));
    }

    #[test]
    fn image_set_wraps_bare_strings() {
        let image_set = handler("image-set", &ImageSet);
        assert_eq!(
            ImageSet
                .replace(&image_set, r#"image-set("a.png" 1x, "b.png" 2x)"#, "-webkit-")
                .as_deref(),
            Some(r#"-webkit-image-set(url("a.png") 1x, url("b.png") 2x)"#)
        );
    }

    #[test]
    fn cross_fade_moves_the_percentage() {
        assert_eq!(
            CrossFade::rewrite("cross-fade", "cross-fade(20% url(a.png), url(b.png))", "-webkit-"),
            "-webkit-cross-fade(url(a.png), url(b.png), 20%)"
        );
        assert_eq!(
            CrossFade::rewrite("cross-fade", "cross-fade(url(a.png), url(b.png))", "-webkit-"),
            "-webkit-cross-fade(url(a.png), url(b.png), 0.5)"
        );
    }

    #[test]
    fn filter_function_looks_for_filter() {
        assert_eq!(handler("filter-function", &FilterValue).name, "filter");
    }
}
