//! Property quirks outside flexbox and grid.

use crate::handlers::declaration::{DeclarationHandler, insert_clone, insert_variant};
use crate::handlers::DeclarationHack;
use crate::pass::Pass;
use crate::vendor::{self, uniq};
use css_syntax::{Declaration, NodeId, Stylesheet};
use once_cell::sync::Lazy;
use regex::Regex;

/// Old IE spelled these with `-ms-`; every other engine wants `-webkit-`.
fn ms_as_webkit(prefixes: Vec<String>) -> Vec<String> {
    uniq(
        prefixes
            .into_iter()
            .map(|prefix| if prefix == "-ms-" { "-webkit-".to_owned() } else { prefix }),
    )
}

fn lookup(map: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    map.iter().find(|(from, _)| *from == key).map(|(_, to)| *to)
}

pub struct Filter;

impl Filter {
    pub const NAMES: &[&str] = &["filter"];
}

impl DeclarationHack for Filter {
    /// Legacy IE filters are not the CSS `filter` property.
    fn check(&self, sheet: &Stylesheet, decl: NodeId) -> bool {
        sheet.declaration(decl).is_some_and(|found| {
            let value = &found.value;
            !value.to_lowercase().contains("alpha(")
                && !value.contains("DXImageTransform.Microsoft")
                && !value.contains("data:image/svg+xml")
        })
    }
}

pub struct Animation;

impl Animation {
    pub const NAMES: &[&str] = &["animation", "animation-direction"];
}

impl DeclarationHack for Animation {
    fn check(&self, sheet: &Stylesheet, decl: NodeId) -> bool {
        sheet.declaration(decl).is_some_and(|found| {
            !found.value.split_whitespace().any(|word| {
                let lower = word.to_lowercase();
                lower == "reverse" || lower == "alternate-reverse"
            })
        })
    }
}

pub struct Appearance;

impl Appearance {
    pub const NAMES: &[&str] = &["appearance"];
}

impl DeclarationHack for Appearance {
    fn adjust_prefixes(&self, prefixes: Vec<String>) -> Vec<String> {
        ms_as_webkit(prefixes)
    }
}

pub struct BackdropFilter;

impl BackdropFilter {
    pub const NAMES: &[&str] = &["backdrop-filter"];
}

impl DeclarationHack for BackdropFilter {
    fn adjust_prefixes(&self, prefixes: Vec<String>) -> Vec<String> {
        ms_as_webkit(prefixes)
    }
}

pub struct BackgroundClip;

impl BackgroundClip {
    pub const NAMES: &[&str] = &["background-clip"];
}

impl DeclarationHack for BackgroundClip {
    fn adjust_prefixes(&self, prefixes: Vec<String>) -> Vec<String> {
        ms_as_webkit(prefixes)
    }

    /// Only `text` clipping needs a prefix.
    fn check(&self, sheet: &Stylesheet, decl: NodeId) -> bool {
        sheet
            .declaration(decl)
            .is_some_and(|found| found.value.eq_ignore_ascii_case("text"))
    }
}

pub struct MaskBorder;

impl MaskBorder {
    pub const NAMES: &[&str] = &[
        "mask-border",
        "mask-border-source",
        "mask-border-slice",
        "mask-border-width",
        "mask-border-outset",
        "mask-border-repeat",
        "mask-box-image",
        "mask-box-image-source",
        "mask-box-image-slice",
        "mask-box-image-width",
        "mask-box-image-outset",
        "mask-box-image-repeat",
    ];
}

impl DeclarationHack for MaskBorder {
    fn normalize(&self, prop: &str) -> String {
        prop.replace("mask-box-image", "mask-border")
    }

    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        let prefixed = format!("{prefix}{prop}");
        if prefix == "-webkit-" {
            prefixed.replace("mask-border", "mask-box-image")
        } else {
            prefixed
        }
    }
}

const COMPOSITE_OLD: &[(&str, &str)] = &[
    ("add", "source-over"),
    ("exclude", "xor"),
    ("intersect", "source-in"),
    ("subtract", "source-out"),
];

/// A compositing keyword closing a `mask` layer, up to its comma.
static COMPOSITE_IN_MASK: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)\s+(add|exclude|intersect|subtract)\b\s*,").ok());

/// `mask` and `mask-composite`: WebKit takes compositing operators from the
/// old canvas vocabulary in a separate property.
pub struct MaskComposite;

impl MaskComposite {
    pub const NAMES: &[&str] = &["mask", "mask-composite"];

    fn composite_values(prop: &str, value: &str) -> Vec<String> {
        let raw: Vec<String> = if prop == "mask-composite" {
            value.split(',').map(ToOwned::to_owned).collect()
        } else {
            COMPOSITE_IN_MASK.as_ref().map_or_else(Vec::new, |regex| {
                regex
                    .captures_iter(value)
                    .filter_map(|captures| captures.get(1))
                    .map(|keyword| keyword.as_str().to_owned())
                    .collect()
            })
        };
        raw.iter()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .collect()
    }
}

impl DeclarationHack for MaskComposite {
    fn insert(
        &self,
        _handler: &DeclarationHandler,
        pass: &mut Pass<'_>,
        decl: NodeId,
        prefix: &str,
        prefixes: &[String],
    ) -> Option<NodeId> {
        let current = pass.sheet.declaration(decl)?.clone();
        let is_composite_prop = current.prop == "mask-composite";
        let values = Self::composite_values(&current.prop, &current.value);
        let composite = (!values.is_empty()).then(|| {
            let mut joined = values
                .iter()
                .map(|value| lookup(COMPOSITE_OLD, value).unwrap_or(value.as_str()))
                .collect::<Vec<_>>()
                .join(", ");
            if values.iter().any(|value| value == "intersect") {
                joined.push_str(", xor");
            }
            joined
        });
        let composite_prop = format!("{prefix}mask-composite");
        if is_composite_prop {
            return insert_variant(pass, decl, composite_prop, composite?, prefixes, prefix);
        }
        let layers = if composite.is_some() {
            vendor::replace_all(&COMPOSITE_IN_MASK, &current.value, ",")
        } else {
            current.value.clone()
        };
        insert_variant(pass, decl, format!("{prefix}{}", current.prop), layers, prefixes, prefix);
        match composite {
            Some(composite) => insert_variant(pass, decl, composite_prop, composite, prefixes, prefix),
            None => Some(decl),
        }
    }
}

pub struct UserSelect;

impl UserSelect {
    pub const NAMES: &[&str] = &["user-select"];
}

impl DeclarationHack for UserSelect {
    fn set(&self, decl: &mut Declaration, prefix: &str) -> bool {
        if prefix == "-ms-" && decl.value == "contain" {
            "element".clone_into(&mut decl.value);
        }
        decl.prop = self.prefixed(&decl.prop, prefix);
        true
    }

    fn insert(
        &self,
        handler: &DeclarationHandler,
        pass: &mut Pass<'_>,
        decl: NodeId,
        prefix: &str,
        prefixes: &[String],
    ) -> Option<NodeId> {
        let value = pass.sheet.declaration(decl)?.value.clone();
        let unsupported = (value == "all" && prefix == "-ms-")
            || (value == "contain" && (prefix == "-moz-" || prefix == "-webkit-"));
        if unsupported {
            return None;
        }
        insert_clone(handler, pass, decl, prefix, prefixes)
    }
}

pub struct BreakProps;

impl BreakProps {
    pub const NAMES: &[&str] = &[
        "break-inside",
        "page-break-inside",
        "column-break-inside",
        "break-before",
        "page-break-before",
        "column-break-before",
        "break-after",
        "page-break-after",
        "column-break-after",
    ];
}

impl DeclarationHack for BreakProps {
    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        format!("{prefix}column-{prop}")
    }

    fn normalize(&self, prop: &str) -> String {
        if prop.contains("inside") {
            "break-inside".to_owned()
        } else if prop.contains("before") {
            "break-before".to_owned()
        } else {
            "break-after".to_owned()
        }
    }

    fn set(&self, decl: &mut Declaration, prefix: &str) -> bool {
        if (decl.prop == "break-inside" && decl.value == "avoid-column") || decl.value == "avoid-page" {
            "avoid".clone_into(&mut decl.value);
        }
        decl.prop = self.prefixed(&decl.prop, prefix);
        true
    }

    fn insert(
        &self,
        handler: &DeclarationHandler,
        pass: &mut Pass<'_>,
        decl: NodeId,
        prefix: &str,
        prefixes: &[String],
    ) -> Option<NodeId> {
        let current = pass.sheet.declaration(decl)?;
        if current.prop == "break-inside" {
            let lower = current.value.to_lowercase();
            if lower.contains("region") || lower.contains("page") {
                return None;
            }
        }
        insert_clone(handler, pass, decl, prefix, prefixes)
    }
}

pub struct WritingMode;

impl WritingMode {
    pub const NAMES: &[&str] = &["writing-mode"];

    fn ms_value(direction: &str, value: &str) -> Option<&'static str> {
        let table: &[(&str, &'static str)] = if direction == "rtl" {
            &[("horizontal-tb", "rl-tb"), ("vertical-rl", "bt-rl"), ("vertical-lr", "bt-lr")]
        } else {
            &[("horizontal-tb", "lr-tb"), ("vertical-rl", "tb-rl"), ("vertical-lr", "tb-lr")]
        };
        lookup(table, value)
    }
}

impl DeclarationHack for WritingMode {
    fn insert(
        &self,
        handler: &DeclarationHandler,
        pass: &mut Pass<'_>,
        decl: NodeId,
        prefix: &str,
        prefixes: &[String],
    ) -> Option<NodeId> {
        if prefix != "-ms-" {
            return insert_clone(handler, pass, decl, prefix, prefixes);
        }
        let current = pass.sheet.declaration(decl)?.clone();
        let parent = pass.sheet.parent(decl)?;
        let mut direction = "ltr".to_owned();
        for child in pass.sheet.child_declarations(parent) {
            if let Some(other) = pass.sheet.declaration(child)
                && other.prop == "direction"
                && (other.value == "rtl" || other.value == "ltr")
            {
                direction.clone_from(&other.value);
            }
        }
        let value = Self::ms_value(&direction, &current.value).map_or(current.value.clone(), ToOwned::to_owned);
        insert_variant(pass, decl, self.prefixed(&current.prop, prefix), value, prefixes, prefix)
    }
}

static FILL_KEYWORD: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\s+fill(\s)").ok());

pub struct BorderImage;

impl BorderImage {
    pub const NAMES: &[&str] = &["border-image"];
}

impl DeclarationHack for BorderImage {
    fn set(&self, decl: &mut Declaration, prefix: &str) -> bool {
        if let Some(regex) = FILL_KEYWORD.as_ref() {
            decl.value = regex.replace(&decl.value, "$1").into_owned();
        }
        decl.prop = self.prefixed(&decl.prop, prefix);
        true
    }
}

const RADIUS_CORNERS: &[(&str, &str)] = &[
    ("border-top-left-radius", "border-radius-topleft"),
    ("border-top-right-radius", "border-radius-topright"),
    ("border-bottom-left-radius", "border-radius-bottomleft"),
    ("border-bottom-right-radius", "border-radius-bottomright"),
];

pub struct BorderRadius;

impl BorderRadius {
    pub const NAMES: &[&str] = &[
        "border-radius",
        "border-top-left-radius",
        "border-radius-topleft",
        "border-top-right-radius",
        "border-radius-topright",
        "border-bottom-left-radius",
        "border-radius-bottomleft",
        "border-bottom-right-radius",
        "border-radius-bottomright",
    ];
}

impl DeclarationHack for BorderRadius {
    /// Old Gecko named the corners `-moz-border-radius-topleft` and so on.
    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        if prefix == "-moz-"
            && let Some((_, mozilla)) = RADIUS_CORNERS.iter().find(|(normal, _)| *normal == prop)
        {
            return format!("{prefix}{mozilla}");
        }
        format!("{prefix}{prop}")
    }

    fn normalize(&self, prop: &str) -> String {
        RADIUS_CORNERS
            .iter()
            .find(|(_, mozilla)| *mozilla == prop)
            .map_or_else(|| prop.to_owned(), |(normal, _)| (*normal).to_owned())
    }
}

pub struct BlockLogical;

impl BlockLogical {
    pub const NAMES: &[&str] = &[
        "border-block-start",
        "border-block-end",
        "margin-block-start",
        "margin-block-end",
        "padding-block-start",
        "padding-block-end",
        "border-before",
        "border-after",
        "margin-before",
        "margin-after",
        "padding-before",
        "padding-after",
    ];
}

impl DeclarationHack for BlockLogical {
    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        if prop.contains("-start") {
            format!("{prefix}{}", prop.replacen("-block-start", "-before", 1))
        } else {
            format!("{prefix}{}", prop.replacen("-block-end", "-after", 1))
        }
    }

    fn normalize(&self, prop: &str) -> String {
        if prop.contains("-before") {
            prop.replacen("-before", "-block-start", 1)
        } else {
            prop.replacen("-after", "-block-end", 1)
        }
    }
}

static INLINE_SIDE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(margin|padding|border)-(start|end)").ok());

pub struct InlineLogical;

impl InlineLogical {
    pub const NAMES: &[&str] = &[
        "border-inline-start",
        "border-inline-end",
        "margin-inline-start",
        "margin-inline-end",
        "padding-inline-start",
        "padding-inline-end",
        "border-start",
        "border-end",
        "margin-start",
        "margin-end",
        "padding-start",
        "padding-end",
    ];
}

impl DeclarationHack for InlineLogical {
    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        format!("{prefix}{}", prop.replacen("-inline", "", 1))
    }

    fn normalize(&self, prop: &str) -> String {
        INLINE_SIDE.as_ref().map_or_else(
            || prop.to_owned(),
            |regex| regex.replace(prop, "${1}-inline-${2}").into_owned(),
        )
    }
}

const FUNCTIONS_3D: &[&str] = &[
    "matrix3d",
    "translate3d",
    "translateZ",
    "scale3d",
    "scaleZ",
    "rotate3d",
    "rotateX",
    "rotateY",
    "perspective",
];

static ROTATE_Z: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?i)rotatez").ok());

pub struct TransformDecl;

impl TransformDecl {
    pub const NAMES: &[&str] = &["transform", "transform-origin"];

    fn contains_3d(decl: &Declaration) -> bool {
        decl.prop != "transform-origin"
            && FUNCTIONS_3D
                .iter()
                .any(|function| decl.value.contains(format!("{function}(").as_str()))
    }

    fn inside_keyframes(sheet: &Stylesheet, decl: NodeId) -> bool {
        sheet
            .ancestors(decl)
            .into_iter()
            .any(|ancestor| sheet.at_rule(ancestor).is_some_and(|at_rule| at_rule.name == "keyframes"))
    }
}

impl DeclarationHack for TransformDecl {
    fn set(&self, decl: &mut Declaration, prefix: &str) -> bool {
        decl.prop = self.prefixed(&decl.prop, prefix);
        if prefix == "-ms-" {
            decl.value = vendor::replace_all(&ROTATE_Z, &decl.value, "rotate");
        }
        true
    }

    /// IE 9 and old Opera have no 3D transforms; IE also ignores them in
    /// keyframes.
    fn insert(
        &self,
        handler: &DeclarationHandler,
        pass: &mut Pass<'_>,
        decl: NodeId,
        prefix: &str,
        prefixes: &[String],
    ) -> Option<NodeId> {
        let is_3d = Self::contains_3d(pass.sheet.declaration(decl)?);
        let skip = match prefix {
            "-ms-" => is_3d || Self::inside_keyframes(pass.sheet, decl),
            "-o-" => is_3d,
            _ => false,
        };
        if skip {
            return None;
        }
        insert_clone(handler, pass, decl, prefix, prefixes)
    }
}

pub struct ImageRendering;

impl ImageRendering {
    pub const NAMES: &[&str] = &["image-rendering", "interpolation-mode"];
}

impl DeclarationHack for ImageRendering {
    fn check(&self, sheet: &Stylesheet, decl: NodeId) -> bool {
        sheet.declaration(decl).is_some_and(|found| found.value == "pixelated")
    }

    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        if prefix == "-ms-" {
            "-ms-interpolation-mode".to_owned()
        } else {
            format!("{prefix}{prop}")
        }
    }

    fn normalize(&self, _prop: &str) -> String {
        "image-rendering".to_owned()
    }

    fn set(&self, decl: &mut Declaration, prefix: &str) -> bool {
        if prefix == "-ms-" {
            "-ms-interpolation-mode".clone_into(&mut decl.prop);
            "nearest-neighbor".clone_into(&mut decl.value);
        } else {
            decl.prop = self.prefixed(&decl.prop, prefix);
        }
        true
    }
}

const TEXT_DECORATION_BASIC: &[&str] = &[
    "none",
    "underline",
    "overline",
    "line-through",
    "blink",
    "inherit",
    "initial",
    "unset",
];

pub struct TextDecoration;

impl TextDecoration {
    pub const NAMES: &[&str] = &["text-decoration"];
}

impl DeclarationHack for TextDecoration {
    /// Only the multi-value shorthand needs a prefix.
    fn check(&self, sheet: &Stylesheet, decl: NodeId) -> bool {
        sheet.declaration(decl).is_some_and(|found| {
            found
                .value
                .split_whitespace()
                .any(|word| !TEXT_DECORATION_BASIC.contains(&word))
        })
    }
}

pub struct BackgroundSize;

impl BackgroundSize {
    pub const NAMES: &[&str] = &["background-size"];
}

impl DeclarationHack for BackgroundSize {
    /// Old WebKit reads a single length as the width only.
    fn set(&self, decl: &mut Declaration, prefix: &str) -> bool {
        let lower = decl.value.to_lowercase();
        if prefix == "-webkit-" && !lower.contains(' ') && lower != "contain" && lower != "cover" {
            decl.value = format!("{0} {0}", decl.value);
        }
        decl.prop = self.prefixed(&decl.prop, prefix);
        true
    }
}

pub struct PrintColorAdjust;

impl PrintColorAdjust {
    pub const NAMES: &[&str] = &["print-color-adjust", "color-adjust"];
}

impl DeclarationHack for PrintColorAdjust {
    fn prefixed(&self, _prop: &str, prefix: &str) -> String {
        if prefix == "-moz-" {
            "color-adjust".to_owned()
        } else {
            format!("{prefix}print-color-adjust")
        }
    }

    fn normalize(&self, _prop: &str) -> String {
        "print-color-adjust".to_owned()
    }
}

pub struct OverscrollBehavior;

impl OverscrollBehavior {
    pub const NAMES: &[&str] = &["overscroll-behavior", "scroll-chaining"];
}

impl DeclarationHack for OverscrollBehavior {
    fn prefixed(&self, _prop: &str, prefix: &str) -> String {
        format!("{prefix}scroll-chaining")
    }

    fn normalize(&self, _prop: &str) -> String {
        "overscroll-behavior".to_owned()
    }

    fn set(&self, decl: &mut Declaration, prefix: &str) -> bool {
        match decl.value.as_str() {
            "auto" => "chained".clone_into(&mut decl.value),
            "none" | "contain" => "none".clone_into(&mut decl.value),
            _ => {}
        }
        decl.prop = self.prefixed(&decl.prop, prefix);
        true
    }
}

static EMPHASIS_SIDE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?i)\s*(right|left)\s*").ok());

pub struct TextEmphasisPosition;

impl TextEmphasisPosition {
    pub const NAMES: &[&str] = &["text-emphasis-position"];
}

impl DeclarationHack for TextEmphasisPosition {
    /// WebKit only knows `over` and `under`.
    fn set(&self, decl: &mut Declaration, prefix: &str) -> bool {
        if prefix == "-webkit-"
            && let Some(regex) = EMPHASIS_SIDE.as_ref()
        {
            decl.value = regex.replace(&decl.value, "").into_owned();
        }
        decl.prop = self.prefixed(&decl.prop, prefix);
        true
    }
}

pub struct TextDecorationSkipInk;

impl TextDecorationSkipInk {
    pub const NAMES: &[&str] = &["text-decoration-skip-ink"];
}

impl DeclarationHack for TextDecorationSkipInk {
    fn set(&self, decl: &mut Declaration, prefix: &str) -> bool {
        if decl.prop == "text-decoration-skip-ink" && decl.value == "auto" {
            decl.prop = format!("{prefix}text-decoration-skip");
            "ink".clone_into(&mut decl.value);
        } else {
            decl.prop = self.prefixed(&decl.prop, prefix);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_compile() {
        for pattern in [
            &COMPOSITE_IN_MASK,
            &FILL_KEYWORD,
            &INLINE_SIDE,
            &ROTATE_Z,
            &EMPHASIS_SIDE,
        ] {
            assert!(pattern.is_some());
        }
    }

    fn declaration(prop: &str, value: &str) -> Declaration {
        Declaration {
            prop: prop.to_owned(),
            value: value.to_owned(),
            important: false,
        }
    }

    #[test]
    fn mask_layers_lose_their_composite_keyword() {
        let value = "url(a.png) intersect, url(b.png)";
        assert_eq!(MaskComposite::composite_values("mask", value), ["intersect"]);
        assert_eq!(
            vendor::replace_all(&COMPOSITE_IN_MASK, value, ","),
            "url(a.png), url(b.png)"
        );
        assert_eq!(
            MaskComposite::composite_values("mask-composite", "add, exclude"),
            ["add", "exclude"]
        );
    }

    #[test]
    fn mozilla_corner_names_round_trip() {
        assert_eq!(
            BorderRadius.prefixed("border-top-left-radius", "-moz-"),
            "-moz-border-radius-topleft"
        );
        assert_eq!(BorderRadius.normalize("border-radius-topleft"), "border-top-left-radius");
        assert_eq!(BorderRadius.prefixed("border-radius", "-webkit-"), "-webkit-border-radius");
    }

    #[test]
    fn logical_properties_use_the_old_names() {
        assert_eq!(BlockLogical.prefixed("margin-block-start", "-webkit-"), "-webkit-margin-before");
        assert_eq!(BlockLogical.normalize("margin-after"), "margin-block-end");
        assert_eq!(InlineLogical.prefixed("padding-inline-end", "-moz-"), "-moz-padding-end");
        assert_eq!(InlineLogical.normalize("border-start"), "border-inline-start");
    }

    #[test]
    fn break_values_are_rewritten_for_columns() {
        let mut decl = declaration("break-inside", "avoid-column");
        assert!(BreakProps.set(&mut decl, "-webkit-"));
        assert_eq!(decl.prop, "-webkit-column-break-inside");
        assert_eq!(decl.value, "avoid");
    }

    #[test]
    fn skip_ink_becomes_skip() {
        let mut decl = declaration("text-decoration-skip-ink", "auto");
        assert!(TextDecorationSkipInk.set(&mut decl, "-webkit-"));
        assert_eq!(decl.prop, "-webkit-text-decoration-skip");
        assert_eq!(decl.value, "ink");
    }

    #[test]
    fn ie_rotate_z_is_plain_rotate() {
        let mut decl = declaration("transform", "rotateZ(45deg)");
        assert!(TransformDecl.set(&mut decl, "-ms-"));
        assert_eq!(decl.value, "rotate(45deg)");
    }
}
