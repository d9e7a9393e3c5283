//! Flexbox property and value names across the 2009, 2012 and final drafts.

use super::flex_spec::{FlexSpec, flex_spec};
use crate::error::PrefixerError;
use crate::handlers::declaration::{DeclarationHandler, insert_clone, insert_variant};
use crate::handlers::value::{OldValue, ValueHack, ValueHandler};
use crate::handlers::DeclarationHack;
use crate::pass::Pass;
use css_syntax::{Declaration, NodeId, Stylesheet, list};

fn spec(prefix: &str) -> Option<FlexSpec> {
    flex_spec(prefix).0
}

fn rename(map: &[(&str, &'static str)], value: &str) -> Option<&'static str> {
    map.iter().find(|(from, _)| *from == value).map(|(_, to)| *to)
}

/// `box-orient` + `box-direction` pair for the 2009 draft, from a
/// `flex-direction` style keyword.
fn insert_box_orient(
    pass: &mut Pass<'_>,
    decl: NodeId,
    keyword: &str,
    vendor: &str,
    prefixes: &[String],
    prefix: &str,
) -> Option<NodeId> {
    let parent = pass.sheet.parent(decl)?;
    let orient_prop = format!("{vendor}box-orient");
    let direction_prop = format!("{vendor}box-direction");
    if pass
        .sheet
        .some_declaration(parent, |other| other.prop == orient_prop || other.prop == direction_prop)
    {
        return None;
    }
    let (orient, direction) = if matches!(keyword, "inherit" | "initial" | "unset") {
        (keyword.to_owned(), keyword.to_owned())
    } else {
        let orient = if keyword.contains("row") { "horizontal" } else { "vertical" };
        let direction = if keyword.contains("reverse") { "reverse" } else { "normal" };
        (orient.to_owned(), direction.to_owned())
    };
    insert_variant(pass, decl, orient_prop, orient, prefixes, prefix);
    insert_variant(pass, decl, direction_prop, direction, prefixes, prefix)
}

pub struct Flex;

impl Flex {
    pub const NAMES: &[&str] = &["flex", "box-flex"];
}

impl DeclarationHack for Flex {
    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        match flex_spec(prefix) {
            (Some(FlexSpec::Old2009), vendor) => format!("{vendor}box-flex"),
            (_, vendor) => format!("{vendor}{prop}"),
        }
    }

    fn normalize(&self, _prop: &str) -> String {
        "flex".to_owned()
    }

    fn set(&self, decl: &mut Declaration, prefix: &str) -> bool {
        match spec(prefix) {
            Some(FlexSpec::Old2009) => {
                let first = list::space(&decl.value).into_iter().next().unwrap_or_default();
                decl.value = rename(&[("auto", "1"), ("none", "0")], &first).map_or(first, ToOwned::to_owned);
            }
            Some(FlexSpec::Tweener2012) => {
                let components = list::space(&decl.value);
                if let [grow, shrink, basis] = components.as_slice()
                    && basis == "0"
                {
                    decl.value = format!("{grow} {shrink} 0px");
                }
            }
            _ => {}
        }
        decl.prop = self.prefixed(&decl.prop, prefix);
        true
    }
}

pub struct Order;

impl Order {
    pub const NAMES: &[&str] = &["order", "flex-order", "box-ordinal-group"];
}

impl DeclarationHack for Order {
    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        match flex_spec(prefix) {
            (Some(FlexSpec::Old2009), vendor) => format!("{vendor}box-ordinal-group"),
            (Some(FlexSpec::Tweener2012), vendor) => format!("{vendor}flex-order"),
            (_, vendor) => format!("{vendor}{prop}"),
        }
    }

    fn normalize(&self, _prop: &str) -> String {
        "order".to_owned()
    }

    /// 2009 ordinal groups start at 1. An order with no ordinal group gets
    /// no 2009 copy.
    fn set(&self, decl: &mut Declaration, prefix: &str) -> bool {
        if spec(prefix) == Some(FlexSpec::Old2009)
            && decl.value.contains(|letter: char| letter.is_ascii_digit())
            && let Ok(order) = decl.value.trim().parse::<i64>()
        {
            let Some(group) = order.checked_add(1) else {
                return false;
            };
            decl.value = group.to_string();
        }
        decl.prop = self.prefixed(&decl.prop, prefix);
        true
    }
}

pub struct FlexFlow;

impl FlexFlow {
    pub const NAMES: &[&str] = &["flex-flow", "box-direction", "box-lines"];
}

impl DeclarationHack for FlexFlow {
    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        format!("{}{prop}", flex_spec(prefix).1)
    }

    fn insert(
        &self,
        handler: &DeclarationHandler,
        pass: &mut Pass<'_>,
        decl: NodeId,
        prefix: &str,
        prefixes: &[String],
    ) -> Option<NodeId> {
        let (spec, vendor) = flex_spec(prefix);
        if spec != Some(FlexSpec::Old2009) {
            return insert_clone(handler, pass, decl, prefix, prefixes);
        }
        let value = pass.sheet.declaration(decl)?.value.clone();
        let direction = value
            .split_whitespace()
            .find(|word| !matches!(*word, "wrap" | "nowrap" | "wrap-reverse"))?
            .to_owned();
        insert_box_orient(pass, decl, &direction, vendor, prefixes, prefix)
    }
}

pub struct FlexDirection;

impl FlexDirection {
    pub const NAMES: &[&str] = &["flex-direction", "box-direction", "box-orient"];
}

impl DeclarationHack for FlexDirection {
    fn normalize(&self, _prop: &str) -> String {
        "flex-direction".to_owned()
    }

    fn old(&self, prop: &str, prefix: &str) -> Vec<String> {
        match flex_spec(prefix) {
            (Some(FlexSpec::Old2009), vendor) => {
                vec![format!("{vendor}box-orient"), format!("{vendor}box-direction")]
            }
            _ => vec![self.prefixed(prop, prefix)],
        }
    }

    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        format!("{}{prop}", flex_spec(prefix).1)
    }

    fn insert(
        &self,
        handler: &DeclarationHandler,
        pass: &mut Pass<'_>,
        decl: NodeId,
        prefix: &str,
        prefixes: &[String],
    ) -> Option<NodeId> {
        let (spec, vendor) = flex_spec(prefix);
        if spec != Some(FlexSpec::Old2009) {
            return insert_clone(handler, pass, decl, prefix, prefixes);
        }
        let value = pass.sheet.declaration(decl)?.value.clone();
        insert_box_orient(pass, decl, &value, vendor, prefixes, prefix)
    }
}

pub struct FlexGrow;

impl FlexGrow {
    pub const NAMES: &[&str] = &["flex-grow", "flex-positive"];
}

impl DeclarationHack for FlexGrow {
    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        match flex_spec(prefix) {
            (Some(FlexSpec::Old2009), vendor) => format!("{vendor}box-flex"),
            (Some(FlexSpec::Tweener2012), vendor) => format!("{vendor}flex-positive"),
            (_, vendor) => format!("{vendor}{prop}"),
        }
    }

    fn normalize(&self, _prop: &str) -> String {
        "flex-grow".to_owned()
    }
}

pub struct FlexWrap;

impl FlexWrap {
    pub const NAMES: &[&str] = &["flex-wrap"];
}

impl DeclarationHack for FlexWrap {
    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        format!("{}{prop}", flex_spec(prefix).1)
    }

    /// The 2009 draft has no wrapping.
    fn set(&self, decl: &mut Declaration, prefix: &str) -> bool {
        if spec(prefix) == Some(FlexSpec::Old2009) {
            return false;
        }
        decl.prop = self.prefixed(&decl.prop, prefix);
        true
    }
}

/// Shrink and basis only exist from the 2012 draft on.
fn set_from_2012(hack: &dyn DeclarationHack, decl: &mut Declaration, prefix: &str) -> bool {
    if !matches!(spec(prefix), Some(FlexSpec::Tweener2012 | FlexSpec::Final)) {
        return false;
    }
    decl.prop = hack.prefixed(&decl.prop, prefix);
    true
}

pub struct FlexShrink;

impl FlexShrink {
    pub const NAMES: &[&str] = &["flex-shrink", "flex-negative"];
}

impl DeclarationHack for FlexShrink {
    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        match flex_spec(prefix) {
            (Some(FlexSpec::Tweener2012), vendor) => format!("{vendor}flex-negative"),
            (_, vendor) => format!("{vendor}{prop}"),
        }
    }

    fn normalize(&self, _prop: &str) -> String {
        "flex-shrink".to_owned()
    }

    fn set(&self, decl: &mut Declaration, prefix: &str) -> bool {
        set_from_2012(self, decl, prefix)
    }
}

pub struct FlexBasis;

impl FlexBasis {
    pub const NAMES: &[&str] = &["flex-basis", "flex-preferred-size"];
}

impl DeclarationHack for FlexBasis {
    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        match flex_spec(prefix) {
            (Some(FlexSpec::Tweener2012), vendor) => format!("{vendor}flex-preferred-size"),
            (_, vendor) => format!("{vendor}{prop}"),
        }
    }

    fn normalize(&self, _prop: &str) -> String {
        "flex-basis".to_owned()
    }

    fn set(&self, decl: &mut Declaration, prefix: &str) -> bool {
        set_from_2012(self, decl, prefix)
    }
}

const START_END: &[(&str, &str)] = &[("flex-end", "end"), ("flex-start", "start")];

pub struct AlignItems;

impl AlignItems {
    pub const NAMES: &[&str] = &["align-items", "flex-align", "box-align"];
}

impl DeclarationHack for AlignItems {
    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        match flex_spec(prefix) {
            (Some(FlexSpec::Old2009), vendor) => format!("{vendor}box-align"),
            (Some(FlexSpec::Tweener2012), vendor) => format!("{vendor}flex-align"),
            (_, vendor) => format!("{vendor}{prop}"),
        }
    }

    fn normalize(&self, _prop: &str) -> String {
        "align-items".to_owned()
    }

    fn set(&self, decl: &mut Declaration, prefix: &str) -> bool {
        if matches!(spec(prefix), Some(FlexSpec::Old2009 | FlexSpec::Tweener2012))
            && let Some(old) = rename(START_END, &decl.value)
        {
            old.clone_into(&mut decl.value);
        }
        decl.prop = self.prefixed(&decl.prop, prefix);
        true
    }
}

pub struct AlignSelf;

impl AlignSelf {
    pub const NAMES: &[&str] = &["align-self", "flex-item-align"];
}

impl DeclarationHack for AlignSelf {
    /// Grid items use `-ms-grid-row-align` instead.
    fn check(&self, sheet: &Stylesheet, decl: NodeId) -> bool {
        sheet
            .parent(decl)
            .is_some_and(|parent| !sheet.some_declaration(parent, |other| other.prop.starts_with("grid-")))
    }

    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        match flex_spec(prefix) {
            (Some(FlexSpec::Tweener2012), vendor) => format!("{vendor}flex-item-align"),
            (_, vendor) => format!("{vendor}{prop}"),
        }
    }

    fn normalize(&self, _prop: &str) -> String {
        "align-self".to_owned()
    }

    fn set(&self, decl: &mut Declaration, prefix: &str) -> bool {
        match spec(prefix) {
            Some(FlexSpec::Tweener2012) => {
                if let Some(old) = rename(START_END, &decl.value) {
                    old.clone_into(&mut decl.value);
                }
            }
            Some(FlexSpec::Final) => {}
            _ => return false,
        }
        decl.prop = self.prefixed(&decl.prop, prefix);
        true
    }
}

pub struct AlignContent;

impl AlignContent {
    pub const NAMES: &[&str] = &["align-content", "flex-line-pack"];
}

impl DeclarationHack for AlignContent {
    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        match flex_spec(prefix) {
            (Some(FlexSpec::Tweener2012), vendor) => format!("{vendor}flex-line-pack"),
            (_, vendor) => format!("{vendor}{prop}"),
        }
    }

    fn normalize(&self, _prop: &str) -> String {
        "align-content".to_owned()
    }

    fn set(&self, decl: &mut Declaration, prefix: &str) -> bool {
        match spec(prefix) {
            Some(FlexSpec::Tweener2012) => {
                let old = rename(
                    &[
                        ("flex-end", "end"),
                        ("flex-start", "start"),
                        ("space-between", "justify"),
                        ("space-around", "distribute"),
                    ],
                    &decl.value,
                );
                if let Some(old) = old {
                    old.clone_into(&mut decl.value);
                }
            }
            Some(FlexSpec::Final) => {}
            _ => return false,
        }
        decl.prop = self.prefixed(&decl.prop, prefix);
        true
    }
}

pub struct JustifyContent;

impl JustifyContent {
    pub const NAMES: &[&str] = &["justify-content", "flex-pack", "box-pack"];
}

impl DeclarationHack for JustifyContent {
    fn prefixed(&self, prop: &str, prefix: &str) -> String {
        match flex_spec(prefix) {
            (Some(FlexSpec::Old2009), vendor) => format!("{vendor}box-pack"),
            (Some(FlexSpec::Tweener2012), vendor) => format!("{vendor}flex-pack"),
            (_, vendor) => format!("{vendor}{prop}"),
        }
    }

    fn normalize(&self, _prop: &str) -> String {
        "justify-content".to_owned()
    }

    /// The 2009 draft has no `distribute`; `justify` is the closest match.
    fn set(&self, decl: &mut Declaration, prefix: &str) -> bool {
        let renames: &[(&str, &'static str)] = match spec(prefix) {
            Some(FlexSpec::Old2009) => &[
                ("flex-end", "end"),
                ("flex-start", "start"),
                ("space-around", "justify"),
                ("space-between", "justify"),
            ],
            Some(FlexSpec::Tweener2012) => &[
                ("flex-end", "end"),
                ("flex-start", "start"),
                ("space-around", "distribute"),
                ("space-between", "justify"),
            ],
            Some(FlexSpec::Final) => &[],
            None => return false,
        };
        if let Some(old) = rename(renames, &decl.value) {
            old.clone_into(&mut decl.value);
        }
        decl.prop = self.prefixed(&decl.prop, prefix);
        true
    }
}

/// `display: flex` and `display: inline-flex`.
pub struct DisplayFlex;

impl DisplayFlex {
    pub const NAMES: &[&str] = &["display-flex", "inline-flex"];

    fn prefixed(name: &str, prefix: &str) -> Option<String> {
        let inline = name != "flex";
        let keyword = match flex_spec(prefix) {
            (Some(FlexSpec::Old2009), _) if inline => "inline-box",
            (Some(FlexSpec::Old2009), _) => "box",
            (Some(FlexSpec::Tweener2012), _) if inline => "inline-flexbox",
            (Some(FlexSpec::Tweener2012), _) => "flexbox",
            (Some(FlexSpec::Final), _) => name,
            (None, _) => return None,
        };
        Some(format!("{}{keyword}", flex_spec(prefix).1))
    }
}

impl ValueHack for DisplayFlex {
    fn value_name<'name>(&self, name: &'name str) -> &'name str {
        if name == "display-flex" { "flex" } else { name }
    }

    fn check(&self, handler: &ValueHandler, sheet: &Stylesheet, decl: NodeId) -> bool {
        sheet
            .declaration(decl)
            .is_some_and(|found| found.prop == "display" && found.value == handler.name)
    }

    fn replace(&self, handler: &ValueHandler, _value: &str, prefix: &str) -> Option<String> {
        Self::prefixed(&handler.name, prefix)
    }

    fn old(&self, handler: &ValueHandler, prefix: &str) -> Result<Option<OldValue>, PrefixerError> {
        Self::prefixed(&handler.name, prefix)
            .map(|prefixed| OldValue::new(&handler.name, &prefixed, None, None))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_with(hack: &dyn DeclarationHack, prop: &str, value: &str, prefix: &str) -> Option<(String, String)> {
        let mut decl = Declaration {
            prop: prop.to_owned(),
            value: value.to_owned(),
            important: false,
        };
        hack.set(&mut decl, prefix).then_some((decl.prop, decl.value))
    }

    #[test]
    fn flex_shorthand_per_draft() {
        assert_eq!(
            set_with(&Flex, "flex", "auto", "-webkit- 2009"),
            Some(("-webkit-box-flex".to_owned(), "1".to_owned()))
        );
        assert_eq!(
            set_with(&Flex, "flex", "1 1 0", "-ms-"),
            Some(("-ms-flex".to_owned(), "1 1 0px".to_owned()))
        );
        assert_eq!(
            set_with(&Flex, "flex", "1 1 0", "-webkit-"),
            Some(("-webkit-flex".to_owned(), "1 1 0".to_owned()))
        );
    }

    #[test]
    fn order_becomes_an_ordinal_group() {
        assert_eq!(
            set_with(&Order, "order", "2", "-webkit- 2009"),
            Some(("-webkit-box-ordinal-group".to_owned(), "3".to_owned()))
        );
        assert_eq!(
            set_with(&Order, "order", "-1", "-ms-"),
            Some(("-ms-flex-order".to_owned(), "-1".to_owned()))
        );
        assert_eq!(set_with(&Order, "order", &i64::MAX.to_string(), "-webkit- 2009"), None);
    }

    #[test]
    fn justify_content_maps_keywords() {
        assert_eq!(
            set_with(&JustifyContent, "justify-content", "space-around", "-webkit- 2009"),
            Some(("-webkit-box-pack".to_owned(), "justify".to_owned()))
        );
        assert_eq!(
            set_with(&JustifyContent, "justify-content", "space-around", "-ms-"),
            Some(("-ms-flex-pack".to_owned(), "distribute".to_owned()))
        );
        assert_eq!(
            set_with(&JustifyContent, "justify-content", "space-around", "final -moz-"),
            Some(("-moz-justify-content".to_owned(), "space-around".to_owned()))
        );
    }

    #[test]
    fn order_shifts_for_2009() {
        assert_eq!(
            set_with(&Order, "order", "2", "-webkit- 2009"),
            Some(("-webkit-box-ordinal-group".to_owned(), "3".to_owned()))
        );
    }

    #[test]
    fn shrink_is_dropped_for_2009() {
        assert_eq!(set_with(&FlexShrink, "flex-shrink", "1", "-webkit- 2009"), None);
        assert_eq!(set_with(&FlexWrap, "flex-wrap", "wrap", "-moz-"), None);
    }

    #[test]
    fn display_flex_keywords() {
        assert_eq!(DisplayFlex::prefixed("flex", "-webkit- 2009").as_deref(), Some("-webkit-box"));
        assert_eq!(DisplayFlex::prefixed("inline-flex", "-ms-").as_deref(), Some("-ms-inline-flexbox"));
        assert_eq!(DisplayFlex::prefixed("flex", "-webkit-").as_deref(), Some("-webkit-flex"));
        assert_eq!(DisplayFlex::prefixed("flex", "-o-"), None);
    }
}
