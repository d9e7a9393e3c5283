//! A compiled plan turned into ready-to-run handlers.

use crate::compiler::{self, PrefixPlan};
use crate::data::{CapabilityTable, FeatureKind, FeatureRecord};
use crate::error::PrefixerError;
use crate::handlers::{
    AtRuleHandler, DeclarationHandler, OldSelector, OldValue, Resolution, SelectorHandler, ValueHandler,
};
use crate::hacks;
use crate::options::Options;
use crate::vendor;
use css_browsers::Browsers;
use once_cell::sync::OnceCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Handlers that add prefixes.
#[derive(Default)]
struct Additions {
    selectors: Vec<SelectorHandler>,
    at_rules: HashMap<String, AtRuleHandler>,
    resolution: Option<Resolution>,
    declarations: HashMap<String, DeclarationHandler>,
    value_handlers: Vec<ValueHandler>,
    /// Indices into `value_handlers` per property; `*` applies everywhere.
    values: HashMap<String, Vec<usize>>,
}

/// Matchers for prefixes nobody needs any more.
#[derive(Default)]
struct Removals {
    selectors: Vec<OldSelector>,
    /// Prefixed at-rule names without the `@`.
    at_rules: HashSet<String>,
    resolution: Option<Resolution>,
    declarations: HashSet<String>,
    old_values: Vec<OldValue>,
    values: HashMap<String, Vec<usize>>,
}

/// Everything a processing run needs for one browser selection and
/// option set. Plans are immutable and shared between runs.
pub struct Prefixes {
    table: Arc<CapabilityTable>,
    browsers: Browsers,
    options: Options,
    plan: PrefixPlan,
    add: Additions,
    remove: Removals,
    cleaner: OnceCell<Box<Prefixes>>,
    supports: OnceCell<Box<Prefixes>>,
}

fn push_index(map: &mut HashMap<String, Vec<usize>>, key: &str, index: usize) {
    map.entry(key.to_owned()).or_default().push(index);
}

/// Features in table order with their planned prefixes.
fn planned<'table>(
    table: &'table CapabilityTable,
    plan: &'table BTreeMap<String, Vec<String>>,
) -> impl Iterator<Item = (&'table FeatureRecord, &'table Vec<String>)> {
    table
        .records()
        .iter()
        .filter_map(|record| plan.get(&record.name).map(|prefixes| (record, prefixes)))
}

impl Prefixes {
    /// Compile the plan for `browsers` and build its handlers.
    ///
    /// # Errors
    /// Returns an error if a handler pattern does not compile.
    pub fn new(table: Arc<CapabilityTable>, browsers: Browsers, options: Options) -> Result<Self, PrefixerError> {
        let plan = compiler::compile(&table, &browsers, &options);
        let add = Self::additions(&table, &plan, &browsers)?;
        let remove = Self::removals(&table, &plan, &browsers, &add)?;
        Ok(Self {
            table,
            browsers,
            options,
            plan,
            add,
            remove,
            cleaner: OnceCell::new(),
            supports: OnceCell::new(),
        })
    }

    fn additions(table: &CapabilityTable, plan: &PrefixPlan, browsers: &Browsers) -> Result<Additions, PrefixerError> {
        let mut add = Additions::default();
        for (record, prefixes) in planned(table, &plan.add) {
            let name = record.name.as_str();
            match record.kind {
                FeatureKind::AtRule if name == "@resolution" => {
                    add.resolution = Some(Resolution {
                        prefixes: prefixes.clone(),
                    });
                }
                FeatureKind::AtRule => {
                    add.at_rules.insert(
                        name.trim_start_matches('@').to_owned(),
                        AtRuleHandler {
                            name: name.to_owned(),
                            prefixes: prefixes.clone(),
                        },
                    );
                }
                FeatureKind::Selector => {
                    add.selectors.push(SelectorHandler::new(
                        name,
                        prefixes.clone(),
                        hacks::selector(name),
                        browsers.all_prefixes(),
                    )?);
                }
                FeatureKind::Value => {
                    let index = add.value_handlers.len();
                    add.value_handlers
                        .push(ValueHandler::new(name, prefixes.clone(), hacks::value(name))?);
                    for prop in record.props.iter().flatten() {
                        push_index(&mut add.values, prop, index);
                    }
                }
                FeatureKind::Property => {
                    let hack = hacks::declaration(name);
                    add.declarations.insert(
                        name.to_owned(),
                        DeclarationHandler {
                            name: name.to_owned(),
                            prefixes: vendor::uniq(hack.adjust_prefixes(prefixes.clone())),
                            hack,
                        },
                    );
                }
            }
        }
        Ok(add)
    }

    fn removals(
        table: &CapabilityTable,
        plan: &PrefixPlan,
        browsers: &Browsers,
        add: &Additions,
    ) -> Result<Removals, PrefixerError> {
        let mut remove = Removals::default();
        for (record, prefixes) in planned(table, &plan.remove) {
            let name = record.name.as_str();
            match record.kind {
                FeatureKind::Selector => {
                    let handler = SelectorHandler::new(name, Vec::new(), hacks::selector(name), browsers.all_prefixes())?;
                    for prefix in prefixes {
                        remove.selectors.push(handler.old(prefix)?);
                    }
                }
                FeatureKind::AtRule if name == "@resolution" => {
                    remove.resolution = Some(Resolution {
                        prefixes: prefixes.clone(),
                    });
                }
                FeatureKind::AtRule => {
                    for prefix in prefixes {
                        remove
                            .at_rules
                            .insert(format!("{prefix}{}", name.trim_start_matches('@')));
                    }
                }
                FeatureKind::Value => {
                    let handler = ValueHandler::new(name, Vec::new(), hacks::value(name))?;
                    for prefix in prefixes {
                        let Some(old) = handler.hack.old(&handler, prefix)? else {
                            continue;
                        };
                        let index = remove.old_values.len();
                        remove.old_values.push(old);
                        for prop in record.props.iter().flatten() {
                            push_index(&mut remove.values, prop, index);
                        }
                    }
                }
                FeatureKind::Property => {
                    let added = add.declarations.get(name).map(|handler| handler.prefixes.as_slice());
                    for prefix in prefixes {
                        if name == "align-self"
                            && let Some(added) = added
                        {
                            let has = |wanted: &str| added.iter().any(|known| known == wanted);
                            if (prefix == "-webkit- 2009" && has("-webkit-"))
                                || (prefix == "-webkit-" && has("-webkit- 2009"))
                            {
                                continue;
                            }
                        }
                        remove
                            .declarations
                            .extend(hacks::declaration(name).old(name, prefix));
                    }
                }
            }
        }
        Ok(remove)
    }

    /// The same plan without any browser: every known prefix is removed.
    ///
    /// # Errors
    /// Returns an error if the derived plan cannot be built.
    pub fn cleaner(&self) -> Result<&Self, PrefixerError> {
        self.cleaner
            .get_or_try_init(|| {
                let empty = self.browsers.filtered(|_| false);
                Self::new(Arc::clone(&self.table), empty, self.options.clone()).map(Box::new)
            })
            .map(AsRef::as_ref)
    }

    /// The plan restricted to selected browsers that understand `@supports`.
    ///
    /// # Errors
    /// Returns an error if the derived plan cannot be built.
    pub fn supports_prefixer(&self) -> Result<&Self, PrefixerError> {
        self.supports
            .get_or_try_init(|| {
                let queries = self.table.feature_queries();
                let browsers = self.browsers.filtered(|target| queries.contains(target));
                Self::new(Arc::clone(&self.table), browsers, self.options.clone()).map(Box::new)
            })
            .map(AsRef::as_ref)
    }

    pub fn plan(&self) -> &PrefixPlan {
        &self.plan
    }

    pub fn browsers(&self) -> &Browsers {
        &self.browsers
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn table(&self) -> &CapabilityTable {
        &self.table
    }

    /// The declaration handler for an unprefixed property.
    pub fn declaration(&self, prop: &str) -> Option<&DeclarationHandler> {
        self.add.declarations.get(prop)
    }

    /// Prefixes planned for property `name`.
    pub fn declaration_prefixes(&self, name: &str) -> Option<&[String]> {
        self.declaration(name).map(|handler| handler.prefixes.as_slice())
    }

    pub fn declarations(&self) -> impl Iterator<Item = &DeclarationHandler> {
        self.add.declarations.values()
    }

    pub fn at_rules(&self) -> impl Iterator<Item = &AtRuleHandler> {
        self.add.at_rules.values()
    }

    pub fn value_handlers(&self) -> &[ValueHandler] {
        &self.add.value_handlers
    }

    pub fn selectors(&self) -> &[SelectorHandler] {
        &self.add.selectors
    }

    pub fn old_selectors(&self) -> &[OldSelector] {
        &self.remove.selectors
    }

    /// The handler for `@{name}`, e.g. `keyframes`.
    pub fn at_rule(&self, name: &str) -> Option<&AtRuleHandler> {
        self.add.at_rules.get(name)
    }

    /// Whether an at-rule named `name` (`-webkit-keyframes`) is obsolete.
    pub fn removes_at_rule(&self, name: &str) -> bool {
        self.remove.at_rules.contains(name)
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.add.resolution.as_ref()
    }

    pub fn resolution_cleaner(&self) -> Option<&Resolution> {
        self.remove.resolution.as_ref()
    }

    /// Whether the prefixed property `prop` is obsolete.
    pub fn removes(&self, prop: &str) -> bool {
        self.remove.declarations.contains(prop)
    }

    fn collect<'handler, Handler>(
        handlers: &'handler [Handler],
        map: &HashMap<String, Vec<usize>>,
        prop: &str,
    ) -> Vec<&'handler Handler> {
        let mut indices: Vec<usize> = map.get("*").cloned().unwrap_or_default();
        for index in map.get(prop).into_iter().flatten() {
            if !indices.contains(index) {
                indices.push(*index);
            }
        }
        indices.into_iter().filter_map(|index| handlers.get(index)).collect()
    }

    /// Value handlers that apply to `prop`.
    pub fn add_values(&self, prop: &str) -> Vec<&ValueHandler> {
        Self::collect(&self.add.value_handlers, &self.add.values, prop)
    }

    /// Obsolete value matchers that apply to `prop`.
    pub fn remove_values(&self, prop: &str) -> Vec<&OldValue> {
        Self::collect(&self.remove.old_values, &self.remove.values, prop)
    }

    /// The standard name a property stands for, through its quirk.
    pub fn normalize(&self, prop: &str) -> String {
        hacks::declaration(prop).normalize(prop)
    }

    /// `-webkit-box-orient` is `flex-flow`, `-ms-grid-row` is
    /// `grid-row`.
    pub fn unprefixed(&self, prop: &str) -> String {
        let value = self.normalize(vendor::unprefixed(prop));
        if value == "flex-direction" {
            "flex-flow".to_owned()
        } else {
            value
        }
    }

    /// The prefixed spelling of `prop` for `prefix`.
    pub fn prefixed(&self, prop: &str, prefix: &str) -> String {
        let prop = vendor::unprefixed(prop);
        hacks::declaration(prop).prefixed(prop, prefix)
    }

    /// Whether any browser is selected while the plan adds nothing.
    pub fn needs_nothing(&self) -> bool {
        !self.browsers.selected().is_empty() && self.plan.adds_nothing()
    }

    /// A plan over the bundled data.
    #[cfg(test)]
    pub(crate) fn for_tests(queries: &[&str]) -> Self {
        use crate::options::GridMode;
        let options = Options {
            grid: GridMode::NoAutoplace,
            ..Options::for_browsers(queries.iter().copied())
        };
        Self::for_tests_with(options)
    }

    #[cfg(test)]
    pub(crate) fn for_tests_with(options: Options) -> Self {
        use css_browsers::AgentDatabase;
        let agents = AgentDatabase::builtin().unwrap();
        let table = Arc::new(CapabilityTable::builtin(&agents).unwrap());
        let browsers = Browsers::new(agents, &options.browsers).unwrap();
        Self::new(table, browsers, options).unwrap()
    }

    #[cfg(test)]
    pub(crate) fn for_tests_on(table: &str, queries: &[&str]) -> Self {
        use css_browsers::AgentDatabase;
        let agents = AgentDatabase::builtin().unwrap();
        let table = Arc::new(CapabilityTable::from_json(table, &agents).unwrap());
        let options = Options::for_browsers(queries.iter().copied());
        let browsers = Browsers::new(agents, &options.browsers).unwrap();
        Self::new(table, browsers, options).unwrap()
    }
}

/// A table in which only old engines need anything.
#[cfg(test)]
pub(crate) const LEGACY_ONLY_TABLE: &str = r#"{
    "feature_queries": ["chrome 28..131"],
    "features": [
        {"feature": "border-radius", "names": ["border-radius"], "browsers": ["chrome 4"]},
        {"feature": "css-animation", "names": ["@keyframes"], "browsers": ["chrome 4..42"]}
    ]
}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[test]
    fn old_browsers_get_handlers() {
        let prefixes = Prefixes::for_tests(&["chrome 20", "ie 10", "firefox 20"]);
        let flex = prefixes.declaration("flex").unwrap();
        assert!(flex.prefixes.contains(&"-ms-".to_owned()));
        assert!(!prefixes.add_values("display").is_empty());
        assert!(prefixes.at_rule("keyframes").is_some());
        assert!(prefixes.selectors().iter().any(|handler| handler.name == "::placeholder"));
    }

    #[test]
    fn modern_browsers_remove_outdated_prefixes() {
        let prefixes = Prefixes::for_tests(&["chrome 131"]);
        assert!(prefixes.removes("-webkit-border-radius"));
        assert!(prefixes.removes("-moz-border-radius"));
        assert!(prefixes.removes_at_rule("-webkit-keyframes"));
        assert!(prefixes.declaration("border-radius").is_none());
        assert!(
            prefixes
                .remove_values("width")
                .iter()
                .any(|old| old.check("-webkit-calc(1px + 2px)"))
        );
    }

    #[test]
    fn tables_without_modern_entries_add_nothing() {
        let prefixes = Prefixes::for_tests_on(LEGACY_ONLY_TABLE, &["chrome 131"]);
        assert!(prefixes.plan().adds_nothing());
        assert!(prefixes.removes("-webkit-border-radius"));
        let old = Prefixes::for_tests_on(LEGACY_ONLY_TABLE, &["chrome 4"]);
        assert!(!old.plan().adds_nothing());
    }

    #[test]
    fn names_round_trip_through_quirks() {
        let prefixes = Prefixes::for_tests(&["chrome 131"]);
        assert_eq!(prefixes.unprefixed("-webkit-box-orient"), "flex-flow");
        assert_eq!(prefixes.unprefixed("-ms-flex-pack"), "justify-content");
        assert_eq!(prefixes.prefixed("flex", "-webkit- 2009"), "-webkit-box-flex");
        assert_eq!(prefixes.prefixed("grid-row-start", "-ms-"), "-ms-grid-row");
    }

    #[test]
    fn derived_plans_are_built_once() {
        let prefixes = Prefixes::for_tests(&["chrome 20"]);
        let cleaner = prefixes.cleaner().unwrap();
        assert!(cleaner.plan().adds_nothing());
        assert!(ptr::eq(cleaner, prefixes.cleaner().unwrap()));
    }
}
