//! Turns the capability table and a browser selection into a prefix plan.

use crate::data::{CapabilityTable, FeatureRecord};
use crate::options::{FlexboxMode, Options};
use crate::vendor::{remove_note, uniq};
use css_browsers::{BrowserTarget, Browsers};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which prefixes to add and which to remove, per feature name.
///
/// Prefixes may carry a note (`-webkit- 2009`). The add lists are ordered
/// longest vendor first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixPlan {
    pub add: BTreeMap<String, Vec<String>>,
    pub remove: BTreeMap<String, Vec<String>>,
}

impl PrefixPlan {
    /// Whether the plan adds anything at all.
    pub fn adds_nothing(&self) -> bool {
        self.add.is_empty()
    }
}

fn prefix_of<'browsers>(browsers: &'browsers Browsers, target: &BrowserTarget) -> Option<&'browsers str> {
    browsers
        .agents()
        .get(&target.name)
        .map(|agent| agent.prefix_for(&target.version))
}

fn with_note(prefix: &str, note: Option<&str>) -> String {
    note.map_or_else(|| prefix.to_owned(), |note| format!("{prefix} {note}"))
}

/// Order prefixes by vendor length, then by full length, both descending.
/// Equal keys keep their order.
pub fn sort(mut prefixes: Vec<String>) -> Vec<String> {
    prefixes.sort_by(|left, right| {
        remove_note(right)
            .len()
            .cmp(&remove_note(left).len())
            .then_with(|| right.len().cmp(&left.len()))
    });
    prefixes
}

struct Selection {
    add: Vec<String>,
    all: Vec<String>,
}

fn select_record(record: &FeatureRecord, browsers: &Browsers, options: &Options) -> Selection {
    let notes = uniq(record.support.iter().filter_map(|entry| {
        let note = entry.note.as_deref()?;
        prefix_of(browsers, &entry.browser).map(|prefix| with_note(prefix, Some(note)))
    }));
    let selected = record
        .support
        .iter()
        .filter(|entry| browsers.selected().contains(&entry.browser))
        .filter_map(|entry| {
            prefix_of(browsers, &entry.browser).map(|prefix| with_note(prefix, entry.note.as_deref()))
        });
    let mut add = sort(uniq(selected));
    if options.flexbox == FlexboxMode::No2009 {
        add.retain(|prefix| !prefix.contains("2009"));
    }
    let plain = record
        .support
        .iter()
        .filter_map(|entry| prefix_of(browsers, &entry.browser).map(ToOwned::to_owned));
    let all = uniq(plain.chain(record.mistakes.iter().cloned()).chain(notes));
    Selection { add, all }
}

/// Compile the plan for `browsers`.
///
/// A feature lands in `add` when any selected browser needs a prefix for it;
/// every other prefix the feature ever had (including known mistakes) lands
/// in `remove`.
pub fn compile(table: &CapabilityTable, browsers: &Browsers, options: &Options) -> PrefixPlan {
    let mut plan = PrefixPlan::default();
    for record in table.records() {
        let Selection { add, all } = select_record(record, browsers, options);
        if add.is_empty() {
            plan.remove.insert(record.name.clone(), all);
            continue;
        }
        if add.len() < all.len() {
            let remove: Vec<String> = all.into_iter().filter(|prefix| !add.contains(prefix)).collect();
            plan.remove.insert(record.name.clone(), remove);
        }
        plan.add.insert(record.name.clone(), add);
    }
    log::debug!(
        "compiled plan for {} browsers: {} features to add, {} to remove",
        browsers.selected().len(),
        plan.add.len(),
        plan.remove.len()
    );
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_browsers::AgentDatabase;

    fn plan(queries: &[&str], options: &Options) -> PrefixPlan {
        let agents = AgentDatabase::builtin().unwrap();
        let table = CapabilityTable::builtin(&agents).unwrap();
        let queries: Vec<String> = queries.iter().map(|query| (*query).to_owned()).collect();
        let browsers = Browsers::new(agents, &queries).unwrap();
        compile(&table, &browsers, options)
    }

    #[test]
    fn sorts_by_vendor_then_note() {
        let sorted = sort(vec![
            "-ms-".to_owned(),
            "-webkit-".to_owned(),
            "-webkit- 2009".to_owned(),
            "-moz-".to_owned(),
        ]);
        assert_eq!(sorted, vec!["-webkit- 2009", "-webkit-", "-moz-", "-ms-"]);
    }

    #[test]
    fn old_flexbox_browsers_get_noted_prefixes() {
        let plan = plan(&["chrome 20", "chrome 25", "ie 10"], &Options::default());
        assert_eq!(
            plan.add.get("flex").unwrap(),
            &vec!["-webkit- 2009", "-webkit-", "-ms-"]
        );
        assert!(plan.remove.get("flex").unwrap().contains(&"-moz-".to_owned()));
    }

    #[test]
    fn no_2009_drops_noted_prefixes() {
        let options = Options {
            flexbox: FlexboxMode::No2009,
            ..Options::default()
        };
        let plan = plan(&["chrome 20", "chrome 25"], &options);
        assert_eq!(plan.add.get("flex").unwrap(), &vec!["-webkit-"]);
    }

    #[test]
    fn modern_browsers_remove_everything() {
        let plan = plan(&["chrome 131"], &Options::default());
        assert!(!plan.add.contains_key("border-radius"));
        assert_eq!(
            plan.remove.get("border-radius").unwrap(),
            &vec!["-webkit-", "-moz-", "-khtml-", "-ms-", "-o-"]
        );
    }
}
