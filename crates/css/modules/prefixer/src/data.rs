//! The embedded capability table: which browsers needed a prefix for what.

use crate::error::PrefixerError;
use css_browsers::{AgentDatabase, BrowserTarget, version_number};
use serde::Deserialize;
use std::collections::HashMap;

const BUILTIN_TABLE: &str = include_str!("../data/prefixes.json");

#[derive(Deserialize)]
struct RawTable {
    feature_queries: Vec<String>,
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    feature: String,
    names: Vec<String>,
    browsers: Vec<String>,
    #[serde(default)]
    mistakes: Vec<String>,
    #[serde(default)]
    props: Option<Vec<String>>,
    #[serde(default)]
    selector: bool,
}

/// How a feature shows up in a stylesheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Property,
    /// A value keyword or function, restricted to `props`.
    Value,
    Selector,
    AtRule,
}

/// One browser version that needed a prefix, with an optional note such as
/// `2009` for the old flexbox syntax.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SupportEntry {
    pub browser: BrowserTarget,
    pub note: Option<String>,
}

/// Capability data for one feature name.
#[derive(Clone, Debug)]
pub struct FeatureRecord {
    /// The name as written in CSS: `flex`, `::placeholder`, `@keyframes`.
    pub name: String,
    pub kind: FeatureKind,
    pub support: Vec<SupportEntry>,
    /// Properties a value feature applies to; `*` means every property.
    pub props: Option<Vec<String>>,
    /// Prefixes that never existed but show up in the wild.
    pub mistakes: Vec<String>,
    /// The feature group the name belongs to.
    pub feature: String,
}

/// Every feature record in table order.
#[derive(Clone, Debug)]
pub struct CapabilityTable {
    records: Vec<FeatureRecord>,
    index: HashMap<String, usize>,
    feature_queries: Vec<BrowserTarget>,
}

fn expand_browser(
    agents: &AgentDatabase,
    entry: &str,
) -> Result<Vec<(BrowserTarget, Option<String>)>, PrefixerError> {
    let mut words = entry.split_whitespace();
    let (Some(name), Some(versions)) = (words.next(), words.next()) else {
        return Err(PrefixerError::Data(format!("bad browser entry `{entry}`")));
    };
    let note = words.next().map(ToOwned::to_owned);
    let Some(agent) = agents.get(name) else {
        log::trace!("skipping unknown agent in `{entry}`");
        return Ok(Vec::new());
    };
    let matched: Vec<&String> = if let Some((from, to)) = versions.split_once("..") {
        let bad = || PrefixerError::Data(format!("bad version range in `{entry}`"));
        let from = version_number(from).ok_or_else(bad)?;
        let to = version_number(to).ok_or_else(bad)?;
        agent
            .versions
            .iter()
            .filter(|known| version_number(known).is_some_and(|number| number >= from && number <= to))
            .collect()
    } else {
        agent.versions.iter().filter(|known| known.as_str() == versions).collect()
    };
    Ok(matched
        .into_iter()
        .map(|version| (BrowserTarget::new(name, version.clone()), note.clone()))
        .collect())
}

impl CapabilityTable {
    /// The table bundled with the crate, expanded against `agents`.
    ///
    /// # Errors
    /// Returns an error if the embedded data is malformed.
    pub fn builtin(agents: &AgentDatabase) -> Result<Self, PrefixerError> {
        Self::from_json(BUILTIN_TABLE, agents)
    }

    /// Parse a capability table. Version ranges such as `chrome 4..20` cover
    /// every known release of the agent between the bounds.
    ///
    /// # Errors
    /// Returns an error for invalid JSON, malformed browser entries or a name
    /// listed twice.
    pub fn from_json(json: &str, agents: &AgentDatabase) -> Result<Self, PrefixerError> {
        let raw: RawTable = serde_json::from_str(json)?;
        let mut records = Vec::new();
        let mut index = HashMap::new();
        for feature in raw.features {
            let mut support = Vec::new();
            for entry in &feature.browsers {
                for (browser, note) in expand_browser(agents, entry)? {
                    support.push(SupportEntry { browser, note });
                }
            }
            for name in &feature.names {
                let kind = if name.starts_with('@') {
                    FeatureKind::AtRule
                } else if feature.selector {
                    FeatureKind::Selector
                } else if feature.props.is_some() {
                    FeatureKind::Value
                } else {
                    FeatureKind::Property
                };
                if index.insert(name.clone(), records.len()).is_some() {
                    return Err(PrefixerError::Data(format!("`{name}` is listed twice")));
                }
                records.push(FeatureRecord {
                    name: name.clone(),
                    kind,
                    support: support.clone(),
                    props: feature.props.clone(),
                    mistakes: feature.mistakes.clone(),
                    feature: feature.feature.clone(),
                });
            }
        }
        let mut feature_queries = Vec::new();
        for entry in &raw.feature_queries {
            feature_queries.extend(expand_browser(agents, entry)?.into_iter().map(|(browser, _)| browser));
        }
        log::debug!("loaded {} capability records", records.len());
        Ok(Self {
            records,
            index,
            feature_queries,
        })
    }

    /// Records in table order.
    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    pub fn get(&self, name: &str) -> Option<&FeatureRecord> {
        self.index.get(name).and_then(|position| self.records.get(*position))
    }

    /// Browser versions that understand `@supports`.
    pub fn feature_queries(&self) -> &[BrowserTarget] {
        &self.feature_queries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CapabilityTable {
        let agents = AgentDatabase::builtin().unwrap();
        CapabilityTable::builtin(&agents).unwrap()
    }

    #[test]
    fn kinds_follow_the_name() {
        let table = table();
        assert_eq!(table.get("@keyframes").unwrap().kind, FeatureKind::AtRule);
        assert_eq!(table.get("::placeholder").unwrap().kind, FeatureKind::Selector);
        assert_eq!(table.get("linear-gradient").unwrap().kind, FeatureKind::Value);
        assert_eq!(table.get("flex").unwrap().kind, FeatureKind::Property);
    }

    #[test]
    fn ranges_and_notes_expand() {
        let table = table();
        let flex = table.get("flex").unwrap();
        let chrome20 = flex
            .support
            .iter()
            .find(|entry| entry.browser == BrowserTarget::new("chrome", "20"))
            .unwrap();
        assert_eq!(chrome20.note.as_deref(), Some("2009"));
        assert!(
            flex.support
                .iter()
                .any(|entry| entry.browser == BrowserTarget::new("ie", "10"))
        );
    }
}
