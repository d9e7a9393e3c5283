//! Embedded browser agents table.

use crate::error::BrowsersError;
use core::cmp::Ordering;
use core::{fmt, iter, slice};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

const BUILTIN_AGENTS: &str = include_str!("../data/agents.json");

#[derive(Deserialize)]
struct RawAgent {
    browser: String,
    prefix: String,
    #[serde(default)]
    prefix_exceptions: BTreeMap<String, String>,
    versions: Vec<String>,
}

/// One browser family and its released versions.
#[derive(Clone, Debug)]
pub struct Agent {
    /// Short key, e.g. `ios_saf`.
    pub name: String,
    /// Display name, e.g. `iOS Safari`.
    pub browser: String,
    /// Default vendor prefix, e.g. `-webkit-`.
    pub prefix: String,
    /// Versions that used a different prefix than the default.
    pub prefix_exceptions: HashMap<String, String>,
    /// Released versions, oldest first.
    pub versions: Vec<String>,
}

impl Agent {
    /// Prefix used by one version of this browser.
    pub fn prefix_for(&self, version: &str) -> &str {
        self.prefix_exceptions
            .get(version)
            .map_or(self.prefix.as_str(), String::as_str)
    }

    /// The newest `count` versions, newest first.
    pub fn last_versions(&self, count: usize) -> impl Iterator<Item = &str> {
        self.versions.iter().rev().take(count).map(String::as_str)
    }
}

/// Numeric value of a version for ordering and range comparisons.
///
/// Ranged versions such as `4.2-4.3` use their first part, and only the
/// major and minor components count (`4.4.3` is `4.4`).
pub fn version_number(version: &str) -> Option<f64> {
    let first = version.split('-').next()?;
    let mut parts = first.split('.');
    let major = parts.next()?;
    let number = match parts.next() {
        Some(minor) => format!("{major}.{minor}"),
        None => major.to_owned(),
    };
    number.parse().ok()
}

/// A concrete browser version such as `safari 17.4`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrowserTarget {
    pub name: String,
    pub version: String,
}

impl BrowserTarget {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for BrowserTarget {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {}", self.name, self.version)
    }
}

impl Ord for BrowserTarget {
    fn cmp(&self, other: &Self) -> Ordering {
        let left = version_number(&self.version).unwrap_or(0.0);
        let right = version_number(&other.version).unwrap_or(0.0);
        self.name
            .cmp(&other.name)
            .then_with(|| left.total_cmp(&right))
            .then_with(|| self.version.cmp(&other.version))
    }
}

impl PartialOrd for BrowserTarget {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// All known browser agents keyed by short name.
#[derive(Clone, Debug)]
pub struct AgentDatabase {
    agents: BTreeMap<String, Agent>,
}

static BUILTIN: OnceCell<Arc<AgentDatabase>> = OnceCell::new();

fn expand_versions(name: &str, versions: &[String]) -> Result<Vec<String>, BrowsersError> {
    let mut expanded = Vec::with_capacity(versions.len());
    for version in versions {
        let Some((from, to)) = version.split_once("..") else {
            expanded.push(version.clone());
            continue;
        };
        let bad_range = || BrowsersError::Data(format!("bad version range `{version}` for {name}"));
        let from: u32 = from.parse().map_err(|_err| bad_range())?;
        let to: u32 = to.parse().map_err(|_err| bad_range())?;
        if from > to {
            return Err(bad_range());
        }
        expanded.extend((from..=to).map(|number| number.to_string()));
    }
    Ok(expanded)
}

impl AgentDatabase {
    /// The agents table bundled with the crate, parsed once per process.
    ///
    /// # Errors
    /// Returns an error if the embedded data is malformed.
    pub fn builtin() -> Result<Arc<Self>, BrowsersError> {
        BUILTIN
            .get_or_try_init(|| Self::from_json(BUILTIN_AGENTS).map(Arc::new))
            .map(Arc::clone)
    }

    /// Parse an agents table.
    ///
    /// # Errors
    /// Returns an error for invalid JSON or malformed version ranges.
    pub fn from_json(json: &str) -> Result<Self, BrowsersError> {
        let raw: BTreeMap<String, RawAgent> = serde_json::from_str(json)?;
        let mut agents = BTreeMap::new();
        for (name, agent) in raw {
            let versions = expand_versions(&name, &agent.versions)?;
            let mut prefix_exceptions = HashMap::new();
            for (range, prefix) in &agent.prefix_exceptions {
                for version in expand_versions(&name, slice::from_ref(range))? {
                    prefix_exceptions.insert(version, prefix.clone());
                }
            }
            log::trace!("loaded agent {name} with {} versions", versions.len());
            agents.insert(
                name.clone(),
                Agent {
                    name,
                    browser: agent.browser,
                    prefix: agent.prefix,
                    prefix_exceptions,
                    versions,
                },
            );
        }
        Ok(Self { agents })
    }

    pub fn get(&self, name: &str) -> Option<&Agent> {
        self.agents.get(name)
    }

    /// Agents in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Distinct vendor prefixes, longest first.
    pub fn prefixes(&self) -> Vec<String> {
        let mut prefixes: Vec<String> = Vec::new();
        for agent in self.agents.values() {
            let exceptions = agent.prefix_exceptions.values();
            for prefix in iter::once(&agent.prefix).chain(exceptions) {
                if !prefixes.contains(prefix) {
                    prefixes.push(prefix.clone());
                }
            }
        }
        prefixes.sort_by(|left, right| right.len().cmp(&left.len()).then_with(|| left.cmp(right)));
        prefixes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_ranges_expand() {
        let versions = expand_versions("chrome", &["4..6".to_owned(), "7.1".to_owned()]).unwrap();
        assert_eq!(versions, vec!["4", "5", "6", "7.1"]);
        assert!(expand_versions("chrome", &["9..4".to_owned()]).is_err());
    }

    #[test]
    fn version_numbers_use_first_part() {
        assert_eq!(version_number("4.2-4.3"), Some(4.2));
        assert_eq!(version_number("4.4.3-4.4.4"), Some(4.4));
        assert_eq!(version_number("all"), None);
    }
}
