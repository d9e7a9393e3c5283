//! Browser targets: which browser versions a stylesheet is built for and
//! which vendor prefix each of them understands.
//!
//! Queries select versions by name and release order only; there is no
//! usage database behind them.

mod agents;
mod error;
mod query;

pub use agents::{Agent, AgentDatabase, BrowserTarget, version_number};
pub use error::BrowsersError;
pub use query::{DEFAULT_QUERY, resolve};

use std::sync::Arc;

/// A resolved browser selection.
#[derive(Clone, Debug)]
pub struct Browsers {
    agents: Arc<AgentDatabase>,
    selected: Vec<BrowserTarget>,
    prefixes: Vec<String>,
}

impl Browsers {
    /// Resolve `queries` against `agents`.
    ///
    /// # Errors
    /// Returns an error when any query cannot be resolved.
    pub fn new(agents: Arc<AgentDatabase>, queries: &[String]) -> Result<Self, BrowsersError> {
        let selected = resolve(&agents, queries)?;
        Ok(Self::from_targets(agents, selected))
    }

    /// Wrap an already resolved selection. The targets are sorted and
    /// deduplicated.
    pub fn from_targets(agents: Arc<AgentDatabase>, mut selected: Vec<BrowserTarget>) -> Self {
        selected.sort();
        selected.dedup();
        let prefixes = agents.prefixes();
        Self {
            agents,
            selected,
            prefixes,
        }
    }

    pub fn agents(&self) -> &AgentDatabase {
        &self.agents
    }

    /// Shared handle to the agents table.
    pub fn agents_handle(&self) -> Arc<AgentDatabase> {
        Arc::clone(&self.agents)
    }

    /// Selected versions ordered by name, then version.
    pub fn selected(&self) -> &[BrowserTarget] {
        &self.selected
    }

    /// Selected versions as `"name version"` strings.
    pub fn selected_names(&self) -> Vec<String> {
        self.selected.iter().map(ToString::to_string).collect()
    }

    /// Whether `"name version"` is part of the selection.
    pub fn is_selected(&self, browser: &str) -> bool {
        browser
            .split_once(' ')
            .is_some_and(|(name, version)| {
                self.selected
                    .iter()
                    .any(|target| target.name == name && target.version == version)
            })
    }

    /// Vendor prefix for `"name version"`, if the browser is known.
    pub fn prefix(&self, browser: &str) -> Option<&str> {
        let (name, version) = browser.split_once(' ')?;
        self.agents.get(name).map(|agent| agent.prefix_for(version))
    }

    /// Every vendor prefix any browser uses, longest first.
    pub fn all_prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Whether `value` contains any vendor prefix.
    pub fn with_prefix(&self, value: &str) -> bool {
        self.prefixes.iter().any(|prefix| value.contains(prefix.as_str()))
    }

    /// A selection restricted to versions `keep` accepts.
    #[must_use]
    pub fn filtered(&self, keep: impl Fn(&BrowserTarget) -> bool) -> Self {
        let selected = self.selected.iter().filter(|target| keep(target)).cloned().collect();
        Self::from_targets(Arc::clone(&self.agents), selected)
    }
}
