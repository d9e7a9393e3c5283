//! The entry point: owns the bundled data and caches compiled plans.

use crate::data::CapabilityTable;
use crate::diagnostics::Diagnostic;
use crate::error::PrefixerError;
use crate::info::{self, InfoReport};
use crate::options::Options;
use crate::pass::Pass;
use crate::prefixes::Prefixes;
use crate::processor;
use css_browsers::{AgentDatabase, Browsers};
use css_syntax::Stylesheet;
use log::{debug, trace};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(32) {
    Some(capacity) => capacity,
    None => NonZeroUsize::MIN,
};

/// The result of [`Engine::process_css`].
#[derive(Debug)]
pub struct Processed {
    pub css: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Prefixes stylesheets.
///
/// Plans are keyed by the resolved browser list plus the options, so two
/// queries selecting the same browsers share one plan.
pub struct Engine {
    table: Arc<CapabilityTable>,
    agents: Arc<AgentDatabase>,
    plans: LruCache<String, Arc<Prefixes>>,
}

impl Engine {
    /// An engine over the bundled data with the default cache size.
    ///
    /// # Errors
    /// Returns an error if the bundled data is malformed.
    pub fn new() -> Result<Self, PrefixerError> {
        Self::with_capacity(DEFAULT_CAPACITY.get())
    }

    /// An engine keeping at most `capacity` plans; zero means the default.
    ///
    /// # Errors
    /// Returns an error if the bundled data is malformed.
    pub fn with_capacity(capacity: usize) -> Result<Self, PrefixerError> {
        let agents = AgentDatabase::builtin()?;
        let table = CapabilityTable::builtin(&agents)?;
        Ok(Self::with_data(agents, table, capacity))
    }

    /// An engine over caller-supplied data, such as a table loaded with
    /// [`CapabilityTable::from_json`].
    pub fn with_data(agents: Arc<AgentDatabase>, table: CapabilityTable, capacity: usize) -> Self {
        Self {
            table: Arc::new(table),
            agents,
            plans: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(DEFAULT_CAPACITY)),
        }
    }

    /// The plan for `options`, compiled on first use.
    ///
    /// # Errors
    /// Returns an error if the options are invalid, a browser query cannot be
    /// resolved or a handler cannot be built.
    pub fn plan(&mut self, options: &Options) -> Result<Arc<Prefixes>, PrefixerError> {
        options.validate()?;
        let browsers = Browsers::new(Arc::clone(&self.agents), &options.browsers)?;
        let shape = Options {
            browsers: Vec::new(),
            ..options.clone()
        };
        let key = serde_json::to_string(&(browsers.selected_names(), shape))?;
        if let Some(plan) = self.plans.get(&key) {
            trace!("plan cache hit");
            return Ok(Arc::clone(plan));
        }
        debug!("compiling plan for {}", browsers.selected_names().join(", "));
        let plan = Arc::new(Prefixes::new(Arc::clone(&self.table), browsers, options.clone())?);
        self.plans.put(key, Arc::clone(&plan));
        Ok(plan)
    }

    /// Prefix `sheet` in place.
    ///
    /// # Errors
    /// Returns an error if no plan can be built for `options`.
    pub fn process(&mut self, sheet: &mut Stylesheet, options: &Options) -> Result<Vec<Diagnostic>, PrefixerError> {
        let plan = self.plan(options)?;
        let mut pass = Pass::new(sheet, &plan);
        processor::process(&mut pass)?;
        Ok(pass.diagnostics.into_vec())
    }

    /// Parse, prefix and print `css`.
    ///
    /// # Errors
    /// Returns an error if no plan can be built for `options`.
    pub fn process_css(&mut self, css: &str, options: &Options) -> Result<Processed, PrefixerError> {
        let mut sheet = Stylesheet::parse(css);
        let diagnostics = self.process(&mut sheet, options)?;
        Ok(Processed {
            css: sheet.to_css(),
            diagnostics,
        })
    }

    /// A text summary of what `options` prefixes.
    ///
    /// # Errors
    /// Returns an error if no plan can be built for `options`.
    pub fn info(&mut self, options: &Options) -> Result<String, PrefixerError> {
        let plan = self.plan(options)?;
        Ok(info::info(&plan))
    }

    /// # Errors
    /// Returns an error if no plan can be built for `options`.
    pub fn report(&mut self, options: &Options) -> Result<InfoReport, PrefixerError> {
        let plan = self.plan(options)?;
        Ok(info::report(&plan))
    }

    pub fn cached_plans(&self) -> usize {
        self.plans.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_selections_share_a_plan() {
        let mut engine = Engine::with_capacity(4).unwrap();
        let first = engine.plan(&Options::for_browsers(["chrome 20"])).unwrap();
        let second = engine.plan(&Options::for_browsers(["Chrome 20"])).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(engine.cached_plans(), 1);
    }

    #[test]
    fn cache_is_bounded() {
        let mut engine = Engine::with_capacity(1).unwrap();
        engine.plan(&Options::for_browsers(["chrome 20"])).unwrap();
        engine.plan(&Options::for_browsers(["chrome 30"])).unwrap();
        assert_eq!(engine.cached_plans(), 1);
    }

    #[test]
    fn invalid_options_are_rejected() {
        let mut engine = Engine::new().unwrap();
        let options = Options {
            add: false,
            remove: false,
            ..Options::default()
        };
        assert!(matches!(engine.plan(&options), Err(PrefixerError::Config(_))));
    }

    #[test]
    fn css_is_prefixed() {
        let mut engine = Engine::new().unwrap();
        let processed = engine
            .process_css("a { transform: none }", &Options::for_browsers(["chrome 30"]))
            .unwrap();
        assert!(processed.css.contains("-webkit-transform: none;"));
        assert!(processed.css.ends_with(" transform: none }"));
        assert!(processed.diagnostics.is_empty());
    }
}
