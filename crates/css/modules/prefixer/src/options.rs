//! Processing options.

use crate::error::PrefixerError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Which flexbox generations to emit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FlexboxMode {
    /// Every generation, including the 2009 `box-*` syntax.
    #[default]
    All,
    /// Skip the 2009 syntax.
    No2009,
    /// Never touch flexbox.
    Off,
}

/// Whether and how IE grid properties are emitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GridMode {
    #[default]
    Off,
    /// Explicit placement only.
    NoAutoplace,
    /// Also place children without explicit positions.
    Autoplace,
}

impl GridMode {
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Off)
    }

    /// Parse the values accepted by grid control comments and the
    /// `AUTOPREFIXER_GRID` variable.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "autoplace" => Some(Self::Autoplace),
            "no-autoplace" | "on" => Some(Self::NoAutoplace),
            "off" => Some(Self::Off),
            _ => None,
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum Switch {
    Flag(bool),
    Keyword(String),
}

impl Serialize for FlexboxMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => Switch::Flag(true),
            Self::Off => Switch::Flag(false),
            Self::No2009 => Switch::Keyword("no-2009".to_owned()),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FlexboxMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Switch::deserialize(deserializer)? {
            Switch::Flag(true) => Ok(Self::All),
            Switch::Flag(false) => Ok(Self::Off),
            Switch::Keyword(keyword) if keyword == "no-2009" => Ok(Self::No2009),
            Switch::Keyword(keyword) => Err(D::Error::custom(format!(
                "unknown flexbox mode `{keyword}`"
            ))),
        }
    }
}

impl Serialize for GridMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Off => Switch::Flag(false),
            Self::NoAutoplace => Switch::Keyword("no-autoplace".to_owned()),
            Self::Autoplace => Switch::Keyword("autoplace".to_owned()),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GridMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Switch::deserialize(deserializer)? {
            Switch::Flag(true) => Ok(Self::NoAutoplace),
            Switch::Flag(false) => Ok(Self::Off),
            Switch::Keyword(keyword) => match keyword.as_str() {
                "autoplace" => Ok(Self::Autoplace),
                "no-autoplace" => Ok(Self::NoAutoplace),
                _ => Err(D::Error::custom(format!(
                    "unknown grid mode `{keyword}`"
                ))),
            },
        }
    }
}

/// Everything that shapes a prefix plan and a processing run.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Browser queries; see `css_browsers::resolve`.
    pub browsers: Vec<String>,
    pub flexbox: FlexboxMode,
    pub grid: GridMode,
    /// Rewrite `@supports` conditions.
    pub supports: bool,
    /// Indent prefixed declarations so their values line up.
    pub cascade: bool,
    /// Run the add pass.
    pub add: bool,
    /// Run the remove pass.
    pub remove: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            browsers: vec!["defaults".to_owned()],
            flexbox: FlexboxMode::All,
            grid: GridMode::Off,
            supports: true,
            cascade: true,
            add: true,
            remove: true,
        }
    }
}

impl Options {
    /// Options targeting `browsers`, everything else default.
    pub fn for_browsers<Query: Into<String>>(browsers: impl IntoIterator<Item = Query>) -> Self {
        Self {
            browsers: browsers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Reject option combinations that can never do anything useful.
    ///
    /// # Errors
    /// Returns [`PrefixerError::Config`] when both passes are disabled or no
    /// browser query is given.
    pub fn validate(&self) -> Result<(), PrefixerError> {
        if !self.add && !self.remove {
            return Err(PrefixerError::Config(
                "`add` and `remove` are both disabled".to_owned(),
            ));
        }
        if self.browsers.iter().all(|query| query.trim().is_empty()) {
            return Err(PrefixerError::Config("no browser queries given".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switches_accept_flags_and_keywords() {
        let options: Options =
            serde_json::from_str(r#"{"flexbox": "no-2009", "grid": true}"#).unwrap();
        assert_eq!(options.flexbox, FlexboxMode::No2009);
        assert_eq!(options.grid, GridMode::NoAutoplace);
        assert!(options.cascade);

        let options: Options = serde_json::from_str(r#"{"grid": "autoplace"}"#).unwrap();
        assert_eq!(options.grid, GridMode::Autoplace);
        assert!(serde_json::from_str::<Options>(r#"{"grid": "sometimes"}"#).is_err());
    }

    #[test]
    fn both_passes_off_is_rejected() {
        let options = Options {
            add: false,
            remove: false,
            ..Options::default()
        };
        assert!(matches!(options.validate(), Err(PrefixerError::Config(_))));
        assert!(Options::default().validate().is_ok());
    }
}
