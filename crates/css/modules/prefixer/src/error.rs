use css_browsers::BrowsersError;
use thiserror::Error;

/// Errors raised while building a prefix plan.
///
/// Processing a stylesheet never fails once a plan exists; authoring problems
/// are reported as diagnostics instead.
#[derive(Debug, Error)]
pub enum PrefixerError {
    #[error(transparent)]
    Browsers(#[from] BrowsersError),
    #[error("malformed capability data: {0}")]
    Data(String),
    #[error("malformed capability JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid options: {0}")]
    Config(String),
    #[error("unknown feature `{0}`")]
    UnknownFeature(String),
    #[error("invalid handler pattern: {0}")]
    Pattern(#[from] regex::Error),
}
