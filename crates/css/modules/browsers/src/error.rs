use thiserror::Error;

/// Errors raised while loading agent data or resolving browser queries.
///
/// Every variant is a configuration problem the caller has to fix; none of
/// them are recovered from.
#[derive(Debug, Error)]
pub enum BrowsersError {
    #[error("unknown browser `{0}`")]
    UnknownBrowser(String),
    #[error("unknown browser query `{0}`")]
    UnknownQuery(String),
    #[error("usage-based browser query `{0}` is not supported without usage data")]
    UsageQuery(String),
    #[error("unknown version `{version}` of browser `{browser}`")]
    UnknownVersion { browser: String, version: String },
    #[error("malformed agents data: {0}")]
    Data(String),
    #[error("malformed agents JSON: {0}")]
    Json(#[from] serde_json::Error),
}
