//! Pipeline configuration
//!
//! One explicit value handed to the pipeline at construction. Nothing reads
//! global state after startup.

use crate::endpoints::Endpoints;
use crate::render::OutputFormat;
use crate::selector::DEFAULT_SELECTION_SIZE;
use crate::store::StoreKind;
use std::time::Duration;
use url::Url;
use userdeck_common::{Result, UserdeckError};

// ============================================================================
// Configuration Constants
// ============================================================================

/// Listing service used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://appsheettest1.azurewebsites.net/sample/";

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Base of the listing service; `list/` and `detail/<id>` hang off it
    pub base_url: Url,

    /// How many of the youngest users to select
    pub selection_size: usize,

    pub store: StoreKind,

    pub output: OutputFormat,

    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
}

impl PipelineConfig {
    /// Defaults pointed at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            selection_size: DEFAULT_SELECTION_SIZE,
            store: StoreKind::default(),
            output: OutputFormat::default(),
            request_timeout: None,
        })
    }

    pub fn with_selection_size(mut self, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(UserdeckError::config("selection size must be at least 1"));
        }
        self.selection_size = size;
        Ok(self)
    }

    pub fn with_store(mut self, store: StoreKind) -> Self {
        self.store = store;
        self
    }

    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Result<Self> {
        if timeout.is_some_and(|t| t.is_zero()) {
            return Err(UserdeckError::config("request timeout must be greater than zero"));
        }
        self.request_timeout = timeout;
        Ok(self)
    }

    pub fn endpoints(&self) -> Result<Endpoints> {
        Endpoints::new(self.base_url.clone())
            .map_err(|e| UserdeckError::invalid_url(self.base_url.as_str(), e.to_string()))
    }
}

/// Parse and check a base URL: absolute http(s), no query or fragment.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| UserdeckError::invalid_url(raw, e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UserdeckError::invalid_url(raw, "scheme must be http or https"));
    }
    if url.cannot_be_a_base() {
        return Err(UserdeckError::invalid_url(raw, "URL cannot be used as a base"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(UserdeckError::invalid_url(
            raw,
            "base URL must not carry a query or fragment",
        ));
    }

    Ok(url)
}
