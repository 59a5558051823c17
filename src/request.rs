//! Acquisition request normalization
//!
//! Turns raw action inputs into a concrete version and registry.

/// Version sentinel meaning "whatever the registry tags as latest"
pub const LATEST: &str = "latest";

/// Registry used when none is given
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org/";

/// A normalized request to acquire the tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionRequest {
    version: String,
    registry: String,
    cache_binary: bool,
    cache_store: bool,
}

impl AcquisitionRequest {
    /// Build a request, replacing absent or blank inputs with defaults
    pub fn new(
        version: Option<&str>,
        registry: Option<&str>,
        cache_binary: bool,
        cache_store: bool,
    ) -> Self {
        Self {
            version: non_blank(version).unwrap_or(LATEST).to_string(),
            registry: non_blank(registry).unwrap_or(DEFAULT_REGISTRY).to_string(),
            cache_binary,
            cache_store,
        }
    }

    /// Requested version, `latest` if none was given
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Registry URL exactly as typed
    pub fn registry(&self) -> &str {
        &self.registry
    }

    /// Whether the binary cache was asked for
    pub fn cache_binary(&self) -> bool {
        self.cache_binary
    }

    /// Whether the store cache was asked for
    pub fn cache_store(&self) -> bool {
        self.cache_store
    }

    /// Whether a specific version was requested
    ///
    /// Anything mentioning `latest` (any case) floats, so a binary cached
    /// under it would go stale.
    pub fn is_pinned(&self) -> bool {
        !self.version.to_ascii_lowercase().contains(LATEST)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
