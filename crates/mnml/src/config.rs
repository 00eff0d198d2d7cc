//! Page configuration

use serde::{Deserialize, Serialize};

/// Settings for a [`Page`](crate::Page)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Document URL. `Page::params(None)` parses its query string.
    pub url: String,
    /// Priority given to lifecycle callbacks scheduled without one
    pub default_priority: i32,
    /// Bound on memoized query strings; `None` keeps every distinct input
    /// for the life of the page, `Some(0)` disables memoization
    pub params_cache_limit: Option<usize>,
    /// Build an html/head/body skeleton for the initial document
    pub skeleton: bool,
}

impl PageConfig {
    pub const DEFAULT_PRIORITY: i32 = 10;

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_default_priority(mut self, priority: i32) -> Self {
        self.default_priority = priority;
        self
    }

    pub fn with_params_cache_limit(mut self, limit: usize) -> Self {
        self.params_cache_limit = Some(limit);
        self
    }

    pub fn without_skeleton(mut self) -> Self {
        self.skeleton = false;
        self
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            default_priority: Self::DEFAULT_PRIORITY,
            params_cache_limit: None,
            skeleton: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PageConfig::default();
        assert_eq!(config.url, "about:blank");
        assert_eq!(config.default_priority, 10);
        assert_eq!(config.params_cache_limit, None);
        assert!(config.skeleton);
    }

    #[test]
    fn test_partial_deserialize_fills_defaults() {
        let config: PageConfig =
            serde_json::from_str(r#"{ "url": "https://example.com/?a=1", "params_cache_limit": 8 }"#)
                .unwrap();
        assert_eq!(config.url, "https://example.com/?a=1");
        assert_eq!(config.params_cache_limit, Some(8));
        assert_eq!(config.default_priority, PageConfig::DEFAULT_PRIORITY);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<PageConfig, _> = serde_json::from_str(r#"{ "urll": "x" }"#);
        assert!(result.is_err());
    }
}
