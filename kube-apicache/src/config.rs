//! Configuration for cached stores
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How stores are scoped, refreshed and waited on
///
/// Built with the chained setters, starting from [`CacheConfig::default`]:
///
/// ```
/// use kube_apicache::CacheConfig;
/// use std::time::Duration;
///
/// let config = CacheConfig::default()
///     .namespace("brigade")
///     .resync_period(Duration::from_secs(60))
///     .sync_timeout(Duration::from_secs(10));
/// assert_eq!(config.namespace.as_deref(), Some("brigade"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Namespace to watch
    ///
    /// `None` uses the client's default namespace.
    pub namespace: Option<String>,

    /// Interval after which the watch is restarted with a fresh full list
    ///
    /// A zero duration disables periodic re-listing.
    pub resync_period: Duration,

    /// Upper bound on how long a query waits for the initial list to complete
    pub sync_timeout: Duration,

    /// Page size for the initial list calls
    ///
    /// `None` keeps the watcher's default paging.
    pub page_size: Option<u32>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            resync_period: Duration::from_secs(5 * 60),
            sync_timeout: Duration::from_secs(60),
            page_size: None,
        }
    }
}

impl CacheConfig {
    /// Restrict the stores to a namespace
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the forced re-list interval
    #[must_use]
    pub fn resync_period(mut self, period: Duration) -> Self {
        self.resync_period = period;
        self
    }

    /// Set how long queries wait for a store to sync
    #[must_use]
    pub fn sync_timeout(mut self, timeout: Duration) -> Self {
        self.sync_timeout = timeout;
        self
    }

    /// Set the page size used for list calls
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Watcher configuration derived from this config
    pub(crate) fn watcher_config(&self) -> kube::runtime::watcher::Config {
        let config = kube::runtime::watcher::Config::default();
        match self.page_size {
            Some(page_size) => config.page_size(page_size),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: CacheConfig = serde_json::from_str(r#"{"namespace":"brigade"}"#).unwrap();
        assert_eq!(config, CacheConfig::default().namespace("brigade"));
    }

    #[test]
    fn zero_resync_is_kept() {
        let config = CacheConfig::default().resync_period(Duration::ZERO);
        assert!(config.resync_period.is_zero());
    }

    #[test]
    fn page_size_is_forwarded_to_watcher() {
        let config = CacheConfig::default().page_size(50);
        assert_eq!(config.watcher_config().page_size, Some(50));
    }
}
