//! Error handling in [`kube_apicache`][crate]
use std::time::Duration;
use thiserror::Error;

/// Possible errors when querying a cache
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The store did not finish its initial list within the allowed time
    ///
    /// Nothing was read from the store. The background watch keeps running,
    /// so retrying later may succeed.
    #[error("{kind} cache was not synced within {timeout:?}")]
    CacheNotReady {
        /// Kind of the cached resource
        kind: String,
        /// How long the query waited
        timeout: Duration,
    },
}

/// Convenient alias for `Result<T, Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;
