//! Label-filtered read access to watch-backed Kubernetes caches
//!
//! This crate keeps a local mirror of a namespaced resource kind (pods, secrets,
//! persistent volume claims) up to date with [`kube::runtime::watcher`], and answers
//! exact-match label queries against it.
//!
//! The watch loop, reconnects and the atomic re-list swap are all handled by
//! [`kube::runtime::reflector`]. What lives here is the configuration of those stores,
//! the readiness tracking, and the filter.
//!
//! ```no_run
//! use kube::Client;
//! use kube_apicache::{ApiCache, CacheConfig, Selector};
//! # async fn wrapper() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::try_default().await?;
//! let cache = ApiCache::new(client, CacheConfig::default().namespace("brigade"));
//!
//! let selector = Selector::from_iter([("heritage", "brigade"), ("component", "build")]);
//! for pod in cache.get_pods_filtered_by(&selector).await? {
//!     println!("{:?}", pod.metadata.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api_cache;
pub mod config;
pub mod error;
pub mod ready;
pub mod selector;
pub mod store;


pub use api_cache::ApiCache;
pub use config::CacheConfig;
pub use error::{Error, Result};
pub use ready::ReadyToken;
pub use selector::Selector;
pub use store::{list_store, pod_store, CachedStore};
