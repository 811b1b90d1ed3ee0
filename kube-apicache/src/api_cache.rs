//! A namespace's worth of cached stores behind one handle
use crate::{
    config::CacheConfig,
    error::Result,
    ready::ReadyToken,
    selector::Selector,
    store::{list_store, namespaced_api, CachedStore},
};
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Pod, Secret};
use kube::Client;
use std::{sync::Arc, time::Duration};

/// Cached pods, secrets and persistent volume claims of a single namespace
///
/// Each kind is backed by its own watch and becomes ready independently; a query
/// only waits for the store it reads. Clones share the same stores.
#[derive(Clone)]
pub struct ApiCache {
    pods: CachedStore<Pod>,
    secrets: CachedStore<Secret>,
    persistent_volume_claims: CachedStore<PersistentVolumeClaim>,
    sync_timeout: Duration,
}

impl ApiCache {
    /// Starts watching pods, secrets and persistent volume claims
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn new(client: Client, config: CacheConfig) -> Self {
        let namespace = config.namespace.as_deref();
        Self {
            pods: list_store(namespaced_api(client.clone(), namespace), &config, ReadyToken::new()),
            secrets: list_store(namespaced_api(client.clone(), namespace), &config, ReadyToken::new()),
            persistent_volume_claims: list_store(namespaced_api(client, namespace), &config, ReadyToken::new()),
            sync_timeout: config.sync_timeout,
        }
    }

    /// Assembles a cache from stores that are fed elsewhere
    #[must_use]
    pub fn from_stores(
        pods: CachedStore<Pod>,
        secrets: CachedStore<Secret>,
        persistent_volume_claims: CachedStore<PersistentVolumeClaim>,
        sync_timeout: Duration,
    ) -> Self {
        Self {
            pods,
            secrets,
            persistent_volume_claims,
            sync_timeout,
        }
    }

    /// Waits until every store has completed its initial list
    ///
    /// # Errors
    ///
    /// [`Error::CacheNotReady`](crate::Error::CacheNotReady) naming the first store found not synced.
    pub async fn wait_until_synced(&self, timeout: Duration) -> Result<()> {
        futures::try_join!(
            self.pods.wait_until_ready(timeout),
            self.secrets.wait_until_ready(timeout),
            self.persistent_volume_claims.wait_until_ready(timeout),
        )?;
        Ok(())
    }

    /// All pods whose labels contain every pair in `selector`
    ///
    /// e.g. the build pods of a project:
    ///
    /// ```no_run
    /// # use kube_apicache::{ApiCache, Selector};
    /// # async fn wrapper(cache: ApiCache) -> kube_apicache::Result<()> {
    /// let selector = Selector::from_iter([
    ///     ("heritage", "brigade"),
    ///     ("component", "build"),
    ///     ("project", "brigade-830c16d4aaf6f5490937ad719afd8490a5bcbef064d397411043ac"),
    /// ]);
    /// let builds = cache.get_pods_filtered_by(&selector).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::CacheNotReady`](crate::Error::CacheNotReady) if the pod store did not sync
    /// within the configured timeout.
    pub async fn get_pods_filtered_by(&self, selector: &Selector) -> Result<Vec<Arc<Pod>>> {
        self.pods.filtered_by(selector, self.sync_timeout).await
    }

    /// All secrets whose labels contain every pair in `selector`
    ///
    /// # Errors
    ///
    /// [`Error::CacheNotReady`](crate::Error::CacheNotReady) if the secret store did not sync
    /// within the configured timeout.
    pub async fn get_secrets_filtered_by(&self, selector: &Selector) -> Result<Vec<Arc<Secret>>> {
        self.secrets.filtered_by(selector, self.sync_timeout).await
    }

    /// All persistent volume claims whose labels contain every pair in `selector`
    ///
    /// # Errors
    ///
    /// [`Error::CacheNotReady`](crate::Error::CacheNotReady) if the claim store did not sync
    /// within the configured timeout.
    pub async fn get_persistent_volume_claims_filtered_by(
        &self,
        selector: &Selector,
    ) -> Result<Vec<Arc<PersistentVolumeClaim>>> {
        self.persistent_volume_claims
            .filtered_by(selector, self.sync_timeout)
            .await
    }

    /// The pod store
    #[must_use]
    pub fn pods(&self) -> &CachedStore<Pod> {
        &self.pods
    }

    /// The secret store
    #[must_use]
    pub fn secrets(&self) -> &CachedStore<Secret> {
        &self.secrets
    }

    /// The persistent volume claim store
    #[must_use]
    pub fn persistent_volume_claims(&self) -> &CachedStore<PersistentVolumeClaim> {
        &self.persistent_volume_claims
    }
}
