//! Watch-backed stores and the filtered query over them
use crate::{
    config::CacheConfig,
    error::{Error, Result},
    ready::ReadyToken,
    selector::Selector,
};
use futures::StreamExt;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    runtime::{
        reflector::{self, store::Writer, Store},
        watcher, WatchStreamExt,
    },
    Api, Client, Resource, ResourceExt,
};
use serde::de::DeserializeOwned;
use std::{fmt::Debug, hash::Hash, sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::Instant};
use tracing::{debug, info, warn};

/// A read-only, continuously updated cache of objects of kind `K`
///
/// Cloning produces a new handle to the same store. The background watch that keeps
/// the store current stops once every handle has been dropped.
pub struct CachedStore<K>
where
    K: 'static + Resource + Clone,
    K::DynamicType: Eq + Hash + Clone,
{
    kind: String,
    store: Store<K>,
    ready: ReadyToken,
    driver: Option<Arc<Driver>>,
}

impl<K> Clone for CachedStore<K>
where
    K: 'static + Resource + Clone,
    K::DynamicType: Eq + Hash + Clone,
{
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            store: self.store.clone(),
            ready: self.ready.clone(),
            driver: self.driver.clone(),
        }
    }
}

/// Aborts the watch task when the last store handle goes away
struct Driver(JoinHandle<()>);

impl Drop for Driver {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl<K> CachedStore<K>
where
    K: 'static + Resource + Clone,
    K::DynamicType: Default + Eq + Hash + Clone,
{
    /// Wraps a store that is populated by someone else
    ///
    /// `ready` must be made ready by whoever feeds the store once its initial
    /// list is complete.
    #[must_use]
    pub fn from_parts(store: Store<K>, ready: ReadyToken) -> Self {
        Self {
            kind: K::kind(&K::DynamicType::default()).into_owned(),
            store,
            ready,
            driver: None,
        }
    }

    /// Kind of the cached objects, e.g. `Pod`
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Whether the initial list has completed
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.is_ready()
    }

    /// Waits for the initial list to complete, giving up after `timeout`
    ///
    /// # Errors
    ///
    /// [`Error::CacheNotReady`] if the store did not sync in time.
    pub async fn wait_until_ready(&self, timeout: Duration) -> Result<()> {
        self.ready
            .wait_timeout(timeout)
            .await
            .map_err(|_| Error::CacheNotReady {
                kind: self.kind.clone(),
                timeout,
            })
    }

    /// Returns every cached object whose labels satisfy `selector`
    ///
    /// Waits up to `timeout` for the store to sync, then filters a single snapshot of it.
    /// The order of the result is unspecified.
    ///
    /// # Errors
    ///
    /// [`Error::CacheNotReady`] if the store did not sync in time. The store is not read in that case.
    pub async fn filtered_by(&self, selector: &Selector, timeout: Duration) -> Result<Vec<Arc<K>>> {
        self.wait_until_ready(timeout).await?;
        Ok(self
            .store
            .state()
            .into_iter()
            .filter(|obj| selector.matches(obj.labels()))
            .collect())
    }

    /// The underlying reflector store
    ///
    /// Reads through this handle do not wait for readiness.
    #[must_use]
    pub fn reader(&self) -> &Store<K> {
        &self.store
    }
}

/// Starts a watch-backed store for `K` on `api`
///
/// The store is filled by a list-then-watch loop running on the current Tokio runtime.
/// `ready` is made ready the first time a full list has been applied. When
/// [`CacheConfig::resync_period`] is non-zero the watch is restarted on that interval,
/// and the store is swapped atomically once the fresh list completes.
///
/// # Panics
///
/// Panics if called outside of a Tokio runtime.
pub fn list_store<K>(api: Api<K>, config: &CacheConfig, ready: ReadyToken) -> CachedStore<K>
where
    K: Resource + Clone + DeserializeOwned + Debug + Send + Sync + 'static,
    K::DynamicType: Default + Eq + Hash + Clone + Send + Sync,
{
    let (reader, writer) = reflector::store::<K>();
    let mut store = CachedStore::from_parts(reader, ready.clone());
    debug!(kind = %store.kind, namespace = ?config.namespace, "starting store");
    let task = tokio::spawn(run_store(
        api,
        config.watcher_config(),
        config.resync_period,
        writer,
        ready,
        store.kind.clone(),
    ));
    store.driver = Some(Arc::new(Driver(task)));
    store
}

/// Starts a watch-backed store of the pods in `namespace`
///
/// # Panics
///
/// Panics if called outside of a Tokio runtime.
pub fn pod_store(
    client: Client,
    namespace: &str,
    resync_period: Duration,
    ready: ReadyToken,
) -> CachedStore<Pod> {
    let config = CacheConfig::default()
        .namespace(namespace)
        .resync_period(resync_period);
    list_store(Api::namespaced(client, namespace), &config, ready)
}

/// Api handle for `namespace`, or for the client's default namespace
pub(crate) fn namespaced_api<K>(client: Client, namespace: Option<&str>) -> Api<K>
where
    K: Resource<Scope = k8s_openapi::NamespaceResourceScope>,
    K::DynamicType: Default,
{
    match namespace {
        Some(ns) => Api::namespaced(client, ns),
        None => Api::default_namespaced(client),
    }
}

async fn run_store<K>(
    api: Api<K>,
    watcher_config: watcher::Config,
    resync_period: Duration,
    mut writer: Writer<K>,
    ready: ReadyToken,
    kind: String,
) where
    K: Resource + Clone + DeserializeOwned + Debug + Send + Sync + 'static,
    K::DynamicType: Eq + Hash + Clone,
{
    loop {
        let mut events = watcher(api.clone(), watcher_config.clone())
            .default_backoff()
            .boxed();
        // only armed once this watcher has applied a full list
        let resync = tokio::time::sleep(resync_period);
        tokio::pin!(resync);
        let mut listed = false;

        loop {
            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(event)) => {
                        writer.apply_watcher_event(&event);
                        if matches!(event, watcher::Event::InitDone) {
                            if !ready.is_ready() {
                                info!(%kind, "store synced");
                                ready.make_ready();
                            }
                            resync.as_mut().reset(Instant::now() + resync_period);
                            listed = true;
                        }
                    }
                    Some(Err(err)) => warn!(%kind, error = %err, "watch failed, retrying"),
                    None => return,
                },
                () = &mut resync, if listed && !resync_period.is_zero() => {
                    debug!(%kind, ?resync_period, "resync period elapsed, re-listing");
                    break;
                }
            }
        }
    }
}
