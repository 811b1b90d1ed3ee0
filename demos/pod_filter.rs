//! Periodically prints the pods in a namespace that match a set of `key=value` labels
//!
//! RUST_LOG=info,kube_apicache=debug cargo run --example pod_filter -- -n brigade -l heritage=brigade -l component=build
use anyhow::{bail, Result};
use clap::Parser;
use kube::{Client, ResourceExt};
use kube_apicache::{ApiCache, CacheConfig, Error, Selector};
use std::time::Duration;
use tracing::*;

#[derive(Parser)]
struct App {
    /// Namespace to cache, defaults to the kubeconfig namespace
    #[arg(long, short)]
    namespace: Option<String>,
    /// Required label, repeatable
    #[arg(long = "selector", short = 'l', value_parser = parse_label)]
    labels: Vec<(String, String)>,
    /// Seconds between forced re-lists, 0 disables them
    #[arg(long, default_value_t = 300)]
    resync_secs: u64,
    /// Seconds a query waits for the initial list
    #[arg(long, default_value_t = 60)]
    sync_timeout_secs: u64,
    /// Seconds between queries
    #[arg(long, default_value_t = 10)]
    interval_secs: u64,
}

fn parse_label(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => bail!("expected key=value, got {raw:?}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let app = App::parse();
    let client = Client::try_default().await?;

    let mut config = CacheConfig::default()
        .resync_period(Duration::from_secs(app.resync_secs))
        .sync_timeout(Duration::from_secs(app.sync_timeout_secs));
    if let Some(ns) = app.namespace {
        config = config.namespace(ns);
    }
    let cache = ApiCache::new(client, config);
    let selector = Selector::from_iter(app.labels);
    info!(selector = %selector.to_selector_string(), "querying pods");

    loop {
        match cache.get_pods_filtered_by(&selector).await {
            Ok(pods) => {
                let names = pods.iter().map(|p| p.name_any()).collect::<Vec<_>>();
                info!("{} matching pods: {:?}", names.len(), names);
            }
            Err(err @ Error::CacheNotReady { .. }) => warn!("{err}, retrying"),
        }
        tokio::time::sleep(Duration::from_secs(app.interval_secs)).await;
    }
}
