//! Scoped Cache - composition root
//!
//! Builds the cache services once from configuration and walks them
//! through a read-through / mutate / invalidate cycle against an
//! in-memory record source.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scoped_cache::{AggregateCache, CallerScope, Config, ScopedCache};

/// Simulated latency of the source of truth
const SOURCE_LATENCY: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Serialize)]
struct Record {
    id: i64,
    owner_id: i64,
    title: String,
}

#[derive(Debug, Clone, Serialize)]
struct Summary {
    total: usize,
    owners: usize,
}

/// Stand-in for the data-access layer that supplies loaders.
#[derive(Clone)]
struct RecordSource {
    records: Arc<RwLock<Vec<Record>>>,
}

impl RecordSource {
    fn seeded() -> Self {
        let records = (1..=6)
            .map(|id| Record {
                id,
                owner_id: id % 3 + 1,
                title: format!("record {}", id),
            })
            .collect();
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    async fn list_for(&self, scope: &CallerScope, privileged: bool) -> Result<Vec<Record>> {
        tokio::time::sleep(SOURCE_LATENCY).await;
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| privileged || Some(r.owner_id) == scope.caller_id)
            .cloned()
            .collect())
    }

    async fn find(&self, id: i64) -> Result<Record> {
        tokio::time::sleep(SOURCE_LATENCY).await;
        let records = self.records.read().await;
        records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .with_context(|| format!("record {} not found", id))
    }

    async fn rename(&self, id: i64, title: &str) -> Result<()> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .with_context(|| format!("record {} not found", id))?;
        record.title = title.to_string();
        Ok(())
    }

    async fn summary(&self) -> Result<Summary> {
        tokio::time::sleep(SOURCE_LATENCY).await;
        let records = self.records.read().await;
        let mut owners: Vec<i64> = records.iter().map(|r| r.owner_id).collect();
        owners.sort_unstable();
        owners.dedup();
        Ok(Summary {
            total: records.len(),
            owners: owners.len(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scoped_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("failed to load cache configuration")?;
    info!(
        "Configuration loaded: max_entries={}, list_ttl={:?}, item_ttl={:?}, aggregate_ttl={:?}",
        config.max_entries, config.list_ttl, config.item_ttl, config.aggregate_ttl
    );

    let records: ScopedCache<Vec<Record>, Record> = ScopedCache::from_config("records", &config);
    let dashboard: AggregateCache<Summary> = AggregateCache::from_config("dashboard", &config);
    let source = RecordSource::seeded();

    let member = CallerScope::new("member", Some(2));
    let admin = CallerScope::new(config.privileged_role.clone(), Some(1));

    for scope in [&member, &member, &admin] {
        let privileged = records.keys().is_privileged(scope);
        let list = records
            .get_list(scope, || source.list_for(scope, privileged))
            .await?;
        info!(role = ?scope.role, caller_id = ?scope.caller_id, count = list.len(), "list view");
    }

    let before = records.get_by_id(2, || source.find(2)).await?;
    source.rename(2, "renamed").await?;
    records.invalidate(Some(2));
    let after = records.get_by_id(2, || source.find(2)).await?;
    info!(before = %before.title, after = %after.title, "detail view refreshed after invalidation");

    let summary = dashboard.get(|| source.summary()).await?;
    info!(total = summary.total, owners = summary.owners, "dashboard summary");

    info!("records stats: {}", serde_json::to_string(&records.stats())?);
    info!("dashboard stats: {}", serde_json::to_string(&dashboard.stats())?);

    Ok(())
}
