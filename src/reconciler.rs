// YAPI sync reconciler
// Fetches categories and interfaces, converts them, and upserts them by name into the project store
//
// Matching rules:
//   category  -> collection: exact name within the project
//   interface -> endpoint:   exact (name, method) within the mapped collection
//
// No remote id is persisted, so a rename on the YAPI side shows up as a new
// local entity on the next sync.

use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cancel::or_cancelled;
use crate::config::SyncConfig;
use crate::convert::convert_interface;
use crate::error::{Error, Result};
use crate::models::{Collection, Endpoint, SyncStats};
use crate::remote::{RemoteCategory, RemoteInterface, RemoteSource, YapiClient};
use crate::store::ProjectStore;

pub const SYNCED_COLLECTION_DESCRIPTION: &str = "Synced from YAPI";

enum Upsert {
    Created,
    Updated,
}

pub struct Reconciler {
    store: Arc<dyn ProjectStore>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self { store }
    }

    /// Run one sync pass against the YAPI server described by `config`.
    ///
    /// Validation, the local project lookup and the remote fetch all happen
    /// before the first write; any failure there aborts with no side effects.
    /// Individual store failures afterwards only show up in `failed_items`.
    pub async fn sync(&self, config: &SyncConfig, cancel: &CancellationToken) -> Result<SyncStats> {
        config.validate()?;
        let client = YapiClient::from_config(config)?;
        self.sync_from(&client, &config.project_id, config.yapi_project_id, cancel).await
    }

    /// Same as [`Reconciler::sync`] with an already constructed remote source.
    pub async fn sync_from(
        &self,
        remote: &dyn RemoteSource,
        project_id: &str,
        remote_project_id: i64,
        cancel: &CancellationToken,
    ) -> Result<SyncStats> {
        if project_id.is_empty() {
            return Err(Error::InvalidConfig("project_id is required".into()));
        }
        let project = or_cancelled(cancel, self.store.get_project(project_id)).await?;
        if project.is_none() {
            return Err(Error::not_found("project", project_id));
        }

        info!(project_id, remote_project_id, "starting YAPI sync");
        let categories = remote.get_categories(remote_project_id, cancel).await?;
        let interfaces = remote.get_interfaces(remote_project_id, cancel).await?;
        debug!(
            categories = categories.len(),
            interfaces = interfaces.len(),
            "fetched remote definitions"
        );

        let mut stats = SyncStats::default();
        let mut category_map: HashMap<i64, String> = HashMap::new();

        for category in &categories {
            match self.upsert_collection(project_id, category, cancel).await {
                Ok((collection_id, outcome)) => {
                    match outcome {
                        Upsert::Created => stats.created_collections += 1,
                        Upsert::Updated => stats.updated_collections += 1,
                    }
                    category_map.insert(category.id, collection_id);
                }
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(err) => {
                    warn!(category_id = category.id, category = %category.name, error = %err, "collection upsert failed");
                    stats.failed_items += 1;
                }
            }
        }

        for interface in &interfaces {
            let Some(collection_id) = category_map.get(&interface.category_id) else {
                debug!(interface_id = interface.id, category_id = interface.category_id, "no collection for category, skipping");
                stats.skipped_endpoints += 1;
                continue;
            };

            match self.upsert_endpoint(collection_id, interface, cancel).await {
                Ok(Upsert::Created) => stats.created_endpoints += 1,
                Ok(Upsert::Updated) => stats.updated_endpoints += 1,
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(err) => {
                    warn!(interface_id = interface.id, title = %interface.title, error = %err, "endpoint upsert failed");
                    stats.failed_items += 1;
                }
            }
        }

        info!(project_id, %stats, "YAPI sync finished");
        Ok(stats)
    }

    async fn upsert_collection(
        &self,
        project_id: &str,
        category: &RemoteCategory,
        cancel: &CancellationToken,
    ) -> Result<(String, Upsert)> {
        // Re-read every time: an earlier category in this pass may have
        // created the collection this one should match.
        let existing = or_cancelled(cancel, self.store.get_collections_by_project(project_id)).await?;

        if let Some(mut collection) = existing.into_iter().find(|c| c.name == category.name) {
            collection.description = SYNCED_COLLECTION_DESCRIPTION.to_string();
            collection.sort_order = category.order;
            let saved = or_cancelled(cancel, self.store.update_collection(collection)).await?;
            return Ok((saved.id, Upsert::Updated));
        }

        let mut collection = Collection::new(project_id, category.name.clone());
        collection.description = SYNCED_COLLECTION_DESCRIPTION.to_string();
        collection.sort_order = category.order;
        let saved = or_cancelled(cancel, self.store.create_collection(collection)).await?;
        Ok((saved.id, Upsert::Created))
    }

    async fn upsert_endpoint(
        &self,
        collection_id: &str,
        interface: &RemoteInterface,
        cancel: &CancellationToken,
    ) -> Result<Upsert> {
        let mut converted = convert_interface(interface);
        converted.collection_id = collection_id.to_string();

        let existing = or_cancelled(cancel, self.store.get_endpoints_by_collection(collection_id)).await?;

        match existing.into_iter().find(|e| e.matches(&converted.name, &converted.method)) {
            Some(current) => {
                let merged = merge_endpoint(current, converted);
                or_cancelled(cancel, self.store.update_endpoint(merged)).await?;
                Ok(Upsert::Updated)
            }
            None => {
                or_cancelled(cancel, self.store.create_endpoint(converted)).await?;
                Ok(Upsert::Created)
            }
        }
    }
}

/// Overwrite the synced fields of `current` with `incoming`. Identity,
/// ordering and the hand-written raw body stay as they are.
fn merge_endpoint(current: Endpoint, incoming: Endpoint) -> Endpoint {
    Endpoint {
        id: current.id,
        collection_id: current.collection_id,
        body: current.body,
        sort_order: current.sort_order,
        created_at: current.created_at,
        ..incoming
    }
}
