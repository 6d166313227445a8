// In-memory project store
// Backs the CLI and the test suite; entities live in insertion-ordered vectors

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::ProjectStore;
use crate::error::{Error, Result};
use crate::models::{Collection, Endpoint, Project};

#[derive(Debug, Default)]
struct Tables {
    projects: Vec<Project>,
    collections: Vec<Collection>,
    endpoints: Vec<Endpoint>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

fn assign_id(id: &mut String) {
    if id.is_empty() {
        *id = Uuid::new_v4().to_string();
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn create_project(&self, mut project: Project) -> Result<Project> {
        let mut tables = self.tables.write().await;
        assign_id(&mut project.id);
        let now = Utc::now();
        project.created_at = now;
        project.updated_at = now;
        tables.projects.push(project.clone());
        Ok(project)
    }

    async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let tables = self.tables.read().await;
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn get_collections_by_project(&self, project_id: &str) -> Result<Vec<Collection>> {
        let tables = self.tables.read().await;
        let mut found: Vec<Collection> = tables
            .collections
            .iter()
            .filter(|c| c.project_id == project_id)
            .cloned()
            .collect();
        // stable: ties keep insertion order
        found.sort_by_key(|c| c.sort_order);
        Ok(found)
    }

    async fn create_collection(&self, mut collection: Collection) -> Result<Collection> {
        let mut tables = self.tables.write().await;
        if !tables.projects.iter().any(|p| p.id == collection.project_id) {
            return Err(Error::not_found("project", collection.project_id));
        }
        assign_id(&mut collection.id);
        let now = Utc::now();
        collection.created_at = now;
        collection.updated_at = now;
        tables.collections.push(collection.clone());
        Ok(collection)
    }

    async fn update_collection(&self, mut collection: Collection) -> Result<Collection> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .collections
            .iter_mut()
            .find(|c| c.id == collection.id)
            .ok_or_else(|| Error::not_found("collection", collection.id.clone()))?;
        collection.created_at = slot.created_at;
        collection.updated_at = Utc::now();
        *slot = collection.clone();
        Ok(collection)
    }

    async fn get_endpoints_by_collection(&self, collection_id: &str) -> Result<Vec<Endpoint>> {
        let tables = self.tables.read().await;
        let mut found: Vec<Endpoint> = tables
            .endpoints
            .iter()
            .filter(|e| e.collection_id == collection_id)
            .cloned()
            .collect();
        found.sort_by_key(|e| e.sort_order);
        Ok(found)
    }

    async fn create_endpoint(&self, mut endpoint: Endpoint) -> Result<Endpoint> {
        let mut tables = self.tables.write().await;
        if !tables.collections.iter().any(|c| c.id == endpoint.collection_id) {
            return Err(Error::not_found("collection", endpoint.collection_id));
        }
        assign_id(&mut endpoint.id);
        let now = Utc::now();
        endpoint.created_at = now;
        endpoint.updated_at = now;
        tables.endpoints.push(endpoint.clone());
        Ok(endpoint)
    }

    async fn update_endpoint(&self, mut endpoint: Endpoint) -> Result<Endpoint> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .endpoints
            .iter_mut()
            .find(|e| e.id == endpoint.id)
            .ok_or_else(|| Error::not_found("endpoint", endpoint.id.clone()))?;
        endpoint.created_at = slot.created_at;
        endpoint.updated_at = Utc::now();
        *slot = endpoint.clone();
        Ok(endpoint)
    }
}
