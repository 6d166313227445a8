// Project store contract
// The reconciler and the documentation generators only talk to storage through this trait

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Collection, Endpoint, Project};

pub mod memory;

pub use memory::MemoryStore;

/// Persistence for projects, collections and endpoints.
///
/// Creation assigns an id when the entity has none and returns the stored
/// entity. Updates address the entity by id and fail with `NotFound` when
/// it does not exist.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create_project(&self, project: Project) -> Result<Project>;

    async fn get_project(&self, id: &str) -> Result<Option<Project>>;

    async fn get_collections_by_project(&self, project_id: &str) -> Result<Vec<Collection>>;

    async fn create_collection(&self, collection: Collection) -> Result<Collection>;

    async fn update_collection(&self, collection: Collection) -> Result<Collection>;

    async fn get_endpoints_by_collection(&self, collection_id: &str) -> Result<Vec<Endpoint>>;

    async fn create_endpoint(&self, endpoint: Endpoint) -> Result<Endpoint>;

    async fn update_endpoint(&self, endpoint: Endpoint) -> Result<Endpoint>;
}
