pub mod models;
pub mod error;
pub mod config;
pub mod cancel;
pub mod remote;
pub mod convert;  // remote -> local conversion and schema inference
pub mod store;
pub mod reconciler;
pub mod docs;

// Re-export commonly used items
pub use models::*;
pub use error::{Error, Result};
pub use config::SyncConfig;
pub use remote::{RemoteSource, YapiClient};
pub use store::{MemoryStore, ProjectStore};
pub use reconciler::Reconciler;
pub use docs::{DocFormat, ProjectDocument};
