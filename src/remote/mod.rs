pub mod client;
pub mod models;

pub use client::{normalize_base_url, ProjectOverview, RemoteSource, YapiClient};
pub use models::*;
