// YAPI open API client
// Uses reqwest for HTTP and decodes every response through the errcode envelope

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::models::{Envelope, InterfacePage, RemoteCategory, RemoteInterface, RemoteProject};
use crate::cancel::or_cancelled;
use crate::config::{SyncConfig, PAGE_SIZE, REQUEST_TIMEOUT};
use crate::error::{Error, Result};

/// Read-only view of a remote API-management system.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn get_project(&self, project_id: i64, cancel: &CancellationToken) -> Result<RemoteProject>;

    async fn get_categories(&self, project_id: i64, cancel: &CancellationToken) -> Result<Vec<RemoteCategory>>;

    async fn get_interfaces(&self, project_id: i64, cancel: &CancellationToken) -> Result<Vec<RemoteInterface>>;

    /// Succeeds iff the project can be fetched
    async fn test_connection(&self, project_id: i64, cancel: &CancellationToken) -> Result<()> {
        self.get_project(project_id, cancel).await.map(|_| ())
    }

    /// Project metadata with its categories and the number of interfaces.
    async fn overview(&self, project_id: i64, cancel: &CancellationToken) -> Result<ProjectOverview> {
        let project = self.get_project(project_id, cancel).await?;
        let categories = self.get_categories(project_id, cancel).await?;
        let interfaces = self.get_interfaces(project_id, cancel).await?;
        Ok(ProjectOverview {
            project,
            categories,
            total_interfaces: interfaces.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectOverview {
    pub project: RemoteProject,
    pub categories: Vec<RemoteCategory>,
    pub total_interfaces: usize,
}

/// HTTP client for one YAPI server, authenticated by a project token.
#[derive(Debug, Clone)]
pub struct YapiClient {
    base_url: String,
    token: String,
    client: Client,
}

/// Trim trailing slashes and make sure the URL ends in `/api`.
pub fn normalize_base_url(raw: &str) -> String {
    let mut base = raw.trim_end_matches('/').to_string();
    if !base.ends_with("/api") {
        base.push_str("/api");
    }
    base
}

impl YapiClient {
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_http_client(base_url, token, client))
    }

    pub fn with_http_client(base_url: &str, token: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            token: token.into(),
            client,
        }
    }

    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        Self::new(&config.yapi_url, config.yapi_token.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base}{path}` with the token appended, unwrap the envelope.
    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        cancel: &CancellationToken,
    ) -> Result<Option<T>> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "requesting YAPI");

        or_cancelled(cancel, async {
            let response = self
                .client
                .get(&url)
                .query(query)
                .query(&[("token", self.token.as_str())])
                .send()
                .await?;
            let status = response.status();
            let body = response.text().await?;

            let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
                Error::DecodeError(format!("{} (HTTP {}): {}", path, status.as_u16(), e))
            })?;
            if envelope.errcode != 0 {
                return Err(Error::RemoteError {
                    code: envelope.errcode,
                    message: envelope.errmsg,
                });
            }
            Ok(envelope.data)
        })
        .await
    }

    /// Primary strategy: one `list_cat` call per category. A failing
    /// category is skipped.
    async fn interfaces_by_category(&self, project_id: i64, cancel: &CancellationToken) -> Result<Vec<RemoteInterface>> {
        let categories = self.get_categories(project_id, cancel).await?;

        let mut all = Vec::new();
        for cat in &categories {
            let query = [("catid", cat.id.to_string())];
            match self.fetch::<InterfacePage>("/interface/list_cat", &query, cancel).await {
                Ok(page) => all.extend(page.unwrap_or_default().list),
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(err) => {
                    warn!(category_id = cat.id, category = %cat.name, error = %err, "skipping category");
                }
            }
        }

        if all.is_empty() {
            return Err(Error::NoInterfaces);
        }
        Ok(all)
    }

    /// Fallback strategy: page through `get_list`. Decode and application
    /// errors hand back the category strategy's outcome.
    async fn interfaces_paginated(
        &self,
        project_id: i64,
        by_category: Result<Vec<RemoteInterface>>,
        cancel: &CancellationToken,
    ) -> Result<Vec<RemoteInterface>> {
        let mut all: Vec<RemoteInterface> = Vec::new();
        let mut page = 1usize;

        loop {
            let query = [
                ("project_id", project_id.to_string()),
                ("page", page.to_string()),
                ("limit", PAGE_SIZE.to_string()),
            ];
            let data = match self.fetch::<InterfacePage>("/interface/get_list", &query, cancel).await {
                Ok(data) => data.unwrap_or_default(),
                Err(err @ (Error::DecodeError(_) | Error::RemoteError { .. })) => {
                    warn!(project_id, page, error = %err, "paginated listing failed");
                    return by_category;
                }
                Err(err) => return Err(err),
            };

            let received = data.list.len();
            all.extend(data.list);
            if received == 0 || all.len() >= data.count {
                break;
            }
            page += 1;
        }

        Ok(all)
    }
}

#[async_trait]
impl RemoteSource for YapiClient {
    async fn get_project(&self, project_id: i64, cancel: &CancellationToken) -> Result<RemoteProject> {
        let query = [("project_id", project_id.to_string())];
        self.fetch::<RemoteProject>("/project/get", &query, cancel)
            .await?
            .ok_or_else(|| Error::DecodeError("project/get returned no data".into()))
    }

    async fn get_categories(&self, project_id: i64, cancel: &CancellationToken) -> Result<Vec<RemoteCategory>> {
        let query = [("project_id", project_id.to_string())];
        let categories = self
            .fetch::<Vec<RemoteCategory>>("/interface/getCatMenu", &query, cancel)
            .await?
            .unwrap_or_default();
        debug!(project_id, count = categories.len(), "fetched categories");
        Ok(categories)
    }

    async fn get_interfaces(&self, project_id: i64, cancel: &CancellationToken) -> Result<Vec<RemoteInterface>> {
        let by_category = self.interfaces_by_category(project_id, cancel).await;
        if let Ok(list) = &by_category {
            if !list.is_empty() {
                debug!(project_id, count = list.len(), "fetched interfaces by category");
                return by_category;
            }
        }
        if matches!(by_category, Err(Error::Cancelled)) {
            return by_category;
        }

        info!(project_id, "category listing empty, falling back to paginated listing");
        self.interfaces_paginated(project_id, by_category, cancel).await
    }
}
