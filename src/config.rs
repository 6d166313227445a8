// Sync configuration
// Shape matches the JSON body the sync endpoint accepts

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// Per-request timeout against the YAPI server
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Page size for the paginated interface listing fallback
pub const PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Local project receiving the collections
    #[serde(default)]
    pub project_id: String,
    /// e.g. http://yapi.example.com
    pub yapi_url: String,
    /// YAPI project token
    pub yapi_token: String,
    pub yapi_project_id: i64,
}

impl SyncConfig {
    pub fn new(
        project_id: impl Into<String>,
        yapi_url: impl Into<String>,
        yapi_token: impl Into<String>,
        yapi_project_id: i64,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            yapi_url: yapi_url.into(),
            yapi_token: yapi_token.into(),
            yapi_project_id,
        }
    }

    /// Everything a full sync needs.
    pub fn validate(&self) -> Result<()> {
        if self.project_id.is_empty() {
            return Err(Error::InvalidConfig("project_id is required".into()));
        }
        self.validate_connection()
    }

    /// Only the remote fields; enough to test a connection.
    pub fn validate_connection(&self) -> Result<()> {
        if self.yapi_url.is_empty() {
            return Err(Error::InvalidConfig("yapi_url is required".into()));
        }
        if self.yapi_token.is_empty() {
            return Err(Error::InvalidConfig("yapi_token is required".into()));
        }
        if self.yapi_project_id == 0 {
            return Err(Error::InvalidConfig("yapi_project_id is required".into()));
        }
        Ok(())
    }
}
