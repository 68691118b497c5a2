//! Demo resources.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use hellomcp_server::ResourceHandler;
use hellomcp_types::{McpError, McpResult, Resource, ResourceResult};
use serde::Serialize;

use crate::tools::{Availability, LanguageModel};

/// URI of the knowledge base resource.
pub const KNOWLEDGE_BASE_URI: &str = "resource://knowledge-base/articles";

/// URI of the system status resource.
pub const SYSTEM_STATUS_URI: &str = "resource://system/status";

const KNOWLEDGE_BASE: &str = "# Knowledge Base\n\nThis is the content of the knowledge base...";

/// Support articles and documentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnowledgeBase;

impl KnowledgeBase {
    /// Descriptor advertised in `resources/list`.
    pub fn descriptor() -> Resource {
        Resource::new("Knowledge Base Articles", KNOWLEDGE_BASE_URI)
            .with_description("Collection of support articles and documentation")
            .with_mime_type("text/markdown")
    }
}

#[async_trait]
impl ResourceHandler for KnowledgeBase {
    async fn read(&self, uri: &str) -> McpResult<ResourceResult> {
        Ok(ResourceResult::with_mime_type(uri, KNOWLEDGE_BASE, "text/markdown"))
    }
}

/// Snapshot served by [`SystemStatus`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    /// Operating system and architecture
    pub os_version: String,
    /// Whether the language model answered its availability probe
    pub model_available: bool,
    /// When the snapshot was taken (RFC 3339)
    pub last_updated: String,
}

/// Current operational status.
pub struct SystemStatus {
    model: Arc<dyn LanguageModel>,
}

impl SystemStatus {
    /// Status resource probing `model`.
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Descriptor advertised in `resources/list`.
    pub fn descriptor() -> Resource {
        Resource::new("System Status", SYSTEM_STATUS_URI)
            .with_description("Current system operational status")
            .with_mime_type("application/json")
    }

    /// Take a snapshot now.
    pub fn report(&self) -> StatusReport {
        StatusReport {
            os_version: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
            model_available: self.model.availability() == Availability::Available,
            last_updated: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

#[async_trait]
impl ResourceHandler for SystemStatus {
    async fn read(&self, uri: &str) -> McpResult<ResourceResult> {
        let body = serde_json::to_string_pretty(&self.report())
            .map_err(|e| McpError::internal(format!("Failed to encode status: {e}")))?;
        Ok(ResourceResult::with_mime_type(uri, body, "application/json"))
    }
}

impl std::fmt::Debug for SystemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemStatus").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::NoModel;

    #[tokio::test]
    async fn test_knowledge_base_content() {
        let result = KnowledgeBase.read(KNOWLEDGE_BASE_URI).await.unwrap();
        assert!(result.first_text().unwrap().starts_with("# Knowledge Base"));
        assert_eq!(result.contents[0].uri, KNOWLEDGE_BASE_URI);
    }

    #[tokio::test]
    async fn test_status_is_json() {
        let status = SystemStatus::new(Arc::new(NoModel));
        let result = status.read(SYSTEM_STATUS_URI).await.unwrap();
        assert_eq!(result.contents[0].mime_type, "application/json");

        let body: serde_json::Value =
            serde_json::from_str(result.first_text().unwrap()).unwrap();
        assert_eq!(body["modelAvailable"], false);
        assert!(body["osVersion"].as_str().unwrap().contains(std::env::consts::OS));
        assert!(chrono::DateTime::parse_from_rfc3339(body["lastUpdated"].as_str().unwrap()).is_ok());
    }
}
