//! Resource manager: files under `resources/` exposed as readable artifacts.

use super::{CapabilityFamily, CapabilityManager};
use crate::subscription::{Subscribers, Subscription};
use crate::types::{Resource, ResourceContents, ResourceTemplate};
use async_trait::async_trait;
use chrono::Utc;
use mcp_file_core::{Error, FileOperation, Result};
use mcp_file_gateway::FileGateway;
use std::path::Path;
use tracing::{debug, warn};

/// URI scheme prefix of every resource.
const URI_SCHEME: &str = "file://";

/// Placeholder file kept so empty directories survive version control.
const PLACEHOLDER: &str = ".gitkeep";

/// Returns the mime type for `path` based on its extension.
///
/// # Examples
///
/// ```
/// use mcp_file_server::manager::mime_type_for;
///
/// assert_eq!(mime_type_for("resources/notes.md"), "text/markdown");
/// assert_eq!(mime_type_for("resources/data.bin"), "application/octet-stream");
/// ```
#[must_use]
pub fn mime_type_for(path: impl AsRef<Path>) -> &'static str {
    let extension = path
        .as_ref()
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());

    match extension.as_deref() {
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("ts") => "application/typescript",
        Some("md") => "text/markdown",
        _ => "application/octet-stream",
    }
}

/// Serves the files of the `resources/` directory.
///
/// Resources are materialized on every call; nothing is cached.
#[derive(Debug)]
pub struct ResourceManager {
    gateway: FileGateway,
    templates: Vec<ResourceTemplate>,
    list_changed: Subscribers<()>,
    updated: Subscribers<String>,
}

impl ResourceManager {
    /// Creates a manager over `gateway`.
    #[must_use]
    pub fn new(gateway: FileGateway) -> Self {
        let directory = Self::DIRECTORY;
        let templates = vec![
            ResourceTemplate {
                uri_template: format!("{directory}/{{name}}.txt"),
                name: "Text File".to_string(),
                description: "Create a new text file".to_string(),
                mime_type: "text/plain".to_string(),
            },
            ResourceTemplate {
                uri_template: format!("{directory}/{{name}}.json"),
                name: "JSON File".to_string(),
                description: "Create a new JSON file".to_string(),
                mime_type: "application/json".to_string(),
            },
        ];

        Self {
            gateway,
            templates,
            list_changed: Subscribers::new(),
            updated: Subscribers::new(),
        }
    }

    /// Lists every readable, non-empty file under `resources/`.
    ///
    /// Entries whose read fails or yields no content are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if the directory itself cannot be listed.
    pub async fn list_resources(&self, _cursor: Option<String>) -> Result<Vec<Resource>> {
        let directory = Self::DIRECTORY;
        let entries = self
            .gateway
            .handle_operation(FileOperation::list(directory))
            .await
            .into_result()
            .map_err(|e| {
                Error::internal_with_source(format!("Failed to list resources: {e}"), e)
            })?
            .and_then(|data| data.as_entries().map(<[String]>::to_vec))
            .unwrap_or_default();

        let mut resources = Vec::with_capacity(entries.len());
        for file in entries.into_iter().filter(|f| f != PLACEHOLDER) {
            let path = format!("{directory}/{file}");
            let response = self
                .gateway
                .handle_operation(FileOperation::read(&path))
                .await;

            let Some(content) = response.text().filter(|text| !text.is_empty()) else {
                debug!(path = %path, "skipping unreadable or empty resource");
                continue;
            };

            let now = Utc::now();
            resources.push(Resource {
                uri: format!("{URI_SCHEME}{path}"),
                mime_type: mime_type_for(&file).to_string(),
                size: content.len(),
                created_at: now,
                updated_at: now,
                description: format!("File at {path}"),
                name: file,
                path,
            });
        }

        Ok(resources)
    }

    /// Reads the resource behind `uri`.
    ///
    /// The `file://` prefix is optional. Any path the sandbox admits is
    /// readable, not only those under `resources/`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if the file cannot be read or is empty.
    pub async fn read_resource(&self, uri: &str) -> Result<Vec<ResourceContents>> {
        let path = uri.strip_prefix(URI_SCHEME).unwrap_or(uri);
        let response = self
            .gateway
            .handle_operation(FileOperation::read(path))
            .await;

        match response.into_result() {
            Ok(Some(data)) if !data.is_empty() => {
                let text = data.as_text().unwrap_or_default().to_string();
                Ok(vec![ResourceContents {
                    uri: uri.to_string(),
                    mime_type: mime_type_for(path).to_string(),
                    text,
                }])
            }
            Ok(_) => Err(Error::internal(format!("Failed to read resource {uri}"))),
            Err(e) => {
                warn!(uri, error = %e, "resource read failed");
                Err(Error::internal_with_source(
                    format!("Failed to read resource {uri}"),
                    e,
                ))
            }
        }
    }

    /// Returns the static resource templates.
    #[must_use]
    pub fn list_resource_templates(&self) -> &[ResourceTemplate] {
        &self.templates
    }

    /// Accepts a subscription to `uri`. Updates are never pushed.
    pub fn subscribe_to_resource(&self, uri: &str) {
        debug!(uri, "resource subscription accepted");
    }

    /// Registers a callback for resource-list changes.
    pub fn on_resource_list_changed<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&()) + Send + Sync + 'static,
    {
        self.list_changed.subscribe(callback)
    }

    /// Registers a callback for updates to a single resource, keyed by URI.
    pub fn on_resource_updated<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&String) + Send + Sync + 'static,
    {
        self.updated.subscribe(callback)
    }

    /// Returns the resource-list registry.
    #[must_use]
    pub const fn list_changed(&self) -> &Subscribers<()> {
        &self.list_changed
    }

    /// Returns the per-resource update registry.
    #[must_use]
    pub const fn updated(&self) -> &Subscribers<String> {
        &self.updated
    }
}

#[async_trait]
impl CapabilityManager for ResourceManager {
    type Catalog = Vec<Resource>;
    type Request = String;
    type Output = Vec<ResourceContents>;

    const FAMILY: CapabilityFamily = CapabilityFamily::Resources;

    fn gateway(&self) -> &FileGateway {
        &self.gateway
    }

    async fn list(&self, cursor: Option<String>) -> Result<Self::Catalog> {
        self.list_resources(cursor).await
    }

    async fn execute(&self, uri: String) -> Result<Self::Output> {
        self.read_resource(&uri).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_file_core::FileConfig;
    use std::fs;
    use tempfile::TempDir;

    fn manager(temp: &TempDir, extensions: &[&str]) -> ResourceManager {
        let config = FileConfig::builder()
            .allow_directory(temp.path())
            .allow_extensions(extensions.iter().copied())
            .base_dir(temp.path())
            .build();
        ResourceManager::new(FileGateway::new(&config).unwrap())
    }

    #[test]
    fn test_mime_table() {
        assert_eq!(mime_type_for("a.txt"), "text/plain");
        assert_eq!(mime_type_for("a.JSON"), "application/json");
        assert_eq!(mime_type_for("a.html"), "text/html");
        assert_eq!(mime_type_for("a.css"), "text/css");
        assert_eq!(mime_type_for("a.js"), "application/javascript");
        assert_eq!(mime_type_for("a.ts"), "application/typescript");
        assert_eq!(mime_type_for("a.md"), "text/markdown");
        assert_eq!(mime_type_for("Makefile"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_list_skips_placeholder_empty_and_denied_entries() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("resources");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a.txt"), "hello").unwrap();
        fs::write(dir.join("empty.txt"), "").unwrap();
        fs::write(dir.join("blocked.exe"), "x").unwrap();
        fs::write(dir.join(".gitkeep"), "keep").unwrap();

        let manager = manager(&temp, &["txt"]);
        let resources = manager.list_resources(None).await.unwrap();

        assert_eq!(resources.len(), 1);
        let resource = &resources[0];
        assert_eq!(resource.name, "a.txt");
        assert_eq!(resource.uri, "file://resources/a.txt");
        assert_eq!(resource.path, "resources/a.txt");
        assert_eq!(resource.mime_type, "text/plain");
        assert_eq!(resource.size, 5);
        assert_eq!(resource.description, "File at resources/a.txt");
    }

    #[tokio::test]
    async fn test_list_without_directory_is_internal_error() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp, &["txt"]);

        let err = manager.list_resources(None).await.unwrap_err();
        assert!(err.is_internal());
        assert!(err.to_string().starts_with("Failed to list resources: "));
    }

    #[tokio::test]
    async fn test_read_resource_with_and_without_scheme() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("resources")).unwrap();
        fs::write(temp.path().join("resources/data.json"), "{\"a\":1}").unwrap();
        let manager = manager(&temp, &["json"]);

        let contents = manager
            .read_resource("file://resources/data.json")
            .await
            .unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].uri, "file://resources/data.json");
        assert_eq!(contents[0].mime_type, "application/json");
        assert_eq!(contents[0].text, "{\"a\":1}");

        let bare = manager.read_resource("resources/data.json").await.unwrap();
        assert_eq!(bare[0].text, contents[0].text);
    }

    #[tokio::test]
    async fn test_read_missing_or_empty_resource_fails() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("resources")).unwrap();
        fs::write(temp.path().join("resources/empty.txt"), "").unwrap();
        let manager = manager(&temp, &["txt"]);

        for uri in ["file://resources/missing.txt", "file://resources/empty.txt"] {
            let err = manager.read_resource(uri).await.unwrap_err();
            assert!(err.is_internal());
            assert_eq!(err.to_string(), format!("Failed to read resource {uri}"));
        }
    }

    #[tokio::test]
    async fn test_templates_are_static() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp, &[]);

        let templates = manager.list_resource_templates();
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].uri_template, "resources/{name}.txt");
        assert_eq!(templates[0].mime_type, "text/plain");
        assert_eq!(templates[1].uri_template, "resources/{name}.json");
        assert_eq!(templates[1].name, "JSON File");
    }

    #[tokio::test]
    async fn test_subscriptions_register_without_firing() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp, &["txt"]);

        manager.subscribe_to_resource("file://resources/a.txt");
        let listed = manager.on_resource_list_changed(|()| {});
        let updated = manager.on_resource_updated(|_uri| {});
        assert_eq!(manager.list_changed().len(), 1);
        assert_eq!(manager.updated().len(), 1);

        listed.cancel();
        updated.cancel();
        assert!(manager.list_changed().is_empty());
        assert!(manager.updated().is_empty());
    }
}
