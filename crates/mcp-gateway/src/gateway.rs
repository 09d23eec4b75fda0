//! Execution of the five primitive file operations.

use crate::policy::SandboxPolicy;
use mcp_file_core::{
    Error, FileConfig, FileData, FileOperation, FileResponse, OperationKind, Result,
};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

/// Stateless executor of [`FileOperation`]s, parameterized by a
/// [`SandboxPolicy`].
///
/// Cloning is cheap; clones share the policy.
#[derive(Debug, Clone)]
pub struct FileGateway {
    policy: Arc<SandboxPolicy>,
}

impl FileGateway {
    /// Builds a gateway from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the sandbox policy cannot be built.
    pub fn new(config: &FileConfig) -> Result<Self> {
        Ok(Self::from_policy(SandboxPolicy::new(config)?))
    }

    /// Builds a gateway around an existing policy.
    #[must_use]
    pub fn from_policy(policy: SandboxPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    /// Returns the sandbox policy.
    #[must_use]
    pub fn policy(&self) -> &SandboxPolicy {
        &self.policy
    }

    /// Executes one operation.
    ///
    /// Never fails: every rejection and I/O error is returned as
    /// [`FileResponse::Failure`].
    pub async fn handle_operation(&self, operation: FileOperation) -> FileResponse {
        debug!(
            kind = %operation.kind(),
            path = operation.path(),
            "handling file operation"
        );

        let response = FileResponse::from(self.execute(&operation).await);
        if let Some(error) = response.error() {
            debug!(
                kind = %operation.kind(),
                path = operation.path(),
                error = %error,
                "file operation failed"
            );
        }
        response
    }

    /// Executes an operation given as untyped JSON.
    ///
    /// A missing or unrecognized `type` tag yields "Invalid operation type".
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_file_core::FileConfig;
    /// use mcp_file_gateway::FileGateway;
    /// use serde_json::json;
    ///
    /// # async fn example(gateway: FileGateway) {
    /// let response = gateway.handle_value(json!({"type": "rename", "path": "a.txt"})).await;
    /// assert_eq!(response.error().unwrap().to_string(), "Invalid operation type");
    /// # }
    /// ```
    pub async fn handle_value(&self, value: Value) -> FileResponse {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .map(str::parse::<OperationKind>);

        match kind {
            Some(Ok(kind)) => match serde_json::from_value::<FileOperation>(value) {
                Ok(operation) => self.handle_operation(operation).await,
                Err(e) => FileResponse::failure(Error::invalid_input(format!(
                    "Invalid {kind} operation: {e}"
                ))),
            },
            Some(Err(error)) => FileResponse::failure(error),
            None => FileResponse::failure(Error::invalid_input("Invalid operation type")),
        }
    }

    async fn execute(&self, operation: &FileOperation) -> Result<Option<FileData>> {
        let resolved = self.policy.check(operation.path(), operation.kind())?;
        let path = operation.path();

        match operation {
            FileOperation::Read { .. } => {
                let content = fs::read_to_string(&resolved)
                    .await
                    .map_err(|e| Error::from_io(path, e))?;
                Ok(Some(FileData::Text(content)))
            }
            FileOperation::Write { content, .. } => {
                let content = content
                    .as_deref()
                    .filter(|c| !c.is_empty())
                    .ok_or_else(|| Error::invalid_input("Content is required for write operation"))?;
                fs::write(&resolved, content)
                    .await
                    .map_err(|e| Error::from_io(path, e))?;
                Ok(None)
            }
            FileOperation::List { .. } => list_entries(&resolved, path).await.map(Some),
            FileOperation::Delete { .. } => {
                fs::remove_file(&resolved)
                    .await
                    .map_err(|e| Error::from_io(path, e))?;
                Ok(None)
            }
            FileOperation::CreateDirectory { .. } => {
                fs::create_dir_all(&resolved)
                    .await
                    .map_err(|e| Error::from_io(path, e))?;
                Ok(None)
            }
        }
    }
}

/// Collects entry names in the order the filesystem yields them.
async fn list_entries(resolved: &Path, path: &str) -> Result<FileData> {
    let mut reader = fs::read_dir(resolved)
        .await
        .map_err(|e| Error::from_io(path, e))?;

    let mut entries = Vec::new();
    while let Some(entry) = reader
        .next_entry()
        .await
        .map_err(|e| Error::from_io(path, e))?
    {
        entries.push(entry.file_name().to_string_lossy().into_owned());
    }

    Ok(FileData::Entries(entries))
}
