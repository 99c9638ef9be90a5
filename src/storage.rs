// src/storage.rs
//! Disk-backed object storage for uploaded source documents. Objects are
//! namespaced per recruiter and served back through the `/files` mount.

use crate::core::FsOps;
use anyhow::{Context, Result};
use async_recursion::async_recursion;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct StoredObject {
    pub key: String,
    pub public_url: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct ObjectStorage {
    root: PathBuf,
}

impl ObjectStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn recruiter_dir(&self, recruiter_id: i64) -> PathBuf {
        self.root.join(format!("recruiter_{recruiter_id}"))
    }

    /// Store raw bytes under the recruiter's namespace and return the key
    /// the API serves it back under.
    pub async fn upload(
        &self,
        recruiter_id: i64,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<StoredObject> {
        let safe_name = sanitize_object_name(file_name);
        if safe_name.is_empty() {
            anyhow::bail!("Invalid object name: {}", file_name);
        }

        let key = format!(
            "recruiter_{}/{}_{}",
            recruiter_id,
            uuid::Uuid::new_v4(),
            safe_name
        );
        let path = self.root.join(&key);
        FsOps::write_bytes_safe(&path, bytes).await?;

        info!("Stored object {} ({} bytes)", key, bytes.len());
        Ok(StoredObject {
            public_url: format!("/files/{key}"),
            size: bytes.len() as u64,
            key,
        })
    }

    pub async fn delete(&self, recruiter_id: i64, key: &str) -> Result<()> {
        let prefix = format!("recruiter_{recruiter_id}/");
        if !key.starts_with(&prefix) || key.contains("..") {
            anyhow::bail!("Object key outside recruiter namespace: {}", key);
        }
        FsOps::remove_file_if_exists(&self.root.join(key)).await
    }

    /// Recursive listing of the recruiter's stored objects as a JSON tree.
    pub async fn list_tree(&self, recruiter_id: i64) -> Result<HashMap<String, serde_json::Value>> {
        build_object_tree(&self.recruiter_dir(recruiter_id)).await
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Strip path separators and anything else that could escape the store.
fn sanitize_object_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_matches('.')
        .to_string()
}

#[async_recursion]
async fn build_object_tree(dir_path: &Path) -> Result<HashMap<String, serde_json::Value>> {
    use tokio::fs;

    let mut tree = HashMap::new();

    if !dir_path.exists() {
        return Ok(tree);
    }

    let mut entries = fs::read_dir(dir_path)
        .await
        .with_context(|| format!("Failed to read storage directory: {}", dir_path.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        let metadata = entry.metadata().await?;

        if metadata.is_dir() {
            let children = build_object_tree(&path).await?;
            tree.insert(
                name,
                serde_json::json!({
                    "type": "folder",
                    "children": children
                }),
            );
        } else {
            tree.insert(
                name,
                serde_json::json!({
                    "type": "file",
                    "size": metadata.len(),
                    "modified": metadata.modified().ok()
                }),
            );
        }
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_path_separators() {
        assert_eq!(sanitize_object_name("../../etc/passwd"), "______etc_passwd");
        assert_eq!(sanitize_object_name("jane doe cv.pdf"), "jane_doe_cv.pdf");
        assert_eq!(sanitize_object_name("  resume-v2.docx "), "resume-v2.docx");
    }

    #[test]
    fn test_sanitize_rejects_dot_only_names() {
        assert_eq!(sanitize_object_name("..."), "");
        assert_eq!(sanitize_object_name(""), "");
    }

    #[tokio::test]
    async fn test_upload_and_tree() {
        let dir = std::env::temp_dir().join(format!("candi-storage-{}", uuid::Uuid::new_v4()));
        let storage = ObjectStorage::new(dir.clone());

        let stored = storage.upload(1, "cv.pdf", b"content").await.unwrap();
        assert!(stored.key.starts_with("recruiter_1/"));
        assert!(stored.public_url.starts_with("/files/recruiter_1/"));
        assert_eq!(stored.size, 7);

        let tree = storage.list_tree(1).await.unwrap();
        assert_eq!(tree.len(), 1);

        storage.delete(1, &stored.key).await.unwrap();
        let tree = storage.list_tree(1).await.unwrap();
        assert!(tree.is_empty());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_delete_refuses_foreign_namespace() {
        let dir = std::env::temp_dir().join(format!("candi-storage-{}", uuid::Uuid::new_v4()));
        let storage = ObjectStorage::new(dir);

        assert!(storage.delete(2, "recruiter_1/some.pdf").await.is_err());
        assert!(storage
            .delete(1, "recruiter_1/../recruiter_2/x.pdf")
            .await
            .is_err());
    }
}
