use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;

use crate::error::Result;
use crate::utils::{files, naming};

pub const ATTACHMENTS_DIR: &str = "Attachments";

/// Locates per-candidate folders under the candidates root. Folder names are
/// always recomputed from `(name, id)`.
#[derive(Clone)]
pub struct FolderService {
    root: Arc<PathBuf>,
}

impl FolderService {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    pub fn candidate_root(&self, name: &str, id: &str) -> PathBuf {
        self.root.join(naming::folder_name(name, id))
    }

    pub fn attachments(&self, name: &str, id: &str) -> PathBuf {
        self.candidate_root(name, id).join(ATTACHMENTS_DIR)
    }

    /// Creates the candidate folder and its attachments subfolder.
    pub async fn ensure(&self, name: &str, id: &str) -> Result<PathBuf> {
        let root = self.candidate_root(name, id);
        fs::create_dir_all(root.join(ATTACHMENTS_DIR)).await?;
        Ok(root)
    }

    /// Stored paths that no longer exist or point outside the root resolve to `None`.
    pub fn resolve(&self, stored: &str) -> Option<PathBuf> {
        files::resolve_within(&self.root, stored)
    }

    /// Name of the top-level candidate folder holding `path`, which must
    /// already be resolved inside the root.
    pub fn owner_folder(&self, path: &Path) -> Option<String> {
        let root = self.root.canonicalize().ok()?;
        let first = path.strip_prefix(&root).ok()?.components().next()?;
        Some(first.as_os_str().to_string_lossy().to_string())
    }

    /// Removes every folder belonging to `id`, whatever name it was created under.
    pub async fn remove_all(&self, id: &str) -> Result<usize> {
        let suffix = naming::folder_suffix(id);
        let mut entries = match fs::read_dir(self.root.as_ref()).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.ends_with(&suffix) && entry.file_type().await?.is_dir() {
                fs::remove_dir_all(entry.path()).await?;
                tracing::info!(candidate_id = id, folder = %name, "Removed candidate folder");
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn remove_all_matches_on_id_suffix_only() {
        let dir = tempfile::tempdir().unwrap();
        let folders = FolderService::new(dir.path().to_path_buf());
        let id = "CAND-20240101-ABC123";
        folders.ensure("Jane Doe", id).await.unwrap();
        folders.ensure("Jane D", id).await.unwrap();
        folders.ensure("Omar", "CAND-20240101-FFF000").await.unwrap();

        assert_eq!(folders.remove_all(id).await.unwrap(), 2);
        assert!(!folders.candidate_root("Jane Doe", id).exists());
        assert!(folders.candidate_root("Omar", "CAND-20240101-FFF000").exists());
    }

    #[tokio::test]
    async fn owner_folder_is_the_first_component_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let folders = FolderService::new(dir.path().to_path_buf());
        let root = folders.ensure("Jane Doe", "CAND-1").await.unwrap();
        let file = root.join(ATTACHMENTS_DIR).join("cv.pdf");
        std::fs::write(&file, b"%PDF").unwrap();

        let resolved = folders.resolve(file.to_str().unwrap()).unwrap();
        assert_eq!(folders.owner_folder(&resolved).as_deref(), Some("Jane_Doe_CAND-1"));
    }
}
