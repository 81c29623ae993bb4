use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use axum::extract::Multipart;
use bytes::Bytes;
use tokio::fs;

use crate::error::{Error, Result};

/// A file part taken from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub async fn save_into(&self, dir: &Path) -> Result<PathBuf> {
        save_upload(dir, &self.filename, &self.data).await
    }
}

/// Every part of a multipart request, split into text values and file parts.
/// File inputs submitted without a file are dropped.
#[derive(Debug, Default)]
pub struct FormData {
    pub texts: HashMap<String, String>,
    pub files: HashMap<String, UploadedFile>,
}

impl FormData {
    pub async fn collect(mut multipart: Multipart) -> Result<Self> {
        let mut form = FormData::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let data = field.bytes().await?;
                    if !filename.trim().is_empty() && !data.is_empty() {
                        form.files.insert(name, UploadedFile { filename, data });
                    }
                }
                None => {
                    let value = field.text().await?;
                    form.texts.insert(name, value);
                }
            }
        }
        Ok(form)
    }

    pub fn text(&self, name: &str) -> &str {
        self.texts.get(name).map(|v| v.trim()).unwrap_or_default()
    }
}

pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "txt", "rtf", "jpg", "jpeg", "png", "webp", "xlsx", "xls", "csv",
];

/// Drops any directory part and keeps ASCII alphanumerics, `.`, `-` and `_`.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .trim()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "upload.bin".to_string()
    } else {
        cleaned
    }
}

pub fn extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

pub fn check_upload(filename: &str, data: &[u8]) -> Result<()> {
    let ext = extension(filename);
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(Error::BadRequest(format!("File type .{} is not allowed", ext)));
    }
    if ext == "pdf" && !data.starts_with(b"%PDF") {
        return Err(Error::BadRequest("Invalid PDF file content".into()));
    }
    if (ext == "jpg" || ext == "jpeg") && !data.starts_with(&[0xFF, 0xD8]) {
        return Err(Error::BadRequest("Invalid JPEG file content".into()));
    }
    if ext == "png" && !data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Err(Error::BadRequest("Invalid PNG file content".into()));
    }
    Ok(())
}

/// Validates and stores an upload under `dir`, returning the written path.
/// An existing file of the same name is replaced.
pub async fn save_upload(dir: &Path, filename: &str, data: &[u8]) -> Result<PathBuf> {
    let safe_name = sanitize_filename(filename);
    check_upload(&safe_name, data)?;

    fs::create_dir_all(dir).await?;
    let path = dir.join(&safe_name);
    fs::write(&path, data).await.map_err(|e| {
        tracing::error!(path = %path.display(), "Failed to write upload: {}", e);
        Error::Internal(format!("Failed to save file: {}", e))
    })?;
    tracing::info!(path = %path.display(), bytes = data.len(), "Stored upload");
    Ok(path)
}

/// Lexical normalisation without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolves a stored path and returns it only when it points at an existing
/// file inside `root`.
pub fn resolve_within(root: &Path, stored: &str) -> Option<PathBuf> {
    let stored = stored.trim();
    if stored.is_empty() {
        return None;
    }
    let candidate = PathBuf::from(stored);
    let candidate = if candidate.is_absolute() {
        candidate
    } else if candidate.starts_with(root) {
        candidate
    } else {
        root.join(candidate)
    };

    let root_abs = absolute(root)?;
    let target = absolute(&candidate)?;
    if target.starts_with(&root_abs) && target.is_file() {
        Some(target)
    } else {
        None
    }
}

fn absolute(path: &Path) -> Option<PathBuf> {
    if let Ok(canonical) = path.canonicalize() {
        return Some(canonical);
    }
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(path)
    };
    Some(normalize(&joined))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_directories_and_odd_characters() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\docs\\My CV (final).pdf"), "My_CV_final.pdf");
        assert_eq!(sanitize_filename("..."), "upload.bin");
        assert_eq!(sanitize_filename(""), "upload.bin");
    }

    #[test]
    fn magic_bytes_are_checked() {
        assert!(check_upload("cv.pdf", b"%PDF-1.7").is_ok());
        assert!(check_upload("cv.pdf", b"hello").is_err());
        assert!(check_upload("photo.png", &[0x89, 0x50, 0x4E, 0x47, 0x0D]).is_ok());
        assert!(check_upload("script.sh", b"#!/bin/sh").is_err());
        assert!(check_upload("notes.txt", b"anything").is_ok());
    }

    #[test]
    fn resolve_rejects_paths_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("Candidates");
        std::fs::create_dir_all(root.join("Jane_CAND-1")).unwrap();
        let inside = root.join("Jane_CAND-1").join("cv.pdf");
        std::fs::write(&inside, b"%PDF").unwrap();
        let outside = dir.path().join("secret.txt");
        std::fs::write(&outside, b"x").unwrap();

        assert!(resolve_within(&root, inside.to_str().unwrap()).is_some());
        assert!(resolve_within(&root, outside.to_str().unwrap()).is_none());
        let escaped = root.join("..").join("secret.txt");
        assert!(resolve_within(&root, escaped.to_str().unwrap()).is_none());
        assert!(resolve_within(&root, "").is_none());
        assert!(resolve_within(&root, root.join("missing.pdf").to_str().unwrap()).is_none());
    }
}
