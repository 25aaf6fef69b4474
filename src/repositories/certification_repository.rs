use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Certification, CertificationDocument, CertificationSummary},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CertificationRepository: Send + Sync {
    async fn list_certifications(&self) -> AppResult<Vec<CertificationSummary>>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Certification>>;
}

/// Reads certification banks from a single JSON file or from every `*.json`
/// file in a directory. Everything is loaded and checked on first use.
pub struct JsonFileCertificationRepository {
    path: PathBuf,
    certifications: OnceCell<Vec<Certification>>,
}

impl JsonFileCertificationRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            certifications: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn certifications(&self) -> AppResult<&[Certification]> {
        let loaded = self
            .certifications
            .get_or_try_init(|| load_certifications(&self.path))
            .await?;
        Ok(loaded.as_slice())
    }
}

#[async_trait]
impl CertificationRepository for JsonFileCertificationRepository {
    async fn list_certifications(&self) -> AppResult<Vec<CertificationSummary>> {
        let certifications = self.certifications().await?;
        Ok(certifications.iter().map(Certification::summary).collect())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Certification>> {
        let certifications = self.certifications().await?;
        Ok(certifications.iter().find(|c| c.id == id).cloned())
    }
}

async fn json_files(path: &Path) -> AppResult<Vec<PathBuf>> {
    let metadata = tokio::fs::metadata(path).await.map_err(|e| {
        AppError::StorageError(format!("cannot read '{}': {}", path.display(), e))
    })?;

    if metadata.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(path).await?;
    while let Some(entry) = entries.next_entry().await? {
        let file = entry.path();
        if file.extension().is_some_and(|ext| ext == "json") {
            files.push(file);
        }
    }
    files.sort();
    Ok(files)
}

async fn parse_document(file: &Path) -> AppResult<Vec<Certification>> {
    let raw = tokio::fs::read_to_string(file).await.map_err(|e| {
        AppError::StorageError(format!("cannot read '{}': {}", file.display(), e))
    })?;

    let document: CertificationDocument = serde_json::from_str(&raw).map_err(|e| {
        match AppError::from(e) {
            AppError::DataIntegrityViolation(msg) => {
                AppError::DataIntegrityViolation(format!("{}: {}", file.display(), msg))
            }
            other => other,
        }
    })?;

    Ok(document.into_certifications())
}

async fn load_certifications(path: &Path) -> AppResult<Vec<Certification>> {
    let files = json_files(path).await?;
    if files.is_empty() {
        log::warn!("No certification files found in '{}'", path.display());
    }

    let mut certifications: Vec<Certification> = Vec::new();
    let mut seen = HashSet::new();

    for file in files {
        let batch = parse_document(&file).await?;
        log::debug!(
            "Loaded {} certification(s) from '{}'",
            batch.len(),
            file.display()
        );

        for certification in batch {
            certification.check_integrity()?;
            if !seen.insert(certification.id.clone()) {
                return Err(AppError::DataIntegrityViolation(format!(
                    "certification id '{}' is defined more than once ({})",
                    certification.id,
                    file.display()
                )));
            }
            certifications.push(certification);
        }
    }

    log::info!(
        "Loaded {} certification(s) from '{}'",
        certifications.len(),
        path.display()
    );
    Ok(certifications)
}
