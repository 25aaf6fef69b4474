use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Certification, CertificationSummary},
        dto::request::{SessionOptions, StartQuizRequest},
    },
    repositories::CertificationRepository,
};

pub struct CertificationService {
    repository: Arc<dyn CertificationRepository>,
}

impl CertificationService {
    pub fn new(repository: Arc<dyn CertificationRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<CertificationSummary>> {
        self.repository.list_certifications().await
    }

    pub async fn get_certification(&self, id: &str) -> AppResult<Certification> {
        let certification = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Certification with id '{}' not found", id)))?;

        Ok(certification)
    }

    /// Looks up the bank a start request targets and checks the request against it.
    pub async fn prepare(
        &self,
        request: StartQuizRequest,
    ) -> AppResult<(Certification, SessionOptions)> {
        let certification = self.get_certification(&request.certification_id).await?;
        let options = request.into_options(&certification)?;

        log::debug!(
            "Prepared {:?} run of '{}' with page size {}",
            options.mode,
            certification.id,
            options.page_size.get()
        );

        Ok((certification, options))
    }
}
