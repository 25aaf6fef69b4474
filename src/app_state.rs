use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppResult,
    repositories::{CertificationRepository, JsonFileCertificationRepository},
    services::certification_service::CertificationService,
};

#[derive(Clone)]
pub struct AppState {
    pub certification_service: Arc<CertificationService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        config.validate()?;

        let repository = Arc::new(JsonFileCertificationRepository::new(&config.data_dir));
        log::debug!("Certification banks read from '{}'", repository.path().display());

        Ok(Self::with_repository(config, repository))
    }

    pub fn with_repository(config: Config, repository: Arc<dyn CertificationRepository>) -> Self {
        Self {
            certification_service: Arc::new(CertificationService::new(repository)),
            config: Arc::new(config),
        }
    }
}
