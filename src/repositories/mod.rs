pub mod certification_repository;

pub use certification_repository::{CertificationRepository, JsonFileCertificationRepository};

#[cfg(test)]
pub use certification_repository::MockCertificationRepository;
