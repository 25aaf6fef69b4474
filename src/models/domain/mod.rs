pub mod certification;
pub mod question;
pub mod session;
pub use certification::{Certification, CertificationDocument, CertificationSummary};
pub use question::{DifficultyBand, Question, QuestionOption};
pub use session::{Session, SessionMode};
