use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::RwLock;

use exam_practice::{
    errors::{AppError, AppResult},
    models::domain::{Certification, CertificationSummary, Question, QuestionOption},
    repositories::{CertificationRepository, JsonFileCertificationRepository},
    services::certification_service::CertificationService,
};

struct InMemoryCertificationRepository {
    certifications: Arc<RwLock<HashMap<String, Certification>>>,
}

impl InMemoryCertificationRepository {
    fn new() -> Self {
        Self {
            certifications: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn insert(&self, certification: Certification) -> AppResult<()> {
        certification.check_integrity()?;
        let mut certifications = self.certifications.write().await;
        if certifications.contains_key(&certification.id) {
            return Err(AppError::DataIntegrityViolation(format!(
                "certification id '{}' is defined more than once",
                certification.id
            )));
        }
        certifications.insert(certification.id.clone(), certification);
        Ok(())
    }
}

#[async_trait]
impl CertificationRepository for InMemoryCertificationRepository {
    async fn list_certifications(&self) -> AppResult<Vec<CertificationSummary>> {
        let certifications = self.certifications.read().await;
        let mut items: Vec<_> = certifications.values().map(Certification::summary).collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Certification>> {
        let certifications = self.certifications.read().await;
        Ok(certifications.get(id).cloned())
    }
}

fn question(id: &str) -> Question {
    Question {
        id: id.to_string(),
        text: format!("What about {}?", id),
        options: vec![
            QuestionOption {
                id: "a".to_string(),
                text: "This".to_string(),
            },
            QuestionOption {
                id: "b".to_string(),
                text: "That".to_string(),
            },
        ],
        correct: vec!["a".to_string()],
        explanation: String::new(),
        difficulty: 5,
        category: vec![],
    }
}

fn certification(id: &str, name: &str, questions: usize) -> Certification {
    Certification {
        id: id.to_string(),
        name: name.to_string(),
        questions: (1..=questions).map(|n| question(&format!("q{}", n))).collect(),
        passing_score: 70,
        recommended_questions: None,
        recommended_time: None,
        categories: vec![],
    }
}

fn fixtures() -> Vec<Certification> {
    vec![
        certification("admin", "Administrator", 3),
        certification("pd1", "Platform Developer I", 5),
    ]
}

async fn in_memory_repository() -> InMemoryCertificationRepository {
    let repo = InMemoryCertificationRepository::new();
    for cert in fixtures() {
        repo.insert(cert).await.unwrap();
    }
    repo
}

fn json_file_repository(dir: &TempDir) -> JsonFileCertificationRepository {
    let [admin, pd1]: [Certification; 2] = fixtures().try_into().unwrap();
    let single = serde_json::json!({ "certification": admin });
    let aggregate = serde_json::json!({ "certifications": [pd1] });

    std::fs::write(dir.path().join("admin.json"), single.to_string()).unwrap();
    std::fs::write(dir.path().join("developer.json"), aggregate.to_string()).unwrap();

    JsonFileCertificationRepository::new(dir.path())
}

async fn contract_list_is_sorted_with_counts(repo: &dyn CertificationRepository) {
    let list = repo.list_certifications().await.unwrap();

    assert_eq!(
        list,
        vec![
            CertificationSummary {
                id: "admin".to_string(),
                name: "Administrator".to_string(),
                question_count: 3,
            },
            CertificationSummary {
                id: "pd1".to_string(),
                name: "Platform Developer I".to_string(),
                question_count: 5,
            },
        ]
    );
}

async fn contract_find_by_id_round_trips(repo: &dyn CertificationRepository) {
    let found = repo.find_by_id("pd1").await.unwrap().unwrap();
    let expected = certification("pd1", "Platform Developer I", 5);

    assert_eq!(found, expected);
}

async fn contract_find_missing_is_none(repo: &dyn CertificationRepository) {
    assert!(repo.find_by_id("does-not-exist").await.unwrap().is_none());
}

async fn contract_service_reports_not_found(repo: Arc<dyn CertificationRepository>) {
    let service = CertificationService::new(repo);

    let err = service.get_certification("does-not-exist").await.unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn in_memory_repository_honours_contract() {
    let repo = in_memory_repository().await;
    contract_list_is_sorted_with_counts(&repo).await;
    contract_find_by_id_round_trips(&repo).await;
    contract_find_missing_is_none(&repo).await;
    contract_service_reports_not_found(Arc::new(repo)).await;
}

#[tokio::test]
async fn json_file_repository_honours_contract() {
    let dir = TempDir::new().unwrap();
    let repo = json_file_repository(&dir);
    contract_list_is_sorted_with_counts(&repo).await;
    contract_find_by_id_round_trips(&repo).await;
    contract_find_missing_is_none(&repo).await;
    contract_service_reports_not_found(Arc::new(repo)).await;
}

#[tokio::test]
async fn in_memory_repository_rejects_inconsistent_banks() {
    let repo = InMemoryCertificationRepository::new();
    let mut broken = certification("broken", "Broken", 2);
    broken.questions[1].id = "q1".to_string();

    assert!(matches!(
        repo.insert(broken).await,
        Err(AppError::DataIntegrityViolation(_))
    ));
    assert!(repo.list_certifications().await.unwrap().is_empty());
}

#[tokio::test]
async fn json_file_repository_rejects_difficulty_out_of_range() {
    let dir = TempDir::new().unwrap();
    let mut cert = certification("hard", "Too Hard", 1);
    cert.questions[0].difficulty = 11;
    std::fs::write(
        dir.path().join("hard.json"),
        serde_json::json!({ "certification": cert }).to_string(),
    )
    .unwrap();

    let repo = JsonFileCertificationRepository::new(dir.path());
    let err = repo.find_by_id("hard").await.unwrap_err();

    assert_eq!(err.error_code(), "DATA_INTEGRITY_VIOLATION");
}
