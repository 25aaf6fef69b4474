pub mod answer_store;
pub mod certification_service;
pub mod difficulty_assessment;
pub mod pagination;
pub mod quiz_runtime;
pub mod scoring;
pub mod session_builder;
pub mod session_timer;
pub mod shuffle;
