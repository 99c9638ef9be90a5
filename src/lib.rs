//! CANDI backend: a single-recruiter CRM with AI-assisted candidate
//! extraction from resumes and public LinkedIn profiles.

pub mod admin_cli;
pub mod auth;
pub mod core;
pub mod crm;
pub mod database;
pub mod environment;
pub mod extraction;
pub mod storage;
pub mod utils;
pub mod web;

pub use environment::EnvironmentConfig;
pub use extraction::{CandidateFields, ExtractionError, ExtractionResult, ExtractionService};
pub use storage::ObjectStorage;
pub use web::start_web_server;
