// src/web/types.rs

use crate::crm::kpi::KpiSummary;
use crate::crm::{
    CalendarEvent, Candidate, CandidateStatus, KpiEvent, Note, Project, ProjectStatus, Task,
    TaskStatus,
};
use crate::extraction::CandidateFields;
use rocket::form::FromForm;
use rocket::fs::TempFile;
use rocket::http::ContentType;
use rocket::response::{self, Responder};
use rocket::serde::{Deserialize, Serialize};
use rocket::{Request, Response};

/// CSV download with a suggested file name.
pub struct CsvResponse {
    pub data: String,
    pub filename: String,
}

impl<'r> Responder<'r, 'static> for CsvResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::CSV)
            .raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            )
            .sized_body(self.data.len(), std::io::Cursor::new(self.data))
            .ok()
    }
}

#[derive(FromForm)]
pub struct ResumeUploadForm<'f> {
    pub file: TempFile<'f>,
    pub file_name: Option<String>,
    pub project_id: Option<String>,
}

#[derive(FromForm)]
pub struct FileUploadForm<'f> {
    pub file: TempFile<'f>,
    pub file_name: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct UploadData {
    pub key: String,
    pub public_url: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct LinkedinImportRequest {
    pub url: String,
    pub project_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct CreateCandidateRequest {
    #[serde(flatten)]
    pub fields: CandidateFields,
    pub status: Option<CandidateStatus>,
    pub project_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct UpdateCandidateRequest {
    pub id: String,
    pub fields: Option<CandidateFields>,
    pub status: Option<CandidateStatus>,
    pub project_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct DeleteRequest {
    pub id: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct EnhanceCandidateRequest {
    pub id: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct CreateProjectRequest {
    pub name: String,
    pub client_company: Option<String>,
    pub role_title: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct UpdateProjectRequest {
    pub id: String,
    pub name: Option<String>,
    pub client_company: Option<String>,
    pub role_title: Option<String>,
    pub status: Option<ProjectStatus>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct CreateTaskRequest {
    pub title: String,
    pub priority: Option<String>,
    pub candidate_id: Option<String>,
    pub project_id: Option<String>,
    pub due_date: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct TaskStatusRequest {
    pub id: String,
    pub status: TaskStatus,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct CreateNoteRequest {
    pub candidate_id: String,
    pub note_type: Option<String>,
    pub body: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub candidate_id: Option<String>,
    pub starts_at: String,
    pub ends_at: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct RecordKpiRequest {
    pub kind: String,
    pub candidate_id: Option<String>,
    pub project_id: Option<String>,
    pub notes: Option<String>,
    pub occurred_at: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct UserInfo {
    pub uid: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub recruiter_id: i64,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct AuthResponse {
    pub success: bool,
    pub user: Option<UserInfo>,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct KpiReport {
    pub events: Vec<KpiEvent>,
    pub summary: Vec<KpiSummary>,
}

pub type CandidateData = Candidate;
pub type ProjectData = Project;
pub type TaskData = Task;
pub type NoteData = Note;
pub type EventData = CalendarEvent;

// Standard response envelope shared by all endpoints.

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_actions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    File,
    Data,
    Action,
    Error,
}

// Request envelope with conversation_id support
#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardRequest<T> {
    #[serde(flatten)]
    pub data: T,
    pub conversation_id: Option<String>,
}

pub trait WithConversationId {
    fn conversation_id(&self) -> Option<String>;
}

impl<T> WithConversationId for StandardRequest<T> {
    fn conversation_id(&self) -> Option<String> {
        self.conversation_id.clone()
    }
}

impl TextResponse {
    pub fn success(message: String, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
            conversation_id,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
            conversation_id,
        }
    }
}

impl ActionResponse {
    pub fn success(message: String, action: String, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message,
            action,
            next_actions: None,
            conversation_id,
        }
    }

    pub fn with_next_actions(mut self, next_actions: Vec<String>) -> Self {
        self.next_actions = Some(next_actions);
        self
    }
}

impl StandardErrorResponse {
    pub fn new(
        error: String,
        error_code: String,
        suggestions: Vec<String>,
        conversation_id: Option<String>,
    ) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
            conversation_id,
        }
    }

    /// Map a failed extraction result onto the standard error envelope.
    pub fn from_failed_extraction(
        result: &crate::extraction::ExtractionResult,
        conversation_id: Option<String>,
    ) -> Self {
        Self::new(
            result
                .error
                .clone()
                .unwrap_or_else(|| "Extraction failed".to_string()),
            result
                .error_code
                .clone()
                .unwrap_or_else(|| "EXTRACTION_FAILED".to_string()),
            result.suggestions.clone().unwrap_or_default(),
            conversation_id,
        )
    }
}
