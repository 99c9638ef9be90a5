// src/crm/mod.rs
//! CRM collections: candidates, projects, tasks, notes, calendar events, and
//! KPI events, each behind a repository scoped to one recruiter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod calendar;
pub mod candidates;
pub mod kpi;
pub mod notes;
pub mod projects;
pub mod tasks;

pub use calendar::CalendarRepository;
pub use candidates::{Candidate, CandidateFilter, CandidateRepository};
pub use kpi::{KpiRepository, KpiSummary};
pub use notes::NoteRepository;
pub use projects::ProjectRepository;
pub use tasks::TaskRepository;

/// Pipeline stage of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateStatus {
    Sourced,
    Messaged,
    Unsure,
    Interested,
    FollowUp,
    Interviewing,
    Hired,
    Archived,
}

impl CandidateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::Sourced => "sourced",
            CandidateStatus::Messaged => "messaged",
            CandidateStatus::Unsure => "unsure",
            CandidateStatus::Interested => "interested",
            CandidateStatus::FollowUp => "follow-up",
            CandidateStatus::Interviewing => "interviewing",
            CandidateStatus::Hired => "hired",
            CandidateStatus::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sourced" => Some(CandidateStatus::Sourced),
            "messaged" => Some(CandidateStatus::Messaged),
            "unsure" => Some(CandidateStatus::Unsure),
            "interested" => Some(CandidateStatus::Interested),
            "follow-up" => Some(CandidateStatus::FollowUp),
            "interviewing" => Some(CandidateStatus::Interviewing),
            "hired" => Some(CandidateStatus::Hired),
            "archived" => Some(CandidateStatus::Archived),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Open,
    OnHold,
    Closed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Open => "open",
            ProjectStatus::OnHold => "on-hold",
            ProjectStatus::Closed => "closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(ProjectStatus::Open),
            "on-hold" => Some(ProjectStatus::OnHold),
            "closed" => Some(ProjectStatus::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Open,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::Done => "done",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(TaskStatus::Open),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

/// Hiring project (one role being filled for one client).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub recruiter_id: i64,
    pub name: String,
    pub client_company: Option<String>,
    pub role_title: Option<String>,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub recruiter_id: i64,
    pub candidate_id: Option<String>,
    pub project_id: Option<String>,
    pub title: String,
    pub priority: String,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub recruiter_id: i64,
    pub candidate_id: String,
    pub note_type: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub recruiter_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub candidate_id: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// One activity data point for the personal KPI dashboard (call logged,
/// meeting held, candidate submitted, placement made, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiEvent {
    pub id: String,
    pub recruiter_id: i64,
    pub kind: String,
    pub candidate_id: Option<String>,
    pub project_id: Option<String>,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_status_round_trips() {
        for status in [
            CandidateStatus::Sourced,
            CandidateStatus::FollowUp,
            CandidateStatus::Hired,
        ] {
            assert_eq!(CandidateStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(CandidateStatus::parse("nonsense"), None);
    }

    #[test]
    fn test_status_serde_uses_kebab_case() {
        let json = serde_json::to_string(&CandidateStatus::FollowUp).unwrap();
        assert_eq!(json, "\"follow-up\"");
        let json = serde_json::to_string(&ProjectStatus::OnHold).unwrap();
        assert_eq!(json, "\"on-hold\"");
    }
}
