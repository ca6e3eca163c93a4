use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::decisions::derive_final;
use super::domain::{
    DecisionChoice, DecisionState, NarrativeFields, ProposalCategory, ProposalPatch, Role,
    SubmissionId, UserId,
};
use super::settings::{SimilarityMode, WorkflowSettings};
use super::text::comparison_text;

/// A stored proposal submission with its similarity snapshot and decision
/// tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub student_id: UserId,
    pub supervisor_id: UserId,
    pub category: ProposalCategory,
    pub title: String,
    pub narrative: NarrativeFields,
    /// Maximum pairwise similarity against same-category peers at the time of
    /// the last (re)computation; never maintained incrementally.
    pub similarity: f64,
    pub lecturer_decision: DecisionState,
    pub admin_decision: DecisionState,
    pub final_decision: DecisionState,
    pub created_at: DateTime<Utc>,
    pub lecturer_decision_at: Option<DateTime<Utc>>,
    pub admin_decision_at: Option<DateTime<Utc>>,
}

impl SubmissionRecord {
    /// The text this record contributes to a comparison corpus.
    pub fn comparison_text(&self, mode: SimilarityMode) -> String {
        comparison_text(&self.title, &self.narrative, mode)
    }

    /// Apply a partial update, reporting whether any of the eight comparable
    /// fields (category, title, narrative sections) actually changed.
    pub fn apply(&mut self, patch: ProposalPatch) -> bool {
        let mut changed = false;
        if let Some(category) = patch.category {
            changed |= category != self.category;
            self.category = category;
        }

        let mut apply_text = |target: &mut String, value: Option<String>| {
            if let Some(value) = value {
                changed |= value != *target;
                *target = value;
            }
        };
        apply_text(&mut self.title, patch.title);
        apply_text(&mut self.narrative.background, patch.background);
        apply_text(&mut self.narrative.aim, patch.aim);
        apply_text(&mut self.narrative.objectives, patch.objectives);
        apply_text(&mut self.narrative.methods, patch.methods);
        apply_text(&mut self.narrative.expected_results, patch.expected_results);
        apply_text(&mut self.narrative.literature_review, patch.literature_review);
        changed
    }

    pub(crate) fn record_lecturer_decision(&mut self, choice: DecisionChoice, at: DateTime<Utc>) {
        self.lecturer_decision = choice.into();
        self.lecturer_decision_at = Some(at);
        self.final_decision = derive_final(self.lecturer_decision, self.admin_decision);
    }

    /// An admin closure also closes the lecturer track.
    pub(crate) fn record_admin_decision(&mut self, choice: DecisionChoice, at: DateTime<Utc>) {
        self.admin_decision = choice.into();
        self.admin_decision_at = Some(at);
        if self.admin_decision == DecisionState::Closed {
            self.lecturer_decision = DecisionState::Closed;
            self.lecturer_decision_at = Some(at);
        }
        self.final_decision = derive_final(self.lecturer_decision, self.admin_decision);
    }

    pub fn view(&self) -> SubmissionView {
        SubmissionView {
            id: self.id.clone(),
            student_id: self.student_id,
            supervisor_id: self.supervisor_id,
            category: self.category,
            title: self.title.clone(),
            narrative: self.narrative.clone(),
            similarity: self.similarity,
            lecturer_decision: self.lecturer_decision.label(),
            admin_decision: self.admin_decision.label(),
            final_decision: self.final_decision.label(),
            created_at: self.created_at,
        }
    }
}

/// Sanitized representation of a submission for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionView {
    pub id: SubmissionId,
    pub student_id: UserId,
    pub supervisor_id: UserId,
    pub category: ProposalCategory,
    pub title: String,
    #[serde(flatten)]
    pub narrative: NarrativeFields,
    pub similarity: f64,
    pub lecturer_decision: &'static str,
    pub admin_decision: &'static str,
    pub final_decision: &'static str,
    pub created_at: DateTime<Utc>,
}

/// Storage abstraction so the service module can be exercised in isolation.
/// Covers submissions and the singleton settings record.
pub trait SubmissionRepository: Send + Sync {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError>;
    fn update(&self, record: SubmissionRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError>;
    /// Submissions of one category, optionally excluding a given id.
    fn in_category(
        &self,
        category: ProposalCategory,
        exclude: Option<&SubmissionId>,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError>;
    fn for_student(&self, student: UserId) -> Result<Vec<SubmissionRecord>, RepositoryError>;
    fn all(&self) -> Result<Vec<SubmissionRecord>, RepositoryError>;
    fn load_settings(&self) -> Result<Option<WorkflowSettings>, RepositoryError>;
    fn save_settings(&self, settings: &WorkflowSettings) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Read-only view of the user directory (accounts, roles, supervisor links).
pub trait StaffDirectory: Send + Sync {
    fn user(&self, id: UserId) -> Result<Option<UserAccount>, DirectoryError>;
}

/// Directory record for one person; `supervisors` is populated for students
/// only and the first entry is the effective supervisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub reg_number: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub supervisors: Vec<UserId>,
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("unknown user {0}")]
    UnknownUser(UserId),
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Trait describing the outbound notification hook (e.g. a mail adapter).
/// Delivery is best-effort by contract; callers never treat a send failure
/// as fatal.
pub trait NotificationSender: Send + Sync {
    fn send(&self, notification: Notification) -> Result<(), NotificationError>;
}

/// Notification payload handed to the sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
