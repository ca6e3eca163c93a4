use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::access::{self, AccessDenied, Actor, SubmissionAction};
use super::decisions::{self, AutoDecideSummary};
use super::domain::{
    DecisionChoice, DecisionState, ProposalCategory, ProposalDraft, ProposalPatch, Role,
    SubmissionId, UserId,
};
use super::render::{self, RenderError};
use super::repository::{
    DirectoryError, Notification, NotificationSender, RepositoryError, StaffDirectory,
    SubmissionRecord, SubmissionRepository, UserAccount,
};
use super::settings::{SimilarityMode, WorkflowSettings};
use super::similarity::similarity_percent;
use super::text::comparison_text;

/// Submissions scoring at or above this are flagged to the supervisor.
pub const HIGH_SIMILARITY_THRESHOLD: f64 = 70.0;

/// Service composing the directory, repository, similarity scorer, and
/// notification hook into the proposal workflows.
pub struct ProposalService<R, D, N> {
    repository: Arc<R>,
    directory: Arc<D>,
    notifier: Arc<N>,
}

static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_submission_id() -> SubmissionId {
    let id = SUBMISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SubmissionId(format!("sub-{id:06}"))
}

impl<R, D, N> ProposalService<R, D, N>
where
    R: SubmissionRepository + 'static,
    D: StaffDirectory + 'static,
    N: NotificationSender + 'static,
{
    pub fn new(repository: Arc<R>, directory: Arc<D>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            directory,
            notifier,
        }
    }

    /// Intake a new proposal: validate, score against same-category peers,
    /// persist, and notify student and supervisor.
    pub fn submit(&self, draft: ProposalDraft) -> Result<SubmissionRecord, ProposalServiceError> {
        if draft.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }

        let student = self
            .directory
            .user(draft.student_id)?
            .filter(|account| account.role == Role::Student)
            .ok_or(DirectoryError::UnknownUser(draft.student_id))?;

        let supervisor_id = *student
            .supervisors
            .first()
            .ok_or(ValidationError::MissingSupervisor)?;
        let supervisor = self
            .directory
            .user(supervisor_id)?
            .ok_or(ValidationError::MissingSupervisor)?;

        let settings = self.effective_settings()?;
        if !settings.allow_multiple_submissions {
            let held = self.repository.for_student(student.id)?;
            if held.iter().any(|record| record.category == draft.category) {
                return Err(ValidationError::DuplicateCategory(draft.category).into());
            }
        }

        let mode = settings.mode_for(draft.category);
        let similarity = self.score(
            &comparison_text(&draft.title, &draft.narrative, mode),
            draft.category,
            mode,
            None,
        )?;

        let record = SubmissionRecord {
            id: next_submission_id(),
            student_id: student.id,
            supervisor_id: supervisor.id,
            category: draft.category,
            title: draft.title,
            narrative: draft.narrative,
            similarity,
            lecturer_decision: DecisionState::Pending,
            admin_decision: DecisionState::Pending,
            final_decision: DecisionState::Pending,
            created_at: Utc::now(),
            lecturer_decision_at: None,
            admin_decision_at: None,
        };
        let stored = self.repository.insert(record)?;

        self.dispatch(receipt_notification(&student, &stored));
        self.dispatch(supervisor_alert(&student, &supervisor, &stored));

        Ok(stored)
    }

    /// Apply a partial update and recompute the similarity snapshot when any
    /// comparable field changed, this time with the submission itself
    /// excluded from the corpus.
    pub fn update(
        &self,
        actor_id: UserId,
        id: &SubmissionId,
        patch: ProposalPatch,
    ) -> Result<SubmissionRecord, ProposalServiceError> {
        let actor = self.actor(actor_id)?;
        let mut record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        access::authorize(actor, SubmissionAction::Update, &record)?;

        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(ValidationError::EmptyTitle.into());
            }
        }

        let settings = self.effective_settings()?;
        if let Some(category) = patch.category {
            if category != record.category && !settings.allow_multiple_submissions {
                let held = self.repository.for_student(record.student_id)?;
                if held
                    .iter()
                    .any(|other| other.id != record.id && other.category == category)
                {
                    return Err(ValidationError::DuplicateCategory(category).into());
                }
            }
        }

        if record.apply(patch) {
            let mode = settings.mode_for(record.category);
            record.similarity = self.score(
                &record.comparison_text(mode),
                record.category,
                mode,
                Some(&record.id),
            )?;
        }

        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Record a decision on the actor's own track: admins write the admin
    /// track, lecturers the lecturer track.
    pub fn decide(
        &self,
        actor_id: UserId,
        id: &SubmissionId,
        choice: DecisionChoice,
    ) -> Result<SubmissionRecord, ProposalServiceError> {
        let actor = self.actor(actor_id)?;
        let mut record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        access::authorize(actor, SubmissionAction::Decide, &record)?;

        let now = Utc::now();
        if actor.role == Role::Admin {
            record.record_admin_decision(choice, now);
        } else {
            record.record_lecturer_decision(choice, now);
        }

        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Idempotent bulk sweep over submissions the lecturer track has not
    /// ruled on: approve strictly below the threshold, reject at or above.
    /// No notifications, no recomputation.
    pub fn auto_decide(
        &self,
        actor_id: UserId,
        threshold: f64,
    ) -> Result<AutoDecideSummary, ProposalServiceError> {
        let actor = self.actor(actor_id)?;
        access::require_admin(actor)?;
        if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
            return Err(ValidationError::InvalidThreshold(threshold).into());
        }

        let mut summary = AutoDecideSummary::default();
        for mut record in self.repository.all()? {
            if decisions::settled_by_lecturer(record.lecturer_decision) {
                summary.skipped += 1;
                continue;
            }
            let choice = decisions::threshold_decision(record.similarity, threshold);
            record.admin_decision = choice.into();
            record.final_decision =
                decisions::derive_final(record.lecturer_decision, record.admin_decision);
            match choice {
                DecisionChoice::Approved => summary.approved += 1,
                _ => summary.rejected += 1,
            }
            self.repository.update(record)?;
        }
        Ok(summary)
    }

    /// Fetch one submission the actor is allowed to see.
    pub fn get(
        &self,
        actor_id: UserId,
        id: &SubmissionId,
    ) -> Result<SubmissionRecord, ProposalServiceError> {
        let actor = self.actor(actor_id)?;
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        access::authorize(actor, SubmissionAction::View, &record)?;
        Ok(record)
    }

    /// Role-scoped listing: students see their own submissions, lecturers
    /// their supervisees', admins everything. Newest first.
    pub fn list_for(&self, actor_id: UserId) -> Result<Vec<SubmissionRecord>, ProposalServiceError> {
        let actor = self.actor(actor_id)?;
        let mut records = match actor.role {
            Role::Student => self.repository.for_student(actor.id)?,
            Role::Lecturer => {
                let mut records = self.repository.all()?;
                records.retain(|record| record.supervisor_id == actor.id);
                records
            }
            Role::Admin => self.repository.all()?,
        };
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    /// Current workflow settings, creating the default record on first read.
    pub fn settings(&self, actor_id: UserId) -> Result<WorkflowSettings, ProposalServiceError> {
        let actor = self.actor(actor_id)?;
        access::require_admin(actor)?;
        match self.repository.load_settings()? {
            Some(settings) => Ok(settings),
            None => {
                let defaults = WorkflowSettings::default();
                self.repository.save_settings(&defaults)?;
                Ok(defaults)
            }
        }
    }

    pub fn update_settings(
        &self,
        actor_id: UserId,
        settings: WorkflowSettings,
    ) -> Result<WorkflowSettings, ProposalServiceError> {
        let actor = self.actor(actor_id)?;
        access::require_admin(actor)?;
        self.repository.save_settings(&settings)?;
        Ok(settings)
    }

    /// Render a submission the actor is allowed to see as a PDF document.
    pub fn render_document(
        &self,
        actor_id: UserId,
        id: &SubmissionId,
    ) -> Result<Vec<u8>, ProposalServiceError> {
        let record = self.get(actor_id, id)?;
        let student = self.directory.user(record.student_id)?;
        let supervisor = self.directory.user(record.supervisor_id)?;
        let bytes = render::render_submission(&record, student.as_ref(), supervisor.as_ref())?;
        Ok(bytes)
    }

    fn actor(&self, id: UserId) -> Result<Actor, ProposalServiceError> {
        let account = self
            .directory
            .user(id)?
            .ok_or(DirectoryError::UnknownUser(id))?;
        Ok(Actor {
            id: account.id,
            role: account.role,
        })
    }

    fn effective_settings(&self) -> Result<WorkflowSettings, RepositoryError> {
        Ok(self.repository.load_settings()?.unwrap_or_default())
    }

    /// Corpus gathering plus scoring; the corpus is re-read and re-vectorized
    /// on every call.
    fn score(
        &self,
        text: &str,
        category: ProposalCategory,
        mode: SimilarityMode,
        exclude: Option<&SubmissionId>,
    ) -> Result<f64, RepositoryError> {
        let peers = self.repository.in_category(category, exclude)?;
        let corpus: Vec<String> = peers
            .iter()
            .map(|peer| peer.comparison_text(mode))
            .collect();
        Ok(similarity_percent(text, &corpus))
    }

    /// Fire-and-forget dispatch; a failed send is logged and swallowed.
    fn dispatch(&self, notification: Notification) {
        if let Err(err) = self.notifier.send(notification) {
            tracing::warn!(error = %err, "notification dropped");
        }
    }
}

fn receipt_notification(student: &UserAccount, record: &SubmissionRecord) -> Notification {
    Notification {
        to: student.email.clone(),
        subject: "Submission received".to_string(),
        html_body: format!(
            "<p>Your {} submission was received. Similarity: <b>{}%</b>.</p>",
            record.category, record.similarity
        ),
    }
}

fn supervisor_alert(
    student: &UserAccount,
    supervisor: &UserAccount,
    record: &SubmissionRecord,
) -> Notification {
    let warning = if record.similarity >= HIGH_SIMILARITY_THRESHOLD {
        "<p style=\"color:red\"><b>High similarity detected</b></p>"
    } else {
        ""
    };
    Notification {
        to: supervisor.email.clone(),
        subject: format!(
            "New submission from {}",
            student.reg_number.as_deref().unwrap_or(&student.email)
        ),
        html_body: format!(
            "<p>Student <b>{} ({})</b> submitted a {}.</p>\
             <p>Similarity: <b>{}%</b>.</p>{}<p>Please log in to review.</p>",
            student.name,
            student.reg_number.as_deref().unwrap_or("-"),
            record.category,
            record.similarity,
            warning
        ),
    }
}

/// Error raised by the proposal service.
#[derive(Debug, thiserror::Error)]
pub enum ProposalServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Access(#[from] AccessDenied),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Input validation failures, rejected before any mutation.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("student has no assigned supervisor")]
    MissingSupervisor,
    #[error("a {0} submission already exists for this student")]
    DuplicateCategory(ProposalCategory),
    #[error("proposed title must not be empty")]
    EmptyTitle,
    #[error("threshold must fall within 0-100, got {0}")]
    InvalidThreshold(f64),
}
