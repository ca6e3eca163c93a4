//! Research proposal intake, similarity scoring, and approval workflows.
//!
//! The similarity score attached to a submission is always a snapshot of the
//! same-category corpus at the time it was computed; decisions run on two
//! independent tracks (lecturer, admin) combined into a derived final
//! decision.

pub mod access;
pub mod decisions;
pub mod domain;
pub mod render;
pub mod repository;
pub mod router;
pub mod service;
pub mod settings;
pub mod similarity;
pub mod text;

#[cfg(test)]
mod tests;

pub use access::{AccessDenied, Actor, SubmissionAction};
pub use decisions::AutoDecideSummary;
pub use domain::{
    DecisionChoice, DecisionState, DegreeLevel, NarrativeFields, ProposalCategory, ProposalDraft,
    ProposalPatch, Role, SubmissionId, UserId,
};
pub use render::RenderError;
pub use repository::{
    DirectoryError, Notification, NotificationError, NotificationSender, RepositoryError,
    StaffDirectory, SubmissionRecord, SubmissionRepository, SubmissionView, UserAccount,
};
pub use router::proposal_router;
pub use service::{
    ProposalService, ProposalServiceError, ValidationError, HIGH_SIMILARITY_THRESHOLD,
};
pub use settings::{SimilarityMode, WorkflowSettings};
pub use similarity::similarity_percent;
pub use text::comparison_text;
