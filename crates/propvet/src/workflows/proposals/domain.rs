use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for directory users (students, lecturers, admins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for stored submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

/// Directory roles recognized by the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Lecturer,
    Admin,
}

/// Fixed set of research proposal types accepted for submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalCategory {
    Seminar,
    Project,
    Dissertation,
    Thesis,
}

impl ProposalCategory {
    pub const fn label(self) -> &'static str {
        match self {
            ProposalCategory::Seminar => "Seminar",
            ProposalCategory::Project => "Project",
            ProposalCategory::Dissertation => "Dissertation",
            ProposalCategory::Thesis => "Thesis",
        }
    }

    /// Seminar and Project proposals come from undergraduates; the rest are
    /// postgraduate work.
    pub const fn degree_level(self) -> DegreeLevel {
        match self {
            ProposalCategory::Seminar | ProposalCategory::Project => DegreeLevel::Undergraduate,
            ProposalCategory::Dissertation | ProposalCategory::Thesis => DegreeLevel::Postgraduate,
        }
    }
}

impl fmt::Display for ProposalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegreeLevel {
    Undergraduate,
    Postgraduate,
}

/// The six narrative sections of a proposal, in their canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeFields {
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub aim: String,
    #[serde(default)]
    pub objectives: String,
    #[serde(default)]
    pub methods: String,
    #[serde(default)]
    pub expected_results: String,
    #[serde(default)]
    pub literature_review: String,
}

impl NarrativeFields {
    /// Sections paired with their display headings, in canonical order.
    pub fn sections(&self) -> [(&'static str, &str); 6] {
        [
            ("Background", self.background.as_str()),
            ("Aim", self.aim.as_str()),
            ("Objectives", self.objectives.as_str()),
            ("Methods", self.methods.as_str()),
            ("Expected Results", self.expected_results.as_str()),
            ("Literature Review", self.literature_review.as_str()),
        ]
    }
}

/// Inbound payload for a brand new proposal submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalDraft {
    pub student_id: UserId,
    pub category: ProposalCategory,
    pub title: String,
    #[serde(flatten)]
    pub narrative: NarrativeFields,
}

/// Partial update; only the provided fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ProposalCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objectives: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_results: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literature_review: Option<String>,
}

/// State of a single decision track (lecturer or admin) and of the derived
/// final decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionState {
    Pending,
    Approved,
    Rejected,
    Closed,
}

impl DecisionState {
    pub const fn label(self) -> &'static str {
        match self {
            DecisionState::Pending => "pending",
            DecisionState::Approved => "approved",
            DecisionState::Rejected => "rejected",
            DecisionState::Closed => "closed",
        }
    }
}

/// A decision an actor can record; `pending` is not a recordable choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionChoice {
    Approved,
    Rejected,
    Closed,
}

impl From<DecisionChoice> for DecisionState {
    fn from(choice: DecisionChoice) -> Self {
        match choice {
            DecisionChoice::Approved => DecisionState::Approved,
            DecisionChoice::Rejected => DecisionState::Rejected,
            DecisionChoice::Closed => DecisionState::Closed,
        }
    }
}
