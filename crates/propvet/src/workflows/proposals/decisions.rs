use serde::Serialize;

use super::domain::{DecisionChoice, DecisionState};

/// Combine the two decision tracks into the value exposed to end users.
///
/// A closure on either track closes the submission outright; otherwise the
/// admin track has the final word and a pending admin track leaves the
/// submission undecided regardless of the lecturer's verdict.
pub fn derive_final(lecturer: DecisionState, admin: DecisionState) -> DecisionState {
    if lecturer == DecisionState::Closed || admin == DecisionState::Closed {
        return DecisionState::Closed;
    }
    match admin {
        DecisionState::Pending => DecisionState::Pending,
        decided => decided,
    }
}

/// The bulk sweep leaves submissions alone once the lecturer has ruled either
/// way; a closed lecturer track does not count as a ruling.
pub fn settled_by_lecturer(lecturer: DecisionState) -> bool {
    matches!(lecturer, DecisionState::Approved | DecisionState::Rejected)
}

/// Threshold rule for the bulk sweep: approve strictly below the threshold,
/// reject at or above it.
pub fn threshold_decision(similarity: f64, threshold: f64) -> DecisionChoice {
    if similarity < threshold {
        DecisionChoice::Approved
    } else {
        DecisionChoice::Rejected
    }
}

/// Outcome counts of one `auto_decide` sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AutoDecideSummary {
    pub approved: usize,
    pub rejected: usize,
    pub skipped: usize,
}
