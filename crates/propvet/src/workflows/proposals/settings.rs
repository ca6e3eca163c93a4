use serde::{Deserialize, Serialize};

use super::domain::{DegreeLevel, ProposalCategory};

/// Which portion of a proposal participates in similarity comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimilarityMode {
    #[serde(rename = "title")]
    TitleOnly,
    #[serde(rename = "title_plus")]
    TitlePlusNarrative,
}

/// Singleton workflow settings. An absent stored record means these defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSettings {
    pub undergrad_mode: SimilarityMode,
    pub postgrad_mode: SimilarityMode,
    #[serde(default)]
    pub allow_multiple_submissions: bool,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            undergrad_mode: SimilarityMode::TitleOnly,
            postgrad_mode: SimilarityMode::TitlePlusNarrative,
            allow_multiple_submissions: false,
        }
    }
}

impl WorkflowSettings {
    /// Resolve the comparison mode for a proposal category.
    pub fn mode_for(&self, category: ProposalCategory) -> SimilarityMode {
        match category.degree_level() {
            DegreeLevel::Undergraduate => self.undergrad_mode,
            DegreeLevel::Postgraduate => self.postgrad_mode,
        }
    }
}
