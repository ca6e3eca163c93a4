use super::domain::NarrativeFields;
use super::settings::SimilarityMode;

/// Build the text a submission is compared under.
///
/// Title-only mode uses the title alone. Title-plus-narrative appends the six
/// narrative sections in canonical order, skipping blank ones, joined by
/// single spaces. Deterministic and side-effect free.
pub fn comparison_text(title: &str, narrative: &NarrativeFields, mode: SimilarityMode) -> String {
    let title = title.trim();
    match mode {
        SimilarityMode::TitleOnly => title.to_string(),
        SimilarityMode::TitlePlusNarrative => {
            let mut parts = Vec::with_capacity(7);
            if !title.is_empty() {
                parts.push(title);
            }
            for (_, body) in narrative.sections() {
                let body = body.trim();
                if !body.is_empty() {
                    parts.push(body);
                }
            }
            parts.join(" ")
        }
    }
}
