// Proposal PDF rendering.
// Uses genpdf, which needs real font files on disk for text metrics.
use genpdf::*;

use super::repository::{SubmissionRecord, UserAccount};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no usable font family found; install e.g. fonts-liberation")]
    MissingFonts,
    #[error("pdf rendering failed: {0}")]
    Pdf(String),
}

const FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/TTF",
    "/System/Library/Fonts/Supplemental",
    "/Library/Fonts",
];

const FONT_NAMES: &[&str] = &["LiberationSans", "DejaVuSans", "Arial"];

fn font_family() -> Result<fonts::FontFamily<fonts::FontData>, RenderError> {
    FONT_DIRS
        .iter()
        .filter(|dir| std::path::Path::new(dir).exists())
        .find_map(|dir| {
            FONT_NAMES
                .iter()
                .find_map(|name| fonts::from_files(*dir, name, None).ok())
        })
        .ok_or(RenderError::MissingFonts)
}

/// Render a submission as a single-column PDF: title, participants, then one
/// numbered section per non-empty narrative field.
pub fn render_submission(
    record: &SubmissionRecord,
    student: Option<&UserAccount>,
    supervisor: Option<&UserAccount>,
) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::new(font_family()?);
    doc.set_title(record.title.clone());

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(12);
    doc.set_page_decorator(decorator);

    let title_style = style::Style::new().with_font_size(20);
    doc.push(elements::Paragraph::new(record.title.to_uppercase()).styled(title_style));
    doc.push(elements::Break::new(1.0));

    let student_line = match student {
        Some(account) => format!(
            "Student: {} ({})",
            account.name,
            account.reg_number.as_deref().unwrap_or("-")
        ),
        None => "Student: unknown".to_string(),
    };
    doc.push(elements::Paragraph::new(student_line));
    doc.push(elements::Paragraph::new(format!(
        "Supervisor: {}",
        supervisor
            .map(|account| account.name.as_str())
            .unwrap_or("not assigned")
    )));
    doc.push(elements::Paragraph::new(format!(
        "Proposal type: {}",
        record.category
    )));
    doc.push(elements::Break::new(1.0));

    let mut section_number = 0;
    for (heading, body) in record.narrative.sections() {
        let body = body.trim();
        if body.is_empty() {
            continue;
        }
        section_number += 1;
        doc.push(
            elements::Paragraph::new(format!("{section_number}. {heading}"))
                .styled(style::Style::new().with_font_size(14)),
        );
        doc.push(elements::Paragraph::new(body.to_string()));
        doc.push(elements::Break::new(0.5));
    }

    let mut buffer = Vec::new();
    doc.render(&mut buffer)
        .map_err(|err| RenderError::Pdf(err.to_string()))?;
    Ok(buffer)
}
