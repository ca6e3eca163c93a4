use crate::infra::{InMemorySubmissionRepository, SeededDirectory, TracingNotificationSender};
use clap::Args;
use propvet::error::AppError;
use propvet::workflows::proposals::{
    NarrativeFields, ProposalCategory, ProposalDraft, ProposalService, UserId,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Auto-decide threshold applied at the end of the demo
    #[arg(long, default_value_t = 70.0)]
    pub(crate) threshold: f64,
}

const ADMIN: UserId = UserId(1);
const JANE: UserId = UserId(10);
const JOHN: UserId = UserId(11);

/// Walk the full workflow in-process: two seminar submissions sharing a
/// title, then an admin threshold sweep.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemorySubmissionRepository::default());
    let directory = Arc::new(SeededDirectory::with_campus_fixture());
    let notifier = Arc::new(TracingNotificationSender);
    let service = ProposalService::new(repository, directory, notifier);

    let first = service.submit(ProposalDraft {
        student_id: JANE,
        category: ProposalCategory::Seminar,
        title: "AI in Healthcare".to_string(),
        narrative: NarrativeFields {
            background: "Clinical decision support is increasingly model-driven.".to_string(),
            aim: "Assess triage quality under distribution shift.".to_string(),
            ..NarrativeFields::default()
        },
    })?;
    println!(
        "submitted {} for Jane: similarity {:.2}%",
        first.id.0, first.similarity
    );

    let second = service.submit(ProposalDraft {
        student_id: JOHN,
        category: ProposalCategory::Seminar,
        title: "AI in Healthcare".to_string(),
        narrative: NarrativeFields::default(),
    })?;
    println!(
        "submitted {} for John: similarity {:.2}%",
        second.id.0, second.similarity
    );

    let summary = service.auto_decide(ADMIN, args.threshold)?;
    println!(
        "auto-decide at {:.1}%: {} approved, {} rejected, {} skipped",
        args.threshold, summary.approved, summary.rejected, summary.skipped
    );

    for id in [&first.id, &second.id] {
        let record = service.get(ADMIN, id)?;
        println!(
            "{}: lecturer={} admin={} final={}",
            record.id.0,
            record.lecturer_decision.label(),
            record.admin_decision.label(),
            record.final_decision.label()
        );
    }

    Ok(())
}
