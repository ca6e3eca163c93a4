use super::domain::{Role, UserId};
use super::repository::SubmissionRecord;

/// Authenticated caller of a workflow operation. How the id was authenticated
/// is the transport layer's problem; here it is taken as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

/// What an actor wants to do with a specific submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionAction {
    View,
    Update,
    Decide,
}

/// Authorization verdicts, surfaced directly to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("administrators only")]
    AdminsOnly,
    #[error("submission belongs to another student")]
    NotOwner,
    #[error("submission is supervised by another lecturer")]
    NotSupervisor,
    #[error("students cannot record decisions")]
    StudentsCannotDecide,
}

/// Capability check for one (actor, action, submission) triple.
///
/// Students act on their own submissions, lecturers on submissions they
/// supervise, admins on everything. Students never decide.
pub fn authorize(
    actor: Actor,
    action: SubmissionAction,
    submission: &SubmissionRecord,
) -> Result<(), AccessDenied> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Student => match action {
            SubmissionAction::Decide => Err(AccessDenied::StudentsCannotDecide),
            SubmissionAction::View | SubmissionAction::Update => {
                if submission.student_id == actor.id {
                    Ok(())
                } else {
                    Err(AccessDenied::NotOwner)
                }
            }
        },
        Role::Lecturer => {
            if submission.supervisor_id == actor.id {
                Ok(())
            } else {
                Err(AccessDenied::NotSupervisor)
            }
        }
    }
}

/// Gate for operations without a target submission (settings, bulk sweeps).
pub fn require_admin(actor: Actor) -> Result<(), AccessDenied> {
    if actor.role == Role::Admin {
        Ok(())
    } else {
        Err(AccessDenied::AdminsOnly)
    }
}
