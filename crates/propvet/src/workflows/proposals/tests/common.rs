use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::workflows::proposals::domain::{
    NarrativeFields, ProposalCategory, ProposalDraft, Role, SubmissionId, UserId,
};
use crate::workflows::proposals::repository::{
    Notification, NotificationError, NotificationSender, RepositoryError, StaffDirectory,
    SubmissionRecord, SubmissionRepository, UserAccount,
};
use crate::workflows::proposals::settings::WorkflowSettings;
use crate::workflows::proposals::{proposal_router, DirectoryError, ProposalService};

pub(super) const ADMIN: UserId = UserId(1);
pub(super) const DR_ADA: UserId = UserId(2);
pub(super) const PROF_BASSEY: UserId = UserId(3);
pub(super) const JANE: UserId = UserId(10);
pub(super) const JOHN: UserId = UserId(11);
pub(super) const UNSUPERVISED: UserId = UserId(12);

fn account(
    id: UserId,
    name: &str,
    email: &str,
    reg_number: Option<&str>,
    role: Role,
    supervisors: &[UserId],
) -> UserAccount {
    UserAccount {
        id,
        name: name.to_string(),
        email: email.to_string(),
        reg_number: reg_number.map(str::to_string),
        role,
        supervisors: supervisors.to_vec(),
    }
}

/// Directory fixture: one admin, two lecturers, two supervised students, and
/// one student nobody supervises.
pub(super) fn campus_directory() -> MemoryDirectory {
    let accounts = [
        account(ADMIN, "Admin", "admin@uni.edu", None, Role::Admin, &[]),
        account(
            DR_ADA,
            "Dr. Ada",
            "lect1@uni.edu",
            None,
            Role::Lecturer,
            &[],
        ),
        account(
            PROF_BASSEY,
            "Prof. Bassey",
            "lect2@uni.edu",
            None,
            Role::Lecturer,
            &[],
        ),
        account(
            JANE,
            "Jane Student",
            "student1@uni.edu",
            Some("CSC/2025/001"),
            Role::Student,
            &[DR_ADA],
        ),
        account(
            JOHN,
            "John Student",
            "student2@uni.edu",
            Some("CSC/2025/002"),
            Role::Student,
            &[PROF_BASSEY],
        ),
        account(
            UNSUPERVISED,
            "Sam Student",
            "student3@uni.edu",
            Some("CSC/2025/003"),
            Role::Student,
            &[],
        ),
    ];
    MemoryDirectory {
        users: accounts
            .into_iter()
            .map(|account| (account.id, account))
            .collect(),
    }
}

pub(super) fn draft(student: UserId, category: ProposalCategory, title: &str) -> ProposalDraft {
    ProposalDraft {
        student_id: student,
        category,
        title: title.to_string(),
        narrative: NarrativeFields::default(),
    }
}

pub(super) type TestService = ProposalService<MemoryRepository, MemoryDirectory, MemoryNotifier>;

pub(super) fn build_service() -> (TestService, Arc<MemoryRepository>, Arc<MemoryNotifier>) {
    let repository = Arc::new(MemoryRepository::default());
    let directory = Arc::new(campus_directory());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = ProposalService::new(repository.clone(), directory, notifier.clone());
    (service, repository, notifier)
}

pub(super) fn router_with_service(service: TestService) -> axum::Router {
    proposal_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<SubmissionId, SubmissionRecord>>>,
    settings: Arc<Mutex<Option<WorkflowSettings>>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self, id: &SubmissionId) -> Option<SubmissionRecord> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
    }

    pub(super) fn remove(&self, id: &SubmissionId) {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .remove(id);
    }

    pub(super) fn set_similarity(&self, id: &SubmissionId, value: f64) {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).expect("record present");
        record.similarity = value;
    }

    pub(super) fn put_settings(&self, settings: WorkflowSettings) {
        *self.settings.lock().expect("settings mutex poisoned") = Some(settings);
    }

    pub(super) fn settings_present(&self) -> bool {
        self.settings
            .lock()
            .expect("settings mutex poisoned")
            .is_some()
    }
}

impl SubmissionRepository for MemoryRepository {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SubmissionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&record.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn in_category(
        &self,
        category: ProposalCategory,
        exclude: Option<&SubmissionId>,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.category == category && Some(&record.id) != exclude)
            .cloned()
            .collect())
    }

    fn for_student(&self, student: UserId) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.student_id == student)
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn load_settings(&self) -> Result<Option<WorkflowSettings>, RepositoryError> {
        Ok(*self.settings.lock().expect("settings mutex poisoned"))
    }

    fn save_settings(&self, settings: &WorkflowSettings) -> Result<(), RepositoryError> {
        *self.settings.lock().expect("settings mutex poisoned") = Some(*settings);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    users: HashMap<UserId, UserAccount>,
}

impl StaffDirectory for MemoryDirectory {
    fn user(&self, id: UserId) -> Result<Option<UserAccount>, DirectoryError> {
        Ok(self.users.get(&id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<Notification>>>,
    fail: bool,
}

impl MemoryNotifier {
    pub(super) fn failing() -> Self {
        Self {
            events: Arc::default(),
            fail: true,
        }
    }

    pub(super) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotificationSender for MemoryNotifier {
    fn send(&self, notification: Notification) -> Result<(), NotificationError> {
        if self.fail {
            return Err(NotificationError::Transport("smtp offline".to_string()));
        }
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

/// Repository double whose every method reports the backend as offline.
pub(super) struct UnavailableRepository;

impl SubmissionRepository for UnavailableRepository {
    fn insert(&self, _record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: SubmissionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn in_category(
        &self,
        _category: ProposalCategory,
        _exclude: Option<&SubmissionId>,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_student(&self, _student: UserId) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn load_settings(&self) -> Result<Option<WorkflowSettings>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save_settings(&self, _settings: &WorkflowSettings) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
