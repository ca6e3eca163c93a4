use metrics_exporter_prometheus::PrometheusHandle;
use propvet::workflows::proposals::{
    DirectoryError, Notification, NotificationError, NotificationSender, ProposalCategory, Role,
    RepositoryError, StaffDirectory, SubmissionId, SubmissionRecord, SubmissionRepository,
    UserAccount, UserId, WorkflowSettings,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionRepository {
    records: Arc<Mutex<HashMap<SubmissionId, SubmissionRecord>>>,
    settings: Arc<Mutex<Option<WorkflowSettings>>>,
}

impl SubmissionRepository for InMemorySubmissionRepository {
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
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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

/// Directory backed by a fixed user table. Account provisioning is handled
/// by the identity platform; this fixture mirrors its seed data.
#[derive(Clone)]
pub(crate) struct SeededDirectory {
    users: HashMap<UserId, UserAccount>,
}

impl SeededDirectory {
    pub(crate) fn with_campus_fixture() -> Self {
        let accounts = [
            UserAccount {
                id: UserId(1),
                name: "Admin".to_string(),
                email: "admin@uni.edu".to_string(),
                reg_number: None,
                role: Role::Admin,
                supervisors: Vec::new(),
            },
            UserAccount {
                id: UserId(2),
                name: "Dr. Ada".to_string(),
                email: "lect1@uni.edu".to_string(),
                reg_number: None,
                role: Role::Lecturer,
                supervisors: Vec::new(),
            },
            UserAccount {
                id: UserId(3),
                name: "Prof. Bassey".to_string(),
                email: "lect2@uni.edu".to_string(),
                reg_number: None,
                role: Role::Lecturer,
                supervisors: Vec::new(),
            },
            UserAccount {
                id: UserId(10),
                name: "Jane Student".to_string(),
                email: "student1@uni.edu".to_string(),
                reg_number: Some("CSC/2025/001".to_string()),
                role: Role::Student,
                supervisors: vec![UserId(2)],
            },
            UserAccount {
                id: UserId(11),
                name: "John Student".to_string(),
                email: "student2@uni.edu".to_string(),
                reg_number: Some("CSC/2025/002".to_string()),
                role: Role::Student,
                supervisors: vec![UserId(3)],
            },
        ];
        Self {
            users: accounts
                .into_iter()
                .map(|account| (account.id, account))
                .collect(),
        }
    }
}

impl StaffDirectory for SeededDirectory {
    fn user(&self, id: UserId) -> Result<Option<UserAccount>, DirectoryError> {
        Ok(self.users.get(&id).cloned())
    }
}

/// Notification hook that records delivery in the logs only. Swapping in a
/// real mail adapter is a one-impl change.
#[derive(Default, Clone)]
pub(crate) struct TracingNotificationSender;

impl NotificationSender for TracingNotificationSender {
    fn send(&self, notification: Notification) -> Result<(), NotificationError> {
        tracing::info!(
            to = %notification.to,
            subject = %notification.subject,
            "notification dispatched"
        );
        Ok(())
    }
}
