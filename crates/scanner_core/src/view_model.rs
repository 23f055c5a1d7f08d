use crate::{ConnectionStatus, FormValues, Job, JobId, JobStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub form: FormValues,
    pub connection: ConnectionStatus,
    pub scanning: bool,
    pub error: Option<String>,
    /// Jobs as of the last flush, newest first.
    pub jobs: Vec<JobRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job_id: JobId,
    pub name: String,
    pub status: JobStatus,
    pub message: String,
    pub is_active: bool,
    pub can_download: bool,
    pub can_dismiss: bool,
}

impl From<&Job> for JobRowView {
    fn from(job: &Job) -> Self {
        let is_active = job.status.is_in_progress();
        Self {
            job_id: job.id.clone(),
            name: job.display_name().to_string(),
            status: job.status.clone(),
            message: job.message.clone(),
            is_active,
            can_download: job.status.is_done(),
            can_dismiss: !is_active,
        }
    }
}
