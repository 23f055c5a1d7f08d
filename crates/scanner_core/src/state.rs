use crate::view_model::{AppViewModel, JobRowView};
use crate::{FormValues, JobId, JobStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    form: FormValues,
    jobs: JobStore,
    /// Rendering snapshot; only refreshed by a flush.
    published_jobs: Vec<JobRowView>,
    jobs_changed: bool,
    error: Option<String>,
    scanning: bool,
    connection: ConnectionStatus,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            form: self.form.clone(),
            connection: self.connection,
            scanning: self.scanning,
            error: self.error.clone(),
            jobs: self.published_jobs.clone(),
        }
    }

    pub fn jobs(&self) -> &JobStore {
        &self.jobs
    }

    pub fn form(&self) -> &FormValues {
        &self.form
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True when the job store holds changes the snapshot does not show yet.
    pub fn has_unflushed_jobs(&self) -> bool {
        self.jobs_changed
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn form_mut(&mut self) -> &mut FormValues {
        self.mark_dirty();
        &mut self.form
    }

    pub(crate) fn upsert_job(&mut self, job: crate::Job) {
        self.jobs.upsert(job);
        self.jobs_changed = true;
    }

    pub(crate) fn remove_job(&mut self, id: &JobId) -> bool {
        let removed = self.jobs.remove(id).is_some();
        if removed {
            self.jobs_changed = true;
        }
        removed
    }

    pub(crate) fn set_error(&mut self, error: Option<String>) {
        if self.error != error {
            self.error = error;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_scanning(&mut self, scanning: bool) {
        if self.scanning != scanning {
            self.scanning = scanning;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_connection(&mut self, connection: ConnectionStatus) {
        if self.connection != connection {
            self.connection = connection;
            self.mark_dirty();
        }
    }

    /// Copies the job store into the published snapshot, newest first.
    pub(crate) fn flush_jobs(&mut self) {
        self.published_jobs = self.jobs.iter().rev().map(JobRowView::from).collect();
        self.jobs_changed = false;
        self.mark_dirty();
    }
}
