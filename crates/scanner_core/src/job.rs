use std::collections::HashMap;
use std::fmt;

/// Opaque job identifier assigned by the scan service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Status tag reported by the scan service.
///
/// The service owns this vocabulary and may add values, so this is a string
/// newtype with a few recognized tags rather than a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JobStatus(String);

impl JobStatus {
    pub const QUEUED: &'static str = "queued";
    pub const IN_PROGRESS: &'static str = "in_progress";
    pub const DONE: &'static str = "done";
    pub const FAILED: &'static str = "failed";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn in_progress() -> Self {
        Self::new(Self::IN_PROGRESS)
    }

    pub fn done() -> Self {
        Self::new(Self::DONE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_in_progress(&self) -> bool {
        self.0 == Self::IN_PROGRESS
    }

    pub fn is_done(&self) -> bool {
        self.0 == Self::DONE
    }

    /// True for any tag this client does not know about.
    pub fn is_unrecognized(&self) -> bool {
        ![Self::QUEUED, Self::IN_PROGRESS, Self::DONE, Self::FAILED].contains(&self.0.as_str())
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One server-tracked scan task as last reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    /// Usually a file path on the service host.
    pub name: Option<String>,
    pub status: JobStatus,
    pub message: String,
}

impl Job {
    /// Final path segment of the name, or the id when the service sent no name.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) => {
                let trimmed = name.trim_end_matches(['/', '\\']);
                let segment = trimmed
                    .rsplit(['/', '\\'])
                    .next()
                    .unwrap_or(trimmed);
                if segment.is_empty() {
                    self.id.as_str()
                } else {
                    segment
                }
            }
            None => self.id.as_str(),
        }
    }
}

/// Job records keyed by id, remembering the order in which ids were first seen.
///
/// Replacing a record keeps its original position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobStore {
    order: Vec<JobId>,
    jobs: HashMap<JobId, Job>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or fully replaces the record for `job.id`.
    pub fn upsert(&mut self, job: Job) {
        if !self.jobs.contains_key(&job.id) {
            self.order.push(job.id.clone());
        }
        self.jobs.insert(job.id.clone(), job);
    }

    /// Removes a record; returns it if it existed.
    pub fn remove(&mut self, id: &JobId) -> Option<Job> {
        let removed = self.jobs.remove(id)?;
        self.order.retain(|known| known != id);
        Some(removed)
    }

    pub fn get(&self, id: &JobId) -> Option<&Job> {
        self.jobs.get(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Records in first-seen order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Job> + '_ {
        self.order.iter().filter_map(|id| self.jobs.get(id))
    }
}
