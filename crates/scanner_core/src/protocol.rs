//! Inbound status frames from the scan service.
//!
//! Two wire layouts exist for job updates: a flat `{id, name, status, message}`
//! object and a nested `{job: {id, name}, status, message}` object. Both are
//! normalized into [`StatusEvent`].

use serde::Deserialize;
use thiserror::Error;

use crate::{Job, JobId, JobStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    /// Full replacement record for one job.
    Job(Job),
    /// Failure not tied to any job, e.g. an unparseable request.
    ServiceFailure { message: String },
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed status frame: {0}")]
    Json(#[from] serde_json::Error),
    #[error("status frame has no status")]
    MissingStatus,
    #[error("status frame with status '{status}' has no job id")]
    UnrecognizedShape { status: String },
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    job: Option<RawJob>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawJob {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Parses one text frame into a [`StatusEvent`].
pub fn parse_status_event(text: &str) -> Result<StatusEvent, ProtocolError> {
    let raw: RawFrame = serde_json::from_str(text)?;

    let (id, name) = match raw.job {
        Some(job) => (job.id, job.name),
        None => (raw.id, raw.name),
    };
    let id = id.filter(|id| !id.is_empty());
    let status = raw.status.ok_or(ProtocolError::MissingStatus)?;
    let message = raw.message.unwrap_or_default();

    match id {
        Some(id) => Ok(StatusEvent::Job(Job {
            id: JobId::new(id),
            name,
            status: JobStatus::new(status),
            message,
        })),
        None if status == JobStatus::FAILED => Ok(StatusEvent::ServiceFailure { message }),
        None => Err(ProtocolError::UnrecognizedShape { status }),
    }
}
