use crate::{ConnectionStatus, FormEdit, JobId, StatusEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User typed `field=value` into the form.
    FieldChanged { field: String, value: String },
    /// Pre-validated form change.
    FormEdited(FormEdit),
    /// User pressed Scan.
    ScanClicked,
    /// Parsed frame from the scan service.
    StatusReceived(StatusEvent),
    /// User dismissed a job card.
    DismissJob(JobId),
    /// User closed the error banner.
    DismissError,
    /// Link layer reported a connection state change.
    ConnectionChanged(ConnectionStatus),
    /// Flush timer fired.
    Tick,
    NoOp,
}
