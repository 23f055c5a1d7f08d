//! Scanner core: pure state machine for the scan form, its job list, and the
//! scan service wire format.
mod effect;
mod form;
mod job;
mod msg;
mod protocol;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use form::{Choice, FormEdit, FormError, FormValues, ScanSettings, MODES, RESOLUTIONS, SOURCES};
pub use job::{Job, JobId, JobStatus, JobStore};
pub use msg::Msg;
pub use protocol::{parse_status_event, ProtocolError, StatusEvent};
pub use state::{AppState, ConnectionStatus};
pub use update::{update, SCAN_FINISHED_MARKERS};
pub use view_model::{AppViewModel, JobRowView};
