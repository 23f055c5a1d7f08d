//! Scanner link: the persistent connection to the scan service and the queue
//! of requests waiting to cross it.
mod connection;
mod endpoint;
mod error;
mod manager;
mod queue;
mod transport;

pub use connection::{ConnectionHandle, LinkEvent, ReadyState};
pub use endpoint::{service_endpoint, DEFAULT_SERVICE_PATH};
pub use error::LinkError;
pub use manager::{ConnectionManager, DrainOutcome, LinkSettings, LinkUpdate};
pub use queue::{OutgoingQueue, OutgoingRequest};
pub use transport::{Connector, Transport, WsConnector, WsTransport};
