use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use client_logging::{client_debug, client_info, client_warn};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::transport::{Connector, Transport};
use crate::LinkError;

/// Readiness of one connection, read at send time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReadyState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

impl ReadyState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ReadyState::Connecting,
            1 => ReadyState::Open,
            2 => ReadyState::Closing,
            _ => ReadyState::Closed,
        }
    }

    /// Closing or closed; the connection will never carry another send.
    pub fn is_unusable(self) -> bool {
        matches!(self, ReadyState::Closing | ReadyState::Closed)
    }
}

/// Callbacks from a connection task, tagged with the generation that opened it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    Opened {
        generation: u64,
    },
    Frame {
        generation: u64,
        text: String,
    },
    Closed {
        generation: u64,
        /// False when the connect attempt itself failed.
        was_open: bool,
        reason: Option<String>,
    },
}

impl LinkEvent {
    pub fn generation(&self) -> u64 {
        match self {
            LinkEvent::Opened { generation }
            | LinkEvent::Frame { generation, .. }
            | LinkEvent::Closed { generation, .. } => *generation,
        }
    }
}

#[derive(Clone)]
struct SharedState(Arc<AtomicU8>);

impl SharedState {
    fn new() -> Self {
        Self(Arc::new(AtomicU8::new(ReadyState::Connecting as u8)))
    }

    fn load(&self) -> ReadyState {
        ReadyState::from_u8(self.0.load(Ordering::Acquire))
    }

    fn store(&self, state: ReadyState) {
        self.0.store(state as u8, Ordering::Release);
    }

    fn advance(&self, from: ReadyState, to: ReadyState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// The manager's side of one live connection. Dropping it closes the socket.
pub struct ConnectionHandle {
    generation: u64,
    state: SharedState,
    outbound: mpsc::UnboundedSender<String>,
    cancel: CancellationToken,
}

impl ConnectionHandle {
    /// Starts connecting in the background; the handle is `Connecting` until
    /// the task reports otherwise.
    pub(crate) fn spawn(
        connector: Arc<dyn Connector>,
        endpoint: Url,
        generation: u64,
        connect_timeout: Duration,
        events: mpsc::UnboundedSender<LinkEvent>,
    ) -> Self {
        let state = SharedState::new();
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task = ConnectionTask {
            connector,
            endpoint,
            generation,
            connect_timeout,
            state: state.clone(),
            outbound_rx,
            cancel: cancel.clone(),
            events,
        };
        tokio::spawn(task.run());

        Self {
            generation,
            state,
            outbound,
            cancel,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ready_state(&self) -> ReadyState {
        self.state.load()
    }

    /// Hands a payload to the connection task; gives it back if the task is gone.
    pub(crate) fn send(&self, payload: String) -> Result<(), String> {
        self.outbound.send(payload).map_err(|err| err.0)
    }

    pub fn close(&self) {
        if !self.state.advance(ReadyState::Connecting, ReadyState::Closing) {
            self.state.advance(ReadyState::Open, ReadyState::Closing);
        }
        self.cancel.cancel();
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct ConnectionTask {
    connector: Arc<dyn Connector>,
    endpoint: Url,
    generation: u64,
    connect_timeout: Duration,
    state: SharedState,
    outbound_rx: mpsc::UnboundedReceiver<String>,
    cancel: CancellationToken,
    events: mpsc::UnboundedSender<LinkEvent>,
}

impl ConnectionTask {
    async fn run(mut self) {
        let generation = self.generation;
        let connecting = tokio::time::timeout(
            self.connect_timeout,
            self.connector.connect(&self.endpoint),
        );
        let connected = tokio::select! {
            _ = self.cancel.cancelled() => {
                self.state.store(ReadyState::Closed);
                return;
            }
            result = connecting => match result {
                Ok(result) => result,
                Err(_) => Err(LinkError::ConnectTimeout(self.connect_timeout)),
            },
        };

        let mut transport = match connected {
            Ok(transport) => transport,
            Err(err) => {
                client_warn!("connection {} to {} failed: {}", generation, self.endpoint, err);
                self.state.store(ReadyState::Closed);
                let _ = self.events.send(LinkEvent::Closed {
                    generation,
                    was_open: false,
                    reason: Some(err.to_string()),
                });
                return;
            }
        };

        if !self.state.advance(ReadyState::Connecting, ReadyState::Open) {
            // Closed by the manager while the handshake was in flight.
            transport.close().await;
            self.state.store(ReadyState::Closed);
            return;
        }
        client_info!("connection {} open to {}", generation, self.endpoint);
        let _ = self.events.send(LinkEvent::Opened { generation });

        let reason = self.pump(transport.as_mut()).await;

        self.state.store(ReadyState::Closed);
        match &reason {
            Some(reason) => client_warn!("connection {} closed: {}", generation, reason),
            None => client_info!("connection {} closed", generation),
        }
        let _ = self.events.send(LinkEvent::Closed {
            generation,
            was_open: true,
            reason,
        });
    }

    /// Moves frames both ways until either side closes; returns the failure, if any.
    async fn pump(&mut self, transport: &mut dyn Transport) -> Option<String> {
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    self.state.store(ReadyState::Closing);
                    transport.close().await;
                    return None;
                }
                Some(payload) = self.outbound_rx.recv() => {
                    client_debug!("connection {} sending {} bytes", self.generation, payload.len());
                    if let Err(err) = transport.send_text(payload).await {
                        self.state.store(ReadyState::Closing);
                        return Some(err.to_string());
                    }
                }
                frame = transport.next_text() => match frame {
                    Some(Ok(text)) => {
                        let _ = self.events.send(LinkEvent::Frame {
                            generation: self.generation,
                            text,
                        });
                    }
                    Some(Err(err)) => {
                        self.state.store(ReadyState::Closing);
                        return Some(err.to_string());
                    }
                    None => {
                        self.state.store(ReadyState::Closing);
                        return None;
                    }
                },
            }
        }
    }
}
