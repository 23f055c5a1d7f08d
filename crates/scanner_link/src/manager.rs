use std::sync::Arc;
use std::time::Duration;

use client_logging::{client_debug, client_info, client_trace};
use tokio::sync::mpsc;
use url::Url;

use crate::connection::{ConnectionHandle, LinkEvent, ReadyState};
use crate::queue::{OutgoingQueue, OutgoingRequest};
use crate::transport::Connector;

#[derive(Debug, Clone)]
pub struct LinkSettings {
    /// Reopen immediately when an open connection drops. When false, a drop
    /// is only noticed by the next send attempt.
    pub reconnect_on_close: bool,
    pub connect_timeout: Duration,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            reconnect_on_close: true,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Result of one [`ConnectionManager::ensure_and_drain`] attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// No connection object; nothing was attempted.
    NoConnection,
    /// Handshake still running; the open callback will drain.
    Connecting,
    /// Connection was unusable and has been replaced; requests stay queued.
    Reconnecting,
    Drained { sent: usize },
}

/// What a link event means for the screen, after the manager has reacted to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkUpdate {
    Opened,
    Frame(String),
    Closed {
        reconnecting: bool,
        reason: Option<String>,
    },
}

/// Owns the one logical connection to the scan service and the queue of
/// requests waiting for it.
///
/// Every method runs on the owner's task; the connection's IO task reports
/// back through the [`LinkEvent`] receiver returned by [`ConnectionManager::new`],
/// which the owner feeds into [`ConnectionManager::handle_event`].
pub struct ConnectionManager {
    connector: Arc<dyn Connector>,
    endpoint: Url,
    settings: LinkSettings,
    generation: u64,
    connection: Option<ConnectionHandle>,
    queue: OutgoingQueue,
    events_tx: mpsc::UnboundedSender<LinkEvent>,
    shut_down: bool,
}

impl ConnectionManager {
    pub fn new(
        connector: Arc<dyn Connector>,
        endpoint: Url,
        settings: LinkSettings,
    ) -> (Self, mpsc::UnboundedReceiver<LinkEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let manager = Self {
            connector,
            endpoint,
            settings,
            generation: 0,
            connection: None,
            queue: OutgoingQueue::new(),
            events_tx,
            shut_down: false,
        };
        (manager, events_rx)
    }

    /// Opens the first connection. Later connections are opened by generation bumps.
    pub fn connect(&mut self) {
        if self.connection.is_none() && !self.shut_down {
            self.bump_generation();
        }
    }

    /// Queues a request and tries to send everything queued.
    pub fn enqueue(&mut self, request: OutgoingRequest) -> DrainOutcome {
        self.queue.push(request);
        self.ensure_and_drain()
    }

    /// Sends every queued request over the current connection if it is open.
    ///
    /// Does nothing without a connection object. A closing or closed
    /// connection is abandoned and replaced, leaving the queue for the new
    /// connection's open callback.
    pub fn ensure_and_drain(&mut self) -> DrainOutcome {
        let Some(connection) = self.connection.as_ref() else {
            return DrainOutcome::NoConnection;
        };

        match connection.ready_state() {
            ReadyState::Connecting => DrainOutcome::Connecting,
            ReadyState::Closing | ReadyState::Closed => {
                client_info!(
                    "connection {} unusable at send time; reconnecting",
                    connection.generation()
                );
                self.replace_connection();
                DrainOutcome::Reconnecting
            }
            ReadyState::Open => {
                let mut sent = 0;
                let mut refused = false;
                while let Some(request) = self.queue.pop() {
                    match connection.send(request.into_payload()) {
                        Ok(()) => sent += 1,
                        Err(payload) => {
                            self.queue.requeue(OutgoingRequest::new(payload));
                            refused = true;
                            break;
                        }
                    }
                }
                if refused {
                    client_info!(
                        "connection {} refused a send after {} requests; reconnecting",
                        connection.generation(),
                        sent
                    );
                    self.replace_connection();
                    return DrainOutcome::Reconnecting;
                }
                if sent > 0 {
                    client_debug!("drained {} requests to connection {}", sent, self.generation);
                }
                DrainOutcome::Drained { sent }
            }
        }
    }

    /// Applies a connection callback. Events from abandoned connections, or
    /// any event after shutdown, are ignored and yield `None`.
    pub fn handle_event(&mut self, event: LinkEvent) -> Option<LinkUpdate> {
        if self.shut_down || event.generation() != self.generation {
            client_trace!(
                "ignoring event from connection {} (current {})",
                event.generation(),
                self.generation
            );
            return None;
        }

        match event {
            LinkEvent::Opened { .. } => {
                self.ensure_and_drain();
                Some(LinkUpdate::Opened)
            }
            LinkEvent::Frame { text, .. } => Some(LinkUpdate::Frame(text)),
            LinkEvent::Closed {
                was_open, reason, ..
            } => {
                let reconnecting = was_open && self.settings.reconnect_on_close;
                if reconnecting {
                    self.replace_connection();
                }
                Some(LinkUpdate::Closed {
                    reconnecting,
                    reason,
                })
            }
        }
    }

    /// Closes the live connection; no further events are delivered.
    pub fn shutdown(&mut self) {
        self.shut_down = true;
        if let Some(connection) = self.connection.take() {
            client_info!("closing connection {}", connection.generation());
            connection.close();
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ready_state(&self) -> Option<ReadyState> {
        self.connection.as_ref().map(ConnectionHandle::ready_state)
    }

    /// Number of requests still waiting for a usable connection.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn replace_connection(&mut self) {
        self.connection = None;
        self.bump_generation();
    }

    fn bump_generation(&mut self) {
        self.generation += 1;
        client_debug!("opening connection {} to {}", self.generation, self.endpoint);
        self.connection = Some(ConnectionHandle::spawn(
            self.connector.clone(),
            self.endpoint.clone(),
            self.generation,
            self.settings.connect_timeout,
            self.events_tx.clone(),
        ));
    }
}
