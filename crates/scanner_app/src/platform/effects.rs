use client_logging::{client_debug, client_info, client_warn};
use scanner_core::{parse_status_event, ConnectionStatus, Effect, Msg, StatusEvent};
use scanner_link::{ConnectionManager, DrainOutcome, LinkEvent, LinkUpdate, OutgoingRequest};

/// Executes core effects against the link and turns link callbacks back into
/// core messages.
pub struct EffectRunner {
    link: ConnectionManager,
}

impl EffectRunner {
    pub fn new(link: ConnectionManager) -> Self {
        Self { link }
    }

    /// Opens the first connection.
    pub fn start(&mut self) -> Vec<Msg> {
        client_info!("connecting to {}", self.link.endpoint());
        self.link.connect();
        vec![Msg::ConnectionChanged(ConnectionStatus::Connecting)]
    }

    pub fn run(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_up = Vec::new();
        for effect in effects {
            match effect {
                Effect::SendRequest { payload } => {
                    client_info!("SendRequest payload={}", payload);
                    let outcome = self.link.enqueue(OutgoingRequest::new(payload));
                    client_debug!("enqueue outcome {:?}, pending {}", outcome, self.link.pending());
                    if outcome == DrainOutcome::Reconnecting {
                        follow_up.push(Msg::ConnectionChanged(ConnectionStatus::Connecting));
                    }
                }
            }
        }
        follow_up
    }

    pub fn handle_link_event(&mut self, event: LinkEvent) -> Vec<Msg> {
        match self.link.handle_event(event) {
            None => Vec::new(),
            Some(LinkUpdate::Opened) => {
                vec![Msg::ConnectionChanged(ConnectionStatus::Connected)]
            }
            Some(LinkUpdate::Frame(text)) => match parse_status_event(&text) {
                Ok(event) => {
                    if let StatusEvent::ServiceFailure { message } = &event {
                        client_warn!("scan service reported failure: {}", message);
                    }
                    vec![Msg::StatusReceived(event)]
                }
                Err(err) => {
                    client_warn!("dropping status frame: {} (frame: {})", err, text);
                    Vec::new()
                }
            },
            Some(LinkUpdate::Closed { reconnecting, .. }) => {
                let status = if reconnecting {
                    ConnectionStatus::Connecting
                } else {
                    ConnectionStatus::Disconnected
                };
                vec![Msg::ConnectionChanged(status)]
            }
        }
    }

    pub fn shutdown(&mut self) {
        let pending = self.link.pending();
        if pending > 0 {
            client_warn!("shutting down with {} unsent requests", pending);
        }
        self.link.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Once};
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use scanner_core::{Job, JobId, JobStatus};
    use scanner_link::{service_endpoint, Connector, LinkError, LinkSettings, Transport};
    use tokio::sync::mpsc;
    use url::Url;

    use super::*;

    fn init_logging() {
        static INIT: Once = Once::new();
        INIT.call_once(client_logging::initialize_for_tests);
    }

    /// A scan service that is never reachable.
    struct Unreachable;

    #[async_trait::async_trait]
    impl Connector for Unreachable {
        async fn connect(&self, _endpoint: &Url) -> Result<Box<dyn Transport>, LinkError> {
            Err(LinkError::Connect("connection refused".into()))
        }
    }

    fn runner(settings: LinkSettings) -> (EffectRunner, mpsc::UnboundedReceiver<LinkEvent>) {
        init_logging();
        let endpoint = service_endpoint("localhost:8090", "/ws").unwrap();
        let (link, events) = ConnectionManager::new(Arc::new(Unreachable), endpoint, settings);
        (EffectRunner::new(link), events)
    }

    fn frame(generation: u64, text: &str) -> LinkEvent {
        LinkEvent::Frame {
            generation,
            text: text.to_string(),
        }
    }

    #[test]
    fn malformed_frame_is_dropped_and_later_frames_still_route() {
        let (mut runner, _events) = runner(LinkSettings::default());

        assert_eq!(runner.handle_link_event(frame(0, "not json")), Vec::new());
        assert_eq!(
            runner.handle_link_event(frame(0, r#"{"status":"queued"}"#)),
            Vec::new()
        );
        assert_eq!(
            runner.handle_link_event(frame(
                0,
                r#"{"id":"7","name":"/scans/b.pdf","status":"done","message":"scanning done"}"#
            )),
            vec![Msg::StatusReceived(StatusEvent::Job(Job {
                id: JobId::from("7"),
                name: Some("/scans/b.pdf".into()),
                status: JobStatus::done(),
                message: "scanning done".into(),
            }))]
        );
    }

    #[test]
    fn drop_without_reconnect_shows_disconnected() {
        let settings = LinkSettings {
            reconnect_on_close: false,
            ..LinkSettings::default()
        };
        let (mut runner, _events) = runner(settings);

        let closed = LinkEvent::Closed {
            generation: 0,
            was_open: true,
            reason: Some("going away".into()),
        };
        assert_eq!(
            runner.handle_link_event(closed),
            vec![Msg::ConnectionChanged(ConnectionStatus::Disconnected)]
        );
    }

    #[tokio::test]
    async fn connection_indicator_follows_the_link() {
        let (mut runner, mut events) = runner(LinkSettings::default());

        assert_eq!(
            runner.start(),
            vec![Msg::ConnectionChanged(ConnectionStatus::Connecting)]
        );

        // The first attempt fails and is not retried on its own.
        let failed = tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("close event")
            .expect("events open");
        assert_eq!(
            runner.handle_link_event(failed),
            vec![Msg::ConnectionChanged(ConnectionStatus::Disconnected)]
        );

        // A send finds the dead connection and starts a new one.
        let msgs = runner.run(vec![Effect::SendRequest {
            payload: "source=ADF+Front".into(),
        }]);
        assert_eq!(
            msgs,
            vec![Msg::ConnectionChanged(ConnectionStatus::Connecting)]
        );
        assert_eq!(runner.link.pending(), 1);

        let generation = runner.link.generation();
        assert_eq!(
            runner.handle_link_event(LinkEvent::Opened { generation }),
            vec![Msg::ConnectionChanged(ConnectionStatus::Connected)]
        );

        // An open connection that drops is reopened at once.
        let dropped = LinkEvent::Closed {
            generation,
            was_open: true,
            reason: None,
        };
        assert_eq!(
            runner.handle_link_event(dropped),
            vec![Msg::ConnectionChanged(ConnectionStatus::Connecting)]
        );
        assert_eq!(runner.link.generation(), generation + 1);

        runner.shutdown();
    }
}
