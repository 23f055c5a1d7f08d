use std::sync::{Arc, Once};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use scanner_link::{
    service_endpoint, ConnectionManager, LinkSettings, LinkUpdate, OutgoingRequest, WsConnector,
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

#[tokio::test]
async fn round_trip_against_local_service() {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (request_tx, request_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        while let Some(Ok(message)) = ws.next().await {
            if let Message::Text(text) = message {
                let _ = request_tx.send(text);
                ws.send(Message::Text(
                    r#"{"job":{"id":"1","name":"scans/doc"},"status":"in_progress","message":"queued for scanning"}"#
                        .to_string(),
                ))
                .await
                .unwrap();
                break;
            }
        }
        // Keep the socket open until the client hangs up.
        while let Some(Ok(_)) = ws.next().await {}
    });

    let endpoint = service_endpoint(&format!("127.0.0.1:{port}"), "/ws").unwrap();
    let (mut manager, mut events) =
        ConnectionManager::new(Arc::new(WsConnector), endpoint, LinkSettings::default());
    manager.connect();
    manager.enqueue(OutgoingRequest::new("source=ADF+Front&mode=Gray"));

    let mut frames = Vec::new();
    while frames.is_empty() {
        let event = timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("event in time")
            .expect("events open");
        match manager.handle_event(event) {
            Some(LinkUpdate::Frame(text)) => frames.push(text),
            Some(LinkUpdate::Opened) | None => {}
            Some(other) => panic!("unexpected update {other:?}"),
        }
    }

    let request = timeout(Duration::from_secs(5), request_rx)
        .await
        .expect("request in time")
        .unwrap();
    assert_eq!(request, "source=ADF+Front&mode=Gray");
    assert!(frames[0].contains("queued for scanning"));

    manager.shutdown();
}
