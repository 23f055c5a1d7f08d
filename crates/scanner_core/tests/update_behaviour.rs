use std::sync::Once;

use pretty_assertions::assert_eq;
use scanner_core::{
    update, AppState, ConnectionStatus, Effect, FormEdit, Job, JobId, JobStatus, Msg, StatusEvent,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn edit(state: AppState, field: &str, value: &str) -> AppState {
    update(
        state,
        Msg::FieldChanged {
            field: field.to_string(),
            value: value.to_string(),
        },
    )
    .0
}

#[test]
fn scan_emits_encoded_form() {
    init_logging();
    let state = edit(AppState::new(), "mode", "Color");
    let (mut state, effects) = update(state, Msg::ScanClicked);

    assert_eq!(
        effects,
        vec![Effect::SendRequest {
            payload: "source=ADF+Front&mode=Color&resolution=300&clean=true&pdf=true".to_string()
        }]
    );
    assert!(state.is_scanning());
    assert!(state.consume_dirty());
}

#[test]
fn scan_payload_includes_optional_fields() {
    init_logging();
    let state = edit(AppState::new(), "name", "Tax return");
    let state = edit(state, "source", "ADF Duplex");
    let state = edit(state, "resolution", "600");
    let state = edit(state, "pdf", "false");
    let state = edit(state, "brightness", "-10");
    let (_state, effects) = update(state, Msg::ScanClicked);

    assert_eq!(
        effects,
        vec![Effect::SendRequest {
            payload: "source=ADF+Duplex&mode=Color&resolution=600&clean=true&pdf=false\
                      &brightness=-10&name=Tax+return"
                .to_string()
        }]
    );
}

#[test]
fn payload_is_captured_at_submission() {
    init_logging();
    let (state, first) = update(AppState::new(), Msg::ScanClicked);
    let state = edit(state, "mode", "Gray");
    let (_state, second) = update(state, Msg::ScanClicked);

    assert_ne!(first, second);
    assert_eq!(
        first,
        vec![Effect::SendRequest {
            payload: "source=ADF+Front&mode=Color&resolution=300&clean=true&pdf=true".to_string()
        }]
    );
}

#[test]
fn invalid_edit_sets_error_and_keeps_form() {
    init_logging();
    let state = edit(AppState::new(), "resolution", "1200");
    assert_eq!(state.error(), Some("unsupported resolution '1200'"));
    assert_eq!(state.form().settings.resolution, 300);

    let (state, _) = update(state, Msg::FormEdited(FormEdit::Mode("Sepia".into())));
    assert_eq!(state.error(), Some("unsupported mode 'Sepia'"));
    assert_eq!(state.form().settings.mode, "Color");
}

#[test]
fn scan_clears_previous_error() {
    init_logging();
    let state = edit(AppState::new(), "bogus", "1");
    assert!(state.error().is_some());

    let (state, _) = update(state, Msg::ScanClicked);
    assert_eq!(state.error(), None);
}

#[test]
fn service_failure_sets_banner_and_clears_flag() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::StatusReceived(StatusEvent::Job(Job {
            id: JobId::from("1"),
            name: None,
            status: JobStatus::done(),
            message: "done!".into(),
        })),
    );
    let (state, _) = update(state, Msg::Tick);
    let (state, _) = update(state, Msg::ScanClicked);

    let (mut state, _) = update(
        state,
        Msg::StatusReceived(StatusEvent::ServiceFailure {
            message: "failed: invalid semicolon separator in query".into(),
        }),
    );

    assert!(!state.is_scanning());
    assert!(state.consume_dirty());
    let view = state.view();
    assert_eq!(
        view.error.as_deref(),
        Some("failed: invalid semicolon separator in query")
    );

    let jobs_before = state.jobs().clone();
    let (state, _) = update(state, Msg::DismissError);
    assert_eq!(state.error(), None);
    assert_eq!(state.jobs(), &jobs_before);
    assert_eq!(state.view().jobs.len(), 1);
}

#[test]
fn newer_error_replaces_older() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::StatusReceived(StatusEvent::ServiceFailure {
            message: "first".into(),
        }),
    );
    let (state, _) = update(
        state,
        Msg::StatusReceived(StatusEvent::ServiceFailure {
            message: "second".into(),
        }),
    );
    assert_eq!(state.error(), Some("second"));
}

#[test]
fn connection_changes_mark_dirty() {
    init_logging();
    let (mut state, _) = update(
        AppState::new(),
        Msg::ConnectionChanged(ConnectionStatus::Connecting),
    );
    assert!(state.consume_dirty());
    assert_eq!(state.view().connection, ConnectionStatus::Connecting);

    let (mut state, _) = update(state, Msg::ConnectionChanged(ConnectionStatus::Connecting));
    assert!(!state.consume_dirty());
}
