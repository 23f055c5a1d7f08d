use crate::{AppState, Effect, FormEdit, Msg, StatusEvent};

/// Job messages containing one of these end the scanning phase of a submission.
pub const SCAN_FINISHED_MARKERS: &[&str] = &["scanning done", "scan failed"];

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FieldChanged { field, value } => {
            match FormEdit::parse(&field, &value) {
                Ok(edit) => apply_edit(&mut state, edit),
                Err(err) => state.set_error(Some(err.to_string())),
            }
            Vec::new()
        }
        Msg::FormEdited(edit) => {
            apply_edit(&mut state, edit);
            Vec::new()
        }
        Msg::ScanClicked => {
            state.set_error(None);
            state.set_scanning(true);
            // Captured by value: later edits cannot reach a queued request.
            let payload = state.form().encode();
            vec![Effect::SendRequest { payload }]
        }
        Msg::StatusReceived(StatusEvent::Job(job)) => {
            if SCAN_FINISHED_MARKERS
                .iter()
                .any(|marker| job.message.contains(marker))
            {
                state.set_scanning(false);
            }
            state.upsert_job(job);
            Vec::new()
        }
        Msg::StatusReceived(StatusEvent::ServiceFailure { message }) => {
            state.set_error(Some(message));
            state.set_scanning(false);
            Vec::new()
        }
        Msg::DismissJob(job_id) => {
            if state.remove_job(&job_id) {
                state.flush_jobs();
            }
            Vec::new()
        }
        Msg::DismissError => {
            state.set_error(None);
            Vec::new()
        }
        Msg::ConnectionChanged(connection) => {
            state.set_connection(connection);
            Vec::new()
        }
        Msg::Tick => {
            if state.has_unflushed_jobs() {
                state.flush_jobs();
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn apply_edit(state: &mut AppState, edit: FormEdit) {
    let mut form = state.form().clone();
    match form.apply(edit) {
        Ok(()) => *state.form_mut() = form,
        Err(err) => state.set_error(Some(err.to_string())),
    }
}
