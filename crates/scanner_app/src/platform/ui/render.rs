use scanner_core::{AppViewModel, Choice, ConnectionStatus, JobRowView, MODES, SOURCES};

pub fn render(view: &AppViewModel) -> Vec<String> {
    let connection = match view.connection {
        ConnectionStatus::Disconnected => "disconnected",
        ConnectionStatus::Connecting => "connecting",
        ConnectionStatus::Connected => "connected",
    };
    let activity = if view.scanning { "Scanning..." } else { "Ready" };

    let mut lines = vec![format!("[{connection}] {activity}"), format_form(view)];

    if let Some(error) = &view.error {
        lines.push(format!("! {error}  (clear-error to dismiss)"));
    }

    if view.jobs.is_empty() {
        lines.push("  no jobs".to_string());
    } else {
        lines.extend(view.jobs.iter().map(format_job_row));
    }
    lines
}

fn format_form(view: &AppViewModel) -> String {
    let settings = &view.form.settings;
    let name = match view.form.name.trim() {
        "" => "<dated>",
        name => name,
    };
    let mut text = format!(
        "Form: source={} mode={} resolution={} clean={} pdf={} name={}",
        label(SOURCES, &settings.source),
        label(MODES, &settings.mode),
        settings.resolution,
        on_off(settings.clean),
        on_off(settings.pdf),
        name
    );
    if let Some(brightness) = settings.brightness {
        text.push_str(&format!(" brightness={brightness}"));
    }
    if let Some(contrast) = settings.contrast {
        text.push_str(&format!(" contrast={contrast}"));
    }
    text
}

fn format_job_row(job: &JobRowView) -> String {
    let marker = if job.is_active { '*' } else { '-' };
    let unknown = if job.status.is_unrecognized() { "?" } else { "" };
    let mut row = format!(
        "  {marker} {name} [{status}{unknown}] {message}",
        name = job.name,
        status = job.status,
        message = job.message
    );
    if job.can_download {
        row.push_str("  (ready for download)");
    }
    if job.can_dismiss {
        row.push_str(&format!("  (dismiss {})", job.job_id));
    }
    row
}

fn label<'a>(choices: &'static [Choice], value: &'a str) -> &'a str {
    choices
        .iter()
        .find(|choice| choice.value == value)
        .map_or(value, |choice| choice.label)
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
