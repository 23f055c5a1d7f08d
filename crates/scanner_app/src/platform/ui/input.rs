use scanner_core::{FormEdit, FormError, JobId, Msg};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  set <field>=<value> ...   edit the form (name, source, mode, resolution, clean, pdf, brightness, contrast)
  scan [<field>=<value> ...] edit the form, then submit it
  dismiss <job-id>          remove a job from the list
  clear-error               close the error banner
  show                      redraw now
  help                      this text
  quit                      close the connection and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Vec<Msg>),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("expected <field>=<value>, got '{0}'")]
    ExpectedPair(String),
    #[error("not scanning: {0}")]
    RejectedEdit(#[from] FormError),
}

pub fn parse_command(line: &str) -> Result<Command, InputError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb {
        "" => Ok(Command::Dispatch(Vec::new())),
        "set" => {
            if rest.is_empty() {
                return Err(InputError::MissingArgument("set"));
            }
            Ok(Command::Dispatch(field_edits(rest)?))
        }
        "scan" => {
            let mut msgs = field_edits(rest)?;
            // A bad value must not fall through to a submission of the old form.
            for msg in &msgs {
                if let Msg::FieldChanged { field, value } = msg {
                    FormEdit::parse(field, value)?.validate()?;
                }
            }
            msgs.push(Msg::ScanClicked);
            Ok(Command::Dispatch(msgs))
        }
        "dismiss" => {
            if rest.is_empty() {
                return Err(InputError::MissingArgument("dismiss"));
            }
            Ok(Command::Dispatch(vec![Msg::DismissJob(JobId::new(rest))]))
        }
        "clear-error" => Ok(Command::Dispatch(vec![Msg::DismissError])),
        "show" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(InputError::UnknownCommand(other.to_string())),
    }
}

/// Splits `a=1 b=two words c=3` into pairs; a word without `=` continues the
/// previous value, so `source=ADF Front` works unquoted.
fn field_edits(rest: &str) -> Result<Vec<Msg>, InputError> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for word in rest.split_whitespace() {
        match word.split_once('=') {
            Some((field, value)) if !field.is_empty() => {
                pairs.push((field.to_string(), value.to_string()));
            }
            _ => match pairs.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(word);
                }
                None => return Err(InputError::ExpectedPair(word.to_string())),
            },
        }
    }
    Ok(pairs
        .into_iter()
        .map(|(field, value)| Msg::FieldChanged { field, value })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(field: &str, value: &str) -> Msg {
        Msg::FieldChanged {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn scan_with_edits_submits_last() {
        assert_eq!(
            parse_command("scan source=ADF Front mode=Color resolution=300").unwrap(),
            Command::Dispatch(vec![
                field("source", "ADF Front"),
                field("mode", "Color"),
                field("resolution", "300"),
                Msg::ScanClicked,
            ])
        );
        assert_eq!(
            parse_command("  scan ").unwrap(),
            Command::Dispatch(vec![Msg::ScanClicked])
        );
    }

    #[test]
    fn scan_with_rejected_edit_is_not_submitted() {
        assert_eq!(
            parse_command("scan resolution=123"),
            Err(InputError::RejectedEdit(FormError::Resolution("123".into())))
        );
        assert_eq!(
            parse_command("scan mode=Color source=flatbed"),
            Err(InputError::RejectedEdit(FormError::Source("flatbed".into())))
        );
        assert!(matches!(
            parse_command("scan pdf=maybe"),
            Err(InputError::RejectedEdit(FormError::Value { field: "pdf", .. }))
        ));
        // Plain edits still go through the form and its error banner.
        assert_eq!(
            parse_command("set resolution=123").unwrap(),
            Command::Dispatch(vec![field("resolution", "123")])
        );
    }

    #[test]
    fn dismiss_takes_the_whole_id() {
        assert_eq!(
            parse_command("dismiss 5f0c-11").unwrap(),
            Command::Dispatch(vec![Msg::DismissJob(JobId::from("5f0c-11"))])
        );
        assert_eq!(
            parse_command("dismiss"),
            Err(InputError::MissingArgument("dismiss"))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            parse_command("set Front"),
            Err(InputError::ExpectedPair("Front".into()))
        );
        assert_eq!(
            parse_command("print"),
            Err(InputError::UnknownCommand("print".into()))
        );
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
    }
}
