use thiserror::Error;
use url::form_urlencoded;

/// A selectable value with its human label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

pub const SOURCES: &[Choice] = &[
    Choice {
        value: "ADF Front",
        label: "Single Sided",
    },
    Choice {
        value: "ADF Duplex",
        label: "Double Sided",
    },
];

pub const MODES: &[Choice] = &[
    Choice {
        value: "Color",
        label: "Color",
    },
    Choice {
        value: "Gray",
        label: "Gray",
    },
    Choice {
        value: "Lineart",
        label: "Monochrome",
    },
];

pub const RESOLUTIONS: &[u32] = &[150, 200, 300, 400, 600];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("unsupported source '{0}'")]
    Source(String),
    #[error("unsupported mode '{0}'")]
    Mode(String),
    #[error("unsupported resolution '{0}'")]
    Resolution(String),
    #[error("'{field}' expects {expected}, got '{value}'")]
    Value {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Scanner parameters understood by the scan service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    pub source: String,
    pub mode: String,
    pub resolution: u32,
    pub clean: bool,
    pub pdf: bool,
    pub brightness: Option<i32>,
    pub contrast: Option<i32>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            source: SOURCES[0].value.to_string(),
            mode: MODES[0].value.to_string(),
            resolution: 300,
            clean: true,
            pdf: true,
            brightness: None,
            contrast: None,
        }
    }
}

/// Everything the submission form holds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormValues {
    /// Optional document name; the service picks a dated default when empty.
    pub name: String,
    pub settings: ScanSettings,
}

/// A single validated change to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEdit {
    Name(String),
    Source(String),
    Mode(String),
    Resolution(u32),
    Clean(bool),
    Pdf(bool),
    Brightness(Option<i32>),
    Contrast(Option<i32>),
}

impl FormEdit {
    /// Parses a `field=value` pair as typed by the user.
    pub fn parse(field: &str, value: &str) -> Result<Self, FormError> {
        let value = value.trim();
        match field.trim() {
            "name" => Ok(FormEdit::Name(value.to_string())),
            "source" => Ok(FormEdit::Source(value.to_string())),
            "mode" => Ok(FormEdit::Mode(value.to_string())),
            "resolution" => value
                .parse()
                .map(FormEdit::Resolution)
                .map_err(|_| FormError::Resolution(value.to_string())),
            "clean" => parse_flag("clean", value).map(FormEdit::Clean),
            "pdf" => parse_flag("pdf", value).map(FormEdit::Pdf),
            "brightness" => parse_level("brightness", value).map(FormEdit::Brightness),
            "contrast" => parse_level("contrast", value).map(FormEdit::Contrast),
            other => Err(FormError::UnknownField(other.to_string())),
        }
    }

    /// Checks the edit against the available choices without applying it.
    pub fn validate(&self) -> Result<(), FormError> {
        match self {
            FormEdit::Source(source) if lookup(SOURCES, source).is_none() => {
                Err(FormError::Source(source.clone()))
            }
            FormEdit::Mode(mode) if lookup(MODES, mode).is_none() => {
                Err(FormError::Mode(mode.clone()))
            }
            FormEdit::Resolution(resolution) if !RESOLUTIONS.contains(resolution) => {
                Err(FormError::Resolution(resolution.to_string()))
            }
            _ => Ok(()),
        }
    }
}

fn parse_flag(field: &'static str, value: &str) -> Result<bool, FormError> {
    match value {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(FormError::Value {
            field,
            expected: "a boolean",
            value: value.to_string(),
        }),
    }
}

fn parse_level(field: &'static str, value: &str) -> Result<Option<i32>, FormError> {
    if value.is_empty() {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|_| FormError::Value {
        field,
        expected: "an integer",
        value: value.to_string(),
    })
}

impl FormValues {
    /// Applies an edit after checking it against the available choices.
    pub fn apply(&mut self, edit: FormEdit) -> Result<(), FormError> {
        match edit {
            FormEdit::Name(name) => self.name = name,
            FormEdit::Source(source) => {
                let choice = lookup(SOURCES, &source).ok_or(FormError::Source(source))?;
                self.settings.source = choice.value.to_string();
            }
            FormEdit::Mode(mode) => {
                let choice = lookup(MODES, &mode).ok_or(FormError::Mode(mode))?;
                self.settings.mode = choice.value.to_string();
            }
            FormEdit::Resolution(resolution) => {
                if !RESOLUTIONS.contains(&resolution) {
                    return Err(FormError::Resolution(resolution.to_string()));
                }
                self.settings.resolution = resolution;
            }
            FormEdit::Clean(clean) => self.settings.clean = clean,
            FormEdit::Pdf(pdf) => self.settings.pdf = pdf,
            FormEdit::Brightness(level) => self.settings.brightness = level,
            FormEdit::Contrast(level) => self.settings.contrast = level,
        }
        Ok(())
    }

    /// Serializes the form as the flat query string the scan service parses.
    pub fn encode(&self) -> String {
        let settings = &self.settings;
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer
            .append_pair("source", &settings.source)
            .append_pair("mode", &settings.mode)
            .append_pair("resolution", &settings.resolution.to_string())
            .append_pair("clean", bool_str(settings.clean))
            .append_pair("pdf", bool_str(settings.pdf));
        if let Some(brightness) = settings.brightness {
            serializer.append_pair("brightness", &brightness.to_string());
        }
        if let Some(contrast) = settings.contrast {
            serializer.append_pair("contrast", &contrast.to_string());
        }
        let name = self.name.trim();
        if !name.is_empty() {
            serializer.append_pair("name", name);
        }
        serializer.finish()
    }
}

/// Matches either the service value or the human label, case-insensitively.
fn lookup(choices: &'static [Choice], wanted: &str) -> Option<&'static Choice> {
    choices.iter().find(|choice| {
        choice.value.eq_ignore_ascii_case(wanted) || choice.label.eq_ignore_ascii_case(wanted)
    })
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
