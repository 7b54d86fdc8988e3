use std::ops::Range;
use std::path::PathBuf;

/// Source information for where a diagnostic came from
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub file_path: PathBuf,
    pub content: String,
}

/// A diagnostic message that can be either a warning or an error
#[derive(Debug, Clone)]
pub enum Diagnostic {
    Warning(Warning),
    Error(ValidationError),
}

/// Warning messages that don't prevent config loading
#[derive(Debug, Clone)]
pub enum Warning {
    EmptyConfig {
        file_path: PathBuf,
    },
    /// A value was not understood and a fallback is used instead
    Fallback {
        field_path: String,
        message: String,
        span: Option<Range<usize>>,
    },
    /// Crit thresholds are less strict than warn thresholds
    ThresholdOrder {
        field_path: String,
        message: String,
    },
}

/// Error type for validation failures
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field_path: String,
    pub message: String,
    pub span: Option<Range<usize>>,
}

/// Error type for config loading failures
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read '{}': {error}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("Failed to parse '{}': {error}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        error: toml::de::Error,
    },
}

impl Diagnostic {
    /// Returns true if this diagnostic is an error
    pub fn is_error(&self) -> bool {
        matches!(self, Diagnostic::Error(_))
    }

    /// Returns true if this diagnostic is a warning
    pub fn is_warning(&self) -> bool {
        matches!(self, Diagnostic::Warning(_))
    }

    fn span(&self) -> Option<Range<usize>> {
        match self {
            Diagnostic::Warning(Warning::Fallback { span, .. }) => span.clone(),
            Diagnostic::Error(error) => error.span.clone(),
            _ => None,
        }
    }

    fn message(&self) -> String {
        match self {
            Diagnostic::Warning(Warning::EmptyConfig { file_path }) => format!(
                "Config file '{}' is empty and has no effect",
                file_path.display()
            ),
            Diagnostic::Warning(Warning::Fallback {
                field_path,
                message,
                ..
            })
            | Diagnostic::Warning(Warning::ThresholdOrder {
                field_path,
                message,
            }) => format!("'{}': {}", field_path, message),
            Diagnostic::Error(error) => {
                format!("Validation error in '{}': {}", error.field_path, error.message)
            }
        }
    }
}

/// Format all diagnostics for display using Ariadne
///
/// Diagnostics with a known span are rendered against the config source,
/// the rest as plain lines.
pub fn format_diagnostics(diagnostics: &[Diagnostic], source: Option<&SourceInfo>) -> String {
    use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

    let mut output = Vec::new();

    for diagnostic in diagnostics {
        let (kind, color, prefix) = if diagnostic.is_error() {
            (ReportKind::Error, Color::Red, "Error")
        } else {
            (ReportKind::Warning, Color::Yellow, "Warning")
        };

        match (diagnostic.span(), source) {
            (Some(span), Some(source)) => {
                let file_id = source.file_path.to_string_lossy().to_string();
                Report::build(kind, (file_id.clone(), span.clone()))
                    .with_config(Config::default().with_index_type(IndexType::Byte))
                    .with_message(diagnostic.message())
                    .with_label(
                        Label::new((file_id.clone(), span))
                            .with_message("defined here")
                            .with_color(color),
                    )
                    .finish()
                    .write((file_id, Source::from(&source.content)), &mut output)
                    .ok();
            }
            _ => {
                let line = format!("{}: {}\n", prefix, diagnostic.message());
                output.extend_from_slice(line.as_bytes());
            }
        }
    }

    String::from_utf8_lossy(&output).to_string()
}
