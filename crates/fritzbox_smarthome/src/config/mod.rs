mod config;
mod diagnostics;
mod partial;

pub use config::*;
pub use diagnostics::{format_diagnostics, Diagnostic, LoadError, SourceInfo, ValidationError, Warning};
pub use partial::PartialConfig;
