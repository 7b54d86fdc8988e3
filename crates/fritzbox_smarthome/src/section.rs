//! Agent section parsing.
//!
//! The router agent emits the device list as a single JSON document, possibly
//! preceded by a `<<<fritzbox_smarthome>>>` header and split over several
//! lines by the monitoring host.

use std::ops::Range;

use crate::device::DeviceRecord;

/// Snapshot of all devices from one polling cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    devices: Vec<DeviceRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum SectionError {
    #[error("Failed to parse device list: {error}")]
    Json {
        #[source]
        error: serde_json::Error,
        content: String,
    },
}

impl Section {
    /// Decode a JSON device list
    pub fn parse(text: &str) -> Result<Self, SectionError> {
        let devices = serde_json::from_str(text).map_err(|error| SectionError::Json {
            error,
            content: text.to_string(),
        })?;
        Ok(Self { devices })
    }

    /// Decode raw agent output: header lines are dropped and the remaining
    /// lines are concatenated without separators before decoding.
    pub fn from_agent_output(text: &str) -> Result<Self, SectionError> {
        let joined: String = text
            .lines()
            .filter(|line| !is_section_header(line))
            .collect();
        Self::parse(&joined)
    }

    pub fn devices(&self) -> &[DeviceRecord] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Look up a device by id. The first match wins if ids repeat.
    pub fn find(&self, id: &str) -> Option<&DeviceRecord> {
        self.devices.iter().find(|dev| dev.id() == Some(id))
    }
}

fn is_section_header(line: &str) -> bool {
    let line = line.trim();
    line.starts_with("<<<") && line.ends_with(">>>")
}

impl SectionError {
    /// Render the error with the offending document location highlighted.
    pub fn render(&self, source_name: &str) -> String {
        use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

        let SectionError::Json { error, content } = self;
        let span = json_error_span(content, error.line(), error.column());

        let mut output = Vec::new();
        Report::build(ReportKind::Error, (source_name.to_string(), span.clone()))
            .with_config(Config::default().with_index_type(IndexType::Byte))
            .with_message("Failed to parse device list")
            .with_label(
                Label::new((source_name.to_string(), span))
                    .with_message(error.to_string())
                    .with_color(Color::Red),
            )
            .finish()
            .write((source_name.to_string(), Source::from(content)), &mut output)
            .ok();

        String::from_utf8_lossy(&output).to_string()
    }
}

/// Convert serde_json's 1-based line/column into a byte range in `content`.
fn json_error_span(content: &str, line: usize, column: usize) -> Range<usize> {
    let line_start: usize = content
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let start = (line_start + column.saturating_sub(1)).min(content.len());
    let end = content
        .get(start..)
        .and_then(|rest| rest.chars().next())
        .map_or(start, |c| start + c.len_utf8());
    start..end
}
