use std::fmt;

use serde::Serialize;
use strum::Display;

/// Monitoring state of a single finding, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum State {
    Ok,
    Warn,
    Crit,
}

impl State {
    /// Worst of all states, OK for an empty iterator
    pub fn worst(states: impl IntoIterator<Item = State>) -> State {
        states.into_iter().max().unwrap_or(State::Ok)
    }

    /// Monitoring-plugin exit code
    pub fn exit_code(self) -> i32 {
        match self {
            State::Ok => 0,
            State::Warn => 1,
            State::Crit => 2,
        }
    }

    fn marker(self) -> &'static str {
        match self {
            State::Ok => "",
            State::Warn => " (!)",
            State::Crit => " (!!)",
        }
    }
}

/// A graded finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub state: State,
    pub summary: String,
}

/// A named measurement, optionally bounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub name: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundaries: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckOutput {
    Result(CheckResult),
    Metric(Metric),
}

/// Ordered output of one check run for one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckOutcome {
    outputs: Vec<CheckOutput>,
}

impl CheckOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result(&mut self, state: State, summary: impl Into<String>) {
        self.outputs.push(CheckOutput::Result(CheckResult {
            state,
            summary: summary.into(),
        }));
    }

    pub fn metric(&mut self, name: &str, value: f64) {
        self.outputs.push(CheckOutput::Metric(Metric {
            name: name.to_string(),
            value,
            boundaries: None,
        }));
    }

    pub fn bounded_metric(&mut self, name: &str, value: f64, boundaries: (f64, f64)) {
        self.outputs.push(CheckOutput::Metric(Metric {
            name: name.to_string(),
            value,
            boundaries: Some(boundaries),
        }));
    }

    pub fn outputs(&self) -> &[CheckOutput] {
        &self.outputs
    }

    pub fn results(&self) -> impl Iterator<Item = &CheckResult> {
        self.outputs.iter().filter_map(|output| match output {
            CheckOutput::Result(result) => Some(result),
            CheckOutput::Metric(_) => None,
        })
    }

    pub fn metrics(&self) -> impl Iterator<Item = &Metric> {
        self.outputs.iter().filter_map(|output| match output {
            CheckOutput::Metric(metric) => Some(metric),
            CheckOutput::Result(_) => None,
        })
    }

    pub fn metric_value(&self, name: &str) -> Option<f64> {
        self.metrics().find(|m| m.name == name).map(|m| m.value)
    }

    pub fn state(&self) -> State {
        State::worst(self.results().map(|r| r.state))
    }

    /// Render as one monitoring-plugin line:
    /// `STATE - summary, summary (!) | name=value;;;min;max`
    pub fn render(&self) -> String {
        let summaries: Vec<String> = self
            .results()
            .map(|r| format!("{}{}", r.summary, r.state.marker()))
            .collect();

        let mut line = format!("{} - {}", self.state(), summaries.join(", "));

        let perfdata: Vec<String> = self.metrics().map(|m| m.to_string()).collect();
        if !perfdata.is_empty() {
            line.push_str(" | ");
            line.push_str(&perfdata.join(" "));
        }
        line
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if let Some((min, max)) = self.boundaries {
            write!(f, ";;;{};{}", min, max)?;
        }
        Ok(())
    }
}
