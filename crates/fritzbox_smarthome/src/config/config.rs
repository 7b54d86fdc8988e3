use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use tracing_subscriber::filter::LevelFilter;

use super::diagnostics::{
    format_diagnostics, Diagnostic, LoadError, SourceInfo, ValidationError, Warning,
};
use super::partial::{
    PartialAgentParams, PartialCheckParams, PartialConfig, PartialHumidityBand,
    PartialLoggingConfig, PartialThermostatLevels,
};
use crate::agent::{AgentParams, Protocol, DEFAULT_PORT, DEFAULT_USERNAME};
use crate::check::State;

#[derive(Debug, Default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub params: CheckParams,
    /// Router access for the agent, only needed to build its command line
    pub agent: Option<AgentParams>,
}

// LogLevel needs Deserialize because it's used in PartialLoggingConfig with toml::Spanned
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: LogLevel,

    pub overrides: HashMap<String, LogLevel>,
}

/// How to grade a device the router cannot reach.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PresentPolicy {
    Ok,
    #[default]
    Warn,
    Crit,
    /// Anything else is graded WARN
    Unrecognized(String),
}

impl PresentPolicy {
    pub fn state(&self) -> State {
        match self {
            PresentPolicy::Ok => State::Ok,
            PresentPolicy::Warn => State::Warn,
            PresentPolicy::Crit => State::Crit,
            PresentPolicy::Unrecognized(_) => State::Warn,
        }
    }
}

impl From<String> for PresentPolicy {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ok" => Self::Ok,
            "warn" => Self::Warn,
            "crit" => Self::Crit,
            _ => Self::Unrecognized(s),
        }
    }
}

/// Check parameters for smarthome devices.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckParams {
    pub present: PresentPolicy,
    /// Discover HAN-FUN units (`showHFunit`)
    pub show_hanfun_units: bool,
    pub hkr: ThermostatParams,
    pub humidity: HumidityParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThermostatParams {
    /// Emit the battery metric for every thermostat (`hkr_bat_always`)
    pub battery_always: bool,
    pub warn: ThermostatLevels,
    pub crit: ThermostatLevels,
}

/// One severity tier of thermostat thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermostatLevels {
    /// Allowed deviation from the target temperature in °C (`hkr_diff_soll`)
    pub diff_soll: f64,
    /// Battery percentage below which this tier applies (`hkr_bat_below`)
    pub battery_below: f64,
    /// Grade a reported thermostat error code at this tier
    pub flag_error: bool,
    /// Grade the thermostat's own battery-low flag at this tier
    pub flag_battery: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HumidityParams {
    pub warn: HumidityBand,
    pub crit: HumidityBand,
}

/// Acceptable relative humidity band in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct HumidityBand {
    pub higher_than: f64,
    pub lower_than: f64,
}

impl HumidityBand {
    pub fn violated_by(&self, value: f64) -> bool {
        value > self.higher_than || value < self.lower_than
    }
}

impl Default for CheckParams {
    fn default() -> Self {
        Self {
            present: PresentPolicy::default(),
            show_hanfun_units: false,
            hkr: ThermostatParams::default(),
            humidity: HumidityParams::default(),
        }
    }
}

impl Default for ThermostatParams {
    fn default() -> Self {
        Self {
            battery_always: true,
            warn: ThermostatLevels::default_warn(),
            crit: ThermostatLevels::default_crit(),
        }
    }
}

impl ThermostatLevels {
    pub fn default_warn() -> Self {
        Self {
            diff_soll: 5.0,
            battery_below: 50.0,
            flag_error: false,
            flag_battery: false,
        }
    }

    pub fn default_crit() -> Self {
        Self {
            diff_soll: 10.0,
            battery_below: 30.0,
            flag_error: true,
            flag_battery: false,
        }
    }
}

impl Default for HumidityParams {
    fn default() -> Self {
        Self {
            warn: HumidityBand::default_warn(),
            crit: HumidityBand::default_crit(),
        }
    }
}

impl HumidityBand {
    pub fn default_warn() -> Self {
        Self {
            higher_than: 60.0,
            lower_than: 40.0,
        }
    }

    pub fn default_crit() -> Self {
        Self {
            higher_than: 70.0,
            lower_than: 30.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Invalid configuration:\n{0}")]
    Invalid(String),
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns the config together with any warnings and the file source the
    /// warnings point into. Validation errors are collected and reported
    /// together in [`ConfigError::Invalid`].
    pub fn from_file(
        path: impl AsRef<Path>,
    ) -> Result<(Self, Vec<Diagnostic>, Option<SourceInfo>), ConfigError> {
        let path = path.as_ref();
        let partial = PartialConfig::from_file(path)?;
        let source = partial.source.clone();

        let mut diagnostics = Vec::new();
        if partial.is_empty() {
            diagnostics.push(Diagnostic::Warning(Warning::EmptyConfig {
                file_path: path.to_path_buf(),
            }));
        }

        let (config, diagnostics) = Self::from_partial(partial, diagnostics)?;
        Ok((config, diagnostics, source))
    }

    /// Convert a PartialConfig to a Config, validating all fields
    ///
    /// Takes diagnostics from loading and adds validation diagnostics.
    pub fn from_partial(
        partial: PartialConfig,
        mut diagnostics: Vec<Diagnostic>,
    ) -> Result<(Self, Vec<Diagnostic>), ConfigError> {
        let logging = partial.logging.map(convert_logging).unwrap_or_default();
        let params = convert_params(partial.params.unwrap_or_default(), &mut diagnostics);
        let agent = partial
            .agent
            .map(|agent| convert_agent(agent, &mut diagnostics));

        validate_params(&params, &mut diagnostics);

        let has_errors = diagnostics.iter().any(|d| d.is_error());
        if has_errors {
            return Err(ConfigError::Invalid(format_diagnostics(
                &diagnostics,
                partial.source.as_ref(),
            )));
        }

        let config = Config {
            logging,
            params,
            agent: agent.flatten(),
        };
        Ok((config, diagnostics))
    }
}

fn convert_logging(partial: PartialLoggingConfig) -> LoggingConfig {
    LoggingConfig {
        level: partial.level.map(|s| *s.get_ref()).unwrap_or_default(),
        overrides: partial
            .overrides
            .map(|hm| hm.into_iter().map(|(k, v)| (k, *v.get_ref())).collect())
            .unwrap_or_default(),
    }
}

fn convert_params(partial: PartialCheckParams, diagnostics: &mut Vec<Diagnostic>) -> CheckParams {
    let present = match partial.present {
        Some(spanned) => {
            let span = spanned.span();
            let raw = match spanned.into_inner() {
                toml::Value::String(s) => s,
                other => other.to_string(),
            };
            let policy = PresentPolicy::from(raw);
            if let PresentPolicy::Unrecognized(ref raw) = policy {
                tracing::warn!(value = %raw, "unrecognized present choice, using warn");
                diagnostics.push(Diagnostic::Warning(Warning::Fallback {
                    field_path: "params.present".to_string(),
                    message: format!(
                        "unrecognized choice '{}', expected ok, warn or crit; offline devices are graded WARN",
                        raw
                    ),
                    span: Some(span),
                }));
            }
            policy
        }
        None => PresentPolicy::default(),
    };

    let hkr = partial.hkr.unwrap_or_default();
    let humidity = partial.humidity.unwrap_or_default();

    CheckParams {
        present,
        show_hanfun_units: partial.show_hanfun_units.unwrap_or(false),
        hkr: ThermostatParams {
            battery_always: hkr.hkr_bat_always.unwrap_or(true),
            warn: convert_levels(
                hkr.hkr_warn.unwrap_or_default(),
                ThermostatLevels::default_warn(),
                "params.hkr.hkr_warn",
                diagnostics,
            ),
            crit: convert_levels(
                hkr.hkr_crit.unwrap_or_default(),
                ThermostatLevels::default_crit(),
                "params.hkr.hkr_crit",
                diagnostics,
            ),
        },
        humidity: HumidityParams {
            warn: convert_band(
                humidity.humidity_warn.unwrap_or_default(),
                HumidityBand::default_warn(),
                "params.humidity.humidity_warn",
                diagnostics,
            ),
            crit: convert_band(
                humidity.humidity_crit.unwrap_or_default(),
                HumidityBand::default_crit(),
                "params.humidity.humidity_crit",
                diagnostics,
            ),
        },
    }
}

/// Missing fields fall back to the defaults of their own tier.
fn convert_levels(
    partial: PartialThermostatLevels,
    defaults: ThermostatLevels,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> ThermostatLevels {
    ThermostatLevels {
        diff_soll: checked_value(
            partial.hkr_diff_soll,
            defaults.diff_soll,
            &format!("{}.hkr_diff_soll", path),
            |v| v >= 0.0,
            "temperature deviation must not be negative",
            diagnostics,
        ),
        battery_below: checked_value(
            partial.hkr_bat_below,
            defaults.battery_below,
            &format!("{}.hkr_bat_below", path),
            is_percentage,
            "battery threshold must be between 0 and 100",
            diagnostics,
        ),
        flag_error: partial.hkr_flag_error.unwrap_or(defaults.flag_error),
        flag_battery: partial.hkr_flag_battery.unwrap_or(defaults.flag_battery),
    }
}

fn convert_band(
    partial: PartialHumidityBand,
    defaults: HumidityBand,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> HumidityBand {
    HumidityBand {
        higher_than: checked_value(
            partial.higher_than,
            defaults.higher_than,
            &format!("{}.higher_than", path),
            is_percentage,
            "humidity threshold must be between 0 and 100",
            diagnostics,
        ),
        lower_than: checked_value(
            partial.lower_than,
            defaults.lower_than,
            &format!("{}.lower_than", path),
            is_percentage,
            "humidity threshold must be between 0 and 100",
            diagnostics,
        ),
    }
}

fn is_percentage(v: f64) -> bool {
    (0.0..=100.0).contains(&v)
}

fn checked_value(
    value: Option<toml::Spanned<f64>>,
    default: f64,
    field_path: &str,
    valid: impl Fn(f64) -> bool,
    message: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> f64 {
    let Some(spanned) = value else {
        return default;
    };

    let v = *spanned.get_ref();
    if !valid(v) {
        diagnostics.push(Diagnostic::Error(ValidationError {
            field_path: field_path.to_string(),
            message: format!("{}, got {}", message, v),
            span: Some(spanned.span()),
        }));
        return default; // Default for error recovery
    }
    v
}

fn convert_agent(
    partial: PartialAgentParams,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<AgentParams> {
    let mut ok = true;

    let protocol: Protocol = match partial.protocol {
        Some(spanned) => match spanned.get_ref().parse() {
            Ok(protocol) => protocol,
            Err(_) => {
                diagnostics.push(Diagnostic::Error(ValidationError {
                    field_path: "agent.protocol".to_string(),
                    message: format!("expected http or https, got '{}'", spanned.get_ref()),
                    span: Some(spanned.span()),
                }));
                ok = false;
                Default::default()
            }
        },
        None => Default::default(),
    };

    let password = match partial.password {
        Some(password) => password,
        None => {
            diagnostics.push(Diagnostic::Error(ValidationError {
                field_path: "agent.password".to_string(),
                message: "password is required".to_string(),
                span: None,
            }));
            ok = false;
            String::new()
        }
    };

    ok.then(|| AgentParams {
        username: partial
            .username
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
        password,
        port: partial.port.unwrap_or(DEFAULT_PORT),
        protocol,
        ignore_ssl: partial.ignore_ssl.unwrap_or(false),
    })
}

/// Cross-tier checks: a crit tier that triggers later than its warn tier
/// means the WARN state can never be reached for that value.
fn validate_params(params: &CheckParams, diagnostics: &mut Vec<Diagnostic>) {
    let mut order = |field_path: &str, message: String| {
        diagnostics.push(Diagnostic::Warning(Warning::ThresholdOrder {
            field_path: field_path.to_string(),
            message,
        }));
    };

    let hkr = &params.hkr;
    if hkr.crit.diff_soll < hkr.warn.diff_soll {
        order(
            "params.hkr.hkr_crit.hkr_diff_soll",
            format!(
                "crit deviation {} is below warn deviation {}",
                hkr.crit.diff_soll, hkr.warn.diff_soll
            ),
        );
    }
    if hkr.crit.battery_below > hkr.warn.battery_below {
        order(
            "params.hkr.hkr_crit.hkr_bat_below",
            format!(
                "crit battery threshold {} is above warn threshold {}",
                hkr.crit.battery_below, hkr.warn.battery_below
            ),
        );
    }

    let humidity = &params.humidity;
    if humidity.crit.higher_than < humidity.warn.higher_than {
        order(
            "params.humidity.humidity_crit.higher_than",
            format!(
                "crit upper bound {} is below warn upper bound {}",
                humidity.crit.higher_than, humidity.warn.higher_than
            ),
        );
    }
    if humidity.crit.lower_than > humidity.warn.lower_than {
        order(
            "params.humidity.humidity_crit.lower_than",
            format!(
                "crit lower bound {} is above warn lower bound {}",
                humidity.crit.lower_than, humidity.warn.lower_than
            ),
        );
    }
}
