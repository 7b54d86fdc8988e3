use serde::Deserialize;

use super::category::DeviceCategory;
use super::lenient;

/// Placeholder shown for display strings the router did not report.
pub const UNKNOWN_PLACEHOLDER: &str = "?";

/// Raw `tsoll` value the router reports while heating is switched off.
pub const TSOLL_OFF: i64 = 253;

/// One smarthome device as reported by the router agent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeviceRecord {
    /// Stable device identifier, unique within a section
    #[serde(default, deserialize_with = "lenient::scalar")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient::scalar")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::scalar")]
    pub manufacturer: Option<String>,

    #[serde(default, deserialize_with = "lenient::scalar")]
    pub productname: Option<String>,

    /// Reachability, `"1"` when the router can talk to the device
    #[serde(default, deserialize_with = "lenient::scalar")]
    pub present: Option<String>,

    #[serde(default, deserialize_with = "lenient::scalar")]
    pub functionbitmask: Option<String>,

    /// Generic battery level in percent (not the thermostat one)
    #[serde(default, deserialize_with = "lenient::scalar")]
    pub battery: Option<String>,

    #[serde(default, deserialize_with = "lenient::scalar")]
    pub batterylow: Option<String>,

    #[serde(default)]
    pub data: DeviceData,
}

/// Capability sub-records. Each is present only when the device exposes it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeviceData {
    #[serde(default)]
    pub hkr: Option<ThermostatData>,

    #[serde(default)]
    pub humidity: Option<HumidityData>,

    #[serde(default)]
    pub temperature: Option<TemperatureData>,

    #[serde(default)]
    pub switch: Option<SwitchData>,

    #[serde(default)]
    pub powermeter: Option<PowerMeterData>,
}

/// Radiator thermostat (HKR). Temperatures are in half degrees Celsius.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ThermostatData {
    #[serde(default, deserialize_with = "lenient::scalar")]
    pub tist: Option<String>,

    #[serde(default, deserialize_with = "lenient::scalar")]
    pub tsoll: Option<String>,

    #[serde(default, deserialize_with = "lenient::scalar")]
    pub battery: Option<String>,

    #[serde(default, deserialize_with = "lenient::scalar")]
    pub batterylow: Option<String>,

    #[serde(default, deserialize_with = "lenient::scalar")]
    pub errorcode: Option<String>,

    #[serde(default, deserialize_with = "lenient::scalar")]
    pub windowopenactiv: Option<String>,

    #[serde(default, deserialize_with = "lenient::scalar")]
    pub summeractive: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HumidityData {
    #[serde(default, deserialize_with = "lenient::scalar")]
    pub rel_humidity: Option<String>,
}

/// Temperature sensor, `celsius` is in tenths of a degree.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TemperatureData {
    #[serde(default, deserialize_with = "lenient::scalar")]
    pub celsius: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SwitchData {
    #[serde(default, deserialize_with = "lenient::scalar")]
    pub state: Option<String>,

    #[serde(default, deserialize_with = "lenient::scalar")]
    pub mode: Option<String>,
}

/// Power meter: power in mW, energy in Wh, voltage in mV.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PowerMeterData {
    #[serde(default, deserialize_with = "lenient::scalar")]
    pub power: Option<String>,

    #[serde(default, deserialize_with = "lenient::scalar")]
    pub energy: Option<String>,

    #[serde(default, deserialize_with = "lenient::scalar")]
    pub voltage: Option<String>,
}

impl DeviceRecord {
    /// Device id, `None` when absent or not usable as an item token
    /// (empty or containing whitespace).
    pub fn id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty() && !id.contains(char::is_whitespace))
    }

    /// Display name, falling back to the placeholder
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_PLACEHOLDER)
    }

    /// Capability flags; absent or malformed masks count as no capabilities.
    pub fn function_bitmask(&self) -> u64 {
        lenient::parse_i64(self.functionbitmask.as_deref())
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(0)
    }

    pub fn category(&self) -> DeviceCategory {
        DeviceCategory::from_bitmask(self.function_bitmask())
    }

    /// Only the literal `"1"` counts as reachable.
    pub fn is_present(&self) -> bool {
        self.present.as_deref() == Some("1")
    }

    /// "manufacturer product (name)" header line
    pub fn header(&self) -> String {
        format!(
            "{} {} ({})",
            self.manufacturer.as_deref().unwrap_or(UNKNOWN_PLACEHOLDER),
            self.productname.as_deref().unwrap_or(UNKNOWN_PLACEHOLDER),
            self.display_name(),
        )
    }

    pub fn battery_level(&self) -> Option<i64> {
        lenient::parse_i64(self.battery.as_deref())
    }

    pub fn battery_low(&self) -> Option<bool> {
        lenient::parse_flag(self.batterylow.as_deref())
    }
}

impl ThermostatData {
    /// Actual temperature in °C, 0 when unreported
    pub fn actual_celsius(&self) -> f64 {
        lenient::parse_f64(self.tist.as_deref()).unwrap_or(0.0) / 2.0
    }

    /// Target temperature in °C, `None` while the router reports heating off.
    pub fn target_celsius(&self) -> Option<f64> {
        let raw = lenient::parse_f64(self.tsoll.as_deref()).unwrap_or(0.0);
        if raw == TSOLL_OFF as f64 {
            None
        } else {
            Some(raw / 2.0)
        }
    }

    /// Heating is disabled, either by the summer schedule or the off sentinel.
    pub fn summer_mode(&self) -> bool {
        self.target_celsius().is_none()
            || lenient::parse_flag(self.summeractive.as_deref()).unwrap_or(false)
    }

    pub fn battery(&self) -> Option<i64> {
        lenient::parse_i64(self.battery.as_deref())
    }

    pub fn battery_low(&self) -> bool {
        lenient::parse_flag(self.batterylow.as_deref()).unwrap_or(false)
    }

    /// Non-zero error code reported by the thermostat, if any
    pub fn error_code(&self) -> Option<i64> {
        lenient::parse_i64(self.errorcode.as_deref()).filter(|code| *code != 0)
    }

    pub fn window_open(&self) -> Option<bool> {
        lenient::parse_flag(self.windowopenactiv.as_deref())
    }
}

impl HumidityData {
    /// Relative humidity in percent, 0 when unreported
    pub fn relative(&self) -> i64 {
        lenient::parse_i64(self.rel_humidity.as_deref()).unwrap_or(0)
    }
}

impl TemperatureData {
    pub fn celsius(&self) -> f64 {
        lenient::parse_f64(self.celsius.as_deref()).unwrap_or(0.0) / 10.0
    }
}

impl SwitchData {
    pub fn is_on(&self) -> bool {
        self.state.as_deref() == Some("1")
    }

    pub fn mode(&self) -> &str {
        self.mode.as_deref().unwrap_or("unknown")
    }
}

impl PowerMeterData {
    /// Watts
    pub fn power(&self) -> Option<f64> {
        lenient::parse_f64(self.power.as_deref()).map(|v| v / 1000.0)
    }

    /// Kilowatt hours
    pub fn energy(&self) -> Option<f64> {
        lenient::parse_f64(self.energy.as_deref()).map(|v| v / 1000.0)
    }

    /// Volts
    pub fn voltage(&self) -> Option<f64> {
        lenient::parse_f64(self.voltage.as_deref()).map(|v| v / 1000.0)
    }
}
