use super::result::CheckOutcome;
use super::result::State;
use crate::config::HumidityParams;
use crate::device::DeviceRecord;
use crate::device::HumidityData;
use crate::device::PowerMeterData;
use crate::device::SwitchData;
use crate::device::TemperatureData;

/// Relative humidity, always exactly one finding.
pub(super) fn check_humidity(humidity: &HumidityData, params: &HumidityParams, out: &mut CheckOutcome) {
    let rh = humidity.relative();
    out.bounded_metric("humidity", rh as f64, (0.0, 100.0));

    let value = rh as f64;
    if params.crit.violated_by(value) {
        out.result(State::Crit, format!("Humidity critical: {}%", rh));
    } else if params.warn.violated_by(value) {
        out.result(State::Warn, format!("Humidity warning: {}%", rh));
    } else {
        out.result(State::Ok, format!("Humidity OK: {}%", rh));
    }
}

pub(super) fn check_temperature(temperature: &TemperatureData, out: &mut CheckOutcome) {
    let celsius = temperature.celsius();
    out.metric("temperature", celsius);
    out.result(State::Ok, format!("Temperature: {:.1}°C", celsius));
}

/// Battery fields reported directly on the device, independent of any
/// thermostat battery.
pub(super) fn check_device_battery(dev: &DeviceRecord, out: &mut CheckOutcome) {
    let level = dev.battery_level();
    let low = dev.battery_low();

    if let Some(level) = level {
        out.bounded_metric("battery_level", level as f64, (0.0, 100.0));
    }

    // Only the low-battery flag is graded
    let (state, summary) = match (level, low) {
        (None, None) => return,
        (Some(level), Some(true)) => (State::Warn, format!("Device battery low: {}%", level)),
        (Some(level), _) => (State::Ok, format!("Device battery: {}%", level)),
        (None, Some(true)) => (State::Warn, "Device battery low".to_string()),
        (None, Some(false)) => (State::Ok, "Device battery OK".to_string()),
    };
    out.result(state, summary);
}

pub(super) fn check_switch(switch: &SwitchData, out: &mut CheckOutcome) {
    let on = switch.is_on();
    out.metric("switch_state", if on { 1.0 } else { 0.0 });
    out.result(
        State::Ok,
        format!("Switch is {} ({})", if on { "ON" } else { "OFF" }, switch.mode()),
    );
}

/// Power, energy and voltage are each optional; a missing reading becomes a
/// WARN finding in place of its metric.
pub(super) fn check_powermeter(pm: &PowerMeterData, out: &mut CheckOutcome) {
    match pm.power() {
        Some(power) => {
            out.metric("power", power);
            out.result(State::Ok, format!("Power: {:.2}W", power));
        }
        None => out.result(State::Warn, "Power not available"),
    }

    match pm.energy() {
        Some(energy) => {
            out.metric("energy", energy);
            out.result(State::Ok, format!("Energy: {:.2}kWh", energy));
        }
        None => out.result(State::Warn, "Energy not available"),
    }

    match pm.voltage() {
        Some(voltage) => {
            out.metric("voltage", voltage);
            out.result(State::Ok, format!("Voltage: {:.1}V", voltage));
        }
        None => out.result(State::Warn, "Voltage not available"),
    }
}
