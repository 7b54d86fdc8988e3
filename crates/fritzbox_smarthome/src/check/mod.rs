//! Threshold evaluation for discovered smarthome devices.
//!
//! A check run is a pure function of the device id, the check parameters and
//! the current section. Failures never escape as errors: a missing device is
//! reported as CRIT, unreachable devices are graded per configuration and
//! missing or malformed fields fall back to defaults.

mod result;
mod sensors;
mod thermostat;


use tracing::debug;

pub use result::CheckOutcome;
pub use result::CheckOutput;
pub use result::CheckResult;
pub use result::Metric;
pub use result::State;

use crate::config::CheckParams;
use crate::discovery::device_id_from_item;
use crate::section::Section;

/// Check the device named by a discovery item (`"<category> <id> <name>"`).
pub fn check_item(item: &str, params: &CheckParams, section: &Section) -> CheckOutcome {
    match device_id_from_item(item) {
        Some(id) => check_device(id, params, section),
        None => {
            debug!(item, "service item carries no device id");
            not_found()
        }
    }
}

/// Check a single device of the section.
pub fn check_device(device_id: &str, params: &CheckParams, section: &Section) -> CheckOutcome {
    let Some(dev) = section.find(device_id) else {
        debug!(device_id, "device not found in section");
        return not_found();
    };

    let mut out = CheckOutcome::new();

    if !dev.is_present() {
        let state = params.present.state();
        debug!(device_id, %state, "device not present");
        out.result(state, "Device not present");
        return out;
    }

    out.result(State::Ok, dev.header());

    let data = &dev.data;
    if let Some(hkr) = &data.hkr {
        thermostat::check(hkr, &params.hkr, &mut out);
    }
    if let Some(humidity) = &data.humidity {
        sensors::check_humidity(humidity, &params.humidity, &mut out);
    }
    if let Some(temperature) = &data.temperature {
        sensors::check_temperature(temperature, &mut out);
    }
    sensors::check_device_battery(dev, &mut out);
    if let Some(switch) = &data.switch {
        sensors::check_switch(switch, &mut out);
    }
    if let Some(pm) = &data.powermeter {
        sensors::check_powermeter(pm, &mut out);
    }

    out
}

fn not_found() -> CheckOutcome {
    let mut out = CheckOutcome::new();
    out.result(State::Crit, "Device not found");
    out
}
