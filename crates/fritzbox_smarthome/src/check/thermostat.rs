use super::result::CheckOutcome;
use super::result::State;
use crate::config::ThermostatLevels;
use crate::config::ThermostatParams;
use crate::device::ThermostatData;

/// Grade a radiator thermostat: battery, reported flags, temperature
/// deviation from the target and the window-open state.
pub(super) fn check(hkr: &ThermostatData, params: &ThermostatParams, out: &mut CheckOutcome) {
    let actual = hkr.actual_celsius();
    out.metric("temp_actual", actual);

    if let Some(battery) = hkr.battery() {
        let level = battery as f64;
        if level < params.crit.battery_below {
            out.result(State::Crit, format!("Battery critically low: {}%", battery));
        } else if level < params.warn.battery_below {
            out.result(State::Warn, format!("Battery low: {}%", battery));
        }

        if params.battery_always {
            out.bounded_metric("battery", level, (0.0, 100.0));
        }
    }

    if hkr.battery_low() {
        if let Some(state) = flagged(params, |levels| levels.flag_battery) {
            out.result(state, "Battery low warning reported");
        }
    }

    if let Some(code) = hkr.error_code() {
        let state = flagged(params, |levels| levels.flag_error).unwrap_or(State::Ok);
        out.result(state, format!("Error code: {}", code));
    }

    out.result(State::Ok, format!("Temperature: {:.1}°C", actual));

    match hkr.target_celsius() {
        Some(target) if !hkr.summer_mode() => {
            out.metric("temp_target", target);

            let diff = (target - actual).abs();
            if diff > params.crit.diff_soll {
                out.result(
                    State::Crit,
                    format!("Temperature deviation too high: {:.1}°C", diff),
                );
            } else if diff > params.warn.diff_soll {
                out.result(State::Warn, format!("Temperature deviation: {:.1}°C", diff));
            }
        }
        _ => out.result(State::Ok, "Summer mode"),
    }

    if let Some(open) = hkr.window_open() {
        out.result(
            State::Ok,
            if open { "Window open" } else { "Window closed" },
        );
        out.metric("window_open", if open { 1.0 } else { 0.0 });
    }
}

/// State for a reported flag: crit tier first, then warn, `None` if neither
/// tier grades it.
fn flagged(params: &ThermostatParams, flag: impl Fn(&ThermostatLevels) -> bool) -> Option<State> {
    if flag(&params.crit) {
        Some(State::Crit)
    } else if flag(&params.warn) {
        Some(State::Warn)
    } else {
        None
    }
}
