use serde::Serialize;
use strum::Display;
use strum::EnumIter;
use strum::EnumString;

/// Coarse device category derived from the AHA function bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum DeviceCategory {
    #[strum(serialize = "HANFUNDevice")]
    HanfunDevice,
    #[strum(serialize = "HANFUNUnit")]
    HanfunUnit,
    AlarmSensor,
    Button,
    Thermostat,
    Switch,
    Powermeter,
    #[strum(serialize = "DECTRepeater")]
    DectRepeater,
    TemperatureSensor,
    Microphone,
    Light,
    SmarthomeDevice,
}

/// Bit tests in priority order. The first matching bit decides the category.
const PRIORITY: &[(&[u32], DeviceCategory)] = &[
    (&[0], DeviceCategory::HanfunDevice),
    (&[13], DeviceCategory::HanfunUnit),
    (&[4], DeviceCategory::AlarmSensor),
    (&[5], DeviceCategory::Button),
    (&[6], DeviceCategory::Thermostat),
    (&[9], DeviceCategory::Switch),
    (&[7], DeviceCategory::Powermeter),
    (&[10], DeviceCategory::DectRepeater),
    (&[8], DeviceCategory::TemperatureSensor),
    (&[11], DeviceCategory::Microphone),
    (&[2, 17], DeviceCategory::Light),
];

impl DeviceCategory {
    pub fn from_bitmask(bitmask: u64) -> Self {
        PRIORITY
            .iter()
            .find(|(bits, _)| bits.iter().any(|bit| bitmask >> bit & 1 == 1))
            .map(|(_, category)| *category)
            .unwrap_or(DeviceCategory::SmarthomeDevice)
    }
}

impl Serialize for DeviceCategory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
