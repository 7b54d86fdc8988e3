//! Device model for the router's smarthome device list.

mod category;
pub(crate) mod lenient;
mod record;

pub use category::DeviceCategory;
pub use record::DeviceData;
pub use record::DeviceRecord;
pub use record::HumidityData;
pub use record::PowerMeterData;
pub use record::SwitchData;
pub use record::TemperatureData;
pub use record::ThermostatData;
pub use record::TSOLL_OFF;
pub use record::UNKNOWN_PLACEHOLDER;
