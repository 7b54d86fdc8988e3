//! Service discovery.
//!
//! Every device becomes one service whose item is
//! `"<category> <id> <name>"`. The id is always the second token, so names
//! containing spaces do not disturb the lookup at check time.

use serde::Serialize;
use tracing::debug;
use tracing::warn;

use crate::config::CheckParams;
use crate::device::DeviceCategory;
use crate::device::DeviceRecord;
use crate::section::Section;

/// A discovered service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub item: String,
    pub category: DeviceCategory,
}

/// Build the discovery item for a device, `None` if it has no id.
pub fn service_item(dev: &DeviceRecord) -> Option<String> {
    let id = dev.id()?;
    Some(format!("{} {} {}", dev.category(), id, dev.display_name()))
}

/// Extract the device id from a discovery item.
pub fn device_id_from_item(item: &str) -> Option<&str> {
    item.split_whitespace().nth(1)
}

/// Discover one service per device, in section order.
///
/// HAN-FUN units are only discovered when `showHFunit` is enabled.
pub fn discover(section: &Section, params: &CheckParams) -> Vec<Service> {
    section
        .devices()
        .iter()
        .filter_map(|dev| {
            let category = dev.category();
            if category == DeviceCategory::HanfunUnit && !params.show_hanfun_units {
                debug!(id = dev.id(), "skipping HAN-FUN unit");
                return None;
            }

            let Some(item) = service_item(dev) else {
                warn!(name = dev.display_name(), "device without id, not discoverable");
                return None;
            };

            debug!(%item, "discovered service");
            Some(Service { item, category })
        })
        .collect()
}
