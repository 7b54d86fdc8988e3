pub mod agent;
pub mod check;
pub mod config;
pub mod device;
pub mod discovery;
pub mod section;

pub use check::check_device;
pub use check::check_item;
pub use check::CheckOutcome;
pub use check::State;
pub use config::format_diagnostics;
pub use config::CheckParams;
pub use config::Config;
pub use config::Diagnostic;
pub use config::LogLevel;
pub use device::DeviceCategory;
pub use device::DeviceRecord;
pub use discovery::discover;
pub use discovery::Service;
pub use section::Section;
pub use section::SectionError;
