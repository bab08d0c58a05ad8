pub mod incident_models;
pub mod monitor_models;
pub mod patch;
pub mod status_models;

pub use patch::Patch;
