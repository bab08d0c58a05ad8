pub mod incident_service;
pub mod monitor_service;
