pub mod incident_routes;
pub mod monitor_routes;
pub mod status_routes;
