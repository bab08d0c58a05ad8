pub mod config;
pub mod monitor_cache;
