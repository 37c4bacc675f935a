pub mod app_config;
pub mod dashboard_api;
pub mod error;
pub mod startup;
