pub mod alerts;
pub mod backup;
pub mod config;
pub mod context;
mod guards;
pub mod import;
pub mod log;
pub mod maintenance;
pub mod odometer;
pub mod ports;
pub mod query;
pub mod service;
pub mod sync;
pub mod week;
