pub mod configs;
pub mod grid;
pub mod initialize;
pub mod km_history;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod records;
pub mod repository;
pub mod services;
pub mod stats;
