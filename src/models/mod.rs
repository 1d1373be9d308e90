pub mod alert;
pub mod control_record;
pub mod control_state;
pub mod km_history;
pub mod maintenance_config;
pub mod service_event;
pub mod vehicle;
pub mod week;
