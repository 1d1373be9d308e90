pub mod backup;
pub mod close;
pub mod config;
pub mod db;
pub mod delete;
pub mod export;
pub mod grid;
pub mod history;
pub mod import;
pub mod init;
pub mod km;
pub mod log;
pub mod maint;
pub mod service;
pub mod sync;
pub mod weeks;
