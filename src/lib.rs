pub mod analytics;
pub mod clock;
pub mod config;
pub mod models;
pub mod reporting;
pub mod storage;
