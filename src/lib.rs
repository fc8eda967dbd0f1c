//! Daily solar generation forecasting service.
//!
//! Historical cumulative-generation measurements are read from storage, a
//! pre-trained seasonal model predicts the next six days of hourly increments,
//! and the summed forecast is appended to the `forecast` table. The same run is
//! reachable from the HTTP front page and from a daily scheduler.

pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod forecast;
pub mod ml;
pub mod repo;
pub mod scheduler;
pub mod telemetry;
