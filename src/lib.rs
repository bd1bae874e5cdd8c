//! Sparetrack - Spare Parts Inspection Tracking Server
//!
//! Core of an inventory tracker for physical equipment: the inspection
//! lifecycle calculator, the schema version migrator, and the automated
//! backup scheduler with retention sweeping. The HTTP layer sits outside
//! this crate and talks to the `services` surface.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod migrator;
pub mod models;
pub mod repository;
pub mod scheduler;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
