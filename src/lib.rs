//! Horizon Banking Library
//!
//! Re-exports modules for integration testing and external use.

pub mod actions;
pub mod api;
pub mod clients;
pub mod config;
pub mod domain;
pub mod home_view;
pub mod state;

mod error;

pub use config::Config;
pub use error::{AppError, AppResult, ErrorKind, ErrorResponse};
pub use state::AppState;
