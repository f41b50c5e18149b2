//! Settings loading and the collaborators that consume them for the AVK Events
//! web application.
//!
//! `service::config::load` reads the process environment once into an
//! immutable [`config::Settings`]; everything else receives that value through
//! [`state::AppState`].

pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod service;
pub mod state;

pub use config::Settings;
pub use error::{AppError, AppResult, ConfigError};
pub use service::config::load;
