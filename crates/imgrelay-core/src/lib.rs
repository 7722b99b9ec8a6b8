//! Imgrelay Core Library
//!
//! Shared configuration, error taxonomy, and upload validation used by the
//! storage, cloud, and API crates.

pub mod config;
pub mod error;
pub mod validation;

pub use config::Config;
pub use error::{AppError, LogLevel};
pub use validation::{UploadValidator, ValidationError};
