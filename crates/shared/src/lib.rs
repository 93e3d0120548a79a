//! Shared types, errors, and configuration for localprice.
//!
//! This crate provides common types used across all other crates:
//! - Uppercase ISO 4217 currency codes
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, CurrencySettings, ProviderSettings, ServerConfig};
pub use error::{AppError, AppResult};
pub use types::CurrencyCode;
