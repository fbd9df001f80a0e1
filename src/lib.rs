//! # App Descriptor
//!
//! Builds the immutable descriptor for the "single page website" chat
//! application: identity, presentation strings, example prompts and the
//! backend endpoint the client talks to.
//!
//! ## Architecture
//! - Settings layer - defaults, YAML file, environment
//! - Descriptor factory - pure string concatenation with the app slug
//! - Startup validation - fail fast with a [`ConfigError`] naming the field

pub mod config;
pub mod constants;
pub mod descriptor;
pub mod error;
pub mod secret;

// Re-export commonly used types
pub use config::{Settings, SettingsBuilder};
pub use descriptor::{resolve_asset, ApplicationDescriptor};
pub use error::ConfigError;
pub use secret::Secret;
