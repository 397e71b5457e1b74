//! # kb-types
//!
//! Shared types for the assistant knowledge base: the [`Section`] unit of
//! retrievable text, layered [`Settings`] configuration, and the
//! configuration error type.

pub mod config;
pub mod error;
pub mod section;

pub use config::Settings;
pub use error::ConfigError;
pub use section::Section;
