//! # Configuration
//!
//! Converter settings loaded from environment variables.

mod converter;

pub use converter::ConverterConfig;
