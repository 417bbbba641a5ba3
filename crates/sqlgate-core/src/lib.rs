//! SQLGate Core
//!
//! Core domain model for conditional SQL template processing: parameter
//! values and their canonical text form, the processed-template result,
//! error types, and the configuration schema.

pub mod config;
pub mod error;
pub mod template;
pub mod value;

pub use config::{Config, ConfigError, RenderConfig};
pub use error::TemplateError;
pub use template::{ProcessTemplate, ProcessedTemplate};
pub use value::{canonical_text, ParamMap};
