//! Nested form objects module.
//!
//! # Examples
//!
//! ```rust
//! use nestform::forms::{FormConfig, UnknownIndexPolicy};
//!
//! let config = FormConfig::new().with_unknown_index(UnknownIndexPolicy::Reject);
//! assert_eq!(config.unknown_index, UnknownIndexPolicy::Reject);
//! ```

pub use nestform_forms::*;
