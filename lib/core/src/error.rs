//! Error handling foundation for switchboard.
//!
//! This module provides only the `Result` type alias using rootcause.
//! Each crate defines its own domain-specific outcome and error types
//! in their own modules; layered context is added via rootcause's
//! `.context()` as errors propagate toward the process boundary.

use rootcause::Report;

/// A Result type alias using rootcause's Report for error handling.
///
/// Each layer adds its own context via `.context()` as errors propagate.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
