//! Shared helpers.
//!
//! This module provides:
//! - The retry controller wrapping a single fetch
//! - String sanitization for file names and terminal output
//! - CSS selector parsing without panics

mod retry;
pub mod sanitize;
mod selector;

pub use retry::{RetryController, RetryOutcome};
pub use selector::parse_selector_with_fallback;
