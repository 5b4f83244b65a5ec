//! Main application modules.
//!
//! This module provides the pieces the CLI binary builds on: URL input
//! normalization and validation, Ctrl-C cancellation and the human-readable
//! report rendering.

pub mod render;
pub mod shutdown;
pub mod url;

// Re-export public API
pub use render::render_report;
pub use shutdown::cancel_on_ctrl_c;
pub use url::{normalize_url_input, parse_scan_url};
