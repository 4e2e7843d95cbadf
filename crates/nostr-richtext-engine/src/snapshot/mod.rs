//! # Snapshot Testing Support
//!
//! Utilities for checking parse results.
//!
//! ## Modules
//!
//! - **`outline`**: Renders a parsed document and its render plan as stable,
//!   line-oriented text for `insta` snapshots and the CLI
//! - **`invariants`**: Runtime checks for pipeline correctness (spans contiguous
//!   and in bounds, every span slicing back to its text, lossless reconstruction)

pub mod invariants;
pub mod outline;

pub use invariants::check as invariants;
pub use outline::{outline, render_plan_outline};
