//! Quality-check gate.
//!
//! A quality check is always created against an existing mission; creating
//! the first one is the canonical way a mission enters QUALITY_CHECK.

pub mod store;
mod types;

pub use types::{QualityCheck, QualityCheckPatch, QualityStatus};
