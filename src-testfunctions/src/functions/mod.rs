//! Test function implementations organized by category
//!
//! All functions are written in their usual minimization form.

pub mod multimodal;
pub mod unimodal;

pub use multimodal::*;
pub use unimodal::*;
