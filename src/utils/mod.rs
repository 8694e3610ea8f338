//! Utility functions
//!
//! Pure helpers for validation, dates, string shaping and colors.
//! Nothing in here touches the filesystem or holds mutable state.

pub mod color;
pub mod dates;
pub mod strings;
pub mod validation;
