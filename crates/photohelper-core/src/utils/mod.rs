//! Utility functions for display formatting.

pub mod format;

pub use format::truncate_string;
