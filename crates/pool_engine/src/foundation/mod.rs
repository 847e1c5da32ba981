//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the library:
//! - Math types for placements
//! - Logging utilities

pub mod logging;
pub mod math;
