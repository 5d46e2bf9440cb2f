//! # Config Crate
//!
//! Centralized configuration constants for the masonry generation
//! pipeline. All magic numbers and clamp floors are defined here to
//! ensure consistency across crates.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{EPSILON, MIN_OPENING_WIDTH};
//!
//! // Use EPSILON for floating-point comparisons
//! let value: f64 = 0.00000000001; // 1e-11, smaller than EPSILON (1e-10)
//! assert!(value.abs() < EPSILON);
//!
//! // Clamp degenerate user input instead of rejecting it
//! let width: f64 = -2.0;
//! let clamped = width.max(MIN_OPENING_WIDTH);
//! assert_eq!(clamped, MIN_OPENING_WIDTH);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Availability Over Strictness**: Floors exist so degenerate input clamps
//!   to the smallest legal value rather than failing the whole generation
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;
