//! # Mesh Errors
//!
//! Error types for mesh synthesis operations.

use thiserror::Error;

/// Errors that can occur during mesh synthesis.
///
/// The builder downgrades per-record errors to logged skips, so none
/// of these escape the public `generate` call for documented inputs.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Degenerate geometry
    #[error("Degenerate geometry: {message}")]
    DegenerateGeometry { message: String },

    /// Invalid mesh topology
    #[error("Invalid topology: {message}")]
    InvalidTopology { message: String },
}

impl MeshError {
    /// Creates a degenerate geometry error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            message: message.into(),
        }
    }

    /// Creates an invalid topology error.
    pub fn invalid_topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
        }
    }
}
