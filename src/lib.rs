//! Contour Prominence Calculator
//!
//! Computes topographic prominence for point peaks against a set of closed
//! contour polygons. Each peak walks the contours that enclose it, highest
//! first, and stops at the first band that also encloses a strictly higher peak.

pub mod config;
pub mod contour;
pub mod geometry;
pub mod io;
pub mod output;
pub mod peak;
pub mod pipeline;
pub mod preprocess;
pub mod prominence;

pub use config::{FieldNames, RunConfig};
pub use contour::{Contour, ContourId};
pub use geometry::{ContainmentPredicate, PlanarPredicate};
pub use output::{OutputAssembler, ProminenceReport, ProminentPeak, Summary};
pub use peak::{Elevation, Peak, Prominence, Relief};
pub use preprocess::{PreparedInput, Preprocessor};
pub use prominence::ProminenceCalculator;

use thiserror::Error;

/// Errors that can occur during prominence calculation
#[derive(Debug, Error)]
pub enum ProminenceError {
    /// I/O error when reading or writing files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed GeoJSON document
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An input collection holds no features
    #[error("{collection} collection is empty")]
    EmptyInput { collection: &'static str },

    #[error("{collection} feature {index}: missing attribute '{field}'")]
    MissingAttribute {
        collection: &'static str,
        index: usize,
        field: String,
    },

    #[error("{collection} feature {index}: invalid attribute '{field}': {reason}")]
    InvalidAttribute {
        collection: &'static str,
        index: usize,
        field: String,
        reason: String,
    },

    /// Geometry the containment predicate cannot evaluate
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A canonical contour that encloses no peak at search time
    #[error("contour {id} in the working set encloses no peaks")]
    EmptyContour { id: ContourId },
}

/// Result type for prominence calculations
pub type Result<T> = std::result::Result<T, ProminenceError>;
