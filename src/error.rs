//! Errors reported when constructing planes and block views.
//!
//! Reconstruction itself never fails: once a view exists every predictor
//! is a total function, and out-of-frame motion-compensation samples are
//! resolved by edge clamping rather than by an error path.

use thiserror::Error;

/// Errors that can occur when building plane storage or block views.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RasterError {
    /// A plane dimension was zero.
    #[error("plane dimensions must be nonzero, got {width}x{height}")]
    EmptyPlane {
        /// Requested plane width in pixels.
        width: usize,
        /// Requested plane height in pixels.
        height: usize,
    },

    /// Plane dimensions were not multiples of the required block granularity.
    #[error("plane dimensions {width}x{height} are not multiples of {align}")]
    MisalignedPlane {
        /// Requested plane width in pixels.
        width: usize,
        /// Requested plane height in pixels.
        height: usize,
        /// Required alignment in pixels.
        align: usize,
    },

    /// A block view was requested with a dimension other than 4, 8 or 16.
    #[error("unsupported block size {0}, expected 4, 8 or 16")]
    UnsupportedBlockSize(usize),

    /// A block view would extend past the plane bounds.
    #[error("{size}x{size} block at ({x0}, {y0}) exceeds {width}x{height} plane")]
    BlockOutOfBounds {
        /// Block origin column in pixels.
        x0: usize,
        /// Block origin row in pixels.
        y0: usize,
        /// Block dimension in pixels.
        size: usize,
        /// Plane width in pixels.
        width: usize,
        /// Plane height in pixels.
        height: usize,
    },
}
