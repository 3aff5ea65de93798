//! # Trajectory module
//!
//! Fits a quadratic to each lane's edges, averages the two into a centreline,
//! and converts the centreline's curvature into a direction vector.
//!
//! Curves map an image row to an image column, so a lane which is straight in
//! the image has zero curvature regardless of its slope.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod centreline;
mod curvature;
mod dir_vec;
mod quadratic;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

pub use centreline::*;
pub use curvature::*;
pub use dir_vec::*;
pub use quadratic::*;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, thiserror::Error)]
pub enum TrajError {
    #[error("Cannot fit a quadratic through {distinct_rows} distinct rows, at least 3 are needed")]
    InsufficientPoints { distinct_rows: usize },

    #[error("The least squares system for the quadratic fit is singular")]
    SingularFit,

    #[error("Curvature evaluated to an unusable value ({0})")]
    DegenerateCurvature(f64),
}
