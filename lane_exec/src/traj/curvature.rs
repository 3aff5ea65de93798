//! Curvature and turn direction of a curve

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;
use serde::{Deserialize, Serialize};

use super::{QuadraticCurve, TrajError};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Curvature of the centreline at a single row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvatureEstimate {
    /// Magnitude of the curvature, `1/radius`.
    ///
    /// Units: 1/pixels
    pub curvature: f64,

    /// Direction of the turn
    pub direction: TurnDirection,

    /// Row the curvature was evaluated at
    pub row: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnDirection {
    Left,
    Right,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Planar curvature `|p''| / (1 + p'^2)^1.5` of the curve at `row`.
pub fn curvature_at(curve: &QuadraticCurve, row: f64) -> f64 {
    let d1 = curve.deriv(row);
    let d2 = curve.second_deriv();

    d2.abs() / (1.0 + d1 * d1).powf(1.5)
}

/// Estimate curvature and turn direction at the middle of the curve's domain.
///
/// A positive second derivative is a right turn, anything else (including an
/// exactly straight curve) is a left turn.
pub fn estimate_curvature(curve: &QuadraticCurve) -> Result<CurvatureEstimate, TrajError> {
    let row = curve.domain_mid();
    let curvature = curvature_at(curve, row);

    if !curvature.is_finite() {
        return Err(TrajError::DegenerateCurvature(curvature));
    }

    let direction = if curve.second_deriv() > 0.0 {
        TurnDirection::Right
    } else {
        TurnDirection::Left
    };

    trace!(
        "Curvature at row {:.1}: {:.3e} to the {:?}",
        row,
        curvature,
        direction
    );

    Ok(CurvatureEstimate {
        curvature,
        direction,
        row,
    })
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
