//! Direction vector synthesis
//!
//! The road is treated locally as a circle of radius `1/curvature` tangent to
//! the direction of travel (straight up the image). Moving a fixed arc length
//! along that circle gives the displacement returned here.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::{CurvatureEstimate, TrajError, TurnDirection};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Distance travelled along the tangent circle.
///
/// Units: pixels
pub const ARC_LENGTH_PX: f64 = 350.0;

/// Below this curvature the small angle limit is used instead of the circle.
///
/// Units: 1/pixels
pub const MIN_CURVATURE: f64 = 1e-12;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Recommended displacement in image pixels. `dy` is negative for forward
/// (up the image) motion, `dx` is negative to the left.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionVector {
    pub dx: f64,
    pub dy: f64,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Project `ARC_LENGTH_PX` along the tangent circle for the given curvature.
pub fn direction_vector(est: &CurvatureEstimate) -> Result<DirectionVector, TrajError> {
    arc_displacement(est.curvature, est.direction, ARC_LENGTH_PX)
}

/// Displacement after travelling `arc_length` along a circle of the given
/// curvature.
///
/// Uses `r (1 - cos(s/r)) = 2 sin^2(s/2r) / k`, which stays accurate as the
/// curvature approaches zero, and switches to the straight line limit
/// `(0, -s)` below `MIN_CURVATURE`.
pub fn arc_displacement(
    curvature: f64,
    direction: TurnDirection,
    arc_length: f64,
) -> Result<DirectionVector, TrajError> {
    if !curvature.is_finite() || curvature < 0.0 {
        return Err(TrajError::DegenerateCurvature(curvature));
    }

    let (lateral, dy) = if curvature < MIN_CURVATURE {
        (0.5 * arc_length * arc_length * curvature, -arc_length)
    } else {
        let theta = arc_length * curvature;
        let half_sin = (0.5 * theta).sin();
        (2.0 * half_sin * half_sin / curvature, -theta.sin() / curvature)
    };

    let dx = match direction {
        TurnDirection::Left => -lateral,
        TurnDirection::Right => lateral,
    };

    if !dx.is_finite() || !dy.is_finite() {
        return Err(TrajError::DegenerateCurvature(curvature));
    }

    Ok(DirectionVector { dx, dy })
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn est(curvature: f64, direction: TurnDirection) -> CurvatureEstimate {
        CurvatureEstimate {
            curvature,
            direction,
            row: 0.0,
        }
    }

    #[test]
    fn test_straight_road() -> Result<(), TrajError> {
        for &k in &[0.0, 1e-15, 1e-9] {
            let v = direction_vector(&est(k, TurnDirection::Left))?;
            assert!(v.dx.abs() < 1e-3);
            assert!((v.dy + ARC_LENGTH_PX).abs() < 1e-3);
        }

        Ok(())
    }

    #[test]
    fn test_matches_circle_formula() -> Result<(), TrajError> {
        let k = 1.0 / 350.0;
        let r = 350.0;

        let right = direction_vector(&est(k, TurnDirection::Right))?;
        assert!((right.dx - (r - r * 1f64.cos())).abs() < 1e-9);
        assert!((right.dy - (-r * 1f64.sin())).abs() < 1e-9);

        let left = direction_vector(&est(k, TurnDirection::Left))?;
        assert!((left.dx - (-r + r * 1f64.cos())).abs() < 1e-9);
        assert_eq!(left.dy, right.dy);

        Ok(())
    }

    #[test]
    fn test_chord_length() -> Result<(), TrajError> {
        // Chord of an arc of angle theta is 2 r sin(theta / 2)
        let k = 0.002;
        let v = direction_vector(&est(k, TurnDirection::Right))?;
        let chord = (v.dx * v.dx + v.dy * v.dy).sqrt();

        assert!((chord - 2.0 / k * (0.5 * ARC_LENGTH_PX * k).sin()).abs() < 1e-9);

        Ok(())
    }

    #[test]
    fn test_limit_is_continuous() -> Result<(), TrajError> {
        let below = arc_displacement(MIN_CURVATURE * 0.999, TurnDirection::Right, 350.0)?;
        let above = arc_displacement(MIN_CURVATURE * 1.001, TurnDirection::Right, 350.0)?;

        assert!((below.dx - above.dx).abs() < 1e-9);
        assert!((below.dy - above.dy).abs() < 1e-9);

        Ok(())
    }

    #[test]
    fn test_degenerate() {
        assert!(matches!(
            arc_displacement(f64::NAN, TurnDirection::Left, 350.0),
            Err(TrajError::DegenerateCurvature(_))
        ));
        assert!(matches!(
            arc_displacement(f64::INFINITY, TurnDirection::Left, 350.0),
            Err(TrajError::DegenerateCurvature(_))
        ));
    }
}
