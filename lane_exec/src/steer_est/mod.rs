//! # Steering estimator module
//!
//! Runs the full perception-to-steering pipeline on a single frame. The free
//! function [`compute_direction_vector`] is the whole pipeline with default
//! parameters, while [`SteerEst`] wraps it as a module with parameters,
//! archiving and status reports.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;
mod state;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use image::RgbImage;
use log::debug;
use serde::Serialize;

pub use params::*;
pub use state::*;

use crate::{
    per::{self, LaneBases, LanePair, LaneSide, PerError},
    traj::{self, CurvatureEstimate, DirectionVector, QuadraticCurve, TrajError},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Everything the pipeline worked out for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct SteerEstimate {
    pub bases: LaneBases,
    pub lane_curves: LanePair<QuadraticCurve>,
    pub centreline: QuadraticCurve,
    pub curvature: CurvatureEstimate,
    pub vector: DirectionVector,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Possible errors that can occur while estimating the steering vector.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SteerError {
    #[error("Perception failed: {0}")]
    Per(#[from] PerError),

    #[error("Could not fit the {side:?} lane: {source}")]
    LaneFit {
        side: LaneSide,
        #[source]
        source: TrajError,
    },

    #[error("Trajectory estimation failed: {0}")]
    Traj(#[from] TrajError),
}

/// Coarse classification of a [`SteerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SteerErrorKind {
    EmptyImage,
    NoLaneDetected,
    InsufficientPoints,
    DegenerateCurvature,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SteerError {
    pub fn kind(&self) -> SteerErrorKind {
        match self {
            SteerError::Per(PerError::EmptyImage) => SteerErrorKind::EmptyImage,
            SteerError::Per(PerError::NoLaneDetected { .. }) => SteerErrorKind::NoLaneDetected,
            SteerError::LaneFit { source, .. } | SteerError::Traj(source) => match source {
                TrajError::InsufficientPoints { .. } | TrajError::SingularFit => {
                    SteerErrorKind::InsufficientPoints
                }
                TrajError::DegenerateCurvature(_) => SteerErrorKind::DegenerateCurvature,
            },
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Compute the steering direction vector for a single RGB frame.
pub fn compute_direction_vector(image: &RgbImage) -> Result<DirectionVector, SteerError> {
    Ok(estimate(image, &Params::default())?.vector)
}

/// Run the full pipeline on a frame, keeping the intermediate results.
pub fn estimate(image: &RgbImage, params: &Params) -> Result<SteerEstimate, SteerError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PerError::EmptyImage.into());
    }

    // ---- PERCEPTION ----

    let mask = per::bright_pixels(image);
    let bases = per::locate_lane_bases(&mask)?;
    let lanes = per::track_lanes(&mask, &bases);
    let edges = per::lanes_edges(&lanes);

    // ---- TRAJECTORY ----

    let lane_curves = edges.try_map(|side, edge_mask| {
        QuadraticCurve::fit_mask(&edge_mask).map_err(|source| SteerError::LaneFit { side, source })
    })?;

    let unify = params.unify_domain.resolve(mask.nrows());
    let centreline = traj::centreline(&lane_curves, unify);
    let curvature = traj::estimate_curvature(&centreline)?;
    let vector = traj::direction_vector(&curvature)?;

    debug!(
        "Bases ({}, {}), curvature {:.3e} {:?}, vector ({:.2}, {:.2})",
        bases.left, bases.right, curvature.curvature, curvature.direction, vector.dx, vector.dy
    );

    Ok(SteerEstimate {
        bases,
        lane_curves,
        centreline,
        curvature,
        vector,
    })
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::per::synthetic_stripes;
    use image::Rgb;

    #[test]
    fn test_two_straight_stripes() -> Result<(), SteerError> {
        let img = synthetic_stripes(400, 360, &[100, 300], 10);
        let est = estimate(&img, &Params::default())?;

        assert!((est.bases.left as i64 - 100).abs() <= 2);
        assert!((est.bases.right as i64 - 300).abs() <= 2);
        assert!(est.curvature.curvature < 1e-9);
        assert!(est.vector.dx.abs() < 1.0);
        assert!((est.vector.dy + 350.0).abs() < 1e-3);

        // Centreline sits half way between the stripes
        assert!((est.centreline.eval(180.0) - 200.0).abs() < 1.0);
        assert_eq!(est.centreline.domain(), (0.0, 359.0));

        let v = compute_direction_vector(&img)?;
        assert_eq!(v, est.vector);

        Ok(())
    }

    #[test]
    fn test_reference_domain_agrees() -> Result<(), SteerError> {
        let img = synthetic_stripes(400, 360, &[100, 300], 10);
        let a = estimate(&img, &Params::default())?;
        let b = estimate(
            &img,
            &Params {
                unify_domain: crate::traj::UnifyDomain::reference(),
                ..Params::default()
            },
        )?;

        assert!((a.vector.dx - b.vector.dx).abs() < 1e-6);
        assert!((a.vector.dy - b.vector.dy).abs() < 1e-6);

        Ok(())
    }

    #[test]
    fn test_curving_lanes_turn_right() -> Result<(), SteerError> {
        // Lanes whose column grows with the square of the distance from the
        // top of the frame bend the same way as col = a row^2 with a > 0
        let (w, h) = (500u32, 360u32);
        let mut img = RgbImage::from_pixel(w, h, Rgb([10, 10, 10]));
        for y in 0..h {
            let shift = (0.0005 * (y as f64).powi(2)) as u32;
            for &base in &[60u32, 280] {
                for x in (base + shift)..(base + shift + 12) {
                    img.put_pixel(x, y, Rgb([240, 240, 240]));
                }
            }
        }

        let est = estimate(&img, &Params::default())?;

        assert_eq!(est.curvature.direction, crate::traj::TurnDirection::Right);
        assert!(est.curvature.curvature > 0.0);
        assert!(est.vector.dx > 0.0);
        assert!(est.vector.dy < 0.0);

        Ok(())
    }

    #[test]
    fn test_dark_frame_fails() {
        let img = RgbImage::from_pixel(200, 100, Rgb([100, 100, 100]));
        let err = compute_direction_vector(&img).unwrap_err();
        assert_eq!(err.kind(), SteerErrorKind::NoLaneDetected);
    }

    #[test]
    fn test_empty_frame_fails() {
        let img = RgbImage::new(0, 0);
        let err = compute_direction_vector(&img).unwrap_err();
        assert_eq!(err.kind(), SteerErrorKind::EmptyImage);
    }

    #[test]
    fn test_short_lane_fails_fit() {
        // Stripes only in the bottom few rows survive base location but
        // are wiped out by erosion
        let (w, h) = (400u32, 200u32);
        let mut img = RgbImage::from_pixel(w, h, Rgb([0, 0, 0]));
        for y in (h - 4)..h {
            for &c in &[100u32, 300] {
                for x in c..(c + 2) {
                    img.put_pixel(x, y, Rgb([255, 255, 255]));
                }
            }
        }

        let err = compute_direction_vector(&img).unwrap_err();
        assert_eq!(err.kind(), SteerErrorKind::InsufficientPoints);
        assert!(matches!(
            err,
            SteerError::LaneFit {
                side: LaneSide::Left,
                ..
            }
        ));
    }
}
