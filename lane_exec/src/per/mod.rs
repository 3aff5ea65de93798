//! # Perception module
//!
//! Converts an RGB camera frame into a pair of lane edge masks. All masks are
//! `ndarray` boolean arrays indexed `[row, column]` with the same shape as the
//! frame they came from.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod bright_mask;
pub mod lane_base;
pub mod lane_edges;
pub mod morph;
pub mod window_track;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use image::{Rgb, RgbImage};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use bright_mask::*;
pub use lane_base::*;
pub use lane_edges::*;
pub use window_track::*;

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// A boolean mask indexed `[row, column]`.
pub type BinaryMask = Array2<bool>;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A value held for each of the two lanes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LanePair<T> {
    pub left: T,
    pub right: T,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// One of the two lane boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneSide {
    Left,
    Right,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PerError {
    #[error("The provided image was empty")]
    EmptyImage,

    #[error(
        "Could not split the base histogram into two lanes ({num_strong} strong columns, \
         {num_low} below the split, {num_high} above)"
    )]
    NoLaneDetected {
        num_strong: usize,
        num_low: usize,
        num_high: usize,
    },
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<T> LanePair<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    /// Apply `f` to both sides, passing in which side is being mapped.
    pub fn map<U, F>(self, mut f: F) -> LanePair<U>
    where
        F: FnMut(LaneSide, T) -> U,
    {
        LanePair {
            left: f(LaneSide::Left, self.left),
            right: f(LaneSide::Right, self.right),
        }
    }

    /// Like `map` but stops at the first side which fails.
    pub fn try_map<U, E, F>(self, mut f: F) -> Result<LanePair<U>, E>
    where
        F: FnMut(LaneSide, T) -> Result<U, E>,
    {
        Ok(LanePair {
            left: f(LaneSide::Left, self.left)?,
            right: f(LaneSide::Right, self.right)?,
        })
    }

    pub fn as_ref(&self) -> LanePair<&T> {
        LanePair {
            left: &self.left,
            right: &self.right,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Build a dark frame with full-height bright vertical stripes.
///
/// Each stripe is `stripe_width` pixels wide and centred on one of
/// `centre_cols`. Used to exercise the pipeline without camera data.
pub fn synthetic_stripes(
    width: u32,
    height: u32,
    centre_cols: &[u32],
    stripe_width: u32,
) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, Rgb([20, 20, 20]));
    let half = stripe_width / 2;

    for &centre in centre_cols {
        let start = centre.saturating_sub(half);
        let end = (start + stripe_width).min(width);

        for x in start..end {
            for y in 0..height {
                img.put_pixel(x, y, Rgb([250, 250, 250]));
            }
        }
    }

    img
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
