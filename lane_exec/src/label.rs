//! Steering labels
//!
//! Quantises the lateral part of a direction vector into three classes. Class
//! indices follow the order left, straight, right.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Default largest `|dx|` still counted as straight ahead.
///
/// Units: pixels
pub const DEFAULT_STRAIGHT_THRESHOLD_PX: f64 = 10.0;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SteerClass {
    Left,
    Straight,
    Right,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SteerClass {
    /// Classify a lateral displacement. `dx` exactly at `+/- threshold` is
    /// straight.
    pub fn from_dx(dx: f64, threshold: f64) -> Self {
        if dx < -threshold {
            SteerClass::Left
        } else if dx > threshold {
            SteerClass::Right
        } else {
            SteerClass::Straight
        }
    }

    /// Index of the class, `0` for left through `2` for right.
    pub fn index(&self) -> u8 {
        match self {
            SteerClass::Left => 0,
            SteerClass::Straight => 1,
            SteerClass::Right => 2,
        }
    }
}
