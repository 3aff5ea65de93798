//! # Lane steering library.
//!
//! Estimates a steering correction from a single road-facing camera frame. The
//! pipeline runs strictly in order:
//!
//!  1. [`per::bright_mask`] - threshold the frame into candidate marking pixels
//!  2. [`per::lane_base`] - find where the two lanes meet the bottom of the frame
//!  3. [`per::window_track`] - follow each lane upwards with sliding windows
//!  4. [`per::lane_edges`] - clean each lane up and keep only its edges
//!  5. [`traj`] - fit quadratics, average them into a centreline, and turn its
//!     curvature into a direction vector
//!
//! This library allows the `lane_exec` binary and the benchmarks to access items
//! defined inside the crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Perception module - converts camera frames into lane edge masks
pub mod per;

/// Trajectory module - converts lane edge masks into a direction vector
pub mod traj;

/// Steering estimator - runs the full pipeline on one frame
pub mod steer_est;

/// Steering labels - quantises direction vectors into discrete classes
pub mod label;

/// Frame sequence handling - sampling and failure fallback for the caller
pub mod frame_seq;

// ------------------------------------------------------------------------------------------------
// REEXPORTS
// ------------------------------------------------------------------------------------------------

pub use steer_est::{compute_direction_vector, SteerError, SteerErrorKind};
pub use traj::DirectionVector;
