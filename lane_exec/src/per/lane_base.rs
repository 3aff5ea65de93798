//! Lane base location
//!
//! The bottom band of the bright mask is collapsed into a per-column histogram.
//! Columns with a strong response are split about their mean into a low
//! (left) and high (right) cluster and each lane's base is the median of its
//! cluster.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;
use ndarray::{s, Array1, Axis};
use ndarray_stats::QuantileExt;
use serde::Serialize;
use util::maths::{mean, median_sorted};

use super::{BinaryMask, LanePair, PerError};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Rows at or below this fraction of the image height form the histogram band.
pub const BASE_BAND_START_FRACTION: f64 = 0.95;

/// Columns whose count exceeds `max / STRONG_COLUMN_DIVISOR` are strong.
pub const STRONG_COLUMN_DIVISOR: f64 = 3.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Column at which each lane meets the bottom of the image. `left < right`.
pub type LaneBases = LanePair<usize>;

/// Intermediate data from the base search, kept for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct BaseHistogram {
    /// Number of mask pixels in each column of the bottom band
    pub counts: Array1<u32>,

    /// Strong columns in ascending order
    pub strong_cols: Vec<usize>,

    /// Mean of the strong columns, which separates the two lanes
    pub split: f64,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Sum the bottom band of the mask into a per-column histogram.
pub fn base_histogram(mask: &BinaryMask) -> Result<Array1<u32>, PerError> {
    let (rows, cols) = mask.dim();

    if rows == 0 || cols == 0 {
        return Err(PerError::EmptyImage);
    }

    let band_start = (BASE_BAND_START_FRACTION * rows as f64) as usize;

    Ok(mask
        .slice(s![band_start.., ..])
        .map(|&b| b as u32)
        .sum_axis(Axis(0)))
}

/// Find the strong columns of a histogram and the mean which splits them.
pub fn split_histogram(counts: Array1<u32>) -> Result<BaseHistogram, PerError> {
    let max = *counts.max().map_err(|_| PerError::EmptyImage)?;
    let threshold = max as f64 / STRONG_COLUMN_DIVISOR;

    let strong_cols: Vec<usize> = counts
        .indexed_iter()
        .filter(|&(_, &c)| c as f64 > threshold)
        .map(|(i, _)| i)
        .collect();

    let split = mean(&strong_cols).ok_or(PerError::NoLaneDetected {
        num_strong: 0,
        num_low: 0,
        num_high: 0,
    })?;

    Ok(BaseHistogram {
        counts,
        strong_cols,
        split,
    })
}

/// Estimate the left and right lane base columns from a bright pixel mask.
///
/// Fails with `NoLaneDetected` if either side of the mean has no strong
/// columns, or if the strong columns form a single contiguous run.
pub fn locate_lane_bases(mask: &BinaryMask) -> Result<LaneBases, PerError> {
    let hist = split_histogram(base_histogram(mask)?)?;

    let low: Vec<usize> = hist
        .strong_cols
        .iter()
        .copied()
        .filter(|&c| (c as f64) < hist.split)
        .collect();
    let high: Vec<usize> = hist
        .strong_cols
        .iter()
        .copied()
        .filter(|&c| (c as f64) > hist.split)
        .collect();

    let no_lane = PerError::NoLaneDetected {
        num_strong: hist.strong_cols.len(),
        num_low: low.len(),
        num_high: high.len(),
    };

    if low.is_empty() || high.is_empty() {
        return Err(no_lane);
    }

    // A single contiguous run of strong columns still straddles its own mean
    if let (Some(&first), Some(&last)) = (hist.strong_cols.first(), hist.strong_cols.last()) {
        if last - first + 1 == hist.strong_cols.len() {
            return Err(no_lane);
        }
    }

    let bases = match (median_sorted(&low), median_sorted(&high)) {
        (Some(l), Some(h)) => LaneBases::new(l as usize, h as usize),
        _ => return Err(no_lane),
    };

    trace!(
        "Lane bases: split {:.1} over {} strong columns, left {} right {}",
        hist.split,
        hist.strong_cols.len(),
        bases.left,
        bases.right
    );

    Ok(bases)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
