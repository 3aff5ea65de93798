//! Lane edge extraction
//!
//! Each lane mask is first cleaned up morphologically (erosion removes thin
//! noise, closing bridges small gaps in the stripe) and then reduced to the
//! pixels either side of its left and right boundaries using two directional
//! kernels.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;

use super::{
    morph::{self, Kernel3, StructElem, CROSS},
    BinaryMask, LanePair,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Structuring element used for both erosion and closing.
pub const EDGE_STRUCT_ELEM: StructElem = CROSS;

/// Number of erosions applied to a lane mask.
pub const ERODE_ITERATIONS: usize = 3;

/// Number of dilations (then erosions) in the closing step.
pub const CLOSE_ITERATIONS: usize = 10;

/// Responds on the dark side of a dark-to-bright transition moving right.
pub const EDGE_LEFT_KERNEL: Kernel3 = [[-1, 0, 1], [-1, 0, 1], [-1, 0, 1]];

/// Responds on the bright side of a bright-to-dark transition moving right.
pub const EDGE_RIGHT_KERNEL: Kernel3 = [[1, 0, -1], [1, 0, -1], [1, 0, -1]];

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Extract the edges of a single lane mask.
pub fn lane_edges(lane: &BinaryMask) -> BinaryMask {
    let raster = lane.map(|&b| b as u8);

    let eroded = morph::erode(&raster, &EDGE_STRUCT_ELEM, ERODE_ITERATIONS);
    let closed = morph::close(&eroded, &EDGE_STRUCT_ELEM, CLOSE_ITERATIONS);

    let left = morph::filter_3x3(&closed, &EDGE_LEFT_KERNEL);
    let right = morph::filter_3x3(&closed, &EDGE_RIGHT_KERNEL);

    let edges = ndarray::Zip::from(&left)
        .and(&right)
        .map_collect(|&l, &r| (l | r) > 0);

    trace!(
        "Lane edges: {} lane pixels -> {} edge pixels",
        lane.iter().filter(|&&b| b).count(),
        edges.iter().filter(|&&b| b).count()
    );

    edges
}

/// Extract the edges of both lanes.
pub fn lanes_edges(lanes: &LanePair<BinaryMask>) -> LanePair<BinaryMask> {
    lanes.as_ref().map(|_, lane| lane_edges(lane))
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::{s, Array2};

    fn edge_cols(edges: &BinaryMask, row: usize) -> Vec<usize> {
        edges
            .row(row)
            .indexed_iter()
            .filter(|&(_, &b)| b)
            .map(|(c, _)| c)
            .collect()
    }

    #[test]
    fn test_stripe_edges_hug_boundaries() {
        let mut lane = Array2::from_elem((120, 200), false);
        lane.slice_mut(s![.., 95..105]).fill(true);

        let edges = lane_edges(&lane);

        // Erosion pulls the stripe in to 98..=101, edges sit either side of
        // each boundary
        for row in 0..120 {
            assert_eq!(edge_cols(&edges, row), vec![97, 98, 101, 102]);
        }
    }

    #[test]
    fn test_stripe_structure_preserved() {
        // Any stripe that survives erosion keeps both boundaries to within
        // the erosion depth plus one pixel
        let mut lane = Array2::from_elem((100, 120), false);
        lane.slice_mut(s![.., 40..60]).fill(true);

        let edges = lane_edges(&lane);

        for row in 0..100 {
            let cols = edge_cols(&edges, row);
            assert_eq!(cols.len(), 4);
            assert!(cols[..2].iter().all(|&c| c + 4 >= 40 && c <= 40 + 4));
            assert!(cols[2..].iter().all(|&c| c + 4 >= 59 && c <= 59 + 4));
        }
    }

    #[test]
    fn test_thin_noise_removed() {
        let mut lane = Array2::from_elem((80, 80), false);
        lane.slice_mut(s![.., 40..41]).fill(true);
        lane.slice_mut(s![10..12, 5..30]).fill(true);

        let edges = lane_edges(&lane);
        assert!(edges.iter().all(|&b| !b));
    }

    #[test]
    fn test_empty_lane() {
        let lane = Array2::from_elem((50, 50), false);
        assert!(lane_edges(&lane).iter().all(|&b| !b));
    }
}
