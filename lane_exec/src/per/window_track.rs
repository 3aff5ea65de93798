//! Sliding window lane tracking
//!
//! Starting from a lane's base, a fixed size window is walked up the mask. At
//! each step the window's pixels are copied into the lane mask and the next
//! window is recentred on the mean column of those pixels. The search stops
//! early as soon as a window comes up empty, so that once a lane leaves view
//! the tracker does not wander onto unrelated bright pixels.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::ops::Range;

use log::trace;
use ndarray::{s, Array2};

use super::{BinaryMask, LaneBases, LanePair};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Width of a search window in pixels.
pub const WINDOW_WIDTH: usize = 220;

/// Height of a search window in pixels.
pub const WINDOW_HEIGHT: usize = 72;

/// Maximum number of windows searched per lane.
pub const MAX_WINDOW_ITERATIONS: usize = 9;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// State of the window search for a single lane.
///
/// Positions are signed since a window centred near the image edge extends
/// past it. Only the part of the window inside the image is ever searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSearch {
    /// Column the window is centred on
    pub centre_col: isize,

    /// Top row of the window
    pub top_row: isize,

    /// Number of windows still allowed, including this one
    pub iterations_remaining: usize,
}

/// The in-image region covered by a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footprint {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

/// The result of searching one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowStep {
    /// The region that was searched, `None` if the window was entirely off
    /// the image or no iterations were left.
    pub footprint: Option<Footprint>,

    /// The next window to search, `None` once the search is finished.
    pub next: Option<WindowSearch>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl WindowSearch {
    /// Initial window, centred on the lane base and resting on the bottom of
    /// an image with `num_rows` rows.
    pub fn start(base_col: usize, num_rows: usize) -> Self {
        Self {
            centre_col: base_col as isize,
            top_row: num_rows as isize - WINDOW_HEIGHT as isize,
            iterations_remaining: MAX_WINDOW_ITERATIONS,
        }
    }

    /// Left-most column of the window, which may be off the image.
    pub fn left_col(&self) -> isize {
        self.centre_col - (WINDOW_WIDTH / 2) as isize
    }

    /// Clip the window to an image of the given shape.
    pub fn footprint(&self, shape: (usize, usize)) -> Option<Footprint> {
        let rows = clip(self.top_row, WINDOW_HEIGHT, shape.0)?;
        let cols = clip(self.left_col(), WINDOW_WIDTH, shape.1)?;

        Some(Footprint { rows, cols })
    }

    /// Search this window of the mask.
    ///
    /// This does not modify anything, the caller is responsible for copying
    /// the footprint into its output.
    pub fn step(&self, mask: &BinaryMask) -> WindowStep {
        if self.iterations_remaining == 0 {
            return WindowStep {
                footprint: None,
                next: None,
            };
        }

        let footprint = match self.footprint(mask.dim()) {
            Some(f) => f,
            None => {
                return WindowStep {
                    footprint: None,
                    next: None,
                }
            }
        };

        // Mean column of the set pixels inside the window
        let window = mask.slice(s![footprint.rows.clone(), footprint.cols.clone()]);
        let mut col_sum = 0usize;
        let mut count = 0usize;
        for ((_, c), _) in window.indexed_iter().filter(|&(_, &set)| set) {
            col_sum += footprint.cols.start + c;
            count += 1;
        }

        let next = if count == 0 {
            None
        } else {
            Some(WindowSearch {
                centre_col: (col_sum as f64 / count as f64) as isize,
                top_row: self.top_row - WINDOW_HEIGHT as isize,
                iterations_remaining: self.iterations_remaining - 1,
            })
        };

        WindowStep {
            footprint: Some(footprint),
            next,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Track a single lane up the mask from its base, returning a mask holding only
/// the pixels inside the windows that were visited.
pub fn track_lane(mask: &BinaryMask, base_col: usize) -> BinaryMask {
    let mut lane = Array2::from_elem(mask.dim(), false);
    let mut search = Some(WindowSearch::start(base_col, mask.nrows()));
    let mut num_windows = 0;

    while let Some(current) = search {
        let step = current.step(mask);

        if let Some(fp) = &step.footprint {
            lane.slice_mut(s![fp.rows.clone(), fp.cols.clone()])
                .assign(&mask.slice(s![fp.rows.clone(), fp.cols.clone()]));
            num_windows += 1;
        }

        search = step.next;
    }

    trace!("Lane from base {} tracked over {} windows", base_col, num_windows);

    lane
}

/// Track both lanes. The two searches are independent and never interact.
pub fn track_lanes(mask: &BinaryMask, bases: &LaneBases) -> LanePair<BinaryMask> {
    bases.map(|_, base| track_lane(mask, base))
}

/// Clip the span `[start, start + len)` to `[0, limit)`.
fn clip(start: isize, len: usize, limit: usize) -> Option<Range<usize>> {
    let lo = start.max(0);
    let hi = (start + len as isize).min(limit as isize);

    if lo >= hi {
        None
    } else {
        Some(lo as usize..hi as usize)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn stripe(mask: &mut BinaryMask, rows: Range<usize>, cols: Range<usize>) {
        mask.slice_mut(s![rows, cols]).fill(true);
    }

    #[test]
    fn test_empty_mask_gives_empty_lane() {
        let mask = Array2::from_elem((360, 400), false);

        let step = WindowSearch::start(100, 360).step(&mask);
        assert_eq!(
            step.footprint,
            Some(Footprint {
                rows: 288..360,
                cols: 0..210
            })
        );
        assert_eq!(step.next, None);

        let lane = track_lane(&mask, 100);
        assert!(lane.iter().all(|&b| !b));
    }

    #[test]
    fn test_straight_lane_tracked_to_top() {
        let mut mask = Array2::from_elem((360, 400), false);
        stripe(&mut mask, 0..360, 95..105);

        let lane = track_lane(&mask, 99);
        assert_eq!(lane, mask);
    }

    #[test]
    fn test_pixels_outside_windows_not_copied() {
        let mut mask = Array2::from_elem((360, 400), false);
        stripe(&mut mask, 0..360, 95..105);

        // Other lane and noise well outside any window around the first lane
        let mut expected = mask.clone();
        stripe(&mut mask, 0..360, 330..340);
        stripe(&mut mask, 10..20, 250..260);

        let lane = track_lane(&mask, 99);
        assert_eq!(lane, expected);

        // Right lane does not pick up the left
        expected.fill(false);
        stripe(&mut expected, 0..360, 330..340);
        stripe(&mut expected, 10..20, 250..260);
        let lane = track_lane(&mask, 334);
        assert_eq!(lane, expected);
    }

    #[test]
    fn test_stops_at_first_empty_window() {
        let mut mask = Array2::from_elem((360, 400), false);
        // Two bottom windows hold the lane, the third (rows 144..216) is empty
        stripe(&mut mask, 216..360, 95..105);
        stripe(&mut mask, 0..144, 95..105);

        let lane = track_lane(&mask, 99);

        assert!(lane.slice(s![216..360, 95..105]).iter().all(|&b| b));
        assert!(lane.slice(s![0..216, ..]).iter().all(|&b| !b));
    }

    #[test]
    fn test_follows_drifting_lane() {
        let mut mask = Array2::from_elem((360, 600), false);

        // Each window band is shifted 40 px right of the one below it
        for k in 0..5 {
            let bottom = 360 - 72 * k;
            let col = 100 + 40 * k;
            stripe(&mut mask, (bottom - 72)..bottom, col..(col + 10));
        }

        let lane = track_lane(&mask, 104);
        assert_eq!(lane, mask);
    }

    #[test]
    fn test_iteration_cap() {
        // Tall image, only the bottom 9 windows may be searched
        let mut mask = Array2::from_elem((72 * 12, 300), false);
        stripe(&mut mask, 0..72 * 12, 145..155);

        let lane = track_lane(&mask, 149);
        let first_row = 72 * 3;

        assert!(lane.slice(s![first_row.., 145..155]).iter().all(|&b| b));
        assert!(lane.slice(s![..first_row, ..]).iter().all(|&b| !b));
    }

    #[test]
    fn test_footprint_clipping() {
        let s = WindowSearch {
            centre_col: 10,
            top_row: -30,
            iterations_remaining: 1,
        };
        assert_eq!(
            s.footprint((100, 50)),
            Some(Footprint {
                rows: 0..42,
                cols: 0..50
            })
        );

        let off = WindowSearch {
            centre_col: 10,
            top_row: -72,
            iterations_remaining: 1,
        };
        assert_eq!(off.footprint((100, 50)), None);
    }
}
