//! Morphology and small-kernel filtering on single channel rasters
//!
//! Border handling follows the usual conventions for these operators: pixels
//! outside the raster never win the min of an erosion or the max of a
//! dilation, and linear filters reflect about the edge pixel (`dcb|abcd|cba`).

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use ndarray::Array2;

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// A 3x3 structuring element, `true` where the neighbour takes part.
pub type StructElem = [[bool; 3]; 3];

/// A 3x3 linear filter kernel, applied as a correlation.
pub type Kernel3 = [[i32; 3]; 3];

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Plus shaped structuring element.
pub const CROSS: StructElem = [[false, true, false], [true, true, true], [false, true, false]];

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Erode `src` with `elem`, `iterations` times.
pub fn erode(src: &Array2<u8>, elem: &StructElem, iterations: usize) -> Array2<u8> {
    repeat(src, iterations, |img| rank_filter(img, elem, u8::min, u8::MAX))
}

/// Dilate `src` with `elem`, `iterations` times.
pub fn dilate(src: &Array2<u8>, elem: &StructElem, iterations: usize) -> Array2<u8> {
    repeat(src, iterations, |img| rank_filter(img, elem, u8::max, u8::MIN))
}

/// Morphological closing: `iterations` dilations followed by as many erosions.
pub fn close(src: &Array2<u8>, elem: &StructElem, iterations: usize) -> Array2<u8> {
    erode(&dilate(src, elem, iterations), elem, iterations)
}

/// Correlate `src` with a 3x3 kernel, saturating the result to `u8`.
pub fn filter_3x3(src: &Array2<u8>, kernel: &Kernel3) -> Array2<u8> {
    let (rows, cols) = src.dim();

    Array2::from_shape_fn((rows, cols), |(r, c)| {
        let mut acc = 0i32;

        for (kr, k_row) in kernel.iter().enumerate() {
            let sr = reflect_101(r as isize + kr as isize - 1, rows);
            for (kc, &k) in k_row.iter().enumerate() {
                if k == 0 {
                    continue;
                }
                let sc = reflect_101(c as isize + kc as isize - 1, cols);
                acc += k * src[[sr, sc]] as i32;
            }
        }

        acc.max(0).min(u8::MAX as i32) as u8
    })
}

fn repeat<F>(src: &Array2<u8>, iterations: usize, op: F) -> Array2<u8>
where
    F: Fn(&Array2<u8>) -> Array2<u8>,
{
    let mut out = src.clone();
    for _ in 0..iterations {
        out = op(&out);
    }
    out
}

/// Combine each pixel's in-bounds neighbourhood with `combine`, starting from
/// `identity`.
fn rank_filter<F>(src: &Array2<u8>, elem: &StructElem, combine: F, identity: u8) -> Array2<u8>
where
    F: Fn(u8, u8) -> u8,
{
    let (rows, cols) = src.dim();

    Array2::from_shape_fn((rows, cols), |(r, c)| {
        let mut acc = identity;

        for (er, e_row) in elem.iter().enumerate() {
            let sr = r as isize + er as isize - 1;
            if sr < 0 || sr >= rows as isize {
                continue;
            }
            for (ec, &on) in e_row.iter().enumerate() {
                let sc = c as isize + ec as isize - 1;
                if !on || sc < 0 || sc >= cols as isize {
                    continue;
                }
                acc = combine(acc, src[[sr as usize, sc as usize]]);
            }
        }

        acc
    })
}

/// Reflect an out of range index back into `[0, len)` without repeating the
/// edge element.
fn reflect_101(idx: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }

    let last = len as isize - 1;
    let mut i = idx;
    if i < 0 {
        i = -i;
    }
    if i > last {
        i = 2 * last - i;
    }

    i as usize
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::{arr2, s};

    #[test]
    fn test_erode_removes_thin_and_shrinks_blocks() {
        let mut img = Array2::<u8>::zeros((11, 11));
        img.slice_mut(s![2..9, 2..9]).fill(1);
        img.slice_mut(s![0..11, 10..11]).fill(1);

        let eroded = erode(&img, &CROSS, 1);

        assert!(eroded.slice(s![3..8, 3..8]).iter().all(|&v| v == 1));
        assert_eq!(eroded[[2, 5]], 0);
        assert_eq!(eroded[[5, 2]], 0);
        // Width 1 line on the border loses its left neighbour
        assert!(eroded.column(10).iter().all(|&v| v == 0));
    }

    #[test]
    fn test_border_does_not_erode() {
        let img = Array2::<u8>::from_elem((5, 5), 1);
        assert_eq!(erode(&img, &CROSS, 3), img);
    }

    #[test]
    fn test_dilate_cross() {
        let mut img = Array2::<u8>::zeros((5, 5));
        img[[2, 2]] = 1;

        let dilated = dilate(&img, &CROSS, 1);
        let expected = arr2(&[
            [0, 0, 0, 0, 0],
            [0, 0, 1, 0, 0],
            [0, 1, 1, 1, 0],
            [0, 0, 1, 0, 0],
            [0, 0, 0, 0, 0],
        ]);
        assert_eq!(dilated, expected);
    }

    #[test]
    fn test_close_bridges_gap() {
        let mut img = Array2::<u8>::zeros((20, 20));
        img.slice_mut(s![2..8, 8..12]).fill(1);
        img.slice_mut(s![9..18, 8..12]).fill(1);

        let closed = close(&img, &CROSS, 2);

        // Gap row is filled away from the stripe's corners
        assert!(closed.slice(s![8..9, 9..11]).iter().all(|&v| v == 1));
        assert!(img.iter().zip(closed.iter()).all(|(&a, &b)| b >= a));
        assert!(closed.slice(s![.., 0..7]).iter().all(|&v| v == 0));
    }

    #[test]
    fn test_filter_saturates() {
        let img = arr2(&[[0u8, 0, 1, 1], [0, 0, 1, 1], [0, 0, 1, 1]]);
        let k: Kernel3 = [[-1, 0, 1], [-1, 0, 1], [-1, 0, 1]];
        let out = filter_3x3(&img, &k);

        assert_eq!(out.row(1).to_vec(), vec![0, 3, 3, 0]);

        let k_neg: Kernel3 = [[1, 0, -1], [1, 0, -1], [1, 0, -1]];
        let out = filter_3x3(&img, &k_neg);
        assert!(out.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(2, 5), 2);
        assert_eq!(reflect_101(-1, 1), 0);
    }
}
