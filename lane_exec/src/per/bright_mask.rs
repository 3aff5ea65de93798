//! Bright pixel masking

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use image::RgbImage;
use ndarray::Array2;

use super::BinaryMask;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Every channel of a pixel must be strictly above this for it to count as a
/// candidate lane marking.
pub const BRIGHT_THRESHOLD: u8 = 175;

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Threshold an RGB frame into a mask of bright pixels.
pub fn bright_pixels(image: &RgbImage) -> BinaryMask {
    let (width, height) = image.dimensions();

    Array2::from_shape_fn((height as usize, width as usize), |(row, col)| {
        image
            .get_pixel(col as u32, row as u32)
            .0
            .iter()
            .all(|&v| v > BRIGHT_THRESHOLD)
    })
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_dark_image_is_empty() {
        let img = RgbImage::from_pixel(64, 48, Rgb([174, 120, 0]));
        let mask = bright_pixels(&img);

        assert_eq!(mask.dim(), (48, 64));
        assert!(mask.iter().all(|&b| !b));
    }

    #[test]
    fn test_threshold_is_strict_and_all_channels() {
        let mut img = RgbImage::from_pixel(4, 1, Rgb([0, 0, 0]));
        img.put_pixel(0, 0, Rgb([175, 175, 175]));
        img.put_pixel(1, 0, Rgb([176, 176, 176]));
        img.put_pixel(2, 0, Rgb([255, 255, 100]));
        img.put_pixel(3, 0, Rgb([255, 200, 180]));

        let mask = bright_pixels(&img);

        assert_eq!(mask.row(0).to_vec(), vec![false, true, false, true]);
    }
}
