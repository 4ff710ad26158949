//! Grid composition of per-camera images.
//!
//! ## Label order
//!
//! Tiles are laid out row-major in this order:
//!
//! 1. Canonical camera names, in rig order: front, front-left, front-right,
//!    side-left, side-right, rear.
//! 2. Generic `CAM_<n>` labels, by `n` numerically (`CAM_2` before `CAM_10`).
//! 3. Everything else, by plain string order.
//!
//! ## Sizing
//!
//! Every image is center-cropped to the smallest height and the smallest
//! width present, so a mosaic is always exactly
//! `cols * Wmin + 2 * pad` by `rows * Hmin + 2 * pad` pixels. Cells without an
//! image stay black; images that do not fit in the grid are not drawn.

use super::calculations::{cell_origin, center_crop_offset, mosaic_dimensions};
use image::RgbImage;
use image::imageops;
use std::collections::BTreeMap;

/// Canonical camera labels in display order.
pub const CANONICAL_CAMERAS: [&str; 6] = [
    "CAMERA_FRONT",
    "CAMERA_FRONT_LEFT",
    "CAMERA_FRONT_RIGHT",
    "CAMERA_SIDE_LEFT",
    "CAMERA_SIDE_RIGHT",
    "CAMERA_REAR",
];

/// Sort key for source labels. Variant order is group order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum CameraKey<'a> {
    Canonical(usize),
    Numbered(i64, &'a str),
    Other(&'a str),
}

pub fn camera_sort_key(label: &str) -> CameraKey<'_> {
    if let Some(pos) = CANONICAL_CAMERAS.iter().position(|c| *c == label) {
        return CameraKey::Canonical(pos);
    }
    if let Some(n) = label
        .strip_prefix("CAM_")
        .and_then(|rest| rest.parse::<i64>().ok())
    {
        return CameraKey::Numbered(n, label);
    }
    CameraKey::Other(label)
}

/// Labels sorted into tile order.
pub fn sort_labels<'a, I>(labels: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sorted: Vec<&str> = labels.into_iter().collect();
    sorted.sort_by(|a, b| camera_sort_key(a).cmp(&camera_sort_key(b)));
    sorted
}

/// Compose `images` into a `tile = (rows, cols)` grid with `pad` pixels of
/// black border. Returns `None` for an empty map.
pub fn assemble(
    images: &BTreeMap<String, RgbImage>,
    tile: (u32, u32),
    pad: u32,
) -> Option<RgbImage> {
    let h_min = images.values().map(RgbImage::height).min()?;
    let w_min = images.values().map(RgbImage::width).min()?;
    let (rows, cols) = tile;

    let (width, height) = mosaic_dimensions((w_min, h_min), tile, pad);
    let mut canvas = RgbImage::new(width, height);

    let cells = rows.saturating_mul(cols) as usize;
    let labels = sort_labels(images.keys().map(String::as_str));
    for (index, label) in labels.into_iter().take(cells).enumerate() {
        let img = &images[label];
        let x0 = center_crop_offset(img.width(), w_min);
        let y0 = center_crop_offset(img.height(), h_min);
        let cropped = imageops::crop_imm(img, x0, y0, w_min, h_min).to_image();
        let (x, y) = cell_origin(index as u32, (w_min, h_min), cols, pad);
        imageops::replace(&mut canvas, &cropped, i64::from(x), i64::from(y));
    }

    Some(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid(w: u32, h: u32, v: u8) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb([v, v, v]))
    }

    fn map(entries: Vec<(&str, RgbImage)>) -> BTreeMap<String, RgbImage> {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    // =========================================================================
    // Label ordering
    // =========================================================================

    #[test]
    fn camera_order_groups() {
        let sorted = sort_labels(["CAMERA_REAR", "CAMERA_FRONT", "CAM_2", "CAM_10", "weird"]);
        assert_eq!(
            sorted,
            vec!["CAMERA_FRONT", "CAMERA_REAR", "CAM_2", "CAM_10", "weird"]
        );
    }

    #[test]
    fn canonical_names_follow_rig_order() {
        let mut labels = CANONICAL_CAMERAS.to_vec();
        labels.reverse();
        assert_eq!(sort_labels(labels), CANONICAL_CAMERAS.to_vec());
    }

    #[test]
    fn non_numeric_cam_suffix_sorts_as_other() {
        assert_eq!(camera_sort_key("CAM_FRONT"), CameraKey::Other("CAM_FRONT"));
        assert_eq!(camera_sort_key("CAM_7"), CameraKey::Numbered(7, "CAM_7"));
        assert_eq!(sort_labels(["CAM_FRONT", "CAM_7", "CAM"]), vec!["CAM_7", "CAM", "CAM_FRONT"]);
    }

    // =========================================================================
    // assemble
    // =========================================================================

    #[test]
    fn empty_map_yields_nothing() {
        assert!(assemble(&BTreeMap::new(), (2, 3), 4).is_none());
    }

    #[test]
    fn size_follows_smallest_image() {
        let images = map(vec![
            ("CAMERA_FRONT", solid(40, 30, 10)),
            ("CAMERA_REAR", solid(25, 50, 20)),
            ("CAM_1", solid(33, 21, 30)),
        ]);
        let out = assemble(&images, (2, 3), 4).unwrap();
        assert_eq!(out.width(), 3 * 25 + 2 * 4);
        assert_eq!(out.height(), 2 * 21 + 2 * 4);
    }

    #[test]
    fn tiles_placed_in_label_order_with_black_padding() {
        let images = map(vec![
            ("CAM_10", solid(2, 2, 30)),
            ("CAM_2", solid(2, 2, 20)),
            ("CAMERA_FRONT", solid(2, 2, 10)),
        ]);
        let out = assemble(&images, (2, 2), 1).unwrap();
        assert_eq!(out.dimensions(), (6, 6));
        // border
        assert_eq!(*out.get_pixel(0, 0), Rgb([0, 0, 0]));
        // row 0: front, CAM_2; row 1: CAM_10, empty
        assert_eq!(*out.get_pixel(1, 1), Rgb([10, 10, 10]));
        assert_eq!(*out.get_pixel(3, 1), Rgb([20, 20, 20]));
        assert_eq!(*out.get_pixel(1, 3), Rgb([30, 30, 30]));
        assert_eq!(*out.get_pixel(4, 4), Rgb([0, 0, 0]));
    }

    #[test]
    fn larger_images_are_center_cropped() {
        // 4x1 strip with a distinct value in the middle two columns
        let mut wide = RgbImage::from_pixel(4, 1, Rgb([1, 1, 1]));
        wide.put_pixel(1, 0, Rgb([9, 9, 9]));
        wide.put_pixel(2, 0, Rgb([9, 9, 9]));
        let images = map(vec![("a", wide), ("b", solid(2, 1, 5))]);
        let out = assemble(&images, (1, 2), 0).unwrap();
        assert_eq!(out.dimensions(), (4, 1));
        assert_eq!(*out.get_pixel(0, 0), Rgb([9, 9, 9]));
        assert_eq!(*out.get_pixel(1, 0), Rgb([9, 9, 9]));
        assert_eq!(*out.get_pixel(2, 0), Rgb([5, 5, 5]));
    }

    #[test]
    fn images_beyond_grid_are_not_drawn() {
        let images = map(vec![
            ("CAM_1", solid(1, 1, 1)),
            ("CAM_2", solid(1, 1, 2)),
            ("CAM_3", solid(1, 1, 3)),
        ]);
        let out = assemble(&images, (1, 2), 0).unwrap();
        assert_eq!(out.dimensions(), (2, 1));
        assert_eq!(*out.get_pixel(1, 0), Rgb([2, 2, 2]));
    }
}
