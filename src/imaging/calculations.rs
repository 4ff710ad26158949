//! Pure calculation functions for mosaic geometry.
//!
//! All functions here are pure and testable without any pixels.

/// Offset that centers a crop of `target` inside `source` along one axis.
///
/// Returns 0 when the source is not larger than the target.
///
/// # Examples
/// ```
/// # use e2e_preview::imaging::center_crop_offset;
/// assert_eq!(center_crop_offset(1920, 1280), 320);
/// assert_eq!(center_crop_offset(101, 100), 0);
/// ```
pub fn center_crop_offset(source: u32, target: u32) -> u32 {
    source.saturating_sub(target) / 2
}

/// Output `(width, height)` of a `rows × cols` grid of `tile` sized cells
/// with `pad` pixels of border on every side.
///
/// # Arguments
/// * `tile` - Cell size as (width, height)
/// * `grid` - Grid shape as (rows, cols)
/// * `pad` - Border width in pixels
pub fn mosaic_dimensions(tile: (u32, u32), grid: (u32, u32), pad: u32) -> (u32, u32) {
    let (tile_w, tile_h) = tile;
    let (rows, cols) = grid;
    (cols * tile_w + 2 * pad, rows * tile_h + 2 * pad)
}

/// Top-left pixel of grid cell `index` (row-major) inside the padded canvas.
pub fn cell_origin(index: u32, tile: (u32, u32), cols: u32, pad: u32) -> (u32, u32) {
    let (tile_w, tile_h) = tile;
    let row = index / cols;
    let col = index % cols;
    (pad + col * tile_w, pad + row * tile_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // center_crop_offset tests
    // =========================================================================

    #[test]
    fn crop_offset_halves_the_excess() {
        assert_eq!(center_crop_offset(1920, 1280), 320);
    }

    #[test]
    fn crop_offset_rounds_down_odd_excess() {
        // 5 spare pixels: 2 on the leading edge, 3 on the trailing edge
        assert_eq!(center_crop_offset(105, 100), 2);
    }

    #[test]
    fn crop_offset_zero_when_equal_or_smaller() {
        assert_eq!(center_crop_offset(100, 100), 0);
        assert_eq!(center_crop_offset(80, 100), 0);
    }

    // =========================================================================
    // mosaic_dimensions tests
    // =========================================================================

    #[test]
    fn mosaic_two_by_three_with_padding() {
        // 3 cols * 640 + 8, 2 rows * 480 + 8
        assert_eq!(mosaic_dimensions((640, 480), (2, 3), 4), (1928, 968));
    }

    #[test]
    fn mosaic_without_padding() {
        assert_eq!(mosaic_dimensions((10, 20), (1, 1), 0), (10, 20));
    }

    // =========================================================================
    // cell_origin tests
    // =========================================================================

    #[test]
    fn cells_fill_row_major() {
        let tile = (10, 20);
        assert_eq!(cell_origin(0, tile, 3, 4), (4, 4));
        assert_eq!(cell_origin(2, tile, 3, 4), (24, 4));
        assert_eq!(cell_origin(3, tile, 3, 4), (4, 24));
        assert_eq!(cell_origin(5, tile, 3, 4), (24, 24));
    }
}
