//! Image handling in pure Rust, with no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory_with_format` → RGB8 |
//! | **Center crop** | `image::imageops::crop_imm` |
//! | **Tile** | `image::imageops::replace` onto a black canvas |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop and grid geometry (unit testable)
//! - **Backend**: [`ImageDecoder`] trait + [`RustDecoder`]
//! - **Mosaic**: label ordering and grid assembly

pub mod backend;
mod calculations;
pub mod mosaic;
pub mod rust_backend;

pub use backend::{DecodeImageError, Dimensions, ImageDecoder};
pub use calculations::{cell_origin, center_crop_offset, mosaic_dimensions};
pub use mosaic::{CANONICAL_CAMERAS, CameraKey, assemble, camera_sort_key, sort_labels};
pub use rust_backend::RustDecoder;
