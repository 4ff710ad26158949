//! Image discovery over record trees.
//!
//! Every bytes element is sniffed; anything that starts like a JPEG or PNG is
//! handed to the [`ImageDecoder`]. The label attached to a decoded image is
//! the `camera` hint in scope at that point of the walk, or
//! [`SENTINEL_SOURCE`] when there is none.
//!
//! Any non-bytes scalar whose field name contains `cam` (so also `camera`,
//! `camera_name`, …) sets the hint. Blobs that sniff as images but fail to
//! decode are skipped and the walk goes on.

use crate::imaging::{Dimensions, ImageDecoder};
use crate::node::{FieldKind, Node, Scalar};
use crate::sniff::sniff;
use crate::types::{DiscoveredImage, SENTINEL_SOURCE};
use crate::walk::{Action, HintContext, HintKey, Leaf, LeafVisitor, walk};
use image::RgbImage;
use std::collections::BTreeMap;

/// Leaf visitor that decodes images and tracks camera labels.
pub struct ImageCollector<'d, D: ImageDecoder> {
    decoder: &'d D,
}

impl<'d, D: ImageDecoder> ImageCollector<'d, D> {
    pub fn new(decoder: &'d D) -> Self {
        Self { decoder }
    }
}

fn is_camera_field(name: &str) -> bool {
    name.to_lowercase().contains("cam")
}

impl<D: ImageDecoder> LeafVisitor for ImageCollector<'_, D> {
    type Output = DiscoveredImage;

    fn visit(&mut self, leaf: &Leaf<'_>, hints: &HintContext) -> Action<DiscoveredImage> {
        if leaf.kind == FieldKind::Bytes {
            let Scalar::Bytes(blob) = leaf.value else {
                return Action::Ignore;
            };
            let Some(format) = sniff(blob) else {
                return Action::Ignore;
            };
            return match self.decoder.decode(blob, format) {
                Ok(pixels) => {
                    let source = hints
                        .get(HintKey::Camera)
                        .filter(|s| !s.is_empty())
                        .unwrap_or(SENTINEL_SOURCE)
                        .to_string();
                    let Dimensions { width, height } = Dimensions::from(&pixels);
                    log::debug!("{format:?} {width}x{height} in '{}' as {source}", leaf.name);
                    Action::Record(DiscoveredImage { source, pixels })
                }
                Err(e) => {
                    log::debug!("skipping blob in field '{}': {e}", leaf.name);
                    Action::Ignore
                }
            };
        }

        if is_camera_field(leaf.name) {
            return Action::UpdateHint(HintKey::Camera, leaf.value.to_label());
        }
        Action::Ignore
    }
}

/// All images in `node`, in walk order.
pub fn collect_images(node: &dyn Node, decoder: &impl ImageDecoder) -> Vec<DiscoveredImage> {
    walk(node, &mut ImageCollector::new(decoder))
}

/// Keep the first image per source label.
pub fn images_by_source(images: Vec<DiscoveredImage>) -> BTreeMap<String, RgbImage> {
    let mut by_source = BTreeMap::new();
    for DiscoveredImage { source, pixels } in images {
        by_source.entry(source).or_insert(pixels);
    }
    by_source
}
