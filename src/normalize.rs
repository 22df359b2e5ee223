//! Coordinate normalization against an enclosing extent.
//!
//! Confluence compares boxes in the unit square spanned by the pair being
//! compared, so absolute coordinate units drop out. Each anchor/candidate pair
//! has its own [`Extent`]; there is no global extent.

use crate::detection::BoxXyxy;

/// Enclosing extent `(min_x, max_x, min_y, max_y)` of a box pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    /// Leftmost `x1` of the pair.
    pub min_x: f64,
    /// Rightmost `x2` of the pair.
    pub max_x: f64,
    /// Topmost `y1` of the pair.
    pub min_y: f64,
    /// Bottommost `y2` of the pair.
    pub max_y: f64,
}

impl Extent {
    /// Smallest extent enclosing both boxes.
    pub fn enclosing(a: &BoxXyxy, b: &BoxXyxy) -> Self {
        Self {
            min_x: a[0].min(b[0]),
            max_x: a[2].max(b[2]),
            min_y: a[1].min(b[1]),
            max_y: a[3].max(b[3]),
        }
    }
}

/// Rescales one coordinate into `[0, 1]`.
///
/// A zero-width span maps every coordinate to `0`, so a degenerate axis adds
/// nothing to a distance computed from normalized coordinates.
#[inline]
fn rescale(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span == 0.0 {
        0.0
    } else {
        (value - min) / span
    }
}

/// Normalizes a box against `extent`.
pub fn normalize_box(bbox: &BoxXyxy, extent: &Extent) -> BoxXyxy {
    [
        rescale(bbox[0], extent.min_x, extent.max_x),
        rescale(bbox[1], extent.min_y, extent.max_y),
        rescale(bbox[2], extent.min_x, extent.max_x),
        rescale(bbox[3], extent.min_y, extent.max_y),
    ]
}

/// Normalizes each box against the extent at the same index.
///
/// Pairs beyond the shorter of the two inputs are ignored.
pub fn normalize_boxes<'a, I>(boxes: I, extents: &[Extent]) -> Vec<BoxXyxy>
where
    I: IntoIterator<Item = &'a BoxXyxy>,
{
    boxes
        .into_iter()
        .zip(extents)
        .map(|(bbox, extent)| normalize_box(bbox, extent))
        .collect()
}
