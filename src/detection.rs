//! Detection records consumed and produced by confluence suppression.

/// Axis-aligned box in `[x1, y1, x2, y2]` corner format.
pub type BoxXyxy = [f64; 4];

/// A box with its confidence score, the unit of work inside a class bucket.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredBox {
    /// Left edge.
    pub x1: f64,
    /// Top edge.
    pub y1: f64,
    /// Right edge.
    pub x2: f64,
    /// Bottom edge.
    pub y2: f64,
    /// Confidence score, decayed in place while suppression runs.
    pub score: f64,
}

impl ScoredBox {
    /// Creates a scored box from corner coordinates.
    pub fn new(bbox: BoxXyxy, score: f64) -> Self {
        Self {
            x1: bbox[0],
            y1: bbox[1],
            x2: bbox[2],
            y2: bbox[3],
            score,
        }
    }

    /// Returns the corner coordinates.
    pub fn bbox(&self) -> BoxXyxy {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

/// A single detector output: box, class label and score.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection<C> {
    /// Box corners in caller-defined units.
    pub bbox: BoxXyxy,
    /// Class identifier.
    pub class_id: C,
    /// Confidence score in `[0, 1]`.
    pub score: f64,
}

impl<C> Detection<C> {
    /// Creates a detection.
    pub fn new(bbox: BoxXyxy, class_id: C, score: f64) -> Self {
        Self {
            bbox,
            class_id,
            score,
        }
    }
}
