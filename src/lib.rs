//! Confluence is a CPU-first alternative to IoU-based non-maximum suppression
//! for object-detection postprocessing.
//!
//! Detections are bucketed by class, then each bucket is reduced by repeatedly
//! retaining an anchor box and decaying (or removing) candidates whose
//! normalized Manhattan distance to it is small. Classes are independent and
//! can be processed in parallel via the `rayon` feature.
//!
//! ```
//! use confluence::{confluence_nms, ConfluenceConfig};
//!
//! let boxes = [[0.0, 0.0, 10.0, 10.0], [0.0, 0.0, 10.0, 10.0]];
//! let scores = [0.9, 0.8];
//! let classes = [1u32, 1];
//! let cfg = ConfluenceConfig {
//!     gaussian: false,
//!     ..ConfluenceConfig::default()
//! };
//!
//! let out = confluence_nms(&boxes, &scores, &classes, &cfg).unwrap();
//! assert_eq!(out.get(&1).unwrap().len(), 1);
//! ```

pub mod bucket;
pub mod detection;
pub mod normalize;
pub mod suppress;
mod trace;
pub mod util;

pub use bucket::{assign_boxes_to_classes, ClassMap, BUCKET_SCORE_THRESHOLD};
pub use detection::{BoxXyxy, Detection, ScoredBox};
pub use normalize::{normalize_box, Extent};
pub use suppress::{
    confluence_nms, confluence_nms_detections, decay_weight, manhattan_distance, suppress_bucket,
    AnchorSelection, ConfluenceConfig, ConfluenceOutput,
};
pub use util::{ConfluenceError, ConfluenceResult};
