//! Confluence suppression over class buckets.
//!
//! Each class bucket is reduced independently: the anchor is moved to the
//! retained list, every remaining candidate is decayed according to its
//! confluence distance to the anchor, and candidates whose decayed score falls
//! below `score_thr` leave the working set. The loop ends when the working set
//! is empty, which takes at most one iteration per bucketed box.

mod anchor;
pub(crate) mod metric;

pub use anchor::AnchorSelection;
pub use metric::{decay_weight, manhattan_distance};

use crate::bucket::{assign_boxes_to_classes, bucket_detections, ClassBuckets, ClassMap};
use crate::detection::{BoxXyxy, Detection, ScoredBox};
use crate::trace::{trace_debug, trace_event, trace_span};
use crate::util::{ConfluenceError, ConfluenceResult};
use anchor::{pick_max_score, pick_most_confluent};
use metric::decay_and_filter;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::hash::Hash;

/// Retained boxes per class, in selection order.
pub type ConfluenceOutput<C> = ClassMap<C, Vec<ScoredBox>>;

/// Parameters for confluence suppression.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfluenceConfig {
    /// Normalized Manhattan distance at or below which candidates are decayed.
    /// Useful values lie in `0.5..=0.8`.
    pub confluence_thr: f64,
    /// Gaussian score decay when true, hard removal otherwise.
    pub gaussian: bool,
    /// Minimum decayed score for a candidate to stay in the working set.
    pub score_thr: f64,
    /// Gaussian decay width; smaller values decay harder. Must be positive.
    pub sigma: f64,
    /// Anchor selection strategy.
    pub selection: AnchorSelection,
    /// Process classes on the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for ConfluenceConfig {
    fn default() -> Self {
        Self {
            confluence_thr: 0.7,
            gaussian: true,
            score_thr: 0.05,
            sigma: 0.5,
            selection: AnchorSelection::MaxScore,
            parallel: false,
        }
    }
}

impl ConfluenceConfig {
    /// Checks parameter ranges.
    pub fn validate(&self) -> ConfluenceResult<()> {
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(ConfluenceError::InvalidConfiguration {
                reason: "sigma must be finite and positive",
            });
        }
        if !self.confluence_thr.is_finite() {
            return Err(ConfluenceError::InvalidConfiguration {
                reason: "confluence_thr must be finite",
            });
        }
        if !self.score_thr.is_finite() {
            return Err(ConfluenceError::InvalidConfiguration {
                reason: "score_thr must be finite",
            });
        }
        Ok(())
    }
}

/// Runs confluence suppression on parallel box, score and class slices.
///
/// Returns the retained boxes per class. Classes appear in order of first
/// occurrence among detections that pass the bucketing floor.
///
/// # Errors
///
/// [`ConfluenceError::InvalidConfiguration`] if `cfg` fails validation and
/// [`ConfluenceError::InvalidInput`] if the slices differ in length.
pub fn confluence_nms<C>(
    boxes: &[BoxXyxy],
    scores: &[f64],
    classes: &[C],
    cfg: &ConfluenceConfig,
) -> ConfluenceResult<ConfluenceOutput<C>>
where
    C: Eq + Hash + Clone + Send,
{
    cfg.validate()?;
    let buckets = assign_boxes_to_classes(boxes, scores, classes)?;
    let _span = trace_span!(
        "confluence_nms",
        detections = boxes.len(),
        classes = buckets.len()
    )
    .entered();
    Ok(suppress_buckets(buckets, cfg))
}

/// Runs confluence suppression on a slice of [`Detection`] records.
pub fn confluence_nms_detections<C>(
    detections: &[Detection<C>],
    cfg: &ConfluenceConfig,
) -> ConfluenceResult<ConfluenceOutput<C>>
where
    C: Eq + Hash + Clone + Send,
{
    cfg.validate()?;
    let buckets = bucket_detections(detections);
    let _span = trace_span!(
        "confluence_nms",
        detections = detections.len(),
        classes = buckets.len()
    )
    .entered();
    Ok(suppress_buckets(buckets, cfg))
}

/// Reduces every bucket, in parallel when enabled.
pub fn suppress_buckets<C>(buckets: ClassBuckets<C>, cfg: &ConfluenceConfig) -> ConfluenceOutput<C>
where
    C: Eq + Hash + Clone + Send,
{
    trace_event!("suppress_buckets", classes = buckets.len());

    #[cfg(feature = "rayon")]
    if cfg.parallel {
        return suppress_buckets_par(buckets, cfg);
    }

    buckets
        .into_iter()
        .map(|(class_id, dets)| (class_id, suppress_bucket(dets, cfg)))
        .collect()
}

/// Class-parallel reduction; output order matches the sequential path.
#[cfg(feature = "rayon")]
fn suppress_buckets_par<C>(buckets: ClassBuckets<C>, cfg: &ConfluenceConfig) -> ConfluenceOutput<C>
where
    C: Eq + Hash + Clone + Send,
{
    let buckets: Vec<(C, Vec<ScoredBox>)> = buckets.into_iter().collect();
    let retained: Vec<(C, Vec<ScoredBox>)> = buckets
        .into_par_iter()
        .map(|(class_id, dets)| (class_id, suppress_bucket(dets, cfg)))
        .collect();
    retained.into_iter().collect()
}

/// Reduces one class bucket to its retained boxes.
///
/// `cfg` is assumed valid. The returned boxes are in selection order.
pub fn suppress_bucket(mut dets: Vec<ScoredBox>, cfg: &ConfluenceConfig) -> Vec<ScoredBox> {
    let _span = trace_span!("suppress_bucket", boxes = dets.len()).entered();

    let mut retain = Vec::new();
    let mut iterations = 0usize;
    while !dets.is_empty() {
        let pick = match cfg.selection {
            AnchorSelection::MaxScore => pick_max_score(&dets),
            AnchorSelection::MostConfluent => pick_most_confluent(&dets, cfg.confluence_thr),
        };
        let Some(pick) = pick else { break };

        dets.swap(0, pick.index);
        let mut anchor = dets.remove(0);
        anchor.score = pick.score;
        retain.push(anchor);

        let removed = decay_and_filter(&anchor, &mut dets, cfg);
        iterations += 1;
        trace_debug!(
            "suppress_iteration",
            iteration = iterations,
            removed = removed,
            remaining = dets.len()
        );
    }

    trace_event!(
        "class_retained",
        retained = retain.len(),
        iterations = iterations
    );
    retain
}
