//! Score filtering and per-class bucketing.
//!
//! Bucketing runs once per call, before any suppression, and drops detections
//! whose score is below [`BUCKET_SCORE_THRESHOLD`]. That floor is fixed and is
//! applied independently of the configurable post-decay `score_thr`.

mod map;

pub use map::ClassMap;

use crate::detection::{BoxXyxy, Detection, ScoredBox};
use crate::trace::trace_event;
use crate::util::{ConfluenceError, ConfluenceResult};
use std::hash::Hash;

/// Minimum score a detection needs to enter a class bucket.
pub const BUCKET_SCORE_THRESHOLD: f64 = 0.05;

/// Per-class working sets keyed by class id.
pub type ClassBuckets<C> = ClassMap<C, Vec<ScoredBox>>;

/// Groups parallel box/score/class sequences into per-class buckets.
///
/// Box order within a class follows input order. Fails with
/// [`ConfluenceError::InvalidInput`] when the three slices differ in length.
pub fn assign_boxes_to_classes<C>(
    boxes: &[BoxXyxy],
    scores: &[f64],
    classes: &[C],
) -> ConfluenceResult<ClassBuckets<C>>
where
    C: Eq + Hash + Clone,
{
    if boxes.len() != scores.len() || boxes.len() != classes.len() {
        return Err(ConfluenceError::InvalidInput {
            reason: "boxes, scores and classes must have equal lengths",
        });
    }

    let records = boxes
        .iter()
        .zip(scores)
        .zip(classes)
        .map(|((bbox, &score), class_id)| (bbox, score, class_id));
    Ok(bucket_records(records))
}

/// Groups [`Detection`] records into per-class buckets.
pub fn bucket_detections<C>(detections: &[Detection<C>]) -> ClassBuckets<C>
where
    C: Eq + Hash + Clone,
{
    bucket_records(
        detections
            .iter()
            .map(|det| (&det.bbox, det.score, &det.class_id)),
    )
}

fn bucket_records<'a, C, I>(records: I) -> ClassBuckets<C>
where
    C: Eq + Hash + Clone + 'a,
    I: IntoIterator<Item = (&'a BoxXyxy, f64, &'a C)>,
{
    let mut buckets = ClassBuckets::new();
    let mut kept = 0usize;
    let mut dropped = 0usize;
    for (bbox, score, class_id) in records {
        if score >= BUCKET_SCORE_THRESHOLD {
            buckets
                .entry_or_default(class_id.clone())
                .push(ScoredBox::new(*bbox, score));
            kept += 1;
        } else {
            dropped += 1;
        }
    }

    trace_event!(
        "bucketed",
        classes = buckets.len(),
        kept = kept,
        dropped = dropped
    );
    buckets
}
