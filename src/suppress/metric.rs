//! Confluence distance and score decay.

use crate::detection::{BoxXyxy, ScoredBox};
use crate::normalize::{normalize_box, normalize_boxes, Extent};
use crate::suppress::ConfluenceConfig;

/// Manhattan distance between two boxes after normalizing both against their
/// shared enclosing extent.
///
/// The result lies in `[0, 4]` and is `0` for identical boxes; overlapping
/// boxes typically land well below `2`. Lower means more confluent.
pub fn manhattan_distance(a: &BoxXyxy, b: &BoxXyxy) -> f64 {
    let extent = Extent::enclosing(a, b);
    l1(&normalize_box(a, &extent), &normalize_box(b, &extent))
}

#[inline]
fn l1(a: &BoxXyxy, b: &BoxXyxy) -> f64 {
    (a[0] - b[0]).abs() + (a[2] - b[2]).abs() + (a[1] - b[1]).abs() + (a[3] - b[3]).abs()
}

/// Distances from `anchor` to every candidate, each against its own extent.
pub(crate) fn anchor_distances(anchor: &BoxXyxy, candidates: &[ScoredBox]) -> Vec<f64> {
    let boxes: Vec<BoxXyxy> = candidates.iter().map(ScoredBox::bbox).collect();
    let extents: Vec<Extent> = boxes
        .iter()
        .map(|bbox| Extent::enclosing(anchor, bbox))
        .collect();

    let anchors = extents.iter().map(|extent| normalize_box(anchor, extent));
    let others = normalize_boxes(&boxes, &extents);
    anchors
        .zip(others.iter())
        .map(|(a, b)| l1(&a, b))
        .collect()
}

/// Multiplicative weight applied to a candidate at `distance` from the anchor.
///
/// Candidates farther than `confluence_thr` keep weight `1`. Closer ones get
/// `exp(-(1 - d)^2 / sigma)` in gaussian mode and `0` otherwise, so the weight
/// jumps back to `1` just past the threshold.
pub fn decay_weight(distance: f64, cfg: &ConfluenceConfig) -> f64 {
    if distance <= cfg.confluence_thr {
        if cfg.gaussian {
            let gap = 1.0 - distance;
            (-(gap * gap) / cfg.sigma).exp()
        } else {
            0.0
        }
    } else {
        1.0
    }
}

/// Decays every candidate against `anchor` and drops those that fall below
/// `score_thr`. Returns the number of candidates removed.
pub(crate) fn decay_and_filter(
    anchor: &ScoredBox,
    candidates: &mut Vec<ScoredBox>,
    cfg: &ConfluenceConfig,
) -> usize {
    let distances = anchor_distances(&anchor.bbox(), candidates);
    for (candidate, distance) in candidates.iter_mut().zip(distances) {
        candidate.score *= decay_weight(distance, cfg);
    }
    let before = candidates.len();
    candidates.retain(|candidate| candidate.score >= cfg.score_thr);
    before - candidates.len()
}
