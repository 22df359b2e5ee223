//! Anchor selection strategies.

use crate::detection::ScoredBox;
use crate::suppress::metric::manhattan_distance;
use crate::util::math::{argmax_first, argmin_first};

/// How each iteration picks the box to retain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnchorSelection {
    /// Highest remaining score; the box keeps its own score.
    #[default]
    MaxScore,
    /// Box with the lowest score-weighted mean distance to its neighbours.
    ///
    /// Costs a full pairwise pass per iteration. The retained box takes the
    /// best score among its confluent neighbours. A box with no neighbour
    /// inside `confluence_thr` keeps its own score; the reference Python
    /// implementation retains it with score `0` instead.
    MostConfluent,
}

/// Chosen anchor index and the score it is retained with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct AnchorPick {
    pub(crate) index: usize,
    pub(crate) score: f64,
}

/// Picks the first highest-scoring box.
pub(crate) fn pick_max_score(dets: &[ScoredBox]) -> Option<AnchorPick> {
    let index = argmax_first(dets.iter().map(|d| d.score))?;
    Some(AnchorPick {
        index,
        score: dets[index].score,
    })
}

/// Picks the box whose neighbourhood is most confluent.
///
/// For box `i`, neighbours within `confluence_thr` contribute their distance
/// and all others contribute `1`; the mean is scaled by `1 - score_i`. A lone
/// box has proximity `0`. The retained score is the highest neighbour score
/// within the threshold, or the box's own score if it has no such neighbour.
pub(crate) fn pick_most_confluent(dets: &[ScoredBox], confluence_thr: f64) -> Option<AnchorPick> {
    let mut proximities = Vec::with_capacity(dets.len());
    let mut confluence_scores = Vec::with_capacity(dets.len());

    for (i, det) in dets.iter().enumerate() {
        let bbox = det.bbox();
        let mut sum = 0.0f64;
        let mut others = 0usize;
        let mut best_neighbour: Option<f64> = None;

        for (j, other) in dets.iter().enumerate() {
            if i == j {
                continue;
            }
            others += 1;
            let distance = manhattan_distance(&bbox, &other.bbox());
            if distance <= confluence_thr {
                sum += distance;
                best_neighbour = Some(best_neighbour.map_or(other.score, |s| s.max(other.score)));
            } else {
                sum += 1.0;
            }
        }

        let mean = if others == 0 { 0.0 } else { sum / others as f64 };
        proximities.push(mean * (1.0 - det.score));
        confluence_scores.push(best_neighbour.unwrap_or(det.score));
    }

    let index = argmin_first(proximities)?;
    Some(AnchorPick {
        index,
        score: confluence_scores[index],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_score_picks_first_of_ties() {
        let dets = [
            ScoredBox::new([0.0, 0.0, 1.0, 1.0], 0.4),
            ScoredBox::new([1.0, 1.0, 2.0, 2.0], 0.9),
            ScoredBox::new([2.0, 2.0, 3.0, 3.0], 0.9),
        ];
        let pick = pick_max_score(&dets).unwrap();
        assert_eq!(pick, AnchorPick { index: 1, score: 0.9 });
        assert!(pick_max_score(&[]).is_none());
    }

    #[test]
    fn lone_box_keeps_its_score() {
        let dets = [ScoredBox::new([0.0, 0.0, 1.0, 1.0], 0.3)];
        let pick = pick_most_confluent(&dets, 0.7).unwrap();
        assert_eq!(pick, AnchorPick { index: 0, score: 0.3 });
    }

    #[test]
    fn most_confluent_prefers_box_inside_cluster() {
        // Box 1 sits between boxes 0 and 2; box 3 is isolated.
        let dets = [
            ScoredBox::new([0.0, 0.0, 10.0, 10.0], 0.6),
            ScoredBox::new([1.0, 0.0, 11.0, 10.0], 0.6),
            ScoredBox::new([2.0, 0.0, 12.0, 10.0], 0.62),
            ScoredBox::new([200.0, 200.0, 210.0, 210.0], 0.6),
        ];
        let pick = pick_most_confluent(&dets, 0.7).unwrap();
        assert_eq!(pick.index, 1);
        assert_eq!(pick.score, 0.62);
    }

    #[test]
    fn isolated_boxes_fall_back_to_own_score() {
        let dets = [
            ScoredBox::new([0.0, 0.0, 10.0, 10.0], 0.8),
            ScoredBox::new([100.0, 100.0, 110.0, 110.0], 0.5),
        ];
        let pick = pick_most_confluent(&dets, 0.7).unwrap();
        // Both have mean proximity 1; the higher score shrinks it more.
        assert_eq!(pick, AnchorPick { index: 0, score: 0.8 });
    }
}
