use confluence::{
    confluence_nms, AnchorSelection, ConfluenceConfig, ConfluenceError, Detection, ScoredBox,
};

fn hard(confluence_thr: f64) -> ConfluenceConfig {
    ConfluenceConfig {
        confluence_thr,
        gaussian: false,
        ..ConfluenceConfig::default()
    }
}

#[test]
fn duplicate_box_is_suppressed_in_hard_mode() {
    let boxes = [[0.0, 0.0, 10.0, 10.0], [0.0, 0.0, 10.0, 10.0]];
    let out = confluence_nms(&boxes, &[0.9, 0.8], &[0u32, 0], &hard(0.7)).unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(
        out.get(&0).unwrap(),
        &vec![ScoredBox::new([0.0, 0.0, 10.0, 10.0], 0.9)]
    );
}

#[test]
fn disjoint_boxes_survive_with_defaults() {
    let boxes = [[0.0, 0.0, 10.0, 10.0], [100.0, 100.0, 110.0, 110.0]];
    let out = confluence_nms(&boxes, &[0.9, 0.8], &[0u32, 0], &ConfluenceConfig::default())
        .unwrap();

    assert_eq!(
        out.get(&0).unwrap(),
        &vec![
            ScoredBox::new([0.0, 0.0, 10.0, 10.0], 0.9),
            ScoredBox::new([100.0, 100.0, 110.0, 110.0], 0.8),
        ]
    );
}

#[test]
fn empty_input_gives_empty_output() {
    let boxes: [[f64; 4]; 0] = [];
    let classes: [u32; 0] = [];
    let out = confluence_nms(&boxes, &[], &classes, &ConfluenceConfig::default()).unwrap();
    assert!(out.is_empty());
}

#[test]
fn all_low_scores_give_empty_output() {
    let boxes = [[0.0, 0.0, 10.0, 10.0], [20.0, 20.0, 30.0, 30.0]];
    let out = confluence_nms(
        &boxes,
        &[0.01, 0.049],
        &[1u32, 2],
        &ConfluenceConfig::default(),
    )
    .unwrap();
    assert!(out.is_empty());
}

#[test]
fn classes_are_suppressed_independently() {
    // Same box in two classes: neither suppresses the other.
    let boxes = [[0.0, 0.0, 10.0, 10.0], [0.0, 0.0, 10.0, 10.0]];
    let out = confluence_nms(&boxes, &[0.9, 0.8], &["person", "car"], &hard(0.7)).unwrap();

    let keys: Vec<&str> = out.keys().copied().collect();
    assert_eq!(keys, vec!["person", "car"]);
    assert_eq!(out.get(&"person").unwrap()[0].score, 0.9);
    assert_eq!(out.get(&"car").unwrap()[0].score, 0.8);
}

#[test]
fn low_score_threshold_keeps_decayed_duplicates() {
    let boxes = [[0.0, 0.0, 10.0, 10.0], [0.0, 0.0, 10.0, 10.0]];
    let cfg = ConfluenceConfig {
        score_thr: 0.0,
        ..ConfluenceConfig::default()
    };
    let out = confluence_nms(&boxes, &[0.9, 0.8], &[0u32, 0], &cfg).unwrap();
    let retained = out.get(&0).unwrap();
    assert_eq!(retained.len(), 2);
    assert!(retained[1].score < 0.8);
}

#[test]
fn raising_score_threshold_drops_decayed_duplicates() {
    let boxes = [[0.0, 0.0, 10.0, 10.0], [0.0, 0.0, 10.0, 10.0]];
    let cfg = ConfluenceConfig {
        score_thr: 0.2,
        ..ConfluenceConfig::default()
    };
    let out = confluence_nms(&boxes, &[0.9, 0.8], &[0u32, 0], &cfg).unwrap();
    assert_eq!(out.get(&0).unwrap().len(), 1);
}

#[test]
fn zero_area_duplicates_are_fully_confluent() {
    let boxes = [[5.0, 5.0, 5.0, 5.0], [5.0, 5.0, 5.0, 5.0]];
    let out = confluence_nms(&boxes, &[0.9, 0.8], &[0u32, 0], &hard(0.7)).unwrap();
    let retained = out.get(&0).unwrap();
    assert_eq!(retained.len(), 1);
    assert!(retained[0].score.is_finite());
}

#[test]
fn mismatched_lengths_are_rejected() {
    let boxes = [[0.0, 0.0, 10.0, 10.0], [0.0, 0.0, 10.0, 10.0]];
    let err = confluence_nms(&boxes, &[0.9], &[0u32, 0], &ConfluenceConfig::default())
        .err()
        .unwrap();
    assert!(matches!(err, ConfluenceError::InvalidInput { .. }));

    let err = confluence_nms(&boxes, &[0.9, 0.8], &[0u32], &ConfluenceConfig::default())
        .err()
        .unwrap();
    assert!(matches!(err, ConfluenceError::InvalidInput { .. }));
}

#[test]
fn non_positive_sigma_is_rejected_before_work() {
    let cfg = ConfluenceConfig {
        sigma: 0.0,
        ..ConfluenceConfig::default()
    };
    let err = confluence_nms(&[[0.0, 0.0, 1.0, 1.0]], &[0.9], &[0u32], &cfg)
        .err()
        .unwrap();
    assert_eq!(
        err,
        ConfluenceError::InvalidConfiguration {
            reason: "sigma must be finite and positive",
        }
    );
}

#[test]
fn detections_and_slices_agree_for_most_confluent() {
    let dets = vec![
        Detection::new([10.0, 10.0, 50.0, 50.0], 1i64, 0.9),
        Detection::new([12.0, 11.0, 52.0, 49.0], 1i64, 0.85),
        Detection::new([100.0, 100.0, 150.0, 150.0], 1i64, 0.95),
        Detection::new([103.0, 99.0, 151.0, 152.0], 1i64, 0.7),
    ];
    let cfg = ConfluenceConfig {
        selection: AnchorSelection::MostConfluent,
        ..hard(0.7)
    };
    let boxes: Vec<[f64; 4]> = dets.iter().map(|d| d.bbox).collect();
    let scores: Vec<f64> = dets.iter().map(|d| d.score).collect();
    let classes: Vec<i64> = dets.iter().map(|d| d.class_id).collect();

    let from_slices = confluence_nms(&boxes, &scores, &classes, &cfg).unwrap();
    let from_dets = confluence::confluence_nms_detections(&dets, &cfg).unwrap();
    assert_eq!(from_slices, from_dets);
    assert_eq!(from_slices.get(&1).unwrap().len(), 2);
}
