use confluence::{confluence_nms, AnchorSelection, ConfluenceConfig};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

/// Deterministic clustered detections: `objects` objects with `per_object`
/// jittered boxes each, spread over `classes` classes.
fn make_detections(
    objects: usize,
    per_object: usize,
    classes: u32,
) -> (Vec<[f64; 4]>, Vec<f64>, Vec<u32>) {
    let total = objects * per_object;
    let mut boxes = Vec::with_capacity(total);
    let mut scores = Vec::with_capacity(total);
    let mut class_ids = Vec::with_capacity(total);
    for obj in 0..objects {
        let cx = ((obj * 97) % 640) as f64;
        let cy = ((obj * 61) % 480) as f64;
        let size = 20.0 + ((obj * 13) % 60) as f64;
        for k in 0..per_object {
            let jitter = ((k * 7 + obj) % 9) as f64 - 4.0;
            boxes.push([cx + jitter, cy - jitter, cx + size + jitter, cy + size]);
            scores.push(0.05 + (((obj * 31 + k * 17) % 95) as f64) / 100.0);
            class_ids.push(obj as u32 % classes);
        }
    }
    (boxes, scores, class_ids)
}

fn bench_confluence(c: &mut Criterion) {
    let (boxes, scores, classes) = make_detections(200, 10, 8);

    let gaussian = ConfluenceConfig::default();
    c.bench_function("confluence_nms_gaussian_2000", |b| {
        b.iter(|| black_box(confluence_nms(&boxes, &scores, &classes, &gaussian).unwrap()));
    });

    let hard = ConfluenceConfig {
        gaussian: false,
        ..ConfluenceConfig::default()
    };
    c.bench_function("confluence_nms_hard_2000", |b| {
        b.iter(|| black_box(confluence_nms(&boxes, &scores, &classes, &hard).unwrap()));
    });

    let (small_boxes, small_scores, small_classes) = make_detections(40, 6, 4);
    let most_confluent = ConfluenceConfig {
        selection: AnchorSelection::MostConfluent,
        ..ConfluenceConfig::default()
    };
    c.bench_function("confluence_most_confluent_240", |b| {
        b.iter(|| {
            black_box(
                confluence_nms(&small_boxes, &small_scores, &small_classes, &most_confluent)
                    .unwrap(),
            )
        });
    });

    if cfg!(feature = "rayon") {
        let parallel = ConfluenceConfig {
            parallel: true,
            ..ConfluenceConfig::default()
        };
        c.bench_function("confluence_nms_gaussian_2000_parallel", |b| {
            b.iter(|| black_box(confluence_nms(&boxes, &scores, &classes, &parallel).unwrap()));
        });
    }
}

criterion_group!(benches, bench_confluence);
criterion_main!(benches);
