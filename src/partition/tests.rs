use super::*;
use crate::image::BinaryMask;
use crate::splice::UniformGrid;

fn bright(w: usize, h: usize) -> PixelImage {
    let mut img = PixelImage::new(w, h, 3);
    for y in 0..h {
        for x in 0..w {
            img.set_color(x, y, [100, 110, 120]);
        }
    }
    img
}

fn mask_with_block(w: usize, h: usize, rows: std::ops::Range<usize>, cols: std::ops::Range<usize>) -> BinaryMask {
    let mut mask = BinaryMask::new(w, h);
    for y in rows {
        for x in cols.clone() {
            mask.set(x, y);
        }
    }
    mask
}

fn grid_plans(w: usize, h: usize, dim: usize) -> Vec<SplicePlan> {
    vec![UniformGrid::new(dim).plan_for(w, h).unwrap()]
}

#[test]
fn labels_only_the_splice_holding_the_anomaly() {
    let refs = ReferenceSet::from_masks([("p01".to_string(), mask_with_block(8, 8, 5..7, 5..7))]);
    let plans = grid_plans(8, 8, 4);
    let partitioner = Partitioner::new(PartitionParams::default(), &refs, &plans);

    let patches = partitioner
        .partition_image("s_Apples_p01.png", &bright(8, 8))
        .unwrap();
    let labels: Vec<_> = patches.iter().map(|p| p.label).collect();
    assert_eq!(
        labels,
        [Label::Normal, Label::Normal, Label::Normal, Label::Anomalous]
    );
    assert!(patches.iter().all(|p| p.pixels.w == 4 && p.pixels.h == 4));
    assert_eq!(patches[3].splice, Splice::new(4..8, 4..8));
}

#[test]
fn patches_remember_which_plan_cut_them() {
    let refs = ReferenceSet::from_masks([("p01".to_string(), BinaryMask::new(8, 8))]);
    let plans = vec![
        UniformGrid::new(4).plan_for(8, 8).unwrap(),
        UniformGrid::new(2).plan_for(8, 8).unwrap(),
    ];
    let partitioner = Partitioner::new(PartitionParams::default(), &refs, &plans);

    let patches = partitioner
        .partition_image("s_Apples_p01.png", &bright(8, 8))
        .unwrap();
    assert_eq!(patches.len(), 20);
    assert!(patches[..4].iter().all(|p| p.plan == 0));
    assert!(patches[4..].iter().all(|p| p.plan == 1));
}

#[test]
fn dark_splices_are_dropped() {
    let refs = ReferenceSet::from_masks([("p01".to_string(), BinaryMask::new(8, 8))]);
    let plans = grid_plans(8, 8, 4);
    let partitioner = Partitioner::new(PartitionParams::default(), &refs, &plans);

    let mut img = bright(8, 8);
    for y in 0..4 {
        for x in 0..4 {
            img.set_color(x, y, [0, 0, 0]);
        }
    }
    let patches = partitioner.partition_image("s_Apples_p01.png", &img).unwrap();
    assert_eq!(patches.len(), 3);
    assert!(patches.iter().all(|p| p.splice != Splice::new(0..4, 0..4)));
}

#[test]
fn plan_outside_image_fails_before_any_patch() {
    let refs = ReferenceSet::from_masks([("p01".to_string(), BinaryMask::new(8, 8))]);
    let plans = grid_plans(8, 8, 4);
    let partitioner = Partitioner::new(PartitionParams::default(), &refs, &plans);

    let err = partitioner
        .partition_image("s_Apples_p01.png", &bright(4, 8))
        .unwrap_err();
    assert!(matches!(err, PrepError::Configuration(_)), "got {err:?}");
}

#[test]
fn run_skips_exemplars_untagged_missing_and_undecodable() {
    let catalog = ImageCatalog::from_names([
        "s_Apples_p01_anomaly_only_view.png",
        "s_Apples_p01.png",
        "s_Apples_plain.png",
        "s_Apples_p02.png",
        "s_Apples_p01_broken.png",
    ]);
    let refs = ReferenceSet::from_masks([("p01".to_string(), mask_with_block(8, 8, 0..4, 0..4))]);
    let plans = grid_plans(8, 8, 4);
    let partitioner = Partitioner::new(PartitionParams::default(), &refs, &plans);

    let outcome = partitioner.run_with(&catalog, |record| {
        if record.name.contains("broken") {
            Err(PrepError::config("corrupt"))
        } else {
            Ok(bright(8, 8))
        }
    });

    assert_eq!(outcome.images.len(), 1);
    assert_eq!(outcome.images[0].name, "s_Apples_p01.png");
    assert_eq!(outcome.images[0].index, 1);
    let reasons: Vec<_> = outcome.skipped.iter().map(|s| &s.reason).collect();
    assert_eq!(reasons[0], &SkipReason::Exemplar);
    assert_eq!(reasons[1], &SkipReason::NoTag);
    assert_eq!(reasons[2], &SkipReason::MissingReference("p02".to_string()));
    assert!(matches!(reasons[3], SkipReason::Decode(_)));

    let corpus = outcome.into_corpus();
    assert_eq!(corpus.anomalous.len(), 1);
    assert_eq!(corpus.normal.len(), 3);
}

#[test]
fn params_reject_out_of_range_thresholds() {
    let params = PartitionParams {
        anomaly_threshold: 1.5,
        ..Default::default()
    };
    assert!(params.validate().is_err());
    assert!(PartitionParams::default().validate().is_ok());
}
