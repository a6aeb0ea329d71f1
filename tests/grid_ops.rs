use flowfield::prelude::*;
use flowfield::{ErrorKind, RawInfo};

fn setup_grid() -> Grid {
    #[rustfmt::skip]
    let mass = vec![
        0.0, 1.0, 2.0, 3.0, //
        4.0, 5.0, 6.0, 7.0, //
        8.0, 9.0, 10.0, 11.0, //
    ];

    let xs = (0..12).map(|i| (i % 4) as f64 * 0.5).collect::<Vec<_>>();
    let ys = (0..12).map(|i| (i / 4) as f64 * 0.5).collect::<Vec<_>>();

    let info = GridInfo::default()
        .with_shape(4, 3)
        .unwrap()
        .with_origin(0., 0.)
        .unwrap()
        .with_spacing(0.5, 0.5)
        .unwrap()
        .with_num_bins(12);

    GridBuilder::new()
        .field("X", xs)
        .field("Y", ys)
        .field("M", mass)
        .field("N", vec![1i32; 12])
        .info(info)
        .build()
        .unwrap()
}

#[test]
fn copy_is_independent() {
    let grid = setup_grid();
    let copy = grid.copy();

    assert_eq!(grid, copy);

    let a = grid.values("M").unwrap();
    let b = copy.values("M").unwrap();
    assert_ne!(a.as_ptr(), b.as_ptr());

    // changing the copy leaves the source grid untouched
    let moved = copy.translate("M", 1.0).unwrap();
    assert_eq!(grid.values("M").unwrap()[0], 0.0);
    assert_eq!(moved.values("M").unwrap()[0], 1.0);
}

#[test]
fn select_is_a_closed_interval() {
    let grid = setup_grid();
    let selected = grid.select("M", Some(3.0), Some(6.0)).unwrap();

    assert_eq!(selected.values("M").unwrap(), &[3.0, 4.0, 5.0, 6.0]);
    assert_eq!(selected.info().shape(), None);
    assert_eq!(selected.info().origin(), None);
    assert_eq!(selected.info().spacing(), Some((0.5, 0.5)));
    assert_eq!(selected.info().num_bins(), Some(4));
}

#[test]
fn select_halves_recover_all_bins() {
    let grid = setup_grid();

    for v in [0.0, 2.5, 5.0, 11.0, 20.0] {
        let below = grid.select("M", None, Some(v)).unwrap();
        let above = grid.select("M", Some(v), None).unwrap();
        let at = grid.select("M", Some(v), Some(v)).unwrap();

        assert_eq!(below.len() + above.len() - at.len(), grid.len());
    }
}

#[test]
fn select_errors() {
    let grid = setup_grid();

    let err = grid.select("T", None, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = grid.select("M", Some(f64::NAN), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn rectangular_cut_recounts_shape() {
    let grid = setup_grid();
    let coords = CoordLabels::default();

    let cut = grid
        .rectangular_cut(&coords, (Some(0.5), Some(1.0)), (Some(0.5), None))
        .unwrap();

    assert_eq!(cut.values("M").unwrap(), &[5.0, 6.0, 9.0, 10.0]);
    assert_eq!(cut.info().shape(), Some((2, 2)));
    assert_eq!(cut.info().origin(), Some((0.5, 0.5)));
    assert_eq!(cut.info().spacing(), Some((0.5, 0.5)));
    assert_eq!(cut.info().num_bins(), Some(4));
}

#[test]
fn rectangular_cut_with_other_coordinate_labels() {
    let grid = GridBuilder::new()
        .field("r", vec![0., 1., 0., 1.])
        .field("z", vec![0., 0., 1., 1.])
        .field("M", vec![1., 2., 3., 4.])
        .build()
        .unwrap();

    let cut = grid
        .rectangular_cut(&CoordLabels::new("r", "z"), (Some(1.), None), (None, None))
        .unwrap();

    assert_eq!(cut.values("M").unwrap(), &[2., 4.]);
    assert_eq!(cut.info().shape(), Some((1, 2)));
    assert_eq!(cut.info().origin(), Some((1., 0.)));
}

#[test]
fn translate_by_scalar_and_per_bin() {
    let grid = setup_grid();

    let moved = grid.translate("X", 1.5).unwrap();
    assert_eq!(moved.values("X").unwrap()[..4], [1.5, 2.0, 2.5, 3.0]);

    let delta: Vec<f64> = (0..12).map(|i| i as f64).collect();
    let moved = grid.translate("M", delta).unwrap();
    assert_eq!(moved.values("M").unwrap()[11], 22.0);

    let moved = grid.translate("M", vec![2.0]).unwrap();
    assert_eq!(moved.values("M").unwrap()[0], 2.0);

    let err = grid.translate("M", vec![1.0, 2.0]).unwrap_err();
    assert!(matches!(err, flowfield::Error::Broadcast(_)));
}

#[test]
fn translate_keeps_integer_precision() {
    let grid = setup_grid();
    let moved = grid.translate("N", 0.7).unwrap();

    assert_eq!(moved.field("N").unwrap().precision(), Precision::Int32);
    assert_eq!(moved.values("N").unwrap()[0], 1.0);
}

#[test]
fn duplicate_labels_are_rejected() {
    let err = GridBuilder::new()
        .field("M", vec![1.0])
        .field("M", vec![2.0])
        .build()
        .unwrap_err();

    assert!(matches!(err, flowfield::Error::DuplicateLabel(_)));
}

#[test]
fn metadata_from_json() {
    let raw: RawInfo =
        serde_json::from_str(r#"{"shape": [4, 3], "spacing": [0.5, 0.5], "num_bins": 12}"#).unwrap();
    let info = GridInfo::try_from(raw).unwrap();

    assert_eq!(info.shape(), Some((4, 3)));
    assert_eq!(info.origin(), None);
    assert_eq!(info.size(), Some((2.0, 1.5)));

    let raw: RawInfo = serde_json::from_str(r#"{"shape": [4, 3, 1]}"#).unwrap();
    let err = GridInfo::try_from(raw).unwrap_err();
    assert!(matches!(err, flowfield::Error::MalformedMetadata(_)));

    assert!(serde_json::from_str::<RawInfo>(r#"{"size": [1, 2]}"#).is_err());
}
