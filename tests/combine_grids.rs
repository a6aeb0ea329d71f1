use approx::assert_abs_diff_eq;

use flowfield::combine::SIMPLE_WEIGHTS;
use flowfield::prelude::*;
use flowfield::{average, build_union_grid, project, union_grid, ErrorKind};

fn pair(m: f64, u: f64) -> Grid {
    GridBuilder::new()
        .field("X", vec![0., 1.])
        .field("Y", vec![0., 0.])
        .field("M", vec![m, m])
        .field("U", vec![u, u])
        .build()
        .unwrap()
}

fn patch(x0: f64, y0: f64, nx: usize, ny: usize, value: f64) -> Grid {
    let xs = (0..nx * ny).map(|k| x0 + (k % nx) as f64).collect::<Vec<_>>();
    let ys = (0..nx * ny).map(|k| y0 + (k / nx) as f64).collect::<Vec<_>>();

    let info = GridInfo::default()
        .with_shape(nx, ny)
        .unwrap()
        .with_origin(x0, y0)
        .unwrap()
        .with_spacing(1., 1.)
        .unwrap();

    GridBuilder::new()
        .field("X", xs)
        .field("Y", ys)
        .field("M", vec![value; nx * ny])
        .info(info)
        .build()
        .unwrap()
}

#[test]
fn arithmetic_mean() {
    let coords = CoordLabels::default();
    let avg = average(&[pair(1., 1.), pair(5., 2.)], &[], &coords).unwrap();

    assert_eq!(avg.values("M").unwrap(), &[3., 3.]);
    assert_eq!(avg.values("U").unwrap(), &[1.5, 1.5]);
    assert_eq!(avg.values("X").unwrap(), &[0., 1.]);
}

#[test]
fn weighted_mean() {
    let coords = CoordLabels::default();
    let avg = average(&[pair(1., 1.), pair(5., 2.)], &[("U", "M")], &coords).unwrap();

    assert_eq!(avg.values("M").unwrap(), &[3., 3.]);
    for &u in avg.values("U").unwrap() {
        assert_abs_diff_eq!(u, 11. / 6., epsilon = 1e-12);
    }
}

#[test]
fn zero_total_weight_gives_zero() {
    let coords = CoordLabels::default();
    let a = GridBuilder::new()
        .field("X", vec![0., 1.])
        .field("Y", vec![0., 0.])
        .field("M", vec![0., 1.])
        .field("U", vec![3., 3.])
        .build()
        .unwrap();

    let avg = average(&[a.clone(), a], &[("U", "M")], &coords).unwrap();
    assert_eq!(avg.values("U").unwrap(), &[0., 3.]);
}

#[test]
fn average_of_none_and_one() {
    let coords = CoordLabels::default();

    let empty = average(&[], &[], &coords).unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.labels().count(), 0);

    let single = pair(2., 3.);
    assert_eq!(average(&[single.clone()], &[], &coords).unwrap(), single);
}

#[test]
fn average_with_simple_weights() {
    let coords = CoordLabels::default();
    let grid = |m: f64, n: f64, t: f64| {
        GridBuilder::new()
            .field("X", vec![0.])
            .field("Y", vec![0.])
            .field("M", vec![m])
            .field("N", vec![n])
            .field("T", vec![t])
            .field("U", vec![1.])
            .field("V", vec![-1.])
            .build()
            .unwrap()
    };

    let avg = average(&[grid(1., 3., 100.), grid(3., 1., 200.)], &SIMPLE_WEIGHTS, &coords).unwrap();

    assert_eq!(avg.values("M").unwrap(), &[2.]);
    assert_eq!(avg.values("T").unwrap(), &[125.]);
    assert_eq!(avg.values("U").unwrap(), &[1.]);
    assert_eq!(avg.values("V").unwrap(), &[-1.]);
}

#[test]
fn average_needs_matching_coordinates() {
    let coords = CoordLabels::default();
    let shifted = pair(1., 1.).translate("X", 0.5).unwrap();

    let err = average(&[pair(1., 1.), shifted], &[], &coords).unwrap_err();
    assert!(matches!(err, flowfield::Error::CoordinateMismatch(_)));

    // differences within the tolerance are accepted
    let nudged = pair(1., 1.).translate("X", 1e-5).unwrap();
    assert!(average(&[pair(1., 1.), nudged], &[], &coords).is_ok());
}

#[test]
fn average_needs_every_label() {
    let coords = CoordLabels::default();

    let err = average(&[pair(1., 1.), pair(2., 2.)], &[("T", "N")], &coords).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let partial = GridBuilder::new()
        .field("X", vec![0., 1.])
        .field("Y", vec![0., 0.])
        .field("M", vec![1., 1.])
        .build()
        .unwrap();

    let err = average(&[pair(1., 1.), partial], &[], &coords).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn union_then_project() {
    let coords = CoordLabels::default();
    let a = patch(0., 0., 2, 1, 1.);
    let b = patch(2., 1., 1, 2, 2.);

    let union = union_grid(&[a.clone(), b.clone()], &coords).unwrap();
    assert_eq!(union.info().shape(), Some((3, 3)));
    assert_eq!(union.info().num_bins(), Some(9));
    assert_eq!(union.values("M").unwrap(), &[0.; 9]);

    let union = project(&union, &a, &coords).unwrap();
    let union = project(&union, &b, &coords).unwrap();

    #[rustfmt::skip]
    let expected = [
        1., 1., 0.,
        0., 0., 2.,
        0., 0., 2.,
    ];
    assert_eq!(union.values("M").unwrap(), &expected);
    assert_eq!(union.info().origin(), Some((0., 0.)));
}

#[test]
fn union_spacing_must_match() {
    let coords = CoordLabels::default();
    let a = patch(0., 0., 2, 2, 1.);

    let err = build_union_grid(&[a], (0.5, 0.5), &coords).unwrap_err();
    assert!(matches!(err, flowfield::Error::SpacingMismatch(_)));
}

#[test]
fn union_grid_needs_a_spacing() {
    let coords = CoordLabels::default();

    let err = union_grid(&[pair(1., 1.)], &coords).unwrap_err();
    assert!(matches!(err, flowfield::Error::MissingMetadata(_)));

    // grids without a spacing are combined with the requested one
    let union = build_union_grid(&[pair(1., 1.)], (0.5, 1.), &coords).unwrap();
    assert_eq!(union.values("X").unwrap(), &[0., 0.5, 1.]);
}

#[test]
fn projection_onto_ambiguous_union_fails() {
    let coords = CoordLabels::default();
    let union = GridBuilder::new()
        .field("X", vec![0., 0.])
        .field("Y", vec![0., 0.])
        .field("M", vec![0., 0.])
        .build()
        .unwrap();
    let source = pair(1., 1.).select("X", None, Some(0.)).unwrap();

    let err = project(&union, &source, &coords).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AmbiguousMapping);
}

#[test]
fn coordinate_axes_need_distinct_labels() {
    let same = CoordLabels::new("X", "X");
    let a = patch(0., 0., 2, 2, 1.);

    let err = build_union_grid(&[a.clone()], (1., 1.), &same).unwrap_err();
    assert!(matches!(err, flowfield::Error::CoordinateLabels(_)));

    let union = build_union_grid(&[a.clone()], (1., 1.), &CoordLabels::default()).unwrap();
    let err = project(&union, &a, &same).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = average(&[pair(1., 1.), pair(2., 2.)], &[], &same).unwrap_err();
    assert!(matches!(err, flowfield::Error::CoordinateLabels(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn missing_coordinate_field_is_invalid_input() {
    let coords = CoordLabels::default();
    let without_y = GridBuilder::new()
        .field("X", vec![0., 1.])
        .field("M", vec![1., 1.])
        .field("U", vec![1., 1.])
        .build()
        .unwrap();

    let err = average(&[pair(1., 1.), without_y.clone()], &[], &coords).unwrap_err();
    assert!(matches!(err, flowfield::Error::CoordinateLabels(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);

    let union = build_union_grid(&[pair(1., 1.)], (1., 1.), &coords).unwrap();
    let err = project(&union, &without_y, &coords).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = build_union_grid(&[pair(1., 1.), without_y], (1., 1.), &coords).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}
