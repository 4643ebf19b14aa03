use glyphmorph::cost::SegmentCost;
use glyphmorph::kurbo::{BezPath, Circle, PathEl, Point, Shape};
use glyphmorph::{morph, morph_glyphs, Alignment, CostModel, MorphConfig, MorphError, Outline};

fn polygon(points: &[(f64, f64)]) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(points[0]);
    for &p in &points[1..] {
        path.line_to(p);
    }
    path.close_path();
    path
}

fn unsampled() -> MorphConfig {
    MorphConfig {
        tolerance: None,
        ..MorphConfig::default()
    }
}

fn on_curve(path: &BezPath) -> Vec<Point> {
    path.elements()
        .iter()
        .filter_map(|el| match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) | PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => {
                Some(p)
            }
            PathEl::ClosePath => None,
        })
        .collect()
}

fn assert_points(actual: &[Point], expected: &[(f64, f64)]) {
    assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
    for (p, &(x, y)) in actual.iter().zip(expected) {
        assert!(
            (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9,
            "{:?} vs {:?}",
            actual,
            expected
        );
    }
}

const TRIANGLE: [(f64, f64); 3] = [(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)];

#[test]
fn translated_triangle_pairs_edge_by_edge() {
    let a = polygon(&TRIANGLE);
    let b = polygon(&TRIANGLE.map(|(x, y)| (x + 2.0, y + 2.0)));
    let m = morph(&a, &b, &unsampled()).expect("solvable");

    assert!(m.cost() < 1e-9, "cost {}", m.cost());
    assert_eq!(m.correspondence().pairs(), vec![(0, 0), (1, 1), (2, 2)]);

    let halfway = m.interpolate(0.5).expect("valid t");
    assert_points(
        &on_curve(&halfway),
        &[(1.0, 1.0), (11.0, 1.0), (6.0, 11.0), (1.0, 1.0)],
    );
}

#[test]
fn half_length_segments_merge_in_pairs() {
    let a = polygon(&TRIANGLE);
    let b = polygon(&[
        (0.0, 0.0),
        (5.0, 0.0),
        (10.0, 0.0),
        (7.5, 5.0),
        (5.0, 10.0),
        (2.5, 5.0),
    ]);
    for window in [2, 3, 6] {
        let config = MorphConfig {
            window,
            ..unsampled()
        };
        let m = morph(&a, &b, &config).expect("solvable");
        let steps = m.correspondence().steps();
        assert_eq!(steps.len(), 3, "window {}", window);
        for (k, step) in steps.iter().enumerate() {
            assert_eq!(step.a, k..k + 1);
            assert_eq!(step.b, 2 * k..2 * k + 2);
        }
    }
}

#[test]
fn end_factors_reproduce_the_sources() {
    let a = polygon(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
    let b = polygon(&[(10.0, 10.0), (130.0, 10.0), (130.0, 130.0), (10.0, 130.0)]);
    let m = morph(&a, &b, &MorphConfig::default()).expect("solvable");
    assert_eq!(m.outline_a().len(), 20);
    assert_eq!(m.outline_b().len(), 24);

    let on_square = |p: &Point, lo: f64, hi: f64| {
        let near = |v: f64, w: f64| (v - w).abs() < 1e-9;
        let inside = |v: f64| v > lo - 1e-9 && v < hi + 1e-9;
        inside(p.x) && inside(p.y) && (near(p.x, lo) || near(p.x, hi) || near(p.y, lo) || near(p.y, hi))
    };

    let at0 = on_curve(&m.interpolate(0.0).expect("valid t"));
    assert!(at0.iter().all(|p| on_square(p, 0.0, 100.0)), "{:?}", at0);
    for corner in [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)] {
        assert!(at0.contains(&Point::from(corner)), "missing {:?}", corner);
    }

    let at1 = on_curve(&m.interpolate(1.0).expect("valid t"));
    assert!(at1.iter().all(|p| on_square(p, 10.0, 130.0)), "{:?}", at1);
    assert_eq!(at1.first(), Some(&Point::new(10.0, 10.0)));
}

#[test]
fn finer_resampling_keeps_length_and_at_most_doubles_count() {
    let circle = Circle::new((0.0, 0.0), 300.0).to_path(0.1);
    let coarse = Outline::from_path(&circle, &MorphConfig::default()).expect("valid");
    let fine = Outline::from_path(
        &circle,
        &MorphConfig {
            tolerance: Some(10.0),
            ..MorphConfig::default()
        },
    )
    .expect("valid");

    assert!(fine.len() >= coarse.len());
    assert!(fine.len() <= 2 * coarse.len(), "{} vs {}", fine.len(), coarse.len());
    let (lc, lf) = (coarse.total_length(), fine.total_length());
    assert!((lc - lf).abs() < 1e-6 * lc, "{} vs {}", lc, lf);
}

#[test]
fn backtracking_reaches_the_origin_within_the_window() {
    let config = MorphConfig::default();
    let a = Outline::from_path(&Circle::new((0.0, 0.0), 100.0).to_path(0.1), &config)
        .expect("valid");
    let b = Outline::from_path(
        &polygon(&[(-90.0, -90.0), (90.0, -90.0), (90.0, 90.0), (-90.0, 90.0)]),
        &config,
    )
    .expect("valid");
    let alignment =
        Alignment::solve(&a, &b, &SegmentCost::from_config(&config), config.window).expect("solvable");

    assert_eq!(alignment.value(0, 0), 0.0);
    let mut state = alignment.sink();
    assert_eq!(state, (a.len(), b.len()));
    let mut moves = 0;
    while let Some(prev) = alignment.predecessor(state.0, state.1) {
        let (di, dj) = (state.0 - prev.0, state.1 - prev.1);
        assert!((1..=config.window).contains(&di) && (1..=config.window).contains(&dj));
        assert!(di == 1 || dj == 1);
        assert!(alignment.value(prev.0, prev.1) >= 0.0);
        state = prev;
        moves += 1;
    }
    assert_eq!(state, (0, 0));
    assert!(moves <= a.len() + b.len());
    assert!(alignment.total_cost().is_finite());
}

#[test]
fn turning_model_ignores_rotation() {
    let a = polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
    // Same square turned a quarter turn about the origin.
    let b = polygon(&[(0.0, 0.0), (0.0, 10.0), (-10.0, 10.0), (-10.0, 0.0)]);

    let turning = MorphConfig {
        cost: CostModel::Turning,
        ..unsampled()
    };
    let m = morph(&a, &b, &turning).expect("solvable");
    assert_eq!(m.outline_a().len(), 8);
    assert!(m.cost() < 1e-4, "cost {}", m.cost());

    let direction = morph(&a, &b, &unsampled()).expect("solvable");
    assert!(direction.cost() > 1.0, "cost {}", direction.cost());
}

#[test]
fn empty_outline_gives_trivial_result() {
    let m = morph(&BezPath::new(), &polygon(&TRIANGLE), &MorphConfig::default()).expect("trivial");
    assert_eq!(m.cost(), 0.0);
    assert!(m.correspondence().steps().is_empty());
    assert!(m.interpolate(0.5).expect("valid t").elements().is_empty());
}

#[test]
fn malformed_inputs_are_rejected() {
    let config = MorphConfig::default();
    let triangle = polygon(&TRIANGLE);

    let nan = polygon(&[(0.0, 0.0), (f64::NAN, 0.0), (5.0, 10.0)]);
    assert!(matches!(morph(&nan, &triangle, &config), Err(MorphError::NonFinite)));

    let mut two = polygon(&TRIANGLE);
    two.extend(polygon(&[(20.0, 0.0), (30.0, 0.0), (25.0, 10.0)]).elements().iter().copied());
    assert!(matches!(morph(&two, &triangle, &config), Err(MorphError::InvalidPath(_))));

    let tiny = MorphConfig {
        max_segments: 10,
        ..config.clone()
    };
    let big = polygon(&[(0.0, 0.0), (1000.0, 0.0), (500.0, 1000.0)]);
    assert!(matches!(
        morph(&big, &triangle, &tiny),
        Err(MorphError::TooLarge { limit: 10, .. })
    ));

    let many: Vec<(f64, f64)> = (0..20)
        .map(|k| {
            let a = k as f64 * std::f64::consts::TAU / 20.0;
            (10.0 * a.cos(), 10.0 * a.sin())
        })
        .collect();
    assert!(matches!(
        morph(&triangle, &polygon(&many), &unsampled()),
        Err(MorphError::Unbalanced { a: 3, b: 20, window: 6 })
    ));

    let m = morph(&triangle, &triangle, &config).expect("solvable");
    assert!(matches!(m.interpolate(1.5), Err(MorphError::BlendFactor(_))));
}

#[test]
fn huge_coordinates_never_give_a_silent_zero_cost() {
    // An edge whose length overflows f64.
    let long = polygon(&[(0.0, 0.0), (1.5e308, 0.0), (0.0, 1.5e308)]);
    assert!(matches!(morph(&long, &long, &unsampled()), Err(MorphError::NonFinite)));

    // Finite lengths whose mismatch cost overflows.
    let s = 1.5e308;
    let a = polygon(&[(0.0, 0.0), (s, 0.0), (s, s), (0.0, s)]);
    let b = polygon(&[(s, 0.0), (s, s), (0.0, s), (0.0, 0.0)]);
    assert!(matches!(morph(&a, &b, &unsampled()), Err(MorphError::CostOverflow)));

    // Large but well-behaved outlines still solve.
    let big = polygon(&TRIANGLE.map(|(x, y)| (x * 1e150, y * 1e150)));
    let m = morph(&big, &big, &unsampled()).expect("solvable");
    assert_eq!(m.cost(), 0.0);
    assert_eq!(m.correspondence().steps().len(), 3);
}

#[test]
fn glyphs_are_compared_contour_by_contour() {
    let outer = |d: f64| polygon(&[(d, d), (d + 200.0, d), (d + 200.0, d + 200.0), (d, d + 200.0)]);
    let inner = |d: f64| polygon(&[(d + 50.0, d + 50.0), (d + 50.0, d + 150.0), (d + 150.0, d + 150.0), (d + 150.0, d + 50.0)]);

    let glyph = morph_glyphs(&[outer(0.0), inner(0.0)], &[outer(4.0), inner(4.0)], &MorphConfig::default())
        .expect("solvable");
    assert_eq!(glyph.contours.len(), 2);
    assert!(glyph.cost() < 1e-3, "cost {}", glyph.cost());

    let halfway = glyph.interpolate(0.5).expect("valid t");
    assert_eq!(halfway.len(), 2);
    assert_eq!(on_curve(&halfway[0]).first(), Some(&Point::new(2.0, 2.0)));
    assert_eq!(on_curve(&halfway[1]).first(), Some(&Point::new(52.0, 52.0)));
}
