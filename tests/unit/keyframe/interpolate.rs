use super::*;
use crate::foundation::core::Point;

fn k(frame: u64, coords: &[(f64, f64)]) -> (FrameIndex, Polyline) {
    (FrameIndex(frame), Polyline::from_xy(coords))
}

fn keys(entries: Vec<(FrameIndex, Polyline)>) -> KeyFrameSet {
    let mut set = KeyFrameSet::new();
    for (frame, p) in &entries {
        set.insert(*frame, p).unwrap();
    }
    set
}

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn no_keys_leaves_every_slot_empty() {
    let dense = interpolate(&KeyFrameSet::new(), 5, InterpMode::Linear).unwrap();
    assert_eq!(dense.total_frames(), 5);
    assert!(dense.is_empty());
    assert!(!dense.is_complete());
}

#[test]
fn single_key_is_copied_everywhere() {
    let set = keys(vec![k(4, &[(1.0, 2.0), (3.0, 4.0), (9.0, 9.0)])]);
    let dense = interpolate(&set, 7, InterpMode::Linear).unwrap();
    assert!(dense.is_complete());
    for (_, p) in dense.iter() {
        assert_eq!(p, set.get(FrameIndex(4)));
    }
}

#[test]
fn two_keys_interpolate_linearly() {
    let set = keys(vec![
        k(1, &[(0.0, 0.0), (10.0, 0.0)]),
        k(10, &[(0.0, 0.0), (10.0, 10.0)]),
    ]);
    let dense = interpolate(&set, 10, InterpMode::Linear).unwrap();
    assert!(dense.is_complete());

    let f5 = dense.get(FrameIndex(5)).unwrap();
    assert!(close(f5.points()[0], Point::new(0.0, 0.0)));
    assert!(close(f5.points()[1], Point::new(10.0, 40.0 / 9.0)));

    assert_eq!(dense.get(FrameIndex(1)), set.get(FrameIndex(1)));
    assert_eq!(dense.get(FrameIndex(10)), set.get(FrameIndex(10)));
}

#[test]
fn identical_keys_yield_bit_identical_frames() {
    let coords: &[(f64, f64)] = &[(0.1, 0.7), (13.3, 2.9), (21.05, 17.6)];
    let set = keys(vec![k(2, coords), k(9, coords)]);
    let dense = interpolate(&set, 12, InterpMode::Linear).unwrap();
    let reference = Polyline::from_xy(coords);
    for (frame, p) in dense.iter() {
        assert_eq!(p, Some(&reference), "frame {frame}");
    }
}

#[test]
fn boundary_keys_are_propagated_not_extrapolated() {
    let set = keys(vec![
        k(3, &[(0.0, 0.0), (4.0, 0.0)]),
        k(5, &[(0.0, 0.0), (8.0, 0.0)]),
    ]);
    let dense = interpolate(&set, 8, InterpMode::Linear).unwrap();
    assert!(dense.is_complete());
    for f in 1..=3 {
        assert_eq!(dense.get(FrameIndex(f)), set.get(FrameIndex(3)), "frame {f}");
    }
    assert!(close(
        dense.get(FrameIndex(4)).unwrap().points()[1],
        Point::new(6.0, 0.0)
    ));
    for f in 5..=8 {
        assert_eq!(dense.get(FrameIndex(f)), set.get(FrameIndex(5)), "frame {f}");
    }
}

#[test]
fn adjacent_keys_do_not_stop_the_walk() {
    let set = keys(vec![
        k(1, &[(0.0, 0.0), (1.0, 0.0)]),
        k(2, &[(0.0, 0.0), (2.0, 0.0)]),
        k(3, &[(0.0, 0.0), (3.0, 0.0)]),
        k(6, &[(0.0, 0.0), (6.0, 0.0)]),
    ]);
    let dense = interpolate(&set, 6, InterpMode::Linear).unwrap();
    assert!(dense.is_complete());
    for f in 1..=6u64 {
        let end = dense.get(FrameIndex(f)).unwrap().points()[1];
        assert!(close(end, Point::new(f as f64, 0.0)), "frame {f}: {end:?}");
    }
}

#[test]
fn interpolation_is_idempotent() {
    let set = keys(vec![
        k(2, &[(0.0, 0.0), (5.0, 1.0), (9.0, 3.0)]),
        k(7, &[(1.0, 1.0), (6.0, 2.0), (12.0, 8.0)]),
        k(11, &[(2.0, 0.0), (4.0, 4.0), (10.0, 10.0)]),
    ]);
    let a = interpolate(&set, 14, InterpMode::Linear).unwrap();
    let b = interpolate(&set, 14, InterpMode::Linear).unwrap();
    assert_eq!(a, b);
}

#[test]
fn mismatched_pair_is_skipped_and_others_survive() {
    let set = keys(vec![
        k(1, &[(0.0, 0.0), (4.0, 0.0)]),
        k(3, &[(0.0, 0.0), (8.0, 0.0)]),
        k(6, &[(0.0, 0.0), (4.0, 0.0), (8.0, 0.0)]),
    ]);
    let dense = interpolate(&set, 8, InterpMode::Linear).unwrap();

    assert_eq!(
        dense.skipped(),
        &[SkippedSegment {
            start: FrameIndex(3),
            end: FrameIndex(6),
            start_vertices: 2,
            end_vertices: 3,
        }]
    );
    assert!(close(
        dense.get(FrameIndex(2)).unwrap().points()[1],
        Point::new(6.0, 0.0)
    ));
    assert_eq!(dense.get(FrameIndex(3)), set.get(FrameIndex(3)));
    assert!(dense.get(FrameIndex(4)).is_none());
    assert!(dense.get(FrameIndex(5)).is_none());
    for f in 6..=8 {
        assert_eq!(dense.get(FrameIndex(f)), set.get(FrameIndex(6)));
    }
}

#[test]
fn hold_mode_repeats_the_earlier_key() {
    let set = keys(vec![
        k(2, &[(0.0, 0.0), (4.0, 0.0)]),
        k(5, &[(0.0, 0.0), (4.0, 4.0), (8.0, 8.0)]),
    ]);
    let dense = interpolate(&set, 6, InterpMode::Hold).unwrap();
    assert!(dense.is_complete());
    assert!(dense.skipped().is_empty());
    for f in 1..=4 {
        assert_eq!(dense.get(FrameIndex(f)), set.get(FrameIndex(2)), "frame {f}");
    }
    for f in 5..=6 {
        assert_eq!(dense.get(FrameIndex(f)), set.get(FrameIndex(5)), "frame {f}");
    }
}

#[test]
fn keys_outside_the_stack_are_rejected() {
    let set = keys(vec![k(9, &[(0.0, 0.0), (4.0, 0.0)])]);
    assert!(matches!(
        interpolate(&set, 8, InterpMode::Linear),
        Err(KymoError::Validation(_))
    ));
    assert!(interpolate(&KeyFrameSet::new(), 0, InterpMode::Linear).is_err());
}
