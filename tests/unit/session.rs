use super::*;
use crate::foundation::core::PixelDepth;
use crate::sample::pixels::GrayStack;

fn line(coords: &[(f64, f64)]) -> Polyline {
    Polyline::from_xy(coords)
}

fn flat_stack(frames: usize, value: f32) -> GrayStack {
    GrayStack::new(12, 6, PixelDepth::Gray8, vec![vec![value; 72]; frames]).unwrap()
}

#[test]
fn zero_frame_stack_is_rejected() {
    assert!(matches!(
        KymoSession::new(0),
        Err(KymoError::Validation(_))
    ));
}

#[test]
fn recording_fills_every_frame() {
    let mut session = KymoSession::new(10).unwrap();
    session
        .record_key_frame(FrameIndex(1), &line(&[(0.0, 0.0), (10.0, 0.0)]))
        .unwrap();
    assert!(session.dense().is_complete());

    session
        .record_key_frame(FrameIndex(10), &line(&[(0.0, 0.0), (10.0, 10.0)]))
        .unwrap();
    assert_eq!(session.key_frames().len(), 2);

    let mid = session.dense_at(FrameIndex(5)).unwrap();
    assert!((mid.points()[1].y - 40.0 / 9.0).abs() < 1e-9);
    assert_eq!(session.dense_at(FrameIndex(11)), None);
}

#[test]
fn mismatched_key_frame_is_declined_and_state_kept() {
    let mut session = KymoSession::new(8).unwrap();
    session
        .record_key_frame(FrameIndex(2), &line(&[(0.0, 0.0), (4.0, 0.0)]))
        .unwrap();
    session
        .record_key_frame(FrameIndex(4), &line(&[(0.0, 0.0), (6.0, 0.0)]))
        .unwrap();
    let keys_before = session.key_frames().clone();
    let dense_before = session.dense().clone();

    let err = session
        .record_key_frame(
            FrameIndex(7),
            &line(&[(0.0, 0.0), (3.0, 1.0), (6.0, 0.0)]),
        )
        .unwrap_err();
    assert!(err.is_user_input());
    assert_eq!(session.key_frames(), &keys_before);
    assert_eq!(session.dense(), &dense_before);
}

#[test]
fn invalid_key_frames_are_rejected() {
    let mut session = KymoSession::new(3).unwrap();
    let ok = line(&[(0.0, 0.0), (4.0, 0.0)]);
    assert!(matches!(
        session.record_key_frame(FrameIndex(0), &ok),
        Err(KymoError::Validation(_))
    ));
    assert!(matches!(
        session.record_key_frame(FrameIndex(4), &ok),
        Err(KymoError::Validation(_))
    ));
    assert!(matches!(
        session.record_key_frame(FrameIndex(1), &line(&[(1.0, 1.0)])),
        Err(KymoError::Validation(_))
    ));
    assert!(session.key_frames().is_empty());
}

#[test]
fn hold_mode_accepts_differing_vertex_counts() {
    let mut session = KymoSession::new(5).unwrap().with_mode(InterpMode::Hold);
    session
        .record_key_frame(FrameIndex(1), &line(&[(0.0, 0.0), (4.0, 0.0)]))
        .unwrap();
    session
        .record_key_frame(
            FrameIndex(4),
            &line(&[(0.0, 0.0), (2.0, 2.0), (4.0, 0.0)]),
        )
        .unwrap();
    assert!(session.dense().is_complete());

    // Switching back to linear blending cannot work with these keys.
    assert!(session.set_mode(InterpMode::Linear).unwrap_err().is_user_input());
    assert_eq!(session.mode(), InterpMode::Hold);
}

#[test]
fn anchor_must_be_reset_before_moving() {
    let mut session = KymoSession::new(3).unwrap();
    assert!(!session.anchor().exists);

    session.set_anchor(2).unwrap();
    assert_eq!(session.anchor(), AnchorSpec::at(2));

    session.set_anchor(2).unwrap();
    assert!(session.set_anchor(1).unwrap_err().is_user_input());
    assert_eq!(session.anchor(), AnchorSpec::at(2));

    session.reset_anchor();
    assert!(!session.anchor().exists);
    session.set_anchor(1).unwrap();
    assert_eq!(session.anchor(), AnchorSpec::at(1));
}

#[test]
fn reset_clears_keys_dense_and_anchor() {
    let mut session = KymoSession::new(4).unwrap();
    session
        .record_key_frame(FrameIndex(2), &line(&[(0.0, 0.0), (4.0, 0.0)]))
        .unwrap();
    session.set_anchor(1).unwrap();

    session.reset_key_frames();
    assert!(session.key_frames().is_empty());
    assert!(session.dense().is_empty());
    assert_eq!(session.dense().total_frames(), 4);
    assert!(!session.anchor().exists);
}

#[test]
fn kymograph_needs_key_frames() {
    let session = KymoSession::new(3).unwrap();
    let err = session
        .make_kymograph(&flat_stack(3, 5.0), LineWidth::ONE, &AssembleOpts::default())
        .unwrap_err();
    assert!(err.is_user_input());
}

#[test]
fn kymograph_rejects_a_stack_of_another_length() {
    let mut session = KymoSession::new(3).unwrap();
    session
        .record_key_frame(FrameIndex(1), &line(&[(1.0, 1.0), (6.0, 1.0)]))
        .unwrap();
    assert!(matches!(
        session.make_kymograph(&flat_stack(4, 5.0), LineWidth::ONE, &AssembleOpts::default()),
        Err(KymoError::Validation(_))
    ));
}

#[test]
fn even_width_is_accepted() {
    let mut session = KymoSession::new(2).unwrap();
    session
        .record_key_frame(FrameIndex(1), &line(&[(1.0, 2.0), (7.0, 2.0)]))
        .unwrap();
    let kymo = session
        .make_kymograph(
            &flat_stack(2, 20.0),
            LineWidth::new(2).unwrap(),
            &AssembleOpts::default(),
        )
        .unwrap();
    // Three samples summed over a divisor of two.
    assert_eq!(kymo.row(0), Some(vec![30.0; 6]));
    assert_eq!(kymo.row(1), Some(vec![30.0; 6]));
}
