//! Integration tests for the rolling-shutter warp engine.
//!
//! Validates the forward warp's structural guarantees (identity, anchor
//! exactness, center-seam pinning) and the numeric inversion against it.

use approx::assert_relative_eq;
use rswarp_core::{
    anchor_position, invert_warp, AnchorColumn, AnchorRow, ForwardWarp, RollingShutterParams,
    Vec2, WarpError, DEFAULT_TOLERANCE,
};

/// A moderately distorted but well-conditioned configuration used by the
/// round-trip tests.
fn panning_params() -> RollingShutterParams {
    let mut params = RollingShutterParams {
        ratio: 0.6,
        ..Default::default()
    };
    // Camera pans right while tilting slightly: top anchors drift left to
    // right across frames, bottom anchors lag behind.
    params.set_top_motion(AnchorColumn::Left, Vec2::new(-1.08, 0.98), Vec2::new(-0.94, 1.03));
    params.set_top_motion(AnchorColumn::Middle, Vec2::new(-0.06, 0.99), Vec2::new(0.05, 1.02));
    params.set_top_motion(AnchorColumn::Right, Vec2::new(0.93, 1.0), Vec2::new(1.06, 1.01));
    params.set_bottom_motion(AnchorColumn::Left, Vec2::new(-1.05, -1.02), Vec2::new(-0.97, -0.99));
    params.set_bottom_motion(AnchorColumn::Middle, Vec2::new(-0.04, -1.01), Vec2::new(0.03, -1.0));
    params.set_bottom_motion(AnchorColumn::Right, Vec2::new(0.96, -1.0), Vec2::new(1.04, -0.98));
    params
}

#[test]
fn identity_configuration_warps_nothing() {
    let warp = RollingShutterParams::default().compile();
    assert!(warp.is_identity());

    let test_points = vec![
        Vec2::new(0.5, 0.5),
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.2, 0.9),
        Vec2::new(0.85, 0.1),
    ];
    for p in test_points {
        let warped = warp.apply_warp(p).expect("forward warp never fails");
        assert!(
            (warped - p).norm() < 1e-12,
            "identity warp moved {p:?} to {warped:?}"
        );
    }
}

#[test]
fn anchors_map_to_nominal_plus_offset() {
    let warp = panning_params().compile();

    for col in AnchorColumn::ALL {
        // Anchor nominal positions in unit space: ndc (x, ±1) -> ((x+1)/2, 0 or 1).
        let top_ndc = anchor_position(AnchorRow::Top, col);
        let top_unit = Vec2::new((top_ndc.x + 1.0) / 2.0, 1.0);
        let warped = warp.apply_warp(top_unit).unwrap();
        let expected_ndc = top_ndc + warp.top_offset(col);
        let expected = Vec2::new((expected_ndc.x + 1.0) / 2.0, (expected_ndc.y + 1.0) / 2.0);
        assert!(
            (warped - expected).norm() < 1e-12,
            "top {col:?}: got {warped:?}, expected {expected:?}"
        );

        let bottom_ndc = anchor_position(AnchorRow::Bottom, col);
        let bottom_unit = Vec2::new((bottom_ndc.x + 1.0) / 2.0, 0.0);
        let warped = warp.apply_warp(bottom_unit).unwrap();
        let expected_ndc = bottom_ndc + warp.bottom_offset(col);
        let expected = Vec2::new((expected_ndc.x + 1.0) / 2.0, (expected_ndc.y + 1.0) / 2.0);
        assert!(
            (warped - expected).norm() < 1e-12,
            "bottom {col:?}: got {warped:?}, expected {expected:?}"
        );
    }
}

#[test]
fn center_scanline_is_never_displaced() {
    // The vertical fit's middle control value is pinned to zero, so points
    // on unit y = 0.5 (ndc y = 0) stay put no matter the motion.
    let warp = panning_params().compile();
    for x in [0.0, 0.2, 0.5, 0.77, 1.0] {
        let p = Vec2::new(x, 0.5);
        let warped = warp.apply_warp(p).unwrap();
        assert!((warped - p).norm() < 1e-12, "center seam moved at x={x}");
    }
}

#[test]
fn single_anchor_drift_scenario() {
    // ratio 0.5, top-middle anchor drifting up by 0.2 over one frame, all
    // other anchors stationary. The offset interpolated at t = 0.5 is
    // 0.5*0.1 + 0.25*0.1 = 0.075 in ndc y, so the unit-space warp of
    // (0.5, 1.0) is exactly (0.5, 1.0 + 0.075/2).
    let mut params = RollingShutterParams {
        ratio: 0.5,
        ..Default::default()
    };
    params.set_top_motion(AnchorColumn::Middle, Vec2::new(0.0, 1.0), Vec2::new(0.0, 1.2));
    let warp = params.compile();

    let offset = warp.top_offset(AnchorColumn::Middle);
    assert!((offset - Vec2::new(0.0, 0.075)).norm() < 1e-12);

    let p = Vec2::new(0.5, 1.0);
    let warped = warp.apply_warp(p).unwrap();
    assert_relative_eq!(warped.x, 0.5, epsilon = 1e-12);
    assert_relative_eq!(warped.y, 1.0375, epsilon = 1e-12);

    let recovered = warp.remove_warp(warped).expect("well away from any fold");
    assert!((recovered - p).norm() < 1e-6);
}

#[test]
fn remove_warp_round_trips_over_frame() {
    let warp = panning_params().compile();

    for i in 0..=6 {
        for j in 0..=6 {
            let p = Vec2::new(i as f64 / 6.0, j as f64 / 6.0);
            let q = warp.apply_warp(p).unwrap();
            let recovered = warp
                .remove_warp(q)
                .unwrap_or_else(|e| panic!("inversion failed at {p:?}: {e}"));

            // The guarantee is in the warped space; the input-space error is
            // of the same order because the warp is near-isometric here.
            let rewarped = warp.apply_warp(recovered).unwrap();
            assert!((rewarped - q).norm() <= DEFAULT_TOLERANCE);
            assert!(
                (recovered - p).norm() < 1e-5,
                "round trip drifted at {p:?}: {recovered:?}"
            );
        }
    }
}

#[test]
fn fold_target_fails_deterministically() {
    // Push both anchor rows down by a full frame height: the warped y in ndc
    // is t - t^2, whose image tops out at 0.25. Targets above that have no
    // preimage and the solver must give up cleanly.
    let mut params = RollingShutterParams {
        ratio: 1.0,
        ..Default::default()
    };
    for col in AnchorColumn::ALL {
        let top = anchor_position(AnchorRow::Top, col);
        let bottom = anchor_position(AnchorRow::Bottom, col);
        // offsets are interpolated from next (top) and previous (bottom)
        params.set_top_motion(col, top, top + Vec2::new(0.0, -1.0));
        params.set_bottom_motion(col, bottom + Vec2::new(0.0, -1.0), bottom);
    }
    let warp = params.compile();
    for col in AnchorColumn::ALL {
        assert!((warp.top_offset(col) - Vec2::new(0.0, -1.0)).norm() < 1e-12);
        assert!((warp.bottom_offset(col) - Vec2::new(0.0, -1.0)).norm() < 1e-12);
    }

    // ndc y target 0.6 > 0.25: unreachable beyond the extremum.
    let unreachable = Vec2::new(0.5, 0.8);
    let err = warp.remove_warp(unreachable).unwrap_err();
    assert!(matches!(
        err,
        WarpError::StepUnderflow { .. } | WarpError::IterationLimit { .. }
    ));

    // A target below the extremum still inverts.
    let p = Vec2::new(0.5, 0.55);
    let q = warp.apply_warp(p).unwrap();
    let recovered = warp.remove_warp(q).unwrap();
    let rewarped = warp.apply_warp(recovered).unwrap();
    assert!((rewarped - q).norm() <= DEFAULT_TOLERANCE);
}

#[test]
fn looser_tolerance_converges_in_fewer_or_equal_iterations() {
    let warp = panning_params().compile();
    let q = warp.apply_warp(Vec2::new(0.3, 0.85)).unwrap();

    let loose = invert_warp(&warp, q, q, 1e-3).expect("loose tolerance converges");
    let tight = invert_warp(&warp, q, q, 1e-9).expect("tight tolerance converges");
    assert!(
        loose.iterations <= tight.iterations,
        "loose {} > tight {}",
        loose.iterations,
        tight.iterations
    );
}

#[test]
fn explicit_initial_guess_is_honored() {
    let warp = panning_params().compile();
    let p = Vec2::new(0.42, 0.13);
    let q = warp.apply_warp(p).unwrap();

    // Starting at the true preimage should converge at least as directly as
    // starting at the target.
    let recovered = warp.remove_warp_with(q, p, DEFAULT_TOLERANCE).unwrap();
    let rewarped = warp.apply_warp(recovered).unwrap();
    assert!((rewarped - q).norm() <= DEFAULT_TOLERANCE);
}
