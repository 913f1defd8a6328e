use super::{assert_state, vis_viva_residual, GEOSYNC, MOLNIYA};
use brouwer::propagators::{Regime, ResonanceKind};
use brouwer::{Elements, GravityModelKind, Sgp4};

fn propagator(tle: (&str, &str), kind: GravityModelKind) -> Sgp4 {
    Sgp4::with_model(Elements::from_lines(tle.0, tle.1).unwrap(), kind)
}

fn resonance_of(prop: &Sgp4) -> Option<ResonanceKind> {
    match prop.record().unwrap().regime() {
        Regime::DeepSpace(deep) => deep.resonance.map(|res| res.kind),
        Regime::NearEarth { .. } => None,
    }
}

/// The Molniya-class set must classify as deep-space, half day resonant, and reproduce its
/// reference vectors, including under backward propagation.
#[test]
fn molniya_half_day_resonance() {
    let _ = pretty_env_logger::try_init();
    let prop = propagator(MOLNIYA, GravityModelKind::Wgs72);
    let record = prop.record().unwrap();

    assert!(record.is_deep_space());
    assert!(matches!(
        resonance_of(&prop),
        Some(ResonanceKind::HalfDay(_))
    ));
    assert!((record.perigee_altitude_km() - 1588.736).abs() < 0.5);

    for (tsince, radius_km, velocity_km_s) in [
        (
            0.0,
            [8127.00270792, 5378.34956008, -3899.13282804],
            [2.712850988, 5.843446055, 4.409235137],
        ),
        (
            360.0,
            [-15677.56115995, 12819.47196522, 40229.45442831],
            [-1.068112928, -1.225051835, -0.220108570],
        ),
        (
            720.0,
            [8461.12834685, 6107.92499660, -3319.91100216],
            [2.372535134, 5.600911379, 4.560475698],
        ),
        (
            1440.0,
            [8753.58146639, 6805.00236739, -2724.72315094],
            [2.061955815, 5.361245750, 4.671947122],
        ),
        (
            4320.0,
            [9578.52850238, 9287.02572027, -265.99271332],
            [1.079654977, 4.481222869, 4.846817095],
        ),
        (
            -360.0,
            [-15552.07900199, 12961.70662194, 40256.36669629],
            [-1.075574673, -1.218948166, -0.197390589],
        ),
    ] {
        let state = prop.propagate_tsince(tsince).unwrap();
        assert_state(&state, radius_km, velocity_km_s);
    }
}

/// The geosynchronous set must classify as one day resonant and reproduce its reference vectors.
#[test]
fn geosync_one_day_resonance() {
    let prop = propagator(GEOSYNC, GravityModelKind::Wgs72);
    let record = prop.record().unwrap();

    assert!(record.is_deep_space());
    assert!(matches!(
        resonance_of(&prop),
        Some(ResonanceKind::Synchronous(_))
    ));

    for (tsince, radius_km, velocity_km_s) in [
        (
            0.0,
            [7334.09000239, 41527.04750654, 8.17228457],
            [-3.006217565, 0.530117599, 0.364831380],
        ),
        (
            360.0,
            [-41251.44604266, 7091.68336275, 5002.47763702],
            [-0.520958060, -3.030989918, -0.002294340],
        ),
        (
            720.0,
            [-6940.29893678, -41584.08854238, -56.00288369],
            [3.011654560, -0.502888498, -0.364937944],
        ),
        (
            1440.0,
            [6628.03332953, 41645.33457740, 94.43886266],
            [-3.014911152, 0.478265664, 0.364842283],
        ),
        (
            4320.0,
            [5211.28793161, 41845.21473529, 267.97275482],
            [-3.029641529, 0.374216990, 0.364562697],
        ),
        (
            -360.0,
            [41212.08201579, -7429.65907293, -5004.40557602],
            [0.545675214, 3.025160740, -0.000754183],
        ),
    ] {
        let state = prop.propagate_tsince(tsince).unwrap();
        assert_state(&state, radius_km, velocity_km_s);
    }
}

/// The deep-space branch must also hold on the WGS-84 constants.
#[test]
fn deep_space_on_wgs84() {
    let molniya = propagator(MOLNIYA, GravityModelKind::Wgs84);
    assert_state(
        &molniya.propagate_tsince(360.0).unwrap(),
        [-15677.56470775, 12819.48344863, 40229.47544087],
        [-1.068109864, -1.225048473, -0.220108192],
    );

    let geo = propagator(GEOSYNC, GravityModelKind::Wgs84);
    assert_state(
        &geo.propagate_tsince(360.0).unwrap(),
        [-41251.43797452, 7091.68197592, 5002.47665729],
        [-0.520957900, -3.030988991, -0.002294339],
    );
}

/// The resonance integration restarts from epoch on every call: interleaving long and short
/// spans must not change any result.
#[test]
fn resonance_integration_is_call_order_independent() {
    let prop = propagator(MOLNIYA, GravityModelKind::Wgs72);
    let early = prop.propagate_tsince(360.0).unwrap();
    let _far = prop.propagate_tsince(4320.0).unwrap();
    let _back = prop.propagate_tsince(-2160.0).unwrap();
    assert_eq!(prop.propagate_tsince(360.0).unwrap(), early);
}

/// Geosynchronous states stay on a near-circular orbit of the right energy.
#[test]
fn geosync_energy_is_consistent() {
    let prop = propagator(GEOSYNC, GravityModelKind::Wgs72);
    let record = prop.record().unwrap();
    for tsince in [0.0, 360.0, 720.0, 1440.0] {
        let state = prop.propagate_tsince(tsince).unwrap();
        let residual =
            vis_viva_residual(&state, prop.gravity().mu_km3_s2, record.semi_major_axis_km());
        assert!(residual < 1e-2, "t = {tsince}, residual = {residual}");
        // Geosynchronous radius band
        assert!(
            (41_000.0..43_000.0).contains(&state.rmag_km()),
            "t = {tsince}, rmag = {}",
            state.rmag_km()
        );
    }
}
