use super::{assert_state, vis_viva_residual, DECAYED, VANGUARD_1};
use brouwer::{Elements, GravityModelKind, PropagationError, Sgp4, Sgp4Record, TimeTagged};
use rstest::rstest;

fn vanguard(kind: GravityModelKind) -> Sgp4 {
    let elements = Elements::from_lines(VANGUARD_1.0, VANGUARD_1.1).unwrap();
    Sgp4::with_model(elements, kind)
}

/// Position components must reproduce the published WGS-72 verification vectors to better than
/// 1e-4 relative error.
#[test]
fn vanguard_reference_vectors() {
    let _ = pretty_env_logger::try_init();
    let prop = vanguard(GravityModelKind::Wgs72);

    for (tsince, radius_km, velocity_km_s) in [
        (
            0.0,
            [7022.46529266, -1400.08296755, 0.03995155],
            [1.893841015, 6.405893759, 4.534807250],
        ),
        (
            360.0,
            [-7154.03120202, -3783.17682504, -3536.19412294],
            [4.741887409, -4.151817765, -2.093935425],
        ),
        (
            720.0,
            [-7134.59340119, 6531.68641334, 3260.27186483],
            [-4.113793027, -2.911922039, -2.557327851],
        ),
        (
            1080.0,
            [5568.53901181, 4492.06992591, 3863.87641983],
            [-4.209106476, 5.159719888, 2.744852980],
        ),
        (
            1440.0,
            [-938.55923943, -6268.18748831, -4294.02924751],
            [7.536105209, -0.427127707, 0.989878080],
        ),
        (
            4320.0,
            [-9060.47373570, 4658.70952502, 813.68673153],
            [-2.232832783, -4.110453490, -3.157345433],
        ),
    ] {
        let state = prop.propagate_tsince(tsince).unwrap();
        assert_state(&state, radius_km, velocity_km_s);
    }
}

/// The epoch state must sit between the perigee and apogee radii and satisfy vis-viva against
/// the initialized semi-major axis.
#[rstest]
#[case(GravityModelKind::Wgs72)]
#[case(GravityModelKind::Wgs84)]
fn epoch_state_is_physical(#[case] kind: GravityModelKind) {
    let prop = vanguard(kind);
    let record = prop.record().unwrap();
    let state = prop.propagate_tsince(0.0).unwrap();

    let rmag = state.rmag_km();
    let radius_km = prop.gravity().radius_km;
    let perigee_radius = record.perigee_altitude_km() + radius_km;
    let apogee_radius = record.apogee_altitude_km() + radius_km;
    assert!(
        rmag > perigee_radius * 0.99 && rmag < apogee_radius * 1.01,
        "rmag = {rmag} outside [{perigee_radius}, {apogee_radius}]"
    );

    // The short-period periodics move the osculating orbit by well under a percent
    let residual = vis_viva_residual(&state, prop.gravity().mu_km3_s2, record.semi_major_axis_km());
    assert!(residual < 1e-2, "vis-viva residual = {residual}");

    assert!(record.eccentricity() >= 0.0 && record.eccentricity() < 1.0);
    assert!(record.semi_major_axis_km() > 0.0);
}

/// Propagating forward and then returning to epoch must reproduce the epoch state exactly:
/// every step restarts from the record, never from a previous call.
#[test]
fn return_to_epoch_is_exact() {
    let prop = vanguard(GravityModelKind::Wgs72);
    let at_epoch = prop.propagate_tsince(0.0).unwrap();
    let _far = prop.propagate_tsince(1440.0).unwrap();
    let back = prop.propagate_tsince(0.0).unwrap();
    assert_eq!(at_epoch, back);

    // Backward propagation is supported and stays physical
    let before = prop.propagate_tsince(-360.0).unwrap();
    assert!(before.rmag_km() > prop.gravity().radius_km);
    assert!(before.epoch() < at_epoch.epoch());
}

/// A sub-surface perigee is a typed initialization failure, not a state vector.
#[test]
fn decayed_orbit_is_refused() {
    let elements = Elements::from_lines(DECAYED.0, DECAYED.1).unwrap();
    let err = Sgp4Record::initialize(&elements, GravityModelKind::Wgs72.into()).unwrap_err();
    assert!(
        matches!(err, PropagationError::OrbitDecayed { radius_km } if radius_km < 6378.135),
        "{err}"
    );

    // The driver caches and replays the failure on every call
    let prop = Sgp4::with_model(
        Elements::from_lines(DECAYED.0, DECAYED.1).unwrap(),
        GravityModelKind::Wgs72,
    );
    let first = prop.propagate_tsince(0.0).unwrap_err();
    let second = prop.propagate_tsince(60.0).unwrap_err();
    assert_eq!(first, second);
}

/// Concurrent steps on one shared record must return bit-identical states.
#[test]
fn concurrent_steps_are_bit_identical() {
    let prop = vanguard(GravityModelKind::Wgs72);
    let record = prop.record().unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| record.step(720.0).unwrap()))
            .collect();
        let states: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for pair in states.windows(2) {
            assert_eq!(pair[0], pair[1]);
        }
    });
}

/// The two gravity models are distinct constant sets and must not produce identical states.
#[test]
fn gravity_models_are_distinct() {
    let wgs72 = vanguard(GravityModelKind::Wgs72)
        .propagate_tsince(1440.0)
        .unwrap();
    let wgs84 = vanguard(GravityModelKind::Wgs84)
        .propagate_tsince(1440.0)
        .unwrap();
    assert!((wgs72.radius_km - wgs84.radius_km).norm() > 1e-3);
}
