use brouwer::StateVector;
use approx::assert_relative_eq;

mod deep_space;
mod driver;
mod near_earth;

/// Vallado's verification catalog object 00005 (Vanguard 1), the canonical near-earth case.
pub const VANGUARD_1: (&str, &str) = (
    "1 00005U 58002B   00179.78495062  .00000023  00000-3  28098-4 0  4753",
    "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667",
);

/// A Molniya-class orbit in the half day resonance band (period ~718 min, e = 0.7).
pub const MOLNIYA: (&str, &str) = (
    "1 40000U 15001A   20001.00000000  .00000000  00000-0  00000-0 0  9994",
    "2 40000  63.4000  45.0000 7000000 270.0000  10.0000  2.00600000 10004",
);

/// A geosynchronous orbit in the one day resonance band.
pub const GEOSYNC: (&str, &str) = (
    "1 40001U 15002A   20001.00000000  .00000000  00000-0  00000-0 0  9996",
    "2 40001   6.8000  80.0000 0002500 120.0000 240.0000  1.00271000 10007",
);

/// An element set whose perigee sits below the Earth surface.
pub const DECAYED: (&str, &str) = (
    "1 40002U 15003A   20001.00000000  .00000000  00000-0  00000-0 0  9998",
    "2 40002  51.6000  10.0000 0230000  30.0000  60.0000 16.50000000 10008",
);

/// Compares a propagated state against a reference state, component by component, well within
/// the 1e-4 relative bound of the published verification data.
pub fn assert_state(state: &StateVector, radius_km: [f64; 3], velocity_km_s: [f64; 3]) {
    for axis in 0..3 {
        assert_relative_eq!(
            state.radius_km[axis],
            radius_km[axis],
            max_relative = 1e-7,
            epsilon = 1e-6
        );
        assert_relative_eq!(
            state.velocity_km_s[axis],
            velocity_km_s[axis],
            max_relative = 1e-7,
            epsilon = 1e-6
        );
    }
}

/// Relative vis-viva residual of a state against a semi-major axis in kilometers.
pub fn vis_viva_residual(state: &StateVector, mu_km3_s2: f64, sma_km: f64) -> f64 {
    let expected_v2 = mu_km3_s2 * (2.0 / state.rmag_km() - 1.0 / sma_km);
    let v2 = state.vmag_km_s() * state.vmag_km_s();
    (v2 - expected_v2).abs() / v2
}
