/*
    Brouwer, analytical satellite propagation
    Copyright (C) 2023 Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use super::{KeplerNeverConvergedSnafu, PropagationError};
use snafu::prelude::*;

/// Iteration bound of the reference theory's solver.
pub(crate) const MAX_ITERATIONS: usize = 10;
/// Convergence tolerance on the Newton correction, in radians.
pub(crate) const TOLERANCE: f64 = 1.0e-12;

/// Solves the equinoctial form of Kepler's equation for the eccentric argument of latitude.
///
/// `u` is the mean argument of latitude, and `(axn, ayn)` the equinoctial eccentricity components.
/// Newton's corrections are clamped to 0.95 rad so a near-parabolic guess cannot overshoot.
pub(crate) fn solve(u: f64, axn: f64, ayn: f64) -> Result<f64, PropagationError> {
    let mut epw = u;
    let mut correction = 9999.9_f64;
    let mut iterations = 1;
    while correction.abs() >= TOLERANCE && iterations <= MAX_ITERATIONS {
        let sin_epw = epw.sin();
        let cos_epw = epw.cos();
        correction = 1.0 - cos_epw * axn - sin_epw * ayn;
        correction = (u - ayn * cos_epw + axn * sin_epw - epw) / correction;
        if correction.abs() >= 0.95 {
            correction = if correction > 0.0 { 0.95 } else { -0.95 };
        }
        epw += correction;
        iterations += 1;
    }
    ensure!(
        correction.abs() < TOLERANCE,
        KeplerNeverConvergedSnafu {
            iterations: MAX_ITERATIONS,
            last_correction: correction,
        }
    );
    Ok(epw)
}
