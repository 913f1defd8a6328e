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

use crate::cosmic::GravityError;
use crate::io::ParsingError;
use snafu::prelude::*;

mod kepler;

mod deep_space;
pub use self::deep_space::*;

mod sgp4;
pub use self::sgp4::*;

mod propagator;
pub use self::propagator::*;

/// Every failure a propagation can surface. None of these are silently approximated: a state
/// vector is only returned when every correction stayed physical.
#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PropagationError {
    #[snafu(display(
        "orbit decayed: radius of {radius_km:.3} km is below the Earth equatorial radius"
    ))]
    OrbitDecayed { radius_km: f64 },
    #[snafu(display(
        "Kepler's equation did not converge within {iterations} iterations, last correction {last_correction:.3e} rad"
    ))]
    KeplerNeverConverged {
        iterations: usize,
        last_correction: f64,
    },
    #[snafu(display(
        "perturbed eccentricity of {ecc:.6} left the [0, 1) range at {tsince_min:.3} min after epoch"
    ))]
    PerturbedEccentricity { ecc: f64, tsince_min: f64 },
    #[snafu(display(
        "mean motion of {n_rad_min:.3e} rad/min vanished at {tsince_min:.3} min after epoch"
    ))]
    MeanMotionVanished { n_rad_min: f64, tsince_min: f64 },
    #[snafu(display("semilatus rectum collapsed at {tsince_min:.3} min after epoch"))]
    NegativeSemilatusRectum { tsince_min: f64 },
    #[snafu(display("could not parse the element set: {source}"))]
    Parse { source: ParsingError },
    #[snafu(display("could not select a gravity model: {source}"))]
    Gravity { source: GravityError },
}
