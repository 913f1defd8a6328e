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

/*! # brouwer

[Brouwer](https://en.wikipedia.org/wiki/Dirk_Brouwer_(astronomer)): analytical satellite propagation from
two-line element sets through the SGP4/SDP4 mean-element theory, validated against the published
verification vectors of the reference implementation.

A two-line element set is parsed once, initialized once into an immutable propagation record, and
stepped to any signed time offset from its epoch. Output states are Cartesian position and velocity
in kilometers and kilometers per second, in the mean-equator mean-equinox (TEME) frame of the
selected gravity model. Frame rotations to ITRF or J2000 are deliberately left to downstream tools.
*/

/// Provides the SGP4/SDP4 propagator: one-time initialization, stepping, and the lazy driver.
pub mod propagators;

/// Provides the output state vector, the gravity constant models, and shared astrodynamical constants.
pub mod cosmic;

/// All the input needs for this library, i.e. the fixed-column two-line element set format.
pub mod io;

#[macro_use]
extern crate log;
extern crate hifitime;
extern crate nalgebra as na;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

/// Re-export some useful things
pub use self::cosmic::{GravityModel, GravityModelKind, StateVector, TimeTagged};
pub use self::io::tle::Elements;
pub use self::propagators::{PropagationError, Sgp4, Sgp4Record};
