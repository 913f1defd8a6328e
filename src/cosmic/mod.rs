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

use crate::linalg::Vector3;
use crate::time::{Duration, Epoch};
use std::f64::consts::TAU;
use std::fmt;

mod gravity;
pub use self::gravity::*;

/// A trait allowing for something to have an epoch
pub trait TimeTagged {
    /// Retrieve the Epoch
    fn epoch(&self) -> Epoch;

    /// Shift this epoch by a duration (can be negative)
    fn shifted_by(&self, duration: Duration) -> Epoch {
        self.epoch() + duration
    }
}

/// A Cartesian state in the mean-equator mean-equinox (TEME) frame of the gravity model used to
/// generate it, in kilometers and kilometers per second.
///
/// States are produced fresh on every propagation call and are not retained by the propagator.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StateVector {
    /// Epoch of this state
    pub epoch: Epoch,
    /// Radius vector in kilometers
    pub radius_km: Vector3<f64>,
    /// Velocity vector in kilometers per second
    pub velocity_km_s: Vector3<f64>,
}

impl StateVector {
    /// Returns the magnitude of the radius vector in kilometers
    pub fn rmag_km(&self) -> f64 {
        self.radius_km.norm()
    }

    /// Returns the magnitude of the velocity vector in kilometers per second
    pub fn vmag_km_s(&self) -> f64 {
        self.velocity_km_s.norm()
    }
}

impl TimeTagged for StateVector {
    fn epoch(&self) -> Epoch {
        self.epoch
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[TEME] {}\tposition = [{:.6}, {:.6}, {:.6}] km\tvelocity = [{:.6}, {:.6}, {:.6}] km/s",
            self.epoch,
            self.radius_km[0],
            self.radius_km[1],
            self.radius_km[2],
            self.velocity_km_s[0],
            self.velocity_km_s[1],
            self.velocity_km_s[2]
        )
    }
}

/// Minutes per day
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Julian date of 1949 December 31 00:00 UTC, the day count origin of the SGP4 reference theory.
pub const JD_1950: f64 = 2_433_281.5;

/// Greenwich mean sidereal time in radians, in [0, 2π), from a UT1 Julian date.
///
/// IAU 1982 GMST model, the one the SGP4 reference theory keys its deep-space geometry to.
pub fn gmst(jd_ut1_days: f64) -> f64 {
    let tut1 = (jd_ut1_days - 2_451_545.0) / 36_525.0;
    let seconds = -6.2e-6 * tut1 * tut1 * tut1
        + 0.093_104 * tut1 * tut1
        + (876_600.0 * 3600.0 + 8_640_184.812_866) * tut1
        + 67_310.548_41;
    // 86400 seconds per rotation, i.e. 240 seconds per degree
    let mut rad = (seconds.to_radians() / 240.0) % TAU;
    if rad < 0.0 {
        rad += TAU;
    }
    rad
}
