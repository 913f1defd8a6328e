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

use enum_iterator::Sequence;
use serde_derive::{Deserialize, Serialize};
use snafu::prelude::*;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Snafu)]
pub enum GravityError {
    #[snafu(display("unknown gravity model `{name}`, supported models are wgs72 and wgs84"))]
    UnknownModel { name: String },
}

/// The two Earth constant sets of the SGP4 reference theory.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Sequence, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GravityModelKind {
    /// WGS-72, the set the published verification vectors were generated with
    Wgs72,
    /// WGS-84, the more recent set, and the default
    #[default]
    Wgs84,
}

impl fmt::Display for GravityModelKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Wgs72 => write!(f, "wgs72"),
            Self::Wgs84 => write!(f, "wgs84"),
        }
    }
}

impl FromStr for GravityModelKind {
    type Err = GravityError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "wgs72" => Ok(Self::Wgs72),
            "wgs84" => Ok(Self::Wgs84),
            _ => UnknownModelSnafu { name }.fail(),
        }
    }
}

/// Earth geometry and gravity constants used to non-dimensionalize the propagation.
///
/// Lengths are carried internally in Earth radii and rates in radians per minute; `ke` is the
/// square root of the gravitational parameter expressed in those units, so `tumin = 1/ke` is the
/// number of minutes per canonical time unit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GravityModel {
    pub kind: GravityModelKind,
    /// Equatorial radius in kilometers
    pub radius_km: f64,
    /// Gravitational parameter in km^3/s^2
    pub mu_km3_s2: f64,
    /// sqrt(GM) in Earth radii^1.5 per minute
    pub ke: f64,
    /// Minutes per canonical time unit
    pub tumin: f64,
    /// Second zonal harmonic
    pub j2: f64,
    /// Third zonal harmonic
    pub j3: f64,
    /// Fourth zonal harmonic
    pub j4: f64,
    /// Precomputed J3/J2, used by the long-period corrections
    pub j3_over_j2: f64,
}

impl GravityModel {
    /// The WGS-72 constant bundle.
    pub fn wgs72() -> Self {
        Self::build(
            GravityModelKind::Wgs72,
            398_600.8,
            6378.135,
            0.001_082_616,
            -0.000_002_538_81,
            -0.000_001_655_97,
        )
    }

    /// The WGS-84 constant bundle.
    pub fn wgs84() -> Self {
        Self::build(
            GravityModelKind::Wgs84,
            398_600.5,
            6378.137,
            0.001_082_629_989_05,
            -0.000_002_532_153_06,
            -0.000_001_610_987_61,
        )
    }

    /// Returns the constant bundle for the provided model name, or fails on an unknown name.
    pub fn lookup(name: &str) -> Result<Self, GravityError> {
        Ok(GravityModelKind::from_str(name)?.into())
    }

    fn build(kind: GravityModelKind, mu_km3_s2: f64, radius_km: f64, j2: f64, j3: f64, j4: f64) -> Self {
        let ke = 60.0 / (radius_km * radius_km * radius_km / mu_km3_s2).sqrt();
        Self {
            kind,
            radius_km,
            mu_km3_s2,
            ke,
            tumin: 1.0 / ke,
            j2,
            j3,
            j4,
            j3_over_j2: j3 / j2,
        }
    }
}

impl From<GravityModelKind> for GravityModel {
    fn from(kind: GravityModelKind) -> Self {
        match kind {
            GravityModelKind::Wgs72 => Self::wgs72(),
            GravityModelKind::Wgs84 => Self::wgs84(),
        }
    }
}

impl Default for GravityModel {
    fn default() -> Self {
        GravityModelKind::default().into()
    }
}
