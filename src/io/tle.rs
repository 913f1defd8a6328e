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

//! Two-line element set decoding.
//!
//! The format is a fixed 69-column text encoding of a satellite's mean orbital elements:
//!
//! ```text
//! ISS (ZARYA)
//! 1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
//! 2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
//! ```
//!
//! The optional name line may carry the `0 ` line marker used by some catalog distributions.
//! Checksums are verified but only logged on mismatch: several widely used verification catalogs
//! carry stale checksums on otherwise valid elements.

use super::{
    CatalogMismatchSnafu, ElementRangeSnafu, LineTooShortSnafu, NothingToParseSnafu, ParsingError,
    UnparsableFieldSnafu, WrongLineMarkerSnafu,
};
use crate::cosmic::{TimeTagged, JD_1950, MINUTES_PER_DAY};
use crate::time::{Epoch, Unit};
use serde_derive::{Deserialize, Serialize};
use snafu::prelude::*;
use std::fmt;
use std::str::FromStr;

/// A parsed, immutable two-line element set.
///
/// Angles are kept in the degrees of the wire format; the propagator converts to radians once,
/// at initialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Elements {
    /// Satellite name, from the optional leading line
    pub name: Option<String>,
    /// Catalog number
    pub norad_id: u32,
    /// Classification (U, C, or S)
    pub classification: char,
    /// International designator (launch year, launch number, piece)
    pub intl_designator: String,
    /// Four-digit epoch year, resolved with the standard 1957 pivot
    pub epoch_year: i32,
    /// Fractional day of year of the epoch, UTC
    pub epoch_day: f64,
    /// Half the first time derivative of mean motion, in revolutions/day^2
    pub n_dot: f64,
    /// One sixth of the second time derivative of mean motion, in revolutions/day^3
    pub n_ddot: f64,
    /// Drag-like coefficient, in 1/Earth radii
    pub bstar: f64,
    /// Ephemeris type, 0 for distributed elements
    pub ephemeris_type: u8,
    /// Element set number
    pub element_set_number: u16,
    /// Inclination in degrees
    pub inclination_deg: f64,
    /// Right ascension of the ascending node in degrees
    pub raan_deg: f64,
    /// Eccentricity
    pub eccentricity: f64,
    /// Argument of perigee in degrees
    pub arg_perigee_deg: f64,
    /// Mean anomaly in degrees
    pub mean_anomaly_deg: f64,
    /// Mean motion in revolutions per day
    pub mean_motion_rev_day: f64,
    /// Revolution number at epoch
    pub rev_number: u32,
}

impl Elements {
    /// Parse an element set from its two data lines.
    pub fn from_lines(line1: &str, line2: &str) -> Result<Self, ParsingError> {
        Self::parse(None, line1, line2)
    }

    /// Parse an element set preceded by its name line.
    pub fn from_three_lines(line0: &str, line1: &str, line2: &str) -> Result<Self, ParsingError> {
        // Some catalogs prefix the name line with the `0 ` marker.
        let name = line0.strip_prefix("0 ").unwrap_or(line0).trim();
        let name = (!name.is_empty()).then(|| name.to_string());
        Self::parse(name, line1, line2)
    }

    /// Parse every element set in the provided text, accepting both two and three line entries.
    pub fn from_text(text: &str) -> Result<Vec<Self>, ParsingError> {
        let lines: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end())
            .filter(|line| !line.is_empty())
            .collect();

        let mut sets = Vec::new();
        let mut idx = 0;
        while idx < lines.len() {
            if lines[idx].starts_with('1')
                && idx + 1 < lines.len()
                && lines[idx + 1].starts_with('2')
            {
                sets.push(Self::from_lines(lines[idx], lines[idx + 1])?);
                idx += 2;
            } else if idx + 2 < lines.len()
                && lines[idx + 1].starts_with('1')
                && lines[idx + 2].starts_with('2')
            {
                sets.push(Self::from_three_lines(lines[idx], lines[idx + 1], lines[idx + 2])?);
                idx += 3;
            } else {
                // Stray line, e.g. a trailing name without data lines
                idx += 1;
            }
        }

        ensure!(!sets.is_empty(), NothingToParseSnafu);
        Ok(sets)
    }

    fn parse(name: Option<String>, line1: &str, line2: &str) -> Result<Self, ParsingError> {
        let l1 = line1.trim_end();
        let l2 = line2.trim_end();
        ensure!(l1.len() == 69, LineTooShortSnafu { line: 1_u8, len: l1.len() });
        ensure!(l2.len() == 69, LineTooShortSnafu { line: 2_u8, len: l2.len() });
        ensure!(
            l1.starts_with('1'),
            WrongLineMarkerSnafu { line: 1_u8, expected: '1' }
        );
        ensure!(
            l2.starts_with('2'),
            WrongLineMarkerSnafu { line: 2_u8, expected: '2' }
        );

        verify_checksum(l1, 1);
        verify_checksum(l2, 2);

        let norad_id = field_u32(l1, 1, 2, 7, "catalog number")?;
        let classification = l1.as_bytes()[7] as char;
        let intl_designator = l1[9..17].trim().to_string();

        let two_digit_year = field_u32(l1, 1, 18, 20, "epoch year")? as i32;
        // Standard element set convention: years at or after 57 are in the 1900s
        let epoch_year = if two_digit_year >= 57 {
            1900 + two_digit_year
        } else {
            2000 + two_digit_year
        };
        let epoch_day = field_f64(l1, 1, 20, 32, "epoch day of year")?;
        ensure!(
            (1.0..367.0).contains(&epoch_day),
            ElementRangeSnafu { field: "epoch day of year", value: epoch_day }
        );

        let n_dot = field_f64(l1, 1, 33, 43, "mean motion first derivative")?;
        let n_ddot = implied_decimal(l1, 1, 44, 52, "mean motion second derivative")?;
        let bstar = implied_decimal(l1, 1, 53, 61, "B-star")?;
        let ephemeris_type = field_u32(l1, 1, 62, 63, "ephemeris type").unwrap_or(0) as u8;
        let element_set_number = field_u32(l1, 1, 64, 68, "element set number").unwrap_or(0) as u16;

        let norad_id_2 = field_u32(l2, 2, 2, 7, "catalog number")?;
        ensure!(
            norad_id == norad_id_2,
            CatalogMismatchSnafu { line1: norad_id, line2: norad_id_2 }
        );

        let inclination_deg = field_f64(l2, 2, 8, 16, "inclination")?;
        ensure!(
            (0.0..=180.0).contains(&inclination_deg),
            ElementRangeSnafu { field: "inclination", value: inclination_deg }
        );
        let raan_deg = field_f64(l2, 2, 17, 25, "right ascension of the ascending node")?;
        // The eccentricity field has an implied leading decimal point and no exponent
        let ecc_field = l2[26..33].trim();
        let eccentricity =
            f64::from_str(&format!("0.{ecc_field}")).ok().context(UnparsableFieldSnafu {
                field: "eccentricity",
                line: 2_u8,
                start: 26_usize,
                end: 33_usize,
                content: ecc_field,
            })?;
        ensure!(
            (0.0..1.0).contains(&eccentricity),
            ElementRangeSnafu { field: "eccentricity", value: eccentricity }
        );
        let arg_perigee_deg = field_f64(l2, 2, 34, 42, "argument of perigee")?;
        let mean_anomaly_deg = field_f64(l2, 2, 43, 51, "mean anomaly")?;
        let mean_motion_rev_day = field_f64(l2, 2, 52, 63, "mean motion")?;
        ensure!(
            mean_motion_rev_day > 0.0,
            ElementRangeSnafu { field: "mean motion", value: mean_motion_rev_day }
        );
        let rev_number = field_u32(l2, 2, 63, 68, "revolution number").unwrap_or(0);

        let elements = Self {
            name,
            norad_id,
            classification,
            intl_designator,
            epoch_year,
            epoch_day,
            n_dot,
            n_ddot,
            bstar,
            ephemeris_type,
            element_set_number,
            inclination_deg,
            raan_deg,
            eccentricity,
            arg_perigee_deg,
            mean_anomaly_deg,
            mean_motion_rev_day,
            rev_number,
        };
        debug!("parsed {elements}");
        Ok(elements)
    }

    /// Epoch of these elements as a day count since 1949 December 31 00:00 UTC, the continuous
    /// day count of the reference theory.
    pub fn epoch_days_from_1950(&self) -> f64 {
        self.epoch().to_jde_utc_days() - JD_1950
    }

    /// Orbital period at epoch, from the published (Kozai) mean motion.
    pub fn period(&self) -> hifitime::Duration {
        Unit::Minute * (MINUTES_PER_DAY / self.mean_motion_rev_day)
    }
}

impl TimeTagged for Elements {
    /// Epoch of these elements, resolved to an absolute UTC instant.
    fn epoch(&self) -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(self.epoch_year, 1, 1)
            + Unit::Day * (self.epoch_day - 1.0)
    }
}

impl fmt::Display for Elements {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} (#{}) at {}{:012.8} UTC: e = {:.7}, i = {:.4} deg, n = {:.8} rev/day",
            self.name.as_deref().unwrap_or("OBJECT"),
            self.norad_id,
            self.epoch_year,
            self.epoch_day,
            self.eccentricity,
            self.inclination_deg,
            self.mean_motion_rev_day
        )
    }
}

fn field_f64(
    line: &str,
    lineno: u8,
    start: usize,
    end: usize,
    field: &'static str,
) -> Result<f64, ParsingError> {
    let content = line[start..end].trim();
    f64::from_str(content).ok().context(UnparsableFieldSnafu {
        field,
        line: lineno,
        start,
        end,
        content,
    })
}

fn field_u32(
    line: &str,
    lineno: u8,
    start: usize,
    end: usize,
    field: &'static str,
) -> Result<u32, ParsingError> {
    let content = line[start..end].trim();
    u32::from_str(content).ok().context(UnparsableFieldSnafu {
        field,
        line: lineno,
        start,
        end,
        content,
    })
}

/// Decode the exponent notation of the B-star and second derivative fields.
///
/// The wire format drops both the leading `0.` and the exponent marker, so ` 28098-4` reads as
/// `0.28098e-4`. The marker is reinserted before the sign and digits are combined.
fn implied_decimal(
    line: &str,
    lineno: u8,
    start: usize,
    end: usize,
    field: &'static str,
) -> Result<f64, ParsingError> {
    let content = line[start..end].trim();
    if content.is_empty() {
        return Ok(0.0);
    }
    // The exponent sign is the last sign beyond the leading mantissa sign.
    let exp_at = content
        .char_indices()
        .skip(1)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .find(|(_, c)| *c == '+' || *c == '-')
        .map(|(at, _)| at);
    let (mantissa, exponent) = match exp_at {
        Some(at) => (&content[..at], &content[at..]),
        None => (content, "+0"),
    };
    let sign = if mantissa.starts_with('-') { "-" } else { "" };
    let digits = mantissa.trim_start_matches(['+', '-']);
    f64::from_str(&format!("{sign}0.{digits}e{exponent}"))
        .ok()
        .context(UnparsableFieldSnafu {
            field,
            line: lineno,
            start,
            end,
            content,
        })
}

/// Modulo 10 sum of the digits, with a minus sign counting for one.
fn checksum(line: &str) -> u8 {
    let sum: u32 = line
        .bytes()
        .map(|b| match b {
            b'0'..=b'9' => u32::from(b - b'0'),
            b'-' => 1,
            _ => 0,
        })
        .sum();
    (sum % 10) as u8
}

fn verify_checksum(line: &str, lineno: u8) {
    let computed = checksum(&line[..68]);
    let read = line.as_bytes()[68];
    if read != computed + b'0' {
        warn!(
            "stale checksum on line {lineno}: computed {computed}, read `{}`",
            read as char
        );
    }
}

#[cfg(test)]
mod ut_tle {
    use super::*;
    use approx::assert_relative_eq;

    // Vallado's verification catalog, object 00005 (Vanguard 1)
    const VANGUARD_LINE1: &str =
        "1 00005U 58002B   00179.78495062  .00000023  00000-3  28098-4 0  4753";
    const VANGUARD_LINE2: &str =
        "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667";

    const ISS_LINE1: &str = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_LINE2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    #[test]
    fn parse_vanguard() {
        let elements = Elements::from_lines(VANGUARD_LINE1, VANGUARD_LINE2).unwrap();
        assert_eq!(elements.norad_id, 5);
        assert_eq!(elements.classification, 'U');
        assert_eq!(elements.intl_designator, "58002B");
        assert_eq!(elements.epoch_year, 2000);
        assert_relative_eq!(elements.epoch_day, 179.78495062);
        assert_relative_eq!(elements.n_dot, 0.00000023);
        assert_relative_eq!(elements.n_ddot, 0.0);
        assert_relative_eq!(elements.bstar, 0.28098e-4);
        assert_eq!(elements.element_set_number, 475);
        assert_relative_eq!(elements.inclination_deg, 34.2682);
        assert_relative_eq!(elements.raan_deg, 348.7242);
        assert_relative_eq!(elements.eccentricity, 0.1859667);
        assert_relative_eq!(elements.arg_perigee_deg, 331.7664);
        assert_relative_eq!(elements.mean_anomaly_deg, 19.3264);
        assert_relative_eq!(elements.mean_motion_rev_day, 10.82419157);
        assert_eq!(elements.rev_number, 41366);
    }

    #[test]
    fn epoch_resolution() {
        let elements = Elements::from_lines(VANGUARD_LINE1, VANGUARD_LINE2).unwrap();
        // 2000 is after the 1957 pivot, and day 179.78495062 falls on June 27
        assert_relative_eq!(
            elements.epoch_days_from_1950(),
            18_441.78495062,
            max_relative = 1e-12
        );
        let midnight_june_27 = Epoch::from_gregorian_utc_at_midnight(2000, 6, 27);
        assert_relative_eq!(
            (elements.epoch() - midnight_june_27).to_unit(Unit::Day),
            0.78495062,
            max_relative = 1e-9
        );
    }

    #[test]
    fn pivot_year_1900s() {
        let elements = Elements::from_lines(ISS_LINE1, ISS_LINE2).unwrap();
        assert_eq!(elements.epoch_year, 2008);
        assert_relative_eq!(elements.n_dot, -0.00002182);
        assert_relative_eq!(elements.bstar, -0.11606e-4);
        // International designator keeps the 1998 launch year
        assert_eq!(elements.intl_designator, "98067A");
    }

    #[test]
    fn name_line_marker_stripped() {
        let elements =
            Elements::from_three_lines("0 ISS (ZARYA)", ISS_LINE1, ISS_LINE2).unwrap();
        assert_eq!(elements.name.as_deref(), Some("ISS (ZARYA)"));
        let elements = Elements::from_three_lines("ISS (ZARYA)", ISS_LINE1, ISS_LINE2).unwrap();
        assert_eq!(elements.name.as_deref(), Some("ISS (ZARYA)"));
    }

    #[test]
    fn batch_text() {
        let text = format!(
            "VANGUARD 1\n{VANGUARD_LINE1}\n{VANGUARD_LINE2}\n{ISS_LINE1}\n{ISS_LINE2}\n"
        );
        let sets = Elements::from_text(&text).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].name.as_deref(), Some("VANGUARD 1"));
        assert_eq!(sets[1].name, None);
        assert_eq!(sets[1].norad_id, 25544);

        assert_eq!(
            Elements::from_text("\n  \n").unwrap_err(),
            ParsingError::NothingToParse
        );
    }

    #[test]
    fn implied_decimal_forms() {
        assert_relative_eq!(implied_decimal(" 28098-4", 1, 0, 8, "x").unwrap(), 0.28098e-4);
        assert_relative_eq!(implied_decimal("-11606-4", 1, 0, 8, "x").unwrap(), -0.11606e-4);
        assert_relative_eq!(implied_decimal(" 00000-0", 1, 0, 8, "x").unwrap(), 0.0);
        assert_relative_eq!(implied_decimal(" 00000+0", 1, 0, 8, "x").unwrap(), 0.0);
        assert_relative_eq!(implied_decimal("        ", 1, 0, 8, "x").unwrap(), 0.0);
        assert_relative_eq!(implied_decimal(" 12345", 1, 0, 6, "x").unwrap(), 0.12345);
    }

    #[test]
    fn malformed_lines_are_refused() {
        // Truncated line
        assert!(matches!(
            Elements::from_lines(&VANGUARD_LINE1[..60], VANGUARD_LINE2),
            Err(ParsingError::LineTooShort { line: 1, len: 60 })
        ));
        // Swapped line markers
        assert!(matches!(
            Elements::from_lines(VANGUARD_LINE2, VANGUARD_LINE1),
            Err(ParsingError::WrongLineMarker { line: 1, expected: '1' })
        ));
        // Corrupted numeric field
        let mut corrupt = VANGUARD_LINE1.to_string();
        corrupt.replace_range(20..32, "xx9.78495062");
        assert!(matches!(
            Elements::from_lines(&corrupt, VANGUARD_LINE2),
            Err(ParsingError::UnparsableField { field: "epoch day of year", .. })
        ));
        // Catalog numbers must agree
        let mut other = VANGUARD_LINE2.to_string();
        other.replace_range(2..7, "00042");
        assert!(matches!(
            Elements::from_lines(VANGUARD_LINE1, &other),
            Err(ParsingError::CatalogMismatch { line1: 5, line2: 42 })
        ));
    }

    #[test]
    fn out_of_range_elements_are_refused() {
        // Physically impossible inclination, checksum recomputed for the corrupted line
        let bad_incl = "2 40003 190.0000  10.0000 0010000  30.0000  60.0000 14.50000000 10001";
        let err = Elements::from_lines(
            "1 40003U 15001A   20001.00000000  .00000000  00000-0  00000-0 0  9997",
            bad_incl,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ParsingError::ElementRange { field: "inclination", .. }
        ));

        let no_motion = "2 40004  51.6000  10.0000 0010000  30.0000  60.0000  0.00000000 10004";
        let err = Elements::from_lines(
            "1 40004U 15001A   20001.00000000  .00000000  00000-0  00000-0 0  9998",
            no_motion,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ParsingError::ElementRange { field: "mean motion", .. }
        ));
    }

    #[test]
    fn checksums_of_distributed_elements() {
        assert_eq!(checksum(&ISS_LINE1[..68]), 7);
        assert_eq!(checksum(&ISS_LINE2[..68]), 7);
    }
}
