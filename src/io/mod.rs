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

use snafu::prelude::*;

/// Handles reading the fixed-column two-line element set format
pub mod tle;

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ParsingError {
    #[snafu(display("line {line} of an element set must start with `{expected}`"))]
    WrongLineMarker { line: u8, expected: char },
    #[snafu(display("line {line} is {len} characters long, expected 69"))]
    LineTooShort { line: u8, len: usize },
    #[snafu(display("could not read {field} from line {line} columns {start}..{end}: `{content}`"))]
    UnparsableField {
        field: &'static str,
        line: u8,
        start: usize,
        end: usize,
        content: String,
    },
    #[snafu(display("catalog numbers differ between lines: {line1} and {line2}"))]
    CatalogMismatch { line1: u32, line2: u32 },
    #[snafu(display("{field} = {value} is outside the physical range of a mean element set"))]
    ElementRange { field: &'static str, value: f64 },
    #[snafu(display("no element sets found in the provided text"))]
    NothingToParse,
}
