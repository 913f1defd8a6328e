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

use super::{GravitySnafu, ParseSnafu, PropagationError, Sgp4Record};
use crate::cosmic::{GravityModel, GravityModelKind, StateVector, TimeTagged};
use crate::io::tle::Elements;
use crate::time::{Duration, Epoch, Unit};
use rayon::prelude::*;
use snafu::prelude::*;
use std::sync::OnceLock;

/// Binds one element set to its lazily initialized propagation record.
///
/// The record is derived on the first propagation request and cached: concurrent first callers
/// race on a one-time guard, exactly one initialization runs, and every caller observes the same
/// record, or the same typed failure if the elements describe a decayed orbit.
#[derive(Clone, Debug)]
pub struct Sgp4 {
    elements: Elements,
    gravity: GravityModel,
    record: OnceLock<Result<Sgp4Record, PropagationError>>,
}

impl Sgp4 {
    /// Builds a propagator for these elements with the default gravity model.
    pub fn new(elements: Elements) -> Self {
        Self::with_model(elements, GravityModelKind::default())
    }

    /// Builds a propagator for these elements with the requested gravity model.
    pub fn with_model(elements: Elements, kind: GravityModelKind) -> Self {
        Self {
            elements,
            gravity: kind.into(),
            record: OnceLock::new(),
        }
    }

    /// Builds a propagator for these elements, resolving the gravity model by name.
    ///
    /// The recognized names are `wgs72` and `wgs84`; anything else is an
    /// [PropagationError::Gravity] failure.
    pub fn with_model_name(elements: Elements, name: &str) -> Result<Self, PropagationError> {
        let gravity = GravityModel::lookup(name).context(GravitySnafu)?;
        Ok(Self {
            elements,
            gravity,
            record: OnceLock::new(),
        })
    }

    /// Parses the two data lines and builds a propagator with the default gravity model.
    pub fn from_lines(line1: &str, line2: &str) -> Result<Self, PropagationError> {
        Ok(Self::new(
            Elements::from_lines(line1, line2).context(ParseSnafu)?,
        ))
    }

    /// Parses a named, three line element set and builds a propagator with the default model.
    pub fn from_three_lines(
        line0: &str,
        line1: &str,
        line2: &str,
    ) -> Result<Self, PropagationError> {
        Ok(Self::new(
            Elements::from_three_lines(line0, line1, line2).context(ParseSnafu)?,
        ))
    }

    /// The element set this propagator was built from.
    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    /// The gravity model every state of this propagator is expressed in.
    pub fn gravity(&self) -> &GravityModel {
        &self.gravity
    }

    /// The propagation record, initializing it exactly once on first use.
    pub fn record(&self) -> Result<&Sgp4Record, PropagationError> {
        self.record
            .get_or_init(|| Sgp4Record::initialize(&self.elements, self.gravity))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Propagates to an absolute epoch.
    pub fn propagate(&self, epoch: Epoch) -> Result<StateVector, PropagationError> {
        self.propagate_for(epoch - self.elements.epoch())
    }

    /// Propagates by a signed duration relative to the element set epoch.
    pub fn propagate_for(&self, elapsed: Duration) -> Result<StateVector, PropagationError> {
        self.propagate_tsince(elapsed.to_unit(Unit::Minute))
    }

    /// Propagates by signed minutes since the element set epoch.
    pub fn propagate_tsince(&self, minutes: f64) -> Result<StateVector, PropagationError> {
        self.record()?.step(minutes)
    }

    /// Propagates to each provided epoch in parallel, preserving order.
    ///
    /// Stepping is reentrant on the shared record, so the states are bit-identical to those of
    /// the sequential calls.
    pub fn propagate_many(&self, epochs: &[Epoch]) -> Result<Vec<StateVector>, PropagationError> {
        let record = self.record()?;
        let elset_epoch = self.elements.epoch();
        epochs
            .par_iter()
            .map(|epoch| record.step((*epoch - elset_epoch).to_unit(Unit::Minute)))
            .collect()
    }
}
