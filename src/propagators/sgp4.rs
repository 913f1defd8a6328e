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

use super::deep_space::{DeepSpace, DeepSpaceContext, RPTIM};
use super::{
    kepler, MeanMotionVanishedSnafu, NegativeSemilatusRectumSnafu, OrbitDecayedSnafu,
    PerturbedEccentricitySnafu, PropagationError,
};
use crate::cosmic::{gmst, GravityModel, StateVector, TimeTagged, JD_1950, MINUTES_PER_DAY};
use crate::io::tle::Elements;
use crate::linalg::Vector3;
use crate::time::{Epoch, Unit};
use snafu::prelude::*;
use std::f64::consts::{PI, TAU};

const X2O3: f64 = 2.0 / 3.0;

/// Division guard of the reference theory for inclinations within an ulp of 180 degrees.
const LYDDANE_GUARD: f64 = 1.5e-12;

/// Higher-order drag terms, dropped by the theory below 220 km of perigee altitude.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HighAltitudeDrag {
    pub d2: f64,
    pub d3: f64,
    pub d4: f64,
    pub t3cof: f64,
    pub t4cof: f64,
    pub t5cof: f64,
    pub omgcof: f64,
    pub xmcof: f64,
    pub delmo: f64,
    pub sinmao: f64,
    pub eta: f64,
    pub cc5: f64,
}

/// The orbital regime of a propagation record, classified once at initialization and dispatched
/// on at every step.
#[derive(Clone, Debug, PartialEq)]
pub enum Regime {
    /// Orbital period below 225 minutes; drag dominates the corrections.
    NearEarth {
        /// Higher-order drag polynomial, absent for low-perigee orbits
        drag: Option<HighAltitudeDrag>,
    },
    /// Orbital period of 225 minutes and above; lunisolar and resonance terms apply.
    DeepSpace(DeepSpace),
}

/// An immutable propagation record: one element set initialized against one gravity model.
///
/// Initialization performs every element conversion and coefficient derivation of the theory
/// exactly once; `step` is then a pure function of the record and the elapsed time, so a record
/// may be shared freely across threads.
#[derive(Clone, Debug, PartialEq)]
pub struct Sgp4Record {
    gravity: GravityModel,
    epoch: Epoch,
    epoch_days_1950: f64,
    bstar: f64,
    // Brouwer mean elements at epoch, in radians and radians per minute
    e0: f64,
    i0: f64,
    node0: f64,
    argp0: f64,
    m0: f64,
    n0: f64,
    /// Published (Kozai) mean motion in radians per minute
    n_kozai: f64,
    /// Semi-major axis in Earth radii
    a0: f64,
    perigee_alt_km: f64,
    apogee_alt_km: f64,
    /// Greenwich sidereal angle at epoch
    gsto: f64,
    // Inclination functions
    con41: f64,
    x1mth2: f64,
    x7thm1: f64,
    // Long-period coefficients
    aycof: f64,
    xlcof: f64,
    // First-order drag and secular rates
    cc1: f64,
    cc4: f64,
    t2cof: f64,
    mdot: f64,
    argpdot: f64,
    nodedot: f64,
    nodecf: f64,
    regime: Regime,
}

impl Sgp4Record {
    /// Converts a parsed element set into a propagation record against the provided gravity
    /// model: units, the Kozai to Brouwer mean motion recovery, secular rates, drag polynomials,
    /// and the regime classification with its payload.
    ///
    /// Fails with [PropagationError::OrbitDecayed] if the elements do not describe an orbit that
    /// clears the Earth.
    pub fn initialize(
        elements: &Elements,
        gravity: GravityModel,
    ) -> Result<Self, PropagationError> {
        let n_kozai = elements.mean_motion_rev_day * TAU / MINUTES_PER_DAY;
        let e0 = elements.eccentricity;
        let i0 = elements.inclination_deg.to_radians();
        let node0 = elements.raan_deg.to_radians();
        let argp0 = elements.arg_perigee_deg.to_radians();
        let m0 = elements.mean_anomaly_deg.to_radians();
        let bstar = elements.bstar;
        let epoch = elements.epoch();
        let epoch_days_1950 = elements.epoch_days_from_1950();

        let eccsq = e0 * e0;
        let omeosq = 1.0 - eccsq;
        let rteosq = omeosq.sqrt();
        let cosio = i0.cos();
        let cosio2 = cosio * cosio;
        let sinio = i0.sin();

        // Recover the Brouwer mean motion from the published Kozai value
        let ak = (gravity.ke / n_kozai).powf(X2O3);
        let d1 = 0.75 * gravity.j2 * (3.0 * cosio2 - 1.0) / (rteosq * omeosq);
        let mut delta = d1 / (ak * ak);
        let adel = ak * (1.0 - delta * delta - delta * (1.0 / 3.0 + 134.0 * delta * delta / 81.0));
        delta = d1 / (adel * adel);
        let n0 = n_kozai / (1.0 + delta);

        let a0 = (gravity.ke / n0).powf(X2O3);
        let po = a0 * omeosq;
        let con42 = 1.0 - 5.0 * cosio2;
        let con41 = -con42 - cosio2 - cosio2;
        let posq = po * po;
        let rp = a0 * (1.0 - e0);
        let gsto = gmst(epoch_days_1950 + JD_1950);

        ensure!(
            rp >= 1.0,
            OrbitDecayedSnafu {
                radius_km: rp * gravity.radius_km,
            }
        );

        let perigee_alt_km = (rp - 1.0) * gravity.radius_km;
        let apogee_alt_km = (a0 * (1.0 + e0) - 1.0) * gravity.radius_km;

        // Atmosphere fitting constants, reshaped below 156 km and again below 98 km of perigee
        let mut sfour = 78.0 / gravity.radius_km + 1.0;
        let mut qzms24 = ((120.0 - 78.0) / gravity.radius_km).powi(4);
        let low_perigee = rp < 220.0 / gravity.radius_km + 1.0;
        if perigee_alt_km < 156.0 {
            sfour = perigee_alt_km - 78.0;
            if perigee_alt_km < 98.0 {
                sfour = 20.0;
            }
            qzms24 = ((120.0 - sfour) / gravity.radius_km).powi(4);
            sfour = sfour / gravity.radius_km + 1.0;
        }

        let pinvsq = 1.0 / posq;
        let tsi = 1.0 / (a0 - sfour);
        let eta = a0 * e0 * tsi;
        let etasq = eta * eta;
        let eeta = e0 * eta;
        let psisq = (1.0 - etasq).abs();
        let coef = qzms24 * tsi.powi(4);
        let coef1 = coef / psisq.powf(3.5);
        let cc2 = coef1
            * n0
            * (a0 * (1.0 + 1.5 * etasq + eeta * (4.0 + etasq))
                + 0.375 * gravity.j2 * tsi / psisq
                    * con41
                    * (8.0 + 3.0 * etasq * (8.0 + etasq)));
        let cc1 = bstar * cc2;
        let mut cc3 = 0.0;
        if e0 > 1.0e-4 {
            cc3 = -2.0 * coef * tsi * gravity.j3_over_j2 * n0 * sinio / e0;
        }
        let x1mth2 = 1.0 - cosio2;
        let cc4 = 2.0
            * n0
            * coef1
            * a0
            * omeosq
            * (eta * (2.0 + 0.5 * etasq) + e0 * (0.5 + 2.0 * etasq)
                - gravity.j2 * tsi / (a0 * psisq)
                    * (-3.0 * con41 * (1.0 - 2.0 * eeta + etasq * (1.5 - 0.5 * eeta))
                        + 0.75 * x1mth2 * (2.0 * etasq - eeta * (1.0 + etasq))
                            * (2.0 * argp0).cos()));
        let cc5 = 2.0 * coef1 * a0 * omeosq * (1.0 + 2.75 * (etasq + eeta) + eeta * etasq);

        let cosio4 = cosio2 * cosio2;
        let temp1 = 1.5 * gravity.j2 * pinvsq * n0;
        let temp2 = 0.5 * temp1 * gravity.j2 * pinvsq;
        let temp3 = -0.46875 * gravity.j4 * pinvsq * pinvsq * n0;
        let mdot = n0
            + 0.5 * temp1 * rteosq * con41
            + 0.0625 * temp2 * rteosq * (13.0 - 78.0 * cosio2 + 137.0 * cosio4);
        let argpdot = -0.5 * temp1 * con42
            + 0.0625 * temp2 * (7.0 - 114.0 * cosio2 + 395.0 * cosio4)
            + temp3 * (3.0 - 36.0 * cosio2 + 49.0 * cosio4);
        let xhdot1 = -temp1 * cosio;
        let nodedot = xhdot1
            + (0.5 * temp2 * (4.0 - 19.0 * cosio2) + 2.0 * temp3 * (3.0 - 7.0 * cosio2)) * cosio;
        let omgcof = bstar * cc3 * argp0.cos();
        let xmcof = if e0 > 1.0e-4 {
            -X2O3 * coef * bstar / eeta
        } else {
            0.0
        };
        let nodecf = 3.5 * omeosq * xhdot1 * cc1;
        let t2cof = 1.5 * cc1;
        let xlcof = if (cosio + 1.0).abs() > LYDDANE_GUARD {
            -0.25 * gravity.j3_over_j2 * sinio * (3.0 + 5.0 * cosio) / (1.0 + cosio)
        } else {
            -0.25 * gravity.j3_over_j2 * sinio * (3.0 + 5.0 * cosio) / LYDDANE_GUARD
        };
        let aycof = -0.5 * gravity.j3_over_j2 * sinio;
        let delmo = (1.0 + eta * m0.cos()).powi(3);
        let sinmao = m0.sin();
        let x7thm1 = 7.0 * cosio2 - 1.0;

        let regime = if TAU / n0 >= 225.0 {
            let deep = DeepSpace::initialize(&DeepSpaceContext {
                gravity: &gravity,
                epoch_days_1950,
                e0,
                i0,
                node0,
                argp0,
                m0,
                n0,
                gsto,
                mdot,
                argpdot,
                nodedot,
            });
            info!(
                "#{} is deep-space (period of {:.1} min), resonance: {}",
                elements.norad_id,
                TAU / n0,
                match &deep.resonance {
                    Some(res) => match res.kind {
                        super::ResonanceKind::Synchronous(_) => "one day",
                        super::ResonanceKind::HalfDay(_) => "half day",
                    },
                    None => "none",
                }
            );
            Regime::DeepSpace(deep)
        } else {
            let drag = (!low_perigee).then(|| {
                let cc1sq = cc1 * cc1;
                let d2 = 4.0 * a0 * tsi * cc1sq;
                let temp = d2 * tsi * cc1 / 3.0;
                let d3 = (17.0 * a0 + sfour) * temp;
                let d4 = 0.5 * temp * a0 * tsi * (221.0 * a0 + 31.0 * sfour) * cc1;
                HighAltitudeDrag {
                    d2,
                    d3,
                    d4,
                    t3cof: d2 + 2.0 * cc1sq,
                    t4cof: 0.25 * (3.0 * d3 + cc1 * (12.0 * d2 + 10.0 * cc1sq)),
                    t5cof: 0.2
                        * (3.0 * d4
                            + 12.0 * cc1 * d3
                            + 6.0 * d2 * d2
                            + 15.0 * cc1sq * (2.0 * d2 + cc1sq)),
                    omgcof,
                    xmcof,
                    delmo,
                    sinmao,
                    eta,
                    cc5,
                }
            });
            debug!(
                "#{} is near-earth, perigee altitude of {:.1} km{}",
                elements.norad_id,
                perigee_alt_km,
                if low_perigee { ", low-perigee drag" } else { "" }
            );
            Regime::NearEarth { drag }
        };

        let record = Self {
            gravity,
            epoch,
            epoch_days_1950,
            bstar,
            e0,
            i0,
            node0,
            argp0,
            m0,
            n0,
            n_kozai,
            a0,
            perigee_alt_km,
            apogee_alt_km,
            gsto,
            con41,
            x1mth2,
            x7thm1,
            aycof,
            xlcof,
            cc1,
            cc4,
            t2cof,
            mdot,
            argpdot,
            nodedot,
            nodecf,
            regime,
        };

        // A record whose epoch state is already degenerate must never be handed out
        record.step(0.0)?;
        Ok(record)
    }

    /// Propagates this record by `tsince` minutes since epoch, negative values propagating
    /// backward, and returns the state in the TEME frame of the record's gravity model.
    ///
    /// The corrections apply in the order fixed by the theory: secular rates and drag, then for
    /// deep-space records the lunisolar secular rates and the resonance integration, then the
    /// long-period and short-period periodics around the Kepler solution.
    pub fn step(&self, tsince: f64) -> Result<StateVector, PropagationError> {
        let gravity = &self.gravity;
        let t = tsince;

        // Secular updates
        let xmdf = self.m0 + self.mdot * t;
        let argpdf = self.argp0 + self.argpdot * t;
        let nodedf = self.node0 + self.nodedot * t;
        let t2 = t * t;
        let mut nodem = nodedf + self.nodecf * t2;
        let mut argpm = argpdf;
        let mut mm = xmdf;
        let mut tempa = 1.0 - self.cc1 * t;
        let mut tempe = self.bstar * self.cc4 * t;
        let mut templ = self.t2cof * t2;

        let mut nm = self.n0;
        let mut em = self.e0;
        let mut inclm = self.i0;

        match &self.regime {
            Regime::NearEarth { drag: Some(drag) } => {
                let delomg = drag.omgcof * t;
                let delmtemp = 1.0 + drag.eta * xmdf.cos();
                let delm = drag.xmcof * (delmtemp * delmtemp * delmtemp - drag.delmo);
                let temp = delomg + delm;
                mm = xmdf + temp;
                argpm = argpdf - temp;
                let t3 = t2 * t;
                let t4 = t3 * t;
                tempa -= drag.d2 * t2 + drag.d3 * t3 + drag.d4 * t4;
                tempe += self.bstar * drag.cc5 * (mm.sin() - drag.sinmao);
                templ += drag.t3cof * t3 + t4 * (drag.t4cof + t * drag.t5cof);
            }
            Regime::NearEarth { drag: None } => (),
            Regime::DeepSpace(deep) => {
                let theta = (self.gsto + t * RPTIM) % TAU;
                em += deep.dedt * t;
                inclm += deep.didt * t;
                argpm += deep.domdt * t;
                nodem += deep.dnodt * t;
                mm += deep.dmdt * t;
                if let Some(resonance) = &deep.resonance {
                    let (nm_res, mm_res) = resonance.integrate(
                        self.n0,
                        self.argp0,
                        self.argpdot,
                        t,
                        theta,
                        nodem,
                        argpm,
                    );
                    nm = nm_res;
                    mm = mm_res;
                }
            }
        }

        ensure!(
            nm > 0.0,
            MeanMotionVanishedSnafu {
                n_rad_min: nm,
                tsince_min: t,
            }
        );
        let am = (gravity.ke / nm).powf(X2O3) * tempa * tempa;
        nm = gravity.ke / am.powf(1.5);
        em -= tempe;
        ensure!(
            (-0.001..1.0).contains(&em),
            PerturbedEccentricitySnafu {
                ecc: em,
                tsince_min: t,
            }
        );
        if em < 1.0e-6 {
            em = 1.0e-6;
        }
        mm += self.n0 * templ;
        let mut xlm = mm + argpm + nodem;
        nodem %= TAU;
        argpm %= TAU;
        xlm %= TAU;
        mm = (xlm - argpm - nodem) % TAU;

        // Long-period periodics
        let mut ep = em;
        let mut xincp = inclm;
        let mut argpp = argpm;
        let mut nodep = nodem;
        let mut mp = mm;
        let mut sinip = inclm.sin();
        let mut cosip = inclm.cos();
        let mut aycof = self.aycof;
        let mut xlcof = self.xlcof;
        let mut con41 = self.con41;
        let mut x1mth2 = self.x1mth2;
        let mut x7thm1 = self.x7thm1;

        if let Regime::DeepSpace(deep) = &self.regime {
            (ep, xincp, nodep, argpp, mp) =
                deep.lunisolar_periodics(t, ep, xincp, nodep, argpp, mp);
            if xincp < 0.0 {
                xincp = -xincp;
                nodep += PI;
                argpp -= PI;
            }
            ensure!(
                (0.0..=1.0).contains(&ep),
                PerturbedEccentricitySnafu {
                    ecc: ep,
                    tsince_min: t,
                }
            );
            // The periodics moved the orbital plane, so the inclination functions move with it
            sinip = xincp.sin();
            cosip = xincp.cos();
            aycof = -0.5 * gravity.j3_over_j2 * sinip;
            xlcof = if (cosip + 1.0).abs() > LYDDANE_GUARD {
                -0.25 * gravity.j3_over_j2 * sinip * (3.0 + 5.0 * cosip) / (1.0 + cosip)
            } else {
                -0.25 * gravity.j3_over_j2 * sinip * (3.0 + 5.0 * cosip) / LYDDANE_GUARD
            };
            let cosisq = cosip * cosip;
            con41 = 3.0 * cosisq - 1.0;
            x1mth2 = 1.0 - cosisq;
            x7thm1 = 7.0 * cosisq - 1.0;
        }

        let axnl = ep * argpp.cos();
        let temp = 1.0 / (am * (1.0 - ep * ep));
        let aynl = ep * argpp.sin() + temp * aycof;
        let xl = mp + argpp + nodep + temp * xlcof * axnl;

        let u = (xl - nodep) % TAU;
        let epw = kepler::solve(u, axnl, aynl)?;
        let sin_epw = epw.sin();
        let cos_epw = epw.cos();

        // Short-period periodics around the Kepler solution
        let ecose = axnl * cos_epw + aynl * sin_epw;
        let esine = axnl * sin_epw - aynl * cos_epw;
        let el2 = axnl * axnl + aynl * aynl;
        let pl = am * (1.0 - el2);
        ensure!(pl >= 0.0, NegativeSemilatusRectumSnafu { tsince_min: t });

        let rl = am * (1.0 - ecose);
        let rdotl = am.sqrt() * esine / rl;
        let rvdotl = pl.sqrt() / rl;
        let betal = (1.0 - el2).sqrt();
        let temp = esine / (1.0 + betal);
        let sinu = am / rl * (sin_epw - aynl - axnl * temp);
        let cosu = am / rl * (cos_epw - axnl + aynl * temp);
        let mut su = sinu.atan2(cosu);
        let sin2u = (cosu + cosu) * sinu;
        let cos2u = 1.0 - 2.0 * sinu * sinu;
        let temp = 1.0 / pl;
        let temp1 = 0.5 * gravity.j2 * temp;
        let temp2 = temp1 * temp;

        let mrt = rl * (1.0 - 1.5 * temp2 * betal * con41) + 0.5 * temp1 * x1mth2 * cos2u;
        ensure!(
            mrt >= 1.0,
            OrbitDecayedSnafu {
                radius_km: mrt * gravity.radius_km,
            }
        );
        su -= 0.25 * temp2 * x7thm1 * sin2u;
        let xnode = nodep + 1.5 * temp2 * cosip * sin2u;
        let xinc = xincp + 1.5 * temp2 * cosip * sinip * cos2u;
        let mvt = rdotl - nm * temp1 * x1mth2 * sin2u / gravity.ke;
        let rvdot = rvdotl + nm * temp1 * (x1mth2 * cos2u + 1.5 * con41) / gravity.ke;

        // Orientation vectors, i.e. the perifocal to inertial rotation by the argument of
        // latitude, the inclination, and the node
        let sinsu = su.sin();
        let cossu = su.cos();
        let snod = xnode.sin();
        let cnod = xnode.cos();
        let sini = xinc.sin();
        let cosi = xinc.cos();
        let xmx = -snod * cosi;
        let xmy = cnod * cosi;
        let ux = xmx * sinsu + cnod * cossu;
        let uy = xmy * sinsu + snod * cossu;
        let uz = sini * sinsu;
        let vx = xmx * cossu - cnod * sinsu;
        let vy = xmy * cossu - snod * sinsu;
        let vz = sini * cossu;

        // Descale to kilometers and kilometers per second
        let mr = mrt * gravity.radius_km;
        let vscale = gravity.radius_km * gravity.ke / 60.0;

        Ok(StateVector {
            epoch: self.epoch + Unit::Minute * tsince,
            radius_km: Vector3::new(mr * ux, mr * uy, mr * uz),
            velocity_km_s: Vector3::new(
                (mvt * ux + rvdot * vx) * vscale,
                (mvt * uy + rvdot * vy) * vscale,
                (mvt * uz + rvdot * vz) * vscale,
            ),
        })
    }

    /// The gravity model this record was initialized against
    pub fn gravity(&self) -> &GravityModel {
        &self.gravity
    }

    /// The regime this record was classified into at initialization
    pub fn regime(&self) -> &Regime {
        &self.regime
    }

    /// Whether this record follows the deep-space branch of the theory
    pub fn is_deep_space(&self) -> bool {
        matches!(self.regime, Regime::DeepSpace(_))
    }

    /// Brouwer mean motion recovered at initialization, in radians per minute
    pub fn mean_motion_rad_min(&self) -> f64 {
        self.n0
    }

    /// Published (Kozai) mean motion, in radians per minute
    pub fn mean_motion_kozai_rad_min(&self) -> f64 {
        self.n_kozai
    }

    /// Semi-major axis at epoch in kilometers
    pub fn semi_major_axis_km(&self) -> f64 {
        self.a0 * self.gravity.radius_km
    }

    /// Perigee altitude at epoch in kilometers
    pub fn perigee_altitude_km(&self) -> f64 {
        self.perigee_alt_km
    }

    /// Apogee altitude at epoch in kilometers
    pub fn apogee_altitude_km(&self) -> f64 {
        self.apogee_alt_km
    }

    /// Eccentricity at epoch
    pub fn eccentricity(&self) -> f64 {
        self.e0
    }
}

impl TimeTagged for Sgp4Record {
    fn epoch(&self) -> Epoch {
        self.epoch
    }
}
