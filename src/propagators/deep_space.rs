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

//! Deep-space corrections of the SDP4 branch of the theory.
//!
//! Orbits with periods of 225 minutes and longer pick up secular and periodic lunisolar
//! perturbations, and the 12 h and 24 h commensurabilities with the geopotential additionally
//! require integrating resonance terms. All coefficients are frozen at initialization; the
//! resonance integration restarts from epoch on every call so that stepping never mutates the
//! propagation record.

use crate::cosmic::GravityModel;
use std::f64::consts::{PI, TAU};

/// Solar mean motion in radians per minute
const ZNS: f64 = 1.19459e-5;
/// Solar perturbation eccentricity factor
const ZES: f64 = 0.01675;
/// Lunar mean motion in radians per minute
const ZNL: f64 = 1.583_521_8e-4;
/// Lunar perturbation eccentricity factor
const ZEL: f64 = 0.054_90;

/// Earth rotation rate in radians per minute of the reference theory
pub(crate) const RPTIM: f64 = 4.375_269_088_011_299_66e-3;

/// Fixed step of the resonance integrator, in minutes
const STEP: f64 = 720.0;
/// Half of the squared step, the trapezoid weight of the integrator
const STEP2: f64 = 259_200.0;

/// Inclinations within this bound of the equator (or of a retrograde equator) zero out the
/// lunisolar node rate, which would otherwise blow up with 1/sin(i).
const POLAR_GUARD_RAD: f64 = 5.235_987_7e-2;

/// Geopotential resonance coefficients for a one day orbital period.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SynchronousTerms {
    pub del1: f64,
    pub del2: f64,
    pub del3: f64,
}

/// Geopotential resonance coefficients for a half day orbital period.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HalfDayTerms {
    pub d2201: f64,
    pub d2211: f64,
    pub d3210: f64,
    pub d3222: f64,
    pub d4410: f64,
    pub d4422: f64,
    pub d5220: f64,
    pub d5232: f64,
    pub d5421: f64,
    pub d5433: f64,
}

/// The resonance regime of a deep-space orbit, fixed at initialization.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ResonanceKind {
    /// Orbital period near one sidereal day, e.g. geosynchronous orbits
    Synchronous(SynchronousTerms),
    /// Orbital period near half a sidereal day with significant eccentricity, e.g. Molniya orbits
    HalfDay(HalfDayTerms),
}

/// Resonance integration state derived once per element set.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Resonance {
    pub kind: ResonanceKind,
    /// Mean longitude of the resonant variable at epoch
    pub xlamo: f64,
    /// Constant part of the resonant longitude rate
    pub xfact: f64,
}

impl Resonance {
    /// Integrates the resonance terms from epoch to `tsince` minutes with the theory's fixed
    /// 720 minute Euler-trapezoid stepper, and returns the resonance-corrected mean motion and
    /// mean anomaly.
    ///
    /// The integration always restarts from epoch: for a given `tsince` the result is a pure
    /// function of the record, so concurrent calls remain bit-identical.
    pub(crate) fn integrate(
        &self,
        n0: f64,
        argp0: f64,
        argpdot: f64,
        tsince: f64,
        theta: f64,
        nodem: f64,
        argpm: f64,
    ) -> (f64, f64) {
        let mut atime = 0.0_f64;
        let mut xni = n0;
        let mut xli = self.xlamo;
        let delt = if tsince > 0.0 { STEP } else { -STEP };

        loop {
            let (xndt, xldot, xnddt) = self.derivatives(xli, xni, atime, argp0, argpdot);
            if (tsince - atime).abs() < STEP {
                let ft = tsince - atime;
                let nm = xni + xndt * ft + xnddt * ft * ft * 0.5;
                let xl = xli + xldot * ft + xndt * ft * ft * 0.5;
                let mm = match self.kind {
                    ResonanceKind::Synchronous(_) => xl - nodem - argpm + theta,
                    ResonanceKind::HalfDay(_) => xl - 2.0 * nodem + 2.0 * theta,
                };
                return (nm, mm);
            }
            xli += xldot * delt + xndt * STEP2;
            xni += xndt * delt + xnddt * STEP2;
            atime += delt;
        }
    }

    /// Resonant longitude and mean motion derivatives at the integrator state `(xli, xni, atime)`.
    fn derivatives(
        &self,
        xli: f64,
        xni: f64,
        atime: f64,
        argp0: f64,
        argpdot: f64,
    ) -> (f64, f64, f64) {
        // Phase constants of the geopotential terms
        const FASX2: f64 = 0.131_309_08;
        const FASX4: f64 = 2.884_319_8;
        const FASX6: f64 = 0.374_480_87;
        const G22: f64 = 5.768_639_6;
        const G32: f64 = 0.952_408_98;
        const G44: f64 = 1.801_499_8;
        const G52: f64 = 1.050_833_0;
        const G54: f64 = 4.410_889_8;

        let xldot = xni + self.xfact;
        match self.kind {
            ResonanceKind::Synchronous(t) => {
                let xndt = t.del1 * (xli - FASX2).sin()
                    + t.del2 * (2.0 * (xli - FASX4)).sin()
                    + t.del3 * (3.0 * (xli - FASX6)).sin();
                let xnddt = t.del1 * (xli - FASX2).cos()
                    + 2.0 * t.del2 * (2.0 * (xli - FASX4)).cos()
                    + 3.0 * t.del3 * (3.0 * (xli - FASX6)).cos();
                (xndt, xldot, xnddt * xldot)
            }
            ResonanceKind::HalfDay(t) => {
                let xomi = argp0 + argpdot * atime;
                let x2omi = xomi + xomi;
                let x2li = xli + xli;
                let xndt = t.d2201 * (x2omi + xli - G22).sin()
                    + t.d2211 * (xli - G22).sin()
                    + t.d3210 * (xomi + xli - G32).sin()
                    + t.d3222 * (-xomi + xli - G32).sin()
                    + t.d4410 * (x2omi + x2li - G44).sin()
                    + t.d4422 * (x2li - G44).sin()
                    + t.d5220 * (xomi + xli - G52).sin()
                    + t.d5232 * (-xomi + xli - G52).sin()
                    + t.d5421 * (xomi + x2li - G54).sin()
                    + t.d5433 * (-xomi + x2li - G54).sin();
                let xnddt = t.d2201 * (x2omi + xli - G22).cos()
                    + t.d2211 * (xli - G22).cos()
                    + t.d3210 * (xomi + xli - G32).cos()
                    + t.d3222 * (-xomi + xli - G32).cos()
                    + t.d5220 * (xomi + xli - G52).cos()
                    + t.d5232 * (-xomi + xli - G52).cos()
                    + 2.0
                        * (t.d4410 * (x2omi + x2li - G44).cos()
                            + t.d4422 * (x2li - G44).cos()
                            + t.d5421 * (xomi + x2li - G54).cos()
                            + t.d5433 * (-xomi + x2li - G54).cos());
                (xndt, xldot, xnddt * xldot)
            }
        }
    }
}

/// Lunisolar and resonance coefficients of a deep-space propagation record.
///
/// Secular rates are in radians per minute; the periodic coefficient pairs feed the long-period
/// correction evaluated at each step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DeepSpace {
    // Lunisolar secular rates
    pub dedt: f64,
    pub didt: f64,
    pub dmdt: f64,
    pub dnodt: f64,
    pub domdt: f64,
    // Solar periodic coefficients
    pub se2: f64,
    pub se3: f64,
    pub si2: f64,
    pub si3: f64,
    pub sl2: f64,
    pub sl3: f64,
    pub sl4: f64,
    pub sgh2: f64,
    pub sgh3: f64,
    pub sgh4: f64,
    pub sh2: f64,
    pub sh3: f64,
    // Lunar periodic coefficients
    pub ee2: f64,
    pub e3: f64,
    pub xi2: f64,
    pub xi3: f64,
    pub xl2: f64,
    pub xl3: f64,
    pub xl4: f64,
    pub xgh2: f64,
    pub xgh3: f64,
    pub xgh4: f64,
    pub xh2: f64,
    pub xh3: f64,
    /// Lunar mean longitude at epoch
    pub zmol: f64,
    /// Solar mean longitude at epoch
    pub zmos: f64,
    /// Resonance state, present only in the 12 h and 24 h commensurability bands
    pub resonance: Option<Resonance>,
}

/// Everything the deep-space initialization needs from the near-earth pass.
pub(crate) struct DeepSpaceContext<'a> {
    pub gravity: &'a GravityModel,
    /// Epoch as days since 1949 December 31 00:00 UTC
    pub epoch_days_1950: f64,
    pub e0: f64,
    pub i0: f64,
    pub node0: f64,
    pub argp0: f64,
    pub m0: f64,
    /// Brouwer mean motion in radians per minute
    pub n0: f64,
    pub gsto: f64,
    pub mdot: f64,
    pub argpdot: f64,
    pub nodedot: f64,
}

/// Third-body disturbing-function terms for one perturbing body.
struct BodyTerms {
    s1: f64,
    s2: f64,
    s3: f64,
    s4: f64,
    s5: f64,
    s6: f64,
    s7: f64,
    z1: f64,
    z2: f64,
    z3: f64,
    z11: f64,
    z12: f64,
    z13: f64,
    z21: f64,
    z22: f64,
    z23: f64,
    z31: f64,
    z32: f64,
    z33: f64,
}

/// Direction cosines of a perturbing body and its disturbing amplitude.
struct BodyGeometry {
    zcosg: f64,
    zsing: f64,
    zcosi: f64,
    zsini: f64,
    zcosh: f64,
    zsinh: f64,
    cc: f64,
}

impl DeepSpace {
    pub(crate) fn initialize(ctx: &DeepSpaceContext) -> Self {
        let sinim = ctx.i0.sin();
        let cosim = ctx.i0.cos();
        let snodm = ctx.node0.sin();
        let cnodm = ctx.node0.cos();
        let sinomm = ctx.argp0.sin();
        let cosomm = ctx.argp0.cos();
        let emsq = ctx.e0 * ctx.e0;
        let betasq = 1.0 - emsq;
        let rtemsq = betasq.sqrt();

        let day = ctx.epoch_days_1950 + 18_261.5;
        let xnodce = (4.523_602_0 - 9.242_202_9e-4 * day) % TAU;
        let stem = xnodce.sin();
        let ctem = xnodce.cos();
        let zcosil = 0.913_751_64 - 0.035_680_96 * ctem;
        let zsinil = (1.0 - zcosil * zcosil).sqrt();
        let zsinhl = 0.089_683_511 * stem / zsinil;
        let zcoshl = (1.0 - zsinhl * zsinhl).sqrt();
        let gam = 5.835_151_4 + 0.001_944_368_0 * day;
        let mut zx = 0.397_854_16 * stem / zsinil;
        let zy = zcoshl * ctem + 0.917_448_67 * zsinhl * stem;
        zx = zx.atan2(zy);
        zx = gam + zx - xnodce;
        let zcosgl = zx.cos();
        let zsingl = zx.sin();

        let geometry = |body: &BodyGeometry| -> BodyTerms {
            body_terms(
                body, cosomm, sinomm, cosim, sinim, emsq, betasq, rtemsq, ctx.e0, ctx.n0,
            )
        };

        // Obliquity-fixed solar geometry, then the lunar geometry of this epoch
        let sun = geometry(&BodyGeometry {
            zcosg: 0.194_590_5,
            zsing: -0.980_884_58,
            zcosi: 0.917_448_67,
            zsini: 0.397_854_16,
            zcosh: cnodm,
            zsinh: snodm,
            cc: 2.986_479_7e-6,
        });
        let moon = geometry(&BodyGeometry {
            zcosg: zcosgl,
            zsing: zsingl,
            zcosi: zcosil,
            zsini: zsinil,
            zcosh: zcoshl * cnodm + zsinhl * snodm,
            zsinh: snodm * zcoshl - cnodm * zsinhl,
            cc: 4.796_806_5e-7,
        });

        let zmol = (4.719_967_2 + 0.229_971_50 * day - gam) % TAU;
        let zmos = (6.256_583_7 + 0.017_201_977 * day) % TAU;

        // Secular rates from both bodies, with the node rate held off near polar singularities
        let ses = sun.s1 * ZNS * sun.s5;
        let sis = sun.s2 * ZNS * (sun.z11 + sun.z13);
        let sls = -ZNS * sun.s3 * (sun.z1 + sun.z3 - 14.0 - 6.0 * emsq);
        let sghs = sun.s4 * ZNS * (sun.z31 + sun.z33 - 6.0);
        let mut shs = -ZNS * sun.s2 * (sun.z21 + sun.z23);
        if !(POLAR_GUARD_RAD..=PI - POLAR_GUARD_RAD).contains(&ctx.i0) {
            shs = 0.0;
        }
        if sinim != 0.0 {
            shs /= sinim;
        }
        let sgs = sghs - cosim * shs;

        let dedt = ses + moon.s1 * ZNL * moon.s5;
        let didt = sis + moon.s2 * ZNL * (moon.z11 + moon.z13);
        let dmdt = sls - ZNL * moon.s3 * (moon.z1 + moon.z3 - 14.0 - 6.0 * emsq);
        let sghl = moon.s4 * ZNL * (moon.z31 + moon.z33 - 6.0);
        let mut shll = -ZNL * moon.s2 * (moon.z21 + moon.z23);
        if !(POLAR_GUARD_RAD..=PI - POLAR_GUARD_RAD).contains(&ctx.i0) {
            shll = 0.0;
        }
        let mut domdt = sgs + sghl;
        let mut dnodt = shs;
        if sinim != 0.0 {
            domdt -= cosim / sinim * shll;
            dnodt += shll / sinim;
        }

        let resonance = resonance_terms(ctx, cosim, sinim, emsq, dmdt, dnodt, domdt);

        Self {
            dedt,
            didt,
            dmdt,
            dnodt,
            domdt,
            se2: 2.0 * sun.s1 * sun.s6,
            se3: 2.0 * sun.s1 * sun.s7,
            si2: 2.0 * sun.s2 * sun.z12,
            si3: 2.0 * sun.s2 * (sun.z13 - sun.z11),
            sl2: -2.0 * sun.s3 * sun.z2,
            sl3: -2.0 * sun.s3 * (sun.z3 - sun.z1),
            sl4: -2.0 * sun.s3 * (-21.0 - 9.0 * emsq) * ZES,
            sgh2: 2.0 * sun.s4 * sun.z32,
            sgh3: 2.0 * sun.s4 * (sun.z33 - sun.z31),
            sgh4: -18.0 * sun.s4 * ZES,
            sh2: -2.0 * sun.s2 * sun.z22,
            sh3: -2.0 * sun.s2 * (sun.z23 - sun.z21),
            ee2: 2.0 * moon.s1 * moon.s6,
            e3: 2.0 * moon.s1 * moon.s7,
            xi2: 2.0 * moon.s2 * moon.z12,
            xi3: 2.0 * moon.s2 * (moon.z13 - moon.z11),
            xl2: -2.0 * moon.s3 * moon.z2,
            xl3: -2.0 * moon.s3 * (moon.z3 - moon.z1),
            xl4: -2.0 * moon.s3 * (-21.0 - 9.0 * emsq) * ZEL,
            xgh2: 2.0 * moon.s4 * moon.z32,
            xgh3: 2.0 * moon.s4 * (moon.z33 - moon.z31),
            xgh4: -18.0 * moon.s4 * ZEL,
            xh2: -2.0 * moon.s2 * moon.z22,
            xh3: -2.0 * moon.s2 * (moon.z23 - moon.z21),
            zmol,
            zmos,
            resonance,
        }
    }

    /// Long-period lunisolar periodic corrections at `tsince` minutes after epoch.
    ///
    /// Returns the corrected `(e, i, node, argp, m)`. Below 0.2 rad of inclination the node and
    /// argument of perigee lose their individual meaning, and the correction switches to the
    /// Lyddane variables.
    pub(crate) fn lunisolar_periodics(
        &self,
        tsince: f64,
        e: f64,
        incl: f64,
        node: f64,
        argp: f64,
        m: f64,
    ) -> (f64, f64, f64, f64, f64) {
        // Solar contribution
        let mut zm = self.zmos + ZNS * tsince;
        let mut zf = zm + 2.0 * ZES * zm.sin();
        let mut sinzf = zf.sin();
        let mut f2 = 0.5 * sinzf * sinzf - 0.25;
        let mut f3 = -0.5 * sinzf * zf.cos();
        let ses = self.se2 * f2 + self.se3 * f3;
        let sis = self.si2 * f2 + self.si3 * f3;
        let sls = self.sl2 * f2 + self.sl3 * f3 + self.sl4 * sinzf;
        let sghs = self.sgh2 * f2 + self.sgh3 * f3 + self.sgh4 * sinzf;
        let shs = self.sh2 * f2 + self.sh3 * f3;

        // Lunar contribution
        zm = self.zmol + ZNL * tsince;
        zf = zm + 2.0 * ZEL * zm.sin();
        sinzf = zf.sin();
        f2 = 0.5 * sinzf * sinzf - 0.25;
        f3 = -0.5 * sinzf * zf.cos();
        let sel = self.ee2 * f2 + self.e3 * f3;
        let sil = self.xi2 * f2 + self.xi3 * f3;
        let sll = self.xl2 * f2 + self.xl3 * f3 + self.xl4 * sinzf;
        let sghl = self.xgh2 * f2 + self.xgh3 * f3 + self.xgh4 * sinzf;
        let shll = self.xh2 * f2 + self.xh3 * f3;

        let pe = ses + sel;
        let pinc = sis + sil;
        let pl = sls + sll;
        let pgh = sghs + sghl;
        let mut ph = shs + shll;

        let ep = e + pe;
        let inclp = incl + pinc;
        let mut nodep = node;
        let mut argpp = argp;
        let mut mp = m;
        let sinip = inclp.sin();
        let cosip = inclp.cos();

        if inclp >= 0.2 {
            ph /= sinip;
            argpp += pgh - cosip * ph;
            nodep += ph;
            mp += pl;
        } else {
            // Lyddane variables near the equator
            let sinop = nodep.sin();
            let cosop = nodep.cos();
            let alfdp = sinip * sinop + ph * cosop + pinc * cosip * sinop;
            let betdp = sinip * cosop - ph * sinop + pinc * cosip * cosop;
            nodep %= TAU;
            let xls = mp + argpp + pl + pgh + (cosip - pinc * sinip) * nodep;
            let xnoh = nodep;
            nodep = alfdp.atan2(betdp);
            if (xnoh - nodep).abs() > PI {
                if nodep < xnoh {
                    nodep += TAU;
                } else {
                    nodep -= TAU;
                }
            }
            mp += pl;
            argpp = xls - mp - cosip * nodep;
        }

        (ep, inclp, nodep, argpp, mp)
    }
}

#[allow(clippy::too_many_arguments)]
fn body_terms(
    body: &BodyGeometry,
    cosomm: f64,
    sinomm: f64,
    cosim: f64,
    sinim: f64,
    emsq: f64,
    betasq: f64,
    rtemsq: f64,
    em: f64,
    nm: f64,
) -> BodyTerms {
    let a1 = body.zcosg * body.zcosh + body.zsing * body.zcosi * body.zsinh;
    let a3 = -body.zsing * body.zcosh + body.zcosg * body.zcosi * body.zsinh;
    let a7 = -body.zcosg * body.zsinh + body.zsing * body.zcosi * body.zcosh;
    let a8 = body.zsing * body.zsini;
    let a9 = body.zsing * body.zsinh + body.zcosg * body.zcosi * body.zcosh;
    let a10 = body.zcosg * body.zsini;
    let a2 = cosim * a7 + sinim * a8;
    let a4 = cosim * a9 + sinim * a10;
    let a5 = -sinim * a7 + cosim * a8;
    let a6 = -sinim * a9 + cosim * a10;

    let x1 = a1 * cosomm + a2 * sinomm;
    let x2 = a3 * cosomm + a4 * sinomm;
    let x3 = -a1 * sinomm + a2 * cosomm;
    let x4 = -a3 * sinomm + a4 * cosomm;
    let x5 = a5 * sinomm;
    let x6 = a6 * sinomm;
    let x7 = a5 * cosomm;
    let x8 = a6 * cosomm;

    let z31 = 12.0 * x1 * x1 - 3.0 * x3 * x3;
    let z32 = 24.0 * x1 * x2 - 6.0 * x3 * x4;
    let z33 = 12.0 * x2 * x2 - 3.0 * x4 * x4;
    let mut z1 = 3.0 * (a1 * a1 + a2 * a2) + z31 * emsq;
    let mut z2 = 6.0 * (a1 * a3 + a2 * a4) + z32 * emsq;
    let mut z3 = 3.0 * (a3 * a3 + a4 * a4) + z33 * emsq;
    let z11 = -6.0 * a1 * a5 + emsq * (-24.0 * x1 * x7 - 6.0 * x3 * x5);
    let z12 = -6.0 * (a1 * a6 + a3 * a5)
        + emsq * (-24.0 * (x2 * x7 + x1 * x8) - 6.0 * (x3 * x6 + x4 * x5));
    let z13 = -6.0 * a3 * a6 + emsq * (-24.0 * x2 * x8 - 6.0 * x4 * x6);
    let z21 = 6.0 * a2 * a5 + emsq * (24.0 * x1 * x5 - 6.0 * x3 * x7);
    let z22 = 6.0 * (a4 * a5 + a2 * a6)
        + emsq * (24.0 * (x2 * x5 + x1 * x6) - 6.0 * (x4 * x7 + x3 * x8));
    let z23 = 6.0 * a4 * a6 + emsq * (24.0 * x2 * x6 - 6.0 * x4 * x8);
    z1 = z1 + z1 + betasq * z31;
    z2 = z2 + z2 + betasq * z32;
    z3 = z3 + z3 + betasq * z33;
    let s3 = body.cc / nm;
    let s2 = -0.5 * s3 / rtemsq;
    let s4 = s3 * rtemsq;
    let s1 = -15.0 * em * s4;
    let s5 = x1 * x3 + x2 * x4;
    let s6 = x2 * x3 + x1 * x4;
    let s7 = x2 * x4 - x1 * x3;

    BodyTerms {
        s1,
        s2,
        s3,
        s4,
        s5,
        s6,
        s7,
        z1,
        z2,
        z3,
        z11,
        z12,
        z13,
        z21,
        z22,
        z23,
        z31,
        z32,
        z33,
    }
}

/// Classifies the orbit against the two resonance bands of the theory and, when resonant, builds
/// the geopotential coefficient tables. The band boundaries are fixed constants of the reference
/// theory.
fn resonance_terms(
    ctx: &DeepSpaceContext,
    cosim: f64,
    sinim: f64,
    emsq: f64,
    dmdt: f64,
    dnodt: f64,
    domdt: f64,
) -> Option<Resonance> {
    const Q22: f64 = 1.789_167_9e-6;
    const Q31: f64 = 2.146_074_8e-6;
    const Q33: f64 = 2.212_301_5e-7;
    const ROOT22: f64 = 1.789_167_9e-6;
    const ROOT32: f64 = 3.739_379_2e-7;
    const ROOT44: f64 = 7.363_695_3e-9;
    const ROOT52: f64 = 1.142_863_9e-7;
    const ROOT54: f64 = 2.176_580_3e-9;

    let nm = ctx.n0;
    let em = ctx.e0;
    let theta = ctx.gsto % TAU;

    let synchronous = nm > 0.003_490_658_5 && nm < 0.005_235_987_7;
    let half_day = (0.008_26..=0.009_24).contains(&nm) && em >= 0.5;
    if !synchronous && !half_day {
        return None;
    }

    let aonv = (nm / ctx.gravity.ke).powf(2.0 / 3.0);

    if half_day {
        let eccsq = em * em;
        let eoc = em * eccsq;
        let g201 = -0.306 - (em - 0.64) * 0.440;
        let (g211, g310, g322, g410, g422, g520);
        if em <= 0.65 {
            g211 = 3.616 - 13.2470 * em + 16.2900 * eccsq;
            g310 = -19.302 + 117.3900 * em - 228.4190 * eccsq + 156.5910 * eoc;
            g322 = -18.9068 + 109.7927 * em - 214.6334 * eccsq + 146.5816 * eoc;
            g410 = -41.122 + 242.6940 * em - 471.0940 * eccsq + 313.9530 * eoc;
            g422 = -146.407 + 841.8800 * em - 1629.014 * eccsq + 1083.4350 * eoc;
            g520 = -532.114 + 3017.977 * em - 5740.032 * eccsq + 3708.2760 * eoc;
        } else {
            g211 = -72.099 + 331.819 * em - 508.738 * eccsq + 266.724 * eoc;
            g310 = -346.844 + 1582.851 * em - 2415.925 * eccsq + 1246.113 * eoc;
            g322 = -342.585 + 1554.908 * em - 2366.899 * eccsq + 1215.972 * eoc;
            g410 = -1052.797 + 4758.686 * em - 7193.992 * eccsq + 3651.957 * eoc;
            g422 = -3581.690 + 16178.110 * em - 24462.770 * eccsq + 12422.520 * eoc;
            if em > 0.715 {
                g520 = -5149.66 + 29936.92 * em - 54087.36 * eccsq + 31324.56 * eoc;
            } else {
                g520 = 1464.74 - 4664.75 * em + 3763.64 * eccsq;
            }
        }
        let (g533, g521, g532);
        if em < 0.7 {
            g533 = -919.227_70 + 4988.61 * em - 9064.77 * eccsq + 5542.21 * eoc;
            g521 = -822.710_72 + 4568.6173 * em - 8491.4146 * eccsq + 5337.524 * eoc;
            g532 = -853.666_00 + 4690.25 * em - 8624.77 * eccsq + 5341.4 * eoc;
        } else {
            g533 = -37995.78 + 161616.52 * em - 229838.2 * eccsq + 109377.94 * eoc;
            g521 = -51752.104 + 218913.95 * em - 309468.16 * eccsq + 146349.42 * eoc;
            g532 = -40023.88 + 170470.89 * em - 242699.48 * eccsq + 115605.82 * eoc;
        }

        let cosisq = cosim * cosim;
        let sini2 = sinim * sinim;
        let f220 = 0.75 * (1.0 + 2.0 * cosim + cosisq);
        let f221 = 1.5 * sini2;
        let f321 = 1.875 * sinim * (1.0 - 2.0 * cosim - 3.0 * cosisq);
        let f322 = -1.875 * sinim * (1.0 + 2.0 * cosim - 3.0 * cosisq);
        let f441 = 35.0 * sini2 * f220;
        let f442 = 39.375 * sini2 * sini2;
        let f522 = 9.843_75
            * sinim
            * (sini2 * (1.0 - 2.0 * cosim - 5.0 * cosisq)
                + 1.0 / 3.0 * (-2.0 + 4.0 * cosim + 6.0 * cosisq));
        let f523 = sinim
            * (4.921_875_12 * sini2 * (-2.0 - 4.0 * cosim + 10.0 * cosisq)
                + 6.562_500_12 * (1.0 + 2.0 * cosim - 3.0 * cosisq));
        let f542 = 29.531_25
            * sinim
            * (2.0 - 8.0 * cosim + cosisq * (-12.0 + 8.0 * cosim + 10.0 * cosisq));
        let f543 = 29.531_25
            * sinim
            * (-2.0 - 8.0 * cosim + cosisq * (12.0 + 8.0 * cosim - 10.0 * cosisq));

        let xno2 = nm * nm;
        let ainv2 = aonv * aonv;
        let mut temp1 = 3.0 * xno2 * ainv2;
        let mut temp = temp1 * ROOT22;
        let d2201 = temp * f220 * g201;
        let d2211 = temp * f221 * g211;
        temp1 *= aonv;
        temp = temp1 * ROOT32;
        let d3210 = temp * f321 * g310;
        let d3222 = temp * f322 * g322;
        temp1 *= aonv;
        temp = 2.0 * temp1 * ROOT44;
        let d4410 = temp * f441 * g410;
        let d4422 = temp * f442 * g422;
        temp1 *= aonv;
        temp = temp1 * ROOT52;
        let d5220 = temp * f522 * g520;
        let d5232 = temp * f523 * g532;
        temp = 2.0 * temp1 * ROOT54;
        let d5421 = temp * f542 * g521;
        let d5433 = temp * f543 * g533;

        Some(Resonance {
            kind: ResonanceKind::HalfDay(HalfDayTerms {
                d2201,
                d2211,
                d3210,
                d3222,
                d4410,
                d4422,
                d5220,
                d5232,
                d5421,
                d5433,
            }),
            xlamo: (ctx.m0 + ctx.node0 + ctx.node0 - theta - theta) % TAU,
            xfact: ctx.mdot + dmdt + 2.0 * (ctx.nodedot + dnodt - RPTIM) - ctx.n0,
        })
    } else {
        let g200 = 1.0 + emsq * (-2.5 + 0.8125 * emsq);
        let g310 = 1.0 + 2.0 * emsq;
        let g300 = 1.0 + emsq * (-6.0 + 6.609_37 * emsq);
        let f220 = 0.75 * (1.0 + cosim) * (1.0 + cosim);
        let f311 = 0.9375 * sinim * sinim * (1.0 + 3.0 * cosim) - 0.75 * (1.0 + cosim);
        let mut f330 = 1.0 + cosim;
        f330 = 1.875 * f330 * f330 * f330;
        let del1 = 3.0 * nm * nm * aonv * aonv;
        let del2 = 2.0 * del1 * f220 * g200 * Q22;
        let del3 = 3.0 * del1 * f330 * g300 * Q33 * aonv;
        let del1 = del1 * f311 * g310 * Q31 * aonv;

        let xpidot = ctx.argpdot + ctx.nodedot;
        Some(Resonance {
            kind: ResonanceKind::Synchronous(SynchronousTerms { del1, del2, del3 }),
            xlamo: (ctx.m0 + ctx.node0 + ctx.argp0 - theta) % TAU,
            xfact: ctx.mdot + xpidot - RPTIM + dmdt + domdt + dnodt - ctx.n0,
        })
    }
}
