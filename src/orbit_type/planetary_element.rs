//! # Planetary mean elements
//!
//! The major planets are described by *mean* elements valid over a few millennia:
//! the element values at a reference epoch plus linear secular rates, following the
//! layout of the JPL "Keplerian elements for approximate positions of the major
//! planets" tables.
//!
//! | element | symbol | unit |
//! |---------|--------|------|
//! | semi-major axis | a | AU |
//! | eccentricity | e | – |
//! | inclination | i | rad |
//! | mean longitude | L | rad |
//! | longitude of periapsis | ϖ | rad |
//! | longitude of ascending node | Ω | rad |
//!
//! Every rate is expressed per Julian century. The outer planets carry four extra
//! terms correcting their mean anomaly:
//!
//! `M = L − ϖ + b·T² + c·cos(f·T) + s·sin(f·T)`, with `T` the ephemeris time.

use std::fmt;

use crate::constants::{Centuries, MJD, RADEG};
use crate::ref_system::OrbitOrientation;

/// Mean elements of a planet at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetaryElements {
    pub reference_epoch: MJD,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub mean_longitude: f64,
    pub periapsis_longitude: f64,
    pub ascending_node_longitude: f64,
}

/// Linear drift of each element, per century.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SecularRates {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub mean_longitude: f64,
    pub periapsis_longitude: f64,
    pub ascending_node_longitude: f64,
}

/// Extra mean-anomaly terms of Jupiter through Pluto (radians, `f` in radians per century).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnomalyCorrection {
    pub b: f64,
    pub c: f64,
    pub s: f64,
    pub f: f64,
}

impl AnomalyCorrection {
    /// `b·T² + c·cos(f·T) + s·sin(f·T)`
    pub fn at(&self, t: Centuries) -> f64 {
        self.b * t * t + self.c * (self.f * t).cos() + self.s * (self.f * t).sin()
    }
}

impl PlanetaryElements {
    /// Closed-form elements at `offset` centuries after the reference epoch.
    ///
    /// Every element, the mean longitude included, is `start + rate · offset`. The
    /// reference epoch is unchanged: the result is still anchored to the same snapshot.
    pub fn propagated(&self, rates: &SecularRates, offset: Centuries) -> Self {
        PlanetaryElements {
            reference_epoch: self.reference_epoch,
            semi_major_axis: self.semi_major_axis + rates.semi_major_axis * offset,
            eccentricity: self.eccentricity + rates.eccentricity * offset,
            inclination: self.inclination + rates.inclination * offset,
            mean_longitude: self.mean_longitude + rates.mean_longitude * offset,
            periapsis_longitude: self.periapsis_longitude + rates.periapsis_longitude * offset,
            ascending_node_longitude: self.ascending_node_longitude
                + rates.ascending_node_longitude * offset,
        }
    }

    /// Secular drift of the orbit shape and orientation over `dt` centuries.
    ///
    /// The mean longitude is left alone: it is advanced by the per-tick update.
    pub fn precess(&mut self, rates: &SecularRates, dt: Centuries) {
        self.semi_major_axis += rates.semi_major_axis * dt;
        self.eccentricity += rates.eccentricity * dt;
        self.inclination += rates.inclination * dt;
        self.periapsis_longitude += rates.periapsis_longitude * dt;
        self.ascending_node_longitude += rates.ascending_node_longitude * dt;
    }

    /// Argument of periapsis `ω = ϖ − Ω`.
    pub fn periapsis_argument(&self) -> f64 {
        self.periapsis_longitude - self.ascending_node_longitude
    }

    /// Mean anomaly at ephemeris time `t`, correction terms included.
    pub fn mean_anomaly(&self, t: Centuries, correction: &AnomalyCorrection) -> f64 {
        self.mean_longitude - self.periapsis_longitude + correction.at(t)
    }

    pub fn orientation(&self) -> OrbitOrientation {
        OrbitOrientation {
            periapsis_argument: self.periapsis_argument(),
            ascending_node: self.ascending_node_longitude,
            inclination: self.inclination,
        }
    }
}

impl fmt::Display for PlanetaryElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Planetary Elements @ epoch (MJD): {:.6}",
            self.reference_epoch
        )?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(f, "  a   (semi-major axis)       = {:.8} AU", self.semi_major_axis)?;
        writeln!(f, "  e   (eccentricity)          = {:.8}", self.eccentricity)?;
        for (label, value) in [
            ("i   (inclination)          ", self.inclination),
            ("L   (mean longitude)       ", self.mean_longitude),
            ("ϖ   (longitude of perihelion)", self.periapsis_longitude),
            ("Ω   (longitude of node)    ", self.ascending_node_longitude),
        ] {
            writeln!(f, "  {label} = {:.6}°", value / RADEG)?;
        }
        Ok(())
    }
}
