//! # Orbital element representations
//!
//! This module defines the element sets carried by the four body kinds, and the
//! derived orbit geometry shared by all of them:
//!
//! - [`keplerian_element`](crate::orbit_type::keplerian_element): Classical Keplerian
//!   elements `(a, e, i, Ω, ω, M)`, used by asteroids and moons.
//! - [`planetary_element`](crate::orbit_type::planetary_element): Mean-longitude
//!   elements `(a, e, i, L, ϖ, Ω)` with secular rates, used by the major planets.
//! - [`cometary_element`](crate::orbit_type::cometary_element): Perihelion-based
//!   representation `(q, e, i, Ω, ϖ, Tp)`, valid for elliptic, parabolic and hyperbolic
//!   orbits.
//!
//! [`OrbitShape`] gathers the quantities derived from `(a, e)`; quantities that do not
//! exist for unbound orbits are reported as [`Extent::Unbound`] instead of a negative or
//! non-finite number.

use std::fmt;

use crate::constants::{AstronomicalUnit, Centuries, DPI};

/// Classical Keplerian elements structure and utilities.
pub mod keplerian_element;

/// Perihelion-based elements of comets.
pub mod cometary_element;

/// Mean-longitude elements and secular rates of the major planets.
pub mod planetary_element;

/// Largest eccentricity accepted for an orbit that must stay bound
pub const MAX_BOUND_ECCENTRICITY: f64 = 0.999_999;

/// A length or duration that may be infinite for unbound orbits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    Finite(f64),
    Unbound,
}

impl Extent {
    /// The finite value, if any.
    pub fn finite(self) -> Option<f64> {
        match self {
            Extent::Finite(v) => Some(v),
            Extent::Unbound => None,
        }
    }

    pub fn is_unbound(self) -> bool {
        matches!(self, Extent::Unbound)
    }

    /// The value as a float, `+∞` when unbound.
    pub fn value(self) -> f64 {
        self.finite().unwrap_or(f64::INFINITY)
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extent::Finite(v) => write!(f, "{v:.6}"),
            Extent::Unbound => write!(f, "unbound"),
        }
    }
}

/// Orbit geometry derived from the live elements.
///
/// Units
/// -----
/// * lengths in AU
/// * `period` in Julian centuries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitShape {
    pub semi_major_axis: Extent,
    pub period: Extent,
    pub periapsis: AstronomicalUnit,
    pub apoapsis: Extent,
    pub mean_orbit: Extent,
}

impl OrbitShape {
    /// Shape of a bound orbit of semi-major axis `a`, eccentricity `e` and the given period.
    ///
    /// `e` is clamped to `[0, MAX_BOUND_ECCENTRICITY]`.
    pub fn elliptic(a: AstronomicalUnit, e: f64, period: Centuries) -> Self {
        let e = e.clamp(0.0, MAX_BOUND_ECCENTRICITY);
        OrbitShape {
            semi_major_axis: Extent::Finite(a),
            period: Extent::Finite(period),
            periapsis: a * (1.0 - e),
            apoapsis: Extent::Finite(a * (1.0 + e)),
            mean_orbit: Extent::Finite(a * (1.0 + e * e / 2.0)),
        }
    }

    /// Shape of a parabolic or hyperbolic orbit of periapsis distance `q`.
    pub fn unbound(q: AstronomicalUnit) -> Self {
        OrbitShape {
            semi_major_axis: Extent::Unbound,
            period: Extent::Unbound,
            periapsis: q,
            apoapsis: Extent::Unbound,
            mean_orbit: Extent::Unbound,
        }
    }
}

/// Orbital period around the Sun, in centuries, of a body of semi-major axis `a` (AU).
pub fn heliocentric_period(a: AstronomicalUnit) -> Centuries {
    a.abs().powf(1.5) / 100.0
}

/// Mean motion around the Sun, in radians per century.
pub fn heliocentric_mean_motion(a: AstronomicalUnit) -> f64 {
    let period = heliocentric_period(a);
    if period > 0.0 {
        DPI / period
    } else {
        0.0
    }
}

#[cfg(test)]
mod orbit_shape_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_elliptic_shape() {
        let shape = OrbitShape::elliptic(2.0, 0.5, heliocentric_period(2.0));
        assert_relative_eq!(shape.periapsis, 1.0);
        assert_eq!(shape.apoapsis, Extent::Finite(3.0));
        assert_eq!(shape.mean_orbit, Extent::Finite(2.25));
        assert!(shape.periapsis <= shape.apoapsis.value());
    }

    #[test]
    fn test_unbound_shape() {
        let shape = OrbitShape::unbound(0.8);
        assert!(shape.semi_major_axis.is_unbound());
        assert!(shape.apoapsis.is_unbound());
        assert!(shape.period.is_unbound());
        assert_eq!(shape.apoapsis.value(), f64::INFINITY);
        assert_eq!(shape.apoapsis.to_string(), "unbound");
    }

    #[test]
    fn test_earth_year() {
        assert_relative_eq!(heliocentric_period(1.0), 0.01);
        assert_relative_eq!(heliocentric_mean_motion(1.0), 200.0 * std::f64::consts::PI);
    }
}
