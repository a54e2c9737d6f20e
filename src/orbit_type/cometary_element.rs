//! # Cometary elements
//!
//! Perihelion-based elements `(q, e, i, Ω, ϖ, Tp)` of comets. Unlike the Keplerian set
//! they stay finite through `e = 1`, so the same struct describes elliptic, parabolic
//! and hyperbolic orbits; [`CometaryElements::conic`] tells them apart.

use nalgebra::Vector2;
use std::fmt;

use crate::constants::{Centuries, GM_SUN, MJD, RADEG};
use crate::kepler::{
    ellipse_point, hyperbola_point, parabola_point, solve_parabolic_anomaly, KeplerSolver,
};
use crate::orbit_type::{heliocentric_period, OrbitShape};
use crate::ref_system::OrbitOrientation;
use crate::time::mjd_to_eph;

/// Eccentricities within this distance of 1 are propagated as parabolas
pub const PARABOLIC_TOLERANCE: f64 = 1e-6;

/// Conic family of a cometary orbit, with the size parameter it needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conic {
    /// `e < 1`, `a = q / (1 − e)`
    Ellipse { semi_major_axis: f64 },
    /// `e ≈ 1`
    Parabola,
    /// `e > 1`, `|a| = q / (e − 1)`
    Hyperbola { semi_major_axis_abs: f64 },
}

/// # Cometary orbital elements
///
/// Cometary (perihelion-based) elements stay finite for **parabolic and hyperbolic**
/// orbits, where the semi-major axis is infinite (parabola) or negative (hyperbola).
///
/// The orbit phase is fixed by the time of perihelion passage `Tp`; the *anomaly
/// variable* of each conic grows linearly from zero at `Tp`:
///
/// | conic | variable | rate (rad/century) |
/// |-------|----------|--------------------|
/// | ellipse | mean anomaly M | `√(GM/a³)` |
/// | hyperbola | hyperbolic mean anomaly | `√(GM/|a|³)` |
/// | parabola | Barker's `B` | `√(GM/(2q³))` |
///
/// Units & conventions
/// --------------------
/// - Distances in **AU**; angles in **radians**; epochs in **MJD**.
/// - Elements are referred to the ecliptic and equinox.
/// - `periapsis_longitude` is the longitude of perihelion `ϖ = Ω + ω`.
///
/// See also
/// ------------
/// * [`KeplerianElements`](crate::orbit_type::keplerian_element::KeplerianElements) – Classical
///   elements of bound orbits.
#[derive(Debug, Clone, PartialEq)]
pub struct CometaryElements {
    /// Time of perihelion passage (MJD).
    pub perihelion_time: MJD,

    /// Perihelion distance `q` (AU).
    pub perihelion_distance: f64,

    /// Eccentricity `e` (≥ 0).
    pub eccentricity: f64,

    /// Inclination `i` (rad).
    pub inclination: f64,

    /// Longitude of the ascending node `Ω` (rad).
    pub ascending_node_longitude: f64,

    /// Longitude of perihelion `ϖ` (rad).
    pub periapsis_longitude: f64,
}

impl CometaryElements {
    /// Classify the orbit and derive its size parameter.
    pub fn conic(&self) -> Conic {
        let e = self.eccentricity;
        let q = self.perihelion_distance;
        if (e - 1.0).abs() < PARABOLIC_TOLERANCE {
            Conic::Parabola
        } else if e < 1.0 {
            Conic::Ellipse {
                semi_major_axis: q / (1.0 - e),
            }
        } else {
            Conic::Hyperbola {
                semi_major_axis_abs: q / (e - 1.0),
            }
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.conic(), Conic::Ellipse { .. })
    }

    /// Argument of perihelion `ω = ϖ − Ω`.
    pub fn periapsis_argument(&self) -> f64 {
        self.periapsis_longitude - self.ascending_node_longitude
    }

    pub fn orientation(&self) -> OrbitOrientation {
        OrbitOrientation {
            periapsis_argument: self.periapsis_argument(),
            ascending_node: self.ascending_node_longitude,
            inclination: self.inclination,
        }
    }

    /// Growth rate of the anomaly variable, in radians per century.
    pub fn anomaly_rate(&self) -> f64 {
        match self.conic() {
            Conic::Ellipse { semi_major_axis } => (GM_SUN / semi_major_axis.powi(3)).sqrt(),
            Conic::Hyperbola {
                semi_major_axis_abs,
            } => (GM_SUN / semi_major_axis_abs.powi(3)).sqrt(),
            Conic::Parabola => (GM_SUN / (2.0 * self.perihelion_distance.powi(3))).sqrt(),
        }
    }

    /// Value of the anomaly variable at ephemeris time `t`.
    pub fn anomaly_at(&self, t: Centuries) -> f64 {
        self.anomaly_rate() * (t - mjd_to_eph(self.perihelion_time))
    }

    /// Orbital-plane position for a value of the anomaly variable.
    ///
    /// Return
    /// ------
    /// * the point and the convergence flag of the solver (always `true` for parabolas)
    pub fn plane_point(&self, anomaly: f64, solver: &KeplerSolver) -> (Vector2<f64>, bool) {
        let e = self.eccentricity;
        match self.conic() {
            Conic::Ellipse { semi_major_axis } => {
                let sol = solver.solve_eccentric_anomaly(e, anomaly);
                (ellipse_point(sol.anomaly, e, semi_major_axis), sol.converged)
            }
            Conic::Hyperbola {
                semi_major_axis_abs,
            } => {
                let sol = solver.solve_hyperbolic_anomaly(e, anomaly);
                (
                    hyperbola_point(sol.anomaly, e, semi_major_axis_abs),
                    sol.converged,
                )
            }
            Conic::Parabola => (
                parabola_point(solve_parabolic_anomaly(anomaly), self.perihelion_distance),
                true,
            ),
        }
    }

    /// Derived geometry; unbound orbits report
    /// [`Extent::Unbound`](crate::orbit_type::Extent::Unbound) markers.
    pub fn shape(&self) -> OrbitShape {
        match self.conic() {
            Conic::Ellipse { semi_major_axis } => OrbitShape::elliptic(
                semi_major_axis,
                self.eccentricity,
                heliocentric_period(semi_major_axis),
            ),
            _ => OrbitShape::unbound(self.perihelion_distance),
        }
    }
}

impl fmt::Display for CometaryElements {
    /// Pretty-print cometary elements with both radians and degrees for angles.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Cometary Elements @ perihelion (MJD): {:.6}",
            self.perihelion_time
        )?;
        writeln!(f, "------------------------------------------------")?;
        writeln!(
            f,
            "  q   (perihelion distance)     = {:.6} AU",
            self.perihelion_distance
        )?;
        writeln!(
            f,
            "  e   (eccentricity)            = {:.6}",
            self.eccentricity
        )?;
        for (label, value) in [
            ("i   (inclination)          ", self.inclination),
            ("Ω   (longitude of node)    ", self.ascending_node_longitude),
            ("ϖ   (longitude of perihelion)", self.periapsis_longitude),
        ] {
            writeln!(f, "  {label}   = {value:.6} rad ({:.6}°)", value / RADEG)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod cometary_element_test {
    use super::*;
    use crate::constants::T2000;
    use approx::assert_relative_eq;

    fn comet(e: f64) -> CometaryElements {
        CometaryElements {
            perihelion_time: T2000,
            perihelion_distance: 0.5,
            eccentricity: e,
            inclination: 0.3,
            ascending_node_longitude: 1.0,
            periapsis_longitude: 1.5,
        }
    }

    #[test]
    fn test_conic_classification() {
        assert_eq!(
            comet(0.5).conic(),
            Conic::Ellipse {
                semi_major_axis: 1.0
            }
        );
        assert_eq!(comet(1.0).conic(), Conic::Parabola);
        match comet(1.2).conic() {
            Conic::Hyperbola {
                semi_major_axis_abs,
            } => assert_relative_eq!(semi_major_axis_abs, 2.5, epsilon = 1e-12),
            other => panic!("expected a hyperbola, got {other:?}"),
        }
    }

    #[test]
    fn test_unbound_shape_markers() {
        let shape = comet(1.2).shape();
        assert!(shape.semi_major_axis.is_unbound());
        assert!(shape.apoapsis.is_unbound());
        assert!(shape.period.is_unbound());
        assert_eq!(shape.periapsis, 0.5);
        assert!(!shape.periapsis.is_nan());
    }

    #[test]
    fn test_perihelion_at_tp() {
        let solver = KeplerSolver::default();
        for e in [0.5, 1.0, 1.2] {
            let c = comet(e);
            assert_eq!(c.anomaly_at(0.0), 0.0);
            let (p, converged) = c.plane_point(0.0, &solver);
            assert!(converged);
            assert_relative_eq!(p.x, 0.5, epsilon = 1e-12);
            assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_unbound_recedes() {
        let solver = KeplerSolver::default();
        for e in [1.0, 1.2, 2.0] {
            let c = comet(e);
            let r1 = c.plane_point(c.anomaly_at(0.01), &solver).0.norm();
            let r2 = c.plane_point(c.anomaly_at(0.1), &solver).0.norm();
            assert!(r1 > 0.5 && r2 > r1, "e = {e}: {r1} {r2}");
        }
    }

    #[test]
    fn test_bound_period() {
        let c = comet(0.5);
        let period = c.shape().period.value();
        assert_relative_eq!(period, 0.01, epsilon = 1e-15);
        assert_relative_eq!(c.anomaly_rate() * period, std::f64::consts::TAU, epsilon = 1e-12);
    }
}
