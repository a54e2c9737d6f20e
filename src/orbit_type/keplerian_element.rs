//! # Keplerian orbital elements
//!
//! This module defines the [`KeplerianElements`] struct, the **classical orbital element
//! representation** used by asteroids and moons.
//!
//! ## What are Keplerian elements?
//!
//! 1. **a** – Semi-major axis (AU)
//! 2. **e** – Eccentricity (unitless)
//! 3. **i** – Inclination (radians)
//! 4. **Ω** – Longitude of ascending node (radians)
//! 5. **ω** – Argument of periapsis (radians)
//! 6. **M** – Mean anomaly (radians)
//!
//! Together with the epoch of reference (MJD), these parameters fully describe an
//! orbit under the two-body approximation. Only the mean anomaly moves in time; it
//! advances linearly at the mean motion of the orbit.
//!
//! ## See also
//!
//! - [`principal_angle`](crate::kepler::principal_angle) – helper to normalize angular elements.
//! - [`KeplerSolver`] – anomaly solver used to place the body.

use nalgebra::Vector2;
use std::fmt;

use crate::constants::{Centuries, MJD, RADEG};
use crate::kepler::{ellipse_point, principal_angle, KeplerSolver};
use crate::orbit_type::{OrbitShape, MAX_BOUND_ECCENTRICITY};
use crate::ref_system::OrbitOrientation;

/// Keplerian orbital elements (osculating, two-body).
///
/// Units
/// -----
/// * `reference_epoch`: MJD (Modified Julian Date).
/// * `semi_major_axis`: Astronomical Units (AU).
/// * `eccentricity`: unitless, in `[0, 1)`.
/// * `inclination`: radians.
/// * `ascending_node_longitude`: radians (Ω).
/// * `periapsis_argument`: radians (ω).
/// * `mean_anomaly`: radians (M).
#[derive(Debug, PartialEq, Clone)]
pub struct KeplerianElements {
    pub reference_epoch: MJD,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub ascending_node_longitude: f64,
    pub periapsis_argument: f64,
    pub mean_anomaly: f64,
}

impl KeplerianElements {
    /// Angular elements `(ω, Ω, i)` for the frame transforms.
    pub fn orientation(&self) -> OrbitOrientation {
        OrbitOrientation {
            periapsis_argument: self.periapsis_argument,
            ascending_node: self.ascending_node_longitude,
            inclination: self.inclination,
        }
    }

    /// Eccentricity restricted to the bound range the elliptic solver accepts.
    pub fn bound_eccentricity(&self) -> f64 {
        self.eccentricity.clamp(0.0, MAX_BOUND_ECCENTRICITY)
    }

    /// The same orbit with the mean anomaly advanced by `mean_motion · offset`.
    ///
    /// Arguments
    /// ---------
    /// * `mean_motion`: radians per century
    /// * `offset`: centuries elapsed since the reference epoch
    pub fn propagated(&self, mean_motion: f64, offset: Centuries) -> Self {
        KeplerianElements {
            mean_anomaly: self.mean_anomaly + mean_motion * offset,
            ..self.clone()
        }
    }

    /// Orbital-plane position at the current mean anomaly, and its eccentric anomaly.
    pub fn plane_point(&self, solver: &KeplerSolver) -> (Vector2<f64>, f64, bool) {
        let e = self.bound_eccentricity();
        let solution = solver.solve_eccentric_anomaly(e, self.mean_anomaly);
        (
            ellipse_point(solution.anomaly, e, self.semi_major_axis),
            solution.anomaly,
            solution.converged,
        )
    }

    /// Derived geometry, with the period supplied by the caller (it depends on the primary).
    pub fn shape(&self, period: Centuries) -> OrbitShape {
        OrbitShape::elliptic(self.semi_major_axis, self.eccentricity, period)
    }

    /// Mean anomaly reduced to `[0, 2π)`.
    pub fn principal_mean_anomaly(&self) -> f64 {
        principal_angle(self.mean_anomaly)
    }
}

impl fmt::Display for KeplerianElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rad_to_deg = 1.0 / RADEG;
        writeln!(
            f,
            "Keplerian Elements @ epoch (MJD): {:.6}",
            self.reference_epoch
        )?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.6} AU",
            self.semi_major_axis
        )?;
        writeln!(
            f,
            "  e   (eccentricity)          = {:.6}",
            self.eccentricity
        )?;
        for (label, value) in [
            ("i   (inclination)          ", self.inclination),
            ("Ω   (longitude of node)    ", self.ascending_node_longitude),
            ("ω   (argument of periapsis)", self.periapsis_argument),
            ("M   (mean anomaly)         ", self.principal_mean_anomaly()),
        ] {
            writeln!(
                f,
                "  {label} = {value:.6} rad ({:.6}°)",
                value * rad_to_deg
            )?;
        }
        Ok(())
    }
}
