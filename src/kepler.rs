//! # Kepler's equation
//!
//! Anomaly solvers for the three conic families and the matching orbital-plane
//! point generators. Orbital-plane coordinates have the focus at the origin and the
//! `+x` axis pointing at periapsis.
//!
//! | orbit      | equation               | unknown |
//! |------------|------------------------|---------|
//! | ellipse    | `M = E − e·sin E`      | E       |
//! | hyperbola  | `M = e·sinh H − H`     | H       |
//! | parabola   | `B = D + D³/3`         | D = tan(ν/2) |
//!
//! The elliptic solver is the plain fixed-point iteration `E ← M + e·sin E`, bounded
//! by [`KeplerSolver::max_iterations`]. When the budget runs out (very eccentric
//! orbits near periapsis contract slowly) the root is refined with Brent's method on
//! the bracket `[M − e, M + e]`, which always contains it.

use nalgebra::Vector2;
use roots::{find_root_brent, SimpleConvergency};
use std::f64::consts::PI;
use tracing::warn;

use super::constants::{Radian, DPI};

/// Default stopping threshold on the anomaly increment (radians)
pub const KEPLER_TOLERANCE: f64 = 2e-8;

/// Default iteration budget of the anomaly solvers
pub const KEPLER_MAX_ITERATIONS: usize = 100;

/// Iteration budget of the bracketed fallback, independent of the fixed-point budget
const BRENT_MAX_ITERATIONS: usize = 200;

/// Returns the principal value of an angle in radians, in `[0, 2π)`.
pub fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Returns the principal difference `a − b` of two angles, in `[-π, π]`.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let mut diff = principal_angle(a) - principal_angle(b);
    if diff > PI {
        diff -= DPI;
    } else if diff < -PI {
        diff += DPI;
    }
    diff
}

/// Outcome of an anomaly solve.
///
/// `converged == false` means the iteration budget was exhausted and `anomaly` is the
/// last iterate: a usable approximation, not a failure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    pub anomaly: Radian,
    pub iterations: usize,
    pub converged: bool,
}

/// Iteration controls shared by the elliptic and hyperbolic solvers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolver {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        KeplerSolver {
            tolerance: KEPLER_TOLERANCE,
            max_iterations: KEPLER_MAX_ITERATIONS,
        }
    }
}

impl KeplerSolver {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        KeplerSolver {
            tolerance,
            max_iterations,
        }
    }

    /// Solve Kepler's equation `M = E − e·sin E` for the eccentric anomaly.
    ///
    /// Arguments
    /// ---------
    /// * `e`: eccentricity, in `[0, 1)`
    /// * `m`: mean anomaly (radians, any range)
    ///
    /// Return
    /// ------
    /// * a [`KeplerSolution`]; for `e == 0` the anomaly is `m` itself after zero iterations.
    ///
    /// See also
    /// --------
    /// * [`KeplerSolver::orbital_plane_point`] – position from the solved anomaly.
    pub fn solve_eccentric_anomaly(&self, e: f64, m: Radian) -> KeplerSolution {
        if e == 0.0 {
            return KeplerSolution {
                anomaly: m,
                iterations: 0,
                converged: true,
            };
        }

        let mut ecc_anomaly: f64 = 0.0;
        for iteration in 1..=self.max_iterations {
            let next = m + e * ecc_anomaly.sin();
            let delta = (next - ecc_anomaly).abs();
            ecc_anomaly = next;
            if delta < self.tolerance {
                return KeplerSolution {
                    anomaly: ecc_anomaly,
                    iterations: iteration,
                    converged: true,
                };
            }
        }

        let f = |x: f64| x - e * x.sin() - m;
        let mut convergency = SimpleConvergency {
            eps: 1e-12,
            max_iter: BRENT_MAX_ITERATIONS,
        };
        match find_root_brent(m - e, m + e, &f, &mut convergency) {
            Ok(root) => KeplerSolution {
                anomaly: root,
                iterations: self.max_iterations,
                converged: true,
            },
            Err(err) => {
                warn!(e, m, %err, "Kepler equation did not converge, keeping last iterate");
                KeplerSolution {
                    anomaly: ecc_anomaly,
                    iterations: self.max_iterations,
                    converged: false,
                }
            }
        }
    }

    /// Solve the hyperbolic Kepler equation `M = e·sinh H − H` by Newton iteration.
    ///
    /// Steps that would cross zero are halved instead, which keeps the iterate on the
    /// side of the root where the equation is convex.
    pub fn solve_hyperbolic_anomaly(&self, e: f64, m: Radian) -> KeplerSolution {
        if m == 0.0 {
            return KeplerSolution {
                anomaly: 0.0,
                iterations: 0,
                converged: true,
            };
        }

        let mut h = m.signum() * (2.0 * m.abs() / e + 1.8).ln();
        for iteration in 1..=self.max_iterations {
            let dh = -(e * h.sinh() - h - m) / (e * h.cosh() - 1.0);
            let next = h + dh;
            h = if h * next < 0.0 { h / 2.0 } else { next };
            if dh.abs() < self.tolerance {
                return KeplerSolution {
                    anomaly: h,
                    iterations: iteration,
                    converged: true,
                };
            }
        }

        warn!(e, m, "hyperbolic Kepler equation did not converge, keeping last iterate");
        KeplerSolution {
            anomaly: h,
            iterations: self.max_iterations,
            converged: false,
        }
    }

    /// Position in the orbital plane of an elliptic orbit at mean anomaly `m`.
    ///
    /// `x = a(cos E − e)`, `y = a·√(1 − e²)·sin E`, with `E` the solved eccentric anomaly.
    pub fn orbital_plane_point(&self, m: Radian, e: f64, a: f64) -> Vector2<f64> {
        let solution = self.solve_eccentric_anomaly(e, m);
        ellipse_point(solution.anomaly, e, a)
    }
}

/// Solve Barker's equation `B = D + D³/3` for `D = tan(ν/2)` in closed form.
pub fn solve_parabolic_anomaly(b: f64) -> f64 {
    let y = (1.5 * b + (2.25 * b * b + 1.0).sqrt()).cbrt();
    y - 1.0 / y
}

/// Orbital-plane point of an ellipse at eccentric anomaly `ecc_anomaly`.
pub fn ellipse_point(ecc_anomaly: Radian, e: f64, a: f64) -> Vector2<f64> {
    Vector2::new(
        a * (ecc_anomaly.cos() - e),
        a * (1.0 - e * e).sqrt() * ecc_anomaly.sin(),
    )
}

/// Orbital-plane point of a hyperbola at hyperbolic anomaly `h`.
///
/// `a_abs` is the absolute value of the (negative) semi-major axis.
pub fn hyperbola_point(h: f64, e: f64, a_abs: f64) -> Vector2<f64> {
    Vector2::new(
        a_abs * (e - h.cosh()),
        a_abs * (e * e - 1.0).sqrt() * h.sinh(),
    )
}

/// Orbital-plane point of a parabola with periapsis distance `q` at `D = tan(ν/2)`.
pub fn parabola_point(d: f64, q: f64) -> Vector2<f64> {
    Vector2::new(q * (1.0 - d * d), 2.0 * q * d)
}
