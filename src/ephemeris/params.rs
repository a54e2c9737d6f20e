//! # Ephemeris parameters
//!
//! [`EphemerisParams`] gathers every tunable knob of the propagation driver:
//!
//! - the **start time** at which bodies are first placed,
//! - the **Kepler solver** tolerance and iteration budget,
//! - the **orbit path** sampling (points per closed loop, clipping radius of open arcs),
//! - the **precession cadence** of the secular drift of major planets,
//! - the **barycentric pairs** whose primary is drawn offset from its raw position,
//! - the name of the body used as the **observing platform** (the Earth).
//!
//! ## Example
//!
//! ```rust
//! use orrery::ephemeris::params::{EphemerisParams, PrecessionCadence};
//!
//! let params = EphemerisParams::builder()
//!     .path_points(720)
//!     .precession_cadence(PrecessionCadence::Daily)
//!     .kepler_tolerance(1e-10)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.path_points, 720);
//! ```

use std::cmp::Ordering::{Equal, Greater, Less};

use crate::constants::{
    AstronomicalUnit, MJD, EARTH_MOON_BARY_RATIO, PLUTO_CHARON_BARY_RATIO, T2000,
};
use crate::kepler::{KeplerSolver, KEPLER_MAX_ITERATIONS, KEPLER_TOLERANCE};
use crate::orrery_errors::OrreryError;

/// How often the secular drift of precessing bodies is applied while advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrecessionCadence {
    /// Drift by `dt` on every tick, regenerating the drawn paths each time
    #[default]
    EveryTick,
    /// Accumulate ticks and drift once per simulated day
    Daily,
}

/// A primary drawn at `primary + (primary − secondary) · ratio`.
#[derive(Debug, Clone, PartialEq)]
pub struct BarycentricPair {
    pub primary: String,
    pub secondary: String,
    pub ratio: f64,
}

impl BarycentricPair {
    pub fn new(primary: &str, secondary: &str, ratio: f64) -> Self {
        BarycentricPair {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            ratio,
        }
    }
}

/// Configuration of an [`Ephemeris`](crate::ephemeris::Ephemeris).
///
/// Defaults
/// -----------------
/// * `start_time`: MJD 51544.5 (J2000)
/// * `kepler_tolerance`: 2e-8 rad
/// * `kepler_max_iterations`: 100
/// * `path_points`: 360
/// * `unbound_path_radius`: 50 AU
/// * `precession_cadence`: [`PrecessionCadence::EveryTick`]
/// * `barycentric_pairs`: Earth/Moon (4670/388400), Pluto/Charon (2110/19600)
/// * `earth_name`: `"Earth"`
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisParams {
    /// Time of the initial placement (MJD)
    pub start_time: MJD,
    pub kepler_tolerance: f64,
    pub kepler_max_iterations: usize,
    /// Samples per regenerated orbit path
    pub path_points: usize,
    /// Heliocentric distance where the open arc of an unbound orbit stops
    pub unbound_path_radius: AstronomicalUnit,
    pub precession_cadence: PrecessionCadence,
    pub barycentric_pairs: Vec<BarycentricPair>,
    /// Body hosting the observer
    pub earth_name: String,
}

impl EphemerisParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> EphemerisParamsBuilder {
        EphemerisParamsBuilder::new()
    }

    /// Kepler solver configured from these parameters.
    pub fn solver(&self) -> KeplerSolver {
        KeplerSolver::new(self.kepler_tolerance, self.kepler_max_iterations)
    }
}

impl Default for EphemerisParams {
    fn default() -> Self {
        EphemerisParams {
            start_time: T2000,
            kepler_tolerance: KEPLER_TOLERANCE,
            kepler_max_iterations: KEPLER_MAX_ITERATIONS,
            path_points: 360,
            unbound_path_radius: 50.0,
            precession_cadence: PrecessionCadence::EveryTick,
            barycentric_pairs: vec![
                BarycentricPair::new("Earth", "Moon", EARTH_MOON_BARY_RATIO),
                BarycentricPair::new("Pluto", "Charon", PLUTO_CHARON_BARY_RATIO),
            ],
            earth_name: "Earth".to_string(),
        }
    }
}

/// Builder for [`EphemerisParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct EphemerisParamsBuilder {
    params: EphemerisParams,
}

impl EphemerisParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: EphemerisParams::default(),
        }
    }

    pub fn start_time(mut self, v: MJD) -> Self {
        self.params.start_time = v;
        self
    }
    pub fn kepler_tolerance(mut self, v: f64) -> Self {
        self.params.kepler_tolerance = v;
        self
    }
    pub fn kepler_max_iterations(mut self, v: usize) -> Self {
        self.params.kepler_max_iterations = v;
        self
    }
    pub fn path_points(mut self, v: usize) -> Self {
        self.params.path_points = v;
        self
    }
    pub fn unbound_path_radius(mut self, v: AstronomicalUnit) -> Self {
        self.params.unbound_path_radius = v;
        self
    }
    pub fn precession_cadence(mut self, v: PrecessionCadence) -> Self {
        self.params.precession_cadence = v;
        self
    }
    pub fn barycentric_pairs(mut self, v: Vec<BarycentricPair>) -> Self {
        self.params.barycentric_pairs = v;
        self
    }
    pub fn barycentric_pair(mut self, v: BarycentricPair) -> Self {
        self.params.barycentric_pairs.push(v);
        self
    }
    pub fn earth_name(mut self, v: &str) -> Self {
        self.params.earth_name = v.to_string();
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Return true iff 0.0 <= x < 1.0 and comparable.
    #[inline]
    fn unit_fraction(x: f64) -> bool {
        matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
            && x.partial_cmp(&1.0) == Some(Less)
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `start_time` is finite.
    /// * `kepler_tolerance > 0`, `kepler_max_iterations ≥ 1`.
    /// * `path_points ≥ 2`.
    /// * `unbound_path_radius > 0`.
    /// * every barycentric ratio lies in `[0, 1)` and names two distinct bodies.
    /// * `earth_name` is not empty.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(EphemerisParams)`, or [`OrreryError::InvalidParameter`] naming the first failed rule.
    pub fn build(self) -> Result<EphemerisParams, OrreryError> {
        let p = &self.params;

        if !p.start_time.is_finite() {
            return Err(OrreryError::InvalidParameter(
                "start_time must be finite".into(),
            ));
        }
        if !Self::gt0(p.kepler_tolerance) {
            return Err(OrreryError::InvalidParameter(
                "kepler_tolerance must be > 0".into(),
            ));
        }
        if p.kepler_max_iterations == 0 {
            return Err(OrreryError::InvalidParameter(
                "kepler_max_iterations must be >= 1".into(),
            ));
        }
        if p.path_points < 2 {
            return Err(OrreryError::InvalidParameter(
                "path_points must be >= 2".into(),
            ));
        }
        if !Self::gt0(p.unbound_path_radius) {
            return Err(OrreryError::InvalidParameter(
                "unbound_path_radius must be > 0".into(),
            ));
        }
        for pair in &p.barycentric_pairs {
            if !Self::unit_fraction(pair.ratio) {
                return Err(OrreryError::InvalidParameter(format!(
                    "barycentric ratio of {}/{} must lie in [0, 1)",
                    pair.primary, pair.secondary
                )));
            }
            if pair.primary == pair.secondary {
                return Err(OrreryError::InvalidParameter(format!(
                    "barycentric pair {} pairs a body with itself",
                    pair.primary
                )));
            }
        }
        if p.earth_name.trim().is_empty() {
            return Err(OrreryError::InvalidParameter(
                "earth_name must not be empty".into(),
            ));
        }

        Ok(self.params)
    }
}

#[cfg(test)]
mod params_test {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = EphemerisParams::default();
        assert_eq!(p.path_points, 360);
        assert_eq!(p.precession_cadence, PrecessionCadence::EveryTick);
        assert_eq!(p.barycentric_pairs.len(), 2);
        assert_eq!(p.barycentric_pairs[0].secondary, "Moon");
        assert_eq!(EphemerisParams::builder().build().unwrap(), p);
    }

    #[test]
    fn test_builder_overrides() {
        let p = EphemerisParams::builder()
            .start_time(60000.0)
            .path_points(90)
            .unbound_path_radius(10.0)
            .barycentric_pairs(vec![])
            .barycentric_pair(BarycentricPair::new("Mars", "Phobos", 1e-8))
            .earth_name("Terra")
            .build()
            .unwrap();
        assert_eq!(p.start_time, 60000.0);
        assert_eq!(p.path_points, 90);
        assert_eq!(p.barycentric_pairs.len(), 1);
        assert_eq!(p.earth_name, "Terra");
    }

    #[test]
    fn test_builder_validation() {
        let bad = [
            EphemerisParams::builder().kepler_tolerance(0.0),
            EphemerisParams::builder().kepler_tolerance(f64::NAN),
            EphemerisParams::builder().kepler_max_iterations(0),
            EphemerisParams::builder().path_points(1),
            EphemerisParams::builder().unbound_path_radius(-1.0),
            EphemerisParams::builder().start_time(f64::INFINITY),
            EphemerisParams::builder().barycentric_pair(BarycentricPair::new("A", "B", 1.5)),
            EphemerisParams::builder().barycentric_pair(BarycentricPair::new("A", "A", 0.1)),
            EphemerisParams::builder().earth_name("  "),
        ];
        for builder in bad {
            assert!(matches!(
                builder.build(),
                Err(OrreryError::InvalidParameter(_))
            ));
        }
    }
}
