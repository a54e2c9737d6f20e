//! # Orbiting bodies
//!
//! Every body drawn by the engine is one of four kinds, fixed at construction:
//!
//! | kind | elements | motion |
//! |------|----------|--------|
//! | [`Planet`] | mean elements + secular rates | precessing ellipse |
//! | [`Asteroid`] | fixed Keplerian elements | ellipse |
//! | [`Comet`] | perihelion-based elements | ellipse, parabola or hyperbola |
//! | [`Moon`] | Keplerian elements around a primary body | ellipse in a selectable frame |
//!
//! [`OrbitalBody`] is the closed sum of the four kinds. The shared part of every body,
//! identity, physical data, derived orbit shape and runtime state, lives in
//! [`BodyCore`]; the kind-specific propagation is exposed through the [`Orbiting`]
//! trait.
//!
//! ## Propagation API
//!
//! * [`Orbiting::rebase`] recomputes the live elements from the epoch snapshot at an
//!   absolute time (closed form) and places the body.
//! * [`Orbiting::advance`] moves the orbit phase by `rate · dt` and places the body.
//! * [`Orbiting::recompute_path`] samples the full orbit for drawing.
//! * [`Orbiting::precess`] applies the secular drift of precessing bodies.
//!
//! The current position always comes from an exact anomaly solve. Drawn paths are
//! sampled uniformly in eccentric anomaly, which traces the exact ellipse without a
//! solve per point.

pub mod asteroid;
pub mod comet;
pub mod moon;
pub mod planet;
pub mod record;

pub use asteroid::Asteroid;
pub use comet::Comet;
pub use moon::Moon;
pub use planet::Planet;
pub use record::BodyRecord;

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

use crate::constants::{
    Centuries, Kilometer, Radian, BULK_DENSITY, DPI, MJD, RECORD_MASS_UNIT, T2000,
};
use crate::kepler::{ellipse_point, KeplerSolver};
use crate::observables::photometry::cosine_phase_integral;
use crate::orbit_type::{OrbitShape, MAX_BOUND_ECCENTRICITY};
use crate::orrery_errors::OrreryError;
use crate::ref_system::PrimaryOrientation;
use crate::time::mjd_to_eph;

/// Kind tag selecting the variant built from a [`BodyRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Planet,
    Asteroid,
    Comet,
    Moon,
}

impl FromStr for BodyKind {
    type Err = OrreryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planet" => Ok(BodyKind::Planet),
            "asteroid" => Ok(BodyKind::Asteroid),
            "comet" => Ok(BodyKind::Comet),
            "moon" => Ok(BodyKind::Moon),
            other => Err(OrreryError::InvalidParameter(format!(
                "unknown body kind {other:?}"
            ))),
        }
    }
}

/// Rendering tier of a body, from the record `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// tag 0
    Planet,
    /// tags 1 and 2: dwarf planets, large asteroids and moons
    DwarfOrLargeBody,
    /// tag 3
    SmallSatellite,
    /// any other tag, the default
    SmallBody,
}

impl Classification {
    pub fn from_type_tag(tag: f64) -> Self {
        match tag as i64 {
            0 => Classification::Planet,
            1 | 2 => Classification::DwarfOrLargeBody,
            3 => Classification::SmallSatellite,
            _ => Classification::SmallBody,
        }
    }
}

/// Radius estimate (km) from the absolute magnitude, for a geometric albedo of 0.15.
pub fn estimate_radius(absolute_magnitude: f64) -> Kilometer {
    664.5 / 0.15f64.sqrt() * 10f64.powf(-0.2 * absolute_magnitude)
}

/// Mass estimate (kg) of a homogeneous sphere of the default bulk density.
pub fn estimate_mass(radius: Kilometer) -> f64 {
    let r = radius * 1000.0;
    4.0 / 3.0 * std::f64::consts::PI * r.powi(3) * BULK_DENSITY
}

/// Physical data of a body.
///
/// Units
/// -----
/// * `radius`: km
/// * `mass`: kg
/// * `axis_ra`, `axis_dec`: radians, direction of the rotation pole
/// * `rotation_rate`: radians per century
/// * `rotation_phase`: radians, at the epoch
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalProperties {
    pub radius: Kilometer,
    pub mass: f64,
    pub absolute_magnitude: f64,
    pub axis_ra: Radian,
    pub axis_dec: Radian,
    pub rotation_rate: f64,
    pub rotation_phase: Radian,
}

impl PhysicalProperties {
    fn from_record(record: &BodyRecord) -> Self {
        let absolute_magnitude = record.number_or("H", 10.0);
        let radius = record
            .number("radius")
            .filter(|r| *r > 0.0)
            .unwrap_or_else(|| estimate_radius(absolute_magnitude));
        let mass = record
            .number("mass")
            .map(|m| m * RECORD_MASS_UNIT)
            .unwrap_or_else(|| estimate_mass(radius));
        PhysicalProperties {
            radius,
            mass,
            absolute_magnitude,
            axis_ra: record.angle_or("axisRA", 0.0),
            axis_dec: record.angle_or("axisDec", 90.0),
            rotation_rate: record.angle_or("thetaDot", 0.0),
            rotation_phase: record.angle_or("phase", 0.0),
        }
    }

    pub fn orientation(&self) -> PrimaryOrientation {
        PrimaryOrientation {
            axis_ra: self.axis_ra,
            axis_dec: self.axis_dec,
        }
    }
}

/// Display fields, carried through untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplayInfo {
    pub texture: Option<String>,
    pub ring_radius: Option<f64>,
    pub ring_texture: Option<String>,
}

/// What the points of an [`OrbitPath`] are relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathAnchor {
    Sun,
    /// index of the primary body
    Primary(usize),
}

/// Sampled orbit, in the celestial frame, relative to its anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitPath {
    pub points: Vec<Vector3<f64>>,
    /// `true` for a closed loop (bound orbit), `false` for an open arc
    pub closed: bool,
    pub anchor: PathAnchor,
}

/// Runtime state, rebuilt on every placement.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    /// Inertial position (AU)
    pub position: Vector3<f64>,
    /// Position relative to the body orbited (the Sun or the primary)
    pub relative_position: Vector3<f64>,
    /// Current orbital-plane point
    pub plane_point: Vector2<f64>,
    /// Barycentric correction added to the displayed position
    pub display_offset: Vector3<f64>,
    pub distance_to_sun: f64,
    pub vector_to_earth: Vector3<f64>,
    pub distance_to_earth: f64,
    pub rotation_phase: Radian,
    /// `false` when the last anomaly solve ran out of iterations
    pub solver_converged: bool,
    pub path: Option<OrbitPath>,
}

impl Default for BodyState {
    fn default() -> Self {
        BodyState {
            position: Vector3::zeros(),
            relative_position: Vector3::zeros(),
            plane_point: Vector2::zeros(),
            display_offset: Vector3::zeros(),
            distance_to_sun: 0.0,
            vector_to_earth: Vector3::zeros(),
            distance_to_earth: 0.0,
            rotation_phase: 0.0,
            solver_converged: true,
            path: None,
        }
    }
}

/// Part of a body shared by all kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyCore {
    pub name: String,
    pub designation: Option<String>,
    pub classification: Classification,
    /// Epoch of the osculating elements (MJD); never changes after construction
    epoch: MJD,
    pub physical: PhysicalProperties,
    pub display: DisplayInfo,
    pub shape: OrbitShape,
    pub state: BodyState,
}

impl BodyCore {
    fn from_record(record: &BodyRecord) -> Self {
        BodyCore {
            name: record.text_or("name", "Unnamed"),
            designation: record.text("designation"),
            classification: Classification::from_type_tag(record.number_or("type", 4.0)),
            epoch: record.number_or("epoch", T2000),
            physical: PhysicalProperties::from_record(record),
            display: DisplayInfo {
                texture: record.text("texture"),
                ring_radius: record.number("ringRadius").filter(|r| *r > 0.0),
                ring_texture: record.text("ringTexture"),
            },
            shape: OrbitShape::unbound(0.0),
            state: BodyState::default(),
        }
    }

    pub fn epoch(&self) -> MJD {
        self.epoch
    }

    /// Epoch as ephemeris time.
    pub fn epoch_eph(&self) -> Centuries {
        mjd_to_eph(self.epoch)
    }

    /// Raw position plus the barycentric display offset.
    pub fn displayed_position(&self) -> Vector3<f64> {
        self.state.position + self.state.display_offset
    }

    fn rebase_rotation(&mut self, t: Centuries) {
        self.state.rotation_phase =
            self.physical.rotation_phase + self.physical.rotation_rate * (t - self.epoch_eph());
    }

    fn advance_rotation(&mut self, dt: Centuries) {
        self.state.rotation_phase += self.physical.rotation_rate * dt;
    }

    fn place(&mut self, plane_point: Vector2<f64>, relative: Vector3<f64>, origin: Vector3<f64>) {
        self.state.plane_point = plane_point;
        self.state.relative_position = relative;
        self.state.position = origin + relative;
    }
}

/// Position and orientation of a moon's primary, as of the current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimaryFrame {
    pub position: Vector3<f64>,
    pub orientation: PrimaryOrientation,
}

/// Inputs of one propagation step.
#[derive(Debug, Clone, Copy)]
pub struct PropagationContext<'a> {
    /// Ephemeris time the body is placed at
    pub time: Centuries,
    pub solver: &'a KeplerSolver,
    /// Current frame of the primary, for moons
    pub primary: Option<PrimaryFrame>,
    /// Number of samples of a regenerated path
    pub path_points: usize,
    /// Heliocentric distance (AU) where the arc of an unbound orbit stops
    pub unbound_path_radius: f64,
}

/// Kind-specific propagation of a body.
pub trait Orbiting {
    fn core(&self) -> &BodyCore;

    fn core_mut(&mut self) -> &mut BodyCore;

    /// Recompute the live elements from the epoch snapshot at `ctx.time` and place the body.
    fn rebase(&mut self, ctx: &PropagationContext);

    /// Advance the orbit phase by `dt` centuries and place the body at `ctx.time`.
    fn advance(&mut self, dt: Centuries, ctx: &PropagationContext);

    /// Regenerate the drawn orbit from the live elements.
    fn recompute_path(&mut self, ctx: &PropagationContext);

    /// Secular drift of the elements over `dt`; a no-op for non-precessing bodies.
    fn precess(&mut self, _dt: Centuries) {}

    fn is_precessing(&self) -> bool {
        false
    }

    /// Rate of the orbit phase, radians per century.
    fn mean_motion(&self) -> f64;

    /// Fraction of the full-phase brightness reflected at phase angle `alpha`.
    fn phase_integral(&self, alpha: Radian) -> f64 {
        cosine_phase_integral(alpha)
    }

    /// `1/a` of the live orbit (AU⁻¹): zero for a parabola, negative for a hyperbola.
    fn inverse_semi_major_axis(&self) -> f64 {
        self.core()
            .shape
            .semi_major_axis
            .finite()
            .filter(|a| *a > 0.0)
            .map_or(0.0, |a| 1.0 / a)
    }
}

/// Sampled ellipse starting at the current eccentric anomaly.
pub(crate) fn ellipse_samples(
    ecc_anomaly: f64,
    e: f64,
    a: f64,
    points: usize,
) -> Vec<Vector2<f64>> {
    let points = points.max(1);
    let step = DPI / points as f64;
    (0..points)
        .map(|k| ellipse_point(ecc_anomaly + step * k as f64, e, a))
        .collect()
}

/// Eccentricity of a body that must stay on a bound orbit.
pub(crate) fn bound_eccentricity(record: &BodyRecord, name: &str) -> f64 {
    clamp_bound_eccentricity(record.number_or("e", 0.0), name)
}

/// `e` clamped to `[0, MAX_BOUND_ECCENTRICITY]`, with a warning when it was outside.
pub(crate) fn clamp_bound_eccentricity(e: f64, name: &str) -> f64 {
    if (0.0..=MAX_BOUND_ECCENTRICITY).contains(&e) {
        return e;
    }
    let clamped = e.clamp(0.0, MAX_BOUND_ECCENTRICITY);
    warn!(body = name, e, clamped, "eccentricity out of the bound range");
    clamped
}

/// Strictly positive numeric field, or its default.
pub(crate) fn positive_or(record: &BodyRecord, key: &str, default: f64, name: &str) -> f64 {
    match record.number(key) {
        Some(v) if v > 0.0 => v,
        Some(v) => {
            warn!(body = name, field = key, value = v, "non-positive value, using default");
            default
        }
        None => default,
    }
}

/// A body of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum OrbitalBody {
    Planet(Planet),
    Asteroid(Asteroid),
    Comet(Comet),
    Moon(Moon),
}

impl OrbitalBody {
    /// Build a body of the given kind from its raw record.
    ///
    /// Never fails: defective fields fall back to their defaults. A moon's primary is
    /// only resolved later, when the body joins an [`Ephemeris`](crate::ephemeris::Ephemeris).
    pub fn from_record(kind: BodyKind, record: &BodyRecord) -> Self {
        match kind {
            BodyKind::Planet => OrbitalBody::Planet(Planet::from_record(record)),
            BodyKind::Asteroid => OrbitalBody::Asteroid(Asteroid::from_record(record)),
            BodyKind::Comet => OrbitalBody::Comet(Comet::from_record(record)),
            BodyKind::Moon => OrbitalBody::Moon(Moon::from_record(record)),
        }
    }

    pub fn kind(&self) -> BodyKind {
        match self {
            OrbitalBody::Planet(_) => BodyKind::Planet,
            OrbitalBody::Asteroid(_) => BodyKind::Asteroid,
            OrbitalBody::Comet(_) => BodyKind::Comet,
            OrbitalBody::Moon(_) => BodyKind::Moon,
        }
    }

    fn inner(&self) -> &dyn Orbiting {
        match self {
            OrbitalBody::Planet(b) => b,
            OrbitalBody::Asteroid(b) => b,
            OrbitalBody::Comet(b) => b,
            OrbitalBody::Moon(b) => b,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Orbiting {
        match self {
            OrbitalBody::Planet(b) => b,
            OrbitalBody::Asteroid(b) => b,
            OrbitalBody::Comet(b) => b,
            OrbitalBody::Moon(b) => b,
        }
    }

    pub fn name(&self) -> &str {
        &self.core().name
    }

    pub fn as_moon(&self) -> Option<&Moon> {
        match self {
            OrbitalBody::Moon(m) => Some(m),
            _ => None,
        }
    }

    pub(crate) fn as_moon_mut(&mut self) -> Option<&mut Moon> {
        match self {
            OrbitalBody::Moon(m) => Some(m),
            _ => None,
        }
    }

    /// Index of the primary, for a linked moon.
    pub fn primary_index(&self) -> Option<usize> {
        self.as_moon().and_then(Moon::primary_index)
    }
}

impl Orbiting for OrbitalBody {
    fn core(&self) -> &BodyCore {
        self.inner().core()
    }

    fn core_mut(&mut self) -> &mut BodyCore {
        self.inner_mut().core_mut()
    }

    fn rebase(&mut self, ctx: &PropagationContext) {
        self.inner_mut().rebase(ctx)
    }

    fn advance(&mut self, dt: Centuries, ctx: &PropagationContext) {
        self.inner_mut().advance(dt, ctx)
    }

    fn recompute_path(&mut self, ctx: &PropagationContext) {
        self.inner_mut().recompute_path(ctx)
    }

    fn precess(&mut self, dt: Centuries) {
        self.inner_mut().precess(dt)
    }

    fn is_precessing(&self) -> bool {
        self.inner().is_precessing()
    }

    fn mean_motion(&self) -> f64 {
        self.inner().mean_motion()
    }

    fn phase_integral(&self, alpha: Radian) -> f64 {
        self.inner().phase_integral(alpha)
    }

    fn inverse_semi_major_axis(&self) -> f64 {
        self.inner().inverse_semi_major_axis()
    }
}
