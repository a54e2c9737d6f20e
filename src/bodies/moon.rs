//! Natural satellites.
//!
//! A moon orbits a primary body of the same collection, referenced by index once the
//! collection is assembled. Its orbit is expressed in one of the frames of
//! [`OrbitFrame`] and translated by the primary's current position.

use nalgebra::Vector3;
use tracing::warn;

use super::{
    bound_eccentricity, ellipse_samples, positive_or, BodyCore, BodyRecord, OrbitPath, Orbiting,
    PathAnchor, PrimaryFrame, PropagationContext,
};
use crate::constants::{
    Centuries, Radian, AU, DAYS_PER_CENTURY, DPI, GRAVITATIONAL_CONSTANT, RADEG, SECONDS_PER_DAY,
};
use crate::orbit_type::keplerian_element::KeplerianElements;
use crate::orbit_type::Extent;
use crate::ref_system::{to_body_relative, OrbitFrame, PrimaryOrientation};

/// Where the mean motion of a moon comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionSource {
    /// `lDot`, degrees per century
    LongitudeRate,
    /// `P`, sidereal period in days
    Period,
    /// Kepler's third law with the primary's mass, resolved when linked
    PrimaryMass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Moon {
    pub core: BodyCore,
    /// Live elements, semi-major axis in AU
    pub elements: KeplerianElements,
    epoch_elements: KeplerianElements,
    mean_motion: f64,
    pub motion_source: MotionSource,
    pub frame: OrbitFrame,
    /// Orbit pole of the [`OrbitFrame::LocalLagrangian`] frame
    pub orbit_ra: Radian,
    pub orbit_dec: Radian,
    pub primary_name: String,
    primary: Option<usize>,
    eccentric_anomaly: f64,
}

impl Moon {
    /// Decode a moon record: `orbiting` (primary name), `orbitRef` (`E`, `L` or `Q`),
    /// `orbitRA`/`orbitDec` (degrees), `a` (km), `e`, `inc`, `w` (argument of
    /// periapsis), `omega`, `m`, and either `lDot` (degrees per century) or `P` (days).
    pub fn from_record(record: &BodyRecord) -> Self {
        let mut core = BodyCore::from_record(record);
        let frame = match record.get("orbitRef").map(str::parse::<OrbitFrame>) {
            Some(Ok(frame)) => frame,
            Some(Err(err)) => {
                warn!(body = %core.name, %err, "using the ecliptic frame");
                OrbitFrame::Ecliptic
            }
            None => OrbitFrame::Ecliptic,
        };

        let a = positive_or(record, "a", 1.0, &core.name) / AU;
        let elements = KeplerianElements {
            reference_epoch: core.epoch(),
            semi_major_axis: a,
            eccentricity: bound_eccentricity(record, &core.name),
            inclination: record.angle_or("inc", 0.0),
            ascending_node_longitude: record.angle_or("omega", 0.0),
            periapsis_argument: record.angle_or("w", 0.0),
            mean_anomaly: record.angle_or("m", 0.0),
        };

        let (mean_motion, motion_source) = if let Some(rate) = record.number("lDot") {
            (rate * RADEG, MotionSource::LongitudeRate)
        } else if let Some(days) = record.number("P").filter(|p| *p != 0.0) {
            (DPI / (days / DAYS_PER_CENTURY), MotionSource::Period)
        } else {
            (0.0, MotionSource::PrimaryMass)
        };

        core.shape = elements.shape(period_of(mean_motion).value());
        let mut moon = Moon {
            core,
            epoch_elements: elements.clone(),
            elements,
            mean_motion,
            motion_source,
            frame,
            orbit_ra: record.angle_or("orbitRA", 0.0),
            orbit_dec: record.angle_or("orbitDec", 90.0),
            primary_name: record.text_or("orbiting", ""),
            primary: None,
            eccentric_anomaly: 0.0,
        };
        moon.update_period();
        moon
    }

    /// Index of the primary in its collection, once linked.
    pub fn primary_index(&self) -> Option<usize> {
        self.primary
    }

    pub fn epoch_elements(&self) -> &KeplerianElements {
        &self.epoch_elements
    }

    /// Attach the moon to its primary. Completes the mean motion from the primary's
    /// mass (kg) when the record gave neither a rate nor a period.
    pub(crate) fn link_primary(&mut self, index: usize, primary_mass: f64) {
        self.primary = Some(index);
        if self.motion_source == MotionSource::PrimaryMass {
            let a_m = self.elements.semi_major_axis * AU * 1000.0;
            let per_second = (GRAVITATIONAL_CONSTANT * primary_mass / a_m.powi(3)).sqrt();
            self.mean_motion = per_second * SECONDS_PER_DAY * DAYS_PER_CENTURY;
            if self.mean_motion == 0.0 {
                warn!(body = %self.core.name, "primary has no mass, moon will not move");
            }
            self.update_period();
        }
    }

    fn update_period(&mut self) {
        self.core.shape.period = period_of(self.mean_motion);
    }

    fn place(&mut self, ctx: &PropagationContext) {
        let (plane, ecc, converged) = self.elements.plane_point(ctx.solver);
        self.eccentric_anomaly = ecc;
        let frame = self.primary_frame(ctx);
        let relative = to_body_relative(
            &self.elements.orientation(),
            self.orbit_ra,
            self.orbit_dec,
            &plane,
            self.frame,
            &frame.orientation,
        );
        self.core.state.solver_converged = converged;
        self.core.place(plane, relative, frame.position);
    }

    fn primary_frame(&self, ctx: &PropagationContext) -> PrimaryFrame {
        ctx.primary.unwrap_or(PrimaryFrame {
            position: Vector3::zeros(),
            orientation: PrimaryOrientation::default(),
        })
    }
}

fn period_of(mean_motion: f64) -> Extent {
    if mean_motion != 0.0 {
        Extent::Finite(DPI / mean_motion.abs())
    } else {
        Extent::Unbound
    }
}

impl Orbiting for Moon {
    fn core(&self) -> &BodyCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BodyCore {
        &mut self.core
    }

    fn rebase(&mut self, ctx: &PropagationContext) {
        let offset = ctx.time - self.core.epoch_eph();
        self.elements = self.epoch_elements.propagated(self.mean_motion, offset);
        self.core.rebase_rotation(ctx.time);
        self.place(ctx);
    }

    fn advance(&mut self, dt: Centuries, ctx: &PropagationContext) {
        self.elements.mean_anomaly += self.mean_motion * dt;
        self.core.advance_rotation(dt);
        self.place(ctx);
    }

    /// Path points are relative to the primary; see [`PathAnchor::Primary`].
    fn recompute_path(&mut self, ctx: &PropagationContext) {
        let frame = self.primary_frame(ctx);
        let orientation = self.elements.orientation();
        let points = ellipse_samples(
            self.eccentric_anomaly,
            self.elements.bound_eccentricity(),
            self.elements.semi_major_axis,
            ctx.path_points,
        )
        .iter()
        .map(|p| {
            to_body_relative(
                &orientation,
                self.orbit_ra,
                self.orbit_dec,
                p,
                self.frame,
                &frame.orientation,
            )
        })
        .collect();
        self.core.state.path = Some(OrbitPath {
            points,
            closed: true,
            anchor: self.primary.map_or(PathAnchor::Sun, PathAnchor::Primary),
        });
    }

    fn mean_motion(&self) -> f64 {
        self.mean_motion
    }
}

#[cfg(test)]
mod moon_test {
    use super::*;
    use crate::kepler::KeplerSolver;
    use approx::assert_relative_eq;

    fn luna() -> BodyRecord {
        BodyRecord::new()
            .with("name", "Moon")
            .with("orbiting", "Earth")
            .with("a", "384400")
            .with("e", "0.0554")
            .with("inc", "5.16")
            .with("w", "318.15")
            .with("omega", "125.08")
            .with("m", "135.27")
            .with("P", "27.322")
    }

    #[test]
    fn test_decoding() {
        let moon = Moon::from_record(&luna());
        assert_eq!(moon.primary_name, "Earth");
        assert_eq!(moon.primary_index(), None);
        assert_eq!(moon.frame, OrbitFrame::Ecliptic);
        assert_eq!(moon.motion_source, MotionSource::Period);
        assert_relative_eq!(moon.elements.semi_major_axis, 384400.0 / AU);
        assert_relative_eq!(
            moon.core.shape.period.value(),
            27.322 / DAYS_PER_CENTURY,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_position_follows_primary() {
        let solver = KeplerSolver::default();
        let mut moon = Moon::from_record(&luna());
        moon.link_primary(2, 5.97e24);
        let earth = Vector3::new(-0.17, 0.89, 0.39);
        let ctx = PropagationContext {
            time: 0.0,
            solver: &solver,
            primary: Some(PrimaryFrame {
                position: earth,
                orientation: PrimaryOrientation::default(),
            }),
            path_points: 12,
            unbound_path_radius: 50.0,
        };
        moon.rebase(&ctx);
        let rel = moon.core.state.position - earth;
        assert_relative_eq!(rel, moon.core.state.relative_position, epsilon = 1e-15);
        let r_km = rel.norm() * AU;
        assert!(r_km > 363_000.0 && r_km < 406_000.0, "r = {r_km}");

        moon.recompute_path(&ctx);
        let path = moon.core.state.path.as_ref().unwrap();
        assert_eq!(path.anchor, PathAnchor::Primary(2));
        assert_relative_eq!(path.points[0], rel, epsilon = 1e-15);
    }

    #[test]
    fn test_kepler_third_law_fallback() {
        let rec = BodyRecord::new()
            .with("name", "Phobos")
            .with("orbiting", "Mars")
            .with("a", "9376");
        let mut moon = Moon::from_record(&rec);
        assert_eq!(moon.motion_source, MotionSource::PrimaryMass);
        assert!(moon.core.shape.period.is_unbound());

        moon.link_primary(0, 6.4171e23);
        let period_days = moon.core.shape.period.value() * DAYS_PER_CENTURY;
        assert_relative_eq!(period_days, 0.3189, epsilon = 1e-3);
    }

    #[test]
    fn test_bad_frame_selector() {
        let moon = Moon::from_record(&luna().with("orbitRef", "Z"));
        assert_eq!(moon.frame, OrbitFrame::Ecliptic);
        let moon = Moon::from_record(&luna().with("orbitRef", "Q"));
        assert_eq!(moon.frame, OrbitFrame::PlanetEquatorial);
    }
}
