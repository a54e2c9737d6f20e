//! Asteroids: fixed Keplerian elements, mean anomaly advancing at the Keplerian rate.

use super::{
    bound_eccentricity, ellipse_samples, positive_or, BodyCore, BodyRecord, OrbitPath, Orbiting,
    PathAnchor, PropagationContext,
};
use crate::constants::{Centuries, Radian};
use crate::observables::photometry::hg_phase_integral;
use crate::orbit_type::keplerian_element::KeplerianElements;
use crate::orbit_type::{heliocentric_mean_motion, heliocentric_period};
use crate::ref_system::to_ecliptic;

/// Default IAU slope parameter
pub const DEFAULT_SLOPE: f64 = 0.15;

#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    pub core: BodyCore,
    pub elements: KeplerianElements,
    epoch_elements: KeplerianElements,
    pub catalog_number: Option<u32>,
    /// IAU H-G slope parameter
    pub slope: f64,
    mean_motion: f64,
    eccentric_anomaly: f64,
}

impl Asteroid {
    /// Decode an asteroid record: `a` (AU), `e`, `inc`, `w` (argument of perihelion),
    /// `omega`, `m` (mean anomaly at epoch), `num` (catalog number), `G` (slope).
    pub fn from_record(record: &BodyRecord) -> Self {
        let mut core = BodyCore::from_record(record);
        let catalog_number = record
            .number("num")
            .filter(|n| *n > 0.0)
            .map(|n| n as u32);
        if core.designation.is_none() {
            core.designation = catalog_number.map(|n| n.to_string());
        }

        let a = positive_or(record, "a", 1.0, &core.name);
        let elements = KeplerianElements {
            reference_epoch: core.epoch(),
            semi_major_axis: a,
            eccentricity: bound_eccentricity(record, &core.name),
            inclination: record.angle_or("inc", 0.0),
            ascending_node_longitude: record.angle_or("omega", 0.0),
            periapsis_argument: record.angle_or("w", 0.0),
            mean_anomaly: record.angle_or("m", 0.0),
        };
        core.shape = elements.shape(heliocentric_period(a));

        Asteroid {
            core,
            epoch_elements: elements.clone(),
            elements,
            catalog_number,
            slope: record.number_or("G", DEFAULT_SLOPE),
            mean_motion: heliocentric_mean_motion(a),
            eccentric_anomaly: 0.0,
        }
    }

    /// Name prefixed with the catalog number, e.g. `1 Ceres`.
    pub fn display_name(&self) -> String {
        match self.catalog_number {
            Some(n) => format!("{n} {}", self.core.name),
            None => self.core.name.clone(),
        }
    }

    pub fn epoch_elements(&self) -> &KeplerianElements {
        &self.epoch_elements
    }

    fn place(&mut self, ctx: &PropagationContext) {
        let (plane, ecc, converged) = self.elements.plane_point(ctx.solver);
        self.eccentric_anomaly = ecc;
        let relative = to_ecliptic(&self.elements.orientation(), &plane);
        self.core.state.solver_converged = converged;
        self.core.place(plane, relative, nalgebra::Vector3::zeros());
    }
}

impl Orbiting for Asteroid {
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

    fn recompute_path(&mut self, ctx: &PropagationContext) {
        let orientation = self.elements.orientation();
        let points = ellipse_samples(
            self.eccentric_anomaly,
            self.elements.bound_eccentricity(),
            self.elements.semi_major_axis,
            ctx.path_points,
        )
        .iter()
        .map(|p| to_ecliptic(&orientation, p))
        .collect();
        self.core.state.path = Some(OrbitPath {
            points,
            closed: true,
            anchor: PathAnchor::Sun,
        });
    }

    fn mean_motion(&self) -> f64 {
        self.mean_motion
    }

    fn phase_integral(&self, alpha: Radian) -> f64 {
        hg_phase_integral(alpha, self.slope)
    }
}
