//! Major planets: mean elements drifting at secular rates.

use tracing::trace;

use super::{
    bound_eccentricity, clamp_bound_eccentricity, ellipse_samples, positive_or, BodyCore,
    BodyRecord, OrbitPath, Orbiting, PathAnchor, PropagationContext,
};
use crate::constants::{Centuries, RADEG};
use crate::kepler::ellipse_point;
use crate::orbit_type::planetary_element::{AnomalyCorrection, PlanetaryElements, SecularRates};
use crate::orbit_type::{
    heliocentric_mean_motion, heliocentric_period, OrbitShape, MAX_BOUND_ECCENTRICITY,
};
use crate::ref_system::to_ecliptic;

#[derive(Debug, Clone, PartialEq)]
pub struct Planet {
    pub core: BodyCore,
    /// Live elements
    pub elements: PlanetaryElements,
    epoch_elements: PlanetaryElements,
    pub rates: SecularRates,
    pub correction: AnomalyCorrection,
    /// Live eccentricity kept on a bound orbit, used for placement and shape
    eccentricity: f64,
    eccentric_anomaly: f64,
}

impl Planet {
    /// Decode a planet record.
    ///
    /// Fields: `a` (AU), `e`, `inc`, `l` (mean longitude), `w` (longitude of
    /// perihelion), `omega`, the per-century rates `aDot`, `eDot`, `iDot`, `lDot`,
    /// `wDot`, `omegaDot`, and the anomaly terms `b`, `c`, `s`, `f`. Angles and angular
    /// rates are in degrees. Without `lDot` the mean longitude moves at the Keplerian
    /// mean motion of `a`.
    pub fn from_record(record: &BodyRecord) -> Self {
        let core = BodyCore::from_record(record);
        let a = positive_or(record, "a", 1.0, &core.name);
        let elements = PlanetaryElements {
            reference_epoch: core.epoch(),
            semi_major_axis: a,
            eccentricity: bound_eccentricity(record, &core.name),
            inclination: record.angle_or("inc", 0.0),
            mean_longitude: record.angle_or("l", 0.0),
            periapsis_longitude: record.angle_or("w", 0.0),
            ascending_node_longitude: record.angle_or("omega", 0.0),
        };
        let rates = SecularRates {
            semi_major_axis: record.number_or("aDot", 0.0),
            eccentricity: record.number_or("eDot", 0.0),
            inclination: record.angle_or("iDot", 0.0),
            mean_longitude: record
                .number("lDot")
                .map(|v| v * RADEG)
                .unwrap_or_else(|| heliocentric_mean_motion(a)),
            periapsis_longitude: record.angle_or("wDot", 0.0),
            ascending_node_longitude: record.angle_or("omegaDot", 0.0),
        };
        let correction = AnomalyCorrection {
            b: record.angle_or("b", 0.0),
            c: record.angle_or("c", 0.0),
            s: record.angle_or("s", 0.0),
            f: record.angle_or("f", 0.0),
        };

        let mut planet = Planet {
            core,
            eccentricity: elements.eccentricity,
            epoch_elements: elements.clone(),
            elements,
            rates,
            correction,
            eccentric_anomaly: 0.0,
        };
        planet.update_shape();
        planet
    }

    /// Elements as of the epoch.
    pub fn epoch_elements(&self) -> &PlanetaryElements {
        &self.epoch_elements
    }

    fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// The live element drifts freely; the placed orbit stays within the bound range.
    fn update_shape(&mut self) {
        let raw = self.elements.eccentricity;
        if raw.clamp(0.0, MAX_BOUND_ECCENTRICITY) != self.eccentricity {
            self.eccentricity = clamp_bound_eccentricity(raw, &self.core.name);
        }
        let a = self.elements.semi_major_axis;
        self.core.shape = OrbitShape::elliptic(a, self.eccentricity(), heliocentric_period(a));
    }

    fn place(&mut self, ctx: &PropagationContext) {
        let e = self.eccentricity();
        let m = self.elements.mean_anomaly(ctx.time, &self.correction);
        let solution = ctx.solver.solve_eccentric_anomaly(e, m);
        self.eccentric_anomaly = solution.anomaly;
        let plane = ellipse_point(solution.anomaly, e, self.elements.semi_major_axis);
        let relative = to_ecliptic(&self.elements.orientation(), &plane);
        self.core.state.solver_converged = solution.converged;
        self.core.place(plane, relative, nalgebra::Vector3::zeros());
    }
}

impl Orbiting for Planet {
    fn core(&self) -> &BodyCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BodyCore {
        &mut self.core
    }

    fn rebase(&mut self, ctx: &PropagationContext) {
        let offset = ctx.time - self.core.epoch_eph();
        self.elements = self.epoch_elements.propagated(&self.rates, offset);
        self.update_shape();
        self.core.rebase_rotation(ctx.time);
        self.place(ctx);
    }

    fn advance(&mut self, dt: Centuries, ctx: &PropagationContext) {
        self.elements.mean_longitude += self.rates.mean_longitude * dt;
        self.core.advance_rotation(dt);
        self.place(ctx);
    }

    fn recompute_path(&mut self, ctx: &PropagationContext) {
        let orientation = self.elements.orientation();
        let points = ellipse_samples(
            self.eccentric_anomaly,
            self.eccentricity(),
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

    fn precess(&mut self, dt: Centuries) {
        self.elements.precess(&self.rates, dt);
        self.update_shape();
        trace!(body = %self.core.name, dt, "precessed");
    }

    fn is_precessing(&self) -> bool {
        true
    }

    fn mean_motion(&self) -> f64 {
        self.rates.mean_longitude
    }
}
