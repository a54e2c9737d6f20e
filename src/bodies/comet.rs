//! Comets: perihelion-based elements, phase fixed by the time of perihelion passage.
//!
//! Bound comets move on ellipses like asteroids. Orbits with `e ≥ 1` are kept as
//! parabolas or hyperbolas: their shape reports unbound markers, and their drawn
//! path is an open arc clipped at a configurable heliocentric distance.

use nalgebra::Vector2;
use tracing::{debug, warn};

use super::asteroid::DEFAULT_SLOPE;
use super::{
    ellipse_samples, positive_or, BodyCore, BodyRecord, OrbitPath, Orbiting, PathAnchor,
    PropagationContext,
};
use crate::constants::{Centuries, Radian, T2000};
use crate::kepler::{hyperbola_point, parabola_point};
use crate::observables::photometry::hg_phase_integral;
use crate::orbit_type::cometary_element::{CometaryElements, Conic};
use crate::ref_system::to_ecliptic;
use crate::time::date_code_to_mjd;

#[derive(Debug, Clone, PartialEq)]
pub struct Comet {
    pub core: BodyCore,
    pub elements: CometaryElements,
    /// Current value of the anomaly variable of the conic
    pub anomaly: f64,
    pub slope: f64,
    eccentric_anomaly: f64,
}

impl Comet {
    /// Decode a comet record: `q` (AU), `e`, `inc`, `w` (longitude of perihelion),
    /// `omega`, `Tp` (`YYYYMMDD.dddd`), `G`.
    ///
    /// A missing or malformed `Tp` falls back to 2000-01-01T00:00 UTC.
    pub fn from_record(record: &BodyRecord) -> Self {
        let mut core = BodyCore::from_record(record);
        let perihelion_time = match record.get("Tp").map(date_code_to_mjd) {
            Some(Ok(mjd)) => mjd,
            Some(Err(err)) => {
                warn!(body = %core.name, %err, "bad perihelion date, using 2000-01-01");
                T2000 - 0.5
            }
            None => T2000 - 0.5,
        };
        let mut eccentricity = record.number_or("e", 0.0);
        if eccentricity < 0.0 {
            warn!(body = %core.name, eccentricity, "negative eccentricity, using 0");
            eccentricity = 0.0;
        }

        let elements = CometaryElements {
            perihelion_time,
            perihelion_distance: positive_or(record, "q", 1.0, &core.name),
            eccentricity,
            inclination: record.angle_or("inc", 0.0),
            ascending_node_longitude: record.angle_or("omega", 0.0),
            periapsis_longitude: record.angle_or("w", 0.0),
        };
        core.shape = elements.shape();
        if !elements.is_bound() {
            debug!(body = %core.name, e = eccentricity, "unbound comet orbit");
        }

        Comet {
            core,
            elements,
            anomaly: 0.0,
            slope: record.number_or("G", DEFAULT_SLOPE),
            eccentric_anomaly: 0.0,
        }
    }

    fn place(&mut self, ctx: &PropagationContext) {
        let (plane, converged) = self.elements.plane_point(self.anomaly, ctx.solver);
        if let Conic::Ellipse { semi_major_axis } = self.elements.conic() {
            // recover E from the plane point for the path sampler
            let e = self.elements.eccentricity;
            self.eccentric_anomaly = (plane.y / (semi_major_axis * (1.0 - e * e).sqrt()))
                .atan2(plane.x / semi_major_axis + e);
        }
        let relative = to_ecliptic(&self.elements.orientation(), &plane);
        self.core.state.solver_converged = converged;
        self.core.place(plane, relative, nalgebra::Vector3::zeros());
    }

    /// Open arc of an unbound orbit, from inbound to outbound crossing of `radius`.
    fn unbound_arc(&self, radius: f64, points: usize) -> Vec<Vector2<f64>> {
        let q = self.elements.perihelion_distance;
        let e = self.elements.eccentricity;
        let points = points.max(2);
        let radius = radius.max(q);
        let sample = |k: usize, limit: f64| -limit + 2.0 * limit * k as f64 / (points - 1) as f64;
        match self.elements.conic() {
            Conic::Hyperbola {
                semi_major_axis_abs,
            } => {
                // r = |a|(e cosh H − 1)
                let limit = ((radius / semi_major_axis_abs + 1.0) / e).max(1.0).acosh();
                (0..points)
                    .map(|k| hyperbola_point(sample(k, limit), e, semi_major_axis_abs))
                    .collect()
            }
            // r = q(1 + D²)
            _ => {
                let limit = (radius / q - 1.0).max(0.0).sqrt();
                (0..points)
                    .map(|k| parabola_point(sample(k, limit), q))
                    .collect()
            }
        }
    }
}

impl Orbiting for Comet {
    fn core(&self) -> &BodyCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BodyCore {
        &mut self.core
    }

    fn rebase(&mut self, ctx: &PropagationContext) {
        self.anomaly = self.elements.anomaly_at(ctx.time);
        self.core.rebase_rotation(ctx.time);
        self.place(ctx);
    }

    fn advance(&mut self, dt: Centuries, ctx: &PropagationContext) {
        self.anomaly += self.elements.anomaly_rate() * dt;
        self.core.advance_rotation(dt);
        self.place(ctx);
    }

    fn recompute_path(&mut self, ctx: &PropagationContext) {
        let (plane_points, closed) = match self.elements.conic() {
            Conic::Ellipse { semi_major_axis } => (
                ellipse_samples(
                    self.eccentric_anomaly,
                    self.elements.eccentricity,
                    semi_major_axis,
                    ctx.path_points,
                ),
                true,
            ),
            _ => (
                self.unbound_arc(ctx.unbound_path_radius, ctx.path_points),
                false,
            ),
        };
        let orientation = self.elements.orientation();
        self.core.state.path = Some(OrbitPath {
            points: plane_points
                .iter()
                .map(|p| to_ecliptic(&orientation, p))
                .collect(),
            closed,
            anchor: PathAnchor::Sun,
        });
    }

    fn mean_motion(&self) -> f64 {
        self.elements.anomaly_rate()
    }

    fn phase_integral(&self, alpha: Radian) -> f64 {
        hg_phase_integral(alpha, self.slope)
    }

    fn inverse_semi_major_axis(&self) -> f64 {
        match self.elements.conic() {
            Conic::Ellipse { semi_major_axis } => 1.0 / semi_major_axis,
            Conic::Parabola => 0.0,
            Conic::Hyperbola {
                semi_major_axis_abs,
            } => -1.0 / semi_major_axis_abs,
        }
    }
}

#[cfg(test)]
mod comet_test {
    use super::*;
    use crate::kepler::KeplerSolver;
    use crate::time::mjd_to_eph;
    use approx::assert_relative_eq;

    fn ctx(solver: &KeplerSolver, time: Centuries) -> PropagationContext<'_> {
        PropagationContext {
            time,
            solver,
            primary: None,
            path_points: 101,
            unbound_path_radius: 20.0,
        }
    }

    fn halley() -> BodyRecord {
        BodyRecord::new()
            .with("name", "Halley")
            .with("q", "0.5860")
            .with("e", "0.9671")
            .with("inc", "162.26")
            .with("w", "169.75")
            .with("omega", "58.42")
            .with("Tp", "19860209.4589")
            .with("H", "5.5")
    }

    #[test]
    fn test_halley_at_perihelion() {
        let solver = KeplerSolver::default();
        let mut halley = Comet::from_record(&halley());
        let tp = mjd_to_eph(46470.4589);
        halley.rebase(&ctx(&solver, tp));
        assert_relative_eq!(halley.core.state.position.norm(), 0.586, epsilon = 1e-9);
        assert!(halley.core.shape.period.value() > 0.7 && halley.core.shape.period.value() < 0.8);
    }

    #[test]
    fn test_bound_path_is_closed() {
        let solver = KeplerSolver::default();
        let mut halley = Comet::from_record(&halley());
        let c = ctx(&solver, 0.1);
        halley.rebase(&c);
        halley.recompute_path(&c);
        let path = halley.core.state.path.as_ref().unwrap();
        assert!(path.closed);
        assert_relative_eq!(path.points[0], halley.core.state.position, epsilon = 1e-9);
    }

    #[test]
    fn test_hyperbolic_comet() {
        let rec = BodyRecord::new()
            .with("name", "Interstellar")
            .with("q", "1.2")
            .with("e", "1.2")
            .with("Tp", "20171001.0");
        let solver = KeplerSolver::default();
        let mut comet = Comet::from_record(&rec);
        assert!(comet.core.shape.semi_major_axis.is_unbound());
        assert!(comet.core.shape.apoapsis.is_unbound());
        assert!(comet.core.shape.period.is_unbound());
        assert!(comet.inverse_semi_major_axis() < 0.0);

        let c = ctx(&solver, mjd_to_eph(58100.0));
        comet.rebase(&c);
        let r = comet.core.state.position.norm();
        assert!(r.is_finite() && r > 1.2);

        comet.recompute_path(&c);
        let path = comet.core.state.path.as_ref().unwrap();
        assert!(!path.closed);
        assert_eq!(path.points.len(), 101);
        assert_relative_eq!(path.points[0].norm(), 20.0, epsilon = 1e-9);
        assert_relative_eq!(path.points[100].norm(), 20.0, epsilon = 1e-9);
        assert_relative_eq!(path.points[50].norm(), 1.2, epsilon = 1e-9);
    }

    #[test]
    fn test_parabolic_comet_arc() {
        let rec = BodyRecord::new().with("q", "0.5").with("e", "1");
        let solver = KeplerSolver::default();
        let mut comet = Comet::from_record(&rec);
        assert_eq!(comet.inverse_semi_major_axis(), 0.0);
        let c = ctx(&solver, 0.0);
        comet.rebase(&c);
        comet.recompute_path(&c);
        let path = comet.core.state.path.as_ref().unwrap();
        assert_relative_eq!(path.points[0].norm(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bad_perihelion_date_falls_back() {
        let rec = BodyRecord::new().with("Tp", "yesterday");
        let comet = Comet::from_record(&rec);
        assert_eq!(comet.elements.perihelion_time, 51544.0);
    }
}
