//! # Ephemeris: the propagation driver
//!
//! An [`Ephemeris`] owns every body of a simulated system, the name → index table
//! built once at construction, and the simulation clock. Bodies reference each other
//! only through indices into the same vector.
//!
//! ## Life cycle
//!
//! 1. **Construction** ([`Ephemeris::new`], [`Ephemeris::new_lenient`]): bodies are
//!    decoded from their records, moons are linked to their primaries (an unknown or
//!    cyclic primary is an error), the update order is fixed, and every body is placed
//!    at [`EphemerisParams::start_time`] with its path generated.
//! 2. **Advancing** ([`Ephemeris::advance_all`], [`Ephemeris::tick`]): the phase of every
//!    orbit moves by `rate · dt`; the secular drift of precessing bodies follows the
//!    configured [`PrecessionCadence`].
//! 3. **Jumping** ([`Ephemeris::set_time`]): incremental state is discarded and every
//!    body is rebased from its epoch snapshot.
//!
//! ## Update order
//!
//! Within one pass, non-satellites are updated first, then moons sorted by depth
//! (a moon of a moon comes after its own primary). Distances and the barycentric
//! display offsets are computed last, from raw positions only.
//!
//! ## Time control
//!
//! The simulation rate is picked from [`SPEED_TABLE`], from five years per second
//! backwards to five years per second forwards; index [`REAL_TIME_INDEX`] is real time.

pub mod params;

use ahash::AHashMap;
use nalgebra::Vector3;
use tracing::{debug, trace, warn};

use crate::bodies::{
    BodyKind, BodyRecord, OrbitalBody, Orbiting, PathAnchor, PrimaryFrame, PropagationContext,
};
use crate::constants::{Centuries, DAYS_PER_CENTURY, MJD, SECONDS_PER_DAY};
use crate::kepler::KeplerSolver;
use crate::observables::{geocentric_parallax, SkyReport};
use crate::observers::Observer;
use crate::orrery_errors::OrreryError;
use crate::time::{eph_to_mjd, mjd_to_eph};
use params::{EphemerisParams, PrecessionCadence};

/// Simulation rates, centuries of simulated time per second of wall-clock time
pub const SPEED_TABLE: [f64; 15] = [
    -1.0 / 20.0,
    -1.0 / 100.0,
    -100.0 / DAYS_PER_CENTURY,
    -20.0 / DAYS_PER_CENTURY,
    -1.0 / DAYS_PER_CENTURY,
    -1.0 / 24.0 / DAYS_PER_CENTURY,
    -1.0 / SECONDS_PER_DAY / DAYS_PER_CENTURY,
    0.0,
    1.0 / SECONDS_PER_DAY / DAYS_PER_CENTURY,
    1.0 / 24.0 / DAYS_PER_CENTURY,
    1.0 / DAYS_PER_CENTURY,
    20.0 / DAYS_PER_CENTURY,
    100.0 / DAYS_PER_CENTURY,
    1.0 / 100.0,
    1.0 / 20.0,
];

/// Index of the real-time rate in [`SPEED_TABLE`]
pub const REAL_TIME_INDEX: usize = 8;

/// One simulated day, in centuries
const DAY: Centuries = 1.0 / DAYS_PER_CENTURY;

/// Per-tick output of one body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodySnapshot {
    pub name: String,
    /// Displayed inertial position (AU), barycentric offset included
    pub position: Vector3<f64>,
    pub rotation_phase: f64,
    pub distance_to_sun: f64,
    pub distance_to_earth: f64,
}

/// A primary drawn offset from its raw position, resolved to indices.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ResolvedPair {
    primary: usize,
    secondary: usize,
    ratio: f64,
}

#[derive(Debug, Clone)]
pub struct Ephemeris {
    bodies: Vec<OrbitalBody>,
    index: AHashMap<String, usize>,
    order: Vec<usize>,
    pairs: Vec<ResolvedPair>,
    earth: Option<usize>,
    params: EphemerisParams,
    solver: KeplerSolver,
    time: Centuries,
    speed_index: usize,
    pending_precession: Centuries,
}

/// Name → index table; the first body of a given name wins.
fn build_index(bodies: &[OrbitalBody]) -> AHashMap<String, usize> {
    let mut index = AHashMap::with_capacity(bodies.len());
    for (i, body) in bodies.iter().enumerate() {
        match index.get(body.name()).copied() {
            Some(first) => {
                warn!(name = body.name(), first, duplicate = i, "duplicate body name ignored")
            }
            None => {
                index.insert(body.name().to_string(), i);
            }
        }
    }
    index
}

/// Moons whose primary is unknown, or that belong to a cycle of primaries.
fn defective_moons(
    bodies: &[OrbitalBody],
    index: &AHashMap<String, usize>,
) -> Vec<(usize, OrreryError)> {
    let mut defects = Vec::new();
    for (i, body) in bodies.iter().enumerate() {
        let Some(moon) = body.as_moon() else {
            continue;
        };
        if !index.contains_key(&moon.primary_name) {
            defects.push((
                i,
                OrreryError::UnresolvedPrimary {
                    moon: moon.core.name.clone(),
                    primary: moon.primary_name.clone(),
                },
            ));
            continue;
        }
        // walk up the chain of primaries; coming back to i means a cycle
        let mut current = i;
        for _ in 0..=bodies.len() {
            let next = bodies[current]
                .as_moon()
                .and_then(|m| index.get(&m.primary_name).copied());
            match next {
                Some(next) if next == i => {
                    defects.push((i, OrreryError::CyclicPrimary(moon.core.name.clone())));
                    break;
                }
                Some(next) => current = next,
                None => break,
            }
        }
    }
    defects
}

/// Context of one propagation step of body `i`.
fn context<'a>(
    solver: &'a KeplerSolver,
    params: &EphemerisParams,
    bodies: &[OrbitalBody],
    time: Centuries,
    i: usize,
) -> PropagationContext<'a> {
    let primary = bodies[i].primary_index().map(|p| {
        let core = bodies[p].core();
        PrimaryFrame {
            position: core.state.position,
            orientation: core.physical.orientation(),
        }
    });
    PropagationContext {
        time,
        solver,
        primary,
        path_points: params.path_points,
        unbound_path_radius: params.unbound_path_radius,
    }
}

impl Ephemeris {
    /// Build and place a system.
    ///
    /// Arguments
    /// ---------
    /// * `records`: one raw record per body, with its kind
    /// * `params`: driver configuration
    ///
    /// Return
    /// ------
    /// * the placed ephemeris, or the first [`OrreryError::UnresolvedPrimary`] /
    ///   [`OrreryError::CyclicPrimary`] found, in input order
    pub fn new(
        records: Vec<(BodyKind, BodyRecord)>,
        params: EphemerisParams,
    ) -> Result<Self, OrreryError> {
        let bodies: Vec<OrbitalBody> = records
            .iter()
            .map(|(kind, record)| OrbitalBody::from_record(*kind, record))
            .collect();
        let index = build_index(&bodies);
        if let Some((_, err)) = defective_moons(&bodies, &index).into_iter().next() {
            return Err(err);
        }
        Ok(Self::assemble(bodies, index, params))
    }

    /// Build and place a system, dropping the moons whose primary cannot be resolved.
    ///
    /// Dropping a moon can orphan the moons orbiting it, so the check runs until the
    /// collection is stable. Every dropped moon is reported.
    pub fn new_lenient(
        records: Vec<(BodyKind, BodyRecord)>,
        params: EphemerisParams,
    ) -> (Self, Vec<OrreryError>) {
        let mut bodies: Vec<OrbitalBody> = records
            .iter()
            .map(|(kind, record)| OrbitalBody::from_record(*kind, record))
            .collect();
        let mut dropped = Vec::new();
        loop {
            let index = build_index(&bodies);
            let defects = defective_moons(&bodies, &index);
            if defects.is_empty() {
                return (Self::assemble(bodies, index, params), dropped);
            }
            let doomed: Vec<usize> = defects.iter().map(|(i, _)| *i).collect();
            for (_, err) in defects {
                warn!(%err, "body dropped");
                dropped.push(err);
            }
            bodies = bodies
                .into_iter()
                .enumerate()
                .filter(|(i, _)| !doomed.contains(i))
                .map(|(_, body)| body)
                .collect();
        }
    }

    /// Link moons, fix the update order and place every body. All primaries resolve.
    fn assemble(
        mut bodies: Vec<OrbitalBody>,
        index: AHashMap<String, usize>,
        params: EphemerisParams,
    ) -> Self {
        for i in 0..bodies.len() {
            let Some(primary) = bodies[i]
                .as_moon()
                .and_then(|m| index.get(&m.primary_name).copied())
            else {
                continue;
            };
            let mass = bodies[primary].core().physical.mass;
            if let Some(moon) = bodies[i].as_moon_mut() {
                moon.link_primary(primary, mass);
            }
        }

        let depth = |mut i: usize| {
            let mut depth = 0;
            while let Some(p) = bodies[i].primary_index() {
                depth += 1;
                i = p;
                if depth > bodies.len() {
                    break;
                }
            }
            depth
        };
        let mut order: Vec<usize> = (0..bodies.len()).collect();
        order.sort_by_key(|i| depth(*i));

        let pairs = params
            .barycentric_pairs
            .iter()
            .filter_map(|pair| {
                match (index.get(&pair.primary), index.get(&pair.secondary)) {
                    (Some(&primary), Some(&secondary)) => Some(ResolvedPair {
                        primary,
                        secondary,
                        ratio: pair.ratio,
                    }),
                    _ => {
                        debug!(
                            primary = %pair.primary,
                            secondary = %pair.secondary,
                            "barycentric pair not loaded, skipped"
                        );
                        None
                    }
                }
            })
            .collect();
        let earth = index.get(&params.earth_name).copied();
        if earth.is_none() {
            debug!(earth = %params.earth_name, "no observing platform loaded");
        }

        let start = mjd_to_eph(params.start_time);
        let mut ephemeris = Ephemeris {
            solver: params.solver(),
            bodies,
            index,
            order,
            pairs,
            earth,
            params,
            time: start,
            speed_index: REAL_TIME_INDEX,
            pending_precession: 0.0,
        };
        ephemeris.rebase_all(start);
        ephemeris.recompute_paths(|_| true);
        debug!(
            bodies = ephemeris.bodies.len(),
            mjd = ephemeris.params.start_time,
            "ephemeris placed"
        );
        ephemeris
    }

    // --- propagation ---

    /// Recompute every body from its epoch snapshot at `time` (ephemeris time).
    ///
    /// Paths are left untouched; see [`Ephemeris::recompute_paths`].
    pub fn rebase_all(&mut self, time: Centuries) {
        self.time = time;
        self.pending_precession = 0.0;
        for k in 0..self.order.len() {
            let i = self.order[k];
            let ctx = context(&self.solver, &self.params, &self.bodies, time, i);
            self.bodies[i].rebase(&ctx);
        }
        self.post_process();
    }

    /// Advance every body by `dt` centuries (any sign).
    pub fn advance_all(&mut self, dt: Centuries) {
        if dt == 0.0 {
            return;
        }
        self.time += dt;
        let drift = match self.params.precession_cadence {
            PrecessionCadence::EveryTick => Some(dt),
            PrecessionCadence::Daily => {
                self.pending_precession += dt;
                if self.pending_precession.abs() >= DAY {
                    Some(std::mem::take(&mut self.pending_precession))
                } else {
                    None
                }
            }
        };

        for k in 0..self.order.len() {
            let i = self.order[k];
            if let Some(drift) = drift {
                if self.bodies[i].is_precessing() {
                    self.bodies[i].precess(drift);
                }
            }
            let ctx = context(&self.solver, &self.params, &self.bodies, self.time, i);
            self.bodies[i].advance(dt, &ctx);
        }
        if let Some(drift) = drift {
            trace!(drift, "secular drift applied");
            self.recompute_paths(|body| body.is_precessing());
        }
        self.post_process();
    }

    /// Regenerate the drawn path of every body selected by `filter`.
    pub fn recompute_paths(&mut self, filter: impl Fn(&OrbitalBody) -> bool) {
        for k in 0..self.order.len() {
            let i = self.order[k];
            if !filter(&self.bodies[i]) {
                continue;
            }
            let ctx = context(&self.solver, &self.params, &self.bodies, self.time, i);
            self.bodies[i].recompute_path(&ctx);
        }
    }

    /// Distances and barycentric offsets, from raw positions only.
    fn post_process(&mut self) {
        let earth_position = self.earth.map(|e| self.bodies[e].core().state.position);
        for body in &mut self.bodies {
            let state = &mut body.core_mut().state;
            state.distance_to_sun = state.position.norm();
            state.display_offset = Vector3::zeros();
            if let Some(earth) = earth_position {
                state.vector_to_earth = earth - state.position;
                state.distance_to_earth = state.vector_to_earth.norm();
            }
        }
        for pair in &self.pairs {
            let primary = self.bodies[pair.primary].core().state.position;
            let secondary = self.bodies[pair.secondary].core().state.position;
            self.bodies[pair.primary].core_mut().state.display_offset =
                (primary - secondary) * pair.ratio;
        }
    }

    // --- time control ---

    /// Jump to `mjd`: full rebase, regenerated precessing paths, real-time rate.
    pub fn set_time(&mut self, mjd: MJD) {
        let target = mjd_to_eph(mjd);
        debug!(from = self.mjd(), to = mjd, "jump");
        self.rebase_all(target);
        self.recompute_paths(|body| body.is_precessing());
        self.speed_index = REAL_TIME_INDEX;
    }

    /// Advance by `elapsed` wall-clock seconds at the current rate; returns the step.
    pub fn tick(&mut self, elapsed: f64) -> Centuries {
        let dt = self.rate() * elapsed;
        self.advance_all(dt);
        dt
    }

    pub fn speed_up(&mut self) {
        self.speed_index = (self.speed_index + 1).min(SPEED_TABLE.len() - 1);
    }

    pub fn slow_down(&mut self) {
        self.speed_index = self.speed_index.saturating_sub(1);
    }

    pub fn set_speed_index(&mut self, index: usize) -> Result<(), OrreryError> {
        if index >= SPEED_TABLE.len() {
            return Err(OrreryError::InvalidParameter(format!(
                "speed index {index} out of 0..{}",
                SPEED_TABLE.len()
            )));
        }
        self.speed_index = index;
        Ok(())
    }

    pub fn speed_index(&self) -> usize {
        self.speed_index
    }

    /// Current rate, centuries per second.
    pub fn rate(&self) -> f64 {
        SPEED_TABLE[self.speed_index]
    }

    /// Current ephemeris time.
    pub fn time(&self) -> Centuries {
        self.time
    }

    pub fn mjd(&self) -> MJD {
        eph_to_mjd(self.time)
    }

    // --- queries ---

    pub fn params(&self) -> &EphemerisParams {
        &self.params
    }

    pub fn bodies(&self) -> &[OrbitalBody] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn body(&self, index: usize) -> Result<&OrbitalBody, OrreryError> {
        self.bodies
            .get(index)
            .ok_or(OrreryError::BodyIndexOutOfRange(index))
    }

    pub fn body_by_name(&self, name: &str) -> Result<&OrbitalBody, OrreryError> {
        self.index_of(name)
            .map(|i| &self.bodies[i])
            .ok_or_else(|| OrreryError::UnknownBody(name.to_string()))
    }

    /// Index of the observing platform, if loaded.
    pub fn earth_index(&self) -> Option<usize> {
        self.earth
    }

    /// Order in which bodies are updated within one pass.
    pub fn update_order(&self) -> &[usize] {
        &self.order
    }

    /// Per-tick output of every body, in input order.
    pub fn snapshots(&self) -> Vec<BodySnapshot> {
        self.bodies
            .iter()
            .map(|body| {
                let core = body.core();
                BodySnapshot {
                    name: core.name.clone(),
                    position: core.displayed_position(),
                    rotation_phase: core.state.rotation_phase,
                    distance_to_sun: core.state.distance_to_sun,
                    distance_to_earth: core.state.distance_to_earth,
                }
            })
            .collect()
    }

    /// Drawn path of a body in inertial coordinates (AU).
    ///
    /// Paths of moons are stored relative to their primary and are translated by the
    /// primary's current raw position. Empty until the path was first generated.
    pub fn path_points_inertial(&self, index: usize) -> Result<Vec<Vector3<f64>>, OrreryError> {
        let body = self.body(index)?;
        let Some(path) = &body.core().state.path else {
            return Ok(Vec::new());
        };
        let origin = match path.anchor {
            PathAnchor::Sun => Vector3::zeros(),
            PathAnchor::Primary(p) => self.body(p)?.core().state.position,
        };
        Ok(path.points.iter().map(|p| origin + p).collect())
    }

    /// Observables of body `index` for `observer`, at the current time.
    ///
    /// Querying the observing platform itself reports the Sun.
    pub fn sky_report(&self, index: usize, observer: &Observer) -> Result<SkyReport, OrreryError> {
        let body = self.body(index)?;
        let earth = self
            .earth
            .ok_or_else(|| OrreryError::UnknownBody(self.params.earth_name.clone()))?;
        let observer_position = geocentric_parallax(
            &self.bodies[earth].core().displayed_position(),
            observer,
            self.time,
        );
        let primary = body.primary_index().map(|p| &self.bodies[p]);
        Ok(SkyReport::observe(
            body,
            primary,
            &observer_position,
            observer,
            self.time,
            index == earth,
        ))
    }
}
