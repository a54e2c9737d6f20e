//! # Observables
//!
//! Quantities seen by an observer standing on the Earth:
//!
//! - [`photometry`]: phase integrals, apparent magnitude, atmospheric extinction,
//!   vis-viva speed;
//! - [`horizon`]: altitude/azimuth and the rise/set scan;
//! - this module: the geocentric parallax of the observer and the [`SkyReport`]
//!   gathering everything for one body.
//!
//! All functions are side-effect free. They read the state of already placed bodies;
//! the [`Ephemeris`](crate::ephemeris::Ephemeris) resolves which bodies are involved.

pub mod horizon;
pub mod photometry;

use nalgebra::Vector3;
use std::fmt;

use crate::bodies::{OrbitalBody, Orbiting};
use crate::constants::{AstronomicalUnit, Centuries, Degree, Hour, GRAVITATIONAL_CONSTANT};
use crate::observers::Observer;
use crate::ref_system::unit_to_radec;
use horizon::{alt_az, rise_set, HorizontalCoordinates, RiseSet};
use photometry::{
    apparent_magnitude, extinction, phase_angle, vis_viva_speed, Extinction, GM_SUN_SI,
};

/// Position of the observer: the displayed Earth position offset by the Earth radius
/// toward the observer's zenith.
pub fn geocentric_parallax(
    earth_position: &Vector3<f64>,
    observer: &Observer,
    eph: Centuries,
) -> Vector3<f64> {
    earth_position + observer.geocentric_offset(eph)
}

/// Angle (degrees) between two directions; zero when either is degenerate.
fn separation(a: &Vector3<f64>, b: &Vector3<f64>) -> Degree {
    let norms = a.norm() * b.norm();
    if norms == 0.0 {
        return 0.0;
    }
    (a.dot(b) / norms).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Everything an observer can read about one body at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyReport {
    /// Name of the observed object; the Sun when the Earth itself is queried
    pub target: String,
    /// Topocentric right ascension, hours
    pub right_ascension: Hour,
    /// Topocentric declination, degrees
    pub declination: Degree,
    pub horizontal: HorizontalCoordinates,
    pub rise_set: RiseSet,
    pub magnitude: Option<f64>,
    /// Only when above the horizon
    pub extinction: Option<Extinction>,
    pub distance_to_observer: AstronomicalUnit,
    pub distance_to_sun: AstronomicalUnit,
    /// Sun-observer-body angle, degrees
    pub elongation: Degree,
    /// Sun-body-observer angle, degrees
    pub phase_angle: Degree,
    /// Orbital speed, km/s
    pub orbital_speed: f64,
}

impl SkyReport {
    /// Observe `body` from `observer_position` (celestial frame, AU).
    ///
    /// Arguments
    /// ---------
    /// * `body`: a placed body
    /// * `primary`: the body it orbits, for moons
    /// * `observer_position`: see [`geocentric_parallax`]
    /// * `observer`: ground position, for the horizon transforms
    /// * `eph`: ephemeris time of the observation
    /// * `is_earth`: `body` is the observer's own planet; the Sun is reported instead
    pub fn observe(
        body: &OrbitalBody,
        primary: Option<&OrbitalBody>,
        observer_position: &Vector3<f64>,
        observer: &Observer,
        eph: Centuries,
        is_earth: bool,
    ) -> Self {
        let core = body.core();
        let target_position = if is_earth {
            Vector3::zeros()
        } else {
            core.state.position
        };
        let line_of_sight = target_position - observer_position;
        let (right_ascension, declination) = unit_to_radec(&line_of_sight);
        let horizontal = alt_az(right_ascension, declination, eph, observer);

        let distance_to_observer = line_of_sight.norm();
        let distance_to_sun = target_position.norm();
        let observer_to_sun = observer_position.norm();

        let (magnitude, alpha, elongation) = if is_earth {
            (None, 0.0, 0.0)
        } else {
            let alpha = phase_angle(distance_to_sun, distance_to_observer, observer_to_sun);
            let magnitude = apparent_magnitude(
                core.physical.absolute_magnitude,
                distance_to_sun,
                distance_to_observer,
                body.phase_integral(alpha),
            );
            (
                magnitude,
                alpha,
                separation(&-observer_position, &line_of_sight),
            )
        };

        let orbital_speed = match primary {
            Some(primary) => vis_viva_speed(
                GRAVITATIONAL_CONSTANT * primary.core().physical.mass,
                core.state.relative_position.norm(),
                body.inverse_semi_major_axis(),
            ),
            None => vis_viva_speed(
                GM_SUN_SI,
                core.state.position.norm(),
                body.inverse_semi_major_axis(),
            ),
        };

        SkyReport {
            target: if is_earth {
                "Sun".to_string()
            } else {
                core.name.clone()
            },
            right_ascension,
            declination,
            horizontal,
            rise_set: rise_set(right_ascension, declination, eph, observer),
            magnitude,
            extinction: magnitude
                .filter(|_| horizontal.altitude > 0.0)
                .map(|m| extinction(m, horizontal.altitude)),
            distance_to_observer,
            distance_to_sun,
            elongation,
            phase_angle: alpha.to_degrees(),
            orbital_speed,
        }
    }
}

impl fmt::Display for SkyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.target)?;
        writeln!(
            f,
            "  RA {:.4} h, Dec {:+.4}°",
            self.right_ascension, self.declination
        )?;
        writeln!(
            f,
            "  Alt {:+.2}°, Az {:.2}°, HA {:.4} h",
            self.horizontal.altitude, self.horizontal.azimuth, self.horizontal.hour_angle
        )?;
        writeln!(f, "  {}", self.rise_set)?;
        match (self.magnitude, self.extinction) {
            (Some(m), Some(ext)) => writeln!(
                f,
                "  Magnitude {m:.2} ({:.2} under {:.2} airmasses)",
                ext.magnitude, ext.airmass
            )?,
            (Some(m), None) => writeln!(f, "  Magnitude {m:.2}")?,
            _ => {}
        }
        writeln!(
            f,
            "  Distance {:.6} AU, from the Sun {:.6} AU",
            self.distance_to_observer, self.distance_to_sun
        )?;
        write!(
            f,
            "  Elongation {:.2}°, phase {:.2}°, speed {:.3} km/s",
            self.elongation, self.phase_angle, self.orbital_speed
        )
    }
}

#[cfg(test)]
mod observables_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_separation() {
        assert_relative_eq!(separation(&Vector3::x(), &Vector3::y()), 90.0);
        assert_relative_eq!(separation(&Vector3::x(), &-Vector3::x()), 180.0);
        assert_eq!(separation(&Vector3::zeros(), &Vector3::y()), 0.0);
    }

    #[test]
    fn test_parallax_shifts_by_earth_radius() {
        let earth = Vector3::new(-0.18, 0.88, 0.38);
        let observer = Observer::default();
        let pos = geocentric_parallax(&earth, &observer, 0.1);
        assert_relative_eq!(
            (pos - earth).norm(),
            crate::constants::ERAU,
            max_relative = 1e-12
        );
    }
}
