//! # Observer & site geometry
//!
//! An [`Observer`] is a point on the surface of a spherical Earth, given by its
//! latitude and longitude. It provides:
//!
//! - the observer's **local sidereal time** ([`Observer::local_sidereal_time`]), which
//!   drives the horizon transforms of [`observables::horizon`](crate::observables::horizon);
//! - the **geocentric parallax offset** ([`Observer::geocentric_offset`]): the vector from
//!   the Earth's centre to the observer in the celestial frame, used to compute
//!   topocentric directions and distances.
//!
//! ## Frames & conventions
//!
//! - Longitudes: **degrees**, east positive, normalized to `(-180, 180]`.
//! - Latitudes: **degrees**, geocentric, in `[-90, 90]`.
//! - Offsets: **AU**, celestial (equatorial) frame.
//!
//! The Earth's rotation phase is the observer's local sidereal time: the observer's
//! meridian points at right ascension `LST`, so the offset is
//! `R⊕ · (cos φ cos LST, cos φ sin LST, sin φ)`.

use nalgebra::Vector3;
use std::fmt;

use crate::constants::{Centuries, Degree, ERAU, RADEG};
use crate::orrery_errors::OrreryError;
use crate::time::sidereal_time;

/// Latitude of the default observer (Royal Observatory, Greenwich)
pub const GREENWICH_LATITUDE: Degree = 51.48;

/// Ground position of an observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    latitude: Degree,
    longitude: Degree,
}

impl Default for Observer {
    fn default() -> Self {
        Observer {
            latitude: GREENWICH_LATITUDE,
            longitude: 0.0,
        }
    }
}

impl Observer {
    /// Create an observer.
    ///
    /// Arguments
    /// ---------
    /// * `latitude`: degrees, in `[-90, 90]`
    /// * `longitude`: degrees east, any finite value (wrapped to `(-180, 180]`)
    ///
    /// Return
    /// ------
    /// * the observer, or [`OrreryError::InvalidParameter`] for an out-of-range latitude
    ///   or a non-finite coordinate
    pub fn new(latitude: Degree, longitude: Degree) -> Result<Self, OrreryError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(OrreryError::InvalidParameter(format!(
                "latitude must lie in [-90, 90], got {latitude}"
            )));
        }
        if !longitude.is_finite() {
            return Err(OrreryError::InvalidParameter(format!(
                "longitude must be finite, got {longitude}"
            )));
        }
        let mut longitude = longitude.rem_euclid(360.0);
        if longitude > 180.0 {
            longitude -= 360.0;
        }
        Ok(Observer {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> Degree {
        self.latitude
    }

    pub fn longitude(&self) -> Degree {
        self.longitude
    }

    /// Local mean sidereal time (degrees) at ephemeris time `eph`.
    pub fn local_sidereal_time(&self, eph: Centuries) -> Degree {
        sidereal_time(eph, self.longitude)
    }

    /// Vector from the Earth's centre to the observer, celestial frame, AU.
    pub fn geocentric_offset(&self, eph: Centuries) -> Vector3<f64> {
        let phi = self.latitude * RADEG;
        let theta = self.local_sidereal_time(eph) * RADEG;
        ERAU * Vector3::new(
            phi.cos() * theta.cos(),
            phi.cos() * theta.sin(),
            phi.sin(),
        )
    }
}

impl fmt::Display for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        write!(
            f,
            "{:.4}°{ns} {:.4}°{ew}",
            self.latitude.abs(),
            self.longitude.abs()
        )
    }
}
