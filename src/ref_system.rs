//! # Reference frames
//!
//! The working inertial frame of the engine is the **celestial** (mean equatorial)
//! frame: `+x` toward the vernal equinox, `+z` toward the celestial north pole. Orbits
//! are described in one of three frames, selected per body by [`OrbitFrame`]:
//!
//! - **Ecliptic**: elements are referred to the ecliptic and the equinox; the orbital
//!   plane is rotated by `Rz(Ω)·Rx(i)·Rz(ω)` and then tilted by the fixed obliquity
//!   `Rx(ε)`.
//! - **Local Lagrangian**: the orbit pole is given directly by a right ascension and
//!   declination (Laplace plane of a satellite).
//! - **Planet equatorial**: the orbit is inclined by `i` to the primary's *current*
//!   equator.
//!
//! All rotations are active rotations built with [`nalgebra::Rotation3::from_axis_angle`].

use nalgebra::{Matrix3, Rotation3, Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::str::FromStr;

use crate::constants::{Degree, Hour, Radian, DEG_PER_HOUR, OBLIQUITY_DEG, RADEG};
use crate::orrery_errors::OrreryError;

/// Coordinate axis of a rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Frame in which the elements of a satellite orbit are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrbitFrame {
    /// Elements referred to the ecliptic (record tag `E`)
    #[default]
    Ecliptic,
    /// Orbit pole given by its own RA/Dec (record tag `L`)
    LocalLagrangian,
    /// Elements referred to the primary's equator (record tag `Q`)
    PlanetEquatorial,
}

impl FromStr for OrbitFrame {
    type Err = OrreryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "E" | "e" => Ok(OrbitFrame::Ecliptic),
            "L" | "l" => Ok(OrbitFrame::LocalLagrangian),
            "Q" | "q" => Ok(OrbitFrame::PlanetEquatorial),
            other => Err(OrreryError::InvalidFrameSelector(other.to_string())),
        }
    }
}

/// Angular elements fixing the orientation of an orbit in its reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrbitOrientation {
    /// Argument of periapsis ω
    pub periapsis_argument: Radian,
    /// Longitude of the ascending node Ω
    pub ascending_node: Radian,
    /// Inclination i
    pub inclination: Radian,
}

/// Current rotation axis of a primary body, read by its satellites.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimaryOrientation {
    pub axis_ra: Radian,
    pub axis_dec: Radian,
}

impl Default for PrimaryOrientation {
    fn default() -> Self {
        PrimaryOrientation {
            axis_ra: 0.0,
            axis_dec: FRAC_PI_2,
        }
    }
}

/// Rotation matrix of angle `alpha` (radians) about a coordinate axis.
///
/// Arguments
/// ---------
/// * `alpha`: rotation angle in radians, counterclockwise when looking down the axis
/// * `axis`: rotation axis
///
/// Returns
/// --------
/// * a 3×3 orthogonal matrix
pub fn rotmt(alpha: f64, axis: Axis) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };
    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Rotation from ecliptic to celestial coordinates (fixed obliquity).
pub fn ecliptic_to_celestial() -> Matrix3<f64> {
    rotmt(OBLIQUITY_DEG * RADEG, Axis::X)
}

/// Rotation from the orbital plane to the ecliptic: `Rz(Ω)·Rx(i)·Rz(ω)`.
pub fn orbit_to_ecliptic(orientation: &OrbitOrientation) -> Matrix3<f64> {
    rotmt(orientation.ascending_node, Axis::Z)
        * rotmt(orientation.inclination, Axis::X)
        * rotmt(orientation.periapsis_argument, Axis::Z)
}

/// Transform an orbital-plane point of an ecliptic-referred orbit into the celestial frame.
///
/// The point is rotated by the argument of periapsis about the orbit normal, by the
/// inclination about the line of nodes, by the longitude of the ascending node about
/// the ecliptic pole, and finally by the obliquity of the ecliptic.
///
/// Arguments
/// ---------
/// * `orientation`: (ω, Ω, i) of the orbit
/// * `point`: orbital-plane coordinates (x toward periapsis)
///
/// Returns
/// --------
/// * the point in the celestial frame, same length unit as `point`
///
/// See also
/// --------
/// * [`to_body_relative`] – satellite variant with selectable frame
pub fn to_ecliptic(orientation: &OrbitOrientation, point: &Vector2<f64>) -> Vector3<f64> {
    ecliptic_to_celestial() * orbit_to_ecliptic(orientation) * Vector3::new(point.x, point.y, 0.0)
}

/// Rotation bringing the `+z` axis onto the direction `(ra, π/2 − polar_angle)` after a
/// rotation `angle` about that pole: `Rz(ra)·Ry(polar_angle)·Rz(angle)`.
fn pole_rotation(ra: Radian, polar_angle: Radian, angle: Radian) -> Matrix3<f64> {
    rotmt(ra, Axis::Z) * rotmt(polar_angle, Axis::Y) * rotmt(angle, Axis::Z)
}

/// Transform an orbital-plane point of a satellite orbit into the celestial frame,
/// relative to its primary.
///
/// Arguments
/// ---------
/// * `orientation`: (ω, Ω, i) of the orbit
/// * `axis_ra`, `axis_dec`: orbit-pole direction used by [`OrbitFrame::LocalLagrangian`]
/// * `point`: orbital-plane coordinates
/// * `frame`: reference frame of the elements
/// * `primary`: current rotation axis of the primary, used by [`OrbitFrame::PlanetEquatorial`]
///
/// Returns
/// --------
/// * the primary-centred position in the celestial frame
///
/// Notes
/// -----
/// In the two pole-based frames ω and Ω only enter through their sum, the longitude of
/// periapsis measured in the satellite's own plane.
pub fn to_body_relative(
    orientation: &OrbitOrientation,
    axis_ra: Radian,
    axis_dec: Radian,
    point: &Vector2<f64>,
    frame: OrbitFrame,
    primary: &PrimaryOrientation,
) -> Vector3<f64> {
    let in_plane = Vector3::new(point.x, point.y, 0.0);
    let periapsis_longitude = orientation.periapsis_argument + orientation.ascending_node;
    match frame {
        OrbitFrame::Ecliptic => to_ecliptic(orientation, point),
        OrbitFrame::LocalLagrangian => {
            pole_rotation(axis_ra, FRAC_PI_2 - axis_dec, periapsis_longitude) * in_plane
        }
        OrbitFrame::PlanetEquatorial => {
            pole_rotation(
                primary.axis_ra,
                FRAC_PI_2 - primary.axis_dec + orientation.inclination,
                periapsis_longitude,
            ) * in_plane
        }
    }
}

/// Unit vector of the direction `(ra, dec)`.
pub fn radec_to_unit(ra: Hour, dec: Degree) -> Vector3<f64> {
    let ra = ra * DEG_PER_HOUR * RADEG;
    let dec = dec * RADEG;
    Vector3::new(dec.cos() * ra.cos(), dec.cos() * ra.sin(), dec.sin())
}

/// Right ascension (hours, `[0, 24)`) and declination (degrees) of a celestial vector.
///
/// The zero vector maps to `(0, 0)`.
pub fn unit_to_radec(v: &Vector3<f64>) -> (Hour, Degree) {
    let norm = v.norm();
    if norm == 0.0 {
        return (0.0, 0.0);
    }
    let ra = (v.y.atan2(v.x) / RADEG / DEG_PER_HOUR).rem_euclid(24.0);
    let dec = (v.z / norm).clamp(-1.0, 1.0).asin() / RADEG;
    (if ra >= 24.0 { 0.0 } else { ra }, dec)
}

#[cfg(test)]
mod ref_system_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rotmt_orientation() {
        let r = rotmt(FRAC_PI_2, Axis::Z) * Vector3::x();
        assert_abs_diff_eq!(r, Vector3::y(), epsilon = 1e-15);
        let r = rotmt(FRAC_PI_2, Axis::X) * Vector3::y();
        assert_abs_diff_eq!(r, Vector3::z(), epsilon = 1e-15);
    }

    #[test]
    fn test_ecliptic_pole_in_celestial_frame() {
        // the ecliptic pole sits at RA 18h, Dec 90° − ε
        let pole = ecliptic_to_celestial() * Vector3::z();
        let (ra, dec) = unit_to_radec(&pole);
        assert_abs_diff_eq!(ra, 18.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dec, 90.0 - OBLIQUITY_DEG, epsilon = 1e-12);
    }

    #[test]
    fn test_to_ecliptic_identity_elements() {
        let o = OrbitOrientation::default();
        let eps = OBLIQUITY_DEG * RADEG;

        let v = to_ecliptic(&o, &Vector2::new(0.9833, 0.0));
        assert_abs_diff_eq!(v, Vector3::new(0.9833, 0.0, 0.0), epsilon = 1e-15);

        let v = to_ecliptic(&o, &Vector2::new(0.0, 1.0));
        assert_abs_diff_eq!(v, Vector3::new(0.0, eps.cos(), eps.sin()), epsilon = 1e-15);
    }

    #[test]
    fn test_to_ecliptic_node_and_periapsis() {
        // with i = 0 only ω + Ω matters
        let a = OrbitOrientation {
            periapsis_argument: 0.3,
            ascending_node: 0.5,
            inclination: 0.0,
        };
        let b = OrbitOrientation {
            periapsis_argument: 0.8,
            ascending_node: 0.0,
            inclination: 0.0,
        };
        let p = Vector2::new(1.2, -0.4);
        assert_abs_diff_eq!(to_ecliptic(&a, &p), to_ecliptic(&b, &p), epsilon = 1e-14);

        // a point on the line of nodes is untouched by the inclination
        let c = OrbitOrientation {
            periapsis_argument: 0.0,
            ascending_node: 0.0,
            inclination: 1.1,
        };
        let v = to_ecliptic(&c, &Vector2::new(2.0, 0.0));
        assert_abs_diff_eq!(v, Vector3::new(2.0, 0.0, 0.0), epsilon = 1e-14);
    }

    #[test]
    fn test_lagrangian_pole_direction() {
        let o = OrbitOrientation {
            periapsis_argument: 0.4,
            ascending_node: 1.0,
            inclination: 0.2,
        };
        let (ra, dec) = (1.3, 0.6);
        let primary = PrimaryOrientation::default();
        let p1 = to_body_relative(
            &o,
            ra,
            dec,
            &Vector2::new(1.0, 0.0),
            OrbitFrame::LocalLagrangian,
            &primary,
        );
        let p2 = to_body_relative(
            &o,
            ra,
            dec,
            &Vector2::new(0.0, 1.0),
            OrbitFrame::LocalLagrangian,
            &primary,
        );
        let normal = p1.cross(&p2);
        let expected = Vector3::new(dec.cos() * ra.cos(), dec.cos() * ra.sin(), dec.sin());
        assert_abs_diff_eq!(normal, expected, epsilon = 1e-14);
    }

    #[test]
    fn test_equatorial_frame_follows_primary_axis() {
        let o = OrbitOrientation {
            periapsis_argument: 0.0,
            ascending_node: 0.0,
            inclination: 0.0,
        };
        let primary = PrimaryOrientation {
            axis_ra: 0.7,
            axis_dec: 0.9,
        };
        let p1 = to_body_relative(
            &o,
            0.0,
            0.0,
            &Vector2::new(1.0, 0.0),
            OrbitFrame::PlanetEquatorial,
            &primary,
        );
        let p2 = to_body_relative(
            &o,
            0.0,
            0.0,
            &Vector2::new(0.0, 1.0),
            OrbitFrame::PlanetEquatorial,
            &primary,
        );
        let normal = p1.cross(&p2);
        let axis = Vector3::new(
            primary.axis_dec.cos() * primary.axis_ra.cos(),
            primary.axis_dec.cos() * primary.axis_ra.sin(),
            primary.axis_dec.sin(),
        );
        assert_abs_diff_eq!(normal, axis, epsilon = 1e-14);
    }

    #[test]
    fn test_ecliptic_frame_delegates() {
        let o = OrbitOrientation {
            periapsis_argument: 0.2,
            ascending_node: 2.0,
            inclination: 0.09,
        };
        let p = Vector2::new(0.002, 0.001);
        let v = to_body_relative(
            &o,
            0.0,
            0.0,
            &p,
            OrbitFrame::Ecliptic,
            &PrimaryOrientation::default(),
        );
        assert_abs_diff_eq!(v, to_ecliptic(&o, &p), epsilon = 1e-18);
    }

    #[test]
    fn test_radec_round_trip() {
        for (ra, dec) in [(0.0, 0.0), (6.0, 45.0), (13.25, -30.5), (23.9, 89.0)] {
            let (ra2, dec2) = unit_to_radec(&(radec_to_unit(ra, dec) * 3.0));
            assert_abs_diff_eq!(ra2, ra, epsilon = 1e-10);
            assert_abs_diff_eq!(dec2, dec, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_frame_selector_parsing() {
        assert_eq!("E".parse::<OrbitFrame>().unwrap(), OrbitFrame::Ecliptic);
        assert_eq!("L".parse::<OrbitFrame>().unwrap(), OrbitFrame::LocalLagrangian);
        assert_eq!(" Q ".parse::<OrbitFrame>().unwrap(), OrbitFrame::PlanetEquatorial);
        assert_eq!(
            "X".parse::<OrbitFrame>(),
            Err(OrreryError::InvalidFrameSelector("X".into()))
        );
    }
}
