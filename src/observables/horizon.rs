//! Horizontal coordinates and rise/set search for a ground observer.

use itertools::Itertools;
use std::fmt;

use crate::constants::{Centuries, Degree, Hour, DAYS_PER_CENTURY, DEG_PER_HOUR, RADEG};
use crate::observers::Observer;
use crate::time::{clock_time, eph_to_mjd};

/// Samples of the rise/set scan: one per minute over one day, both ends included
pub const RISE_SET_SAMPLES: usize = 1441;

/// Altitude and azimuth of a direction, for one observer and instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalCoordinates {
    /// Degrees above the horizon
    pub altitude: Degree,
    /// Degrees from north through east, in `[0, 360)`
    pub azimuth: Degree,
    /// Local hour angle, hours in `[0, 24)`
    pub hour_angle: Hour,
}

/// Hour-angle transform of `(ra, dec)` to the observer's horizon.
///
/// Arguments
/// ---------
/// * `ra`: right ascension, hours
/// * `dec`: declination, degrees
/// * `eph`: ephemeris time
/// * `observer`: ground position
pub fn alt_az(ra: Hour, dec: Degree, eph: Centuries, observer: &Observer) -> HorizontalCoordinates {
    let hour_angle = (observer.local_sidereal_time(eph) - ra * DEG_PER_HOUR).rem_euclid(360.0);
    let h = hour_angle * RADEG;
    let dec = dec * RADEG;
    let phi = observer.latitude() * RADEG;

    let x = h.cos() * dec.cos();
    let y = h.sin() * dec.cos();
    let z = dec.sin();

    let altitude = (x * phi.cos() + z * phi.sin()).clamp(-1.0, 1.0).asin() / RADEG;
    let azimuth = (y.atan2(x * phi.sin() - z * phi.cos()) / RADEG + 180.0).rem_euclid(360.0);

    HorizontalCoordinates {
        altitude,
        azimuth,
        hour_angle: hour_angle / DEG_PER_HOUR,
    }
}

/// Outcome of a rise/set search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RiseSet {
    /// No horizon crossing within the day
    Circumpolar { above_horizon: bool },
    /// First rising and first setting found, as MJD
    Crossings { rise: Option<f64>, set: Option<f64> },
}

impl fmt::Display for RiseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiseSet::Circumpolar {
                above_horizon: true,
            } => write!(f, "Circumpolar"),
            RiseSet::Circumpolar {
                above_horizon: false,
            } => write!(f, "Never rises"),
            RiseSet::Crossings { rise, set } => {
                let mut events = [("Rises", *rise), ("Sets", *set)]
                    .into_iter()
                    .filter_map(|(label, t)| t.map(|t| (label, t)))
                    .collect_vec();
                events.sort_by(|a, b| a.1.total_cmp(&b.1));
                let text = events
                    .iter()
                    .map(|(label, t)| format!("{label}: {}", clock_time(*t)))
                    .join(", ");
                write!(f, "{text}")
            }
        }
    }
}

/// Brute-force scan for horizon crossings of a fixed direction.
///
/// The altitude is sampled every minute from `eph − 12 h` to `eph + 12 h`; each sign
/// change between two samples is located by linear interpolation.
pub fn rise_set(ra: Hour, dec: Degree, eph: Centuries, observer: &Observer) -> RiseSet {
    let day = 1.0 / DAYS_PER_CENTURY;
    let minute = day / 1440.0;
    let start = eph - 0.5 * day;

    let samples = (0..RISE_SET_SAMPLES).map(|i| {
        let t = start + i as f64 * minute;
        (t, alt_az(ra, dec, t, observer).altitude)
    });

    let mut rise = None;
    let mut set = None;
    let mut first_altitude = None;
    for ((t_a, alt_a), (t_b, alt_b)) in samples.tuple_windows() {
        first_altitude.get_or_insert(alt_a);
        if alt_a * alt_b >= 0.0 {
            continue;
        }
        let crossing = eph_to_mjd(t_a + (t_b - t_a) * alt_a / (alt_a - alt_b));
        if alt_a < 0.0 {
            rise.get_or_insert(crossing);
        } else {
            set.get_or_insert(crossing);
        }
        if rise.is_some() && set.is_some() {
            break;
        }
    }

    if rise.is_none() && set.is_none() {
        RiseSet::Circumpolar {
            above_horizon: first_altitude.unwrap_or(0.0) > 0.0,
        }
    } else {
        RiseSet::Crossings { rise, set }
    }
}

#[cfg(test)]
mod horizon_test {
    use super::*;
    use crate::time::mjd_to_eph;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_meridian_transit() {
        let observer = Observer::new(45.0, 10.0).unwrap();
        let eph = 0.12;
        let ra = observer.local_sidereal_time(eph) / DEG_PER_HOUR;
        let h = alt_az(ra, 20.0, eph, &observer);
        assert_abs_diff_eq!(h.altitude, 65.0, epsilon = 1e-9);
        assert_abs_diff_eq!(h.azimuth, 180.0, epsilon = 1e-9);
        assert!(h.hour_angle < 1e-9 || h.hour_angle > 24.0 - 1e-9);

        // north of the zenith the transit is due north
        let h = alt_az(ra, 70.0, eph, &observer);
        assert_abs_diff_eq!(h.altitude, 65.0, epsilon = 1e-9);
        assert!(h.azimuth < 1e-9 || h.azimuth > 360.0 - 1e-9);
    }

    #[test]
    fn test_celestial_pole() {
        let observer = Observer::new(51.48, 0.0).unwrap();
        let h = alt_az(3.0, 90.0, 0.05, &observer);
        assert_abs_diff_eq!(h.altitude, 51.48, epsilon = 1e-9);
    }

    #[test]
    fn test_six_hours_east_is_on_the_horizon() {
        // on the equator, a direction on the celestial equator six hours east of the
        // meridian is rising due east
        let observer = Observer::new(0.0, 0.0).unwrap();
        let eph = 0.2;
        let ra = observer.local_sidereal_time(eph) / DEG_PER_HOUR + 6.0;
        let h = alt_az(ra, 0.0, eph, &observer);
        assert_abs_diff_eq!(h.altitude, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(h.azimuth, 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(h.hour_angle, 18.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rise_and_set_half_a_sidereal_day_apart() {
        let observer = Observer::new(0.0, 0.0).unwrap();
        let eph = mjd_to_eph(60000.3);
        match rise_set(4.0, 0.0, eph, &observer) {
            RiseSet::Crossings {
                rise: Some(rise),
                set: Some(set),
            } => {
                let half_sidereal_day = 0.5 / (1.0 + 0.985647 / 360.0);
                assert_abs_diff_eq!((set - rise).abs(), half_sidereal_day, epsilon = 1e-3);
                assert!((rise - 60000.3).abs() <= 0.5 + 1e-9);
                assert!((set - 60000.3).abs() <= 0.5 + 1e-9);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_circumpolar() {
        let observer = Observer::new(60.0, 25.0).unwrap();
        let eph = 0.3;
        assert_eq!(
            rise_set(2.0, 80.0, eph, &observer),
            RiseSet::Circumpolar {
                above_horizon: true
            }
        );
        assert_eq!(
            rise_set(2.0, -80.0, eph, &observer),
            RiseSet::Circumpolar {
                above_horizon: false
            }
        );
        assert_eq!(
            RiseSet::Circumpolar {
                above_horizon: true
            }
            .to_string(),
            "Circumpolar"
        );
    }

    #[test]
    fn test_crossings_display() {
        let rs = RiseSet::Crossings {
            rise: Some(60000.75),
            set: Some(60000.25),
        };
        assert_eq!(rs.to_string(), "Sets: 06:00, Rises: 18:00");
        let rs = RiseSet::Crossings {
            rise: Some(60000.5),
            set: None,
        };
        assert_eq!(rs.to_string(), "Rises: 12:00");
    }
}
