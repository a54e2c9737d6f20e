//! # Time systems
//!
//! Conversions between the four clocks the engine works with:
//!
//! - **Unix time** in milliseconds, as supplied by a host clock,
//! - **Modified Julian Date** (MJD, days), the storage format of every epoch,
//! - **ephemeris time**, Julian centuries since J2000 (MJD 51544.5), which drives
//!   every secular rate,
//! - **local sidereal time**, in degrees, used by the horizon transforms.
//!
//! All conversions are total. The only fallible entry point is [`date_code_to_mjd`],
//! which decodes the `YYYYMMDD.dddd` periapsis-passage codes of comet records.

use hifitime::{Epoch, TimeScale};
use std::str::FromStr;

use crate::constants::{
    Centuries, Degree, DAYS_PER_CENTURY, DEG_PER_HOUR, MJD, MS_PER_DAY, T2000, UNIX_EPOCH_MJD,
};
use crate::orrery_errors::OrreryError;

/// Transformation from Unix time (milliseconds) to modified julian date (MJD)
///
/// Argument
/// --------
/// * `ms`: milliseconds since 1970-01-01T00:00:00 UTC
///
/// Return
/// ------
/// * the same instant in MJD
pub fn unix_to_mjd(ms: f64) -> MJD {
    ms / MS_PER_DAY + UNIX_EPOCH_MJD
}

/// Inverse of [`unix_to_mjd`].
pub fn mjd_to_unix(mjd: MJD) -> f64 {
    (mjd - UNIX_EPOCH_MJD) * MS_PER_DAY
}

/// Transformation from modified julian date (MJD) to ephemeris time
///
/// Argument
/// --------
/// * `mjd`: a modified julian date
///
/// Return
/// ------
/// * Julian centuries elapsed since J2000
pub fn mjd_to_eph(mjd: MJD) -> Centuries {
    (mjd - T2000) / DAYS_PER_CENTURY
}

/// Inverse of [`mjd_to_eph`].
pub fn eph_to_mjd(eph: Centuries) -> MJD {
    eph * DAYS_PER_CENTURY + T2000
}

/// Local mean sidereal time of an observer.
///
/// Uses the low-precision expression
/// `LST = 100.46° + 0.985647°·d + λ + 15°·UT`, where `d` is the number of days since
/// J2000 and `UT` the time of day in hours.
///
/// Arguments
/// ---------
/// * `eph`: ephemeris time (centuries since J2000)
/// * `longitude`: observer longitude, degrees east
///
/// Returns
/// -------
/// * the local sidereal time in degrees, normalized to `[0, 360)`
pub fn sidereal_time(eph: Centuries, longitude: Degree) -> Degree {
    let mjd = eph_to_mjd(eph);
    let days = mjd - T2000;
    let ut_hours = mjd.rem_euclid(1.0) * 24.0;
    let lst = 100.46 + 0.985647 * days + longitude + DEG_PER_HOUR * ut_hours;
    let lst = lst.rem_euclid(360.0);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if lst >= 360.0 {
        0.0
    } else {
        lst
    }
}

/// Transformation from a compact date code `YYYYMMDD.dddd` (UTC) to modified julian date (MJD)
///
/// Argument
/// --------
/// * `code`: the date code; the fractional part is a fraction of the day
///
/// Return
/// ------
/// * the MJD of the encoded instant, or [`OrreryError::InvalidDateCode`]
pub fn date_code_to_mjd(code: &str) -> Result<MJD, OrreryError> {
    let invalid = || OrreryError::InvalidDateCode(code.to_string());
    let trimmed = code.trim();
    let (date_part, frac_part) = match trimmed.split_once('.') {
        Some((d, f)) => (d, f),
        None => (trimmed, ""),
    };
    if date_part.len() < 5
        || !date_part.bytes().all(|b| b.is_ascii_digit() || b == b'-')
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let split = date_part.len() - 4;
    let year = i32::from_str(&date_part[..split]).map_err(|_| invalid())?;
    let month = u8::from_str(&date_part[split..split + 2]).map_err(|_| invalid())?;
    let day = u8::from_str(&date_part[split + 2..]).map_err(|_| invalid())?;
    let fraction = if frac_part.is_empty() {
        0.0
    } else {
        f64::from_str(&format!("0.{frac_part}")).map_err(|_| invalid())?
    };

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(invalid());
    }

    let epoch = Epoch::maybe_from_gregorian(year, month, day, 0, 0, 0, 0, TimeScale::UTC)
        .map_err(|_| invalid())?;
    Ok(epoch.to_mjd_utc_days() + fraction)
}

/// MJD (UTC) to a hifitime [`Epoch`].
pub fn mjd_to_epoch(mjd: MJD) -> Epoch {
    Epoch::from_mjd_utc(mjd)
}

/// hifitime [`Epoch`] to MJD (UTC).
pub fn epoch_to_mjd(epoch: Epoch) -> MJD {
    epoch.to_mjd_utc_days()
}

/// Wall-clock time of day `HH:MM` (UTC) of an MJD, rounded to the nearest minute.
pub fn clock_time(mjd: MJD) -> String {
    let minutes = (mjd.rem_euclid(1.0) * 1440.0).round() as u32 % 1440;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unix_epoch() {
        assert_eq!(unix_to_mjd(0.0), 40587.0);
        assert_eq!(mjd_to_unix(40587.0), 0.0);
        assert_eq!(unix_to_mjd(86_400_000.0), 40588.0);
    }

    #[test]
    fn test_j2000_is_zero_centuries() {
        assert_eq!(mjd_to_eph(51544.5), 0.0);
        assert_eq!(eph_to_mjd(0.0), 51544.5);
        assert_relative_eq!(mjd_to_eph(51544.5 + 36525.6363), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_round_trips() {
        // ±5000 years around J2000, one sample every ~37 years
        let span = 5000.0 * 365.25;
        let mut mjd = T2000 - span;
        while mjd <= T2000 + span {
            assert_relative_eq!(eph_to_mjd(mjd_to_eph(mjd)), mjd, epsilon = 1e-6);
            let ms = mjd_to_unix(mjd);
            assert_relative_eq!(mjd_to_unix(unix_to_mjd(ms)), ms, max_relative = 1e-12);
            mjd += 13_579.0;
        }
    }

    #[test]
    fn test_sidereal_time_range() {
        for k in -50..50 {
            let eph = k as f64 * 0.37;
            for lon in [-180.0, -75.2, 0.0, 12.5, 179.9] {
                let lst = sidereal_time(eph, lon);
                assert!((0.0..360.0).contains(&lst), "lst = {lst}");
            }
        }
    }

    #[test]
    fn test_sidereal_time_at_j2000() {
        // noon at J2000, Greenwich: 100.46 + 15 * 12 = 280.46
        assert_relative_eq!(sidereal_time(0.0, 0.0), 280.46, epsilon = 1e-9);
        // one hour of longitude east adds 15 degrees
        assert_relative_eq!(sidereal_time(0.0, 15.0), 295.46, epsilon = 1e-9);
    }

    #[test]
    fn test_date_code() {
        assert_relative_eq!(date_code_to_mjd("20000101.5").unwrap(), 51544.5, epsilon = 1e-9);
        assert_relative_eq!(date_code_to_mjd("19860209.4589").unwrap(), 46470.4589, epsilon = 1e-9);
        assert_relative_eq!(date_code_to_mjd("20000101").unwrap(), 51544.0, epsilon = 1e-9);

        assert_eq!(
            date_code_to_mjd("2000-1-1"),
            Err(OrreryError::InvalidDateCode("2000-1-1".into()))
        );
        assert!(date_code_to_mjd("20001301.0").is_err());
        assert!(date_code_to_mjd("").is_err());
        assert!(date_code_to_mjd("abc").is_err());
    }

    #[test]
    fn test_clock_time() {
        assert_eq!(clock_time(51544.5), "12:00");
        assert_eq!(clock_time(51544.0 + 90.0 / 1440.0), "01:30");
        assert_eq!(clock_time(51544.9999), "00:00");
    }

    #[test]
    fn test_epoch_interop() {
        let mjd = 60_000.25;
        assert_relative_eq!(epoch_to_mjd(mjd_to_epoch(mjd)), mjd, epsilon = 1e-9);
    }
}
