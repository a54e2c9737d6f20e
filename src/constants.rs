//! # Constants and type definitions for Orrery
//!
//! This module centralizes the **physical constants**, **time-scale anchors**, and **common type
//! aliases** used throughout the `orrery` crate.
//!
//! ## Overview
//!
//! - Astronomical and geophysical constants
//! - Unit conversions (degrees ↔ radians, days ↔ milliseconds, AU ↔ km)
//! - Time-scale anchors (Unix epoch, J2000, days per ephemeris century)
//! - Barycentric mass ratios of the two double systems drawn by the engine
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Hours → degrees
pub const DEG_PER_HOUR: f64 = 15.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// Earth equatorial radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6_378.137;

/// Earth radius expressed in astronomical units
pub const ERAU: f64 = EARTH_RADIUS_KM / AU;

/// Fixed obliquity of the ecliptic used by the celestial frame (degrees)
pub const OBLIQUITY_DEG: f64 = 23.43928;

/// Assumed bulk density used to estimate a mass from a radius (kg/m³)
pub const BULK_DENSITY: f64 = 2_500.0;

/// Unit of the `mass` field of an input record, in kilograms
pub const RECORD_MASS_UNIT: f64 = 1e18;

/// Heliocentric gravitational parameter in AU³ per century².
///
/// A body at 1 AU on a circular orbit completes one revolution in 1/100 century,
/// so `GM = (200π)²` in these units.
pub const GM_SUN: f64 = (100.0 * DPI) * (100.0 * DPI);

/// Newtonian gravitational constant (m³ kg⁻¹ s⁻²)
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674_30e-11;

// -------------------------------------------------------------------------------------------------
// Time
// -------------------------------------------------------------------------------------------------

/// Milliseconds in a day
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// MJD of the Unix epoch (1970-01-01T00:00:00 UTC)
pub const UNIX_EPOCH_MJD: f64 = 40_587.0;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00)
pub const T2000: f64 = 51_544.5;

/// Days per ephemeris century
pub const DAYS_PER_CENTURY: f64 = 36_525.6363;

// -------------------------------------------------------------------------------------------------
// Barycentric pairs
// -------------------------------------------------------------------------------------------------

/// Distance of the Earth–Moon barycenter from the Earth center, over the mean
/// Earth–Moon distance
pub const EARTH_MOON_BARY_RATIO: f64 = 4_670.0 / 388_400.0;

/// Distance of the Pluto–Charon barycenter from the Pluto center, over the mean
/// Pluto–Charon distance
pub const PLUTO_CHARON_BARY_RATIO: f64 = 2_110.0 / 19_600.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Right ascension in hours
pub type Hour = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
/// Ephemeris time: Julian centuries since J2000
pub type Centuries = f64;
