//! Brightness models: phase integrals, apparent magnitude and atmospheric extinction.

use std::f64::consts::PI;

use crate::constants::{AstronomicalUnit, Degree, Radian, AU, RADEG};

/// Zenith extinction coefficient (magnitudes per airmass)
pub const EXTINCTION_COEFFICIENT: f64 = 0.129;

/// Heliocentric gravitational parameter, m³/s²
pub const GM_SUN_SI: f64 = 1.327_124_400_18e20;

/// Phase integral of a Lambertian sphere, used for planets and moons.
///
/// `Φ(α) = 2/3 · ((1 − α/π) cos α + sin α / π)`
pub fn cosine_phase_integral(alpha: Radian) -> f64 {
    let alpha = alpha.clamp(0.0, PI);
    2.0 / 3.0 * ((1.0 - alpha / PI) * alpha.cos() + alpha.sin() / PI)
}

/// IAU H-G phase integral with slope parameter `slope`.
///
/// `Φ(α) = (1 − G) exp(−3.33 tan(α/2)^0.63) + G exp(−1.87 tan(α/2)^1.22)`
pub fn hg_phase_integral(alpha: Radian, slope: f64) -> f64 {
    let tan_half = (alpha.clamp(0.0, PI) / 2.0).tan();
    let phi1 = (-3.33 * tan_half.powf(0.63)).exp();
    let phi2 = (-1.87 * tan_half.powf(1.22)).exp();
    (1.0 - slope) * phi1 + slope * phi2
}

/// Sun-body-observer angle from the three sides of the triangle.
///
/// Arguments
/// ---------
/// * `to_sun`: body to Sun distance
/// * `to_observer`: body to observer distance
/// * `observer_to_sun`: observer to Sun distance
///
/// Return
/// ------
/// * the phase angle in `[0, π]`; the cosine is clamped so rounding never yields NaN
pub fn phase_angle(
    to_sun: AstronomicalUnit,
    to_observer: AstronomicalUnit,
    observer_to_sun: AstronomicalUnit,
) -> Radian {
    if to_sun <= 0.0 || to_observer <= 0.0 {
        return 0.0;
    }
    let cos_alpha = (to_observer * to_observer + to_sun * to_sun
        - observer_to_sun * observer_to_sun)
        / (2.0 * to_observer * to_sun);
    cos_alpha.clamp(-1.0, 1.0).acos()
}

/// Apparent magnitude `H + 5 log10(r Δ) − 2.5 log10(Φ)`.
///
/// Returns `None` for a non-positive distance or phase integral.
pub fn apparent_magnitude(
    absolute_magnitude: f64,
    to_sun: AstronomicalUnit,
    to_observer: AstronomicalUnit,
    phase_integral: f64,
) -> Option<f64> {
    if to_sun <= 0.0 || to_observer <= 0.0 || phase_integral <= 0.0 {
        return None;
    }
    Some(
        absolute_magnitude + 5.0 * (to_sun * to_observer).log10()
            - 2.5 * phase_integral.log10(),
    )
}

/// Magnitude dimmed by the atmosphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extinction {
    pub magnitude: f64,
    pub airmass: f64,
}

/// Atmospheric extinction of a source of magnitude `magnitude` at altitude `altitude`.
///
/// The plane-parallel airmass `1/cos z` is capped by `max(20, 6.2 z − 520)` (z in
/// degrees), and the cap is used as is at or below the horizon.
pub fn extinction(magnitude: f64, altitude: Degree) -> Extinction {
    let zenith = 90.0 - altitude;
    let cap = (6.2 * zenith - 520.0).max(20.0);
    let cos_z = (zenith * RADEG).cos();
    let airmass = if cos_z > 0.0 {
        (1.0 / cos_z).min(cap)
    } else {
        cap
    };
    Extinction {
        magnitude: magnitude + EXTINCTION_COEFFICIENT * airmass,
        airmass,
    }
}

/// Orbital speed (km/s) from the vis-viva equation `v² = μ (2/r − 1/a)`.
///
/// Arguments
/// ---------
/// * `mu`: gravitational parameter of the central body, m³/s²
/// * `distance`: distance to the central body, AU
/// * `inverse_semi_major_axis`: `1/a` in AU⁻¹, zero for a parabola, negative for a hyperbola
pub fn vis_viva_speed(mu: f64, distance: AstronomicalUnit, inverse_semi_major_axis: f64) -> f64 {
    let au_m = AU * 1000.0;
    let r = distance * au_m;
    if r <= 0.0 {
        return 0.0;
    }
    let v2 = mu * (2.0 / r - inverse_semi_major_axis / au_m);
    v2.max(0.0).sqrt() / 1000.0
}

#[cfg(test)]
mod photometry_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_phase_integrals_at_full_phase() {
        assert_relative_eq!(hg_phase_integral(0.0, 0.15), 1.0);
        assert_relative_eq!(cosine_phase_integral(0.0), 2.0 / 3.0);
        assert_relative_eq!(cosine_phase_integral(PI), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_phase_integrals_decrease() {
        let mut last_hg = f64::INFINITY;
        let mut last_cos = f64::INFINITY;
        for k in 0..18 {
            let alpha = k as f64 * 10.0 * RADEG;
            let hg = hg_phase_integral(alpha, 0.15);
            let cos = cosine_phase_integral(alpha);
            assert!(hg < last_hg && cos < last_cos);
            last_hg = hg;
            last_cos = cos;
        }
    }

    #[test]
    fn test_phase_angle_clamped() {
        // inconsistent sides push the cosine past 1
        let alpha = phase_angle(2.0, 1.0, 0.999_999_999_9);
        assert_eq!(alpha, 0.0);
        assert_relative_eq!(phase_angle(1.0, 1.0, 2.0_f64.sqrt()), PI / 2.0, epsilon = 1e-12);
        assert_eq!(phase_angle(0.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_apparent_magnitude() {
        // at 1 AU from both Sun and observer at zero phase, m = H
        assert_relative_eq!(apparent_magnitude(5.0, 1.0, 1.0, 1.0).unwrap(), 5.0);
        let m = apparent_magnitude(3.34, 2.77, 1.8, hg_phase_integral(0.2, 0.12)).unwrap();
        assert!(m > 6.0 && m < 9.0, "m = {m}");
        assert_eq!(apparent_magnitude(5.0, 0.0, 1.0, 1.0), None);
        assert_eq!(apparent_magnitude(5.0, 1.0, 1.0, 0.0), None);
    }

    #[test]
    fn test_extinction_at_zenith() {
        let ext = extinction(1.0, 90.0);
        assert_relative_eq!(ext.airmass, 1.0);
        assert_relative_eq!(ext.magnitude, 1.129, epsilon = 1e-12);
    }

    #[test]
    fn test_extinction_cap() {
        // z = 89: 1/cos z ≈ 57.3, cap = 6.2·89 − 520 = 31.8
        let ext = extinction(0.0, 1.0);
        assert_relative_eq!(ext.airmass, 31.8, epsilon = 1e-9);
        // z = 85: 1/cos z ≈ 11.47 is below the floor of the cap
        let ext = extinction(0.0, 5.0);
        assert_relative_eq!(ext.airmass, 1.0 / (85.0 * RADEG).cos(), epsilon = 1e-12);
        // below the horizon the capped value stays finite and positive
        let ext = extinction(0.0, -10.0);
        assert_relative_eq!(ext.airmass, 6.2 * 100.0 - 520.0, epsilon = 1e-9);
    }

    #[test]
    fn test_vis_viva() {
        // Earth on a circular orbit: about 29.8 km/s
        let v = vis_viva_speed(GM_SUN_SI, 1.0, 1.0);
        assert_relative_eq!(v, 29.78, epsilon = 0.01);
        // escape speed at 1 AU
        let v = vis_viva_speed(GM_SUN_SI, 1.0, 0.0);
        assert_relative_eq!(v, 29.78 * 2f64.sqrt(), epsilon = 0.02);
        assert_eq!(vis_viva_speed(GM_SUN_SI, 0.0, 1.0), 0.0);
    }
}
