//! Unit system for the simulation.
//!
//! All simulation state is normalized to earth masses, earth radii and
//! days. Any consistent unit system would do; this one keeps planetary
//! scenarios in human-readable magnitudes (Earth has mass 1, radius 1, and
//! orbits at ~403 radii/day).

/// Earth mass in kilograms.
pub const EARTH_MASS_KG: f64 = 5.9742e24;

/// Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6.371e6;

/// One day in seconds.
pub const DAY_SECONDS: f64 = 86_400.0;

/// One year in days.
pub const YEAR_DAYS: f64 = 365.24;

/// One astronomical unit in meters.
pub const AU_M: f64 = 149_597_870_700.0;

/// Newtonian gravitational constant in m³ kg⁻¹ s⁻².
pub const GRAVITY_CONSTANT_SI: f64 = 6.6743e-11;

/// Gravitational constant scaled to earth-radii³ / (earth-mass · day²).
///
/// `G ≈ 1.151e4` in these units.
pub const G: f64 =
    GRAVITY_CONSTANT_SI * EARTH_MASS_KG / (EARTH_RADIUS_M * EARTH_RADIUS_M * EARTH_RADIUS_M)
        * DAY_SECONDS
        * DAY_SECONDS;

/// Converts a length in astronomical units to earth radii.
pub fn au_to_earth_radii(au: f64) -> f64 {
    au * (AU_M / EARTH_RADIUS_M)
}

/// Converts a length in earth radii to astronomical units.
pub fn earth_radii_to_au(radii: f64) -> f64 {
    radii * (EARTH_RADIUS_M / AU_M)
}

/// Converts a speed in km/s to earth radii per day.
pub fn km_s_to_earth_radii_per_day(km_s: f64) -> f64 {
    km_s * 1000.0 * DAY_SECONDS / EARTH_RADIUS_M
}
