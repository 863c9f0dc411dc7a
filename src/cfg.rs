//! Mission configuration: the spec's "constants bundle" made concrete.

use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::prelude::Epoch;

fn default_vts_directory() -> PathBuf {
    PathBuf::from("vts")
}

/// Orbital elements used to seed the satellite's initial Keplerian orbit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct OrbitalElements {
    /// Altitude above the WGS84 equatorial radius, in km.
    pub altitude_km: f64,
    /// Inclination, in degrees.
    pub inclination_deg: f64,
    /// Right ascension of the ascending node, in degrees.
    pub ascending_node_longitude_deg: f64,
    /// Mean eccentricity.
    pub mean_eccentricity: f64,
}

impl Default for OrbitalElements {
    fn default() -> Self {
        Self {
            altitude_km: 694.0,
            inclination_deg: 98.2,
            ascending_node_longitude_deg: 0.0,
            mean_eccentricity: 1.0e-4,
        }
    }
}

/// Agility parameters: the bounded-acceleration slew profile used by
/// [crate::agility::AgilityModel].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct AgilityParams {
    /// Maximum angular rate, in degrees per second.
    pub max_angular_rate_deg_s: f64,
    /// Maximum angular acceleration, in degrees per second squared.
    pub max_angular_accel_deg_s2: f64,
    /// Sensor half-aperture ("pointing capacity"), in degrees.
    pub pointing_capacity_deg: f64,
}

impl Default for AgilityParams {
    fn default() -> Self {
        Self {
            max_angular_rate_deg_s: 2.0,
            max_angular_accel_deg_s2: 1.0,
            pointing_capacity_deg: 20.0,
        }
    }
}

/// Detector thresholds used by the access planner's geometric evaluators.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct DetectorThresholds {
    /// Minimal Sun elevation above the local horizon at the site, in degrees,
    /// expressed the spec's way: `max_sun_incidence_angle_deg` is the
    /// complement used directly by the `SunIncidence` switching function.
    pub max_sun_incidence_angle_deg: f64,
    /// Minimal Sun/target/satellite phase angle tolerated, in degrees.
    pub max_sun_phase_angle_deg: f64,
}

impl Default for DetectorThresholds {
    fn default() -> Self {
        Self {
            max_sun_incidence_angle_deg: 90.0,
            max_sun_phase_angle_deg: 100.0,
        }
    }
}

/// Mission-wide configuration: the spec's constants bundle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// Mission horizon start.
    pub start_date: Epoch,
    /// Mission horizon end.
    pub end_date: Epoch,
    /// Initial orbit.
    #[cfg_attr(feature = "serde", serde(default))]
    pub orbit: OrbitalElements,
    /// Agility model parameters.
    #[cfg_attr(feature = "serde", serde(default))]
    pub agility: AgilityParams,
    /// Access detector thresholds.
    #[cfg_attr(feature = "serde", serde(default))]
    pub detectors: DetectorThresholds,
    /// Fixed observation integration time, in seconds.
    pub integration_time_s: f64,
    /// Directory the visualization writer would emit artifacts into.
    #[cfg_attr(feature = "serde", serde(default = "default_vts_directory"))]
    pub vts_output_directory: PathBuf,
}

impl Config {
    /// Convenience preset mirroring the teacher's `Config::preset(Method)`:
    /// a 24h horizon starting at `start`, with default orbit/agility/detector
    /// parameters and a 10s integration time.
    pub fn preset(start: Epoch) -> Self {
        use hifitime::Unit;
        Self {
            start_date: start,
            end_date: start + 24.0 * Unit::Hour,
            orbit: OrbitalElements::default(),
            agility: AgilityParams::default(),
            detectors: DetectorThresholds::default(),
            integration_time_s: 10.0,
            vts_output_directory: default_vts_directory(),
        }
    }
}
