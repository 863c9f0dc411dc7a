//! Direct geometric scalar switching functions, sampled at a fixed cadence
//! and root-refined by bisection — the substitution for opaque black-box
//! event detectors explicitly sanctioned by SPEC_FULL.md §9.

use anise::constants::frames::SUN_J2000;
use anise::prelude::{Almanac, Frame};
use log::debug;
use nalgebra::Vector3;
use nyx_space::cosmic::Orbit;

use crate::cfg::DetectorThresholds;
use crate::constants::{DETECTOR_CHECK_INTERVAL_S, DETECTOR_CONVERGENCE_S};
use crate::error::Error;
use crate::prelude::{Duration, Epoch};
use crate::satellite::Satellite;
use crate::site::{GeodeticPoint, Site};
use crate::timeline::{Phenomenon, Timeline};

/// Site position in the satellite's inertial frame at `epoch`.
fn site_position_inertial(
    point: &GeodeticPoint,
    epoch: Epoch,
    almanac: &Almanac,
    earth_fixed: Frame,
    inertial: Frame,
) -> Result<Vector3<f64>, Error> {
    let fixed = Orbit::try_latlongalt(
        point.latitude_deg,
        point.longitude_deg,
        point.altitude_m / 1000.0,
        epoch,
        earth_fixed,
    )
    .map_err(Error::Physics)?;

    let inertial_orbit = almanac
        .transform_to(fixed, inertial, None)
        .map_err(Error::Almanac)?;

    Ok(inertial_orbit.radius_km)
}

fn sun_position_inertial(epoch: Epoch, almanac: &Almanac, inertial: Frame) -> Result<Vector3<f64>, Error> {
    let sun = almanac
        .transform(SUN_J2000, inertial, epoch, None)
        .map_err(Error::Almanac)?;
    Ok(sun.radius_km)
}

/// Visibility switching function: positive while the site lies within the
/// satellite's sensor cone (half-aperture `pointing_capacity`) as seen along
/// the nadir boresight, and the satellite is above the site's local horizon
/// (the Earth-masking condition).
fn visibility_value(
    epoch: Epoch,
    satellite: &Satellite,
    site: &GeodeticPoint,
    almanac: &Almanac,
    earth_fixed: Frame,
    inertial: Frame,
) -> Result<f64, Error> {
    let sat_state = satellite.state_at(epoch)?;
    let sat_pos = sat_state.radius_km;
    let site_pos = site_position_inertial(site, epoch, almanac, earth_fixed, inertial)?;

    let site_zenith = site_pos
        .try_normalize(1.0e-9)
        .ok_or_else(|| Error::CinematicViolation("degenerate site position".into()))?;
    let site_to_sat = sat_pos - site_pos;
    let elevation_sin = site_zenith.dot(&site_to_sat.normalize());

    let nadir = -sat_pos
        .try_normalize(1.0e-9)
        .ok_or_else(|| Error::CinematicViolation("degenerate satellite position".into()))?;
    let sat_to_site = (site_pos - sat_pos).normalize();
    let pointing_angle = nadir.dot(&sat_to_site).clamp(-1.0, 1.0).acos();

    let cone_margin = satellite.agility.pointing_capacity_rad() - pointing_angle;

    Ok(elevation_sin.min(cone_margin))
}

/// SunIncidence switching function: positive while the Sun is sufficiently
/// above the site's local horizon. §4.2 states the condition in terms of the
/// site-to-Earth-center vector; measured from the zenith vector instead (its
/// negation) the same condition becomes "angle between zenith and Sun is no
/// more than the configured threshold" — a single supplement, not two.
fn sun_incidence_value(
    epoch: Epoch,
    site: &GeodeticPoint,
    thresholds: &DetectorThresholds,
    almanac: &Almanac,
    earth_fixed: Frame,
    inertial: Frame,
) -> Result<f64, Error> {
    let site_pos = site_position_inertial(site, epoch, almanac, earth_fixed, inertial)?;
    let sun_pos = sun_position_inertial(epoch, almanac, inertial)?;

    let zenith = site_pos
        .try_normalize(1.0e-9)
        .ok_or_else(|| Error::CinematicViolation("degenerate site position".into()))?;
    let to_sun = (sun_pos - site_pos).normalize();

    Ok(sun_incidence_from_vectors(zenith, to_sun, thresholds.max_sun_incidence_angle_deg))
}

/// Pure angle arithmetic behind [sun_incidence_value], split out so the sign
/// convention can be unit tested without resolving an almanac.
fn sun_incidence_from_vectors(zenith: Vector3<f64>, to_sun: Vector3<f64>, max_incidence_deg: f64) -> f64 {
    let angle_deg = zenith.dot(&to_sun).clamp(-1.0, 1.0).acos().to_degrees();
    max_incidence_deg - angle_deg
}

/// NonGlare switching function: positive while the Sun-site-satellite phase
/// angle, apex at the site, is at or above the configured threshold.
fn non_glare_value(
    epoch: Epoch,
    satellite: &Satellite,
    site: &GeodeticPoint,
    thresholds: &DetectorThresholds,
    almanac: &Almanac,
    earth_fixed: Frame,
    inertial: Frame,
) -> Result<f64, Error> {
    let sat_state = satellite.state_at(epoch)?;
    let sat_pos = sat_state.radius_km;
    let site_pos = site_position_inertial(site, epoch, almanac, earth_fixed, inertial)?;
    let sun_pos = sun_position_inertial(epoch, almanac, inertial)?;

    let to_sun = (sun_pos - site_pos).normalize();
    let to_sat = (sat_pos - site_pos).normalize();

    let phase_angle_deg = to_sun.dot(&to_sat).clamp(-1.0, 1.0).acos().to_degrees();

    Ok(phase_angle_deg - thresholds.max_sun_phase_angle_deg)
}

/// Scans `f` across `[start, end]` at a fixed cadence, and for every
/// sign change refines the crossing epoch by bisection. Returns the
/// chronological list of maximal sub-intervals where `f > 0`.
fn scan_positive_intervals<F>(start: Epoch, end: Epoch, mut f: F) -> Result<Vec<(Epoch, Epoch)>, Error>
where
    F: FnMut(Epoch) -> Result<f64, Error>,
{
    let cadence = Duration::from_seconds(DETECTOR_CHECK_INTERVAL_S);
    let convergence = Duration::from_seconds(DETECTOR_CONVERGENCE_S);

    let mut samples = Vec::new();
    let mut t = start;
    while t < end {
        samples.push((t, f(t)?));
        t += cadence;
    }
    samples.push((end, f(end)?));

    let mut intervals = Vec::new();
    let mut open_start: Option<Epoch> = None;

    for window in samples.windows(2) {
        let (t0, v0) = window[0];
        let (t1, v1) = window[1];

        if v0 > 0.0 && open_start.is_none() {
            open_start = Some(t0);
        }

        if (v0 > 0.0) != (v1 > 0.0) {
            let crossing = bisect_crossing(t0, v0, t1, v1, convergence, &mut f)?;
            if v0 > 0.0 {
                // falling edge: close the open interval at the crossing
                if let Some(s) = open_start.take() {
                    intervals.push((s, crossing));
                }
            } else {
                // rising edge: a new interval opens at the crossing
                open_start = Some(crossing);
            }
        }
    }

    if let Some(s) = open_start {
        intervals.push((s, end));
    }

    Ok(intervals)
}

fn bisect_crossing<F>(
    mut t0: Epoch,
    v0: f64,
    mut t1: Epoch,
    mut v1: f64,
    convergence: Duration,
    f: &mut F,
) -> Result<Epoch, Error>
where
    F: FnMut(Epoch) -> Result<f64, Error>,
{
    let mut lo_sign = v0 > 0.0;
    let _ = v1;
    while (t1 - t0) > convergence {
        let mid = t0 + (t1 - t0) * 0.5;
        let v_mid = f(mid)?;
        if (v_mid > 0.0) == lo_sign {
            t0 = mid;
        } else {
            t1 = mid;
            v1 = v_mid;
            lo_sign = v0 > 0.0;
        }
    }
    Ok(t1)
}

/// Evaluates all three detectors for one site across the horizon, each into
/// its own raw timeline, and merges them into one code-tagged timeline
/// (before `apply_and`/filtering).
pub fn scan_site(
    start: Epoch,
    end: Epoch,
    satellite: &Satellite,
    site: &Site,
    thresholds: &DetectorThresholds,
    almanac: &Almanac,
    earth_fixed: Frame,
    inertial: Frame,
) -> Result<Timeline, Error> {
    let mut timeline = Timeline::new(start, end);

    for (code, intervals) in [
        (
            "Visibility",
            scan_positive_intervals(start, end, |t| {
                visibility_value(t, satellite, &site.point, almanac, earth_fixed, inertial)
            })?,
        ),
        (
            "SunIncidence",
            scan_positive_intervals(start, end, |t| {
                sun_incidence_value(t, &site.point, thresholds, almanac, earth_fixed, inertial)
            })?,
        ),
        (
            "NonGlare",
            scan_positive_intervals(start, end, |t| {
                non_glare_value(t, satellite, &site.point, thresholds, almanac, earth_fixed, inertial)
            })?,
        ),
    ] {
        let mut detector_timeline = Timeline::new(start, end);
        for (s, e) in intervals {
            debug!("{} ({}): start-of-{code} / end-of-{code}", site.name, s);
            detector_timeline.add_phenomenon(Phenomenon::new(code, s, e));
        }
        timeline.merge(&detector_timeline);
    }

    Ok(timeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hifitime::Unit;

    fn epoch(offset_s: f64) -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(2024, 1, 1) + offset_s * Unit::Second
    }

    // A switching function positive only on [300, 700) inside [0, 1000):
    // one rising edge, one falling edge, both strictly inside the scan.
    fn single_hump(t: Epoch) -> Result<f64, Error> {
        let s = (t - epoch(0.0)).to_seconds();
        Ok(if (300.0..700.0).contains(&s) { 1.0 } else { -1.0 })
    }

    #[test]
    fn scan_finds_single_interval_and_refines_crossings() {
        let intervals = scan_positive_intervals(epoch(0.0), epoch(1000.0), single_hump).unwrap();
        assert_eq!(intervals.len(), 1);
        let (start, end) = intervals[0];
        assert!((start - epoch(300.0)).to_seconds().abs() < DETECTOR_CONVERGENCE_S * 2.0);
        assert!((end - epoch(700.0)).to_seconds().abs() < DETECTOR_CONVERGENCE_S * 2.0);
    }

    // Always-negative switching function: no phenomenon at all (the
    // "all-dark target" case at the detector level, §8 scenario 6).
    #[test]
    fn always_negative_function_yields_no_intervals() {
        let intervals = scan_positive_intervals(epoch(0.0), epoch(1000.0), |_| Ok(-1.0)).unwrap();
        assert!(intervals.is_empty());
    }

    // Always-positive switching function: a single interval spanning the
    // entire scan, with no internal crossing to refine.
    #[test]
    fn always_positive_function_spans_entire_scan() {
        let intervals = scan_positive_intervals(epoch(0.0), epoch(1000.0), |_| Ok(1.0)).unwrap();
        assert_eq!(intervals, vec![(epoch(0.0), epoch(1000.0))]);
    }

    // Two separate humps produce two separate, chronologically ordered
    // intervals rather than one merged span.
    #[test]
    fn two_humps_yield_two_chronological_intervals() {
        let two_humps = |t: Epoch| -> Result<f64, Error> {
            let s = (t - epoch(0.0)).to_seconds();
            Ok(if (100.0..200.0).contains(&s) || (600.0..800.0).contains(&s) {
                1.0
            } else {
                -1.0
            })
        };
        let intervals = scan_positive_intervals(epoch(0.0), epoch(1000.0), two_humps).unwrap();
        assert_eq!(intervals.len(), 2);
        assert!(intervals[0].0 < intervals[1].0);
    }

    // Bisecting a bracket straddling the rising edge at s=300 converges to
    // within the configured tolerance of the true crossing.
    #[test]
    fn bisect_crossing_converges_to_rising_edge() {
        let convergence = Duration::from_seconds(DETECTOR_CONVERGENCE_S);
        let mut f = single_hump;
        let crossing = bisect_crossing(epoch(200.0), -1.0, epoch(400.0), 1.0, convergence, &mut f).unwrap();
        assert!((crossing - epoch(300.0)).to_seconds().abs() < DETECTOR_CONVERGENCE_S * 2.0);
    }

    // Local solar noon: the Sun sits at the zenith (angle 0), which must
    // unambiguously satisfy "sufficiently above the local horizon" for any
    // positive threshold.
    #[test]
    fn sun_incidence_is_positive_at_local_noon() {
        let zenith = Vector3::new(1.0, 0.0, 0.0);
        let to_sun = zenith;
        assert!(sun_incidence_from_vectors(zenith, to_sun, 90.0) > 0.0);
    }

    // Local solar midnight: the Sun sits opposite the zenith (angle 180),
    // which must fail the daylight condition for any threshold below 180.
    #[test]
    fn sun_incidence_is_negative_at_local_midnight() {
        let zenith = Vector3::new(1.0, 0.0, 0.0);
        let to_sun = -zenith;
        assert!(sun_incidence_from_vectors(zenith, to_sun, 90.0) < 0.0);
    }
}
