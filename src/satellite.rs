//! The satellite: initial Keplerian orbit, default attitude law and agility
//! parameters. Propagation is a closed-form two-body Kepler solve rather
//! than a registered-event propagator, per the substitution sanctioned in
//! SPEC_FULL.md §9 ("Propagator re-use").

use anise::prelude::Frame;
use nyx_space::cosmic::Orbit;

use crate::agility::AgilityModel;
use crate::cfg::{AgilityParams, OrbitalElements};
use crate::constants::{EARTH_EQUATORIAL_RADIUS_KM, EARTH_MU_KM3_S2};
use crate::error::Error;
use crate::prelude::Epoch;

/// Satellite state: owns the initial orbit and derived agility model.
/// `assembly_with_sensor` in the spec's data model collapses here into the
/// sensor half-aperture carried by [AgilityModel].
#[derive(Debug, Clone)]
pub struct Satellite {
    initial: Orbit,
    pub agility: AgilityModel,
}

impl Satellite {
    /// Builds a satellite on a near-circular Keplerian orbit (argument of
    /// perigee and true anomaly at epoch fixed to zero: the mission only
    /// cares about sun-synchronous-like near-circular geometries).
    pub fn new(elements: &OrbitalElements, agility: AgilityParams, epoch: Epoch, frame: Frame) -> Self {
        let sma_km = EARTH_EQUATORIAL_RADIUS_KM + elements.altitude_km;
        let initial = Orbit::keplerian(
            sma_km,
            elements.mean_eccentricity,
            elements.inclination_deg,
            elements.ascending_node_longitude_deg,
            0.0,
            0.0,
            epoch,
            frame,
        );
        Self {
            initial,
            agility: AgilityModel::new(agility),
        }
    }

    /// Orbital state (position/velocity, inertial frame) at `epoch`, via
    /// closed-form two-body propagation from the initial orbit. Any physics
    /// failure from the backend is surfaced as a [Error::Propagation] tied
    /// to the requested epoch.
    pub fn state_at(&self, epoch: Epoch) -> Result<Orbit, Error> {
        keplerian_propagate(&self.initial, epoch)
            .map_err(|e| Error::Propagation(epoch, e.to_string()))
    }
}

/// Closed-form two-body Kepler propagation: mean anomaly advances linearly
/// with the mean motion, Kepler's equation is solved by Newton-Raphson for
/// the eccentric anomaly, and the resulting position/velocity in the
/// perifocal frame is rotated into the orbit's reference frame by the
/// standard 3-1-3 (RAAN, inclination, argument of perigee) rotation.
fn keplerian_propagate(initial: &Orbit, epoch: Epoch) -> Result<Orbit, anise::errors::PhysicsError> {
    let sma_km = initial.sma_km()?;
    let ecc = initial.ecc()?;
    let inc_rad = initial.inc_deg()?.to_radians();
    let raan_rad = initial.raan_deg()?.to_radians();
    let aop_rad = initial.aop_deg()?.to_radians();
    let ta0_rad = initial.ta_deg()?.to_radians();

    let mu = EARTH_MU_KM3_S2;
    let n = (mu / sma_km.powi(3)).sqrt(); // mean motion, rad/s

    let ea0 = true_to_eccentric_anomaly(ta0_rad, ecc);
    let m0 = ea0 - ecc * ea0.sin();

    let dt_s = (epoch - initial.epoch).to_seconds();
    let m = m0 + n * dt_s;

    let ea = solve_kepler(m, ecc);
    let ta = eccentric_to_true_anomaly(ea, ecc);

    let p_km = sma_km * (1.0 - ecc * ecc);
    let r_km = p_km / (1.0 + ecc * ta.cos());

    // Perifocal frame position/velocity.
    let pf_pos = nalgebra::Vector3::new(r_km * ta.cos(), r_km * ta.sin(), 0.0);
    let h = (mu * p_km).sqrt();
    let pf_vel = nalgebra::Vector3::new(-mu / h * ta.sin(), mu / h * (ecc + ta.cos()), 0.0);

    let rot = perifocal_to_inertial(raan_rad, inc_rad, aop_rad);
    let pos = rot * pf_pos;
    let vel = rot * pf_vel;

    Ok(Orbit::cartesian(
        pos.x, pos.y, pos.z, vel.x, vel.y, vel.z, epoch, initial.frame,
    ))
}

fn true_to_eccentric_anomaly(ta: f64, ecc: f64) -> f64 {
    let (sin_ta, cos_ta) = (ta.sin(), ta.cos());
    let sin_ea = sin_ta * (1.0 - ecc * ecc).sqrt() / (1.0 + ecc * cos_ta);
    let cos_ea = (ecc + cos_ta) / (1.0 + ecc * cos_ta);
    sin_ea.atan2(cos_ea)
}

fn eccentric_to_true_anomaly(ea: f64, ecc: f64) -> f64 {
    let (sin_ea, cos_ea) = (ea.sin(), ea.cos());
    let sin_ta = sin_ea * (1.0 - ecc * ecc).sqrt() / (1.0 - ecc * cos_ea);
    let cos_ta = (cos_ea - ecc) / (1.0 - ecc * cos_ea);
    sin_ta.atan2(cos_ta)
}

fn solve_kepler(m: f64, ecc: f64) -> f64 {
    let m = m.rem_euclid(std::f64::consts::TAU);
    let mut ea = if ecc < 0.8 { m } else { std::f64::consts::PI };
    for _ in 0..50 {
        let f = ea - ecc * ea.sin() - m;
        let f_prime = 1.0 - ecc * ea.cos();
        let delta = f / f_prime;
        ea -= delta;
        if delta.abs() < 1.0e-12 {
            break;
        }
    }
    ea
}

fn perifocal_to_inertial(raan: f64, inc: f64, aop: f64) -> nalgebra::Matrix3<f64> {
    let rot_raan = nalgebra::Matrix3::new(
        raan.cos(), -raan.sin(), 0.0,
        raan.sin(), raan.cos(), 0.0,
        0.0, 0.0, 1.0,
    );
    let rot_inc = nalgebra::Matrix3::new(
        1.0, 0.0, 0.0,
        0.0, inc.cos(), -inc.sin(),
        0.0, inc.sin(), inc.cos(),
    );
    let rot_aop = nalgebra::Matrix3::new(
        aop.cos(), -aop.sin(), 0.0,
        aop.sin(), aop.cos(), 0.0,
        0.0, 0.0, 1.0,
    );
    rot_raan * rot_inc * rot_aop
}
