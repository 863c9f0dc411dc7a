//! Attitude laws: opaque functions from epoch to attitude (quaternion +
//! angular velocity), dispatched by a small kind tag rather than deep
//! inheritance, per the Design Notes.

use anise::prelude::{Almanac, Frame};
use nalgebra::{UnitQuaternion, Vector3};
use nyx_space::cosmic::Orbit;

use crate::error::Error;
use crate::prelude::Epoch;
use crate::site::GeodeticPoint;

/// A single attitude sample: orientation relative to the inertial frame plus
/// the instantaneous angular velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attitude {
    pub orientation: UnitQuaternion<f64>,
    pub angular_velocity_rad_s: Vector3<f64>,
}

impl Attitude {
    pub fn new(orientation: UnitQuaternion<f64>, angular_velocity_rad_s: Vector3<f64>) -> Self {
        Self {
            orientation,
            angular_velocity_rad_s,
        }
    }
}

/// A law producing an [Attitude] at a given epoch, given the satellite's
/// orbital state. Target-pointing laws additionally need the `Almanac` and
/// the Earth-fixed frame to rotate a ground point into the inertial frame.
pub trait AttitudeLaw: std::fmt::Debug {
    fn attitude_at(
        &self,
        epoch: Epoch,
        orbit: &Orbit,
        almanac: &Almanac,
        earth_fixed: Frame,
    ) -> Result<Attitude, Error>;
}

/// Default law: boresight (body +Z) toward the Earth-subsatellite point,
/// body +X along the orbital velocity direction projected orthogonal to +Z.
/// This fixes the open orientation-convention question left by the spec
/// (§9 Open Questions).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NadirPointing;

impl AttitudeLaw for NadirPointing {
    fn attitude_at(
        &self,
        _epoch: Epoch,
        orbit: &Orbit,
        _almanac: &Almanac,
        _earth_fixed: Frame,
    ) -> Result<Attitude, Error> {
        let position = orbit.radius_km;
        let velocity = orbit.velocity_km_s;

        let boresight = boresight_frame(position, velocity)?;
        let angular_rate = orbital_angular_rate(position, velocity);

        Ok(Attitude::new(boresight, angular_rate))
    }
}

/// Target-tracking law: boresight toward a fixed geodetic point on the
/// Earth's surface, re-evaluated at every epoch since the target's position
/// in the inertial frame rotates with the Earth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetGroundPointing {
    pub target: GeodeticPoint,
}

impl TargetGroundPointing {
    pub fn new(target: GeodeticPoint) -> Self {
        Self { target }
    }
}

impl AttitudeLaw for TargetGroundPointing {
    fn attitude_at(
        &self,
        epoch: Epoch,
        orbit: &Orbit,
        almanac: &Almanac,
        earth_fixed: Frame,
    ) -> Result<Attitude, Error> {
        let target_fixed = Orbit::try_latlongalt(
            self.target.latitude_deg,
            self.target.longitude_deg,
            self.target.altitude_m / 1000.0,
            epoch,
            earth_fixed,
        )
        .map_err(Error::Physics)?;

        let target_inertial = almanac
            .transform_to(target_fixed, orbit.frame, None)
            .map_err(Error::Almanac)?;

        let position = orbit.radius_km;
        let velocity = orbit.velocity_km_s;
        let line_of_sight = target_inertial.radius_km - position;

        let boresight = target_pointing_frame(position, velocity, line_of_sight)?;
        // Target tracking during the fixed integration window is treated as
        // quasi-static: the validator only consumes endpoint orientations to
        // derive slew durations, never this law's own angular rate.
        let angular_rate = Vector3::zeros();

        Ok(Attitude::new(boresight, angular_rate))
    }
}

/// Builds the body frame (+Z = boresight, +X = cross-track reference,
/// +Y completes the right-handed triad) from a boresight direction and a
/// reference direction used to fix +X orthogonal to it.
fn frame_from_boresight(boresight: Vector3<f64>, reference: Vector3<f64>) -> Result<UnitQuaternion<f64>, Error> {
    let z = boresight
        .try_normalize(1.0e-9)
        .ok_or_else(|| Error::CinematicViolation("degenerate boresight direction".into()))?;
    let x_raw = reference - z * reference.dot(&z);
    let x = x_raw
        .try_normalize(1.0e-9)
        .ok_or_else(|| Error::CinematicViolation("reference direction parallel to boresight".into()))?;
    let y = z.cross(&x);

    let rotation = nalgebra::Matrix3::from_columns(&[x, y, z]);
    Ok(UnitQuaternion::from_matrix(&rotation))
}

fn boresight_frame(position: Vector3<f64>, velocity: Vector3<f64>) -> Result<UnitQuaternion<f64>, Error> {
    frame_from_boresight(-position, velocity)
}

fn target_pointing_frame(
    position: Vector3<f64>,
    velocity: Vector3<f64>,
    line_of_sight: Vector3<f64>,
) -> Result<UnitQuaternion<f64>, Error> {
    let _ = position;
    frame_from_boresight(line_of_sight, velocity)
}

/// Orbital angular rate around the orbit normal, `|h| / r^2`, used as the
/// nadir law's nominal angular velocity (exact for a circular orbit).
fn orbital_angular_rate(position: Vector3<f64>, velocity: Vector3<f64>) -> Vector3<f64> {
    let h = position.cross(&velocity);
    let r2 = position.norm_squared();
    if r2 < 1.0e-9 {
        return Vector3::zeros();
    }
    let n = h.try_normalize(1.0e-9).unwrap_or_else(Vector3::zeros);
    n * (h.norm() / r2)
}
