//! Attitude legs: the cinematic plan's atomic chronological unit.

use anise::prelude::{Almanac, Frame};
use nyx_space::cosmic::Orbit;

use crate::attitude::{Attitude, AttitudeLaw, NadirPointing, TargetGroundPointing};
use crate::error::Error;
use crate::prelude::{Duration, Epoch};
use crate::site::Site;

/// Leg category, used by the Validator and by plan invariants that only
/// care about the shape of the sequence (e.g. "observation legs in
/// ascending order").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegKind {
    NadirLaw,
    ObservationLaw,
    Slew,
}

/// The law driving a leg. `Slew` is a distinct variant carrying its own
/// endpoint attitudes rather than a law subclass, per the Design Notes.
#[derive(Debug, Clone, PartialEq)]
pub enum LegLaw {
    Nadir(NadirPointing),
    Target(TargetGroundPointing),
    Slew {
        start_attitude: Attitude,
        end_attitude: Attitude,
    },
}

/// A single attitude leg: a named, timed, typed segment of the cinematic
/// plan.
#[derive(Debug, Clone, PartialEq)]
pub struct AttitudeLeg {
    pub name: String,
    pub kind: LegKind,
    pub start: Epoch,
    pub end: Epoch,
    pub law: LegLaw,
    /// Set for legs produced from a scheduled observation; `None` for nadir
    /// and slew legs.
    pub site: Option<Site>,
}

impl AttitudeLeg {
    pub fn nadir(name: impl Into<String>, start: Epoch, end: Epoch) -> Self {
        Self {
            name: name.into(),
            kind: LegKind::NadirLaw,
            start,
            end,
            law: LegLaw::Nadir(NadirPointing),
            site: None,
        }
    }

    pub fn observation(name: impl Into<String>, start: Epoch, end: Epoch, site: Site) -> Self {
        Self {
            name: name.into(),
            kind: LegKind::ObservationLaw,
            start,
            end,
            law: LegLaw::Target(TargetGroundPointing::new(site.point)),
            site: Some(site),
        }
    }

    pub fn slew(
        name: impl Into<String>,
        start: Epoch,
        end: Epoch,
        start_attitude: Attitude,
        end_attitude: Attitude,
    ) -> Self {
        Self {
            name: name.into(),
            kind: LegKind::Slew,
            start,
            end,
            law: LegLaw::Slew {
                start_attitude,
                end_attitude,
            },
            site: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Attitude at `epoch`, which must lie within `[self.start, self.end]`.
    /// Law legs delegate to their [AttitudeLaw]; slew legs interpolate with
    /// a constant-spin SLERP at constant angular rate.
    pub fn attitude_at(
        &self,
        epoch: Epoch,
        orbit: &Orbit,
        almanac: &Almanac,
        earth_fixed: Frame,
    ) -> Result<Attitude, Error> {
        match &self.law {
            LegLaw::Nadir(law) => law.attitude_at(epoch, orbit, almanac, earth_fixed),
            LegLaw::Target(law) => law.attitude_at(epoch, orbit, almanac, earth_fixed),
            LegLaw::Slew {
                start_attitude,
                end_attitude,
            } => {
                let total = (self.end - self.start).to_seconds();
                let fraction = if total <= 0.0 {
                    1.0
                } else {
                    ((epoch - self.start).to_seconds() / total).clamp(0.0, 1.0)
                };
                let orientation = start_attitude
                    .orientation
                    .slerp(&end_attitude.orientation, fraction);

                let relative = start_attitude.orientation.inverse() * end_attitude.orientation;
                let axis = relative.axis().map(|a| a.into_inner()).unwrap_or_else(nalgebra::Vector3::zeros);
                let rate = if total > 0.0 {
                    relative.angle() / total
                } else {
                    0.0
                };

                Ok(Attitude::new(orientation, axis * rate))
            },
        }
    }

    /// Boundary attitudes for a slew leg (stored directly rather than
    /// re-evaluated), used by the Validator.
    pub fn slew_endpoints(&self) -> Option<(Attitude, Attitude)> {
        match self.law {
            LegLaw::Slew {
                start_attitude,
                end_attitude,
            } => Some((start_attitude, end_attitude)),
            _ => None,
        }
    }
}
