//! Visualization writer seam: the bit-level format of the targets POI,
//! trajectory OEM, attitude AEM and leg-sequence MEM files is out of scope
//! (§6) — only the trait and a no-op default are implemented in-crate.

use nyx_space::cosmic::Orbit;

use crate::attitude::Attitude;
use crate::cinematic::CinematicPlan;
use crate::error::Error;
use crate::prelude::Epoch;
use crate::site::Site;

/// Emitter for the mission's visualization artifacts. Each method mirrors
/// one of the four external file writers named in §6: targets POI,
/// trajectory OEM, attitude AEM and leg-sequence MEM. The core only ever
/// produces and hands off these artifacts; it has no opinion on their
/// bit-level format.
pub trait PlanWriter {
    /// Targets POI file: one entry per site considered by the mission.
    fn write_targets(&mut self, sites: &[Site]) -> Result<(), Error>;

    /// Trajectory OEM file: a bounded sequence of `(epoch, state)` samples
    /// of the satellite's propagated orbit across the horizon.
    fn write_trajectory(&mut self, samples: &[(Epoch, Orbit)]) -> Result<(), Error>;

    /// Attitude AEM file: a bounded sequence of `(epoch, attitude)` samples
    /// of the satellite's attitude across the horizon.
    fn write_attitude(&mut self, samples: &[(Epoch, Attitude)]) -> Result<(), Error>;

    /// Leg-sequence MEM file: the assembled cinematic plan.
    fn write_cinematic_plan(&mut self, plan: &CinematicPlan) -> Result<(), Error>;
}

/// Default writer: drops every artifact. Used whenever a mission run has no
/// concrete visualization sink configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullWriter;

impl PlanWriter for NullWriter {
    fn write_targets(&mut self, _sites: &[Site]) -> Result<(), Error> {
        Ok(())
    }

    fn write_trajectory(&mut self, _samples: &[(Epoch, Orbit)]) -> Result<(), Error> {
        Ok(())
    }

    fn write_attitude(&mut self, _samples: &[(Epoch, Attitude)]) -> Result<(), Error> {
        Ok(())
    }

    fn write_cinematic_plan(&mut self, _plan: &CinematicPlan) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::GeodeticPoint;
    use anise::constants::frames::EARTH_J2000;
    use hifitime::Unit;
    use nalgebra::{UnitQuaternion, Vector3};

    fn epoch(offset_s: f64) -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(2024, 1, 1) + offset_s * Unit::Second
    }

    #[test]
    fn null_writer_accepts_every_artifact() {
        let mut writer = NullWriter;
        let sites = vec![Site::new("Paris", 10.0, GeodeticPoint::new(48.8566, 2.3522, 35.0))];
        assert!(writer.write_targets(&sites).is_ok());

        let attitude_samples = vec![(epoch(0.0), Attitude::new(UnitQuaternion::identity(), Vector3::zeros()))];
        assert!(writer.write_attitude(&attitude_samples).is_ok());

        let trajectory_samples = vec![(
            epoch(0.0),
            Orbit::cartesian(7000.0, 0.0, 0.0, 0.0, 7.5, 0.0, epoch(0.0), EARTH_J2000),
        )];
        assert!(writer.write_trajectory(&trajectory_samples).is_ok());

        let plan = crate::cinematic::test_support::from_legs(vec![]);
        assert!(writer.write_cinematic_plan(&plan).is_ok());
    }
}
