//! Cinematic Plan Assembler: stitches the observation plan into a strict,
//! gap-free chronological sequence of attitude legs.

use anise::prelude::{Almanac, Frame};
use log::info;

use crate::attitude::{AttitudeLaw, NadirPointing, TargetGroundPointing};
use crate::error::Error;
use crate::leg::AttitudeLeg;
use crate::prelude::Epoch;
use crate::satellite::Satellite;
use crate::scheduler::ObservationPlan;

/// The assembled, gap-free leg sequence covering `[H_start, H_end]`.
#[derive(Debug, Clone, Default)]
pub struct CinematicPlan {
    legs: Vec<AttitudeLeg>,
}

impl CinematicPlan {
    pub fn legs(&self) -> &[AttitudeLeg] {
        &self.legs
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use super::{AttitudeLeg, CinematicPlan};

    pub fn from_legs(legs: Vec<AttitudeLeg>) -> CinematicPlan {
        CinematicPlan { legs }
    }
}

fn nadir_attitude(
    satellite: &Satellite,
    epoch: Epoch,
    almanac: &Almanac,
    earth_fixed: Frame,
) -> Result<crate::attitude::Attitude, Error> {
    let orbit = satellite.state_at(epoch)?;
    NadirPointing.attitude_at(epoch, &orbit, almanac, earth_fixed)
}

fn target_attitude(
    satellite: &Satellite,
    law: &TargetGroundPointing,
    epoch: Epoch,
    almanac: &Almanac,
    earth_fixed: Frame,
) -> Result<crate::attitude::Attitude, Error> {
    let orbit = satellite.state_at(epoch)?;
    law.attitude_at(epoch, &orbit, almanac, earth_fixed)
}

/// Assembles the cinematic plan. With zero scheduled observations the plan
/// degenerates to a single nadir leg spanning the entire horizon, per §4.5.
pub fn assemble_cinematic_plan(
    start: Epoch,
    end: Epoch,
    observations: &ObservationPlan,
    satellite: &Satellite,
    almanac: &Almanac,
    earth_fixed: Frame,
) -> Result<CinematicPlan, Error> {
    let s_max = satellite.agility.max_slew_duration();
    let sorted = observations.sorted_by_start();
    let mut legs = Vec::new();

    if sorted.is_empty() {
        info!("cinematic plan: no scheduled observations, nadir over the full horizon");
        legs.push(AttitudeLeg::nadir("Nadir_Law_1", start, end));
        return Ok(CinematicPlan { legs });
    }

    let (first_site, first_obs) = sorted[0];
    let nadir_end = first_obs.start - s_max;

    legs.push(AttitudeLeg::nadir("Nadir_Law_1", start, nadir_end));

    let nadir_att = nadir_attitude(satellite, nadir_end, almanac, earth_fixed)?;
    let first_obs_att = observation_start_attitude(satellite, first_site, first_obs, almanac, earth_fixed)?;
    legs.push(AttitudeLeg::slew(
        "Slew_Nadir_to_O_1",
        nadir_end,
        first_obs.start,
        nadir_att,
        first_obs_att,
    ));

    for (i, (site, obs_leg)) in sorted.iter().enumerate() {
        legs.push(obs_leg.clone());

        if i + 1 < sorted.len() {
            let (next_site, next_obs) = sorted[i + 1];
            let gap = next_obs.start - obs_leg.end;

            let obs_end_att = observation_end_attitude(satellite, site, obs_leg, almanac, earth_fixed)?;
            let next_start_att =
                observation_start_attitude(satellite, next_site, next_obs, almanac, earth_fixed)?;

            if gap > s_max + s_max {
                let nadir_start = obs_leg.end + s_max;
                let nadir_end_inter = next_obs.start - s_max;

                let nadir_att_out = nadir_attitude(satellite, nadir_start, almanac, earth_fixed)?;
                legs.push(AttitudeLeg::slew(
                    format!("Slew_{}_to_Nadir", site.name),
                    obs_leg.end,
                    nadir_start,
                    obs_end_att,
                    nadir_att_out,
                ));

                legs.push(AttitudeLeg::nadir("Nadir_Law_Inter", nadir_start, nadir_end_inter));

                let nadir_att_in = nadir_attitude(satellite, nadir_end_inter, almanac, earth_fixed)?;
                legs.push(AttitudeLeg::slew(
                    format!("Slew_Nadir_to_{}", next_site.name),
                    nadir_end_inter,
                    next_obs.start,
                    nadir_att_in,
                    next_start_att,
                ));
            } else {
                legs.push(AttitudeLeg::slew(
                    format!("Slew_{}_to_{}", site.name, next_site.name),
                    obs_leg.end,
                    next_obs.start,
                    obs_end_att,
                    next_start_att,
                ));
            }
        }
    }

    let (last_site, last_obs) = sorted[sorted.len() - 1];
    let last_end = last_obs.end + s_max;
    let last_obs_att = observation_end_attitude(satellite, last_site, last_obs, almanac, earth_fixed)?;
    let nadir_att_final = nadir_attitude(satellite, last_end, almanac, earth_fixed)?;

    legs.push(AttitudeLeg::slew(
        "Slew_O_n_to_Nadir",
        last_obs.end,
        last_end,
        last_obs_att,
        nadir_att_final,
    ));
    legs.push(AttitudeLeg::nadir("Nadir_Law_2", last_end, end));

    info!("cinematic plan: {} legs assembled", legs.len());
    Ok(CinematicPlan { legs })
}

fn observation_start_attitude(
    satellite: &Satellite,
    site: &crate::site::Site,
    leg: &AttitudeLeg,
    almanac: &Almanac,
    earth_fixed: Frame,
) -> Result<crate::attitude::Attitude, Error> {
    target_attitude(
        satellite,
        &TargetGroundPointing::new(site.point),
        leg.start,
        almanac,
        earth_fixed,
    )
}

fn observation_end_attitude(
    satellite: &Satellite,
    site: &crate::site::Site,
    leg: &AttitudeLeg,
    almanac: &Almanac,
    earth_fixed: Frame,
) -> Result<crate::attitude::Attitude, Error> {
    target_attitude(
        satellite,
        &TargetGroundPointing::new(site.point),
        leg.end,
        almanac,
        earth_fixed,
    )
}
