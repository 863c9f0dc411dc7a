//! Mission driver: owns the site list, satellite, configuration and almanac,
//! and runs the three core stages end to end.

use anise::constants::frames::{EARTH_ITRF93, EARTH_J2000};
use anise::prelude::{Almanac, Frame};
use log::{error, info};

use crate::access::{compute_access_plan, AccessPlan};
use crate::attitude::{Attitude, AttitudeLaw, NadirPointing};
use crate::cfg::Config;
use crate::cinematic::{assemble_cinematic_plan, CinematicPlan};
use crate::constants::WRITER_SAMPLE_CADENCE_S;
use crate::error::Error;
use crate::prelude::Epoch;
use crate::satellite::Satellite;
use crate::scheduler::{schedule_observations, ObservationPlan};
use crate::site::Site;
use crate::validator::{ValidationReport, Validator};
use crate::writer::PlanWriter;
use hifitime::Unit;
use nyx_space::cosmic::Orbit;

/// Owns everything a single mission run needs: the ranked site list, the
/// satellite, the mission configuration and a shared `Almanac`.
pub struct Mission {
    sites: Vec<Site>,
    satellite: Satellite,
    cfg: Config,
    almanac: Almanac,
    earth_fixed: Frame,
    inertial: Frame,
}

impl Mission {
    /// Builds a new [Mission]. Loads a default `Almanac` valid until 2035,
    /// mirroring the teacher's `Almanac::until_2035()` bring-up.
    pub fn new(cfg: Config, sites: Vec<Site>) -> Result<Self, Error> {
        let almanac = Almanac::until_2035().map_err(Error::Almanac)?;

        let inertial = almanac
            .frame_from_uid(EARTH_J2000)
            .map_err(Error::EarthFrame)?;
        let earth_fixed = almanac
            .frame_from_uid(EARTH_ITRF93)
            .map_err(Error::EarthFrame)?;

        let satellite = Satellite::new(&cfg.orbit, cfg.agility, cfg.start_date, inertial);

        info!(
            "mission initialized: {} site(s), horizon [{}, {}]",
            sites.len(),
            cfg.start_date,
            cfg.end_date
        );

        Ok(Self {
            sites,
            satellite,
            cfg,
            almanac,
            earth_fixed,
            inertial,
        })
    }

    pub fn access_plan(&self) -> AccessPlan {
        compute_access_plan(
            self.cfg.start_date,
            self.cfg.end_date,
            &self.satellite,
            &self.sites,
            &self.cfg.detectors,
            self.cfg.integration_time_s,
            &self.almanac,
            self.earth_fixed,
            self.inertial,
        )
    }

    /// Runs access computation, scheduling and cinematic assembly in order,
    /// validates the result, writes visualization artifacts through `writer`,
    /// and returns the plan together with its score.
    pub fn run(&self, writer: &mut impl PlanWriter) -> Result<(CinematicPlan, f64), Error> {
        info!("mission run: starting access computation");
        let access_plan = self.access_plan();

        info!("mission run: scheduling observations");
        let max_slew = self.satellite.agility.max_slew_duration();
        let observation_plan = schedule_observations(
            &access_plan,
            self.cfg.integration_time_s,
            max_slew,
            &self.sites,
        );

        info!(
            "mission run: {} of {} site(s) scheduled",
            observation_plan.entries().len(),
            self.sites.len()
        );

        info!("mission run: assembling cinematic plan");
        let plan = assemble_cinematic_plan(
            self.cfg.start_date,
            self.cfg.end_date,
            &observation_plan,
            &self.satellite,
            &self.almanac,
            self.earth_fixed,
        )?;

        let agility = self.satellite.agility;
        let report = Validator::new(&agility).validate(&plan);
        if !report.is_valid() {
            error!("mission run: cinematic plan invalid ({} violation(s))", report.violations.len());
            return Err(cinematic_violation_error(&report));
        }

        let score = score_observation_plan(&observation_plan);
        info!("mission run: plan valid, score = {score}");

        writer.write_targets(&self.sites)?;
        writer.write_trajectory(&self.sample_trajectory()?)?;
        writer.write_attitude(&self.sample_attitude()?)?;
        writer.write_cinematic_plan(&plan)?;

        Ok((plan, score))
    }

    /// Samples the satellite's propagated orbit across the horizon at
    /// [WRITER_SAMPLE_CADENCE_S], for the trajectory OEM writer.
    fn sample_trajectory(&self) -> Result<Vec<(Epoch, Orbit)>, Error> {
        self.sample_horizon(|epoch| self.satellite.state_at(epoch))
    }

    /// Samples the satellite's default nadir-pointing attitude across the
    /// horizon, for the attitude AEM writer. The cinematic plan's own
    /// target-pointing/slew legs carry their own attitude samples and are
    /// not re-sampled here; this is the always-available default law.
    fn sample_attitude(&self) -> Result<Vec<(Epoch, Attitude)>, Error> {
        self.sample_horizon(|epoch| {
            let orbit = self.satellite.state_at(epoch)?;
            NadirPointing.attitude_at(epoch, &orbit, &self.almanac, self.earth_fixed)
        })
    }

    fn sample_horizon<T>(
        &self,
        mut sample_at: impl FnMut(Epoch) -> Result<T, Error>,
    ) -> Result<Vec<(Epoch, T)>, Error> {
        let cadence = WRITER_SAMPLE_CADENCE_S * Unit::Second;
        let mut samples = Vec::new();
        let mut epoch = self.cfg.start_date;
        while epoch < self.cfg.end_date {
            samples.push((epoch, sample_at(epoch)?));
            epoch += cadence;
        }
        samples.push((self.cfg.end_date, sample_at(self.cfg.end_date)?));
        Ok(samples)
    }
}

/// Sum of `site.score` over distinct sites appearing in the observation
/// plan (§4.6). Each site appears at most once by construction.
fn score_observation_plan(plan: &ObservationPlan) -> f64 {
    plan.entries().iter().map(|(site, _)| site.score).sum()
}

fn cinematic_violation_error(report: &ValidationReport) -> Error {
    let detail = report
        .violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    Error::CinematicViolation(detail)
}
