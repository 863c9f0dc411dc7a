//! CLI entry point: plans a mission given a mission name and a target count.
//!
//! Usage: `plan_mission <mission-name> <target-count>`
//! The mission name selects `sites/<mission-name>.csv`; the target count
//! must be an integer in `[1, 100]`.

use std::process::ExitCode;

use agile_sat_planner::prelude::{load_csv, select_targets, Config, Error, Mission, NullWriter};
use hifitime::Epoch;
use log::error;

fn exit_code_for(err: &Error) -> u8 {
    match err {
        Error::Config(_) => 1,
        Error::Propagation(_, _) => 2,
        Error::Almanac(_) | Error::MetaAlmanac(_) | Error::EarthFrame(_) | Error::Physics(_) => 3,
        Error::CinematicViolation(_) => 4,
    }
}

fn run() -> Result<(), Error> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mission_name = args
        .next()
        .ok_or_else(|| Error::Config("missing mission name argument".into()))?;
    let target_count: usize = args
        .next()
        .ok_or_else(|| Error::Config("missing target count argument".into()))?
        .parse()
        .map_err(|e| Error::Config(format!("invalid target count: {e}")))?;

    if !(1..=100).contains(&target_count) {
        return Err(Error::Config(format!(
            "target count must be in [1, 100], got {target_count}"
        )));
    }

    let sites = load_csv(format!("sites/{mission_name}.csv"))?;
    let sites = select_targets(sites, target_count)?;

    let cfg = Config::preset(Epoch::from_gregorian_utc_at_midnight(2024, 1, 1));

    let mission = Mission::new(cfg, sites)?;
    let mut writer = NullWriter;
    let (_plan, score) = mission.run(&mut writer)?;

    println!("mission `{mission_name}`: score = {score}");
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("mission failed: {e}");
            ExitCode::from(exit_code_for(&e))
        },
    }
}
