#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate nyx_space as nyx;

// `access`, `cinematic` and `scheduler` stay `pub` only so this crate's own
// `tests/` integration binaries can reach their `test_support` constructors;
// downstream consumers should go through `prelude` like everywhere else.
pub mod access;
pub mod cinematic;
pub mod scheduler;

mod agility;
mod attitude;
mod detectors;
mod leg;
mod mission;
mod site;
mod timeline;
mod validator;
mod writer;

mod cfg;
mod satellite;

pub(crate) mod constants;
mod error;

// prelude
pub mod prelude {
    pub use crate::access::{compute_access_plan, AccessPlan};
    pub use crate::agility::AgilityModel;
    pub use crate::attitude::{Attitude, AttitudeLaw, NadirPointing, TargetGroundPointing};
    pub use crate::cfg::{AgilityParams, Config, DetectorThresholds, OrbitalElements};
    pub use crate::cinematic::{assemble_cinematic_plan, CinematicPlan};
    pub use crate::error::Error;
    pub use crate::leg::{AttitudeLeg, LegKind, LegLaw};
    pub use crate::mission::Mission;
    pub use crate::satellite::Satellite;
    pub use crate::scheduler::{schedule_observations, ObservationPlan};
    pub use crate::site::{load_csv, select_targets, GeodeticPoint, Site};
    pub use crate::timeline::{CodedEvent, Phenomenon, Timeline};
    pub use crate::validator::{CinematicViolation, ValidationReport, Validator};
    pub use crate::writer::{NullWriter, PlanWriter};

    // re-export
    pub use anise::{
        constants::frames::{EARTH_ITRF93, EARTH_J2000, SUN_J2000},
        prelude::{Almanac, Frame},
    };
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::{UnitQuaternion, Vector3};
}
