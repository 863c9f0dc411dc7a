use thiserror::Error;

use anise::{
    almanac::{metaload::MetaAlmanacError, planetary::PlanetaryDataError},
    errors::{AlmanacError, PhysicsError},
};

use crate::prelude::Epoch;

#[derive(Debug, PartialEq, Error)]
pub enum Error {
    /// Fewer sites were available than the requested target count, or a
    /// constant in the [crate::prelude::Config] bundle is out of its physical range.
    #[error("bad configuration: {0}")]
    Config(String),
    /// The astrodynamics backend refused to resolve a state at this [Epoch].
    /// Isolated per-site in access planning ([crate::access]); fatal anywhere else.
    #[error("propagation failed at {0}: {1}")]
    Propagation(Epoch, String),
    /// [crate::prelude::Almanac] determination failed at mission build up.
    #[error("issue with Almanac: {0}")]
    Almanac(AlmanacError),
    /// Local [crate::prelude::Almanac] storage setup failed.
    #[error("almanac setup issue: {0}")]
    MetaAlmanac(MetaAlmanacError),
    /// A [crate::prelude::Frame] could not be resolved from the [crate::prelude::Almanac].
    #[error("frame model error: {0}")]
    EarthFrame(PlanetaryDataError),
    /// Any physical non sense detected by ANISE will cause us to abort with this error.
    #[error("physics issue: {0}")]
    Physics(PhysicsError),
    /// The validator rejected the assembled cinematic plan: at least one slew's
    /// wall-clock duration is shorter than the theoretical duration required
    /// between its boundary attitudes. Plan invalid; score not computed.
    #[error("cinematic violation: {0}")]
    CinematicViolation(String),
}
