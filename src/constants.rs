//! Physical and detector constants shared across the planning core.

/// WGS84 equatorial radius, in km.
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.137;

/// Earth gravitational parameter, in km^3/s^2.
pub const EARTH_MU_KM3_S2: f64 = 398_600.4418;

/// Sampling cadence for the access planner's direct geometric evaluators, in
/// seconds. See SPEC_FULL.md §4.2 / §9.
pub const DETECTOR_CHECK_INTERVAL_S: f64 = 120.0;

/// Bisection convergence threshold for zero-crossing refinement, in seconds.
pub const DETECTOR_CONVERGENCE_S: f64 = 1.0e-4;

/// Sampling cadence used when handing trajectory/attitude samples off to the
/// visualization writer, in seconds. Coarser than the detector cadence since
/// these samples feed a plot/export, not a root-finder.
pub const WRITER_SAMPLE_CADENCE_S: f64 = 60.0;
