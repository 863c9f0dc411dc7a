//! Access Planner: per-target refined access timelines.

use anise::prelude::{Almanac, Frame};
use hifitime::Unit;
use log::{info, warn};

use crate::cfg::DetectorThresholds;
use crate::detectors::scan_site;
use crate::prelude::Epoch;
use crate::satellite::Satellite;
use crate::site::Site;
use crate::timeline::Timeline;

/// Mapping from site to its refined access timeline. One entry per site that
/// survived propagation; sites dropped by a per-site `PropagationFailure`
/// are simply absent (§7 recovery policy).
#[derive(Debug, Clone, Default)]
pub struct AccessPlan {
    entries: Vec<(Site, Timeline)>,
}

impl AccessPlan {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn timeline_for(&self, site: &Site) -> Option<&Timeline> {
        self.entries
            .iter()
            .find(|(s, _)| s.name == site.name)
            .map(|(_, t)| t)
    }

    pub fn entries(&self) -> &[(Site, Timeline)] {
        &self.entries
    }
}

/// Builds plans from hand-written entries, bypassing real propagation and
/// detector scanning. Gated behind `cfg(test)` for in-crate unit tests and
/// behind the `test-support` feature for this crate's own `tests/`
/// scenario suite; never part of the crate's intended public surface.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use super::{AccessPlan, Site, Timeline};

    /// Builds an [AccessPlan] directly from site/timeline pairs, bypassing
    /// detection/propagation — lets scheduler and cinematic tests exercise
    /// their own logic against hand-built access windows (§8 end-to-end
    /// scenarios).
    pub fn from_entries(entries: Vec<(Site, Timeline)>) -> AccessPlan {
        AccessPlan { entries }
    }
}

/// Builds the [AccessPlan] for every site in `sites`: evaluates the three
/// detectors over `[start, end]`, combines them via Timeline Algebra
/// (`Visibility AND SunIncidence` → `VS`, `VS AND NonGlare` → `VSN`), keeps
/// only `VSN`, and drops windows no longer than `integration_time`.
///
/// A site whose propagation/geometry fails is dropped from the plan with a
/// `warn!` diagnostic; the run proceeds with the remaining sites.
pub fn compute_access_plan(
    start: Epoch,
    end: Epoch,
    satellite: &Satellite,
    sites: &[Site],
    thresholds: &DetectorThresholds,
    integration_time_s: f64,
    almanac: &Almanac,
    earth_fixed: Frame,
    inertial: Frame,
) -> AccessPlan {
    let mut plan = AccessPlan::default();

    for site in sites {
        match scan_site(
            start,
            end,
            satellite,
            site,
            thresholds,
            almanac,
            earth_fixed,
            inertial,
        ) {
            Ok(mut timeline) => {
                timeline.apply_and("Visibility", "SunIncidence", "VS");
                timeline.apply_and("VS", "NonGlare", "VSN");
                timeline.filter_by_code("VSN", true);
                timeline.filter_by_min_duration(
                    "VSN",
                    integration_time_s * Unit::Second,
                    true,
                );

                info!(
                    "{}: {} access window(s) after refinement",
                    site.name,
                    timeline.by_code("VSN").len()
                );
                plan.entries.push((site.clone(), timeline));
            },
            Err(e) => {
                warn!("{}: dropped from access plan ({e})", site.name);
            },
        }
    }

    plan
}
