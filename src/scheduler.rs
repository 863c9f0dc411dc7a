//! Observation Scheduler: greedy, score-prioritized first-fit placement of
//! fixed-duration observations within access windows, guarded against
//! cinematic infeasibility by a worst-case slew guard band.

use hifitime::Unit;
use itertools::Itertools;
use log::debug;

use crate::access::AccessPlan;
use crate::leg::AttitudeLeg;
use crate::prelude::{Duration, Epoch};
use crate::site::Site;

/// A committed reservation: `guarded_end = start + integration_time + S_max`.
#[derive(Debug, Clone)]
struct Reservation {
    start: Epoch,
    guarded_end: Epoch,
}

/// Mapping from site to its single scheduled observation leg. Sites with no
/// feasible placement are simply absent (`SchedulingInfeasible`, logged at
/// `debug` level — not an error).
#[derive(Debug, Clone, Default)]
pub struct ObservationPlan {
    entries: Vec<(Site, AttitudeLeg)>,
}

impl ObservationPlan {
    pub fn entries(&self) -> &[(Site, AttitudeLeg)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by observation start date, per §4.5's `O_1, ..., O_n`.
    pub fn sorted_by_start(&self) -> Vec<&(Site, AttitudeLeg)> {
        self.entries.iter().sorted_by_key(|(_, leg)| leg.start).collect()
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use super::{AttitudeLeg, ObservationPlan, Site};

    /// Builds an [ObservationPlan] directly from site/leg pairs, bypassing
    /// the greedy placement — lets cinematic-assembly tests exercise their
    /// own logic against a hand-built observation plan.
    pub fn from_entries(entries: Vec<(Site, AttitudeLeg)>) -> ObservationPlan {
        ObservationPlan { entries }
    }
}

/// Runs the greedy scheduler. `sites` must already be in descending-score
/// (ties: stable input) order — [crate::site::select_targets] guarantees
/// this.
pub fn schedule_observations(
    access_plan: &AccessPlan,
    integration_time_s: f64,
    max_slew_duration: Duration,
    sites: &[Site],
) -> ObservationPlan {
    let t_obs = integration_time_s * Unit::Second;
    let s_max = max_slew_duration;

    let mut reservations: Vec<Reservation> = Vec::new();
    let mut plan = ObservationPlan::default();

    for site in sites {
        let Some(timeline) = access_plan.timeline_for(site) else {
            continue;
        };

        let mut placed = false;
        for window in timeline.by_code("VSN") {
            if placed {
                break;
            }
            let (a_start, a_end) = (window.start(), window.end());

            let overlapping: Vec<&Reservation> = reservations
                .iter()
                .filter(|r| r.start < a_end && a_start < r.guarded_end)
                .sorted_by_key(|r| r.start)
                .collect();

            let candidate = if overlapping.is_empty() {
                if a_start + t_obs <= a_end {
                    Some(a_start)
                } else {
                    None
                }
            } else {
                let mut found = None;

                // (i) before the first reservation.
                let first = overlapping[0];
                if a_start + t_obs <= a_end && a_start + t_obs + s_max <= first.start {
                    found = Some(a_start);
                }

                // (ii) between consecutive reservations.
                if found.is_none() {
                    for pair in overlapping.windows(2) {
                        let cand = pair[0].guarded_end;
                        if cand >= a_start
                            && cand + t_obs <= a_end
                            && cand + t_obs + s_max <= pair[1].start
                        {
                            found = Some(cand);
                            break;
                        }
                    }
                }

                // (iii) after the last reservation.
                if found.is_none() {
                    let last = overlapping[overlapping.len() - 1];
                    let cand = last.guarded_end;
                    if cand >= a_start && cand + t_obs <= a_end {
                        found = Some(cand);
                    }
                }

                found
            };

            if let Some(start) = candidate {
                reservations.push(Reservation {
                    start,
                    guarded_end: start + t_obs + s_max,
                });
                let leg = AttitudeLeg::observation(
                    format!("Observation_{}", site.name),
                    start,
                    start + t_obs,
                    site.clone(),
                );
                plan.entries.push((site.clone(), leg));
                placed = true;
            }
        }

        if !placed {
            debug!("{}: SchedulingInfeasible, no window could accommodate it", site.name);
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::test_support::from_entries;
    use crate::site::GeodeticPoint;
    use crate::timeline::{Phenomenon, Timeline};
    use hifitime::Unit;

    fn epoch(offset_s: f64) -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(2024, 1, 1) + offset_s * Unit::Second
    }

    fn site(name: &str, score: f64) -> Site {
        Site::new(name, score, GeodeticPoint::new(0.0, 0.0, 0.0))
    }

    fn timeline_with_window(start_s: f64, end_s: f64) -> Timeline {
        let mut t = Timeline::new(epoch(0.0), epoch(100_000.0));
        t.add_phenomenon(Phenomenon::new("VSN", epoch(start_s), epoch(end_s)));
        t
    }

    const T_OBS: f64 = 10.0;

    fn s_max() -> Duration {
        30.0 * Unit::Second
    }

    // Scenario 1: a single target with one ample window gets placed exactly
    // at the window's start, for exactly `T_obs` seconds.
    #[test]
    fn single_target_is_placed_at_window_start() {
        let paris = site("Paris", 10.0);
        let plan = from_entries(vec![(paris.clone(), timeline_with_window(1000.0, 2000.0))]);

        let observations = schedule_observations(&plan, T_OBS, s_max(), &[paris.clone()]);
        assert_eq!(observations.entries().len(), 1);
        let (scheduled_site, leg) = &observations.entries()[0];
        assert_eq!(scheduled_site.name, "Paris");
        assert_eq!(leg.start, epoch(1000.0));
        assert_eq!(leg.duration(), T_OBS * Unit::Second);
    }

    // Scenario 2: two overlapping targets, distinct scores. The higher-score
    // target is placed; the lower-score one is skipped when no other window
    // in its own timeline can accommodate it.
    #[test]
    fn higher_score_target_wins_overlapping_window() {
        let a = site("A", 9.0);
        let b = site("B", 3.0);
        let plan = from_entries(vec![
            (a.clone(), timeline_with_window(1000.0, 1040.0)),
            (b.clone(), timeline_with_window(1000.0, 1040.0)),
        ]);

        // Input order intentionally lower-score-first; `sites` must already
        // be in descending-score order for the guarantee to hold.
        let sites = vec![a.clone(), b.clone()];
        let observations = schedule_observations(&plan, T_OBS, s_max(), &sites);

        assert_eq!(observations.entries().len(), 1);
        assert_eq!(observations.entries()[0].0.name, "A");
    }

    // Scenario 3: two targets with non-overlapping windows far enough apart
    // both get placed.
    #[test]
    fn non_overlapping_targets_are_both_placed() {
        let a = site("A", 9.0);
        let b = site("B", 3.0);
        let plan = from_entries(vec![
            (a.clone(), timeline_with_window(1000.0, 1040.0)),
            (b.clone(), timeline_with_window(5000.0, 5040.0)),
        ]);

        let observations = schedule_observations(&plan, T_OBS, s_max(), &[a, b]);
        assert_eq!(observations.entries().len(), 2);
    }

    // Scenario 4: tight spacing — a gap just wide enough for `T_obs + S_max`
    // still allows both placements in the same contended window.
    #[test]
    fn tight_but_sufficient_gap_allows_both_placements() {
        let a = site("A", 9.0);
        let b = site("B", 3.0);
        // Shared window wide enough for two T_obs + S_max reservations back
        // to back, plus a little slack.
        let shared = timeline_with_window(1000.0, 1000.0 + 2.0 * (T_OBS + s_max().to_seconds()) + 5.0);
        let plan = from_entries(vec![(a.clone(), shared.clone()), (b.clone(), shared)]);

        let observations = schedule_observations(&plan, T_OBS, s_max(), &[a, b]);
        assert_eq!(observations.entries().len(), 2);
    }

    // Scenario 5: infeasible spacing — a window only wide enough for one
    // reservation's guard band leaves the second target unplaced.
    #[test]
    fn contended_window_too_narrow_for_second_reservation_is_skipped() {
        let a = site("A", 9.0);
        let b = site("B", 3.0);
        // Only room for one T_obs + S_max reservation in the shared window.
        let shared = timeline_with_window(1000.0, 1000.0 + T_OBS + s_max().to_seconds());
        let plan = from_entries(vec![(a.clone(), shared.clone()), (b.clone(), shared)]);

        let observations = schedule_observations(&plan, T_OBS, s_max(), &[a, b]);
        assert_eq!(observations.entries().len(), 1);
        assert_eq!(observations.entries()[0].0.name, "A");
    }

    // Boundary: a window shorter than T_obs is never a valid placement.
    #[test]
    fn window_shorter_than_integration_time_is_skipped() {
        let a = site("A", 5.0);
        let plan = from_entries(vec![(a.clone(), timeline_with_window(1000.0, 1005.0))]);

        let observations = schedule_observations(&plan, T_OBS, s_max(), &[a]);
        assert!(observations.is_empty());
    }

    // Boundary: a window longer than T_obs but shorter than T_obs + S_max is
    // still allowed as the first committed reservation of the run.
    #[test]
    fn window_shorter_than_guarded_duration_is_allowed_as_first_reservation() {
        let a = site("A", 5.0);
        let plan = from_entries(vec![(a.clone(), timeline_with_window(1000.0, 1000.0 + T_OBS + 1.0))]);

        let observations = schedule_observations(&plan, T_OBS, s_max(), &[a]);
        assert_eq!(observations.entries().len(), 1);
    }

    // A site absent from the access plan (e.g. dropped by a propagation
    // failure) is simply absent from the observation plan too.
    #[test]
    fn site_missing_from_access_plan_is_skipped() {
        let a = site("A", 5.0);
        let plan = from_entries(vec![]);
        let observations = schedule_observations(&plan, T_OBS, s_max(), &[a]);
        assert!(observations.is_empty());
    }
}
