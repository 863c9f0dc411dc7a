//! Satellite agility model: bounded-acceleration slew duration profile.

use nalgebra::UnitQuaternion;

use crate::cfg::AgilityParams;
use crate::prelude::Duration;

/// Bounded-acceleration slew model: triangular profile below `2 * theta_acc`,
/// trapezoidal (cruise at `max_rate`) above it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgilityModel {
    max_rate_rad_s: f64,
    max_accel_rad_s2: f64,
    pointing_capacity_rad: f64,
}

impl AgilityModel {
    pub fn new(params: AgilityParams) -> Self {
        Self {
            max_rate_rad_s: params.max_angular_rate_deg_s.to_radians(),
            max_accel_rad_s2: params.max_angular_accel_deg_s2.to_radians(),
            pointing_capacity_rad: params.pointing_capacity_deg.to_radians(),
        }
    }

    /// Theoretical slew duration for an angular separation `theta` (radians).
    /// Monotone nondecreasing in `theta`; zero at `theta = 0`.
    pub fn slew_duration(&self, theta_rad: f64) -> Duration {
        let theta_rad = theta_rad.abs();
        let theta_acc = self.max_rate_rad_s * self.max_rate_rad_s / self.max_accel_rad_s2;

        let t_s = if theta_rad <= 2.0 * theta_acc {
            2.0 * (theta_rad / self.max_accel_rad_s2).sqrt()
        } else {
            2.0 * (self.max_rate_rad_s / self.max_accel_rad_s2)
                + (theta_rad - 2.0 * theta_acc) / self.max_rate_rad_s
        };

        Duration::from_seconds(t_s)
    }

    /// Slew duration between two attitude orientations: the geodesic angle
    /// between their rotations, fed into [Self::slew_duration].
    pub fn slew_duration_between(
        &self,
        start: &UnitQuaternion<f64>,
        end: &UnitQuaternion<f64>,
    ) -> Duration {
        let relative = start.inverse() * end;
        self.slew_duration(relative.angle())
    }

    /// Worst-case slew duration: across the full field of regard, from
    /// `+pointing_capacity` to `-pointing_capacity` through nadir.
    pub fn max_slew_duration(&self) -> Duration {
        self.slew_duration(2.0 * self.pointing_capacity_rad)
    }

    /// Sensor half-aperture, in radians.
    pub fn pointing_capacity_rad(&self) -> f64 {
        self.pointing_capacity_rad
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::AgilityParams;

    fn model() -> AgilityModel {
        AgilityModel::new(AgilityParams {
            max_angular_rate_deg_s: 2.0,
            max_angular_accel_deg_s2: 1.0,
            pointing_capacity_deg: 20.0,
        })
    }

    #[test]
    fn zero_separation_is_instantaneous() {
        assert_eq!(model().slew_duration(0.0).to_seconds(), 0.0);
    }

    #[test]
    fn slew_duration_is_monotone_nondecreasing() {
        let m = model();
        let mut prev = 0.0;
        for deg in [1.0, 5.0, 10.0, 20.0, 40.0, 80.0] {
            let t = m.slew_duration((deg_f64(deg)).to_radians()).to_seconds();
            assert!(t >= prev);
            prev = t;
        }
    }

    fn deg_f64(v: f64) -> f64 {
        v
    }

    #[test]
    fn max_slew_duration_matches_worst_case_angle() {
        let m = model();
        let worst = m.slew_duration(2.0 * 20.0_f64.to_radians());
        assert_eq!(m.max_slew_duration(), worst);
    }

    #[test]
    fn triangular_profile_below_threshold() {
        let m = model();
        // theta_acc = rate^2 / accel = 4 rad, well above any tested small angle.
        let theta = 0.5_f64.to_radians();
        let expected = 2.0 * (theta / m.max_accel_rad_s2).sqrt();
        assert!((m.slew_duration(theta).to_seconds() - expected).abs() < 1.0e-9);
    }
}
