//! Ground targets: immutable sites loaded once from an external CSV source.

use std::cmp::Ordering;
use std::path::Path;

#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::error::Error;

/// Geodetic point: latitude and longitude in degrees, altitude above the
/// WGS84 ellipsoid in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticPoint {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl GeodeticPoint {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        }
    }
}

/// A ground target: immutable once loaded, read-only for the rest of the
/// mission. Sites are ordered by descending score so the scheduler can
/// consume them greedily in priority order.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub name: String,
    pub score: f64,
    pub point: GeodeticPoint,
}

impl Site {
    pub fn new(name: impl Into<String>, score: f64, point: GeodeticPoint) -> Self {
        Self {
            name: name.into(),
            score,
            point,
        }
    }
}

impl Eq for Site {}

impl PartialOrd for Site {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Descending score order; `total_cmp` keeps the ordering well defined even
/// in presence of equal or oddball floating point scores.
impl Ord for Site {
    fn cmp(&self, other: &Self) -> Ordering {
        other.score.total_cmp(&self.score)
    }
}

#[cfg_attr(feature = "serde", derive(Deserialize))]
struct SiteRecord {
    name: String,
    score: f64,
    latitude_deg: f64,
    longitude_deg: f64,
    altitude_m: f64,
}

/// Loads the ranked site list from a CSV file with header
/// `name,score,latitude_deg,longitude_deg,altitude_m`.
///
/// This is the crate's stand-in for the spec's "external" site source: the
/// mission driver needs a concrete loader to run end to end, but the core
/// planning stages only ever consume `Vec<Site>`.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<Site>, Error> {
    let mut reader = csv::Reader::from_path(path.as_ref())
        .map_err(|e| Error::Config(format!("failed to open site source: {e}")))?;

    let mut sites = Vec::new();
    for record in reader.deserialize() {
        let record: SiteRecord =
            record.map_err(|e| Error::Config(format!("malformed site record: {e}")))?;
        sites.push(Site::new(
            record.name,
            record.score,
            GeodeticPoint::new(
                record.latitude_deg,
                record.longitude_deg,
                record.altitude_m,
            ),
        ));
    }
    Ok(sites)
}

/// Truncates the ranked site list to the requested target count, erroring if
/// fewer sites were available than requested.
pub fn select_targets(mut sites: Vec<Site>, target_count: usize) -> Result<Vec<Site>, Error> {
    if sites.len() < target_count {
        return Err(Error::Config(format!(
            "requested {} targets but only {} sites are available",
            target_count,
            sites.len()
        )));
    }
    sites.sort();
    sites.truncate(target_count);
    Ok(sites)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sites_sort_by_descending_score() {
        let mut sites = vec![
            Site::new("A", 3.0, GeodeticPoint::new(0.0, 0.0, 0.0)),
            Site::new("B", 9.0, GeodeticPoint::new(0.0, 0.0, 0.0)),
            Site::new("C", 5.0, GeodeticPoint::new(0.0, 0.0, 0.0)),
        ];
        sites.sort();
        let names: Vec<_> = sites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }

    #[test]
    fn select_targets_errors_when_not_enough_sites() {
        let sites = vec![Site::new("A", 1.0, GeodeticPoint::new(0.0, 0.0, 0.0))];
        assert!(select_targets(sites, 2).is_err());
    }
}
