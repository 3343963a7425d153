use std::cmp::Ordering;

use crate::error::ProfileError;
use crate::pipeline::{finalize, merge, rolling, scan, smooth};
use crate::types::climb::{Climb, DetectionConfig, DetectionStrategy};
use crate::types::profile::ElevationSample;

/// Detects climbs along an elevation profile.
///
/// Profiles with fewer than two samples have no climbs. Otherwise distances
/// must be finite and strictly increasing; see [`validate_samples`].
/// Output is ordered by distance along the route.
pub fn detect_climbs(
    samples: &[ElevationSample],
    config: &DetectionConfig,
) -> Result<Vec<Climb>, ProfileError> {
    if samples.len() < 2 {
        return Ok(Vec::new());
    }
    validate_samples(samples)?;
    Ok(detect_climbs_unchecked(samples, config))
}

/// [`detect_climbs`] without input validation. Duplicate or decreasing
/// distances produce NaN gradients and meaningless climbs.
pub fn detect_climbs_unchecked(samples: &[ElevationSample], config: &DetectionConfig) -> Vec<Climb> {
    if samples.len() < 2 {
        return Vec::new();
    }

    let smoothed = smooth::smooth(samples, config.smoothing_window);
    detect_smoothed(samples, &smoothed, config)
}

/// Detection over an already smoothed copy of `samples`.
pub(crate) fn detect_smoothed(
    samples: &[ElevationSample],
    smoothed: &[ElevationSample],
    config: &DetectionConfig,
) -> Vec<Climb> {
    if samples.len() < 2 {
        return Vec::new();
    }

    let mut climbs = match config.strategy {
        DetectionStrategy::Fiets => {
            let sections = scan::scan(smoothed, config);
            let steep_count = sections.len();
            let merged = merge::merge(sections, smoothed, config);
            tracing::debug!(
                "{} steep sections merged into {}",
                steep_count,
                merged.len()
            );
            finalize::finalize(&merged, smoothed, samples, config)
        }
        DetectionStrategy::RollingWindow => rolling::detect(smoothed, samples, config),
    };

    if config.remove_overlaps {
        climbs = remove_overlapping_climbs(climbs);
    }

    for climb in &climbs {
        tracing::debug!(
            "Climb {:.1} km at {:.1}% from {:.1} km ({})",
            climb.total_distance / 1000.0,
            climb.average_gradient,
            climb.start_point.distance / 1000.0,
            climb.category.as_str()
        );
    }
    tracing::info!(
        "Detected {} climbs over {} samples ({:?})",
        climbs.len(),
        samples.len(),
        config.strategy
    );

    climbs
}

/// Checks that every value is finite and distances strictly increase.
pub fn validate_samples(samples: &[ElevationSample]) -> Result<(), ProfileError> {
    for (index, sample) in samples.iter().enumerate() {
        if !sample.distance.is_finite() || !sample.elevation.is_finite() {
            return Err(ProfileError::NonFinite { index });
        }
        if index == 0 {
            continue;
        }

        let previous = samples[index - 1].distance;
        if sample.distance < previous {
            return Err(ProfileError::NonMonotonic {
                index,
                previous,
                current: sample.distance,
            });
        }
        if sample.distance == previous {
            return Err(ProfileError::DuplicateDistance {
                index,
                distance: sample.distance,
            });
        }
    }
    Ok(())
}

/// Keeps the hardest climb of any overlapping group.
///
/// Candidates are taken by FIETS score (scores within 0.1 count as equal and
/// fall back to length); any climb overlapping an already kept one is
/// dropped. The survivors are returned in route order.
pub fn remove_overlapping_climbs(climbs: Vec<Climb>) -> Vec<Climb> {
    if climbs.len() <= 1 {
        return climbs;
    }

    let mut ranked = climbs;
    ranked.sort_by(|a, b| {
        if (b.fiets_score - a.fiets_score).abs() > 0.1 {
            b.fiets_score
                .partial_cmp(&a.fiets_score)
                .unwrap_or(Ordering::Equal)
        } else {
            b.total_distance
                .partial_cmp(&a.total_distance)
                .unwrap_or(Ordering::Equal)
        }
    });

    let mut kept: Vec<Climb> = Vec::with_capacity(ranked.len());
    for climb in ranked {
        if !kept.iter().any(|existing| overlaps(&climb, existing)) {
            kept.push(climb);
        }
    }

    kept.sort_by(|a, b| {
        a.start_point
            .distance
            .partial_cmp(&b.start_point.distance)
            .unwrap_or(Ordering::Equal)
    });
    kept
}

fn overlaps(a: &Climb, b: &Climb) -> bool {
    a.start_point.distance < b.end_point.distance && b.start_point.distance < a.end_point.distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::climb::{ClimbCategory, ClimbPoint};

    fn climb(start: f64, end: f64, fiets_score: f64) -> Climb {
        Climb {
            start_point: ClimbPoint {
                distance: start,
                elevation: 0.0,
                gradient: 4.0,
            },
            end_point: ClimbPoint {
                distance: end,
                elevation: 100.0,
                gradient: 4.0,
            },
            total_distance: end - start,
            elevation_gain: 100.0,
            average_gradient: 4.0,
            fiets_score,
            category: ClimbCategory::Cat4,
            color: ClimbCategory::Cat4.color().to_string(),
            number: None,
        }
    }

    #[test]
    fn validate_accepts_increasing_distances() {
        let samples = vec![
            ElevationSample::new(0.0, 10.0),
            ElevationSample::new(5.0, 11.0),
            ElevationSample::new(12.0, 9.0),
        ];
        assert!(validate_samples(&samples).is_ok());
    }

    #[test]
    fn validate_rejects_duplicates() {
        let samples = vec![
            ElevationSample::new(0.0, 10.0),
            ElevationSample::new(5.0, 11.0),
            ElevationSample::new(5.0, 12.0),
        ];
        assert_eq!(
            validate_samples(&samples),
            Err(ProfileError::DuplicateDistance {
                index: 2,
                distance: 5.0
            })
        );
    }

    #[test]
    fn validate_rejects_backwards_distance() {
        let samples = vec![ElevationSample::new(10.0, 0.0), ElevationSample::new(4.0, 0.0)];
        assert_eq!(
            validate_samples(&samples),
            Err(ProfileError::NonMonotonic {
                index: 1,
                previous: 10.0,
                current: 4.0
            })
        );
    }

    #[test]
    fn validate_rejects_nan() {
        let samples = vec![ElevationSample::new(0.0, 0.0), ElevationSample::new(1.0, f64::NAN)];
        assert_eq!(
            validate_samples(&samples),
            Err(ProfileError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn short_input_skips_validation() {
        let samples = vec![ElevationSample::new(f64::NAN, 0.0)];
        assert_eq!(detect_climbs(&samples, &DetectionConfig::default()), Ok(Vec::new()));
    }

    #[test]
    fn overlap_pruning_keeps_hardest_and_route_order() {
        let climbs = vec![
            climb(0.0, 3000.0, 2.0),
            climb(2000.0, 6000.0, 5.0),
            climb(7000.0, 9000.0, 1.0),
        ];
        let kept = remove_overlapping_climbs(climbs);
        let starts: Vec<f64> = kept.iter().map(|c| c.start_point.distance).collect();
        assert_eq!(starts, vec![2000.0, 7000.0]);
    }

    #[test]
    fn overlap_ties_prefer_longer_climb() {
        let climbs = vec![climb(0.0, 2000.0, 3.0), climb(1000.0, 5000.0, 3.05)];
        let kept = remove_overlapping_climbs(climbs);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].start_point.distance, 1000.0);
    }

    #[test]
    fn touching_climbs_do_not_overlap() {
        let climbs = vec![climb(0.0, 2000.0, 3.0), climb(2000.0, 4000.0, 3.0)];
        assert_eq!(remove_overlapping_climbs(climbs).len(), 2);
    }
}
