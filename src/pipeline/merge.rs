use crate::pipeline::scan::SteepSection;
use crate::pipeline::smooth::gradient;
use crate::types::climb::DetectionConfig;
use crate::types::profile::ElevationSample;

/// Joins consecutive steep sections into one climb when the gap between them
/// is at most `merge_gap_m` and contains no significant descent.
///
/// Merged sections absorb the intervening smoothed points, so the result is
/// still a continuous run of the profile.
pub fn merge(
    sections: Vec<SteepSection>,
    smoothed: &[ElevationSample],
    config: &DetectionConfig,
) -> Vec<SteepSection> {
    let mut merged: Vec<SteepSection> = Vec::with_capacity(sections.len());

    for section in sections {
        let Some(prev) = merged.last_mut() else {
            merged.push(section);
            continue;
        };

        let prev_end = *prev.last();
        let next_start = *section.first();
        let gap = next_start.distance - prev_end.distance;

        if gap <= config.merge_gap_m {
            let between_start = first_at_or_after(smoothed, prev_end.distance);
            let between_end = first_at_or_after(smoothed, next_start.distance);

            if between_start < between_end && between_end < smoothed.len() {
                let between = &smoothed[between_start..=between_end];

                if !has_significant_downhill(between, config) {
                    tracing::debug!(
                        "Merging steep sections at {:.0} m and {:.0} m (gap {:.0} m)",
                        prev.first().distance,
                        next_start.distance,
                        gap
                    );
                    splice(prev, between, section);
                    continue;
                }

                tracing::debug!(
                    "Keeping section at {:.0} m separate: descent in {:.0} m gap",
                    next_start.distance,
                    gap
                );
            }
        }

        merged.push(section);
    }

    merged
}

/// Index of the first point at or beyond `distance`, or `points.len()`.
pub(crate) fn first_at_or_after(points: &[ElevationSample], distance: f64) -> usize {
    points.partition_point(|p| p.distance < distance)
}

/// True once consecutive steps at or below `min_downhill_gradient` add up to
/// `min_downhill_length_m`. Any shallower step resets the run.
fn has_significant_downhill(points: &[ElevationSample], config: &DetectionConfig) -> bool {
    let mut downhill = 0.0;
    for pair in points.windows(2) {
        if gradient(&pair[0], &pair[1]) <= config.min_downhill_gradient {
            downhill += pair[1].distance - pair[0].distance;
            if downhill >= config.min_downhill_length_m {
                return true;
            }
        } else {
            downhill = 0.0;
        }
    }
    false
}

/// `between[0]` duplicates the last point of `prev` and `between[last]` the
/// first point of `next`; both are skipped.
fn splice(prev: &mut SteepSection, between: &[ElevationSample], next: SteepSection) {
    prev.points.extend_from_slice(&between[1..]);
    prev.gradients
        .extend(between.windows(2).map(|pair| gradient(&pair[0], &pair[1])));

    prev.points.extend(next.points.into_iter().skip(1));
    prev.gradients.extend(next.gradients);
}
