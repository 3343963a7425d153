use crate::pipeline::merge::first_at_or_after;
use crate::pipeline::scan::SteepSection;
use crate::pipeline::smooth::gradient;
use crate::types::climb::{fiets_score, Climb, ClimbCategory, ClimbPoint, DetectionConfig};
use crate::types::profile::ElevationSample;

/// Turns merged sections into scored climbs.
///
/// Each section's top is pushed forward to the highest smoothed point within
/// `lookahead_distance_m`. Climbs below `final_min_gradient` are dropped.
pub fn finalize(
    sections: &[SteepSection],
    smoothed: &[ElevationSample],
    original: &[ElevationSample],
    config: &DetectionConfig,
) -> Vec<Climb> {
    sections
        .iter()
        .map(|section| {
            let start = *section.first();
            let end = extend_to_peak(*section.last(), smoothed, config);
            build_climb(start, end, original, config)
        })
        .filter(|climb| passes_gradient_floor(climb, config))
        .collect()
}

/// Highest point in `(end.distance, end.distance + lookahead]`, or `end`
/// itself when nothing there is higher.
///
/// With `lookahead_stop_on_descent`, a descent of `min_downhill_length_m`
/// inside the window cancels the extension and `end` is returned as is.
pub(crate) fn extend_to_peak(
    end: ElevationSample,
    smoothed: &[ElevationSample],
    config: &DetectionConfig,
) -> ElevationSample {
    let limit = end.distance + config.lookahead_distance_m;
    let from = smoothed.partition_point(|p| p.distance <= end.distance);

    let mut best = end;
    let mut prev = end;
    let mut downhill = 0.0;

    for point in smoothed[from..].iter().take_while(|p| p.distance <= limit) {
        if config.lookahead_stop_on_descent {
            if gradient(&prev, point) <= config.min_downhill_gradient {
                downhill += point.distance - prev.distance;
                if downhill >= config.min_downhill_length_m {
                    return end;
                }
            } else {
                downhill = 0.0;
            }
        }

        if point.elevation > best.elevation {
            best = *point;
        }
        prev = *point;
    }

    best
}

/// Scores the smoothed `start`/`end` pair; reported endpoints come from the
/// raw samples at or after those distances.
pub(crate) fn build_climb(
    start: ElevationSample,
    end: ElevationSample,
    original: &[ElevationSample],
    config: &DetectionConfig,
) -> Climb {
    let elevation_gain = end.elevation - start.elevation;
    let total_distance = end.distance - start.distance;
    let average_gradient = (elevation_gain / total_distance) * 100.0;
    let fiets = fiets_score(elevation_gain, total_distance / 1000.0);
    let category = ClimbCategory::from_score(fiets, &config.categories);

    let raw_start = resolve(original, start);
    let raw_end = resolve(original, end);

    Climb {
        start_point: ClimbPoint {
            distance: raw_start.distance,
            elevation: raw_start.elevation,
            gradient: average_gradient,
        },
        end_point: ClimbPoint {
            distance: raw_end.distance,
            elevation: raw_end.elevation,
            gradient: average_gradient,
        },
        total_distance,
        elevation_gain,
        average_gradient,
        fiets_score: fiets,
        category,
        color: category.color().to_string(),
        number: None,
    }
}

pub(crate) fn passes_gradient_floor(climb: &Climb, config: &DetectionConfig) -> bool {
    if climb.average_gradient >= config.final_min_gradient {
        return true;
    }
    tracing::debug!(
        "Dropping climb at {:.0} m: average gradient {:.2}% below floor",
        climb.start_point.distance,
        climb.average_gradient
    );
    false
}

fn resolve(original: &[ElevationSample], point: ElevationSample) -> ElevationSample {
    let idx = first_at_or_after(original, point.distance).min(original.len() - 1);
    original[idx]
}
