use crate::pipeline::finalize::{build_climb, passes_gradient_floor};
use crate::pipeline::merge::first_at_or_after;
use crate::pipeline::smooth::gradient;
use crate::types::climb::{Climb, DetectionConfig};
use crate::types::profile::ElevationSample;

const ROLLING_WINDOW_M: f64 = 1000.0;
const ROLLING_MIN_GRADIENT: f64 = 3.0;

/// Flat-rule detector: every 1 km window averaging 3% or more is climbing,
/// and overlapping windows are joined into one climb.
///
/// No merge or lookahead step; scoring and the gradient floor match the
/// FIETS detector.
pub fn detect(
    smoothed: &[ElevationSample],
    original: &[ElevationSample],
    config: &DetectionConfig,
) -> Vec<Climb> {
    climbing_runs(smoothed)
        .into_iter()
        .map(|(start, end)| build_climb(smoothed[start], smoothed[end], original, config))
        .filter(|climb| passes_gradient_floor(climb, config))
        .collect()
}

/// Index ranges `[start, end]` covered by steep windows, unioned and in order.
fn climbing_runs(smoothed: &[ElevationSample]) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();

    for (i, point) in smoothed.iter().enumerate() {
        let j = first_at_or_after(smoothed, point.distance + ROLLING_WINDOW_M);
        if j >= smoothed.len() {
            break;
        }
        if gradient(point, &smoothed[j]) < ROLLING_MIN_GRADIENT {
            continue;
        }

        match runs.last_mut() {
            Some(run) if i <= run.1 => run.1 = run.1.max(j),
            _ => runs.push((i, j)),
        }
    }

    runs
}
