use chrono::Utc;

use crate::error::ProfileError;
use crate::pipeline::{bands, detect, profile, smooth};
use crate::types::climb::{number_climbs, DetectionConfig};
use crate::types::profile::{AnalyzedProfile, ElevationSample};

/// Full analysis of one route: stats, numbered climbs, gradient bands over
/// the smoothed profile and a chart-sized copy of the raw profile.
///
/// Validation matches [`detect::detect_climbs`]. The profile is smoothed once
/// and shared by detection and banding.
pub fn analyze(
    samples: &[ElevationSample],
    config: &DetectionConfig,
    max_profile_points: usize,
) -> Result<AnalyzedProfile, ProfileError> {
    if samples.len() >= 2 {
        detect::validate_samples(samples)?;
    }

    let smoothed = smooth::smooth(samples, config.smoothing_window);
    let mut climbs = detect::detect_smoothed(samples, &smoothed, config);
    number_climbs(&mut climbs);

    Ok(AnalyzedProfile {
        stats: profile::profile_stats(samples),
        climbs,
        bands: bands::gradient_bands(&smoothed),
        profile: profile::downsample(samples, max_profile_points),
        analyzed_at: Utc::now(),
    })
}
