use crate::error::ProfileError;
use crate::types::profile::{ElevationSample, ProfileStats, RouteCoordinate};

/// Builds a distance/elevation profile from route coordinates using
/// cumulative great-circle distance.
///
/// Repeated positions would give zero-length steps, so only the first of a
/// run of identical positions is kept.
pub fn build_profile(coords: &[RouteCoordinate]) -> Result<Vec<ElevationSample>, ProfileError> {
    if coords.len() < 2 {
        return Err(ProfileError::CoordinatesTooShort(coords.len()));
    }

    let mut samples = Vec::with_capacity(coords.len());
    let mut distance = 0.0;
    let mut prev: Option<&RouteCoordinate> = None;

    for (index, coord) in coords.iter().enumerate() {
        if !coord.lat.is_finite() || !coord.lon.is_finite() || !coord.elevation.is_finite() {
            return Err(ProfileError::NonFinite { index });
        }

        if let Some(p) = prev {
            let step = haversine_m(p.lat, p.lon, coord.lat, coord.lon);
            if step <= 0.0 {
                continue;
            }
            distance += step;
        }

        samples.push(ElevationSample::new(distance, coord.elevation));
        prev = Some(coord);
    }

    if samples.len() < 2 {
        return Err(ProfileError::CoordinatesTooShort(samples.len()));
    }

    tracing::debug!(
        "Built profile of {} samples ({} duplicate positions dropped, {:.2} km)",
        samples.len(),
        coords.len() - samples.len(),
        distance / 1000.0
    );

    Ok(samples)
}

pub fn profile_stats(samples: &[ElevationSample]) -> ProfileStats {
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return ProfileStats::default();
    };

    let mut elevation_gained_m = 0.0;
    let mut elevation_lost_m = 0.0;
    let mut min_elevation_m = f64::INFINITY;
    let mut max_elevation_m = f64::NEG_INFINITY;

    for sample in samples {
        min_elevation_m = min_elevation_m.min(sample.elevation);
        max_elevation_m = max_elevation_m.max(sample.elevation);
    }

    for pair in samples.windows(2) {
        let diff = pair[1].elevation - pair[0].elevation;
        if diff > 0.0 {
            elevation_gained_m += diff;
        } else {
            elevation_lost_m -= diff;
        }
    }

    ProfileStats {
        total_distance_m: last.distance - first.distance,
        elevation_gained_m,
        elevation_lost_m,
        min_elevation_m,
        max_elevation_m,
        point_count: samples.len(),
    }
}

/// Largest-triangle-three-buckets downsampling for chart payloads. The first
/// and last samples are always kept.
pub fn downsample(data: &[ElevationSample], threshold: usize) -> Vec<ElevationSample> {
    if threshold >= data.len() || threshold < 3 {
        return data.to_vec();
    }

    let mut sampled = Vec::with_capacity(threshold);
    sampled.push(data[0]);

    let bucket_size = (data.len() - 2) as f64 / (threshold - 2) as f64;
    let mut a = 0;

    for i in 0..(threshold - 2) {
        let avg_range_start = ((i + 1) as f64 * bucket_size).floor() as usize + 1;
        let avg_range_end = (((i + 2) as f64 * bucket_size).floor() as usize + 1).min(data.len());
        let avg_range = &data[avg_range_start.min(avg_range_end - 1)..avg_range_end];

        let avg_x = avg_range.iter().map(|p| p.distance).sum::<f64>() / avg_range.len() as f64;
        let avg_y = avg_range.iter().map(|p| p.elevation).sum::<f64>() / avg_range.len() as f64;

        let range_start = (i as f64 * bucket_size).floor() as usize + 1;
        let range_end = ((i + 1) as f64 * bucket_size).floor() as usize + 1;

        let point_a = data[a];
        let mut max_area = -1.0;
        let mut max_area_point = range_start;

        for (s, candidate) in data.iter().enumerate().take(range_end).skip(range_start) {
            let area = ((point_a.distance - avg_x) * (candidate.elevation - point_a.elevation)
                - (point_a.distance - candidate.distance) * (avg_y - point_a.elevation))
                .abs();

            if area > max_area {
                max_area = area;
                max_area_point = s;
            }
        }

        sampled.push(data[max_area_point]);
        a = max_area_point;
    }

    sampled.push(data[data.len() - 1]);
    sampled
}

fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const R: f64 = 6_371_000.0; // Earth radius in m

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    R * c
}
