use crate::types::profile::ElevationSample;

/// Centered moving average of elevation.
///
/// The window spans `window_size / 2` samples either side and narrows at the
/// ends of the profile. Distances are copied through unchanged. Runs in
/// linear time whatever the window size.
pub fn smooth(data: &[ElevationSample], window_size: usize) -> Vec<ElevationSample> {
    let half = window_size / 2;

    let mut prefix = Vec::with_capacity(data.len() + 1);
    prefix.push(0.0);
    let mut total = 0.0;
    for p in data {
        total += p.elevation;
        prefix.push(total);
    }

    (0..data.len())
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = i.saturating_add(half).saturating_add(1).min(data.len());
            let avg = (prefix[end] - prefix[start]) / (end - start) as f64;
            ElevationSample::new(data[i].distance, avg)
        })
        .collect()
}

/// Percent grade from `p1` to `p2`. Equal distances yield inf/NaN.
pub fn gradient(p1: &ElevationSample, p2: &ElevationSample) -> f64 {
    ((p2.elevation - p1.elevation) / (p2.distance - p1.distance)) * 100.0
}
