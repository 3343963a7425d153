use crate::pipeline::smooth::gradient;
use crate::types::gradient::{BandSegment, GradientBand};
use crate::types::profile::ElevationSample;

/// Splits a (smoothed) profile into runs of equal steepness class.
pub fn gradient_bands(points: &[ElevationSample]) -> Vec<BandSegment> {
    let mut segments: Vec<BandSegment> = Vec::new();
    let mut run_start: Option<ElevationSample> = None;

    for pair in points.windows(2) {
        let band = GradientBand::from_gradient(gradient(&pair[0], &pair[1]));

        match segments.last_mut() {
            Some(segment) if segment.band == band => {
                segment.end_distance = pair[1].distance;
                if let Some(start) = run_start {
                    segment.average_gradient = gradient(&start, &pair[1]);
                }
            }
            _ => {
                run_start = Some(pair[0]);
                segments.push(BandSegment {
                    start_distance: pair[0].distance,
                    end_distance: pair[1].distance,
                    band,
                    average_gradient: gradient(&pair[0], &pair[1]),
                    color: band.color().to_string(),
                });
            }
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_steps_in_one_band_are_joined() {
        let points = vec![
            ElevationSample::new(0.0, 0.0),
            ElevationSample::new(100.0, 4.0),
            ElevationSample::new(200.0, 8.0),
            ElevationSample::new(300.0, 8.0),
            ElevationSample::new(400.0, 20.0),
        ];
        let bands = gradient_bands(&points);
        let kinds: Vec<GradientBand> = bands.iter().map(|b| b.band).collect();
        assert_eq!(
            kinds,
            vec![GradientBand::Moderate, GradientBand::Flat, GradientBand::Steep]
        );
        assert_eq!(bands[0].start_distance, 0.0);
        assert_eq!(bands[0].end_distance, 200.0);
        assert!((bands[0].average_gradient - 4.0).abs() < 1e-9);
        assert_eq!(bands[2].color, "#b33939");
    }

    #[test]
    fn descents_count_as_flat() {
        assert_eq!(GradientBand::from_gradient(-8.0), GradientBand::Flat);
        assert_eq!(GradientBand::from_gradient(0.99), GradientBand::Flat);
        assert_eq!(GradientBand::from_gradient(1.0), GradientBand::Easy);
        assert_eq!(GradientBand::from_gradient(6.0), GradientBand::Hard);
    }

    #[test]
    fn single_point_has_no_bands() {
        assert!(gradient_bands(&[ElevationSample::new(0.0, 1.0)]).is_empty());
    }
}
