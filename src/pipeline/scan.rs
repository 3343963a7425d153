use crate::pipeline::smooth::gradient;
use crate::types::climb::DetectionConfig;
use crate::types::profile::ElevationSample;

/// A maximal run of smoothed points whose step gradients all meet the
/// minimum. `gradients[k]` is the grade from `points[k]` to `points[k + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SteepSection {
    /// Index of `points[0]` in the smoothed profile.
    pub start_idx: usize,
    pub points: Vec<ElevationSample>,
    pub gradients: Vec<f64>,
}

impl SteepSection {
    fn open(start_idx: usize, from: ElevationSample, to: ElevationSample, grade: f64) -> Self {
        Self {
            start_idx,
            points: vec![from, to],
            gradients: vec![grade],
        }
    }

    fn push(&mut self, point: ElevationSample, grade: f64) {
        self.points.push(point);
        self.gradients.push(grade);
    }

    pub fn first(&self) -> &ElevationSample {
        &self.points[0]
    }

    pub fn last(&self) -> &ElevationSample {
        &self.points[self.points.len() - 1]
    }

    pub fn span(&self) -> f64 {
        self.last().distance - self.first().distance
    }
}

/// Collects steep sections at least `min_length_m` long, in profile order.
/// Shorter runs are dropped.
pub fn scan(smoothed: &[ElevationSample], config: &DetectionConfig) -> Vec<SteepSection> {
    let mut sections = Vec::new();
    let mut current: Option<SteepSection> = None;

    for i in 1..smoothed.len() {
        let grade = gradient(&smoothed[i - 1], &smoothed[i]);

        if grade >= config.min_gradient {
            match current.as_mut() {
                Some(section) => section.push(smoothed[i], grade),
                None => {
                    current = Some(SteepSection::open(i - 1, smoothed[i - 1], smoothed[i], grade))
                }
            }
        } else if let Some(section) = current.take() {
            let span = smoothed[i - 1].distance - smoothed[section.start_idx].distance;
            keep_if_long_enough(&mut sections, section, span, config);
        }
    }

    if let Some(section) = current.take() {
        let last = smoothed.len() - 1;
        let span = smoothed[last].distance - smoothed[section.start_idx].distance;
        keep_if_long_enough(&mut sections, section, span, config);
    }

    sections
}

fn keep_if_long_enough(
    sections: &mut Vec<SteepSection>,
    section: SteepSection,
    span: f64,
    config: &DetectionConfig,
) {
    if span >= config.min_length_m {
        tracing::trace!(
            "Steep section at {:.0} m kept ({:.0} m)",
            section.first().distance,
            span
        );
        sections.push(section);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Piecewise-linear profile sampled every `step` meters.
    fn profile(step: f64, legs: &[(f64, f64)]) -> Vec<ElevationSample> {
        let mut points = vec![ElevationSample::new(0.0, 100.0)];
        for &(length, grade) in legs {
            let n = (length / step).round() as usize;
            for _ in 0..n {
                let last = *points.last().unwrap();
                points.push(ElevationSample::new(
                    last.distance + step,
                    last.elevation + step * grade / 100.0,
                ));
            }
        }
        points
    }

    #[test]
    fn flat_profile_has_no_sections() {
        let data = profile(100.0, &[(5000.0, 0.0)]);
        assert!(scan(&data, &DetectionConfig::default()).is_empty());
    }

    #[test]
    fn long_steep_run_is_kept() {
        let data = profile(100.0, &[(1000.0, 0.0), (2000.0, 5.0), (1000.0, 0.0)]);
        let sections = scan(&data, &DetectionConfig::default());
        assert_eq!(sections.len(), 1);
        let section = &sections[0];
        assert_eq!(section.start_idx, 10);
        assert_eq!(section.first().distance, 1000.0);
        assert_eq!(section.last().distance, 3000.0);
        assert_eq!(section.gradients.len(), section.points.len() - 1);
        assert!(section.gradients.iter().all(|g| (g - 5.0).abs() < 1e-9));
    }

    #[test]
    fn short_steep_run_is_dropped() {
        let data = profile(100.0, &[(1000.0, 0.0), (1100.0, 6.0), (1000.0, 0.0)]);
        assert!(scan(&data, &DetectionConfig::default()).is_empty());
    }

    #[test]
    fn run_exactly_min_length_is_kept() {
        let data = profile(100.0, &[(500.0, 0.0), (1200.0, 4.0), (500.0, 0.0)]);
        let sections = scan(&data, &DetectionConfig::default());
        assert_eq!(sections.len(), 1);
        assert!((sections[0].span() - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn run_reaching_end_of_profile_is_closed() {
        let data = profile(100.0, &[(500.0, 0.0), (1500.0, 3.0)]);
        let sections = scan(&data, &DetectionConfig::default());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].last().distance, 2000.0);
    }

    #[test]
    fn gentle_slope_below_threshold_is_ignored() {
        let data = profile(100.0, &[(3000.0, 1.9)]);
        assert!(scan(&data, &DetectionConfig::default()).is_empty());
    }

    #[test]
    fn custom_thresholds_apply() {
        let data = profile(100.0, &[(800.0, 1.0)]);
        let config = DetectionConfig {
            min_gradient: 0.5,
            min_length_m: 500.0,
            ..DetectionConfig::default()
        };
        assert_eq!(scan(&data, &config).len(), 1);
    }

    #[test]
    fn separate_runs_keep_scan_order() {
        let data = profile(
            100.0,
            &[(1500.0, 5.0), (300.0, 0.0), (1500.0, 5.0)],
        );
        let sections = scan(&data, &DetectionConfig::default());
        assert_eq!(sections.len(), 2);
        assert!(sections[0].last().distance < sections[1].first().distance);
    }
}
